pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod fetcher;
pub mod handler;
pub mod orchestrator;
pub mod render;
pub mod skip;
pub mod source;
pub mod ui;

pub use error::{ReleaseError, Result};
pub use orchestrator::{Decision, EventContext, ReleaseDecision, ReleaseOrchestrator};
