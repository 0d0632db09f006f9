//! Domain logic - pure release rules independent of the source control platform

pub mod category;
pub mod commit;
pub mod grouped;
pub mod tag;
pub mod version;

pub use category::{categorize, is_releasable, Category, BREAKING_CHANGE_TITLE};
pub use commit::{Note, ParsedCommit, RawCommit};
pub use grouped::{aggregate, GroupedCommits};
pub use tag::TagPattern;
pub use version::{bump, parse_release_version, resolve, BumpLevel};
