//! Source control platform abstraction layer
//!
//! The engine never talks to a hosting API directly. It reads commits, tags
//! and releases through [SourceControl] and publishes through [Publisher];
//! [mock::MockSource] implements both in memory for tests and offline runs.

pub mod mock;

pub use mock::MockSource;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RawCommit;
use crate::error::Result;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, has_next_page: bool) -> Self {
        Page {
            items,
            has_next_page,
        }
    }

    pub fn last(items: Vec<T>) -> Self {
        Page::new(items, false)
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub per_page: u32,
}

/// Commit listing request, optionally bounded below by authored time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCommitsParams {
    pub since: Option<DateTime<Utc>>,
    pub page: u32,
    pub per_page: u32,
}

/// The latest published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

/// A tag and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
    pub commit_sha: String,
}

impl TagRef {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        TagRef {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// The part of a single-commit lookup the baseline needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub author_date: DateTime<Utc>,
}

/// Release to be created on the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub target_branch: String,
    pub title: String,
    pub body: String,
}

/// Read side of the source control platform
///
/// Implementations map transport failures to [crate::error::ReleaseError::Source]
/// and missing resources to [crate::error::ReleaseError::NotFound]. Commit
/// listings return newest commits first.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Latest published release; fails when the repository has none
    async fn get_latest_release(&self, owner: &str, repo: &str) -> Result<Release>;

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        params: ListCommitsParams,
    ) -> Result<Page<RawCommit>>;

    async fn list_tags(&self, owner: &str, repo: &str) -> Result<Vec<TagRef>>;

    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitDetail>;

    async fn list_pull_request_commits(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        params: PageParams,
    ) -> Result<Page<RawCommit>>;
}

/// Write side of the source control platform
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn create_release(&self, owner: &str, repo: &str, release: &NewRelease) -> Result<()>;

    async fn create_comment(&self, owner: &str, repo: &str, number: u64, body: &str)
        -> Result<()>;
}
