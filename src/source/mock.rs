use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};
use crate::source::{
    CommitDetail, ListCommitsParams, NewRelease, Page, PageParams, Publisher, Release,
    SourceControl, TagRef,
};

/// In-memory source control platform
///
/// Commits are kept newest first, as the real listing returns them, and are
/// served in pages of the requested size. Every listing request and publish
/// call is recorded for inspection.
#[derive(Debug, Default)]
pub struct MockSource {
    latest_release: Option<String>,
    tags: Vec<TagRef>,
    commits: Vec<RawCommit>,
    commit_dates: HashMap<String, DateTime<Utc>>,
    pull_requests: HashMap<u64, Vec<RawCommit>>,
    fail_on_page: Option<u32>,
    fail_publish: bool,
    commit_requests: Mutex<Vec<ListCommitsParams>>,
    releases: Mutex<Vec<NewRelease>>,
    comments: Mutex<Vec<(u64, String)>>,
}

impl MockSource {
    /// Create a new empty mock platform with no releases
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_latest_release(&mut self, tag_name: impl Into<String>) {
        self.latest_release = Some(tag_name.into());
    }

    pub fn add_tag(&mut self, name: impl Into<String>, commit_sha: impl Into<String>) {
        self.tags.push(TagRef::new(name, commit_sha));
    }

    /// Record a commit as the newest one on the branch
    pub fn push_commit(&mut self, commit: RawCommit) {
        if let Some(timestamp) = commit.timestamp {
            self.commit_dates.insert(commit.sha.clone(), timestamp);
        }
        self.commits.insert(0, commit);
    }

    pub fn add_pull_request(&mut self, number: u64, commits: Vec<RawCommit>) {
        self.pull_requests.insert(number, commits);
    }

    /// Make the listing fail when the given 1-based page is requested
    pub fn fail_on_page(&mut self, page: u32) {
        self.fail_on_page = Some(page);
    }

    /// Make every publish call fail
    pub fn fail_publish(&mut self) {
        self.fail_publish = true;
    }

    pub fn commit_requests(&self) -> Vec<ListCommitsParams> {
        self.commit_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn releases(&self) -> Vec<NewRelease> {
        self.releases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn comments(&self) -> Vec<(u64, String)> {
        self.comments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_page(&self, page: u32) -> Result<()> {
        match self.fail_on_page {
            Some(failing) if failing == page => Err(ReleaseError::source(format!(
                "listing page {} failed",
                page
            ))),
            _ => Ok(()),
        }
    }
}

fn paginate(items: Vec<RawCommit>, page: u32, per_page: u32) -> Page<RawCommit> {
    let per_page = per_page.max(1) as usize;
    let start = (page.max(1) as usize - 1) * per_page;
    let has_next_page = start + per_page < items.len();
    let items = items.into_iter().skip(start).take(per_page).collect();
    Page::new(items, has_next_page)
}

#[async_trait]
impl SourceControl for MockSource {
    async fn get_latest_release(&self, _owner: &str, _repo: &str) -> Result<Release> {
        self.latest_release
            .clone()
            .map(|tag_name| Release { tag_name })
            .ok_or_else(|| ReleaseError::not_found("no published release"))
    }

    async fn list_commits(
        &self,
        _owner: &str,
        _repo: &str,
        params: ListCommitsParams,
    ) -> Result<Page<RawCommit>> {
        self.commit_requests
            .lock()
            .map_err(|_| ReleaseError::source("mock state poisoned"))?
            .push(params);
        self.check_page(params.page)?;

        let matching: Vec<RawCommit> = self
            .commits
            .iter()
            .filter(|commit| match (params.since, commit.timestamp) {
                (Some(since), Some(timestamp)) => timestamp >= since,
                _ => true,
            })
            .cloned()
            .collect();

        Ok(paginate(matching, params.page, params.per_page))
    }

    async fn list_tags(&self, _owner: &str, _repo: &str) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }

    async fn get_commit(&self, _owner: &str, _repo: &str, sha: &str) -> Result<CommitDetail> {
        self.commit_dates
            .get(sha)
            .map(|author_date| CommitDetail {
                author_date: *author_date,
            })
            .ok_or_else(|| ReleaseError::not_found(format!("commit {}", sha)))
    }

    async fn list_pull_request_commits(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        params: PageParams,
    ) -> Result<Page<RawCommit>> {
        self.check_page(params.page)?;
        let commits = self
            .pull_requests
            .get(&number)
            .cloned()
            .ok_or_else(|| ReleaseError::not_found(format!("pull request #{}", number)))?;
        Ok(paginate(commits, params.page, params.per_page))
    }
}

#[async_trait]
impl Publisher for MockSource {
    async fn create_release(&self, _owner: &str, _repo: &str, release: &NewRelease) -> Result<()> {
        if self.fail_publish {
            return Err(ReleaseError::publish("release creation rejected"));
        }
        self.releases
            .lock()
            .map_err(|_| ReleaseError::publish("mock state poisoned"))?
            .push(release.clone());
        Ok(())
    }

    async fn create_comment(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        body: &str,
    ) -> Result<()> {
        if self.fail_publish {
            return Err(ReleaseError::publish("comment creation rejected"));
        }
        self.comments
            .lock()
            .map_err(|_| ReleaseError::publish("mock state poisoned"))?
            .push((number, body.to_string()));
        Ok(())
    }
}
