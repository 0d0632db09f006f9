//! Incremental retrieval of the commits a release is decided on
//!
//! The listing API filters by authored time, so a previous release tag has to
//! be resolved to its commit and then to that commit's date before the first
//! page is requested. Pages are then drained one after another until the
//! source stops reporting a next page.

use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::{debug, info, warn};

use crate::domain::RawCommit;
use crate::error::Result;
use crate::source::{ListCommitsParams, Page, PageParams, SourceControl};

/// Largest page size the platform accepts
pub const PER_PAGE: u32 = 100;

/// Lower bound of the commit range since the previous release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Baseline {
    /// No previous release: the whole history is a candidate
    RepositoryStart,
    /// Commits authored at or after the previous release's tagged commit
    Since {
        tag: String,
        sha: String,
        timestamp: DateTime<Utc>,
    },
}

impl Baseline {
    pub fn since(&self) -> Option<DateTime<Utc>> {
        match self {
            Baseline::RepositoryStart => None,
            Baseline::Since { timestamp, .. } => Some(*timestamp),
        }
    }
}

/// Request pages starting at page 1 until one reports no next page
///
/// Items are concatenated in page order. The first failing page aborts the
/// drain and the pages already fetched are dropped with it.
pub async fn drain_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let next = fetch_page(page).await?;
        debug!(page, count = next.items.len(), "fetched page");
        items.extend(next.items);

        if !next.has_next_page {
            break;
        }
        page += 1;
    }

    Ok(items)
}

/// Drop the landing commit of a push-triggered fetch
///
/// Listings are newest first, so the landing commit is the first element. A
/// fetch holding a single commit is left alone: that commit is the authored
/// change itself.
pub fn drop_landing_commit(mut commits: Vec<RawCommit>) -> Vec<RawCommit> {
    if commits.len() > 1 {
        commits.remove(0);
    }
    commits
}

/// Fetches commit ranges for one repository
pub struct CommitFetcher<'a, S: SourceControl + ?Sized> {
    source: &'a S,
    owner: &'a str,
    repo: &'a str,
}

impl<'a, S: SourceControl + ?Sized> CommitFetcher<'a, S> {
    pub fn new(source: &'a S, owner: &'a str, repo: &'a str) -> Self {
        CommitFetcher {
            source,
            owner,
            repo,
        }
    }

    /// Tag of the latest release, or `None` when the repository has none
    ///
    /// The platform reports "no release yet" as a failed lookup, so every
    /// failure here means "start from the initial version".
    pub async fn latest_release_tag(&self) -> Option<String> {
        match self.source.get_latest_release(self.owner, self.repo).await {
            Ok(release) => {
                info!(owner = self.owner, repo = self.repo, tag = %release.tag_name, "latest release found");
                Some(release.tag_name)
            }
            Err(e) if e.is_not_found() => {
                info!(owner = self.owner, repo = self.repo, "repository has no release yet");
                None
            }
            Err(e) => {
                warn!(owner = self.owner, repo = self.repo, error = %e, "latest release lookup failed, assuming none");
                None
            }
        }
    }

    /// Resolve the previous release tag to the timestamp of its commit
    ///
    /// A tag that is not among the repository's tags falls back to the
    /// repository start. Failures listing tags or reading the commit abort.
    pub async fn resolve_baseline(&self, previous_release: Option<&str>) -> Result<Baseline> {
        let Some(tag) = previous_release else {
            debug!("no previous release, reading from repository start");
            return Ok(Baseline::RepositoryStart);
        };

        let tags = self.source.list_tags(self.owner, self.repo).await?;
        let Some(tag_ref) = tags.into_iter().find(|candidate| candidate.name == tag) else {
            info!(tag, "previous release tag not found, reading from repository start");
            return Ok(Baseline::RepositoryStart);
        };

        let detail = self
            .source
            .get_commit(self.owner, self.repo, &tag_ref.commit_sha)
            .await?;

        debug!(tag, sha = %tag_ref.commit_sha, since = %detail.author_date, "resolved baseline");
        Ok(Baseline::Since {
            tag: tag.to_string(),
            sha: tag_ref.commit_sha,
            timestamp: detail.author_date,
        })
    }

    /// All commits after the baseline, in source order
    ///
    /// The listing bound is inclusive, so the commit the previous release was
    /// tagged on comes back with the first page. It belongs to that release
    /// and is dropped here.
    pub async fn fetch_since(&self, baseline: &Baseline) -> Result<Vec<RawCommit>> {
        let source = self.source;
        let (owner, repo) = (self.owner, self.repo);
        let since = baseline.since();

        let commits = drain_pages(move |page| {
            source.list_commits(
                owner,
                repo,
                ListCommitsParams {
                    since,
                    page,
                    per_page: PER_PAGE,
                },
            )
        })
        .await?;

        let commits = match baseline {
            Baseline::Since { sha, .. } => commits
                .into_iter()
                .filter(|commit| commit.sha != *sha)
                .collect(),
            Baseline::RepositoryStart => commits,
        };

        info!(owner, repo, count = commits.len(), "commits since last release");
        Ok(commits)
    }

    /// Resolve the baseline for `previous_release` and drain every page after it
    pub async fn fetch_since_release(
        &self,
        previous_release: Option<&str>,
    ) -> Result<Vec<RawCommit>> {
        let baseline = self.resolve_baseline(previous_release).await?;
        self.fetch_since(&baseline).await
    }

    /// All commits of a pull request, in source order
    pub async fn fetch_pull_request(&self, number: u64) -> Result<Vec<RawCommit>> {
        let source = self.source;
        let (owner, repo) = (self.owner, self.repo);

        let commits = drain_pages(move |page| {
            source.list_pull_request_commits(
                owner,
                repo,
                number,
                PageParams {
                    page,
                    per_page: PER_PAGE,
                },
            )
        })
        .await?;

        info!(owner, repo, number, count = commits.len(), "pull request commits");
        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use std::cell::RefCell;

    fn commits(count: usize) -> Vec<RawCommit> {
        (0..count)
            .map(|n| RawCommit::new(format!("sha{}", n), "fix: x", "Tester"))
            .collect()
    }

    #[tokio::test]
    async fn test_drain_concatenates_pages_in_order() {
        let pages = vec![
            Page::new(vec![1, 2, 3], true),
            Page::new(vec![4], true),
            Page::new(vec![5, 6], false),
        ];
        let items = drain_pages(|page| {
            let next = pages[page as usize - 1].clone();
            async move { Ok::<_, ReleaseError>(next) }
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_drain_single_empty_page() {
        let items: Vec<u8> = drain_pages(|_| async { Ok::<_, ReleaseError>(Page::last(Vec::new())) })
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_drain_aborts_on_failure() {
        let requested = RefCell::new(Vec::new());
        let result: Result<Vec<u8>> = drain_pages(|page| {
            requested.borrow_mut().push(page);
            async move {
                if page == 2 {
                    Err(ReleaseError::source("rate limited"))
                } else {
                    Ok(Page::new(vec![1], true))
                }
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(*requested.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_drop_landing_commit() {
        let trimmed = drop_landing_commit(commits(3));
        let shas: Vec<&str> = trimmed.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["sha1", "sha2"]);
    }

    #[test]
    fn test_drop_landing_commit_keeps_single_commit() {
        assert_eq!(drop_landing_commit(commits(1)).len(), 1);
        assert!(drop_landing_commit(Vec::new()).is_empty());
    }

    #[test]
    fn test_baseline_since() {
        assert_eq!(Baseline::RepositoryStart.since(), None);
        let timestamp = Utc::now();
        let baseline = Baseline::Since {
            tag: "v1.0.0".to_string(),
            sha: "abc".to_string(),
            timestamp,
        };
        assert_eq!(baseline.since(), Some(timestamp));
    }
}
