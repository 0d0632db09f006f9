//! Trigger events decoded from GitHub webhook payloads

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};

/// A push of commits to a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// Full ref, e.g. `refs/heads/master`
    pub reference: String,
    pub owner: String,
    pub repo: String,
    /// Date part of the head commit timestamp, in the committer's offset
    pub head_commit_date: Option<NaiveDate>,
    /// Commits carried by the payload, oldest first
    pub commits: Vec<RawCommit>,
}

/// A pull request lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: u64,
    pub base_ref: String,
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Push(PushEvent),
    PullRequest(PullRequestEvent),
}

impl TriggerEvent {
    /// Decode a webhook delivery by its `X-GitHub-Event` name
    ///
    /// Events other than `push` and `pull_request` decode to `None`.
    pub fn from_webhook(event_name: &str, body: &str) -> Result<Option<Self>> {
        match event_name {
            "push" => {
                let payload: PushPayload = serde_json::from_str(body)?;
                Ok(Some(TriggerEvent::Push(payload.try_into()?)))
            }
            "pull_request" => {
                let payload: PullRequestPayload = serde_json::from_str(body)?;
                Ok(Some(TriggerEvent::PullRequest(payload.try_into()?)))
            }
            _ => Ok(None),
        }
    }

    pub fn owner(&self) -> &str {
        match self {
            TriggerEvent::Push(event) => &event.owner,
            TriggerEvent::PullRequest(event) => &event.owner,
        }
    }

    pub fn repo(&self) -> &str {
        match self {
            TriggerEvent::Push(event) => &event.repo,
            TriggerEvent::PullRequest(event) => &event.repo,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: OwnerPayload,
}

impl RepositoryPayload {
    fn into_owner_and_name(self) -> Result<(String, String)> {
        let owner = self
            .owner
            .login
            .or(self.owner.name)
            .ok_or_else(|| ReleaseError::payload("repository owner has neither login nor name"))?;
        Ok((owner, self.name))
    }
}

#[derive(Debug, Deserialize)]
struct AuthorPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    id: String,
    message: String,
    timestamp: Option<DateTime<FixedOffset>>,
    author: AuthorPayload,
}

#[derive(Debug, Deserialize)]
struct HeadCommitPayload {
    timestamp: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    reference: String,
    repository: RepositoryPayload,
    head_commit: Option<HeadCommitPayload>,
    #[serde(default)]
    commits: Vec<CommitPayload>,
}

impl TryFrom<PushPayload> for PushEvent {
    type Error = ReleaseError;

    fn try_from(payload: PushPayload) -> Result<Self> {
        let (owner, repo) = payload.repository.into_owner_and_name()?;
        let commits = payload
            .commits
            .into_iter()
            .map(|commit| RawCommit {
                sha: commit.id,
                message: commit.message,
                author: commit.author.name,
                timestamp: commit.timestamp.map(|t| t.with_timezone(&Utc)),
            })
            .collect();

        Ok(PushEvent {
            reference: payload.reference,
            owner,
            repo,
            head_commit_date: payload
                .head_commit
                .and_then(|head| head.timestamp)
                .map(|timestamp| timestamp.date_naive()),
            commits,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BasePayload {
    #[serde(rename = "ref")]
    reference: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestDetailPayload {
    base: BasePayload,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    action: String,
    number: u64,
    pull_request: PullRequestDetailPayload,
    repository: RepositoryPayload,
}

impl TryFrom<PullRequestPayload> for PullRequestEvent {
    type Error = ReleaseError;

    fn try_from(payload: PullRequestPayload) -> Result<Self> {
        let (owner, repo) = payload.repository.into_owner_and_name()?;
        Ok(PullRequestEvent {
            action: payload.action,
            number: payload.number,
            base_ref: payload.pull_request.base.reference,
            owner,
            repo,
        })
    }
}
