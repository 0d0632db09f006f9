//! Per-event glue: both trigger paths run the same fetch, decide, render and
//! publish sequence, differing only in where commits come from and where the
//! rendered notes go.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::RawCommit;
use crate::error::Result;
use crate::events::{PullRequestEvent, PushEvent, TriggerEvent};
use crate::fetcher::{drop_landing_commit, CommitFetcher};
use crate::orchestrator::{Decision, EventContext, ReleaseDecision, ReleaseOrchestrator};
use crate::render::{Renderer, TemplateStyle};
use crate::skip::NoRelease;
use crate::source::{NewRelease, Publisher, SourceControl};

/// What handling one event ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(NoRelease),
    Released { tag: String },
    Commented { number: u64, tag: String },
    /// The decision was made but the platform rejected it; not retried
    PublishFailed { tag: String, error: String },
}

/// Handles trigger events against one platform
pub struct EventHandler<'a, S: SourceControl + ?Sized, P: Publisher + ?Sized> {
    source: &'a S,
    publisher: &'a P,
    config: &'a Config,
    orchestrator: ReleaseOrchestrator,
    today: NaiveDate,
}

impl<'a, S: SourceControl + ?Sized, P: Publisher + ?Sized> EventHandler<'a, S, P> {
    pub fn new(source: &'a S, publisher: &'a P, config: &'a Config) -> Result<Self> {
        Ok(EventHandler {
            source,
            publisher,
            config,
            orchestrator: ReleaseOrchestrator::new(config)?,
            today: Utc::now().date_naive(),
        })
    }

    /// Use a fixed date where the event carries none
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Handle one event
    ///
    /// Expected absences come back as [`Outcome::Skipped`] and publish failures
    /// as [`Outcome::PublishFailed`]. An error means fetching or rendering
    /// failed and nothing was published.
    pub async fn handle(&self, event: &TriggerEvent) -> Result<Outcome> {
        debug!(owner = event.owner(), repo = event.repo(), "handling event");
        match event {
            TriggerEvent::Push(push) => self.handle_push(push).await,
            TriggerEvent::PullRequest(pull_request) => {
                self.handle_pull_request(pull_request).await
            }
        }
    }

    async fn handle_push(&self, event: &PushEvent) -> Result<Outcome> {
        let release_ref = self.config.release_ref();
        if event.reference != release_ref {
            info!(reference = %event.reference, "push is not on the release branch");
            return Ok(Outcome::Skipped(NoRelease::NotReleaseBranch {
                reference: event.reference.clone(),
                release_branch: self.config.release_branch.clone(),
            }));
        }

        let fetcher = CommitFetcher::new(self.source, &event.owner, &event.repo);
        let latest = fetcher.latest_release_tag().await;
        let previous_tag = self.previous_tag(latest.as_deref());
        if let Some(skip) = self.unparsable_baseline(&previous_tag) {
            return Ok(Outcome::Skipped(skip));
        }

        let commits = drop_landing_commit(fetcher.fetch_since_release(latest.as_deref()).await?);
        let ctx = self.context(&event.owner, &event.repo, event.head_commit_date);

        let release = match self.decide(&previous_tag, &commits, &ctx) {
            Ok(release) => release,
            Err(skip) => return Ok(Outcome::Skipped(skip)),
        };

        let new_release = NewRelease {
            tag_name: release.next_tag.clone(),
            target_branch: release.target_branch.clone(),
            title: release.next_tag.clone(),
            body: self.config.template.render(&release, &ctx)?,
        };

        match self
            .publisher
            .create_release(&ctx.owner, &ctx.repo, &new_release)
            .await
        {
            Ok(()) => {
                info!(owner = %ctx.owner, repo = %ctx.repo, tag = %release.next_tag, "release published");
                Ok(Outcome::Released {
                    tag: release.next_tag,
                })
            }
            Err(e) => {
                warn!(owner = %ctx.owner, repo = %ctx.repo, tag = %release.next_tag, error = %e, "release creation failed");
                Ok(Outcome::PublishFailed {
                    tag: release.next_tag,
                    error: e.to_string(),
                })
            }
        }
    }

    async fn handle_pull_request(&self, event: &PullRequestEvent) -> Result<Outcome> {
        if event.action != "opened" || event.base_ref != self.config.release_branch {
            info!(action = %event.action, base = %event.base_ref, "pull request is not opened against the release branch");
            return Ok(Outcome::Skipped(NoRelease::NotOpenedForReleaseBranch {
                action: event.action.clone(),
                base_ref: event.base_ref.clone(),
                release_branch: self.config.release_branch.clone(),
            }));
        }

        let fetcher = CommitFetcher::new(self.source, &event.owner, &event.repo);
        let latest = fetcher.latest_release_tag().await;
        let previous_tag = self.previous_tag(latest.as_deref());
        if let Some(skip) = self.unparsable_baseline(&previous_tag) {
            return Ok(Outcome::Skipped(skip));
        }

        let commits = fetcher.fetch_pull_request(event.number).await?;
        let ctx = self.context(&event.owner, &event.repo, None);

        let release = match self.decide(&previous_tag, &commits, &ctx) {
            Ok(release) => release,
            Err(skip) => return Ok(Outcome::Skipped(skip)),
        };

        let body = TemplateStyle::Compact.render(&release, &ctx)?;
        match self
            .publisher
            .create_comment(&ctx.owner, &ctx.repo, event.number, &body)
            .await
        {
            Ok(()) => {
                info!(owner = %ctx.owner, repo = %ctx.repo, number = event.number, "release preview commented");
                Ok(Outcome::Commented {
                    number: event.number,
                    tag: release.next_tag,
                })
            }
            Err(e) => {
                warn!(owner = %ctx.owner, repo = %ctx.repo, number = event.number, error = %e, "comment creation failed");
                Ok(Outcome::PublishFailed {
                    tag: release.next_tag,
                    error: e.to_string(),
                })
            }
        }
    }

    /// Checks the baseline before any page is fetched
    fn unparsable_baseline(&self, previous_tag: &str) -> Option<NoRelease> {
        if self.orchestrator.accepts_baseline(previous_tag) {
            return None;
        }
        info!(tag = previous_tag, "previous release tag is not semver, skipping release");
        Some(NoRelease::UnparsableBaseline {
            tag: previous_tag.to_string(),
        })
    }

    fn previous_tag(&self, latest: Option<&str>) -> String {
        latest
            .map(str::to_string)
            .unwrap_or_else(|| self.config.initial_version.clone())
    }

    fn context(&self, owner: &str, repo: &str, date: Option<NaiveDate>) -> EventContext {
        EventContext {
            date: date.unwrap_or(self.today),
            owner: owner.to_string(),
            repo: repo.to_string(),
            target_branch: self.config.release_branch.clone(),
        }
    }

    fn decide(
        &self,
        previous_tag: &str,
        commits: &[RawCommit],
        ctx: &EventContext,
    ) -> std::result::Result<ReleaseDecision, NoRelease> {
        match self.orchestrator.decide(previous_tag, commits, ctx) {
            Decision::Release(release) => Ok(release),
            Decision::NoOp(skip) => Err(skip),
        }
    }
}
