//! Release decision for one trigger event
//!
//! Composes the parser, classifier, aggregator and bump resolver over a
//! candidate commit list and attaches the tag arithmetic. Nothing here talks
//! to the platform; publishing the decision is the caller's job.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{
    aggregate, bump, resolve, BumpLevel, GroupedCommits, ParsedCommit, RawCommit, TagPattern,
};
use crate::error::Result;
use crate::skip::NoRelease;

/// Where and when the release happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub date: NaiveDate,
    pub owner: String,
    pub repo: String,
    pub target_branch: String,
}

/// A fully specified release, ready to be rendered and published
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDecision {
    pub previous_tag: String,
    pub next_tag: String,
    pub bump: BumpLevel,
    pub commits: GroupedCommits,
    pub release_date: String,
    pub target_branch: String,
}

/// Outcome of [`ReleaseOrchestrator::decide`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    NoOp(NoRelease),
    Release(ReleaseDecision),
}

impl Decision {
    pub fn release(&self) -> Option<&ReleaseDecision> {
        match self {
            Decision::Release(decision) => Some(decision),
            Decision::NoOp(_) => None,
        }
    }
}

/// Decides whether and how to release, given a baseline tag and candidates
#[derive(Debug, Clone)]
pub struct ReleaseOrchestrator {
    tag_pattern: TagPattern,
}

impl ReleaseOrchestrator {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(ReleaseOrchestrator {
            tag_pattern: config.tag_pattern()?,
        })
    }

    pub fn with_tag_pattern(tag_pattern: TagPattern) -> Self {
        ReleaseOrchestrator { tag_pattern }
    }

    /// Whether `tag` can serve as the baseline of a release
    pub fn accepts_baseline(&self, tag: &str) -> bool {
        self.tag_pattern.parse(tag).is_some()
    }

    /// Produce the release decision for `candidates` on top of `previous_tag`
    ///
    /// Returns a no-op when the baseline is not a semantic version or when no
    /// candidate is releasable. Same inputs always give the same decision.
    pub fn decide(
        &self,
        previous_tag: &str,
        candidates: &[RawCommit],
        ctx: &EventContext,
    ) -> Decision {
        let Some(previous_version) = self.tag_pattern.parse(previous_tag) else {
            info!(tag = previous_tag, "previous release tag is not semver, skipping release");
            return Decision::NoOp(NoRelease::UnparsableBaseline {
                tag: previous_tag.to_string(),
            });
        };

        let parsed: Vec<ParsedCommit> = candidates.iter().map(ParsedCommit::from_raw).collect();
        let conventional = parsed.iter().filter(|commit| commit.is_conventional()).count();
        let commits: GroupedCommits = aggregate(parsed);
        let level = resolve(&commits);
        debug!(
            candidates = candidates.len(),
            conventional,
            releasable = commits.len(),
            bump = %level,
            "classified commits"
        );

        if !level.is_release() {
            info!(owner = %ctx.owner, repo = %ctx.repo, "no releasable commits, skipping release");
            return Decision::NoOp(NoRelease::NoReleasableCommits {
                inspected: candidates.len(),
            });
        }

        let Some(next_version) = bump(&previous_version, level) else {
            info!(tag = previous_tag, bump = %level, "next version overflows, skipping release");
            return Decision::NoOp(NoRelease::VersionOverflow {
                tag: previous_tag.to_string(),
                bump: level,
            });
        };

        let next_tag = self.tag_pattern.format(&next_version);
        info!(owner = %ctx.owner, repo = %ctx.repo, previous = previous_tag, next = %next_tag, "release decided");

        Decision::Release(ReleaseDecision {
            previous_tag: previous_tag.to_string(),
            next_tag,
            bump: level,
            commits,
            release_date: ctx.date.format("%Y-%m-%d").to_string(),
            target_branch: ctx.target_branch.clone(),
        })
    }
}
