use std::fmt;

use crate::domain::BumpLevel;

/// Reasons a trigger ends without a release.
/// These are expected outcomes, reported informationally rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoRelease {
    /// Previous release tag is not a semantic version, so no next version exists
    UnparsableBaseline { tag: String },
    /// None of the inspected commits is a feat, fix or breaking change
    NoReleasableCommits { inspected: usize },
    /// Incrementing the baseline overflows the version component
    VersionOverflow { tag: String, bump: BumpLevel },
    /// Push landed on a branch other than the release branch
    NotReleaseBranch {
        reference: String,
        release_branch: String,
    },
    /// Pull request event that is not an opening against the release branch
    NotOpenedForReleaseBranch {
        action: String,
        base_ref: String,
        release_branch: String,
    },
}

impl fmt::Display for NoRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoRelease::UnparsableBaseline { tag } => {
                write!(f, "Previous release tag '{}' is not a semantic version", tag)
            }
            NoRelease::NoReleasableCommits { inspected } => {
                write!(f, "No releasable commits among {} inspected", inspected)
            }
            NoRelease::VersionOverflow { tag, bump } => {
                write!(f, "Version '{}' has no next {} version", tag, bump)
            }
            NoRelease::NotReleaseBranch {
                reference,
                release_branch,
            } => write!(
                f,
                "Pushed ref '{}' is not the release branch '{}'",
                reference, release_branch
            ),
            NoRelease::NotOpenedForReleaseBranch {
                action,
                base_ref,
                release_branch,
            } => write!(
                f,
                "Pull request '{}' against '{}' does not target release branch '{}'",
                action, base_ref, release_branch
            ),
        }
    }
}
