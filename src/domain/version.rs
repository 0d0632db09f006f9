use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::grouped::GroupedCommits;

/// Semantic version component to increment for the next release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    Major,
    Minor,
    Patch,
    None,
}

impl BumpLevel {
    pub fn is_release(&self) -> bool {
        !matches!(self, BumpLevel::None)
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpLevel::Major => "major",
            BumpLevel::Minor => "minor",
            BumpLevel::Patch => "patch",
            BumpLevel::None => "none",
        };
        f.write_str(name)
    }
}

/// Bump level required by the grouped commits
///
/// breaking change → major, else feat → minor, else fix → patch, else none.
pub fn resolve(grouped: &GroupedCommits) -> BumpLevel {
    if grouped.contains(Category::BreakingChange) {
        BumpLevel::Major
    } else if grouped.contains(Category::Feat) {
        BumpLevel::Minor
    } else if grouped.contains(Category::Fix) {
        BumpLevel::Patch
    } else {
        BumpLevel::None
    }
}

/// Parse a release tag such as `v1.2.3` or `1.2.3-beta.1` into a semantic version
///
/// One leading `v`, `V` or `=` is accepted. Returns `None` when what remains is
/// not a valid semantic version.
pub fn parse_release_version(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let clean = trimmed
        .strip_prefix(['v', 'V', '='])
        .unwrap_or(trimmed)
        .trim_start();
    Version::parse(clean).ok()
}

/// Increment a version at the given level
///
/// A pre-release of the target version is promoted instead of skipped, so
/// `2.0.0-rc.1` bumped at major becomes `2.0.0`. Build metadata is dropped.
/// Returns `None` for [`BumpLevel::None`] and when the incremented component
/// would overflow.
pub fn bump(version: &Version, level: BumpLevel) -> Option<Version> {
    let is_prerelease = !version.pre.is_empty();
    let mut next = version.clone();

    match level {
        BumpLevel::Major => {
            if !is_prerelease || version.minor != 0 || version.patch != 0 {
                next.major = version.major.checked_add(1)?;
            }
            next.minor = 0;
            next.patch = 0;
        }
        BumpLevel::Minor => {
            if !is_prerelease || version.patch != 0 {
                next.minor = version.minor.checked_add(1)?;
            }
            next.patch = 0;
        }
        BumpLevel::Patch => {
            if !is_prerelease {
                next.patch = version.patch.checked_add(1)?;
            }
        }
        BumpLevel::None => return None,
    }

    next.pre = Prerelease::EMPTY;
    next.build = BuildMetadata::EMPTY;
    Some(next)
}
