use serde::{Deserialize, Serialize};
use std::fmt;

use super::commit::ParsedCommit;

/// Footer title that forces a commit into the breaking-change section
pub const BREAKING_CHANGE_TITLE: &str = "BREAKING CHANGE";

/// Release-note section a releasable commit belongs to
///
/// Ordering follows the section order of the release notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    BreakingChange,
    Feat,
    Fix,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::BreakingChange, Category::Feat, Category::Fix];

    /// Key used in grouped output (`breakingChange`, `feat`, `fix`)
    pub fn key(&self) -> &'static str {
        match self {
            Category::BreakingChange => "breakingChange",
            Category::Feat => "feat",
            Category::Fix => "fix",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Classify a parsed commit
///
/// A `BREAKING CHANGE` note wins over the declared type; otherwise only
/// `feat` and `fix` are releasable.
pub fn categorize(commit: &ParsedCommit) -> Option<Category> {
    if commit.has_note(BREAKING_CHANGE_TITLE) {
        return Some(Category::BreakingChange);
    }

    match commit.r#type.as_deref() {
        Some("feat") => Some(Category::Feat),
        Some("fix") => Some(Category::Fix),
        _ => None,
    }
}

pub fn is_releasable(commit: &ParsedCommit) -> bool {
    categorize(commit).is_some()
}
