use serde::Serialize;
use std::collections::BTreeMap;

use super::category::{categorize, Category};
use super::commit::ParsedCommit;

/// Releasable commits grouped by release-note section
///
/// Only [`aggregate`] builds one, so a present key always holds at least one
/// commit and every commit under a key categorizes to that key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct GroupedCommits {
    groups: BTreeMap<Category, Vec<ParsedCommit>>,
}

impl GroupedCommits {
    pub fn get(&self, category: Category) -> Option<&[ParsedCommit]> {
        self.groups.get(&category).map(Vec::as_slice)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.groups.contains_key(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of releasable commits across all sections
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Sections in release-note order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[ParsedCommit])> + '_ {
        self.groups
            .iter()
            .map(|(category, commits)| (*category, commits.as_slice()))
    }
}

/// Group releasable commits by category, keeping source order within each group
pub fn aggregate<I>(commits: I) -> GroupedCommits
where
    I: IntoIterator<Item = ParsedCommit>,
{
    let mut groups: BTreeMap<Category, Vec<ParsedCommit>> = BTreeMap::new();

    for commit in commits {
        if let Some(category) = categorize(&commit) {
            groups.entry(category).or_default().push(commit);
        }
    }

    GroupedCommits { groups }
}
