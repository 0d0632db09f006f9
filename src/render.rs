//! Release note templates
//!
//! The built-in templates emit sections in a fixed order, each only when its
//! category holds commits, with one bullet per commit linking to the commit
//! page. A repository can supply its own Handlebars template instead.

use handlebars::{no_escape, Handlebars, Template};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{BumpLevel, Category, ParsedCommit};
use crate::error::{ReleaseError, Result};
use crate::orchestrator::{EventContext, ReleaseDecision};

/// Turns a release decision into the text of a release body or comment
pub trait Renderer {
    fn render(&self, decision: &ReleaseDecision, ctx: &EventContext) -> Result<String>;
}

/// Choice of release note template
///
/// In TOML: `template = "standard"`, `template = "compact"` or
/// `template = { text = "## {{tag}} ({{date}})" }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    /// Sections followed by a compare link between the two tags
    #[default]
    Standard,
    /// Sections only
    Compact,
    /// Handlebars template text
    ///
    /// Sees `owner`, `repo`, `date`, `tag`, `preTag` (also as `previousTag`),
    /// `bump`, and `commits` keyed by `breakingChange`, `feat` and `fix`. Each
    /// commit has `sha`, `type`, `scope`, `subject`, `body` and `author.name`.
    Text(String),
}

impl TemplateStyle {
    /// Check that a supplied template compiles
    pub fn validate(&self) -> Result<()> {
        match self {
            TemplateStyle::Text(text) => Template::compile(text)
                .map(|_| ())
                .map_err(|e| ReleaseError::template(e.to_string())),
            TemplateStyle::Standard | TemplateStyle::Compact => Ok(()),
        }
    }
}

fn section_heading(category: Category) -> &'static str {
    match category {
        Category::BreakingChange => "### :scream: BREAKING CHANGES :bangbang:",
        Category::Feat => "### :tada: New Features",
        Category::Fix => "### :bug: Bug Fixes",
    }
}

fn commit_line(commit: &ParsedCommit, ctx: &EventContext) -> String {
    let scope = commit
        .scope
        .as_deref()
        .map(|scope| format!("**{}**: ", scope))
        .unwrap_or_default();
    format!(
        "- {}{} (https://github.com/{}/{}/commit/{}) by {}",
        scope, commit.subject, ctx.owner, ctx.repo, commit.sha, commit.author
    )
}

fn render_sections(decision: &ReleaseDecision, ctx: &EventContext, compare_link: bool) -> String {
    let mut lines = vec![
        format!("## {} ({})", decision.next_tag, decision.release_date),
        String::new(),
    ];

    for (category, commits) in decision.commits.iter() {
        lines.push(section_heading(category).to_string());
        lines.push(String::new());
        lines.extend(commits.iter().map(|commit| commit_line(commit, ctx)));
        lines.push(String::new());
    }

    if compare_link {
        lines.push(format!(
            "[{prev}...{next}](https://github.com/{owner}/{repo}/compare/{prev}...{next})",
            prev = decision.previous_tag,
            next = decision.next_tag,
            owner = ctx.owner,
            repo = ctx.repo,
        ));
    }

    lines.join("\n")
}

#[derive(Serialize)]
struct TemplateAuthor<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct TemplateCommit<'a> {
    sha: &'a str,
    #[serde(rename = "type")]
    r#type: Option<&'a str>,
    scope: Option<&'a str>,
    subject: &'a str,
    body: Option<&'a str>,
    author: TemplateAuthor<'a>,
}

impl<'a> From<&'a ParsedCommit> for TemplateCommit<'a> {
    fn from(commit: &'a ParsedCommit) -> Self {
        TemplateCommit {
            sha: &commit.sha,
            r#type: commit.r#type.as_deref(),
            scope: commit.scope.as_deref(),
            subject: &commit.subject,
            body: commit.body.as_deref(),
            author: TemplateAuthor {
                name: &commit.author,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateContext<'a> {
    owner: &'a str,
    repo: &'a str,
    date: &'a str,
    tag: &'a str,
    pre_tag: &'a str,
    previous_tag: &'a str,
    bump: BumpLevel,
    commits: BTreeMap<&'static str, Vec<TemplateCommit<'a>>>,
}

impl<'a> TemplateContext<'a> {
    fn new(decision: &'a ReleaseDecision, ctx: &'a EventContext) -> Self {
        let commits: BTreeMap<&'static str, Vec<TemplateCommit<'a>>> = decision
            .commits
            .iter()
            .map(|(category, commits)| {
                (category.key(), commits.iter().map(TemplateCommit::from).collect())
            })
            .collect();

        TemplateContext {
            owner: &ctx.owner,
            repo: &ctx.repo,
            date: &decision.release_date,
            tag: &decision.next_tag,
            pre_tag: &decision.previous_tag,
            previous_tag: &decision.previous_tag,
            bump: decision.bump,
            commits,
        }
    }
}

fn render_text(text: &str, decision: &ReleaseDecision, ctx: &EventContext) -> Result<String> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(no_escape);
    registry
        .render_template(text, &TemplateContext::new(decision, ctx))
        .map_err(|e| ReleaseError::template(e.to_string()))
}

impl Renderer for TemplateStyle {
    fn render(&self, decision: &ReleaseDecision, ctx: &EventContext) -> Result<String> {
        let mut body = match self {
            TemplateStyle::Standard => render_sections(decision, ctx, true),
            TemplateStyle::Compact => render_sections(decision, ctx, false),
            TemplateStyle::Text(text) => render_text(text, decision, ctx)?,
        };

        body.truncate(body.trim_end().len());
        body.push('\n');
        Ok(body)
    }
}
