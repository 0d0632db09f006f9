// tests/pipeline_test.rs
use chrono::NaiveDate;
use conventional_release::config::Config;
use conventional_release::domain::{BumpLevel, Category, RawCommit, TagPattern};
use conventional_release::render::{Renderer, TemplateStyle};
use conventional_release::skip::NoRelease;
use conventional_release::{Decision, EventContext, ReleaseOrchestrator};

fn ctx() -> EventContext {
    EventContext {
        date: NaiveDate::from_ymd_opt(2018, 1, 16).unwrap(),
        owner: "hahow".to_string(),
        repo: "hh-frontend-react".to_string(),
        target_branch: "master".to_string(),
    }
}

fn commits(messages: &[&str]) -> Vec<RawCommit> {
    messages
        .iter()
        .enumerate()
        .map(|(n, message)| RawCommit::new(format!("c0ffee{}", n), *message, "Amo Wu"))
        .collect()
}

fn decide(previous_tag: &str, messages: &[&str]) -> Decision {
    ReleaseOrchestrator::new(&Config::default())
        .unwrap()
        .decide(previous_tag, &commits(messages), &ctx())
}

#[test]
fn test_feat_and_fix_bump_minor() {
    let decision = decide("v1.0.0", &["feat: add login", "fix: typo"]);
    let release = decision.release().expect("release expected");

    assert_eq!(release.bump, BumpLevel::Minor);
    assert_eq!(release.previous_tag, "v1.0.0");
    assert_eq!(release.next_tag, "v1.1.0");
    assert_eq!(release.release_date, "2018-01-16");
    assert_eq!(release.target_branch, "master");
    assert_eq!(release.commits.get(Category::Feat).unwrap().len(), 1);
    assert_eq!(release.commits.get(Category::Fix).unwrap().len(), 1);
    assert!(!release.commits.contains(Category::BreakingChange));
}

#[test]
fn test_chore_only_is_noop() {
    assert_eq!(
        decide("v1.0.0", &["chore: cleanup"]),
        Decision::NoOp(NoRelease::NoReleasableCommits { inspected: 1 })
    );
}

#[test]
fn test_first_release_from_initial_version() {
    let config = Config::default();
    let decision = decide(&config.initial_version, &["fix: first bug"]);
    let release = decision.release().unwrap();

    assert_eq!(release.previous_tag, "0.0.0");
    assert_eq!(release.next_tag, "v0.0.1");
    assert_eq!(release.bump, BumpLevel::Patch);
}

#[test]
fn test_breaking_note_overrides_type() {
    let decision = decide(
        "v1.4.2",
        &[
            "chore(deps): drop node 8\n\nBREAKING CHANGE: node 10 is required",
            "feat: add login",
        ],
    );
    let release = decision.release().unwrap();

    assert_eq!(release.bump, BumpLevel::Major);
    assert_eq!(release.next_tag, "v2.0.0");
    let breaking = release.commits.get(Category::BreakingChange).unwrap();
    assert_eq!(breaking[0].r#type.as_deref(), Some("chore"));
    assert_eq!(breaking[0].notes[0].text, "node 10 is required");
}

#[test]
fn test_unconventional_messages_are_ignored() {
    let decision = decide(
        "v2.3.4",
        &["Merge pull request #12 from hahow/develop", "fix: typo", "WIP"],
    );
    let release = decision.release().unwrap();

    assert_eq!(release.next_tag, "v2.3.5");
    assert_eq!(release.commits.len(), 1);
}

#[test]
fn test_unparsable_baseline() {
    assert_eq!(
        decide("latest", &["feat: add login"]),
        Decision::NoOp(NoRelease::UnparsableBaseline {
            tag: "latest".to_string()
        })
    );
}

#[test]
fn test_prerelease_baseline_is_promoted() {
    let decision = decide("v2.0.0-rc.1", &["fix: typo"]);
    assert_eq!(decision.release().unwrap().next_tag, "v2.0.0");
}

#[test]
fn test_custom_tag_pattern() {
    let orchestrator =
        ReleaseOrchestrator::with_tag_pattern(TagPattern::new("release-{version}").unwrap());
    let decision = orchestrator.decide("release-0.9.0", &commits(&["feat: x"]), &ctx());
    assert_eq!(decision.release().unwrap().next_tag, "release-0.10.0");
}

#[test]
fn test_rendered_notes_for_decision() {
    let decision = decide("v1.0.0", &["feat(course): add syllabus", "fix: typo"]);
    let release = decision.release().unwrap();
    let body = TemplateStyle::Standard.render(release, &ctx()).unwrap();

    let feat = body.find("### :tada: New Features").unwrap();
    let fix = body.find("### :bug: Bug Fixes").unwrap();
    assert!(feat < fix);
    assert!(body.starts_with("## v1.1.0 (2018-01-16)\n"));
    assert!(body.contains(
        "- **course**: add syllabus (https://github.com/hahow/hh-frontend-react/commit/c0ffee0) by Amo Wu"
    ));
    assert!(body.ends_with(
        "[v1.0.0...v1.1.0](https://github.com/hahow/hh-frontend-react/compare/v1.0.0...v1.1.0)\n"
    ));
}

#[test]
fn test_decision_json_shape() {
    let decision = decide("v1.0.0", &["feat: add login"]);
    let json = serde_json::to_value(decision.release().unwrap()).unwrap();

    assert_eq!(json["previousTag"], "v1.0.0");
    assert_eq!(json["nextTag"], "v1.1.0");
    assert_eq!(json["bump"], "minor");
    assert_eq!(json["commits"]["feat"][0]["subject"], "add login");
    assert!(json["commits"].get("fix").is_none());
}
