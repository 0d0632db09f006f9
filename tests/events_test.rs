// tests/events_test.rs
use chrono::NaiveDate;
use conventional_release::events::TriggerEvent;
use std::fs;

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn test_decode_push_fixture() {
    let event = TriggerEvent::from_webhook("push", &fixture("push_event.json"))
        .unwrap()
        .unwrap();
    let TriggerEvent::Push(push) = event else {
        panic!("expected push event");
    };

    assert_eq!(push.reference, "refs/heads/master");
    assert_eq!(push.owner, "hahow");
    assert_eq!(push.repo, "hh-frontend-react");
    assert_eq!(push.head_commit_date, NaiveDate::from_ymd_opt(2018, 1, 16));
    assert_eq!(push.commits.len(), 3);
    assert_eq!(push.commits[0].sha, "a10867b14bb761a232cd80139fbd4c0d33264240");
    assert_eq!(push.commits[0].author, "Amo Wu");
    assert_eq!(push.commits[2].message, "fix(controllers/auth): oauth login failed");
    assert_eq!(
        push.commits[0].timestamp.map(|t| t.to_rfc3339()),
        Some("2018-01-16T14:40:01+00:00".to_string())
    );
}

#[test]
fn test_decode_pull_request_fixture() {
    let event = TriggerEvent::from_webhook("pull_request", &fixture("pull_request_opened.json"))
        .unwrap()
        .unwrap();
    let TriggerEvent::PullRequest(pull_request) = event else {
        panic!("expected pull request event");
    };

    assert_eq!(pull_request.action, "opened");
    assert_eq!(pull_request.number, 42);
    assert_eq!(pull_request.base_ref, "master");
    assert_eq!(pull_request.owner, "hahow");
    assert_eq!(pull_request.repo, "hh-frontend-react");
}

#[test]
fn test_push_payload_under_wrong_event_name() {
    assert!(TriggerEvent::from_webhook("pull_request", &fixture("push_event.json")).is_err());
}
