// tests/fetcher_test.rs
use chrono::{DateTime, Duration, TimeZone, Utc};
use conventional_release::domain::RawCommit;
use conventional_release::fetcher::{drop_landing_commit, Baseline, CommitFetcher, PER_PAGE};
use conventional_release::source::mock::MockSource;

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Repository with `count` commits, one minute apart, sha0 being the oldest
fn repository(count: usize) -> MockSource {
    let mut source = MockSource::new();
    for n in 0..count {
        source.push_commit(
            RawCommit::new(format!("sha{}", n), format!("fix: change {}", n), "Tester")
                .with_timestamp(at(n as i64)),
        );
    }
    source
}

#[tokio::test]
async fn test_drains_every_page() {
    let source = repository(250);
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let commits = fetcher.fetch_since(&Baseline::RepositoryStart).await.unwrap();

    assert_eq!(commits.len(), 250);
    assert_eq!(commits[0].sha, "sha249");
    assert_eq!(commits[249].sha, "sha0");

    let requests = source.commit_requests();
    let pages: Vec<u32> = requests.iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    assert!(requests.iter().all(|r| r.per_page == PER_PAGE && r.since.is_none()));
}

#[tokio::test]
async fn test_exactly_one_full_page_stops_after_it() {
    let source = repository(PER_PAGE as usize);
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let commits = fetcher.fetch_since(&Baseline::RepositoryStart).await.unwrap();

    assert_eq!(commits.len(), 100);
    assert_eq!(source.commit_requests().len(), 1);
}

#[tokio::test]
async fn test_empty_repository_requests_one_page() {
    let source = MockSource::new();
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    assert!(fetcher.fetch_since_release(None).await.unwrap().is_empty());
    assert_eq!(source.commit_requests().len(), 1);
}

#[tokio::test]
async fn test_baseline_resolves_tag_to_commit_date() {
    let mut source = repository(6);
    source.add_tag("v1.0.0", "sha2");
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let baseline = fetcher.resolve_baseline(Some("v1.0.0")).await.unwrap();

    assert_eq!(
        baseline,
        Baseline::Since {
            tag: "v1.0.0".to_string(),
            sha: "sha2".to_string(),
            timestamp: at(2),
        }
    );
}

#[tokio::test]
async fn test_fetch_since_release_filters_by_date() {
    let mut source = repository(6);
    source.add_tag("v0.9.0", "sha0");
    source.add_tag("v1.0.0", "sha2");
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let commits = fetcher.fetch_since_release(Some("v1.0.0")).await.unwrap();
    let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();

    // the tagged commit is listed at the bound but belongs to the release
    assert_eq!(shas, vec!["sha5", "sha4", "sha3"]);
    assert_eq!(source.commit_requests()[0].since, Some(at(2)));
}

#[tokio::test]
async fn test_commits_sharing_the_tag_timestamp_are_kept() {
    let mut source = repository(2);
    source.add_tag("v1.0.0", "sha1");
    source.push_commit(
        RawCommit::new("same-second", "fix: quick follow-up", "Tester").with_timestamp(at(1)),
    );
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let commits = fetcher.fetch_since_release(Some("v1.0.0")).await.unwrap();
    let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();

    assert_eq!(shas, vec!["same-second"]);
}

#[tokio::test]
async fn test_unknown_tag_reads_from_repository_start() {
    let mut source = repository(3);
    source.add_tag("v1.0.0", "sha1");
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let baseline = fetcher.resolve_baseline(Some("v9.9.9")).await.unwrap();
    assert_eq!(baseline, Baseline::RepositoryStart);

    let commits = fetcher.fetch_since_release(Some("v9.9.9")).await.unwrap();
    assert_eq!(commits.len(), 3);
}

#[tokio::test]
async fn test_tag_on_unknown_commit_aborts() {
    let mut source = repository(3);
    source.add_tag("v1.0.0", "deadbeef");
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let err = fetcher.fetch_since_release(Some("v1.0.0")).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(source.commit_requests().is_empty());
}

#[tokio::test]
async fn test_failing_page_aborts_the_fetch() {
    let mut source = repository(250);
    source.fail_on_page(2);
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let result = fetcher.fetch_since(&Baseline::RepositoryStart).await;

    assert!(result.is_err());
    assert_eq!(source.commit_requests().len(), 2);
}

#[tokio::test]
async fn test_latest_release_tag() {
    let mut source = MockSource::new();
    let fetcher = CommitFetcher::new(&source, "hahow", "web");
    assert_eq!(fetcher.latest_release_tag().await, None);

    source.set_latest_release("v1.2.3");
    let fetcher = CommitFetcher::new(&source, "hahow", "web");
    assert_eq!(fetcher.latest_release_tag().await.as_deref(), Some("v1.2.3"));
}

#[tokio::test]
async fn test_pull_request_commits_are_drained() {
    let mut source = MockSource::new();
    let commits: Vec<RawCommit> = (0..130)
        .map(|n| RawCommit::new(format!("pr{}", n), "feat: part", "Tester"))
        .collect();
    source.add_pull_request(7, commits);
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let fetched = fetcher.fetch_pull_request(7).await.unwrap();

    assert_eq!(fetched.len(), 130);
    assert_eq!(fetched[0].sha, "pr0");
    assert_eq!(fetched[129].sha, "pr129");
}

#[tokio::test]
async fn test_missing_pull_request_is_an_error() {
    let source = MockSource::new();
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    assert!(fetcher.fetch_pull_request(404).await.is_err());
}

#[tokio::test]
async fn test_push_fetch_drops_landing_commit() {
    let mut source = repository(3);
    source.push_commit(
        RawCommit::new("merge", "Merge pull request #3 from hahow/develop", "Tester")
            .with_timestamp(at(10)),
    );
    let fetcher = CommitFetcher::new(&source, "hahow", "web");

    let commits = drop_landing_commit(fetcher.fetch_since_release(None).await.unwrap());
    let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();

    assert_eq!(shas, vec!["sha2", "sha1", "sha0"]);
}
