//! HTTP-level tests for the REST GitHub client against a mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use hubmind_github::{GithubApi, NewIssue, RestGithub};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pr_body(number: u64, comments: u64) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "title": format!("PR {number}"),
        "state": "open",
        "user": {"login": "octocat"},
        "created_at": "2026-08-29T08:00:00Z",
        "updated_at": "2026-08-29T10:00:00Z",
        "comments": comments,
        "html_url": format!("https://github.com/o/r/pull/{number}")
    })
}

#[tokio::test]
async fn get_repo_sends_token_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello"))
        .and(header("Authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "full_name": "octo/hello",
            "description": "demo",
            "language": "Rust",
            "stargazers_count": 42,
            "forks_count": 7,
            "open_issues_count": 3,
            "html_url": "https://github.com/octo/hello",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2026-08-29T00:00:00Z",
            "topics": ["ai", "github"],
            "owner": {"login": "octo"}
        })))
        .mount(&server)
        .await;

    let client = RestGithub::with_base_url(Some("ghp_test".into()), server.uri());
    let repo = client.get_repo("octo/hello").await.unwrap();
    assert_eq!(repo.full_name, "octo/hello");
    assert_eq!(repo.stargazers_count, 42);
    assert_eq!(repo.topics, vec!["ai", "github"]);
    assert_eq!(repo.owner_login, "octo");
}

#[tokio::test]
async fn list_pulls_requests_updated_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/pulls"))
        .and(query_param("state", "all"))
        .and(query_param("sort", "updated"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([pr_body(2, 4), pr_body(1, 1)])),
        )
        .mount(&server)
        .await;

    let client = RestGithub::with_base_url(None, server.uri());
    let prs = client.list_pulls("o/r", "all", 30).await.unwrap();
    assert_eq!(prs.len(), 2);
    assert_eq!(prs[0].number, 2);
}

#[tokio::test]
async fn list_issues_drops_pull_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "number": 5,
                "title": "real issue",
                "state": "open",
                "user": {"login": "a"},
                "created_at": "2026-08-29T08:00:00Z",
                "updated_at": "2026-08-29T08:00:00Z",
                "labels": [],
                "assignees": []
            },
            {
                "number": 6,
                "title": "actually a PR",
                "state": "open",
                "user": {"login": "b"},
                "created_at": "2026-08-29T08:00:00Z",
                "updated_at": "2026-08-29T08:00:00Z",
                "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/6"},
                "labels": [],
                "assignees": []
            }
        ])))
        .mount(&server)
        .await;

    let client = RestGithub::with_base_url(None, server.uri());
    let issues = client.list_issues("o/r", "open", 20).await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].number, 5);
}

#[tokio::test]
async fn create_issue_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/o/r/issues"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "number": 99,
            "title": "Fix crash on startup",
            "state": "open",
            "user": {"login": "hubmind"},
            "created_at": "2026-08-29T08:00:00Z",
            "updated_at": "2026-08-29T08:00:00Z",
            "labels": [{"name": "bug"}, {"name": "high"}],
            "assignees": [],
            "html_url": "https://github.com/o/r/issues/99"
        })))
        .mount(&server)
        .await;

    let client = RestGithub::with_base_url(None, server.uri());
    let issue = client
        .create_issue(
            "o/r",
            &NewIssue {
                title: "Fix crash on startup".into(),
                body: "details".into(),
                assignees: vec![],
                labels: vec!["bug".into(), "high".into()],
            },
        )
        .await
        .unwrap();
    assert_eq!(issue.number, 99);
    assert_eq!(issue.labels, vec!["bug", "high"]);
}

#[tokio::test]
async fn list_commits_since_passes_window_start() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/commits"))
        .and(query_param("since", "2026-08-22T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "sha": "abc123",
                "commit": {"message": "feat: add thing", "author": {"name": "Jo Dev"}},
                "author": {"login": "jodev"}
            },
            {
                "sha": "def456",
                "commit": {"message": "docs: typo", "author": {"name": "Anon"}},
                "author": null
            }
        ])))
        .mount(&server)
        .await;

    let client = RestGithub::with_base_url(None, server.uri());
    let since = chrono::DateTime::parse_from_rfc3339("2026-08-22T00:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let commits = client.list_commits_since("o/r", since, 100).await.unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].author_identity(), "jodev");
    assert_eq!(commits[1].author_identity(), "Anon");
}

#[tokio::test]
async fn readme_is_base64_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            // "# Hello\nWorld" wrapped the way the API wraps long content
            "content": "IyBIZWxsbwpX\nb3JsZA==\n",
            "name": "README.md"
        })))
        .mount(&server)
        .await;

    let client = RestGithub::with_base_url(None, server.uri());
    let readme = client.get_readme("o/r").await.unwrap();
    assert_eq!(readme, "# Hello\nWorld");
}

#[tokio::test]
async fn api_failure_surfaces_as_github_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/missing/repo"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found"
        })))
        .mount(&server)
        .await;

    let client = RestGithub::with_base_url(None, server.uri());
    let err = client.get_repo("missing/repo").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("404"));
    assert!(msg.contains("Not Found"));
}
