use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn login_of<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Account {
        login: String,
    }
    Ok(Option::<Account>::deserialize(deserializer)?
        .map(|a| a.login)
        .unwrap_or_default())
}

fn names_of<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Named {
        name: String,
    }
    Ok(Option::<Vec<Named>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|n| n.name)
        .collect())
}

fn logins_of<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Account {
        login: String,
    }
    Ok(Option::<Vec<Account>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|a| a.login)
        .collect())
}

/// Repository metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repo {
    /// `owner/repo` full name.
    pub full_name: String,
    /// Repository description, when set.
    #[serde(default)]
    pub description: Option<String>,
    /// Primary language, when detected.
    #[serde(default)]
    pub language: Option<String>,
    /// Star count.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Fork count.
    #[serde(default)]
    pub forks_count: u64,
    /// Open issue count.
    #[serde(default)]
    pub open_issues_count: u64,
    /// Web URL.
    #[serde(default)]
    pub html_url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Repository topics. Present in repo payloads when requested with the
    /// mercy-preview media type; defaults to empty.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Owner login.
    #[serde(rename = "owner", deserialize_with = "login_of", default)]
    pub owner_login: String,
}

/// A pull request, as listed or fetched individually.
///
/// The list endpoint omits the engagement and diff counters; they default to
/// zero there and are populated by a single-PR fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number.
    pub number: u64,
    /// Title line.
    pub title: String,
    /// Raw state as reported by the API: `open` or `closed`.
    pub state: String,
    /// Author login.
    #[serde(rename = "user", deserialize_with = "login_of", default)]
    pub author: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Merge timestamp, when merged.
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    /// Conversation comment count.
    #[serde(default)]
    pub comments: u64,
    /// Review comment count.
    #[serde(default)]
    pub review_comments: u64,
    /// Added lines.
    #[serde(default)]
    pub additions: u64,
    /// Deleted lines.
    #[serde(default)]
    pub deletions: u64,
    /// Web URL.
    #[serde(default)]
    pub html_url: String,
}

impl PullRequest {
    /// Effective state for scoring and display: `merged` when a merge
    /// timestamp exists, otherwise the raw API state.
    pub fn effective_state(&self) -> &str {
        if self.merged_at.is_some() {
            "merged"
        } else {
            &self.state
        }
    }
}

/// Per-file diff stats of a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullFile {
    /// Path within the repository.
    pub filename: String,
    /// Change status (`added`, `modified`, `removed`, ...).
    pub status: String,
    /// Added lines in this file.
    #[serde(default)]
    pub additions: u64,
    /// Deleted lines in this file.
    #[serde(default)]
    pub deletions: u64,
    /// Total changed lines in this file.
    #[serde(default)]
    pub changes: u64,
}

/// A pull-request review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Review state: `APPROVED`, `CHANGES_REQUESTED`, `COMMENTED`, ...
    pub state: String,
    /// Reviewer login.
    #[serde(rename = "user", deserialize_with = "login_of", default)]
    pub author: String,
}

/// An issue, as listed or created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number.
    pub number: u64,
    /// Title line.
    pub title: String,
    /// `open` or `closed`.
    pub state: String,
    /// Author login.
    #[serde(rename = "user", deserialize_with = "login_of", default)]
    pub author: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Conversation comment count.
    #[serde(default)]
    pub comments: u64,
    /// Label names.
    #[serde(rename = "labels", deserialize_with = "names_of", default)]
    pub labels: Vec<String>,
    /// Assignee logins.
    #[serde(rename = "assignees", deserialize_with = "logins_of", default)]
    pub assignees: Vec<String>,
    /// Web URL.
    #[serde(default)]
    pub html_url: String,
}

/// Payload for creating an issue.
#[derive(Debug, Clone, Serialize)]
pub struct NewIssue {
    /// Title line.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Usernames to assign.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    /// Labels to apply.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// A commit, as returned by the commit list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Commit SHA.
    pub sha: String,
    /// The nested `commit` object: message and git authorship.
    #[serde(rename = "commit")]
    pub detail: CommitDetail,
    /// Login of the linked GitHub account, empty when none is associated.
    #[serde(rename = "author", deserialize_with = "login_of", default)]
    pub author_login: String,
}

impl Commit {
    /// Identity used for contributor counting: the account login when one
    /// is linked, otherwise the git author name.
    pub fn author_identity(&self) -> &str {
        if self.author_login.is_empty() {
            &self.detail.author_name
        } else {
            &self.author_login
        }
    }
}

/// The `commit` object nested inside a commit list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    /// Full commit message.
    pub message: String,
    /// Author name as recorded in the commit itself.
    #[serde(rename = "author", deserialize_with = "author_name_of", default)]
    pub author_name: String,
}

fn author_name_of<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Inner {
        name: String,
    }
    Ok(Option::<Inner>::deserialize(deserializer)?
        .map(|a| a.name)
        .unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn pull_request_effective_state() {
        let body = serde_json::json!({
            "number": 1,
            "title": "t",
            "state": "closed",
            "user": {"login": "octocat"},
            "created_at": "2026-08-01T00:00:00Z",
            "updated_at": "2026-08-02T00:00:00Z",
            "merged_at": "2026-08-02T00:00:00Z"
        });
        let pr: PullRequest = serde_json::from_value(body).unwrap();
        assert_eq!(pr.effective_state(), "merged");
        assert_eq!(pr.author, "octocat");

        let open = serde_json::json!({
            "number": 2,
            "title": "t",
            "state": "open",
            "created_at": "2026-08-01T00:00:00Z",
            "updated_at": "2026-08-02T00:00:00Z"
        });
        let pr: PullRequest = serde_json::from_value(open).unwrap();
        assert_eq!(pr.effective_state(), "open");
    }

    #[test]
    fn issue_labels_flatten_to_names() {
        let body = serde_json::json!({
            "number": 7,
            "title": "crash on startup",
            "state": "open",
            "user": {"login": "reporter"},
            "created_at": "2026-08-01T00:00:00Z",
            "updated_at": "2026-08-01T00:00:00Z",
            "labels": [{"name": "bug"}, {"name": "high"}],
            "assignees": [{"login": "dev"}]
        });
        let issue: Issue = serde_json::from_value(body).unwrap();
        assert_eq!(issue.labels, vec!["bug", "high"]);
        assert_eq!(issue.assignees, vec!["dev"]);
    }

    #[test]
    fn commit_detail_flattens() {
        let body = serde_json::json!({
            "sha": "abc123",
            "commit": {
                "message": "fix: resolve panic in parser",
                "author": {"name": "Jo Dev", "date": "2026-08-20T10:00:00Z"}
            },
            "author": {"login": "jodev"}
        });
        let commit: Commit = serde_json::from_value(body).unwrap();
        assert_eq!(commit.detail.message, "fix: resolve panic in parser");
        assert_eq!(commit.author_identity(), "jodev");
    }

    #[test]
    fn commit_without_linked_account_falls_back_to_git_name() {
        let body = serde_json::json!({
            "sha": "def456",
            "commit": {
                "message": "docs: typo",
                "author": {"name": "Jo Dev"}
            },
            "author": null
        });
        let commit: Commit = serde_json::from_value(body).unwrap();
        assert_eq!(commit.author_identity(), "Jo Dev");
    }
}
