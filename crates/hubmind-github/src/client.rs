use crate::types::{Commit, Issue, NewIssue, PullFile, PullRequest, Repo, Review};
use hubmind_core::HubmindResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The GitHub data-access collaborator.
///
/// Everything the tool set and the QA agent need from GitHub, behind one
/// trait so tests can substitute a stub. All failures surface as a uniform
/// `Github` error which the tool layer converts into its own error payloads —
/// never an unrecovered fault past the tool boundary.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Repository metadata for `owner/repo`.
    async fn get_repo(&self, full_name: &str) -> HubmindResult<Repo>;

    /// Pull requests, filtered by state (`open`/`closed`/`all`), sorted by
    /// most recent update.
    async fn list_pulls(&self, repo: &str, state: &str, per_page: u32)
        -> HubmindResult<Vec<PullRequest>>;

    /// Single pull request with full engagement and diff counters.
    async fn get_pull(&self, repo: &str, number: u64) -> HubmindResult<PullRequest>;

    /// Per-file diff stats for a pull request.
    async fn pull_files(&self, repo: &str, number: u64) -> HubmindResult<Vec<PullFile>>;

    /// Reviews on a pull request.
    async fn pull_reviews(&self, repo: &str, number: u64) -> HubmindResult<Vec<Review>>;

    /// Author logins of the conversation comments on a pull request.
    async fn pull_comment_authors(&self, repo: &str, number: u64) -> HubmindResult<Vec<String>>;

    /// Issues filtered by state (`open`/`closed`/`all`), most recently
    /// updated first.
    async fn list_issues(&self, repo: &str, state: &str, per_page: u32)
        -> HubmindResult<Vec<Issue>>;

    /// Creates an issue and returns it as stored.
    async fn create_issue(&self, repo: &str, issue: &NewIssue) -> HubmindResult<Issue>;

    /// Most recent commits, newest first.
    async fn list_commits(&self, repo: &str, per_page: u32) -> HubmindResult<Vec<Commit>>;

    /// Commits authored at or after `since`, newest first.
    async fn list_commits_since(
        &self,
        repo: &str,
        since: DateTime<Utc>,
        per_page: u32,
    ) -> HubmindResult<Vec<Commit>>;

    /// Top contributor logins.
    async fn list_contributors(&self, repo: &str, per_page: u32) -> HubmindResult<Vec<String>>;

    /// Collaborator (maintainer) logins. Requires push-level token scope.
    async fn list_collaborators(&self, repo: &str) -> HubmindResult<Vec<String>>;

    /// README content, base64-decoded to text.
    async fn get_readme(&self, repo: &str) -> HubmindResult<String>;

    /// Names of top-level files (not directories).
    async fn top_level_files(&self, repo: &str) -> HubmindResult<Vec<String>>;

    /// Repository search, sorted by stars descending.
    async fn search_repos(&self, query: &str, per_page: u32) -> HubmindResult<Vec<Repo>>;
}
