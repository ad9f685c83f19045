use crate::client::GithubApi;
use crate::types::{Commit, Issue, NewIssue, PullFile, PullRequest, Repo, Review};
use hubmind_core::{HubmindError, HubmindResult};
use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// REST implementation of [`GithubApi`] over `reqwest`.
pub struct RestGithub {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RestGithub {
    /// Creates a client against api.github.com. A `None` token means
    /// unauthenticated (rate-limited) access.
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (tests point this at a
    /// local mock server).
    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut req = self
            .http
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "hubmind");
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        req
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> HubmindResult<T> {
        debug!(path, "GitHub GET");
        let resp = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| HubmindError::Github(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> HubmindResult<T> {
        debug!(path, "GitHub POST");
        let resp = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|e| HubmindError::Github(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> HubmindResult<T> {
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| HubmindError::Github(e.to_string()))?;

        if !status.is_success() {
            return Err(HubmindError::Github(format!(
                "GitHub API error {status}: {text}"
            )));
        }

        serde_json::from_str(&text).map_err(|e| HubmindError::Github(format!("bad payload: {e}")))
    }
}

#[async_trait]
impl GithubApi for RestGithub {
    async fn get_repo(&self, full_name: &str) -> HubmindResult<Repo> {
        self.get_json(&format!("/repos/{full_name}")).await
    }

    async fn list_pulls(
        &self,
        repo: &str,
        state: &str,
        per_page: u32,
    ) -> HubmindResult<Vec<PullRequest>> {
        self.get_json(&format!(
            "/repos/{repo}/pulls?state={state}&sort=updated&direction=desc&per_page={per_page}"
        ))
        .await
    }

    async fn get_pull(&self, repo: &str, number: u64) -> HubmindResult<PullRequest> {
        self.get_json(&format!("/repos/{repo}/pulls/{number}")).await
    }

    async fn pull_files(&self, repo: &str, number: u64) -> HubmindResult<Vec<PullFile>> {
        self.get_json(&format!("/repos/{repo}/pulls/{number}/files?per_page=100"))
            .await
    }

    async fn pull_reviews(&self, repo: &str, number: u64) -> HubmindResult<Vec<Review>> {
        self.get_json(&format!("/repos/{repo}/pulls/{number}/reviews?per_page=100"))
            .await
    }

    async fn pull_comment_authors(&self, repo: &str, number: u64) -> HubmindResult<Vec<String>> {
        // PR conversation comments live on the issues endpoint.
        #[derive(serde::Deserialize)]
        struct CommentWire {
            user: Option<AuthorWire>,
        }
        #[derive(serde::Deserialize)]
        struct AuthorWire {
            login: String,
        }
        let comments: Vec<CommentWire> = self
            .get_json(&format!("/repos/{repo}/issues/{number}/comments?per_page=100"))
            .await?;
        Ok(comments
            .into_iter()
            .filter_map(|c| c.user.map(|u| u.login))
            .collect())
    }

    async fn list_issues(
        &self,
        repo: &str,
        state: &str,
        per_page: u32,
    ) -> HubmindResult<Vec<Issue>> {
        let issues: Vec<serde_json::Value> = self
            .get_json(&format!(
                "/repos/{repo}/issues?state={state}&sort=updated&direction=desc&per_page={per_page}"
            ))
            .await?;
        // The issues endpoint also returns pull requests; drop those.
        issues
            .into_iter()
            .filter(|i| i.get("pull_request").is_none())
            .map(|i| serde_json::from_value(i).map_err(|e| HubmindError::Github(e.to_string())))
            .collect()
    }

    async fn create_issue(&self, repo: &str, issue: &NewIssue) -> HubmindResult<Issue> {
        self.post_json(&format!("/repos/{repo}/issues"), issue).await
    }

    async fn list_commits(&self, repo: &str, per_page: u32) -> HubmindResult<Vec<Commit>> {
        self.get_json(&format!("/repos/{repo}/commits?per_page={per_page}"))
            .await
    }

    async fn list_commits_since(
        &self,
        repo: &str,
        since: chrono::DateTime<chrono::Utc>,
        per_page: u32,
    ) -> HubmindResult<Vec<Commit>> {
        let stamp = since.format("%Y-%m-%dT%H:%M:%SZ");
        self.get_json(&format!(
            "/repos/{repo}/commits?since={stamp}&per_page={per_page}"
        ))
        .await
    }

    async fn list_contributors(&self, repo: &str, per_page: u32) -> HubmindResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct ContributorWire {
            login: String,
        }
        let contributors: Vec<ContributorWire> = self
            .get_json(&format!("/repos/{repo}/contributors?per_page={per_page}"))
            .await?;
        Ok(contributors.into_iter().map(|c| c.login).collect())
    }

    async fn list_collaborators(&self, repo: &str) -> HubmindResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct CollaboratorWire {
            login: String,
        }
        let collaborators: Vec<CollaboratorWire> = self
            .get_json(&format!("/repos/{repo}/collaborators?per_page=100"))
            .await?;
        Ok(collaborators.into_iter().map(|c| c.login).collect())
    }

    async fn get_readme(&self, repo: &str) -> HubmindResult<String> {
        #[derive(serde::Deserialize)]
        struct ReadmeWire {
            content: String,
        }
        let readme: ReadmeWire = self.get_json(&format!("/repos/{repo}/readme")).await?;
        let raw: String = readme.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(raw)
            .map_err(|e| HubmindError::Github(format!("README decode failed: {e}")))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn top_level_files(&self, repo: &str) -> HubmindResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct EntryWire {
            name: String,
            #[serde(rename = "type")]
            kind: String,
        }
        let entries: Vec<EntryWire> = self.get_json(&format!("/repos/{repo}/contents/")).await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.kind == "file")
            .map(|e| e.name)
            .collect())
    }

    async fn search_repos(&self, query: &str, per_page: u32) -> HubmindResult<Vec<Repo>> {
        #[derive(serde::Deserialize)]
        struct SearchWire {
            items: Vec<Repo>,
        }
        let encoded: String = url_encode(query);
        let result: SearchWire = self
            .get_json(&format!(
                "/search/repositories?q={encoded}&sort=stars&order=desc&per_page={per_page}"
            ))
            .await?;
        Ok(result.items)
    }
}

/// Minimal query-string escaping for search terms.
fn url_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
