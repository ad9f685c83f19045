use crate::classify::parse_issue_text;
use crate::tool::{list_field, parse_object, str_field, u64_field, Tool};
use hubmind_github::{GithubApi, Issue, NewIssue};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Open issues whose titles share the new issue's leading words.
///
/// Best effort: a failed listing never blocks creation.
async fn similar_issues(github: &dyn GithubApi, repo: &str, title: &str) -> Vec<Issue> {
    let key_words: Vec<String> = title
        .to_lowercase()
        .split_whitespace()
        .take(3)
        .map(str::to_string)
        .collect();
    if key_words.is_empty() {
        return Vec::new();
    }

    match github.list_issues(repo, "open", 100).await {
        Ok(issues) => issues
            .into_iter()
            .filter(|issue| {
                let lower = issue.title.to_lowercase();
                key_words.iter().any(|w| lower.contains(w.as_str()))
            })
            .take(5)
            .collect(),
        Err(e) => {
            warn!(repo, error = %e, "Similar-issue lookup failed, continuing");
            Vec::new()
        }
    }
}

/// Creates a classified issue from natural-language text.
pub struct CreateIssueTool {
    github: Arc<dyn GithubApi>,
}

impl CreateIssueTool {
    /// Binds the tool to a GitHub collaborator.
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for CreateIssueTool {
    fn name(&self) -> &str {
        "create_issue"
    }

    fn input_contract(&self) -> &str {
        "A JSON object: {\"repo\": \"owner/repo\", \"text\": \"issue description\", \
         \"assignees\": [\"user\"], \"labels\": [\"bug\"]}. 'repo' and 'text' are required; \
         the first line of 'text' becomes the title and the rest the body."
    }

    async fn invoke(&self, raw_input: &str) -> String {
        let Some(map) = parse_object(raw_input) else {
            return "Error: expected a JSON object like {\"repo\": \"owner/repo\", \
                    \"text\": \"issue description\"}."
                .to_string();
        };
        let Some(repo) = str_field(&map, "repo") else {
            return "Error: missing 'repo' field.".to_string();
        };
        let Some(text) = str_field(&map, "text") else {
            return "Error: missing 'text' field.".to_string();
        };
        if text.trim().is_empty() {
            return "Error: 'text' must not be empty.".to_string();
        }

        let parsed = parse_issue_text(&text);
        let labels = {
            let explicit = list_field(&map, "labels");
            if explicit.is_empty() {
                parsed.suggested_labels.clone()
            } else {
                explicit
            }
        };

        let similar = similar_issues(self.github.as_ref(), &repo, &parsed.title).await;

        let new_issue = NewIssue {
            title: parsed.title,
            body: parsed.body,
            assignees: list_field(&map, "assignees"),
            labels,
        };
        let created = match self.github.create_issue(&repo, &new_issue).await {
            Ok(issue) => issue,
            Err(e) => return format!("Error: {e}"),
        };

        let mut out = format!(
            "Created issue #{}: {}\nLabels: {}\nURL: {}\n",
            created.number,
            created.title,
            created.labels.join(", "),
            created.html_url,
        );
        if !similar.is_empty() {
            out.push_str("\nPossibly related open issues:\n");
            for issue in &similar {
                out.push_str(&format!("  #{}: {}\n", issue.number, issue.title));
            }
        }
        out
    }
}

/// Lists issues for a repository.
pub struct GetIssuesTool {
    github: Arc<dyn GithubApi>,
}

impl GetIssuesTool {
    /// Binds the tool to a GitHub collaborator.
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for GetIssuesTool {
    fn name(&self) -> &str {
        "get_issues"
    }

    fn input_contract(&self) -> &str {
        "A repository name like 'owner/repo', or a JSON object: {\"repo\": \"owner/repo\", \
         \"state\": \"open|closed|all\", \"limit\": 20}."
    }

    async fn invoke(&self, raw_input: &str) -> String {
        let (repo, state, limit) = match parse_object(raw_input) {
            Some(map) => {
                let Some(repo) = str_field(&map, "repo") else {
                    return "Error: missing 'repo' field. Expected {\"repo\": \"owner/repo\"}."
                        .to_string();
                };
                (
                    repo,
                    str_field(&map, "state").unwrap_or_else(|| "open".to_string()),
                    u64_field(&map, "limit").unwrap_or(20),
                )
            }
            None => (raw_input.trim().to_string(), "open".to_string(), 20),
        };

        let issues = match self.github.list_issues(&repo, &state, limit as u32).await {
            Ok(issues) => issues,
            Err(e) => return format!("Error: {e}"),
        };
        if issues.is_empty() {
            return format!("No {state} issues found for {repo}.");
        }

        let mut out = format!("Issues for {repo} ({state}):\n");
        for issue in issues.iter().take(limit as usize) {
            out.push_str(&format!(
                "#{}: {} [{}] by {} - {} comments",
                issue.number, issue.title, issue.state, issue.author, issue.comments
            ));
            if !issue.labels.is_empty() {
                out.push_str(&format!(" ({})", issue.labels.join(", ")));
            }
            out.push('\n');
        }
        out
    }
}
