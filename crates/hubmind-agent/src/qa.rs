use hubmind_core::Message;
use hubmind_github::GithubApi;
use hubmind_llm::{LlmHandle, LlmReply};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

const QA_SYSTEM_PROMPT: &str = "You are HubMind, an AI assistant answering questions about a \
GitHub repository. Base your answer on the repository context provided in the user message. If \
the context does not cover the question, say so instead of guessing.";

/// Context lines whose labels count as citable sources.
const SOURCE_PREFIXES: &[&str] = &["Repository:", "README", "Recent commits"];
const MAX_SOURCES: usize = 5;

const README_EXCERPT_CHARS: usize = 2000;
const COMMIT_MESSAGE_CHARS: usize = 100;

/// A structured repository-question answer. Always returned in full shape;
/// failures surface as an error-prefixed `answer`, never as an error value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaAnswer {
    /// The question as asked.
    pub question: String,
    /// The model's reply, or an `Error: ...` string.
    pub answer: String,
    /// The repository the question was about.
    pub repo: String,
    /// Labels of the context sections that informed the answer.
    pub sources: Vec<String>,
}

/// Repository question answering without a tool loop: one best-effort
/// context-gathering pass, then a single LLM call.
pub struct QaAgent {
    llm: LlmHandle,
    github: Arc<dyn GithubApi>,
}

impl QaAgent {
    /// Binds the QA agent to an LLM handle and a GitHub collaborator.
    pub fn new(llm: LlmHandle, github: Arc<dyn GithubApi>) -> Self {
        Self { llm, github }
    }

    /// Answers a question about `repo`. Never fails: context pieces that
    /// cannot be fetched are omitted, and an LLM failure comes back as an
    /// error-prefixed answer inside the structured shape.
    pub async fn answer(&self, repo: &str, question: &str) -> QaAnswer {
        let context = self.gather_context(repo).await;
        let sources = extract_sources(&context);

        let prompt = format!("Repository context:\n{context}\n\nQuestion: {question}");
        let answer = match self
            .llm
            .chat(Some(QA_SYSTEM_PROMPT), &[Message::user(prompt)], &[])
            .await
        {
            Ok(LlmReply::Done(text) | LlmReply::Text(text)) => text,
            Ok(LlmReply::ToolUse { content, .. }) => content.unwrap_or_default(),
            Err(e) => format!("Error: {e}"),
        };

        QaAnswer {
            question: question.to_string(),
            answer,
            repo: repo.to_string(),
            sources,
        }
    }

    /// Assembles the context block. Every step is independently best-effort:
    /// a failed fetch drops its section and the rest carry on.
    async fn gather_context(&self, repo: &str) -> String {
        let mut sections: Vec<String> = Vec::new();

        match self.github.get_repo(repo).await {
            Ok(meta) => {
                let mut head = format!("Repository: {}", meta.full_name);
                if let Some(description) = &meta.description {
                    head.push_str(&format!("\nDescription: {description}"));
                }
                if let Some(language) = &meta.language {
                    head.push_str(&format!("\nLanguage: {language}"));
                }
                head.push_str(&format!(
                    "\nStars: {}, Forks: {}, Open issues: {}",
                    meta.stargazers_count, meta.forks_count, meta.open_issues_count
                ));
                if !meta.topics.is_empty() {
                    head.push_str(&format!("\nTopics: {}", meta.topics.join(", ")));
                }
                sections.push(head);
            }
            Err(e) => warn!(repo, error = %e, "Skipping repository metadata"),
        }

        match self.github.get_readme(repo).await {
            Ok(readme) if !readme.is_empty() => {
                let excerpt: String = readme.chars().take(README_EXCERPT_CHARS).collect();
                sections.push(format!("README excerpt:\n{excerpt}"));
            }
            Ok(_) => {}
            Err(e) => warn!(repo, error = %e, "Skipping README"),
        }

        match self.github.list_commits(repo, 5).await {
            Ok(commits) if !commits.is_empty() => {
                let lines: Vec<String> = commits
                    .iter()
                    .map(|c| {
                        let message: String = c
                            .detail
                            .message
                            .lines()
                            .next()
                            .unwrap_or("")
                            .chars()
                            .take(COMMIT_MESSAGE_CHARS)
                            .collect();
                        format!("- {message}")
                    })
                    .collect();
                sections.push(format!("Recent commits:\n{}", lines.join("\n")));
            }
            Ok(_) => {}
            Err(e) => warn!(repo, error = %e, "Skipping commit list"),
        }

        match self.github.list_contributors(repo, 10).await {
            Ok(contributors) if !contributors.is_empty() => {
                sections.push(format!("Top contributors: {}", contributors.join(", ")));
            }
            Ok(_) => {}
            Err(e) => warn!(repo, error = %e, "Skipping contributors"),
        }

        match self.github.top_level_files(repo).await {
            Ok(files) if !files.is_empty() => {
                let shown: Vec<&str> = files.iter().take(20).map(String::as_str).collect();
                sections.push(format!("Top-level files: {}", shown.join(", ")));
            }
            Ok(_) => {}
            Err(e) => warn!(repo, error = %e, "Skipping file listing"),
        }

        sections.join("\n\n")
    }
}

fn extract_sources(context: &str) -> Vec<String> {
    context
        .lines()
        .filter(|line| SOURCE_PREFIXES.iter().any(|p| line.starts_with(p)))
        .take(MAX_SOURCES)
        .map(str::to_string)
        .collect()
}
