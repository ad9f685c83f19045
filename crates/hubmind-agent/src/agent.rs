use crate::extract::extract_response;
use crate::runner::AgentRunner;
use crate::session::SessionCorrelator;
use hubmind_core::{is_connection_fault, ChatTurn, HubmindError, HubmindResult};
use hubmind_github::{GithubApi, RestGithub};
use hubmind_llm::{LlmHandle, Overrides, ProviderRegistry};
use hubmind_tools::ToolSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const SYSTEM_PROMPT: &str = "You are HubMind, an AI assistant specialized in GitHub repository \
intelligence. You can help with four things: discovering trending repositories, analyzing pull \
requests and their value, creating and listing issues, and answering questions about a \
repository. Use the available tools to fetch real data before answering; relay tool output to \
the user in clear natural language.";

/// Fixed reply when both attempts hit a connection-class fault.
const CONNECTION_APOLOGY: &str = "connection interrupted, please retry";

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// How much error detail makes it into logs and replies.
const ERROR_DETAIL_CAP: usize = 500;

/// Constructor parameters for a [`HubmindAgent`].
///
/// Filled from environment/config by the outer layers and passed in
/// explicitly; the agent itself never reads global state.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Provider name, resolved case-insensitively against the registry.
    pub provider: String,
    /// Model override; empty falls back to the provider default.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// GitHub token; absent means unauthenticated, rate-limited access.
    pub github_token: Option<String>,
    /// GitHub API base URL override (tests, GitHub Enterprise).
    pub github_base_url: Option<String>,
    /// Provider-specific overrides (api_key, base_url, ...).
    pub overrides: Overrides,
}

/// The conversational GitHub-intelligence agent.
///
/// Owns its LLM handle and tool set; instances carrying user-specific
/// credentials are constructed per request and never shared.
pub struct HubmindAgent {
    runner: AgentRunner,
}

impl HubmindAgent {
    /// Builds an agent from configuration. Construction validates provider,
    /// credential and model resolution and fails loudly on any of them —
    /// those are setup problems no conversation can recover from.
    pub fn new(config: AgentConfig) -> HubmindResult<Self> {
        let registry = ProviderRegistry::with_builtins();
        let llm = registry.create(
            &config.provider,
            config.model.as_deref(),
            config.temperature,
            &config.overrides,
        )?;

        let base_url = config
            .github_base_url
            .as_deref()
            .unwrap_or("https://api.github.com");
        let github: Arc<dyn GithubApi> =
            Arc::new(RestGithub::with_base_url(config.github_token.clone(), base_url));

        info!(
            provider = llm.provider(),
            model = llm.model(),
            authenticated = config.github_token.is_some(),
            "Agent constructed"
        );
        Ok(Self::from_parts(llm, github))
    }

    /// Assembles an agent from pre-built collaborators (tests, embedding).
    pub fn from_parts(llm: LlmHandle, github: Arc<dyn GithubApi>) -> Self {
        let tools = ToolSet::for_github(github);
        Self {
            runner: AgentRunner::new(llm, tools),
        }
    }

    /// One chat exchange. Always returns a reply string, never an error:
    /// a transient connection fault is retried once under a fresh
    /// correlator, and every other failure is logged and collapsed into a
    /// user-facing explanation.
    pub async fn chat(&self, message: &str, history: &[ChatTurn]) -> String {
        let session = SessionCorrelator::derive(message);
        let first = self
            .runner
            .run(&session, SYSTEM_PROMPT, history, message)
            .await;

        let err = match first {
            Ok(result) => return extract_response(&result),
            Err(e) => e,
        };

        if is_connection_fault(&err) {
            warn!(session = %session, error = %err, "Connection fault, retrying once");
            tokio::time::sleep(RETRY_DELAY).await;

            let retry_session = SessionCorrelator::derive_salted(message);
            match self
                .runner
                .run(&retry_session, SYSTEM_PROMPT, history, message)
                .await
            {
                Ok(result) => return extract_response(&result),
                Err(retry_err) if is_connection_fault(&retry_err) => {
                    error!(session = %retry_session, error = %retry_err, "Retry also hit a connection fault");
                    return CONNECTION_APOLOGY.to_string();
                }
                Err(retry_err) => return configuration_reply(&retry_err),
            }
        }

        configuration_reply(&err)
    }
}

fn configuration_reply(err: &HubmindError) -> String {
    let brief = truncate_detail(&err.to_string());
    error!(error = %brief, "Chat invocation failed");
    format!("error processing request: {brief}. Please check your configuration.")
}

fn truncate_detail(detail: &str) -> String {
    if detail.chars().count() <= ERROR_DETAIL_CAP {
        detail.to_string()
    } else {
        detail.chars().take(ERROR_DETAIL_CAP).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hubmind_core::{HubmindResult, Message, ToolDescriptor};
    use hubmind_github::{Commit, Issue, NewIssue, PullFile, PullRequest, Repo, Review};
    use hubmind_llm::{ChatBackend, LlmReply};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct NoGithub;

    #[async_trait]
    impl GithubApi for NoGithub {
        async fn get_repo(&self, _: &str) -> HubmindResult<Repo> {
            Err(HubmindError::Github("unused".into()))
        }
        async fn list_pulls(&self, _: &str, _: &str, _: u32) -> HubmindResult<Vec<PullRequest>> {
            Ok(Vec::new())
        }
        async fn get_pull(&self, _: &str, _: u64) -> HubmindResult<PullRequest> {
            Err(HubmindError::Github("unused".into()))
        }
        async fn pull_files(&self, _: &str, _: u64) -> HubmindResult<Vec<PullFile>> {
            Ok(Vec::new())
        }
        async fn pull_reviews(&self, _: &str, _: u64) -> HubmindResult<Vec<Review>> {
            Ok(Vec::new())
        }
        async fn pull_comment_authors(&self, _: &str, _: u64) -> HubmindResult<Vec<String>> {
            Ok(Vec::new())
        }
        async fn list_issues(&self, _: &str, _: &str, _: u32) -> HubmindResult<Vec<Issue>> {
            Ok(Vec::new())
        }
        async fn create_issue(&self, _: &str, _: &NewIssue) -> HubmindResult<Issue> {
            Err(HubmindError::Github("unused".into()))
        }
        async fn list_commits(&self, _: &str, _: u32) -> HubmindResult<Vec<Commit>> {
            Ok(Vec::new())
        }
        async fn list_commits_since(
            &self,
            _: &str,
            _: chrono::DateTime<chrono::Utc>,
            _: u32,
        ) -> HubmindResult<Vec<Commit>> {
            Ok(Vec::new())
        }
        async fn list_contributors(&self, _: &str, _: u32) -> HubmindResult<Vec<String>> {
            Ok(Vec::new())
        }
        async fn list_collaborators(&self, _: &str) -> HubmindResult<Vec<String>> {
            Ok(Vec::new())
        }
        async fn get_readme(&self, _: &str) -> HubmindResult<String> {
            Ok(String::new())
        }
        async fn top_level_files(&self, _: &str) -> HubmindResult<Vec<String>> {
            Ok(Vec::new())
        }
        async fn search_repos(&self, _: &str, _: u32) -> HubmindResult<Vec<Repo>> {
            Ok(Vec::new())
        }
    }

    /// Scripted backend: pops the next canned outcome per call.
    struct Scripted {
        calls: AtomicU32,
        script: Vec<Result<LlmReply, &'static str>>,
    }

    #[async_trait]
    impl ChatBackend for Scripted {
        async fn chat(
            &self,
            _system_prompt: Option<&str>,
            _messages: &[Message],
            _tools: &[ToolDescriptor],
        ) -> HubmindResult<LlmReply> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            match self.script.get(i.min(self.script.len() - 1)).unwrap() {
                Ok(reply) => Ok(clone_reply(reply)),
                Err(msg) => Err(HubmindError::Http((*msg).to_string())),
            }
        }
    }

    fn clone_reply(reply: &LlmReply) -> LlmReply {
        match reply {
            LlmReply::Done(t) => LlmReply::Done(t.clone()),
            LlmReply::Text(t) => LlmReply::Text(t.clone()),
            LlmReply::ToolUse {
                content,
                tool_calls,
            } => LlmReply::ToolUse {
                content: content.clone(),
                tool_calls: tool_calls.clone(),
            },
        }
    }

    fn agent(script: Vec<Result<LlmReply, &'static str>>) -> HubmindAgent {
        let backend = Scripted {
            calls: AtomicU32::new(0),
            script,
        };
        let llm = LlmHandle::from_backend("scripted", "test-model", 0.7, Box::new(backend));
        HubmindAgent::from_parts(llm, Arc::new(NoGithub))
    }

    #[tokio::test]
    async fn chat_returns_final_assistant_text() {
        let agent = agent(vec![Ok(LlmReply::Done("Rust is trending.".to_string()))]);
        let reply = agent.chat("what's hot?", &[]).await;
        assert_eq!(reply, "Rust is trending.");
    }

    #[tokio::test]
    async fn chat_retries_connection_fault_then_succeeds() {
        let agent = agent(vec![
            Err("connection reset by peer"),
            Ok(LlmReply::Done("second time lucky".to_string())),
        ]);
        let reply = agent.chat("hello", &[]).await;
        assert_eq!(reply, "second time lucky");
    }

    #[tokio::test]
    async fn chat_apologizes_after_two_connection_faults() {
        let agent = agent(vec![
            Err("connection refused"),
            Err("error sending request: timed out"),
        ]);
        let reply = agent.chat("hello", &[]).await;
        assert_eq!(reply, "connection interrupted, please retry");
    }

    #[tokio::test]
    async fn chat_collapses_other_errors_into_configuration_reply() {
        let agent = agent(vec![Err("401 Unauthorized: bad api key")]);
        let reply = agent.chat("hello", &[]).await;
        assert!(reply.starts_with("error processing request: "));
        assert!(reply.ends_with("Please check your configuration."));
        assert!(reply.contains("bad api key"));
    }

    #[tokio::test]
    async fn chat_returns_partial_transcript_when_step_cap_hits() {
        // The model asks for a tool on every step and never finishes. The
        // capped run still surfaces the last tool output instead of an
        // error string.
        let looping = LlmReply::ToolUse {
            content: None,
            tool_calls: vec![hubmind_core::ToolCall {
                id: "c1".to_string(),
                name: "get_issues".to_string(),
                input: "octo/repo".to_string(),
            }],
        };
        let agent = agent(vec![Ok(looping)]);
        let reply = agent.chat("loop forever", &[]).await;
        assert!(reply.contains("No open issues found for octo/repo."));
        assert!(!reply.starts_with("error processing request"));
    }

    #[tokio::test]
    async fn chat_stops_on_text_reply_without_tool_calls() {
        // A bare text reply ends the loop; the backend must not be asked
        // again.
        let agent = agent(vec![
            Ok(LlmReply::Text("partial answer".to_string())),
            Err("backend called after a terminal reply"),
        ]);
        let reply = agent.chat("hello", &[]).await;
        assert_eq!(reply, "partial answer");
    }

    #[test]
    fn detail_truncation_caps_at_500_chars() {
        let long = "x".repeat(900);
        assert_eq!(truncate_detail(&long).chars().count(), 500);
        assert_eq!(truncate_detail("short"), "short");
    }
}
