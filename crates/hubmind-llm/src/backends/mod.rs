//! Wire-dialect backends: translation from the uniform chat interface into
//! each vendor's request shape.

pub mod anthropic;
pub mod azure;
pub mod google;
pub mod openai;

use hubmind_core::{HubmindResult, Message, ToolCall, ToolDescriptor};
use async_trait::async_trait;

/// Response from the LLM — final text, intermediate text, or tool requests.
#[derive(Debug)]
pub enum LlmReply {
    /// Intermediate assistant text; the loop continues.
    Text(String),
    /// The model requests one or more tool invocations.
    ToolUse {
        /// Any assistant text emitted alongside the tool calls.
        content: Option<String>,
        /// Tool calls in the order the model emitted them.
        tool_calls: Vec<ToolCall>,
    },
    /// Final assistant text; the loop terminates.
    Done(String),
}

/// Which request shape a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireDialect {
    /// OpenAI chat-completions shape (OpenAI, DeepSeek, Groq, Ollama, and
    /// any OpenAI-compatible endpoint).
    OpenAi,
    /// Anthropic messages API.
    Anthropic,
    /// Google Gemini `generateContent` API.
    Google,
    /// Azure OpenAI deployments API.
    AzureOpenAi,
}

/// Transport configuration shared by all wire backends.
#[derive(Debug, Clone)]
pub struct WireConfig {
    /// Resolved model (or Azure deployment) name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Endpoint base URL, without a trailing slash.
    pub base_url: String,
    /// Credential, when the provider requires one.
    pub api_key: Option<String>,
    /// API version string (Azure only).
    pub api_version: Option<String>,
    /// Unconsumed override keys, merged verbatim into the request body where
    /// the dialect supports it.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Trait implemented by each provider wire dialect.
///
/// Backends perform no I/O at construction; the first network access happens
/// on the first `chat` call.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Non-streaming chat completion with optional tool definitions.
    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> HubmindResult<LlmReply>;
}

/// JSON schema for a tool that takes one free-form string argument. The
/// argument description carries the tool's input contract so the model knows
/// whether to send a JSON object or a bare value.
pub(crate) fn input_schema(contract: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "input": {
                "type": "string",
                "description": contract,
            }
        },
        "required": ["input"]
    })
}

/// Extracts the raw tool input string from a parsed arguments value.
///
/// Falls back to the serialized arguments when the model did not use the
/// single `input` parameter — the receiving tool handles either shape.
pub(crate) fn raw_input(arguments: &serde_json::Value) -> String {
    arguments
        .get("input")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| arguments.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_input_prefers_the_input_parameter() {
        let args = serde_json::json!({"input": "microsoft/vscode"});
        assert_eq!(raw_input(&args), "microsoft/vscode");
    }

    #[test]
    fn raw_input_falls_back_to_serialized_arguments() {
        let args = serde_json::json!({"repo": "microsoft/vscode", "pr_number": 5});
        let raw = raw_input(&args);
        assert!(raw.contains("pr_number"));
    }
}
