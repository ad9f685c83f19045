//! Core types and error definitions for HubMind.
//!
//! This crate provides the foundational types shared across all HubMind
//! crates: the unified error enum, conversation message representations,
//! and the tool call abstractions used between the LLM layer and the tools.
//!
//! # Main types
//!
//! - [`HubmindError`] — Unified error enum for all HubMind subsystems.
//! - [`HubmindResult`] — Convenience alias for `Result<T, HubmindError>`.
//! - [`Role`] — Message role (user, assistant, system, tool).
//! - [`Message`] — A single message within one chat exchange.
//! - [`ChatTurn`] — A caller-visible {role, content} pair of chat history.
//! - [`ToolCall`] — An LLM-initiated tool invocation request.
//! - [`ToolResult`] — The result returned after executing a tool call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Error types ---

/// Top-level error type for HubMind.
///
/// Provider/credential/model variants are configuration-class errors: they
/// propagate up to whatever boundary constructs an agent. Everything else is
/// absorbed into in-band values before leaving the tool or chat boundary.
#[derive(Debug, thiserror::Error)]
pub enum HubmindError {
    /// Requested LLM provider is not in the registry.
    #[error("Unsupported provider: {requested}. Registered providers: {}. Use provider 'openai_compatible' with base_url, api_key and model for custom APIs.", registered.join(", "))]
    UnsupportedProvider {
        /// The provider name the caller asked for.
        requested: String,
        /// Every provider name currently registered, sorted.
        registered: Vec<String>,
    },

    /// A required API key is absent for a provider that needs one.
    #[error("{provider} requires an API key: pass api_key or set {env_var}")]
    MissingCredential {
        /// Provider that rejected the configuration.
        provider: String,
        /// Environment variable consulted as the fallback.
        env_var: String,
    },

    /// No model name could be resolved for a provider without a default.
    #[error("no model name resolvable for provider {provider}: pass model or model_name")]
    MissingModel {
        /// Provider that has no default model.
        provider: String,
    },

    /// An error from an outbound HTTP request (LLM API call).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A failure from the GitHub data-access collaborator.
    #[error("GitHub error: {0}")]
    Github(String),

    /// An error originating from the agent execution loop.
    #[error("Agent error: {0}")]
    Agent(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`HubmindError`].
pub type HubmindResult<T> = Result<T, HubmindError>;

/// Determines whether an error is a transient connection-class fault.
///
/// These are the network/pipe-level failures (refused or reset connections,
/// broken pipes, timeouts, DNS failures) that the chat boundary retries once
/// before giving up with a fixed apology string. Anything else — API errors
/// with a status code, bad configuration, malformed payloads — is not
/// considered transient.
pub fn is_connection_fault(err: &HubmindError) -> bool {
    let msg = match err {
        HubmindError::Http(m) | HubmindError::Agent(m) => m.to_lowercase(),
        HubmindError::Io(e) => e.to_string().to_lowercase(),
        _ => return false,
    };

    msg.contains("connection refused")
        || msg.contains("connection reset")
        || msg.contains("connection closed")
        || msg.contains("broken pipe")
        || msg.contains("timed out")
        || msg.contains("timeout")
        || msg.contains("dns error")
        || msg.contains("error sending request")
}

// --- Message types ---

/// The role of the participant that authored a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human end-user.
    User,
    /// The AI assistant.
    Assistant,
    /// A system-level instruction or prompt.
    System,
    /// Output produced by a tool invocation.
    Tool,
}

/// A caller-visible turn of chat history: `{role, content}`.
///
/// History is append-only from the caller's perspective; the agent never
/// mutates turns it did not append itself in the current call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Either `user` or `assistant`.
    pub role: Role,
    /// The textual content of the turn.
    pub content: String,
}

impl ChatTurn {
    /// Creates a user-role turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant-role turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A single message within one chat exchange's working context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for this message.
    pub id: Uuid,
    /// The role of the message author.
    pub role: Role,
    /// The textual content of the message.
    pub content: String,
    /// UTC timestamp of when the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a new message with [`Role::User`].
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new message with [`Role::Assistant`].
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl From<&ChatTurn> for Message {
    fn from(turn: &ChatTurn) -> Self {
        Self::new(turn.role, turn.content.clone())
    }
}

// --- Tool types ---

/// Metadata describing a tool's interface, shown to the LLM so it can
/// format calls correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description of the expected input shape — either a
    /// JSON object layout or a bare string, with an example.
    pub input_contract: String,
}

/// A request from the LLM to invoke a specific tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier assigned by the LLM for this tool call.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// The raw input string the model supplied for the tool.
    pub input: String,
}

/// The result returned after executing a [`ToolCall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The ID of the [`ToolCall`] this result corresponds to.
    pub call_id: String,
    /// The display-ready text produced by the tool.
    pub content: String,
}

impl ToolResult {
    /// Creates a tool result for the given call.
    pub fn new(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_provider_message_lists_registered_names() {
        let err = HubmindError::UnsupportedProvider {
            requested: "not-a-real-provider".into(),
            registered: vec!["anthropic".into(), "openai".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("not-a-real-provider"));
        assert!(msg.contains("anthropic"));
        assert!(msg.contains("openai"));
    }

    #[test]
    fn connection_fault_classification() {
        assert!(is_connection_fault(&HubmindError::Http(
            "error sending request: connection refused".into()
        )));
        assert!(is_connection_fault(&HubmindError::Http(
            "operation timed out".into()
        )));
        assert!(is_connection_fault(&HubmindError::Http("broken pipe".into())));

        assert!(!is_connection_fault(&HubmindError::Http(
            "OpenAI API error 400: bad request".into()
        )));
        assert!(!is_connection_fault(&HubmindError::MissingModel {
            provider: "openai_compatible".into()
        }));
    }
}
