use crate::backends::anthropic::AnthropicWire;
use crate::backends::azure::AzureWire;
use crate::backends::google::GoogleWire;
use crate::backends::openai::OpenAiWire;
use crate::backends::{ChatBackend, LlmReply, WireConfig, WireDialect};
use hubmind_core::{HubmindResult, Message, ToolDescriptor};

/// An opaque, stateful handle to one configured chat backend.
///
/// Bound to exactly one provider and one resolved model at creation time;
/// neither changes for the life of the handle. Handles are owned by the agent
/// that requested them — never shared across agents, since two agents may
/// hold different user-specific credentials.
pub struct LlmHandle {
    provider: String,
    model: String,
    temperature: f32,
    backend: Box<dyn ChatBackend>,
}

impl std::fmt::Debug for LlmHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmHandle")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl LlmHandle {
    /// Builds a handle for the given wire dialect. Purely in-memory: no
    /// network call is made until the first [`LlmHandle::chat`].
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        provider: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        dialect: WireDialect,
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_version: Option<String>,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> HubmindResult<Self> {
        let model = model.into();
        let config = WireConfig {
            model: model.clone(),
            temperature,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            api_version,
            extra,
        };

        let backend: Box<dyn ChatBackend> = match dialect {
            WireDialect::OpenAi => Box::new(OpenAiWire::new(config)),
            WireDialect::Anthropic => Box::new(AnthropicWire::new(config)),
            WireDialect::Google => Box::new(GoogleWire::new(config)),
            WireDialect::AzureOpenAi => Box::new(AzureWire::new(config)),
        };

        Ok(Self {
            provider: provider.into(),
            model,
            temperature,
            backend,
        })
    }

    /// Creates a handle from a pre-built backend (for custom providers and
    /// tests).
    pub fn from_backend(
        provider: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        backend: Box<dyn ChatBackend>,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            temperature,
            backend,
        }
    }

    /// The bound provider name.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// The resolved model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The configured sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Non-streaming chat completion against the bound backend.
    pub async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> HubmindResult<LlmReply> {
        self.backend.chat(system_prompt, messages, tools).await
    }
}
