use super::openai::parse_openai_reply;
use super::{input_schema, ChatBackend, LlmReply, WireConfig};
use hubmind_core::{HubmindError, HubmindResult, Message, Role, ToolDescriptor};
use async_trait::async_trait;

/// Azure OpenAI backend.
///
/// Same body shape as the OpenAI dialect, but the model is addressed as a
/// deployment in the URL path, the credential travels in an `api-key` header,
/// and an `api-version` query parameter is mandatory.
pub struct AzureWire {
    config: WireConfig,
    http: reqwest::Client,
}

impl AzureWire {
    pub fn new(config: WireConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatBackend for AzureWire {
    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> HubmindResult<LlmReply> {
        let api_version = self.config.api_version.as_deref().unwrap_or_default();
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.base_url, self.config.model, api_version
        );

        let mut api_messages: Vec<serde_json::Value> = Vec::new();
        if let Some(sys) = system_prompt {
            api_messages.push(serde_json::json!({"role": "system", "content": sys}));
        }
        for m in messages {
            if m.role == Role::System {
                continue;
            }
            api_messages.push(serde_json::json!({
                "role": match m.role {
                    Role::User | Role::Tool => "user",
                    Role::Assistant => "assistant",
                    Role::System => unreachable!(),
                },
                "content": m.content
            }));
        }

        let mut body = serde_json::json!({
            "temperature": self.config.temperature,
            "messages": api_messages,
        });

        if !tools.is_empty() {
            let api_tools: Vec<serde_json::Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.input_contract,
                            "parameters": input_schema(&t.input_contract),
                        }
                    })
                })
                .collect();
            body["tools"] = serde_json::json!(api_tools);
        }

        for (key, value) in &self.config.extra {
            body[key] = value.clone();
        }

        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let resp = self
            .http
            .post(&url)
            .header("api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| HubmindError::Http(e.to_string()))?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| HubmindError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(HubmindError::Http(format!(
                "Azure OpenAI API error {status}: {resp_body}"
            )));
        }

        parse_openai_reply(&resp_body)
    }
}
