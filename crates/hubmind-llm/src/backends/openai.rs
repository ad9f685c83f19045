use super::{input_schema, raw_input, ChatBackend, LlmReply, WireConfig};
use hubmind_core::{HubmindError, HubmindResult, Message, Role, ToolCall, ToolDescriptor};
use async_trait::async_trait;

/// OpenAI chat-completions backend.
///
/// Works with OpenAI, DeepSeek, Groq, Ollama, and any other endpoint that
/// implements the OpenAI chat completions API.
pub struct OpenAiWire {
    config: WireConfig,
    http: reqwest::Client,
}

impl OpenAiWire {
    pub fn new(config: WireConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn build_messages(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
    ) -> Vec<serde_json::Value> {
        let mut api_messages: Vec<serde_json::Value> = Vec::new();

        if let Some(sys) = system_prompt {
            api_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
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

        api_messages
    }

    fn build_tools(&self, tools: &[ToolDescriptor]) -> Vec<serde_json::Value> {
        tools
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
            .collect()
    }
}

#[async_trait]
impl ChatBackend for OpenAiWire {
    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> HubmindResult<LlmReply> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let api_messages = self.build_messages(system_prompt, messages);

        let mut body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": api_messages,
        });

        if !tools.is_empty() {
            body["tools"] = serde_json::json!(self.build_tools(tools));
        }

        for (key, value) in &self.config.extra {
            body[key] = value.clone();
        }

        let mut request = self
            .http
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let resp = request
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
                "OpenAI API error {status}: {resp_body}"
            )));
        }

        parse_openai_reply(&resp_body)
    }
}

/// Parses an OpenAI chat-completions response body into an [`LlmReply`].
pub fn parse_openai_reply(body: &serde_json::Value) -> HubmindResult<LlmReply> {
    let choice = &body["choices"][0];
    let message = &choice["message"];
    let content = message["content"].as_str().unwrap_or_default().to_string();

    if let Some(tool_calls_json) = message["tool_calls"].as_array() {
        let tool_calls: Vec<ToolCall> = tool_calls_json
            .iter()
            .filter_map(|tc| {
                let id = tc["id"].as_str()?.to_string();
                let name = tc["function"]["name"].as_str()?.to_string();
                let arguments: serde_json::Value =
                    serde_json::from_str(tc["function"]["arguments"].as_str()?).unwrap_or_default();
                Some(ToolCall {
                    id,
                    name,
                    input: raw_input(&arguments),
                })
            })
            .collect();

        Ok(LlmReply::ToolUse {
            content: if content.is_empty() {
                None
            } else {
                Some(content)
            },
            tool_calls,
        })
    } else {
        let finish_reason = choice["finish_reason"].as_str().unwrap_or("stop");
        if finish_reason == "stop" {
            Ok(LlmReply::Done(content))
        } else {
            Ok(LlmReply::Text(content))
        }
    }
}
