use super::{input_schema, raw_input, ChatBackend, LlmReply, WireConfig};
use hubmind_core::{HubmindError, HubmindResult, Message, Role, ToolCall, ToolDescriptor};
use async_trait::async_trait;
use serde::Serialize;

/// Anthropic messages API backend.
pub struct AnthropicWire {
    config: WireConfig,
    http: reqwest::Client,
}

impl AnthropicWire {
    pub fn new(config: WireConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct AnthropicTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[async_trait]
impl ChatBackend for AnthropicWire {
    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> HubmindResult<LlmReply> {
        let url = format!("{}/v1/messages", self.config.base_url);

        let api_messages: Vec<AnthropicMessage> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| AnthropicMessage {
                role: match m.role {
                    Role::User | Role::Tool => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                    Role::System => unreachable!(),
                },
                content: m.content.clone(),
            })
            .collect();

        let api_tools: Vec<AnthropicTool> = tools
            .iter()
            .map(|t| AnthropicTool {
                name: t.name.clone(),
                description: t.input_contract.clone(),
                input_schema: input_schema(&t.input_contract),
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": 4096,
            "messages": api_messages,
        });

        if let Some(sys) = system_prompt {
            body["system"] = serde_json::json!(sys);
        }

        if !api_tools.is_empty() {
            body["tools"] = serde_json::to_value(&api_tools)
                .map_err(|e| HubmindError::Agent(e.to_string()))?;
        }

        for (key, value) in &self.config.extra {
            body[key] = value.clone();
        }

        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
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
                "Anthropic API error {status}: {resp_body}"
            )));
        }

        parse_anthropic_reply(&resp_body)
    }
}

/// Parses an Anthropic messages response body into an [`LlmReply`].
pub fn parse_anthropic_reply(body: &serde_json::Value) -> HubmindResult<LlmReply> {
    let mut text = String::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    if let Some(blocks) = body["content"].as_array() {
        for block in blocks {
            match block["type"].as_str() {
                Some("text") => {
                    text.push_str(block["text"].as_str().unwrap_or_default());
                }
                Some("tool_use") => {
                    tool_calls.push(ToolCall {
                        id: block["id"].as_str().unwrap_or_default().to_string(),
                        name: block["name"].as_str().unwrap_or_default().to_string(),
                        input: raw_input(&block["input"]),
                    });
                }
                _ => {}
            }
        }
    }

    if !tool_calls.is_empty() {
        Ok(LlmReply::ToolUse {
            content: if text.is_empty() { None } else { Some(text) },
            tool_calls,
        })
    } else if body["stop_reason"].as_str() == Some("end_turn") {
        Ok(LlmReply::Done(text))
    } else {
        Ok(LlmReply::Text(text))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_end_turn_as_done() {
        let body = serde_json::json!({
            "stop_reason": "end_turn",
            "content": [{"type": "text", "text": "done here"}]
        });
        match parse_anthropic_reply(&body).unwrap() {
            LlmReply::Done(text) => assert_eq!(text, "done here"),
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[test]
    fn parse_tool_use_block() {
        let body = serde_json::json!({
            "stop_reason": "tool_use",
            "content": [
                {"type": "text", "text": "let me check"},
                {"type": "tool_use", "id": "tu_1", "name": "get_trending_repos",
                 "input": {"input": "{\"language\": \"rust\"}"}}
            ]
        });
        match parse_anthropic_reply(&body).unwrap() {
            LlmReply::ToolUse { content, tool_calls } => {
                assert_eq!(content.as_deref(), Some("let me check"));
                assert_eq!(tool_calls[0].name, "get_trending_repos");
                assert!(tool_calls[0].input.contains("rust"));
            }
            other => panic!("expected ToolUse, got {other:?}"),
        }
    }
}
