use super::{input_schema, raw_input, ChatBackend, LlmReply, WireConfig};
use hubmind_core::{HubmindError, HubmindResult, Message, Role, ToolCall, ToolDescriptor};
use async_trait::async_trait;
use uuid::Uuid;

/// Google Gemini `generateContent` backend.
pub struct GoogleWire {
    config: WireConfig,
    http: reqwest::Client,
}

impl GoogleWire {
    pub fn new(config: WireConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatBackend for GoogleWire {
    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> HubmindResult<LlmReply> {
        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        );

        let contents: Vec<serde_json::Value> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        Role::User | Role::Tool => "user",
                        Role::Assistant => "model",
                        Role::System => unreachable!(),
                    },
                    "parts": [{"text": m.content}]
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {"temperature": self.config.temperature},
        });

        if let Some(sys) = system_prompt {
            body["systemInstruction"] = serde_json::json!({"parts": [{"text": sys}]});
        }

        if !tools.is_empty() {
            let declarations: Vec<serde_json::Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name,
                        "description": t.input_contract,
                        "parameters": input_schema(&t.input_contract),
                    })
                })
                .collect();
            body["tools"] = serde_json::json!([{"functionDeclarations": declarations}]);
        }

        for (key, value) in &self.config.extra {
            body[key] = value.clone();
        }

        let resp = self
            .http
            .post(&url)
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
                "Google API error {status}: {resp_body}"
            )));
        }

        parse_google_reply(&resp_body)
    }
}

/// Parses a Gemini `generateContent` response body into an [`LlmReply`].
///
/// Gemini function calls carry no call id, so one is minted locally to keep
/// the tool-result backfill contract uniform across dialects.
pub fn parse_google_reply(body: &serde_json::Value) -> HubmindResult<LlmReply> {
    let candidate = &body["candidates"][0];
    let mut text = String::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    if let Some(parts) = candidate["content"]["parts"].as_array() {
        for part in parts {
            if let Some(t) = part["text"].as_str() {
                text.push_str(t);
            }
            if let Some(call) = part.get("functionCall") {
                tool_calls.push(ToolCall {
                    id: format!("gc_{}", Uuid::new_v4().simple()),
                    name: call["name"].as_str().unwrap_or_default().to_string(),
                    input: raw_input(&call["args"]),
                });
            }
        }
    }

    if !tool_calls.is_empty() {
        Ok(LlmReply::ToolUse {
            content: if text.is_empty() { None } else { Some(text) },
            tool_calls,
        })
    } else if candidate["finishReason"].as_str() == Some("STOP") {
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
    fn parse_stop_as_done() {
        let body = serde_json::json!({
            "candidates": [{
                "finishReason": "STOP",
                "content": {"parts": [{"text": "answer"}]}
            }]
        });
        match parse_google_reply(&body).unwrap() {
            LlmReply::Done(text) => assert_eq!(text, "answer"),
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[test]
    fn parse_function_call_mints_an_id() {
        let body = serde_json::json!({
            "candidates": [{
                "finishReason": "STOP",
                "content": {"parts": [{
                    "functionCall": {"name": "get_issues", "args": {"input": "owner/repo"}}
                }]}
            }]
        });
        match parse_google_reply(&body).unwrap() {
            LlmReply::ToolUse { tool_calls, .. } => {
                assert_eq!(tool_calls[0].name, "get_issues");
                assert_eq!(tool_calls[0].input, "owner/repo");
                assert!(tool_calls[0].id.starts_with("gc_"));
            }
            other => panic!("expected ToolUse, got {other:?}"),
        }
    }
}
