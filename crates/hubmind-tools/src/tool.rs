use hubmind_core::{ToolCall, ToolDescriptor, ToolResult};
use hubmind_github::GithubApi;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// A callable GitHub-data operation exposed to the agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// Human-readable description of the expected input shape, shown to the
    /// LLM so it can format calls correctly.
    fn input_contract(&self) -> &str;

    /// Executes the tool. Always returns display-ready text — failures are
    /// rendered as error strings, never propagated as errors.
    async fn invoke(&self, raw_input: &str) -> String;

    /// The descriptor advertised to the LLM.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            input_contract: self.input_contract().to_string(),
        }
    }
}

/// The fixed collection of tools bound to one GitHub-access handle.
///
/// Built per agent: instances carrying user-specific credentials are never
/// shared across agents.
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    /// Builds the full tool set against the given GitHub collaborator.
    pub fn for_github(github: Arc<dyn GithubApi>) -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(crate::TrendingTool::new(Arc::clone(&github))),
            Arc::new(crate::AnalyzeTrendingTool::new(Arc::clone(&github))),
            Arc::new(crate::ValuablePrsTool::new(Arc::clone(&github))),
            Arc::new(crate::TodayPrsTool::new(Arc::clone(&github))),
            Arc::new(crate::AnalyzePrTool::new(Arc::clone(&github))),
            Arc::new(crate::CreateIssueTool::new(Arc::clone(&github))),
            Arc::new(crate::GetIssuesTool::new(github)),
        ];
        Self { tools }
    }

    /// Builds an explicit tool set (tests and extensions).
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Descriptors for every tool, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Executes a tool call. Unknown tool names come back as an error text
    /// result so the model can correct itself on the next step.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        match self.tools.iter().find(|t| t.name() == call.name) {
            Some(tool) => {
                info!(tool = %call.name, call_id = %call.id, "Executing tool call");
                ToolResult::new(&call.id, tool.invoke(&call.input).await)
            }
            None => {
                let available: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
                ToolResult::new(
                    &call.id,
                    format!(
                        "Error: unknown tool '{}'. Available tools: {}",
                        call.name,
                        available.join(", ")
                    ),
                )
            }
        }
    }
}

/// Attempts to parse a raw tool input as a JSON object. Returns `None` for
/// anything else so the caller can apply its documented fallback.
pub(crate) fn parse_object(raw: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(raw.trim()) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        _ => None,
    }
}

pub(crate) fn str_field(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

pub(crate) fn u64_field(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<u64> {
    map.get(key).and_then(serde_json::Value::as_u64)
}

pub(crate) fn list_field(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_rejects_non_objects() {
        assert!(parse_object("{\"repo\": \"o/r\"}").is_some());
        assert!(parse_object("microsoft/vscode").is_none());
        assert!(parse_object("[1, 2]").is_none());
        assert!(parse_object("").is_none());
    }
}
