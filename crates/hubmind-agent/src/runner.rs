use crate::session::SessionCorrelator;
use hubmind_core::{ChatTurn, HubmindResult, Message, Role};
use hubmind_llm::{LlmHandle, LlmReply};
use hubmind_tools::ToolSet;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Hard cap on LLM steps per invocation, preventing infinite tool-call
/// cycles.
const MAX_STEPS: u32 = 10;

/// Drives the tool-call loop: prompt → LLM → tool call → backfill → repeat.
pub struct AgentRunner {
    llm: LlmHandle,
    tools: ToolSet,
    max_steps: u32,
}

impl AgentRunner {
    /// Builds a runner over one LLM handle and tool set.
    pub fn new(llm: LlmHandle, tools: ToolSet) -> Self {
        Self {
            llm,
            tools,
            max_steps: MAX_STEPS,
        }
    }

    /// The bound LLM handle.
    pub fn llm(&self) -> &LlmHandle {
        &self.llm
    }

    /// Runs the loop to completion and returns the full transcript as a
    /// `{"messages": [{role, content}, ...]}` value.
    pub async fn run(
        &self,
        session: &SessionCorrelator,
        system_prompt: &str,
        history: &[ChatTurn],
        user_input: &str,
    ) -> HubmindResult<Value> {
        let mut context: Vec<Message> = history.iter().map(Message::from).collect();
        context.push(Message::user(user_input));

        let descriptors = self.tools.descriptors();
        info!(session = %session, provider = self.llm.provider(), "Starting agentic loop");

        for step in 0..self.max_steps {
            let reply = self
                .llm
                .chat(Some(system_prompt), &context, &descriptors)
                .await?;

            match reply {
                // Any reply without a tool request ends the loop.
                LlmReply::Done(text) | LlmReply::Text(text) => {
                    context.push(Message::assistant(&text));
                    info!(session = %session, steps = step + 1, "Agentic loop completed");
                    return Ok(transcript(&context));
                }

                LlmReply::ToolUse {
                    content,
                    tool_calls,
                } => {
                    if let Some(text) = content {
                        context.push(Message::assistant(text));
                    }

                    // Sequential on purpose: one result typically informs
                    // the model's next call choice.
                    for call in tool_calls {
                        let result = self.tools.execute(&call).await;
                        let backfill = json!({
                            "type": "tool_result",
                            "tool_use_id": result.call_id,
                            "content": result.content,
                        });
                        context.push(Message::new(Role::User, backfill.to_string()));
                    }
                }
            }
        }

        // Cap exhausted mid-conversation: hand back whatever the model said
        // so far instead of discarding it. Response extraction copes with a
        // transcript that ends on a tool result.
        warn!(session = %session, max_steps = self.max_steps, "Agentic loop reached step cap");
        Ok(transcript(&context))
    }
}

fn transcript(context: &[Message]) -> Value {
    let messages: Vec<Value> = context
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();
    json!({ "messages": messages })
}
