use serde_json::Value;

/// Pulls the final reply text out of a runner result.
///
/// Result shapes vary by runtime, so extraction tries, in order: a
/// `messages` list (last entry with non-empty text content, scanning
/// backward), a generic `output` field, and finally a string coercion of the
/// whole value. Never fails.
pub fn extract_response(result: &Value) -> String {
    if let Some(messages) = result.get("messages").and_then(Value::as_array) {
        for message in messages.iter().rev() {
            if let Some(content) = message.get("content").and_then(Value::as_str) {
                if !content.trim().is_empty() {
                    return content.to_string();
                }
            }
        }
    }

    if let Some(output) = result.get("output") {
        return match output.as_str() {
            Some(s) => s.to_string(),
            None => output.to_string(),
        };
    }

    match result.as_str() {
        Some(s) => s.to_string(),
        None => result.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_last_nonempty_message() {
        let result = json!({
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "the answer"},
                {"role": "assistant", "content": "   "}
            ]
        });
        assert_eq!(extract_response(&result), "the answer");
    }

    #[test]
    fn falls_back_to_output_field() {
        let result = json!({"messages": [], "output": "from output"});
        assert_eq!(extract_response(&result), "from output");
    }

    #[test]
    fn coerces_anything_else() {
        assert_eq!(extract_response(&json!("bare string")), "bare string");
        assert_eq!(extract_response(&json!({"weird": true})), "{\"weird\":true}");
        assert_eq!(extract_response(&json!(null)), "null");
    }
}
