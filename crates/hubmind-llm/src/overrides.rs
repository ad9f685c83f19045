use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form, provider-specific parameter overrides.
///
/// Well-known keys (`api_key`, `base_url`, `model`, `model_name`, `endpoint`,
/// `api_version`) are consumed by the adapter that builds the client handle;
/// everything else passes through verbatim into the provider request body via
/// [`Overrides::remaining`].
#[derive(Debug, Clone, Default)]
pub struct Overrides(BTreeMap<String, Value>);

impl Overrides {
    /// Creates an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key, replacing any previous value. Builder-style.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the string value for `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns true when no overrides are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All entries except the listed consumed keys, for verbatim passthrough
    /// into the provider request body.
    pub fn remaining(&self, consumed: &[&str]) -> serde_json::Map<String, Value> {
        self.0
            .iter()
            .filter(|(k, _)| !consumed.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl From<serde_json::Map<String, Value>> for Overrides {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_strips_consumed_keys() {
        let overrides = Overrides::new()
            .set("api_key", "sk-test")
            .set("base_url", "https://api.example.com/")
            .set("top_p", 0.9);

        let rest = overrides.remaining(&["api_key", "base_url"]);
        assert_eq!(rest.len(), 1);
        assert!(rest.contains_key("top_p"));
    }

    #[test]
    fn get_str_ignores_non_strings() {
        let overrides = Overrides::new().set("limit", 10).set("api_key", "k");
        assert_eq!(overrides.get_str("api_key"), Some("k"));
        assert_eq!(overrides.get_str("limit"), None);
        assert_eq!(overrides.get_str("missing"), None);
    }
}
