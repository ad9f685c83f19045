use crate::handle::LlmHandle;
use crate::overrides::Overrides;
use hubmind_core::{HubmindError, HubmindResult};
use std::collections::HashMap;
use tracing::info;

/// Static descriptor for a registered provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Unique provider key, matched case-insensitively.
    pub name: &'static str,
    /// Default model substituted when the caller supplies none. May be empty,
    /// in which case the adapter fails with a missing-model error unless the
    /// caller passes one via overrides.
    pub default_model: &'static str,
    /// Whether the provider needs an API key at all.
    pub requires_api_key: bool,
    /// Environment variable consulted when no explicit key is supplied.
    pub api_key_env: &'static str,
}

/// Creator function: builds a ready-to-use client handle from a model name,
/// temperature, and free-form overrides.
pub type Creator =
    Box<dyn Fn(Option<&str>, f32, &Overrides) -> HubmindResult<LlmHandle> + Send + Sync>;

/// Registry mapping provider names to creator functions.
///
/// Decouples "which provider" from "how to build a client for it": new
/// providers are added by registration at startup, never by touching the
/// dispatch path. Names are stored lower-cased; re-registration overwrites
/// silently (acceptable for test setups, avoid in production wiring).
pub struct ProviderRegistry {
    creators: HashMap<String, Creator>,
    configs: HashMap<String, ProviderConfig>,
}

impl ProviderRegistry {
    /// Creates an empty registry with no providers.
    pub fn empty() -> Self {
        Self {
            creators: HashMap::new(),
            configs: HashMap::new(),
        }
    }

    /// Creates a registry with every builtin provider registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        crate::adapters::register_builtins(&mut registry);
        registry
    }

    /// Registers a provider under a case-insensitive name.
    ///
    /// The creator's behavior is not validated here; a bad creator only fails
    /// at first invocation.
    pub fn register(&mut self, name: &str, config: ProviderConfig, creator: Creator) {
        let key = name.to_lowercase();
        info!(provider = %key, "Registered LLM provider");
        self.configs.insert(key.clone(), config);
        self.creators.insert(key, creator);
    }

    /// Every registered provider name, sorted.
    pub fn registered(&self) -> Vec<String> {
        let mut names: Vec<String> = self.creators.keys().cloned().collect();
        names.sort();
        names
    }

    /// The static config for a provider, if registered.
    pub fn config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.configs.get(&provider.to_lowercase())
    }

    /// Resolves a provider (case-insensitively) and builds a client handle.
    ///
    /// An empty or omitted `model` falls back to the provider's configured
    /// default, which may itself be empty — the adapter then fails with a
    /// missing-model error unless the caller supplied one via `overrides`.
    pub fn create(
        &self,
        provider: &str,
        model: Option<&str>,
        temperature: f32,
        overrides: &Overrides,
    ) -> HubmindResult<LlmHandle> {
        let key = provider.to_lowercase();

        let creator = self
            .creators
            .get(&key)
            .ok_or_else(|| HubmindError::UnsupportedProvider {
                requested: key.clone(),
                registered: self.registered(),
            })?;

        let model = match model.filter(|m| !m.is_empty()) {
            Some(m) => Some(m.to_string()),
            None => self
                .configs
                .get(&key)
                .map(|c| c.default_model)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        };

        creator(model.as_deref(), temperature, overrides)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::backends::WireDialect;

    fn dummy_config(name: &'static str, default_model: &'static str) -> ProviderConfig {
        ProviderConfig {
            name,
            default_model,
            requires_api_key: false,
            api_key_env: "",
        }
    }

    fn dummy_creator() -> Creator {
        Box::new(|model, temperature, _overrides| {
            LlmHandle::build(
                "dummy",
                model.unwrap_or("fallback"),
                temperature,
                WireDialect::OpenAi,
                "http://localhost:9",
                None,
                None,
                serde_json::Map::new(),
            )
        })
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = ProviderRegistry::empty();
        registry.register("dummy", dummy_config("dummy", "d-1"), dummy_creator());

        let lower = registry.create("dummy", None, 0.3, &Overrides::new());
        let mixed = registry.create("DuMmY", None, 0.3, &Overrides::new());
        assert!(lower.is_ok());
        assert!(mixed.is_ok());
        assert_eq!(
            lower.map(|h| h.model().to_string()).ok(),
            mixed.map(|h| h.model().to_string()).ok()
        );
    }

    #[test]
    fn unknown_provider_lists_registered_names() {
        let mut registry = ProviderRegistry::empty();
        registry.register("alpha", dummy_config("alpha", ""), dummy_creator());
        registry.register("beta", dummy_config("beta", ""), dummy_creator());

        let err = registry
            .create("not-a-real-provider", None, 0.3, &Overrides::new())
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("not-a-real-provider"));
        assert!(msg.contains("alpha"));
        assert!(msg.contains("beta"));
    }

    #[test]
    fn empty_model_falls_back_to_provider_default() {
        let mut registry = ProviderRegistry::empty();
        registry.register("dummy", dummy_config("dummy", "d-default"), dummy_creator());

        let handle = registry
            .create("dummy", Some(""), 0.3, &Overrides::new())
            .unwrap();
        assert_eq!(handle.model(), "d-default");
    }

    #[test]
    fn re_registration_overwrites_silently() {
        let mut registry = ProviderRegistry::empty();
        registry.register("dummy", dummy_config("dummy", "first"), dummy_creator());
        registry.register("dummy", dummy_config("dummy", "second"), dummy_creator());

        let handle = registry
            .create("dummy", None, 0.3, &Overrides::new())
            .unwrap();
        assert_eq!(handle.model(), "second");
        assert_eq!(registry.registered(), vec!["dummy".to_string()]);
    }
}
