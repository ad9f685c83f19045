//! Builtin provider adapters.
//!
//! Each adapter is a pure creator function `(model, temperature, &Overrides)
//! -> HubmindResult<LlmHandle>`: it resolves the credential (explicit
//! override first, provider env var second), the endpoint where one applies,
//! and the final model name, then constructs an in-memory handle. Reaching
//! into the environment here is the documented last-resort fallback — every
//! other layer receives configuration explicitly.

use crate::backends::WireDialect;
use crate::handle::LlmHandle;
use crate::overrides::Overrides;
use crate::provider::{ProviderConfig, ProviderRegistry};
use hubmind_core::{HubmindError, HubmindResult};

/// Override keys consumed by adapters; everything else passes through
/// verbatim as transport-level parameters.
const CONSUMED_KEYS: &[&str] = &[
    "api_key",
    "base_url",
    "model",
    "model_name",
    "endpoint",
    "api_version",
];

/// Registers every builtin provider on the given registry.
pub fn register_builtins(registry: &mut ProviderRegistry) {
    registry.register(
        "deepseek",
        ProviderConfig {
            name: "deepseek",
            default_model: "deepseek-chat",
            requires_api_key: true,
            api_key_env: "DEEPSEEK_API_KEY",
        },
        Box::new(create_deepseek),
    );
    registry.register(
        "openai",
        ProviderConfig {
            name: "openai",
            default_model: "gpt-4-turbo-preview",
            requires_api_key: true,
            api_key_env: "OPENAI_API_KEY",
        },
        Box::new(create_openai),
    );
    registry.register(
        "anthropic",
        ProviderConfig {
            name: "anthropic",
            default_model: "claude-3-opus-20240229",
            requires_api_key: true,
            api_key_env: "ANTHROPIC_API_KEY",
        },
        Box::new(create_anthropic),
    );
    registry.register(
        "google",
        ProviderConfig {
            name: "google",
            default_model: "gemini-pro",
            requires_api_key: true,
            api_key_env: "GOOGLE_API_KEY",
        },
        Box::new(create_google),
    );
    registry.register(
        "azure",
        ProviderConfig {
            name: "azure",
            default_model: "gpt-4",
            requires_api_key: true,
            api_key_env: "AZURE_OPENAI_API_KEY",
        },
        Box::new(create_azure),
    );
    registry.register(
        "ollama",
        ProviderConfig {
            name: "ollama",
            default_model: "llama2",
            requires_api_key: false,
            api_key_env: "",
        },
        Box::new(create_ollama),
    );
    registry.register(
        "groq",
        ProviderConfig {
            name: "groq",
            default_model: "mixtral-8x7b-32768",
            requires_api_key: true,
            api_key_env: "GROQ_API_KEY",
        },
        Box::new(create_groq),
    );
    registry.register(
        "openai_compatible",
        ProviderConfig {
            name: "openai_compatible",
            default_model: "",
            requires_api_key: true,
            api_key_env: "OPENAI_COMPATIBLE_API_KEY",
        },
        Box::new(create_openai_compatible),
    );
}

/// Explicit `api_key` override, falling back to the provider env var.
fn resolve_key(overrides: &Overrides, env_var: &str, provider: &str) -> HubmindResult<String> {
    if let Some(key) = overrides.get_str("api_key").filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    match std::env::var(env_var) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(HubmindError::MissingCredential {
            provider: provider.to_string(),
            env_var: env_var.to_string(),
        }),
    }
}

/// Explicit `base_url` override, falling back to an env var, then a canonical
/// vendor default.
fn resolve_base_url(overrides: &Overrides, env_var: &str, default: &str) -> String {
    overrides
        .get_str("base_url")
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|u| !u.is_empty()))
        .unwrap_or_else(|| default.to_string())
}

/// Model from the registry-resolved argument, falling back to `model` /
/// `model_name` overrides.
fn resolve_model(model: Option<&str>, overrides: &Overrides, provider: &str) -> HubmindResult<String> {
    model
        .map(str::to_string)
        .or_else(|| overrides.get_str("model").map(str::to_string))
        .or_else(|| overrides.get_str("model_name").map(str::to_string))
        .filter(|m| !m.is_empty())
        .ok_or_else(|| HubmindError::MissingModel {
            provider: provider.to_string(),
        })
}

fn create_deepseek(model: Option<&str>, temperature: f32, overrides: &Overrides) -> HubmindResult<LlmHandle> {
    let api_key = resolve_key(overrides, "DEEPSEEK_API_KEY", "deepseek")?;
    let base_url = resolve_base_url(overrides, "DEEPSEEK_BASE_URL", "https://api.deepseek.com");
    LlmHandle::build(
        "deepseek",
        resolve_model(model, overrides, "deepseek")?,
        temperature,
        WireDialect::OpenAi,
        base_url,
        Some(api_key),
        None,
        overrides.remaining(CONSUMED_KEYS),
    )
}

fn create_openai(model: Option<&str>, temperature: f32, overrides: &Overrides) -> HubmindResult<LlmHandle> {
    let api_key = resolve_key(overrides, "OPENAI_API_KEY", "openai")?;
    let base_url = resolve_base_url(overrides, "OPENAI_BASE_URL", "https://api.openai.com");
    LlmHandle::build(
        "openai",
        resolve_model(model, overrides, "openai")?,
        temperature,
        WireDialect::OpenAi,
        base_url,
        Some(api_key),
        None,
        overrides.remaining(CONSUMED_KEYS),
    )
}

fn create_anthropic(model: Option<&str>, temperature: f32, overrides: &Overrides) -> HubmindResult<LlmHandle> {
    let api_key = resolve_key(overrides, "ANTHROPIC_API_KEY", "anthropic")?;
    let base_url = resolve_base_url(overrides, "ANTHROPIC_BASE_URL", "https://api.anthropic.com");
    LlmHandle::build(
        "anthropic",
        resolve_model(model, overrides, "anthropic")?,
        temperature,
        WireDialect::Anthropic,
        base_url,
        Some(api_key),
        None,
        overrides.remaining(CONSUMED_KEYS),
    )
}

fn create_google(model: Option<&str>, temperature: f32, overrides: &Overrides) -> HubmindResult<LlmHandle> {
    let api_key = resolve_key(overrides, "GOOGLE_API_KEY", "google")?;
    let base_url = resolve_base_url(
        overrides,
        "GOOGLE_API_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    LlmHandle::build(
        "google",
        resolve_model(model, overrides, "google")?,
        temperature,
        WireDialect::Google,
        base_url,
        Some(api_key),
        None,
        overrides.remaining(CONSUMED_KEYS),
    )
}

fn create_azure(model: Option<&str>, temperature: f32, overrides: &Overrides) -> HubmindResult<LlmHandle> {
    let api_key = resolve_key(overrides, "AZURE_OPENAI_API_KEY", "azure")?;

    let endpoint = overrides
        .get_str("endpoint")
        .or_else(|| overrides.get_str("base_url"))
        .map(str::to_string)
        .or_else(|| std::env::var("AZURE_OPENAI_ENDPOINT").ok().filter(|u| !u.is_empty()))
        .ok_or_else(|| {
            HubmindError::Config(
                "AZURE_OPENAI_ENDPOINT is required for the azure provider (pass endpoint or set the env var)"
                    .to_string(),
            )
        })?;

    let api_version = overrides
        .get_str("api_version")
        .map(str::to_string)
        .or_else(|| std::env::var("AZURE_OPENAI_API_VERSION").ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "2024-02-15-preview".to_string());

    LlmHandle::build(
        "azure",
        resolve_model(model, overrides, "azure")?,
        temperature,
        WireDialect::AzureOpenAi,
        endpoint,
        Some(api_key),
        Some(api_version),
        overrides.remaining(CONSUMED_KEYS),
    )
}

fn create_ollama(model: Option<&str>, temperature: f32, overrides: &Overrides) -> HubmindResult<LlmHandle> {
    // Local inference: no credential check.
    let base_url = resolve_base_url(overrides, "OLLAMA_BASE_URL", "http://localhost:11434");
    LlmHandle::build(
        "ollama",
        resolve_model(model, overrides, "ollama")?,
        temperature,
        WireDialect::OpenAi,
        base_url,
        None,
        None,
        overrides.remaining(CONSUMED_KEYS),
    )
}

fn create_groq(model: Option<&str>, temperature: f32, overrides: &Overrides) -> HubmindResult<LlmHandle> {
    let api_key = resolve_key(overrides, "GROQ_API_KEY", "groq")?;
    let base_url = resolve_base_url(overrides, "GROQ_BASE_URL", "https://api.groq.com/openai");
    LlmHandle::build(
        "groq",
        resolve_model(model, overrides, "groq")?,
        temperature,
        WireDialect::OpenAi,
        base_url,
        Some(api_key),
        None,
        overrides.remaining(CONSUMED_KEYS),
    )
}

/// Any OpenAI-compatible endpoint (Moonshot, OpenRouter, vLLM gateways...).
/// Requires base_url, api_key, and a model — none have usable defaults here.
fn create_openai_compatible(
    model: Option<&str>,
    temperature: f32,
    overrides: &Overrides,
) -> HubmindResult<LlmHandle> {
    let base_url = overrides
        .get_str("base_url")
        .map(str::to_string)
        .or_else(|| std::env::var("OPENAI_COMPATIBLE_BASE_URL").ok().filter(|u| !u.is_empty()))
        .ok_or_else(|| {
            HubmindError::Config(
                "base_url is required for the openai_compatible provider (pass it or set OPENAI_COMPATIBLE_BASE_URL)"
                    .to_string(),
            )
        })?;
    let api_key = resolve_key(overrides, "OPENAI_COMPATIBLE_API_KEY", "openai_compatible")?;

    LlmHandle::build(
        "openai_compatible",
        resolve_model(model, overrides, "openai_compatible")?,
        temperature,
        WireDialect::OpenAi,
        base_url,
        Some(api_key),
        None,
        overrides.remaining(CONSUMED_KEYS),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_api_key_override_wins() {
        let overrides = Overrides::new().set("api_key", "sk-explicit");
        let handle = create_openai(Some("gpt-4o"), 0.3, &overrides).unwrap();
        assert_eq!(handle.provider(), "openai");
        assert_eq!(handle.model(), "gpt-4o");
    }

    #[test]
    fn ollama_needs_no_credential() {
        let handle = create_ollama(Some("llama2"), 0.3, &Overrides::new()).unwrap();
        assert_eq!(handle.provider(), "ollama");
    }

    #[test]
    fn openai_compatible_requires_base_url_and_model() {
        std::env::remove_var("OPENAI_COMPATIBLE_BASE_URL");
        std::env::remove_var("OPENAI_COMPATIBLE_API_KEY");

        let no_base = create_openai_compatible(Some("m"), 0.3, &Overrides::new().set("api_key", "k"));
        assert!(matches!(no_base, Err(HubmindError::Config(_))));

        let no_model = create_openai_compatible(
            None,
            0.3,
            &Overrides::new()
                .set("api_key", "k")
                .set("base_url", "https://api.example.com/v1x/"),
        );
        assert!(matches!(no_model, Err(HubmindError::MissingModel { .. })));

        // model via overrides is enough
        let ok = create_openai_compatible(
            None,
            0.3,
            &Overrides::new()
                .set("api_key", "k")
                .set("base_url", "https://api.example.com")
                .set("model_name", "my-model"),
        )
        .unwrap();
        assert_eq!(ok.model(), "my-model");
    }

    #[test]
    fn missing_credential_names_provider_and_env_var() {
        std::env::remove_var("GROQ_API_KEY");
        let err = create_groq(Some("mixtral-8x7b-32768"), 0.3, &Overrides::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("groq"));
        assert!(msg.contains("GROQ_API_KEY"));
    }

    #[test]
    fn registry_with_builtins_resolves_every_provider_name() {
        let registry = ProviderRegistry::with_builtins();
        let names = registry.registered();
        for expected in [
            "anthropic",
            "azure",
            "deepseek",
            "google",
            "groq",
            "ollama",
            "openai",
            "openai_compatible",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }
}
