/// Runtime configuration for the gateway, resolved once at startup by the
/// binary layer and passed in explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Default LLM provider for the shared agent.
    pub provider: String,
    /// Model override; empty uses the provider default.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Process-default GitHub token for anonymous requests.
    pub github_token: Option<String>,
    /// GitHub API base URL override (tests, GitHub Enterprise).
    pub github_base_url: Option<String>,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: "deepseek".to_string(),
            model: None,
            temperature: 0.7,
            github_token: None,
            github_base_url: None,
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment. This is the documented
    /// single point where environment state enters the system.
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Applies environment variables on top of these settings; unset
    /// variables leave the existing values untouched.
    pub fn overlay_env(mut self) -> Self {
        if let Some(provider) = env_nonempty("LLM_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = env_nonempty("LLM_MODEL") {
            self.model = Some(model);
        }
        if let Some(temperature) = env_nonempty("LLM_TEMPERATURE").and_then(|t| t.parse().ok()) {
            self.temperature = temperature;
        }
        if let Some(token) = env_nonempty("GITHUB_TOKEN") {
            self.github_token = Some(token);
        }
        if let Some(base_url) = env_nonempty("GITHUB_API_BASE_URL") {
            self.github_base_url = Some(base_url);
        }
        if let Some(host) = env_nonempty("HOST") {
            self.host = host;
        }
        if let Some(port) = env_nonempty("PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        self
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
