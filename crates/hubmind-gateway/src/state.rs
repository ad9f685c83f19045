use crate::settings::Settings;
use hubmind_agent::{AgentConfig, HubmindAgent, QaAgent};
use hubmind_core::HubmindResult;
use hubmind_github::{GithubApi, RestGithub};
use hubmind_llm::{Overrides, ProviderRegistry};
use hubmind_tools::ToolSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

const GITHUB_DEFAULT_BASE: &str = "https://api.github.com";

/// Shared application state.
///
/// The default chat and QA agents are lazily constructed on first use and
/// then reused for every anonymous request; `OnceCell` guarantees a single
/// construction under concurrent first requests. Requests carrying their own
/// credentials get a fresh agent instead and never touch the shared ones.
pub struct AppState {
    settings: Settings,
    github: Arc<dyn GithubApi>,
    tools: ToolSet,
    agent: OnceCell<Arc<HubmindAgent>>,
    qa: OnceCell<Arc<QaAgent>>,
}

impl AppState {
    /// Builds state from resolved settings.
    pub fn new(settings: Settings) -> Self {
        let base_url = settings
            .github_base_url
            .clone()
            .unwrap_or_else(|| GITHUB_DEFAULT_BASE.to_string());
        let github: Arc<dyn GithubApi> = Arc::new(RestGithub::with_base_url(
            settings.github_token.clone(),
            base_url,
        ));
        let tools = ToolSet::for_github(Arc::clone(&github));
        Self {
            settings,
            github,
            tools,
            agent: OnceCell::new(),
            qa: OnceCell::new(),
        }
    }

    /// The resolved settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The process-default tool set.
    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// The process-default GitHub collaborator.
    pub fn github(&self) -> Arc<dyn GithubApi> {
        Arc::clone(&self.github)
    }

    fn default_agent_config(&self) -> AgentConfig {
        AgentConfig {
            provider: self.settings.provider.clone(),
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            github_token: self.settings.github_token.clone(),
            github_base_url: self.settings.github_base_url.clone(),
            overrides: Overrides::new(),
        }
    }

    /// The shared default chat agent, constructed once.
    pub async fn default_agent(&self) -> HubmindResult<Arc<HubmindAgent>> {
        self.agent
            .get_or_try_init(|| async {
                info!(provider = %self.settings.provider, "Constructing default agent");
                HubmindAgent::new(self.default_agent_config()).map(Arc::new)
            })
            .await
            .map(Arc::clone)
    }

    /// A fresh agent bound to request-specific credentials.
    pub fn agent_with_overrides(
        &self,
        provider: Option<&str>,
        model: Option<&str>,
        api_key: Option<&str>,
        github_token: Option<&str>,
    ) -> HubmindResult<Arc<HubmindAgent>> {
        let mut config = self.default_agent_config();
        if let Some(provider) = provider {
            config.provider = provider.to_string();
        }
        if let Some(model) = model {
            config.model = Some(model.to_string());
        }
        if let Some(key) = api_key {
            config.overrides = Overrides::new().set("api_key", key);
        }
        if let Some(token) = github_token {
            config.github_token = Some(token.to_string());
        }
        HubmindAgent::new(config).map(Arc::new)
    }

    /// The shared QA agent, constructed once.
    pub async fn qa_agent(&self) -> HubmindResult<Arc<QaAgent>> {
        self.qa
            .get_or_try_init(|| async {
                let registry = ProviderRegistry::with_builtins();
                let llm = registry.create(
                    &self.settings.provider,
                    self.settings.model.as_deref(),
                    self.settings.temperature,
                    &Overrides::new(),
                )?;
                Ok(Arc::new(QaAgent::new(llm, self.github())))
            })
            .await
            .map(Arc::clone)
    }
}
