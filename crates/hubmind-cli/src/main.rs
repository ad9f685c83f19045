//! `hubmind` binary: serve the HTTP gateway or run one-shot commands.

use clap::{Parser, Subcommand};
use hubmind_agent::{AgentConfig, HubmindAgent, QaAgent};
use hubmind_core::ToolCall;
use hubmind_gateway::Settings;
use hubmind_github::{GithubApi, RestGithub};
use hubmind_llm::{Overrides, ProviderRegistry};
use hubmind_tools::{health, ToolSet};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hubmind", about = "HubMind — GitHub intelligence assistant")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "hubmind.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// One chat exchange with the agent
    Chat {
        /// The message to send
        message: String,
    },
    /// List trending repositories
    Trending {
        /// Filter by primary language
        #[arg(long)]
        language: Option<String>,
        /// Window: daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        since: String,
        /// Maximum results
        #[arg(long, default_value_t = 10)]
        limit: u64,
    },
    /// Today's pull requests for a repository
    Prs {
        /// Repository as owner/repo
        repo: String,
        /// Rank by value score instead of listing all
        #[arg(long)]
        valuable: bool,
    },
    /// Analyze a single pull request
    AnalyzePr {
        /// Repository as owner/repo
        repo: String,
        /// Pull request number
        number: u64,
    },
    /// Ask a question about a repository
    Qa {
        /// Repository as owner/repo
        repo: String,
        /// The question to answer
        question: String,
    },
    /// Health report for a repository
    Health {
        /// Repository as owner/repo
        repo: String,
        /// Trailing window in days
        #[arg(short, long, default_value_t = 30)]
        days: i64,
    },
    /// Recent activity across a watch list
    Watch {
        /// Comma-separated repositories as owner/repo
        repos: String,
        /// Trailing window in hours
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
}

/// Optional `hubmind.toml` contents; environment variables win over it.
#[derive(Deserialize, Default)]
struct FileConfig {
    provider: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    github_token: Option<String>,
    github_api_base_url: Option<String>,
    #[serde(default)]
    server: ServerSection,
}

#[derive(Deserialize, Default)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

async fn load_settings(path: &PathBuf) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match tokio::fs::read_to_string(path).await {
        Ok(raw) => {
            let file: FileConfig = toml::from_str(&raw)?;
            if let Some(provider) = file.provider {
                settings.provider = provider;
            }
            if let Some(model) = file.model {
                settings.model = Some(model);
            }
            if let Some(temperature) = file.temperature {
                settings.temperature = temperature;
            }
            if let Some(token) = file.github_token {
                settings.github_token = Some(token);
            }
            if let Some(base_url) = file.github_api_base_url {
                settings.github_base_url = Some(base_url);
            }
            if let Some(host) = file.server.host {
                settings.host = host;
            }
            if let Some(port) = file.server.port {
                settings.port = port;
            }
            info!(path = %path.display(), "Loaded config file");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        }
    }

    Ok(settings.overlay_env())
}

fn agent_config(settings: &Settings) -> AgentConfig {
    AgentConfig {
        provider: settings.provider.clone(),
        model: settings.model.clone(),
        temperature: settings.temperature,
        github_token: settings.github_token.clone(),
        github_base_url: settings.github_base_url.clone(),
        overrides: Overrides::new(),
    }
}

fn github_client(settings: &Settings) -> Arc<dyn GithubApi> {
    let base_url = settings
        .github_base_url
        .clone()
        .unwrap_or_else(|| "https://api.github.com".to_string());
    Arc::new(RestGithub::with_base_url(
        settings.github_token.clone(),
        base_url,
    ))
}

async fn run_tool(settings: &Settings, name: &str, input: String) -> String {
    let tools = ToolSet::for_github(github_client(settings));
    let call = ToolCall {
        id: format!("cli_{}", uuid::Uuid::new_v4().simple()),
        name: name.to_string(),
        input,
    };
    tools.execute(&call).await.content
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli.config).await?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            let addr = format!("{host}:{port}");

            info!("Starting HubMind gateway on {addr}");
            let app = hubmind_gateway::build(settings);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }

        Commands::Chat { message } => {
            let agent = HubmindAgent::new(agent_config(&settings))?;
            let reply = agent.chat(&message, &[]).await;
            println!("{reply}");
        }

        Commands::Trending {
            language,
            since,
            limit,
        } => {
            let mut input = json!({"since": since, "limit": limit});
            if let Some(language) = language {
                input["language"] = json!(language);
            }
            let output = run_tool(&settings, "get_trending_repos", input.to_string()).await;
            println!("{output}");
        }

        Commands::Prs { repo, valuable } => {
            let tool = if valuable {
                "get_valuable_prs"
            } else {
                "get_today_prs"
            };
            let output = run_tool(&settings, tool, json!({"repo": repo}).to_string()).await;
            println!("{output}");
        }

        Commands::AnalyzePr { repo, number } => {
            let input = json!({"repo": repo, "pr_number": number});
            let output = run_tool(&settings, "analyze_pr", input.to_string()).await;
            println!("{output}");
        }

        Commands::Health { repo, days } => {
            let github = github_client(&settings);
            let report = health::repo_health(github.as_ref(), &repo, days).await?;
            println!("{}", health::render_health(&report));
        }

        Commands::Watch { repos, hours } => {
            let repo_list: Vec<String> = repos
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
            if repo_list.is_empty() {
                return Err(anyhow::anyhow!("no repositories given"));
            }
            let github = github_client(&settings);
            let activity = health::watched_activity(github.as_ref(), &repo_list, hours).await;
            println!("{}", health::render_activity(&activity, hours));
        }

        Commands::Qa { repo, question } => {
            let registry = ProviderRegistry::with_builtins();
            let llm = registry.create(
                &settings.provider,
                settings.model.as_deref(),
                settings.temperature,
                &Overrides::new(),
            )?;
            let qa = QaAgent::new(llm, github_client(&settings));
            let answer = qa.answer(&repo, &question).await;
            println!("{}", answer.answer);
            if !answer.sources.is_empty() {
                println!("\nSources:");
                for source in &answer.sources {
                    println!("  - {source}");
                }
            }
        }
    }

    Ok(())
}
