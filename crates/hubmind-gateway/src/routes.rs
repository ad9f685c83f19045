use crate::settings::Settings;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hubmind_core::{ChatTurn, ToolCall};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Builds the gateway router over the given settings.
pub fn build(settings: Settings) -> Router {
    let state = Arc::new(AppState::new(settings));

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/trending", post(trending))
        .route("/api/prs", post(prs))
        .route("/api/analyze-pr", post(analyze_pr))
        .route("/api/create-issue", post(create_issue))
        .route("/api/issues", post(issues))
        .route("/api/qa", post(qa))
        .route("/api/health-repo", post(health_repo))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "hubmind",
        "endpoints": [
            "/api/health",
            "/api/chat",
            "/api/trending",
            "/api/prs",
            "/api/analyze-pr",
            "/api/create-issue",
            "/api/issues",
            "/api/qa",
            "/api/health-repo"
        ]
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "hubmind"}))
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
    provider: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    github_token: Option<String>,
}

impl ChatRequest {
    fn has_overrides(&self) -> bool {
        self.provider.is_some()
            || self.model.is_some()
            || self.api_key.is_some()
            || self.github_token.is_some()
    }
}

async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    // Credentialed requests get their own agent; anonymous ones share the
    // lazily built default.
    let agent = if req.has_overrides() {
        state.agent_with_overrides(
            req.provider.as_deref(),
            req.model.as_deref(),
            req.api_key.as_deref(),
            req.github_token.as_deref(),
        )
    } else {
        state.default_agent().await
    };

    let agent = match agent {
        Ok(agent) => agent,
        Err(e) => return config_error(&e.to_string()),
    };

    let reply = agent.chat(&req.message, &req.history).await;

    let mut history = req.history;
    history.push(ChatTurn::user(req.message));
    history.push(ChatTurn::assistant(&reply));

    Json(json!({"response": reply, "history": history})).into_response()
}

#[derive(Deserialize)]
struct TrendingRequest {
    language: Option<String>,
    #[serde(default = "default_since")]
    since: String,
    #[serde(default = "default_trending_limit")]
    limit: u64,
}

fn default_since() -> String {
    "daily".to_string()
}
fn default_trending_limit() -> u64 {
    10
}

async fn trending(State(state): State<Arc<AppState>>, Json(req): Json<TrendingRequest>) -> Response {
    let mut input = json!({"since": req.since, "limit": req.limit});
    if let Some(language) = req.language {
        input["language"] = json!(language);
    }
    invoke_tool(&state, "get_trending_repos", input.to_string()).await
}

#[derive(Deserialize)]
struct PrsRequest {
    repo: String,
    /// When true, filter and rank by value score.
    #[serde(default)]
    valuable: bool,
    limit: Option<u64>,
    min_comments: Option<u64>,
}

async fn prs(State(state): State<Arc<AppState>>, Json(req): Json<PrsRequest>) -> Response {
    let mut input = json!({"repo": req.repo});
    if let Some(limit) = req.limit {
        input["limit"] = json!(limit);
    }
    if let Some(min_comments) = req.min_comments {
        input["min_comments"] = json!(min_comments);
    }
    let tool = if req.valuable {
        "get_valuable_prs"
    } else {
        "get_today_prs"
    };
    invoke_tool(&state, tool, input.to_string()).await
}

#[derive(Deserialize)]
struct AnalyzePrRequest {
    repo: String,
    pr_number: u64,
}

async fn analyze_pr(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzePrRequest>,
) -> Response {
    let input = json!({"repo": req.repo, "pr_number": req.pr_number});
    invoke_tool(&state, "analyze_pr", input.to_string()).await
}

#[derive(Deserialize)]
struct CreateIssueRequest {
    repo: String,
    text: String,
    #[serde(default)]
    assignees: Vec<String>,
    #[serde(default)]
    labels: Vec<String>,
}

async fn create_issue(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateIssueRequest>,
) -> Response {
    let input = json!({
        "repo": req.repo,
        "text": req.text,
        "assignees": req.assignees,
        "labels": req.labels,
    });
    invoke_tool(&state, "create_issue", input.to_string()).await
}

#[derive(Deserialize)]
struct IssuesRequest {
    repo: String,
    #[serde(default = "default_issue_state")]
    state: String,
    #[serde(default = "default_issue_limit")]
    limit: u64,
}

fn default_issue_state() -> String {
    "open".to_string()
}
fn default_issue_limit() -> u64 {
    20
}

async fn issues(State(state): State<Arc<AppState>>, Json(req): Json<IssuesRequest>) -> Response {
    let input = json!({"repo": req.repo, "state": req.state, "limit": req.limit});
    invoke_tool(&state, "get_issues", input.to_string()).await
}

#[derive(Deserialize)]
struct QaRequest {
    repo: String,
    question: String,
}

async fn qa(State(state): State<Arc<AppState>>, Json(req): Json<QaRequest>) -> Response {
    let qa = match state.qa_agent().await {
        Ok(qa) => qa,
        Err(e) => return config_error(&e.to_string()),
    };
    let answer = qa.answer(&req.repo, &req.question).await;
    Json(answer).into_response()
}

#[derive(Deserialize)]
struct HealthRepoRequest {
    repo: String,
    #[serde(default = "default_health_days")]
    days: i64,
}

fn default_health_days() -> i64 {
    30
}

async fn health_repo(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HealthRepoRequest>,
) -> Response {
    let github = state.github();
    match hubmind_tools::health::repo_health(github.as_ref(), &req.repo, req.days).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!(repo = %req.repo, error = %e, "Health report failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// Runs one tool and maps its output: error strings become `{"error": ...}`,
/// anything else `{"result": ...}`.
async fn invoke_tool(state: &AppState, name: &str, input: String) -> Response {
    let call = ToolCall {
        id: format!("http_{}", Uuid::new_v4().simple()),
        name: name.to_string(),
        input,
    };
    let result = state.tools().execute(&call).await;

    if result.content.starts_with("Error:") {
        error!(tool = name, detail = %result.content, "Tool endpoint failed");
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": result.content})),
        )
            .into_response();
    }
    Json(json!({"result": result.content})).into_response()
}

fn config_error(message: &str) -> Response {
    error!(detail = message, "Agent construction failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": message})),
    )
        .into_response()
}
