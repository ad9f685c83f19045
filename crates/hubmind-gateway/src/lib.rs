//! HTTP gateway for HubMind.
//!
//! An axum router exposing the chat agent, the GitHub tools, and the QA
//! agent as JSON endpoints. Configuration arrives as an explicit
//! [`Settings`] value — the gateway itself never reads the environment.

mod routes;
mod settings;
mod state;

pub use routes::build;
pub use settings::Settings;
pub use state::AppState;
