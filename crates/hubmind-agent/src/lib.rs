//! Conversational agent orchestration for HubMind.
//!
//! [`HubmindAgent`] binds one LLM handle to the GitHub tool set and runs the
//! tool-call loop; its `chat()` entry point never fails — transient
//! connection faults are retried once and everything else collapses into a
//! user-facing reply string. [`QaAgent`] is the simpler sibling: one
//! context-gathering pass over a repository and a single LLM call, no tools.

mod agent;
mod extract;
mod qa;
mod runner;
mod session;

pub use agent::{AgentConfig, HubmindAgent};
pub use extract::extract_response;
pub use qa::{QaAgent, QaAnswer};
pub use runner::AgentRunner;
pub use session::SessionCorrelator;
