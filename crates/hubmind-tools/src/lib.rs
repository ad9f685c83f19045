//! GitHub tools exposed to the conversational agent.
//!
//! Each tool declares a natural-language input contract (shown to the LLM),
//! accepts one raw string, and returns display-ready plain text. Tools are
//! pure functions over external GitHub state: their only captured state is
//! the GitHub-access handle bound at construction. A tool invocation never
//! raises an unrecovered fault — every failure is converted into an error
//! string the agent can relay in natural language.

pub mod classify;
pub mod health;
mod issue;
mod pr;
pub mod score;
mod tool;
mod trending;

pub use issue::{CreateIssueTool, GetIssuesTool};
pub use pr::{AnalyzePrTool, TodayPrsTool, ValuablePrsTool};
pub use tool::{Tool, ToolSet};
pub use trending::{AnalyzeTrendingTool, TrendingTool};
