//! LLM provider registry and client adapters for HubMind.
//!
//! This crate presents one chat-completion interface over heterogeneous LLM
//! backends. A [`ProviderRegistry`] maps provider names to creator functions;
//! each creator validates its credentials and endpoint and produces an
//! [`LlmHandle`] wrapping the right wire dialect. No network call happens at
//! construction time — the first request goes out on the first `chat()`.
//!
//! To add a provider: write a creator `(model, temperature, &Overrides) ->
//! HubmindResult<LlmHandle>` and call [`ProviderRegistry::register`]. Dispatch
//! code never changes. Arbitrary OpenAI-compatible endpoints are covered by
//! the builtin `openai_compatible` provider.

pub mod adapters;
pub mod backends;
mod handle;
mod overrides;
mod provider;

pub use backends::{ChatBackend, LlmReply, WireConfig};
pub use handle::LlmHandle;
pub use overrides::Overrides;
pub use provider::{ProviderConfig, ProviderRegistry};
