//! GitHub data-access collaborator for HubMind.
//!
//! Exposes the [`GithubApi`] trait — the exact surface the tool set and the
//! QA agent consume — plus [`RestGithub`], a thin REST implementation over
//! `reqwest`. The base URL is injectable so HTTP-level tests can stand in for
//! api.github.com, and the credential is optional: without a token, requests
//! go out unauthenticated (and rate-limited).

mod client;
mod rest;
mod types;

pub use client::GithubApi;
pub use rest::RestGithub;
pub use types::{Commit, CommitDetail, Issue, NewIssue, PullFile, PullRequest, Repo, Review};
