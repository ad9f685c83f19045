//! Repository health and watch-list activity reports.
//!
//! Unlike the agent tools, these are plain data operations: the gateway
//! serves them as JSON and the CLI renders them as text, no LLM involved.

use chrono::{DateTime, Duration, Utc};
use hubmind_core::HubmindResult;
use hubmind_github::GithubApi;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Page size for the listing calls behind a report.
const PAGE: u32 = 100;

/// How many contributors the report names.
const CONTRIBUTOR_LIST_CAP: usize = 10;

/// Health metrics for one repository over a trailing day window.
#[derive(Debug, Clone, Serialize)]
pub struct RepoHealth {
    /// `owner/repo` full name.
    pub repo: String,
    /// Window length in days.
    pub period_days: i64,
    /// Pull requests opened inside the window.
    pub prs_created: usize,
    /// Of those, how many were merged.
    pub prs_merged: usize,
    /// `prs_merged / prs_created * 100`, two decimals; zero when nothing
    /// was opened.
    pub pr_merge_rate: f64,
    /// Issues opened inside the window.
    pub issues_opened: usize,
    /// Closed issues touched inside the window.
    pub issues_closed: usize,
    /// Commits inside the window.
    pub total_commits: usize,
    /// `total_commits / period_days`, two decimals.
    pub commits_per_day: f64,
    /// Distinct commit authors inside the window.
    pub active_contributors: usize,
    /// Top authors by commit count, most active first.
    pub contributor_list: Vec<String>,
    /// Current open issue count.
    pub open_issues: u64,
    /// Current star count.
    pub stars: u64,
    /// Current fork count.
    pub forks: u64,
}

/// Computes the health report for `repo` over the last `days` days.
pub async fn repo_health(
    github: &dyn GithubApi,
    repo: &str,
    days: i64,
) -> HubmindResult<RepoHealth> {
    let days = days.max(1);
    let since = Utc::now() - Duration::days(days);

    let meta = github.get_repo(repo).await?;
    let pulls = github.list_pulls(repo, "all", PAGE).await?;
    let issues = github.list_issues(repo, "all", PAGE).await?;
    let commits = github.list_commits_since(repo, since, PAGE).await?;

    let prs_created = pulls.iter().filter(|p| p.created_at >= since).count();
    let prs_merged = pulls
        .iter()
        .filter(|p| p.created_at >= since && p.merged_at.is_some())
        .count();
    let pr_merge_rate = if prs_created == 0 {
        0.0
    } else {
        round2(prs_merged as f64 / prs_created as f64 * 100.0)
    };

    let issues_opened = issues.iter().filter(|i| i.created_at >= since).count();
    let issues_closed = issues
        .iter()
        .filter(|i| i.state == "closed" && i.updated_at >= since)
        .count();

    let mut by_author: HashMap<&str, usize> = HashMap::new();
    for c in &commits {
        let who = c.author_identity();
        if !who.is_empty() {
            *by_author.entry(who).or_insert(0) += 1;
        }
    }
    let active_contributors = by_author.len();
    let mut ranked: Vec<(&str, usize)> = by_author.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let contributor_list = ranked
        .into_iter()
        .take(CONTRIBUTOR_LIST_CAP)
        .map(|(name, _)| name.to_string())
        .collect();

    Ok(RepoHealth {
        repo: repo.to_string(),
        period_days: days,
        prs_created,
        prs_merged,
        pr_merge_rate,
        issues_opened,
        issues_closed,
        total_commits: commits.len(),
        commits_per_day: round2(commits.len() as f64 / days as f64),
        active_contributors,
        contributor_list,
        open_issues: meta.open_issues_count,
        stars: meta.stargazers_count,
        forks: meta.forks_count,
    })
}

/// Activity counters for one watched repository over a trailing hour
/// window. A failed repository carries its error instead of zeroed
/// counters pretending to be quiet.
#[derive(Debug, Clone, Serialize)]
pub struct RepoActivity {
    /// `owner/repo` full name.
    pub repo: String,
    /// Pull requests opened inside the window.
    pub new_prs: usize,
    /// Pre-existing pull requests updated inside the window.
    pub updated_prs: usize,
    /// Issues opened inside the window.
    pub new_issues: usize,
    /// Pre-existing issues updated inside the window.
    pub updated_issues: usize,
    /// Commits inside the window.
    pub commits: usize,
    /// Lookup failure for this repository, when one occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Activity across a watch list over the last `hours` hours. One broken
/// repository never sinks the rest of the list.
pub async fn watched_activity(
    github: &dyn GithubApi,
    repos: &[String],
    hours: i64,
) -> Vec<RepoActivity> {
    let since = Utc::now() - Duration::hours(hours.max(1));
    let mut out = Vec::with_capacity(repos.len());
    for repo in repos {
        match repo_activity(github, repo, since).await {
            Ok(activity) => out.push(activity),
            Err(e) => {
                warn!(repo, error = %e, "Skipping watched repository");
                out.push(RepoActivity {
                    repo: repo.clone(),
                    new_prs: 0,
                    updated_prs: 0,
                    new_issues: 0,
                    updated_issues: 0,
                    commits: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }
    out
}

async fn repo_activity(
    github: &dyn GithubApi,
    repo: &str,
    since: DateTime<Utc>,
) -> HubmindResult<RepoActivity> {
    let pulls = github.list_pulls(repo, "all", PAGE).await?;
    let issues = github.list_issues(repo, "all", PAGE).await?;
    let commits = github.list_commits_since(repo, since, PAGE).await?;

    let new_prs = pulls.iter().filter(|p| p.created_at >= since).count();
    let updated_prs = pulls
        .iter()
        .filter(|p| p.updated_at >= since && p.created_at < since)
        .count();
    let new_issues = issues.iter().filter(|i| i.created_at >= since).count();
    let updated_issues = issues
        .iter()
        .filter(|i| i.updated_at >= since && i.created_at < since)
        .count();

    Ok(RepoActivity {
        repo: repo.to_string(),
        new_prs,
        updated_prs,
        new_issues,
        updated_issues,
        commits: commits.len(),
        error: None,
    })
}

/// Renders a health report as display text.
pub fn render_health(health: &RepoHealth) -> String {
    let mut out = format!(
        "Health report for {} (last {} days):\n",
        health.repo, health.period_days
    );
    out.push_str(&format!(
        "⭐ {} stars, {} forks, {} open issues\n",
        health.stars, health.forks, health.open_issues
    ));
    out.push_str(&format!(
        "PRs: {} opened, {} merged ({}% merge rate)\n",
        health.prs_created, health.prs_merged, health.pr_merge_rate
    ));
    out.push_str(&format!(
        "Issues: {} opened, {} closed\n",
        health.issues_opened, health.issues_closed
    ));
    out.push_str(&format!(
        "Commits: {} ({} per day) by {} contributors\n",
        health.total_commits, health.commits_per_day, health.active_contributors
    ));
    if !health.contributor_list.is_empty() {
        out.push_str(&format!(
            "Top contributors: {}\n",
            health.contributor_list.join(", ")
        ));
    }
    out
}

/// Renders a watch-list activity report as display text.
pub fn render_activity(activity: &[RepoActivity], hours: i64) -> String {
    let mut out = format!("Activity in the last {hours} hours:\n");
    for a in activity {
        match &a.error {
            Some(e) => out.push_str(&format!("{}: unavailable ({e})\n", a.repo)),
            None => out.push_str(&format!(
                "{}: {} new PRs, {} updated PRs, {} new issues, {} updated issues, {} commits\n",
                a.repo, a.new_prs, a.updated_prs, a.new_issues, a.updated_issues, a.commits
            )),
        }
    }
    out
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_decimal_rounding() {
        assert_eq!(round2(2.0 / 3.0 * 100.0), 66.67);
        assert_eq!(round2(5.0 / 30.0), 0.17);
    }
}
