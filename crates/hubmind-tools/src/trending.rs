use crate::tool::{parse_object, str_field, u64_field, Tool};
use hubmind_github::GithubApi;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Recently created repositories with the most stars, via the search API.
pub struct TrendingTool {
    github: Arc<dyn GithubApi>,
}

impl TrendingTool {
    /// Binds the tool to a GitHub collaborator.
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self { github }
    }
}

fn since_to_days(since: &str) -> i64 {
    match since {
        "weekly" => 7,
        "monthly" => 30,
        // "daily" and anything unrecognized
        _ => 1,
    }
}

#[async_trait]
impl Tool for TrendingTool {
    fn name(&self) -> &str {
        "get_trending_repos"
    }

    fn input_contract(&self) -> &str {
        "Optional JSON object: {\"language\": \"rust\", \"since\": \"daily|weekly|monthly\", \
         \"limit\": 10}. Any other input uses the defaults (all languages, daily, 10)."
    }

    async fn invoke(&self, raw_input: &str) -> String {
        let (language, since, limit) = match parse_object(raw_input) {
            Some(map) => (
                str_field(&map, "language").filter(|l| !l.is_empty()),
                str_field(&map, "since").unwrap_or_else(|| "daily".to_string()),
                u64_field(&map, "limit").unwrap_or(10),
            ),
            None => (None, "daily".to_string(), 10),
        };

        let cutoff = Utc::now() - Duration::days(since_to_days(&since));
        let mut query = format!("created:>{}", cutoff.format("%Y-%m-%d"));
        if let Some(lang) = &language {
            query.push_str(&format!(" language:{lang}"));
        }

        let repos = match self.github.search_repos(&query, limit as u32).await {
            Ok(repos) => repos,
            Err(e) => return format!("Error: {e}"),
        };
        if repos.is_empty() {
            return format!("No trending repositories found ({since}).");
        }

        let mut out = format!("Trending repositories ({since}):\n");
        for (i, repo) in repos.iter().take(limit as usize).enumerate() {
            out.push_str(&format!(
                "{}. {} - ⭐ {} stars, {} forks ({})\n   {}\n",
                i + 1,
                repo.full_name,
                repo.stargazers_count,
                repo.forks_count,
                repo.language.as_deref().unwrap_or("unknown"),
                repo.description.as_deref().unwrap_or("No description"),
            ));
        }
        out
    }
}

/// Characters of README shown in the trending analysis.
const README_PREVIEW_CHARS: usize = 500;

/// How many recent commits are sampled as an activity signal.
const COMMIT_SAMPLE: u32 = 10;

/// Explains why a single repository is trending: activity, popularity
/// counters, topics and a README excerpt.
pub struct AnalyzeTrendingTool {
    github: Arc<dyn GithubApi>,
}

impl AnalyzeTrendingTool {
    /// Binds the tool to a GitHub collaborator.
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for AnalyzeTrendingTool {
    fn name(&self) -> &str {
        "analyze_trending_reason"
    }

    fn input_contract(&self) -> &str {
        "Repository full name as a plain string, e.g. \"rust-lang/rust\", or a JSON object \
         {\"repo\": \"rust-lang/rust\"}."
    }

    async fn invoke(&self, raw_input: &str) -> String {
        let repo_name = match parse_object(raw_input) {
            Some(map) => match str_field(&map, "repo") {
                Some(r) => r,
                None => return "Error: expected a repository name or {\"repo\": ...}".to_string(),
            },
            None => raw_input.trim().to_string(),
        };
        if repo_name.is_empty() {
            return "Error: expected a repository name or {\"repo\": ...}".to_string();
        }

        let repo = match self.github.get_repo(&repo_name).await {
            Ok(repo) => repo,
            Err(e) => return format!("Error: {e}"),
        };

        // Activity and README signals are best-effort; the metadata alone
        // is still a useful answer.
        let recent_commits = self
            .github
            .list_commits(&repo_name, COMMIT_SAMPLE)
            .await
            .map(|commits| commits.len())
            .unwrap_or(0);
        let readme_preview = match self.github.get_readme(&repo_name).await {
            Ok(readme) => {
                let preview: String = readme.chars().take(README_PREVIEW_CHARS).collect();
                if preview.trim().is_empty() {
                    "N/A".to_string()
                } else {
                    preview
                }
            }
            Err(_) => "N/A".to_string(),
        };

        let mut out = format!("Why {} is trending:\n", repo.full_name);
        out.push_str(&format!(
            "⭐ {} stars, {} forks ({})\n",
            repo.stargazers_count,
            repo.forks_count,
            repo.language.as_deref().unwrap_or("unknown"),
        ));
        out.push_str(&format!("Recent commits sampled: {recent_commits}\n"));
        if repo.topics.is_empty() {
            out.push_str("Topics: none\n");
        } else {
            out.push_str(&format!("Topics: {}\n", repo.topics.join(", ")));
        }
        out.push_str(&format!("README preview:\n{readme_preview}\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_maps_to_day_windows() {
        assert_eq!(since_to_days("daily"), 1);
        assert_eq!(since_to_days("weekly"), 7);
        assert_eq!(since_to_days("monthly"), 30);
        assert_eq!(since_to_days("hourly"), 1);
    }
}
