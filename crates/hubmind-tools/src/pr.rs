use crate::score::pr_score;
use crate::tool::{parse_object, str_field, u64_field, Tool};
use hubmind_github::{GithubApi, PullRequest};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// Pulls updated today for a repository, enriched with full counters.
///
/// The list endpoint omits comment and diff counts, so every candidate gets
/// an individual fetch before scoring or display.
async fn todays_pulls(
    github: &dyn GithubApi,
    repo: &str,
) -> Result<Vec<PullRequest>, hubmind_core::HubmindError> {
    let today = Utc::now().date_naive();
    let listed = github.list_pulls(repo, "all", 50).await?;

    let mut full = Vec::new();
    for pr in listed {
        if pr.updated_at.date_naive() != today {
            continue;
        }
        match github.get_pull(repo, pr.number).await {
            Ok(detailed) => full.push(detailed),
            Err(e) => {
                warn!(repo, number = pr.number, error = %e, "Skipping PR detail fetch");
                full.push(pr);
            }
        }
    }
    Ok(full)
}

fn format_pr_line(pr: &PullRequest) -> String {
    format!(
        "PR #{}: {} [{}] by {} - {} comments, {} review comments, +{}/-{} lines",
        pr.number,
        pr.title,
        pr.effective_state(),
        pr.author,
        pr.comments,
        pr.review_comments,
        pr.additions,
        pr.deletions,
    )
}

/// Today's pull requests ranked by engagement value.
pub struct ValuablePrsTool {
    github: Arc<dyn GithubApi>,
}

impl ValuablePrsTool {
    /// Binds the tool to a GitHub collaborator.
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for ValuablePrsTool {
    fn name(&self) -> &str {
        "get_valuable_prs"
    }

    fn input_contract(&self) -> &str {
        "A repository name like 'owner/repo', or a JSON object: {\"repo\": \"owner/repo\", \
         \"limit\": 10, \"min_comments\": 3}."
    }

    async fn invoke(&self, raw_input: &str) -> String {
        let (repo, limit, min_comments) = match parse_object(raw_input) {
            Some(map) => {
                let Some(repo) = str_field(&map, "repo") else {
                    return "Error: missing 'repo' field. Expected {\"repo\": \"owner/repo\"}."
                        .to_string();
                };
                (
                    repo,
                    u64_field(&map, "limit").unwrap_or(10),
                    u64_field(&map, "min_comments").unwrap_or(3),
                )
            }
            None => (raw_input.trim().to_string(), 10, 3),
        };

        let pulls = match todays_pulls(self.github.as_ref(), &repo).await {
            Ok(pulls) => pulls,
            Err(e) => return format!("Error: {e}"),
        };

        // Threshold counts conversation comments only; review comments are
        // rewarded by the score, not the filter.
        let mut scored: Vec<(f64, &PullRequest)> = pulls
            .iter()
            .filter(|pr| pr.comments >= min_comments)
            .map(|pr| (pr_score(pr), pr))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        if scored.is_empty() {
            return format!("No valuable PRs found for {repo} today.");
        }

        let mut out = format!("Most valuable PRs for {repo} today:\n");
        for (score, pr) in scored.iter().take(limit as usize) {
            out.push_str(&format!("[score {score:.2}] {}\n", format_pr_line(pr)));
        }
        out
    }
}

/// All pull requests updated today, without value filtering.
pub struct TodayPrsTool {
    github: Arc<dyn GithubApi>,
}

impl TodayPrsTool {
    /// Binds the tool to a GitHub collaborator.
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for TodayPrsTool {
    fn name(&self) -> &str {
        "get_today_prs"
    }

    fn input_contract(&self) -> &str {
        "A repository name like 'owner/repo', or a JSON object: {\"repo\": \"owner/repo\", \
         \"limit\": 20}."
    }

    async fn invoke(&self, raw_input: &str) -> String {
        let (repo, limit) = match parse_object(raw_input) {
            Some(map) => {
                let Some(repo) = str_field(&map, "repo") else {
                    return "Error: missing 'repo' field. Expected {\"repo\": \"owner/repo\"}."
                        .to_string();
                };
                (repo, u64_field(&map, "limit").unwrap_or(20))
            }
            None => (raw_input.trim().to_string(), 20),
        };

        let pulls = match todays_pulls(self.github.as_ref(), &repo).await {
            Ok(pulls) => pulls,
            Err(e) => return format!("Error: {e}"),
        };
        if pulls.is_empty() {
            return format!("No PRs updated today for {repo}.");
        }

        let mut out = format!("PRs updated today for {repo}:\n");
        for pr in pulls.iter().take(limit as usize) {
            out.push_str(&format_pr_line(pr));
            out.push('\n');
        }
        out
    }
}

/// Deep analysis of a single pull request.
pub struct AnalyzePrTool {
    github: Arc<dyn GithubApi>,
}

impl AnalyzePrTool {
    /// Binds the tool to a GitHub collaborator.
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for AnalyzePrTool {
    fn name(&self) -> &str {
        "analyze_pr"
    }

    fn input_contract(&self) -> &str {
        "A JSON object: {\"repo\": \"owner/repo\", \"pr_number\": 123}. Both fields are required."
    }

    async fn invoke(&self, raw_input: &str) -> String {
        let Some(map) = parse_object(raw_input) else {
            return "Error: expected a JSON object like {\"repo\": \"owner/repo\", \
                    \"pr_number\": 123}."
                .to_string();
        };
        let Some(repo) = str_field(&map, "repo") else {
            return "Error: missing 'repo' field.".to_string();
        };
        let Some(number) = u64_field(&map, "pr_number") else {
            return "Error: missing or non-numeric 'pr_number' field.".to_string();
        };

        let pr = match self.github.get_pull(&repo, number).await {
            Ok(pr) => pr,
            Err(e) => return format!("Error: {e}"),
        };
        let files = match self.github.pull_files(&repo, number).await {
            Ok(files) => files,
            Err(e) => return format!("Error: {e}"),
        };
        let reviews = match self.github.pull_reviews(&repo, number).await {
            Ok(reviews) => reviews,
            Err(e) => return format!("Error: {e}"),
        };
        let commenters = match self.github.pull_comment_authors(&repo, number).await {
            Ok(authors) => authors,
            Err(e) => return format!("Error: {e}"),
        };

        // Collaborator lists need push scope; treat failure as "unknown".
        let maintainers = self
            .github
            .list_collaborators(&repo)
            .await
            .unwrap_or_default();
        let maintainer_participated = reviews
            .iter()
            .map(|r| r.author.as_str())
            .chain(commenters.iter().map(String::as_str))
            .any(|login| maintainers.iter().any(|m| m == login));

        let approvals = reviews.iter().filter(|r| r.state == "APPROVED").count();
        let changes_requested = reviews
            .iter()
            .filter(|r| r.state == "CHANGES_REQUESTED")
            .count();

        let mut out = format!(
            "Analysis of {repo}#{number}:\n{}\nValue score: {:.2}\n\n",
            format_pr_line(&pr),
            pr_score(&pr),
        );
        out.push_str(&format!(
            "Reviews: {} total ({approvals} approved, {changes_requested} changes requested)\n",
            reviews.len(),
        ));
        out.push_str(&format!(
            "Maintainer participated: {}\n",
            if maintainer_participated { "yes" } else { "no" }
        ));
        out.push_str(&format!("Files changed ({}):\n", files.len()));
        for file in files.iter().take(20) {
            out.push_str(&format!(
                "  {} [{}] +{}/-{}\n",
                file.filename, file.status, file.additions, file.deletions
            ));
        }
        if files.len() > 20 {
            out.push_str(&format!("  ... and {} more\n", files.len() - 20));
        }
        out
    }
}
