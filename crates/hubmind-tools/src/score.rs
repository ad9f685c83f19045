//! Pull-request value scoring.

use hubmind_github::PullRequest;

/// Heuristic ranking of pull-request significance.
///
/// `2*comments + 3*review_comments + min(additions/100, 10) +
/// min(deletions/100, 5) + 20 if merged / 5 if open`, rounded to two decimal
/// places. Downstream consumers compare scores across services, so the
/// formula must not drift.
pub fn value_score(
    comments: u64,
    review_comments: u64,
    additions: u64,
    deletions: u64,
    state: &str,
) -> f64 {
    let mut score = (comments * 2 + review_comments * 3) as f64;

    if additions > 0 {
        score += (additions as f64 / 100.0).min(10.0);
    }
    if deletions > 0 {
        score += (deletions as f64 / 100.0).min(5.0);
    }

    score += match state {
        "merged" => 20.0,
        "open" => 5.0,
        _ => 0.0,
    };

    (score * 100.0).round() / 100.0
}

/// Convenience wrapper over a fetched pull request.
pub fn pr_score(pr: &PullRequest) -> f64 {
    value_score(
        pr.comments,
        pr.review_comments,
        pr.additions,
        pr.deletions,
        pr.effective_state(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_example() {
        // 2*5 + 3*2 + min(2.5, 10) + min(0.4, 5) + 20 = 38.90
        assert_eq!(value_score(5, 2, 250, 40, "merged"), 38.90);
    }

    #[test]
    fn diff_contributions_are_capped() {
        // additions capped at 10 points, deletions at 5
        assert_eq!(value_score(0, 0, 100_000, 100_000, "closed"), 15.0);
    }

    #[test]
    fn state_bonus() {
        assert_eq!(value_score(0, 0, 0, 0, "merged"), 20.0);
        assert_eq!(value_score(0, 0, 0, 0, "open"), 5.0);
        assert_eq!(value_score(0, 0, 0, 0, "closed"), 0.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 1 addition -> 0.01
        assert_eq!(value_score(0, 0, 1, 0, "closed"), 0.01);
        assert_eq!(value_score(0, 0, 333, 0, "closed"), 3.33);
    }
}
