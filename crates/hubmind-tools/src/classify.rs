//! Keyword-based issue classification and free-text parsing.

const BUG_KEYWORDS: &[&str] = &["bug", "error", "crash", "broken", "fail", "issue", "problem"];
const FEATURE_KEYWORDS: &[&str] = &["feature", "add", "implement", "new", "enhancement", "improve"];
const DOC_KEYWORDS: &[&str] = &["doc", "documentation", "readme", "guide", "tutorial"];
const URGENT_KEYWORDS: &[&str] = &["urgent", "critical", "blocking", "broken", "crash"];

/// Maximum issue title length; longer first lines are truncated with an
/// ellipsis.
const MAX_TITLE_LEN: usize = 100;

/// Result of classifying issue text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// `bug`, `feature`, `documentation`, or `question`.
    pub kind: &'static str,
    /// `high` or `medium`.
    pub priority: &'static str,
}

impl Classification {
    /// Labels suggested from the classification: `[type, priority]`.
    pub fn suggested_labels(&self) -> Vec<String> {
        vec![self.kind.to_string(), self.priority.to_string()]
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classifies issue text by case-insensitive keyword substring match.
///
/// Type resolution is first-match-wins in the order bug → feature →
/// documentation, defaulting to `question`. Priority is `high` iff any
/// urgent keyword is present.
pub fn classify_issue(text: &str) -> Classification {
    let lower = text.to_lowercase();

    let kind = if contains_any(&lower, BUG_KEYWORDS) {
        "bug"
    } else if contains_any(&lower, FEATURE_KEYWORDS) {
        "feature"
    } else if contains_any(&lower, DOC_KEYWORDS) {
        "documentation"
    } else {
        "question"
    };

    let priority = if contains_any(&lower, URGENT_KEYWORDS) {
        "high"
    } else {
        "medium"
    };

    Classification { kind, priority }
}

/// An issue derived from free-form natural-language text.
#[derive(Debug, Clone)]
pub struct ParsedIssue {
    /// First line, truncated to 100 characters with an ellipsis.
    pub title: String,
    /// Remaining lines, prefixed with the classification tags.
    pub body: String,
    /// `[type, priority]` from the classifier.
    pub suggested_labels: Vec<String>,
}

/// Parses free text into a title and body and tags it with the classifier.
pub fn parse_issue_text(text: &str) -> ParsedIssue {
    let trimmed = text.trim();
    let mut lines = trimmed.lines();
    let first_line = lines.next().unwrap_or(trimmed);

    let title = if first_line.chars().count() > MAX_TITLE_LEN {
        let head: String = first_line.chars().take(MAX_TITLE_LEN - 3).collect();
        format!("{head}...")
    } else {
        first_line.to_string()
    };

    let rest: Vec<&str> = lines.collect();
    let body = if rest.is_empty() {
        trimmed.to_string()
    } else {
        rest.join("\n")
    };

    let classification = classify_issue(text);
    let tags = format!(
        "**Type:** {}\n**Priority:** {}",
        classification.kind, classification.priority
    );
    let body = if body.is_empty() {
        tags
    } else {
        format!("{tags}\n\n{body}")
    };

    ParsedIssue {
        title,
        body,
        suggested_labels: classification.suggested_labels(),
    }
}
