use async_trait::async_trait;

use crate::diff::TRUNCATION_MARKER;
use crate::error::CollaboratorError;
use crate::model::RiskAssessment;
use crate::pr::types::{DiffSummary, PrMetadata};

/// Everything the review generator sees for one request.
///
/// Assembled once per request, passed by value to the generator, and
/// discarded after the response is built.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub pr_title: String,
    pub diff_summary: DiffSummary,
    pub diff_text: String,
    /// Most-recent-first, bounded by the pipeline's commit limit.
    pub recent_commits: Vec<String>,
    /// None when the repository has no contributing guidelines; this is a
    /// normal outcome, not an error.
    pub contributing_guidelines: Option<String>,
    pub assessment: RiskAssessment,
}

/// Pure merge of the fetched and derived pieces into the context shape the
/// generator expects. No field values are transformed here.
pub fn assemble(
    metadata: &PrMetadata,
    summary: DiffSummary,
    diff_text: String,
    recent_commits: Vec<String>,
    contributing_guidelines: Option<String>,
    assessment: RiskAssessment,
) -> AnalysisContext {
    AnalysisContext {
        pr_title: metadata.title.clone(),
        diff_summary: summary,
        diff_text,
        recent_commits,
        contributing_guidelines,
        assessment,
    }
}

/// The review-generation collaborator.
///
/// Implementations turn an AnalysisContext into review prose. The contract
/// requires a non-empty string; failure or timeout fails the whole request.
#[async_trait]
pub trait ReviewGenerator: Send + Sync {
    async fn generate(&self, context: &AnalysisContext) -> Result<String, CollaboratorError>;
}

/// Deterministic template reviewer standing in for an LLM-backed generator.
pub struct TemplateReviewer;

impl TemplateReviewer {
    pub fn new() -> Self {
        TemplateReviewer
    }
}

impl Default for TemplateReviewer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewGenerator for TemplateReviewer {
    async fn generate(&self, context: &AnalysisContext) -> Result<String, CollaboratorError> {
        let summary = &context.diff_summary;
        let mut review = format!(
            "\"{}\" changes {} file(s) (+{} / -{}) and was assessed as {} risk (score {:.2}).",
            context.pr_title,
            summary.files_changed,
            summary.lines_added,
            summary.lines_deleted,
            context.assessment.label,
            context.assessment.score,
        );

        if !summary.extensions.is_empty() {
            let exts: Vec<&str> = summary.extensions.iter().map(String::as_str).collect();
            review.push_str(&format!(" Touched file types: {}.", exts.join(", ")));
        }

        if context.diff_text.ends_with(TRUNCATION_MARKER) {
            review.push_str(" The diff was too large to review in full; only the leading portion was considered.");
        }

        if let Some(commit) = context.recent_commits.first() {
            let subject = commit.lines().next().unwrap_or(commit);
            review.push_str(&format!(" Most recent commit on the repository: \"{subject}\"."));
        }

        match &context.contributing_guidelines {
            Some(_) => review.push_str(
                " The repository has contributing guidelines; verify the change follows them before merging.",
            ),
            None => review.push_str(" No contributing guidelines were found in the repository."),
        }

        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskLabel;
    use std::collections::BTreeSet;

    fn context(contributing: Option<&str>, diff_text: &str) -> AnalysisContext {
        AnalysisContext {
            pr_title: "Add OAuth2 login flow".to_string(),
            diff_summary: DiffSummary {
                files_changed: 2,
                lines_added: 15,
                lines_deleted: 1,
                extensions: BTreeSet::from(["py".to_string()]),
            },
            diff_text: diff_text.to_string(),
            recent_commits: vec!["fix: handle token refresh\n\nlong body".to_string()],
            contributing_guidelines: contributing.map(str::to_string),
            assessment: RiskAssessment {
                label: RiskLabel::Medium,
                score: 0.5,
            },
        }
    }

    #[test]
    fn test_assemble_is_a_pure_merge() {
        let metadata = PrMetadata {
            title: "Title".to_string(),
            body: Some("Body".to_string()),
            additions: 1,
            deletions: 0,
            changed_files: 1,
        };
        let summary = DiffSummary {
            files_changed: 1,
            lines_added: 1,
            lines_deleted: 0,
            extensions: BTreeSet::new(),
        };
        let assessment = RiskAssessment {
            label: RiskLabel::Low,
            score: 0.1,
        };
        let ctx = assemble(
            &metadata,
            summary.clone(),
            "diff".to_string(),
            vec!["c1".to_string()],
            None,
            assessment,
        );
        assert_eq!(ctx.pr_title, "Title");
        assert_eq!(ctx.diff_summary, summary);
        assert_eq!(ctx.diff_text, "diff");
        assert_eq!(ctx.recent_commits, vec!["c1"]);
        assert!(ctx.contributing_guidelines.is_none());
    }

    #[tokio::test]
    async fn test_template_reviewer_returns_non_empty_prose() {
        let review = TemplateReviewer::new()
            .generate(&context(Some("## Guidelines"), "diff"))
            .await
            .unwrap();
        assert!(!review.trim().is_empty());
        assert!(review.contains("MEDIUM"));
        assert!(review.contains("Add OAuth2 login flow"));
        assert!(review.contains("handle token refresh"));
    }

    #[tokio::test]
    async fn test_template_reviewer_notes_missing_guidelines() {
        let review = TemplateReviewer::new()
            .generate(&context(None, "diff"))
            .await
            .unwrap();
        assert!(review.contains("No contributing guidelines"));
    }

    #[tokio::test]
    async fn test_template_reviewer_notes_truncated_diff() {
        let truncated = format!("{}{}", "x".repeat(10), TRUNCATION_MARKER);
        let review = TemplateReviewer::new()
            .generate(&context(None, &truncated))
            .await
            .unwrap();
        assert!(review.contains("too large to review in full"));
    }
}
