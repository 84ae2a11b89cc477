use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::diff;
use crate::error::AnalyzeError;
use crate::features;
use crate::github::GitHubClient;
use crate::model::{RiskAssessment, RiskClassifier, RiskLabel};
use crate::pr;
use crate::review::{self, ReviewGenerator};

/// How many recent commit messages are fetched into the context.
pub const RECENT_COMMIT_LIMIT: usize = 5;

/// Per-call timeout for the classifier and generator collaborators.
const COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(10);

/// The only terminal success shape of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub risk_label: RiskLabel,
    pub risk_score: f64,
    pub review_comments: String,
}

/// Orchestrates one PR analysis from locator to outcome.
///
/// Holds only read-only configuration (the GitHub client and the two
/// collaborators), so one Pipeline is cloned freely across concurrent
/// requests; nothing is cached or shared between invocations.
#[derive(Clone)]
pub struct Pipeline {
    github: GitHubClient,
    classifier: Arc<dyn RiskClassifier>,
    generator: Arc<dyn ReviewGenerator>,
    collaborator_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        github: GitHubClient,
        classifier: Arc<dyn RiskClassifier>,
        generator: Arc<dyn ReviewGenerator>,
    ) -> Self {
        Pipeline {
            github,
            classifier,
            generator,
            collaborator_timeout: COLLABORATOR_TIMEOUT,
        }
    }

    /// Shrink the collaborator timeout; used by tests exercising the
    /// timeout-to-error mapping without waiting out the default.
    pub fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = timeout;
        self
    }

    /// Run the full pipeline: parse, fetch, summarize, normalize, classify,
    /// assemble, generate. Each stage failure maps to exactly one
    /// AnalyzeError kind; no stage is retried here.
    #[instrument(skip(self), fields(locator = %locator))]
    pub async fn analyze(&self, locator: &str) -> Result<AnalysisOutcome, AnalyzeError> {
        let pr_url = pr::parse_pr_url(locator)?;
        debug!(owner = %pr_url.owner, repo = %pr_url.repo, pr = pr_url.pr_number, "parsed locator");

        // Mandatory fetches run concurrently; the first failure drops the
        // rest. The contributing-doc lookup is wrapped so its misses resolve
        // to None instead of failing the join.
        let (metadata, files, recent_commits, contributing) = tokio::try_join!(
            self.github.get_metadata(&pr_url),
            self.github.get_file_changes(&pr_url),
            self.github.get_recent_commit_messages(&pr_url, RECENT_COMMIT_LIMIT),
            async { Ok::<_, AnalyzeError>(self.github.get_contributing_doc(&pr_url).await) },
        )?;
        info!(
            files = files.len(),
            commits = recent_commits.len(),
            has_contributing = contributing.is_some(),
            "fetched PR context"
        );

        let (summary, diff_text) = diff::summarize(&files);
        debug!(
            files_changed = summary.files_changed,
            lines_added = summary.lines_added,
            lines_deleted = summary.lines_deleted,
            diff_chars = diff_text.chars().count(),
            "built diff summary"
        );

        let feature_vector = features::normalize(&summary, &metadata);

        let raw = tokio::time::timeout(
            self.collaborator_timeout,
            self.classifier.classify(&feature_vector),
        )
        .await
        .map_err(|_| AnalyzeError::Classifier("classifier timed out".to_string()))?
        .map_err(|e| AnalyzeError::Classifier(e.to_string()))?;
        let assessment = validate_assessment(raw)?;
        info!(label = %assessment.label, score = assessment.score, "classification complete");

        let context = review::assemble(
            &metadata,
            summary,
            diff_text,
            recent_commits,
            contributing,
            assessment,
        );

        let review_comments = tokio::time::timeout(
            self.collaborator_timeout,
            self.generator.generate(&context),
        )
        .await
        .map_err(|_| AnalyzeError::Review("review generator timed out".to_string()))?
        .map_err(|e| AnalyzeError::Review(e.to_string()))?;
        if review_comments.trim().is_empty() {
            return Err(AnalyzeError::Review(
                "generator returned an empty review".to_string(),
            ));
        }
        info!("review generated");

        Ok(AnalysisOutcome {
            risk_label: assessment.label,
            risk_score: assessment.score,
            review_comments,
        })
    }
}

/// Enforce the classifier's output contract: a finite score clamped into
/// [0.0, 1.0]. Label membership is already guaranteed by the enum.
fn validate_assessment(assessment: RiskAssessment) -> Result<RiskAssessment, AnalyzeError> {
    if !assessment.score.is_finite() {
        return Err(AnalyzeError::Classifier(format!(
            "classifier returned a non-finite score: {}",
            assessment.score
        )));
    }
    Ok(RiskAssessment {
        label: assessment.label,
        score: assessment.score.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_clamps_out_of_range_scores() {
        let high = RiskAssessment {
            label: RiskLabel::High,
            score: 1.7,
        };
        assert_eq!(validate_assessment(high).unwrap().score, 1.0);

        let low = RiskAssessment {
            label: RiskLabel::Low,
            score: -0.2,
        };
        assert_eq!(validate_assessment(low).unwrap().score, 0.0);
    }

    #[test]
    fn test_validate_passes_in_range_scores_through() {
        let ok = RiskAssessment {
            label: RiskLabel::Medium,
            score: 0.42,
        };
        assert_eq!(validate_assessment(ok).unwrap().score, 0.42);
    }

    #[test]
    fn test_validate_rejects_non_finite_scores() {
        let nan = RiskAssessment {
            label: RiskLabel::Low,
            score: f64::NAN,
        };
        assert!(matches!(
            validate_assessment(nan),
            Err(AnalyzeError::Classifier(_))
        ));
    }
}
