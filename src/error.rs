use thiserror::Error;

/// Failure taxonomy for one analysis request.
///
/// Every pipeline stage raises one of these kinds; the HTTP layer maps them
/// to status codes in a single exhaustive match (see server.rs). The variant
/// payload is a human-readable detail string, kept deliberately terse so
/// internals do not leak to callers.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("invalid pull request locator: {0}")]
    InvalidReference(String),

    #[error("upstream data source error: {0}")]
    DataSource(String),

    #[error("risk classifier unavailable: {0}")]
    Classifier(String),

    #[error("review generator unavailable: {0}")]
    Review(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AnalyzeError {
    /// The detail string carried by the variant, without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            AnalyzeError::InvalidReference(d)
            | AnalyzeError::DataSource(d)
            | AnalyzeError::Classifier(d)
            | AnalyzeError::Review(d)
            | AnalyzeError::Internal(d) => d,
        }
    }
}

/// Error returned by classifier / generator implementations behind the
/// collaborator traits. The pipeline rewraps it into the matching
/// AnalyzeError kind; implementations never see the HTTP mapping.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(detail: impl Into<String>) -> Self {
        CollaboratorError(detail.into())
    }
}
