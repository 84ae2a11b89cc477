use serde::Serialize;

use crate::pr::types::{DiffSummary, PrMetadata};

/// Flat feature set submitted to the risk classifier.
///
/// Serializes to the JSON shape a model host expects. Construction is fully
/// deterministic: extensions come from a sorted set, lengths are character
/// counts. Identical inputs always yield an identical vector, which the
/// classifier regression tests rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureVector {
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub file_extensions: Vec<String>,
    pub title_length: usize,
    pub description_length: usize,
}

/// Merge the diff summary with PR metadata into the classifier's input.
pub fn normalize(summary: &DiffSummary, metadata: &PrMetadata) -> FeatureVector {
    FeatureVector {
        files_changed: summary.files_changed,
        lines_added: summary.lines_added,
        lines_deleted: summary.lines_deleted,
        file_extensions: summary.extensions.iter().cloned().collect(),
        title_length: metadata.title.chars().count(),
        description_length: metadata
            .body
            .as_ref()
            .map(|b| b.chars().count())
            .unwrap_or(0),
    }
}
