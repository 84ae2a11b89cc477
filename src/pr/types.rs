use serde::Deserialize;
use std::collections::BTreeSet;

/// Parsed components of a GitHub PR locator.
/// Extracted by parse_pr_url() in pr/mod.rs; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrUrl {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

/// One modified file as reported by the GitHub `/pulls/{n}/files` endpoint.
/// `patch` is absent for binary files and files over GitHub's diff limit.
#[derive(Debug, Clone, Deserialize)]
pub struct FileChange {
    #[serde(rename = "filename")]
    pub path: String,
    pub additions: usize,
    pub deletions: usize,
    #[serde(default)]
    pub patch: Option<String>,
}

/// Pull request metadata from the GitHub `/pulls/{n}` endpoint.
/// Request-scoped; never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct PrMetadata {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub additions: usize,
    pub deletions: usize,
    pub changed_files: usize,
}

/// Aggregate view of a PR's diff, recomputed per request.
///
/// Invariants (hold by construction in diff::summarize):
///   lines_added   = Σ additions over files
///   lines_deleted = Σ deletions over files
///   files_changed = number of input files (duplicates counted as supplied)
///
/// Extensions live in a BTreeSet so downstream feature vectors are
/// deterministic across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSummary {
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub extensions: BTreeSet<String>,
}
