use std::collections::BTreeSet;

use crate::pr::types::{DiffSummary, FileChange};

/// Maximum number of characters of concatenated patch text forwarded to the
/// review generator. Anything beyond this is cut and marked.
pub const MAX_DIFF_CHARS: usize = 4000;

/// Fixed marker appended when the diff text is cut at MAX_DIFF_CHARS.
pub const TRUNCATION_MARKER: &str = "\n\n[TRUNCATED]";

/// Reduce a list of file changes into aggregate counts plus the bounded
/// concatenated diff text. Pure function over already-fetched data.
pub fn summarize(files: &[FileChange]) -> (DiffSummary, String) {
    let mut extensions = BTreeSet::new();
    let mut lines_added = 0;
    let mut lines_deleted = 0;

    for file in files {
        lines_added += file.additions;
        lines_deleted += file.deletions;
        if let Some((_, ext)) = file.path.rsplit_once('.') {
            extensions.insert(ext.to_string());
        }
    }

    let summary = DiffSummary {
        files_changed: files.len(),
        lines_added,
        lines_deleted,
        extensions,
    };

    let diff_text = limit_diff_text(&extract_patch_text(files));
    (summary, diff_text)
}

/// Concatenate per-file patches in input order, separated by a blank line.
/// Files without a patch (binary, over-limit) are skipped.
pub fn extract_patch_text(files: &[FileChange]) -> String {
    let patches: Vec<&str> = files
        .iter()
        .filter_map(|f| f.patch.as_deref())
        .collect();
    patches.join("\n\n")
}

/// Cap `text` at MAX_DIFF_CHARS characters, appending TRUNCATION_MARKER when
/// content was cut. The result may exceed the cap only by the marker's own
/// length. Idempotent: an already-truncated result passes through unchanged,
/// so the marker is never split or applied twice.
pub fn limit_diff_text(text: &str) -> String {
    let char_len = text.chars().count();
    if char_len <= MAX_DIFF_CHARS {
        return text.to_string();
    }
    if text.ends_with(TRUNCATION_MARKER)
        && char_len <= MAX_DIFF_CHARS + TRUNCATION_MARKER.chars().count()
    {
        return text.to_string();
    }

    let mut limited: String = text.chars().take(MAX_DIFF_CHARS).collect();
    limited.push_str(TRUNCATION_MARKER);
    limited
}
