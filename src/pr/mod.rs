pub mod types;

pub use types::{DiffSummary, FileChange, PrMetadata, PrUrl};

use crate::error::AnalyzeError;

/// Parse a GitHub PR locator into its component parts.
///
/// Accepts exactly `https://github.com/{owner}/{repo}/pull/{number}` —
/// no trailing segments, no query string, no alternate hosts. Leading and
/// trailing whitespace is trimmed before matching; internal whitespace is
/// rejected. Pure function, no network.
pub fn parse_pr_url(locator: &str) -> Result<PrUrl, AnalyzeError> {
    let trimmed = locator.trim();

    let invalid = || AnalyzeError::InvalidReference(format!("malformed locator: {trimmed}"));

    if trimmed.contains(char::is_whitespace) {
        return Err(invalid());
    }

    let rest = trimmed
        .strip_prefix("https://github.com/")
        .ok_or_else(invalid)?;

    let mut segments = rest.split('/');
    let owner = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let repo = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    if segments.next() != Some("pull") {
        return Err(invalid());
    }
    let number = segments.next().ok_or_else(invalid)?;
    if segments.next().is_some() {
        return Err(invalid());
    }

    // u64::from_str accepts a leading '+'; the locator shape does not.
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let pr_number = number.parse::<u64>().map_err(|_| invalid())?;
    if pr_number == 0 {
        return Err(invalid());
    }

    Ok(PrUrl {
        owner: owner.to_string(),
        repo: repo.to_string(),
        pr_number,
    })
}
