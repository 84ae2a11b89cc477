use base64::Engine;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::AnalyzeError;
use crate::pr::types::{FileChange, PrMetadata, PrUrl};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Per-call timeout against the GitHub API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "pr-risk-analyzer";

/// Lookup order for a repository's contributing guidelines.
const CONTRIBUTING_PATHS: &[&str] = &["CONTRIBUTING.md", ".github/CONTRIBUTING.md"];

/// Read-only GitHub data source used by the pipeline.
///
/// Holds a shared reqwest client plus the access token; both are immutable
/// configuration, so one GitHubClient is safe to clone across concurrent
/// pipeline invocations. The token is required at construction (startup),
/// never checked per request.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: String, base_url: String) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(GitHubClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, AnalyzeError> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AnalyzeError::DataSource(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzeError::DataSource(format!(
                "GET {url} returned {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AnalyzeError::DataSource(format!("GET {url} bad payload: {e}")))
    }

    /// Fetch PR metadata (`GET /repos/{owner}/{repo}/pulls/{number}`).
    #[instrument(skip(self), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.pr_number))]
    pub async fn get_metadata(&self, pr: &PrUrl) -> Result<PrMetadata, AnalyzeError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_url, pr.owner, pr.repo, pr.pr_number
        );
        let metadata: PrMetadata = self.get_json(&url).await?;
        debug!(title = %metadata.title, changed_files = metadata.changed_files, "received PR metadata");
        Ok(metadata)
    }

    /// Fetch the per-file change list (`GET .../pulls/{number}/files`).
    #[instrument(skip(self), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.pr_number))]
    pub async fn get_file_changes(&self, pr: &PrUrl) -> Result<Vec<FileChange>, AnalyzeError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/files",
            self.base_url, pr.owner, pr.repo, pr.pr_number
        );
        let files: Vec<FileChange> = self.get_json(&url).await?;
        debug!(file_count = files.len(), "received PR file changes");
        Ok(files)
    }

    /// Fetch the newest commit messages on the repository's default branch,
    /// most-recent-first, capped at `limit`.
    #[instrument(skip(self), fields(owner = %pr.owner, repo = %pr.repo))]
    pub async fn get_recent_commit_messages(
        &self,
        pr: &PrUrl,
        limit: usize,
    ) -> Result<Vec<String>, AnalyzeError> {
        #[derive(Deserialize)]
        struct CommitEntry {
            commit: CommitDetail,
        }
        #[derive(Deserialize)]
        struct CommitDetail {
            #[serde(default)]
            message: Option<String>,
        }

        let url = format!("{}/repos/{}/{}/commits", self.base_url, pr.owner, pr.repo);
        let commits: Vec<CommitEntry> = self.get_json(&url).await?;

        let messages: Vec<String> = commits
            .into_iter()
            .take(limit)
            .filter_map(|c| c.commit.message)
            .filter(|m| !m.is_empty())
            .collect();
        debug!(count = messages.len(), "received recent commit messages");
        Ok(messages)
    }

    /// Fetch the repository's contributing guidelines, if any.
    ///
    /// Absence is a normal outcome: any miss (404, decode failure, timeout)
    /// resolves to None and is logged, never propagated. The mandatory
    /// fetches have their own failure path.
    #[instrument(skip(self), fields(owner = %pr.owner, repo = %pr.repo))]
    pub async fn get_contributing_doc(&self, pr: &PrUrl) -> Option<String> {
        #[derive(Deserialize)]
        struct ContentsResponse {
            #[serde(default)]
            content: Option<String>,
        }

        for &path in CONTRIBUTING_PATHS {
            let url = format!(
                "{}/repos/{}/{}/contents/{}",
                self.base_url, pr.owner, pr.repo, path
            );
            let contents: ContentsResponse = match self.get_json(&url).await {
                Ok(c) => c,
                Err(e) => {
                    debug!(path, error = %e, "contributing doc lookup missed");
                    continue;
                }
            };

            let Some(encoded) = contents.content else {
                continue;
            };
            // The contents API hard-wraps base64 with newlines.
            let stripped: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
            match base64::engine::general_purpose::STANDARD.decode(stripped.as_bytes()) {
                Ok(bytes) => match String::from_utf8(bytes) {
                    Ok(doc) => {
                        debug!(path, bytes = doc.len(), "found contributing guidelines");
                        return Some(doc);
                    }
                    Err(e) => warn!(path, error = %e, "contributing doc is not valid UTF-8"),
                },
                Err(e) => warn!(path, error = %e, "contributing doc base64 decode failed"),
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash_from_base_url() {
        let client =
            GitHubClient::new("token".to_string(), "https://api.github.com/".to_string()).unwrap();
        assert_eq!(client.base_url, "https://api.github.com");
    }
}
