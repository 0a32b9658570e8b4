//! HTTP delivery of encoded points.

use log::debug;
use reqwest::Client;

use crate::ERROR_BODY_LIMIT;
use crate::encode::encode_batch;
use crate::error::WriteError;
use crate::point::DataPoint;

/// Write endpoint coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub url: String,
    pub token: String,
}

impl WriteTarget {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }

    /// Final URL for write requests.
    ///
    /// Timestamps are sent in milliseconds, so `precision=ms` is appended to
    /// the query string unless a precision parameter is already present.
    pub fn write_url(&self) -> String {
        if self.url.contains("precision=") {
            return self.url.clone();
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}precision=ms", self.url, separator)
    }
}

/// Result of a successful write call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Lines were posted.
    Written { lines: usize },
    /// Every point filtered away; no request was made.
    Nothing,
}

/// HTTP client for line protocol writes.
///
/// One POST per call, no retry; retry policy belongs to the caller. Timeouts
/// are left to the transport's defaults.
#[derive(Clone)]
pub struct WriteClient {
    http: Client,
}

impl WriteClient {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    /// Encode and POST a batch of points.
    ///
    /// Unencodable points are dropped; if no lines survive, returns
    /// [`WriteOutcome::Nothing`] without touching the network.
    pub async fn write(&self, target: &WriteTarget, points: &[DataPoint]) -> Result<WriteOutcome, WriteError> {
        let body = encode_batch(points);
        if body.is_empty() {
            debug!("write skipped: no encodable points");
            return Ok(WriteOutcome::Nothing);
        }
        let lines = body.lines().count();

        let response = self
            .http
            .post(target.write_url())
            .header("Authorization", format!("Token {}", target.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WriteError::Upstream {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body: truncate_body(&body),
            });
        }

        debug!("wrote {} lines to {}", lines, target.url);
        Ok(WriteOutcome::Written { lines })
    }
}

impl Default for WriteClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Cap an upstream response body at [`ERROR_BODY_LIMIT`] characters,
/// marking truncation with an ellipsis.
pub fn truncate_body(body: &str) -> String {
    if body.chars().count() <= ERROR_BODY_LIMIT {
        body.to_string()
    } else {
        let mut capped: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        capped.push('…');
        capped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::DataPoint;

    #[test]
    fn test_write_url_appends_precision() {
        let target = WriteTarget::new("https://db.example/write", "t");
        assert_eq!(target.write_url(), "https://db.example/write?precision=ms");
    }

    #[test]
    fn test_write_url_appends_to_existing_query() {
        let target = WriteTarget::new("https://db.example/write?db=tasks", "t");
        assert_eq!(target.write_url(), "https://db.example/write?db=tasks&precision=ms");
    }

    #[test]
    fn test_write_url_respects_existing_precision() {
        let target = WriteTarget::new("https://db.example/write?precision=s", "t");
        assert_eq!(target.write_url(), "https://db.example/write?precision=s");
    }

    #[test]
    fn test_truncate_body_short_passthrough() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn test_truncate_body_caps_long_responses() {
        let long = "x".repeat(2000);
        let capped = truncate_body(&long);
        assert_eq!(capped.chars().count(), ERROR_BODY_LIMIT + 1);
        assert!(capped.ends_with('…'));
    }

    #[tokio::test]
    async fn test_write_empty_batch_makes_no_request() {
        // The bogus target would fail instantly if a request were attempted.
        let client = WriteClient::new();
        let target = WriteTarget::new("http://127.0.0.1:1/write", "t");
        let outcome = client.write(&target, &[]).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Nothing);
    }

    #[tokio::test]
    async fn test_write_unencodable_points_make_no_request() {
        let client = WriteClient::new();
        let target = WriteTarget::new("http://127.0.0.1:1/write", "t");
        let points = vec![DataPoint::new("m", 1).tag("only", "tags")];
        let outcome = client.write(&target, &points).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Nothing);
    }
}
