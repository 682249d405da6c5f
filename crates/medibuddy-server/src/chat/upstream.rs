//! JSON-over-HTTP calls to the retrieval and generation services.

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};

use super::retry::{AttemptError, RetryPolicy};
use crate::error::AppResult;

/// Shared HTTP plumbing for one upstream endpoint.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    service: &'static str,
    retry: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(client: reqwest::Client, url: &str, service: &'static str, retry: RetryPolicy) -> Self {
        Self {
            client,
            url: url.to_string(),
            service,
            retry,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `body` and decode the response as `Resp`, retrying per policy.
    pub async fn post_json<Req, Resp>(&self, body: &Req) -> AppResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        self.retry
            .run(self.service, || self.attempt::<Req, Resp>(body))
            .await
    }

    async fn attempt<Req, Resp>(&self, body: &Req) -> Result<Resp, AttemptError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| AttemptError::Transient(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AttemptError::Transient(format!("failed to read body: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AttemptError::Permanent(format!("unexpected response shape: {}", e)))
    }
}

fn classify_status(status: StatusCode, body: &str) -> AttemptError {
    let message = format!("status {}: {}", status, truncate(body, 200));
    if status.is_server_error() {
        AttemptError::Transient(message)
    } else {
        AttemptError::Permanent(message)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            AttemptError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "Missing required fields"),
            AttemptError::Permanent(_)
        ));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
