//! Snippet retrieval for a question.

use async_trait::async_trait;

use super::retry::RetryPolicy;
use super::types::{RetrievalRequest, RetrievalResponse, RetrievedContext};
use super::upstream::UpstreamClient;
use crate::error::AppResult;

/// Finds text snippets relevant to a question.
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// All-or-nothing: either every snippet or an error.
    async fn retrieve(&self, question: &str) -> AppResult<RetrievedContext>;
}

/// Retriever backed by the HTTP retrieval service (`POST {query}` → `{texts}`).
#[derive(Clone)]
pub struct HttpContextRetriever {
    upstream: UpstreamClient,
}

impl HttpContextRetriever {
    pub fn new(client: reqwest::Client, url: &str, retry: RetryPolicy) -> Self {
        Self {
            upstream: UpstreamClient::new(client, url, "retrieval", retry),
        }
    }
}

#[async_trait]
impl ContextRetriever for HttpContextRetriever {
    async fn retrieve(&self, question: &str) -> AppResult<RetrievedContext> {
        let request = RetrievalRequest {
            query: question.to_string(),
        };
        let response: RetrievalResponse = self.upstream.post_json(&request).await?;

        tracing::debug!(
            url = %self.upstream.url(),
            snippets = response.texts.len(),
            "Retrieved context"
        );
        Ok(RetrievedContext {
            snippets: response.texts,
        })
    }
}
