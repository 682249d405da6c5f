//! Answer generation from question, snippets and health context.

use async_trait::async_trait;

use super::retry::RetryPolicy;
use super::types::{GeneratedAnswer, GenerationRequest, GenerationResponse};
use super::upstream::UpstreamClient;
use crate::error::AppResult;

/// Produces the final answer text.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(
        &self,
        question: &str,
        snippets: &[String],
        health_context: &str,
    ) -> AppResult<GeneratedAnswer>;
}

/// Generator backed by the HTTP generation service.
#[derive(Clone)]
pub struct HttpAnswerGenerator {
    upstream: UpstreamClient,
}

impl HttpAnswerGenerator {
    pub fn new(client: reqwest::Client, url: &str, retry: RetryPolicy) -> Self {
        Self {
            upstream: UpstreamClient::new(client, url, "generation", retry),
        }
    }
}

#[async_trait]
impl AnswerGenerator for HttpAnswerGenerator {
    async fn generate(
        &self,
        question: &str,
        snippets: &[String],
        health_context: &str,
    ) -> AppResult<GeneratedAnswer> {
        let request = GenerationRequest {
            user_query: question.to_string(),
            relevant_text: snippets.to_vec(),
            health_data: health_context.to_string(),
        };
        let response: GenerationResponse = self.upstream.post_json(&request).await?;

        Ok(GeneratedAnswer {
            generated_text: response.generated_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::{fast_retry, spawn_upstream};
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_generate_sends_all_inputs() {
        let app = Router::new().route(
            "/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(
                    body,
                    json!({
                        "user_query": "Am I ok?",
                        "relevant_text": ["snippet"],
                        "health_data": "[]"
                    })
                );
                Json(json!({"generated_text": "You are fine"}))
            }),
        );
        let base = spawn_upstream(app).await;
        let generator = HttpAnswerGenerator::new(
            reqwest::Client::new(),
            &format!("{}/generate", base),
            fast_retry(),
        );

        let answer = generator
            .generate("Am I ok?", &["snippet".to_string()], "[]")
            .await
            .unwrap();
        assert_eq!(answer.generated_text, "You are fine");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/generate",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": "Missing required fields"})),
                    )
                }
            }),
        );
        let base = spawn_upstream(app).await;
        let generator = HttpAnswerGenerator::new(
            reqwest::Client::new(),
            &format!("{}/generate", base),
            fast_retry(),
        );

        let result = generator.generate("q", &[], "[]").await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_generated_text_is_upstream_error() {
        let app = Router::new().route(
            "/generate",
            post(|| async { Json(json!({"text": "wrong key"})) }),
        );
        let base = spawn_upstream(app).await;
        let generator = HttpAnswerGenerator::new(
            reqwest::Client::new(),
            &format!("{}/generate", base),
            fast_retry(),
        );

        assert!(matches!(
            generator.generate("q", &[], "[]").await,
            Err(AppError::Upstream(_))
        ));
    }
}
