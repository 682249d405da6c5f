//! Chat pipeline values and upstream wire shapes.

use serde::{Deserialize, Serialize};

/// `POST /api/chatbot` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatQuery {
    pub question: String,
}

/// Ordered snippets returned by the retrieval service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievedContext {
    pub snippets: Vec<String>,
}

/// Final answer returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub generated_text: String,
}

/// Retrieval service request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalRequest {
    pub query: String,
}

/// Retrieval service response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResponse {
    pub texts: Vec<String>,
}

/// Generation service request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub user_query: String,
    pub relevant_text: Vec<String>,
    /// JSON array of the caller's health records, as a string
    pub health_data: String,
}

/// Generation service response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub generated_text: String,
}
