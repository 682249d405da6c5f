//! Chatbot API handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::auth::Identity;
use crate::chat::{ChatOrchestrator, ChatQuery, GeneratedAnswer};
use crate::error::AppResult;

/// Ask a question about the caller's health data.
///
/// `POST /api/chatbot`
///
/// # Request Body
///
/// ```json
/// {"question": "What does my cholesterol level mean?"}
/// ```
///
/// # Response
///
/// ```json
/// {"generated_text": "..."}
/// ```
///
/// `502` when the retrieval or generation service fails.
pub async fn ask(
    State(orchestrator): State<ChatOrchestrator>,
    identity: Identity,
    payload: Result<Json<ChatQuery>, JsonRejection>,
) -> AppResult<Json<GeneratedAnswer>> {
    let Json(query) = payload?;
    Ok(Json(orchestrator.handle(&identity, query).await?))
}
