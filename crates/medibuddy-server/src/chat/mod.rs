//! Health-aware chat.
//!
//! A question is answered in three steps: snippets are fetched from the
//! retrieval service while the caller's health records are loaded, then both
//! are handed to the generation service.
//!
//! - [`retriever`]: [`ContextRetriever`] port and its HTTP client
//! - [`health_context`]: [`HealthContextAssembler`], the caller's records as JSON
//! - [`generator`]: [`AnswerGenerator`] port and its HTTP client
//! - [`orchestrator`]: [`ChatOrchestrator`], which sequences the above
//! - [`retry`]: per-call deadline and retry policy for upstream calls

pub mod generator;
pub mod health_context;
pub mod orchestrator;
pub mod retriever;
pub mod retry;
pub mod types;
pub mod upstream;

pub use generator::{AnswerGenerator, HttpAnswerGenerator};
pub use health_context::HealthContextAssembler;
pub use orchestrator::{ChatOrchestrator, ChatStage};
pub use retriever::{ContextRetriever, HttpContextRetriever};
pub use retry::RetryPolicy;
pub use types::{ChatQuery, GeneratedAnswer, RetrievedContext};
