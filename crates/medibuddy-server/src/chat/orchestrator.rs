//! The chat pipeline: retrieve and assemble, then generate.

use std::fmt;
use std::sync::Arc;

use super::generator::AnswerGenerator;
use super::health_context::HealthContextAssembler;
use super::retriever::ContextRetriever;
use super::types::{ChatQuery, GeneratedAnswer};
use crate::auth::Identity;
use crate::error::{AppError, AppResult};

/// Pipeline stage, reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStage {
    Authorizing,
    Retrieving,
    Assembling,
    Generating,
    Done,
}

impl fmt::Display for ChatStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChatStage::Authorizing => "authorizing",
            ChatStage::Retrieving => "retrieving",
            ChatStage::Assembling => "assembling",
            ChatStage::Generating => "generating",
            ChatStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs one chat request end to end. Holds no per-request state.
#[derive(Clone)]
pub struct ChatOrchestrator {
    retriever: Arc<dyn ContextRetriever>,
    assembler: HealthContextAssembler,
    generator: Arc<dyn AnswerGenerator>,
}

impl ChatOrchestrator {
    pub fn new(
        retriever: Arc<dyn ContextRetriever>,
        assembler: HealthContextAssembler,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            retriever,
            assembler,
            generator,
        }
    }

    /// Answer `query` for `identity`.
    ///
    /// Retrieval and record assembly run concurrently; generation starts
    /// only after both succeed. The first failure aborts the pipeline and is
    /// returned unchanged.
    pub async fn handle(&self, identity: &Identity, query: ChatQuery) -> AppResult<GeneratedAnswer> {
        tracing::debug!(user_id = %identity, stage = %ChatStage::Authorizing, "Chat request");

        let question = query.question.as_str();
        if question.trim().is_empty() {
            return Err(fail(
                ChatStage::Authorizing,
                AppError::Validation("Question must not be empty".to_string()),
            ));
        }

        let retrieval = async {
            tracing::debug!(user_id = %identity, stage = %ChatStage::Retrieving, "Chat stage");
            self.retriever
                .retrieve(question)
                .await
                .map_err(|e| (ChatStage::Retrieving, e))
        };
        let assembly = async {
            tracing::debug!(user_id = %identity, stage = %ChatStage::Assembling, "Chat stage");
            self.assembler
                .assemble(identity)
                .await
                .map_err(|e| (ChatStage::Assembling, e))
        };
        let (context, health_context) =
            tokio::try_join!(retrieval, assembly).map_err(|(stage, e)| fail(stage, e))?;

        tracing::debug!(
            user_id = %identity,
            stage = %ChatStage::Generating,
            snippets = context.snippets.len(),
            "Chat stage"
        );
        let answer = self
            .generator
            .generate(question, &context.snippets, &health_context)
            .await
            .map_err(|e| fail(ChatStage::Generating, e))?;

        tracing::info!(user_id = %identity, stage = %ChatStage::Done, "Chat request answered");
        Ok(answer)
    }
}

fn fail(stage: ChatStage, error: AppError) -> AppError {
    tracing::warn!(failed_stage = %stage, error = %error, "Chat pipeline failed");
    error
}
