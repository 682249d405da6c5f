//! In-memory doubles for unit tests.

use async_trait::async_trait;
use sqlx::error::DatabaseError;
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::chat::types::{GenerationRequest, RetrievedContext};
use crate::chat::{AnswerGenerator, ContextRetriever, GeneratedAnswer, RetryPolicy};
use crate::db::models::{HealthRecord, PersonalInfo, UserEntry};
use crate::error::{AppError, AppResult};
use crate::services::{HealthRecordStore, UserStore};

/// Health record store kept in a vector.
#[derive(Default)]
pub struct MemoryHealthRecordStore {
    records: Mutex<Vec<HealthRecord>>,
    deleted: AtomicU64,
    fail: bool,
}

impl MemoryHealthRecordStore {
    /// A store whose every call fails like an unreachable database.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn seed(&self, owner: Uuid, data: Value) -> HealthRecord {
        let record = HealthRecord {
            id: Uuid::new_v4(),
            user_id: owner,
            data,
        };
        self.records.lock().unwrap().push(record.clone());
        record
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    /// Total rows removed by `delete_owned`.
    pub fn deleted_rows(&self) -> u64 {
        self.deleted.load(Ordering::SeqCst)
    }

    fn check(&self) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl HealthRecordStore for MemoryHealthRecordStore {
    async fn insert(&self, owner: Uuid, data: &Value) -> AppResult<HealthRecord> {
        self.check()?;
        Ok(self.seed(owner, data.clone()))
    }

    async fn list_by_owner(&self, owner: Uuid) -> AppResult<Vec<HealthRecord>> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.user_id == owner)
            .cloned()
            .collect())
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> AppResult<u64> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| !(record.id == id && record.user_id == owner));
        let removed = (before - records.len()) as u64;
        self.deleted.fetch_add(removed, Ordering::SeqCst);
        Ok(removed)
    }
}

/// Database error reporting a unique-constraint violation.
#[derive(Debug)]
struct UniqueViolation;

impl fmt::Display for UniqueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for UniqueViolation {}

impl DatabaseError for UniqueViolation {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint \"users_email_key\""
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        sqlx::error::ErrorKind::UniqueViolation
    }
}

/// The error Postgres returns for a duplicate email.
pub fn unique_violation() -> AppError {
    AppError::Database(sqlx::Error::Database(Box::new(UniqueViolation)))
}

/// User store kept in a vector; emails are unique like in the `users` table.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<UserEntry>>,
    stale_lookups: bool,
    fail_updates: AtomicBool,
}

impl MemoryUserStore {
    /// Email lookups miss existing rows, as when two signups race.
    pub fn with_stale_lookups() -> Self {
        Self {
            stale_lookups: true,
            ..Self::default()
        }
    }

    /// Make every later update fail before anything is written.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn password_hash(&self, id: Uuid) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .map(|user| user.password_hash.clone())
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut UserEntry)) -> AppResult<Option<UserEntry>> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        apply(user);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserEntry>> {
        if self.stale_lookups {
            return Ok(None);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserEntry>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn insert(&self, name: &str, email: &str, password_hash: &str) -> AppResult<UserEntry> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|user| user.email == email) {
            return Err(unique_violation());
        }
        let now = Utc::now();
        let entry = UserEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            gender: None,
            birth_date: None,
            height: None,
            weight: None,
            ethnicity: None,
            country: None,
            created_at: now,
            updated_at: now,
        };
        users.push(entry.clone());
        Ok(entry)
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<UserEntry>> {
        self.update(id, |user| user.name = name.to_string())
    }

    async fn update_personal_info(
        &self,
        id: Uuid,
        info: &PersonalInfo,
    ) -> AppResult<Option<UserEntry>> {
        self.update(id, |user| {
            user.gender = Some(info.gender.clone());
            user.birth_date = info.birth_date;
            user.height = Some(info.height);
            user.weight = Some(info.weight);
            user.ethnicity = Some(info.ethnicity.clone());
            user.country = Some(info.country.clone());
        })
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        Ok(self
            .update(id, |user| user.password_hash = password_hash.to_string())?
            .is_some())
    }
}

/// Retriever returning fixed snippets and remembering every question.
pub struct StubRetriever {
    snippets: Option<Vec<String>>,
    questions: Mutex<Vec<String>>,
}

impl StubRetriever {
    pub fn answering(snippets: &[&str]) -> Self {
        Self {
            snippets: Some(snippets.iter().map(|s| s.to_string()).collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            snippets: None,
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextRetriever for StubRetriever {
    async fn retrieve(&self, question: &str) -> AppResult<RetrievedContext> {
        self.questions.lock().unwrap().push(question.to_string());
        match &self.snippets {
            Some(snippets) => Ok(RetrievedContext {
                snippets: snippets.clone(),
            }),
            None => Err(AppError::Upstream("retrieval: connection refused".to_string())),
        }
    }
}

/// Generator returning a fixed answer and recording every request.
pub struct RecordingGenerator {
    answer: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
    calls: AtomicUsize,
}

impl RecordingGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerGenerator for RecordingGenerator {
    async fn generate(
        &self,
        question: &str,
        snippets: &[String],
        health_context: &str,
    ) -> AppResult<GeneratedAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(GenerationRequest {
            user_query: question.to_string(),
            relevant_text: snippets.to_vec(),
            health_data: health_context.to_string(),
        });
        match &self.answer {
            Some(text) => Ok(GeneratedAnswer {
                generated_text: text.clone(),
            }),
            None => Err(AppError::Upstream("generation: status 500".to_string())),
        }
    }
}

/// Retry policy with millisecond backoff and a single retry.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(
        Duration::from_secs(2),
        1,
        Duration::from_millis(1),
        Duration::from_millis(2),
    )
}

/// Serve `app` on an ephemeral local port; returns its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
