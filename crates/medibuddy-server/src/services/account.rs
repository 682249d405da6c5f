//! Account service: signup, login and profile management.
//!
//! User rows are reached through [`UserStore`] so the service can run
//! against PostgreSQL or an in-memory store.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{Identity, PasswordHasher, TokenIssuer};
use crate::db::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, PersonalInfo, PersonalInfoRequest,
    SignupRequest, UpdateProfileRequest, UserEntry, UserResponse,
};
use crate::db::queries::user as queries;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const DUPLICATE_EMAIL: &str = "User with this email already exists";

/// Hashed at startup; login checks unknown emails against it.
const DUMMY_PASSWORD: &str = "medibuddy-unknown-account";

/// Persistence of user rows.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserEntry>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserEntry>>;

    /// Insert a user. A taken email surfaces as the database's unique violation.
    async fn insert(&self, name: &str, email: &str, password_hash: &str) -> AppResult<UserEntry>;

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<UserEntry>>;

    /// Overwrite every personal field at once or none of them.
    async fn update_personal_info(
        &self,
        id: Uuid,
        info: &PersonalInfo,
    ) -> AppResult<Option<UserEntry>>;

    /// Returns false when the user does not exist.
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool>;
}

/// PostgreSQL-backed store over the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserEntry>> {
        queries::get_user_by_email(&self.pool, email).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserEntry>> {
        queries::get_user_by_id(&self.pool, id).await
    }

    async fn insert(&self, name: &str, email: &str, password_hash: &str) -> AppResult<UserEntry> {
        queries::insert_user(&self.pool, name, email, password_hash).await
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<UserEntry>> {
        queries::update_user_name(&self.pool, id, name).await
    }

    async fn update_personal_info(
        &self,
        id: Uuid,
        info: &PersonalInfo,
    ) -> AppResult<Option<UserEntry>> {
        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool.begin().await?;
        let entry = queries::update_personal_info(&mut *tx, id, info).await?;
        if entry.is_some() {
            tx.commit().await?;
        }
        Ok(entry)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        queries::update_password_hash(&self.pool, id, password_hash).await
    }
}

/// Service for account operations.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    issuer: Arc<TokenIssuer>,
    dummy_digest: Arc<str>,
}

impl AccountService {
    /// Create a new account service.
    ///
    /// # Errors
    ///
    /// Fails if the hasher cannot produce the placeholder digest.
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        issuer: Arc<TokenIssuer>,
    ) -> AppResult<Self> {
        let dummy_digest = hasher.hash(DUMMY_PASSWORD)?.into();
        Ok(Self {
            store,
            hasher,
            issuer,
            dummy_digest,
        })
    }

    /// Register a new user and issue their first token.
    pub async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse> {
        let name = request.name.trim();
        let email = normalize_email(&request.email);
        validate_signup(name, &email, &request.password)?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let digest = self.hash_password(request.password).await?;
        let entry = self
            .store
            .insert(name, &email, &digest)
            .await
            .map_err(map_unique_violation)?;

        tracing::info!(user_id = %entry.id, "User registered");
        self.authenticated(entry)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        let Some(entry) = self.store.find_by_email(&email).await? else {
            // Same hashing cost as a known account.
            self.verify_password(request.password, self.dummy_digest.to_string())
                .await?;
            tracing::debug!("Login attempt for unknown email");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        };

        if !self
            .verify_password(request.password, entry.password_hash.clone())
            .await?
        {
            tracing::debug!(user_id = %entry.id, "Login attempt with wrong password");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        tracing::info!(user_id = %entry.id, "User logged in");
        self.authenticated(entry)
    }

    /// Current user's profile.
    pub async fn profile(&self, identity: &Identity) -> AppResult<UserResponse> {
        Ok(self.load(identity).await?.into())
    }

    /// Change the display name.
    pub async fn update_profile(
        &self,
        identity: &Identity,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        self.store
            .update_name(identity.user_id(), name)
            .await?
            .map(UserResponse::from)
            .ok_or_else(user_not_found)
    }

    /// Replace personal information atomically.
    pub async fn update_personal_info(
        &self,
        identity: &Identity,
        request: PersonalInfoRequest,
    ) -> AppResult<UserResponse> {
        let info = parse_personal_info(request)?;

        let entry = self
            .store
            .update_personal_info(identity.user_id(), &info)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!(user_id = %identity, "Personal information updated");
        Ok(entry.into())
    }

    /// Change the password after re-checking the current one.
    pub async fn change_password(
        &self,
        identity: &Identity,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        if request.new_password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let entry = self.load(identity).await?;
        if !self
            .verify_password(request.current_password, entry.password_hash)
            .await?
        {
            return Err(AppError::Auth("Current password is incorrect".to_string()));
        }

        let digest = self.hash_password(request.new_password).await?;
        if !self
            .store
            .update_password_hash(identity.user_id(), &digest)
            .await?
        {
            return Err(user_not_found());
        }

        tracing::info!(user_id = %identity, "Password changed");
        Ok(())
    }

    async fn load(&self, identity: &Identity) -> AppResult<UserEntry> {
        self.store
            .find_by_id(identity.user_id())
            .await?
            .ok_or_else(user_not_found)
    }

    fn authenticated(&self, entry: UserEntry) -> AppResult<AuthResponse> {
        let token = self.issuer.issue(entry.id)?;
        Ok(AuthResponse {
            user: entry.into(),
            token,
        })
    }

    async fn hash_password(&self, password: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, digest: String) -> AppResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
    }
}

/// Turn a unique-constraint violation into `Conflict`; other errors pass through.
pub(crate) fn map_unique_violation(err: AppError) -> AppError {
    match err {
        AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            AppError::Conflict(DUPLICATE_EMAIL.to_string())
        }
        other => other,
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_signup(name: &str, email: &str, password: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Validate personal information. An empty `birthDate` clears the stored date.
pub fn parse_personal_info(request: PersonalInfoRequest) -> AppResult<PersonalInfo> {
    let birth_date = match request.birth_date.trim() {
        "" => None,
        raw => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::Validation("Invalid birthDate format, expected YYYY-MM-DD".to_string())
        })?),
    };

    Ok(PersonalInfo {
        gender: request.gender,
        birth_date,
        height: request.height,
        weight: request.weight,
        ethnicity: request.ethnicity,
        country: request.country,
    })
}
