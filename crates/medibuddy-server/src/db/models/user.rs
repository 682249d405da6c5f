//! User database model and account request/response shapes.
//!
//! The stored password hash never leaves this layer: responses are built
//! from [`UserResponse`], which has no hash field, and request types that
//! carry a plaintext password redact it from their `Debug` output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Row of the `users` table.
#[derive(Clone, FromRow)]
pub struct UserEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    /// Argon2id PHC digest
    #[sqlx(rename = "password")]
    pub password_hash: String,

    #[sqlx(default)]
    pub gender: Option<String>,
    #[sqlx(default)]
    pub birth_date: Option<NaiveDate>,
    #[sqlx(default)]
    pub height: Option<i32>,
    #[sqlx(default)]
    pub weight: Option<i32>,
    #[sqlx(default)]
    pub ethnicity: Option<String>,
    #[sqlx(default)]
    pub country: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub ethnicity: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntry> for UserResponse {
    fn from(entry: UserEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            email: entry.email,
            gender: entry.gender,
            birth_date: entry.birth_date,
            height: entry.height,
            weight: entry.weight,
            ethnicity: entry.ethnicity,
            country: entry.country,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// `POST /api/signup` body.
#[derive(Clone, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /api/login` body.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signup/login response.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// `PUT /api/profile` body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}

/// `POST /api/user/update` body.
///
/// `birthDate` is `YYYY-MM-DD`; an empty string clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoRequest {
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub ethnicity: String,
    #[serde(default)]
    pub country: String,
}

/// Personal information after validation, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalInfo {
    pub gender: String,
    pub birth_date: Option<NaiveDate>,
    pub height: i32,
    pub weight: i32,
    pub ethnicity: String,
    pub country: String,
}

/// `PUT /api/user/password` body.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .field("current_password", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_debug_redacts_password() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"plaintext-pw"}"#).unwrap();
        let printed = format!("{:?}", request);
        assert!(printed.contains("a@b.com"));
        assert!(!printed.contains("plaintext-pw"));
    }

    #[test]
    fn test_personal_info_request_uses_camel_case() {
        let request: PersonalInfoRequest = serde_json::from_str(
            r#"{"gender":"female","birthDate":"1990-04-01","height":170,"weight":60}"#,
        )
        .unwrap();
        assert_eq!(request.birth_date, "1990-04-01");
        assert_eq!(request.height, 170);
        assert!(request.country.is_empty());
    }

    #[test]
    fn test_user_response_has_no_password_field() {
        let now = Utc::now();
        let entry = UserEntry {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            gender: None,
            birth_date: None,
            height: None,
            weight: None,
            ethnicity: None,
            country: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(UserResponse::from(entry)).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("password").is_none());
        assert!(!json.to_string().contains("argon2id"));
        assert!(json.get("createdAt").is_some());
    }
}
