//! Account API handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Serialize;

use super::MessageResponse;
use crate::auth::Identity;
use crate::db::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, PersonalInfoRequest, SignupRequest,
    UpdateProfileRequest, UserResponse,
};
use crate::error::AppResult;
use crate::services::AccountService;

/// Cookie that clears a browser-held token.
const CLEAR_TOKEN_COOKIE: &str = "token=; Path=/; Max-Age=0; HttpOnly";

/// Response after updating personal information.
#[derive(Debug, Serialize)]
pub struct PersonalInfoResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Register a new account.
///
/// `POST /api/signup`
///
/// # Request Body
///
/// ```json
/// {"name": "Ada", "email": "ada@example.com", "password": "secret1"}
/// ```
///
/// # Response
///
/// `201 Created` with `{"user": {...}, "token": "<jwt>"}`; `409` if the
/// email is taken.
pub async fn signup(
    State(service): State<AccountService>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let Json(request) = payload?;
    let response = service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password.
///
/// `POST /api/login`
pub async fn login(
    State(service): State<AccountService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(request) = payload?;
    Ok(Json(service.login(request).await?))
}

/// Clear the token cookie.
///
/// `POST /api/logout`
///
/// Tokens are stateless; one that was copied elsewhere stays valid until it
/// expires.
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, CLEAR_TOKEN_COOKIE)]),
        Json(MessageResponse::new("Successfully logged out")),
    )
}

/// `GET /api/profile`
pub async fn profile(
    State(service): State<AccountService>,
    identity: Identity,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(service.profile(&identity).await?))
}

/// `PUT /api/profile`
pub async fn update_profile(
    State(service): State<AccountService>,
    identity: Identity,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Json(request) = payload?;
    Ok(Json(service.update_profile(&identity, request).await?))
}

/// Update personal information.
///
/// `POST /api/user/update`
///
/// # Request Body
///
/// ```json
/// {
///   "gender": "female",
///   "birthDate": "1990-04-01",
///   "height": 170,
///   "weight": 60,
///   "ethnicity": "",
///   "country": "NZ"
/// }
/// ```
///
/// An empty `birthDate` clears the stored date.
pub async fn update_personal_info(
    State(service): State<AccountService>,
    identity: Identity,
    payload: Result<Json<PersonalInfoRequest>, JsonRejection>,
) -> AppResult<Json<PersonalInfoResponse>> {
    let Json(request) = payload?;
    let user = service.update_personal_info(&identity, request).await?;
    Ok(Json(PersonalInfoResponse {
        message: "Personal information updated successfully".to_string(),
        user,
    }))
}

/// `PUT /api/user/password`
pub async fn change_password(
    State(service): State<AccountService>,
    identity: Identity,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(request) = payload?;
    service.change_password(&identity, request).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
