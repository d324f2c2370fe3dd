//! Authentication API endpoints
//!
//! Provides register, login, and user info endpoints for JWT-based
//! authentication.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let hash = state.password_hasher.hash(&request.password)?;
    let user = state.users.create(User::new(request.email, hash)).await?;

    info!(user_id = %user.id(), "registered new user");

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Login with email and password
///
/// POST /auth/login
///
/// Returns a JWT token on successful authentication.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !state
        .password_hasher
        .verify(&request.password, user.password_hash())
    {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = state.jwt_service.generate(&user)?;
    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from_user(&user),
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// Get current authenticated user
///
/// GET /auth/me
pub async fn get_current_user(
    RequireUser(user): RequireUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from_user(&user)))
}
