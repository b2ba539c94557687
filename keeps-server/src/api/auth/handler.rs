//! Authentication handlers
//!
//! Registration and login. Login failures use one unified error message so
//! usernames cannot be enumerated.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppError;
use crate::api::convert::record_id_to_string;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate};
use crate::db::repository::UserRepository;
use crate::utils::AppResult;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_ref().map(record_id_to_string).unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_staff: user.is_staff,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/register - create a storefront account
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserInfo>> {
    payload.validate()?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.register(payload).await?;

    tracing::info!(username = %user.username, "user registered");
    Ok(Json(UserInfo::from(&user)))
}

/// POST /api/auth/login - authenticate and issue a JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_username(&req.username).await?;

    // Fixed delay before checking the result, to keep timing uniform
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                tracing::warn!(username = %req.username, "login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(username = %req.username, "login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(record_id_to_string).unwrap_or_default();
    let token = state
        .jwt_service
        .generate_token(&user_id, &user.username, user.is_staff)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(username = %user.username, "login succeeded");
    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&user),
    }))
}
