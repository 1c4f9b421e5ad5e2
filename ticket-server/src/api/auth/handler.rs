//! Authentication Handlers
//!
//! Handles signup, login and profile lookup

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::api::convert::UserInfo;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{AccountStatus, Role, User, UserCreate};
use crate::db::repository::{RepoError, UserRepository};
use crate::security_log;
use crate::utils::time::now_rfc3339;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub admin_pin: Option<String>,
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(u) => u,
        None => {
            security_log!(
                "WARN",
                "login_failed",
                email = req.email.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        security_log!(
            "WARN",
            "login_failed",
            email = req.email.clone(),
            reason = "invalid_credentials"
        );
        return Err(AppError::invalid_credentials());
    }

    // Suspension blocks future logins only; existing bookings stay valid
    if !user.is_active() {
        security_log!(
            "WARN",
            "login_blocked",
            email = req.email.clone(),
            reason = "account_disabled"
        );
        return Err(AppError::forbidden(
            "Your account has been disabled. Please contact administrator.".to_string(),
        ));
    }

    if let Some(id) = user.id.clone() {
        // best effort, a failed stamp must not block the login
        let _ = repo.touch_last_login(&id, now_rfc3339()).await;
    }

    let jwt_service = state.jwt_service();
    let token = jwt_service
        .generate_token(&user.id_string(), &user.name, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(user = %user.id_string(), "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt_service.expires_in_seconds(),
        user: user.into(),
    }))
}

/// Signup handler
///
/// Creates an account and returns a token right away. The `admin` role
/// is only granted when the configured admin PIN matches.
pub async fn signup(
    State(state): State<ServerState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    if req.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters long",
        ));
    }

    let role = match req.role.as_deref() {
        Some("admin") => {
            let pin_ok = matches!(
                (&state.config.admin_signup_pin, &req.admin_pin),
                (Some(expected), Some(given)) if expected == given
            );
            if !pin_ok {
                security_log!("WARN", "admin_signup_rejected", email = email.clone());
                return Err(AppError::forbidden("Invalid admin PIN".to_string()));
            }
            Role::Admin
        }
        _ => Role::Customer,
    };

    let password = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let repo = UserRepository::new(state.db.clone());
    let user = match repo
        .create(UserCreate {
            name,
            email,
            password,
            role,
            account_status: AccountStatus::Active,
            phone: String::new(),
            address: String::new(),
            profile_image: String::new(),
            last_login: None,
            created_at: now_rfc3339(),
        })
        .await
    {
        Ok(user) => user,
        // unique email index is the duplicate authority
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::conflict("User already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    let jwt_service = state.jwt_service();
    let token = jwt_service
        .generate_token(&user.id_string(), &user.name, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(user = %user.id_string(), role = ?user.role, "Account created");

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt_service.expires_in_seconds(),
        user: user.into(),
    }))
}

/// Current user's profile
pub async fn profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<UserInfo>, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
    Ok(Json(record.into()))
}
