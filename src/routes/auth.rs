use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password};
use crate::constants::EMAIL_REGEX;
use crate::error::AppError;
use crate::models::users;
use crate::Data;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserInfo,
}

fn validate_register(req: &RegisterRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name is required.".to_string()));
    }

    if !EMAIL_REGEX.is_match(&req.email).unwrap_or(false) {
        return Err(AppError::Validation(
            "a valid email address is required.".to_string(),
        ));
    }

    if req.password.chars().count() < 6 {
        return Err(AppError::Validation(
            "password must be at least 6 characters.".to_string(),
        ));
    }

    Ok(())
}

#[tracing::instrument(skip_all, fields(email = %req.email))]
pub async fn register(
    State(data): State<Data>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserInfo>, AppError> {
    validate_register(&req)?;

    let password_hash = hash_password(&req.password)?;
    let user = users::create(&data.db, req.name.trim(), &req.email, &password_hash).await?;

    tracing::info!(id = user.id, "registered new user.");

    Ok(Json(UserInfo {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}

#[tracing::instrument(skip_all, fields(email = %req.email))]
pub async fn login(
    State(data): State<Data>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = users::find_by_email(&data.db, &req.email).await?;

    // same rejection for unknown email and wrong password
    let Some(user) = user else {
        return Err(AppError::Unauthorized);
    };

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = data
        .jwt
        .create_token(user.id, &user.email, &user.name)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(SessionResponse {
        token,
        user: UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}
