use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::{hash_password, verify_password};
use crate::db::models::{User, UserProfile};
use crate::db::{DbPool, patch};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    pub user_id: Option<i64>,
    pub theme: Option<String>,
}

pub async fn register(
    State(pool): State<DbPool>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(email), Some(username), Some(password)) = (req.email, req.username, req.password)
    else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    let password_hash = hash_password(&password)?;
    let now = chrono::Utc::now().timestamp();

    let user = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO users (email, username, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, email, username, role, theme
        "#,
    )
    .bind(&email)
    .bind(&username)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::Conflict("User already exists".to_string())
        }
        _ => ApiError::Db(e),
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

pub async fn login(
    State(pool): State<DbPool>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(ApiError::BadRequest("Missing email or password".to_string()));
    };

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&pool)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(Json(json!({ "user": UserProfile::from(user) })))
}

pub async fn update_profile(
    State(pool): State<DbPool>,
    Json(req): Json<ProfileUpdate>,
) -> Result<Json<Value>, ApiError> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::BadRequest("Missing user_id".to_string()))?;

    // The caller sends a plaintext password; it is re-hashed before it
    // reaches the update clause. Empty strings count as absent.
    let mut fields = serde_json::Map::new();
    if let Some(email) = req.email.filter(|e| !e.is_empty()) {
        fields.insert("email".to_string(), Value::String(email));
    }
    if let Some(password) = req.password.filter(|p| !p.is_empty()) {
        fields.insert(
            "password_hash".to_string(),
            Value::String(hash_password(&password)?),
        );
    }

    let mut qb = patch::build_update("users", &["email", "password_hash"], &fields, user_id)?;
    let user = qb
        .build_query_as::<UserProfile>()
        .fetch_optional(&pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::Conflict("User already exists".to_string())
            }
            _ => ApiError::Db(e),
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "user": user })))
}

pub async fn update_theme(
    State(pool): State<DbPool>,
    Json(req): Json<ThemeUpdate>,
) -> Result<Json<Value>, ApiError> {
    let (Some(user_id), Some(theme)) = (req.user_id, req.theme) else {
        return Err(ApiError::BadRequest("Missing user_id or theme".to_string()));
    };

    let now = chrono::Utc::now().timestamp();
    let user = sqlx::query_as::<_, UserProfile>(
        r#"
        UPDATE users SET theme = ?, updated_at = ?
        WHERE id = ?
        RETURNING id, email, username, role, theme
        "#,
    )
    .bind(&theme)
    .bind(now)
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "user": user })))
}
