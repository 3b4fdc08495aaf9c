use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::{QueryBuilder, Sqlite};

use crate::db::models::Smartlink;
use crate::db::{DbPool, patch};
use crate::error::ApiError;

const SMARTLINK_FIELDS: &[&str] = &[
    "release_name",
    "artists",
    "cover_url",
    "upc",
    "status",
    "rejection_reason",
    "smartlink_url",
];

#[derive(Debug, Deserialize)]
pub struct SmartlinkFilter {
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewSmartlink {
    pub user_id: Option<i64>,
    pub release_name: Option<String>,
    pub artists: Option<String>,
    pub cover_url: Option<String>,
    pub upc: Option<String>,
    pub status: Option<String>,
}

pub async fn list_smartlinks(
    State(pool): State<DbPool>,
    Query(filter): Query<SmartlinkFilter>,
) -> Result<Json<Value>, ApiError> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM smartlinks WHERE 1=1");
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    qb.push(" ORDER BY created_at DESC");

    let smartlinks = qb.build_query_as::<Smartlink>().fetch_all(&pool).await?;
    Ok(Json(json!({ "smartlinks": smartlinks })))
}

pub async fn get_smartlink(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let smartlink = sqlx::query_as::<_, Smartlink>("SELECT * FROM smartlinks WHERE id = ?")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Smartlink not found".to_string()))?;

    Ok(Json(json!({ "smartlink": smartlink })))
}

pub async fn create_smartlink(
    State(pool): State<DbPool>,
    Json(req): Json<NewSmartlink>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(user_id), Some(release_name), Some(artists)) =
        (req.user_id, req.release_name, req.artists)
    else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    let now = chrono::Utc::now().timestamp();
    let smartlink = sqlx::query_as::<_, Smartlink>(
        r#"
        INSERT INTO smartlinks (user_id, release_name, artists, cover_url, upc,
                                status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&release_name)
    .bind(&artists)
    .bind(&req.cover_url)
    .bind(&req.upc)
    .bind(req.status.as_deref().unwrap_or("on_moderation"))
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "smartlink": smartlink }))))
}

pub async fn update_smartlink(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let mut qb = patch::build_update("smartlinks", SMARTLINK_FIELDS, &body, id)?;
    let smartlink = qb
        .build_query_as::<Smartlink>()
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Smartlink not found".to_string()))?;

    Ok(Json(json!({ "smartlink": smartlink })))
}
