use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::{QueryBuilder, Sqlite};

use crate::db::models::Ticket;
use crate::db::{DbPool, patch};
use crate::error::ApiError;

const TICKET_FIELDS: &[&str] = &["status", "moderator_response"];

#[derive(Debug, Deserialize)]
pub struct TicketFilter {
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewTicket {
    pub user_id: Option<i64>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
}

pub async fn list_tickets(
    State(pool): State<DbPool>,
    Query(filter): Query<TicketFilter>,
) -> Result<Json<Value>, ApiError> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM tickets WHERE 1=1");
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    qb.push(" ORDER BY created_at DESC");

    let tickets = qb.build_query_as::<Ticket>().fetch_all(&pool).await?;
    Ok(Json(json!({ "tickets": tickets })))
}

pub async fn get_ticket(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = ?")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(json!({ "ticket": ticket })))
}

pub async fn create_ticket(
    State(pool): State<DbPool>,
    Json(req): Json<NewTicket>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(user_id), Some(subject), Some(message)) = (req.user_id, req.subject, req.message)
    else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    let now = chrono::Utc::now().timestamp();
    let ticket = sqlx::query_as::<_, Ticket>(
        r#"
        INSERT INTO tickets (user_id, subject, message, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&subject)
    .bind(&message)
    .bind(req.status.as_deref().unwrap_or("open"))
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "ticket": ticket }))))
}

pub async fn update_ticket(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let mut qb = patch::build_update("tickets", TICKET_FIELDS, &body, id)?;
    let ticket = qb
        .build_query_as::<Ticket>()
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(json!({ "ticket": ticket })))
}
