use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite};

use crate::db::models::{PlatformAccount, PromoRelease, Video};
use crate::db::{DbPool, patch};
use crate::error::ApiError;

/// Moderated fields shared by all three studio tables.
const STUDIO_FIELDS: &[&str] = &["status", "rejection_reason"];

/// The `type` query parameter selects one of three independently-shaped
/// tables. The table name is re-derived from it on every call; an
/// unrecognized value fails before any query is issued.
#[derive(Debug, Clone, Copy)]
enum StudioKind {
    Promo,
    Video,
    Platform,
}

impl StudioKind {
    fn from_param(param: Option<&str>) -> Result<Self, ApiError> {
        match param {
            Some("promo") => Ok(Self::Promo),
            Some("video") => Ok(Self::Video),
            Some("platform") => Ok(Self::Platform),
            _ => Err(ApiError::BadRequest(
                "Missing or invalid type parameter".to_string(),
            )),
        }
    }

    fn table(self) -> &'static str {
        match self {
            Self::Promo => "promo_releases",
            Self::Video => "videos",
            Self::Platform => "platform_accounts",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Promo => "promo",
            Self::Video => "video",
            Self::Platform => "platform",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Self::Promo => "promos",
            Self::Video => "videos",
            Self::Platform => "platforms",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StudioQuery {
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewPromo {
    user_id: Option<i64>,
    upc: Option<String>,
    release_description: Option<String>,
    key_track_isrc: Option<String>,
    key_track_name: Option<String>,
    key_track_description: Option<String>,
    artists: Option<String>,
    smartlink_url: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewVideo {
    user_id: Option<i64>,
    video_url: Option<String>,
    name: Option<String>,
    artist: Option<String>,
    cover_url: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewPlatform {
    user_id: Option<i64>,
    platform_name: Option<String>,
    artist_name: Option<String>,
    links: Option<Value>,
    status: Option<String>,
}

fn envelope(key: &str, value: Value) -> Json<Value> {
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), value);
    Json(Value::Object(body))
}

pub async fn list_studio(
    State(pool): State<DbPool>,
    Query(query): Query<StudioQuery>,
) -> Result<Json<Value>, ApiError> {
    let kind = StudioKind::from_param(query.entity_type.as_deref())?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {} WHERE 1=1", kind.table()));
    if let Some(user_id) = query.user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
    }
    qb.push(" ORDER BY created_at DESC");

    let entities = match kind {
        StudioKind::Promo => {
            serde_json::to_value(qb.build_query_as::<PromoRelease>().fetch_all(&pool).await?)?
        }
        StudioKind::Video => {
            serde_json::to_value(qb.build_query_as::<Video>().fetch_all(&pool).await?)?
        }
        StudioKind::Platform => {
            serde_json::to_value(qb.build_query_as::<PlatformAccount>().fetch_all(&pool).await?)?
        }
    };

    Ok(envelope(kind.plural(), entities))
}

pub async fn get_studio_entity(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Query(query): Query<StudioQuery>,
) -> Result<Json<Value>, ApiError> {
    let kind = StudioKind::from_param(query.entity_type.as_deref())?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {} WHERE id = ", kind.table()));
    qb.push_bind(id);

    let entity = fetch_one(&pool, kind, &mut qb).await?;
    Ok(envelope(kind.key(), entity))
}

pub async fn create_studio_entity(
    State(pool): State<DbPool>,
    Query(query): Query<StudioQuery>,
    Json(body): Json<serde_json::Map<String, Value>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let kind = StudioKind::from_param(query.entity_type.as_deref())?;
    let now = chrono::Utc::now().timestamp();

    let entity = match kind {
        StudioKind::Promo => {
            let req: NewPromo = serde_json::from_value(Value::Object(body))?;
            let user_id = req
                .user_id
                .ok_or_else(|| ApiError::BadRequest("Missing user_id".to_string()))?;
            let promo = sqlx::query_as::<_, PromoRelease>(
                r#"
                INSERT INTO promo_releases (user_id, upc, release_description,
                                            key_track_isrc, key_track_name,
                                            key_track_description, artists,
                                            smartlink_url, status,
                                            created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(&req.upc)
            .bind(&req.release_description)
            .bind(&req.key_track_isrc)
            .bind(&req.key_track_name)
            .bind(&req.key_track_description)
            .bind(&req.artists)
            .bind(&req.smartlink_url)
            .bind(req.status.as_deref().unwrap_or("on_moderation"))
            .bind(now)
            .bind(now)
            .fetch_one(&pool)
            .await?;
            serde_json::to_value(promo)?
        }
        StudioKind::Video => {
            let req: NewVideo = serde_json::from_value(Value::Object(body))?;
            let user_id = req
                .user_id
                .ok_or_else(|| ApiError::BadRequest("Missing user_id".to_string()))?;
            let video = sqlx::query_as::<_, Video>(
                r#"
                INSERT INTO videos (user_id, video_url, name, artist, cover_url,
                                    status, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(&req.video_url)
            .bind(&req.name)
            .bind(&req.artist)
            .bind(&req.cover_url)
            .bind(req.status.as_deref().unwrap_or("on_moderation"))
            .bind(now)
            .bind(now)
            .fetch_one(&pool)
            .await?;
            serde_json::to_value(video)?
        }
        StudioKind::Platform => {
            let req: NewPlatform = serde_json::from_value(Value::Object(body))?;
            let user_id = req
                .user_id
                .ok_or_else(|| ApiError::BadRequest("Missing user_id".to_string()))?;
            let links = match &req.links {
                Some(value) => Some(serde_json::to_string(value)?),
                None => None,
            };
            let account = sqlx::query_as::<_, PlatformAccount>(
                r#"
                INSERT INTO platform_accounts (user_id, platform_name, artist_name,
                                               links, status, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(&req.platform_name)
            .bind(&req.artist_name)
            .bind(links)
            .bind(req.status.as_deref().unwrap_or("on_moderation"))
            .bind(now)
            .bind(now)
            .fetch_one(&pool)
            .await?;
            serde_json::to_value(account)?
        }
    };

    Ok((StatusCode::CREATED, envelope(kind.key(), entity)))
}

pub async fn update_studio_entity(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Query(query): Query<StudioQuery>,
    Json(body): Json<serde_json::Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let kind = StudioKind::from_param(query.entity_type.as_deref())?;

    let mut qb = patch::build_update(kind.table(), STUDIO_FIELDS, &body, id)?;
    let entity = fetch_one(&pool, kind, &mut qb).await?;
    Ok(envelope(kind.key(), entity))
}

/// Runs a query expected to yield a single row of the kind's table and
/// serializes it, mapping an empty result to 404.
async fn fetch_one(
    pool: &DbPool,
    kind: StudioKind,
    qb: &mut QueryBuilder<'static, Sqlite>,
) -> Result<Value, ApiError> {
    let entity = match kind {
        StudioKind::Promo => qb
            .build_query_as::<PromoRelease>()
            .fetch_optional(pool)
            .await?
            .map(serde_json::to_value),
        StudioKind::Video => qb
            .build_query_as::<Video>()
            .fetch_optional(pool)
            .await?
            .map(serde_json::to_value),
        StudioKind::Platform => qb
            .build_query_as::<PlatformAccount>()
            .fetch_optional(pool)
            .await?
            .map(serde_json::to_value),
    };
    entity
        .ok_or_else(|| ApiError::NotFound("Entity not found".to_string()))?
        .map_err(ApiError::from)
}
