use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::{QueryBuilder, Sqlite, Transaction};

use crate::db::models::{Release, Track};
use crate::db::{DbPool, patch};
use crate::error::ApiError;

/// Columns a release PUT may touch. `tracks` is handled separately.
const RELEASE_FIELDS: &[&str] = &[
    "album_name",
    "artists",
    "cover_url",
    "upc",
    "old_release_date",
    "is_rerelease",
    "status",
    "rejection_reason",
];

#[derive(Debug, Deserialize)]
pub struct ReleaseFilter {
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewRelease {
    pub user_id: Option<i64>,
    pub album_name: Option<String>,
    pub artists: Option<String>,
    pub cover_url: Option<String>,
    pub upc: Option<String>,
    pub old_release_date: Option<String>,
    #[serde(default)]
    pub is_rerelease: bool,
    pub status: Option<String>,
    #[serde(default)]
    pub tracks: Vec<TrackInput>,
}

#[derive(Debug, Deserialize)]
pub struct TrackInput {
    pub id: Option<i64>,
    pub track_name: Option<String>,
    pub artists: Option<String>,
    pub audio_url: Option<String>,
    pub isrc: Option<String>,
    pub version: Option<String>,
    pub musicians: Option<String>,
    pub lyricists: Option<String>,
    pub tiktok_moment: Option<String>,
    #[serde(default)]
    pub has_explicit: bool,
    #[serde(default)]
    pub has_lyrics: bool,
    pub language: Option<String>,
    pub lyrics: Option<String>,
}

pub async fn list_releases(
    State(pool): State<DbPool>,
    Query(filter): Query<ReleaseFilter>,
) -> Result<Json<Value>, ApiError> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM releases WHERE 1=1");
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    qb.push(" ORDER BY created_at DESC");

    let releases = qb.build_query_as::<Release>().fetch_all(&pool).await?;
    Ok(Json(json!({ "releases": releases })))
}

pub async fn get_release(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let release = sqlx::query_as::<_, Release>("SELECT * FROM releases WHERE id = ?")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Release not found".to_string()))?;

    let tracks = sqlx::query_as::<_, Track>(
        "SELECT * FROM tracks WHERE release_id = ? ORDER BY track_order",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let mut body = serde_json::to_value(&release)?;
    if let Value::Object(map) = &mut body {
        map.insert("tracks".to_string(), serde_json::to_value(&tracks)?);
    }
    Ok(Json(json!({ "release": body })))
}

pub async fn create_release(
    State(pool): State<DbPool>,
    Json(req): Json<NewRelease>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::BadRequest("Missing user_id".to_string()))?;

    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let release = sqlx::query_as::<_, Release>(
        r#"
        INSERT INTO releases (user_id, album_name, artists, cover_url, upc,
                              old_release_date, is_rerelease, status,
                              created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&req.album_name)
    .bind(&req.artists)
    .bind(&req.cover_url)
    .bind(&req.upc)
    .bind(&req.old_release_date)
    .bind(req.is_rerelease)
    .bind(req.status.as_deref().unwrap_or("draft"))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    // Track order is the 1-based position in the submitted array.
    for (idx, track) in req.tracks.iter().enumerate() {
        insert_track(&mut tx, release.id, track, idx as i64 + 1).await?;
    }

    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(json!({ "release": release }))))
}

pub async fn update_release(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let mut qb = patch::build_update("releases", RELEASE_FIELDS, &body, id)?;

    let mut tx = pool.begin().await?;
    let release = qb
        .build_query_as::<Release>()
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Release not found".to_string()))?;

    // Incoming tracks with an id belonging to this release are rewritten in
    // place, anything else is appended. Tracks omitted from the array stay
    // untouched.
    if let Some(tracks_value) = body.get("tracks") {
        let tracks: Vec<TrackInput> = serde_json::from_value(tracks_value.clone())?;
        let existing: Vec<i64> = sqlx::query_scalar("SELECT id FROM tracks WHERE release_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        for (idx, track) in tracks.iter().enumerate() {
            let position = idx as i64 + 1;
            match track.id {
                Some(track_id) if existing.contains(&track_id) => {
                    update_track(&mut tx, track_id, track, position).await?;
                }
                _ => insert_track(&mut tx, id, track, position).await?,
            }
        }
    }

    tx.commit().await?;
    Ok(Json(json!({ "release": release })))
}

pub async fn delete_release(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM tracks WHERE release_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM releases WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(Json(json!({ "message": "Release deleted" })))
}

async fn insert_track(
    tx: &mut Transaction<'_, Sqlite>,
    release_id: i64,
    track: &TrackInput,
    position: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tracks (release_id, track_name, artists, audio_url, isrc,
                            version, musicians, lyricists, tiktok_moment,
                            has_explicit, has_lyrics, language, lyrics, track_order)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(release_id)
    .bind(&track.track_name)
    .bind(&track.artists)
    .bind(&track.audio_url)
    .bind(&track.isrc)
    .bind(track.version.as_deref().unwrap_or("Original"))
    .bind(&track.musicians)
    .bind(&track.lyricists)
    .bind(&track.tiktok_moment)
    .bind(track.has_explicit)
    .bind(track.has_lyrics)
    .bind(&track.language)
    .bind(&track.lyrics)
    .bind(position)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn update_track(
    tx: &mut Transaction<'_, Sqlite>,
    track_id: i64,
    track: &TrackInput,
    position: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE tracks
        SET track_name = ?, artists = ?, audio_url = ?, isrc = ?, version = ?,
            musicians = ?, lyricists = ?, tiktok_moment = ?, has_explicit = ?,
            has_lyrics = ?, language = ?, lyrics = ?, track_order = ?
        WHERE id = ?
        "#,
    )
    .bind(&track.track_name)
    .bind(&track.artists)
    .bind(&track.audio_url)
    .bind(&track.isrc)
    .bind(&track.version)
    .bind(&track.musicians)
    .bind(&track.lyricists)
    .bind(&track.tiktok_moment)
    .bind(track.has_explicit)
    .bind(track.has_lyrics)
    .bind(&track.language)
    .bind(&track.lyrics)
    .bind(position)
    .bind(track_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
