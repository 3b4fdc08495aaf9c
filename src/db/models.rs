use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub theme: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The subset of a user row that is safe to return to callers.
/// `password_hash` never leaves the service.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: String,
    pub theme: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
            theme: user.theme,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Release {
    pub id: i64,
    pub user_id: i64,
    pub album_name: Option<String>,
    pub artists: Option<String>,
    pub cover_url: Option<String>,
    pub upc: Option<String>,
    pub old_release_date: Option<String>,
    pub is_rerelease: bool,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Track {
    pub id: i64,
    pub release_id: i64,
    pub track_name: Option<String>,
    pub artists: Option<String>,
    pub audio_url: Option<String>,
    pub isrc: Option<String>,
    pub version: Option<String>,
    pub musicians: Option<String>,
    pub lyricists: Option<String>,
    pub tiktok_moment: Option<String>,
    pub has_explicit: bool,
    pub has_lyrics: bool,
    pub language: Option<String>,
    pub lyrics: Option<String>,
    pub track_order: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Smartlink {
    pub id: i64,
    pub user_id: i64,
    pub release_name: String,
    pub artists: String,
    pub cover_url: Option<String>,
    pub upc: Option<String>,
    pub status: String,
    pub smartlink_url: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PromoRelease {
    pub id: i64,
    pub user_id: i64,
    pub upc: Option<String>,
    pub release_description: Option<String>,
    pub key_track_isrc: Option<String>,
    pub key_track_name: Option<String>,
    pub key_track_description: Option<String>,
    pub artists: Option<String>,
    pub smartlink_url: Option<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Video {
    pub id: i64,
    pub user_id: i64,
    pub video_url: Option<String>,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub cover_url: Option<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// `links` holds the per-service URL mapping as JSON text, exactly as stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlatformAccount {
    pub id: i64,
    pub user_id: i64,
    pub platform_name: Option<String>,
    pub artist_name: Option<String>,
    pub links: Option<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub user_id: i64,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub moderator_response: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
