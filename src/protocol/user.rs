use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// A user profile.
///
/// Tracks and playlists embed a reduced form of this, which decodes into
/// the same type with the remaining fields defaulted.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct User {
    pub id: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub kind: String,

    #[serde_as(as = "DefaultOnNull")]
    pub username: String,

    #[serde_as(as = "DefaultOnNull")]
    pub first_name: String,

    #[serde_as(as = "DefaultOnNull")]
    pub last_name: String,

    #[serde_as(as = "DefaultOnNull")]
    pub full_name: String,

    #[serde_as(as = "DefaultOnNull")]
    pub description: String,

    #[serde_as(as = "DefaultOnNull")]
    pub city: String,

    pub country_code: Option<String>,

    pub avatar_url: Option<String>,

    #[serde_as(as = "DefaultOnNull")]
    pub permalink: String,

    #[serde_as(as = "DefaultOnNull")]
    pub permalink_url: String,

    #[serde_as(as = "DefaultOnNull")]
    pub uri: String,

    #[serde_as(as = "DefaultOnNull")]
    pub created_at: String,

    #[serde_as(as = "DefaultOnNull")]
    pub verified: bool,

    #[serde_as(as = "DefaultOnNull")]
    pub comments_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub followers_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub followings_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub likes_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub playlist_likes_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub track_count: u64,
}

impl User {
    /// The kind discriminator of users.
    pub const KIND: &'static str = "user";
}
