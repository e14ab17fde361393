//! Playlists, which the API calls sets when they are not albums.
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "id": 987654,
//!     "kind": "playlist",
//!     "title": "Playlist Title",
//!     "secret_token": "s-AbCdE",
//!     "track_count": 7,
//!     "tracks": [
//!         { "id": 1, "kind": "track", "title": "…", "media": { … } },
//!         …
//!         { "id": 6, "kind": "track", "policy": "ALLOW" },
//!         { "id": 7, "kind": "track", "policy": "ALLOW" }
//!     ]
//! }
//! ```
//!
//! Only the first five tracks come with full metadata; the rest are stubs
//! that have to be fetched separately.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use super::{Track, User};

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Playlist {
    pub id: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub kind: String,

    #[serde_as(as = "DefaultOnNull")]
    pub title: String,

    #[serde_as(as = "DefaultOnNull")]
    pub description: String,

    #[serde_as(as = "DefaultOnNull")]
    pub genre: String,

    #[serde_as(as = "DefaultOnNull")]
    pub tag_list: String,

    #[serde_as(as = "DefaultOnNull")]
    pub label_name: String,

    #[serde_as(as = "DefaultOnNull")]
    pub license: String,

    #[serde(rename = "duration")]
    #[serde_as(as = "DefaultOnNull")]
    pub duration_ms: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub permalink: String,

    #[serde_as(as = "DefaultOnNull")]
    pub permalink_url: String,

    pub artwork_url: Option<String>,

    #[serde_as(as = "DefaultOnNull")]
    pub uri: String,

    #[serde_as(as = "DefaultOnNull")]
    pub public: bool,

    /// `"public"` or `"private"`.
    #[serde_as(as = "DefaultOnNull")]
    pub sharing: String,

    /// Token required to fetch the tracks of a private playlist. Empty for
    /// public playlists.
    #[serde_as(as = "DefaultOnNull")]
    pub secret_token: String,

    #[serde_as(as = "DefaultOnNull")]
    pub embeddable_by: String,

    /// `"album"`, `"ep"`, … or empty for plain playlists.
    #[serde_as(as = "DefaultOnNull")]
    pub set_type: String,

    #[serde_as(as = "DefaultOnNull")]
    pub is_album: bool,

    #[serde_as(as = "DefaultOnNull")]
    pub managed_by_feeds: bool,

    #[serde_as(as = "DefaultOnNull")]
    pub likes_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub created_at: String,

    #[serde_as(as = "DefaultOnNull")]
    pub last_modified: String,

    #[serde_as(as = "DefaultOnNull")]
    pub display_date: String,

    pub published_at: Option<String>,

    #[serde_as(as = "DefaultOnNull")]
    pub user_id: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub user: User,

    /// Declared number of tracks. Authoritative for the length of `tracks`
    /// once the playlist has been assembled.
    #[serde_as(as = "DefaultOnNull")]
    pub track_count: usize,

    #[serde_as(as = "DefaultOnNull")]
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// The kind discriminator of playlists and albums.
    pub const KIND: &'static str = "playlist";

    /// Number of tracks the API returns with full metadata.
    pub const INLINE_TRACKS: usize = 5;

    /// Number of track positions that hold a placeholder instead of a track.
    #[must_use]
    pub fn missing_tracks(&self) -> usize {
        self.tracks.iter().filter(|track| track.is_placeholder()).count()
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: \"{}\" ({} tracks)",
            self.id, self.title, self.track_count
        )
    }
}
