//! Likes of tracks and playlists, as listed on a user's likes pages.
//!
//! Each like carries exactly one payload, matching its `kind`.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Playlist, Track};

/// A like of a track or a playlist.
///
/// ```json
/// {
///     "created_at": "2024-03-01T12:00:00Z",
///     "kind": "like",
///     "track": { ... }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Like {
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,

    pub kind: String,

    pub track: Option<Track>,

    pub playlist: Option<Playlist>,
}

/// The liked resource.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Liked<'a> {
    Track(&'a Track),
    Playlist(&'a Playlist),
}

impl Like {
    /// The liked track or playlist.
    ///
    /// Returns `None` unless exactly one of them is present and the kind
    /// agrees with it.
    #[must_use]
    pub fn item(&self) -> Option<Liked<'_>> {
        match (&self.track, &self.playlist, self.kind.as_str()) {
            (Some(track), None, "like" | "track-like") => Some(Liked::Track(track)),
            (None, Some(playlist), "like" | "playlist-like") => Some(Liked::Playlist(playlist)),
            _ => None,
        }
    }
}
