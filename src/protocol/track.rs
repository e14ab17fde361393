//! Tracks and their deliverable encodings.
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "id": 123456,
//!     "kind": "track",
//!     "title": "Track Title",
//!     "duration": 180000,
//!     "permalink_url": "https://soundcloud.com/artist/track",
//!     "downloadable": false,
//!     "media": {
//!         "transcodings": [{
//!             "url": "https://api-v2.soundcloud.com/media/soundcloud:tracks:123456/…/stream/hls",
//!             "preset": "mp3_0_1",
//!             "snipped": false,
//!             "format": {
//!                 "protocol": "hls",
//!                 "mime_type": "audio/mpeg"
//!             }
//!         }]
//!     },
//!     "user": { ... }
//! }
//! ```
//!
//! Inside playlists, all but the first five tracks are stubs that only
//! carry `id`, `kind` and a few policy fields.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::error::Error;

use super::User;

/// Numeric track identifier.
pub type TrackId = u64;

/// Track metadata.
///
/// `Track::default()`, with ID 0, is used as the placeholder for playlist
/// positions whose track could not be resolved.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Track {
    pub id: TrackId,

    /// Resource discriminator, `"track"` for tracks.
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

    /// Playable duration in milliseconds. Shorter than `full_duration_ms`
    /// for snipped previews.
    #[serde(rename = "duration")]
    #[serde_as(as = "DefaultOnNull")]
    pub duration_ms: u64,

    #[serde(rename = "full_duration")]
    #[serde_as(as = "DefaultOnNull")]
    pub full_duration_ms: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub permalink: String,

    #[serde_as(as = "DefaultOnNull")]
    pub permalink_url: String,

    pub artwork_url: Option<String>,
    pub waveform_url: Option<String>,

    #[serde_as(as = "DefaultOnNull")]
    pub uri: String,

    #[serde_as(as = "DefaultOnNull")]
    pub policy: String,

    #[serde_as(as = "DefaultOnNull")]
    pub monetization_model: String,

    #[serde_as(as = "DefaultOnNull")]
    pub public: bool,

    #[serde_as(as = "DefaultOnNull")]
    pub streamable: bool,

    #[serde_as(as = "DefaultOnNull")]
    pub commentable: bool,

    /// Whether the uploader offers a direct download of the original file.
    #[serde_as(as = "DefaultOnNull")]
    pub downloadable: bool,

    #[serde_as(as = "DefaultOnNull")]
    pub has_downloads_left: bool,

    /// Set for private tracks shared by secret link.
    pub secret_token: Option<String>,

    #[serde_as(as = "DefaultOnNull")]
    pub comment_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub download_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub likes_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub playback_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub reposts_count: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub created_at: String,

    #[serde_as(as = "DefaultOnNull")]
    pub last_modified: String,

    #[serde_as(as = "DefaultOnNull")]
    pub display_date: String,

    #[serde_as(as = "DefaultOnNull")]
    pub user_id: u64,

    #[serde_as(as = "DefaultOnNull")]
    pub user: User,

    #[serde_as(as = "DefaultOnNull")]
    pub media: Media,
}

impl Track {
    /// The kind discriminator of tracks.
    pub const KIND: &'static str = "track";

    /// Whether this is a placeholder for an unresolved track.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id == 0
    }

    /// The transcodings this track can be delivered in.
    #[must_use]
    pub fn transcodings(&self) -> &[Transcoding] {
        &self.media.transcodings
    }

    /// The first transcoding delivered with `protocol`, if any.
    #[must_use]
    pub fn transcoding(&self, protocol: Protocol) -> Option<&Transcoding> {
        self.media
            .transcodings
            .iter()
            .find(|transcoding| transcoding.format.protocol == protocol)
    }

    /// The transcoding to download with: the first one delivered with
    /// `protocol`, or else the first one.
    #[must_use]
    pub fn preferred_transcoding(&self, protocol: Protocol) -> Option<&Transcoding> {
        self.transcoding(protocol)
            .or_else(|| self.media.transcodings.first())
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.user.username.is_empty() {
            write!(f, "{}: \"{}\"", self.id, self.title)
        } else {
            write!(f, "{}: \"{} - {}\"", self.id, self.user.username, self.title)
        }
    }
}

/// Container of the transcodings of a track.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Media {
    #[serde_as(as = "DefaultOnNull")]
    pub transcodings: Vec<Transcoding>,
}

/// One deliverable encoding of a track.
///
/// The `url` does not point at audio, but at an API endpoint that returns
/// a short-lived media URL.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Transcoding {
    #[serde_as(as = "DefaultOnNull")]
    pub url: String,

    /// Codec and bitrate preset, like `mp3_0_1` or `opus_0_0`.
    #[serde_as(as = "DefaultOnNull")]
    pub preset: String,

    /// Whether this only delivers a preview snippet.
    #[serde_as(as = "DefaultOnNull")]
    pub snipped: bool,

    #[serde_as(as = "DefaultOnNull")]
    pub quality: String,

    pub format: Format,
}

/// Delivery protocol and mime type of a transcoding.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Format {
    pub protocol: Protocol,

    #[serde_as(as = "DefaultOnNull")]
    pub mime_type: String,
}

/// Delivery protocol of a transcoding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// A single audio file.
    Progressive,

    /// An HLS media playlist of independently fetchable segments.
    Hls,

    /// Anything else, like the encrypted HLS variants.
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Progressive => write!(f, "progressive"),
            Self::Hls => write!(f, "hls"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "progressive" => Ok(Self::Progressive),
            "hls" => Ok(Self::Hls),
            other => Err(Error::invalid_argument(format!(
                "unknown protocol \"{other}\": expected progressive or hls"
            ))),
        }
    }
}
