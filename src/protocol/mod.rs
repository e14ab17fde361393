//! Wire types of the SoundCloud v2 API.
//!
//! # Submodules
//!
//! * [`track`] - Tracks and their transcodings
//! * [`playlist`] - Playlists (sets and albums)
//! * [`user`] - User profiles
//! * [`like`] - Likes of tracks and playlists
//! * [`paginated`] - Paginated collections and their typed projections
//! * [`media`] - Media and download URL envelopes
//!
//! # Leniency
//!
//! The API is undocumented and its responses vary per endpoint: stub
//! tracks inside playlists carry little more than an ID, and many string
//! fields are `null` instead of absent. All types therefore default missing
//! fields and treat `null` strings and counters as their default value.
//! Only a response that is not JSON, or has a field of the wrong type,
//! fails to decode.

pub mod like;
pub mod media;
pub mod paginated;
pub mod playlist;
pub mod track;
pub mod user;

pub use like::{Like, Liked};
pub use media::{DownloadUrl, MediaUrl};
pub use paginated::PaginatedQuery;
pub use playlist::Playlist;
pub use track::{Format, Media, Protocol, Track, TrackId, Transcoding};
pub use user::User;

use std::fmt::Debug;

use serde::Deserialize;

use crate::error::Result;

/// Parses and logs JSON responses from the API.
///
/// # Arguments
///
/// * `body` - Response body to parse
/// * `origin` - Description of API endpoint for logging
///
/// # Errors
///
/// Returns a decode error if the body is not valid JSON or does not match
/// type `T`.
///
/// # Logging
///
/// * Success: Logs parsed structure at TRACE level
/// * Parse Error: Logs raw JSON at TRACE level if valid JSON
/// * Invalid JSON: Logs error and raw text at ERROR level
pub fn json<T>(body: &[u8], origin: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Debug,
{
    match serde_json::from_slice(body) {
        Ok(result) => {
            trace!("{origin}: {result:#?}");
            Ok(result)
        }
        Err(e) => {
            if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
                debug!("{origin}: response does not match expected shape ({e})");
                trace!("{origin}: {json:#?}");
            } else {
                error!("{origin}: failed parsing response ({e:?})");
                trace!("{}", String::from_utf8_lossy(body));
            }
            Err(e.into())
        }
    }
}
