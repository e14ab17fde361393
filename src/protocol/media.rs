//! Envelopes of the endpoints that hand out audio locations.
//!
//! Both kinds of URL are short-lived and should be used right away.

use serde::{Deserialize, Serialize};

/// Response of a transcoding URL.
///
/// ```json
/// { "url": "https://cf-hls-media.sndcdn.com/playlist/…/playlist.m3u8?Policy=…" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MediaUrl {
    pub url: String,
}

/// Response of the public download endpoint of a downloadable track.
///
/// ```json
/// { "redirectUri": "https://cf-media.sndcdn.com/…" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DownloadUrl {
    #[serde(rename = "redirectUri")]
    pub redirect_uri: String,
}
