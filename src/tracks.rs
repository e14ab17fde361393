//! Track metadata, by URL or in batches of IDs.
//!
//! The batch endpoint returns its tracks in no particular order and leaves
//! out any ID it cannot resolve, such as private tracks requested without
//! the secret token of a playlist that contains them. The fetcher restores
//! the order of the request for the tracks that came back.

use crate::{
    client::Client,
    error::{Error, Result},
    protocol::{Track, TrackId},
};

/// Maximum number of IDs the batch endpoint accepts in one request.
pub const BATCH_LIMIT: usize = 50;

/// Grants access to the private tracks of a playlist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistContext {
    pub playlist_id: u64,
    pub secret_token: String,
}

/// What [`Client::get_track_info`] should look up: a track URL, or a list
/// of IDs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackInfoOptions {
    pub url: Option<String>,
    pub ids: Vec<TrackId>,
    pub playlist: Option<PlaylistContext>,
}

impl TrackInfoOptions {
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ids(ids: impl Into<Vec<TrackId>>) -> Self {
        Self {
            ids: ids.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_playlist(mut self, playlist: PlaylistContext) -> Self {
        self.playlist = Some(playlist);
        self
    }
}

impl Client {
    /// Looks up tracks by URL or by IDs.
    ///
    /// A URL yields exactly one track. IDs yield the tracks that could be
    /// resolved, in the order of `options.ids`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if neither a URL nor IDs are given, or if
    /// there are more than [`BATCH_LIMIT`] IDs. Otherwise fails like
    /// [`Client::fetch_tracks`].
    pub async fn get_track_info(&self, options: TrackInfoOptions) -> Result<Vec<Track>> {
        if !options.ids.is_empty() {
            return self
                .fetch_tracks(&options.ids, options.playlist.as_ref())
                .await;
        }

        match options.url {
            Some(url) if !url.is_empty() => {
                let track = self.resolve::<Track>(&url).await?;
                Ok(vec![track])
            }
            _ => Err(Error::invalid_argument(
                "either a track url or track ids are required",
            )),
        }
    }

    /// Fetches up to [`BATCH_LIMIT`] tracks in one request.
    ///
    /// The result holds the tracks of `ids` that could be resolved, in the
    /// order of `ids`, each once. Private tracks are only returned when
    /// `playlist` grants access to them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` without issuing a request if `ids` is empty
    /// or longer than [`BATCH_LIMIT`]. Transport failures and undecodable
    /// responses fail the whole batch.
    pub async fn fetch_tracks(
        &self,
        ids: &[TrackId],
        playlist: Option<&PlaylistContext>,
    ) -> Result<Vec<Track>> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("no track ids given"));
        }
        if ids.len() > BATCH_LIMIT {
            return Err(Error::invalid_argument(format!(
                "{} track ids given, at most {BATCH_LIMIT} allowed",
                ids.len()
            )));
        }

        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let playlist_id = playlist.map(|playlist| playlist.playlist_id.to_string());
        let mut query = vec![("ids", joined.as_str())];
        if let (Some(playlist), Some(playlist_id)) = (playlist, &playlist_id) {
            query.push(("playlistId", playlist_id.as_str()));
            query.push(("playlistSecretToken", playlist.secret_token.as_str()));
        }

        let url = self.build_url(self.endpoint(&["tracks"])?, query);
        let mut tracks: Vec<Track> = self.get_json(url, "tracks").await?;

        let requested = tracks.len();
        restore_order(ids, &mut tracks);
        if tracks.len() < ids.len() {
            debug!(
                "{} of {} requested tracks unavailable",
                ids.len() - tracks.len(),
                ids.len()
            );
        }
        if tracks.len() < requested {
            debug!("dropped {} unrequested tracks", requested - tracks.len());
        }

        Ok(tracks)
    }
}

/// Reorders `tracks` to follow `ids`.
///
/// IDs without a track are skipped, repeated IDs count once, and tracks
/// that were not asked for are dropped. Batches are small, so a swap-based
/// selection pass is good enough.
pub(crate) fn restore_order(ids: &[TrackId], tracks: &mut Vec<Track>) {
    let mut effective: Vec<TrackId> = Vec::with_capacity(ids.len());
    for &id in ids {
        if !effective.contains(&id) && tracks.iter().any(|track| track.id == id) {
            effective.push(id);
        }
    }

    for (j, &id) in effective.iter().enumerate() {
        if tracks[j].id != id {
            if let Some(k) = tracks[j + 1..].iter().position(|track| track.id == id) {
                tracks.swap(j, j + 1 + k);
            }
        }
    }

    tracks.truncate(effective.len());
}
