//! Assembly of complete playlists.
//!
//! Resolving a playlist URL returns full metadata for the first
//! [`Playlist::INLINE_TRACKS`] tracks only; every later position holds a
//! stub with just the track ID. The assembler fetches the stubbed tracks
//! in concurrent batches and puts each one back at its position, so the
//! result always has `track_count` tracks in playlist order.
//!
//! Tracks that the batch endpoint does not return, typically private tracks
//! the playlist token does not grant access to, leave a placeholder
//! ([`Track::default()`]) at their position.

use tokio::task::JoinSet;

use crate::{
    client::Client,
    error::{Error, Result},
    protocol::{Playlist, Track, TrackId},
    tracks::{PlaylistContext, BATCH_LIMIT},
};

impl Client {
    /// Resolves a playlist URL into the complete playlist.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `url` is not a playlist, or the first
    /// error of any of the batch requests. Remaining batches are cancelled
    /// on the first error.
    pub async fn get_playlist_info(&self, url: &str) -> Result<Playlist> {
        let mut playlist: Playlist = self.resolve(url).await?;
        if playlist.kind != Playlist::KIND {
            return Err(Error::invalid_argument(format!(
                "{url} is a {}, not a playlist",
                playlist.kind
            )));
        }

        let track_count = playlist.track_count;
        if track_count <= Playlist::INLINE_TRACKS {
            return Ok(playlist);
        }

        let stubs = if playlist.tracks.len() > Playlist::INLINE_TRACKS {
            playlist.tracks.split_off(Playlist::INLINE_TRACKS)
        } else {
            Vec::new()
        };
        playlist
            .tracks
            .resize(Playlist::INLINE_TRACKS, Track::default());

        let ids: Vec<TrackId> = stubs
            .iter()
            .map(|stub| stub.id)
            .take(track_count - Playlist::INLINE_TRACKS)
            .collect();
        let mut remaining = vec![Track::default(); track_count - Playlist::INLINE_TRACKS];

        let context = PlaylistContext {
            playlist_id: playlist.id,
            secret_token: playlist.secret_token.clone(),
        };

        let mut tasks = JoinSet::new();
        for (n, chunk) in ids.chunks(BATCH_LIMIT).enumerate() {
            let client = self.clone();
            let context = context.clone();
            let chunk = chunk.to_vec();
            tasks.spawn(async move {
                let tracks = client.fetch_chunk(&chunk, &context).await?;
                Ok::<_, Error>((n * BATCH_LIMIT, chunk, tracks))
            });
        }
        debug!(
            "playlist {}: fetching {} tracks in {} batches",
            playlist.id,
            ids.len(),
            tasks.len()
        );

        // Returning early drops the join set, which aborts the other batches.
        while let Some(joined) = tasks.join_next().await {
            let (offset, chunk, tracks) = joined??;
            splice(&mut remaining[offset..offset + chunk.len()], &chunk, &tracks);
        }

        let holes = remaining.iter().filter(|track| track.is_placeholder()).count();
        if holes > 0 {
            warn!(
                "playlist {}: {holes} of {track_count} tracks unavailable",
                playlist.id
            );
        }

        playlist.tracks.extend(remaining);
        Ok(playlist)
    }

    /// Fetches the tracks of one batch of stub IDs. Stubs without an ID are
    /// not requested.
    async fn fetch_chunk(&self, chunk: &[TrackId], context: &PlaylistContext) -> Result<Vec<Track>> {
        let ids: Vec<TrackId> = chunk.iter().copied().filter(|&id| id != 0).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_tracks(&ids, Some(context)).await
    }
}

/// Places each fetched track into every slot whose stub ID it matches.
fn splice(slots: &mut [Track], chunk: &[TrackId], tracks: &[Track]) {
    for (slot, &id) in slots.iter_mut().zip(chunk) {
        if let Some(track) = tracks.iter().find(|track| id != 0 && track.id == id) {
            slot.clone_from(track);
        }
    }
}
