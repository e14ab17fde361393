//! Media URLs and audio downloads.
//!
//! A [`Transcoding`] does not point at audio but at an API endpoint that
//! hands out a short-lived media URL. Depending on the protocol, that URL
//! is either the audio file itself (progressive) or an HLS media playlist
//! whose segments concatenate to the audio file.
//!
//! # Segmented downloads
//!
//! All segments of a media playlist are fetched concurrently and buffered
//! in memory. Only once every segment has arrived are they written to the
//! sink, in playlist order. If any segment fails, the download fails with
//! that error, the other fetches are cancelled and the sink receives
//! nothing.

use bytes::Bytes;
use futures_util::TryStreamExt;
use hls_m3u8::MediaPlaylist;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    task::JoinSet,
};
use url::Url;

use crate::{
    client::Client,
    error::{Error, Result},
    protocol::{DownloadUrl, MediaUrl, Protocol, TrackId, Transcoding},
    tracks::TrackInfoOptions,
    urls,
};

impl Client {
    /// Exchanges a transcoding URL for the media URL it currently serves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `transcoding_url` is not a URL, or a
    /// transport or decode error.
    pub async fn get_media_url(&self, transcoding_url: &str) -> Result<String> {
        let url = self.build_url(Url::parse(transcoding_url)?, []);
        let media: MediaUrl = self.get_json(url, "media url").await?;
        Ok(media.url)
    }

    /// The public download URL of a downloadable track.
    ///
    /// # Errors
    ///
    /// Returns a transport error, typically `NotFound` or `PermissionDenied`
    /// if the track is not downloadable.
    pub async fn get_public_download_url(&self, id: TrackId) -> Result<String> {
        let id = id.to_string();
        let url = self.build_url(self.endpoint(&["tracks", id.as_str(), "download"])?, []);
        let download: DownloadUrl = self.get_json(url, "download url").await?;
        Ok(download.redirect_uri)
    }

    /// The URL to download the track at `url` from.
    ///
    /// Prefers the public download of the uploader if there is one with
    /// downloads left. Otherwise returns the media URL of the first
    /// transcoding delivered with `protocol`, or of the first transcoding
    /// if none is.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `url` is not a track URL, and `NotFound`
    /// if the track has no transcodings.
    pub async fn get_download_url(&self, url: &str, protocol: Protocol) -> Result<String> {
        let url = self.prepare_url(url).await?;
        if !urls::is_url(&url) || urls::is_playlist_url(&url) {
            return Err(Error::invalid_argument(format!("{url} is not a track url")));
        }

        let track = self
            .get_track_info(TrackInfoOptions::url(url.as_str()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("no track found at {url}")))?;

        if track.downloadable && track.has_downloads_left {
            return self.get_public_download_url(track.id).await;
        }

        let transcoding = track
            .preferred_transcoding(protocol)
            .ok_or_else(|| Error::not_found(format!("track {track} has no transcodings")))?;
        self.get_media_url(&transcoding.url).await
    }

    /// Downloads the audio of `transcoding` into `sink`.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `Unimplemented` for protocols other than progressive and
    /// HLS, or the first error of resolving, fetching or writing.
    pub async fn download_track<W>(&self, transcoding: &Transcoding, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let protocol = transcoding.format.protocol;
        debug!("downloading {} ({protocol})", transcoding.preset);

        match protocol {
            Protocol::Progressive => {
                let media_url = self.get_media_url(&transcoding.url).await?;
                self.download_progressive(&media_url, sink).await
            }
            Protocol::Hls => {
                let media_url = self.get_media_url(&transcoding.url).await?;
                self.download_hls(&media_url, sink).await
            }
            Protocol::Unknown => Err(Error::unimplemented(format!(
                "cannot download {} transcodings",
                transcoding.preset
            ))),
        }
    }

    /// Streams a single audio file into `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first error of fetching or writing. The sink may have
    /// received part of the file.
    pub async fn download_progressive<W>(&self, url: &str, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let mut body = self.transport().stream(Url::parse(url)?).await?;

        let mut written = 0;
        while let Some(chunk) = body.try_next().await? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        Ok(written)
    }

    /// Downloads every segment of the HLS media playlist at `manifest_url`
    /// and writes them to `sink` in playlist order.
    ///
    /// # Errors
    ///
    /// Returns `DataLoss` if the manifest is not a media playlist, or the
    /// first error of any segment. On error, nothing is written.
    pub async fn download_hls<W>(&self, manifest_url: &str, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let manifest_url = Url::parse(manifest_url)?;
        let manifest = self.transport().get(manifest_url.clone()).await?;
        let segments = parse_manifest(&manifest, &manifest_url)?;
        self.download_segments(segments, sink).await
    }

    /// Fetches the present `segments` concurrently and writes them to `sink`
    /// in index order once all of them arrived. Absent positions are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the first error of any segment, in which case nothing is
    /// written, or the first write error.
    pub async fn download_segments<W>(&self, segments: Vec<Option<Url>>, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let mut buffers: Vec<Option<Bytes>> = vec![None; segments.len()];

        let mut tasks = JoinSet::new();
        for (index, url) in segments.into_iter().enumerate() {
            if let Some(url) = url {
                let client = self.clone();
                tasks.spawn(async move {
                    let body = client.transport().get(url).await?;
                    Ok::<_, Error>((index, body))
                });
            }
        }
        debug!("fetching {} segments", tasks.len());

        // Returning early drops the join set, which aborts the other fetches.
        while let Some(joined) = tasks.join_next().await {
            let (index, body) = joined??;
            trace!("segment {index}: {} bytes", body.len());
            buffers[index] = Some(body);
        }

        let mut written = 0;
        for body in buffers.into_iter().flatten() {
            sink.write_all(&body).await?;
            written += body.len() as u64;
        }
        sink.flush().await?;

        Ok(written)
    }
}

/// Extracts the segment URLs of an HLS media playlist, resolved against the
/// playlist URL, at their playlist positions.
///
/// # Errors
///
/// Returns `DataLoss` if `manifest` is not a valid media playlist, and
/// `InvalidArgument` if a segment URI does not resolve to a URL.
pub fn parse_manifest(manifest: &[u8], manifest_url: &Url) -> Result<Vec<Option<Url>>> {
    let manifest = std::str::from_utf8(manifest)?;
    let playlist = MediaPlaylist::try_from(manifest)?;

    let len = playlist
        .segments
        .iter()
        .map(|(index, _)| index + 1)
        .max()
        .unwrap_or_default();

    let mut segments = vec![None; len];
    for (index, segment) in &playlist.segments {
        segments[index] = Some(manifest_url.join(segment.uri())?);
    }

    Ok(segments)
}
