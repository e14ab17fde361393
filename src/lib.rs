//! Client for the SoundCloud v2 web API.
//!
//! Resolves soundcloud.com URLs into tracks, playlists and users, pages
//! through likes and search results, and downloads audio delivered as a
//! single file or as an HLS media playlist.
//!
//! # Concurrency
//!
//! Two operations fan out into concurrent requests and fan back in:
//! * [`Client::get_playlist_info`] fetches the tracks beyond the first five
//!   in batches of up to 50, and puts every track back at its playlist
//!   position
//! * [`Client::download_hls`] fetches all segments at once and writes them
//!   in playlist order
//!
//! In both, the first failing request fails the operation and cancels the
//! rest.
//!
//! # Example
//!
//! ```rust
//! use scloud::{config::Config, protocol::Protocol, tracks::TrackInfoOptions, Client};
//!
//! let client = Client::new(&Config::default()).await?;
//! let tracks = client
//!     .get_track_info(TrackInfoOptions::url("https://soundcloud.com/artist/track"))
//!     .await?;
//!
//! if let Some(transcoding) = tracks[0].transcoding(Protocol::Hls) {
//!     let mut file = tokio::fs::File::create("track.mp3").await?;
//!     client.download_track(transcoding, &mut file).await?;
//! }
//! ```
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[macro_use]
extern crate log;

pub mod client;
pub mod config;
pub mod credential;
pub mod download;
pub mod error;
pub mod http;
pub mod playlist;
pub mod protocol;
pub mod query;
pub mod tracks;
pub mod urls;

pub use client::Client;
