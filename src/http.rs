//! HTTP transport for the SoundCloud APIs.
//!
//! All network access of the crate goes through the [`Transport`] trait,
//! which issues a single GET (following redirects) and reports non-2xx responses as a
//! [`FailedRequest`] carrying the status code and response body. Nothing
//! is retried at this level; callers that want retries wrap the API.
//!
//! [`Client`] is the production implementation on top of `reqwest::Client`
//! that adds:
//! * Consistent timeouts and keep-alive
//! * A `User-Agent` from the configuration
//!
//! # Example
//!
//! ```rust
//! use scloud::http::{Client, Transport};
//!
//! let client = Client::new(&config)?;
//! let body = client.get(url).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream::BoxStream, StreamExt, TryStreamExt};
use reqwest::Url;

use crate::{
    config::Config,
    error::{Error, FailedRequest, Result},
};

/// A byte stream of a response body.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Issues single HTTP requests.
///
/// Implementations must be shareable across tasks: the client clones an
/// `Arc<dyn Transport>` into every fan-out task.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the complete response body.
    ///
    /// # Errors
    ///
    /// Returns a [`FailedRequest`] error for non-2xx responses, or a network
    /// error when the request could not be completed.
    async fn get(&self, url: Url) -> Result<Bytes>;

    /// Fetches `url` and returns the response body as a stream, without
    /// buffering it.
    ///
    /// # Errors
    ///
    /// Same as [`Transport::get`] for the response head; errors while
    /// reading the body are yielded by the stream.
    async fn stream(&self, url: Url) -> Result<ByteStream>;

    /// Follows the redirects of `url` and returns the URL they end at.
    ///
    /// # Errors
    ///
    /// Same as [`Transport::get`] for the final response.
    async fn resolve_redirects(&self, url: Url) -> Result<Url>;
}

/// HTTP client wrapping `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    /// Duration to keep idle connections alive.
    ///
    /// Playlist and segment fan-out hit the same hosts in bursts, so
    /// connections are worth keeping around between them.
    const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Creates a new client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built, for example when
    /// the user agent is not a valid header value.
    pub fn new(config: &Config) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .tcp_keepalive(Self::KEEPALIVE_TIMEOUT)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { inner })
    }

    /// Sends a GET request and checks its status.
    async fn send(&self, url: Url) -> Result<reqwest::Response> {
        trace!("GET {}", redacted(&url));
        let response = self.inner.get(url).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // The body is informational only: a failure to read it must not
        // mask the status.
        let body = response.text().await.unwrap_or_default();
        debug!("request failed with status {status}");
        Err(FailedRequest { status, body }.into())
    }
}

#[async_trait]
impl Transport for Client {
    async fn get(&self, url: Url) -> Result<Bytes> {
        let response = self.send(url).await?;
        response.bytes().await.map_err(Into::into)
    }

    async fn stream(&self, url: Url) -> Result<ByteStream> {
        let response = self.send(url).await?;
        Ok(response.bytes_stream().map_err(Error::from).boxed())
    }

    async fn resolve_redirects(&self, url: Url) -> Result<Url> {
        let response = self.send(url).await?;
        Ok(response.url().clone())
    }
}

/// Formats `url` for logging with the `client_id` query value masked.
#[must_use]
pub fn redacted(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "client_id") {
        return url.to_string();
    }

    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "client_id" {
                "*".repeat(value.chars().count())
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
