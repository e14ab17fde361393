//! The API client.
//!
//! [`Client`] holds the transport, the configuration and the `client_id`
//! credential, and builds every request URL of the crate. The operations
//! themselves live with their concern:
//!
//! * [`crate::tracks`] - track metadata, single and batched
//! * [`crate::playlist`] - complete playlists
//! * [`crate::query`] - users, likes, search and pagination
//! * [`crate::download`] - media URLs and downloads
//!
//! # Credential
//!
//! The `client_id` can be replaced at any time with
//! [`Client::set_client_id`]. It is read every time a request URL is built,
//! so an operation that fans out into several requests may use the old
//! value for some of them and the new one for the rest.
//!
//! # Example
//!
//! ```rust
//! use scloud::{config::Config, Client};
//!
//! let client = Client::new(&Config::default()).await?;
//! let playlist = client
//!     .get_playlist_info("https://soundcloud.com/artist/sets/album")
//!     .await?;
//! ```

use std::{
    fmt::Debug,
    sync::{Arc, PoisonError, RwLock},
};

use serde::Deserialize;
use url::Url;

use crate::{
    config::Config,
    credential,
    error::{Error, Result},
    http::{self, Transport},
    protocol, urls,
};

/// Client of the SoundCloud v2 API.
///
/// Cloning is cheap and clones share the transport and the credential.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    client_id: Arc<RwLock<String>>,
    config: Arc<Config>,
}

impl Client {
    /// Creates a client on top of the HTTP transport.
    ///
    /// When the configuration has no `client_id`, one is fetched from the
    /// web player first.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or no `client_id`
    /// can be fetched.
    pub async fn new(config: &Config) -> Result<Self> {
        let transport = http::Client::new(config)?;
        Self::with_transport(config, Arc::new(transport)).await
    }

    /// Creates a client on top of any transport.
    ///
    /// # Errors
    ///
    /// Returns an error if no `client_id` is configured and none can be
    /// fetched through `transport`.
    pub async fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let client_id = match &config.client_id {
            Some(client_id) => client_id.clone(),
            None => credential::fetch_client_id(&*transport).await?,
        };

        Ok(Self {
            transport,
            client_id: Arc::new(RwLock::new(client_id)),
            config: Arc::new(config.clone()),
        })
    }

    /// The `client_id` sent with requests.
    #[must_use]
    pub fn client_id(&self) -> String {
        self.client_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the `client_id` for all requests built from now on,
    /// including those of clones of this client.
    pub fn set_client_id(&self, client_id: impl Into<String>) {
        *self
            .client_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = client_id.into();
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        &*self.transport
    }

    /// Appends `query` and the current `client_id` to `url`.
    ///
    /// Query pairs already on `url` are kept, except for a stale
    /// `client_id`, which is replaced.
    #[must_use]
    pub fn build_url<'a, I>(&self, mut url: Url, query: I) -> Url
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let client_id = self.client_id();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "client_id")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .extend_pairs(query)
            .append_pair("client_id", &client_id);
        url
    }

    /// The API URL of `path`, like `["users", "123", "likes"]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the configured API URL cannot carry a
    /// path.
    pub fn endpoint(&self, path: &[&str]) -> Result<Url> {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::invalid_argument(format!("{} cannot be a base url", self.config.api_url))
            })?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    /// Rewrites a user-facing resource URL into the form the API resolves.
    ///
    /// Mobile site URLs lose their prefix when configured. Share links
    /// (`on.soundcloud.com`, and `soundcloud.app.goo.gl` when configured)
    /// are followed to the soundcloud.com URL they redirect to. Anything
    /// else is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if a share link cannot be followed, or `NotFound` if
    /// it does not end up on soundcloud.com.
    pub async fn prepare_url(&self, url: &str) -> Result<String> {
        let mut url = self.strip_mobile_prefix(url);

        if self.config.convert_firebase_urls && urls::is_firebase_url(&url) {
            url = self.follow_share_link(&url).await?;
        }

        if urls::is_new_mobile_url(&url) {
            url = self.follow_share_link(&url).await?;
        }

        Ok(url)
    }

    fn strip_mobile_prefix(&self, url: &str) -> String {
        if self.config.strip_mobile_prefix {
            urls::strip_mobile_prefix(url)
        } else {
            url.to_string()
        }
    }

    async fn follow_share_link(&self, url: &str) -> Result<String> {
        let target = self
            .transport
            .resolve_redirects(Url::parse(url)?)
            .await?
            .to_string();

        if !urls::is_url(&target) {
            return Err(Error::not_found(format!(
                "{url} does not lead to soundcloud.com"
            )));
        }

        debug!("{url} leads to {target}");
        Ok(self.strip_mobile_prefix(&target))
    }

    /// Fetches and decodes `url`.
    pub(crate) async fn get_json<T>(&self, url: Url, origin: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de> + Debug,
    {
        let body = self.transport.get(url).await?;
        protocol::json(&body, origin)
    }

    /// Resolves a user-facing resource URL into the resource it points at.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing lives at `url`, or a decode error if it
    /// is a different kind of resource than `T`.
    pub async fn resolve<T>(&self, url: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de> + Debug,
    {
        let url = self.prepare_url(url).await?;
        let endpoint = self.build_url(
            self.endpoint(&["resolve"])?,
            [("url", url.trim_end_matches('/'))],
        );
        self.get_json(endpoint, "resolve").await
    }
}
