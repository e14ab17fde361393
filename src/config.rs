use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use url::Url;
use veil::Redact;

use crate::error::{Error, Result};

/// Client configuration.
///
/// Everything has a sensible default, so a configuration file only needs
/// to set what differs. The `client_id` is the credential sent along with
/// every API request; when absent, one is scraped from the web player.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Deserialize, Redact)]
#[serde(default)]
pub struct Config {
    #[redact]
    pub client_id: Option<String>,

    pub user_agent: String,

    /// Base URL of the v2 API.
    pub api_url: Url,

    /// Rewrite `m.soundcloud.com` URLs to their desktop form before use.
    pub strip_mobile_prefix: bool,

    /// Follow `soundcloud.app.goo.gl` short links to the URL they share.
    pub convert_firebase_urls: bool,

    #[serde_as(as = "DurationSeconds<u64>")]
    pub read_timeout: Duration,
}

impl Config {
    /// Default base URL of the v2 API.
    pub const API_URL: &'static str = "https://api-v2.soundcloud.com";

    /// Configuration files are small; refuse anything larger.
    const MAX_FILE_SIZE: u64 = 4 * 1024;

    /// Loads a configuration from a TOML file.
    ///
    /// ```toml
    /// client_id = "..."
    /// strip_mobile_prefix = true
    /// convert_firebase_urls = true
    /// read_timeout = 10
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is too large or is not
    /// valid TOML for this structure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Prevent out-of-memory condition: configuration should be small.
        let file_size = fs::metadata(path)?.len();
        if file_size > Self::MAX_FILE_SIZE {
            return Err(Error::invalid_argument(format!(
                "{} is too large",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config = toml::from_str::<Self>(&contents)?;
        trace!("loaded {}: {config:?}", path.display());

        if let Some(client_id) = &config.client_id {
            if client_id.trim().is_empty() {
                return Err(Error::invalid_argument(format!(
                    "{} has an empty client_id",
                    path.display()
                )));
            }
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_client_id(client_id: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let app_name = env!("CARGO_PKG_NAME");
        let app_version = env!("CARGO_PKG_VERSION");

        Self {
            client_id: None,
            user_agent: format!("{app_name}/{app_version}"),
            api_url: Url::parse(Self::API_URL).expect("invalid api url"),
            strip_mobile_prefix: true,
            convert_firebase_urls: false,
            read_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_client_id() {
        let config = Config::with_client_id("abcdefghijklmnop");
        let debug = format!("{config:?}");
        assert!(!debug.contains("abcdefghijklmnop"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("client_id = \"abc\"\nread_timeout = 3\n").unwrap();
        assert_eq!(config.client_id.as_deref(), Some("abc"));
        assert_eq!(config.read_timeout, Duration::from_secs(3));
        assert_eq!(config.api_url.as_str(), "https://api-v2.soundcloud.com/");
        assert!(config.strip_mobile_prefix);
        assert!(!config.convert_firebase_urls);
    }
}
