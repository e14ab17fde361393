//! Scraping of an anonymous `client_id` from the web player.
//!
//! The web player bootstraps with a `client_id` embedded in one of its
//! JavaScript assets. The home page references those assets as
//!
//! ```html
//! <script crossorigin src="https://a-v2.sndcdn.com/assets/49-4786a0ba.js"></script>
//! ```
//!
//! and the one carrying the configuration has so far always been the last
//! of them. Inside, the ID appears as `,client_id:"…"`.

use std::sync::LazyLock;

use regex_lite::Regex;
use url::Url;

use crate::{
    error::{Error, Result},
    http::Transport,
};

/// Page that references the web player assets.
pub const BOOTSTRAP_URL: &str = "https://soundcloud.com";

static ASSET_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script crossorigin src="(https://a-v2\.sndcdn\.com/assets/[^"]+)""#)
        .expect("invalid asset script pattern")
});

static CLIENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",client_id:"([^"]+)""#).expect("invalid client id pattern"));

/// Fetches a fresh `client_id` from the web player.
///
/// # Errors
///
/// Returns a transport error if either page cannot be fetched, and
/// `NotFound` if the page layout changed so that no asset or ID is found.
pub async fn fetch_client_id(transport: &dyn Transport) -> Result<String> {
    debug!("fetching client id from {BOOTSTRAP_URL}");
    let page = transport.get(Url::parse(BOOTSTRAP_URL)?).await?;
    let page = String::from_utf8_lossy(&page);

    let script = last_asset_script(&page)
        .ok_or_else(|| Error::not_found("no web player asset script found"))?;
    trace!("client id script: {script}");

    let script = transport.get(Url::parse(script)?).await?;
    let script = String::from_utf8_lossy(&script);
    let client_id = find_client_id(&script)
        .ok_or_else(|| Error::not_found("no client id found in web player assets"))?;

    debug!("fetched client id");
    Ok(client_id.to_string())
}

fn last_asset_script(page: &str) -> Option<&str> {
    ASSET_SCRIPT
        .captures_iter(page)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|script| script.as_str())
}

fn find_client_id(script: &str) -> Option<&str> {
    CLIENT_ID
        .captures(script)
        .and_then(|captures| captures.get(1))
        .map(|client_id| client_id.as_str())
}
