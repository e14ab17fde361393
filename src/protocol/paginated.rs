//! One page of a paginated collection.
//!
//! Search results, likes and similar listings arrive as a page of
//! heterogeneous items, each tagged with a `kind`:
//!
//! ```json
//! {
//!     "collection": [
//!         { "kind": "track", "id": 1, ... },
//!         { "kind": "playlist", "id": 2, ... },
//!         { "kind": "user", "id": 3, ... }
//!     ],
//!     "total_results": 1234,
//!     "next_href": "https://api-v2.soundcloud.com/search?q=...&offset=10",
//!     "query_urn": "soundcloud:search:..."
//! }
//! ```
//!
//! The items are kept as raw JSON; the typed projections pick out the
//! items of one kind and skip everything that does not decode.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use super::{Like, Playlist, Track};

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginatedQuery {
    #[serde_as(as = "DefaultOnNull")]
    pub collection: Vec<serde_json::Value>,

    #[serde_as(as = "DefaultOnNull")]
    pub total_results: u64,

    /// Continuation URL of the next page. Empty at the end of pagination.
    #[serde_as(as = "DefaultOnNull")]
    pub next_href: String,

    pub query_urn: Option<String>,
}

impl PaginatedQuery {
    /// Whether there is a next page to fetch.
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.next_href.is_empty()
    }

    /// The tracks on this page.
    #[must_use]
    pub fn tracks(&self) -> Vec<Track> {
        self.project(|track: &Track| track.kind == Track::KIND)
    }

    /// The playlists and albums on this page.
    #[must_use]
    pub fn playlists(&self) -> Vec<Playlist> {
        self.project(|playlist: &Playlist| playlist.kind == Playlist::KIND)
    }

    /// The likes on this page, with exactly one of track or playlist set.
    #[must_use]
    pub fn likes(&self) -> Vec<Like> {
        self.project(|like: &Like| like.item().is_some())
    }

    /// Decodes every item as `T` and keeps those that decode and pass
    /// `accept`, in page order.
    fn project<T, F>(&self, accept: F) -> Vec<T>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        self.collection
            .iter()
            .filter_map(|item| T::deserialize(item).ok())
            .filter(|item| accept(item))
            .collect()
    }
}
