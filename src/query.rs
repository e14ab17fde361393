//! Users, likes and search, and paging through their results.
//!
//! Likes and search return one [`PaginatedQuery`] page at a time. Its
//! `next_href` is the cursor of the following page; pass the page to
//! [`Client::next_page`] to fetch it.

use std::fmt;

use url::Url;

use crate::{
    client::Client,
    error::{Error, Result},
    protocol::{PaginatedQuery, User},
};

/// Number of items per page unless asked otherwise.
pub const DEFAULT_LIMIT: usize = 10;

/// Which user to look up: by profile URL or by ID.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserOptions {
    pub profile_url: Option<String>,
    pub id: Option<u64>,
}

impl UserOptions {
    #[must_use]
    pub fn url(profile_url: impl Into<String>) -> Self {
        Self {
            profile_url: Some(profile_url.into()),
            id: None,
        }
    }

    #[must_use]
    pub fn id(id: u64) -> Self {
        Self {
            profile_url: None,
            id: Some(id),
        }
    }
}

/// The kind of likes to list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LikeKind {
    #[default]
    All,
    Tracks,
    Playlists,
}

impl LikeKind {
    fn path(self) -> &'static str {
        match self {
            Self::All => "likes",
            Self::Tracks => "track_likes",
            Self::Playlists => "playlist_likes",
        }
    }
}

/// The likes of a user, by profile URL or ID.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LikesOptions {
    pub profile_url: Option<String>,
    pub id: Option<u64>,

    /// Items per page; 0 means [`DEFAULT_LIMIT`].
    pub limit: usize,

    /// Opaque cursor to continue from.
    pub offset: Option<String>,

    pub kind: LikeKind,
}

/// The kind of search results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchKind {
    #[default]
    All,
    Tracks,
    Albums,
    Playlists,
    Users,
}

impl SearchKind {
    fn path(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Tracks => Some("tracks"),
            Self::Albums => Some("albums"),
            Self::Playlists => Some("playlists_without_albums"),
            Self::Users => Some("users"),
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.path().unwrap_or("all"))
    }
}

/// A search, either fresh by query or continued from a previous page's
/// `next_href`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub query_url: Option<String>,
    pub query: String,

    /// Items per page; 0 means [`DEFAULT_LIMIT`].
    pub limit: usize,

    pub offset: usize,
    pub kind: SearchKind,
}

impl SearchOptions {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

fn limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit
    }
}

impl Client {
    /// Looks up a user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if neither a profile URL nor an ID is given.
    pub async fn get_user(&self, options: UserOptions) -> Result<User> {
        match options {
            UserOptions {
                profile_url: Some(url),
                ..
            } if !url.is_empty() => self.resolve(&url).await,
            UserOptions { id: Some(id), .. } => {
                let id = id.to_string();
                let url = self.build_url(self.endpoint(&["users", id.as_str()])?, []);
                self.get_json(url, "user").await
            }
            _ => Err(Error::invalid_argument(
                "either a profile url or a user id is required",
            )),
        }
    }

    /// Fetches one page of the likes of a user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if neither a profile URL nor an ID is given.
    pub async fn get_likes(&self, options: LikesOptions) -> Result<PaginatedQuery> {
        let id = match (options.profile_url, options.id) {
            (Some(url), _) if !url.is_empty() => self.get_user(UserOptions::url(url)).await?.id,
            (_, Some(id)) => id,
            _ => {
                return Err(Error::invalid_argument(
                    "either a profile url or a user id is required",
                ))
            }
        };

        let limit = limit(options.limit).to_string();
        let mut query = vec![("limit", limit.as_str())];
        if let Some(offset) = options.offset.as_deref().filter(|offset| !offset.is_empty()) {
            query.push(("offset", offset));
        }

        let id = id.to_string();
        let endpoint = self.endpoint(&["users", id.as_str(), options.kind.path()])?;
        let url = self.build_url(endpoint, query);
        self.get_json(url, "likes").await
    }

    /// Fetches one page of search results.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `query_url` is not a valid URL.
    pub async fn search(&self, options: SearchOptions) -> Result<PaginatedQuery> {
        if let Some(query_url) = options.query_url.filter(|url| !url.is_empty()) {
            let url = self.build_url(Url::parse(&query_url)?, []);
            return self.get_json(url, "search").await;
        }

        let mut path = vec!["search"];
        path.extend(options.kind.path());

        let limit = limit(options.limit).to_string();
        let offset = options.offset.to_string();
        let url = self.build_url(
            self.endpoint(&path)?,
            [
                ("q", options.query.as_str()),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ],
        );
        self.get_json(url, "search").await
    }

    /// Fetches the page after `page`, or `None` at the end of pagination.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the cursor is not a valid URL.
    pub async fn next_page(&self, page: &PaginatedQuery) -> Result<Option<PaginatedQuery>> {
        if !page.has_next() {
            return Ok(None);
        }

        let url = self.build_url(Url::parse(&page.next_href)?, []);
        self.get_json(url, "next page").await.map(Some)
    }
}
