//! Classification and rewriting of SoundCloud resource URLs.

use std::sync::LazyLock;

use regex_lite::Regex;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(m\.)?soundcloud\.com/.+").expect("invalid url pattern")
});

static PLAYLIST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(m\.)?soundcloud\.com/[^/?#]+/sets/[^/?#]+")
        .expect("invalid playlist url pattern")
});

static FIREBASE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://soundcloud\.app\.goo\.gl/.+").expect("invalid firebase url pattern")
});

static NEW_MOBILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://on\.soundcloud\.com/.+").expect("invalid new mobile url pattern")
});

static MOBILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://m\.soundcloud\.com/").expect("invalid mobile url pattern")
});

/// Whether `url` points at a resource on soundcloud.com, on the desktop or
/// the mobile site.
#[must_use]
pub fn is_url(url: &str) -> bool {
    URL.is_match(url)
}

/// Whether `url` points at a playlist or album (`/<user>/sets/<name>`).
#[must_use]
pub fn is_playlist_url(url: &str) -> bool {
    PLAYLIST_URL.is_match(url)
}

/// Whether `url` is on the mobile site.
#[must_use]
pub fn is_mobile_url(url: &str) -> bool {
    MOBILE_URL.is_match(url)
}

/// Whether `url` is a Firebase short link shared from the mobile apps.
#[must_use]
pub fn is_firebase_url(url: &str) -> bool {
    FIREBASE_URL.is_match(url)
}

/// Whether `url` is an `on.soundcloud.com` share link.
#[must_use]
pub fn is_new_mobile_url(url: &str) -> bool {
    NEW_MOBILE_URL.is_match(url)
}

/// Rewrites a mobile site URL to its desktop form. Other URLs are returned
/// unchanged.
#[must_use]
pub fn strip_mobile_prefix(url: &str) -> String {
    if is_mobile_url(url) {
        url.replacen("://m.", "://", 1)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_urls() {
        assert!(is_url("https://soundcloud.com/artist/track"));
        assert!(is_url("https://m.soundcloud.com/artist/track"));
        assert!(!is_url("https://soundcloud.com/"));
        assert!(!is_url("https://example.com/artist/track"));

        assert!(is_playlist_url("https://soundcloud.com/artist/sets/album"));
        assert!(!is_playlist_url("https://soundcloud.com/artist/track"));
        assert!(!is_playlist_url("https://soundcloud.com/artist/sets"));
    }

    #[test]
    fn classifies_share_links() {
        assert!(is_firebase_url("https://soundcloud.app.goo.gl/z8snjNyHU8zMHH29A"));
        assert!(!is_firebase_url("https://soundcloud.app.goo.gl/"));
        assert!(!is_firebase_url("https://soundcloud.com/artist/track"));
        assert!(!is_url("https://soundcloud.app.goo.gl/z8snjNyHU8zMHH29A"));

        assert!(is_new_mobile_url("https://on.soundcloud.com/aBcD3"));
        assert!(!is_new_mobile_url("https://on.soundcloud.com/"));
        assert!(!is_new_mobile_url("https://m.soundcloud.com/artist/track"));
        assert!(!is_url("https://on.soundcloud.com/aBcD3"));
    }

    #[test]
    fn strips_mobile_prefix_only() {
        assert_eq!(
            strip_mobile_prefix(
                "https://m.soundcloud.com/taliya-jenkins/double-cheese-burger-hold-the?ref=clipboard&p=i&c=0"
            ),
            "https://soundcloud.com/taliya-jenkins/double-cheese-burger-hold-the?ref=clipboard&p=i&c=0"
        );
        assert_eq!(
            strip_mobile_prefix("https://soundcloud.com/artist/m.track"),
            "https://soundcloud.com/artist/m.track"
        );
    }
}
