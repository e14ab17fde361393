mod common;

use std::sync::Arc;

use common::{client, query, FakeTransport, Reply, CLIENT_ID};
use scloud::{
    config::Config,
    error::ErrorKind,
    protocol::Liked,
    query::{LikeKind, LikesOptions, SearchKind, SearchOptions, UserOptions},
    Client,
};
use serde_json::json;

fn likes_page() -> Reply {
    Reply::json(json!({
        "collection": [
            {"kind": "like", "created_at": "2024-03-01T12:00:00Z", "track": {"id": 1, "kind": "track"}},
            {"kind": "like", "created_at": "2024-02-01T12:00:00Z", "playlist": {"id": 2, "kind": "playlist"}}
        ],
        "next_href": "https://api-v2.soundcloud.com/users/9/likes?offset=1709294400000&limit=2"
    }))
}

#[tokio::test]
async fn likes_by_id() {
    let transport = FakeTransport::new(|_| likes_page());
    let client = client(transport.clone()).await;

    let page = client
        .get_likes(LikesOptions {
            id: Some(9),
            limit: 2,
            ..LikesOptions::default()
        })
        .await
        .unwrap();

    let likes = page.likes();
    assert_eq!(likes.len(), 2);
    assert!(matches!(likes[0].item(), Some(Liked::Track(track)) if track.id == 1));
    assert!(matches!(likes[1].item(), Some(Liked::Playlist(playlist)) if playlist.id == 2));

    let request = &transport.requests()[0];
    assert_eq!(request.path(), "/users/9/likes");
    assert_eq!(query(request, "limit").as_deref(), Some("2"));
    assert_eq!(query(request, "offset"), None);
}

#[tokio::test]
async fn likes_by_profile_url() {
    let transport = FakeTransport::new(|url| match url.path() {
        "/resolve" => Reply::json(json!({"id": 9, "kind": "user", "username": "someone"})),
        _ => likes_page(),
    });
    let client = client(transport.clone()).await;

    client
        .get_likes(LikesOptions {
            profile_url: Some("https://soundcloud.com/someone".to_string()),
            offset: Some("cursor".to_string()),
            kind: LikeKind::Tracks,
            ..LikesOptions::default()
        })
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].path(), "/resolve");
    assert_eq!(requests[1].path(), "/users/9/track_likes");
    assert_eq!(query(&requests[1], "limit").as_deref(), Some("10"));
    assert_eq!(query(&requests[1], "offset").as_deref(), Some("cursor"));
}

#[tokio::test]
async fn likes_need_a_user() {
    let transport = FakeTransport::new(|_| likes_page());
    let client = client(transport.clone()).await;

    let err = client.get_likes(LikesOptions::default()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn search_paths_per_kind() {
    let transport = FakeTransport::new(|_| Reply::json(json!({"collection": []})));
    let client = client(transport.clone()).await;

    for kind in [
        SearchKind::All,
        SearchKind::Tracks,
        SearchKind::Albums,
        SearchKind::Playlists,
        SearchKind::Users,
    ] {
        client
            .search(SearchOptions {
                kind,
                ..SearchOptions::new("lo fi")
            })
            .await
            .unwrap();
    }

    let paths: Vec<String> = transport
        .requests()
        .iter()
        .map(|url| url.path().to_string())
        .collect();
    assert_eq!(
        paths,
        [
            "/search",
            "/search/tracks",
            "/search/albums",
            "/search/playlists_without_albums",
            "/search/users",
        ]
    );

    let request = &transport.requests()[0];
    assert_eq!(query(request, "q").as_deref(), Some("lo fi"));
    assert_eq!(query(request, "limit").as_deref(), Some("10"));
    assert_eq!(query(request, "offset").as_deref(), Some("0"));
}

#[tokio::test]
async fn pages_through_results() {
    let transport = FakeTransport::new(|url| {
        if query(url, "offset").as_deref() == Some("10") {
            Reply::json(json!({
                "collection": [{"kind": "track", "id": 11}],
                "next_href": null
            }))
        } else {
            Reply::json(json!({
                "collection": [{"kind": "track", "id": 1}, {"kind": "user", "id": 2}],
                "total_results": 11,
                "next_href": "https://api-v2.soundcloud.com/search?q=x&offset=10&limit=10"
            }))
        }
    });
    let client = client(transport.clone()).await;

    let first = client.search(SearchOptions::new("x")).await.unwrap();
    assert_eq!(first.tracks().len(), 1);
    assert!(first.has_next());

    let second = client.next_page(&first).await.unwrap().unwrap();
    assert_eq!(second.tracks()[0].id, 11);
    assert!(client.next_page(&second).await.unwrap().is_none());

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(query(&requests[1], "client_id").as_deref(), Some(CLIENT_ID));
}

#[tokio::test]
async fn continues_search_from_query_url() {
    let transport = FakeTransport::new(|_| Reply::json(json!({"collection": []})));
    let client = client(transport.clone()).await;

    client
        .search(SearchOptions {
            query_url: Some("https://api-v2.soundcloud.com/search/users?q=x&offset=20".to_string()),
            ..SearchOptions::default()
        })
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.path(), "/search/users");
    assert_eq!(query(request, "offset").as_deref(), Some("20"));
    assert_eq!(query(request, "client_id").as_deref(), Some(CLIENT_ID));
}

#[tokio::test]
async fn users_by_id_and_url() {
    let transport = FakeTransport::new(|_| Reply::json(json!({"id": 3, "kind": "user", "username": "u"})));
    let client = client(transport.clone()).await;

    let by_id = client.get_user(UserOptions::id(3)).await.unwrap();
    let by_url = client
        .get_user(UserOptions::url("https://soundcloud.com/u"))
        .await
        .unwrap();
    assert_eq!(by_id, by_url);

    let requests = transport.requests();
    assert_eq!(requests[0].path(), "/users/3");
    assert_eq!(requests[1].path(), "/resolve");

    let err = client.get_user(UserOptions::default()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn scrapes_client_id_when_unconfigured() {
    let transport = FakeTransport::new(|url| match url.as_str() {
        "https://soundcloud.com/" => Reply::bytes(
            r#"<html>
            <script crossorigin src="https://a-v2.sndcdn.com/assets/0-aaaa.js"></script>
            <script crossorigin src="https://a-v2.sndcdn.com/assets/49-bbbb.js"></script>
            </html>"#,
        ),
        "https://a-v2.sndcdn.com/assets/49-bbbb.js" => {
            Reply::bytes(r#"({env:"production",client_id:"scraped123",x:1})"#)
        }
        _ => Reply::status(404),
    });

    let client = Client::with_transport(&Config::default(), transport.clone())
        .await
        .unwrap();
    assert_eq!(client.client_id(), "scraped123");
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn missing_client_id_is_not_found() {
    let transport: Arc<FakeTransport> = FakeTransport::new(|_| Reply::bytes("<html></html>"));

    let err = Client::with_transport(&Config::default(), transport)
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
