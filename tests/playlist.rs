mod common;

use std::sync::Arc;

use common::{client, ids, query, stub, track, FakeTransport, Reply};
use scloud::{error::ErrorKind, protocol::Track};
use serde_json::{json, Value};

const URL: &str = "https://soundcloud.com/artist/sets/album";

/// ID of the track at `position` of the fake playlist.
fn id_at(position: usize) -> u64 {
    1000 + position as u64
}

fn playlist(track_count: usize) -> Value {
    let tracks: Vec<Value> = (0..track_count)
        .map(|position| {
            if position < 5 {
                track(id_at(position))
            } else {
                stub(id_at(position))
            }
        })
        .collect();

    json!({
        "id": 42,
        "kind": "playlist",
        "title": "album",
        "secret_token": "s-token",
        "track_count": track_count,
        "tracks": tracks,
    })
}

/// A playlist of `track_count` tracks whose batch endpoint leaves out
/// `restricted`, fails batches containing `failing`, and answers batches
/// in reverse order.
fn fake(track_count: usize, restricted: &'static [u64], failing: Option<u64>) -> Arc<FakeTransport> {
    FakeTransport::new(move |url| match url.path() {
        "/resolve" => Reply::json(playlist(track_count)),
        "/tracks" => {
            let ids = ids(url);
            if failing.is_some_and(|failing| ids.contains(&failing)) {
                return Reply::status(500);
            }
            let tracks: Vec<Value> = ids
                .into_iter()
                .rev()
                .filter(|id| !restricted.contains(id))
                .map(track)
                .collect();
            Reply::json(Value::Array(tracks))
        }
        other => panic!("unexpected request to {other}"),
    })
}

fn ids_of(tracks: &[Track]) -> Vec<u64> {
    tracks.iter().map(|track| track.id).collect()
}

#[tokio::test]
async fn inline_playlist_needs_no_batches() {
    let transport = fake(5, &[], None);
    let client = client(transport.clone()).await;

    let playlist = client.get_playlist_info(URL).await.unwrap();
    assert_eq!(playlist.tracks.len(), 5);
    assert_eq!(ids_of(&playlist.tracks), (0..5).map(id_at).collect::<Vec<_>>());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn empty_playlist() {
    let transport = fake(0, &[], None);
    let client = client(transport.clone()).await;

    let playlist = client.get_playlist_info(URL).await.unwrap();
    assert!(playlist.tracks.is_empty());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn fifty_stubs_fit_one_batch() {
    let transport = fake(55, &[], None);
    let client = client(transport.clone()).await;

    let playlist = client.get_playlist_info(URL).await.unwrap();
    assert_eq!(playlist.tracks.len(), 55);
    assert_eq!(transport.requests_to("/tracks").len(), 1);
}

#[tokio::test]
async fn fifty_five_stubs_take_two_batches() {
    let transport = fake(60, &[], None);
    let client = client(transport.clone()).await;

    let playlist = client.get_playlist_info(URL).await.unwrap();
    assert_eq!(playlist.tracks.len(), 60);
    assert_eq!(ids_of(&playlist.tracks), (0..60).map(id_at).collect::<Vec<_>>());
    assert!(playlist.tracks.iter().all(|track| track.title.starts_with("track ")));

    let mut sizes: Vec<usize> = transport
        .requests_to("/tracks")
        .iter()
        .map(|url| ids(url).len())
        .collect();
    sizes.sort_unstable();
    assert_eq!(sizes, [5, 50]);
}

#[tokio::test]
async fn batches_carry_playlist_context() {
    let transport = fake(8, &[], None);
    let client = client(transport.clone()).await;

    client.get_playlist_info(URL).await.unwrap();

    let batch = &transport.requests_to("/tracks")[0];
    assert_eq!(ids(batch), [id_at(5), id_at(6), id_at(7)]);
    assert_eq!(query(batch, "playlistId").as_deref(), Some("42"));
    assert_eq!(query(batch, "playlistSecretToken").as_deref(), Some("s-token"));
}

#[tokio::test]
async fn restricted_tracks_leave_holes_in_place() {
    let transport = fake(120, &[1007, 1060, 1119], None);
    let client = client(transport).await;

    let playlist = client.get_playlist_info(URL).await.unwrap();
    assert_eq!(playlist.tracks.len(), playlist.track_count);
    assert_eq!(playlist.missing_tracks(), 3);

    for (position, track) in playlist.tracks.iter().enumerate() {
        if [7, 60, 119].contains(&position) {
            assert!(track.is_placeholder(), "position {position} should be a hole");
        } else {
            assert_eq!(track.id, id_at(position));
        }
    }
}

#[tokio::test]
async fn one_failing_batch_fails_the_playlist() {
    let transport = fake(160, &[], Some(id_at(100)));
    let client = client(transport).await;

    let err = client.get_playlist_info(URL).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unavailable);
    assert_eq!(err.status().map(|status| status.as_u16()), Some(500));
}

#[tokio::test]
async fn rejects_non_playlists() {
    let transport = FakeTransport::new(|_| Reply::json(track(1)));
    let client = client(transport).await;

    let err = client.get_playlist_info(URL).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn short_stub_list_is_padded() {
    let transport = FakeTransport::new(|url| match url.path() {
        "/resolve" => {
            let mut playlist = playlist(7);
            playlist["track_count"] = json!(9);
            Reply::json(playlist)
        }
        _ => Reply::json(Value::Array(ids(url).into_iter().map(track).collect())),
    });
    let client = client(transport).await;

    let playlist = client.get_playlist_info(URL).await.unwrap();
    assert_eq!(playlist.tracks.len(), 9);
    assert_eq!(ids_of(&playlist.tracks[5..7]), [id_at(5), id_at(6)]);
    assert!(playlist.tracks[7].is_placeholder());
    assert!(playlist.tracks[8].is_placeholder());
}
