//! Fake transport for exercising the client without a network.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use http::StatusCode;
use scloud::{
    config::Config,
    error::{Error, FailedRequest, Result},
    http::{ByteStream, Transport},
    Client,
};
use serde_json::Value;
use url::Url;

/// What the fake answers to one request.
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
    pub delay: Duration,
    pub location: Option<Url>,
}

impl Reply {
    pub fn json(value: Value) -> Self {
        Self::bytes(value.to_string())
    }

    pub fn bytes(body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            delay: Duration::ZERO,
            location: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from_static(br#"{"error":"fake"}"#),
            delay: Duration::ZERO,
            location: None,
        }
    }

    /// A `302 Found` pointing at `location`.
    pub fn redirect(location: &str) -> Self {
        Self {
            status: StatusCode::FOUND,
            body: Bytes::new(),
            delay: Duration::ZERO,
            location: Some(Url::parse(location).unwrap()),
        }
    }

    pub fn after(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

type Handler = dyn Fn(&Url) -> Reply + Send + Sync;

/// Answers requests with a handler and records every URL asked for.
pub struct FakeTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<Url>>,
}

impl FakeTransport {
    const MAX_REDIRECTS: usize = 10;

    pub fn new(handler: impl Fn(&Url) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path is `path`.
    pub fn requests_to(&self, path: &str) -> Vec<Url> {
        self.requests()
            .into_iter()
            .filter(|url| url.path() == path)
            .collect()
    }

    /// Follows redirects like reqwest does, up to the same limit.
    async fn reply(&self, mut url: Url) -> Result<(Url, Bytes)> {
        for _ in 0..=Self::MAX_REDIRECTS {
            self.requests.lock().unwrap().push(url.clone());
            let reply = (self.handler)(&url);
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }

            if let Some(location) = reply.location {
                url = location;
                continue;
            }

            if reply.status.is_success() {
                return Ok((url, reply.body));
            }

            return Err(FailedRequest {
                status: reply.status,
                body: String::from_utf8_lossy(&reply.body).into_owned(),
            }
            .into());
        }

        Err(Error::internal(format!("too many redirects at {url}")))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: Url) -> Result<Bytes> {
        let (_, body) = self.reply(url).await?;
        Ok(body)
    }

    async fn stream(&self, url: Url) -> Result<ByteStream> {
        let (_, body) = self.reply(url).await?;
        let chunks: Vec<Result<Bytes>> = body
            .chunks(3)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }

    async fn resolve_redirects(&self, url: Url) -> Result<Url> {
        let (url, _) = self.reply(url).await?;
        Ok(url)
    }
}

pub const CLIENT_ID: &str = "test-client-id";

pub async fn client(transport: Arc<FakeTransport>) -> Client {
    Client::with_transport(&Config::with_client_id(CLIENT_ID), transport)
        .await
        .unwrap()
}

/// The value of query parameter `key` in `url`.
pub fn query(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.into_owned())
}

/// The IDs of a batch track request.
pub fn ids(url: &Url) -> Vec<u64> {
    query(url, "ids")
        .unwrap_or_default()
        .split(',')
        .filter(|id| !id.is_empty())
        .map(|id| id.parse().unwrap())
        .collect()
}

pub fn track(id: u64) -> Value {
    serde_json::json!({
        "id": id,
        "kind": "track",
        "title": format!("track {id}"),
    })
}

pub fn stub(id: u64) -> Value {
    serde_json::json!({
        "id": id,
        "kind": "track",
        "policy": "ALLOW",
    })
}
