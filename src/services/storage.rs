use anyhow::{Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};

/// Body of an object as it arrives from the bucket.
pub struct ObjectStream {
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, std::io::Result<Bytes>>,
}

impl ObjectStream {
    pub fn new(
        content_length: Option<u64>,
        body: BoxStream<'static, std::io::Result<Bytes>>,
    ) -> Self {
        Self {
            content_length,
            body,
        }
    }
}

impl std::fmt::Debug for ObjectStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStream")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Public URL of `key`.
    fn object_url(&self, key: &str) -> String;

    /// Open `key` for streaming. Fails unless the bucket answers with a success status.
    async fn get_object_stream(&self, key: &str) -> Result<ObjectStream>;
}

/// Bucket reachable over plain HTTP under a fixed base URL.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpObjectStore {
    /// `base_url` must already end with '/'; keys are appended verbatim.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn object_url(&self, key: &str) -> String {
        format!("{}{}", self.base_url, key)
    }

    async fn get_object_stream(&self, key: &str) -> Result<ObjectStream> {
        let url = self.object_url(key);
        let res = self.client.get(&url).send().await?;

        let status = res.status();
        if !status.is_success() {
            bail!("GET {} returned {}", url, status);
        }

        let content_length = res.content_length();
        let body = res.bytes_stream().map_err(std::io::Error::other).boxed();

        Ok(ObjectStream::new(content_length, body))
    }
}
