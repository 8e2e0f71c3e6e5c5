use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::blog::{Post, PostDraft};
use crate::config::ApiConfig;

use super::error::ApiError;

const POSTS_RESOURCE: &str = "posts";

/// The remote collaborator behind the four blog operations.
///
/// Implementations perform exactly one attempt per call. Cancellation is
/// handled by the caller dropping the returned future.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// `GET posts`
    async fn list(&self) -> Result<Vec<Post>, ApiError>;

    /// `POST posts`
    async fn create(&self, draft: &PostDraft) -> Result<Post, ApiError>;

    /// `PUT posts/{post_id}`
    async fn update(&self, post_id: &str, post: &Post) -> Result<Post, ApiError>;

    /// `DELETE posts/{post_id}`. The server may echo the removed post or
    /// answer with an empty body.
    async fn delete(&self, post_id: &str) -> Result<Option<Post>, ApiError>;
}

/// [`PostsApi`] over HTTP with JSON bodies.
pub struct HttpPostsApi {
    client: Client,
    base_url: Url,
}

impl HttpPostsApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .build()
            .map_err(|e| ApiError::Transport {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/posts[/{post_id}]`, percent-encoding the id.
    fn posts_url(&self, post_id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?;
            segments.pop_if_empty().push(POSTS_RESOURCE);
            if let Some(id) = post_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Vec<u8>, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        if status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "posts api response");
            return Ok(body.to_vec());
        }

        tracing::debug!(%url, status = status.as_u16(), "posts api error response");
        Err(ApiError::Status {
            status: status.as_u16(),
            body: error_body(&body),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let mut builder = self.client.request(method, url.clone());
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let bytes = self.send(builder, &url).await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn list(&self) -> Result<Vec<Post>, ApiError> {
        let url = self.posts_url(None)?;
        self.request(Method::GET, url, None).await
    }

    async fn create(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let url = self.posts_url(None)?;
        let body = to_body(draft, &url)?;
        self.request(Method::POST, url, Some(body)).await
    }

    async fn update(&self, post_id: &str, post: &Post) -> Result<Post, ApiError> {
        let url = self.posts_url(Some(post_id))?;
        let body = to_body(post, &url)?;
        self.request(Method::PUT, url, Some(body)).await
    }

    async fn delete(&self, post_id: &str) -> Result<Option<Post>, ApiError> {
        let url = self.posts_url(Some(post_id))?;
        let builder = self.client.request(Method::DELETE, url.clone());
        let bytes = self.send(builder, &url).await?;
        Ok(deleted_echo(&bytes))
    }
}

fn to_body<T: serde::Serialize>(value: &T, url: &Url) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Encode {
        url: url.to_string(),
        source: e,
    })
}

/// Parse an error response body, keeping non-JSON text as a JSON string.
fn error_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Interpret a DELETE response body. Empty bodies, `{}` and anything that is
/// not a post are treated as "no echo".
fn deleted_echo(bytes: &[u8]) -> Option<Post> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) if map.is_empty() => None,
        Ok(value) => serde_json::from_value(value).ok(),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring undecodable delete response");
            None
        }
    }
}
