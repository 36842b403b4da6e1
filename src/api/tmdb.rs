//! TMDB (The Movie Database) API client
//!
//! Fetches movie details for the detail screen and the `info` command.
//! API docs: https://developer.themoviedb.org/docs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::models::MovieRecord;

/// Default TMDB REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default TMDB image CDN
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Poster width used by the detail screen
pub const DEFAULT_POSTER_SIZE: &str = "w500";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid movie ID: {0:?}")]
    InvalidId(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl From<TmdbError> for FetchError {
    fn from(err: TmdbError) -> Self {
        match err {
            TmdbError::NotFound => FetchError::NotFound(err.to_string()),
            TmdbError::InvalidId(_) => FetchError::Misuse(err.to_string()),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// Anything that can look up a movie by id
///
/// [`TmdbClient`] is the real implementation; tests plug in their own.
pub trait MovieSource: Send + Sync {
    fn movie_details(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<MovieRecord, TmdbError>> + Send;
}

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_http_client(DEFAULT_TIMEOUT),
            max_retries: 3,
        }
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an authenticated GET request with retry logic for rate limits
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, TmdbError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            tracing::debug!(%url, attempt = retries + 1, "TMDB request");

            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Accept", "application/json")
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    return serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    });
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        tracing::warn!(%url, retries, "TMDB rate limit, giving up");
                        return Err(TmdbError::RateLimited);
                    }

                    // Get Retry-After header or default to exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    tracing::info!(wait_secs, "TMDB rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    tracing::warn!(%url, status = status.as_u16(), "TMDB request failed");
                    return Err(TmdbError::ServerError(status.as_u16()));
                }
            }
        }
    }

    /// Get movie details by TMDB id
    pub async fn movie_details(&self, id: &str) -> Result<MovieRecord, TmdbError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(TmdbError::InvalidId(id.to_string()));
        }

        let endpoint = format!("/movie/{}", urlencoding::encode(id));
        self.get(&endpoint).await
    }
}

impl MovieSource for TmdbClient {
    fn movie_details(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<MovieRecord, TmdbError>> + Send {
        TmdbClient::movie_details(self, id)
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Zero-argument producer that looks up `id` through `source` on every call
///
/// This is what a movie screen hands to [`UseFetch`](crate::fetch::UseFetch).
pub fn movie_details_producer<S>(
    source: Arc<S>,
    id: impl Into<String>,
) -> impl Fn() -> BoxFuture<'static, Result<MovieRecord, TmdbError>> + Send + Sync + 'static
where
    S: MovieSource + 'static,
{
    let id: Arc<str> = Arc::from(id.into());
    move || {
        let source = Arc::clone(&source);
        let id = Arc::clone(&id);
        async move { source.movie_details(&id).await }.boxed()
    }
}

/// Full poster URL, e.g. `https://image.tmdb.org/t/p/w500/abc.jpg`
pub fn poster_url(image_base_url: &str, size: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path.filter(|p| !p.is_empty())?;
    let sep = if path.starts_with('/') { "" } else { "/" };
    Some(format!(
        "{}/{}{}{}",
        image_base_url.trim_end_matches('/'),
        size,
        sep,
        path
    ))
}
