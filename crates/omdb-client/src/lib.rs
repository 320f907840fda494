//! HTTP client for the OMDb movie metadata API.
//!
//! This crate provides a Rust client for `http://www.omdbapi.com/`. It handles:
//! - Building the `t` / `y` / `apikey` query for a title lookup
//! - A fixed per-request timeout
//! - Telling "the API doesn't know this movie" apart from "the request failed"
//!
//! One call is one request. There is no retry and no backoff; pacing between
//! calls is the caller's business.

use std::time::Duration;

use async_trait::async_trait;
use data_loader::MovieMetadata;
use pipeline::MetadataLookup;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Public OMDb endpoint
pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Placeholder OMDb uses for fields it has no value for
const NOT_AVAILABLE: &str = "N/A";

/// Errors that can occur when talking to OMDb
#[derive(Error, Debug)]
pub enum OmdbError {
    #[error("invalid OMDb client configuration: {0}")]
    InvalidConfig(String),

    /// Connection refused, DNS failure, timeout, ...
    #[error("OMDb request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OMDb returned an undecodable body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The subset of an OMDb title response the job uses.
///
/// OMDb capitalises its keys; on a miss it sends
/// `{"Response":"False","Error":"Movie not found!"}`.
#[derive(Debug, Deserialize)]
struct TitleResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "BoxOffice")]
    box_office: Option<String>,
}

impl TitleResponse {
    fn is_found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    fn into_metadata(self) -> MovieMetadata {
        MovieMetadata {
            director: present(self.director),
            plot: present(self.plot),
            box_office: present(self.box_office),
        }
    }
}

/// Drop empty values and OMDb's "N/A" placeholder.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != NOT_AVAILABLE
    })
}

/// Client for the OMDb title endpoint.
#[derive(Clone)]
pub struct OmdbClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl OmdbClient {
    /// Build a client.
    ///
    /// # Arguments
    /// * `api_key` - OMDb API key, sent as the `apikey` query parameter
    /// * `base_url` - endpoint, normally [`DEFAULT_BASE_URL`]
    /// * `timeout` - applied to every request as a whole
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, OmdbError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OmdbError::InvalidConfig("API key is empty".into()));
        }
        let base_url = Url::parse(base_url)
            .map_err(|e| OmdbError::InvalidConfig(format!("base URL {base_url:?}: {e}")))?;

        let http = Client::builder()
            .user_agent(concat!("movie-etl/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Endpoint this client sends requests to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Look up one movie by title and optional year.
    ///
    /// # Returns
    /// * `Ok(Some(_))` - OMDb answered `"Response": "True"`
    /// * `Ok(None)` - non-200 status, or `"Response": "False"`
    /// * `Err` - the request couldn't be completed or the body wasn't JSON
    pub async fn fetch_title(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<Option<MovieMetadata>, OmdbError> {
        let mut query: Vec<(&str, String)> = vec![("t", title.to_string())];
        if let Some(year) = year {
            query.push(("y", year.to_string()));
        }
        query.push(("apikey", self.api_key.clone()));

        debug!(title, ?year, "querying OMDb");
        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&query)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            warn!(title, %status, "OMDb returned non-success status");
            return Ok(None);
        }

        let body = resp.text().await?;
        let parsed: TitleResponse = serde_json::from_str(&body)?;
        if !parsed.is_found() {
            debug!(
                title,
                reason = parsed.error.as_deref().unwrap_or("unspecified"),
                "OMDb has no match"
            );
            return Ok(None);
        }

        Ok(Some(parsed.into_metadata()))
    }
}

#[async_trait]
impl MetadataLookup for OmdbClient {
    fn name(&self) -> &str {
        "OMDb"
    }

    async fn lookup(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> anyhow::Result<Option<MovieMetadata>> {
        Ok(self.fetch_title(title, year).await?)
    }
}
