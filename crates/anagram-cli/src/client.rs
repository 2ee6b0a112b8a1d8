//! Typed HTTP client for the anagram lookup API.

use serde::{Deserialize, Serialize};

/// Failures talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Nothing is listening at the base URL.
    #[error("cannot connect to API at {base_url}")]
    Connection {
        /// The URL that refused the connection.
        base_url: String,
    },

    /// The API answered with an error status.
    #[error("{detail} (HTTP {status})")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `detail` message from the body.
        detail: String,
    },

    /// Any other transport or decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Optional filters for the stats endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsParams {
    /// Earliest request time (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Latest request time (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Exact endpoint path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl StatsParams {
    /// Whether any filter is set.
    pub const fn is_filtered(&self) -> bool {
        self.from.is_some() || self.to.is_some() || self.endpoint.is_some()
    }
}

/// Body of `GET /api/v1/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Distinct words known to the server.
    pub total_words: u64,
    /// Timed requests recorded.
    pub total_requests: u64,
    /// Mean processing time in microseconds.
    pub avg_processing_time_microseconds: u64,
}

#[derive(Deserialize)]
struct SimilarResponse {
    similar: Vec<String>,
}

#[derive(Deserialize)]
struct DetailResponse {
    detail: String,
}

#[derive(Serialize)]
struct AddWordRequest<'a> {
    word: &'a str,
}

/// Client bound to one server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the server at `base_url` (e.g.
    /// `http://localhost:8000`).
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Anagrams of `word` known to the server.
    pub async fn similar(&self, word: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/v1/similar"))
            .query(&[("word", word)])
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        let body: SimilarResponse = Self::decode(response).await?;
        Ok(body.similar)
    }

    /// Add `word`, returning the server's confirmation message.
    pub async fn add_word(&self, word: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("/api/v1/add-word"))
            .json(&AddWordRequest { word })
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        let body: DetailResponse = Self::decode(response).await?;
        Ok(body.detail)
    }

    /// Usage statistics, optionally filtered.
    pub async fn stats(&self, params: &StatsParams) -> Result<StatsResponse, ClientError> {
        let response = self
            .http
            .get(self.url("/api/v1/stats"))
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        Self::decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn transport(&self, error: reqwest::Error) -> ClientError {
        if error.is_connect() {
            ClientError::Connection {
                base_url: self.base_url.clone(),
            }
        } else {
            ClientError::Http(error)
        }
    }

    async fn decode<T>(response: reqwest::Response) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let detail = response
            .json::<DetailResponse>()
            .await
            .map_or_else(|_| "Unknown error".to_owned(), |body| body.detail);
        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}
