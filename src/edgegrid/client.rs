use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::config::Credentials;
use super::signer::{SignedRequest, Signer};

/// User agent for API requests
const USER_AGENT: &str = concat!("tfexport/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Errors returned by the management API clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status
    #[error("API error ({status}) for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// Blocking HTTP client that signs every request with EdgeGrid credentials
pub struct EdgeGridClient {
    http: Client,
    base: Url,
    credentials: Credentials,
}

impl fmt::Debug for EdgeGridClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeGridClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl EdgeGridClient {
    pub fn new(credentials: Credentials) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        let base = Url::parse(&format!("https://{}/", credentials.host))?;

        Ok(Self {
            http,
            base,
            credentials,
        })
    }

    /// Build an absolute URL for `path` with the given query parameters
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Signed GET decoding a JSON response
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;
        let authorization = self.authorization("GET", &url, None);

        tracing::debug!(url = %url, "GET");
        let response = self
            .http
            .get(url.clone())
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?;

        Self::decode(url, response)
    }

    /// Signed POST with a JSON body decoding a JSON response
    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;
        let payload = serde_json::to_vec(body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;
        let authorization = self.authorization("POST", &url, Some(&payload));

        tracing::debug!(url = %url, "POST");
        let response = self
            .http
            .post(url.clone())
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(payload)
            .send()?;

        Self::decode(url, response)
    }

    fn authorization(&self, method: &str, url: &Url, body: Option<&[u8]>) -> String {
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        Signer::new(&self.credentials).authorization(&SignedRequest {
            method,
            scheme: url.scheme(),
            host: url.host_str().unwrap_or(&self.credentials.host),
            path_and_query: &path_and_query,
            body,
        })
    }

    fn decode<T: DeserializeOwned>(
        url: Url,
        response: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text()?;
        tracing::debug!(url = %url, status = status.as_u16(), bytes = body.len(), "response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
