//! Market-data fetcher
//!
//! Thin authenticated GET wrapper over the provider's JSON endpoints. The
//! fetcher never renews the credential itself: a 401 surfaces as
//! `AuthExpired` so the refresh loop can re-bootstrap and retry the one
//! call that failed.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::session::SessionCookies;
use crate::error::FetchError;
use crate::types::Instrument;

/// Browser-like identity the provider expects; plain client user-agents get
/// classified as bot traffic and rejected.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.149 Safari/537.36";
const ACCEPTED_LANGUAGES: &str = "en,gu;q=0.9,hi;q=0.8";

/// Build the HTTP client shared by the authenticator and fetcher.
///
/// One client means one connection pool, so the bootstrap request and the
/// per-cycle fetches reuse the same network session. Accept-Encoding is
/// negotiated by reqwest (gzip/brotli features), matching the browser
/// header set the provider checks for.
pub fn http_client(timeout: Duration) -> Client {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPTED_LANGUAGES));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// URL set derived from the configured provider base.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    base_url: String,
}

impl ProviderEndpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Landing page that hands out session cookies.
    pub fn bootstrap(&self) -> String {
        format!("{}/option-chain", self.base_url)
    }

    /// Aggregate last-traded levels for all indices.
    pub fn indices(&self) -> String {
        format!("{}/api/allIndices", self.base_url)
    }

    /// Full option chain for one instrument.
    pub fn option_chain(&self, instrument: Instrument) -> String {
        format!(
            "{}/api/option-chain-indices?symbol={}",
            self.base_url,
            instrument.symbol()
        )
    }
}

/// REST fetcher for the provider's JSON endpoints.
pub struct MarketClient {
    http: Client,
}

impl MarketClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Authenticated GET. Returns the raw body on 200. A 401 is reported as
    /// `AuthExpired` for the caller to handle; any other status is a
    /// provider error. A timeout surfaces as a network error, never as a
    /// retryable auth failure.
    pub async fn fetch(&self, url: &str, session: &SessionCookies) -> Result<String, FetchError> {
        let mut request = self.http.get(url);
        if !session.is_empty() {
            request = request.header(COOKIE, session.header_value());
        }
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.text().await?),
            StatusCode::UNAUTHORIZED => Err(FetchError::AuthExpired),
            status => Err(FetchError::Provider(status.as_u16())),
        }
    }
}
