//! Provider session bootstrap
//!
//! The provider hands out session cookies on its landing page and rejects
//! API calls made without them. The cookie jar is treated as an opaque
//! credential: whatever the bootstrap response sets is replayed verbatim
//! on every fetch. Renewal policy lives in the refresh loop, not here.

use reqwest::Client;
use tracing::debug;

use crate::error::FetchError;

/// Opaque session credential captured from the bootstrap response.
#[derive(Debug, Clone, Default)]
pub struct SessionCookies {
    cookies: Vec<(String, String)>,
}

impl SessionCookies {
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Render the `Cookie:` request-header value.
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn from_response(response: &reqwest::Response) -> Self {
        let cookies = response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();
        Self { cookies }
    }
}

/// Obtains fresh session cookies from the provider's landing page.
pub struct SessionAuthenticator {
    http: Client,
    landing_url: String,
}

impl SessionAuthenticator {
    pub fn new(http: Client, landing_url: impl Into<String>) -> Self {
        Self {
            http,
            landing_url: landing_url.into(),
        }
    }

    /// One GET against the landing page; whatever cookies the response sets
    /// are the credential. Fails only on network-level errors — no retries
    /// here, retry policy belongs to the refresh loop.
    pub async fn acquire(&self) -> Result<SessionCookies, FetchError> {
        let response = self.http.get(&self.landing_url).send().await?;
        let session = SessionCookies::from_response(&response);
        debug!(
            status = response.status().as_u16(),
            cookies = session.len(),
            "acquired provider session cookies"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_joins_cookies_in_capture_order() {
        let session = SessionCookies {
            cookies: vec![
                ("nsit".to_string(), "abc".to_string()),
                ("nseappid".to_string(), "xyz".to_string()),
            ],
        };
        assert_eq!(session.header_value(), "nsit=abc; nseappid=xyz");
    }

    #[test]
    fn empty_jar_renders_empty_header() {
        let session = SessionCookies::default();
        assert!(session.is_empty());
        assert_eq!(session.header_value(), "");
    }
}
