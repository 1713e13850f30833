//! Error types for the refresh pipeline

use thiserror::Error;

/// Failures raised by the session authenticator and market fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Timeout or connection-level failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider rejected the session cookies (HTTP 401).
    #[error("provider rejected session cookies")]
    AuthExpired,

    /// Any other unexpected response status.
    #[error("unexpected provider status {0}")]
    Provider(u16),
}

/// Failures raised while transforming raw payloads into analytics.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("malformed provider payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("option chain payload has no expiry dates")]
    NoExpiries,

    #[error("index {0:?} missing from aggregate indices payload")]
    MissingIndex(String),

    /// The window holds zero analyzable strikes. Distinct from a default
    /// level pair, which would be indistinguishable from a real strike.
    #[error("no analyzable strikes in window")]
    EmptyWindow,
}

/// Anything that aborts a single refresh cycle.
///
/// Caught at the cycle boundary: the loop logs it, keeps the previous
/// snapshots servable, and tries again after the regular cooldown.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
