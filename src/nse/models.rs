//! Provider wire types
//!
//! Field names mirror the provider's JSON. Only the fields the pipeline
//! reads are modeled; everything else in the payloads is ignored.

use serde::Deserialize;

/// Aggregate-indices payload (`/api/allIndices`).
#[derive(Debug, Clone, Deserialize)]
pub struct IndicesPayload {
    pub data: Vec<IndexQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexQuote {
    pub index: String,
    /// Last traded level
    pub last: f64,
}

/// Option-chain payload (`/api/option-chain-indices`).
#[derive(Debug, Clone, Deserialize)]
pub struct OptionChainPayload {
    pub records: ChainRecords,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainRecords {
    /// Expiry dates in the provider's own order; the first entry is the
    /// front expiry.
    #[serde(rename = "expiryDates")]
    pub expiry_dates: Vec<String>,
    pub data: Vec<ChainEntry>,
}

/// One strike/expiry row. Either option side can be absent when the
/// provider has no contract listed for it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainEntry {
    #[serde(rename = "strikePrice")]
    pub strike_price: f64,

    #[serde(rename = "expiryDate")]
    pub expiry_date: String,

    #[serde(rename = "CE")]
    pub call: Option<OptionSide>,

    #[serde(rename = "PE")]
    pub put: Option<OptionSide>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionSide {
    #[serde(rename = "openInterest")]
    pub open_interest: u64,

    #[serde(rename = "changeinOpenInterest")]
    pub change_in_oi: i64,

    #[serde(rename = "totalTradedVolume")]
    pub volume: u64,

    #[serde(rename = "impliedVolatility")]
    pub implied_volatility: f64,
}
