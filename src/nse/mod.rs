//! NSE provider client
//!
//! Session bootstrap and authenticated fetches against the provider's
//! public option-chain endpoints.

mod client;
mod models;
mod session;

pub use client::{http_client, MarketClient, ProviderEndpoints};
pub use models::{ChainEntry, ChainRecords, IndexQuote, IndicesPayload, OptionChainPayload, OptionSide};
pub use session::{SessionAuthenticator, SessionCookies};
