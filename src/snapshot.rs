//! Published analytics snapshots
//!
//! One immutable snapshot per instrument, replaced wholesale by the refresh
//! worker and read concurrently by API handlers. Slots start empty and stay
//! empty until the first successful cycle.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analytics::StrikeRecord;
use crate::types::Instrument;

/// Result of one completed refresh cycle for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    /// Cycle completion time, wall clock, second precision
    pub timestamp: String,
    pub support: f64,
    pub resistance: f64,
    pub strikes: Vec<StrikeRecord>,
}

impl InstrumentSnapshot {
    pub fn new(support: f64, resistance: f64, strikes: Vec<StrikeRecord>) -> Self {
        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            support,
            resistance,
            strikes,
        }
    }
}

/// Latest snapshot per instrument.
///
/// Publication swaps the slot's `Arc` in a single assignment under the
/// write guard, so a reader observes either the previous complete snapshot
/// or the new one, never a mix. The two slots are independent; no
/// cross-instrument atomicity.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    nifty: RwLock<Option<Arc<InstrumentSnapshot>>>,
    bank_nifty: RwLock<Option<Arc<InstrumentSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, instrument: Instrument) -> &RwLock<Option<Arc<InstrumentSnapshot>>> {
        match instrument {
            Instrument::Nifty => &self.nifty,
            Instrument::BankNifty => &self.bank_nifty,
        }
    }

    /// Replace the instrument's snapshot. The previous value stays alive
    /// for any reader still holding its `Arc`.
    pub async fn publish(&self, instrument: Instrument, snapshot: InstrumentSnapshot) {
        *self.slot(instrument).write().await = Some(Arc::new(snapshot));
    }

    /// Latest snapshot, or `None` before the first successful cycle.
    pub async fn latest(&self, instrument: Instrument) -> Option<Arc<InstrumentSnapshot>> {
        self.slot(instrument).read().await.clone()
    }
}
