//! Refresh worker
//!
//! The single background producer: bootstrap a session, fetch index levels
//! and both option chains, transform, publish, sleep, repeat. A failed
//! cycle is logged and skipped; the previously published snapshots stay
//! servable until a later cycle succeeds.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::analytics::{self, nearest_strike, StrikeRecord};
use crate::config::RefreshConfig;
use crate::error::{CycleError, FetchError};
use crate::nse::{MarketClient, ProviderEndpoints, SessionAuthenticator, SessionCookies};
use crate::snapshot::{InstrumentSnapshot, SnapshotStore};
use crate::types::Instrument;

pub struct RefreshWorker {
    authenticator: SessionAuthenticator,
    client: MarketClient,
    endpoints: ProviderEndpoints,
    store: Arc<SnapshotStore>,
    poll_interval: Duration,
    window_half_width: u32,
}

impl RefreshWorker {
    pub fn new(
        authenticator: SessionAuthenticator,
        client: MarketClient,
        endpoints: ProviderEndpoints,
        store: Arc<SnapshotStore>,
        cfg: &RefreshConfig,
    ) -> Self {
        Self {
            authenticator,
            client,
            endpoints,
            store,
            poll_interval: Duration::from_secs(cfg.poll_interval_secs),
            window_half_width: cfg.window_half_width,
        }
    }

    /// Run forever. The cooldown counts from cycle completion, so a slow
    /// provider stretches the effective period rather than stacking cycles.
    pub async fn run(self) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            "refresh worker started"
        );
        loop {
            match self.run_cycle().await {
                Ok(()) => debug!("cycle published fresh snapshots"),
                Err(e) => warn!(error = %e, "cycle aborted, keeping previous snapshots"),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One full fetch → transform → publish cycle for both instruments.
    ///
    /// Public so tests can drive a single cycle deterministically without
    /// waiting on the wall-clock cooldown.
    pub async fn run_cycle(&self) -> Result<(), CycleError> {
        // Fresh credential every cycle; never reused across cycles.
        let session = self.authenticator.acquire().await?;

        let (indices_raw, nifty_raw, bank_nifty_raw) = self.fetch_all(&session).await?;

        let ((nifty_support, nifty_resistance), nifty_window) =
            self.analyze(Instrument::Nifty, &indices_raw, &nifty_raw)?;
        let ((bank_support, bank_resistance), bank_window) =
            self.analyze(Instrument::BankNifty, &indices_raw, &bank_nifty_raw)?;

        // Both snapshots share one completion timestamp.
        let completed_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.store
            .publish(
                Instrument::Nifty,
                InstrumentSnapshot {
                    timestamp: completed_at.clone(),
                    support: nifty_support,
                    resistance: nifty_resistance,
                    strikes: nifty_window,
                },
            )
            .await;
        self.store
            .publish(
                Instrument::BankNifty,
                InstrumentSnapshot {
                    timestamp: completed_at,
                    support: bank_support,
                    resistance: bank_resistance,
                    strikes: bank_window,
                },
            )
            .await;
        Ok(())
    }

    /// Fetch the three per-cycle payloads on the shared network session.
    ///
    /// The indices payload comes first; the two chain fetches are mutually
    /// independent and run concurrently. All three must land before
    /// analytics run, so the first failure fails the whole fetch phase.
    async fn fetch_all(
        &self,
        session: &SessionCookies,
    ) -> Result<(String, String, String), FetchError> {
        let indices_raw = self
            .fetch_renewing(&self.endpoints.indices(), session)
            .await?;

        let nifty_url = self.endpoints.option_chain(Instrument::Nifty);
        let bank_nifty_url = self.endpoints.option_chain(Instrument::BankNifty);
        let (nifty_raw, bank_nifty_raw) = tokio::try_join!(
            self.fetch_renewing(&nifty_url, session),
            self.fetch_renewing(&bank_nifty_url, session),
        )?;

        Ok((indices_raw, nifty_raw, bank_nifty_raw))
    }

    /// Fetch with one-shot credential renewal: a 401 triggers exactly one
    /// re-bootstrap and retry of this call. A second 401 propagates and
    /// aborts the cycle.
    async fn fetch_renewing(
        &self,
        url: &str,
        session: &SessionCookies,
    ) -> Result<String, FetchError> {
        match self.client.fetch(url, session).await {
            Err(FetchError::AuthExpired) => {
                debug!(url, "session rejected, renewing cookies and retrying once");
                let renewed = self.authenticator.acquire().await?;
                self.client.fetch(url, &renewed).await
            }
            result => result,
        }
    }

    /// Derive (support, resistance) and the strike window for one
    /// instrument from the cycle's raw payloads.
    fn analyze(
        &self,
        instrument: Instrument,
        indices_raw: &str,
        chain_raw: &str,
    ) -> Result<((f64, f64), Vec<StrikeRecord>), CycleError> {
        let level = analytics::index_level(indices_raw, instrument)?;
        let step = instrument.strike_step();
        let center = nearest_strike(level, step);

        let window = analytics::extract_window(chain_raw, center, step, self.window_half_width)?;
        let (support, resistance) = analytics::derive_levels(&window)?;

        debug!(
            %instrument,
            level,
            center,
            support,
            resistance,
            strikes = window.len(),
            "computed analysis window"
        );
        Ok(((support, resistance), window))
    }
}
