//! Open-interest analytics
//!
//! Turns raw provider payloads into a bounded, strike-centered window of
//! open-interest records and derives support/resistance levels from where
//! put/call open interest concentrates.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::nse::{ChainEntry, IndicesPayload, OptionChainPayload, OptionSide};
use crate::types::Instrument;

/// Per-side stats for one strike in the analysis window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideStats {
    pub open_interest: u64,
    pub change_in_oi: i64,
    pub volume: u64,
    pub implied_volatility: f64,
}

impl From<&OptionSide> for SideStats {
    fn from(side: &OptionSide) -> Self {
        Self {
            open_interest: side.open_interest,
            change_in_oi: side.change_in_oi,
            volume: side.volume,
            implied_volatility: side.implied_volatility,
        }
    }
}

/// One row of the analysis window, ordered by strike ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeRecord {
    pub strike: f64,
    pub call: SideStats,
    pub put: SideStats,
}

/// Round `level` up to the next multiple of `step` (ceiling, not nearest).
///
/// 52034 at step 100 maps to 52100; an already-aligned 52000 stays 52000.
pub fn nearest_strike(level: f64, step: f64) -> f64 {
    (level / step).ceil() * step
}

/// Last-traded level for one instrument from the aggregate-indices payload.
pub fn index_level(raw: &str, instrument: Instrument) -> Result<f64, AnalyticsError> {
    let payload: IndicesPayload = serde_json::from_str(raw)?;
    payload
        .data
        .iter()
        .find(|quote| quote.index == instrument.index_name())
        .map(|quote| quote.last)
        .ok_or_else(|| AnalyticsError::MissingIndex(instrument.index_name().to_string()))
}

/// Extract the front-expiry strike window around `center`.
///
/// Front expiry is the first entry of the provider's own expiry-date list;
/// provider ordering is trusted over calendar comparison. Kept strikes lie
/// in the closed band `center ± step * half_width`. A strike with either
/// option side missing entirely is skipped, never zero-filled.
pub fn extract_window(
    raw: &str,
    center: f64,
    step: f64,
    half_width: u32,
) -> Result<Vec<StrikeRecord>, AnalyticsError> {
    let payload: OptionChainPayload = serde_json::from_str(raw)?;
    let front_expiry = payload
        .records
        .expiry_dates
        .first()
        .ok_or(AnalyticsError::NoExpiries)?;

    let band = step * half_width as f64;
    let (low, high) = (center - band, center + band);

    let window = payload
        .records
        .data
        .iter()
        .filter(|entry| entry.expiry_date == *front_expiry)
        .filter(|entry| entry.strike_price >= low && entry.strike_price <= high)
        .filter_map(strike_record)
        .collect();

    Ok(window)
}

fn strike_record(entry: &ChainEntry) -> Option<StrikeRecord> {
    let call = entry.call.as_ref()?;
    let put = entry.put.as_ref()?;
    Some(StrikeRecord {
        strike: entry.strike_price,
        call: SideStats::from(call),
        put: SideStats::from(put),
    })
}

/// Support and resistance strikes for a window.
///
/// Support sits at the strike with maximum put open interest, resistance at
/// the strike with maximum call open interest. First occurrence wins on
/// ties. An empty window is an error, never a default `(0, 0)` pair.
pub fn derive_levels(window: &[StrikeRecord]) -> Result<(f64, f64), AnalyticsError> {
    let mut records = window.iter();
    let first = records.next().ok_or(AnalyticsError::EmptyWindow)?;

    let mut support = first;
    let mut resistance = first;
    for record in records {
        if record.put.open_interest > support.put.open_interest {
            support = record;
        }
        if record.call.open_interest > resistance.call.open_interest {
            resistance = record;
        }
    }
    Ok((support.strike, resistance.strike))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn side(oi: u64) -> serde_json::Value {
        json!({
            "openInterest": oi,
            "changeinOpenInterest": 10,
            "totalTradedVolume": 1000,
            "impliedVolatility": 14.5
        })
    }

    fn chain_payload() -> String {
        // Front expiry 25-JAN-2024: five strikes, plus a back-expiry row
        // and an out-of-band strike that must both be dropped.
        let strikes = [17700.0, 17750.0, 17800.0, 17850.0, 17900.0];
        let put_oi = [120u64, 300, 900, 450, 200];
        let call_oi = [600u64, 250, 100, 180, 50];

        let mut rows: Vec<serde_json::Value> = strikes
            .iter()
            .zip(put_oi.iter().zip(call_oi.iter()))
            .map(|(strike, (pe, ce))| {
                json!({
                    "strikePrice": strike,
                    "expiryDate": "25-JAN-2024",
                    "CE": side(*ce),
                    "PE": side(*pe)
                })
            })
            .collect();

        rows.push(json!({
            "strikePrice": 17800.0,
            "expiryDate": "29-FEB-2024",
            "CE": side(99_999),
            "PE": side(99_999)
        }));
        rows.push(json!({
            "strikePrice": 19000.0,
            "expiryDate": "25-JAN-2024",
            "CE": side(5000),
            "PE": side(5000)
        }));

        json!({
            "records": {
                "expiryDates": ["25-JAN-2024", "29-FEB-2024"],
                "data": rows
            }
        })
        .to_string()
    }

    #[test]
    fn nearest_strike_rounds_up_to_step() {
        assert_eq!(nearest_strike(17834.0, 50.0), 17850.0);
        assert_eq!(nearest_strike(52034.0, 100.0), 52100.0);
        assert_eq!(nearest_strike(52000.0, 100.0), 52000.0);
    }

    #[test]
    fn nearest_strike_is_a_ceiling() {
        for level in [1.0, 49.9, 50.0, 50.1, 17834.0, 43712.0] {
            for step in [50.0, 100.0] {
                let strike = nearest_strike(level, step);
                assert_eq!(strike % step, 0.0);
                assert!(strike >= level);
                assert!(strike - step < level);
                // Idempotent once aligned
                assert_eq!(nearest_strike(strike, step), strike);
            }
        }
    }

    #[test]
    fn index_level_finds_the_named_index() {
        let raw = json!({
            "data": [
                {"index": "NIFTY 50", "last": 17834.0},
                {"index": "NIFTY BANK", "last": 43712.0},
                {"index": "INDIA VIX", "last": 13.2}
            ]
        })
        .to_string();

        assert_eq!(index_level(&raw, Instrument::Nifty).unwrap(), 17834.0);
        assert_eq!(index_level(&raw, Instrument::BankNifty).unwrap(), 43712.0);
    }

    #[test]
    fn index_level_reports_missing_index() {
        let raw = json!({"data": [{"index": "INDIA VIX", "last": 13.2}]}).to_string();
        assert!(matches!(
            index_level(&raw, Instrument::Nifty),
            Err(AnalyticsError::MissingIndex(_))
        ));
    }

    #[test]
    fn window_keeps_only_front_expiry_strikes_in_band() {
        let window = extract_window(&chain_payload(), 17850.0, 50.0, 10).unwrap();

        assert_eq!(window.len(), 5);
        let strikes: Vec<f64> = window.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![17700.0, 17750.0, 17800.0, 17850.0, 17900.0]);
        // The back-expiry row at 17800 carried 99_999 OI; it must not leak in.
        assert!(window.iter().all(|r| r.put.open_interest < 99_999));
    }

    #[test]
    fn window_band_is_closed_on_both_edges() {
        let window = extract_window(&chain_payload(), 17800.0, 50.0, 2).unwrap();
        let strikes: Vec<f64> = window.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![17700.0, 17750.0, 17800.0, 17850.0, 17900.0]);
    }

    #[test]
    fn strike_missing_one_side_is_skipped_not_zero_filled() {
        let raw = json!({
            "records": {
                "expiryDates": ["25-JAN-2024"],
                "data": [
                    {
                        "strikePrice": 17700.0,
                        "expiryDate": "25-JAN-2024",
                        "CE": side(600)
                    },
                    {
                        "strikePrice": 17750.0,
                        "expiryDate": "25-JAN-2024",
                        "CE": side(250),
                        "PE": side(300)
                    }
                ]
            }
        })
        .to_string();

        let window = extract_window(&raw, 17800.0, 50.0, 10).unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].strike, 17750.0);
    }

    #[test]
    fn empty_expiry_list_is_an_error() {
        let raw = json!({"records": {"expiryDates": [], "data": []}}).to_string();
        assert!(matches!(
            extract_window(&raw, 17800.0, 50.0, 10),
            Err(AnalyticsError::NoExpiries)
        ));
    }

    #[test]
    fn garbage_payload_is_malformed() {
        assert!(matches!(
            extract_window("<html>blocked</html>", 17800.0, 50.0, 10),
            Err(AnalyticsError::Malformed(_))
        ));
    }

    #[test]
    fn levels_sit_at_the_open_interest_peaks() {
        let window = extract_window(&chain_payload(), 17850.0, 50.0, 10).unwrap();
        let (support, resistance) = derive_levels(&window).unwrap();

        assert_eq!(support, 17800.0);
        assert_eq!(resistance, 17700.0);

        let support_record = window.iter().find(|r| r.strike == support).unwrap();
        let resistance_record = window.iter().find(|r| r.strike == resistance).unwrap();
        for record in &window {
            assert!(support_record.put.open_interest >= record.put.open_interest);
            assert!(resistance_record.call.open_interest >= record.call.open_interest);
        }
    }

    #[test]
    fn level_ties_resolve_to_first_occurrence() {
        let make = |strike: f64, pe: u64, ce: u64| StrikeRecord {
            strike,
            call: SideStats {
                open_interest: ce,
                change_in_oi: 0,
                volume: 0,
                implied_volatility: 0.0,
            },
            put: SideStats {
                open_interest: pe,
                change_in_oi: 0,
                volume: 0,
                implied_volatility: 0.0,
            },
        };
        let window = vec![make(100.0, 500, 500), make(150.0, 500, 500)];

        let (support, resistance) = derive_levels(&window).unwrap();
        assert_eq!(support, 100.0);
        assert_eq!(resistance, 100.0);
    }

    #[test]
    fn empty_window_is_an_error_not_a_zero_pair() {
        assert!(matches!(
            derive_levels(&[]),
            Err(AnalyticsError::EmptyWindow)
        ));
    }
}
