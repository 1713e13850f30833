//! Core types used throughout OiWatch
//!
//! Defines the two tracked index instruments and their provider identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index instruments the service tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Nifty,
    BankNifty,
}

impl Instrument {
    /// Both tracked instruments, in publication order
    pub const ALL: [Instrument; 2] = [Instrument::Nifty, Instrument::BankNifty];

    /// Key under which the aggregate-indices payload reports this index
    pub fn index_name(&self) -> &'static str {
        match self {
            Instrument::Nifty => "NIFTY 50",
            Instrument::BankNifty => "NIFTY BANK",
        }
    }

    /// Symbol for the option-chain endpoint query string
    pub fn symbol(&self) -> &'static str {
        match self {
            Instrument::Nifty => "NIFTY",
            Instrument::BankNifty => "BANKNIFTY",
        }
    }

    /// Strike-price step of the instrument's option grid
    pub fn strike_step(&self) -> f64 {
        match self {
            Instrument::Nifty => 50.0,
            Instrument::BankNifty => 100.0,
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NIFTY" => Some(Instrument::Nifty),
            "BANKNIFTY" => Some(Instrument::BankNifty),
            _ => None,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Nifty => write!(f, "NIFTY"),
            Instrument::BankNifty => write!(f, "BANKNIFTY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_round_trips_through_parse() {
        for instrument in Instrument::ALL {
            assert_eq!(Instrument::from_str(instrument.symbol()), Some(instrument));
        }
    }

    #[test]
    fn strike_steps_match_the_option_grids() {
        assert_eq!(Instrument::Nifty.strike_step(), 50.0);
        assert_eq!(Instrument::BankNifty.strike_step(), 100.0);
    }
}
