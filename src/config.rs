// 8.0 config.rs: all settings in one place. entry fee target and event
// retention; everything else about a market is fixed by construction.

use crate::types::UsdAmount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// 8.1: market parameters. the USD target is what every stake must be worth
// at placement time; the native fee derived from it moves with the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParams {
    /// USD value each stake must match, scaled to 18 decimals.
    pub usd_entry_fee: UsdAmount,
    /// Cap on the in-memory event log; oldest entries drop first.
    pub max_events: usize,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            usd_entry_fee: UsdAmount::from_whole(50),
            max_events: 100_000,
        }
    }
}

impl MarketParams {
    pub fn new(usd_entry_fee: UsdAmount) -> Self {
        Self {
            usd_entry_fee,
            ..Self::default()
        }
    }

    /// Dollar-denominated constructor for hosts configuring from decimal input.
    pub fn with_entry_fee(dollars: Decimal) -> Option<Self> {
        UsdAmount::from_decimal(dollars).map(Self::new)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.usd_entry_fee.is_zero() {
            return Err(ParamsError::ZeroEntryFee);
        }
        if self.max_events == 0 {
            return Err(ParamsError::ZeroEventCapacity);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("entry fee target must be nonzero")]
    ZeroEntryFee,
    #[error("event log capacity must be nonzero")]
    ZeroEventCapacity,
}
