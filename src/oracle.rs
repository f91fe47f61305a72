// 2.0 oracle.rs: the "read current price" capability. the core is agnostic to
// whether the price comes from a Chainlink-style aggregator, a CEX feed, or a
// mock; anything that can answer with a raw value and its decimal precision
// can drive fee computation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// 2.1: a single price observation. `value` is the raw feed answer, `decimals`
// how many decimal places it carries. a $2000.00000000 quote on an 8-decimal
// feed arrives as value = 200_000_000_000, decimals = 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReading {
    pub value: u128,
    pub decimals: u32,
}

impl PriceReading {
    pub fn new(value: u128, decimals: u32) -> Self {
        Self { value, decimals }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("no price available from {feed}")]
    Unavailable { feed: String },
}

// 2.2: price source seam. fee computation reads through this on every call;
// readings are never cached across calls because the price is allowed to move.
pub trait PriceFeed {
    /// Human readable source name, used in errors and logs.
    fn name(&self) -> &str;

    /// The current price. Errs when the source is unreachable, which is fatal
    /// to whatever operation needed the price.
    fn latest_price(&self) -> Result<PriceReading, OracleError>;
}

// 2.3: mock feed for tests and simulation. answer and health are settable so
// scenarios can move the price mid-market or take the oracle offline.
#[derive(Debug, Clone)]
pub struct MockPriceFeed {
    name: String,
    decimals: u32,
    answer: u128,
    healthy: bool,
}

impl MockPriceFeed {
    pub fn new(decimals: u32, initial_answer: u128) -> Self {
        Self {
            name: "mock-aggregator".to_string(),
            decimals,
            answer: initial_answer,
            healthy: true,
        }
    }

    pub fn set_answer(&mut self, answer: u128) {
        self.answer = answer;
    }

    pub fn set_healthy(&mut self, healthy: bool) {
        self.healthy = healthy;
    }
}

impl Default for MockPriceFeed {
    // local development values: 8-decimal feed quoting $2000
    fn default() -> Self {
        Self::new(8, 200_000_000_000)
    }
}

impl PriceFeed for MockPriceFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn latest_price(&self) -> Result<PriceReading, OracleError> {
        if self.healthy {
            Ok(PriceReading::new(self.answer, self.decimals))
        } else {
            Err(OracleError::Unavailable {
                feed: self.name.clone(),
            })
        }
    }
}
