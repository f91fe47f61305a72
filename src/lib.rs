// parimutuel-core: pari-mutuel prediction market engine.
// settlement-first architecture: payout pricing is the part that must never
// be wrong. all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x types.rs: primitives: Address, Side, NativeAmount, UsdAmount
//   2.x oracle.rs: price feed seam (mocked)
//   3.x fee.rs: entrance fee quoting
//   4.x ledger.rs: lifecycle phase + stake book
//   5.x settlement.rs: pari-mutuel payout pricing and execution
//   6.x treasury.rs: value transfer seam (mocked)
//   7.x events.rs: state transition events for audit
//   8.x config.rs: market params
//   9.x market.rs: the PredictionMarket aggregate

// core market modules
pub mod fee;
pub mod ledger;
pub mod market;
pub mod settlement;
pub mod types;

// integration modules
pub mod config;
pub mod events;
pub mod oracle;
pub mod treasury;

// re exports for convenience
pub use config::*;
pub use events::*;
pub use fee::*;
pub use ledger::*;
pub use market::*;
pub use oracle::*;
pub use settlement::*;
pub use treasury::*;
pub use types::*;
