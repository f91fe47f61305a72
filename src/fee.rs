//! Entrance fee quoting.
//!
//! Every stake must be worth a fixed USD amount at the moment it is placed.
//! The fee is quoted in native units from the oracle's latest price:
//!
//!   fee = usd_target * 10^18 / price_18
//!
//! where both the USD target and the normalized price carry 18 decimals.
//! Division floors, so the quoted fee is never worth more than the target.
//! A $50 target against a $2,000 price quotes 0.025 coin.

use crate::oracle::PriceReading;
use crate::types::{NativeAmount, UsdAmount, NATIVE_DECIMALS, NATIVE_SCALE};
use thiserror::Error;

// 3.1: quoting can fail on a degenerate reading, never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("oracle price normalizes to zero")]
    ZeroPrice,
    #[error("fee computation exceeds native range")]
    Overflow,
}

// 3.2: bring a raw oracle answer to 18 decimals. feeds with fewer decimals
// scale up exactly; feeds with more scale down and drop the excess precision.
fn normalized_price(reading: PriceReading) -> Result<u128, FeeError> {
    if reading.decimals <= NATIVE_DECIMALS {
        let factor = 10u128
            .checked_pow(NATIVE_DECIMALS - reading.decimals)
            .ok_or(FeeError::Overflow)?;
        reading.value.checked_mul(factor).ok_or(FeeError::Overflow)
    } else {
        let factor = 10u128
            .checked_pow(reading.decimals - NATIVE_DECIMALS)
            .ok_or(FeeError::Overflow)?;
        Ok(reading.value / factor)
    }
}

/// Quote the native-unit fee worth `usd_target` at the given oracle reading.
///
/// Floors toward zero: the sub-unit remainder of the division is not
/// collectable and stays with the participant.
pub fn entrance_fee(usd_target: UsdAmount, reading: PriceReading) -> Result<NativeAmount, FeeError> {
    let price = normalized_price(reading)?;
    if price == 0 {
        return Err(FeeError::ZeroPrice);
    }
    let numerator = usd_target
        .scaled()
        .checked_mul(NATIVE_SCALE)
        .ok_or(FeeError::Overflow)?;
    Ok(NativeAmount::new(numerator / price))
}
