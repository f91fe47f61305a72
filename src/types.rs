// 1.0: all the primitives live here. nothing in the market works without these types.
// addresses, native-unit amounts, USD targets, sides, timestamps. each is a newtype so
// the compiler catches type mixups.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// Native value carries 18 decimal places (wei-style smallest units).
pub const NATIVE_DECIMALS: u32 = 18;
pub(crate) const NATIVE_SCALE: u128 = 1_000_000_000_000_000_000;

// 1.1: a participant or administrator identity. opaque 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    // deterministic short-form addresses for tests and simulations
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

// 1.2: the two outcomes a market settles between. exhaustive, no third option.
// wire ordinals match the observed contract surface: Alice = 0, Bob = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Alice,
    Bob,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Alice, Side::Bob];

    pub fn opposite(&self) -> Self {
        match self {
            Side::Alice => Side::Bob,
            Side::Bob => Side::Alice,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Side::Alice => 0,
            Side::Bob => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Side::Alice),
            1 => Some(Side::Bob),
            _ => None,
        }
    }

    // stable slot for per-side arrays
    pub(crate) fn index(&self) -> usize {
        self.code() as usize
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Alice => write!(f, "Alice"),
            Side::Bob => write!(f, "Bob"),
        }
    }
}

// 1.3: value in smallest native units. stakes, pools, fees, payouts all use this.
// money math stays in u128 with checked ops; Decimal only appears at the display edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NativeAmount(u128);

impl NativeAmount {
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    // whole coins → native units, for readable test and demo values
    pub const fn from_coins(coins: u64) -> Self {
        Self(coins as u128 * NATIVE_SCALE)
    }

    pub const fn value(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(&self, other: NativeAmount) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: NativeAmount) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Floor of `self * mul / div`. Multiplication happens before division so the
    /// only truncation is the final floor; None on overflow or a zero divisor.
    pub fn mul_div_floor(&self, mul: NativeAmount, div: NativeAmount) -> Option<Self> {
        if div.0 == 0 {
            return None;
        }
        self.0.checked_mul(mul.0).map(|product| Self(product / div.0))
    }

    /// Exact whole-coin rendering of a native-unit amount, for display only.
    /// None when the amount exceeds what a `Decimal` mantissa can carry.
    pub fn as_coins(&self) -> Option<Decimal> {
        i128::try_from(self.0)
            .ok()
            .and_then(|v| Decimal::try_from_i128_with_scale(v, NATIVE_DECIMALS).ok())
    }
}

impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Sum for NativeAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, a| {
            acc.checked_add(a).expect("native amount sum overflow")
        })
    }
}

impl<'a> Sum<&'a NativeAmount> for NativeAmount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// 1.4: a USD-denominated target, stored scaled to 18 decimals the way the source
// contract stores its entry fee. constructed from whole dollars or a Decimal;
// never used in settlement arithmetic directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsdAmount(u128);

impl UsdAmount {
    pub const fn from_whole(dollars: u64) -> Self {
        Self(dollars as u128 * NATIVE_SCALE)
    }

    #[must_use]
    pub fn from_decimal(dollars: Decimal) -> Option<Self> {
        if dollars.is_sign_negative() {
            return None;
        }
        let scaled = dollars.checked_mul(Decimal::from(NATIVE_SCALE as u64))?;
        scaled.trunc().to_u128().map(Self)
    }

    /// The 18-decimal scaled integer value.
    pub const fn scaled(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn as_dollars(&self) -> Option<Decimal> {
        i128::try_from(self.0)
            .ok()
            .and_then(|v| Decimal::try_from_i128_with_scale(v, NATIVE_DECIMALS).ok())
    }
}

impl fmt::Display for UsdAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_dollars() {
            Some(d) => write!(f, "${}", d),
            None => write!(f, "${}e-18", self.0),
        }
    }
}

// 1.5: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn side_codes_and_opposites() {
        assert_eq!(Side::Alice.code(), 0);
        assert_eq!(Side::Bob.code(), 1);
        assert_eq!(Side::Alice.opposite(), Side::Bob);
        assert_eq!(Side::Bob.opposite(), Side::Alice);
        assert_eq!(Side::from_code(0), Some(Side::Alice));
        assert_eq!(Side::from_code(1), Some(Side::Bob));
        assert_eq!(Side::from_code(2), None);
    }

    #[test]
    fn native_amount_checked_math() {
        let a = NativeAmount::new(100);
        let b = NativeAmount::new(40);

        assert_eq!(a.checked_add(b), Some(NativeAmount::new(140)));
        assert_eq!(a.checked_sub(b), Some(NativeAmount::new(60)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(NativeAmount::new(u128::MAX).checked_add(NativeAmount::new(1)), None);
    }

    #[test]
    fn mul_div_floors() {
        let stake = NativeAmount::new(10);
        // 10 * 7 / 3 = 23.33 → 23
        assert_eq!(
            stake.mul_div_floor(NativeAmount::new(7), NativeAmount::new(3)),
            Some(NativeAmount::new(23))
        );
        assert_eq!(stake.mul_div_floor(NativeAmount::new(7), NativeAmount::zero()), None);
        assert_eq!(
            NativeAmount::new(u128::MAX).mul_div_floor(NativeAmount::new(2), NativeAmount::new(1)),
            None
        );
    }

    #[test]
    fn coin_conversions() {
        let amount = NativeAmount::from_coins(1);
        assert_eq!(amount.value(), 1_000_000_000_000_000_000);
        assert_eq!(amount.as_coins(), Some(dec!(1)));

        let fee = NativeAmount::new(25_000_000_000_000_000);
        assert_eq!(fee.as_coins(), Some(dec!(0.025)));
    }

    #[test]
    fn usd_amount_construction() {
        let fifty = UsdAmount::from_whole(50);
        assert_eq!(fifty.scaled(), 50_000_000_000_000_000_000);
        assert_eq!(UsdAmount::from_decimal(dec!(50)), Some(fifty));
        assert_eq!(UsdAmount::from_decimal(dec!(-1)), None);
        assert_eq!(
            UsdAmount::from_decimal(dec!(0.5)).map(|u| u.scaled()),
            Some(500_000_000_000_000_000)
        );
    }

    #[test]
    fn address_display() {
        let addr = Address::from_low_u64(0xabcd);
        let rendered = addr.to_string();
        assert!(rendered.starts_with("0x"));
        assert!(rendered.ends_with("abcd"));
        assert_eq!(rendered.len(), 42);
    }
}
