//! Market lifecycle phase and the stake book.
//!
//! The ledger records who staked what on which side while a market runs. It
//! enforces the bookkeeping invariants (pool equals the sum of its stakes,
//! each participant listed once, in first-stake order) and nothing else;
//! phase gating and access control live in the aggregate that owns it.

use crate::types::{Address, NativeAmount, Side};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// 4.1: lifecycle phase. wire codes 0..=3, transitions strictly forward.
// one market per ledger; a new round means a new ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPhase {
    Closed,
    Open,
    Resolving,
    Complete,
}

impl MarketPhase {
    pub fn code(&self) -> u8 {
        match self {
            MarketPhase::Closed => 0,
            MarketPhase::Open => 1,
            MarketPhase::Resolving => 2,
            MarketPhase::Complete => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MarketPhase::Closed),
            1 => Some(MarketPhase::Open),
            2 => Some(MarketPhase::Resolving),
            3 => Some(MarketPhase::Complete),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MarketPhase::Complete)
    }
}

impl Default for MarketPhase {
    fn default() -> Self {
        Self::Closed
    }
}

impl fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketPhase::Closed => "Closed",
            MarketPhase::Open => "Open",
            MarketPhase::Resolving => "Resolving",
            MarketPhase::Complete => "Complete",
        };
        write!(f, "{name}")
    }
}

// 4.2: outcome of recording one stake, consumed by event emission.
#[derive(Debug, Clone, Copy)]
pub struct StakeRecord {
    /// First stake from this address.
    pub new_player: bool,
    /// The player's cumulative stake on this side after the bet.
    pub player_stake: NativeAmount,
    /// The side's pool after the bet.
    pub side_pool: NativeAmount,
}

// 4.3: one participant's stakes on both sides, frozen at resolution time.
// settlement works exclusively off these so late reads can't skew payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetSnapshot {
    pub player: Address,
    stakes: [NativeAmount; 2],
}

impl BetSnapshot {
    pub fn new(player: Address, alice: NativeAmount, bob: NativeAmount) -> Self {
        Self {
            player,
            stakes: [alice, bob],
        }
    }

    pub fn stake(&self, side: Side) -> NativeAmount {
        self.stakes[side.index()]
    }
}

// 4.4: the book itself.
#[derive(Debug, Clone, Default)]
pub struct MarketLedger {
    phase: MarketPhase,
    pools: [NativeAmount; 2],
    stakes: HashMap<Address, [NativeAmount; 2]>,
    participants: Vec<Address>,
}

impl MarketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MarketPhase {
        self.phase
    }

    // forward-only; the owning aggregate checks legality before calling
    pub(crate) fn set_phase(&mut self, next: MarketPhase) {
        debug_assert!(next.code() == self.phase.code() + 1);
        self.phase = next;
    }

    pub fn pool(&self, side: Side) -> NativeAmount {
        self.pools[side.index()]
    }

    pub fn total_pool(&self) -> Option<NativeAmount> {
        self.pool(Side::Alice).checked_add(self.pool(Side::Bob))
    }

    /// Cumulative stake of `player` on `side`; zero for addresses that never bet.
    pub fn stake(&self, player: Address, side: Side) -> NativeAmount {
        self.stakes
            .get(&player)
            .map(|per_side| per_side[side.index()])
            .unwrap_or(NativeAmount::zero())
    }

    pub fn player(&self, index: usize) -> Option<Address> {
        self.participants.get(index).copied()
    }

    pub fn player_count(&self) -> usize {
        self.participants.len()
    }

    pub fn participants(&self) -> &[Address] {
        &self.participants
    }

    // 4.5: record one stake. both the per-player entry and the side pool move
    // together or not at all; None means the addition left native range and
    // the book is untouched.
    pub(crate) fn record_stake(
        &mut self,
        player: Address,
        side: Side,
        amount: NativeAmount,
    ) -> Option<StakeRecord> {
        let current = self.stake(player, side);
        let player_stake = current.checked_add(amount)?;
        let side_pool = self.pools[side.index()].checked_add(amount)?;

        let new_player = !self.stakes.contains_key(&player);
        self.stakes.entry(player).or_insert([NativeAmount::zero(); 2])[side.index()] =
            player_stake;
        self.pools[side.index()] = side_pool;
        if new_player {
            self.participants.push(player);
        }

        Some(StakeRecord {
            new_player,
            player_stake,
            side_pool,
        })
    }

    /// Bet records in first-stake order, for settlement.
    pub fn snapshot(&self) -> Vec<BetSnapshot> {
        self.participants
            .iter()
            .map(|&player| {
                let per_side = self.stakes[&player];
                BetSnapshot::new(player, per_side[0], per_side[1])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(n: u64) -> NativeAmount {
        NativeAmount::from_coins(n)
    }

    #[test]
    fn phase_codes_round_trip() {
        for phase in [
            MarketPhase::Closed,
            MarketPhase::Open,
            MarketPhase::Resolving,
            MarketPhase::Complete,
        ] {
            assert_eq!(MarketPhase::from_code(phase.code()), Some(phase));
        }
        assert_eq!(MarketPhase::from_code(4), None);
        assert!(MarketPhase::Complete.is_terminal());
        assert!(!MarketPhase::Open.is_terminal());
    }

    #[test]
    fn stakes_accumulate_per_side() {
        let mut ledger = MarketLedger::new();
        let player = Address::from_low_u64(1);

        let first = ledger.record_stake(player, Side::Alice, coins(1)).unwrap();
        assert!(first.new_player);
        assert_eq!(first.player_stake, coins(1));

        let second = ledger.record_stake(player, Side::Alice, coins(2)).unwrap();
        assert!(!second.new_player);
        assert_eq!(second.player_stake, coins(3));
        assert_eq!(ledger.stake(player, Side::Alice), coins(3));
        assert_eq!(ledger.stake(player, Side::Bob), NativeAmount::zero());
    }

    #[test]
    fn pools_track_stake_sums() {
        let mut ledger = MarketLedger::new();
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);

        ledger.record_stake(a, Side::Alice, coins(1)).unwrap();
        ledger.record_stake(b, Side::Alice, coins(2)).unwrap();
        ledger.record_stake(a, Side::Bob, coins(4)).unwrap();

        assert_eq!(ledger.pool(Side::Alice), coins(3));
        assert_eq!(ledger.pool(Side::Bob), coins(4));
        assert_eq!(ledger.total_pool(), Some(coins(7)));

        for side in Side::ALL {
            let summed: NativeAmount = ledger
                .participants()
                .iter()
                .map(|&p| ledger.stake(p, side))
                .sum();
            assert_eq!(summed, ledger.pool(side));
        }
    }

    #[test]
    fn participants_listed_once_in_first_stake_order() {
        let mut ledger = MarketLedger::new();
        let a = Address::from_low_u64(10);
        let b = Address::from_low_u64(20);

        ledger.record_stake(a, Side::Alice, coins(1)).unwrap();
        ledger.record_stake(b, Side::Bob, coins(1)).unwrap();
        ledger.record_stake(a, Side::Bob, coins(1)).unwrap();

        assert_eq!(ledger.player_count(), 2);
        assert_eq!(ledger.player(0), Some(a));
        assert_eq!(ledger.player(1), Some(b));
        assert_eq!(ledger.player(2), None);
    }

    #[test]
    fn overflow_leaves_book_untouched() {
        let mut ledger = MarketLedger::new();
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);

        ledger
            .record_stake(a, Side::Alice, NativeAmount::new(u128::MAX - 1))
            .unwrap();
        assert!(ledger
            .record_stake(b, Side::Alice, NativeAmount::new(2))
            .is_none());

        assert_eq!(ledger.pool(Side::Alice), NativeAmount::new(u128::MAX - 1));
        assert_eq!(ledger.stake(b, Side::Alice), NativeAmount::zero());
        assert_eq!(ledger.player_count(), 1);
    }

    #[test]
    fn snapshot_carries_both_sides() {
        let mut ledger = MarketLedger::new();
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);

        ledger.record_stake(a, Side::Alice, coins(2)).unwrap();
        ledger.record_stake(a, Side::Bob, coins(1)).unwrap();
        ledger.record_stake(b, Side::Bob, coins(3)).unwrap();

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].player, a);
        assert_eq!(snapshot[0].stake(Side::Alice), coins(2));
        assert_eq!(snapshot[0].stake(Side::Bob), coins(1));
        assert_eq!(snapshot[1].stake(Side::Bob), coins(3));
    }
}
