//! Pari-mutuel settlement.
//!
//! Settlement runs in two passes over a snapshot of the bet book. The first
//! pass is pure: it prices every winning stake as
//!
//!   payout = stake + stake * losing_pool / winning_pool
//!
//! in u128, multiplying before dividing so the only loss is the final floor.
//! The second pass executes the schedule one transfer at a time; a refused
//! transfer is recorded and skipped, never allowed to stall the rest.
//!
//! Floor dust and any winnerless pool stay in the treasury. They are
//! surfaced in the report as `retained`, not redistributed.

use crate::ledger::BetSnapshot;
use crate::treasury::{TransferError, ValueTransfer};
use crate::types::{Address, NativeAmount, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("settlement arithmetic exceeds native range")]
    Overflow,
}

// 5.1: one scheduled (or executed) payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutEntry {
    pub player: Address,
    /// The stake the payout was priced from.
    pub stake: NativeAmount,
    pub amount: NativeAmount,
}

// 5.2: a transfer the backend refused. the schedule amount stays in the
// treasury and shows up in `retained`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedPayout {
    pub player: Address,
    pub amount: NativeAmount,
    pub error: TransferError,
}

// 5.3: priced schedule, still unexecuted. entries follow first-stake order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutSchedule {
    pub winning_side: Side,
    pub winning_pool: NativeAmount,
    pub losing_pool: NativeAmount,
    pub entries: Vec<PayoutEntry>,
}

/// Price the winning side of a bet book.
///
/// With an empty winning pool there is nothing to price: the schedule comes
/// back with no entries and the whole losing pool is retained. Stakes on the
/// losing side never appear here, including the losing half of a player who
/// backed both sides.
pub fn compute_payouts(
    bets: &[BetSnapshot],
    winning: Side,
) -> Result<PayoutSchedule, SettlementError> {
    let losing = winning.opposite();

    let mut winning_pool = NativeAmount::zero();
    let mut losing_pool = NativeAmount::zero();
    for bet in bets {
        winning_pool = winning_pool
            .checked_add(bet.stake(winning))
            .ok_or(SettlementError::Overflow)?;
        losing_pool = losing_pool
            .checked_add(bet.stake(losing))
            .ok_or(SettlementError::Overflow)?;
    }
    // the grand total must fit too, so report assembly can never fail later
    winning_pool
        .checked_add(losing_pool)
        .ok_or(SettlementError::Overflow)?;

    let mut entries = Vec::new();
    if winning_pool.is_zero() {
        return Ok(PayoutSchedule {
            winning_side: winning,
            winning_pool,
            losing_pool,
            entries,
        });
    }

    for bet in bets {
        let stake = bet.stake(winning);
        if stake.is_zero() {
            continue;
        }
        let share = stake
            .mul_div_floor(losing_pool, winning_pool)
            .ok_or(SettlementError::Overflow)?;
        let amount = stake.checked_add(share).ok_or(SettlementError::Overflow)?;
        entries.push(PayoutEntry {
            player: bet.player,
            stake,
            amount,
        });
    }

    Ok(PayoutSchedule {
        winning_side: winning,
        winning_pool,
        losing_pool,
        entries,
    })
}

/// Execute a schedule against a transfer backend, one entry at a time.
/// Failures are collected, not propagated.
pub fn execute_payouts<T: ValueTransfer>(
    treasury: &mut T,
    entries: &[PayoutEntry],
) -> (Vec<PayoutEntry>, Vec<FailedPayout>) {
    let mut paid = Vec::new();
    let mut failed = Vec::new();
    for entry in entries {
        match treasury.transfer(entry.player, entry.amount) {
            Ok(()) => paid.push(*entry),
            Err(error) => failed.push(FailedPayout {
                player: entry.player,
                amount: entry.amount,
                error,
            }),
        }
    }
    (paid, failed)
}

// 5.4: what actually happened. distributed counts executed transfers only;
// retained is everything left behind: floor dust, failed payouts, and any
// winnerless losing pool. distributed + retained always equals the book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub winning_side: Side,
    pub winning_pool: NativeAmount,
    pub losing_pool: NativeAmount,
    pub paid: Vec<PayoutEntry>,
    pub failed: Vec<FailedPayout>,
    pub distributed: NativeAmount,
    pub retained: NativeAmount,
}

impl SettlementReport {
    pub fn from_execution(
        schedule: PayoutSchedule,
        paid: Vec<PayoutEntry>,
        failed: Vec<FailedPayout>,
    ) -> Result<Self, SettlementError> {
        let mut distributed = NativeAmount::zero();
        for entry in &paid {
            distributed = distributed
                .checked_add(entry.amount)
                .ok_or(SettlementError::Overflow)?;
        }
        let total = schedule
            .winning_pool
            .checked_add(schedule.losing_pool)
            .ok_or(SettlementError::Overflow)?;
        let retained = total
            .checked_sub(distributed)
            .ok_or(SettlementError::Overflow)?;

        Ok(Self {
            winning_side: schedule.winning_side,
            winning_pool: schedule.winning_pool,
            losing_pool: schedule.losing_pool,
            paid,
            failed,
            distributed,
            retained,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
