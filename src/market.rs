//! The market aggregate.
//!
//! `PredictionMarket` wires the stake book to the price feed, the transfer
//! backend, and the event log, and owns the two admin-gated lifecycle moves:
//! opening the market and reporting the result. Operations take `&mut self`
//! and run to completion; a concurrent host serializes access with one lock
//! around the whole aggregate.
//!
//! Access control is a flat caller comparison against the administrator
//! address fixed at construction. There are no roles.

use crate::config::MarketParams;
use crate::events::{
    BetPlacedEvent, Event, EventId, EventPayload, MarketOpenedEvent, PayoutFailedEvent,
    PayoutIssuedEvent, ResultReportedEvent, SettlementCompletedEvent,
};
use crate::fee::{self, FeeError};
use crate::ledger::{MarketLedger, MarketPhase};
use crate::oracle::{OracleError, PriceFeed};
use crate::settlement::{self, SettlementError, SettlementReport};
use crate::treasury::ValueTransfer;
use crate::types::{Address, NativeAmount, Side, Timestamp};
use thiserror::Error;
use tracing::{debug, info, warn};

// 9.1: everything an operation can refuse with. transfer failures are
// deliberately absent: they are isolated into the settlement report, not
// raised from report_result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("caller is not the administrator")]
    Unauthorized,

    #[error("operation requires phase {expected}, market is {actual}")]
    InvalidPhase {
        expected: MarketPhase,
        actual: MarketPhase,
    },

    #[error("stake must equal the entrance fee: required {required}, offered {offered}")]
    WrongStakeAmount {
        required: NativeAmount,
        offered: NativeAmount,
    },

    #[error("winning and losing arguments name the same side")]
    SameSide,

    #[error("oracle: {0}")]
    Oracle(#[from] OracleError),

    #[error("entrance fee: {0}")]
    Fee(#[from] FeeError),

    #[error("amount arithmetic exceeds native range")]
    AmountOverflow,
}

impl From<SettlementError> for MarketError {
    fn from(_: SettlementError) -> Self {
        MarketError::AmountOverflow
    }
}

// 9.2: the aggregate. one instance is one market round.
#[derive(Debug)]
pub struct PredictionMarket<F, T> {
    admin: Address,
    params: MarketParams,
    feed: F,
    treasury: T,
    ledger: MarketLedger,
    events: Vec<Event>,
    next_event_id: u64,
    current_time: Timestamp,
}

impl<F: PriceFeed, T: ValueTransfer> PredictionMarket<F, T> {
    pub fn new(admin: Address, feed: F, treasury: T, params: MarketParams) -> Self {
        Self {
            admin,
            params,
            feed,
            treasury,
            ledger: MarketLedger::new(),
            events: Vec::new(),
            next_event_id: 1,
            current_time: Timestamp::from_millis(0),
        }
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    pub fn phase(&self) -> MarketPhase {
        self.ledger.phase()
    }

    /// Phase as its wire code: 0 Closed, 1 Open, 2 Resolving, 3 Complete.
    pub fn market_state(&self) -> u8 {
        self.ledger.phase().code()
    }

    /// Aggregate pool staked on `side`.
    pub fn bets(&self, side: Side) -> NativeAmount {
        self.ledger.pool(side)
    }

    /// `caller`'s cumulative stake on `side`; zero for strangers, no
    /// precondition on phase.
    pub fn my_bets(&self, caller: Address, side: Side) -> NativeAmount {
        self.ledger.stake(caller, side)
    }

    pub fn player(&self, index: usize) -> Option<Address> {
        self.ledger.player(index)
    }

    pub fn player_count(&self) -> usize {
        self.ledger.player_count()
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }

    pub fn treasury(&self) -> &T {
        &self.treasury
    }

    pub fn treasury_mut(&mut self) -> &mut T {
        &mut self.treasury
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    /// Native units a stake must carry right now. Reads the oracle fresh on
    /// every call; two successive quotes may differ.
    pub fn entrance_fee(&self) -> Result<NativeAmount, MarketError> {
        let reading = self.feed.latest_price()?;
        Ok(fee::entrance_fee(self.params.usd_entry_fee, reading)?)
    }

    // 9.3: Closed → Open. admin only.
    pub fn start_market(&mut self, caller: Address) -> Result<(), MarketError> {
        self.require_admin(caller)?;
        self.require_phase(MarketPhase::Closed)?;

        self.ledger.set_phase(MarketPhase::Open);
        info!(admin = %caller, "market opened");
        self.emit_event(EventPayload::MarketOpened(MarketOpenedEvent {
            admin: caller,
        }));
        Ok(())
    }

    // 9.4: stake `amount` on `side`. the amount must exactly match the fee
    // quoted in this same call; a stale quote the caller fetched earlier does
    // not count.
    pub fn place_bet(
        &mut self,
        caller: Address,
        side: Side,
        amount: NativeAmount,
    ) -> Result<(), MarketError> {
        self.require_phase(MarketPhase::Open)?;

        let required = self.entrance_fee()?;
        if amount != required {
            return Err(MarketError::WrongStakeAmount {
                required,
                offered: amount,
            });
        }

        let record = self
            .ledger
            .record_stake(caller, side, amount)
            .ok_or(MarketError::AmountOverflow)?;

        debug!(player = %caller, %side, %amount, "stake recorded");
        self.emit_event(EventPayload::BetPlaced(BetPlacedEvent {
            player: caller,
            side,
            amount,
            player_stake: record.player_stake,
            side_pool: record.side_pool,
            new_player: record.new_player,
        }));
        Ok(())
    }

    // 9.5: Open → Resolving → Complete in one call. admin names the outcome,
    // settlement prices a snapshot of the book and pays the winners. payouts
    // are best-effort per participant; the market completes regardless.
    pub fn report_result(
        &mut self,
        caller: Address,
        winning: Side,
        losing: Side,
    ) -> Result<SettlementReport, MarketError> {
        self.require_admin(caller)?;
        self.require_phase(MarketPhase::Open)?;
        if winning == losing {
            return Err(MarketError::SameSide);
        }

        // price the book before touching the phase so arithmetic failures
        // leave the market untouched
        let snapshot = self.ledger.snapshot();
        let schedule = settlement::compute_payouts(&snapshot, winning)?;

        self.ledger.set_phase(MarketPhase::Resolving);
        info!(
            %winning,
            winning_pool = %schedule.winning_pool,
            losing_pool = %schedule.losing_pool,
            "result reported, resolving"
        );
        self.emit_event(EventPayload::ResultReported(ResultReportedEvent {
            winning,
            losing,
            winning_pool: schedule.winning_pool,
            losing_pool: schedule.losing_pool,
        }));

        let (paid, failed) = settlement::execute_payouts(&mut self.treasury, &schedule.entries);
        for entry in &paid {
            self.emit_event(EventPayload::PayoutIssued(PayoutIssuedEvent {
                player: entry.player,
                stake: entry.stake,
                amount: entry.amount,
            }));
        }
        for failure in &failed {
            warn!(player = %failure.player, amount = %failure.amount, "payout transfer failed");
            self.emit_event(EventPayload::PayoutFailed(PayoutFailedEvent {
                player: failure.player,
                amount: failure.amount,
                reason: failure.error.to_string(),
            }));
        }

        let report = SettlementReport::from_execution(schedule, paid, failed)?;

        self.ledger.set_phase(MarketPhase::Complete);
        self.emit_event(EventPayload::SettlementCompleted(SettlementCompletedEvent {
            winning,
            paid_count: report.paid.len(),
            failed_count: report.failed.len(),
            distributed: report.distributed,
            retained: report.retained,
        }));
        info!(
            %winning,
            paid = report.paid.len(),
            failed = report.failed.len(),
            distributed = %report.distributed,
            retained = %report.retained,
            "market settled"
        );

        Ok(report)
    }

    fn require_admin(&self, caller: Address) -> Result<(), MarketError> {
        if caller != self.admin {
            return Err(MarketError::Unauthorized);
        }
        Ok(())
    }

    fn require_phase(&self, expected: MarketPhase) -> Result<(), MarketError> {
        let actual = self.ledger.phase();
        if actual != expected {
            return Err(MarketError::InvalidPhase { expected, actual });
        }
        Ok(())
    }

    fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        debug!(id = event.id.0, payload = ?event.payload, "event");
        self.events.push(event);

        if self.events.len() > self.params.max_events {
            let drain_count = self.events.len() - self.params.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
