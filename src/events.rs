// 7.0 events.rs: every state change produces an event. used for audit trails,
// state reconstruction, and notifying external systems. the EventPayload enum
// lists all event types.

use crate::types::{Address, NativeAmount, Side, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    // Lifecycle events
    MarketOpened(MarketOpenedEvent),
    ResultReported(ResultReportedEvent),
    SettlementCompleted(SettlementCompletedEvent),

    // Stake events
    BetPlaced(BetPlacedEvent),

    // Payout events
    PayoutIssued(PayoutIssuedEvent),
    PayoutFailed(PayoutFailedEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOpenedEvent {
    pub admin: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetPlacedEvent {
    pub player: Address,
    pub side: Side,
    pub amount: NativeAmount,
    /// Player's cumulative stake on the side after this bet.
    pub player_stake: NativeAmount,
    /// The side's pool after this bet.
    pub side_pool: NativeAmount,
    pub new_player: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultReportedEvent {
    pub winning: Side,
    pub losing: Side,
    pub winning_pool: NativeAmount,
    pub losing_pool: NativeAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutIssuedEvent {
    pub player: Address,
    pub stake: NativeAmount,
    pub amount: NativeAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutFailedEvent {
    pub player: Address,
    pub amount: NativeAmount,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementCompletedEvent {
    pub winning: Side,
    pub paid_count: usize,
    pub failed_count: usize,
    pub distributed: NativeAmount,
    pub retained: NativeAmount,
}

pub trait EventEmitter {
    fn emit(&mut self, event: Event);
}

#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<Event>,
    next_id: u64,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn next_id(&mut self) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl EventEmitter for EventCollector {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}
