// 6.0 treasury.rs: the "move value out" capability. MOCKED here; in prod this
// is the chain-native transfer the settlement pass drives. the market never
// sees balances, only success or failure per transfer.

use crate::types::{Address, NativeAmount};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TransferError {
    #[error("transfer of {amount} to {to} rejected")]
    Rejected { to: Address, amount: NativeAmount },
}

// 6.1: transfer seam. one call per payout; each call stands alone so one
// refusal cannot poison the rest of a settlement pass.
pub trait ValueTransfer {
    fn transfer(&mut self, to: Address, amount: NativeAmount) -> Result<(), TransferError>;

    /// Backend identifier for logs.
    fn backend_type(&self) -> &str;
}

// 6.2: in-memory backend for tests and simulation. credits a balance book and
// can be told to refuse specific addresses, which is how transfer-failure
// isolation gets exercised.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTreasury {
    balances: HashMap<Address, NativeAmount>,
    refusing: HashSet<Address>,
    transfer_count: u64,
}

impl InMemoryTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&mut self, address: Address, balance: NativeAmount) {
        self.balances.insert(address, balance);
    }

    pub fn get_balance(&self, address: Address) -> NativeAmount {
        self.balances
            .get(&address)
            .copied()
            .unwrap_or(NativeAmount::zero())
    }

    /// Make every transfer to `address` fail until cleared.
    pub fn refuse(&mut self, address: Address) {
        self.refusing.insert(address);
    }

    pub fn clear_refusal(&mut self, address: Address) {
        self.refusing.remove(&address);
    }

    pub fn transfer_count(&self) -> u64 {
        self.transfer_count
    }
}

impl ValueTransfer for InMemoryTreasury {
    fn transfer(&mut self, to: Address, amount: NativeAmount) -> Result<(), TransferError> {
        if self.refusing.contains(&to) {
            return Err(TransferError::Rejected { to, amount });
        }
        let balance = self.get_balance(to);
        let credited = balance
            .checked_add(amount)
            .ok_or(TransferError::Rejected { to, amount })?;
        self.balances.insert(to, credited);
        self.transfer_count += 1;
        Ok(())
    }

    fn backend_type(&self) -> &str {
        "in_memory"
    }
}
