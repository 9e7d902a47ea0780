// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display-side state for a balance while a ledger operation is in flight.
//!
//! The displayed balance only ever changes to a value the store confirmed.
//! A pending operation exposes its provisional balance separately so a
//! front end can hint at it without presenting it as the real balance.

use serde::Serialize;

use crate::errors::{LedgerError, Result};
use crate::ledger::LedgerReceipt;
use crate::models::EntryKind;
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Idle,
    Pending { kind: EntryKind, amount: Money },
    Confirmed,
    RolledBack,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceView {
    confirmed: Money,
    state: OperationState,
}

impl BalanceView {
    pub fn new(confirmed: Money) -> Self {
        BalanceView {
            confirmed,
            state: OperationState::Idle,
        }
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn displayed(&self) -> Money {
        self.confirmed
    }

    /// Balance the pending operation would produce, if one is in flight.
    pub fn provisional(&self) -> Option<Money> {
        match self.state {
            OperationState::Pending { kind: EntryKind::Deposit, amount } => {
                self.confirmed.checked_add(amount)
            }
            OperationState::Pending { kind: EntryKind::Withdrawal, amount } => {
                self.confirmed.checked_sub(amount)
            }
            _ => None,
        }
    }

    pub fn begin(&mut self, kind: EntryKind, amount: Money) -> Result<()> {
        if let OperationState::Pending { .. } = self.state {
            return Err(LedgerError::OperationPending);
        }
        self.state = OperationState::Pending { kind, amount };
        Ok(())
    }

    /// Adopts the stored balance on success, drops the provisional value on
    /// failure. The outcome is handed back unchanged.
    pub fn settle(&mut self, outcome: Result<LedgerReceipt>) -> Result<LedgerReceipt> {
        match outcome {
            Ok(receipt) => {
                self.confirmed = receipt.goal.current_amount();
                self.state = OperationState::Confirmed;
                Ok(receipt)
            }
            Err(e) => {
                self.state = OperationState::RolledBack;
                Err(e)
            }
        }
    }
}
