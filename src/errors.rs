// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::money::Money;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    #[error("Goal '{0}' not found")]
    GoalNotFound(String),

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// The cached balance of a goal no longer matches the sum of its entries.
    #[error("Goal '{goal_id}' balance diverged: cached {cached}, ledger {derived}")]
    PartialWriteDivergence {
        goal_id: String,
        cached: Money,
        derived: Money,
    },

    #[error("Another operation is still pending")]
    OperationPending,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
