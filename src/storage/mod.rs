// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage port for goals and their ledger entries.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryGoalStore;
pub use sqlite::SqliteGoalStore;

use crate::errors::Result;
use crate::models::{Goal, LedgerEntry};
use crate::money::Money;

/// Write capability handed to a [`GoalStore`] by
/// [`crate::ledger::LedgerService`].
///
/// Only this crate can mint one, so code outside it can read a store but
/// never change a goal's cached balance:
///
/// ```compile_fail
/// use finantree::money::Money;
/// use finantree::storage::{GoalStore, LedgerWrite, MemoryGoalStore};
///
/// let store = MemoryGoalStore::new();
/// store
///     .reset_balance(&LedgerWrite::new(), "goal-1", Money::from_minor_units(-999))
///     .unwrap();
/// ```
///
/// ```compile_fail
/// use finantree::storage::LedgerWrite;
///
/// let _write = LedgerWrite(());
/// ```
#[derive(Debug)]
pub struct LedgerWrite(());

impl LedgerWrite {
    pub(crate) fn new() -> Self {
        LedgerWrite(())
    }
}

/// Persistence operations the ledger service depends on. Every mutating
/// method requires a [`LedgerWrite`].
pub trait GoalStore {
    fn insert_goal(&self, write: &LedgerWrite, goal: &Goal) -> Result<()>;
    fn find_goal(&self, goal_id: &str) -> Result<Option<Goal>>;
    fn goals_for_owner(&self, owner_id: &str) -> Result<Vec<Goal>>;
    /// Entries of one goal, newest first.
    fn entries_for_goal(&self, goal_id: &str) -> Result<Vec<LedgerEntry>>;
    /// Appends `entry` and sets the goal's cached balance to `new_balance` as
    /// one atomic write.
    fn record_entry(
        &self,
        write: &LedgerWrite,
        entry: &LedgerEntry,
        new_balance: Money,
    ) -> Result<()>;
    fn reset_balance(&self, write: &LedgerWrite, goal_id: &str, balance: Money) -> Result<()>;
    /// Removes the goal's entries, then the goal. Returns the number of
    /// entries removed.
    fn delete_goal(&self, write: &LedgerWrite, goal_id: &str) -> Result<usize>;
}
