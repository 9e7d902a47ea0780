// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Cell, RefCell};

use crate::errors::{LedgerError, Result};
use crate::models::{Goal, LedgerEntry};
use crate::money::Money;
use crate::storage::{GoalStore, LedgerWrite};

#[derive(Default)]
struct Tables {
    goals: Vec<Goal>,
    // insertion order is arrival order
    entries: Vec<LedgerEntry>,
}

/// In-process `GoalStore`. Can be told to reject writes so callers can
/// exercise their failure paths.
#[derive(Default)]
pub struct MemoryGoalStore {
    tables: RefCell<Tables>,
    reject_writes: Cell<bool>,
}

impl MemoryGoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    pub fn entry_count(&self) -> usize {
        self.tables.borrow().entries.len()
    }

    fn check_writable(&self) -> Result<()> {
        if self.reject_writes.get() {
            return Err(LedgerError::StoreUnavailable(
                "writes are currently rejected".into(),
            ));
        }
        Ok(())
    }
}

impl GoalStore for MemoryGoalStore {
    fn insert_goal(&self, _write: &LedgerWrite, goal: &Goal) -> Result<()> {
        self.check_writable()?;
        self.tables.borrow_mut().goals.push(goal.clone());
        Ok(())
    }

    fn find_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        Ok(self
            .tables
            .borrow()
            .goals
            .iter()
            .find(|g| g.id == goal_id)
            .cloned())
    }

    fn goals_for_owner(&self, owner_id: &str) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .tables
            .borrow()
            .goals
            .iter()
            .rev()
            .filter(|g| g.owner_id == owner_id)
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    fn entries_for_goal(&self, goal_id: &str) -> Result<Vec<LedgerEntry>> {
        let mut entries: Vec<LedgerEntry> = self
            .tables
            .borrow()
            .entries
            .iter()
            .rev()
            .filter(|e| e.goal_id == goal_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    fn record_entry(
        &self,
        _write: &LedgerWrite,
        entry: &LedgerEntry,
        new_balance: Money,
    ) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables.borrow_mut();
        let idx = tables
            .goals
            .iter()
            .position(|g| g.id == entry.goal_id)
            .ok_or_else(|| LedgerError::GoalNotFound(entry.goal_id.clone()))?;
        let goal = tables.goals[idx].clone();
        tables.goals[idx] = goal.with_current_amount(new_balance);
        tables.entries.push(entry.clone());
        Ok(())
    }

    fn reset_balance(&self, _write: &LedgerWrite, goal_id: &str, balance: Money) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables.borrow_mut();
        let goal = tables
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| LedgerError::GoalNotFound(goal_id.to_string()))?;
        *goal = goal.clone().with_current_amount(balance);
        Ok(())
    }

    fn delete_goal(&self, _write: &LedgerWrite, goal_id: &str) -> Result<usize> {
        self.check_writable()?;
        let mut tables = self.tables.borrow_mut();
        if !tables.goals.iter().any(|g| g.id == goal_id) {
            return Err(LedgerError::GoalNotFound(goal_id.to_string()));
        }
        let before = tables.entries.len();
        tables.entries.retain(|e| e.goal_id != goal_id);
        let removed = before - tables.entries.len();
        tables.goals.retain(|g| g.id != goal_id);
        Ok(removed)
    }
}
