// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The only mutation path for goal balances.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{LedgerError, Result};
use crate::models::{EntryKind, GardenSummary, Goal, LedgerEntry, NewGoal};
use crate::money::Money;
use crate::storage::{GoalStore, LedgerWrite};

/// Result of a successful deposit or withdrawal.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReceipt {
    pub goal: Goal,
    pub entry: LedgerEntry,
}

pub struct LedgerService<S: GoalStore> {
    store: S,
}

impl<S: GoalStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        LedgerService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_goal(&self, owner_id: &str, new_goal: NewGoal) -> Result<Goal> {
        let name = new_goal.name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::InvalidGoal("name must not be empty".into()));
        }
        if !new_goal.target_amount.is_positive() {
            return Err(LedgerError::InvalidGoal(format!(
                "target amount must be greater than zero, got {}",
                new_goal.target_amount
            )));
        }
        let icon = new_goal
            .icon
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());
        let goal = Goal::create(
            owner_id,
            NewGoal {
                name,
                target_amount: new_goal.target_amount,
                icon,
            },
            Utc::now(),
        );
        self.store.insert_goal(&LedgerWrite::new(), &goal)?;
        info!(goal_id = %goal.id, target = %goal.target_amount, "created goal '{}'", goal.name);
        Ok(goal)
    }

    /// Loads a goal owned by `actor_id`. Goals owned by someone else are
    /// reported as not found.
    pub fn goal(&self, actor_id: &str, goal_id: &str) -> Result<Goal> {
        match self.store.find_goal(goal_id)? {
            Some(goal) if goal.owner_id == actor_id => Ok(goal),
            _ => Err(LedgerError::GoalNotFound(goal_id.to_string())),
        }
    }

    pub fn goals(&self, actor_id: &str) -> Result<Vec<Goal>> {
        self.store.goals_for_owner(actor_id)
    }

    /// Entries of a goal, newest first.
    pub fn entries(&self, actor_id: &str, goal_id: &str) -> Result<Vec<LedgerEntry>> {
        let goal = self.goal(actor_id, goal_id)?;
        self.store.entries_for_goal(&goal.id)
    }

    pub fn deposit(&self, goal_id: &str, actor_id: &str, amount: Money) -> Result<LedgerReceipt> {
        self.post(goal_id, actor_id, amount, EntryKind::Deposit)
    }

    pub fn withdraw(&self, goal_id: &str, actor_id: &str, amount: Money) -> Result<LedgerReceipt> {
        self.post(goal_id, actor_id, amount, EntryKind::Withdrawal)
    }

    fn post(
        &self,
        goal_id: &str,
        actor_id: &str,
        amount: Money,
        kind: EntryKind,
    ) -> Result<LedgerReceipt> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "{} must be greater than zero, got {}",
                kind.as_str(),
                amount
            )));
        }
        let goal = self.goal(actor_id, goal_id)?;
        let current = goal.current_amount();
        let new_balance = match kind {
            EntryKind::Deposit => current
                .checked_add(amount)
                .ok_or_else(|| LedgerError::InvalidAmount(format!("{} overflows the balance", amount)))?,
            EntryKind::Withdrawal => {
                if amount > current {
                    return Err(LedgerError::InsufficientFunds {
                        requested: amount,
                        available: current,
                    });
                }
                current - amount
            }
        };

        let entry = LedgerEntry::new(&goal.id, actor_id, amount, kind, Utc::now());
        self.store
            .record_entry(&LedgerWrite::new(), &entry, new_balance)?;
        info!(
            goal_id = %goal.id,
            entry_id = %entry.id,
            kind = kind.as_str(),
            %amount,
            balance = %new_balance,
            "posted ledger entry"
        );
        Ok(LedgerReceipt {
            goal: goal.with_current_amount(new_balance),
            entry,
        })
    }

    /// Deletes the goal and every entry that references it.
    pub fn delete_goal(&self, actor_id: &str, goal_id: &str) -> Result<usize> {
        let goal = self.goal(actor_id, goal_id)?;
        let removed = self.store.delete_goal(&LedgerWrite::new(), &goal.id)?;
        info!(goal_id = %goal.id, entries = removed, "deleted goal '{}'", goal.name);
        Ok(removed)
    }

    /// Sum of the goal's entries, ignoring the cached balance.
    pub fn derived_balance(&self, goal_id: &str) -> Result<Money> {
        let entries = self.store.entries_for_goal(goal_id)?;
        Money::checked_sum(entries.iter().map(LedgerEntry::signed_amount)).ok_or_else(|| {
            LedgerError::InvalidAmount(format!("ledger of goal {} overflows", goal_id))
        })
    }

    /// Fails with `PartialWriteDivergence` when the cached balance disagrees
    /// with the ledger.
    pub fn verify(&self, actor_id: &str, goal_id: &str) -> Result<Goal> {
        let goal = self.goal(actor_id, goal_id)?;
        let derived = self.derived_balance(&goal.id)?;
        if derived != goal.current_amount() {
            warn!(goal_id = %goal.id, cached = %goal.current_amount(), %derived, "balance diverged from ledger");
            return Err(LedgerError::PartialWriteDivergence {
                goal_id: goal.id.clone(),
                cached: goal.current_amount(),
                derived,
            });
        }
        debug!(goal_id = %goal.id, "balance matches ledger");
        Ok(goal)
    }

    /// Rewrites the cached balance from the ledger. Returns the goal and
    /// whether anything changed.
    pub fn reconcile(&self, actor_id: &str, goal_id: &str) -> Result<(Goal, bool)> {
        let goal = self.goal(actor_id, goal_id)?;
        let derived = self.derived_balance(&goal.id)?;
        if derived == goal.current_amount() {
            return Ok((goal, false));
        }
        if derived.is_negative() {
            warn!(goal_id = %goal.id, %derived, "ledger sums to a negative balance");
        }
        self.store
            .reset_balance(&LedgerWrite::new(), &goal.id, derived)?;
        info!(goal_id = %goal.id, from = %goal.current_amount(), to = %derived, "reconciled balance");
        Ok((goal.with_current_amount(derived), true))
    }

    /// Every goal of `actor_id` whose cached balance disagrees with its ledger.
    pub fn divergences(&self, actor_id: &str) -> Result<Vec<LedgerError>> {
        let mut out = Vec::new();
        for goal in self.goals(actor_id)? {
            match self.verify(actor_id, &goal.id) {
                Ok(_) => {}
                Err(e @ LedgerError::PartialWriteDivergence { .. }) => out.push(e),
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    pub fn summary(&self, actor_id: &str) -> Result<GardenSummary> {
        let goals = self.goals(actor_id)?;
        let overflow = |what: &str| LedgerError::InvalidAmount(format!("total {} overflows", what));
        Ok(GardenSummary {
            goals: goals.len(),
            saved: Money::checked_sum(goals.iter().map(Goal::current_amount))
                .ok_or_else(|| overflow("saved"))?,
            targeted: Money::checked_sum(goals.iter().map(|g| g.target_amount))
                .ok_or_else(|| overflow("target"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryGoalStore;

    fn service_with_goal() -> (LedgerService<MemoryGoalStore>, Goal) {
        let svc = LedgerService::new(MemoryGoalStore::new());
        let goal = svc
            .create_goal(
                "alice",
                NewGoal {
                    name: "  Trip  ".into(),
                    target_amount: Money::from_minor_units(100_000),
                    icon: Some(" ".into()),
                },
            )
            .unwrap();
        (svc, goal)
    }

    #[test]
    fn create_goal_trims_and_starts_at_zero() {
        let (_svc, goal) = service_with_goal();
        assert_eq!(goal.name, "Trip");
        assert_eq!(goal.icon, None);
        assert_eq!(goal.badge(), "TR");
        assert!(goal.current_amount().is_zero());
    }

    #[test]
    fn rejected_write_leaves_no_entry() {
        let (svc, goal) = service_with_goal();
        svc.store().reject_writes(true);
        let err = svc
            .deposit(&goal.id, "alice", Money::from_minor_units(500))
            .unwrap_err();
        assert!(matches!(err, LedgerError::StoreUnavailable(_)));
        svc.store().reject_writes(false);
        assert_eq!(svc.store().entry_count(), 0);
        assert!(svc.goal("alice", &goal.id).unwrap().current_amount().is_zero());
    }

    #[test]
    fn other_actor_sees_not_found() {
        let (svc, goal) = service_with_goal();
        let err = svc
            .deposit(&goal.id, "mallory", Money::from_minor_units(500))
            .unwrap_err();
        assert!(matches!(err, LedgerError::GoalNotFound(_)));
        assert!(svc.goals("mallory").unwrap().is_empty());
    }
}
