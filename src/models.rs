// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Deposit,
    Withdrawal,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Deposit => "deposit",
            EntryKind::Withdrawal => "withdrawal",
        }
    }

    pub fn parse(s: &str) -> Option<EntryKind> {
        match s {
            "deposit" => Some(EntryKind::Deposit),
            "withdrawal" => Some(EntryKind::Withdrawal),
            _ => None,
        }
    }
}

/// One deposit or withdrawal against a goal. Amount is always positive;
/// direction lives in `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub goal_id: String,
    pub actor_id: String,
    pub amount: Money,
    pub kind: EntryKind,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(
        goal_id: &str,
        actor_id: &str,
        amount: Money,
        kind: EntryKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        LedgerEntry {
            id: Uuid::new_v4().to_string(),
            goal_id: goal_id.to_string(),
            actor_id: actor_id.to_string(),
            amount,
            kind,
            created_at,
        }
    }

    pub fn signed_amount(&self) -> Money {
        match self.kind {
            EntryKind::Deposit => self.amount,
            EntryKind::Withdrawal => -self.amount,
        }
    }
}

/// Input for creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Money,
    pub icon: Option<String>,
}

/// A savings goal. The cached balance is only ever set by the ledger
/// service, so a `Goal` cannot be built or deserialized from outside:
///
/// ```compile_fail
/// let goal: finantree::models::Goal = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub target_amount: Money,
    current_amount: Money,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub(crate) fn create(owner_id: &str, new_goal: NewGoal, created_at: DateTime<Utc>) -> Self {
        Goal {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: new_goal.name,
            icon: new_goal.icon,
            target_amount: new_goal.target_amount,
            current_amount: Money::ZERO,
            created_at,
        }
    }

    /// Rebuilds a goal from a stored row.
    pub(crate) fn restore(
        id: String,
        owner_id: String,
        name: String,
        icon: Option<String>,
        target_amount: Money,
        current_amount: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Goal {
            id,
            owner_id,
            name,
            icon,
            target_amount,
            current_amount,
            created_at,
        }
    }

    pub fn current_amount(&self) -> Money {
        self.current_amount
    }

    pub(crate) fn with_current_amount(mut self, amount: Money) -> Self {
        self.current_amount = amount;
        self
    }

    /// Icon if set, otherwise the first two letters of the name.
    pub fn badge(&self) -> String {
        match self.icon.as_deref().map(str::trim) {
            Some(icon) if !icon.is_empty() => icon.to_string(),
            _ => self.name.chars().take(2).collect::<String>().to_uppercase(),
        }
    }

    pub fn progress_percent(&self) -> u8 {
        crate::projector::progress_percent(self.current_amount, self.target_amount)
    }
}

/// Aggregate view of one actor's garden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GardenSummary {
    pub goals: usize,
    pub saved: Money,
    pub targeted: Money,
}
