// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::{LedgerError, Result};
use crate::models::{EntryKind, Goal, LedgerEntry};
use crate::money::Money;
use crate::storage::{GoalStore, LedgerWrite};

const GOAL_COLUMNS: &str =
    "id, owner_id, name, icon, target_amount, current_amount, created_at";
const ENTRY_COLUMNS: &str = "id, goal_id, actor_id, amount, kind, created_at";

/// `GoalStore` over the `goals` and `goal_ledger_entries` tables.
pub struct SqliteGoalStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteGoalStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SqliteGoalStore { conn }
    }

    pub fn connection(&self) -> &'a Connection {
        self.conn
    }
}

fn goal_from_row(r: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal::restore(
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        Money::from_minor_units(r.get(4)?),
        Money::from_minor_units(r.get(5)?),
        r.get(6)?,
    ))
}

fn entry_from_row(r: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    let kind_s: String = r.get(4)?;
    let kind = EntryKind::parse(&kind_s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown entry kind '{}'", kind_s).into(),
        )
    })?;
    Ok(LedgerEntry {
        id: r.get(0)?,
        goal_id: r.get(1)?,
        actor_id: r.get(2)?,
        amount: Money::from_minor_units(r.get(3)?),
        kind,
        created_at: r.get(5)?,
    })
}

impl GoalStore for SqliteGoalStore<'_> {
    fn insert_goal(&self, _write: &LedgerWrite, goal: &Goal) -> Result<()> {
        self.conn.execute(
            "INSERT INTO goals(id, owner_id, name, icon, target_amount, current_amount, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.id,
                goal.owner_id,
                goal.name,
                goal.icon,
                goal.target_amount.minor_units(),
                goal.current_amount().minor_units(),
                goal.created_at
            ],
        )?;
        Ok(())
    }

    fn find_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        let sql = format!("SELECT {} FROM goals WHERE id=?1", GOAL_COLUMNS);
        let goal = self
            .conn
            .query_row(&sql, params![goal_id], goal_from_row)
            .optional()?;
        Ok(goal)
    }

    fn goals_for_owner(&self, owner_id: &str) -> Result<Vec<Goal>> {
        let sql = format!(
            "SELECT {} FROM goals WHERE owner_id=?1 ORDER BY created_at DESC, rowid DESC",
            GOAL_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![owner_id], goal_from_row)?;
        let mut goals = Vec::new();
        for g in rows {
            goals.push(g?);
        }
        Ok(goals)
    }

    fn entries_for_goal(&self, goal_id: &str) -> Result<Vec<LedgerEntry>> {
        let sql = format!(
            "SELECT {} FROM goal_ledger_entries WHERE goal_id=?1 ORDER BY created_at DESC, rowid DESC",
            ENTRY_COLUMNS
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![goal_id], entry_from_row)?;
        let mut entries = Vec::new();
        for e in rows {
            entries.push(e?);
        }
        Ok(entries)
    }

    fn record_entry(
        &self,
        _write: &LedgerWrite,
        entry: &LedgerEntry,
        new_balance: Money,
    ) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO goal_ledger_entries(id, goal_id, actor_id, amount, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id,
                entry.goal_id,
                entry.actor_id,
                entry.amount.minor_units(),
                entry.kind.as_str(),
                entry.created_at
            ],
        )?;
        let updated = tx.execute(
            "UPDATE goals SET current_amount=?1 WHERE id=?2",
            params![new_balance.minor_units(), entry.goal_id],
        )?;
        if updated == 0 {
            // dropping `tx` rolls the insert back
            return Err(LedgerError::GoalNotFound(entry.goal_id.clone()));
        }
        tx.commit()?;
        Ok(())
    }

    fn reset_balance(&self, _write: &LedgerWrite, goal_id: &str, balance: Money) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE goals SET current_amount=?1 WHERE id=?2",
            params![balance.minor_units(), goal_id],
        )?;
        if updated == 0 {
            return Err(LedgerError::GoalNotFound(goal_id.to_string()));
        }
        Ok(())
    }

    fn delete_goal(&self, _write: &LedgerWrite, goal_id: &str) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM goal_ledger_entries WHERE goal_id=?1",
            params![goal_id],
        )?;
        let deleted = tx.execute("DELETE FROM goals WHERE id=?1", params![goal_id])?;
        if deleted == 0 {
            return Err(LedgerError::GoalNotFound(goal_id.to_string()));
        }
        tx.commit()?;
        Ok(removed)
    }
}
