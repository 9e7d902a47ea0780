// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::config::Settings;
use crate::errors::LedgerError;
use crate::ledger::LedgerService;
use crate::storage::SqliteGoalStore;
use crate::utils::{fmt_money, pretty_table};

pub fn handle(conn: &Connection, settings: &Settings) -> Result<()> {
    let rows = issues(conn, settings)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn issues(conn: &Connection, settings: &Settings) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Cached balances that disagree with the ledger
    let svc = LedgerService::new(SqliteGoalStore::new(conn));
    for err in svc.divergences(&settings.actor_id)? {
        if let LedgerError::PartialWriteDivergence {
            goal_id,
            cached,
            derived,
        } = err
        {
            rows.push(vec![
                "balance_divergence".into(),
                format!(
                    "{} cached {} ledger {} (run `goal reconcile {}`)",
                    goal_id,
                    fmt_money(cached, settings),
                    fmt_money(derived, settings),
                    goal_id
                ),
            ]);
        }
    }

    // 2) Entries the acting user posted to goals that no longer exist
    let mut stmt = conn.prepare(
        "SELECT e.goal_id, COUNT(*) FROM goal_ledger_entries e
         LEFT JOIN goals g ON g.id = e.goal_id
         WHERE g.id IS NULL AND e.actor_id=?1 GROUP BY e.goal_id ORDER BY e.goal_id",
    )?;
    let mut cur = stmt.query([&settings.actor_id])?;
    while let Some(r) = cur.next()? {
        let goal_id: String = r.get(0)?;
        let n: i64 = r.get(1)?;
        rows.push(vec!["orphan_entries".into(), format!("{} ({} entries)", goal_id, n)]);
    }

    // 3) Negative cached balances
    let mut stmt2 = conn.prepare(
        "SELECT id, current_amount FROM goals WHERE owner_id=?1 AND current_amount < 0 ORDER BY id",
    )?;
    let mut cur2 = stmt2.query([&settings.actor_id])?;
    while let Some(r) = cur2.next()? {
        let id: String = r.get(0)?;
        let minor: i64 = r.get(1)?;
        rows.push(vec![
            "negative_balance".into(),
            format!(
                "{} {}",
                id,
                fmt_money(crate::money::Money::from_minor_units(minor), settings)
            ),
        ]);
    }

    Ok(rows)
}
