// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.finantree", "Finantree", "finantree"));

/// Environment variable that overrides the database location.
pub const DB_ENV: &str = "FINANTREE_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finantree.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    open_at(&db_path()?)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS goals(
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL CHECK(length(trim(name)) > 0),
        icon TEXT,
        target_amount INTEGER NOT NULL CHECK(target_amount > 0), -- minor units
        current_amount INTEGER NOT NULL DEFAULT 0,               -- minor units
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_goals_owner ON goals(owner_id, created_at);

    CREATE TABLE IF NOT EXISTS goal_ledger_entries(
        id TEXT PRIMARY KEY,
        goal_id TEXT NOT NULL,
        actor_id TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount > 0),
        kind TEXT NOT NULL CHECK(kind IN ('deposit','withdrawal')),
        created_at TEXT NOT NULL,
        FOREIGN KEY(goal_id) REFERENCES goals(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_goal_ledger_entries_goal ON goal_ledger_entries(goal_id, created_at);
    "#,
    )?;
    Ok(())
}
