// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::{get_setting, set_setting, KEYS};
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let v = get_setting(conn, key)?
                .with_context(|| format!("Setting '{}' is not set", key))?;
            println!("{}", v);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            let stored = set_setting(conn, key, value)?;
            println!("{} = {}", key, stored);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for key in KEYS {
                let v = get_setting(conn, key)?.unwrap_or_else(|| "(default)".into());
                data.push(vec![key.to_string(), v]);
            }
            println!("{}", pretty_table(&["Key", "Value"], data));
        }
        _ => {}
    }
    Ok(())
}
