// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finantree::config::{self, Settings};
use finantree::db;
use finantree::errors::LedgerError;
use finantree::money::Locale;
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn defaults_and_stable_actor() {
    let conn = setup();
    let first = Settings::load(&conn).unwrap();
    assert_eq!(first.currency.code, "BRL");
    assert_eq!(first.locale, Locale::PtBr);
    assert_eq!(first.utc_offset, config::utc());
    assert!(!first.actor_id.is_empty());

    let second = Settings::load(&conn).unwrap();
    assert_eq!(first.actor_id, second.actor_id);
}

#[test]
fn set_normalizes_values() {
    let conn = setup();
    assert_eq!(config::set_setting(&conn, "currency", " eur ").unwrap(), "EUR");
    assert_eq!(config::set_setting(&conn, "locale", "en_us").unwrap(), "en-US");
    assert_eq!(config::set_setting(&conn, "utc_offset", "-3").unwrap(), "-03:00");
    assert_eq!(
        config::get_setting(&conn, "utc_offset").unwrap().as_deref(),
        Some("-03:00")
    );
    let s = Settings::load(&conn).unwrap();
    assert_eq!(s.utc_offset.local_minus_utc(), -3 * 3600);
}

#[test]
fn rejects_unknown_keys_and_values() {
    let conn = setup();
    assert!(matches!(
        config::set_setting(&conn, "theme", "dark"),
        Err(LedgerError::InvalidSetting(_))
    ));
    assert!(matches!(
        config::set_setting(&conn, "currency", "XYZ"),
        Err(LedgerError::InvalidSetting(_))
    ));
    assert!(matches!(
        config::set_setting(&conn, "actor_id", "  "),
        Err(LedgerError::InvalidSetting(_))
    ));
    assert_eq!(config::get_setting(&conn, "currency").unwrap(), None);
}
