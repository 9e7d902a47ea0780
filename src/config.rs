// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Settings stored in the `settings` key/value table.

use chrono::FixedOffset;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::money::{Currency, Locale};

pub const KEY_CURRENCY: &str = "currency";
pub const KEY_LOCALE: &str = "locale";
pub const KEY_UTC_OFFSET: &str = "utc_offset";
pub const KEY_ACTOR_ID: &str = "actor_id";

pub const KEYS: &[&str] = &[KEY_CURRENCY, KEY_LOCALE, KEY_UTC_OFFSET, KEY_ACTOR_ID];

#[derive(Debug, Clone)]
pub struct Settings {
    pub currency: Currency,
    pub locale: Locale,
    pub utc_offset: FixedOffset,
    pub actor_id: String,
}

impl Settings {
    /// Reads every setting, filling in defaults. A missing `actor_id` is
    /// generated and persisted.
    pub fn load(conn: &Connection) -> Result<Settings> {
        let currency = match get_setting(conn, KEY_CURRENCY)? {
            Some(c) => Currency::from_code(&c)?,
            None => Currency::brl(),
        };
        let locale = match get_setting(conn, KEY_LOCALE)? {
            Some(l) => Locale::parse(&l)?,
            None => Locale::default(),
        };
        let utc_offset = match get_setting(conn, KEY_UTC_OFFSET)? {
            Some(o) => parse_offset(&o)?,
            None => utc(),
        };
        Ok(Settings {
            currency,
            locale,
            utc_offset,
            actor_id: ensure_actor_id(conn)?,
        })
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is valid")
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Validates and stores a setting. Values are normalized before storage.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    let normalized = match key {
        KEY_CURRENCY => Currency::from_code(value)?.code.to_string(),
        KEY_LOCALE => Locale::parse(value)?.as_str().to_string(),
        KEY_UTC_OFFSET => parse_offset(value)?.to_string(),
        KEY_ACTOR_ID if !value.is_empty() => value.to_string(),
        KEY_ACTOR_ID => {
            return Err(LedgerError::InvalidSetting(
                "actor_id must not be empty".into(),
            ));
        }
        other => {
            return Err(LedgerError::InvalidSetting(format!(
                "unknown setting '{}' (expected one of {})",
                other,
                KEYS.join(", ")
            )));
        }
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, normalized],
    )?;
    Ok(normalized)
}

pub fn ensure_actor_id(conn: &Connection) -> Result<String> {
    if let Some(id) = get_setting(conn, KEY_ACTOR_ID)? {
        return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    set_setting(conn, KEY_ACTOR_ID, &id)?;
    Ok(id)
}

/// Parses `Z`, `UTC`, `+HH:MM`, `-HH:MM` or `-HH`.
pub fn parse_offset(s: &str) -> Result<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }
    let invalid = || LedgerError::InvalidSetting(format!("invalid UTC offset '{}', expected like -03:00", s));
    let (sign, rest) = match s.chars().next() {
        Some('+') => (1, &s[1..]),
        Some('-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let (h, m) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None => (rest, "0"),
    };
    let h: i32 = h.parse().map_err(|_| invalid())?;
    let m: i32 = m.parse().map_err(|_| invalid())?;
    if !(0..=14).contains(&h) || !(0..60).contains(&m) {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (h * 3600 + m * 60)).ok_or_else(invalid)
}
