// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Replays a goal's ledger into a daily running-balance series.
//!
//! All calendar-day bucketing uses a single UTC offset: the goal's creation
//! day, each entry's day and the evaluation day are computed with the same
//! `FixedOffset`, never mixing local and UTC truncation.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{EntryKind, LedgerEntry};
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub balance: Money,
}

pub fn calendar_day(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

/// One point per calendar day from the goal's creation day to `today`
/// inclusive. An empty ledger yields an empty series.
pub fn project_daily_balance(
    goal_created_at: DateTime<Utc>,
    entries: &[LedgerEntry],
    today: NaiveDate,
    offset: FixedOffset,
) -> Vec<BalancePoint> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&LedgerEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.created_at);

    let start = calendar_day(goal_created_at, offset);
    let end = if today < start {
        start.succ_opt().unwrap_or(start)
    } else {
        today
    };

    let mut series = Vec::new();
    let mut balance = Money::ZERO;
    let mut pending = sorted.into_iter().peekable();
    for day in start.iter_days().take_while(|d| *d <= end) {
        while let Some(entry) = pending.next_if(|e| calendar_day(e.created_at, offset) <= day) {
            balance = balance + entry.signed_amount();
        }
        series.push(BalancePoint { date: day, balance });
    }
    series
}

/// Percentage of `target` reached, rounded and clamped to 100.
pub fn progress_percent(current: Money, target: Money) -> u8 {
    if !target.is_positive() || !current.is_positive() {
        return 0;
    }
    let ratio = current.to_decimal() / target.to_decimal() * Decimal::ONE_HUNDRED;
    let pct = ratio
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .min(Decimal::ONE_HUNDRED);
    pct.to_u8().unwrap_or(100)
}

/// Whether at least one deposit landed in the given calendar month.
pub fn funded_in_month(entries: &[LedgerEntry], year: i32, month: u32, offset: FixedOffset) -> bool {
    entries.iter().any(|e| {
        let day = calendar_day(e.created_at, offset);
        e.kind == EntryKind::Deposit && day.year() == year && day.month() == month
    })
}
