// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use finantree::models::{EntryKind, LedgerEntry};
use finantree::money::Money;
use finantree::projector::{funded_in_month, project_daily_balance};

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(kind: EntryKind, minor: i64, created_at: DateTime<Utc>) -> LedgerEntry {
    LedgerEntry::new("goal-1", "user-1", Money::from_minor_units(minor), kind, created_at)
}

fn balances(series: &[finantree::projector::BalancePoint]) -> Vec<i64> {
    series.iter().map(|p| p.balance.minor_units()).collect()
}

#[test]
fn empty_ledger_has_nothing_to_chart() {
    let series = project_daily_balance(at(2025, 3, 1, 9, 0), &[], day(2025, 3, 10), utc());
    assert!(series.is_empty());
}

#[test]
fn rises_then_dips_on_entry_days() {
    // storage hands entries back newest first
    let entries = vec![
        entry(EntryKind::Withdrawal, 10_000, at(2025, 3, 4, 18, 0)),
        entry(EntryKind::Deposit, 25_000, at(2025, 3, 2, 10, 0)),
    ];
    let series = project_daily_balance(at(2025, 3, 1, 9, 0), &entries, day(2025, 3, 5), utc());

    let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
    assert_eq!(
        dates,
        vec![
            day(2025, 3, 1),
            day(2025, 3, 2),
            day(2025, 3, 3),
            day(2025, 3, 4),
            day(2025, 3, 5)
        ]
    );
    assert_eq!(balances(&series), vec![0, 25_000, 25_000, 15_000, 15_000]);
}

#[test]
fn same_day_entries_fold_into_one_point() {
    let entries = vec![
        entry(EntryKind::Deposit, 5_000, at(2025, 6, 1, 8, 0)),
        entry(EntryKind::Withdrawal, 2_000, at(2025, 6, 1, 20, 0)),
        entry(EntryKind::Deposit, 1_000, at(2025, 6, 1, 12, 0)),
    ];
    let series = project_daily_balance(at(2025, 6, 1, 7, 0), &entries, day(2025, 6, 2), utc());
    assert_eq!(balances(&series), vec![4_000, 4_000]);
}

#[test]
fn one_point_per_day_without_gaps() {
    let entries = vec![entry(EntryKind::Deposit, 100, at(2025, 2, 14, 12, 0))];
    let series = project_daily_balance(at(2025, 1, 30, 23, 0), &entries, day(2025, 3, 2), utc());

    // Jan 30..31, all of February, Mar 1..2
    assert_eq!(series.len(), 2 + 28 + 2);
    assert_eq!(series.first().unwrap().date, day(2025, 1, 30));
    assert_eq!(series.last().unwrap().date, day(2025, 3, 2));
    for pair in series.windows(2) {
        assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
    }
}

#[test]
fn evaluation_before_creation_still_gives_two_days() {
    let entries = vec![entry(EntryKind::Deposit, 700, at(2025, 5, 10, 9, 0))];
    let series = project_daily_balance(at(2025, 5, 10, 8, 0), &entries, day(2025, 5, 1), utc());
    let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![day(2025, 5, 10), day(2025, 5, 11)]);
    assert_eq!(balances(&series), vec![700, 700]);
}

#[test]
fn projection_is_deterministic() {
    let entries = vec![
        entry(EntryKind::Deposit, 1_234, at(2025, 4, 2, 10, 0)),
        entry(EntryKind::Withdrawal, 234, at(2025, 4, 3, 10, 0)),
        entry(EntryKind::Deposit, 99, at(2025, 4, 3, 10, 0)),
    ];
    let first = project_daily_balance(at(2025, 4, 1, 0, 0), &entries, day(2025, 4, 6), utc());
    let second = project_daily_balance(at(2025, 4, 1, 0, 0), &entries, day(2025, 4, 6), utc());
    assert_eq!(first, second);
    assert_eq!(balances(&first), vec![0, 1_234, 1_099, 1_099, 1_099, 1_099]);
}

#[test]
fn days_follow_the_configured_offset() {
    // 01:30 UTC on Mar 2 is still Mar 1 in UTC-3
    let entries = vec![entry(EntryKind::Deposit, 5_000, at(2025, 3, 2, 1, 30))];
    let created = at(2025, 3, 1, 12, 0);
    let brt = FixedOffset::west_opt(3 * 3600).unwrap();

    let in_utc = project_daily_balance(created, &entries, day(2025, 3, 2), utc());
    assert_eq!(balances(&in_utc), vec![0, 5_000]);

    let in_brt = project_daily_balance(created, &entries, day(2025, 3, 2), brt);
    assert_eq!(balances(&in_brt), vec![5_000, 5_000]);
}

#[test]
fn funded_only_counts_deposits_in_that_month() {
    let entries = vec![
        entry(EntryKind::Deposit, 1_000, at(2025, 3, 31, 23, 0)),
        entry(EntryKind::Withdrawal, 500, at(2025, 4, 15, 12, 0)),
    ];
    assert!(funded_in_month(&entries, 2025, 3, utc()));
    assert!(!funded_in_month(&entries, 2025, 4, utc()));
    // in UTC+2 the March 31 23:00 deposit lands on April 1
    let cest = FixedOffset::east_opt(2 * 3600).unwrap();
    assert!(funded_in_month(&entries, 2025, 4, cest));
    assert!(!funded_in_month(&[], 2025, 4, utc()));
}
