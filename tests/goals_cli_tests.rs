// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finantree::commands::goals;
use finantree::config::{self, Settings};
use finantree::models::EntryKind;
use finantree::{cli, db};
use rusqlite::Connection;

fn setup() -> (Connection, Settings) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let settings = Settings::load(&conn).unwrap();
    (conn, settings)
}

fn run(conn: &Connection, settings: &Settings, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["finantree", "goal"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("goal", goal_m)) = matches.subcommand() {
        goals::handle(conn, settings, goal_m)
    } else {
        panic!("goal command not parsed");
    }
}

fn goal_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM goals", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn add_deposit_withdraw_by_name() {
    let (conn, settings) = setup();
    run(&conn, &settings, &["add", "--name", " Viagem ", "--target", "1.000,00"]).unwrap();
    run(&conn, &settings, &["deposit", "Viagem", "--amount", " 250,00 "]).unwrap();
    run(&conn, &settings, &["withdraw", "Viagem", "--amount", "100"]).unwrap();

    let rows = goals::goal_rows(&conn, &settings).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Viagem");
    assert_eq!(rows[0].badge, "VI");
    assert_eq!(rows[0].saved, "R$ 150,00");
    assert_eq!(rows[0].target, "R$ 1.000,00");
    assert_eq!(rows[0].progress, 15);
    assert!(rows[0].funded_this_month);

    let history = goals::history_rows(&conn, &settings, "Viagem", None).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, EntryKind::Withdrawal);
    assert_eq!(history[0].amount, "-R$ 100,00");
    assert_eq!(history[1].amount, "R$ 250,00");

    let limited = goals::history_rows(&conn, &settings, &rows[0].id, Some(1)).unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn chart_ends_at_current_balance() {
    let (conn, settings) = setup();
    run(&conn, &settings, &["add", "--name", "Carro", "--target", "5000"]).unwrap();
    assert!(goals::chart_rows(&conn, &settings, "Carro", None).unwrap().is_empty());

    run(&conn, &settings, &["deposit", "Carro", "--amount", "250"]).unwrap();
    run(&conn, &settings, &["withdraw", "Carro", "--amount", "100"]).unwrap();
    let series = goals::chart_rows(&conn, &settings, "Carro", None).unwrap();
    assert!(!series.is_empty());
    assert_eq!(series.last().unwrap().balance, "150.00");
}

#[test]
fn overdraw_is_rejected_and_balance_kept() {
    let (conn, settings) = setup();
    run(&conn, &settings, &["add", "--name", "Casa", "--target", "100"]).unwrap();
    run(&conn, &settings, &["deposit", "Casa", "--amount", "10"]).unwrap();

    let err = run(&conn, &settings, &["withdraw", "Casa", "--amount", "10,01"]).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("Insufficient funds"), "{}", msg);
    assert!(msg.contains("R$ 10,00"), "{}", msg);

    let err = run(&conn, &settings, &["deposit", "Casa", "--amount", "-50"]).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid amount"));

    let rows = goals::goal_rows(&conn, &settings).unwrap();
    assert_eq!(rows[0].saved, "R$ 10,00");
    assert_eq!(goals::history_rows(&conn, &settings, "Casa", None).unwrap().len(), 1);
}

#[test]
fn remove_cascades_to_entries() {
    let (conn, settings) = setup();
    run(&conn, &settings, &["add", "--name", "Casa", "--target", "100"]).unwrap();
    run(&conn, &settings, &["deposit", "Casa", "--amount", "10"]).unwrap();
    run(&conn, &settings, &["rm", "Casa"]).unwrap();

    assert_eq!(goal_count(&conn), 0);
    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM goal_ledger_entries", [], |r| r.get(0))
        .unwrap();
    assert_eq!(left, 0);
    assert!(goals::history_rows(&conn, &settings, "Casa", None).is_err());
}

#[test]
fn goals_are_scoped_to_the_actor() {
    let (conn, settings) = setup();
    run(&conn, &settings, &["add", "--name", "Casa", "--target", "100"]).unwrap();

    let mut other = settings.clone();
    other.actor_id = "someone-else".into();
    assert!(goals::goal_rows(&conn, &other).unwrap().is_empty());
    assert!(run(&conn, &other, &["deposit", "Casa", "--amount", "5"]).is_err());
    assert_eq!(goal_count(&conn), 1);
}

#[test]
fn duplicate_names_need_an_id() {
    let (conn, settings) = setup();
    run(&conn, &settings, &["add", "--name", "Casa", "--target", "100"]).unwrap();
    run(&conn, &settings, &["add", "--name", "Casa", "--target", "200"]).unwrap();
    let err = run(&conn, &settings, &["deposit", "Casa", "--amount", "5"]).unwrap_err();
    assert!(err.to_string().contains("use the goal id"));

    let id = goals::goal_rows(&conn, &settings).unwrap()[0].id.clone();
    run(&conn, &settings, &["deposit", &id, "--amount", "5"]).unwrap();
}

#[test]
fn display_follows_settings() {
    let (conn, _) = setup();
    config::set_setting(&conn, config::KEY_LOCALE, "en-US").unwrap();
    config::set_setting(&conn, config::KEY_CURRENCY, "usd").unwrap();
    let settings = Settings::load(&conn).unwrap();
    run(&conn, &settings, &["add", "--name", "Car", "--target", "12000"]).unwrap();
    run(&conn, &settings, &["deposit", "Car", "--amount", "1234.5"]).unwrap();
    let rows = goals::goal_rows(&conn, &settings).unwrap();
    assert_eq!(rows[0].saved, "$1,234.50");
    assert_eq!(rows[0].target, "$12,000.00");
    assert_eq!(rows[0].progress, 10);
}

#[test]
fn global_actor_flag_parses_after_subcommand() {
    let matches = cli::build_cli().get_matches_from([
        "finantree", "goal", "list", "--actor", "user-42",
    ]);
    assert_eq!(
        matches.get_one::<String>("actor").map(String::as_str),
        Some("user-42")
    );
}
