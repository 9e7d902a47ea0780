// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::config::Settings;
use crate::errors::LedgerError;
use crate::ledger::LedgerService;
use crate::models::{EntryKind, Goal, NewGoal};
use crate::optimistic::BalanceView;
use crate::projector::{calendar_day, funded_in_month, project_daily_balance};
use crate::storage::SqliteGoalStore;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table};

type Service<'a> = LedgerService<SqliteGoalStore<'a>>;

pub fn handle(conn: &Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let svc = LedgerService::new(SqliteGoalStore::new(conn));
    match m.subcommand() {
        Some(("add", sub)) => add(&svc, settings, sub)?,
        Some(("list", sub)) => list(&svc, settings, sub)?,
        Some(("show", sub)) => show(&svc, settings, sub)?,
        Some(("deposit", sub)) => post(&svc, settings, sub, EntryKind::Deposit)?,
        Some(("withdraw", sub)) => post(&svc, settings, sub, EntryKind::Withdrawal)?,
        Some(("history", sub)) => history(&svc, settings, sub)?,
        Some(("chart", sub)) => chart(&svc, settings, sub)?,
        Some(("rm", sub)) => remove(&svc, settings, sub)?,
        Some(("reconcile", sub)) => reconcile(&svc, settings, sub)?,
        _ => {}
    }
    Ok(())
}

/// Finds a goal of the acting user by id, falling back to an exact name match.
pub fn resolve_goal(svc: &Service<'_>, actor_id: &str, key: &str) -> Result<Goal> {
    let key = key.trim();
    match svc.goal(actor_id, key) {
        Ok(goal) => return Ok(goal),
        Err(LedgerError::GoalNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }
    let mut matches: Vec<Goal> = svc
        .goals(actor_id)?
        .into_iter()
        .filter(|g| g.name == key)
        .collect();
    match matches.len() {
        0 => Err(LedgerError::GoalNotFound(key.to_string()).into()),
        1 => Ok(matches.remove(0)),
        n => Err(anyhow::anyhow!(
            "{} goals are named '{}'; use the goal id instead",
            n,
            key
        )),
    }
}

fn add(svc: &Service<'_>, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().to_string();
    let target = parse_amount(sub.get_one::<String>("target").unwrap())?;
    let icon = sub.get_one::<String>("icon").cloned();
    let goal = svc.create_goal(
        &settings.actor_id,
        NewGoal {
            name,
            target_amount: target,
            icon,
        },
    )?;
    println!(
        "Created goal '{}' ({}) with target {}",
        goal.name,
        goal.id,
        fmt_money(goal.target_amount, settings)
    );
    Ok(())
}

#[derive(Serialize)]
pub struct GoalRow {
    pub id: String,
    pub badge: String,
    pub name: String,
    pub saved: String,
    pub target: String,
    pub progress: u8,
    pub funded_this_month: bool,
}

pub fn goal_rows(conn: &Connection, settings: &Settings) -> Result<Vec<GoalRow>> {
    let svc = LedgerService::new(SqliteGoalStore::new(conn));
    let today = calendar_day(Utc::now(), settings.utc_offset);
    let mut rows = Vec::new();
    for goal in svc.goals(&settings.actor_id)? {
        let entries = svc.entries(&settings.actor_id, &goal.id)?;
        rows.push(GoalRow {
            badge: goal.badge(),
            saved: fmt_money(goal.current_amount(), settings),
            target: fmt_money(goal.target_amount, settings),
            progress: goal.progress_percent(),
            funded_this_month: funded_in_month(
                &entries,
                today.year(),
                today.month(),
                settings.utc_offset,
            ),
            id: goal.id,
            name: goal.name,
        });
    }
    Ok(rows)
}

fn list(svc: &Service<'_>, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = goal_rows(svc.store().connection(), settings)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.badge.clone(),
                    r.name.clone(),
                    r.saved.clone(),
                    r.target.clone(),
                    format!("{}%", r.progress),
                    if r.funded_this_month { "yes" } else { "no" }.to_string(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["", "Goal", "Saved", "Target", "Progress", "Funded this month", "Id"],
                rows
            )
        );
        let summary = svc.summary(&settings.actor_id)?;
        println!(
            "{} goal(s), {} saved of {}",
            summary.goals,
            fmt_money(summary.saved, settings),
            fmt_money(summary.targeted, settings)
        );
    }
    Ok(())
}

fn show(svc: &Service<'_>, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let goal = resolve_goal(svc, &settings.actor_id, sub.get_one::<String>("goal").unwrap())?;
    let entries = svc.entries(&settings.actor_id, &goal.id)?;
    let today = calendar_day(Utc::now(), settings.utc_offset);
    let funded = funded_in_month(&entries, today.year(), today.month(), settings.utc_offset);
    let rows = vec![
        vec!["Goal".into(), format!("{} {}", goal.badge(), goal.name)],
        vec!["Id".into(), goal.id.clone()],
        vec!["Target".into(), fmt_money(goal.target_amount, settings)],
        vec!["Saved".into(), fmt_money(goal.current_amount(), settings)],
        vec!["Progress".into(), format!("{}%", goal.progress_percent())],
        vec!["Entries".into(), entries.len().to_string()],
        vec![
            "Funded this month".into(),
            if funded { "yes" } else { "no" }.into(),
        ],
        vec![
            "Created".into(),
            calendar_day(goal.created_at, settings.utc_offset).to_string(),
        ],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn post(
    svc: &Service<'_>,
    settings: &Settings,
    sub: &clap::ArgMatches,
    kind: EntryKind,
) -> Result<()> {
    let goal = resolve_goal(svc, &settings.actor_id, sub.get_one::<String>("goal").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;

    let mut view = BalanceView::new(goal.current_amount());
    view.begin(kind, amount)?;
    let outcome = match kind {
        EntryKind::Deposit => svc.deposit(&goal.id, &settings.actor_id, amount),
        EntryKind::Withdrawal => svc.withdraw(&goal.id, &settings.actor_id, amount),
    };
    let receipt = view.settle(outcome).with_context(|| {
        format!(
            "{} of {} on '{}' failed; balance is still {}",
            kind.as_str(),
            fmt_money(amount, settings),
            goal.name,
            fmt_money(view.displayed(), settings)
        )
    })?;
    let verb = match kind {
        EntryKind::Deposit => "Deposited",
        EntryKind::Withdrawal => "Withdrew",
    };
    println!(
        "{} {} {} '{}'; balance {} ({}%)",
        verb,
        fmt_money(amount, settings),
        if kind == EntryKind::Deposit { "into" } else { "from" },
        receipt.goal.name,
        fmt_money(view.displayed(), settings),
        receipt.goal.progress_percent()
    );
    Ok(())
}

#[derive(Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub date: String,
    pub kind: EntryKind,
    pub amount: String,
}

pub fn history_rows(
    conn: &Connection,
    settings: &Settings,
    goal_key: &str,
    limit: Option<usize>,
) -> Result<Vec<HistoryRow>> {
    let svc = LedgerService::new(SqliteGoalStore::new(conn));
    let goal = resolve_goal(&svc, &settings.actor_id, goal_key)?;
    let entries = svc.entries(&settings.actor_id, &goal.id)?;
    Ok(entries
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|e| HistoryRow {
            date: e
                .created_at
                .with_timezone(&settings.utc_offset)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            kind: e.kind,
            amount: fmt_money(e.signed_amount(), settings),
            id: e.id,
        })
        .collect())
}

fn history(svc: &Service<'_>, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = history_rows(
        svc.store().connection(),
        settings,
        sub.get_one::<String>("goal").unwrap(),
        sub.get_one::<usize>("limit").copied(),
    )?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.as_str().to_string(),
                    r.amount.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Kind", "Amount", "Id"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ChartRow {
    pub date: NaiveDate,
    pub balance: String,
}

pub fn chart_rows(
    conn: &Connection,
    settings: &Settings,
    goal_key: &str,
    today: Option<NaiveDate>,
) -> Result<Vec<ChartRow>> {
    let svc = LedgerService::new(SqliteGoalStore::new(conn));
    let goal = resolve_goal(&svc, &settings.actor_id, goal_key)?;
    let entries = svc.entries(&settings.actor_id, &goal.id)?;
    let today = today.unwrap_or_else(|| calendar_day(Utc::now(), settings.utc_offset));
    Ok(
        project_daily_balance(goal.created_at, &entries, today, settings.utc_offset)
            .into_iter()
            .map(|p| ChartRow {
                date: p.date,
                balance: p.balance.to_string(),
            })
            .collect(),
    )
}

fn chart(svc: &Service<'_>, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = match sub.get_one::<String>("today") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let goal_key = sub.get_one::<String>("goal").unwrap();
    let data = chart_rows(svc.store().connection(), settings, goal_key, today)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No deposits or withdrawals yet; nothing to chart");
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|r| vec![r.date.format("%d/%m/%Y").to_string(), r.balance.clone()])
        .collect();
    let balance_header = format!("Balance ({})", settings.currency.code);
    println!(
        "{}",
        pretty_table(&["Day", balance_header.as_str()], rows)
    );
    Ok(())
}

fn remove(svc: &Service<'_>, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let goal = resolve_goal(svc, &settings.actor_id, sub.get_one::<String>("goal").unwrap())?;
    let removed = svc.delete_goal(&settings.actor_id, &goal.id)?;
    println!("Removed goal '{}' and {} ledger entries", goal.name, removed);
    Ok(())
}

fn reconcile(svc: &Service<'_>, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let goal = resolve_goal(svc, &settings.actor_id, sub.get_one::<String>("goal").unwrap())?;
    let before = goal.current_amount();
    let (goal, changed) = svc.reconcile(&settings.actor_id, &goal.id)?;
    if changed {
        println!(
            "Balance of '{}' corrected from {} to {}",
            goal.name,
            fmt_money(before, settings),
            fmt_money(goal.current_amount(), settings)
        );
    } else {
        println!("Balance of '{}' already matches its ledger", goal.name);
    }
    Ok(())
}
