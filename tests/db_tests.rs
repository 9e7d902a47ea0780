// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finantree::db;
use finantree::ledger::LedgerService;
use finantree::models::NewGoal;
use finantree::money::Money;
use finantree::storage::SqliteGoalStore;

#[test]
fn ledger_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garden.sqlite");

    let goal_id = {
        let conn = db::open_at(&path).unwrap();
        let svc = LedgerService::new(SqliteGoalStore::new(&conn));
        let goal = svc
            .create_goal(
                "user-1",
                NewGoal {
                    name: "Viagem".into(),
                    target_amount: Money::from_minor_units(100_000),
                    icon: None,
                },
            )
            .unwrap();
        svc.deposit(&goal.id, "user-1", Money::from_minor_units(25_000))
            .unwrap();
        goal.id
    };

    let conn = db::open_at(&path).unwrap();
    let svc = LedgerService::new(SqliteGoalStore::new(&conn));
    let goal = svc.verify("user-1", &goal_id).unwrap();
    assert_eq!(goal.current_amount(), Money::from_minor_units(25_000));
    assert_eq!(svc.entries("user-1", &goal_id).unwrap().len(), 1);
}

#[test]
fn schema_rejects_non_positive_amounts() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO goals(id, owner_id, name, target_amount, created_at)
         VALUES ('g1', 'u1', 'Casa', 1000, '2025-01-01 00:00:00+00:00')",
        [],
    )
    .unwrap();
    let res = conn.execute(
        "INSERT INTO goal_ledger_entries(id, goal_id, actor_id, amount, kind, created_at)
         VALUES ('e1', 'g1', 'u1', 0, 'deposit', '2025-01-01 00:00:00+00:00')",
        [],
    );
    assert!(res.is_err());
}
