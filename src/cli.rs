// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn goal_arg() -> Arg {
    Arg::new("goal")
        .required(true)
        .help("Goal id or exact goal name")
}

fn amount_arg() -> Arg {
    Arg::new("amount")
        .long("amount")
        .short('a')
        .required(true)
        .allow_hyphen_values(true)
        .help("Amount, e.g. 250.00 or 250,00")
}

pub fn build_cli() -> Command {
    Command::new("finantree")
        .version(crate_version!())
        .about("Finantree Garden: savings goals with a deposit/withdrawal ledger")
        .arg(
            Arg::new("actor")
                .long("actor")
                .global(true)
                .help("Act as this user id instead of the configured actor_id"),
        )
        .subcommand(Command::new("init").about("Create the database and default settings"))
        .subcommand(
            Command::new("goal")
                .about("Manage savings goals")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Create a goal")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("target")
                                .long("target")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Target amount"),
                        )
                        .arg(Arg::new("icon").long("icon").help("Short label or emoji")),
                )
                .subcommand(json_flags(Command::new("list").about("List goals")))
                .subcommand(
                    Command::new("show")
                        .about("Show a goal with its progress")
                        .arg(goal_arg()),
                )
                .subcommand(
                    Command::new("deposit")
                        .about("Put money into a goal")
                        .arg(goal_arg())
                        .arg(amount_arg()),
                )
                .subcommand(
                    Command::new("withdraw")
                        .about("Take money out of a goal")
                        .arg(goal_arg())
                        .arg(amount_arg()),
                )
                .subcommand(json_flags(
                    Command::new("history")
                        .about("List ledger entries, newest first")
                        .arg(goal_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("chart")
                        .about("Daily running balance since the goal was created")
                        .arg(goal_arg())
                        .arg(
                            Arg::new("today")
                                .long("today")
                                .help("Evaluation date YYYY-MM-DD (defaults to today)"),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a goal and its ledger")
                        .arg(goal_arg()),
                )
                .subcommand(
                    Command::new("reconcile")
                        .about("Recompute a goal's balance from its ledger")
                        .arg(goal_arg()),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Read and write settings")
                .subcommand_required(true)
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true).allow_hyphen_values(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check goal balances against their ledgers"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        build_cli().debug_assert();
    }
}
