// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("billfold")
        .about("Personal finance ledger with debts, shared IOUs, and an outbound cloud mirror")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database and schema"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rename")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("card")
                .about("Manage credit cards")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(Arg::new("available").long("available").required(true)),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("to").long("to"))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(Arg::new("available").long("available").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("kind").long("kind").required(true))
                        .arg(Arg::new("icon").long("icon")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("tag")
                .about("Manage tags")
                .subcommand(Command::new("add").arg(Arg::new("label").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("label").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("card").long("card"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("tag").long("tag").action(ArgAction::Append)),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("card").long("card"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("card").long("card"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("tag").long("tag"))
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(clap::value_parser!(usize))
                                .default_value("0"),
                        )
                        .arg(
                            Arg::new("page-size")
                                .long("page-size")
                                .value_parser(clap::value_parser!(usize))
                                .default_value("20"),
                        ),
                )),
        )
        .subcommand(
            Command::new("person")
                .about("Manage people who owe or are owed money")
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("debt")
                .about("Track debts and settlements")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("person").long("person").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("desc").long("desc")),
                )
                .subcommand(Command::new("list").arg(Arg::new("person").long("person")))
                .subcommand(
                    Command::new("pay")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(
                            Arg::new("desc")
                                .long("desc")
                                .default_value("Debt payment"),
                        ),
                )
                .subcommand(Command::new("payments").arg(Arg::new("id").required(true)))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("reminder")
                .about("Manage reminders")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("desc").long("desc")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("done").arg(Arg::new("id").required(true)))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("report")
                .about("Rollups computed from the ledger")
                .subcommand(json_flags(Command::new("rollup")))
                .subcommand(json_flags(
                    Command::new("by-category")
                        .arg(Arg::new("month").long("month").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("summary").arg(Arg::new("since").long("since")),
                ))
                .subcommand(Command::new("months")),
        )
        .subcommand(
            Command::new("sync")
                .about("Mirror dirty rows to the remote document store")
                .subcommand(
                    Command::new("push")
                        .arg(Arg::new("remote").long("remote").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check cached balances against the ledger"))
}
