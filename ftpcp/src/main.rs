/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::io;
use std::net::IpAddr;

use anyhow::anyhow;
use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

mod logger;

mod connection;
mod copy;
mod remote;

mod cmd_cp;
mod cmd_ls;
mod cmd_mkdir;
mod cmd_mv;
mod cmd_rm;
mod cmd_rmdir;

const GLOBAL_ARG_COMPLETION: &str = "completion";
const GLOBAL_ARG_SOURCE_IP: &str = "source-ip";
const GLOBAL_ARG_VERBOSE: &str = "verbose";

pub(crate) struct ProcArgs {
    pub(crate) bind_ip: Option<IpAddr>,
}

fn build_cli_args() -> Command {
    Command::new("ftpcp")
        .arg(
            Arg::new(GLOBAL_ARG_COMPLETION)
                .num_args(1)
                .value_name("SHELL")
                .long("completion")
                .value_parser(value_parser!(Shell))
                .exclusive(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_SOURCE_IP)
                .help("source ip address")
                .num_args(1)
                .value_name("IP ADDRESS")
                .value_parser(value_parser!(IpAddr))
                .long("source")
                .short('s')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_VERBOSE)
                .help("show verbose message")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .global(true),
        )
        .subcommand(cmd_ls::command())
        .subcommand(cmd_mkdir::command())
        .subcommand(cmd_rmdir::command())
        .subcommand(cmd_rm::command())
        .subcommand(cmd_cp::command())
        .subcommand(cmd_mv::command())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = build_cli_args().get_matches();

    if let Some(target) = args.get_one::<Shell>(GLOBAL_ARG_COMPLETION) {
        let mut app = build_cli_args();
        let bin_name = app.get_name().to_string();
        clap_complete::generate(*target, &mut app, bin_name, &mut io::stdout());
        return Ok(());
    }

    let verbose_level = args
        .get_one::<u8>(GLOBAL_ARG_VERBOSE)
        .copied()
        .unwrap_or_default();
    let logger = logger::SyncLogger::new(verbose_level);
    logger.into_global_logger().unwrap();

    let proc_args = ProcArgs {
        bind_ip: args.get_one::<IpAddr>(GLOBAL_ARG_SOURCE_IP).copied(),
    };

    if let Some((subcommand, args)) = args.subcommand() {
        match subcommand {
            cmd_ls::COMMAND => cmd_ls::run(&proc_args, args).await,
            cmd_mkdir::COMMAND => cmd_mkdir::run(&proc_args, args).await,
            cmd_rmdir::COMMAND => cmd_rmdir::run(&proc_args, args).await,
            cmd_rm::COMMAND => cmd_rm::run(&proc_args, args).await,
            cmd_cp::COMMAND => cmd_cp::run(&proc_args, args).await,
            cmd_mv::COMMAND => cmd_mv::run(&proc_args, args).await,
            cmd => Err(anyhow!("invalid subcommand {cmd}")),
        }
    } else {
        Err(anyhow!("no subcommand found"))
    }
}
