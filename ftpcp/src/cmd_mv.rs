/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use clap::{Arg, ArgMatches, Command};

use crate::ProcArgs;
use crate::copy;
use crate::remote::TransferPeer;

pub(super) const COMMAND: &str = "mv";

const COMMAND_ARG_SOURCE: &str = "source";
const COMMAND_ARG_DESTINATION: &str = "destination";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Move a file between local storage and a remote server")
        .arg(
            Arg::new(COMMAND_ARG_SOURCE)
                .value_name("SOURCE")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new(COMMAND_ARG_DESTINATION)
                .value_name("DESTINATION")
                .num_args(1)
                .required(true),
        )
}

pub(super) async fn run(proc_args: &ProcArgs, args: &ArgMatches) -> anyhow::Result<()> {
    let source = TransferPeer::parse(args.get_one::<String>(COMMAND_ARG_SOURCE).unwrap())?;
    let destination =
        TransferPeer::parse(args.get_one::<String>(COMMAND_ARG_DESTINATION).unwrap())?;

    copy::move_file(&source, &destination, proc_args).await?;
    Ok(())
}
