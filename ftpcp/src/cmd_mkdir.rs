/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use clap::{Arg, ArgMatches, Command};

use crate::ProcArgs;
use crate::remote::{FtpUrl, open_session};

pub(super) const COMMAND: &str = "mkdir";

const COMMAND_ARG_URL: &str = "url";

pub(super) fn command() -> Command {
    Command::new(COMMAND).about("Create a remote directory").arg(
        Arg::new(COMMAND_ARG_URL)
            .value_name("URL")
            .num_args(1)
            .required(true),
    )
}

pub(super) async fn run(proc_args: &ProcArgs, args: &ArgMatches) -> anyhow::Result<()> {
    let url = FtpUrl::parse(args.get_one::<String>(COMMAND_ARG_URL).unwrap())?;

    let mut client = open_session(&url, proc_args).await?;
    client.make_dir(&url.path).await?;
    client.quit_and_close().await?;
    Ok(())
}
