/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command};
use tokio::io::{AsyncWriteExt, Stdout};

use ftpcp_client::FtpLineDataReceiver;

use crate::ProcArgs;
use crate::remote::{FtpUrl, open_session};

pub(super) const COMMAND: &str = "ls";

const COMMAND_ARG_URL: &str = "url";

pub(super) fn command() -> Command {
    Command::new(COMMAND).about("List a remote path").arg(
        Arg::new(COMMAND_ARG_URL)
            .value_name("URL")
            .num_args(1)
            .required(true),
    )
}

pub(super) async fn run(proc_args: &ProcArgs, args: &ArgMatches) -> anyhow::Result<()> {
    let url = FtpUrl::parse(args.get_one::<String>(COMMAND_ARG_URL).unwrap())?;

    let mut client = open_session(&url, proc_args).await?;

    let mut line_receiver = StdoutLineReceiver::default();
    let data_stream = client.list_directory_start(&url.path).await?;
    client
        .list_directory_receive(data_stream, &mut line_receiver)
        .await?;

    client.quit_and_close().await?;
    Ok(())
}

pub(super) struct StdoutLineReceiver {
    io: Stdout,
    has_error: bool,
}

impl Default for StdoutLineReceiver {
    fn default() -> Self {
        StdoutLineReceiver {
            io: tokio::io::stdout(),
            has_error: false,
        }
    }
}

#[async_trait]
impl FtpLineDataReceiver for StdoutLineReceiver {
    async fn recv_line(&mut self, line: &str) {
        self.has_error = self.io.write_all(line.as_bytes()).await.is_err();
    }

    #[inline]
    fn should_return_early(&self) -> bool {
        self.has_error
    }
}
