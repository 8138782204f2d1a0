/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use log::Level;

pub const FTP_DEBUG_LOG_LEVEL: Level = Level::Debug;
pub const FTP_DEBUG_LOG_TARGET: &str = "ftp-raw";

#[inline]
pub(crate) fn log_cmd(cmd: &str) {
    log::log!(
        target: FTP_DEBUG_LOG_TARGET,
        FTP_DEBUG_LOG_LEVEL,
        "> {}",
        cmd
    );
}

#[inline]
pub(crate) fn log_rsp(rsp: &str) {
    log::log!(
        target: FTP_DEBUG_LOG_TARGET,
        FTP_DEBUG_LOG_LEVEL,
        "< {}",
        rsp
    );
}
