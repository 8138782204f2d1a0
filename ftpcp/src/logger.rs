/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub(crate) struct SyncLogger {
    max_level: LevelFilter,
}

impl SyncLogger {
    pub(crate) fn new(verbose_level: u8) -> Self {
        let max_level = match verbose_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        SyncLogger { max_level }
    }

    pub(crate) fn into_global_logger(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.max_level);
        log::set_boxed_logger(Box::new(self))
    }
}

impl Log for SyncLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.level() <= Level::Warn {
            eprintln!("{}: {}", record.level(), record.args());
        } else {
            // raw protocol lines come pre-tagged with their direction
            eprintln!("{}", record.args());
        }
    }

    fn flush(&self) {}
}
