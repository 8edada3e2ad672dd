// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forwards records from the [`log`] crate into the console router.
//!
//! Libraries that log through `log::info!` and friends then honour the same capture
//! targets as code that calls the facade directly.

use crate::console::Console;
use crate::method::Method;
use crate::Arg;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// A [`log::Log`] implementation that writes through [`console()`](crate::console).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBridge;

static BRIDGE: LogBridge = LogBridge;

impl LogBridge {
    /// Maps a `log` level onto a console method.
    pub const fn method_for(level: Level) -> Method {
        match level {
            Level::Error => Method::Error,
            Level::Warn => Method::Warn,
            Level::Info => Method::Info,
            Level::Debug => Method::Debug,
            Level::Trace => Method::Trace,
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    /// `log::Log` has no way to report failure, so write errors are dropped here.
    fn log(&self, record: &Record) {
        let method = Self::method_for(record.level());
        let _ = crate::console().write_line(method, &[Arg::Fmt(*record.args())]);
    }

    fn flush(&self) {}
}

/**
Installs [`LogBridge`] as the `log` crate's logger and enables every level.

Fails if another logger was already set.

```
logscope::install_log_bridge().unwrap();
log::info!("routed through logscope");
```
*/
pub fn install_log_bridge() -> Result<(), log::SetLoggerError> {
    log::set_logger(&BRIDGE)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
