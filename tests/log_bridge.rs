// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records from the `log` crate honour capture targets.

#![cfg(all(feature = "log", not(target_arch = "wasm32")))]

use logscope::{CaptureConsole, CaptureOptions, MemoryConsole, Stream};
use std::sync::Arc;

#[test]
fn log_records_follow_the_active_target() {
    let terminal = Arc::new(MemoryConsole::new());
    logscope::install(terminal.clone()).unwrap();
    logscope::install_log_bridge().unwrap();

    let target = CaptureConsole::new(CaptureOptions::new());
    target.hook_sync_context(|| {
        log::info!("step {}", 1);
        log::error!("step {}", 2);
    });
    log::warn!("outside");

    assert_eq!(target.outputs(), "step 1\nstep 2\n");
    assert_eq!(terminal.stream_output(Stream::Stderr), "outside\n");
    assert!(logscope::install_log_bridge().is_err());
}
