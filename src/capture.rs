// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Capture targets
//!
//! A [`CaptureConsole`] is where routed output lands while it is active.  It can record
//! output into a buffer, pass it on to a base console, or both:
//!
//! | `record_output` | `real_console_output` | effect                                  |
//! |-----------------|-----------------------|-----------------------------------------|
//! | true (default)  | false (default)       | silent capture                          |
//! | true            | true                  | capture and still show on the terminal  |
//! | false           | true                  | plain passthrough, with `fresh_line`    |
//! | false           | false                 | discard                                 |
//!
//! Targets are always handled through an `Arc`.  Registries only hold them weakly, and one
//! target may be active in several tasks at once; writes from all of them land in the one
//! buffer in the order they were made.
//!
//! ```rust
//! use logscope::{CaptureConsole, CaptureOptions};
//!
//! let capture = CaptureConsole::new(CaptureOptions::default());
//! capture.hook_sync_context(|| {
//!     logscope::info!("step {}", 1).unwrap();
//!     logscope::warn!("step {}", 2).unwrap();
//! });
//! assert_eq!(capture.outputs(), "step 1\nstep 2\n");
//! ```

use crate::arg::Arg;
use crate::console::{Console, TtyInfo};
use crate::error::{BoxError, ConsoleError};
use crate::fresh_line::{LastLine, LineTracker};
use crate::method::{Method, Stream};
use crate::record::Record;
use std::error::Error;
use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Receives lone error arguments passed to [`Console::error`].
pub type ErrorHandler =
    Arc<dyn Fn(&(dyn Error + 'static)) -> Result<(), BoxError> + Send + Sync + 'static>;

/**
Construction options for [`CaptureConsole`].

```rust
use logscope::{CaptureConsole, CaptureOptions, MemoryConsole};
use std::sync::Arc;

let terminal = Arc::new(MemoryConsole::ansi(80));
let capture = CaptureConsole::new(
    CaptureOptions::new()
        .real_console_output(true)
        .base_console(terminal.clone()),
);
assert!(capture.supports_ansi());
```
*/
#[derive(Clone)]
pub struct CaptureOptions {
    real_console_output: bool,
    record_output: bool,
    base_console: Option<Arc<dyn Console>>,
    error_handler: Option<ErrorHandler>,
    supports_ansi: Option<bool>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            real_console_output: false,
            record_output: true,
            base_console: None,
            error_handler: None,
            supports_ansi: None,
        }
    }
}

impl Debug for CaptureOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureOptions")
            .field("real_console_output", &self.real_console_output)
            .field("record_output", &self.record_output)
            .field("base_console", &self.base_console)
            .field("error_handler", &self.error_handler.is_some())
            .field("supports_ansi", &self.supports_ansi)
            .finish()
    }
}

impl CaptureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also forward output to the base console.  Default `false`.
    pub fn real_console_output(mut self, enabled: bool) -> Self {
        self.real_console_output = enabled;
        self
    }

    /// Append output to the target's buffer.  Default `true`.
    pub fn record_output(mut self, enabled: bool) -> Self {
        self.record_output = enabled;
        self
    }

    /// The console to forward to and read terminal metadata from.
    /// Defaults to the original console behind the router.
    pub fn base_console(mut self, console: Arc<dyn Console>) -> Self {
        self.base_console = Some(console);
        self
    }

    /// Handles `error` calls whose only argument is an error.
    pub fn error_handler<H>(mut self, handler: H) -> Self
    where
        H: Fn(&(dyn Error + 'static)) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Overrides ANSI support.  Defaults to the base console's colour support.
    pub fn supports_ansi(mut self, supported: bool) -> Self {
        self.supports_ansi = Some(supported);
        self
    }
}

#[derive(Debug)]
struct CaptureState {
    outputs: String,
    lines: LineTracker,
}

/// A capture target.  See the [module docs](self).
pub struct CaptureConsole {
    real_console_output: bool,
    record_output: bool,
    base: Arc<dyn Console>,
    error_handler: Option<ErrorHandler>,
    supports_ansi: bool,
    state: Mutex<CaptureState>,
}

impl Debug for CaptureConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureConsole")
            .field("real_console_output", &self.real_console_output)
            .field("record_output", &self.record_output)
            .field("base", &self.base)
            .field("error_handler", &self.error_handler.is_some())
            .field("supports_ansi", &self.supports_ansi)
            .field("state", &self.state)
            .finish()
    }
}

impl CaptureConsole {
    pub fn new(options: CaptureOptions) -> Arc<Self> {
        let base = options
            .base_console
            .unwrap_or_else(|| crate::global::console().original());
        let supports_ansi = options
            .supports_ansi
            .unwrap_or_else(|| base.tty().color_support);
        Arc::new(Self {
            real_console_output: options.real_console_output,
            record_output: options.record_output,
            base,
            error_handler: options.error_handler,
            supports_ansi,
            state: Mutex::new(CaptureState {
                outputs: String::new(),
                lines: LineTracker::new(),
            }),
        })
    }

    /// Everything recorded since construction or the last clear.
    pub fn outputs(&self) -> String {
        self.state.lock().unwrap().outputs.clone()
    }

    /**
    Returns the recorded output and empties the buffer.

    This is a draining [`clear`](Console::clear): only the buffer is emptied, and the base
    console is not cleared.
    */
    pub fn take_outputs(&self) -> String {
        std::mem::take(&mut self.state.lock().unwrap().outputs)
    }

    /// The last line written under `id` by [`Console::fresh_line`].
    pub fn last_line(&self, id: &str) -> Option<LastLine> {
        self.state.lock().unwrap().lines.last_line(id).cloned()
    }

    pub fn base_console(&self) -> &Arc<dyn Console> {
        &self.base
    }

    pub fn supports_ansi(&self) -> bool {
        self.supports_ansi
    }

    pub fn records_output(&self) -> bool {
        self.record_output
    }

    pub fn forwards_output(&self) -> bool {
        self.real_console_output
    }

    /**
    Runs `future` with this target active.

    The target stays active across every suspension of `future` and is released when the
    returned future completes or is dropped.  Nested hooks shadow this one.

    Work that `future` hands to an executor as a separate task, such as `tokio::spawn`,
    is polled outside this future and does not see the target.  Wrap it in
    [`fork`](crate::context::fork) at the spawn site to carry the target along:

    ```rust,ignore
    target.hook_async_context(async {
        tokio::spawn(logscope::context::fork(async {
            logscope::log!("captured by target").unwrap();
        }))
        .await
        .unwrap();
    })
    ```
    */
    pub fn hook_async_context<'a, F>(
        self: &Arc<Self>,
        future: F,
    ) -> impl Future<Output = F::Output> + Send + use<'a, F>
    where
        F: Future + Send + 'a,
        F::Output: Send + 'a,
    {
        crate::global::console().run(self, future)
    }

    /// Calls `f` with this target active.
    pub fn hook_sync_context<R>(self: &Arc<Self>, f: impl FnOnce() -> R) -> R {
        crate::global::console().run_sync(self, f)
    }

    /**
    Makes this target active for the rest of the current logical task.

    Inside a hook or forked branch, that is until the hook or branch finishes.  Outside of
    any, it is the calling thread until something else is activated.
    */
    pub fn hook_remainder(self: &Arc<Self>) {
        crate::global::console().activate_for_remainder(self);
    }

    fn record(&self, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.lines.interrupt();
        if self.record_output {
            state.outputs.push_str(text);
        }
    }
}

impl Console for CaptureConsole {
    fn write_raw(&self, stream: Stream, text: &str) -> Result<(), ConsoleError> {
        self.record(text);
        if self.real_console_output {
            self.base.write_raw(stream, text)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        self.state.lock().unwrap().outputs.clear();
        if self.real_console_output {
            self.base.clear()?;
        }
        Ok(())
    }

    fn write_line(&self, method: Method, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        if method == Method::Error {
            if let (Some(handler), [only]) = (&self.error_handler, args) {
                if let Some(error) = only.as_error() {
                    return handler(error).map_err(ConsoleError::Handler);
                }
            }
        }
        self.record(&Record::from_args(method, args).line());
        if self.real_console_output {
            self.base.write_line(method, args)?;
        }
        Ok(())
    }

    fn fresh_line(&self, id: &str, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        let text = Record::from_args(Method::Log, args).to_string();
        let columns = self.base.tty().columns;
        let rendered = {
            let mut state = self.state.lock().unwrap();
            let rendered = state.lines.render(id, text, self.supports_ansi, columns);
            if self.record_output {
                state.outputs.push_str(&rendered);
            }
            rendered
        };
        if self.real_console_output {
            self.base.write_raw(Stream::Stdout, &rendered)?;
        }
        Ok(())
    }

    fn tty(&self) -> TtyInfo {
        self.base.tty()
    }
}
