//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# logscope

logscope is a console facade for Rust whose output follows the *context* it was produced in.

# The problem

A program that runs many jobs at once, such as a build tool, a test runner or a task
scheduler, wants each job's output to land somewhere of its own: a buffer that is
shown when the job fails, a progress line that keeps being rewritten, or simply the
terminal.  The code inside each job should not have to know.  It just calls `log!`.

Threading an output handle through every function is tedious, and a single global
console cannot tell jobs apart, especially when they are futures interleaved on one
thread.

# The design

All output goes through one process-wide [`Router`], returned by [`console()`].  The
router implements the [`Console`] facade, and for each call asks a [`ContextRegistry`]
which [`CaptureConsole`] is *active* in the current execution context:

* If one is, the call goes to it.  A capture target records what it was given and/or
  forwards it to its base console.
* If none is, the call goes straight to the original console, usually a
  [`TerminalConsole`], so the router is indistinguishable from not having one.

A target becomes active by *hooking* a scope:

```rust
use logscope::{CaptureConsole, CaptureOptions, MemoryConsole};
use std::sync::Arc;

let job = CaptureConsole::new(
    CaptureOptions::new().base_console(Arc::new(MemoryConsole::new())),
);
job.hook_sync_context(|| {
    logscope::log!("compiling").unwrap();
});
assert_eq!(job.outputs(), "compiling\n");
```

Async scopes are hooked with [`CaptureConsole::hook_async_context`]. The binding
survives every suspension of the future, and two hooked futures that interleave on the
same thread never see each other's target.  Use [`context::fork`] to give concurrently
joined branches their own copy of the current binding.

# Fresh lines

[`Console::fresh_line`] writes a line that is replaced by the next fresh line with the
same id, when the target supports ANSI escapes and nothing else was written in between.
This is how progress indicators are drawn.

```rust
for pct in [0, 50, 100] {
    logscope::fresh_line!("fetch", "fetching... {pct}%").unwrap();
}
```

# Customizing

* [`install`] a different original console before first use, for example a
  [`MemoryConsole`] in tests.
* [`replace_implementation`] the context registry if your executor has its own notion
  of task-local storage.
* Store process-wide settings on the router with [`Router::set_property`].
* Route the `log` crate through the router with [`install_log_bridge`] (feature `log`,
  on by default).

# Features

* `log`: the [`LogBridge`] adapter for the `log` crate.
* `logscope_internal`: diagnostics about the crate itself, written to the original console.
*/

#[macro_use]
mod macros;

mod arg;
mod capture;
mod console;
pub mod context;
mod error;
mod fresh_line;
mod global;
#[cfg(feature = "log")]
mod log_bridge;
mod memory_console;
mod method;
mod record;
mod router;
mod terminal_console;

pub use arg::Arg;
pub use capture::{CaptureConsole, CaptureOptions, ErrorHandler};
pub use console::{Console, ResizeListener, TtyInfo};
pub use context::{BoxFuture, ContextRegistry, ThreadLocalRegistry};
pub use error::{BoxError, ConsoleError};
pub use fresh_line::{LastLine, rendered_rows, visible_width};
pub use global::{console, install, replace_implementation, reset};
#[cfg(feature = "log")]
pub use log_bridge::{LogBridge, install_log_bridge};
pub use memory_console::MemoryConsole;
pub use method::{Method, Stream};
pub use record::Record;
pub use router::{Properties, Router};
pub use terminal_console::TerminalConsole;

extern crate self as logscope;
