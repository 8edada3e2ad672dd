// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-task context propagation.
//!
//! This module decides which [`CaptureConsole`](crate::CaptureConsole), if any, is active
//! for the code that is currently running.  The router asks it on every facade call.
//!
//! # Overview
//!
//! - [`ContextRegistry`]: the strategy interface (`lookup`, `run`, `run_sync`,
//!   `activate_for_remainder`, `fork`).  It can be replaced process-wide with
//!   [`replace_implementation`](crate::replace_implementation).
//! - [`ThreadLocalRegistry`]: the built-in implementation.
//! - [`fork`]: gives a concurrently-running branch its own copy of the current binding.
//!
//! # How the built-in registry propagates
//!
//! Each thread has a current-binding slot.  A hooked future carries its own slot and
//! swaps it into the thread's slot around every poll, then swaps it back out.  So:
//!
//! - the binding is visible in every step of the future, including anything it awaits,
//!   no matter which thread polls it
//! - between polls the binding is not visible anywhere
//! - rebinding inside the future (with `hook_remainder`) lands in the future's own slot,
//!   so it lasts for the rest of that future and never reaches the caller
//! - dropping the future, finished or not, drops its binding
//!
//! ```rust
//! use logscope::{CaptureConsole, CaptureOptions, Console};
//!
//! # fn main() {
//! let capture = CaptureConsole::new(CaptureOptions::default());
//! let result = test_executors::spin_on(capture.hook_async_context(async {
//!     logscope::log!("captured").unwrap();
//!     7
//! }));
//! assert_eq!(result, 7);
//! assert_eq!(capture.outputs(), "captured\n");
//! # }
//! ```
//!
//! # Siblings
//!
//! Combinators such as `join!` poll several branches inside one task.  Branches that only
//! read the binding need nothing special.  A branch that rebinds with `hook_remainder`
//! must be wrapped in [`fork`], or its rebinding is the parent's too.
//!
//! # Spawned tasks
//!
//! A task handed to an executor (`tokio::spawn`, a thread pool, ...) is polled by the
//! executor, not by the hooked future, so it starts with no binding and its output goes
//! to the original console.  Wrap the spawned future in [`fork`] to give it the binding
//! current at the spawn site:
//!
//! ```rust,ignore
//! tokio::spawn(logscope::context::fork(async {
//!     logscope::log!("lands in the spawning task's target").unwrap();
//! }));
//! ```

mod registry;
mod scoped;
mod thread_local;

#[cfg(test)]
mod tests;

pub use registry::{BoxFuture, ContextRegistry};
pub use thread_local::ThreadLocalRegistry;

use std::future::Future;

/**
Runs `branch` with its own copy of the current binding.

The binding is copied now, when `fork` is called.  Whatever the branch later activates
stays inside the branch.

```rust
use logscope::{CaptureConsole, CaptureOptions, Console};
use logscope::context::fork;

# fn main() {
let outer = CaptureConsole::new(CaptureOptions::default());
let inner = CaptureConsole::new(CaptureOptions::default());
outer.hook_sync_context(|| {
    let branch = fork({
        let inner = inner.clone();
        async move {
            inner.hook_remainder();
            logscope::log!("branch").unwrap();
        }
    });
    test_executors::spin_on(branch);
    logscope::log!("parent").unwrap();
});
assert_eq!(inner.outputs(), "branch\n");
assert_eq!(outer.outputs(), "parent\n");
# }
```
*/
pub fn fork<'a, F>(branch: F) -> impl Future<Output = F::Output> + Send + use<'a, F>
where
    F: Future + Send + 'a,
    F::Output: Send + 'a,
{
    crate::global::console().fork(branch)
}
