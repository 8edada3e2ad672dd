// SPDX-License-Identifier: MIT OR Apache-2.0

//! The registry strategy interface.

use crate::capture::CaptureConsole;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A type-erased unit of work handed to a registry.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/**
Tracks which capture target is active in the current logical task.

The built-in [`ThreadLocalRegistry`](super::ThreadLocalRegistry) is enough for most
programs.  A host that already propagates its own per-task state (a tracer, a runtime
with task-locals) can implement this trait on top of that state, so the two never
disagree about which task is running, and install it with
[`replace_implementation`](crate::replace_implementation).

Registries hold targets weakly.  A target that has been dropped is simply not found.

Work is handed over type-erased.  The typed entry points are
[`CaptureConsole::hook_async_context`], [`CaptureConsole::hook_sync_context`],
[`CaptureConsole::hook_remainder`] and [`fork`](super::fork).
*/
pub trait ContextRegistry: Debug + Send + Sync {
    /// Returns the target active for the code running right now.
    fn lookup(&self) -> Option<Arc<CaptureConsole>>;

    /**
    Returns a future that runs `scope` with `target` active.

    The binding must be visible in every step of `scope` and released when the returned
    future completes or is dropped.
    */
    fn run<'a>(&self, target: &Arc<CaptureConsole>, scope: BoxFuture<'a>) -> BoxFuture<'a>;

    /// Calls `scope` once with `target` active, releasing the binding on every exit path.
    fn run_sync(&self, target: &Arc<CaptureConsole>, scope: &mut dyn FnMut());

    /**
    Makes `target` active for the rest of the current logical task.

    The previous binding is replaced, not nested.
    */
    fn activate_for_remainder(&self, target: &Arc<CaptureConsole>);

    /**
    Returns a future that runs `branch` with a private copy of the current binding.

    The default returns `branch` unchanged, for registries whose substrate already
    isolates concurrent branches.
    */
    fn fork<'a>(&self, branch: BoxFuture<'a>) -> BoxFuture<'a> {
        branch
    }
}
