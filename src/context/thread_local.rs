// SPDX-License-Identifier: MIT OR Apache-2.0

//! The built-in registry.

use std::cell::RefCell;
use std::sync::{Arc, Weak};

use super::registry::{BoxFuture, ContextRegistry};
use super::scoped::Scoped;
use crate::capture::CaptureConsole;

/// A weak reference to the active target, if any.
pub(crate) type Binding = Option<Weak<CaptureConsole>>;

thread_local! {
    static CURRENT: RefCell<Binding> = const { RefCell::new(None) };
}

fn current_binding() -> Binding {
    CURRENT.with(|c| c.borrow().clone())
}

/**
Swaps a binding into the thread's slot for as long as it lives.

While entered, `slot` holds the binding that was current before.  On drop the two are
swapped back, so `slot` ends up holding whatever the entered code left current, rebinds
included.
*/
pub(crate) struct Entered<'a> {
    slot: &'a mut Binding,
}

impl<'a> Entered<'a> {
    pub(crate) fn new(slot: &'a mut Binding) -> Self {
        let ours = slot.take();
        *slot = CURRENT.with(|c| c.replace(ours));
        Self { slot }
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        let outer = self.slot.take();
        *self.slot = CURRENT.with(|c| c.replace(outer));
    }
}

/**
The built-in [`ContextRegistry`].

Keeps the current binding in a thread-local slot and wraps hooked futures so that they
bring their binding with them on every poll.  See the [module docs](super) for the
resulting semantics.

Outside of any hook, [`activate_for_remainder`](ContextRegistry::activate_for_remainder)
binds the calling thread until something replaces it or [`reset`](crate::reset) runs.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ThreadLocalRegistry;

impl ThreadLocalRegistry {
    pub const fn new() -> Self {
        ThreadLocalRegistry
    }

    /// Unbinds the calling thread.
    pub fn clear_current(&self) {
        CURRENT.with(|c| c.borrow_mut().take());
    }
}

impl ContextRegistry for ThreadLocalRegistry {
    fn lookup(&self) -> Option<Arc<CaptureConsole>> {
        CURRENT.with(|c| c.borrow().as_ref().and_then(Weak::upgrade))
    }

    fn run<'a>(&self, target: &Arc<CaptureConsole>, scope: BoxFuture<'a>) -> BoxFuture<'a> {
        Box::pin(Scoped::new(Some(Arc::downgrade(target)), scope))
    }

    fn run_sync(&self, target: &Arc<CaptureConsole>, scope: &mut dyn FnMut()) {
        let mut slot = Some(Arc::downgrade(target));
        let _entered = Entered::new(&mut slot);
        scope();
    }

    fn activate_for_remainder(&self, target: &Arc<CaptureConsole>) {
        CURRENT.with(|c| *c.borrow_mut() = Some(Arc::downgrade(target)));
    }

    fn fork<'a>(&self, branch: BoxFuture<'a>) -> BoxFuture<'a> {
        Box::pin(Scoped::new(current_binding(), branch))
    }
}
