// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binding preservation across polls.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use super::thread_local::{Binding, Entered};

/// A [`Future`] wrapper that carries its own binding.
///
/// Many executors poll unrelated tasks one after another on the same thread, so the
/// thread's slot cannot simply be left set.  `Scoped` instead:
/// 1. swaps its binding into the thread's slot
/// 2. polls the inner future
/// 3. swaps the slot's (possibly rebound) value back into itself, restoring the caller's
///
/// Step 3 also runs if the inner poll panics.
pub(crate) struct Scoped<F> {
    slot: Binding,
    future: F,
}

impl<F> Scoped<F> {
    pub(crate) fn new(slot: Binding, future: F) -> Self {
        Self { slot, future }
    }
}

impl<F> Future for Scoped<F>
where
    F: Future + Unpin,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let _entered = Entered::new(&mut this.slot);
        Pin::new(&mut this.future).poll(cx)
    }
}
