// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the context module.

use super::{ContextRegistry, ThreadLocalRegistry, fork};
use crate::{CaptureConsole, CaptureOptions, MemoryConsole};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll, Waker};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;
#[cfg(target_arch = "wasm32")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn capture() -> Arc<CaptureConsole> {
    CaptureConsole::new(CaptureOptions::new().base_console(Arc::new(MemoryConsole::new())))
}

fn is_active(target: &Arc<CaptureConsole>) -> bool {
    ThreadLocalRegistry
        .lookup()
        .is_some_and(|active| Arc::ptr_eq(&active, target))
}

/// Pending once, then ready.
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();
    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

fn yield_now() -> YieldNow {
    YieldNow(false)
}

/// Polls two futures alternately inside one task, the way `join!` does.
struct Join<A: Future, B: Future> {
    a: Pin<Box<A>>,
    b: Pin<Box<B>>,
    a_out: Option<A::Output>,
    b_out: Option<B::Output>,
}

fn join<A: Future, B: Future>(a: A, b: B) -> Join<A, B> {
    Join {
        a: Box::pin(a),
        b: Box::pin(b),
        a_out: None,
        b_out: None,
    }
}

impl<A: Future, B: Future> Future for Join<A, B>
where
    A::Output: Unpin,
    B::Output: Unpin,
{
    type Output = (A::Output, B::Output);
    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        if this.a_out.is_none() {
            if let Poll::Ready(v) = this.a.as_mut().poll(cx) {
                this.a_out = Some(v);
            }
        }
        if this.b_out.is_none() {
            if let Poll::Ready(v) = this.b.as_mut().poll(cx) {
                this.b_out = Some(v);
            }
        }
        if this.a_out.is_some() && this.b_out.is_some() {
            Poll::Ready((this.a_out.take().unwrap(), this.b_out.take().unwrap()))
        } else {
            Poll::Pending
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn nothing_is_active_by_default() {
    assert!(ThreadLocalRegistry.lookup().is_none());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn sync_scope_binds_and_restores() {
    let outer = capture();
    let inner = capture();
    let value = outer.hook_sync_context(|| {
        assert!(is_active(&outer));
        inner.hook_sync_context(|| assert!(is_active(&inner)));
        assert!(is_active(&outer));
        5
    });
    assert_eq!(value, 5);
    assert!(ThreadLocalRegistry.lookup().is_none());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn sync_scope_restores_after_panic() {
    let target = capture();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        target.hook_sync_context(|| panic!("inside scope"));
    }));
    assert!(result.is_err());
    assert!(ThreadLocalRegistry.lookup().is_none());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn async_binding_survives_suspension() {
    let target = capture();
    let probe = target.clone();
    let seen = test_executors::spin_on(target.hook_async_context(async move {
        let before = is_active(&probe);
        yield_now().await;
        yield_now().await;
        before && is_active(&probe)
    }));
    assert!(seen);
    assert!(ThreadLocalRegistry.lookup().is_none());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn interleaved_hooks_stay_isolated() {
    let a = capture();
    let b = capture();
    let (pa, pb) = (a.clone(), b.clone());
    let (ra, rb) = test_executors::spin_on(join(
        a.hook_async_context(async move {
            let mut ok = true;
            for _ in 0..3 {
                ok &= is_active(&pa);
                yield_now().await;
            }
            ok
        }),
        b.hook_async_context(async move {
            let mut ok = true;
            for _ in 0..3 {
                ok &= is_active(&pb);
                yield_now().await;
            }
            ok
        }),
    ));
    assert!(ra && rb);
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn remainder_inside_hook_does_not_leak_to_caller() {
    let outer = capture();
    let inner = capture();
    let (po, pi) = (outer.clone(), inner.clone());
    let (after_rebind, after_yield) = test_executors::spin_on(outer.hook_async_context(async move {
        pi.hook_remainder();
        let after_rebind = is_active(&pi);
        yield_now().await;
        (after_rebind, is_active(&pi))
    }));
    assert!(after_rebind && after_yield);
    assert!(!is_active(&po));
    assert!(ThreadLocalRegistry.lookup().is_none());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn forked_siblings_see_fork_point_binding() {
    let parent = capture();
    let left = capture();
    let (pp, pl) = (parent.clone(), left.clone());
    let (left_saw, right_saw, parent_after) =
        test_executors::spin_on(parent.hook_async_context(async move {
            let pl2 = pl.clone();
            let pp2 = pp.clone();
            let (l, r) = join(
                fork(async move {
                    pl2.hook_remainder();
                    yield_now().await;
                    is_active(&pl2)
                }),
                fork(async move {
                    yield_now().await;
                    yield_now().await;
                    is_active(&pp2)
                }),
            )
            .await;
            (l, r, is_active(&pp))
        }));
    assert!(left_saw, "left branch keeps its own rebinding");
    assert!(right_saw, "right branch still sees the fork-point binding");
    assert!(parent_after, "parent is unaffected by the branch");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn abandoned_hook_releases_binding() {
    let target = capture();
    let mut hooked = Box::pin(target.hook_async_context(async {
        yield_now().await;
    }));
    let mut cx = TaskContext::from_waker(Waker::noop());
    assert!(hooked.as_mut().poll(&mut cx).is_pending());
    assert!(ThreadLocalRegistry.lookup().is_none());
    drop(hooked);
    assert!(ThreadLocalRegistry.lookup().is_none());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn dropped_target_is_not_found() {
    let registry = ThreadLocalRegistry::new();
    let target = capture();
    registry.activate_for_remainder(&target);
    assert!(registry.lookup().is_some());
    drop(target);
    assert!(registry.lookup().is_none());
    registry.clear_current();
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn thread_level_remainder_persists_until_cleared() {
    let first = capture();
    let second = capture();
    first.hook_remainder();
    assert!(is_active(&first));
    second.hook_remainder();
    assert!(is_active(&second));
    ThreadLocalRegistry.clear_current();
    assert!(ThreadLocalRegistry.lookup().is_none());
}
