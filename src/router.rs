// SPDX-License-Identifier: MIT OR Apache-2.0

//! The console that stands in for the process-wide facade.
//!
//! Every call asks the current [`ContextRegistry`] for the active target.  If there is
//! one, the call goes to that [`CaptureConsole`]; otherwise it goes to the original
//! console, unchanged.  Errors come back exactly as the destination returned them.
//!
//! Callers may also attach their own values to the router with
//! [`Router::set_property`].  Routing never looks at them.

use crate::arg::Arg;
use crate::capture::{CaptureConsole, CaptureOptions};
use crate::console::{Console, ResizeListener, TtyInfo};
use crate::context::{ContextRegistry, ThreadLocalRegistry};
use crate::error::ConsoleError;
use crate::method::{Method, Stream};
use crate::terminal_console::TerminalConsole;
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// The original console plus a passthrough target over it.
///
/// Passthrough calls go through the target so that `fresh_line` knows when something
/// else was written in between.
#[derive(Debug, Clone)]
struct Passthrough {
    console: Arc<dyn Console>,
    target: Arc<CaptureConsole>,
}

impl Passthrough {
    fn new(console: Arc<dyn Console>) -> Self {
        let target = CaptureConsole::new(
            CaptureOptions::new()
                .record_output(false)
                .real_console_output(true)
                .base_console(console.clone()),
        );
        Self { console, target }
    }
}

/// Values attached to the router by calling code.
#[derive(Default)]
pub struct Properties {
    values: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl Debug for Properties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.values.read().unwrap();
        f.debug_set().entries(values.keys()).finish()
    }
}

/// The process-wide routing console.  Obtain it with [`console`](crate::console).
pub struct Router {
    passthrough: RwLock<Option<Passthrough>>,
    registry: RwLock<Arc<dyn ContextRegistry>>,
    contexts_created: AtomicBool,
    properties: Properties,
}

impl Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("passthrough", &self.passthrough.read().unwrap())
            .field("registry", &self.registry())
            .field("contexts_created", &self.contexts_created.load(Ordering::Relaxed))
            .field("properties", &self.properties)
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves a future's output out through a shared slot, so the future can be type-erased.
struct Erased<T> {
    output: Arc<Mutex<Option<T>>>,
}

impl<T> Erased<T> {
    fn wrap<'a, F>(future: F) -> (crate::context::BoxFuture<'a>, Self)
    where
        F: Future<Output = T> + Send + 'a,
        T: Send + 'a,
    {
        let output = Arc::new(Mutex::new(None));
        let sink = output.clone();
        let erased = Box::pin(async move {
            let value = future.await;
            *sink.lock().unwrap() = Some(value);
        });
        (erased, Self { output })
    }

    fn take(self) -> T {
        self.output
            .lock()
            .unwrap()
            .take()
            .expect("context registry finished a scope without running it to completion")
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            passthrough: RwLock::new(None),
            registry: RwLock::new(Arc::new(ThreadLocalRegistry::new())),
            contexts_created: AtomicBool::new(false),
            properties: Properties::default(),
        }
    }

    fn passthrough(&self) -> Passthrough {
        if let Some(passthrough) = self.passthrough.read().unwrap().as_ref() {
            return passthrough.clone();
        }
        self.passthrough
            .write()
            .unwrap()
            .get_or_insert_with(|| Passthrough::new(Arc::new(TerminalConsole::new())))
            .clone()
    }

    /// The console calls go to when no target is active.
    pub fn original(&self) -> Arc<dyn Console> {
        self.passthrough().console
    }

    /// The target active for the code running right now.
    pub fn active(&self) -> Option<Arc<CaptureConsole>> {
        self.registry().lookup()
    }

    /// The registry currently in use.
    pub fn registry(&self) -> Arc<dyn ContextRegistry> {
        self.registry.read().unwrap().clone()
    }

    /// Whether any context was created under the current registry.
    pub fn contexts_created(&self) -> bool {
        self.contexts_created.load(Ordering::Relaxed)
    }

    fn destination(&self) -> Arc<CaptureConsole> {
        self.active().unwrap_or_else(|| self.passthrough().target)
    }

    pub(crate) fn install(&self, console: Arc<dyn Console>) -> Result<(), ConsoleError> {
        let mut passthrough = self.passthrough.write().unwrap();
        if passthrough.is_some() {
            return Err(ConsoleError::AlreadyInstalled);
        }
        *passthrough = Some(Passthrough::new(console));
        Ok(())
    }

    pub(crate) fn replace_implementation(
        &self,
        registry: Arc<dyn ContextRegistry>,
    ) -> Result<(), ConsoleError> {
        let mut current = self.registry.write().unwrap();
        if self.contexts_created.load(Ordering::Relaxed) {
            return Err(ConsoleError::RegistryInUse);
        }
        *current = registry;
        Ok(())
    }

    pub(crate) fn reset(&self) {
        *self.registry.write().unwrap() = Arc::new(ThreadLocalRegistry::new());
        ThreadLocalRegistry::new().clear_current();
        self.contexts_created.store(false, Ordering::Relaxed);
        *self.passthrough.write().unwrap() = None;
        self.properties.values.write().unwrap().clear();
    }

    fn registry_for_context(&self) -> Arc<dyn ContextRegistry> {
        self.contexts_created.store(true, Ordering::Relaxed);
        self.registry()
    }

    /// Runs `future` with `target` active.  See [`CaptureConsole::hook_async_context`].
    pub fn run<'a, F>(
        &self,
        target: &Arc<CaptureConsole>,
        future: F,
    ) -> impl Future<Output = F::Output> + Send + use<'a, F>
    where
        F: Future + Send + 'a,
        F::Output: Send + 'a,
    {
        let (erased, output) = Erased::wrap(future);
        let scoped = self.registry_for_context().run(target, erased);
        async move {
            scoped.await;
            output.take()
        }
    }

    /// Calls `f` with `target` active.  See [`CaptureConsole::hook_sync_context`].
    pub fn run_sync<R>(&self, target: &Arc<CaptureConsole>, f: impl FnOnce() -> R) -> R {
        let mut f = Some(f);
        let mut output = None;
        self.registry_for_context().run_sync(target, &mut || {
            if let Some(f) = f.take() {
                output = Some(f());
            }
        });
        output.expect("context registry returned without calling the scope")
    }

    /// See [`CaptureConsole::hook_remainder`].
    pub fn activate_for_remainder(&self, target: &Arc<CaptureConsole>) {
        self.registry_for_context().activate_for_remainder(target);
    }

    /// See [`fork`](crate::context::fork).
    pub fn fork<'a, F>(&self, branch: F) -> impl Future<Output = F::Output> + Send + use<'a, F>
    where
        F: Future + Send + 'a,
        F::Output: Send + 'a,
    {
        let (erased, output) = Erased::wrap(branch);
        let forked = self.registry_for_context().fork(erased);
        async move {
            forked.await;
            output.take()
        }
    }

    /**
    Attaches a value to the router under `name`, returning the previous one.

    ```rust
    let console = logscope::console();
    console.set_property("app.name", String::from("demo"));
    assert_eq!(*console.property::<String>("app.name").unwrap(), "demo");
    assert!(console.property::<u32>("app.name").is_none());
    # console.remove_property("app.name");
    ```
    */
    pub fn set_property<T: Any + Send + Sync>(
        &self,
        name: impl Into<String>,
        value: T,
    ) -> Option<Arc<dyn Any + Send + Sync>> {
        self.properties
            .values
            .write()
            .unwrap()
            .insert(name.into(), Arc::new(value))
    }

    /// The value stored under `name`, if there is one of type `T`.
    pub fn property<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let value = self.properties.values.read().unwrap().get(name)?.clone();
        value.downcast::<T>().ok()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.values.read().unwrap().contains_key(name)
    }

    pub fn remove_property(&self, name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.properties.values.write().unwrap().remove(name)
    }
}

impl Console for Router {
    fn write_raw(&self, stream: Stream, text: &str) -> Result<(), ConsoleError> {
        self.destination().write_raw(stream, text)
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        self.destination().clear()
    }

    fn write_line(&self, method: Method, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.destination().write_line(method, args)
    }

    fn fresh_line(&self, id: &str, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.destination().fresh_line(id, args)
    }

    fn tty(&self) -> TtyInfo {
        self.destination().tty()
    }

    fn on_resize(&self, listener: ResizeListener) {
        self.original().on_resize(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_console::MemoryConsole;

    fn router_over(base: &Arc<MemoryConsole>) -> Router {
        let router = Router::new();
        router.install(base.clone()).unwrap();
        router
    }

    #[test]
    fn passthrough_matches_original() {
        let routed = Arc::new(MemoryConsole::new());
        let direct = MemoryConsole::new();
        let router = router_over(&routed);
        router.log(&["x".into(), Arg::display(&2)]).unwrap();
        router.error(&["bad".into()]).unwrap();
        direct.log(&["x".into(), Arg::display(&2)]).unwrap();
        direct.error(&["bad".into()]).unwrap();
        assert_eq!(routed.output(), direct.output());
        assert_eq!(
            routed.stream_output(Stream::Stderr),
            direct.stream_output(Stream::Stderr)
        );
    }

    #[test]
    fn passthrough_errors_propagate() {
        let base = Arc::new(MemoryConsole::new());
        let router = router_over(&base);
        base.close();
        assert!(matches!(router.log(&["x".into()]), Err(ConsoleError::Closed)));
        assert!(matches!(router.clear(), Err(ConsoleError::Closed)));
    }

    #[test]
    fn install_only_before_first_use() {
        let router = Router::new();
        let _ = router.original();
        assert!(matches!(
            router.install(Arc::new(MemoryConsole::new())),
            Err(ConsoleError::AlreadyInstalled)
        ));
    }

    #[test]
    fn passthrough_fresh_line_overwrites() {
        let base = Arc::new(MemoryConsole::ansi(80));
        let router = router_over(&base);
        router.fresh_line("p", &["A".into()]).unwrap();
        router.fresh_line("p", &["B".into()]).unwrap();
        assert_eq!(base.screen(), vec!["B"]);
        router.log(&["done".into()]).unwrap();
        router.fresh_line("p", &["C".into()]).unwrap();
        assert_eq!(base.screen(), vec!["B", "done", "C"]);
    }

    #[test]
    fn properties_survive_install() {
        let router = Router::new();
        router.set_property("color", 3u8);
        router.install(Arc::new(MemoryConsole::new())).unwrap();
        router.set_property("name", String::from("after"));
        assert_eq!(*router.property::<u8>("color").unwrap(), 3);
        assert_eq!(*router.property::<String>("name").unwrap(), "after");
        assert!(router.has_property("color"));
        assert!(router.remove_property("color").is_some());
        assert!(router.property::<u8>("color").is_none());
    }

    #[test]
    fn replace_rejected_after_contexts_exist() {
        let router = Router::new();
        router
            .replace_implementation(Arc::new(ThreadLocalRegistry::new()))
            .unwrap();
        let target = CaptureConsole::new(
            CaptureOptions::new().base_console(Arc::new(MemoryConsole::new())),
        );
        router.run_sync(&target, || ());
        assert!(router.contexts_created());
        assert!(matches!(
            router.replace_implementation(Arc::new(ThreadLocalRegistry::new())),
            Err(ConsoleError::RegistryInUse)
        ));
        router.reset();
        assert!(!router.contexts_created());
        assert!(
            router
                .replace_implementation(Arc::new(ThreadLocalRegistry::new()))
                .is_ok()
        );
    }
}
