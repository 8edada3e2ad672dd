// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide router.
//!
//! There is exactly one [`Router`] per process.  It is created on first use and never
//! destroyed.
//!
//! # Initialization order
//!
//! 1. Optionally, [`install`] the original console.  This must happen before anything
//!    is routed or any code asks for [`Router::original`]; otherwise the router has
//!    already settled on a [`TerminalConsole`](crate::TerminalConsole) and `install`
//!    fails with [`ConsoleError::AlreadyInstalled`].
//! 2. Optionally, [`replace_implementation`] the context registry.  This must happen
//!    before any target is hooked.
//! 3. Use [`console`] (or the macros) everywhere.
//!
//! [`reset`] returns the router to its initial state, for test isolation.
//!
//! # Examples
//!
//! ```
//! use logscope::{Console, MemoryConsole};
//! use std::sync::Arc;
//!
//! let terminal = Arc::new(MemoryConsole::new());
//! logscope::install(terminal.clone()).unwrap();
//! logscope::log!("hello {}", "world").unwrap();
//! assert_eq!(terminal.output(), "hello world\n");
//! ```
//!
//! # Replacing the registry after contexts exist
//!
//! Bindings made under one registry are invisible to another, so swapping registries
//! while targets are hooked would silently drop those targets' output on the floor.
//! [`replace_implementation`] therefore refuses once any hook, `hook_remainder` or
//! `fork` has gone through the router, returning [`ConsoleError::RegistryInUse`].
//! Only [`reset`] clears that state.

use crate::console::Console;
use crate::context::ContextRegistry;
use crate::error::ConsoleError;
use crate::router::Router;
use std::sync::{Arc, OnceLock};

static ROUTER: OnceLock<Router> = OnceLock::new();

/// Returns the process-wide router, creating it if needed.
///
/// ```
/// use logscope::Console;
/// logscope::console().info(&["ready".into()]).unwrap();
/// ```
pub fn console() -> &'static Router {
    ROUTER.get_or_init(Router::new)
}

/// Sets the console that receives calls while no target is active.
///
/// Must run before the first routed call.
pub fn install(original: Arc<dyn Console>) -> Result<&'static Router, ConsoleError> {
    let router = console();
    router.install(original)?;
    internal_debug!("installed original console");
    Ok(router)
}

/**
Swaps the context registry for the whole process.

Fails with [`ConsoleError::RegistryInUse`] if any context was created under the current
registry.  See the [module docs](self).
*/
pub fn replace_implementation(registry: Arc<dyn ContextRegistry>) -> Result<(), ConsoleError> {
    console().replace_implementation(registry)?;
    internal_debug!("replaced context registry");
    Ok(())
}

/**
Restores the initial state: built-in registry, no original console resolved yet, no
properties, and the calling thread unbound.

Targets bound on other threads by the old registry are not touched.  Intended for tests.
*/
pub fn reset() {
    console().reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_is_a_singleton() {
        assert!(std::ptr::eq(console(), console()));
    }
}
