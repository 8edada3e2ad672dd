// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Boxed error returned by an error handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by console operations.
///
/// Nothing is retried or swallowed: a failing sink or handler is reported to whoever
/// made the facade call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConsoleError {
    /// The underlying stream failed.
    #[error("console write failed: {0}")]
    Io(#[from] std::io::Error),
    /// The sink was closed before the write.
    #[error("console sink is closed")]
    Closed,
    /// The capture target's error handler failed.
    #[error("error handler failed: {0}")]
    Handler(#[source] BoxError),
    /// [`install`](crate::install) ran after the original console was already resolved.
    #[error("the original console was already resolved; install must run before the first routed call")]
    AlreadyInstalled,
    /// [`replace_implementation`](crate::replace_implementation) ran after contexts were created.
    #[error("contexts already exist under the current registry; replace it before any hook runs")]
    RegistryInUse,
}
