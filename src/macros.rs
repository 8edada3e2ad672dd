// SPDX-License-Identifier: MIT OR Apache-2.0

//! Macros for calling the process-wide console.
//!
//! Each macro takes `format!`-style arguments, routes the call through
//! [`console()`](crate::console) and evaluates to `Result<(), ConsoleError>`.
//!
//! ```rust
//! # fn main() -> Result<(), logscope::ConsoleError> {
//! let count = 3;
//! logscope::log!("processed {count} files")?;
//! logscope::warn!("{} skipped", 1)?;
//! logscope::log!()?; // empty line
//! # Ok(())
//! # }
//! ```

/// Diagnostics about the crate itself, written to the original console.
///
/// Compiled only with the `logscope_internal` feature.
macro_rules! internal_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "logscope_internal")]
        {
            let _ = $crate::Console::write_line(
                &*$crate::console().original(),
                $crate::Method::Debug,
                &[$crate::Arg::Fmt(format_args!($($arg)*))],
            );
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __console_call {
    ($method:ident $(,)?) => {
        $crate::Console::write_line($crate::console(), $crate::Method::$method, &[])
    };
    ($method:ident, $($arg:tt)+) => {
        $crate::Console::write_line(
            $crate::console(),
            $crate::Method::$method,
            &[$crate::Arg::Fmt(format_args!($($arg)+))],
        )
    };
}

/// Writes a line with [`Method::Log`](crate::Method::Log).
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => { $crate::__console_call!(Log, $($arg)*) };
}

/// Writes a line with [`Method::Info`](crate::Method::Info).
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::__console_call!(Info, $($arg)*) };
}

/// Writes a line with [`Method::Debug`](crate::Method::Debug).
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::__console_call!(Debug, $($arg)*) };
}

/// Writes a line with [`Method::Warn`](crate::Method::Warn).
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::__console_call!(Warn, $($arg)*) };
}

/// Writes a line with [`Method::Trace`](crate::Method::Trace).
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => { $crate::__console_call!(Trace, $($arg)*) };
}

/**
Writes a line with [`Method::Error`](crate::Method::Error).

`error!(err = e)` passes `e` as a lone error argument, which an active target's error
handler may claim.

```rust
let e = std::io::Error::other("disk full");
logscope::error!(err = e).unwrap();
logscope::error!("could not save: {e}").unwrap();
```
*/
#[macro_export]
macro_rules! error {
    (err = $e:expr) => {
        $crate::Console::write_line(
            $crate::console(),
            $crate::Method::Error,
            &[$crate::Arg::error(&$e)],
        )
    };
    ($($arg:tt)*) => { $crate::__console_call!(Error, $($arg)*) };
}

/**
Writes a line that replaces the previous line with the same id.

```rust
for pct in [0, 50, 100] {
    logscope::fresh_line!("download", "downloading... {pct}%").unwrap();
}
```
*/
#[macro_export]
macro_rules! fresh_line {
    ($id:expr) => {
        $crate::Console::fresh_line($crate::console(), $id, &[])
    };
    ($id:expr, $($arg:tt)+) => {
        $crate::Console::fresh_line(
            $crate::console(),
            $id,
            &[$crate::Arg::Fmt(format_args!($($arg)+))],
        )
    };
}
