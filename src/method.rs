// SPDX-License-Identifier: MIT OR Apache-2.0

/// The facade methods that produce a line of output.
///
/// Each method writes to the same stream the platform console would use for it.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    /// General output
    Log,
    /// Informational output
    Info,
    /// Debugging output
    Debug,
    /// Suspicious condition
    Warn,
    /// Runtime error; a single error argument may be claimed by an error handler
    Error,
    /// Trace output
    Trace,
}

/// The output stream a write is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Method {
    /// The stream this method writes to.
    ///
    /// ```
    /// use logscope::{Method, Stream};
    /// assert_eq!(Method::Log.stream(), Stream::Stdout);
    /// assert_eq!(Method::Warn.stream(), Stream::Stderr);
    /// ```
    pub const fn stream(self) -> Stream {
        match self {
            Method::Log | Method::Info | Method::Debug => Stream::Stdout,
            Method::Warn | Method::Error | Method::Trace => Stream::Stderr,
        }
    }

    /// The lowercase facade name of this method.
    pub const fn name(self) -> &'static str {
        match self {
            Method::Log => "log",
            Method::Info => "info",
            Method::Debug => "debug",
            Method::Warn => "warn",
            Method::Error => "error",
            Method::Trace => "trace",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
