// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arguments passed to facade methods.
//!
//! A facade call takes a slice of [`Arg`]s, the way a console call takes a list of
//! values.  Arguments are formatted individually and joined with a single space.
//!
//! Errors are kept distinct from other displayable values so that a capture target
//! can recognise a lone error argument and hand it to its error handler.

use std::error::Error;
use std::fmt::{self, Debug, Display};

/// One argument of a facade call.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    /// A string slice, written as-is.
    Str(&'a str),
    /// Formatted with [`Display`].
    Display(&'a dyn Display),
    /// Formatted with [`Debug`].
    Debug(&'a dyn Debug),
    /// Pre-built format arguments, usually from [`format_args!`].
    Fmt(fmt::Arguments<'a>),
    /// An error value.  Formatted as the error followed by its source chain.
    Error(&'a (dyn Error + 'static)),
}

impl<'a> Arg<'a> {
    /// Wraps a concrete error type.
    ///
    /// ```
    /// use logscope::Arg;
    /// let e = std::io::Error::other("disk on fire");
    /// let arg = Arg::error(&e);
    /// assert!(arg.as_error().is_some());
    /// ```
    pub fn error<E: Error + 'static>(error: &'a E) -> Self {
        Arg::Error(error)
    }

    /// Wraps any displayable value.
    pub fn display<D: Display>(value: &'a D) -> Self {
        Arg::Display(value)
    }

    /// Wraps any debuggable value.
    pub fn debug<D: Debug>(value: &'a D) -> Self {
        Arg::Debug(value)
    }

    /// Returns the error if this argument is one.
    pub fn as_error(&self) -> Option<&'a (dyn Error + 'static)> {
        match self {
            Arg::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::Display(value)
    }
}

impl<'a> From<fmt::Arguments<'a>> for Arg<'a> {
    fn from(value: fmt::Arguments<'a>) -> Self {
        Arg::Fmt(value)
    }
}

impl Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Display(d) => write!(f, "{d}"),
            Arg::Debug(d) => write!(f, "{d:?}"),
            Arg::Fmt(a) => write!(f, "{a}"),
            Arg::Error(e) => {
                write!(f, "{e}")?;
                let mut source = e.source();
                while let Some(s) = source {
                    write!(f, ": {s}")?;
                    source = s.source();
                }
                Ok(())
            }
        }
    }
}

impl Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Arg::Display(_) => f.debug_tuple("Display").field(&self.to_string()).finish(),
            Arg::Debug(d) => f.debug_tuple("Debug").field(d).finish(),
            Arg::Fmt(a) => f.debug_tuple("Fmt").field(a).finish(),
            Arg::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}
