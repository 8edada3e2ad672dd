// SPDX-License-Identifier: MIT OR Apache-2.0

//! Formatted output for a single facade call.
//!
//! A [`Record`] holds one formatted part per argument.  Parts are joined with a single
//! space when the record is displayed, so `log("a", 1)` becomes `a 1`.
//!
//! ```rust
//! use logscope::{Arg, Method, Record};
//!
//! let record = Record::from_args(Method::Info, &[Arg::from("took"), Arg::display(&3), Arg::from("ms")]);
//! assert_eq!(record.to_string(), "took 3 ms");
//! assert_eq!(record.line(), "took 3 ms\n");
//! ```

use crate::arg::Arg;
use crate::method::Method;
use std::fmt::{Debug, Display};

/**
A formatted facade call.

Records are built progressively with [`Record::log`] and [`Record::log_owned`], or all at
once from a slice of arguments.  Consoles turn a record into a line with [`Record::line`].
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    parts: Vec<String>,
    method: Method,
}

impl Record {
    pub fn new(method: Method) -> Self {
        Self {
            parts: Vec::new(),
            method,
        }
    }

    /// Formats every argument into its own part.
    pub fn from_args(method: Method, args: &[Arg<'_>]) -> Self {
        let mut record = Self::new(method);
        for arg in args {
            record.log_owned(arg.to_string());
        }
        record
    }

    /**
    Append a part to the record.
    */
    pub fn log(&mut self, message: &str) {
        self.parts.push(message.to_string());
    }

    /**
    Append a part to the record, taking ownership of it.
    */
    pub fn log_owned(&mut self, message: String) {
        self.parts.push(message);
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The record's text followed by a line terminator.
    pub fn line(&self) -> String {
        let mut line = self.to_string();
        line.push('\n');
        line
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}
/*
Boilerplate notes for Record:

IMPLEMENTED:
- Debug, Clone, PartialEq/Eq, Hash: derived; records are plain data
- Display: joins parts with a space

NOT IMPLEMENTED:
- Default: there is no obvious default method
- Copy: owns heap data
- Ord/PartialOrd: no meaningful ordering
*/
