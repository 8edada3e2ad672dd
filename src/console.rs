// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::arg::Arg;
use crate::error::ConsoleError;
use crate::method::{Method, Stream};
use crate::record::Record;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

/// Terminal metadata of a console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TtyInfo {
    /// Width in columns, if known.  `None` means lines never wrap.
    pub columns: Option<usize>,
    /// Height in rows, if known.
    pub rows: Option<usize>,
    /// Whether the terminal understands ANSI escape sequences.
    pub color_support: bool,
}

/// Called with the new metadata whenever a console is resized.
pub type ResizeListener = Box<dyn Fn(TtyInfo) + Send + Sync>;

/**
The facade surface.

Every console, whether it writes to a terminal, captures into memory, or routes to
one of those, exposes the same set of methods.  Implementors provide [`Self::write_raw`]
and [`Self::clear`]; everything else has a default.
*/
pub trait Console: Debug + Send + Sync {
    /**
    Writes already-rendered text to a stream.  No terminator is added.
    */
    fn write_raw(&self, stream: Stream, text: &str) -> Result<(), ConsoleError>;

    /**
    Clears the console.
    */
    fn clear(&self) -> Result<(), ConsoleError>;

    /**
    Formats `args` and writes them as one line on the method's stream.
    */
    fn write_line(&self, method: Method, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        let record = Record::from_args(method, args);
        self.write_raw(method.stream(), &record.line())
    }

    /**
    Writes a line that replaces the previous line written under the same `id`.

    Consoles without overwrite support write an ordinary line.
    */
    fn fresh_line(&self, _id: &str, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.write_line(Method::Log, args)
    }

    /// Terminal metadata.  The default is an unknown-width, colourless terminal.
    fn tty(&self) -> TtyInfo {
        TtyInfo::default()
    }

    /// Registers a listener for resize notifications.  Consoles that never resize drop it.
    fn on_resize(&self, listener: ResizeListener) {
        drop(listener);
    }

    fn log(&self, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.write_line(Method::Log, args)
    }

    fn info(&self, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.write_line(Method::Info, args)
    }

    fn debug(&self, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.write_line(Method::Debug, args)
    }

    fn warn(&self, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.write_line(Method::Warn, args)
    }

    fn error(&self, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.write_line(Method::Error, args)
    }

    fn trace(&self, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        self.write_line(Method::Trace, args)
    }

    /**
    Writes `Assertion failed` followed by `args` on the error stream when `condition` is false.
    */
    fn assert(&self, condition: bool, args: &[Arg<'_>]) -> Result<(), ConsoleError> {
        if condition {
            return Ok(());
        }
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(Arg::Str(if args.is_empty() {
            "Assertion failed"
        } else {
            "Assertion failed:"
        }));
        all.extend_from_slice(args);
        self.write_line(Method::Error, &all)
    }
}

/*
Boilerplate notes.

# Console

Clone makes no sense for something that owns a terminal or a buffer.
PartialEq/Eq/Hash: unclear whether we'd mean data or identity equality, so none.
Default is not sensible for the trait; concrete consoles decide.
Send/Sync are required because the router is process-wide.
*/

type SharedListener = Arc<dyn Fn(TtyInfo) + Send + Sync>;

/// Terminal metadata plus the listeners interested in it.
#[derive(Default)]
pub(crate) struct ResizeChannel {
    state: Mutex<(TtyInfo, Vec<SharedListener>)>,
}

impl ResizeChannel {
    pub(crate) fn new(tty: TtyInfo) -> Self {
        Self {
            state: Mutex::new((tty, Vec::new())),
        }
    }

    pub(crate) fn tty(&self) -> TtyInfo {
        self.state.lock().unwrap().0
    }

    pub(crate) fn subscribe(&self, listener: ResizeListener) {
        self.state.lock().unwrap().1.push(Arc::from(listener));
    }

    /**
    Updates the size and notifies every listener.

    Listeners run after the lock is released, so they may read the metadata or subscribe.
    */
    pub(crate) fn resize(&self, columns: Option<usize>, rows: Option<usize>) {
        let (tty, listeners) = {
            let mut state = self.state.lock().unwrap();
            state.0.columns = columns;
            state.0.rows = rows;
            (state.0, state.1.clone())
        };
        for listener in listeners {
            listener(tty);
        }
    }
}

impl Debug for ResizeChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("ResizeChannel")
            .field("tty", &state.0)
            .field("listeners", &state.1.len())
            .finish()
    }
}
