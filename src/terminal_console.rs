// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::console::{Console, ResizeChannel, ResizeListener, TtyInfo};
use crate::error::ConsoleError;
use crate::method::Stream;

/**
The reference console.  Writes to stdout and stderr.

On wasm32 it writes through the browser console instead.

Terminal metadata is read from the environment once, at construction: `COLUMNS` and
`LINES` for the size, `NO_COLOR` and `TERM=dumb` to turn colour support off.  Call
[`TerminalConsole::resize`] when the terminal size changes.
*/
#[derive(Debug)]
pub struct TerminalConsole {
    tty: ResizeChannel,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: derived
// - Default: implemented, reads the environment like `new`
// - Clone: NOT implemented - resize listeners are not clonable and a clone would
//   silently stop hearing resizes
// - PartialEq/Eq/Hash: NOT implemented - consoles have identity, not value
// - Send/Sync: automatic

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::with_tty(detect_tty())
    }

    /// Uses the given metadata instead of probing the environment.
    pub fn with_tty(tty: TtyInfo) -> Self {
        Self {
            tty: ResizeChannel::new(tty),
        }
    }

    /// Updates the terminal size and notifies resize listeners.
    pub fn resize(&self, columns: Option<usize>, rows: Option<usize>) {
        self.tty.resize(columns, rows);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn detect_tty() -> TtyInfo {
    use std::io::IsTerminal;
    let is_terminal = std::io::stdout().is_terminal();
    let from_env = |name: &str| {
        std::env::var(name)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|v| *v > 0)
    };
    let color_disabled = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
        || std::env::var("TERM").is_ok_and(|t| t == "dumb");
    TtyInfo {
        columns: from_env("COLUMNS").or(is_terminal.then_some(80)),
        rows: from_env("LINES").or(is_terminal.then_some(24)),
        color_support: is_terminal && !color_disabled,
    }
}

#[cfg(target_arch = "wasm32")]
fn detect_tty() -> TtyInfo {
    TtyInfo::default()
}

impl Console for TerminalConsole {
    fn write_raw(&self, stream: Stream, text: &str) -> Result<(), ConsoleError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            match stream {
                Stream::Stdout => {
                    let mut lock = std::io::stdout().lock();
                    lock.write_all(text.as_bytes())?;
                    lock.flush()?;
                }
                Stream::Stderr => {
                    let mut lock = std::io::stderr().lock();
                    lock.write_all(text.as_bytes())?;
                }
            }
        }
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsValue;
            // the browser console is line based
            let msg = JsValue::from_str(text.strip_suffix('\n').unwrap_or(text));
            match stream {
                Stream::Stdout => web_sys::console::log_1(&msg),
                Stream::Stderr => web_sys::console::error_1(&msg),
            }
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if self.tty.tty().color_support {
                self.write_raw(Stream::Stdout, "\u{1b}[2J\u{1b}[H")?;
            }
        }
        #[cfg(target_arch = "wasm32")]
        web_sys::console::clear();
        Ok(())
    }

    fn write_line(
        &self,
        method: crate::Method,
        args: &[crate::Arg<'_>],
    ) -> Result<(), ConsoleError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let record = crate::Record::from_args(method, args);
            self.write_raw(method.stream(), &record.line())
        }
        #[cfg(target_arch = "wasm32")]
        {
            use crate::Method;
            let msg = wasm_bindgen::JsValue::from_str(&crate::Record::from_args(method, args).to_string());
            match method {
                Method::Log => web_sys::console::log_1(&msg),
                Method::Info => web_sys::console::info_1(&msg),
                Method::Debug => web_sys::console::debug_1(&msg),
                Method::Warn => web_sys::console::warn_1(&msg),
                Method::Error => web_sys::console::error_1(&msg),
                Method::Trace => web_sys::console::trace_1(&msg),
            }
            Ok(())
        }
    }

    fn tty(&self) -> TtyInfo {
        self.tty.tty()
    }

    fn on_resize(&self, listener: ResizeListener) {
        self.tty.subscribe(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn resize_updates_tty_and_notifies() {
        let console = TerminalConsole::with_tty(TtyInfo {
            columns: Some(80),
            rows: Some(24),
            color_support: false,
        });
        let heard = Arc::new(AtomicBool::new(false));
        let heard_clone = heard.clone();
        console.on_resize(Box::new(move |tty| {
            heard_clone.store(tty.columns == Some(100), Ordering::Relaxed);
        }));
        console.resize(Some(100), Some(30));
        assert!(heard.load(Ordering::Relaxed));
        assert_eq!(console.tty().rows, Some(30));
    }

    #[test]
    fn clear_without_color_writes_nothing() {
        let console = TerminalConsole::with_tty(TtyInfo::default());
        console.clear().unwrap();
    }
}
