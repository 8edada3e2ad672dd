// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Console
//!
//! A console that keeps everything written to it in memory.  It stands in for a real
//! terminal in tests:
//!
//! - every raw write is kept with its stream, in order
//! - calls to [`Console::clear`] are counted
//! - terminal metadata is whatever the test configures, and can be resized
//! - [`MemoryConsole::screen`] replays the writes on a tiny terminal emulator that
//!   understands the escape sequences used by `fresh_line`
//! - [`MemoryConsole::close`] makes later writes fail, to exercise error propagation
//!
//! ```rust
//! use logscope::{Console, MemoryConsole};
//!
//! let console = MemoryConsole::new();
//! console.log(&["hello".into()]).unwrap();
//! assert_eq!(console.output(), "hello\n");
//! ```

use crate::console::{Console, ResizeChannel, ResizeListener, TtyInfo};
use crate::error::ConsoleError;
use crate::method::Stream;
use std::sync::Mutex;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Default)]
struct MemoryState {
    writes: Vec<(Stream, String)>,
    clears: usize,
    closed: bool,
}

/// A console that records writes in memory.
#[derive(Debug)]
pub struct MemoryConsole {
    state: Mutex<MemoryState>,
    tty: ResizeChannel,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: derived
// - Default: an unknown-width, colourless console
// - Clone: NOT implemented - two consoles sharing a history would be surprising
// - PartialEq/Eq/Hash: NOT implemented
// - Send/Sync: automatic through Mutex

impl Default for MemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConsole {
    /// A console with unknown width and no colour support.
    pub fn new() -> Self {
        Self::with_tty(TtyInfo::default())
    }

    /// A console reporting the given terminal metadata.
    ///
    /// ```rust
    /// use logscope::{Console, MemoryConsole, TtyInfo};
    ///
    /// let console = MemoryConsole::with_tty(TtyInfo { columns: Some(40), rows: Some(10), color_support: true });
    /// assert_eq!(console.tty().columns, Some(40));
    /// ```
    pub fn with_tty(tty: TtyInfo) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            tty: ResizeChannel::new(tty),
        }
    }

    /// A colour-capable console of the given width.
    pub fn ansi(columns: usize) -> Self {
        Self::with_tty(TtyInfo {
            columns: Some(columns),
            rows: Some(24),
            color_support: true,
        })
    }

    /// Everything written so far, all streams, in order.
    pub fn output(&self) -> String {
        let state = self.state.lock().unwrap();
        state.writes.iter().map(|(_, text)| text.as_str()).collect()
    }

    /// Everything written so far to one stream.
    pub fn stream_output(&self, stream: Stream) -> String {
        let state = self.state.lock().unwrap();
        state
            .writes
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    /// Returns everything written so far and forgets it.
    pub fn drain(&self) -> String {
        let mut state = self.state.lock().unwrap();
        let result = state.writes.iter().map(|(_, text)| text.as_str()).collect();
        state.writes.clear();
        result
    }

    /// How many times [`Console::clear`] was called.
    pub fn clear_count(&self) -> usize {
        self.state.lock().unwrap().clears
    }

    /// Makes every later write and clear fail with [`ConsoleError::Closed`].
    pub fn close(&self) {
        self.state.lock().unwrap().closed = true;
    }

    /// Updates the terminal size and notifies resize listeners.
    pub fn resize(&self, columns: Option<usize>, rows: Option<usize>) {
        self.tty.resize(columns, rows);
    }

    /**
    The visible rows after replaying every write since the last clear.

    Understands newline, carriage return, cursor-up (`ESC[nA`) and erase-below (`ESC[J`),
    and wraps at the configured width.  Trailing empty rows are dropped.
    */
    pub fn screen(&self) -> Vec<String> {
        let text = self.output();
        let columns = self.tty.tty().columns;
        let mut screen = Screen::new(columns);
        screen.feed(&text);
        screen.into_rows()
    }
}

impl Console for MemoryConsole {
    fn write_raw(&self, stream: Stream, text: &str) -> Result<(), ConsoleError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(ConsoleError::Closed);
        }
        state.writes.push((stream, text.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(ConsoleError::Closed);
        }
        state.clears += 1;
        state.writes.clear();
        Ok(())
    }

    fn tty(&self) -> TtyInfo {
        self.tty.tty()
    }

    fn on_resize(&self, listener: ResizeListener) {
        self.tty.subscribe(listener);
    }
}

const WIDE_TAIL: char = '\0';

/// Just enough terminal to check overwrite output.
///
/// A double-width character fills its cell and the next one holds `WIDE_TAIL`.
struct Screen {
    rows: Vec<Vec<char>>,
    row: usize,
    col: usize,
    columns: Option<usize>,
}

impl Screen {
    fn new(columns: Option<usize>) -> Self {
        Self {
            rows: vec![Vec::new()],
            row: 0,
            col: 0,
            columns,
        }
    }

    fn feed(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\n' => {
                    self.row += 1;
                    self.col = 0;
                    self.ensure_row();
                }
                '\r' => self.col = 0,
                '\u{1b}' if chars.peek() == Some(&'[') => {
                    chars.next();
                    let mut param = String::new();
                    let mut command = None;
                    for c in chars.by_ref() {
                        if c.is_ascii_digit() || c == ';' {
                            param.push(c);
                        } else {
                            command = Some(c);
                            break;
                        }
                    }
                    let n = param.parse::<usize>().unwrap_or(1).max(1);
                    match command {
                        Some('A') => self.row = self.row.saturating_sub(n),
                        Some('J') => {
                            self.rows.truncate(self.row + 1);
                            self.rows[self.row].truncate(self.col);
                        }
                        // colours and anything else leave the grid alone
                        _ => {}
                    }
                }
                c => {
                    let width = c.width().unwrap_or(0);
                    if width == 0 {
                        continue;
                    }
                    if self.col > 0
                        && self
                            .columns
                            .is_some_and(|columns| self.col + width > columns)
                    {
                        self.row += 1;
                        self.col = 0;
                        self.ensure_row();
                    }
                    self.put(c);
                    if width == 2 {
                        self.put(WIDE_TAIL);
                    }
                }
            }
        }
    }

    fn put(&mut self, c: char) {
        let line = &mut self.rows[self.row];
        if self.col < line.len() {
            line[self.col] = c;
        } else {
            line.push(c);
        }
        self.col += 1;
    }

    fn ensure_row(&mut self) {
        while self.rows.len() <= self.row {
            self.rows.push(Vec::new());
        }
    }

    fn into_rows(mut self) -> Vec<String> {
        while self.rows.last().is_some_and(|r| r.is_empty()) {
            self.rows.pop();
        }
        self.rows
            .into_iter()
            .map(|r| r.into_iter().filter(|c| *c != WIDE_TAIL).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_streams_in_order() {
        let console = MemoryConsole::new();
        console.log(&["out".into()]).unwrap();
        console.warn(&["err".into()]).unwrap();
        assert_eq!(console.output(), "out\nerr\n");
        assert_eq!(console.stream_output(Stream::Stderr), "err\n");
        assert_eq!(console.drain(), "out\nerr\n");
        assert_eq!(console.output(), "");
    }

    #[test]
    fn closed_console_fails() {
        let console = MemoryConsole::new();
        console.close();
        assert!(matches!(console.log(&["x".into()]), Err(ConsoleError::Closed)));
        assert!(matches!(console.clear(), Err(ConsoleError::Closed)));
    }

    #[test]
    fn screen_wraps_and_erases() {
        let console = MemoryConsole::ansi(4);
        console.write_raw(Stream::Stdout, "keep\n").unwrap();
        console.write_raw(Stream::Stdout, "abcdefgh\n").unwrap();
        assert_eq!(console.screen(), vec!["keep", "abcd", "efgh"]);
        console
            .write_raw(Stream::Stdout, "\u{1b}[2A\u{1b}[Jxy\n")
            .unwrap();
        assert_eq!(console.screen(), vec!["keep", "xy"]);
    }

    #[test]
    fn screen_wraps_wide_characters_by_column() {
        let console = MemoryConsole::ansi(5);
        console.write_raw(Stream::Stdout, "漢字漢字\n").unwrap();
        assert_eq!(console.screen(), vec!["漢字", "漢字"]);
    }

    #[test]
    fn clear_counts_and_empties() {
        let console = MemoryConsole::new();
        console.log(&["x".into()]).unwrap();
        console.clear().unwrap();
        assert_eq!(console.clear_count(), 1);
        assert!(console.screen().is_empty());
    }
}
