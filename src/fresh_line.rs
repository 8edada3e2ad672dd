// SPDX-License-Identifier: MIT OR Apache-2.0

//! The line-overwrite protocol behind `fresh_line`.
//!
//! A fresh line is a line that replaces the previous line written under the same id,
//! which is how progress output redraws in place.  Replacement is only possible when
//! the terminal understands ANSI escapes and the previous line for that id is still
//! the last thing this console wrote; otherwise the text is written as a new line.
//!
//! Erasing moves the cursor up by the number of rows the previous text occupied when it
//! was written, then clears to the end of the screen.  The stored row count is used as
//! is.  Re-measuring at erase time would race with resizes.

use std::collections::HashMap;
use unicode_width::UnicodeWidthChar;

const ESC: char = '\u{1b}';

/// The last text written for one id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastLine {
    pub text: String,
    /// Terminal rows the text occupied when it was written.
    pub rendered_rows: usize,
}

/// Per-console overwrite state.
#[derive(Debug, Default)]
pub(crate) struct LineTracker {
    lines: HashMap<String, LastLine>,
    /// The id whose line was the most recent write, if the most recent write was a fresh line.
    most_recent: Option<String>,
}

impl LineTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records that something other than a fresh line was written.
    pub(crate) fn interrupt(&mut self) {
        self.most_recent = None;
    }

    pub(crate) fn last_line(&self, id: &str) -> Option<&LastLine> {
        self.lines.get(id)
    }

    /**
    Renders `text` for `id` and updates the state.

    Returns the exact text to write, including any erase sequence and the trailing newline.
    */
    pub(crate) fn render(
        &mut self,
        id: &str,
        text: String,
        supports_ansi: bool,
        columns: Option<usize>,
    ) -> String {
        let rendered_rows = rendered_rows(&text, columns);
        let mut out = String::with_capacity(text.len() + 8);
        if supports_ansi && self.most_recent.as_deref() == Some(id) {
            if let Some(previous) = self.lines.get(id) {
                out.push_str(&erase_rows(previous.rendered_rows));
            }
        }
        out.push_str(&text);
        out.push('\n');

        self.lines.insert(
            id.to_string(),
            LastLine {
                text,
                rendered_rows,
            },
        );
        self.most_recent = supports_ansi.then(|| id.to_string());
        out
    }
}

/// Moves the cursor up `rows` rows and clears everything below it.
pub(crate) fn erase_rows(rows: usize) -> String {
    format!("{ESC}[{rows}A{ESC}[J")
}

/**
Number of terminal rows `text` occupies when written at the start of a row.

Each newline-separated segment takes at least one row and wraps at `columns`.  A
double-width character that does not fit in what is left of a row moves to the next
one, as terminals do.  ANSI escape sequences take up no columns.
*/
pub fn rendered_rows(text: &str, columns: Option<usize>) -> usize {
    text.split('\n')
        .map(|segment| match columns {
            Some(columns) if columns > 0 => {
                let mut rows = 1;
                let mut col = 0;
                for width in cell_widths(segment) {
                    if col > 0 && col + width > columns {
                        rows += 1;
                        col = 0;
                    }
                    col += width;
                }
                rows
            }
            _ => 1,
        })
        .sum()
}

/// Terminal columns `text` takes up.  Wide characters count twice; ANSI CSI sequences
/// and control characters take none.
pub fn visible_width(text: &str) -> usize {
    cell_widths(text).sum()
}

/// Column widths of the characters in `text` that occupy cells.
fn cell_widths(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut chars = text.chars();
    std::iter::from_fn(move || {
        while let Some(c) = chars.next() {
            if c == ESC {
                // CSI: ESC [ parameters... final byte in @..~
                if chars.next() == Some('[') {
                    for c in chars.by_ref() {
                        if ('@'..='~').contains(&c) {
                            break;
                        }
                    }
                }
                continue;
            }
            match c.width() {
                Some(width) if width > 0 => return Some(width),
                _ => continue,
            }
        }
        None
    })
}
