//! Line/column position tracking for a single input source
//!
//! This module defines the data structures for representing positions while a
//! source is being scanned:
//!
//! - [`Position`] - A line:column position, both 1-based
//! - [`TrackedPosition`] - The per-source bookkeeping: the current position,
//!   the position before the last advance, and the column the most recent
//!   line break was consumed at
//!
//! ## Key Design
//!
//! - **1-based everywhere**: line 1, column 1 is the first character of a
//!   source, matching how editors and compilers report locations
//! - **Previous never trails current**: `advance` records `previous = current`
//!   before consuming, so `previous <= current` in document order always holds
//! - **One column unit per character**: no Unicode width handling; a line
//!   break resets the column to 1, everything else adds one
//!
//! The typical flow is: the tokenizer engine reports a match, the scanner
//! calls [`TrackedPosition::advance`] with the matched text exactly once, and
//! the token builder then reads `previous` as the lexeme's start and
//! [`TrackedPosition::end_of_lexeme`] as its end.

use std::fmt;

/// A line:column position in an input source, both 1-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first character of a source.
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

/// Position bookkeeping for one input source.
///
/// `current` is where the next character will land; `previous` is where
/// `current` stood before the last [`advance`](Self::advance). A lexeme
/// therefore starts at `previous` and ends just before `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrackedPosition {
    current: Position,
    previous: Position,
    /// Column the most recent line break occupied, for representing the end
    /// of a lexeme whose final character was the break itself.
    break_column: usize,
}

impl TrackedPosition {
    pub fn start() -> Self {
        Self {
            current: Position::start(),
            previous: Position::start(),
            break_column: 1,
        }
    }

    pub fn current(&self) -> Position {
        self.current
    }

    pub fn previous(&self) -> Position {
        self.previous
    }

    /// Consume the text of one matched lexeme.
    ///
    /// Records `previous = current`, then scans the text once: each `\n`
    /// increments the line and resets the column to 1, every other character
    /// increments the column. Must be called exactly once per match.
    pub fn advance(&mut self, text: &str) {
        self.previous = self.current;
        for ch in text.chars() {
            if ch == '\n' {
                self.break_column = self.current.column;
                self.current.line += 1;
                self.current.column = 1;
            } else {
                self.current.column += 1;
            }
        }
    }

    /// End position of the lexeme consumed by the last `advance`.
    ///
    /// Normally `(current.line, current.column - 1)`: the tracker has already
    /// moved past the lexeme, so the end is one column back. When the lexeme's
    /// final character was a line break the current column is 1 and stepping
    /// back would underflow to column 0; the end is then represented as the
    /// end of the previous line, i.e. the column the break itself occupied.
    /// The degenerate start-of-input case saturates to (1, 1).
    pub fn end_of_lexeme(&self) -> Position {
        if self.current.column > 1 {
            Position::new(self.current.line, self.current.column - 1)
        } else if self.current.line > 1 {
            Position::new(self.current.line - 1, self.break_column)
        } else {
            Position::start()
        }
    }
}

impl Default for TrackedPosition {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let tracked = TrackedPosition::start();
        assert_eq!(tracked.current(), Position::new(1, 1));
        assert_eq!(tracked.previous(), Position::new(1, 1));
    }

    #[test]
    fn test_advance_single_line() {
        let mut tracked = TrackedPosition::start();
        tracked.advance("abc");

        assert_eq!(tracked.previous(), Position::new(1, 1));
        assert_eq!(tracked.current(), Position::new(1, 4));
        assert_eq!(tracked.end_of_lexeme(), Position::new(1, 3));
    }

    #[test]
    fn test_advance_records_previous() {
        let mut tracked = TrackedPosition::start();
        tracked.advance("abc");
        tracked.advance(" ");

        assert_eq!(tracked.previous(), Position::new(1, 4));
        assert_eq!(tracked.current(), Position::new(1, 5));
    }

    #[test]
    fn test_advance_line_break_resets_column() {
        let mut tracked = TrackedPosition::start();
        tracked.advance("a\nb");

        assert_eq!(tracked.current(), Position::new(2, 2));
        assert_eq!(tracked.end_of_lexeme(), Position::new(2, 1));
    }

    #[test]
    fn test_advance_multiple_line_breaks() {
        let mut tracked = TrackedPosition::start();
        tracked.advance("one\ntwo\nthree");

        assert_eq!(tracked.current(), Position::new(3, 6));
    }

    #[test]
    fn test_lexeme_ending_on_line_break() {
        let mut tracked = TrackedPosition::start();
        tracked.advance("ab");
        tracked.advance("\n");

        // The break sat at column 3; the lexeme ends at the end of line 1.
        assert_eq!(tracked.current(), Position::new(2, 1));
        assert_eq!(tracked.end_of_lexeme(), Position::new(1, 3));
    }

    #[test]
    fn test_end_of_lexeme_saturates_at_input_start() {
        let tracked = TrackedPosition::start();
        assert_eq!(tracked.end_of_lexeme(), Position::new(1, 1));
    }

    #[test]
    fn test_previous_never_after_current() {
        let mut tracked = TrackedPosition::start();
        for text in ["abc", "\n", "x\ny\nz", "", "  "] {
            tracked.advance(text);
            assert!(tracked.previous() <= tracked.current());
        }
    }

    #[test]
    fn test_position_display() {
        assert_eq!(format!("{}", Position::new(5, 10)), "5:10");
    }
}
