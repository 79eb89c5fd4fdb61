//! Ranges, range chains, and tokens
//!
//! A [`Range`] is the extent of one lexeme within one input source. A
//! [`RangeChain`] stacks one range per active source, innermost (the source
//! currently being scanned) first and the original entry point last, so a
//! diagnostic can be rendered as "error at X, included from Y". A [`Token`]
//! pairs a chain with the engine's lexeme code and an owned copy of the
//! matched text.
//!
//! Chains are built iteratively over the stack, so deep include nesting never
//! costs call-stack depth, and always reflect the exact stack state at the
//! moment of the match.

use crate::scan::context::SourceStack;
use crate::scan::position::Position;

/// The extent of one lexeme within one input source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Range {
    /// Display name of the source (sentinel `-` for string buffers).
    pub name: String,
    pub start: Position,
    pub end: Position,
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}..{}", self.name, self.start, self.end)
    }
}

/// One [`Range`] per active input source, innermost first.
///
/// The length always equals the stack depth at the moment the lexeme was
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RangeChain {
    ranges: Vec<Range>,
}

impl RangeChain {
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The range in the source currently being scanned.
    pub fn innermost(&self) -> Option<&Range> {
        self.ranges.first()
    }

    /// The range in the original entry point.
    pub fn outermost(&self) -> Option<&Range> {
        self.ranges.last()
    }

    /// Ranges from innermost to outermost.
    pub fn iter(&self) -> impl Iterator<Item = &Range> {
        self.ranges.iter()
    }
}

/// One matched lexeme with its multi-level location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub location: RangeChain,
    pub code: u32,
    pub text: String,
}

/// Build the chain of ranges for the lexeme most recently advanced over.
///
/// Walks the stack from the active source down to the entry point. For each
/// context the start is the position before its last advance and the end is
/// the clamped end of the consumed lexeme (see
/// [`TrackedPosition::end_of_lexeme`](crate::scan::position::TrackedPosition::end_of_lexeme)
/// for the line-break edge case). For parent contexts that lexeme is the
/// include directive that opened the child.
pub fn build_range_chain(stack: &SourceStack) -> RangeChain {
    let mut ranges = Vec::with_capacity(stack.depth());
    for context in stack.iter_top_down() {
        ranges.push(Range {
            name: context.name().to_string(),
            start: context.position().previous(),
            end: context.position().end_of_lexeme(),
        });
    }
    RangeChain { ranges }
}

/// Build a token for a matched lexeme from the current stack state.
pub fn build_token(stack: &SourceStack, code: u32, text: &str) -> Token {
    Token {
        location: build_range_chain(stack),
        code,
        text: text.to_string(),
    }
}
