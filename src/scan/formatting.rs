//! Diagnostic rendering for range chains
//!
//! Turns a [`RangeChain`] into the classic multi-source diagnostic shape:
//! the innermost range is where the lexeme sits, every further range is the
//! include directive that pulled the enclosing source in.

use crate::scan::token::RangeChain;
use std::fmt::Write;

/// Render a chain as `at X` followed by one `included from Y` line per
/// enclosing source, outermost last.
pub fn include_trace(chain: &RangeChain) -> String {
    let mut out = String::new();
    for (depth, range) in chain.iter().enumerate() {
        if depth == 0 {
            let _ = write!(out, "at {}", range);
        } else {
            let _ = write!(out, "\n  included from {}", range);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::engine::TokenizerEngine;
    use crate::scan::token::build_range_chain;
    use crate::scan::{Scanner, SourceStack};
    use crate::scan::tokenizer::LogosTokenizer;
    use std::io::Write as _;

    #[test]
    fn test_single_level_trace() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        stack.begin_from_string(&mut engine, "abc").unwrap();
        let lexeme = engine.next_match().unwrap();
        stack.top_mut().unwrap().position_mut().advance(&lexeme.text);

        assert_eq!(include_trace(&build_range_chain(&stack)), "at -:1:1..1:3");
    }

    #[test]
    fn test_nested_trace_lists_outermost_last() {
        let mut included = tempfile::NamedTempFile::new().unwrap();
        write!(included, "inner").unwrap();
        let name = included.path().display().to_string();

        let mut scanner = Scanner::new(LogosTokenizer::new());
        scanner.begin_from_string("include \"x\"").unwrap();
        scanner.read_token().unwrap();
        scanner.push_include(included.path()).unwrap();
        let token = scanner.read_token().unwrap().unwrap();

        let trace = include_trace(&token.location);
        assert_eq!(
            trace,
            format!(
                "at {}:1:1..1:5\n  included from -:1:1..1:11",
                name
            )
        );
    }

    #[test]
    fn test_empty_chain_renders_empty() {
        let stack = SourceStack::new();
        assert_eq!(include_trace(&build_range_chain(&stack)), "");
    }
}
