//! # lexnest
//!
//! Position tracking and nested-source management for lexical scanners.
//!
//! A tokenizer engine recognizes lexemes; this crate supplies everything around
//! it: a stack of active input sources (a file including another file, or a
//! string buffer), per-source line/column bookkeeping, and tokens that carry a
//! chain of ranges — one per nesting level — so diagnostics can say
//! "error at X, included from Y".
//!
//! ```
//! use lexnest::scan::{Scanner, tokenizer::LogosTokenizer};
//!
//! let mut scanner = Scanner::new(LogosTokenizer::new());
//! scanner.begin_from_string("abc").unwrap();
//! let token = scanner.read_token().unwrap().unwrap();
//! assert_eq!(token.text, "abc");
//! assert_eq!(token.location.innermost().unwrap().start.line, 1);
//! scanner.shutdown();
//! assert!(!scanner.is_scanning());
//! ```

pub mod scan;
