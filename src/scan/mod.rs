//! Nested-source scanning with multi-level position tracking
//!
//! The module tree mirrors the flow of a scan:
//! 1. `engine` defines the tokenizer engine contract (lexeme recognition is
//!    external to this crate; `tokenizer` ships a logos-backed engine).
//! 2. `context` owns the stack of active input sources and their line/column
//!    counters (`position`).
//! 3. `token` turns the stack into range chains and tokens.
//! 4. `scanner` is the facade that drives all of the above per `read_token`.

pub mod context;
pub mod engine;
pub mod error;
pub mod formatting;
pub mod position;
pub mod scanner;
pub mod token;
pub mod tokenizer;

pub use context::{Context, ContextOrigin, PopOutcome, SourceStack, STRING_SOURCE_NAME};
pub use engine::{BufferId, EngineError, Lexeme, TokenizerEngine};
pub use error::ScanError;
pub use formatting::include_trace;
pub use position::{Position, TrackedPosition};
pub use scanner::Scanner;
pub use token::{Range, RangeChain, Token};
