//! Tokenizer engine contract
//!
//! Lexical matching is external to this crate: an engine owns input buffers,
//! runs its recognition rules against the active one, and reports matches or
//! end-of-input. The scanner core never inspects matching rules; it only
//! reacts to the events defined here.
//!
//! [`crate::scan::tokenizer::LogosTokenizer`] is the shipped implementation;
//! tests also drive the scanner with scripted engines through this trait.

use std::fmt;
use std::io::Read;

/// Opaque handle to an input buffer owned by a tokenizer engine.
///
/// Handles are only meaningful to the engine that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BufferId(u64);

impl BufferId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// One matched unit of input: the engine's integer code plus the matched text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Lexeme {
    pub code: u32,
    pub text: String,
}

/// Error reported by a tokenizer engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A buffer could not be created or addressed.
    Buffer(String),
    /// Reading an input source into a buffer failed.
    Read(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Buffer(msg) => write!(f, "buffer error: {}", msg),
            EngineError::Read(msg) => write!(f, "read error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

/// The collaborator that performs lexical matching.
///
/// The scanner core drives an engine through exactly five operations: create
/// a buffer over text or over a drained reader, redirect matching to a
/// buffer, pull the next match from the active buffer, and release a buffer
/// once its context is popped. `next_match` returning `None` signals
/// end-of-input for the active buffer only; the scanner decides whether that
/// ends the session or resumes a parent source.
pub trait TokenizerEngine {
    /// Build a buffer over a private copy of `text`.
    fn create_buffer_from_text(&mut self, text: &[u8]) -> Result<BufferId, EngineError>;

    /// Build a buffer by draining `reader` to its end.
    ///
    /// The reader itself stays with the caller; only its content moves into
    /// the engine.
    fn create_buffer_from_reader(&mut self, reader: &mut dyn Read) -> Result<BufferId, EngineError>;

    /// Redirect subsequent matching to `buffer`.
    fn switch_to_buffer(&mut self, buffer: BufferId);

    /// Pull the next lexeme from the active buffer; `None` is end-of-input.
    fn next_match(&mut self) -> Option<Lexeme>;

    /// Release a buffer. The handle is dead afterwards.
    fn release_buffer(&mut self, buffer: BufferId);
}
