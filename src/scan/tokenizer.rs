//! Logos-backed tokenizer engine
//!
//! This module provides the crate's shipped [`TokenizerEngine`]: raw
//! tokenization is handled entirely by logos over in-engine buffers, one
//! cursor per buffer, so the scanner can switch between nested sources and
//! resume a parent exactly where its include directive left off.
//!
//! The raw token set is deliberately generic (words, numbers, punctuation,
//! whitespace, line breaks) plus an `include "path"` directive, which is the
//! one lexeme a front end reacts to by pushing a nested source. Whitespace
//! and line breaks are emitted as lexemes rather than skipped: the position
//! tracker advances once per reported match, so every consumed character must
//! pass through a match.

use crate::scan::engine::{BufferId, EngineError, Lexeme, TokenizerEngine};
use logos::Logos;
use std::collections::HashMap;
use std::io::Read;

/// Stable lexeme codes for the raw token set.
pub mod codes {
    /// Character no rule matched.
    pub const ERROR: u32 = 0;
    pub const WORD: u32 = 1;
    pub const NUMBER: u32 = 2;
    pub const PUNCT: u32 = 3;
    pub const WHITESPACE: u32 = 4;
    pub const NEWLINE: u32 = 5;
    /// `include "path"` directive; see [`include_path`](super::include_path).
    pub const INCLUDE: u32 = 6;
}

/// Raw token set recognized by [`LogosTokenizer`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    /// An include directive with a double-quoted path. Longer than the bare
    /// word `include`, so logos prefers it whenever the path is present.
    #[regex(r#"include[ \t]+"[^"\n]*""#)]
    IncludeDirective,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"[^ \t\r\nA-Za-z0-9_]")]
    Punct,
}

impl RawToken {
    pub fn code(self) -> u32 {
        match self {
            RawToken::IncludeDirective => codes::INCLUDE,
            RawToken::Word => codes::WORD,
            RawToken::Number => codes::NUMBER,
            RawToken::Whitespace => codes::WHITESPACE,
            RawToken::Newline => codes::NEWLINE,
            RawToken::Punct => codes::PUNCT,
        }
    }
}

/// Extract the quoted path from the text of an include directive lexeme.
///
/// Returns `None` when the text is not shaped like `include "path"`.
pub fn include_path(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("include")?;
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.strip_prefix('"')?.strip_suffix('"')
}

struct Buffer {
    text: String,
    cursor: usize,
}

/// Tokenizer engine driven by a logos lexer.
///
/// Buffers hold a private copy of their source and a cursor; `next_match`
/// lexes from the active buffer's cursor onward, so switching buffers
/// suspends one source mid-stream and resumes another.
pub struct LogosTokenizer {
    buffers: HashMap<BufferId, Buffer>,
    active: Option<BufferId>,
    next_id: u64,
}

impl LogosTokenizer {
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
            active: None,
            next_id: 0,
        }
    }

    fn insert_buffer(&mut self, text: String) -> BufferId {
        let id = BufferId::new(self.next_id);
        self.next_id += 1;
        self.buffers.insert(id, Buffer { text, cursor: 0 });
        id
    }
}

impl Default for LogosTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerEngine for LogosTokenizer {
    fn create_buffer_from_text(&mut self, text: &[u8]) -> Result<BufferId, EngineError> {
        let text = std::str::from_utf8(text)
            .map_err(|err| EngineError::Buffer(format!("input is not valid UTF-8: {}", err)))?;
        Ok(self.insert_buffer(text.to_string()))
    }

    fn create_buffer_from_reader(&mut self, reader: &mut dyn Read) -> Result<BufferId, EngineError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|err| EngineError::Read(err.to_string()))?;
        Ok(self.insert_buffer(text))
    }

    fn switch_to_buffer(&mut self, buffer: BufferId) {
        if self.buffers.contains_key(&buffer) {
            self.active = Some(buffer);
        }
    }

    fn next_match(&mut self) -> Option<Lexeme> {
        let buffer = self.buffers.get_mut(&self.active?)?;
        if buffer.cursor >= buffer.text.len() {
            return None;
        }

        let mut lexer = RawToken::lexer(&buffer.text[buffer.cursor..]);
        let result = lexer.next()?;
        let span = lexer.span();
        let text = buffer.text[buffer.cursor + span.start..buffer.cursor + span.end].to_string();
        buffer.cursor += span.end;

        let code = match result {
            Ok(token) => token.code(),
            Err(()) => codes::ERROR,
        };
        Some(Lexeme { code, text })
    }

    fn release_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        if self.active == Some(buffer) {
            self.active = None;
        }
    }
}
