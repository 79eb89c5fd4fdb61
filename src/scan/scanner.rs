//! Scanner facade
//!
//! [`Scanner`] is the single entry point of the crate: it owns a tokenizer
//! engine and a [`SourceStack`], and drives one pull-based scan session at a
//! time. Each `read_token` pulls a match from the engine, advances the active
//! source's position, and produces a [`Token`] whose range chain mirrors the
//! stack at that exact moment. End-of-input on a nested source pops back to
//! the parent transparently; the session only ends when the stack drains.
//!
//! A scanner is an explicit session object: independent scanners are
//! independent sessions, and nothing here is global. Sessions are
//! single-threaded and not reentrant — an include push must happen as a
//! direct reaction to a matched lexeme, never during an in-flight read.

use crate::scan::context::{PopOutcome, SourceStack};
use crate::scan::engine::{Lexeme, TokenizerEngine};
use crate::scan::error::ScanError;
use crate::scan::token::{self, Token};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Scanning,
    ShuttingDown,
}

/// Pull-based scanner over nested input sources.
pub struct Scanner<E: TokenizerEngine> {
    engine: E,
    stack: SourceStack,
    state: ScanState,
    last: Option<Lexeme>,
}

impl<E: TokenizerEngine> Scanner<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            stack: SourceStack::new(),
            state: ScanState::Idle,
            last: None,
        }
    }

    /// Whether a session is currently active.
    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::Scanning
    }

    /// Current include nesting depth (0 when idle).
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Begin a session over a private copy of `text`.
    ///
    /// Fails with [`ScanError::AlreadyScanning`] if a session is active,
    /// leaving it untouched.
    pub fn begin_from_string(&mut self, text: &str) -> Result<(), ScanError> {
        if self.is_scanning() {
            return Err(ScanError::AlreadyScanning);
        }
        self.stack.begin_from_string(&mut self.engine, text)?;
        self.state = ScanState::Scanning;
        Ok(())
    }

    /// Begin a session over a file opened here and closed automatically when
    /// its context pops.
    pub fn begin_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        if self.is_scanning() {
            return Err(ScanError::AlreadyScanning);
        }
        self.stack.begin_from_path(&mut self.engine, path.as_ref())?;
        self.state = ScanState::Scanning;
        Ok(())
    }

    /// Begin a session over a reader the caller keeps ownership of; it is
    /// never closed by this crate.
    pub fn begin_from_reader(&mut self, name: &str, reader: &mut dyn Read) -> Result<(), ScanError> {
        if self.is_scanning() {
            return Err(ScanError::AlreadyScanning);
        }
        self.stack
            .begin_from_reader(&mut self.engine, name, reader)?;
        self.state = ScanState::Scanning;
        Ok(())
    }

    /// Nest an included file on top of the active session.
    ///
    /// Only valid as a direct reaction to a matched lexeme (typically an
    /// include directive); requires an active session.
    pub fn push_include(&mut self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        if !self.is_scanning() {
            return Err(ScanError::NotScanning);
        }
        self.stack.push_include(&mut self.engine, path.as_ref())
    }

    /// [`push_include`](Self::push_include) with the path as an unterminated
    /// byte slice, as matched by the engine.
    pub fn push_include_from_slice(&mut self, path: &[u8]) -> Result<(), ScanError> {
        if !self.is_scanning() {
            return Err(ScanError::NotScanning);
        }
        self.stack.push_include_from_slice(&mut self.engine, path)
    }

    /// Pull the next token from the session.
    ///
    /// `Ok(None)` is end-of-input for the whole session: every nested source
    /// has drained and the scanner is idle again. End-of-input on a nested
    /// source is handled internally by resuming the parent.
    pub fn read_token(&mut self) -> Result<Option<Token>, ScanError> {
        if !self.is_scanning() {
            return Err(ScanError::NotScanning);
        }
        loop {
            match self.engine.next_match() {
                Some(lexeme) => {
                    let Some(context) = self.stack.top_mut() else {
                        return Err(ScanError::NotScanning);
                    };
                    context.position_mut().advance(&lexeme.text);
                    let built = token::build_token(&self.stack, lexeme.code, &lexeme.text);
                    self.last = Some(lexeme);
                    return Ok(Some(built));
                }
                None => match self.stack.pop_on_end_of_input(&mut self.engine) {
                    PopOutcome::Resumed => continue,
                    PopOutcome::SessionEnded => {
                        debug!("session ended, all sources drained");
                        self.state = ScanState::Idle;
                        self.last = None;
                        return Ok(None);
                    }
                },
            }
        }
    }

    /// Rebuild a token for the most recent lexeme without consuming input.
    ///
    /// The range chain is re-derived from the current stack state.
    pub fn last_token(&self) -> Result<Token, ScanError> {
        if !self.is_scanning() {
            return Err(ScanError::NotScanning);
        }
        match &self.last {
            Some(lexeme) => Ok(token::build_token(&self.stack, lexeme.code, &lexeme.text)),
            None => Err(ScanError::NoToken),
        }
    }

    /// Tear the session down, releasing every context LIFO, from any state.
    ///
    /// Idempotent: shutting down an idle scanner does nothing.
    pub fn shutdown(&mut self) {
        if self.state == ScanState::Idle && self.stack.is_empty() {
            return;
        }
        debug!(depth = self.stack.depth(), "shutting down scan session");
        self.state = ScanState::ShuttingDown;
        self.stack.drain(&mut self.engine);
        self.last = None;
        self.state = ScanState::Idle;
    }

    /// Access the underlying engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

impl<E: TokenizerEngine> Drop for Scanner<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
