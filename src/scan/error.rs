//! Errors reported by scan sessions
//!
//! End-of-input is never represented here: it is normal control flow,
//! surfaced as `None` from [`Scanner::read_token`](crate::scan::Scanner::read_token).

use crate::scan::engine::EngineError;
use std::fmt;

/// Error that can occur while managing a scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A begin operation was requested while a session is already active.
    /// No existing state is mutated.
    AlreadyScanning,
    /// A read, include push, or last-token request arrived with no active
    /// session.
    NotScanning,
    /// `last_token` was requested before any lexeme was produced.
    NoToken,
    /// A path could not be opened for reading. No context was created.
    FileOpen { path: String, reason: String },
    /// The tokenizer engine failed to build or redirect a buffer. Always
    /// propagated; any partially built context is unwound first.
    Buffer(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::AlreadyScanning => write!(f, "a scan session is already active"),
            ScanError::NotScanning => write!(f, "no scan session is active"),
            ScanError::NoToken => write!(f, "no lexeme has been produced yet"),
            ScanError::FileOpen { path, reason } => {
                write!(f, "cannot open {}: {}", path, reason)
            }
            ScanError::Buffer(msg) => write!(f, "tokenizer buffer error: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {}

impl From<EngineError> for ScanError {
    fn from(err: EngineError) -> Self {
        ScanError::Buffer(err.to_string())
    }
}
