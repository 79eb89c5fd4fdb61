//! Input contexts and the stack of active sources
//!
//! A [`Context`] is one active input source: a file opened here, a file the
//! caller keeps ownership of, or a string buffer. Each context exclusively
//! owns its display name, its engine buffer handle, and (for owned files) the
//! open file, all released exactly when the context is popped.
//!
//! [`SourceStack`] owns the contexts in LIFO order. Begin operations create
//! the sole bottom element; include pushes nest a new source on top of an
//! existing session; end-of-input pops back to the parent and redirects the
//! engine to the parent's buffer.
//!
//! ## Failure guarantee
//!
//! Construction failures never leave a partially built context on the stack.
//! The order is: open the source, build the engine buffer, and only then push
//! and redirect. An open file dropped on the error path closes itself; a
//! buffer is only created as the last fallible step, so nothing leaks.

use crate::scan::engine::{BufferId, TokenizerEngine};
use crate::scan::error::ScanError;
use crate::scan::position::TrackedPosition;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace};

/// Display name recorded for string-buffer sources.
pub const STRING_SOURCE_NAME: &str = "-";

/// How a context's input entered the scanner, and what it owns.
#[derive(Debug)]
pub enum ContextOrigin {
    /// File opened by this crate; held so the descriptor is released exactly
    /// when the context pops.
    OwnedFile { file: File },
    /// File owned by the caller; never closed here.
    UnownedFile,
    /// In-memory text with the sentinel display name.
    StringBuffer,
}

/// One active input source with its position bookkeeping.
#[derive(Debug)]
pub struct Context {
    name: String,
    origin: ContextOrigin,
    position: TrackedPosition,
    buffer: BufferId,
}

impl Context {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &ContextOrigin {
        &self.origin
    }

    pub fn position(&self) -> &TrackedPosition {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut TrackedPosition {
        &mut self.position
    }

    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    /// Release everything this context owns: the engine buffer and, for owned
    /// files, the file itself.
    fn release<E: TokenizerEngine>(self, engine: &mut E) {
        engine.release_buffer(self.buffer);
        if let ContextOrigin::OwnedFile { file } = self.origin {
            drop(file);
        }
    }
}

/// Outcome of popping the top context on end-of-input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopOutcome {
    /// A parent context exists; the engine has been redirected to its buffer.
    Resumed,
    /// The stack drained; the session is over.
    SessionEnded,
}

/// LIFO stack of active input sources.
///
/// The top of the stack (most recent include) sits at the back of the vec.
#[derive(Debug, Default)]
pub struct SourceStack {
    contexts: Vec<Context>,
}

impl SourceStack {
    pub fn new() -> Self {
        Self {
            contexts: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn top(&self) -> Option<&Context> {
        self.contexts.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Context> {
        self.contexts.last_mut()
    }

    /// Contexts from the currently active source down to the original entry
    /// point.
    pub fn iter_top_down(&self) -> impl Iterator<Item = &Context> {
        self.contexts.iter().rev()
    }

    /// Begin a session over a private copy of `text`.
    pub fn begin_from_string<E: TokenizerEngine>(
        &mut self,
        engine: &mut E,
        text: &str,
    ) -> Result<(), ScanError> {
        if !self.is_empty() {
            return Err(ScanError::AlreadyScanning);
        }
        self.push_string(engine, text)
    }

    /// Begin a session over a file opened (and later closed) by this crate.
    pub fn begin_from_path<E: TokenizerEngine>(
        &mut self,
        engine: &mut E,
        path: &Path,
    ) -> Result<(), ScanError> {
        if !self.is_empty() {
            return Err(ScanError::AlreadyScanning);
        }
        self.push_path(engine, path)
    }

    /// Begin a session over a reader the caller retains ownership of.
    pub fn begin_from_reader<E: TokenizerEngine>(
        &mut self,
        engine: &mut E,
        name: &str,
        reader: &mut dyn Read,
    ) -> Result<(), ScanError> {
        if !self.is_empty() {
            return Err(ScanError::AlreadyScanning);
        }
        let buffer = engine.create_buffer_from_reader(reader)?;
        self.install(engine, name.to_string(), ContextOrigin::UnownedFile, buffer);
        Ok(())
    }

    /// Push an included file onto an existing session.
    pub fn push_include<E: TokenizerEngine>(
        &mut self,
        engine: &mut E,
        path: &Path,
    ) -> Result<(), ScanError> {
        if self.is_empty() {
            return Err(ScanError::NotScanning);
        }
        self.push_path(engine, path)
    }

    /// Push an included file whose path arrives as an unterminated byte
    /// slice, as matched by the engine.
    pub fn push_include_from_slice<E: TokenizerEngine>(
        &mut self,
        engine: &mut E,
        path: &[u8],
    ) -> Result<(), ScanError> {
        let path = std::str::from_utf8(path).map_err(|err| ScanError::FileOpen {
            path: String::from_utf8_lossy(path).into_owned(),
            reason: format!("path is not valid UTF-8: {}", err),
        })?;
        self.push_include(engine, Path::new(path))
    }

    /// Pop the top context on end-of-input and release everything it owns.
    ///
    /// When a parent remains, the engine is redirected to its buffer so the
    /// parent resumes exactly where its include directive left off.
    pub fn pop_on_end_of_input<E: TokenizerEngine>(&mut self, engine: &mut E) -> PopOutcome {
        if let Some(top) = self.contexts.pop() {
            trace!(source = %top.name(), "popping exhausted source");
            top.release(engine);
        }
        match self.contexts.last() {
            Some(parent) => {
                engine.switch_to_buffer(parent.buffer());
                PopOutcome::Resumed
            }
            None => PopOutcome::SessionEnded,
        }
    }

    /// Pop and release every remaining context, most recent first.
    pub fn drain<E: TokenizerEngine>(&mut self, engine: &mut E) {
        while let Some(top) = self.contexts.pop() {
            top.release(engine);
        }
    }

    fn push_string<E: TokenizerEngine>(
        &mut self,
        engine: &mut E,
        text: &str,
    ) -> Result<(), ScanError> {
        let buffer = engine.create_buffer_from_text(text.as_bytes())?;
        self.install(
            engine,
            STRING_SOURCE_NAME.to_string(),
            ContextOrigin::StringBuffer,
            buffer,
        );
        Ok(())
    }

    fn push_path<E: TokenizerEngine>(
        &mut self,
        engine: &mut E,
        path: &Path,
    ) -> Result<(), ScanError> {
        let name = path.display().to_string();
        let mut file = File::open(path).map_err(|err| ScanError::FileOpen {
            path: name.clone(),
            reason: err.to_string(),
        })?;
        // On a buffer failure the file drops here and closes itself; nothing
        // has touched the stack yet.
        let buffer = engine.create_buffer_from_reader(&mut file)?;
        self.install(engine, name, ContextOrigin::OwnedFile { file }, buffer);
        Ok(())
    }

    fn install<E: TokenizerEngine>(
        &mut self,
        engine: &mut E,
        name: String,
        origin: ContextOrigin,
        buffer: BufferId,
    ) {
        debug!(source = %name, depth = self.depth() + 1, "entering source");
        self.contexts.push(Context {
            name,
            origin,
            position: TrackedPosition::start(),
            buffer,
        });
        engine.switch_to_buffer(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::tokenizer::LogosTokenizer;
    use std::io::Write;

    #[test]
    fn test_begin_from_string_is_sole_element() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();

        stack.begin_from_string(&mut engine, "abc").unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().unwrap().name(), STRING_SOURCE_NAME);
    }

    #[test]
    fn test_second_begin_rejected_without_mutation() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        stack.begin_from_string(&mut engine, "abc").unwrap();

        let err = stack.begin_from_string(&mut engine, "xyz").unwrap_err();
        assert_eq!(err, ScanError::AlreadyScanning);
        assert_eq!(stack.depth(), 1);
        // The active buffer still belongs to the original session.
        assert_eq!(engine.next_match().unwrap().text, "abc");
    }

    #[test]
    fn test_include_requires_session() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        let err = stack
            .push_include(&mut engine, Path::new("anything.inc"))
            .unwrap_err();
        assert_eq!(err, ScanError::NotScanning);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_missing_path_leaves_stack_untouched() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        let err = stack
            .begin_from_path(&mut engine, Path::new("/no/such/file.inc"))
            .unwrap_err();
        assert!(matches!(err, ScanError::FileOpen { .. }));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_missing_include_leaves_parent_active() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        stack.begin_from_string(&mut engine, "abc").unwrap();

        let err = stack
            .push_include(&mut engine, Path::new("/no/such/file.inc"))
            .unwrap_err();
        assert!(matches!(err, ScanError::FileOpen { .. }));
        assert_eq!(stack.depth(), 1);
        assert_eq!(engine.next_match().unwrap().text, "abc");
    }

    #[test]
    fn test_pop_resumes_parent_buffer() {
        let mut included = tempfile::NamedTempFile::new().unwrap();
        write!(included, "inner").unwrap();

        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        stack.begin_from_string(&mut engine, "outer rest").unwrap();
        assert_eq!(engine.next_match().unwrap().text, "outer");

        stack.push_include(&mut engine, included.path()).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(engine.next_match().unwrap().text, "inner");
        assert_eq!(engine.next_match(), None);

        assert_eq!(stack.pop_on_end_of_input(&mut engine), PopOutcome::Resumed);
        assert_eq!(stack.depth(), 1);
        // Parent resumes after the already-consumed "outer".
        assert_eq!(engine.next_match().unwrap().text, " ");
        assert_eq!(engine.next_match().unwrap().text, "rest");

        assert_eq!(
            stack.pop_on_end_of_input(&mut engine),
            PopOutcome::SessionEnded
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn test_include_from_slice_rejects_invalid_utf8() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        stack.begin_from_string(&mut engine, "abc").unwrap();

        let err = stack
            .push_include_from_slice(&mut engine, &[0xff, 0xfe])
            .unwrap_err();
        assert!(matches!(err, ScanError::FileOpen { .. }));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_begin_from_reader_leaves_reader_with_caller() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        let mut reader = std::io::Cursor::new("abc".as_bytes().to_vec());

        stack
            .begin_from_reader(&mut engine, "caller.inc", &mut reader)
            .unwrap();
        assert_eq!(stack.top().unwrap().name(), "caller.inc");
        assert!(matches!(
            stack.top().unwrap().origin(),
            ContextOrigin::UnownedFile
        ));

        stack.drain(&mut engine);
        // Still usable by the caller after the session is gone.
        assert_eq!(reader.into_inner(), b"abc");
    }

    #[test]
    fn test_drain_releases_all_levels() {
        let mut engine = LogosTokenizer::new();
        let mut stack = SourceStack::new();
        stack.begin_from_string(&mut engine, "abc").unwrap();

        let mut inner = tempfile::NamedTempFile::new().unwrap();
        write!(inner, "xyz").unwrap();
        stack.push_include(&mut engine, inner.path()).unwrap();

        stack.drain(&mut engine);
        assert!(stack.is_empty());
        assert_eq!(engine.next_match(), None);
    }
}
