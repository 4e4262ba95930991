// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use crate::block_pool::BlockPoolError;
use crate::tokenizer::TokenKind;

/// Internal invariant violations between the block pool and the tokenizer.
///
/// These never arise from malformed input; seeing one means a selection
/// outlived the blocks it was pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnexpectedState {
    /// A selection refers to a block that has been recycled since it was made.
    StaleSelection,
    /// A pinned block was offered for recycling.
    BlockPinned,
    /// A block handle does not name a live block.
    BlockNotLive,
}

/// What went wrong during a parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Input ended inside a string, after a lone sign, or while more tokens were required.
    UnexpectedEof,
    /// The current token is not one of the tokens the grammar permits here.
    UnexpectedToken {
        found: TokenKind,
        expected: &'static [TokenKind],
    },
    /// An object member repeats a key already present in the same object.
    DuplicateKey(String),
    /// Containers are nested deeper than the configured maximum.
    MaxDepthReached,
    /// A number token could not be converted to a floating point value.
    InvalidNumber,
    /// Token text is not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
    /// The reader reported an error (I/O error, not end-of-stream).
    ReaderError,
    /// The parser entered an unexpected internal state.
    Unexpected(UnexpectedState),
}

/// A fatal parse error with the 1-based line and 0-based column where it occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
    line: u32,
    column: u32,
}

impl ParseError {
    pub fn new(kind: ErrorKind, line: u32, column: u32) -> Self {
        Self { kind, line, column }
    }

    /// Shorthand for returning an error from a `Result`-producing function.
    pub fn fail<T>(kind: ErrorKind, line: u32, column: u32) -> Result<T, Self> {
        Err(Self::new(kind, line, column))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

impl From<BlockPoolError> for ErrorKind {
    fn from(err: BlockPoolError) -> Self {
        match err {
            BlockPoolError::ReaderError => ErrorKind::ReaderError,
            BlockPoolError::Pinned => ErrorKind::Unexpected(UnexpectedState::BlockPinned),
            BlockPoolError::NotLive => ErrorKind::Unexpected(UnexpectedState::BlockNotLive),
        }
    }
}

impl From<UnexpectedState> for ErrorKind {
    fn from(info: UnexpectedState) -> Self {
        ErrorKind::Unexpected(info)
    }
}

impl From<core::str::Utf8Error> for ErrorKind {
    fn from(err: core::str::Utf8Error) -> Self {
        ErrorKind::InvalidUtf8(err)
    }
}

/// Writes `a`, `a or b`, `a, b or c`.
fn write_alternatives(f: &mut core::fmt::Formatter<'_>, kinds: &[TokenKind]) -> core::fmt::Result {
    let last = kinds.len().saturating_sub(1);
    for (i, kind) in kinds.iter().enumerate() {
        if i == 0 {
            write!(f, "{kind}")?;
        } else if i == last {
            write!(f, " or {kind}")?;
        } else {
            write!(f, ", {kind}")?;
        }
    }
    Ok(())
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorKind::UnexpectedEof => write!(f, "Unexpected EOF"),
            ErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "Unexpected {found}, expected ")?;
                write_alternatives(f, expected)
            }
            ErrorKind::DuplicateKey(key) => write!(f, "Duplicate key {key}"),
            ErrorKind::MaxDepthReached => write!(f, "Maximum nesting depth reached"),
            ErrorKind::InvalidNumber => write!(f, "Invalid number"),
            ErrorKind::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {e}"),
            ErrorKind::ReaderError => write!(f, "Reader error"),
            ErrorKind::Unexpected(state) => write!(f, "Unexpected internal state: {state:?}"),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.column)
    }
}

impl core::error::Error for ParseError {}

/// Receives the message of a fatal parse error.
///
/// Invoked at most once per parse, with the same line and column the returned
/// [`ParseError`] carries.
pub trait ErrorLog {
    fn error(&mut self, message: &str, line: u32, column: u32);
}

impl<F> ErrorLog for F
where
    F: FnMut(&str, u32, u32),
{
    fn error(&mut self, message: &str, line: u32, column: u32) {
        self(message, line, column)
    }
}

/// An [`ErrorLog`] that forwards to the `log` facade at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggerSink;

impl ErrorLog for LoggerSink {
    fn error(&mut self, message: &str, line: u32, column: u32) {
        log::error!("{message} at line {line}, column {column}");
    }
}
