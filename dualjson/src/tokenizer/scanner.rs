// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use super::number::{Num, Step};
use super::token::{KeywordMatcher, Token, TokenKind};
use crate::block_pool::{BlockId, BlockPool, BlockPoolError, PoolStats};
use crate::parse_error::{ErrorKind, ParseError, UnexpectedState};
use crate::selection::{Cursor, Selection};
use crate::shared::{DefaultConfig, DocumentDialect, ParserConfig};
use crate::Reader;

/// Pulls bytes through a [`BlockPool`] and classifies them into tokens.
///
/// The tokenizer holds exactly one token at a time. Its text stays
/// addressable until the next [`advance`](Self::advance); callers that need
/// a selection to live longer must [`retain`](Self::retain) it.
pub struct Tokenizer<R: Reader, C: ParserConfig = DefaultConfig> {
    reader: R,
    pool: BlockPool<C>,
    /// Oldest block still in the chain
    head: Option<BlockId>,
    /// Block the read position is in
    current: Option<BlockId>,
    /// Offset of the next unread byte within `current`
    position: usize,
    /// Set once the reader has returned 0
    exhausted: bool,
    line: u32,
    column: u32,
    token: Token,
    /// Block pinned on behalf of the current token
    token_pin: Option<BlockId>,
}

impl<R: Reader> Tokenizer<R, DefaultConfig> {
    /// Create a tokenizer with 1 KiB blocks.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader)
    }
}

impl<R: Reader, C: ParserConfig> Tokenizer<R, C> {
    /// Create a tokenizer with a custom [`ParserConfig`].
    pub fn with_config(reader: R) -> Self {
        Self {
            reader,
            pool: BlockPool::new(),
            head: None,
            current: None,
            position: 0,
            exhausted: false,
            line: 1,
            column: 0,
            token: Token::eof(),
            token_pin: None,
        }
    }

    /// The current token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Line of the read position (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column of the read position (0-based).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Allocation counters of the underlying block pool.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Moves to the next non-comment token.
    ///
    /// Returns `Ok(false)` once input is exhausted, leaving an
    /// [`Eof`](TokenKind::Eof) token behind. `dialect` decides whether `=`
    /// is a separator.
    pub fn advance(&mut self, dialect: DocumentDialect) -> Result<bool, ParseError> {
        loop {
            self.release_token()?;
            self.skip_whitespace()?;

            let Some(c) = self.peek()? else {
                self.token = Token::eof();
                log::trace!("Tokenizer: EOF at {}:{}", self.line, self.column);
                return Ok(false);
            };

            let (line, column) = (self.line, self.column);
            let start = self.cursor()?;
            self.pin_token(start.block)?;

            let (kind, start) = match c {
                b'{' => self.single(TokenKind::CurlyLeft, start),
                b'}' => self.single(TokenKind::CurlyRight, start),
                b'[' => self.single(TokenKind::BraceLeft, start),
                b']' => self.single(TokenKind::BraceRight, start),
                b',' => self.single(TokenKind::Comma, start),
                c if is_separator(c, dialect) => self.single(TokenKind::Separator, start),
                b'-' => {
                    self.bump();
                    match self.peek()? {
                        Some(b'-') => (self.skip_comment()?, start),
                        Some(_) => (self.scan_number(dialect)?, start),
                        None => return self.fail(ErrorKind::UnexpectedEof),
                    }
                }
                b'+' => {
                    self.bump();
                    (self.scan_number(dialect)?, start)
                }
                b'0'..=b'9' => (self.scan_number(dialect)?, start),
                b'/' => {
                    self.bump();
                    match self.peek()? {
                        Some(b'/') => (self.skip_comment()?, start),
                        _ => {
                            let mut matcher = KeywordMatcher::new();
                            matcher.feed(b'/');
                            (self.scan_identifier(dialect, matcher)?, start)
                        }
                    }
                }
                b'"' => self.scan_string()?,
                _ => (self.scan_identifier(dialect, KeywordMatcher::new())?, start),
            };

            if kind == TokenKind::Comment {
                continue;
            }

            let selection = Selection {
                start,
                end: self.cursor()?,
                line,
                column,
            };
            if kind == TokenKind::String {
                // The closing quote is outside the selection
                self.bump();
            }
            log::trace!("Tokenizer: {} at {}:{}", kind, line, column);
            self.token = Token {
                kind,
                selection: Some(selection),
            };
            return Ok(true);
        }
    }

    /// Materializes the current token's text.
    pub fn current_text(&self) -> Result<String, ParseError> {
        match &self.token.selection {
            Some(selection) => self.text(selection),
            None => self.fail(ErrorKind::UnexpectedEof),
        }
    }

    /// Materializes any selection whose blocks are still live.
    pub fn text(&self, selection: &Selection) -> Result<String, ParseError> {
        selection
            .text(&self.pool)
            .map_err(|kind| ParseError::new(kind, selection.line, selection.column))
    }

    /// Pins the current token's blocks so its selection survives later
    /// [`advance`](Self::advance) calls. Hand it back with [`release`](Self::release).
    pub fn retain(&mut self) -> Result<Option<Selection>, ParseError> {
        let Some(selection) = self.token.selection.clone() else {
            return Ok(None);
        };
        self.pool
            .pin(selection.start.block)
            .or_else(|e| self.fail(e.into()))?;
        Ok(Some(selection))
    }

    /// Drops a pin taken by [`retain`](Self::retain). Blocks it kept alive are
    /// recycled by the next [`advance`](Self::advance).
    pub fn release(&mut self, selection: Selection) -> Result<(), ParseError> {
        if self.pool.generation(selection.start.block) != Some(selection.start.generation) {
            return ParseError::fail(
                ErrorKind::Unexpected(UnexpectedState::StaleSelection),
                selection.line,
                selection.column,
            );
        }
        self.pool
            .unpin(selection.start.block)
            .or_else(|e| self.fail(e.into()))
    }

    pub(crate) fn fail<T>(&self, kind: ErrorKind) -> Result<T, ParseError> {
        ParseError::fail(kind, self.line, self.column)
    }

    fn single(&mut self, kind: TokenKind, start: Cursor) -> (TokenKind, Cursor) {
        self.bump();
        (kind, start)
    }

    fn pin_token(&mut self, block: BlockId) -> Result<(), ParseError> {
        self.pool.pin(block).or_else(|e| self.fail(e.into()))?;
        self.token_pin = Some(block);
        Ok(())
    }

    /// Unpins the previous token and recycles every block it alone kept alive.
    fn release_token(&mut self) -> Result<(), ParseError> {
        self.token.selection = None;
        if let Some(block) = self.token_pin.take() {
            self.pool.unpin(block).or_else(|e| self.fail(e.into()))?;
        }
        self.recycle_consumed()
    }

    /// Recycles blocks from the head of the chain up to the current block,
    /// stopping early at the first pinned one.
    fn recycle_consumed(&mut self) -> Result<(), ParseError> {
        while let Some(head) = self.head {
            if Some(head) == self.current {
                break;
            }
            let next = self.pool.next(head);
            match self.pool.recycle(head) {
                Ok(()) => self.head = next,
                Err(BlockPoolError::Pinned) => break,
                Err(e) => return self.fail(e.into()),
            }
        }
        Ok(())
    }

    fn cursor(&self) -> Result<Cursor, ParseError> {
        let Some(block) = self.current else {
            return self.fail(ErrorKind::UnexpectedEof);
        };
        match self.pool.generation(block) {
            Some(generation) => Ok(Cursor {
                block,
                generation,
                offset: self.position,
            }),
            None => self.fail(ErrorKind::Unexpected(UnexpectedState::BlockNotLive)),
        }
    }

    /// Returns the next byte without consuming it, pulling a new block from
    /// the reader when the current one is used up.
    fn peek(&mut self) -> Result<Option<u8>, ParseError> {
        loop {
            if let Some(block) = self.current {
                if let Some(&b) = self.pool.data(block).get(self.position) {
                    return Ok(Some(b));
                }
            }
            if self.exhausted {
                return Ok(None);
            }

            let acquired = match self.pool.acquire_next_block(&mut self.reader) {
                Ok(acquired) => acquired,
                Err(e) => return self.fail(e.into()),
            };
            let Some(next) = acquired else {
                self.exhausted = true;
                return Ok(None);
            };
            if self.pool.data(next).len() < BlockPool::<C>::block_size() {
                // A short block means the reader already returned 0
                self.exhausted = true;
            }

            match self.current {
                Some(prev) => {
                    self.position = self.position.saturating_sub(self.pool.data(prev).len());
                    self.pool.link(prev, next).or_else(|e| self.fail(e.into()))?;
                }
                None => {
                    self.position = 0;
                    self.head = Some(next);
                }
            }
            self.current = Some(next);
            self.recycle_consumed()?;
        }
    }

    /// Consumes the byte under the read position, tracking line and column.
    fn bump(&mut self) {
        let Some(block) = self.current else {
            return;
        };
        let Some(&c) = self.pool.data(block).get(self.position) else {
            return;
        };
        if c == b'\n' {
            self.line = self.line.saturating_add(1);
            self.column = 0;
        } else if !c.is_ascii_control() {
            self.column = self.column.saturating_add(1);
        }
        self.position = self.position.saturating_add(1);
    }

    fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek()? {
            if !c.is_ascii_whitespace() {
                break;
            }
            self.bump();
        }
        Ok(())
    }

    /// Consumes a comment up to and including its newline. Comment text is
    /// never materialized, so its blocks are not pinned while it is skipped.
    fn skip_comment(&mut self) -> Result<TokenKind, ParseError> {
        self.release_token()?;
        while let Some(c) = self.peek()? {
            self.bump();
            if c == b'\n' {
                break;
            }
        }
        Ok(TokenKind::Comment)
    }

    /// Scans a quoted string. No escape processing: the content runs up to
    /// the next `"`. Returns the selection start (after the opening quote);
    /// the closing quote is left for the caller to consume.
    fn scan_string(&mut self) -> Result<(TokenKind, Cursor), ParseError> {
        self.bump();
        if self.peek()?.is_none() {
            return self.fail(ErrorKind::UnexpectedEof);
        }
        let start = self.cursor()?;
        loop {
            match self.peek()? {
                Some(b'"') => return Ok((TokenKind::String, start)),
                Some(_) => self.bump(),
                None => return self.fail(ErrorKind::UnexpectedEof),
            }
        }
    }

    /// Scans a number. Runs containing a byte that cannot belong to a number,
    /// or that stop before a required digit, become identifiers instead.
    fn scan_number(&mut self, dialect: DocumentDialect) -> Result<TokenKind, ParseError> {
        let mut state = Num::Sign;
        while let Some(c) = self.peek()? {
            if is_terminator(c, dialect) {
                break;
            }
            match state.step(c) {
                Step::Continue(next) => {
                    state = next;
                    self.bump();
                }
                Step::Reject => {
                    return self.scan_identifier(dialect, KeywordMatcher::rejected());
                }
            }
        }
        if state.is_complete() {
            Ok(TokenKind::Number)
        } else if self.peek()?.is_none() {
            self.fail(ErrorKind::UnexpectedEof)
        } else {
            Ok(TokenKind::Identifier)
        }
    }

    /// Scans an identifier up to the next terminator, reclassifying exact
    /// `true`/`false`/`null` runs as keywords. Input must not end mid-run.
    fn scan_identifier(
        &mut self,
        dialect: DocumentDialect,
        mut matcher: KeywordMatcher,
    ) -> Result<TokenKind, ParseError> {
        loop {
            match self.peek()? {
                Some(c) if is_terminator(c, dialect) => break,
                Some(c) => {
                    matcher.feed(c);
                    self.bump();
                }
                None => return self.fail(ErrorKind::UnexpectedEof),
            }
        }
        Ok(matcher.finish().unwrap_or(TokenKind::Identifier))
    }
}

const fn is_separator(c: u8, dialect: DocumentDialect) -> bool {
    c == b':' || (c == b'=' && !dialect.is_strict())
}

/// Bytes that end a number or identifier run.
const fn is_terminator(c: u8, dialect: DocumentDialect) -> bool {
    c.is_ascii_whitespace()
        || is_separator(c, dialect)
        || matches!(c, b'{' | b'}' | b'[' | b']' | b',')
}
