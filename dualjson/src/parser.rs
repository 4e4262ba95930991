// SPDX-License-Identifier: Apache-2.0

use alloc::string::{String, ToString};

use crate::number_parser::parse_f64;
use crate::parse_error::{ErrorKind, ErrorLog, ParseError};
use crate::shared::{DefaultConfig, DocumentDialect, ParserConfig};
use crate::tokenizer::{TokenKind, Tokenizer};
use crate::value::{Array, Object, Value};
use crate::{ChunkReader, Reader};

const ROOT_START: &[TokenKind] = &[TokenKind::CurlyLeft, TokenKind::BraceLeft];
const VALUE_START: &[TokenKind] = &[
    TokenKind::CurlyLeft,
    TokenKind::BraceLeft,
    TokenKind::String,
    TokenKind::Number,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Null,
];
const STRICT_KEY: &[TokenKind] = &[TokenKind::String];
const SIMPLIFIED_KEY: &[TokenKind] = &[TokenKind::String, TokenKind::Identifier];
const SEPARATOR: &[TokenKind] = &[TokenKind::Separator];
const AFTER_MEMBER: &[TokenKind] = &[TokenKind::Comma, TokenKind::CurlyRight];
const AFTER_ELEMENT: &[TokenKind] = &[TokenKind::Comma, TokenKind::BraceRight];
const END_OF_INPUT: &[TokenKind] = &[TokenKind::Eof];

/// Parses one document from `reader` into an owned [`Value`].
///
/// `dialect` forces a grammar, or [`DocumentDialect::Unknown`] picks one from
/// the first token. On failure `error_log` (if any) receives the message and
/// position once, and the same error is returned.
///
/// # Example
/// ```
/// use dualjson::{parse, ChunkReader, DocumentDialect};
///
/// let value = parse(ChunkReader::full_slice(b"port = 8080"), None, DocumentDialect::Unknown).unwrap();
/// assert_eq!(value.get("port").and_then(|v| v.as_f64()), Some(8080.0));
/// ```
pub fn parse<R: Reader>(
    reader: R,
    error_log: Option<&mut dyn ErrorLog>,
    dialect: DocumentDialect,
) -> Result<Value, ParseError> {
    parse_with_config::<R, DefaultConfig>(reader, error_log, dialect)
}

/// Like [`parse`], with a custom block size and nesting limit.
pub fn parse_with_config<R: Reader, C: ParserConfig>(
    reader: R,
    error_log: Option<&mut dyn ErrorLog>,
    dialect: DocumentDialect,
) -> Result<Value, ParseError> {
    let result = Parser::<R, C>::start(reader, dialect).and_then(|mut parser| parser.parse_root());
    match result {
        Ok(value) => {
            log::debug!("Parser: document parsed as {}", value.kind());
            Ok(value)
        }
        Err(err) => {
            log::debug!("Parser: failed with {}", err);
            if let Some(sink) = error_log {
                sink.error(&err.kind().to_string(), err.line(), err.column());
            }
            Err(err)
        }
    }
}

/// Parses an in-memory document.
pub fn parse_slice(input: &[u8], dialect: DocumentDialect) -> Result<Value, ParseError> {
    parse(ChunkReader::full_slice(input), None, dialect)
}

/// Recursive-descent parser over a one-token lookahead.
struct Parser<R: Reader, C: ParserConfig> {
    tokenizer: Tokenizer<R, C>,
    /// Resolved from the first token, never `Unknown`
    dialect: DocumentDialect,
    depth: usize,
}

impl<R: Reader, C: ParserConfig> Parser<R, C> {
    /// Reads the first token and settles the dialect.
    fn start(reader: R, requested: DocumentDialect) -> Result<Self, ParseError> {
        let mut tokenizer = Tokenizer::with_config(reader);
        tokenizer.advance(requested)?;
        let dialect = requested.detect(tokenizer.token().kind);
        log::debug!("Parser: dialect {:?} (requested {:?})", dialect, requested);
        Ok(Self {
            tokenizer,
            dialect,
            depth: 0,
        })
    }

    fn kind(&self) -> TokenKind {
        self.tokenizer.token().kind
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.tokenizer.advance(self.dialect).map(|_| ())
    }

    /// Start of the current token, or the read position at end of input.
    fn token_position(&self) -> (u32, u32) {
        match &self.tokenizer.token().selection {
            Some(selection) => (selection.line, selection.column),
            None => (self.tokenizer.line(), self.tokenizer.column()),
        }
    }

    fn fail_at_token<T>(&self, kind: ErrorKind) -> Result<T, ParseError> {
        let (line, column) = self.token_position();
        ParseError::fail(kind, line, column)
    }

    fn unexpected<T>(&self, expected: &'static [TokenKind]) -> Result<T, ParseError> {
        match self.kind() {
            TokenKind::Eof => self.tokenizer.fail(ErrorKind::UnexpectedEof),
            found => self.fail_at_token(ErrorKind::UnexpectedToken { found, expected }),
        }
    }

    /// Consumes the current token if it is `kind`.
    fn expect(&mut self, kind: TokenKind, expected: &'static [TokenKind]) -> Result<(), ParseError> {
        if self.kind() != kind {
            return self.unexpected(expected);
        }
        self.advance()
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= C::MAX_DEPTH {
            return self.fail_at_token(ErrorKind::MaxDepthReached);
        }
        self.depth = self.depth.saturating_add(1);
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn parse_root(&mut self) -> Result<Value, ParseError> {
        let root = match (self.dialect, self.kind()) {
            (_, TokenKind::CurlyLeft) => self.parse_object()?,
            (DocumentDialect::Simplified, _) => {
                self.enter()?;
                let object = self.parse_members(TokenKind::Eof)?;
                self.leave();
                Value::Object(object)
            }
            (_, TokenKind::BraceLeft) => self.parse_array()?,
            _ => return self.unexpected(ROOT_START),
        };
        if self.kind() != TokenKind::Eof {
            return self.unexpected(END_OF_INPUT);
        }
        Ok(root)
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let value = match self.kind() {
            TokenKind::CurlyLeft => return self.parse_object(),
            TokenKind::BraceLeft => return self.parse_array(),
            TokenKind::String => Value::String(self.tokenizer.current_text()?),
            TokenKind::Number => {
                let text = self.tokenizer.current_text()?;
                match parse_f64(&text) {
                    Ok(number) => Value::Number(number),
                    Err(kind) => return self.fail_at_token(kind),
                }
            }
            TokenKind::True => Value::Boolean(true),
            TokenKind::False => Value::Boolean(false),
            TokenKind::Null => Value::Null,
            _ => return self.unexpected(VALUE_START),
        };
        self.advance()?;
        Ok(value)
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.expect(TokenKind::CurlyLeft, ROOT_START)?;
        let object = self.parse_members(TokenKind::CurlyRight)?;
        self.expect(TokenKind::CurlyRight, AFTER_MEMBER)?;
        self.leave();
        Ok(Value::Object(object))
    }

    /// Parses `key separator value` members up to (not including) `close`.
    fn parse_members(&mut self, close: TokenKind) -> Result<Object, ParseError> {
        let mut object = Object::new();
        while self.kind() != close {
            let (key, line, column) = self.parse_key()?;
            self.expect(TokenKind::Separator, SEPARATOR)?;
            let value = self.parse_value()?;
            if let Err((key, _)) = object.insert(key, value) {
                return ParseError::fail(ErrorKind::DuplicateKey(key), line, column);
            }
            self.after_item(close, AFTER_MEMBER, self.key_kinds())?;
        }
        Ok(object)
    }

    fn key_kinds(&self) -> &'static [TokenKind] {
        if self.dialect.is_strict() {
            STRICT_KEY
        } else {
            SIMPLIFIED_KEY
        }
    }

    /// Reads a member key, returning its text and start position.
    fn parse_key(&mut self) -> Result<(String, u32, u32), ParseError> {
        let kinds = self.key_kinds();
        if !kinds.contains(&self.kind()) {
            return self.unexpected(kinds);
        }
        let (line, column) = self.token_position();
        let key = self.tokenizer.current_text()?;
        self.advance()?;
        Ok((key, line, column))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.expect(TokenKind::BraceLeft, ROOT_START)?;
        let mut array = Array::new();
        while self.kind() != TokenKind::BraceRight {
            array.push(self.parse_value()?);
            self.after_item(TokenKind::BraceRight, AFTER_ELEMENT, VALUE_START)?;
        }
        self.expect(TokenKind::BraceRight, AFTER_ELEMENT)?;
        self.leave();
        Ok(Value::Array(array))
    }

    /// Applies the comma policy after an element or member.
    ///
    /// Strict documents need a comma before anything but `close` and reject a
    /// comma directly before `close`. Simplified documents take commas as
    /// optional.
    fn after_item(
        &mut self,
        close: TokenKind,
        separators: &'static [TokenKind],
        item_start: &'static [TokenKind],
    ) -> Result<(), ParseError> {
        let kind = self.kind();
        if kind == TokenKind::Comma {
            self.advance()?;
            if self.dialect.is_strict() && self.kind() == close {
                return self.unexpected(item_start);
            }
            return Ok(());
        }
        if self.dialect.is_strict() && kind != close {
            return self.unexpected(separators);
        }
        Ok(())
    }
}
