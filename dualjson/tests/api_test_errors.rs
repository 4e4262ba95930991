// SPDX-License-Identifier: Apache-2.0

// Error kinds, messages and positions reported by parse()

use dualjson::{parse, parse_slice, ChunkReader, DocumentDialect, ErrorKind, Reader, TokenKind};

fn parse_err(input: &str, dialect: DocumentDialect) -> dualjson::ParseError {
    parse_slice(input.as_bytes(), dialect).unwrap_err()
}

#[test_log::test]
fn test_duplicate_key() {
    let err = parse_err(r#"{"a":1,"a":2}"#, DocumentDialect::Unknown);
    assert_eq!(err.kind(), &ErrorKind::DuplicateKey("a".to_string()));
    assert_eq!(err.to_string(), "Duplicate key a at 1:7");

    let err = parse_err("name = 1\nname = 2", DocumentDialect::Unknown);
    assert_eq!(err.kind(), &ErrorKind::DuplicateKey("name".to_string()));
    assert_eq!((err.line(), err.column()), (2, 0));
}

#[test_log::test]
fn test_malformed_number_in_value_position() {
    let err = parse_err("[1.2.3]", DocumentDialect::Unknown);
    assert!(matches!(
        err.kind(),
        ErrorKind::UnexpectedToken {
            found: TokenKind::Identifier,
            ..
        }
    ));
    assert_eq!((err.line(), err.column()), (1, 1));
    assert_eq!(
        err.to_string(),
        "Unexpected identifier, expected `{`, `[`, string, number, true, false or null at 1:1"
    );
}

#[test_log::test]
fn test_truncated_string_points_at_end_of_input() {
    let input = r#"{"a": "unterm"#;
    let err = parse_err(input, DocumentDialect::Unknown);
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
    assert_eq!((err.line(), err.column()), (1, input.len() as u32));

    let input = "{\n  \"a\": \"line one\n  line two";
    let err = parse_err(input, DocumentDialect::Unknown);
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
    assert_eq!((err.line(), err.column()), (3, 10));
}

#[test_log::test]
fn test_unexpected_eof_while_tokens_required() {
    for input in ["{", "[", r#"{"a""#, r#"{"a":"#, "[1,", r#"{"a":1"#] {
        let err = parse_err(input, DocumentDialect::Strict);
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEof, "{input:?}");
        assert_eq!(err.line(), 1);
        assert_eq!(err.column(), input.len() as u32, "{input:?}");
    }
}

#[test_log::test]
fn test_unexpected_token_lists_alternatives() {
    let err = parse_err(r#"{"a" 1}"#, DocumentDialect::Strict);
    assert_eq!(err.to_string(), "Unexpected number, expected separator at 1:5");

    let err = parse_err("[1 2]", DocumentDialect::Strict);
    assert_eq!(err.to_string(), "Unexpected number, expected `,` or `]` at 1:3");

    let err = parse_err("}", DocumentDialect::Strict);
    assert_eq!(err.to_string(), "Unexpected `}`, expected `{` or `[` at 1:0");
}

#[test_log::test]
fn test_trailing_commas() {
    for input in ["[1,]", r#"{"a":1,}"#] {
        let err = parse_err(input, DocumentDialect::Strict);
        assert!(matches!(err.kind(), ErrorKind::UnexpectedToken { .. }), "{input}");
    }
    assert!(parse_slice(b"[1,]", DocumentDialect::Simplified).is_err());
    assert!(parse_slice(b"a = [1,]", DocumentDialect::Simplified).is_ok());
    assert!(parse_slice(b"{ a = 1, }", DocumentDialect::Simplified).is_ok());
}

#[test_log::test]
fn test_content_after_root() {
    let err = parse_err("[1] 2", DocumentDialect::Unknown);
    assert_eq!(
        err.kind(),
        &ErrorKind::UnexpectedToken {
            found: TokenKind::Number,
            expected: &[TokenKind::Eof]
        }
    );
}

#[test_log::test]
fn test_lone_minus_at_end() {
    let err = parse_err("a = -", DocumentDialect::Unknown);
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
}

#[test_log::test]
fn test_invalid_utf8_in_string() {
    let err = parse_slice(b"[\"a\xffb\"]", DocumentDialect::Unknown).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidUtf8(_)));
    assert_eq!((err.line(), err.column()), (1, 1));
}

#[test_log::test]
fn test_error_log_called_once_with_position() {
    let mut messages = Vec::new();
    let mut sink = |message: &str, line: u32, column: u32| {
        messages.push(format!("{line}:{column} {message}"));
    };
    let result = parse(
        ChunkReader::full_slice(b"x = [true false\n nope]"),
        Some(&mut sink),
        DocumentDialect::Unknown,
    );
    assert!(result.is_err());
    assert_eq!(
        messages,
        ["2:1 Unexpected identifier, expected `{`, `[`, string, number, true, false or null"]
    );
}

struct BrokenReader {
    good: &'static [u8],
}

impl Reader for BrokenReader {
    type Error = &'static str;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.good.is_empty() {
            return Err("connection reset");
        }
        let n = buf.len().min(self.good.len());
        buf[..n].copy_from_slice(&self.good[..n]);
        self.good = &self.good[n..];
        Ok(n)
    }
}

#[test_log::test]
fn test_reader_error_aborts_parse() {
    let err = parse(
        BrokenReader { good: b"{\"a\": [1, 2" },
        None,
        DocumentDialect::Unknown,
    )
    .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ReaderError);
}

#[test_log::test]
fn test_early_end_of_reader_is_eof() {
    // A reader that stops early looks like a truncated document
    let err = parse(ChunkReader::full_slice(b"{\"a\": [1, 2"), None, DocumentDialect::Unknown)
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
}
