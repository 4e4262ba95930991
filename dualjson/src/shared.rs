// SPDX-License-Identifier: Apache-2.0

/// Shared components for the tokenizer and parser
use crate::tokenizer::TokenKind;

/// Which grammar governs a document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DocumentDialect {
    /// Decide from the first token: `{` or `[` means [`Strict`](Self::Strict),
    /// anything else means [`Simplified`](Self::Simplified).
    #[default]
    Unknown,
    /// Plain JSON: braced root, `:` separators, mandatory commas, quoted keys.
    Strict,
    /// Config style: optional braces around the root, `:` or `=` separators,
    /// optional commas, bare identifier keys.
    Simplified,
}

impl DocumentDialect {
    /// Resolves `Unknown` from the first token of the document.
    ///
    /// A dialect that is already known is returned unchanged.
    pub const fn detect(self, first: TokenKind) -> DocumentDialect {
        match self {
            DocumentDialect::Unknown => match first {
                TokenKind::CurlyLeft | TokenKind::BraceLeft => DocumentDialect::Strict,
                _ => DocumentDialect::Simplified,
            },
            known => known,
        }
    }

    /// True only for [`Strict`](Self::Strict); `=` separates keys otherwise.
    pub const fn is_strict(self) -> bool {
        matches!(self, DocumentDialect::Strict)
    }
}

/// Compile-time parser configuration.
///
/// The block size bounds how many bytes are requested from the [`Reader`](crate::Reader)
/// per block; the depth bounds container nesting.
pub trait ParserConfig {
    /// Capacity of one input block in bytes.
    const BLOCK_SIZE: usize;
    /// Deepest permitted nesting of objects and arrays.
    const MAX_DEPTH: usize;
}

/// Configuration with explicit block size and nesting depth.
///
/// # Example
/// ```
/// use dualjson::{parse_with_config, ChunkReader, Config, DocumentDialect};
///
/// // 64-byte blocks, at most 16 nested containers
/// let value = parse_with_config::<_, Config<64, 16>>(
///     ChunkReader::full_slice(b"[[1]]"),
///     None,
///     DocumentDialect::Unknown,
/// )
/// .unwrap();
/// assert_eq!(value.element(0).and_then(|v| v.element(0)).and_then(|v| v.as_f64()), Some(1.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Config<const BLOCK_SIZE: usize, const MAX_DEPTH: usize>;

impl<const BLOCK_SIZE: usize, const MAX_DEPTH: usize> ParserConfig for Config<BLOCK_SIZE, MAX_DEPTH> {
    const BLOCK_SIZE: usize = BLOCK_SIZE;
    const MAX_DEPTH: usize = MAX_DEPTH;
}

/// 1 KiB blocks and up to 512 nested containers.
pub type DefaultConfig = Config<1024, 512>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_first_token() {
        let unknown = DocumentDialect::Unknown;
        assert_eq!(unknown.detect(TokenKind::CurlyLeft), DocumentDialect::Strict);
        assert_eq!(unknown.detect(TokenKind::BraceLeft), DocumentDialect::Strict);
        assert_eq!(unknown.detect(TokenKind::Identifier), DocumentDialect::Simplified);
        assert_eq!(unknown.detect(TokenKind::String), DocumentDialect::Simplified);
        assert_eq!(unknown.detect(TokenKind::Eof), DocumentDialect::Simplified);
    }

    #[test]
    fn test_known_dialect_is_kept() {
        assert_eq!(
            DocumentDialect::Simplified.detect(TokenKind::CurlyLeft),
            DocumentDialect::Simplified
        );
        assert_eq!(
            DocumentDialect::Strict.detect(TokenKind::Identifier),
            DocumentDialect::Strict
        );
    }

    #[test]
    fn test_default_config() {
        assert_eq!(<DefaultConfig as ParserConfig>::BLOCK_SIZE, 1024);
        assert_eq!(<DefaultConfig as ParserConfig>::MAX_DEPTH, 512);
    }
}
