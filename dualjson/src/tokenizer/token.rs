// SPDX-License-Identifier: Apache-2.0

use crate::selection::Selection;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    String,
    Number,
    /// `{`
    CurlyLeft,
    /// `}`
    CurlyRight,
    /// `[`
    BraceLeft,
    /// `]`
    BraceRight,
    /// `:`, or `=` outside the strict dialect
    Separator,
    Comma,
    /// `//` or `--` to end of line; never handed to the parser
    Comment,
    Eof,
    True,
    False,
    Null,
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::CurlyLeft => "`{`",
            TokenKind::CurlyRight => "`}`",
            TokenKind::BraceLeft => "`[`",
            TokenKind::BraceRight => "`]`",
            TokenKind::Separator => "separator",
            TokenKind::Comma => "`,`",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "EOF",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// The tokenizer's current lexical unit.
///
/// `selection` is `None` only for [`TokenKind::Eof`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub selection: Option<Selection>,
}

impl Token {
    pub(crate) const fn eof() -> Self {
        Token {
            kind: TokenKind::Eof,
            selection: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Keyword {
    True,
    False,
    Null,
}

impl Keyword {
    const ALL: [Keyword; 3] = [Keyword::True, Keyword::False, Keyword::Null];

    const fn as_str(&self) -> &'static [u8] {
        match self {
            Keyword::True => b"true",
            Keyword::False => b"false",
            Keyword::Null => b"null",
        }
    }

    const fn as_token_kind(&self) -> TokenKind {
        match self {
            Keyword::True => TokenKind::True,
            Keyword::False => TokenKind::False,
            Keyword::Null => TokenKind::Null,
        }
    }
}

/// Compares an identifier run against the keywords as it streams past,
/// one byte at a time, without buffering the run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeywordMatcher {
    /// Still-possible keywords, indexed like `Keyword::ALL`
    candidates: [bool; 3],
    consumed: usize,
}

impl KeywordMatcher {
    pub const fn new() -> Self {
        Self {
            candidates: [true; 3],
            consumed: 0,
        }
    }

    /// A matcher for a run that can no longer be a keyword.
    pub const fn rejected() -> Self {
        Self {
            candidates: [false; 3],
            consumed: 0,
        }
    }

    pub fn feed(&mut self, byte: u8) {
        for (candidate, keyword) in self.candidates.iter_mut().zip(Keyword::ALL.iter()) {
            *candidate = *candidate && keyword.as_str().get(self.consumed) == Some(&byte);
        }
        self.consumed = self.consumed.saturating_add(1);
    }

    /// The keyword spelled by the whole run, if any.
    pub fn finish(&self) -> Option<TokenKind> {
        self.candidates
            .iter()
            .zip(Keyword::ALL.iter())
            .find(|(candidate, keyword)| **candidate && keyword.as_str().len() == self.consumed)
            .map(|(_, keyword)| keyword.as_token_kind())
    }
}
