// SPDX-License-Identifier: Apache-2.0

mod number;
mod scanner;
mod token;

pub use scanner::Tokenizer;
pub use token::{Token, TokenKind};
