// SPDX-License-Identifier: Apache-2.0

//! Streaming parser for JSON and a simplified, config-style JSON dialect.
//!
//! Input is pulled from a [`Reader`] into a pool of fixed-size blocks that
//! are recycled as soon as the tokenizer has moved past them, so memory use
//! stays flat however long the document is. The result is an owned [`Value`]
//! tree.
//!
//! ```
//! use dualjson::{parse_slice, DocumentDialect, Value};
//!
//! let strict = parse_slice(br#"{"a": 1, "b": [true, null]}"#, DocumentDialect::Unknown).unwrap();
//! assert_eq!(strict.get("a"), Some(&Value::Number(1.0)));
//!
//! let simplified = parse_slice(b"// settings\nname = \"demo\"\nretries = 3", DocumentDialect::Unknown).unwrap();
//! assert_eq!(simplified.get("name").and_then(Value::as_str), Some("demo"));
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[cfg(all(feature = "std", not(test)))]
extern crate std;

mod block_pool;
pub use block_pool::{BlockId, BlockPool, BlockPoolError, PoolStats};

mod chunk_reader;
pub use chunk_reader::ChunkReader;

mod definition;
pub use definition::{ArrayDefinition, DefinitionKind, ObjectDefinition, ValueDefinition};

mod number_parser;

mod parse_error;
pub use parse_error::{ErrorKind, ErrorLog, LoggerSink, ParseError, UnexpectedState};

mod parser;
pub use parser::{parse, parse_slice, parse_with_config};

mod reader;
#[cfg(feature = "std")]
pub use reader::IoReader;
pub use reader::Reader;

mod selection;
pub use selection::{Cursor, Selection};

mod shared;
pub use shared::{Config, DefaultConfig, DocumentDialect, ParserConfig};

mod tokenizer;
pub use tokenizer::{Token, TokenKind, Tokenizer};

mod value;
pub use value::{Array, Object, Value, ValueKind};
