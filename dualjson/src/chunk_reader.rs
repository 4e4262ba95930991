// SPDX-License-Identifier: Apache-2.0

//! An in-memory [`Reader`] for documents already held as bytes.
//!
//! [`ChunkReader`] can hand out a whole slice at once or dribble it out in
//! fixed-size chunks. The chunked form is how the tests prove that token text
//! comes out the same no matter where block boundaries fall.
//!
//! For production use you will usually implement [`Reader`] for your own
//! source, or wrap a `std::io::Read` in [`IoReader`](crate::IoReader).
//!
//! # Examples
//!
//! ```rust
//! use dualjson::{parse, ChunkReader, DocumentDialect};
//!
//! let reader = ChunkReader::new(b"name = \"Alice\"\nage = 30", 4);
//! let value = parse(reader, None, DocumentDialect::Unknown).unwrap();
//! assert_eq!(value.get("age").and_then(|v| v.as_f64()), Some(30.0));
//! ```

use crate::Reader;

/// A [`Reader`] that reads from a byte slice, optionally in fixed-size chunks.
///
/// 1.  **Full slice**: [`ChunkReader::full_slice()`] fills as much of each
///     block as the data allows.
/// 2.  **Chunked**: [`ChunkReader::new()`] caps every `read()` at `chunk_size`
///     bytes, simulating network packets or short file reads.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Create a new chunked reader from a byte slice.
    ///
    /// Each call to `read()` returns at most `chunk_size` bytes (minimum 1),
    /// even if more data is available and the buffer can hold more.
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1), // Ensure at least 1 byte per read
        }
    }

    /// Create a new reader that consumes the entire byte slice as fast as the
    /// destination buffer allows.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl Reader for ChunkReader<'_> {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let to_copy = self.remaining().min(buf.len()).min(self.chunk_size);
        if to_copy == 0 {
            return Ok(0);
        }

        let end = self.pos.saturating_add(to_copy);
        match (buf.get_mut(..to_copy), self.data.get(self.pos..end)) {
            (Some(dest), Some(src)) => dest.copy_from_slice(src),
            _ => return Ok(0),
        }
        self.pos = end;
        Ok(to_copy)
    }
}
