// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;

use crate::block_pool::{BlockId, BlockPool};
use crate::parse_error::UnexpectedState;
use crate::shared::ParserConfig;

/// A position inside a specific generation of a pooled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub block: BlockId,
    pub generation: u32,
    pub offset: usize,
}

/// A span of input bytes that may cross block boundaries.
///
/// Selections are lazy: nothing is copied until [`bytes`](Self::bytes) or
/// [`text`](Self::text) is called. They stay valid only while their start
/// block is live, which the tokenizer guarantees by pinning it; a selection
/// that outlives its blocks reports [`UnexpectedState::StaleSelection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: Cursor,
    pub end: Cursor,
    /// Line of the token this selection belongs to (1-based)
    pub line: u32,
    /// Column of the token this selection belongs to (0-based)
    pub column: u32,
}

impl Selection {
    fn check<C: ParserConfig>(&self, pool: &BlockPool<C>) -> Result<(), UnexpectedState> {
        for cursor in [&self.start, &self.end] {
            if !pool.is_live(cursor.block) || pool.generation(cursor.block) != Some(cursor.generation)
            {
                return Err(UnexpectedState::StaleSelection);
            }
        }
        Ok(())
    }

    /// Calls `visit` with each block's share of the span, first block to last.
    fn for_each_part<'p, C: ParserConfig>(
        &self,
        pool: &'p BlockPool<C>,
        mut visit: impl FnMut(&'p [u8]),
    ) -> Result<(), UnexpectedState> {
        self.check(pool)?;
        let mut current = self.start.block;
        let mut from = self.start.offset;
        while current != self.end.block {
            let data = pool.data(current);
            visit(data.get(from..).unwrap_or(&[]));
            current = pool.next(current).ok_or(UnexpectedState::StaleSelection)?;
            from = 0;
        }
        let data = pool.data(current);
        let to = self.end.offset.min(data.len());
        visit(data.get(from..to).unwrap_or(&[]));
        Ok(())
    }

    /// Number of bytes spanned.
    pub fn len<C: ParserConfig>(&self, pool: &BlockPool<C>) -> Result<usize, UnexpectedState> {
        let mut total = 0usize;
        self.for_each_part(pool, |part| total = total.saturating_add(part.len()))?;
        Ok(total)
    }

    /// Copies the spanned bytes into one buffer, sized exactly once up front.
    pub fn bytes<C: ParserConfig>(&self, pool: &BlockPool<C>) -> Result<Vec<u8>, UnexpectedState> {
        let mut result = Vec::with_capacity(self.len(pool)?);
        self.for_each_part(pool, |part| result.extend_from_slice(part))?;
        Ok(result)
    }

    /// Materializes the span as an owned string.
    pub fn text<C: ParserConfig>(
        &self,
        pool: &BlockPool<C>,
    ) -> Result<String, crate::parse_error::ErrorKind> {
        let bytes = self.bytes(pool)?;
        String::from_utf8(bytes).map_err(|e| e.utf8_error().into())
    }
}
