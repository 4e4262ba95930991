// SPDX-License-Identifier: Apache-2.0

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::shared::{DefaultConfig, ParserConfig};
use crate::Reader;

/// Error types for BlockPool operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPoolError {
    /// The reader returned an error while a block was being filled
    ReaderError,
    /// The block is pinned by a live selection and cannot be recycled
    Pinned,
    /// The block is already on the free list
    NotLive,
}

/// Handle to a block in the pool's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(usize);

impl BlockId {
    /// Slot of the block in the pool's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Allocation counters, see [`BlockPool::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Blocks ever allocated; storage is only released when the pool is dropped.
    pub allocated: usize,
    /// Blocks currently waiting on the free list.
    pub free: usize,
}

impl PoolStats {
    /// Blocks currently holding input.
    pub fn live(&self) -> usize {
        self.allocated.saturating_sub(self.free)
    }
}

struct Block {
    data: Box<[u8]>,
    /// Valid bytes at the start of `data`
    len: usize,
    next: Option<BlockId>,
    /// Bumped every time the block is recycled, invalidating old cursors
    generation: u32,
    pins: u32,
    live: bool,
}

/// Fixed-size input blocks kept in an arena and recycled through a free list.
///
/// Blocks filled from the [`Reader`] are linked into a chain by the tokenizer.
/// Once every byte of a block has been consumed and nothing pins it, it goes
/// back on the free list and is handed out again by the next
/// [`acquire_next_block`](Self::acquire_next_block). Steady-state streaming
/// therefore touches a small constant number of blocks however long the input is.
pub struct BlockPool<C: ParserConfig = DefaultConfig> {
    blocks: Vec<Block>,
    free: Vec<BlockId>,
    _config: PhantomData<C>,
}

impl<C: ParserConfig> Default for BlockPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ParserConfig> BlockPool<C> {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            free: Vec::new(),
            _config: PhantomData,
        }
    }

    /// Capacity of every block in this pool.
    pub const fn block_size() -> usize {
        if C::BLOCK_SIZE == 0 {
            1
        } else {
            C::BLOCK_SIZE
        }
    }

    /// Takes a block from the free list (or allocates one) and fills it from `reader`.
    ///
    /// The reader is called until the block is full or it returns 0. A partly
    /// filled block is still returned; `None` means the reader had nothing left.
    pub fn acquire_next_block<R: Reader>(
        &mut self,
        reader: &mut R,
    ) -> Result<Option<BlockId>, BlockPoolError> {
        let id = self.take_block();
        let block = self.block_mut(id)?;

        while block.len < block.data.len() {
            let Some(dest) = block.data.get_mut(block.len..) else {
                break;
            };
            match reader.read(dest) {
                Ok(0) => break,
                Ok(n) => block.len = block.len.saturating_add(n).min(block.data.len()),
                Err(_) => {
                    self.release_unused(id);
                    return Err(BlockPoolError::ReaderError);
                }
            }
        }

        if block.len == 0 {
            self.release_unused(id);
            return Ok(None);
        }
        log::debug!("BlockPool: filled block {} with {} bytes", id.0, block.len);
        Ok(Some(id))
    }

    /// Appends `next` after `prev` in the chain.
    pub fn link(&mut self, prev: BlockId, next: BlockId) -> Result<(), BlockPoolError> {
        self.block_mut(prev)?.next = Some(next);
        Ok(())
    }

    /// The block following `id` in the chain.
    pub fn next(&self, id: BlockId) -> Option<BlockId> {
        self.block(id).and_then(|b| b.next)
    }

    /// The valid bytes of a live block; empty for a recycled one.
    pub fn data(&self, id: BlockId) -> &[u8] {
        self.block(id)
            .and_then(|b| b.data.get(..b.len))
            .unwrap_or(&[])
    }

    /// Current generation of the slot `id`, or `None` if the handle is unknown.
    pub fn generation(&self, id: BlockId) -> Option<u32> {
        self.blocks.get(id.0).map(|b| b.generation)
    }

    /// Whether the block holds input rather than sitting on the free list.
    pub fn is_live(&self, id: BlockId) -> bool {
        self.block(id).is_some()
    }

    /// Whether at least one pin keeps the block from being recycled.
    pub fn is_pinned(&self, id: BlockId) -> bool {
        self.block(id).is_some_and(|b| b.pins > 0)
    }

    /// Adds a pin; a pinned block refuses to be recycled.
    pub fn pin(&mut self, id: BlockId) -> Result<(), BlockPoolError> {
        let block = self.block_mut(id)?;
        block.pins = block.pins.saturating_add(1);
        Ok(())
    }

    /// Removes one pin previously added with [`pin`](Self::pin).
    pub fn unpin(&mut self, id: BlockId) -> Result<(), BlockPoolError> {
        let block = self.block_mut(id)?;
        block.pins = block.pins.saturating_sub(1);
        Ok(())
    }

    /// Returns a fully consumed block to the free list.
    pub fn recycle(&mut self, id: BlockId) -> Result<(), BlockPoolError> {
        let block = self.block_mut(id)?;
        if block.pins > 0 {
            return Err(BlockPoolError::Pinned);
        }
        block.live = false;
        block.len = 0;
        block.next = None;
        block.generation = block.generation.wrapping_add(1);
        self.free.push(id);
        log::debug!("BlockPool: recycled block {}", id.0);
        Ok(())
    }

    /// Allocation counters for the whole pool.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.blocks.len(),
            free: self.free.len(),
        }
    }

    fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0).filter(|b| b.live)
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut Block, BlockPoolError> {
        self.blocks
            .get_mut(id.0)
            .filter(|b| b.live)
            .ok_or(BlockPoolError::NotLive)
    }

    fn take_block(&mut self) -> BlockId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                let id = BlockId(self.blocks.len());
                self.blocks.push(Block {
                    data: vec![0u8; Self::block_size()].into_boxed_slice(),
                    len: 0,
                    next: None,
                    generation: 0,
                    pins: 0,
                    live: false,
                });
                log::debug!("BlockPool: allocated block {}", id.0);
                id
            }
        };
        if let Some(block) = self.blocks.get_mut(id.0) {
            block.live = true;
            block.len = 0;
            block.next = None;
            block.pins = 0;
        }
        id
    }

    /// Puts a block that never entered the chain back on the free list
    /// without bumping its generation.
    fn release_unused(&mut self, id: BlockId) {
        if let Some(block) = self.blocks.get_mut(id.0) {
            block.live = false;
            block.len = 0;
            self.free.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Config;
    use crate::ChunkReader;

    type SmallPool = BlockPool<Config<4, 8>>;

    struct FailingReader;

    impl Reader for FailingReader {
        type Error = ();

        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
            Err(())
        }
    }

    #[test]
    fn test_acquire_fills_whole_block_from_short_reads() {
        let mut pool = SmallPool::new();
        let mut reader = ChunkReader::new(b"abcdefg", 1);

        let first = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        assert_eq!(pool.data(first), b"abcd");

        let second = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        assert_eq!(pool.data(second), b"efg");

        assert_eq!(pool.acquire_next_block(&mut reader).unwrap(), None);
        // The empty attempt went straight back to the free list
        assert_eq!(pool.stats(), PoolStats { allocated: 3, free: 1 });
    }

    #[test]
    fn test_recycled_blocks_are_reused() {
        let mut pool = SmallPool::new();
        let mut reader = ChunkReader::full_slice(b"0123456789ab");

        let a = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        pool.recycle(a).unwrap();
        let b = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.data(b), b"4567");
        assert_eq!(pool.stats().allocated, 1);
    }

    #[test]
    fn test_recycle_bumps_generation_and_clears_data() {
        let mut pool = SmallPool::new();
        let mut reader = ChunkReader::full_slice(b"abcd");

        let id = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        let before = pool.generation(id).unwrap();
        pool.recycle(id).unwrap();
        assert_eq!(pool.generation(id), Some(before + 1));
        assert!(!pool.is_live(id));
        assert_eq!(pool.data(id), b"");
        assert_eq!(pool.recycle(id), Err(BlockPoolError::NotLive));
    }

    #[test]
    fn test_pinned_block_refuses_recycle() {
        let mut pool = SmallPool::new();
        let mut reader = ChunkReader::full_slice(b"abcd");

        let id = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        pool.pin(id).unwrap();
        pool.pin(id).unwrap();
        assert_eq!(pool.recycle(id), Err(BlockPoolError::Pinned));
        pool.unpin(id).unwrap();
        assert_eq!(pool.recycle(id), Err(BlockPoolError::Pinned));
        pool.unpin(id).unwrap();
        assert_eq!(pool.recycle(id), Ok(()));
    }

    #[test]
    fn test_link_and_walk_chain() {
        let mut pool = SmallPool::new();
        let mut reader = ChunkReader::full_slice(b"abcdefgh");

        let a = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        let b = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        pool.link(a, b).unwrap();
        assert_eq!(pool.next(a), Some(b));
        assert_eq!(pool.next(b), None);
    }

    #[test]
    fn test_reader_error_returns_block_to_free_list() {
        let mut pool = SmallPool::new();
        assert_eq!(
            pool.acquire_next_block(&mut FailingReader),
            Err(BlockPoolError::ReaderError)
        );
        assert_eq!(pool.stats(), PoolStats { allocated: 1, free: 1 });
    }

    #[test]
    fn test_zero_block_size_is_clamped() {
        let mut pool = BlockPool::<Config<0, 8>>::new();
        let mut reader = ChunkReader::full_slice(b"xy");
        let id = pool.acquire_next_block(&mut reader).unwrap().unwrap();
        assert_eq!(pool.data(id), b"x");
    }
}
