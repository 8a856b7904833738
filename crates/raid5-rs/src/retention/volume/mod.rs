mod mapper;

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use mapper::{locate_byte, window_fits};

use crate::error::RaidError;
use crate::metrics::{self, BlockOp, BlockSource};
use crate::retention::array::Array;
use crate::retention::cache::{BlockCache, CacheStats};

/// Volume is one reader's view of the array: the shared member set plus the
/// cache, scratch buffers and read window it owns exclusively.
///
/// Give every connection its own `Volume`; only the `Array` is shared.
pub struct Volume {
    array: Arc<Array>,
    scratch: Vec<Vec<u8>>,
    cache: BlockCache,
    window: Vec<u8>,
}

impl Volume {
    pub fn new(array: Arc<Array>, cache_slots: NonZeroUsize) -> Self {
        let scratch = array.scratch_buffers();
        let window = vec![0u8; array.block_size().saturating_mul(2)];
        Self {
            array,
            scratch,
            cache: BlockCache::new(cache_slots),
            window,
        }
    }

    pub fn array(&self) -> &Array {
        &self.array
    }

    pub const fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Largest range [`Self::read_range`] can serve from a block-aligned offset.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Returns logical block `logical_block`, from cache when possible.
    ///
    /// # Errors
    /// Propagates member read failures; failures are not cached.
    pub fn read_block(&mut self, logical_block: u64) -> Result<&[u8], RaidError> {
        fetch(&self.array, &mut self.scratch, &mut self.cache, logical_block)
    }

    /// Returns `len` bytes of the logical volume starting at `byte_offset`.
    ///
    /// The bytes come from a window over the addressed block and the one
    /// after it, so `len` plus the offset inside the first block may not
    /// exceed two blocks. The second block is fetched even when the range
    /// ends inside the first.
    ///
    /// # Errors
    /// Fails with [`RaidError::InvalidRange`] when the range overflows the
    /// window, or with the error of either block fetch.
    pub fn read_range(&mut self, byte_offset: u64, len: usize) -> Result<&[u8], RaidError> {
        let bs = self.array.block_size();
        let (block, intra) = locate_byte(byte_offset, bs);
        let invalid = || RaidError::InvalidRange {
            offset: byte_offset,
            len,
            window: bs.saturating_mul(2),
        };

        if !window_fits(intra, len, bs) {
            return Err(invalid());
        }
        let next = block.checked_add(1).ok_or_else(invalid)?;

        let first = fetch(&self.array, &mut self.scratch, &mut self.cache, block)?;
        self.window[..bs].copy_from_slice(first);
        let second = fetch(&self.array, &mut self.scratch, &mut self.cache, next)?;
        self.window[bs..].copy_from_slice(second);

        Ok(&self.window[intra..intra + len])
    }
}

fn fetch<'c>(
    array: &Array,
    scratch: &mut [Vec<u8>],
    cache: &'c mut BlockCache,
    block: u64,
) -> Result<&'c [u8], RaidError> {
    let hit = cache.contains(block);
    let started = Instant::now();
    let res = cache.get_or_load(block, |b| array.load_block(b, scratch));

    // Misses are recorded by the array with their real source.
    if hit {
        metrics::record_block_op(BlockOp {
            source: BlockSource::Cache,
            bytes: array.block_size() as u64,
            latency_seconds: started.elapsed().as_secs_f64(),
            error: false,
        });
    }
    res
}
