//! Direct-mapped cache of logical blocks.
//!
//! Block `b` can only live in slot `b mod K`. A miss overwrites whatever the
//! slot held; there is no recency tracking and no invalidation, since the
//! array underneath never changes.


use std::num::NonZeroUsize;

/// Default slot count.
pub const DEFAULT_SLOTS: usize = 80;

#[derive(Debug, Default)]
struct Slot {
    block: Option<u64>,
    data: Vec<u8>,
}

/// CacheStats counts lookups since the cache was created.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub failed_loads: u64,
}

/// BlockCache keeps up to `K` block-sized entries, one per slot.
#[derive(Debug)]
pub struct BlockCache {
    slots: Vec<Slot>,
    stats: CacheStats,
}

impl BlockCache {
    /// Creates an empty cache. Slot storage is allocated on first use.
    #[must_use]
    pub fn new(slots: NonZeroUsize) -> Self {
        Self {
            slots: (0..slots.get()).map(|_| Slot::default()).collect(),
            stats: CacheStats::default(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    fn slot_index(&self, block: u64) -> usize {
        // Below `slots.len()`, which is a usize.
        (block % self.slots.len() as u64) as usize
    }

    /// Reports whether `block` is currently cached.
    #[must_use]
    pub fn contains(&self, block: u64) -> bool {
        self.slots[self.slot_index(block)].block == Some(block)
    }

    /// Returns the cached content of `block`, calling `load` on a miss.
    ///
    /// A failed load leaves the slot as it was, so the next lookup tries again.
    ///
    /// # Arguments
    /// * `block` - Logical block number.
    /// * `load` - Produces the block's content; only invoked on a miss.
    ///
    /// # Errors
    /// Returns whatever `load` returned.
    pub fn get_or_load<'s, F, E>(&mut self, block: u64, load: F) -> Result<&[u8], E>
    where
        F: FnOnce(u64) -> Result<&'s [u8], E>,
    {
        let idx = self.slot_index(block);
        let slot = &mut self.slots[idx];

        if slot.block == Some(block) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
            let fresh = match load(block) {
                Ok(fresh) => fresh,
                Err(e) => {
                    self.stats.failed_loads += 1;
                    return Err(e);
                }
            };
            slot.data.clear();
            slot.data.extend_from_slice(fresh);
            slot.block = Some(block);
        }

        Ok(&slot.data)
    }
}
