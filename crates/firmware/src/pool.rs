//! Tile buffer pool
//!
//! One pixel buffer per tile, carved from DMA-capable memory exactly once at
//! startup. The pool's shape never changes afterwards; only buffer contents
//! are overwritten by the renderer on every pass.
//!
//! Buffers are addressed by linear tile index (`row * columns + column`, see
//! [`DisplayGrid::index_of`](platform::DisplayGrid::index_of)).

use platform::geometry::MAX_TILES;
use platform::{AllocError, DmaAllocator, RawPixel};
use thiserror_no_std::Error;

/// Pool construction and teardown failures.
///
/// Any of these at startup is fatal for the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PoolError {
    /// The allocator could not supply buffer `index`.
    #[error("tile buffer {index} allocation failed: {cause}")]
    Allocation {
        /// Buffer that failed.
        index: usize,
        /// Allocator error.
        cause: AllocError,
    },
    /// More tiles requested than the pool can hold.
    #[error("{requested} tiles exceed pool capacity {max}")]
    TooManyTiles {
        /// Requested tile count.
        requested: usize,
        /// Pool capacity.
        max: usize,
    },
    /// The allocator refused to take buffer `index` back.
    #[error("tile buffer {index} release failed: {cause}")]
    Release {
        /// Buffer that failed.
        index: usize,
        /// Allocator error.
        cause: AllocError,
    },
}

/// Fixed set of equally sized tile buffers.
pub struct TileBufferPool<'a> {
    buffers: heapless::Vec<&'a mut [RawPixel], MAX_TILES>,
    tile_pixels: usize,
}

impl<'a> TileBufferPool<'a> {
    /// Allocate `tile_count` buffers of `tile_pixels` pixels each.
    ///
    /// If any allocation fails, the buffers obtained so far are handed back
    /// to `allocator` and the failing index is reported.
    pub fn allocate<A>(
        allocator: &mut A,
        tile_count: usize,
        tile_pixels: usize,
    ) -> Result<Self, PoolError>
    where
        A: DmaAllocator<'a>,
    {
        if tile_count > MAX_TILES {
            return Err(PoolError::TooManyTiles {
                requested: tile_count,
                max: MAX_TILES,
            });
        }

        let mut buffers = heapless::Vec::new();
        for index in 0..tile_count {
            let buffer = match allocator.allocate(tile_pixels) {
                Ok(buffer) => buffer,
                Err(cause) => {
                    error!("tile buffer {} of {} allocation failed", index, tile_count);
                    Self::release_all(&mut buffers, allocator);
                    return Err(PoolError::Allocation { index, cause });
                }
            };
            // tile_count <= MAX_TILES was checked above.
            if let Err(buffer) = buffers.push(buffer) {
                let _ = allocator.release(buffer);
                Self::release_all(&mut buffers, allocator);
                return Err(PoolError::TooManyTiles {
                    requested: tile_count,
                    max: MAX_TILES,
                });
            }
        }

        info!(
            "tile pool: {} buffers x {} pixels",
            tile_count, tile_pixels
        );
        Ok(Self {
            buffers,
            tile_pixels,
        })
    }

    /// Number of buffers.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// `true` if the pool holds no buffers.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Pixels per buffer.
    pub fn tile_pixel_count(&self) -> usize {
        self.tile_pixels
    }

    /// Buffer `index`, read-only.
    pub fn buffer(&self, index: usize) -> Option<&[RawPixel]> {
        self.buffers.get(index).map(|b| &**b)
    }

    /// Buffer `index`, writable.
    pub fn buffer_mut(&mut self, index: usize) -> Option<&mut [RawPixel]> {
        self.buffers.get_mut(index).map(|b| &mut **b)
    }

    /// Buffers `index` and `index + 1` at once.
    pub fn pair_mut(&mut self, index: usize) -> Option<(&mut [RawPixel], &mut [RawPixel])> {
        let split = index.checked_add(1)?;
        if split >= self.buffers.len() {
            return None;
        }
        let (head, tail) = self.buffers.split_at_mut(split);
        let first = head.last_mut()?;
        let second = tail.first_mut()?;
        Some((&mut **first, &mut **second))
    }

    /// Hand every buffer back to `allocator`.
    ///
    /// All buffers are offered even if one is refused; the first refusal is
    /// reported.
    pub fn release<A>(mut self, allocator: &mut A) -> Result<(), PoolError>
    where
        A: DmaAllocator<'a>,
    {
        let mut first_error = None;
        // Release in reverse so a bump allocator can rewind as it goes.
        let mut index = self.buffers.len();
        while let Some(buffer) = self.buffers.pop() {
            index = index.saturating_sub(1);
            if let Err(cause) = allocator.release(buffer) {
                first_error.get_or_insert(PoolError::Release { index, cause });
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => {
                debug!("tile pool released");
                Ok(())
            }
        }
    }

    fn release_all<A>(buffers: &mut heapless::Vec<&'a mut [RawPixel], MAX_TILES>, allocator: &mut A)
    where
        A: DmaAllocator<'a>,
    {
        while let Some(buffer) = buffers.pop() {
            let _ = allocator.release(buffer);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::dma_safety::HostRam;
    use platform::DmaArena;

    #[test]
    fn allocates_one_buffer_per_tile() {
        let mut memory = [0u16; 12 * 16];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let pool = TileBufferPool::allocate(&mut arena, 12, 16).unwrap();
        assert_eq!(pool.len(), 12);
        assert_eq!(pool.tile_pixel_count(), 16);
        assert!((0..12).all(|i| pool.buffer(i).unwrap().len() == 16));
        assert!(pool.buffer(12).is_none());
        assert_eq!(arena.available(), 0);
    }

    #[test]
    fn allocation_failure_names_the_buffer_and_rolls_back() {
        let mut memory = [0u16; 5 * 16];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let err = TileBufferPool::allocate(&mut arena, 12, 16).err().unwrap();
        assert_eq!(
            err,
            PoolError::Allocation {
                index: 5,
                cause: AllocError::OutOfMemory {
                    requested: 16,
                    available: 0
                }
            }
        );
        assert_eq!(arena.live_allocations(), 0);
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn rejects_more_tiles_than_capacity() {
        let mut memory = [0u16; 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        assert_eq!(
            TileBufferPool::allocate(&mut arena, MAX_TILES + 1, 1).err(),
            Some(PoolError::TooManyTiles {
                requested: MAX_TILES + 1,
                max: MAX_TILES
            })
        );
    }

    #[test]
    fn pair_access_is_disjoint() {
        let mut memory = [0u16; 4 * 8];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut pool = TileBufferPool::allocate(&mut arena, 4, 8).unwrap();

        let (a, b) = pool.pair_mut(2).unwrap();
        a.fill(0x1111);
        b.fill(0x2222);
        assert!(pool.buffer(2).unwrap().iter().all(|&p| p == 0x1111));
        assert!(pool.buffer(3).unwrap().iter().all(|&p| p == 0x2222));
        assert!(pool.buffer(1).unwrap().iter().all(|&p| p == 0));
        assert!(pool.pair_mut(3).is_none());
    }

    #[test]
    fn release_returns_all_memory() {
        let mut memory = [0u16; 6 * 10];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let pool = TileBufferPool::allocate(&mut arena, 6, 10).unwrap();
        pool.release(&mut arena).unwrap();
        assert_eq!(arena.live_allocations(), 0);
        assert_eq!(arena.available(), 60);

        // The space can be carved up again with a different shape.
        let again = TileBufferPool::allocate(&mut arena, 3, 20).unwrap();
        assert_eq!(again.len(), 3);
    }

    #[test]
    fn release_to_wrong_allocator_is_reported() {
        let mut memory = [0u16; 8];
        let mut other_memory = [0u16; 8];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut other = DmaArena::<HostRam>::new(&mut other_memory);
        let pool = TileBufferPool::allocate(&mut arena, 2, 4).unwrap();
        assert_eq!(
            pool.release(&mut other),
            Err(PoolError::Release {
                index: 1,
                cause: AllocError::ForeignBuffer
            })
        );
    }
}
