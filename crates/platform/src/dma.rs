//! DMA-capable memory for tile buffers
//!
//! [`DmaArena`] carves fixed-size pixel buffers out of one caller-supplied
//! region (on hardware a `static` placed in `.axisram`). Buffers are handed
//! out as exclusive `&'a mut [u16]` slices and can be handed back through
//! [`DmaAllocator::release`]; once the topmost allocations are released the
//! space is reused.

use core::marker::PhantomData;
use core::ptr::NonNull;

use thiserror_no_std::Error;

use crate::display::RawPixel;
use crate::dma_safety::DmaAccessible;
use crate::geometry::MAX_TILES;

/// Allocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AllocError {
    /// Not enough space left in the region.
    #[error("requested {requested} pixels, {available} available")]
    OutOfMemory {
        /// Pixels requested.
        requested: usize,
        /// Pixels still free.
        available: usize,
    },
    /// Zero-length buffers are never handed out.
    #[error("zero-sized allocation")]
    ZeroSized,
    /// Allocation bookkeeping is full.
    #[error("more than {max} live allocations")]
    TooManyAllocations {
        /// Maximum live allocations.
        max: usize,
    },
    /// The released slice is not a buffer this allocator handed out.
    #[error("buffer does not belong to this allocator")]
    ForeignBuffer,
}

/// Source of DMA-capable pixel buffers.
pub trait DmaAllocator<'a> {
    /// Allocate a zero-filled buffer of `pixels` 16-bit pixels.
    fn allocate(&mut self, pixels: usize) -> Result<&'a mut [RawPixel], AllocError>;

    /// Hand a buffer obtained from [`allocate`](Self::allocate) back.
    fn release(&mut self, buffer: &'a mut [RawPixel]) -> Result<(), AllocError>;
}

/// Bump allocator over a single DMA-reachable region `R`.
///
/// Live allocations are tracked by `(offset, len)`; a release must present
/// exactly one of them. The bump pointer falls back to the end of the highest
/// remaining allocation after each release.
pub struct DmaArena<'a, R: DmaAccessible> {
    base: NonNull<RawPixel>,
    capacity: usize,
    next: usize,
    live: heapless::Vec<(usize, usize), MAX_TILES>,
    _memory: PhantomData<&'a mut [RawPixel]>,
    _region: PhantomData<R>,
}

impl<'a, R: DmaAccessible> DmaArena<'a, R> {
    /// Take exclusive ownership of `memory` for the arena's lifetime.
    ///
    /// The caller places `memory` inside region `R` (for `AxiSramRegion`:
    /// `#[link_section = ".axisram"]`).
    pub fn new(memory: &'a mut [RawPixel]) -> Self {
        let capacity = memory.len();
        Self {
            base: NonNull::from(memory).cast::<RawPixel>(),
            capacity,
            next: 0,
            live: heapless::Vec::new(),
            _memory: PhantomData,
            _region: PhantomData,
        }
    }

    /// Total pixels in the region.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pixels between the region start and the bump pointer.
    pub fn used(&self) -> usize {
        self.next
    }

    /// Pixels still available for new allocations.
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.next)
    }

    /// Number of buffers currently handed out.
    pub fn live_allocations(&self) -> usize {
        self.live.len()
    }

    /// Offset of `buffer` from the region base, if it starts inside the region.
    fn offset_of(&self, buffer: &[RawPixel]) -> Option<usize> {
        let base = self.base.as_ptr() as usize;
        let addr = buffer.as_ptr() as usize;
        let byte_offset = addr.checked_sub(base)?;
        if byte_offset % core::mem::size_of::<RawPixel>() != 0 {
            return None;
        }
        let offset = byte_offset / core::mem::size_of::<RawPixel>();
        (offset < self.capacity).then_some(offset)
    }
}

impl<'a, R: DmaAccessible> DmaAllocator<'a> for DmaArena<'a, R> {
    fn allocate(&mut self, pixels: usize) -> Result<&'a mut [RawPixel], AllocError> {
        if pixels == 0 {
            return Err(AllocError::ZeroSized);
        }
        let available = self.available();
        if pixels > available {
            return Err(AllocError::OutOfMemory {
                requested: pixels,
                available,
            });
        }
        let offset = self.next;
        self.live
            .push((offset, pixels))
            .map_err(|_| AllocError::TooManyAllocations { max: MAX_TILES })?;

        // pixels <= available = capacity - next, so offset + pixels <= capacity.
        #[allow(clippy::arithmetic_side_effects)]
        {
            self.next = offset + pixels;
        }

        // SAFETY: `base` points at `capacity` pixels borrowed mutably for 'a.
        // `[offset, offset + pixels)` lies inside the region and is disjoint
        // from every other live allocation: allocations only grow `next`, and
        // `next` is only lowered to the end of the highest live allocation.
        let buffer = unsafe {
            core::slice::from_raw_parts_mut(self.base.as_ptr().add(offset), pixels)
        };
        buffer.fill(0);
        Ok(buffer)
    }

    fn release(&mut self, buffer: &'a mut [RawPixel]) -> Result<(), AllocError> {
        let offset = self.offset_of(buffer).ok_or(AllocError::ForeignBuffer)?;
        let slot = self
            .live
            .iter()
            .position(|&(o, len)| o == offset && len == buffer.len())
            .ok_or(AllocError::ForeignBuffer)?;
        self.live.swap_remove(slot);

        // Every live (offset, len) was checked against capacity when handed out.
        #[allow(clippy::arithmetic_side_effects)]
        {
            self.next = self.live.iter().map(|&(o, len)| o + len).max().unwrap_or(0);
        }
        Ok(())
    }
}
