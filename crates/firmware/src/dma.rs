//! DMA buffer alignment for Cortex-M7 cache coherency.
//!
//! The STM32H743ZI Cortex-M7 has a 32-byte cacheline. Any buffer read by a
//! DMA stream must be aligned to at least 32 bytes, otherwise a line shared
//! with unrelated data can be written back over what DMA expects to read.
//!
//! The tile arena lives in `.axisram`, which the MPU marks non-cacheable
//! before embassy enables the D-cache (see [`crate::boot`]). Aligning the
//! arena to a cacheline as well keeps it correct even if that region is ever
//! made cacheable and maintained with `SCB::clean_dcache_by_slice`.
//!
//! # References
//! - ST AN4839: Level 1 cache on STM32F7 Series and STM32H7 Series
//! - ST AN4838: MPU programming model for STM32

use platform::dma_safety::TILE_ARENA_PIXELS;

/// Cortex-M7 D-cache line size in bytes.
pub const CACHE_LINE_BYTES: usize = 32;

/// A `#[repr(align(32))]` wrapper that enforces 32-byte alignment for
/// Cortex-M7 DMA-accessible buffers.
///
/// # Example
///
/// ```ignore
/// use firmware::dma::TileArena;
///
/// #[link_section = ".axisram"]
/// static mut TILE_ARENA: TileArena = TileArena::zeroed();
/// ```
#[derive(Clone, Copy)]
#[repr(align(32))]
pub struct Align32<T>(
    /// The inner value. Must be public so callers can construct and destructure the wrapper.
    pub T,
);

/// Backing storage for every tile buffer of the reference grid.
pub type TileArena = Align32<[u16; TILE_ARENA_PIXELS]>;

impl TileArena {
    /// All-zero arena, usable in a `static` initializer.
    pub const fn zeroed() -> Self {
        Align32([0; TILE_ARENA_PIXELS])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_is_cacheline_aligned() {
        assert_eq!(core::mem::align_of::<Align32<u8>>(), CACHE_LINE_BYTES);
        assert_eq!(core::mem::align_of::<TileArena>(), CACHE_LINE_BYTES);
    }

    #[test]
    fn arena_size_is_whole_cachelines() {
        assert_eq!(core::mem::size_of::<TileArena>() % CACHE_LINE_BYTES, 0);
        assert_eq!(
            core::mem::size_of::<TileArena>(),
            platform::dma_safety::TILE_ARENA_BYTES
        );
    }
}
