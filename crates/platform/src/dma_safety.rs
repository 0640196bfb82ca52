//! DMA safety marker traits and tile buffer sizing constants for STM32H743ZI.
//!
//! ## DMA Accessibility on STM32H743ZI
//!
//! | Memory Region | Base Address | Size   | DMA1/2 | MDMA | Use case |
//! |---------------|-------------|--------|--------|------|----------|
//! | AXI SRAM      | 0x2400_0000 | 512 KB | YES    | YES  | Stack, statics (lower half), tile arena (upper half) |
//! | DTCM          | 0x2000_0000 | 128 KB | NO     | NO   | Unused: SPI1's DMA could not read from it |
//!
//! All of AXI SRAM is mapped non-cacheable by the MPU, so DMA always sees
//! what the CPU wrote.
//!
//! ## Usage
//! ```rust,ignore
//! use firmware::TileArena;
//!
//! #[link_section = ".axisram"]
//! static mut TILE_ARENA: TileArena = TileArena::zeroed();
//! ```

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH, TILE_SIZE};

// ── Memory region addresses ──────────────────────────────────────────────────

/// Base address of AXI SRAM (DMA1/2/MDMA accessible, D1 domain).
pub const AXI_SRAM_BASE: u32 = 0x2400_0000;

/// Size of AXI SRAM in bytes (512 KB).
pub const AXI_SRAM_SIZE_BYTES: usize = 512 * 1024;

/// Start of the `AXISRAM` linker region holding the `.axisram` tile arena.
pub const AXI_SRAM_ARENA_BASE: u32 = 0x2404_0000;

/// Size of the `AXISRAM` linker region (upper 256 KB of AXI SRAM).
pub const AXI_SRAM_ARENA_BYTES: usize = 256 * 1024;

/// True: DTCM is NOT DMA-accessible. Place no tile buffers here.
pub const DTCM_NOT_DMA_ACCESSIBLE: bool = true;

// ── Tile buffer sizing ───────────────────────────────────────────────────────

/// Bytes per RGB565 pixel.
pub const BYTES_PER_PIXEL: usize = 2;

/// Pixels held by one tile buffer (80 × 80).
pub const TILE_PIXELS: usize = TILE_SIZE as usize * TILE_SIZE as usize;

/// Bytes held by one tile buffer.
pub const TILE_BUFFER_BYTES: usize = TILE_PIXELS * BYTES_PER_PIXEL;

/// Tiles covering the reference panel (4 × 3).
pub const TILE_COUNT: usize =
    (DISPLAY_WIDTH / TILE_SIZE) as usize * (DISPLAY_HEIGHT / TILE_SIZE) as usize;

/// Pixels reserved for the whole tile arena.
pub const TILE_ARENA_PIXELS: usize = TILE_PIXELS * TILE_COUNT;

/// Bytes reserved for the whole tile arena.
pub const TILE_ARENA_BYTES: usize = TILE_ARENA_PIXELS * BYTES_PER_PIXEL;

/// Largest single SPI DMA transfer: one tile plus command/address overhead.
pub const MAX_TRANSFER_BYTES: usize = TILE_BUFFER_BYTES + 8;

const _: () = assert!(TILE_ARENA_BYTES <= AXI_SRAM_ARENA_BYTES);
// One DMA stream moves at most 65 535 items.
const _: () = assert!(MAX_TRANSFER_BYTES <= 65_535);

// ── Marker traits ────────────────────────────────────────────────────────────

/// Marker trait: memory region accessible by DMA1, DMA2, and MDMA.
///
/// # Safety
/// Only implement for zero-sized types representing memory regions
/// that are physically accessible by the STM32H743 DMA controllers.
/// Incorrectly implementing this trait for DTCM will cause silent
/// DMA data corruption or bus faults.
pub unsafe trait DmaAccessible: Sized {}

// ── Region zero-sized types ──────────────────────────────────────────────────

/// AXI SRAM (DMA1/DMA2/MDMA accessible). Home of the tile arena.
#[derive(Debug, Clone, Copy)]
pub struct AxiSramRegion;

// SAFETY: AXI SRAM at 0x2400_0000 is in D1 domain, accessible by all
// DMA controllers (DMA1, DMA2, MDMA) per STM32H743 reference manual Table 3.
unsafe impl DmaAccessible for AxiSramRegion {}

/// DTCM (CPU-only, NOT DMA-accessible).
///
/// Does not implement [`DmaAccessible`], so a
/// [`DmaArena`](crate::dma::DmaArena) cannot be declared over it.
#[derive(Debug, Clone, Copy)]
pub struct DtcmRegion;

/// Host RAM, for emulator and test builds where "DMA" is a plain copy.
#[cfg(any(test, feature = "std"))]
#[derive(Debug, Clone, Copy)]
pub struct HostRam;

// SAFETY: on the host every transfer is a memcpy; any heap or stack memory
// is reachable.
#[cfg(any(test, feature = "std"))]
unsafe impl DmaAccessible for HostRam {}
