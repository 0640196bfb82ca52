//! Cortex-M fault handling for the tile refresh firmware.
//!
//! The interesting failure on this board is a HardFault raised while SPI DMA
//! is streaming a tile: a bus fault on a buffer outside AXI SRAM, an MPU
//! violation, or a stack overflow caught by flip-link running into `.bss`.
//!
//! The `#[cortex_m_rt::exception]` attribute needs the ARM target, so the
//! handler is gated behind `hardware`. [`HARDFAULT_DEFINED`] compiles
//! everywhere so host tests can assert the module is part of the build.

#![allow(clippy::doc_markdown)] // HardFault, SVC are register names, not code

/// `true` once this module is compiled in, which links the HardFault handler
/// on hardware builds.
pub const HARDFAULT_DEFINED: bool = true;

/// Prints the stacked exception frame address over RTT, then halts.
///
/// Returning from HardFault is undefined behavior on Cortex-M, hence `-> !`.
/// The independent watchdog resets the board shortly after the halt.
#[cfg(feature = "hardware")]
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::panic!(
        "HardFault: exception frame at 0x{:08X}, stacked PC 0x{:08X}. \
         Likely a DMA bus fault, MPU violation or stack overflow.",
        ef as *const _ as u32,
        ef.pc()
    );
}
