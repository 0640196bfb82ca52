//! Hardware boot sequence for the tile refresh firmware.
//!
//! Initialization order (MUST be respected):
//!   1. Configure MPU (AXI SRAM uncached: statics, stack and tile arena)
//!   2. `embassy_stm32::init()` enables D-cache and I-cache
//!   3. Arm the independent watchdog
//!   4. Bring up panel power, backlight and SPI1 with DMA
//!   5. Start the refresh loop
//!
//! # Safety
//! Step 1 must run from privileged mode before any DMA stream starts.

use platform::dma_safety::{AXI_SRAM_BASE, AXI_SRAM_SIZE_BYTES};

/// Ordered list of boot sequence steps for documentation and testing.
///
/// MPU must be configured BEFORE enabling D-cache (ARM AN4838/AN4839).
/// Enabling D-cache first lets the cache serve stale lines for tile buffers
/// that SPI DMA is reading, which shows up as torn or wrong-colored tiles.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. MPU: map AXI SRAM (statics, stack, tile arena) uncached before any DMA use",
    "2. D-cache: enabled by embassy_stm32::init after MPU is configured",
    "3. IWDG: arm watchdog, pet once per refresh tick",
    "4. Panel: power enable + backlight, SPI1 @ pixel clock with DMA",
    "5. Refresh loop: pass, settle, interval, forever",
];

/// Watchdog timeout. One tick is a pass plus settle plus interval (~1.2 s),
/// so 8 s leaves room for a slow pass without masking a real hang.
pub const WATCHDOG_TIMEOUT_MS: u32 = 8_000;

/// Watchdog timeout in microseconds, as `IndependentWatchdog::new` expects.
pub const fn init_watchdog_config() -> u32 {
    WATCHDOG_TIMEOUT_MS * 1_000
}

// ── MPU register encoding ─────────────────────────────────────────────────────

/// Attribute mask for NonCacheable DMA regions.
///
/// Encodes TEX=001, S=0, C=0, B=0, AP=0b011, XN=1 per ARM DDI0489F §B3.5.4.
/// Does **not** include the SIZE or ENABLE bits.
pub const NON_CACHEABLE_ATTR_MASK: u32 = 0x1308_0000;

/// ARM MPU SIZE field for a power-of-two region: `log2(size_bytes) - 1`.
///
/// Returns `None` for sizes that are not a power of two or are below 32 bytes.
pub const fn mpu_size_field(size_bytes: u32) -> Option<u8> {
    if size_bytes < 32 || !size_bytes.is_power_of_two() {
        return None;
    }
    // trailing_zeros() of a power of two >= 32 is in 5..=31.
    Some((size_bytes.trailing_zeros() - 1) as u8)
}

/// RASR value for a NonCacheable region: attributes | SIZE << 1 | ENABLE.
pub const fn non_cacheable_rasr(size_field: u8) -> u32 {
    NON_CACHEABLE_ATTR_MASK | ((size_field as u32) << 1) | 1
}

/// RBAR value: `base | VALID | region_number`.
pub const fn rbar(base: u32, region_number: u8) -> u32 {
    base | (1 << 4) | (region_number as u32 & 0xF)
}

/// Returns the `(RBAR, RASR)` register pairs for the MPU configuration.
///
/// | Index | Region   | Base        | Size   | RBAR        | RASR        |
/// |-------|----------|-------------|--------|-------------|-------------|
/// | 0     | AXI SRAM | 0x2400_0000 | 512 KB | 0x2400_0010 | 0x1308_0025 |
///
/// Pure math: nothing here touches hardware.
#[must_use]
pub fn mpu_register_pairs() -> [(u32, u32); 1] {
    // 512 KB is a power of two: SIZE = 18.
    let size = match mpu_size_field(AXI_SRAM_SIZE_BYTES as u32) {
        Some(size) => size,
        None => 18,
    };
    [(rbar(AXI_SRAM_BASE, 0), non_cacheable_rasr(size))]
}

// ── RCC clock configuration ───────────────────────────────────────────────────

/// Build the `embassy_stm32::Config` for the tile refresh board.
///
/// # Clock Tree (HSI → 400 MHz core)
///
/// HSI (64 MHz) → PLL1 (prediv=4, mul=50) → PLL1_P = 400 MHz (sys)
/// AHB prescaler: DIV2 → 200 MHz
/// APB1/2/3/4:    DIV2 → 100 MHz
/// PLL1Q: DIV4 → 200 MHz (SPI1 kernel clock, divided down to the pixel clock)
/// HSI48: RNG kernel clock (tile colors)
#[cfg(feature = "hardware")]
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    // ── Oscillators ─────────────────────────────────────────────────────────
    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    config.rcc.csi = true;
    // HSI48 clocks the RNG; without it the RNG never reports data ready.
    config.rcc.hsi48 = Some(Hsi48Config {
        sync_from_usb: false,
    });

    // ── PLL1: system clock + SPI1 kernel clock ───────────────────────────────
    // HSI (64 MHz) / prediv(4) = 16 MHz → × mul(50) = 800 MHz VCO
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2), // 400 MHz: system clock
        divq: Some(PllDiv::DIV4), // 200 MHz: SPI1/2/3 default mux
        divr: None,
    });

    // ── System clock + bus prescalers ────────────────────────────────────────
    config.rcc.sys = Sysclk::PLL1_P; // 400 MHz
    config.rcc.ahb_pre = AHBPrescaler::DIV2; // 200 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb2_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb3_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb4_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

// ── Hardware-only init ────────────────────────────────────────────────────────
//
// Host tests (cargo test -p firmware) never compile or link this module.

#[cfg(feature = "hardware")]
pub mod hardware {
    //! Actual hardware register write implementations.
    //! Only compiled when targeting real hardware (`--features hardware`).

    /// Write [`super::mpu_register_pairs`] into the Cortex-M7 MPU and enable
    /// it with `PRIVDEFENA` set.
    ///
    /// # Safety
    ///
    /// - Must be called before enabling D-cache (`SCB::enable_dcache()`).
    /// - Must be called before any DMA peripheral is initialized.
    /// - Must be called from privileged mode (Cortex-M7 boot context).
    #[allow(unsafe_code)]
    pub unsafe fn apply_mpu_config(mpu: &mut cortex_m::peripheral::MPU) {
        use super::mpu_register_pairs;

        // Disable MPU before reconfiguring: ARM DDI0489F §B3.5.1.
        unsafe {
            mpu.ctrl.write(0);
        }

        // RBAR has VALID=1, so writing it selects the region slot.
        for (rbar, rasr) in mpu_register_pairs() {
            unsafe {
                mpu.rbar.write(rbar);
                mpu.rasr.write(rasr);
            }
        }

        // ENABLE | PRIVDEFENA
        unsafe {
            mpu.ctrl.write(0b101);
        }

        cortex_m::asm::isb();
        cortex_m::asm::dsb();
    }

    /// Zero-argument entry point for `main.rs`: steal the Cortex-M
    /// peripherals, apply the MPU configuration, drop them.
    ///
    /// Call as the very first statement in `main`, before
    /// `embassy_stm32::init()` enables the D-cache.
    #[allow(unsafe_code)]
    pub fn apply_mpu_config_from_peripherals() {
        // SAFETY: called once at boot before any task or interrupt handler
        // has started. No other code holds Cortex-M peripherals yet.
        let mut cp = unsafe { cortex_m::Peripherals::steal() };
        // SAFETY: boot context: D-cache not yet enabled, no DMA initialised.
        unsafe { apply_mpu_config(&mut cp.MPU) };
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_mpu_axi_sram_pair() {
        let [(rbar, rasr)] = mpu_register_pairs();
        assert_eq!(rbar, 0x2400_0010);
        assert_eq!(rasr, 0x1308_0025);
    }

    #[test]
    fn test_boot_mpu_rasr_non_cacheable_encoding() {
        let [(_, rasr)] = mpu_register_pairs();
        // ENABLE bit (bit 0) must be set
        assert!(rasr & 0x1 != 0);
        // TEX=001: bit 19 set
        assert!(rasr & (1 << 19) != 0);
        // C (bit 17) and B (bit 16) clear
        assert!(rasr & (1 << 17) == 0);
        assert!(rasr & (1 << 16) == 0);
    }

    #[test]
    fn test_mpu_size_field() {
        assert_eq!(mpu_size_field(512 * 1024), Some(18));
        assert_eq!(mpu_size_field(64 * 1024), Some(15));
        assert_eq!(mpu_size_field(32), Some(4));
        assert_eq!(mpu_size_field(16), None);
        assert_eq!(mpu_size_field(3 * 1024), None);
    }

    #[test]
    fn test_boot_sequence_order_is_documented() {
        let steps = BOOT_SEQUENCE_STEPS;
        let mpu_idx = steps
            .iter()
            .position(|s| s.contains("MPU"))
            .expect("MPU step required");
        let cache_idx = steps
            .iter()
            .position(|s| s.contains("D-cache"))
            .expect("D-cache step required");
        let panel_idx = steps
            .iter()
            .position(|s| s.contains("SPI1"))
            .expect("panel step required");
        assert_eq!(mpu_idx, 0);
        assert!(
            mpu_idx < cache_idx,
            "MPU must be configured before enabling D-cache"
        );
        assert!(cache_idx < panel_idx, "no DMA before the cache policy is set");
    }

    #[test]
    fn test_watchdog_outlasts_one_tick() {
        use platform::config::{REFRESH_INTERVAL_MS, SETTLE_DELAY_MS};
        assert!(WATCHDOG_TIMEOUT_MS > (SETTLE_DELAY_MS + REFRESH_INTERVAL_MS) * 4);
        assert_eq!(init_watchdog_config(), 8_000_000);
    }
}
