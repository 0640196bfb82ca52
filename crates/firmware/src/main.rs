//! Tile Refresh Firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI.

#![no_std]
#![no_main]
// Boot failures before the refresh loop are fatal: halt and let the
// watchdog reset the board.
#![allow(clippy::panic)]

use core::ptr::addr_of_mut;

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::rng::{self, Rng};
use embassy_stm32::spi::{Config as SpiConfig, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Delay, Duration, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use rand_core::RngCore;

use platform::config::{app_title, APP_VERSION, REFERENCE_GEOMETRY};
use platform::dma_safety::AxiSramRegion;
use platform::{DisplayGrid, DmaArena, RefreshConfig, WordColorSource};

use firmware::{PanelConfig, RefreshScheduler, St7789Display, TileArena, TileBufferPool, TileRenderer};

// Panic handler
use panic_probe as _;
// defmt transport
use defmt_rtt as _;

bind_interrupts!(struct Irqs {
    RNG => rng::InterruptHandler<peripherals::RNG>;
});

// Every tile buffer is carved out of this arena, and RAMWR streams each one
// straight from here. AXI SRAM is reachable by DMA1 and is marked
// non-cacheable by the MPU before the D-cache comes on.
// NOLOAD: the arena zeroes each buffer as it hands it out.
#[link_section = ".axisram"]
static mut TILE_ARENA: TileArena = TileArena::zeroed();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    // Step 0: MPU before embassy_stm32::init() enables the D-cache.
    // See: firmware::boot::BOOT_SEQUENCE_STEPS for the full ordered sequence.
    firmware::boot::hardware::apply_mpu_config_from_peripherals();

    defmt::info!("{=str} v{=str}", app_title(), APP_VERSION);
    defmt::info!("Initializing STM32H743ZI: Cortex-M7 @ 400 MHz");

    let p = embassy_stm32::init(firmware::boot::build_embassy_config());

    // Step 1: IWDG. Once unleashed it cannot be stopped; the refresh loop
    // pets it once per tick.
    let mut watchdog = embassy_stm32::wdg::IndependentWatchdog::new(
        p.IWDG1,
        firmware::boot::init_watchdog_config(),
    );
    watchdog.unleash();
    defmt::info!(
        "IWDG watchdog armed: timeout={=u32}ms",
        firmware::boot::WATCHDOG_TIMEOUT_MS
    );

    // Step 2: panel power and backlight. Held high for the life of the program.
    let _panel_power = Output::new(p.PE3, Level::High, Speed::Low);
    let _backlight = Output::new(p.PE4, Level::High, Speed::Low);

    // Step 3: SPI1 with DMA at the pixel clock.
    // PA5 (SPI1_SCK), PA7 (SPI1_MOSI)
    let panel = PanelConfig::default();
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = Hertz(panel.pixel_clock_hz);

    let spi = Spi::new(
        p.SPI1, p.PA5,      // SCK
        p.PA7,      // MOSI
        p.PA6,      // MISO (not used but required by HAL)
        p.DMA1_CH0, // TX DMA
        p.DMA1_CH1, // RX DMA
        spi_config,
    );

    let dc = Output::new(p.PB0, Level::Low, Speed::VeryHigh); // Data/Command
    let cs = Output::new(p.PB1, Level::High, Speed::VeryHigh); // Chip Select (active low)
    let rst = Output::new(p.PB2, Level::High, Speed::VeryHigh); // Reset (active low)

    // ExclusiveDevice owns CS and wraps each transfer in a transaction.
    let spi_device = match ExclusiveDevice::new(spi, cs, Delay) {
        Ok(device) => device,
        Err(_) => defmt::panic!("SPI chip-select init failed"),
    };

    defmt::info!(
        "Creating ST7789 driver: SPI @ {=u32}MHz",
        panel.pixel_clock_hz / 1_000_000
    );
    let mut display = St7789Display::new(spi_device, dc, rst, Delay, panel);

    match display.init().await {
        Ok(()) => defmt::info!(
            "Display ready: {=u16}x{=u16} ST7789",
            panel.width,
            panel.height
        ),
        Err(e) => {
            defmt::error!("Display initialization failed: {}", e);
            loop {
                Timer::after(Duration::from_secs(1)).await;
                watchdog.pet();
            }
        }
    }

    // Step 4: tile buffers, one per tile, from the AXI SRAM arena.
    let grid = match DisplayGrid::new(REFERENCE_GEOMETRY) {
        Ok(grid) => grid,
        Err(e) => defmt::panic!("Invalid display geometry: {}", e),
    };

    // SAFETY: `main` runs once and this is the only reference ever taken to
    // TILE_ARENA; it lives for the rest of the program.
    #[allow(unsafe_code)]
    let memory: &'static mut [u16] = unsafe { &mut (*addr_of_mut!(TILE_ARENA)).0 };
    let mut arena = DmaArena::<AxiSramRegion>::new(memory);

    let pool = match TileBufferPool::allocate(&mut arena, grid.tile_count(), grid.tile_pixel_count())
    {
        Ok(pool) => pool,
        Err(e) => defmt::panic!("Tile buffer allocation failed: {}", e),
    };
    defmt::info!(
        "Tile pool ready: {=usize} tiles, {=usize} bytes of AXI SRAM in use",
        pool.len(),
        arena.used().saturating_mul(2)
    );

    // Tile colors come from the hardware RNG, one 32-bit word per two tiles.
    let mut rng = Rng::new(p.RNG, Irqs);
    let colors = WordColorSource::new(move || rng.next_u32());

    let config = RefreshConfig::default();
    let renderer = match TileRenderer::new(grid, pool, colors, &config) {
        Ok(renderer) => renderer,
        Err(e) => defmt::panic!("Renderer setup failed: {}", e),
    };
    let mut scheduler = RefreshScheduler::new(renderer, display, Delay, &config);

    // Step 5: refresh loop.
    defmt::info!(
        "Entering refresh loop: settle={=u32}ms interval={=u32}ms",
        config.settle_delay_ms,
        config.refresh_interval_ms
    );
    loop {
        scheduler.tick().await;
        // One tick is ~1.1 s plus the pass itself; WATCHDOG_TIMEOUT_MS is 8 s.
        watchdog.pet();
    }
}
