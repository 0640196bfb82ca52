//! Tile Refresh Demo
//!
//! Runs the real pool/renderer/scheduler stack against a desktop window:
//! a 320×240 simulator display repainted with random 80×80 tiles once per
//! second.
//!
//! Run with: cargo run --example tile_demo --features emulator
//!           cargo run --example tile_demo --features emulator -- 5   (five passes, then exit)
//!
//! Set `RUST_LOG=firmware=debug` to see per-pass log lines.

#![allow(clippy::print_stdout)]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use embedded_hal_async::delay::DelayNs;
use tracing_subscriber::EnvFilter;

use firmware::{GraphicsSurface, RefreshScheduler, TileBufferPool, TileRenderer};
use platform::config::{self, DISPLAY_HEIGHT, DISPLAY_WIDTH, REFERENCE_GEOMETRY};
use platform::dma_safety::{HostRam, TILE_ARENA_PIXELS};
use platform::{DisplayGrid, DmaArena, RefreshConfig, Xorshift32};

/// `DelayNs` on top of the tokio timer.
struct TokioDelay;

impl DelayNs for TokioDelay {
    async fn delay_ns(&mut self, ns: u32) {
        tokio::time::sleep(Duration::from_nanos(u64::from(ns))).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        tokio::time::sleep(Duration::from_millis(u64::from(ms))).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional pass count; run until the window closes otherwise.
    let passes: Option<u32> = std::env::args().nth(1).map(|s| s.parse()).transpose()?;

    println!("{} - Tile Demo", config::app_title());
    println!("Display: {DISPLAY_WIDTH}×{DISPLAY_HEIGHT}, 80×80 tiles\n");

    // Crate errors are no_std (Display only), so they cross into Box<dyn Error> as strings.
    let grid = DisplayGrid::new(REFERENCE_GEOMETRY).map_err(|e| e.to_string())?;
    let mut memory = vec![0u16; TILE_ARENA_PIXELS];
    let mut arena = DmaArena::<HostRam>::new(&mut memory);
    let pool = TileBufferPool::allocate(&mut arena, grid.tile_count(), grid.tile_pixel_count())
        .map_err(|e| e.to_string())?;

    // Software generator in place of the hardware RNG.
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(1);
    let config = RefreshConfig::default();
    let renderer = TileRenderer::new(grid, pool, Xorshift32::new(seed), &config)
        .map_err(|e| e.to_string())?;

    let display = SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));
    let mut window = Window::new(
        config::app_title(),
        &OutputSettingsBuilder::new().scale(2).build(),
    );

    let mut scheduler =
        RefreshScheduler::new(renderer, GraphicsSurface::new(display), TokioDelay, &config);

    let mut ticks = 0u32;
    'refresh: loop {
        if passes.is_some_and(|limit| ticks >= limit) {
            break;
        }
        let outcome = scheduler.tick().await;
        ticks = ticks.saturating_add(1);
        println!(
            "pass {ticks}: {} tiles drawn{}",
            outcome.tiles_drawn(),
            if outcome.is_completed() { "" } else { " (aborted)" }
        );

        window.update(scheduler.surface().target());
        for event in window.events() {
            if matches!(event, SimulatorEvent::Quit) {
                break 'refresh;
            }
        }
    }

    let stats = scheduler.stats();
    println!(
        "\n{} passes: {} completed, {} aborted",
        stats.passes(),
        stats.completed,
        stats.aborted
    );

    // Hand every tile buffer back before the arena goes away.
    let (renderer, _, _) = scheduler.into_parts();
    let (_, pool, _) = renderer.into_parts();
    pool.release(&mut arena).map_err(|e| e.to_string())?;

    Ok(())
}
