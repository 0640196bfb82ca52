//! Display integration tests: the renderer driving the ST7789 driver.
//!
//! Uses a 4×2 panel in 2×2 tiles (one row, two tiles) so every SPI byte of a
//! full pass can be spelled out. Byte-level init and RAMWR coverage lives
//! in the unit tests in `crates/firmware/src/display/driver.rs`.
//!
//! Run with: cargo test -p firmware --test integration_display
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
)]

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use embedded_hal_async::spi::{ErrorType, Operation, SpiDevice};

use firmware::{DisplayError, PanelConfig, PassOutcome, St7789, TileBufferPool, TilePosition, TileRenderer};
use platform::config::REFERENCE_GEOMETRY;
use platform::dma_safety::{HostRam, MAX_TRANSFER_BYTES, TILE_BUFFER_BYTES};
use platform::mocks::{RecordingDelay, SequenceColors};
use platform::{DisplayGeometry, DisplayGrid, DmaArena, RefreshConfig};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the three SPI expectations that correspond to one `spi.write(&data)` call
/// via the `SpiDevice` trait.
fn spi_device_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(data.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

/// CASET, RASET, RAMWR and the pixel data for one tile.
fn tile_writes(x0: u8, x1: u8, pixel: u16) -> Vec<SpiTransaction<u8>> {
    let [hi, lo] = pixel.to_be_bytes();
    let chunks: [&[u8]; 6] = [
        &[0x2A],
        &[0, x0, 0, x1],
        &[0x2B],
        &[0, 0, 0, 1],
        &[0x2C],
        &[hi, lo, hi, lo, hi, lo, hi, lo],
    ];
    chunks.iter().flat_map(|c| spi_device_write(c)).collect()
}

/// DC for one tile: command/data for CASET, RASET and RAMWR.
fn tile_dc() -> Vec<PinTransaction> {
    use PinState::{High, Low};
    [Low, High, Low, High, Low, High]
        .iter()
        .map(|&l| PinTransaction::set(l))
        .collect()
}

/// Create an idle pin mock that expects no transactions.
fn idle_pin() -> PinMock {
    PinMock::new(&[])
}

fn tiny_panel(width: u16) -> PanelConfig {
    PanelConfig {
        width,
        height: 2,
        ..PanelConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// `SpiDevice` that keeps the address and length of every written slice.
#[derive(Default)]
struct AddressRecordingSpi {
    writes: Vec<(usize, usize)>,
}

impl ErrorType for AddressRecordingSpi {
    type Error = core::convert::Infallible;
}

impl SpiDevice for AddressRecordingSpi {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                self.writes.push((bytes.as_ptr() as usize, bytes.len()));
            }
        }
        Ok(())
    }
}

#[test]
fn test_public_constants() {
    assert_eq!(MAX_TRANSFER_BYTES, TILE_BUFFER_BYTES + 8);
    let panel = PanelConfig::default();
    assert_eq!((panel.width, panel.height), (320, 240));
    assert_eq!(panel.pixel_clock_hz, 20_000_000);
}

/// One pass over a two-tile grid: left tile gets 0x0000, right tile 0x0001,
/// each through its own inclusive address window.
#[tokio::test]
async fn test_pass_streams_both_tiles() {
    let mut expectations = tile_writes(0, 1, 0x0000);
    expectations.extend(tile_writes(2, 3, 0x0001));
    let mut spi = SpiMock::new(&expectations);

    let mut dc_txns = tile_dc();
    dc_txns.extend(tile_dc());
    let mut dc = PinMock::new(&dc_txns);
    let mut rst = idle_pin();

    let mut display = St7789::new(spi.clone(), dc.clone(), rst.clone(), NoopDelay, tiny_panel(4));

    let grid = DisplayGrid::new(DisplayGeometry::square_tiles(4, 2, 2)).unwrap();
    let mut memory = [0u16; 8];
    let mut arena = DmaArena::<HostRam>::new(&mut memory);
    let pool =
        TileBufferPool::allocate(&mut arena, grid.tile_count(), grid.tile_pixel_count()).unwrap();
    let mut renderer =
        TileRenderer::new(grid, pool, SequenceColors::new(), &RefreshConfig::default()).unwrap();

    let mut delay = RecordingDelay::new();
    let outcome = renderer.render_pass(&mut display, &mut delay).await;
    assert_eq!(outcome, PassOutcome::Completed { tiles_drawn: 2 });
    assert_eq!(delay.total_ms(), 100);

    spi.done();
    dc.done();
    rst.done();
}

/// A reference pass over the real panel size: every RAMWR payload is one
/// whole tile read straight out of the arena, never a staging copy.
#[tokio::test]
async fn test_pass_transfers_tiles_from_the_arena() {
    let mut dc_txns = Vec::new();
    for _ in 0..12 {
        dc_txns.extend(tile_dc());
    }
    let mut dc = PinMock::new(&dc_txns);
    let mut rst = idle_pin();
    let mut display = St7789::new(
        AddressRecordingSpi::default(),
        dc.clone(),
        rst.clone(),
        NoopDelay,
        PanelConfig::default(),
    );

    let grid = DisplayGrid::new(REFERENCE_GEOMETRY).unwrap();
    let mut memory = vec![0u16; grid.tile_count() * grid.tile_pixel_count()];
    let arena_start = memory.as_ptr() as usize;
    let arena_end = arena_start + memory.len() * 2;
    let mut arena = DmaArena::<HostRam>::new(&mut memory);
    let pool =
        TileBufferPool::allocate(&mut arena, grid.tile_count(), grid.tile_pixel_count()).unwrap();
    let mut renderer =
        TileRenderer::new(grid, pool, SequenceColors::new(), &RefreshConfig::default()).unwrap();

    let outcome = renderer
        .render_pass(&mut display, &mut RecordingDelay::new())
        .await;
    assert!(outcome.is_completed());

    let (spi, _, _) = display.into_parts();
    let payloads: Vec<_> = spi.writes.iter().filter(|(_, len)| *len > 4).collect();
    assert_eq!(payloads.len(), 12);
    let mut starts = Vec::new();
    for &&(addr, len) in &payloads {
        assert_eq!(len, TILE_BUFFER_BYTES);
        assert!(len <= MAX_TRANSFER_BYTES);
        assert!(addr >= arena_start && addr + len <= arena_end, "payload outside the arena");
        starts.push(addr);
    }
    starts.sort_unstable();
    starts.dedup();
    assert_eq!(starts.len(), 12, "each tile sent from its own buffer");

    dc.done();
    rst.done();
}

/// A panel narrower than the grid: the right tile is rejected by the driver
/// before any SPI traffic and the pass stops there.
#[tokio::test]
async fn test_driver_error_aborts_pass() {
    let mut spi = SpiMock::new(&tile_writes(0, 1, 0x0000));
    let mut dc = PinMock::new(&tile_dc());
    let mut rst = idle_pin();

    let mut display = St7789::new(spi.clone(), dc.clone(), rst.clone(), NoopDelay, tiny_panel(2));

    let grid = DisplayGrid::new(DisplayGeometry::square_tiles(4, 2, 2)).unwrap();
    let mut memory = [0u16; 8];
    let mut arena = DmaArena::<HostRam>::new(&mut memory);
    let pool =
        TileBufferPool::allocate(&mut arena, grid.tile_count(), grid.tile_pixel_count()).unwrap();
    let mut renderer =
        TileRenderer::new(grid, pool, SequenceColors::new(), &RefreshConfig::default()).unwrap();

    let outcome = renderer
        .render_pass(&mut display, &mut RecordingDelay::new())
        .await;
    assert_eq!(
        outcome,
        PassOutcome::Aborted {
            at: TilePosition {
                row: 0,
                column: 1,
                index: 1
            },
            tiles_drawn: 1,
            error: DisplayError::InvalidCoordinate,
        }
    );

    spi.done();
    dc.done();
    rst.done();
}

/// Sleep (teardown) followed by init (wake) leaves the driver usable.
#[tokio::test]
async fn test_sleep_then_wake() {
    let cmds: [&[u8]; 10] = [
        &[0x28], // DISPOFF
        &[0x10], // SLPIN
        &[0x01], // SWRESET
        &[0x11], // SLPOUT
        &[0x3A],
        &[0x55],
        &[0x36],
        &[0x20],
        &[0x13], // NORON
        &[0x29], // DISPON
    ];
    let expectations: Vec<_> = cmds.iter().flat_map(|c| spi_device_write(c)).collect();
    let mut spi = SpiMock::new(&expectations);

    use PinState::{High, Low};
    let dc_txns: Vec<_> = [Low, Low, Low, Low, Low, High, Low, High, Low, Low]
        .iter()
        .map(|&l| PinTransaction::set(l))
        .collect();
    let mut dc = PinMock::new(&dc_txns);
    let mut rst = PinMock::new(&[
        PinTransaction::set(High),
        PinTransaction::set(Low),
        PinTransaction::set(High),
    ]);

    let mut display = St7789::new(
        spi.clone(),
        dc.clone(),
        rst.clone(),
        NoopDelay,
        PanelConfig::default(),
    );
    display.sleep().await.expect("sleep should succeed");
    display.init().await.expect("wake should succeed");

    spi.done();
    dc.done();
    rst.done();
}
