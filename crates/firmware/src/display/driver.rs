//! ST7789 Hardware Driver
//!
//! Async driver for the ST7789 TFT controller driving a 240×320 IPS panel,
//! run in landscape (320×240) with 16-bit RGB565 pixels.
//!
//! # Wiring (STM32H743ZI example)
//!
//! | Signal | STM32 pin | Direction |
//! |--------|-----------|-----------|
//! | SCK    | PA5 (SPI1_SCK)  | Host → Display |
//! | MOSI   | PA7 (SPI1_MOSI) | Host → Display |
//! | DC     | PB0 (GPIO)      | Host → Display |
//! | CS     | Managed by `SpiDevice` | Host → Display |
//! | RST    | PB2 (GPIO)      | Host → Display |
//! | BL     | PB3 (GPIO)      | Host → Display |
//!
//! # Pixel transfer
//!
//! A draw sets the column window (CASET), the row window (RASET) and then
//! streams the rectangle's pixels after RAMWR in a single SPI write. The
//! controller expects each RGB565 pixel high byte first, so the renderer fills
//! tile buffers through [`DrawSurface::encode`] (big-endian in memory) and the
//! driver hands the buffer's own bytes to the DMA-backed bus without copying.
//! A write may carry at most [`MAX_TRANSFER_BYTES`].

// Panel coordinates are u16 on the wire while tile rectangles are u32; every
// cast below happens after a bounds check against the u16 panel size.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::arithmetic_side_effects,
)]

use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};

use platform::dma_safety::MAX_TRANSFER_BYTES;
use platform::{DrawSurface, RawPixel, TileRect};

use super::PanelConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// RGB565, 16 bits per pixel (COLMOD data byte).
pub const PIXEL_FORMAT_RGB565: u8 = 0x55;

// ---------------------------------------------------------------------------
// Command enum
// ---------------------------------------------------------------------------

/// ST7789 command codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum Command {
    /// Software reset: wait 120 ms before SLPOUT.
    SoftReset = 0x01,
    /// Enter sleep mode.
    SleepIn = 0x10,
    /// Leave sleep mode: wait 120 ms before the next SLPIN.
    SleepOut = 0x11,
    /// Normal display mode on.
    NormalMode = 0x13,
    /// Display off (panel blanked, RAM kept).
    DisplayOff = 0x28,
    /// Display on.
    DisplayOn = 0x29,
    /// Column address set: 4 data bytes (start, end; big-endian).
    ColumnAddressSet = 0x2A,
    /// Row address set: 4 data bytes (start, end; big-endian).
    RowAddressSet = 0x2B,
    /// Memory write: pixel data follows.
    MemoryWrite = 0x2C,
    /// Memory data access control: 1 data byte (orientation).
    MemoryAccessControl = 0x36,
    /// Interface pixel format: 1 data byte.
    PixelFormat = 0x3A,
}

// ---------------------------------------------------------------------------
// Driver struct
// ---------------------------------------------------------------------------

/// ST7789 display driver.
///
/// Generic over:
/// - `SPI`: an async [`embedded_hal_async::spi::SpiDevice`] (manages CS).
/// - `DC`: Data/Command [`embedded_hal::digital::OutputPin`].
/// - `RST`: Reset [`embedded_hal::digital::OutputPin`].
/// - `DELAY`: [`embedded_hal_async::delay::DelayNs`] for timing.
///
/// On the STM32H743 target supply `embassy_time::Delay` for the `DELAY`
/// parameter. In host tests supply `embedded_hal_mock::eh1::delay::NoopDelay`.
pub struct St7789<SPI, DC, RST, DELAY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: DELAY,
    config: PanelConfig,
}

impl<SPI, DC, RST, DELAY> St7789<SPI, DC, RST, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new driver instance. Call [`init`](Self::init) before drawing.
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: DELAY, config: PanelConfig) -> Self {
        Self {
            spi,
            dc,
            rst,
            delay,
            config,
        }
    }

    /// Panel configuration in use.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Release the bus and pins.
    pub fn into_parts(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }

    // -----------------------------------------------------------------------
    // Low-level SPI helpers
    // -----------------------------------------------------------------------

    /// Assert DC low (command mode) and send one command byte over SPI.
    async fn send_command(&mut self, cmd: Command) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Gpio)?;
        self.spi
            .write(&[cmd as u8])
            .await
            .map_err(|_| DisplayError::Communication)
    }

    /// Assert DC high (data mode) and send bytes over SPI.
    async fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if data.is_empty() {
            return Ok(());
        }
        self.dc.set_high().map_err(|_| DisplayError::Gpio)?;
        self.spi
            .write(data)
            .await
            .map_err(|_| DisplayError::Communication)
    }

    /// Send one command followed immediately by its data bytes.
    async fn cmd_data(&mut self, cmd: Command, data: &[u8]) -> Result<(), DisplayError> {
        self.send_command(cmd).await?;
        self.send_data(data).await
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Hardware reset sequence.
    ///
    /// RST HIGH 1 ms → LOW 10 ms → HIGH 120 ms.
    async fn hardware_reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::Gpio)?;
        self.delay.delay_ms(1).await;
        self.rst.set_low().map_err(|_| DisplayError::Gpio)?;
        self.delay.delay_ms(10).await;
        self.rst.set_high().map_err(|_| DisplayError::Gpio)?;
        self.delay.delay_ms(120).await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Address window
    // -----------------------------------------------------------------------

    /// Check `rect` against the panel and return its inclusive corners.
    fn window(&self, rect: TileRect) -> Result<(u16, u16, u16, u16), DisplayError> {
        let width = u32::from(self.config.width);
        let height = u32::from(self.config.height);
        if rect.x_start >= rect.x_end
            || rect.y_start >= rect.y_end
            || rect.x_end > width
            || rect.y_end > height
        {
            return Err(DisplayError::InvalidCoordinate);
        }
        // x_end > x_start >= 0 and x_end <= width <= u16::MAX, same for y.
        Ok((
            rect.x_start as u16,
            rect.y_start as u16,
            (rect.x_end - 1) as u16,
            (rect.y_end - 1) as u16,
        ))
    }

    /// Set the column (CASET) and row (RASET) address windows, inclusive.
    async fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        let [x0_hi, x0_lo] = x0.to_be_bytes();
        let [x1_hi, x1_lo] = x1.to_be_bytes();
        self.cmd_data(Command::ColumnAddressSet, &[x0_hi, x0_lo, x1_hi, x1_lo])
            .await?;
        let [y0_hi, y0_lo] = y0.to_be_bytes();
        let [y1_hi, y1_lo] = y1.to_be_bytes();
        self.cmd_data(Command::RowAddressSet, &[y0_hi, y0_lo, y1_hi, y1_lo])
            .await
    }

    // -----------------------------------------------------------------------
    // Pixel streaming
    // -----------------------------------------------------------------------

    /// RAMWR, then every pixel in one write straight from `pixels`.
    async fn write_pixels(&mut self, pixels: &[RawPixel]) -> Result<(), DisplayError> {
        self.send_command(Command::MemoryWrite).await?;
        self.send_data(pixel_bytes(pixels)).await
    }

    // -----------------------------------------------------------------------
    // Initialisation (public for testing / firmware)
    // -----------------------------------------------------------------------

    /// Full initialisation sequence: reset, wake, RGB565, orientation, on.
    ///
    /// Must be called once after power-on before any draw.
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        // 1. Hardware reset
        self.hardware_reset().await?;

        // 2. Software reset: registers back to defaults
        self.send_command(Command::SoftReset).await?;
        self.delay.delay_ms(150).await;

        // 3. Leave sleep mode
        self.send_command(Command::SleepOut).await?;
        self.delay.delay_ms(120).await;

        // 4. 16 bits per pixel
        self.cmd_data(Command::PixelFormat, &[PIXEL_FORMAT_RGB565])
            .await?;

        // 5. Orientation (landscape: MV)
        let madctl = self.config.madctl();
        self.cmd_data(Command::MemoryAccessControl, &[madctl]).await?;

        // 6. Normal mode, panel on
        self.send_command(Command::NormalMode).await?;
        self.send_command(Command::DisplayOn).await?;
        self.delay.delay_ms(20).await;

        Ok(())
    }

    /// Blank the panel and enter sleep mode (RAM kept).
    ///
    /// [`init`](Self::init) brings the panel back.
    pub async fn sleep(&mut self) -> Result<(), DisplayError> {
        self.send_command(Command::DisplayOff).await?;
        self.send_command(Command::SleepIn).await?;
        self.delay.delay_ms(120).await;
        Ok(())
    }

    /// Write `pixels` (row-major, `rect.pixel_count()` long, already in wire
    /// order) into `rect`.
    pub async fn write_rect(
        &mut self,
        rect: TileRect,
        pixels: &[RawPixel],
    ) -> Result<(), DisplayError> {
        let (x0, y0, x1, y1) = self.window(rect)?;
        if pixels.len() != rect.pixel_count() {
            return Err(DisplayError::InvalidBuffer);
        }
        if core::mem::size_of_val(pixels) > MAX_TRANSFER_BYTES {
            return Err(DisplayError::TransferTooLarge);
        }
        self.set_window(x0, y0, x1, y1).await?;
        self.write_pixels(pixels).await
    }
}

/// The bytes `pixels` occupies in memory, without copying.
#[allow(unsafe_code)]
fn pixel_bytes(pixels: &[RawPixel]) -> &[u8] {
    // SAFETY: u16 has no padding and every byte pattern is a valid u8; u8 has
    // alignment 1 and the length covers exactly the memory of `pixels`, which
    // stays borrowed for the returned lifetime.
    unsafe {
        core::slice::from_raw_parts(pixels.as_ptr().cast::<u8>(), core::mem::size_of_val(pixels))
    }
}

// ---------------------------------------------------------------------------
// platform::DrawSurface implementation
// ---------------------------------------------------------------------------

impl<SPI, DC, RST, DELAY> DrawSurface for St7789<SPI, DC, RST, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    type Error = DisplayError;

    /// Big-endian in memory, the order RAMWR expects on the wire.
    fn encode(&self, color: RawPixel) -> RawPixel {
        color.to_be()
    }

    async fn draw(&mut self, rect: TileRect, pixels: &[RawPixel]) -> Result<(), Self::Error> {
        self.write_rect(rect, pixels).await
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors returned by the ST7789 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// SPI communication error.
    Communication,
    /// GPIO operation error.
    Gpio,
    /// Pixel buffer length does not match the rectangle.
    InvalidBuffer,
    /// Rectangle is empty or outside the panel.
    InvalidCoordinate,
    /// Pixel data exceeds one SPI DMA transfer.
    TransferTooLarge,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Communication => write!(f, "SPI communication error"),
            Self::Gpio => write!(f, "GPIO error"),
            Self::InvalidBuffer => write!(f, "Pixel buffer does not match rectangle"),
            Self::InvalidCoordinate => write!(f, "Rectangle out of bounds"),
            Self::TransferTooLarge => write!(f, "Pixel data exceeds one SPI transfer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}

// ---------------------------------------------------------------------------
// Convenience type alias for the hardware binary
// ---------------------------------------------------------------------------

/// Type alias used by `firmware/src/main.rs` on the STM32H7 target.
///
/// The SPI device is an `embedded_hal_bus::spi::ExclusiveDevice` over the
/// DMA-driven SPI1 bus; the delay source is `embassy_time::Delay`.
#[cfg(feature = "hardware")]
pub type St7789Display<SPI, DC, RST> = St7789<SPI, DC, RST, embassy_time::Delay>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Encoded `cmd` byte for SPI write expectation.
    fn cmd_byte(c: Command) -> u8 {
        c as u8
    }

    /// TransactionStart + Write(data) + TransactionEnd, as produced by one
    /// `SpiDevice::write()` call.
    fn spi_device_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(data.to_vec()),
            SpiTransaction::transaction_end(),
        ]
    }

    /// Flatten a list of writes into one expectation list.
    fn writes(chunks: &[&[u8]]) -> Vec<SpiTransaction<u8>> {
        chunks.iter().flat_map(|c| spi_device_write(c)).collect()
    }

    /// DC expectations: one LOW per command, one HIGH per data write.
    fn dc_sequence(levels: &[PinState]) -> PinMock {
        let txns: Vec<PinTransaction> = levels.iter().map(|&l| PinTransaction::set(l)).collect();
        PinMock::new(&txns)
    }

    /// Create a minimal (no-expectation) pin mock for unused pins.
    fn idle_pin() -> PinMock {
        PinMock::new(&[])
    }

    fn rect(x_start: u32, y_start: u32, x_end: u32, y_end: u32) -> TileRect {
        TileRect {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    // -----------------------------------------------------------------------
    // Test: init sequence (byte-level SPI verification)
    // -----------------------------------------------------------------------

    /// Expected sequence:
    ///  1. RST HIGH → LOW → HIGH  (no SPI bytes)
    ///  2. SWRESET (0x01)
    ///  3. SLPOUT  (0x11)
    ///  4. COLMOD  (0x3A), data=[0x55]
    ///  5. MADCTL  (0x36), data=[0x20]  (landscape)
    ///  6. NORON   (0x13)
    ///  7. DISPON  (0x29)
    #[tokio::test]
    async fn test_init_sequence() {
        let spi_expectations = writes(&[
            &[cmd_byte(Command::SoftReset)],
            &[cmd_byte(Command::SleepOut)],
            &[cmd_byte(Command::PixelFormat)],
            &[0x55],
            &[cmd_byte(Command::MemoryAccessControl)],
            &[0x20],
            &[cmd_byte(Command::NormalMode)],
            &[cmd_byte(Command::DisplayOn)],
        ]);
        use PinState::{High, Low};
        let mut dc = dc_sequence(&[Low, Low, Low, High, Low, High, Low, Low]);
        let mut rst = PinMock::new(&[
            PinTransaction::set(High),
            PinTransaction::set(Low),
            PinTransaction::set(High),
        ]);
        let mut spi = SpiMock::new(&spi_expectations);

        let mut drv = St7789::new(
            spi.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            PanelConfig::default(),
        );
        drv.init().await.expect("init should succeed");

        spi.done();
        dc.done();
        rst.done();
    }

    // -----------------------------------------------------------------------
    // Test: one tile write
    // -----------------------------------------------------------------------

    /// A 2×2 block at (240, 160): inclusive window 240..=241, 160..=161, then
    /// four pixels high byte first.
    #[tokio::test]
    async fn test_draw_sets_window_and_streams_big_endian() {
        let spi_expectations = writes(&[
            &[cmd_byte(Command::ColumnAddressSet)],
            &[0x00, 0xF0, 0x00, 0xF1],
            &[cmd_byte(Command::RowAddressSet)],
            &[0x00, 0xA0, 0x00, 0xA1],
            &[cmd_byte(Command::MemoryWrite)],
            &[0xF8, 0x00, 0x07, 0xE0, 0x00, 0x1F, 0xFF, 0xFF],
        ]);
        use PinState::{High, Low};
        let mut dc = dc_sequence(&[Low, High, Low, High, Low, High]);
        let mut spi = SpiMock::new(&spi_expectations);
        let mut rst = idle_pin();

        let mut drv = St7789::new(
            spi.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            PanelConfig::default(),
        );
        let pixels = [0xF800, 0x07E0, 0x001F, 0xFFFF].map(|c| drv.encode(c));
        drv.draw(rect(240, 160, 242, 162), &pixels).await.unwrap();

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn test_encode_is_big_endian_in_memory() {
        let drv = St7789::new(
            SpiMock::<u8>::new(&[]),
            idle_pin(),
            idle_pin(),
            NoopDelay,
            PanelConfig::default(),
        );
        let pixel = [drv.encode(0xF81F)];
        assert_eq!(pixel_bytes(&pixel), &[0xF8, 0x1F]);

        let (mut spi, mut dc, mut rst) = drv.into_parts();
        spi.done();
        dc.done();
        rst.done();
    }

    /// 130 pixels (260 bytes) still go out as one RAMWR payload.
    #[tokio::test]
    async fn test_draw_sends_payload_in_one_write() {
        let payload = vec![0x12u8; 260];
        let spi_expectations = writes(&[
            &[cmd_byte(Command::ColumnAddressSet)],
            &[0x00, 0x00, 0x00, 0x81],
            &[cmd_byte(Command::RowAddressSet)],
            &[0x00, 0x00, 0x00, 0x00],
            &[cmd_byte(Command::MemoryWrite)],
            payload.as_slice(),
        ]);
        use PinState::{High, Low};
        let mut dc = dc_sequence(&[Low, High, Low, High, Low, High]);
        let mut spi = SpiMock::new(&spi_expectations);
        let mut rst = idle_pin();

        let mut drv = St7789::new(
            spi.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            PanelConfig::default(),
        );
        drv.draw(rect(0, 0, 130, 1), &[0x1212; 130]).await.unwrap();

        spi.done();
        dc.done();
        rst.done();
    }

    /// `SpiDevice` that remembers where each written slice lives.
    #[derive(Default)]
    struct AddressRecordingSpi {
        writes: Vec<(usize, usize)>,
    }

    impl embedded_hal_async::spi::ErrorType for AddressRecordingSpi {
        type Error = core::convert::Infallible;
    }

    impl SpiDevice for AddressRecordingSpi {
        async fn transaction(
            &mut self,
            operations: &mut [embedded_hal_async::spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for op in operations.iter() {
                if let embedded_hal_async::spi::Operation::Write(bytes) = op {
                    self.writes.push((bytes.as_ptr() as usize, bytes.len()));
                }
            }
            Ok(())
        }
    }

    /// A full 80×80 tile is written from its own buffer in one transfer.
    #[tokio::test]
    async fn test_tile_payload_is_sent_from_the_buffer() {
        use PinState::{High, Low};
        let mut dc = dc_sequence(&[Low, High, Low, High, Low, High]);
        let mut rst = idle_pin();
        let mut drv = St7789::new(
            AddressRecordingSpi::default(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            PanelConfig::default(),
        );

        let tile = vec![drv.encode(0x07E0); 6_400];
        drv.draw(rect(80, 80, 160, 160), &tile).await.unwrap();

        let start = tile.as_ptr() as usize;
        let end = start + core::mem::size_of_val(tile.as_slice());
        let payload: Vec<_> = drv.spi.writes.iter().filter(|(_, len)| *len > 4).collect();
        assert_eq!(payload.len(), 1, "one RAMWR payload write per tile");
        let &&(addr, len) = payload.first().unwrap();
        assert_eq!((addr, len), (start, end - start));
        assert!(len <= MAX_TRANSFER_BYTES);
        assert_eq!(drv.spi.writes.len(), 6);

        dc.done();
        rst.done();
    }

    // -----------------------------------------------------------------------
    // Test: argument validation happens before any bus traffic
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_out_of_bounds_rect_rejected() {
        let mut spi = SpiMock::new(&[]);
        let mut dc = idle_pin();
        let mut rst = idle_pin();
        let mut drv = St7789::new(
            spi.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            PanelConfig::default(),
        );

        assert_eq!(
            drv.draw(rect(280, 0, 360, 80), &[0; 6_400]).await,
            Err(DisplayError::InvalidCoordinate)
        );
        assert_eq!(
            drv.draw(rect(10, 10, 10, 20), &[]).await,
            Err(DisplayError::InvalidCoordinate),
            "empty rectangles are rejected"
        );

        spi.done();
        dc.done();
        rst.done();
    }

    #[tokio::test]
    async fn test_buffer_length_must_match_rect() {
        let mut spi = SpiMock::new(&[]);
        let mut dc = idle_pin();
        let mut rst = idle_pin();
        let mut drv = St7789::new(
            spi.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            PanelConfig::default(),
        );

        assert_eq!(
            drv.draw(rect(0, 0, 80, 80), &[0; 100]).await,
            Err(DisplayError::InvalidBuffer)
        );
        // 320×21 is in bounds but larger than one tile transfer.
        assert_eq!(
            drv.draw(rect(0, 0, 320, 21), &[0; 6_720]).await,
            Err(DisplayError::TransferTooLarge)
        );

        spi.done();
        dc.done();
        rst.done();
    }

    // -----------------------------------------------------------------------
    // Test: sleep command
    // -----------------------------------------------------------------------

    /// `sleep()` emits DISPOFF then SLPIN, both commands without data.
    #[tokio::test]
    async fn test_sleep_command() {
        let spi_expectations = writes(&[
            &[cmd_byte(Command::DisplayOff)],
            &[cmd_byte(Command::SleepIn)],
        ]);
        let mut spi = SpiMock::new(&spi_expectations);
        let mut dc = dc_sequence(&[PinState::Low, PinState::Low]);
        let mut rst = idle_pin();

        let mut drv = St7789::new(
            spi.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay,
            PanelConfig::default(),
        );
        drv.sleep().await.unwrap();

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn test_command_codes() {
        assert_eq!(Command::SoftReset as u8, 0x01);
        assert_eq!(Command::SleepIn as u8, 0x10);
        assert_eq!(Command::SleepOut as u8, 0x11);
        assert_eq!(Command::NormalMode as u8, 0x13);
        assert_eq!(Command::DisplayOff as u8, 0x28);
        assert_eq!(Command::DisplayOn as u8, 0x29);
        assert_eq!(Command::ColumnAddressSet as u8, 0x2A);
        assert_eq!(Command::RowAddressSet as u8, 0x2B);
        assert_eq!(Command::MemoryWrite as u8, 0x2C);
        assert_eq!(Command::MemoryAccessControl as u8, 0x36);
        assert_eq!(Command::PixelFormat as u8, 0x3A);
        assert_eq!(PIXEL_FORMAT_RGB565, 0x55);
    }

    #[test]
    fn test_display_error_messages() {
        assert_eq!(
            std::format!("{}", DisplayError::InvalidCoordinate),
            "Rectangle out of bounds"
        );
    }
}
