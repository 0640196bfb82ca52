//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits for use
//! in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use crate::color::{ColorPair, ColorSource};
use crate::display::{DrawSurface, RawPixel};
use crate::geometry::TileRect;

/// One observed draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRecord {
    /// Rectangle passed to the surface.
    pub rect: TileRect,
    /// Number of pixels passed.
    pub len: usize,
    /// First pixel of the buffer.
    pub first_pixel: Option<RawPixel>,
    /// Whether every pixel equalled the first one.
    pub uniform: bool,
}

/// Error returned by [`RecordingSurface`] on an injected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MockDrawError {
    /// Driver-style error code.
    pub code: i32,
}

/// Draw surface that records every call and can fail one of them.
pub struct RecordingSurface {
    draws: heapless::Vec<DrawRecord, 256>,
    attempts: usize,
    fail_at: Option<usize>,
}

impl RecordingSurface {
    /// Surface where every draw succeeds.
    pub fn new() -> Self {
        Self {
            draws: heapless::Vec::new(),
            attempts: 0,
            fail_at: None,
        }
    }

    /// Surface whose draw attempt number `attempt` (0-based, counted over the
    /// surface's lifetime) fails.
    pub fn failing_at(attempt: usize) -> Self {
        Self {
            fail_at: Some(attempt),
            ..Self::new()
        }
    }

    /// Successful draws, in call order.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// All draw calls, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Forget recorded draws (the attempt counter keeps running).
    pub fn clear(&mut self) {
        self.draws.clear();
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface for RecordingSurface {
    type Error = MockDrawError;

    async fn draw(&mut self, rect: TileRect, pixels: &[RawPixel]) -> Result<(), Self::Error> {
        let attempt = self.attempts;
        self.attempts = self.attempts.saturating_add(1);
        if self.fail_at == Some(attempt) {
            return Err(MockDrawError { code: -1 });
        }

        let first_pixel = pixels.first().copied();
        let record = DrawRecord {
            rect,
            len: pixels.len(),
            first_pixel,
            uniform: pixels.iter().all(|&p| Some(p) == first_pixel),
        };
        if self.draws.len() < self.draws.capacity() {
            let _ = self.draws.push(record);
        }
        Ok(())
    }
}

/// Color source yielding `(2n, 2n + 1)` on its n-th call.
pub struct SequenceColors {
    calls: u16,
}

impl SequenceColors {
    /// Start at `(0, 1)`.
    pub fn new() -> Self {
        Self { calls: 0 }
    }

    /// Pairs handed out so far.
    pub fn calls(&self) -> u16 {
        self.calls
    }
}

impl Default for SequenceColors {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSource for SequenceColors {
    fn next_pair(&mut self) -> ColorPair {
        let first = self.calls.wrapping_mul(2);
        self.calls = self.calls.wrapping_add(1);
        ColorPair {
            first,
            second: first.wrapping_add(1),
        }
    }
}

/// Delay that returns immediately and remembers how long it was asked to wait.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    total_ns: u64,
    calls: usize,
}

impl RecordingDelay {
    /// Fresh delay with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }

    /// Number of delay calls.
    pub fn calls(&self) -> usize {
        self.calls
    }

    fn record(&mut self, ns: u64) {
        self.total_ns = self.total_ns.saturating_add(ns);
        self.calls = self.calls.saturating_add(1);
    }
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us).saturating_mul(1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms).saturating_mul(1_000_000));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use embedded_hal_async::delay::DelayNs;

    const RECT: TileRect = TileRect {
        x_start: 0,
        y_start: 0,
        x_end: 2,
        y_end: 2,
    };

    #[tokio::test]
    async fn recording_surface_flags_uniform_buffers() {
        let mut surface = RecordingSurface::new();
        surface.draw(RECT, &[7, 7, 7, 7]).await.unwrap();
        surface.draw(RECT, &[7, 7, 8, 7]).await.unwrap();
        assert!(surface.draws()[0].uniform);
        assert!(!surface.draws()[1].uniform);
    }

    #[tokio::test]
    async fn recording_surface_fails_only_the_chosen_attempt() {
        let mut surface = RecordingSurface::failing_at(1);
        assert!(surface.draw(RECT, &[0; 4]).await.is_ok());
        assert_eq!(
            surface.draw(RECT, &[0; 4]).await,
            Err(MockDrawError { code: -1 })
        );
        assert!(surface.draw(RECT, &[0; 4]).await.is_ok());
        assert_eq!(surface.attempts(), 3);
        assert_eq!(surface.draws().len(), 2);
    }

    #[test]
    fn sequence_colors_count_up() {
        let mut colors = SequenceColors::new();
        assert_eq!(colors.next_pair(), ColorPair { first: 0, second: 1 });
        assert_eq!(colors.next_pair(), ColorPair { first: 2, second: 3 });
        assert_eq!(colors.calls(), 2);
    }

    #[tokio::test]
    async fn recording_delay_sums_units() {
        let mut delay = RecordingDelay::new();
        delay.delay_ms(100).await;
        delay.delay_us(500).await;
        delay.delay_ns(500_000).await;
        assert_eq!(delay.total_ms(), 101);
        assert_eq!(delay.calls(), 3);
    }
}
