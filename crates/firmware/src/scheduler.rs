//! Refresh scheduler
//!
//! Drives the renderer forever: one full pass, then the refresh interval.
//! Aborted passes are counted and otherwise ignored; the next pass starts
//! normally.

use embedded_hal_async::delay::DelayNs;
use platform::{ColorSource, DrawSurface, RefreshConfig};

use crate::renderer::{PassOutcome, TileRenderer};

/// Pass counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshStats {
    /// Passes that drew every tile.
    pub completed: u32,
    /// Passes cut short by a draw failure.
    pub aborted: u32,
}

impl RefreshStats {
    /// Total passes run.
    pub fn passes(&self) -> u32 {
        self.completed.saturating_add(self.aborted)
    }

    fn record<E>(&mut self, outcome: &PassOutcome<E>) {
        if outcome.is_completed() {
            self.completed = self.completed.saturating_add(1);
        } else {
            self.aborted = self.aborted.saturating_add(1);
        }
    }
}

/// Owns the renderer, the draw surface and the delay source.
pub struct RefreshScheduler<'a, C, S, D> {
    renderer: TileRenderer<'a, C>,
    surface: S,
    delay: D,
    refresh_interval_ms: u32,
    stats: RefreshStats,
}

impl<'a, C, S, D> RefreshScheduler<'a, C, S, D>
where
    C: ColorSource,
    S: DrawSurface,
    D: DelayNs,
{
    /// Build a scheduler running at the cadence in `config`.
    pub fn new(renderer: TileRenderer<'a, C>, surface: S, delay: D, config: &RefreshConfig) -> Self {
        Self {
            renderer,
            surface,
            delay,
            refresh_interval_ms: config.refresh_interval_ms,
            stats: RefreshStats::default(),
        }
    }

    /// One pass followed by the refresh interval.
    pub async fn tick(&mut self) -> PassOutcome<S::Error> {
        let outcome = self
            .renderer
            .render_pass(&mut self.surface, &mut self.delay)
            .await;
        self.stats.record(&outcome);
        if let PassOutcome::Aborted { tiles_drawn, .. } = &outcome {
            warn!(
                "pass aborted after {} tiles ({} aborted so far)",
                *tiles_drawn, self.stats.aborted
            );
        }
        self.delay.delay_ms(self.refresh_interval_ms).await;
        outcome
    }

    /// Run `passes` ticks and return the counters for just those passes.
    pub async fn run_for(&mut self, passes: u32) -> RefreshStats {
        let mut stats = RefreshStats::default();
        for _ in 0..passes {
            let outcome = self.tick().await;
            stats.record(&outcome);
        }
        stats
    }

    /// Counters since construction.
    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    /// The renderer, e.g. to inspect the tile buffers.
    pub fn renderer(&self) -> &TileRenderer<'a, C> {
        &self.renderer
    }

    /// The draw surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Take the scheduler apart for teardown.
    pub fn into_parts(self) -> (TileRenderer<'a, C>, S, D) {
        (self.renderer, self.surface, self.delay)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pool::TileBufferPool;
    use platform::dma_safety::HostRam;
    use platform::mocks::{RecordingDelay, RecordingSurface, SequenceColors};
    use platform::{DisplayGeometry, DisplayGrid, DmaArena};

    fn scheduler<'a>(
        arena: &mut DmaArena<'a, HostRam>,
        surface: RecordingSurface,
    ) -> RefreshScheduler<'a, SequenceColors, RecordingSurface, RecordingDelay> {
        let config = RefreshConfig::default();
        let grid = DisplayGrid::new(DisplayGeometry::square_tiles(8, 6, 2)).unwrap();
        let pool =
            TileBufferPool::allocate(arena, grid.tile_count(), grid.tile_pixel_count()).unwrap();
        let renderer = TileRenderer::new(grid, pool, SequenceColors::new(), &config).unwrap();
        RefreshScheduler::new(renderer, surface, RecordingDelay::new(), &config)
    }

    #[tokio::test]
    async fn tick_is_pass_then_interval() {
        let mut memory = [0u16; 48];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut scheduler = scheduler(&mut arena, RecordingSurface::new());

        let outcome = scheduler.tick().await;
        assert!(outcome.is_completed());
        assert_eq!(scheduler.surface().draws().len(), 12);

        let (_, _, delay) = scheduler.into_parts();
        // settle (100 ms) + interval (1000 ms)
        assert_eq!(delay.calls(), 2);
        assert_eq!(delay.total_ms(), 1_100);
    }

    #[tokio::test]
    async fn aborted_pass_does_not_stop_the_loop() {
        let mut memory = [0u16; 48];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut scheduler = scheduler(&mut arena, RecordingSurface::failing_at(13));

        let stats = scheduler.run_for(3).await;
        assert_eq!(stats, RefreshStats { completed: 2, aborted: 1 });
        assert_eq!(stats.passes(), 3);
        // 12 + 1 (second pass dies on its second tile) + 12
        assert_eq!(scheduler.surface().draws().len(), 25);
        assert_eq!(scheduler.renderer().passes(), 3);
    }

    #[tokio::test]
    async fn run_for_reports_only_its_own_passes() {
        let mut memory = [0u16; 48];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut scheduler = scheduler(&mut arena, RecordingSurface::failing_at(0));

        let _ = scheduler.tick().await;
        let stats = scheduler.run_for(2).await;
        assert_eq!(stats, RefreshStats { completed: 2, aborted: 0 });
        assert_eq!(scheduler.stats(), RefreshStats { completed: 2, aborted: 1 });
    }
}
