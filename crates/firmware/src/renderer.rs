//! Tile renderer
//!
//! One refresh pass walks the grid row by row, two tiles at a time. Each step
//! takes a fresh [`ColorPair`](platform::ColorPair), fills both tile buffers
//! with it and draws them left then right. The first draw failure ends the
//! pass. Either way the pass finishes with the settle delay.
//!
//! ```text
//! row 0:  [ 0 | 1 ]  [ 2 | 3 ]
//! row 1:  [ 4 | 5 ]  [ 6 | 7 ]
//! row 2:  [ 8 | 9 ]  [10 |11 ]
//!          step 1     step 2   ...
//! ```

use embedded_hal_async::delay::DelayNs;
use platform::{ColorSource, DisplayGrid, DrawSurface, RefreshConfig};
use thiserror_no_std::Error;

use crate::pool::TileBufferPool;

/// Position of a tile within the grid and the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TilePosition {
    /// Tile row.
    pub row: usize,
    /// Tile column.
    pub column: usize,
    /// Linear buffer index.
    pub index: usize,
}

/// Result of one refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome<E> {
    /// Every tile was drawn.
    Completed {
        /// Draw calls that succeeded.
        tiles_drawn: usize,
    },
    /// A draw failed and the rest of the pass was skipped.
    Aborted {
        /// Tile whose draw failed.
        at: TilePosition,
        /// Draw calls that succeeded before the failure.
        tiles_drawn: usize,
        /// Error reported by the surface.
        error: E,
    },
}

impl<E> PassOutcome<E> {
    /// `true` for [`PassOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Successful draw calls in this pass.
    pub fn tiles_drawn(&self) -> usize {
        match self {
            Self::Completed { tiles_drawn } | Self::Aborted { tiles_drawn, .. } => *tiles_drawn,
        }
    }
}

/// Renderer construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RendererError {
    /// The pool does not hold exactly one buffer per tile.
    #[error("pool holds {pool} buffers, grid has {tiles} tiles")]
    PoolSizeMismatch {
        /// Buffers in the pool.
        pool: usize,
        /// Tiles in the grid.
        tiles: usize,
    },
    /// Pool buffers are not the size of one tile.
    #[error("pool buffers hold {pool} pixels, tiles need {tile}")]
    BufferSizeMismatch {
        /// Pixels per pool buffer.
        pool: usize,
        /// Pixels per tile.
        tile: usize,
    },
}

/// Paints the whole grid with solid-color tiles, one pass at a time.
pub struct TileRenderer<'a, C> {
    grid: DisplayGrid,
    pool: TileBufferPool<'a>,
    colors: C,
    settle_delay_ms: u32,
    passes: u32,
}

impl<'a, C: ColorSource> TileRenderer<'a, C> {
    /// Bind a grid to a pool sized for it.
    pub fn new(
        grid: DisplayGrid,
        pool: TileBufferPool<'a>,
        colors: C,
        config: &RefreshConfig,
    ) -> Result<Self, RendererError> {
        if pool.len() != grid.tile_count() {
            return Err(RendererError::PoolSizeMismatch {
                pool: pool.len(),
                tiles: grid.tile_count(),
            });
        }
        if pool.tile_pixel_count() != grid.tile_pixel_count() {
            return Err(RendererError::BufferSizeMismatch {
                pool: pool.tile_pixel_count(),
                tile: grid.tile_pixel_count(),
            });
        }
        Ok(Self {
            grid,
            pool,
            colors,
            settle_delay_ms: config.settle_delay_ms,
            passes: 0,
        })
    }

    /// The grid being painted.
    pub fn grid(&self) -> &DisplayGrid {
        &self.grid
    }

    /// The tile buffers, as left by the last pass.
    pub fn pool(&self) -> &TileBufferPool<'a> {
        &self.pool
    }

    /// Passes started so far.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Run one refresh pass, then wait the settle delay.
    ///
    /// A draw failure is logged, stops the pass and is returned in
    /// [`PassOutcome::Aborted`]; the settle delay still runs.
    pub async fn render_pass<S, D>(
        &mut self,
        surface: &mut S,
        delay: &mut D,
    ) -> PassOutcome<S::Error>
    where
        S: DrawSurface,
        D: DelayNs,
    {
        self.passes = self.passes.wrapping_add(1);
        trace!("pass {} start", self.passes);

        let outcome = Self::draw_grid(&self.grid, &mut self.pool, &mut self.colors, surface).await;
        if outcome.is_completed() {
            debug!("pass {} complete: {} tiles", self.passes, outcome.tiles_drawn());
        }

        delay.delay_ms(self.settle_delay_ms).await;
        outcome
    }

    async fn draw_grid<S: DrawSurface>(
        grid: &DisplayGrid,
        pool: &mut TileBufferPool<'a>,
        colors: &mut C,
        surface: &mut S,
    ) -> PassOutcome<S::Error> {
        let mut tiles_drawn = 0usize;

        for pair in grid.pairs() {
            let color = colors.next_pair();
            // Pool length equals the tile count (checked in `new`), and pairs
            // never start in the last column, so `index + 1` is in range.
            let Some((first, second)) = pool.pair_mut(pair.index) else {
                break;
            };
            first.fill(surface.encode(color.first));
            second.fill(surface.encode(color.second));

            let tiles = [
                (pair.first, pair.column, &*first),
                (pair.second, pair.column.saturating_add(1), &*second),
            ];
            for (rect, column, pixels) in tiles {
                if let Err(error) = surface.draw(rect, pixels).await {
                    let at = TilePosition {
                        row: pair.row,
                        column,
                        index: pair.index.saturating_add(column.saturating_sub(pair.column)),
                    };
                    error!(
                        "tile draw failed at row {} column {} (tile {}): {:?}",
                        at.row,
                        at.column,
                        tiles_drawn.saturating_add(1),
                        error
                    );
                    return PassOutcome::Aborted {
                        at,
                        tiles_drawn,
                        error,
                    };
                }
                tiles_drawn = tiles_drawn.saturating_add(1);
            }
        }

        PassOutcome::Completed { tiles_drawn }
    }

    /// Take the renderer apart, e.g. to release the pool.
    pub fn into_parts(self) -> (DisplayGrid, TileBufferPool<'a>, C) {
        (self.grid, self.pool, self.colors)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use platform::config::REFERENCE_GEOMETRY;
    use platform::dma_safety::HostRam;
    use platform::mocks::{MockDrawError, RecordingDelay, RecordingSurface, SequenceColors};
    use platform::{DisplayGeometry, DmaArena, TileRect};

    const SMALL: DisplayGeometry = DisplayGeometry::square_tiles(8, 6, 2);

    fn renderer<'a>(
        arena: &mut DmaArena<'a, HostRam>,
        geometry: DisplayGeometry,
    ) -> TileRenderer<'a, SequenceColors> {
        let grid = DisplayGrid::new(geometry).unwrap();
        let pool =
            TileBufferPool::allocate(arena, grid.tile_count(), grid.tile_pixel_count()).unwrap();
        TileRenderer::new(grid, pool, SequenceColors::new(), &RefreshConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn reference_pass_draws_twelve_tiles_in_order() {
        let mut memory = vec![0u16; 12 * 6_400];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut renderer = renderer(&mut arena, REFERENCE_GEOMETRY);
        let mut surface = RecordingSurface::new();
        let mut delay = RecordingDelay::new();

        let outcome = renderer.render_pass(&mut surface, &mut delay).await;
        assert_eq!(outcome, PassOutcome::Completed { tiles_drawn: 12 });

        let origins: Vec<(u32, u32)> = surface
            .draws()
            .iter()
            .map(|d| (d.rect.x_start, d.rect.y_start))
            .collect();
        let mut expected = Vec::new();
        for y in [0, 80, 160] {
            for x in [0, 80, 160, 240] {
                expected.push((x, y));
            }
        }
        assert_eq!(origins, expected);
        assert!(surface.draws().iter().all(|d| d.len == 6_400));
        assert_eq!(
            surface.draws()[11].rect,
            TileRect {
                x_start: 240,
                y_start: 160,
                x_end: 320,
                y_end: 240
            }
        );
    }

    #[tokio::test]
    async fn pair_colors_go_left_then_right() {
        let mut memory = [0u16; 12 * 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut renderer = renderer(&mut arena, SMALL);
        let mut surface = RecordingSurface::new();
        let mut delay = RecordingDelay::new();

        renderer.render_pass(&mut surface, &mut delay).await;

        // SequenceColors hands out (0, 1), (2, 3), ... so tile n gets color n.
        for (n, draw) in surface.draws().iter().enumerate() {
            assert!(draw.uniform);
            assert_eq!(draw.first_pixel, Some(n as u16));
        }
        for index in 0..12 {
            let buffer = renderer.pool().buffer(index).unwrap();
            assert!(buffer.iter().all(|&p| p == index as u16));
        }
    }

    /// Surface that wants its buffers byte-swapped, like a panel streaming
    /// big-endian pixels straight from memory.
    struct SwappingSurface(RecordingSurface);

    impl DrawSurface for SwappingSurface {
        type Error = MockDrawError;

        fn encode(&self, color: u16) -> u16 {
            color.swap_bytes()
        }

        async fn draw(&mut self, rect: TileRect, pixels: &[u16]) -> Result<(), Self::Error> {
            self.0.draw(rect, pixels).await
        }
    }

    #[tokio::test]
    async fn buffers_are_filled_in_the_surface_encoding() {
        let mut memory = [0u16; 12 * 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut renderer = renderer(&mut arena, SMALL);
        let mut surface = SwappingSurface(RecordingSurface::new());

        renderer
            .render_pass(&mut surface, &mut RecordingDelay::new())
            .await;

        for (n, draw) in surface.0.draws().iter().enumerate() {
            assert_eq!(draw.first_pixel, Some((n as u16).swap_bytes()));
        }
        assert!(renderer.pool().buffer(1).unwrap().iter().all(|&p| p == 0x0100));
    }

    #[tokio::test]
    async fn settle_delay_follows_every_pass() {
        let mut memory = [0u16; 12 * 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut renderer = renderer(&mut arena, SMALL);
        let mut surface = RecordingSurface::new();
        let mut delay = RecordingDelay::new();

        renderer.render_pass(&mut surface, &mut delay).await;
        assert_eq!(delay.calls(), 1);
        assert_eq!(delay.total_ms(), 100);
    }

    #[tokio::test]
    async fn failure_at_fifth_tile_stops_the_pass() {
        let mut memory = [0u16; 12 * 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut renderer = renderer(&mut arena, SMALL);
        let mut surface = RecordingSurface::failing_at(4);
        let mut delay = RecordingDelay::new();

        let outcome = renderer.render_pass(&mut surface, &mut delay).await;
        assert_eq!(
            outcome,
            PassOutcome::Aborted {
                at: TilePosition {
                    row: 1,
                    column: 0,
                    index: 4
                },
                tiles_drawn: 4,
                error: MockDrawError { code: -1 },
            }
        );
        assert_eq!(surface.attempts(), 5);
        assert_eq!(surface.draws().len(), 4);
        assert_eq!(delay.total_ms(), 100, "aborted pass still settles");
        // Only the failing pair was colored before the abort.
        assert_eq!(renderer.colors_used(), 3);
    }

    /// Every surface error the firmware ships can go into the failure log line.
    #[test]
    fn surface_errors_are_loggable() {
        fn loggable<E: platform::DrawError>() {}
        loggable::<MockDrawError>();
        loggable::<crate::display::DisplayError>();
        loggable::<crate::display::SurfaceError<core::convert::Infallible>>();
    }

    #[tokio::test]
    async fn failure_on_right_tile_reports_its_column() {
        let mut memory = [0u16; 12 * 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut renderer = renderer(&mut arena, SMALL);
        let mut surface = RecordingSurface::failing_at(3);
        let mut delay = RecordingDelay::new();

        match renderer.render_pass(&mut surface, &mut delay).await {
            PassOutcome::Aborted { at, tiles_drawn, .. } => {
                assert_eq!(at, TilePosition { row: 0, column: 3, index: 3 });
                assert_eq!(tiles_drawn, 3);
            }
            other => panic!("expected abort, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn next_pass_recovers_with_fresh_colors() {
        let mut memory = [0u16; 12 * 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let mut renderer = renderer(&mut arena, SMALL);
        let mut surface = RecordingSurface::failing_at(0);
        let mut delay = RecordingDelay::new();

        assert!(!renderer.render_pass(&mut surface, &mut delay).await.is_completed());
        surface.clear();

        let outcome = renderer.render_pass(&mut surface, &mut delay).await;
        assert_eq!(outcome, PassOutcome::Completed { tiles_drawn: 12 });
        // One pair was consumed by the aborted pass; colors never repeat.
        assert_eq!(surface.draws()[0].first_pixel, Some(2));
        assert_eq!(renderer.passes(), 2);
        assert_eq!(delay.calls(), 2);
    }

    #[test]
    fn rejects_pool_of_wrong_length() {
        let mut memory = [0u16; 10 * 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let grid = DisplayGrid::new(SMALL).unwrap();
        let pool = TileBufferPool::allocate(&mut arena, 10, 4).unwrap();
        let err = TileRenderer::new(grid, pool, SequenceColors::new(), &RefreshConfig::default())
            .err()
            .unwrap();
        assert_eq!(err, RendererError::PoolSizeMismatch { pool: 10, tiles: 12 });
    }

    #[test]
    fn rejects_pool_of_wrong_buffer_size() {
        let mut memory = [0u16; 12 * 5];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let grid = DisplayGrid::new(SMALL).unwrap();
        let pool = TileBufferPool::allocate(&mut arena, 12, 5).unwrap();
        let err = TileRenderer::new(grid, pool, SequenceColors::new(), &RefreshConfig::default())
            .err()
            .unwrap();
        assert_eq!(err, RendererError::BufferSizeMismatch { pool: 5, tile: 4 });
    }

    #[test]
    fn into_parts_allows_teardown() {
        let mut memory = [0u16; 12 * 4];
        let mut arena = DmaArena::<HostRam>::new(&mut memory);
        let renderer = renderer(&mut arena, SMALL);
        let (_grid, pool, _colors) = renderer.into_parts();
        pool.release(&mut arena).unwrap();
        assert_eq!(arena.live_allocations(), 0);
    }

    impl TileRenderer<'_, SequenceColors> {
        fn colors_used(&self) -> u16 {
            self.colors.calls()
        }
    }
}
