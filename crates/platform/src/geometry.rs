//! Display grid geometry
//!
//! Splits a fixed-resolution panel into equally sized tiles and precomputes
//! the pixel interval each tile column and tile row covers. Intervals are
//! half-open: `start` is inclusive, `end` is exclusive, which is exactly what
//! [`DrawSurface::draw`](crate::display::DrawSurface::draw) expects.
//!
//! ```text
//!   x:  0      80     160    240    320
//! y:0   ┌──────┬──────┬──────┬──────┐
//!       │  0   │  1   │  2   │  3   │   index = row * columns + column
//!   80  ├──────┼──────┼──────┼──────┤
//!       │  4   │  5   │  6   │  7   │
//!  160  ├──────┼──────┼──────┼──────┤
//!       │  8   │  9   │  10  │  11  │
//!  240  └──────┴──────┴──────┴──────┘
//! ```

use thiserror_no_std::Error;

/// Maximum number of tile columns (or tile rows) a grid may have.
pub const MAX_GRID_SPANS: usize = 32;

/// Maximum number of tiles a grid may have (also the pool capacity).
pub const MAX_TILES: usize = 64;

/// Raw panel and tile dimensions, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayGeometry {
    /// Panel width.
    pub display_width: u32,
    /// Panel height.
    pub display_height: u32,
    /// Tile width.
    pub tile_width: u32,
    /// Tile height.
    pub tile_height: u32,
}

impl DisplayGeometry {
    /// Geometry with square tiles of edge `tile`.
    #[must_use]
    pub const fn square_tiles(display_width: u32, display_height: u32, tile: u32) -> Self {
        Self {
            display_width,
            display_height,
            tile_width: tile,
            tile_height: tile,
        }
    }
}

/// Geometry precondition violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// A display or tile dimension is zero.
    #[error("display and tile dimensions must be non-zero")]
    ZeroDimension,
    /// Display width is not an exact multiple of the tile width.
    #[error("display width {display} is not a multiple of tile width {tile}")]
    WidthNotMultiple {
        /// Display width in pixels.
        display: u32,
        /// Tile width in pixels.
        tile: u32,
    },
    /// Display height is not an exact multiple of the tile height.
    #[error("display height {display} is not a multiple of tile height {tile}")]
    HeightNotMultiple {
        /// Display height in pixels.
        display: u32,
        /// Tile height in pixels.
        tile: u32,
    },
    /// Tiles are drawn in horizontal pairs, so the column count must be even.
    #[error("tile column count {columns} is odd")]
    OddColumnCount {
        /// Number of tile columns.
        columns: usize,
    },
    /// More columns or rows than [`MAX_GRID_SPANS`].
    #[error("{count} spans exceed the limit of {max}")]
    TooManySpans {
        /// Requested span count.
        count: usize,
        /// Maximum supported.
        max: usize,
    },
    /// More tiles than [`MAX_TILES`].
    #[error("{tiles} tiles exceed the limit of {max}")]
    TooManyTiles {
        /// Requested tile count.
        tiles: usize,
        /// Maximum supported.
        max: usize,
    },
    /// A single tile holds more pixels than fit in `usize`.
    #[error("tile pixel count overflows")]
    TileTooLarge,
}

/// Half-open pixel interval `[start, end)` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Span {
    /// First pixel covered.
    pub start: u32,
    /// One past the last pixel covered.
    pub end: u32,
}

impl Span {
    /// Number of pixels covered.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// `true` if the span covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pixel rectangle of one tile, end coordinates exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TileRect {
    /// Left edge (inclusive).
    pub x_start: u32,
    /// Top edge (inclusive).
    pub y_start: u32,
    /// Right edge (exclusive).
    pub x_end: u32,
    /// Bottom edge (exclusive).
    pub y_end: u32,
}

impl TileRect {
    /// Rectangle covered by a column span and a row span.
    #[must_use]
    pub fn from_spans(column: Span, row: Span) -> Self {
        Self {
            x_start: column.start,
            y_start: row.start,
            x_end: column.end,
            y_end: row.end,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.x_end.saturating_sub(self.x_start)
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.y_end.saturating_sub(self.y_start)
    }

    /// Number of pixels inside the rectangle.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        (self.width() as usize).saturating_mul(self.height() as usize)
    }
}

/// Two horizontally adjacent tiles processed in one renderer step.
///
/// The second tile sits at `column + 1` and uses buffer `index + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TilePair {
    /// Tile row of both tiles.
    pub row: usize,
    /// Tile column of the first tile.
    pub column: usize,
    /// Linear buffer index of the first tile.
    pub index: usize,
    /// Rectangle of the first tile.
    pub first: TileRect,
    /// Rectangle of the second tile.
    pub second: TileRect,
}

/// Validated tile grid with precomputed column and row intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayGrid {
    geometry: DisplayGeometry,
    tile_pixels: usize,
    columns: heapless::Vec<Span, MAX_GRID_SPANS>,
    rows: heapless::Vec<Span, MAX_GRID_SPANS>,
}

impl DisplayGrid {
    /// Validate `geometry` and precompute the column and row intervals.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if any dimension is zero, the display is
    /// not an exact multiple of the tile size, the column count is odd, or
    /// the grid exceeds [`MAX_GRID_SPANS`] / [`MAX_TILES`].
    pub fn new(geometry: DisplayGeometry) -> Result<Self, GeometryError> {
        let DisplayGeometry {
            display_width,
            display_height,
            tile_width,
            tile_height,
        } = geometry;

        if display_width == 0 || display_height == 0 || tile_width == 0 || tile_height == 0 {
            return Err(GeometryError::ZeroDimension);
        }
        if display_width % tile_width != 0 {
            return Err(GeometryError::WidthNotMultiple {
                display: display_width,
                tile: tile_width,
            });
        }
        if display_height % tile_height != 0 {
            return Err(GeometryError::HeightNotMultiple {
                display: display_height,
                tile: tile_height,
            });
        }

        let column_count = (display_width / tile_width) as usize;
        let row_count = (display_height / tile_height) as usize;

        if column_count % 2 != 0 {
            return Err(GeometryError::OddColumnCount {
                columns: column_count,
            });
        }
        for count in [column_count, row_count] {
            if count > MAX_GRID_SPANS {
                return Err(GeometryError::TooManySpans {
                    count,
                    max: MAX_GRID_SPANS,
                });
            }
        }
        // Both counts are <= MAX_GRID_SPANS (32), so the product cannot overflow.
        #[allow(clippy::arithmetic_side_effects)]
        let tiles = column_count * row_count;
        if tiles > MAX_TILES {
            return Err(GeometryError::TooManyTiles {
                tiles,
                max: MAX_TILES,
            });
        }

        let tile_pixels = (tile_width as usize)
            .checked_mul(tile_height as usize)
            .ok_or(GeometryError::TileTooLarge)?;

        Ok(Self {
            geometry,
            tile_pixels,
            columns: spans(column_count, tile_width)?,
            rows: spans(row_count, tile_height)?,
        })
    }

    /// The geometry this grid was built from.
    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    /// Number of tile columns.
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of tile rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Total number of tiles (`columns * rows`).
    #[allow(clippy::arithmetic_side_effects)] // bounded by MAX_TILES at construction
    pub fn tile_count(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Pixels held by one tile buffer.
    pub fn tile_pixel_count(&self) -> usize {
        self.tile_pixels
    }

    /// Pixel interval of every tile column, left to right.
    pub fn column_spans(&self) -> &[Span] {
        &self.columns
    }

    /// Pixel interval of every tile row, top to bottom.
    pub fn row_spans(&self) -> &[Span] {
        &self.rows
    }

    /// Pixel interval of tile column `column`.
    pub fn column_span(&self, column: usize) -> Option<Span> {
        self.columns.get(column).copied()
    }

    /// Pixel interval of tile row `row`.
    pub fn row_span(&self, row: usize) -> Option<Span> {
        self.rows.get(row).copied()
    }

    /// Linear buffer index of tile `(row, column)`: `row * columns + column`.
    ///
    /// Returns `None` if the position is outside the grid.
    pub fn index_of(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.rows() || column >= self.columns() {
            return None;
        }
        row.checked_mul(self.columns())?.checked_add(column)
    }

    /// Pixel rectangle of tile `(row, column)`.
    pub fn tile_rect(&self, row: usize, column: usize) -> Option<TileRect> {
        Some(TileRect::from_spans(
            self.column_span(column)?,
            self.row_span(row)?,
        ))
    }

    /// Row-major iterator over horizontally adjacent tile pairs.
    ///
    /// For a 4×3 grid: `(r0:c0,c1), (r0:c2,c3), (r1:c0,c1), … (r2:c2,c3)`.
    pub fn pairs(&self) -> TilePairs<'_> {
        TilePairs {
            grid: self,
            row: 0,
            column: 0,
        }
    }
}

/// Iterator returned by [`DisplayGrid::pairs`].
#[derive(Debug, Clone)]
pub struct TilePairs<'a> {
    grid: &'a DisplayGrid,
    row: usize,
    column: usize,
}

impl Iterator for TilePairs<'_> {
    type Item = TilePair;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.row;
        let column = self.column;
        let second_column = column.checked_add(1)?;

        let pair = TilePair {
            row,
            column,
            index: self.grid.index_of(row, column)?,
            first: self.grid.tile_rect(row, column)?,
            second: self.grid.tile_rect(row, second_column)?,
        };

        // column + 2 <= columns <= MAX_GRID_SPANS, row + 1 <= rows <= MAX_GRID_SPANS.
        #[allow(clippy::arithmetic_side_effects)]
        {
            self.column += 2;
            if self.column >= self.grid.columns() {
                self.column = 0;
                self.row += 1;
            }
        }

        Some(pair)
    }
}

/// `count` consecutive spans of `size` pixels starting at 0.
fn spans(count: usize, size: u32) -> Result<heapless::Vec<Span, MAX_GRID_SPANS>, GeometryError> {
    let mut out = heapless::Vec::new();
    let mut start = 0u32;
    for _ in 0..count {
        // The display edge is exactly count * size and fits in u32.
        #[allow(clippy::arithmetic_side_effects)]
        let end = start + size;
        out.push(Span { start, end })
            .map_err(|_| GeometryError::TooManySpans {
                count,
                max: MAX_GRID_SPANS,
            })?;
        start = end;
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::REFERENCE_GEOMETRY;

    #[test]
    fn reference_grid_is_four_by_three() {
        let grid = DisplayGrid::new(REFERENCE_GEOMETRY).unwrap();
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.tile_count(), 12);
        assert_eq!(grid.tile_pixel_count(), 6_400);
    }

    #[test]
    fn reference_spans_match_tile_edges() {
        let grid = DisplayGrid::new(REFERENCE_GEOMETRY).unwrap();
        let columns: heapless::Vec<(u32, u32), 4> = grid
            .column_spans()
            .iter()
            .map(|s| (s.start, s.end))
            .collect();
        assert_eq!(
            columns.as_slice(),
            &[(0, 80), (80, 160), (160, 240), (240, 320)]
        );

        let rows: heapless::Vec<(u32, u32), 3> =
            grid.row_spans().iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(rows.as_slice(), &[(0, 80), (80, 160), (160, 240)]);
    }

    #[test]
    fn index_uses_grid_stride() {
        let grid = DisplayGrid::new(DisplayGeometry::square_tiles(240, 160, 40)).unwrap();
        assert_eq!(grid.columns(), 6);
        assert_eq!(grid.index_of(0, 0), Some(0));
        assert_eq!(grid.index_of(1, 0), Some(6));
        assert_eq!(grid.index_of(3, 5), Some(23));
        assert_eq!(grid.index_of(4, 0), None);
        assert_eq!(grid.index_of(0, 6), None);
    }

    #[test]
    fn pairs_walk_row_major_two_at_a_time() {
        let grid = DisplayGrid::new(REFERENCE_GEOMETRY).unwrap();
        let order: heapless::Vec<(usize, usize, usize), 8> = grid
            .pairs()
            .map(|p| (p.row, p.column, p.index))
            .collect();
        assert_eq!(
            order.as_slice(),
            &[
                (0, 0, 0),
                (0, 2, 2),
                (1, 0, 4),
                (1, 2, 6),
                (2, 0, 8),
                (2, 2, 10)
            ]
        );
    }

    #[test]
    fn pair_rects_share_row_and_are_adjacent() {
        let grid = DisplayGrid::new(REFERENCE_GEOMETRY).unwrap();
        for pair in grid.pairs() {
            assert_eq!(pair.first.y_start, pair.second.y_start);
            assert_eq!(pair.first.y_end, pair.second.y_end);
            assert_eq!(pair.first.x_end, pair.second.x_start);
        }
        let last = grid.pairs().last().unwrap();
        assert_eq!(
            last.second,
            TileRect {
                x_start: 240,
                y_start: 160,
                x_end: 320,
                y_end: 240
            }
        );
    }

    #[test]
    fn rejects_non_multiple_width() {
        let err = DisplayGrid::new(DisplayGeometry::square_tiles(330, 240, 80)).unwrap_err();
        assert_eq!(
            err,
            GeometryError::WidthNotMultiple {
                display: 330,
                tile: 80
            }
        );
    }

    #[test]
    fn rejects_non_multiple_height() {
        let err = DisplayGrid::new(DisplayGeometry::square_tiles(320, 250, 80)).unwrap_err();
        assert!(matches!(err, GeometryError::HeightNotMultiple { .. }));
    }

    #[test]
    fn rejects_odd_column_count() {
        let err = DisplayGrid::new(DisplayGeometry::square_tiles(240, 240, 80)).unwrap_err();
        assert_eq!(err, GeometryError::OddColumnCount { columns: 3 });
    }

    #[test]
    fn rejects_zero_tile() {
        let err = DisplayGrid::new(DisplayGeometry::square_tiles(320, 240, 0)).unwrap_err();
        assert_eq!(err, GeometryError::ZeroDimension);
    }

    #[test]
    fn rejects_grid_larger_than_pool_capacity() {
        // 16 × 12 = 192 tiles
        let err = DisplayGrid::new(DisplayGeometry::square_tiles(320, 240, 20)).unwrap_err();
        assert_eq!(
            err,
            GeometryError::TooManyTiles {
                tiles: 192,
                max: MAX_TILES
            }
        );
    }

    #[test]
    fn rect_pixel_count() {
        let rect = TileRect {
            x_start: 80,
            y_start: 0,
            x_end: 160,
            y_end: 80,
        };
        assert_eq!(rect.width(), 80);
        assert_eq!(rect.height(), 80);
        assert_eq!(rect.pixel_count(), 6_400);
    }
}
