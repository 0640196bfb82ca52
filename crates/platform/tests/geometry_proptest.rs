//! Property-based tests for grid geometry and tile indexing.
//! Verifies invariants hold for ALL valid geometries, not just the reference board.

// Test code: unwrap and direct indexing are fine, arithmetic is over small bounded values.
#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use platform::geometry::{DisplayGeometry, DisplayGrid, MAX_GRID_SPANS, MAX_TILES};

/// Strategy: (tile_width, tile_height, column_pairs, rows) for a valid grid.
/// At most 8 columns × 8 rows, which stays within `MAX_TILES`.
fn valid_geometry() -> impl proptest::strategy::Strategy<Value = DisplayGeometry> {
    use proptest::prelude::*;
    (1u32..=120, 1u32..=120, 1u32..=4, 1u32..=8).prop_map(|(tw, th, pairs, rows)| {
        DisplayGeometry {
            display_width: tw * pairs * 2,
            display_height: th * rows,
            tile_width: tw,
            tile_height: th,
        }
    })
}

proptest::proptest! {
    /// Buffer count equals columns × rows and every tile gets a distinct index.
    #[test]
    fn every_tile_maps_to_a_distinct_index(geometry in valid_geometry()) {
        let grid = DisplayGrid::new(geometry).unwrap();
        let count = grid.tile_count();
        assert_eq!(count, grid.columns() * grid.rows());

        let mut seen = [false; MAX_TILES];
        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let index = grid.index_of(row, column).unwrap();
                assert!(index < count, "index {} out of range {}", index, count);
                assert!(!seen[index], "index {} assigned twice", index);
                seen[index] = true;
            }
        }
        assert!(seen[..count].iter().all(|&s| s));
    }

    /// Spans tile the display edge exactly, with no gaps or overlaps.
    #[test]
    fn spans_cover_the_display_exactly(geometry in valid_geometry()) {
        let grid = DisplayGrid::new(geometry).unwrap();
        let mut x = 0;
        for span in grid.column_spans() {
            assert_eq!(span.start, x);
            assert_eq!(span.len(), geometry.tile_width);
            x = span.end;
        }
        assert_eq!(x, geometry.display_width);

        let mut y = 0;
        for span in grid.row_spans() {
            assert_eq!(span.start, y);
            assert_eq!(span.len(), geometry.tile_height);
            y = span.end;
        }
        assert_eq!(y, geometry.display_height);
    }

    /// Pair iteration visits every tile exactly once, left tile at an even column.
    #[test]
    fn pairs_cover_every_tile_once(geometry in valid_geometry()) {
        let grid = DisplayGrid::new(geometry).unwrap();
        let mut visited = 0usize;
        let mut last_index = None;
        for pair in grid.pairs() {
            assert_eq!(pair.column % 2, 0);
            assert_eq!(Some(pair.index), grid.index_of(pair.row, pair.column));
            assert_eq!(pair.first.pixel_count(), grid.tile_pixel_count());
            assert_eq!(pair.second.pixel_count(), grid.tile_pixel_count());
            if let Some(prev) = last_index {
                assert_eq!(pair.index, prev + 2, "pairs must be visited row-major");
            }
            last_index = Some(pair.index);
            visited += 2;
        }
        assert_eq!(visited, grid.tile_count());
    }

    /// Any odd column count is rejected.
    #[test]
    fn odd_column_counts_are_rejected(tile in 1u32..=64, half in 0u32..=8, rows in 1u32..=4) {
        let columns = half * 2 + 1;
        let geometry = DisplayGeometry::square_tiles(tile * columns, tile * rows, tile);
        assert!(DisplayGrid::new(geometry).is_err());
    }
}

#[test]
fn span_limit_is_large_enough_for_reference_board() {
    assert!(MAX_GRID_SPANS >= 4);
}
