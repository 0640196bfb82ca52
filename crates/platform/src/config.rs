//! Application configuration and constants
//!
//! Central configuration values for the tile refresh firmware. Board geometry,
//! timing cadence and bus clocks live here so that the renderer, the panel
//! driver and the tests all agree on a single source of truth.

use crate::geometry::DisplayGeometry;

/// The application name
pub const APP_NAME: &str = "Tile Refresh";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Reference board geometry ─────────────────────────────────────────────────

/// Panel width in pixels (landscape, X/Y swapped).
pub const DISPLAY_WIDTH: u32 = 320;

/// Panel height in pixels (landscape, X/Y swapped).
pub const DISPLAY_HEIGHT: u32 = 240;

/// Edge length of one square tile in pixels.
///
/// 320 / 80 = 4 columns, 240 / 80 = 3 rows, 12 tiles in total.
pub const TILE_SIZE: u32 = 80;

/// Reference geometry: 320×240 panel split into 80×80 tiles.
pub const REFERENCE_GEOMETRY: DisplayGeometry = DisplayGeometry {
    display_width: DISPLAY_WIDTH,
    display_height: DISPLAY_HEIGHT,
    tile_width: TILE_SIZE,
    tile_height: TILE_SIZE,
};

// ── Timing ───────────────────────────────────────────────────────────────────

/// Pause after every refresh pass, completed or aborted.
pub const SETTLE_DELAY_MS: u32 = 100;

/// Pause between the end of one pass and the start of the next.
pub const REFRESH_INTERVAL_MS: u32 = 1_000;

// ── Bus ──────────────────────────────────────────────────────────────────────

/// Panel SPI pixel clock. 10 MHz is the conservative setting, 20 MHz is
/// stable on the reference wiring.
pub const PIXEL_CLOCK_HZ: u32 = 20_000_000;

/// Timing cadence of the refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshConfig {
    /// Delay after each pass, in milliseconds.
    pub settle_delay_ms: u32,
    /// Delay between passes, in milliseconds.
    pub refresh_interval_ms: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: SETTLE_DELAY_MS,
            refresh_interval_ms: REFRESH_INTERVAL_MS,
        }
    }
}

/// Full application title
pub const fn app_title() -> &'static str {
    APP_NAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_geometry_divides_exactly() {
        assert_eq!(DISPLAY_WIDTH % TILE_SIZE, 0);
        assert_eq!(DISPLAY_HEIGHT % TILE_SIZE, 0);
        assert_eq!((DISPLAY_WIDTH / TILE_SIZE) % 2, 0, "pairs need an even column count");
    }

    #[test]
    fn refresh_config_defaults() {
        let cfg = RefreshConfig::default();
        assert_eq!(cfg.settle_delay_ms, 100);
        assert_eq!(cfg.refresh_interval_ms, 1_000);
    }
}
