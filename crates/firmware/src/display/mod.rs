//! Display drivers for the tile refresh firmware
//!
//! - [`driver`]: async ST7789 driver for the 320×240 IPS panel, used on hardware
//!   as the renderer's draw surface.
//! - [`graphics`]: adapter that lets any embedded-graphics `DrawTarget` act as
//!   a draw surface (desktop simulator, `MockDisplay` in tests).

pub mod driver;
pub mod graphics;

// The driver module is always compiled (no hardware gate) so that
// `cargo test` can exercise the ST7789 driver tests on the host.
pub use driver::{DisplayError, St7789};
pub use graphics::{GraphicsSurface, SurfaceError};

#[cfg(feature = "hardware")]
pub use driver::St7789Display;

use platform::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH, PIXEL_CLOCK_HZ};

/// ST7789 panel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Width in pixels as seen by the renderer (after any X/Y swap).
    pub width: u16,
    /// Height in pixels as seen by the renderer (after any X/Y swap).
    pub height: u16,
    /// Swap X and Y (MADCTL MV). Puts the 240×320 panel in landscape.
    pub swap_xy: bool,
    /// Mirror along X (MADCTL MX).
    pub mirror_x: bool,
    /// Mirror along Y (MADCTL MY).
    pub mirror_y: bool,
    /// SPI clock frequency (Hz)
    pub pixel_clock_hz: u32,
}

impl PanelConfig {
    /// MADCTL register value for this orientation (RGB order).
    pub fn madctl(&self) -> u8 {
        let mut value = 0u8;
        if self.mirror_y {
            value |= 0x80;
        }
        if self.mirror_x {
            value |= 0x40;
        }
        if self.swap_xy {
            value |= 0x20;
        }
        value
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            // 320 and 240 fit in u16.
            width: DISPLAY_WIDTH as u16,
            height: DISPLAY_HEIGHT as u16,
            swap_xy: true,
            mirror_x: false,
            mirror_y: false,
            pixel_clock_hz: PIXEL_CLOCK_HZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_landscape_reference_panel() {
        let config = PanelConfig::default();
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.pixel_clock_hz, 20_000_000);
        assert_eq!(config.madctl(), 0x20, "landscape sets only MV");
    }

    #[test]
    fn madctl_combines_orientation_bits() {
        let config = PanelConfig {
            swap_xy: false,
            mirror_x: true,
            mirror_y: true,
            ..PanelConfig::default()
        };
        assert_eq!(config.madctl(), 0xC0);
    }
}
