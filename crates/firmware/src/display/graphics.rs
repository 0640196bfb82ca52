//! embedded-graphics draw surface
//!
//! Wraps any `DrawTarget<Color = Rgb565>` so the tile renderer can paint
//! into it: the desktop simulator window in the demo, `MockDisplay` in tests.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use platform::{DrawError, DrawSurface, RawPixel, TileRect};

/// Errors from [`GraphicsSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError<E> {
    /// Pixel buffer length does not match the rectangle.
    InvalidBuffer,
    /// The wrapped target failed.
    Target(E),
}

/// [`DrawSurface`] over an embedded-graphics target.
pub struct GraphicsSurface<D> {
    target: D,
}

impl<D> GraphicsSurface<D> {
    /// Wrap `target`.
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// The wrapped target.
    pub fn target(&self) -> &D {
        &self.target
    }

    /// The wrapped target, mutably (e.g. to refresh a simulator window).
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Unwrap.
    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> DrawSurface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
    SurfaceError<D::Error>: DrawError,
{
    type Error = SurfaceError<D::Error>;

    async fn draw(&mut self, rect: TileRect, pixels: &[RawPixel]) -> Result<(), Self::Error> {
        if pixels.len() != rect.pixel_count() {
            return Err(SurfaceError::InvalidBuffer);
        }
        let area = Rectangle::new(
            Point::new(rect.x_start as i32, rect.y_start as i32),
            Size::new(rect.width(), rect.height()),
        );
        let colors = pixels.iter().map(|&raw| Rgb565::from(RawU16::new(raw)));
        self.target
            .fill_contiguous(&area, colors)
            .map_err(SurfaceError::Target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[tokio::test]
    async fn pixels_land_row_major_in_the_rect() {
        let mut surface = GraphicsSurface::new(MockDisplay::<Rgb565>::new());
        let rect = TileRect {
            x_start: 2,
            y_start: 1,
            x_end: 4,
            y_end: 3,
        };
        surface
            .draw(rect, &[0xF800, 0x07E0, 0x001F, 0xFFFF])
            .await
            .unwrap();

        let display = surface.into_inner();
        assert_eq!(display.get_pixel(Point::new(2, 1)), Some(Rgb565::RED));
        assert_eq!(display.get_pixel(Point::new(3, 1)), Some(Rgb565::GREEN));
        assert_eq!(display.get_pixel(Point::new(2, 2)), Some(Rgb565::BLUE));
        assert_eq!(display.get_pixel(Point::new(3, 2)), Some(Rgb565::WHITE));
        assert_eq!(display.get_pixel(Point::new(1, 1)), None);
    }

    #[tokio::test]
    async fn short_buffer_rejected() {
        let mut surface = GraphicsSurface::new(MockDisplay::<Rgb565>::new());
        let rect = TileRect {
            x_start: 0,
            y_start: 0,
            x_end: 2,
            y_end: 2,
        };
        assert_eq!(
            surface.draw(rect, &[0; 3]).await,
            Err(SurfaceError::InvalidBuffer)
        );
    }
}
