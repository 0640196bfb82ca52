//! Display abstraction layer

use crate::geometry::TileRect;

/// Raw 16 bits-per-pixel value (RGB565) as stored in tile buffers.
///
/// Buffers hold pixels already in the order the surface sends them, see
/// [`DrawSurface::encode`].
pub type RawPixel = u16;

/// Bound on [`DrawSurface::Error`]: whatever the active log backend can print.
#[cfg(not(feature = "defmt"))]
pub trait DrawError: core::fmt::Debug {}

#[cfg(not(feature = "defmt"))]
impl<T: core::fmt::Debug> DrawError for T {}

/// Bound on [`DrawSurface::Error`]: whatever the active log backend can print.
#[cfg(feature = "defmt")]
pub trait DrawError: core::fmt::Debug + defmt::Format {}

#[cfg(feature = "defmt")]
impl<T: core::fmt::Debug + defmt::Format> DrawError for T {}

/// A surface that accepts one rectangular block of pixels per call.
///
/// Implementors copy (or DMA) `pixels` into the rectangle `rect`. The end
/// coordinates of `rect` are exclusive, and `pixels.len()` equals
/// `rect.pixel_count()` in row-major order.
///
/// Callers never issue a second `draw` before the previous one resolved.
pub trait DrawSurface {
    /// Error reported by a failed draw.
    type Error: DrawError;

    /// Turn an RGB565 color into the value a tile buffer must hold for this
    /// surface. Identity unless the surface streams buffer memory as-is in
    /// another byte order.
    fn encode(&self, color: RawPixel) -> RawPixel {
        color
    }

    /// Blit `pixels` (produced by [`encode`](Self::encode)) into `rect`.
    async fn draw(&mut self, rect: TileRect, pixels: &[RawPixel]) -> Result<(), Self::Error>;
}

impl<T: DrawSurface> DrawSurface for &mut T {
    type Error = T::Error;

    fn encode(&self, color: RawPixel) -> RawPixel {
        (**self).encode(color)
    }

    async fn draw(&mut self, rect: TileRect, pixels: &[RawPixel]) -> Result<(), Self::Error> {
        (**self).draw(rect, pixels).await
    }
}
