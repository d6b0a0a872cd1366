//! Pixel filters. One builtin ships: greyscale via YIQ luma.

use crate::buffer::PixelBuffer;
use crate::color::{Rgb, Yiq};
use crate::error::Result;
use tracing::debug;

/// A whole-buffer filter producing a new buffer of the same dimensions.
pub trait FilterStrategy {
    fn apply(&self, src: &PixelBuffer) -> Result<PixelBuffer>;
}

/// Greyscale conversion through a 256-entry luma palette.
///
/// The palette of `(c, c, c)` colors is built once; every pixel is replaced
/// by the entry at its luma index. Palette entries are opaque, so any source
/// alpha is discarded. Applying the filter twice is a no-op after the first
/// pass — a luma-grey pixel maps to itself.
#[derive(Debug, Default)]
pub struct GreyscaleFilter;

impl FilterStrategy for GreyscaleFilter {
    fn apply(&self, src: &PixelBuffer) -> Result<PixelBuffer> {
        let palette: Vec<Rgb> = (0..=255u8).map(|c| Rgb::opaque(c, c, c)).collect();

        let mut out = PixelBuffer::allocate(src.width(), src.height(), Rgb::black())?;
        for y in 0..src.height() {
            for x in 0..src.width() {
                let grey = Yiq::luma(src.get_pixel(x, y)?);
                out.set_pixel(x, y, palette[grey as usize])?;
            }
        }
        debug!(width = out.width(), height = out.height(), "greyscale filter");
        Ok(out)
    }
}
