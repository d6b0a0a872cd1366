//! The owned pixel buffer and source-rectangle types.
//!
//! A [`PixelBuffer`] is a rectangular, fully-initialized grid of RGBA8
//! pixels with exactly one owner at a time. Transformations that "return a
//! new image" allocate a fresh buffer; nothing in the crate aliases two
//! buffers. The pixel surface speaks [`Rgb`] (7-bit alpha); the 8-bit RGBA
//! representation underneath is an implementation detail of the backend.

use crate::color::Rgb;
use crate::error::{Error, Result};
use image::RgbaImage;

/// An owned, mutable 2D grid of RGBA8 pixels. Always at least 1×1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: RgbaImage,
}

impl PixelBuffer {
    /// Allocate a buffer filled with `fill`. Errors if either dimension is 0.
    pub fn allocate(width: u32, height: u32, fill: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            data: RgbaImage::from_pixel(width, height, fill.to_rgba8()),
        })
    }

    /// Wrap an already-decoded image. Errors on an empty image.
    pub fn from_image(data: RgbaImage) -> Result<Self> {
        if data.width() == 0 || data.height() == 0 {
            return Err(Error::InvalidDimensions {
                width: data.width(),
                height: data.height(),
            });
        }
        Ok(Self { data })
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Read the pixel at (x, y). Errors when the coordinate is outside the
    /// buffer instead of delegating to undefined behavior.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Rgb> {
        self.check_coordinate(x, y)?;
        Ok(Rgb::from_rgba8(*self.data.get_pixel(x, y)))
    }

    /// Write the pixel at (x, y).
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) -> Result<()> {
        self.check_coordinate(x, y)?;
        self.data.put_pixel(x, y, color.to_rgba8());
        Ok(())
    }

    fn check_coordinate(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    /// Borrow the raw RGBA image for backend primitives.
    pub(crate) fn as_image(&self) -> &RgbaImage {
        &self.data
    }

    /// Mutably borrow the raw RGBA image for backend primitives.
    pub(crate) fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.data
    }
}

/// A source sub-rectangle: `x, y` top-left corner plus width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full extent of a buffer.
    pub fn full(buffer: &PixelBuffer) -> Self {
        Self::new(0, 0, buffer.width(), buffer.height())
    }

    /// Validate that this region lies entirely inside `source`.
    ///
    /// The check lives at the API boundary so out-of-range crops surface as
    /// [`Error::OutOfBounds`] instead of collaborator-defined behavior.
    pub fn bounded(&self, source: &PixelBuffer) -> Result<Self> {
        let fits = self.width >= 1
            && self.height >= 1
            && self
                .x
                .checked_add(self.width)
                .is_some_and(|right| right <= source.width())
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|bottom| bottom <= source.height());
        if !fits {
            return Err(Error::OutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                src_width: source.width(),
                src_height: source.height(),
            });
        }
        Ok(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_fills_every_pixel() {
        let fill = Rgb::opaque(10, 20, 30);
        let buffer = PixelBuffer::allocate(3, 2, fill).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(buffer.get_pixel(x, y).unwrap(), fill);
            }
        }
    }

    #[test]
    fn allocate_rejects_zero_dimensions() {
        assert!(PixelBuffer::allocate(0, 5, Rgb::black()).is_err());
        assert!(PixelBuffer::allocate(5, 0, Rgb::black()).is_err());
    }

    #[test]
    fn pixel_round_trip() {
        let mut buffer = PixelBuffer::allocate(4, 4, Rgb::black()).unwrap();
        let color = Rgb::new(200, 100, 50, 25).unwrap();
        buffer.set_pixel(2, 3, color).unwrap();
        assert_eq!(buffer.get_pixel(2, 3).unwrap(), color);
    }

    #[test]
    fn pixel_access_out_of_bounds_errors() {
        let mut buffer = PixelBuffer::allocate(4, 4, Rgb::black()).unwrap();
        assert!(matches!(
            buffer.get_pixel(4, 0),
            Err(Error::PixelOutOfBounds { .. })
        ));
        assert!(buffer.set_pixel(0, 4, Rgb::black()).is_err());
    }

    #[test]
    fn pixel_access_error_names_the_pixel_not_a_region() {
        let buffer = PixelBuffer::allocate(4, 4, Rgb::black()).unwrap();
        let message = buffer.get_pixel(4, 0).unwrap_err().to_string();
        assert_eq!(message, "pixel (4,0) is outside the 4x4 buffer");
    }

    #[test]
    fn region_bounded_accepts_exact_fit() {
        let buffer = PixelBuffer::allocate(10, 8, Rgb::black()).unwrap();
        assert!(Region::new(0, 0, 10, 8).bounded(&buffer).is_ok());
        assert!(Region::new(9, 7, 1, 1).bounded(&buffer).is_ok());
    }

    #[test]
    fn region_bounded_rejects_overflow() {
        let buffer = PixelBuffer::allocate(10, 8, Rgb::black()).unwrap();
        assert!(Region::new(5, 0, 6, 8).bounded(&buffer).is_err());
        assert!(Region::new(0, 5, 10, 4).bounded(&buffer).is_err());
        assert!(Region::new(0, 0, 0, 8).bounded(&buffer).is_err());
        // x + width overflowing u32 must not wrap into a false pass
        assert!(Region::new(u32::MAX, 0, 2, 2).bounded(&buffer).is_err());
    }
}
