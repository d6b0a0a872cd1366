//! Canvas orchestration: one owned pixel buffer plus every operation the
//! crate exposes on it.
//!
//! Value semantics throughout: `resize`, `rotate`, the flips, `filter` and
//! `crop` return a brand-new `Canvas` with an independently owned buffer;
//! only `fill` and `append_element_at` mutate in place, since they composite
//! onto a canvas the caller already owns. Width and height are always read
//! from the buffer itself — there is no cached copy to fall out of sync.
//!
//! Pixel work is delegated through a [`RasterBackend`] parameter, the same
//! pattern the rest of the crate uses, so orchestration logic is testable
//! against a partial backend.

use crate::backend::{FlipAxis, ImageKind, RasterBackend};
use crate::buffer::{PixelBuffer, Region};
use crate::color::{ColorSpec, Rgb};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::filter::FilterStrategy;
use crate::resize::ResizeStrategy;
use crate::write::WriteStrategy;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An image under transformation: exactly one pixel buffer, owned.
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: PixelBuffer,
    /// Encoding of the source this canvas was decoded from, if any.
    kind: Option<ImageKind>,
}

impl Canvas {
    /// Blank opaque-black canvas of the given size.
    pub fn create(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            buffer: PixelBuffer::allocate(width, height, Rgb::black())?,
            kind: None,
        })
    }

    /// Load and decode an image file.
    ///
    /// Fails with [`Error::NotFound`] for a missing path,
    /// [`Error::NotReadable`] when the file exists but cannot be read, and
    /// the decode errors of [`RasterBackend::decode`] past that.
    pub fn open(backend: &impl RasterBackend, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| Error::NotReadable {
            path: path.to_path_buf(),
            source,
        })?;
        let canvas = Self::from_bytes(backend, &bytes)?;
        info!(
            path = %path.display(),
            width = canvas.width(),
            height = canvas.height(),
            "opened image"
        );
        Ok(canvas)
    }

    /// Decode an in-memory encoded image.
    pub fn from_bytes(backend: &impl RasterBackend, bytes: &[u8]) -> Result<Self> {
        let (buffer, kind) = backend.decode(bytes)?;
        Ok(Self {
            buffer,
            kind: Some(kind),
        })
    }

    /// Wrap an existing pixel buffer. Infallible by construction: the type
    /// system already guarantees a well-formed buffer.
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self { buffer, kind: None }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Encoding of the decoded source, when this canvas came from one.
    pub fn source_kind(&self) -> Option<ImageKind> {
        self.kind
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Rgb> {
        self.buffer.get_pixel(x, y)
    }

    // =========================================================================
    // Value-returning transformations
    // =========================================================================

    /// Resize through a strategy. The target must be at least 1×1; the
    /// strategies themselves assume a validated target.
    pub fn resize(
        &self,
        backend: &impl RasterBackend,
        strategy: &dyn ResizeStrategy,
        target_width: u32,
        target_height: u32,
    ) -> Result<Self> {
        if target_width == 0 || target_height == 0 {
            return Err(Error::InvalidDimensions {
                width: target_width,
                height: target_height,
            });
        }
        Ok(self.derive(strategy.resize(backend, &self.buffer, target_width, target_height)?))
    }

    /// Rotate counter-clockwise. `background` fills corners introduced by
    /// non-quarter angles; it defaults to invisible black
    /// ([`Rgb::transparent_black`]), so rotated corners stay transparent.
    pub fn rotate(
        &self,
        backend: &impl RasterBackend,
        degrees: f64,
        background: Option<ColorSpec>,
    ) -> Result<Self> {
        let background = match background {
            Some(spec) => Rgb::normalize(spec)?,
            None => Rgb::transparent_black(),
        };
        Ok(self.derive(backend.rotate(&self.buffer, degrees, background)?))
    }

    pub fn flip_vertical(&self, backend: &impl RasterBackend) -> Result<Self> {
        Ok(self.derive(backend.flip(&self.buffer, FlipAxis::Vertical)?))
    }

    pub fn flip_horizontal(&self, backend: &impl RasterBackend) -> Result<Self> {
        Ok(self.derive(backend.flip(&self.buffer, FlipAxis::Horizontal)?))
    }

    pub fn flip_both(&self, backend: &impl RasterBackend) -> Result<Self> {
        Ok(self.derive(backend.flip(&self.buffer, FlipAxis::Both)?))
    }

    /// Apply a pixel filter (e.g. greyscale).
    pub fn filter(&self, strategy: &dyn FilterStrategy) -> Result<Self> {
        Ok(self.derive(strategy.apply(&self.buffer)?))
    }

    /// Clip `region` out of this canvas at 1:1 scale. The region must lie
    /// entirely inside the canvas.
    pub fn crop(&self, backend: &impl RasterBackend, region: Region) -> Result<Self> {
        let region = region.bounded(&self.buffer)?;
        let mut out = PixelBuffer::allocate(region.width, region.height, Rgb::black())?;
        backend.resample(
            &mut out,
            Region::new(0, 0, region.width, region.height),
            &self.buffer,
            region,
        );
        debug!(?region, "cropped canvas");
        Ok(self.derive(out))
    }

    // =========================================================================
    // In-place mutation
    // =========================================================================

    /// Flood-fill (4-connected) from the seed pixel with the normalized
    /// color, in place. The seed must be inside the canvas.
    pub fn fill(&mut self, spec: impl Into<ColorSpec>, x: u32, y: u32) -> Result<()> {
        let color = Rgb::normalize(spec)?;
        // validates the seed coordinate
        let seed = self.buffer.get_pixel(x, y)?;
        if seed == color {
            return Ok(());
        }

        let img = self.buffer.as_image_mut();
        let (width, height) = img.dimensions();
        let seed_px = *img.get_pixel(x, y);
        let fill_px = color.to_rgba8();

        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            if *img.get_pixel(cx, cy) != seed_px {
                continue;
            }
            img.put_pixel(cx, cy, fill_px);
            if cx > 0 {
                stack.push((cx - 1, cy));
            }
            if cx + 1 < width {
                stack.push((cx + 1, cy));
            }
            if cy > 0 {
                stack.push((cx, cy - 1));
            }
            if cy + 1 < height {
                stack.push((cx, cy + 1));
            }
        }
        debug!(x, y, "flood-filled canvas");
        Ok(())
    }

    /// Draw an element at (x, y), mutating this canvas.
    pub fn append_element_at(&mut self, element: &dyn Element, x: i32, y: i32) -> Result<()> {
        element.draw(&mut self.buffer, x, y)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Encode with the given write strategy and deliver to `path`. Returns
    /// the path actually written (extension fix-up may alter it).
    pub fn write_to_file(
        &self,
        backend: &impl RasterBackend,
        strategy: &dyn WriteStrategy,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        strategy.to_file(backend, &self.buffer, path.as_ref())
    }

    /// Encode with the given write strategy into memory.
    pub fn write_to_bytes(
        &self,
        backend: &impl RasterBackend,
        strategy: &dyn WriteStrategy,
    ) -> Result<Vec<u8>> {
        strategy.to_bytes(backend, &self.buffer)
    }

    fn derive(&self, buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            kind: self.kind,
        }
    }
}
