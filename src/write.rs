//! Write strategies: encode a pixel buffer and deliver it to a file or an
//! in-memory byte vector.
//!
//! Quality knobs are validated at the setter, before any pixel work — a bad
//! value never gets as far as the encoder. Writing to a file creates missing
//! parent directories, overwrites an existing file, and appends the
//! canonical extension when the requested path carries the wrong one (so
//! `photo.dat` written as JPEG lands at `photo.dat.jpg`).

use crate::backend::{EncodeOptions, ImageKind, PngFilter, RasterBackend};
use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Encoder for one output format, plus the delivery targets.
pub trait WriteStrategy {
    fn kind(&self) -> ImageKind;

    /// Format-specific quality knob. JPEG accepts 0–100, PNG 0–9
    /// (compression level), GIF rejects the setting outright.
    fn set_quality(&mut self, quality: u8) -> Result<()>;

    /// Encode into an in-memory byte vector.
    fn to_bytes(&self, backend: &dyn RasterBackend, buffer: &PixelBuffer) -> Result<Vec<u8>>;

    /// Encode and write to `path`, returning the final path actually
    /// written (the canonical extension is appended if missing).
    fn to_file(
        &self,
        backend: &dyn RasterBackend,
        buffer: &PixelBuffer,
        path: &Path,
    ) -> Result<PathBuf> {
        let bytes = self.to_bytes(backend, buffer)?;
        let target = ensure_extension(path, self.kind());
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &bytes)?;
        info!(path = %target.display(), size = bytes.len(), "wrote image");
        Ok(target)
    }
}

/// Append the canonical extension unless the path already carries an
/// accepted one for the format.
fn ensure_extension(path: &Path, kind: ImageKind) -> PathBuf {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| kind.matches_extension(e));
    if ok {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(kind.extension());
        PathBuf::from(name)
    }
}

/// JPEG with a 0–100 quality knob (default 100).
#[derive(Debug, Default)]
pub struct JpegWriter {
    options: EncodeOptions,
}

impl JpegWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WriteStrategy for JpegWriter {
    fn kind(&self) -> ImageKind {
        ImageKind::Jpeg
    }

    fn set_quality(&mut self, quality: u8) -> Result<()> {
        if quality > 100 {
            return Err(Error::Configuration(format!(
                "JPEG quality must be between 0 and 100, got {quality}"
            )));
        }
        self.options.jpeg_quality = quality;
        Ok(())
    }

    fn to_bytes(&self, backend: &dyn RasterBackend, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        backend.encode(buffer, ImageKind::Jpeg, &self.options)
    }
}

/// PNG with a 0–9 compression level and a row-filter strategy.
#[derive(Debug, Default)]
pub struct PngWriter {
    options: EncodeOptions,
}

impl PngWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filter(&mut self, filter: PngFilter) -> &mut Self {
        self.options.png_filter = filter;
        self
    }
}

impl WriteStrategy for PngWriter {
    fn kind(&self) -> ImageKind {
        ImageKind::Png
    }

    fn set_quality(&mut self, quality: u8) -> Result<()> {
        if quality > 9 {
            return Err(Error::Configuration(format!(
                "PNG compression level must be between 0 and 9, got {quality}"
            )));
        }
        self.options.png_compression = quality;
        Ok(())
    }

    fn to_bytes(&self, backend: &dyn RasterBackend, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        backend.encode(buffer, ImageKind::Png, &self.options)
    }
}

/// GIF. No quality knob exists for the format.
#[derive(Debug, Default)]
pub struct GifWriter;

impl GifWriter {
    pub fn new() -> Self {
        Self
    }
}

impl WriteStrategy for GifWriter {
    fn kind(&self) -> ImageKind {
        ImageKind::Gif
    }

    fn set_quality(&mut self, _quality: u8) -> Result<()> {
        Err(Error::Configuration(
            "GIF does not support a quality setting".into(),
        ))
    }

    fn to_bytes(&self, backend: &dyn RasterBackend, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        backend.encode(buffer, ImageKind::Gif, &EncodeOptions::default())
    }
}
