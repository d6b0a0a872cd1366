//! Raster backend trait and the production `image`-crate implementation.
//!
//! [`RasterBackend`] is the only boundary to the pixel-pushing library.
//! Everything above it (resize planning, filters, canvas orchestration) is
//! backend-agnostic, so tests can substitute a recording or partial backend.
//!
//! ## Crate mapping for [`RustBackend`]
//!
//! | Primitive | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image::load_from_memory_with_format` |
//! | Encode | `image::codecs::{jpeg, png, gif}` encoders |
//! | Resample | `image::imageops::resize` (bilinear) + `replace` |
//! | Quarter-turn rotate | `image::DynamicImage::rotate{90,180,270}` |
//! | Arbitrary rotate | `imageproc::geometric_transformations::warp_into` |
//! | Flip | `image::imageops::flip_{vertical,horizontal}`, `rotate180` |

use crate::buffer::{PixelBuffer, Region};
use crate::color::Rgb;
use crate::error::{Error, Result};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, Frame, ImageEncoder, ImageFormat, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;

/// The encodings the crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// Canonical file extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
        }
    }

    /// Whether `ext` (case-insensitive) is an accepted extension.
    pub fn matches_extension(self, ext: &str) -> bool {
        match self {
            ImageKind::Jpeg => ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"),
            ImageKind::Png => ext.eq_ignore_ascii_case("png"),
            ImageKind::Gif => ext.eq_ignore_ascii_case("gif"),
        }
    }
}

/// PNG row-filter strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngFilter {
    NoFilter,
    Sub,
    Up,
    Average,
    Paeth,
    /// Let the encoder pick per row (the usual default).
    #[default]
    All,
}

impl PngFilter {
    fn to_image(self) -> PngFilterType {
        match self {
            PngFilter::NoFilter => PngFilterType::NoFilter,
            PngFilter::Sub => PngFilterType::Sub,
            PngFilter::Up => PngFilterType::Up,
            PngFilter::Average => PngFilterType::Avg,
            PngFilter::Paeth => PngFilterType::Paeth,
            PngFilter::All => PngFilterType::Adaptive,
        }
    }
}

/// Encoder knobs, all validated before any pixel work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// JPEG quality, 0–100.
    pub jpeg_quality: u8,
    /// PNG compression level, 0 (fastest) – 9 (smallest).
    pub png_compression: u8,
    pub png_filter: PngFilter,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 100,
            png_compression: 6,
            png_filter: PngFilter::All,
        }
    }
}

/// Mirror axis for [`RasterBackend::flip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Vertical,
    Horizontal,
    Both,
}

/// The contract every raster collaborator implements.
///
/// `flip` ships a default per-pixel implementation so partial backends work
/// out of the box; [`RustBackend`] overrides it with the image crate's
/// native flips. The two paths are bit-identical (tested).
pub trait RasterBackend {
    /// Sniff and decode `bytes`. Only JPEG, PNG and GIF pass the sniff.
    fn decode(&self, bytes: &[u8]) -> Result<(PixelBuffer, ImageKind)>;

    /// Encode `buffer` into `format` with the given options.
    fn encode(
        &self,
        buffer: &PixelBuffer,
        format: ImageKind,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>>;

    /// Scale `src_rect` of `src` onto `dst_rect` of `dst`, replacing the
    /// destination pixels outright (no alpha compositing).
    fn resample(&self, dst: &mut PixelBuffer, dst_rect: Region, src: &PixelBuffer, src_rect: Region);

    /// Rotate counter-clockwise by `degrees`. Quarter turns are lossless and
    /// swap dimensions exactly; other angles expand the canvas and fill the
    /// introduced corners with `background`. Alpha survives rotation.
    fn rotate(&self, src: &PixelBuffer, degrees: f64, background: Rgb) -> Result<PixelBuffer>;

    /// Mirror `src` across the given axis into a fresh same-size buffer.
    fn flip(&self, src: &PixelBuffer, axis: FlipAxis) -> Result<PixelBuffer> {
        let img = src.as_image();
        let (width, height) = img.dimensions();
        let mut out = RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels() {
            let (nx, ny) = match axis {
                FlipAxis::Vertical => (x, height - 1 - y),
                FlipAxis::Horizontal => (width - 1 - x, y),
                FlipAxis::Both => (width - 1 - x, height - 1 - y),
            };
            out.put_pixel(nx, ny, *pixel);
        }
        PixelBuffer::from_image(out)
    }
}

/// Production backend on the pure-Rust `image`/`imageproc` stack.
#[derive(Debug, Default)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl RasterBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<(PixelBuffer, ImageKind)> {
        let format = image::guess_format(bytes)
            .map_err(|_| Error::UnsupportedFormat("unrecognized image header".into()))?;
        let kind = match format {
            ImageFormat::Jpeg => ImageKind::Jpeg,
            ImageFormat::Png => ImageKind::Png,
            ImageFormat::Gif => ImageKind::Gif,
            other => return Err(Error::UnsupportedFormat(format!("{other:?}"))),
        };
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| Error::DecodeFailed(e.to_string()))?;
        debug!(width = decoded.width(), height = decoded.height(), ?kind, "decoded image");
        Ok((PixelBuffer::from_image(decoded.to_rgba8())?, kind))
    }

    fn encode(
        &self,
        buffer: &PixelBuffer,
        format: ImageKind,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>> {
        let img = buffer.as_image();
        let mut bytes = Vec::new();
        match format {
            ImageKind::Jpeg => {
                // JPEG carries no alpha channel
                let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut bytes, options.jpeg_quality)
                    .write_image(
                        rgb.as_raw(),
                        rgb.width(),
                        rgb.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| Error::EncodeFailed(e.to_string()))?;
            }
            ImageKind::Png => {
                let compression = match options.png_compression {
                    0..=2 => CompressionType::Fast,
                    3..=6 => CompressionType::Default,
                    _ => CompressionType::Best,
                };
                PngEncoder::new_with_quality(
                    &mut bytes,
                    compression,
                    options.png_filter.to_image(),
                )
                .write_image(
                    img.as_raw(),
                    img.width(),
                    img.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| Error::EncodeFailed(e.to_string()))?;
            }
            ImageKind::Gif => {
                let mut encoder = GifEncoder::new(&mut bytes);
                encoder
                    .encode_frame(Frame::new(img.clone()))
                    .map_err(|e| Error::EncodeFailed(e.to_string()))?;
            }
        }
        debug!(?format, size = bytes.len(), "encoded image");
        Ok(bytes)
    }

    fn resample(
        &self,
        dst: &mut PixelBuffer,
        dst_rect: Region,
        src: &PixelBuffer,
        src_rect: Region,
    ) {
        let view = imageops::crop_imm(
            src.as_image(),
            src_rect.x,
            src_rect.y,
            src_rect.width,
            src_rect.height,
        )
        .to_image();
        let scaled = if (view.width(), view.height()) == (dst_rect.width, dst_rect.height) {
            view
        } else {
            imageops::resize(&view, dst_rect.width, dst_rect.height, FilterType::Triangle)
        };
        imageops::replace(
            dst.as_image_mut(),
            &scaled,
            i64::from(dst_rect.x),
            i64::from(dst_rect.y),
        );
    }

    fn rotate(&self, src: &PixelBuffer, degrees: f64, background: Rgb) -> Result<PixelBuffer> {
        let normalized = degrees.rem_euclid(360.0);
        let img = src.as_image();

        // Positive angles rotate counter-clockwise; the image crate's
        // rotate90/270 are clockwise, hence the swap.
        if near(normalized, 0.0) || near(normalized, 360.0) {
            return Ok(src.clone());
        }
        if near(normalized, 90.0) {
            return PixelBuffer::from_image(imageops::rotate270(img));
        }
        if near(normalized, 180.0) {
            return PixelBuffer::from_image(imageops::rotate180(img));
        }
        if near(normalized, 270.0) {
            return PixelBuffer::from_image(imageops::rotate90(img));
        }

        let theta = normalized.to_radians();
        let (sin, cos) = theta.sin_cos();
        let (src_w, src_h) = (f64::from(src.width()), f64::from(src.height()));
        let out_w = (src_w * cos.abs() + src_h * sin.abs()).ceil() as u32;
        let out_h = (src_w * sin.abs() + src_h * cos.abs()).ceil() as u32;

        // Source-to-destination mapping: recenter, rotate, center on the
        // expanded canvas. Screen coordinates are y-down, so a negative
        // angle produces the counter-clockwise turn.
        let projection = Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
            * Projection::rotate(-(theta as f32))
            * Projection::translate(-(src_w as f32) / 2.0, -(src_h as f32) / 2.0);

        let mut out = RgbaImage::from_pixel(out_w, out_h, background.to_rgba8());
        warp_into(
            src.as_image(),
            &projection,
            Interpolation::Bilinear,
            background.to_rgba8(),
            &mut out,
        );
        debug!(degrees, out_w, out_h, "rotated image");
        PixelBuffer::from_image(out)
    }

    fn flip(&self, src: &PixelBuffer, axis: FlipAxis) -> Result<PixelBuffer> {
        let img = src.as_image();
        let flipped = match axis {
            FlipAxis::Vertical => imageops::flip_vertical(img),
            FlipAxis::Horizontal => imageops::flip_horizontal(img),
            // Mirroring both axes is exactly a half turn
            FlipAxis::Both => imageops::rotate180(img),
        };
        PixelBuffer::from_image(flipped)
    }
}

fn near(angle: f64, target: f64) -> bool {
    (angle - target).abs() < 0.01
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that keeps the trait's manual flip; everything else panics.
    /// Used to prove the native and fallback flips are bit-identical.
    struct ManualFlipBackend;

    impl RasterBackend for ManualFlipBackend {
        fn decode(&self, _: &[u8]) -> Result<(PixelBuffer, ImageKind)> {
            unimplemented!("flip-only test backend")
        }
        fn encode(&self, _: &PixelBuffer, _: ImageKind, _: &EncodeOptions) -> Result<Vec<u8>> {
            unimplemented!("flip-only test backend")
        }
        fn resample(&self, _: &mut PixelBuffer, _: Region, _: &PixelBuffer, _: Region) {
            unimplemented!("flip-only test backend")
        }
        fn rotate(&self, _: &PixelBuffer, _: f64, _: Rgb) -> Result<PixelBuffer> {
            unimplemented!("flip-only test backend")
        }
    }

    /// A 4x3 gradient buffer where every pixel is distinct.
    fn gradient() -> PixelBuffer {
        let img = RgbaImage::from_fn(4, 3, |x, y| {
            image::Rgba([x as u8 * 50, y as u8 * 70, (x + y) as u8, 255])
        });
        PixelBuffer::from_image(img).unwrap()
    }

    #[test]
    fn native_and_manual_flips_are_bit_identical() {
        let native = RustBackend::new();
        let manual = ManualFlipBackend;
        let src = gradient();
        for axis in [FlipAxis::Vertical, FlipAxis::Horizontal, FlipAxis::Both] {
            assert_eq!(
                native.flip(&src, axis).unwrap(),
                manual.flip(&src, axis).unwrap(),
                "{axis:?}"
            );
        }
    }

    #[test]
    fn flip_vertical_is_involution() {
        let backend = RustBackend::new();
        let src = gradient();
        let twice = backend
            .flip(&backend.flip(&src, FlipAxis::Vertical).unwrap(), FlipAxis::Vertical)
            .unwrap();
        assert_eq!(twice, src);
    }

    #[test]
    fn flip_maps_mirror_coordinates() {
        let backend = RustBackend::new();
        let src = gradient();
        let v = backend.flip(&src, FlipAxis::Vertical).unwrap();
        let h = backend.flip(&src, FlipAxis::Horizontal).unwrap();
        let both = backend.flip(&src, FlipAxis::Both).unwrap();
        let probe = src.get_pixel(1, 0).unwrap();
        assert_eq!(v.get_pixel(1, 2).unwrap(), probe);
        assert_eq!(h.get_pixel(2, 0).unwrap(), probe);
        assert_eq!(both.get_pixel(2, 2).unwrap(), probe);
    }

    #[test]
    fn rotate_quarter_turn_swaps_dimensions() {
        let backend = RustBackend::new();
        let src = PixelBuffer::allocate(200, 300, Rgb::opaque(5, 5, 5)).unwrap();
        let rotated = backend.rotate(&src, 90.0, Rgb::transparent_black()).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (300, 200));
    }

    #[test]
    fn rotate_90_counter_clockwise_moves_top_right_to_top_left() {
        let backend = RustBackend::new();
        let mut src = PixelBuffer::allocate(3, 2, Rgb::black()).unwrap();
        let marker = Rgb::opaque(255, 0, 0);
        src.set_pixel(2, 0, marker).unwrap();

        // CCW: the top-right corner becomes the top-left corner
        let rotated = backend.rotate(&src, 90.0, Rgb::transparent_black()).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(rotated.get_pixel(0, 0).unwrap(), marker);
    }

    #[test]
    fn rotate_arbitrary_angle_fills_corners_with_background() {
        let backend = RustBackend::new();
        let src = PixelBuffer::allocate(40, 40, Rgb::opaque(200, 200, 200)).unwrap();
        let background = Rgb::opaque(1, 2, 3);
        let rotated = backend.rotate(&src, 45.0, background).unwrap();

        // 40x40 at 45 degrees needs ceil(40 * sqrt(2)) = 57 per side
        assert_eq!((rotated.width(), rotated.height()), (57, 57));
        assert_eq!(rotated.get_pixel(0, 0).unwrap(), background);
        assert_eq!(
            rotated
                .get_pixel(rotated.width() - 1, rotated.height() - 1)
                .unwrap(),
            background
        );
        // Canvas center still shows the source
        assert_eq!(
            rotated.get_pixel(28, 28).unwrap(),
            Rgb::opaque(200, 200, 200)
        );
    }

    #[test]
    fn rotate_zero_is_identity() {
        let backend = RustBackend::new();
        let src = gradient();
        assert_eq!(backend.rotate(&src, 0.0, Rgb::black()).unwrap(), src);
        assert_eq!(backend.rotate(&src, 360.0, Rgb::black()).unwrap(), src);
    }

    #[test]
    fn decode_rejects_unknown_header() {
        let backend = RustBackend::new();
        assert!(matches!(
            backend.decode(b"definitely not an image"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn decode_recognized_header_with_corrupt_body_is_decode_failure() {
        let backend = RustBackend::new();
        // Valid PNG signature, garbage past it: the sniff succeeds, the
        // decoder must fail, and the two must stay distinguishable.
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&[0xff; 24]);
        assert!(matches!(
            backend.decode(&bytes),
            Err(Error::DecodeFailed(_))
        ));
    }

    #[test]
    fn encode_decode_png_preserves_pixels() {
        let backend = RustBackend::new();
        let src = gradient();
        let bytes = backend
            .encode(&src, ImageKind::Png, &EncodeOptions::default())
            .unwrap();
        let (decoded, kind) = backend.decode(&bytes).unwrap();
        assert_eq!(kind, ImageKind::Png);
        assert_eq!(decoded, src);
    }

    #[test]
    fn encode_jpeg_respects_quality_knob() {
        let backend = RustBackend::new();
        let img = RgbaImage::from_fn(64, 64, |x, y| {
            image::Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
        });
        let src = PixelBuffer::from_image(img).unwrap();
        let high = backend
            .encode(
                &src,
                ImageKind::Jpeg,
                &EncodeOptions {
                    jpeg_quality: 100,
                    ..EncodeOptions::default()
                },
            )
            .unwrap();
        let low = backend
            .encode(
                &src,
                ImageKind::Jpeg,
                &EncodeOptions {
                    jpeg_quality: 10,
                    ..EncodeOptions::default()
                },
            )
            .unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn resample_one_to_one_copies_rectangle() {
        let backend = RustBackend::new();
        let src = gradient();
        let mut dst = PixelBuffer::allocate(2, 2, Rgb::black()).unwrap();
        backend.resample(
            &mut dst,
            Region::new(0, 0, 2, 2),
            &src,
            Region::new(1, 1, 2, 2),
        );
        assert_eq!(dst.get_pixel(0, 0).unwrap(), src.get_pixel(1, 1).unwrap());
        assert_eq!(dst.get_pixel(1, 1).unwrap(), src.get_pixel(2, 2).unwrap());
    }

    #[test]
    fn resample_scales_solid_color_exactly() {
        let backend = RustBackend::new();
        let fill = Rgb::opaque(40, 80, 120);
        let src = PixelBuffer::allocate(8, 8, fill).unwrap();
        let mut dst = PixelBuffer::allocate(4, 4, Rgb::black()).unwrap();
        let dst_rect = Region::full(&dst);
        backend.resample(&mut dst, dst_rect, &src, Region::full(&src));
        assert_eq!(dst.get_pixel(1, 1).unwrap(), fill);
        assert_eq!(dst.get_pixel(3, 3).unwrap(), fill);
    }
}
