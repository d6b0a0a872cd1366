//! Resize strategies: scale, fit, crop and cache (letterbox).
//!
//! Each strategy is a deterministic pure function of the source and target
//! dimensions — none mutates its source. The geometry planning is split out
//! into plain functions so the math is unit-testable without touching a
//! backend; the strategies only decide rectangles, the actual resampling is
//! the backend's job.
//!
//! The arithmetic follows float-then-truncate semantics to bit-match the
//! reference outputs, with results clamped to a 1×1 floor so a plan never
//! produces an empty buffer. Strategies do not validate the target size;
//! [`Canvas::resize`](crate::canvas::Canvas::resize) rejects zero targets
//! before any strategy runs.

use crate::backend::RasterBackend;
use crate::buffer::{PixelBuffer, Region};
use crate::color::Rgb;
use crate::error::Result;
use tracing::debug;

/// A resize mode: consumes a source buffer and a target size, produces a
/// freshly allocated output buffer.
pub trait ResizeStrategy {
    fn resize(
        &self,
        backend: &dyn RasterBackend,
        src: &PixelBuffer,
        target_width: u32,
        target_height: u32,
    ) -> Result<PixelBuffer>;
}

// =============================================================================
// Geometry planning
// =============================================================================

/// Output size for scale mode: aspect-preserving, never upsampling.
///
/// Targets larger than the source are clamped per-dimension first, then the
/// limiting dimension wins: a 300×200 source scaled toward (100, 200) comes
/// out exactly 100×66.
pub fn scale_plan(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let target_w = target.0.min(src_w);
    let target_h = target.1.min(src_h);

    let orig_ratio = f64::from(src_h) / f64::from(src_w);
    let new_ratio = f64::from(target_h) / f64::from(target_w);

    let (out_w, out_h) = if orig_ratio < new_ratio {
        (f64::from(target_w), f64::from(target_w) * orig_ratio)
    } else {
        (f64::from(target_h) / orig_ratio, f64::from(target_h))
    };
    ((out_w as u32).max(1), (out_h as u32).max(1))
}

/// Output size for fit mode: integer ceiling-ratio steps.
///
/// Distinct from scale on purpose: the reduction ratio is
/// `max(ceil(srcW/tw), ceil(srcH/th))`, a whole number, so the output only
/// shrinks in integer steps.
pub fn fit_plan(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let ratio = src_w.div_ceil(target.0).max(src_h.div_ceil(target.1)).max(1);
    ((src_w / ratio).max(1), (src_h / ratio).max(1))
}

/// Source rectangle for crop mode: centered in the source, same aspect
/// ratio as the target. The output is always exactly the target size.
pub fn crop_plan(source: (u32, u32), target: (u32, u32)) -> Region {
    let (src_w, src_h) = source;
    let orig_ratio = f64::from(src_h) / f64::from(src_w);
    let new_ratio = f64::from(target.1) / f64::from(target.0);

    let (w, h, x, y) = if orig_ratio < new_ratio {
        // Source is proportionally wider: full height, trimmed width
        let w = f64::from(src_h) / new_ratio;
        (w, f64::from(src_h), (f64::from(src_w) - w) / 2.0, 0.0)
    } else {
        let h = f64::from(src_w) * new_ratio;
        (f64::from(src_w), h, 0.0, (f64::from(src_h) - h) / 2.0)
    };
    Region::new(x as u32, y as u32, (w as u32).max(1), (h as u32).max(1))
}

/// Destination rectangle for cache (letterbox) mode: the source scaled to
/// fit entirely inside the target, centered. The symmetric margins keep the
/// destination's fill color.
pub fn cache_plan(source: (u32, u32), target: (u32, u32)) -> Region {
    let (src_w, src_h) = source;
    let (target_w, target_h) = target;
    let orig_ratio = f64::from(src_h) / f64::from(src_w);
    let new_ratio = f64::from(target_h) / f64::from(target_w);

    let (w, h, x, y) = if orig_ratio < new_ratio {
        let h = f64::from(target_w) * orig_ratio;
        (f64::from(target_w), h, 0.0, (f64::from(target_h) - h) / 2.0)
    } else {
        let w = f64::from(target_h) / orig_ratio;
        (w, f64::from(target_h), (f64::from(target_w) - w) / 2.0, 0.0)
    };
    Region::new(x as u32, y as u32, (w as u32).max(1), (h as u32).max(1))
}

// =============================================================================
// Strategies
// =============================================================================

/// Aspect-preserving shrink to fit inside the target; never upsamples,
/// never pads — the canvas takes the computed size.
#[derive(Debug, Default)]
pub struct ScaleResize;

impl ResizeStrategy for ScaleResize {
    fn resize(
        &self,
        backend: &dyn RasterBackend,
        src: &PixelBuffer,
        target_width: u32,
        target_height: u32,
    ) -> Result<PixelBuffer> {
        let (out_w, out_h) = scale_plan((src.width(), src.height()), (target_width, target_height));
        debug!(out_w, out_h, "scale resize");
        let mut out = PixelBuffer::allocate(out_w, out_h, Rgb::black())?;
        backend.resample(
            &mut out,
            Region::new(0, 0, out_w, out_h),
            src,
            Region::full(src),
        );
        Ok(out)
    }
}

/// Integer-ratio shrink (ceiling steps). Kept separate from [`ScaleResize`];
/// the two modes agree only by coincidence on some inputs.
#[derive(Debug, Default)]
pub struct FitResize;

impl ResizeStrategy for FitResize {
    fn resize(
        &self,
        backend: &dyn RasterBackend,
        src: &PixelBuffer,
        target_width: u32,
        target_height: u32,
    ) -> Result<PixelBuffer> {
        let (out_w, out_h) = fit_plan((src.width(), src.height()), (target_width, target_height));
        debug!(out_w, out_h, "fit resize");
        let mut out = PixelBuffer::allocate(out_w, out_h, Rgb::black())?;
        backend.resample(
            &mut out,
            Region::new(0, 0, out_w, out_h),
            src,
            Region::full(src),
        );
        Ok(out)
    }
}

/// Exact-size output by center-cropping the source to the target aspect
/// ratio before resampling. No letterboxing, no distortion.
#[derive(Debug, Default)]
pub struct CropResize;

impl ResizeStrategy for CropResize {
    fn resize(
        &self,
        backend: &dyn RasterBackend,
        src: &PixelBuffer,
        target_width: u32,
        target_height: u32,
    ) -> Result<PixelBuffer> {
        let src_rect = crop_plan((src.width(), src.height()), (target_width, target_height));
        debug!(?src_rect, target_width, target_height, "crop resize");
        let mut out = PixelBuffer::allocate(target_width, target_height, Rgb::black())?;
        backend.resample(
            &mut out,
            Region::new(0, 0, target_width, target_height),
            src,
            src_rect,
        );
        Ok(out)
    }
}

/// Exact-size output with the source letterboxed inside it. The margins are
/// transparent black — an explicit choice, not whatever a fresh allocation
/// happens to contain.
#[derive(Debug, Default)]
pub struct CacheResize;

impl ResizeStrategy for CacheResize {
    fn resize(
        &self,
        backend: &dyn RasterBackend,
        src: &PixelBuffer,
        target_width: u32,
        target_height: u32,
    ) -> Result<PixelBuffer> {
        let dst_rect = cache_plan((src.width(), src.height()), (target_width, target_height));
        debug!(?dst_rect, target_width, target_height, "cache resize");
        let mut out =
            PixelBuffer::allocate(target_width, target_height, Rgb::transparent_black())?;
        backend.resample(&mut out, dst_rect, src, Region::full(src));
        Ok(out)
    }
}
