//! # Pictor
//!
//! A small raster image transformation library: open or create a canvas,
//! run it through resize strategies, rotations, flips and filters, overlay
//! text, and write it back out as JPEG, PNG or GIF.
//!
//! # Architecture: Strategies Around One Buffer
//!
//! Everything revolves around a [`canvas::Canvas`] that owns exactly one
//! RGBA pixel buffer. Operations come in three strategy families, each a
//! small trait with built-in implementations:
//!
//! ```text
//! ResizeStrategy   crop | fit | cache | scale   (geometry)
//! FilterStrategy   greyscale                    (per-pixel color)
//! WriteStrategy    jpeg | png | gif             (encoding + delivery)
//! ```
//!
//! Pixel-level work is behind the [`backend::RasterBackend`] trait, so the
//! orchestration layer never touches codec details directly:
//!
//! - **Swappability**: the default [`backend::RustBackend`] is pure Rust
//!   (the `image` and `imageproc` crates); a different engine only has to
//!   implement one trait.
//! - **Testability**: strategy and canvas logic is exercised against partial
//!   backends in unit tests without encoding a single byte.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`canvas`] | The façade — owns the buffer, dispatches every operation |
//! | [`backend`] | `RasterBackend` trait and the pure-Rust default engine |
//! | [`buffer`] | `PixelBuffer` and `Region`: validated pixel storage and rectangles |
//! | [`color`] | `Rgb` with 7-bit alpha, flexible `ColorSpec` inputs, YIQ luma |
//! | [`resize`] | The four resize strategies and their pure plan math |
//! | [`filter`] | Per-pixel color filters (greyscale) |
//! | [`element`] | Drawable overlays — text rendering with optional rotation |
//! | [`write`] | Write strategies: per-format quality knobs, extension fix-up |
//! | [`registry`] | Name → strategy lookup with runtime registration |
//! | [`error`] | The crate-wide error enum |
//!
//! # Design Decisions
//!
//! ## 7-Bit Alpha
//!
//! [`color::Rgb`] carries alpha in the 0..=127 range where 0 is opaque and
//! 127 fully transparent, matching the convention of palette-era raster
//! libraries. Conversion to and from 8-bit RGBA coverage is exact and
//! round-trips (see [`color`] module docs for the mapping).
//!
//! ## Strategies Over a God Object
//!
//! Resize modes, filters and output formats are trait objects resolved by
//! name through [`registry::Registry`], not match arms inside the canvas.
//! Callers can register their own strategies at runtime under new names;
//! the built-ins are just pre-registered entries.
//!
//! ## Value Semantics
//!
//! Transformations (`resize`, `rotate`, `flip_*`, `filter`, `crop`) return a
//! new `Canvas` and leave the source untouched. Only compositing operations
//! (`fill`, `append_element_at`) mutate in place. This keeps pipelines easy
//! to reason about: no hidden aliasing, intermediate results stay usable.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, encoding and resampling use the `image` crate; arbitrary-angle
//! rotation and rotated text use `imageproc` projections; glyphs come from
//! `ab_glyph`. No system libraries, no C toolchain.

pub mod backend;
pub mod buffer;
pub mod canvas;
pub mod color;
pub mod element;
pub mod error;
pub mod filter;
pub mod registry;
pub mod resize;
pub mod write;

pub use backend::{EncodeOptions, FlipAxis, ImageKind, PngFilter, RasterBackend, RustBackend};
pub use buffer::{PixelBuffer, Region};
pub use canvas::Canvas;
pub use color::{ColorSpec, Rgb, Yiq};
pub use element::{Element, TextElement};
pub use error::{Error, Result};
pub use filter::{FilterStrategy, GreyscaleFilter};
pub use registry::Registry;
pub use resize::{CacheResize, CropResize, FitResize, ResizeStrategy, ScaleResize};
pub use write::{GifWriter, JpegWriter, PngWriter, WriteStrategy};
