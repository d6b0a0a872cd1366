//! Crate-wide error type.
//!
//! Every failure in pictor is deterministic and surfaced synchronously as a
//! typed error — nothing is retried and nothing degrades silently. The
//! variants fall into four groups:
//!
//! - caller input: [`NotFound`](Error::NotFound), [`NotReadable`](Error::NotReadable),
//!   [`UnsupportedFormat`](Error::UnsupportedFormat), [`InvalidColorFormat`](Error::InvalidColorFormat),
//!   [`UnsupportedMode`](Error::UnsupportedMode), [`UnsupportedFilter`](Error::UnsupportedFilter),
//!   [`InvalidDimensions`](Error::InvalidDimensions), [`PixelOutOfBounds`](Error::PixelOutOfBounds),
//!   [`OutOfBounds`](Error::OutOfBounds)
//! - codec boundary: [`DecodeFailed`](Error::DecodeFailed), [`EncodeFailed`](Error::EncodeFailed)
//! - configuration: [`Configuration`](Error::Configuration) — validated at the
//!   setter, before any pixel work
//! - plain IO: [`Io`](Error::Io)

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file {0} not found")]
    NotFound(PathBuf),
    #[error("file {path} not readable: {source}")]
    NotReadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("image decoding failed: {0}")]
    DecodeFailed(String),
    #[error("image encoding failed: {0}")]
    EncodeFailed(String),
    #[error("invalid color specification: {0}")]
    InvalidColorFormat(String),
    #[error("unknown resize mode '{0}'")]
    UnsupportedMode(String),
    #[error("unknown filter '{0}'")]
    UnsupportedFilter(String),
    #[error("invalid dimensions {width}x{height}: width and height must be at least 1")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("pixel ({x},{y}) is outside the {width}x{height} buffer")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("region {x},{y} {width}x{height} exceeds source bounds {src_width}x{src_height}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        src_width: u32,
        src_height: u32,
    },
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
