//! Overlay elements drawn onto a canvas at a position.
//!
//! An [`Element`] is anything that knows how to paint itself onto a pixel
//! buffer. The builtin [`TextElement`] renders a string with a TTF/OTF font
//! through `ab_glyph` + `imageproc`; custom elements (watermarks, badges)
//! implement the same one-method trait.

use crate::buffer::PixelBuffer;
use crate::color::{ColorSpec, Rgb};
use crate::error::{Error, Result};
use ab_glyph::{FontVec, PxScale};
use image::RgbaImage;
use image::imageops;
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;

/// Something that can be drawn onto a buffer at (x, y), blending over the
/// existing pixels.
pub trait Element {
    fn draw(&self, buffer: &mut PixelBuffer, x: i32, y: i32) -> Result<()>;
}

/// A line of text. Builder-style setters; `font` and `text` are required,
/// color defaults to opaque black at draw time, size to 14 px, angle to 0.
///
/// The (x, y) anchor is the top-left corner of the glyph box. Positive
/// angles rotate the text counter-clockwise around that anchor.
pub struct TextElement {
    text: String,
    size: f32,
    angle: f32,
    color: Option<Rgb>,
    font: Option<FontVec>,
}

impl TextElement {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            size: 14.0,
            angle: 0.0,
            color: None,
            font: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Rotation in degrees, counter-clockwise.
    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn color(mut self, spec: impl Into<ColorSpec>) -> Result<Self> {
        self.color = Some(Rgb::normalize(spec)?);
        Ok(self)
    }

    /// Load a TTF/OTF font from raw bytes.
    pub fn font_bytes(mut self, bytes: Vec<u8>) -> Result<Self> {
        self.font = Some(
            FontVec::try_from_vec(bytes)
                .map_err(|e| Error::Configuration(format!("invalid font data: {e}")))?,
        );
        Ok(self)
    }

    /// Load a TTF/OTF font from a file.
    pub fn font_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        self.font_bytes(std::fs::read(path)?)
    }
}

impl Default for TextElement {
    fn default() -> Self {
        Self::new()
    }
}

impl Element for TextElement {
    fn draw(&self, buffer: &mut PixelBuffer, x: i32, y: i32) -> Result<()> {
        let font = self
            .font
            .as_ref()
            .ok_or_else(|| Error::Configuration("text element has no font set".into()))?;
        let color = self.color.unwrap_or_else(Rgb::black);
        let scale = PxScale::from(self.size);
        debug!(text = %self.text, x, y, angle = self.angle, "drawing text element");

        if self.angle == 0.0 {
            draw_text_mut(
                buffer.as_image_mut(),
                color.to_rgba8(),
                x,
                y,
                scale,
                font,
                &self.text,
            );
            return Ok(());
        }

        // Rotated text: render into a transparent staging buffer, warp it
        // about the anchor, then alpha-blend the result over the canvas.
        let (text_w, text_h) = text_size(scale, font, &self.text);
        if text_w == 0 || text_h == 0 {
            return Ok(());
        }
        let mut staging = RgbaImage::new(text_w, text_h);
        draw_text_mut(&mut staging, color.to_rgba8(), 0, 0, scale, font, &self.text);

        // y-down screen coordinates: negate the angle for a counter-clockwise
        // turn. The glyph box pivots about the anchor, so the rotated
        // bounding box can extend to negative offsets from it.
        let theta = self.angle.to_radians();
        let (sin, cos) = theta.sin_cos();
        let rotate = |px: f32, py: f32| (px * cos + py * sin, -px * sin + py * cos);
        let (w, h) = (text_w as f32, text_h as f32);
        let corners = [rotate(0.0, 0.0), rotate(w, 0.0), rotate(0.0, h), rotate(w, h)];
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);

        let out_w = (max_x - min_x).ceil() as u32 + 1;
        let out_h = (max_y - min_y).ceil() as u32 + 1;
        let projection = Projection::translate(-min_x, -min_y) * Projection::rotate(-theta);
        let mut rotated = RgbaImage::new(out_w, out_h);
        warp_into(
            &staging,
            &projection,
            Interpolation::Bilinear,
            image::Rgba([0, 0, 0, 0]),
            &mut rotated,
        );
        imageops::overlay(
            buffer.as_image_mut(),
            &rotated,
            i64::from(x) + min_x.floor() as i64,
            i64::from(y) + min_y.floor() as i64,
        );
        Ok(())
    }
}
