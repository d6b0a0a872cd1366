//! Name-based strategy resolution.
//!
//! Callers pick a resize mode, write format or filter by case-insensitive
//! name. The registry is an explicit map from lowercase name to constructor
//! function — no reflection, no namespace walking — seeded with the builtin
//! strategies and extensible at runtime for custom ones.

use crate::error::{Error, Result};
use crate::filter::{FilterStrategy, GreyscaleFilter};
use crate::resize::{CacheResize, CropResize, FitResize, ResizeStrategy, ScaleResize};
use crate::write::{GifWriter, JpegWriter, PngWriter, WriteStrategy};
use std::collections::HashMap;

type ResizeCtor = fn() -> Box<dyn ResizeStrategy>;
type WriteCtor = fn() -> Box<dyn WriteStrategy>;
type FilterCtor = fn() -> Box<dyn FilterStrategy>;

/// Registry of named strategies. `Registry::default()` knows the builtins:
/// resize `crop|fit|cache|scale`, write `jpeg|jpg|png|gif`, filter
/// `greyscale`.
pub struct Registry {
    resize: HashMap<String, ResizeCtor>,
    write: HashMap<String, WriteCtor>,
    filter: HashMap<String, FilterCtor>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self {
            resize: HashMap::new(),
            write: HashMap::new(),
            filter: HashMap::new(),
        };
        registry.register_resize("crop", || Box::new(CropResize));
        registry.register_resize("fit", || Box::new(FitResize));
        registry.register_resize("cache", || Box::new(CacheResize));
        registry.register_resize("scale", || Box::new(ScaleResize));
        registry.register_write("jpeg", || Box::new(JpegWriter::new()));
        registry.register_write("jpg", || Box::new(JpegWriter::new()));
        registry.register_write("png", || Box::new(PngWriter::new()));
        registry.register_write("gif", || Box::new(GifWriter::new()));
        registry.register_filter("greyscale", || Box::new(GreyscaleFilter));
        registry
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a resize strategy under `name`.
    pub fn register_resize(&mut self, name: &str, ctor: ResizeCtor) -> &mut Self {
        self.resize.insert(name.to_lowercase(), ctor);
        self
    }

    pub fn register_write(&mut self, name: &str, ctor: WriteCtor) -> &mut Self {
        self.write.insert(name.to_lowercase(), ctor);
        self
    }

    pub fn register_filter(&mut self, name: &str, ctor: FilterCtor) -> &mut Self {
        self.filter.insert(name.to_lowercase(), ctor);
        self
    }

    pub fn resize_strategy(&self, name: &str) -> Result<Box<dyn ResizeStrategy>> {
        self.resize
            .get(&name.to_lowercase())
            .map(|ctor| ctor())
            .ok_or_else(|| Error::UnsupportedMode(name.to_string()))
    }

    pub fn write_strategy(&self, name: &str) -> Result<Box<dyn WriteStrategy>> {
        self.write
            .get(&name.to_lowercase())
            .map(|ctor| ctor())
            .ok_or_else(|| Error::UnsupportedFormat(name.to_string()))
    }

    pub fn filter_strategy(&self, name: &str) -> Result<Box<dyn FilterStrategy>> {
        self.filter
            .get(&name.to_lowercase())
            .map(|ctor| ctor())
            .ok_or_else(|| Error::UnsupportedFilter(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ImageKind;

    #[test]
    fn builtin_names_resolve() {
        let registry = Registry::new();
        for name in ["crop", "fit", "cache", "scale"] {
            assert!(registry.resize_strategy(name).is_ok(), "{name}");
        }
        for name in ["jpeg", "jpg", "png", "gif"] {
            assert!(registry.write_strategy(name).is_ok(), "{name}");
        }
        assert!(registry.filter_strategy("greyscale").is_ok());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = Registry::new();
        assert!(registry.resize_strategy("SCALE").is_ok());
        assert_eq!(registry.write_strategy("JPEG").unwrap().kind(), ImageKind::Jpeg);
        assert!(registry.filter_strategy("Greyscale").is_ok());
    }

    #[test]
    fn unknown_names_fail_with_the_right_variant() {
        let registry = Registry::new();
        assert!(matches!(
            registry.resize_strategy("stretch"),
            Err(Error::UnsupportedMode(_))
        ));
        assert!(matches!(
            registry.write_strategy("webp"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            registry.filter_strategy("sepia"),
            Err(Error::UnsupportedFilter(_))
        ));
    }

    #[test]
    fn custom_registration_resolves() {
        use crate::backend::RasterBackend;
        use crate::buffer::PixelBuffer;
        use crate::resize::ResizeStrategy;

        struct Identity;
        impl ResizeStrategy for Identity {
            fn resize(
                &self,
                _: &dyn RasterBackend,
                src: &PixelBuffer,
                _: u32,
                _: u32,
            ) -> crate::error::Result<PixelBuffer> {
                Ok(src.clone())
            }
        }

        let mut registry = Registry::new();
        registry.register_resize("identity", || Box::new(Identity));
        assert!(registry.resize_strategy("Identity").is_ok());
    }
}
