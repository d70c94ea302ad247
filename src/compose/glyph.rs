//! Font-backed text backend: ab_glyph outlines, imageproc rasterisation.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Load TTF/OTF | `ab_glyph::FontVec::try_from_vec` |
//! | Measure | `imageproc::drawing::text_size` |
//! | Draw | `imageproc::drawing::draw_text_mut` |
//!
//! The typeface is fixed for a run. When no path is configured, a short list
//! of well-known sans-serif font files is searched.

use super::text::{TextBackend, TextExtent};
use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a usable font file: {0}")]
    InvalidFont(PathBuf),
    #[error("No sans-serif font found (tried {0:?}); set [font] path in the config")]
    NotFound(Vec<PathBuf>),
}

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Caption text backend over a single loaded font at a fixed pixel size.
pub struct GlyphBackend {
    font: FontVec,
    scale: PxScale,
}

impl GlyphBackend {
    /// Load a font file at `size` pixels.
    pub fn from_file(path: &Path, size: f32) -> Result<Self, FontError> {
        let bytes = std::fs::read(path)?;
        let font =
            FontVec::try_from_vec(bytes).map_err(|_| FontError::InvalidFont(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), size, "loaded caption font");
        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }

    /// Load the configured font, or the first system sans-serif font found.
    pub fn load(configured: Option<&Path>, size: f32) -> Result<Self, FontError> {
        match configured {
            Some(path) => Self::from_file(path, size),
            None => {
                let path = find_system_font(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from))?;
                Self::from_file(&path, size)
            }
        }
    }
}

/// First existing path among `candidates`.
fn find_system_font(candidates: impl Iterator<Item = PathBuf>) -> Result<PathBuf, FontError> {
    let mut tried = Vec::new();
    for candidate in candidates {
        if candidate.is_file() {
            return Ok(candidate);
        }
        tried.push(candidate);
    }
    Err(FontError::NotFound(tried))
}

impl TextBackend for GlyphBackend {
    fn measure(&self, text: &str) -> TextExtent {
        let (width, height) = text_size(self.scale, &self.font, text);
        TextExtent { width, height }
    }

    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}
