//! High-level composition operations.
//!
//! These functions combine caption wrapping, tile composition and strip
//! assembly. Tiles are independent, so they are built in parallel; the strip
//! is assembled once every tile exists.

use super::calculations::max_line_width;
use super::caption::wrap_caption;
use super::params::LayoutParams;
use super::strip::{LayoutError, assemble_strip, check_layout};
use super::text::TextBackend;
use super::tile::compose_tile;
use crate::types::RenderedPanel;
use image::{DynamicImage, ImageResult, RgbaImage};
use rayon::prelude::*;
use std::path::Path;

/// Wrap the panel's caption and compose its tile.
pub fn build_tile(panel: &RenderedPanel, text: &impl TextBackend, params: &LayoutParams) -> RgbaImage {
    let max_width = max_line_width(params.panel_size.0, params.border);
    let caption = wrap_caption(&panel.caption, text, max_width);
    tracing::trace!(lines = caption.lines.len(), caption = %panel.caption, "wrapped caption");
    compose_tile(&panel.image, &caption, text, params)
}

/// Build every tile in parallel, preserving panel order.
pub fn build_tiles(
    panels: &[RenderedPanel],
    text: &impl TextBackend,
    params: &LayoutParams,
) -> Vec<RgbaImage> {
    panels
        .par_iter()
        .map(|panel| build_tile(panel, text, params))
        .collect()
}

/// Turn rendered panels into the finished strip.
pub fn compose_strip(
    panels: &[RenderedPanel],
    text: &impl TextBackend,
    params: &LayoutParams,
) -> Result<RgbaImage, LayoutError> {
    check_layout(params, panels.len())?;
    let tiles = build_tiles(panels, text, params);
    assemble_strip(&tiles, params)
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

/// Save the strip, inferring the format from the extension.
///
/// JPEG has no alpha channel, so the strip is flattened to RGB first.
pub fn save_strip(strip: &RgbaImage, path: &Path) -> ImageResult<()> {
    if is_jpeg(path) {
        DynamicImage::ImageRgba8(strip.clone()).to_rgb8().save(path)
    } else {
        strip.save(path)
    }
}
