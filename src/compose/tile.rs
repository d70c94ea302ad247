//! Panel tile composition.
//!
//! A tile is the panel image inset by the border on a background-coloured
//! canvas, with the wrapped caption centred underneath:
//!
//! ```text
//! ┌──────────────────────────┐
//! │        border            │
//! │   ┌──────────────────┐   │
//! │   │   panel image    │   │
//! │   └──────────────────┘   │
//! │   caption line 1         │  ← starts right below the image
//! │   caption line 2         │
//! │     (caption band)       │
//! └──────────────────────────┘
//! ```
//!
//! Tile size depends only on [`LayoutParams`]. Long captions overflow the
//! band rather than growing the tile.

use super::calculations::{caption_line_y, centered_x, tile_dimensions};
use super::caption::WrappedCaption;
use super::params::LayoutParams;
use super::text::TextBackend;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::borrow::Cow;

/// Resize `image` to the panel size if it isn't already.
pub fn normalize_panel(image: &RgbaImage, panel_size: (u32, u32)) -> Cow<'_, RgbaImage> {
    if image.dimensions() == panel_size {
        Cow::Borrowed(image)
    } else {
        tracing::debug!(
            from = ?image.dimensions(),
            to = ?panel_size,
            "normalizing panel image"
        );
        Cow::Owned(imageops::resize(
            image,
            panel_size.0,
            panel_size.1,
            FilterType::Lanczos3,
        ))
    }
}

/// Compose one tile from a panel image and its wrapped caption.
///
/// The source image is only read. `params` must pass
/// [`check_layout`](super::strip::check_layout).
pub fn compose_tile(
    image: &RgbaImage,
    caption: &WrappedCaption,
    text: &impl TextBackend,
    params: &LayoutParams,
) -> RgbaImage {
    let (tile_w, tile_h) = tile_dimensions(params.panel_size, params.border, params.caption_band);
    let mut tile = RgbaImage::from_pixel(tile_w, tile_h, params.background);

    let panel = normalize_panel(image, params.panel_size);
    imageops::replace(&mut tile, &*panel, params.border as i64, params.border as i64);

    for (i, line) in caption.lines.iter().enumerate() {
        let width = text.measure(line).width;
        let x = centered_x(tile_w, width);
        let y = caption_line_y(params.panel_size.1, params.border, i, caption.line_height);
        text.draw(&mut tile, x, y, params.caption_color, line);
    }

    tile
}
