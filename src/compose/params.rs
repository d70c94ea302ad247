//! Parameter types for composition.
//!
//! [`LayoutParams`] carries every knob the tile compositor and strip
//! assembler read: panel size, border, caption band, row width and colours.
//! It is built from [`ComicConfig`](crate::config::ComicConfig) once and then
//! shared read-only across worker threads.

use image::Rgba;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Geometry and colours for tiles and the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Size every panel image is normalised to, `(width, height)`.
    pub panel_size: (u32, u32),
    /// Uniform margin around the panel image.
    pub border: u32,
    /// Extra height reserved below the image for the caption.
    pub caption_band: u32,
    pub panels_per_row: u32,
    pub caption_color: Rgba<u8>,
    /// Tile background, border colour and empty-cell fill. Must be opaque.
    pub background: Rgba<u8>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            panel_size: (1024, 1024),
            border: 20,
            caption_band: 80,
            panels_per_row: 3,
            caption_color: BLACK,
            background: WHITE,
        }
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into an RGBA pixel.
///
/// Short and six-digit forms are fully opaque.
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [255u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(Rgba(out))
        }
        6 | 8 => {
            let mut out = [255u8; 4];
            for i in 0..hex.len() / 2 {
                out[i] = channel(&hex[i * 2..i * 2 + 2])?;
            }
            Some(Rgba(out))
        }
        _ => None,
    }
}
