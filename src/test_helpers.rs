//! Shared test utilities for the comicstrip test suite.
//!
//! Provides script fixtures, solid-colour images and pixel-region assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let script = parse_script(JUNGLE_SCRIPT);
//! let tile = compose_tile(&solid_image(100, 100, index_color(0)), ...);
//! assert_region_color(&tile, (10, 10, 100, 100), index_color(0));
//! ```

use image::{Rgba, RgbaImage};

// =========================================================================
// Script fixtures
// =========================================================================

/// The one-panel jungle scenario.
pub const JUNGLE_SCRIPT: &str = "\
Description: A jungle.
Panels:
Panel Description 1: Max enters a temple.
Caption 1: He steps inside.
";

/// A well-formed script with `n` numbered panels.
pub fn numbered_script(n: usize) -> String {
    let mut text = String::from("Description: Ink wash, one explorer in a red scarf.\nPanels:\n");
    for i in 1..=n {
        text.push_str(&format!("Panel Description {i}: Scene number {i}.\n"));
        text.push_str(&format!("Caption {i}: Caption text {i}.\n"));
    }
    text
}

// =========================================================================
// Images
// =========================================================================

pub fn solid_image(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// A distinct opaque, non-white colour per index.
pub fn index_color(i: usize) -> Rgba<u8> {
    let i = i as u8;
    Rgba([
        i.wrapping_mul(37).wrapping_add(11) % 250,
        i.wrapping_mul(71).wrapping_add(5) % 250,
        i.wrapping_mul(13).wrapping_add(90) % 250,
        255,
    ])
}

// =========================================================================
// Pixel assertions (panic on the first offending pixel)
// =========================================================================

/// Assert every pixel in `(x, y, width, height)` equals `color`.
pub fn assert_region_color(image: &RgbaImage, region: (u32, u32, u32, u32), color: Rgba<u8>) {
    let (x0, y0, w, h) = region;
    assert!(
        x0 + w <= image.width() && y0 + h <= image.height(),
        "region {region:?} outside {:?}",
        image.dimensions()
    );
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            let actual = *image.get_pixel(x, y);
            assert_eq!(
                actual, color,
                "pixel ({x}, {y}) in region {region:?} is {actual:?}, expected {color:?}"
            );
        }
    }
}
