//! Text measurement and drawing backend.
//!
//! Caption wrapping needs real pixel widths, and tile composition needs to
//! draw glyphs. Both go through the [`TextBackend`] trait so the layout code
//! never touches a font directly.
//!
//! The production implementation is
//! [`GlyphBackend`](super::glyph::GlyphBackend) (ab_glyph outlines rasterised
//! by imageproc). Tests use the fixed-width fake in [`tests`].

use image::{Rgba, RgbaImage};

/// Pixel extent of a run of text on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// A fixed typeface at a fixed size that can measure and draw one line of
/// text.
pub trait TextBackend: Sync {
    /// Measure `text` as it would be drawn.
    fn measure(&self, text: &str) -> TextExtent;

    /// Draw `text` with its top-left corner at `(x, y)`. Pixels outside the
    /// canvas are clipped.
    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str);
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Every glyph is a `char_width × line_height` block, drawn as a solid
    /// rectangle. Records draw calls so tests can check placement.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    pub struct FixedWidthText {
        pub char_width: u32,
        pub line_height: u32,
        pub draws: Mutex<Vec<DrawCall>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct DrawCall {
        pub x: i32,
        pub y: i32,
        pub text: String,
    }

    impl FixedWidthText {
        pub fn new(char_width: u32, line_height: u32) -> Self {
            Self {
                char_width,
                line_height,
                draws: Mutex::new(Vec::new()),
            }
        }

        pub fn get_draws(&self) -> Vec<DrawCall> {
            self.draws.lock().unwrap().clone()
        }
    }

    impl TextBackend for FixedWidthText {
        fn measure(&self, text: &str) -> TextExtent {
            let chars = text.chars().count() as u32;
            TextExtent {
                width: chars * self.char_width,
                height: if chars == 0 { 0 } else { self.line_height },
            }
        }

        fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
            self.draws.lock().unwrap().push(DrawCall {
                x,
                y,
                text: text.to_string(),
            });
            let extent = self.measure(text);
            for dy in 0..extent.height as i32 {
                for dx in 0..extent.width as i32 {
                    let (px, py) = (x + dx, y + dy);
                    if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
                        canvas.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }

    #[test]
    fn fixed_width_measures_by_char_count() {
        let text = FixedWidthText::new(10, 20);
        assert_eq!(text.measure("abc"), TextExtent { width: 30, height: 20 });
        assert_eq!(text.measure(""), TextExtent::default());
    }

    #[test]
    fn fixed_width_draw_clips_to_canvas() {
        let text = FixedWidthText::new(4, 4);
        let mut canvas = RgbaImage::from_pixel(6, 6, Rgba([255, 255, 255, 255]));
        text.draw(&mut canvas, -2, 4, Rgba([0, 0, 0, 255]), "ab");

        assert_eq!(*canvas.get_pixel(0, 4), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(0, 3), Rgba([255, 255, 255, 255]));
        assert_eq!(text.get_draws().len(), 1);
    }
}
