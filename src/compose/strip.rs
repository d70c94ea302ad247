//! Strip assembly: tiles laid out row-major on one canvas.
//!
//! The canvas is always `panels_per_row` tiles wide. A partially filled last
//! row leaves its trailing cells as background.
//!
//! Each grid row occupies a contiguous band of the canvas buffer, so bands
//! are filled in parallel through disjoint `&mut [u8]` slices with no
//! locking.

use super::calculations::{checked_tile_dimensions, grid_rows, strip_dimensions};
use super::params::LayoutParams;
use image::RgbaImage;
use rayon::prelude::*;
use thiserror::Error;

const CHANNELS: usize = 4;

/// Longest side, in pixels, a strip canvas may have. JPEG cannot encode more.
pub const MAX_CANVAS_SIDE: u32 = 65_535;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Cannot assemble a strip from zero panels")]
    EmptyPanelSequence,
    #[error("panels_per_row must be at least 1")]
    ZeroPanelsPerRow,
    #[error("Tile {index} is {actual:?}, expected {expected:?}")]
    TileSizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Background must be opaque, got alpha {0}")]
    TranslucentBackground(u8),
    #[error("Strip canvas would exceed {} pixels on a side", MAX_CANVAS_SIDE)]
    CanvasTooLarge,
}

/// Canvas size for `tiles` tiles of `tile` pixels, bounded by
/// [`MAX_CANVAS_SIDE`].
fn canvas_dimensions(
    tile: (u32, u32),
    per_row: u32,
    tiles: usize,
) -> Result<(u32, u32), LayoutError> {
    strip_dimensions(tile, per_row, tiles)
        .filter(|&(w, h)| w <= MAX_CANVAS_SIDE && h <= MAX_CANVAS_SIDE)
        .ok_or(LayoutError::CanvasTooLarge)
}

fn check_grid(params: &LayoutParams) -> Result<(), LayoutError> {
    if params.panels_per_row == 0 {
        return Err(LayoutError::ZeroPanelsPerRow);
    }
    match params.background.0[3] {
        u8::MAX => Ok(()),
        alpha => Err(LayoutError::TranslucentBackground(alpha)),
    }
}

/// Check that `params` can lay out `count` panels and return the strip size.
///
/// Run before any tile is built so oversized geometry never allocates.
pub fn check_layout(params: &LayoutParams, count: usize) -> Result<(u32, u32), LayoutError> {
    if count == 0 {
        return Err(LayoutError::EmptyPanelSequence);
    }
    check_grid(params)?;
    let tile = checked_tile_dimensions(params.panel_size, params.border, params.caption_band)
        .ok_or(LayoutError::CanvasTooLarge)?;
    canvas_dimensions(tile, params.panels_per_row, count)
}

/// Paste `tiles` into a grid `params.panels_per_row` wide.
///
/// Every tile must have the same dimensions. The background must be opaque.
pub fn assemble_strip(tiles: &[RgbaImage], params: &LayoutParams) -> Result<RgbaImage, LayoutError> {
    let first = tiles.first().ok_or(LayoutError::EmptyPanelSequence)?;
    check_grid(params)?;
    let per_row = params.panels_per_row;

    let tile_size = first.dimensions();
    if let Some((index, tile)) = tiles
        .iter()
        .enumerate()
        .find(|(_, t)| t.dimensions() != tile_size)
    {
        return Err(LayoutError::TileSizeMismatch {
            index,
            expected: tile_size,
            actual: tile.dimensions(),
        });
    }

    let (width, height) = canvas_dimensions(tile_size, per_row, tiles.len())?;
    tracing::debug!(
        tiles = tiles.len(),
        rows = grid_rows(tiles.len(), per_row),
        width,
        height,
        "assembling strip"
    );
    let mut canvas = RgbaImage::from_pixel(width, height, params.background);

    let tile_row_bytes = tile_size.0 as usize * CHANNELS;
    let canvas_row_bytes = width as usize * CHANNELS;
    let band_bytes = canvas_row_bytes * tile_size.1 as usize;
    if band_bytes == 0 {
        return Ok(canvas);
    }

    canvas
        .par_chunks_mut(band_bytes)
        .zip(tiles.par_chunks(per_row as usize))
        .for_each(|(band, row_tiles)| {
            for (col, tile) in row_tiles.iter().enumerate() {
                let x_offset = col * tile_row_bytes;
                for (y, src) in tile.as_raw().chunks_exact(tile_row_bytes).enumerate() {
                    let start = y * canvas_row_bytes + x_offset;
                    band[start..start + tile_row_bytes].copy_from_slice(src);
                }
            }
        });

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::calculations::cell_origin;
    use crate::compose::params::WHITE;
    use crate::test_helpers::{assert_region_color, index_color, solid_image};

    fn params(per_row: u32) -> LayoutParams {
        LayoutParams {
            panels_per_row: per_row,
            ..LayoutParams::default()
        }
    }

    fn colored_tiles(n: usize, size: (u32, u32)) -> Vec<RgbaImage> {
        (0..n).map(|i| solid_image(size.0, size.1, index_color(i))).collect()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn zero_tiles_is_rejected() {
        assert_eq!(
            assemble_strip(&[], &params(3)),
            Err(LayoutError::EmptyPanelSequence)
        );
    }

    #[test]
    fn zero_per_row_is_rejected() {
        let tiles = colored_tiles(2, (4, 4));
        assert_eq!(
            assemble_strip(&tiles, &params(0)),
            Err(LayoutError::ZeroPanelsPerRow)
        );
    }

    #[test]
    fn translucent_background_is_rejected() {
        let tiles = colored_tiles(1, (4, 4));
        let params = LayoutParams {
            background: image::Rgba([255, 255, 255, 0]),
            ..params(3)
        };
        assert_eq!(
            assemble_strip(&tiles, &params),
            Err(LayoutError::TranslucentBackground(0))
        );
    }

    #[test]
    fn overflowing_grid_is_rejected() {
        let tiles = colored_tiles(1, (2, 1));
        assert_eq!(
            assemble_strip(&tiles, &params(1 << 31)),
            Err(LayoutError::CanvasTooLarge)
        );
    }

    #[test]
    fn canvas_side_is_bounded() {
        let tiles = colored_tiles(2, (MAX_CANVAS_SIDE / 2 + 1, 1));
        assert_eq!(
            assemble_strip(&tiles, &params(2)),
            Err(LayoutError::CanvasTooLarge)
        );
    }

    #[test]
    fn check_layout_returns_strip_size() {
        let params = LayoutParams {
            panel_size: (100, 60),
            border: 10,
            caption_band: 30,
            panels_per_row: 3,
            ..LayoutParams::default()
        };
        assert_eq!(check_layout(&params, 7), Ok((360, 330)));
    }

    #[test]
    fn check_layout_rejects_overflowing_tile() {
        let params = LayoutParams {
            panel_size: (10, 10),
            border: u32::MAX / 2,
            ..LayoutParams::default()
        };
        assert_eq!(check_layout(&params, 1), Err(LayoutError::CanvasTooLarge));
    }

    #[test]
    fn check_layout_rejects_empty_and_zero_per_row() {
        assert_eq!(
            check_layout(&LayoutParams::default(), 0),
            Err(LayoutError::EmptyPanelSequence)
        );
        assert_eq!(
            check_layout(&params(0), 1),
            Err(LayoutError::ZeroPanelsPerRow)
        );
    }

    #[test]
    fn mismatched_tile_is_rejected() {
        let mut tiles = colored_tiles(3, (10, 12));
        tiles[2] = solid_image(10, 13, WHITE);
        assert_eq!(
            assemble_strip(&tiles, &params(3)),
            Err(LayoutError::TileSizeMismatch {
                index: 2,
                expected: (10, 12),
                actual: (10, 13),
            })
        );
    }

    // =========================================================================
    // Layout
    // =========================================================================

    #[test]
    fn seven_tiles_three_per_row() {
        let tile = (10, 15);
        let tiles = colored_tiles(7, tile);
        let strip = assemble_strip(&tiles, &params(3)).unwrap();

        assert_eq!(strip.dimensions(), (30, 45));
        for i in 0..7 {
            let (x, y) = cell_origin(i, 3, tile);
            assert_region_color(&strip, (x, y, tile.0, tile.1), index_color(i));
        }
        // Cells 8 and 9 are background
        assert_region_color(&strip, (10, 30, 20, 15), WHITE);
    }

    #[test]
    fn order_is_row_major_for_any_count() {
        let tile = (6, 4);
        for n in 1..=10 {
            for per_row in 1..=4 {
                let tiles = colored_tiles(n, tile);
                let strip = assemble_strip(&tiles, &params(per_row)).unwrap();
                for i in 0..n {
                    let row = (i / per_row as usize) as u32;
                    let col = (i % per_row as usize) as u32;
                    assert_region_color(
                        &strip,
                        (col * tile.0, row * tile.1, tile.0, tile.1),
                        index_color(i),
                    );
                }
            }
        }
    }

    #[test]
    fn single_tile_keeps_full_row_width() {
        let tiles = colored_tiles(1, (8, 8));
        let strip = assemble_strip(&tiles, &params(3)).unwrap();
        assert_eq!(strip.dimensions(), (24, 8));
        assert_region_color(&strip, (8, 0, 16, 8), WHITE);
    }

    #[test]
    fn empty_cells_use_background_color() {
        let background = image::Rgba([1, 2, 3, 255]);
        let tiles = colored_tiles(2, (5, 5));
        let strip = assemble_strip(
            &tiles,
            &LayoutParams {
                background,
                ..params(3)
            },
        )
        .unwrap();
        assert_region_color(&strip, (10, 0, 5, 5), background);
    }

    #[test]
    fn strip_is_fully_opaque() {
        let tiles = colored_tiles(4, (5, 5));
        let strip = assemble_strip(&tiles, &params(3)).unwrap();
        assert!(strip.pixels().all(|p| p.0[3] == 255));
    }
}
