//! Pure geometry for tiles and the strip grid.
//!
//! All functions here are pure and testable without any images or fonts.

/// Pixel size of one tile: the panel inset by `border` on every side, plus
/// the caption band below.
///
/// ```
/// # use comicstrip::compose::calculations::tile_dimensions;
/// assert_eq!(tile_dimensions((1024, 1024), 20, 80), (1064, 1144));
/// ```
pub fn tile_dimensions(panel: (u32, u32), border: u32, caption_band: u32) -> (u32, u32) {
    (
        panel.0 + 2 * border,
        panel.1 + 2 * border + caption_band,
    )
}

/// [`tile_dimensions`], or `None` when a side does not fit in `u32`.
pub fn checked_tile_dimensions(
    panel: (u32, u32),
    border: u32,
    caption_band: u32,
) -> Option<(u32, u32)> {
    let margin = border.checked_mul(2)?;
    Some((
        panel.0.checked_add(margin)?,
        panel.1.checked_add(margin)?.checked_add(caption_band)?,
    ))
}

/// Widest a caption line may measure before it wraps.
pub fn max_line_width(panel_width: u32, border: u32) -> u32 {
    panel_width.saturating_sub(2 * border)
}

/// Number of grid rows needed for `count` tiles, `per_row` to a row.
pub fn grid_rows(count: usize, per_row: u32) -> u32 {
    count.div_ceil(per_row as usize) as u32
}

/// Strip canvas size: always `per_row` columns wide, even when fewer tiles
/// exist, and as many rows as needed. `None` when a side overflows `u32`.
pub fn strip_dimensions(tile: (u32, u32), per_row: u32, count: usize) -> Option<(u32, u32)> {
    let rows = u32::try_from(count.div_ceil(per_row as usize)).ok()?;
    Some((tile.0.checked_mul(per_row)?, tile.1.checked_mul(rows)?))
}

/// Grid cell `(row, column)` of the tile at `index`, row-major.
pub fn grid_cell(index: usize, per_row: u32) -> (u32, u32) {
    let per_row = per_row as usize;
    ((index / per_row) as u32, (index % per_row) as u32)
}

/// Top-left pixel of the tile at `index`.
pub fn cell_origin(index: usize, per_row: u32, tile: (u32, u32)) -> (u32, u32) {
    let (row, col) = grid_cell(index, per_row);
    (col * tile.0, row * tile.1)
}

/// Left edge that centres `content` inside `container`.
///
/// Rounds toward negative infinity, so content wider than the container
/// starts left of zero and overflows evenly on both sides.
pub fn centered_x(container: u32, content: u32) -> i32 {
    (container as i64 - content as i64).div_euclid(2) as i32
}

/// Top edge of caption line `index`: lines start right below the panel image
/// and step by one line height.
pub fn caption_line_y(panel_height: u32, border: u32, index: usize, line_height: u32) -> i32 {
    (panel_height + border) as i32 + (index as u32 * line_height) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Tile geometry
    // =========================================================================

    #[test]
    fn tile_dimensions_default_layout() {
        assert_eq!(tile_dimensions((1024, 1024), 20, 80), (1064, 1144));
    }

    #[test]
    fn tile_dimensions_without_border_or_band() {
        assert_eq!(tile_dimensions((300, 200), 0, 0), (300, 200));
    }

    #[test]
    fn tile_dimensions_non_square_panel() {
        assert_eq!(tile_dimensions((400, 300), 10, 50), (420, 370));
    }

    #[test]
    fn checked_tile_dimensions_matches_plain() {
        assert_eq!(
            checked_tile_dimensions((1024, 1024), 20, 80),
            Some(tile_dimensions((1024, 1024), 20, 80))
        );
    }

    #[test]
    fn checked_tile_dimensions_overflow() {
        assert_eq!(checked_tile_dimensions((10, 10), u32::MAX / 2 + 1, 0), None);
        assert_eq!(checked_tile_dimensions((u32::MAX, 10), 1, 0), None);
        assert_eq!(checked_tile_dimensions((10, u32::MAX - 2), 1, 1), None);
    }

    #[test]
    fn max_line_width_subtracts_both_borders() {
        assert_eq!(max_line_width(1024, 20), 984);
    }

    #[test]
    fn max_line_width_saturates() {
        assert_eq!(max_line_width(30, 20), 0);
    }

    // =========================================================================
    // Grid geometry
    // =========================================================================

    #[test]
    fn grid_rows_rounds_up() {
        assert_eq!(grid_rows(1, 3), 1);
        assert_eq!(grid_rows(3, 3), 1);
        assert_eq!(grid_rows(4, 3), 2);
        assert_eq!(grid_rows(7, 3), 3);
        assert_eq!(grid_rows(9, 3), 3);
    }

    #[test]
    fn strip_dimensions_seven_tiles_three_per_row() {
        assert_eq!(strip_dimensions((100, 150), 3, 7), Some((300, 450)));
    }

    #[test]
    fn strip_dimensions_keep_full_row_width_for_single_tile() {
        assert_eq!(strip_dimensions((100, 150), 3, 1), Some((300, 150)));
    }

    #[test]
    fn strip_dimensions_overflow_is_none() {
        assert_eq!(strip_dimensions((2, 1), 1 << 31, 1), None);
        assert_eq!(strip_dimensions((1, u32::MAX), 1, 2), None);
    }

    #[test]
    fn grid_cell_is_row_major() {
        let cells: Vec<_> = (0..7).map(|i| grid_cell(i, 3)).collect();
        assert_eq!(
            cells,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0)]
        );
    }

    #[test]
    fn cell_origin_scales_by_tile_size() {
        assert_eq!(cell_origin(0, 3, (100, 150)), (0, 0));
        assert_eq!(cell_origin(2, 3, (100, 150)), (200, 0));
        assert_eq!(cell_origin(4, 3, (100, 150)), (100, 150));
        assert_eq!(cell_origin(6, 3, (100, 150)), (0, 300));
    }

    #[test]
    fn single_column_grid() {
        assert_eq!(cell_origin(3, 1, (10, 20)), (0, 60));
        assert_eq!(strip_dimensions((10, 20), 1, 4), Some((10, 80)));
    }

    // =========================================================================
    // Caption placement
    // =========================================================================

    #[test]
    fn centered_x_even_and_odd_slack() {
        assert_eq!(centered_x(100, 40), 30);
        assert_eq!(centered_x(100, 41), 29);
    }

    #[test]
    fn centered_x_overflowing_content_goes_negative() {
        assert_eq!(centered_x(100, 120), -10);
        assert_eq!(centered_x(100, 121), -11);
    }

    #[test]
    fn caption_lines_start_below_image() {
        assert_eq!(caption_line_y(1024, 20, 0, 38), 1044);
        assert_eq!(caption_line_y(1024, 20, 1, 38), 1082);
        assert_eq!(caption_line_y(1024, 20, 2, 38), 1120);
    }
}
