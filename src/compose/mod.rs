//! Panel layout and caption rendering.
//!
//! | Step | Module | Function |
//! |---|---|---|
//! | **Wrap caption** | [`caption`] | [`wrap_caption`] |
//! | **Compose tile** | [`tile`] | [`compose_tile`] |
//! | **Assemble strip** | [`strip`] | [`assemble_strip`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for tile and grid geometry (unit testable)
//! - **Parameters**: [`LayoutParams`] and colour parsing
//! - **Text**: [`TextBackend`] trait + [`GlyphBackend`]
//! - **Operations**: High-level functions combining the steps above

pub mod calculations;
pub mod caption;
pub mod glyph;
pub mod operations;
pub mod params;
pub mod strip;
pub mod text;
pub mod tile;

pub use caption::{WrappedCaption, wrap_caption};
pub use glyph::{FontError, GlyphBackend};
pub use operations::{build_tile, build_tiles, compose_strip, save_strip};
pub use params::{LayoutParams, parse_hex_color};
pub use strip::{LayoutError, MAX_CANVAS_SIDE, assemble_strip, check_layout};
pub use text::{TextBackend, TextExtent};
pub use tile::compose_tile;
