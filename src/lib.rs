//! # comicstrip
//!
//! Turns a short story into a single captioned comic strip image.
//!
//! # Architecture: Script, Render, Compose
//!
//! ```text
//! 1. Script    story        →  ComicScript       (text service + line parser)
//! 2. Render    ComicScript  →  RenderedPanel[]   (image service, one call per panel)
//! 3. Compose   panels       →  strip image       (captioned tiles in a grid)
//! ```
//!
//! Stages 1 and 2 talk to external AI services through the
//! [`render::ScriptWriter`] and [`render::PanelRenderer`] traits. Stage 3 is
//! the core of the crate: it is deterministic, runs offline, and measures
//! text through the [`compose::TextBackend`] trait, so the whole layout can
//! be tested with a fixed-width fake font.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`script`] | Line-prefix script parser (`Description:`, `Panel Description N:`, `Caption N:`) |
//! | [`compose`] | Caption wrapping, tile composition, strip assembly, font loading |
//! | [`render`] | Renderer/writer traits, the OpenAI client, panel images from a directory |
//! | [`cache`] | Content-addressed on-disk cache of rendered panels |
//! | [`pipeline`] | End-to-end orchestration with progress events |
//! | [`config`] | `comic.toml` loading, validation and merging |
//! | [`types`] | Shared types passed between stages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fixed Tile Geometry
//!
//! Every tile is `(panel_w + 2·border) × (panel_h + 2·border + caption_band)`
//! regardless of its caption, so the grid is a plain multiplication. Rendered
//! images of any size are resized to the panel size first. A caption taller
//! than the band overflows it rather than growing the tile.
//!
//! ## Parallel Composition
//!
//! Tiles are independent and built with rayon. The strip canvas is then split
//! into one disjoint band per grid row and each band is filled in parallel;
//! no locks are involved.

pub mod cache;
pub mod compose;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod script;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
