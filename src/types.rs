//! Shared types passed between pipeline stages.
//!
//! A [`ComicScript`] comes out of the parser, each [`PanelSpec`] goes to a
//! renderer, and the renderer's output comes back as a [`RenderedPanel`]
//! ready for composition.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// One scene of the strip as written by the script: what to draw and what to
/// print underneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Scene description sent to the image renderer.
    pub description: String,
    /// Caption drawn in the band below the panel. May be empty.
    pub caption: String,
}

/// A parsed comic script.
///
/// `description` is the style description shared by every panel (art style,
/// setting, character appearance). Panel order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicScript {
    pub description: String,
    pub panels: Vec<PanelSpec>,
}

impl ComicScript {
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

/// A panel image paired with its caption, as returned by a renderer.
///
/// The image is never modified in place; composition produces a new tile.
#[derive(Debug, Clone)]
pub struct RenderedPanel {
    pub image: RgbaImage,
    pub caption: String,
}
