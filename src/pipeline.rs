//! End-to-end comic generation.
//!
//! ```text
//! story ──ScriptWriter──▶ script text ──parse──▶ ComicScript
//!                                                   │
//!                          PanelRenderer (per panel, in order)
//!                                                   ▼
//!                                        Vec<RenderedPanel>
//!                                                   │
//!                              compose tiles (parallel) → assemble strip
//!                                                   ▼
//!                                               RgbaImage
//! ```
//!
//! Rendering is sequential and fail-fast: the first [`RenderError`] aborts the
//! run and no partial strip is produced. Composition starts only after every
//! panel has an image.
//!
//! Progress is reported as [`PipelineEvent`]s over an optional channel so the
//! CLI can print while work continues; see [`crate::output`].

use crate::compose::{LayoutError, LayoutParams, TextBackend, compose_strip, save_strip};
use crate::render::{PanelRenderer, RenderError, ScriptWriter};
use crate::script::parse_script;
use crate::types::{ComicScript, RenderedPanel};
use image::RgbaImage;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("Script has no panels")]
    EmptyScript,
    #[error("Script has {script} panels but {images} images were supplied")]
    PanelCountMismatch { script: usize, images: usize },
    #[error("Failed to save strip: {0}")]
    Save(String),
}

/// Progress events emitted while a comic is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    ScriptParsed {
        description: String,
        panel_count: usize,
    },
    /// `index` is 1-based.
    PanelRendered {
        index: usize,
        total: usize,
        description: String,
    },
    TilesComposed {
        count: usize,
    },
    StripAssembled {
        width: u32,
        height: u32,
    },
}

/// Result of a full run.
#[derive(Debug)]
pub struct GeneratedComic {
    /// Script exactly as the writer returned it.
    pub script_text: String,
    pub script: ComicScript,
    pub strip: RgbaImage,
}

fn emit(events: Option<&Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is printing.
        tx.send(event).ok();
    }
}

/// Render every panel of `script`, in order.
#[tracing::instrument(skip_all, fields(panels = script.panels.len()))]
pub fn render_panels(
    script: &ComicScript,
    renderer: &impl PanelRenderer,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<Vec<RenderedPanel>, PipelineError> {
    if script.is_empty() {
        return Err(PipelineError::EmptyScript);
    }
    let total = script.panels.len();
    let mut rendered = Vec::with_capacity(total);
    for (i, panel) in script.panels.iter().enumerate() {
        let image = renderer.render(&script.description, &panel.description)?;
        tracing::debug!(index = i + 1, dimensions = ?image.dimensions(), "panel rendered");
        emit(
            events,
            PipelineEvent::PanelRendered {
                index: i + 1,
                total,
                description: panel.description.clone(),
            },
        );
        rendered.push(RenderedPanel {
            image,
            caption: panel.caption.clone(),
        });
    }
    Ok(rendered)
}

/// Pair pre-rendered images with the script's captions, in order.
pub fn pair_panels(
    script: &ComicScript,
    images: Vec<RgbaImage>,
) -> Result<Vec<RenderedPanel>, PipelineError> {
    if script.is_empty() {
        return Err(PipelineError::EmptyScript);
    }
    if images.len() != script.panels.len() {
        return Err(PipelineError::PanelCountMismatch {
            script: script.panels.len(),
            images: images.len(),
        });
    }
    Ok(images
        .into_iter()
        .zip(&script.panels)
        .map(|(image, spec)| RenderedPanel {
            image,
            caption: spec.caption.clone(),
        })
        .collect())
}

/// Lay out rendered panels into the strip.
#[tracing::instrument(skip_all, fields(panels = panels.len()))]
pub fn compose(
    panels: &[RenderedPanel],
    text: &impl TextBackend,
    params: &LayoutParams,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<RgbaImage, PipelineError> {
    let strip = compose_strip(panels, text, params)?;
    emit(
        events,
        PipelineEvent::TilesComposed {
            count: panels.len(),
        },
    );
    let (width, height) = strip.dimensions();
    emit(events, PipelineEvent::StripAssembled { width, height });
    Ok(strip)
}

/// Story in, strip out.
#[tracing::instrument(skip_all)]
pub fn generate_comic(
    story: &str,
    writer: &impl ScriptWriter,
    renderer: &impl PanelRenderer,
    text: &impl TextBackend,
    params: &LayoutParams,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<GeneratedComic, PipelineError> {
    let script_text = writer.write_script(story)?;
    let script = parse_script(&script_text);
    emit(
        events,
        PipelineEvent::ScriptParsed {
            description: script.description.clone(),
            panel_count: script.panels.len(),
        },
    );
    if script.is_empty() {
        return Err(PipelineError::EmptyScript);
    }

    let panels = render_panels(&script, renderer, events)?;
    let strip = compose(&panels, text, params, events)?;
    Ok(GeneratedComic {
        script_text,
        script,
        strip,
    })
}

/// Write the strip to `path`, creating parent directories.
pub fn save_comic(strip: &RgbaImage, path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    save_strip(strip, path).map_err(|e| PipelineError::Save(format!("{}: {}", path.display(), e)))
}
