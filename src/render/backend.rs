//! Collaborator traits for the AI services.
//!
//! [`ScriptWriter`] turns a story into script text; [`PanelRenderer`] turns a
//! style description plus a panel description into an image. Both are passed
//! in explicitly so the pipeline runs without network access in tests.
//!
//! The production implementation of both is
//! [`OpenAiClient`](super::openai::OpenAiClient).

use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Invalid service response: {0}")]
    InvalidResponse(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("API key not set; export {0}")]
    MissingApiKey(String),
}

impl From<reqwest::Error> for RenderError {
    fn from(e: reqwest::Error) -> Self {
        RenderError::Http(e.to_string())
    }
}

/// Produces one panel image per request.
pub trait PanelRenderer: Sync {
    /// Render `description` in the shared `style`.
    fn render(&self, style: &str, description: &str) -> Result<RgbaImage, RenderError>;

    /// Stable identity of the renderer's output space (model, size). Two
    /// renderers with the same identity produce interchangeable images for
    /// the same request; the render cache keys on it.
    fn identity(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<R: PanelRenderer + ?Sized> PanelRenderer for &R {
    fn render(&self, style: &str, description: &str) -> Result<RgbaImage, RenderError> {
        (**self).render(style, description)
    }

    fn identity(&self) -> String {
        (**self).identity()
    }
}

/// Breaks a story into script text.
pub trait ScriptWriter {
    fn write_script(&self, story: &str) -> Result<String, RenderError>;
}
