//! Sources of panel images and scripts.
//!
//! - [`backend`]: the [`PanelRenderer`] and [`ScriptWriter`] traits
//! - [`openai`]: [`OpenAiClient`], the network implementation of both
//! - [`directory`]: pre-rendered panels loaded from disk

pub mod backend;
pub mod directory;
pub mod openai;

pub use backend::{PanelRenderer, RenderError, ScriptWriter};
pub use directory::{load_panel_images, panel_image_paths};
pub use openai::OpenAiClient;
