//! Pre-rendered panel images from a directory.
//!
//! Files follow the `NNN-name.ext` convention: the numeric prefix gives the
//! display order, the rest is free text.
//!
//! ```text
//! panels/
//! ├── 001-entrance.png
//! ├── 002-chamber.png
//! ├── 010-escape.jpg      # Non-contiguous numbering OK
//! └── notes.txt           # Not an image: ignored
//! ```
//!
//! Images without a number prefix are skipped, since they have no position
//! in the strip.

use super::backend::RenderError;
use image::RgbaImage;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Leading number of a file stem: `"010-escape"` → 10, `"003"` → 3.
fn order_number(stem: &str) -> Option<u32> {
    let prefix = stem.split_once('-').map_or(stem, |(p, _)| p);
    prefix.parse().ok()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Numbered image files in `dir`, in display order.
pub fn panel_image_paths(dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    let mut numbered = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_image(&path) {
            continue;
        }
        let number = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(order_number);
        match number {
            Some(n) => numbered.push((n, path)),
            None => tracing::debug!(path = %path.display(), "skipping unnumbered panel image"),
        }
    }
    numbered.sort();
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// Decode every numbered panel image in `dir`, in display order.
pub fn load_panel_images(dir: &Path) -> Result<Vec<RgbaImage>, RenderError> {
    panel_image_paths(dir)?
        .iter()
        .map(|path| {
            image::open(path)
                .map(|img| img.to_rgba8())
                .map_err(|e| RenderError::Decode(format!("{}: {}", path.display(), e)))
        })
        .collect()
}
