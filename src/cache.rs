//! Render cache for repeated runs.
//!
//! Image generation is the bottleneck of the pipeline: every panel is a slow,
//! billed network round trip. This module lets `generate` skip the request
//! when the same panel has been rendered before.
//!
//! # Design
//!
//! [`CachedRenderer`] wraps any [`PanelRenderer`] and stores each rendered
//! panel as a PNG under the cache directory. Only rendering is cached;
//! script writing and composition always run, so caption and layout changes
//! are picked up immediately.
//!
//! ## Cache keys
//!
//! The cache is **content-addressed**: the file name is the SHA-256 of the
//! renderer identity (model and output size), the style description and the
//! panel description. Reordering panels or renaming the output does not
//! invalidate anything; editing a description or switching models does.
//!
//! A cached file that no longer decodes is treated as a miss and rewritten.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `generate` to force every panel to be rendered. Fresh
//! renders are still written, so the next run can hit them.

use crate::render::{PanelRenderer, RenderError};
use image::RgbaImage;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

/// Bump to invalidate every existing cache entry when the key computation
/// changes.
const KEY_VERSION: u32 = 1;

/// SHA-256 of one render request, returned as a hex string.
pub fn hash_panel_request(identity: &str, style: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"panel\0");
    hasher.update(KEY_VERSION.to_le_bytes());
    for part in [identity, style, description] {
        // Length prefix keeps ("ab", "c") distinct from ("a", "bc").
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Summary of cache performance for a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} rendered ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} rendered", self.misses)
        }
    }
}

/// A [`PanelRenderer`] that consults an on-disk cache first.
pub struct CachedRenderer<R> {
    inner: R,
    dir: PathBuf,
    read: bool,
    hits: AtomicU32,
    misses: AtomicU32,
}

impl<R: PanelRenderer> CachedRenderer<R> {
    pub fn new(inner: R, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
            read: true,
            hits: AtomicU32::new(0),
            misses: AtomicU32::new(0),
        }
    }

    /// Always render, but still store results (`--no-cache`).
    pub fn write_only(inner: R, dir: impl Into<PathBuf>) -> Self {
        Self {
            read: false,
            ..Self::new(inner, dir)
        }
    }

    pub fn entry_path(&self, style: &str, description: &str) -> PathBuf {
        let key = hash_panel_request(&self.inner.identity(), style, description);
        self.dir.join(format!("{}.png", key))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn lookup(&self, path: &Path) -> Option<RgbaImage> {
        if !self.read || !path.exists() {
            return None;
        }
        match image::open(path) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable cache entry");
                None
            }
        }
    }

    fn store(&self, path: &Path, image: &RgbaImage) {
        let result = std::fs::create_dir_all(&self.dir)
            .map_err(image::ImageError::IoError)
            .and_then(|()| image.save(path));
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "failed to write cache entry");
        }
    }
}

impl<R: PanelRenderer> PanelRenderer for CachedRenderer<R> {
    fn render(&self, style: &str, description: &str) -> Result<RgbaImage, RenderError> {
        let path = self.entry_path(style, description);
        if let Some(image) = self.lookup(&path) {
            tracing::debug!(path = %path.display(), "render cache hit");
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(image);
        }

        let image = self.inner.render(style, description)?;
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.store(&path, &image);
        Ok(image)
    }

    fn identity(&self) -> String {
        self.inner.identity()
    }
}
