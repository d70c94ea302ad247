//! CLI output formatting.
//!
//! # Panel-First Display
//!
//! Every panel is shown by its positional index, with descriptions and
//! captions as indented context. The same index appears in the script
//! listing, in render progress and in the panel-directory listing, so a
//! caption can be traced to its image at a glance.
//!
//! # Output Format
//!
//! ## Script
//!
//! ```text
//! Style
//!     A jungle.
//! Panels (1)
//! 001 Max enters a temple.
//!     Caption: He steps inside.
//! ```
//!
//! ## Generate
//!
//! With `-v` the script text is echoed after the run, as returned by the writer:
//!
//! ```text
//! Script text
//!     Description: A jungle.
//!     Panels:
//!     ...
//! ```
//!
//! ```text
//! Script: 4 panels
//!     001/004 Max enters a temple.
//!     002/004 The door slams shut behind him.
//! Composed 4 tiles
//! Strip: 3192x2368
//! ```
//!
//! ## Compose
//!
//! ```text
//! Panel images
//! 001 001-entrance.png
//! 002 002-chamber.png
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::pipeline::PipelineEvent;
use crate::types::ComicScript;
use std::path::{Path, PathBuf};

/// Longest description shown on a progress line.
const PROGRESS_DESC_CHARS: usize = 60;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Script
// ============================================================================

/// Format a parsed script as display lines.
pub fn format_script(script: &ComicScript) -> Vec<String> {
    let mut lines = vec!["Style".to_string()];
    if script.description.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    } else {
        lines.push(format!("{}{}", indent(1), script.description));
    }

    lines.push(format!("Panels ({})", script.panels.len()));
    for (i, panel) in script.panels.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), panel.description));
        if !panel.caption.is_empty() {
            lines.push(format!("{}Caption: {}", indent(1), panel.caption));
        }
    }
    lines
}

pub fn print_script(script: &ComicScript) {
    for line in format_script(script) {
        println!("{}", line);
    }
}

/// Format script text exactly as the writer returned it, indented under a
/// header. Blank lines are kept.
pub fn format_script_text(text: &str) -> Vec<String> {
    let mut lines = vec!["Script text".to_string()];
    lines.extend(text.lines().map(|line| {
        if line.trim().is_empty() {
            String::new()
        } else {
            format!("{}{}", indent(1), line)
        }
    }));
    lines
}

pub fn print_script_text(text: &str) {
    for line in format_script_text(text) {
        println!("{}", line);
    }
}

// ============================================================================
// Pipeline progress
// ============================================================================

/// Format a single pipeline progress event as display lines.
pub fn format_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::ScriptParsed { panel_count, .. } => {
            let noun = if *panel_count == 1 { "panel" } else { "panels" };
            vec![format!("Script: {} {}", panel_count, noun)]
        }
        PipelineEvent::PanelRendered {
            index,
            total,
            description,
        } => vec![format!(
            "{}{}/{} {}",
            indent(1),
            format_index(*index),
            format_index(*total),
            truncate_desc(description, PROGRESS_DESC_CHARS)
        )],
        PipelineEvent::TilesComposed { count } => vec![format!("Composed {} tiles", count)],
        PipelineEvent::StripAssembled { width, height } => {
            vec![format!("Strip: {}x{}", width, height)]
        }
    }
}

// ============================================================================
// Panel directory
// ============================================================================

/// Format the ordered panel images found for `compose`.
pub fn format_panel_sources(paths: &[PathBuf]) -> Vec<String> {
    let mut lines = vec!["Panel images".to_string()];
    for (i, path) in paths.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), file_name(path)));
    }
    lines
}

pub fn print_panel_sources(paths: &[PathBuf]) {
    for line in format_panel_sources(paths) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
