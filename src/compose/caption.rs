//! Caption word wrapping.
//!
//! Greedy wrap on measured pixel widths: words are added to the current line
//! until the next one would push it past the limit. A word that is wider than
//! the limit on its own still gets a line to itself and overflows; words are
//! never split.
//!
//! The vertical step between lines is measured once, from the whole caption
//! as a representative line, and reused for every line. With a font whose
//! glyph heights vary a lot this gives slightly uneven visual spacing.

use super::text::TextBackend;

/// A caption broken into lines that fit the panel width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrappedCaption {
    pub lines: Vec<String>,
    pub line_height: u32,
}

impl WrappedCaption {
    /// Height of the whole text block.
    pub fn block_height(&self) -> u32 {
        self.lines.len() as u32 * self.line_height
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Wrap `caption` into lines no wider than `max_width` pixels.
pub fn wrap_caption(caption: &str, text: &impl TextBackend, max_width: u32) -> WrappedCaption {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in caption.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if text.measure(&candidate).width > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let line_height = if lines.is_empty() {
        0
    } else {
        text.measure(caption.trim()).height
    };

    WrappedCaption { lines, line_height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::text::tests::FixedWidthText;

    // 10px per char, 20px lines
    fn text() -> FixedWidthText {
        FixedWidthText::new(10, 20)
    }

    #[test]
    fn empty_caption_has_no_lines() {
        let wrapped = wrap_caption("", &text(), 100);
        assert!(wrapped.is_empty());
        assert_eq!(wrapped.block_height(), 0);
    }

    #[test]
    fn whitespace_only_caption_has_no_lines() {
        let wrapped = wrap_caption("   \t  ", &text(), 100);
        assert!(wrapped.is_empty());
    }

    #[test]
    fn short_caption_stays_on_one_line() {
        let wrapped = wrap_caption("He steps inside.", &text(), 984);
        assert_eq!(wrapped.lines, vec!["He steps inside."]);
        assert_eq!(wrapped.line_height, 20);
        assert_eq!(wrapped.block_height(), 20);
    }

    #[test]
    fn exact_fit_does_not_wrap() {
        // "aaaa bbbb" is 9 chars = 90px
        let wrapped = wrap_caption("aaaa bbbb", &text(), 90);
        assert_eq!(wrapped.lines, vec!["aaaa bbbb"]);
    }

    #[test]
    fn one_pixel_over_wraps() {
        let wrapped = wrap_caption("aaaa bbbb", &text(), 89);
        assert_eq!(wrapped.lines, vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn wide_caption_wraps_and_every_line_fits() {
        let caption = "Max races out just as the temple collapses behind him with the artifact";
        let max = 200;
        let backend = text();
        let wrapped = wrap_caption(caption, &backend, max);

        assert!(wrapped.lines.len() >= 2);
        for line in &wrapped.lines {
            assert!(
                backend.measure(line).width <= max,
                "line {line:?} exceeds {max}px"
            );
        }
        assert_eq!(wrapped.lines.join(" "), caption);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        let wrapped = wrap_caption("  one   two\tthree  ", &text(), 1000);
        assert_eq!(wrapped.lines, vec!["one two three"]);
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let wrapped = wrap_caption("a Supercalifragilistic b", &text(), 50);
        assert_eq!(wrapped.lines, vec!["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn oversized_first_word_does_not_leave_empty_line() {
        let wrapped = wrap_caption("Supercalifragilistic", &text(), 50);
        assert_eq!(wrapped.lines, vec!["Supercalifragilistic"]);
    }

    #[test]
    fn line_height_is_shared_by_all_lines() {
        let wrapped = wrap_caption("aa bb cc dd", &text(), 20);
        assert_eq!(wrapped.lines.len(), 4);
        assert_eq!(wrapped.line_height, 20);
        assert_eq!(wrapped.block_height(), 80);
    }
}
