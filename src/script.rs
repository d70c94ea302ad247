//! Comic script parsing.
//!
//! A script is plain text in a fixed line-prefix format:
//!
//! ```text
//! Description: Watercolour jungle, Max wears a red scarf and khaki shorts.
//! Panels:
//! Panel Description 1: Max pushes through vines toward a stone doorway.
//! Caption 1: At last, the Hidden Temple.
//! Panel Description 2: Max holds a glowing artifact; the walls crack.
//! Caption 2: Time to run.
//! ```
//!
//! Parsing never fails. Unrecognised lines are skipped, a caption with no
//! open panel is dropped, and a panel with no caption gets an empty one. Text
//! with no recognised prefix at all yields an empty [`ComicScript`].
//!
//! Prefixes are matched exactly (case-sensitive) against trimmed lines. For
//! numbered prefixes the value starts after the first `:`, so panel numbers
//! of any width parse the same way.

use crate::types::{ComicScript, PanelSpec};

const DESCRIPTION_PREFIX: &str = "Description:";
const PANELS_HEADER: &str = "Panels:";
const PANEL_PREFIX: &str = "Panel Description";
const CAPTION_PREFIX: &str = "Caption";

/// Recognised kinds of script line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Description(&'a str),
    PanelsHeader,
    Panel(&'a str),
    Caption(&'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(DESCRIPTION_PREFIX) {
        Line::Description(rest.trim())
    } else if line.starts_with(PANELS_HEADER) {
        Line::PanelsHeader
    } else if let Some(rest) = line.strip_prefix(PANEL_PREFIX) {
        Line::Panel(after_label(rest))
    } else if let Some(rest) = line.strip_prefix(CAPTION_PREFIX) {
        Line::Caption(after_label(rest))
    } else {
        Line::Other
    }
}

/// Strip the ` N:` label that follows a numbered prefix.
fn after_label(rest: &str) -> &str {
    match rest.split_once(':') {
        Some((_, value)) => value.trim(),
        None => rest.trim(),
    }
}

/// Where the parser is in the script.
#[derive(Debug, PartialEq)]
enum State {
    /// Nothing recognised yet.
    AwaitingDescription,
    /// Between panels: no open panel record.
    AwaitingPanel,
    /// A panel record is open and will be flushed by the next panel line or
    /// end of input.
    InPanel(PanelSpec),
}

struct Parser {
    description: Option<String>,
    panels: Vec<PanelSpec>,
    state: State,
}

impl Parser {
    fn new() -> Self {
        Self {
            description: None,
            panels: Vec::new(),
            state: State::AwaitingDescription,
        }
    }

    fn feed(&mut self, line: Line<'_>) {
        match line {
            Line::Description(text) => {
                if self.description.is_none() {
                    self.description = Some(text.to_string());
                } else {
                    tracing::debug!(text, "ignoring repeated style description");
                }
                if self.state == State::AwaitingDescription {
                    self.state = State::AwaitingPanel;
                }
            }
            Line::PanelsHeader => {
                if self.state == State::AwaitingDescription {
                    self.state = State::AwaitingPanel;
                }
            }
            Line::Panel(text) => {
                self.flush();
                self.state = State::InPanel(PanelSpec {
                    description: text.to_string(),
                    caption: String::new(),
                });
            }
            Line::Caption(text) => match &mut self.state {
                State::InPanel(panel) => panel.caption = text.to_string(),
                _ => tracing::debug!(text, "dropping caption with no open panel"),
            },
            Line::Other => {}
        }
    }

    fn flush(&mut self) {
        if let State::InPanel(panel) = std::mem::replace(&mut self.state, State::AwaitingPanel) {
            self.panels.push(panel);
        }
    }

    fn finish(mut self) -> ComicScript {
        self.flush();
        ComicScript {
            description: self.description.unwrap_or_default(),
            panels: self.panels,
        }
    }
}

/// Parse a script into a style description and ordered panels.
pub fn parse_script(text: &str) -> ComicScript {
    let mut parser = Parser::new();
    for line in text.lines() {
        parser.feed(classify(line.trim()));
    }
    let script = parser.finish();
    if script.is_empty() {
        tracing::warn!("script contained no panels");
    }
    script
}
