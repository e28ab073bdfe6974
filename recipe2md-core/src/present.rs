//! Plain-text terminal rendering of recipe documents.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width used when the terminal size cannot be read (e.g. output is piped).
const FALLBACK_WIDTH: usize = 80;

const BULLET: &str = "• ";
const QUOTE_BAR: &str = "│ ";

/// Current terminal width, capped at `max`.
pub fn console_width(max: usize) -> usize {
    let columns = crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(FALLBACK_WIDTH);
    columns.min(max).max(1)
}

/// Render a markdown recipe document as wrapped plain text no wider than `width`.
///
/// Front matter is shown as-is above a rule; list items get bullets, block
/// quotes a bar, and thematic breaks a full-width line.
#[must_use]
pub fn render(document: &str, width: usize) -> String {
    if document.trim().is_empty() {
        return String::new();
    }

    let options = Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
    let mut renderer = TerminalRenderer::new(width.max(1));
    for event in Parser::new_ext(document, options) {
        renderer.push_event(event);
    }
    renderer.finish()
}

struct TerminalRenderer {
    width: usize,
    lines: Vec<String>,
    /// Inline text of the block being built
    inline: String,
    in_metadata: bool,
    quote_depth: usize,
    list_depth: usize,
    /// Bullet waiting to be printed on the next flushed line
    item_marker: Option<&'static str>,
}

impl TerminalRenderer {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            inline: String::new(),
            in_metadata: false,
            quote_depth: 0,
            list_depth: 0,
            item_marker: None,
        }
    }

    fn push_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => self.in_metadata = true,
            Event::End(TagEnd::MetadataBlock(_)) => {
                self.in_metadata = false;
                self.rule();
            }
            Event::Text(text) if self.in_metadata => {
                for line in text.lines() {
                    let line = line.replace('\t', "  ");
                    let body = line.trim_start();
                    let indent = &line[..line.len() - body.len()];
                    let hanging = format!("{indent}    ");
                    self.lines.extend(wrap(body, self.width, indent, &hanging));
                }
            }
            Event::Start(Tag::Item) => {
                self.flush();
                self.item_marker = Some(BULLET);
            }
            Event::End(TagEnd::Item) => self.flush(),
            Event::Start(Tag::List(_)) => {
                self.flush();
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    self.blank();
                }
            }
            Event::Start(Tag::BlockQuote(_)) => {
                self.flush();
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.blank();
                }
            }
            Event::End(TagEnd::Paragraph) => {
                self.flush();
                if self.list_depth == 0 && self.quote_depth == 0 {
                    self.blank();
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush();
                self.blank();
            }
            Event::Rule => {
                self.flush();
                self.rule();
            }
            Event::Text(text) | Event::Code(text) => self.inline.push_str(&text),
            Event::SoftBreak => self.inline.push(' '),
            Event::HardBreak => self.flush(),
            _ => {}
        }
    }

    /// Wrap and emit the pending inline text.
    fn flush(&mut self) {
        let text = std::mem::take(&mut self.inline);
        if text.trim().is_empty() {
            return;
        }

        let quote = QUOTE_BAR.repeat(self.quote_depth);
        let nesting = "  ".repeat(self.list_depth.saturating_sub(1));
        let (first, rest) = match self.item_marker.take() {
            Some(marker) => (
                format!("{quote}{nesting}{marker}"),
                format!("{quote}{nesting}{}", " ".repeat(marker.width())),
            ),
            None => (quote.clone(), quote),
        };
        self.lines.extend(wrap(&text, self.width, &first, &rest));
    }

    fn rule(&mut self) {
        self.lines.push("─".repeat(self.width));
        self.blank();
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

/// Greedy word wrap by display width.
///
/// `first` prefixes the first line and `rest` every following one. Words wider
/// than the space left are split across lines.
fn wrap(text: &str, width: usize, first: &str, rest: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = first.to_string();
    let mut prefix_width = first.width();
    let mut line_has_word = false;

    for word in text.split_whitespace() {
        let space = usize::from(line_has_word);
        if line_has_word && line.width() + space + word.width() > width {
            lines.push(std::mem::replace(&mut line, rest.to_string()));
            prefix_width = rest.width();
            line_has_word = false;
        }

        // Leave at least one column for text even under deep prefixes.
        let available = width.saturating_sub(prefix_width).max(1);
        if word.width() <= available {
            if line_has_word {
                line.push(' ');
            }
            line.push_str(word);
            line_has_word = true;
            continue;
        }

        // Word longer than a whole line: hard-split it by character.
        if line_has_word {
            lines.push(std::mem::replace(&mut line, rest.to_string()));
            prefix_width = rest.width();
        }
        let available = width.saturating_sub(prefix_width).max(1);
        let mut used = 0;
        for c in word.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > available && used > 0 {
                lines.push(std::mem::replace(&mut line, rest.to_string()));
                prefix_width = rest.width();
                used = 0;
            }
            line.push(c);
            used += w;
        }
        line_has_word = true;
    }

    if line_has_word {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "---\ntitle: Pancakes\ncategory: Breakfast\nnutrition:\n\t- Calories 240 kcal\n---\n\n* 1 cup flour\n* 2 eggs\n\n> Whisk the flour and eggs together until there are no lumps left in the batter.\n\n---\n\n> Cook.";

    #[test]
    fn test_render_sections() {
        let out = render(DOC, 40);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "title: Pancakes");
        assert_eq!(lines[1], "category: Breakfast");
        assert_eq!(lines[3], "  - Calories 240 kcal");
        assert_eq!(lines[4], "─".repeat(40));
        assert!(lines.contains(&"• 1 cup flour"));
        assert!(lines.contains(&"• 2 eggs"));
        assert!(lines.iter().any(|l| l.starts_with("│ Whisk the flour")));
        assert_eq!(*lines.last().unwrap(), "│ Cook.");
    }

    #[test]
    fn test_lines_fit_width() {
        for width in [12, 25, 40, 80] {
            let out = render(DOC, width);
            for line in out.lines() {
                assert!(
                    line.width() <= width,
                    "line wider than {}: {:?}",
                    width,
                    line
                );
            }
        }
    }

    #[test]
    fn test_empty_document_renders_nothing() {
        assert_eq!(render("", 80), "");
        assert_eq!(render("  \n", 80), "");
    }

    #[test]
    fn test_wrap_hanging_indent_and_long_words() {
        let lines = wrap("aaa bbb ccc", 9, "• ", "  ");
        assert_eq!(lines, vec!["• aaa bbb", "  ccc"]);

        let lines = wrap("abcdefghij", 6, "│ ", "│ ");
        assert_eq!(lines, vec!["│ abcd", "│ efgh", "│ ij"]);
    }

    #[test]
    fn test_console_width_is_capped() {
        assert!(console_width(80) <= 80);
        assert!(console_width(20) <= 20);
    }
}
