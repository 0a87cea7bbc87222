//! Outline parsing for Logseq-flavoured Markdown
//!
//! Splits a file into its leading page properties and a flat, ordered list
//! of blocks carrying their nesting depth.

use super::document::{Block, Properties};

/// Parsed file body
#[derive(Debug, Clone, Default)]
pub struct Outline {
    pub properties: Properties,
    pub blocks: Vec<Block>,
}

/// Parse a `key:: value` line
///
/// Keys are limited to ASCII alphanumerics, `-` and `_`, matching what the
/// editor itself writes.
pub fn parse_property_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    let sep = line.find("::")?;
    let key = &line[..sep];
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    let value = line[sep + 2..].trim();
    Some((key.to_lowercase(), value.to_string()))
}

/// Indentation width in columns; a tab counts as one nesting level
fn indent_columns(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 2 } else { 1 })
        .sum()
}

/// Content after a `- `, `* ` or `+ ` bullet, if the line is a bullet
fn bullet_content(rest: &str) -> Option<&str> {
    if rest == "-" || rest == "*" || rest == "+" {
        return Some("");
    }
    for marker in ["- ", "* ", "+ "] {
        if let Some(content) = rest.strip_prefix(marker) {
            return Some(content);
        }
    }
    None
}

/// Strip up to `columns` leading whitespace characters
fn dedent(line: &str, columns: usize) -> &str {
    let mut stripped = 0;
    for (i, c) in line.char_indices() {
        if stripped >= columns || !c.is_whitespace() {
            return &line[i..];
        }
        stripped += if c == '\t' { 2 } else { 1 };
    }
    ""
}

struct OutlineParser {
    outline: Outline,
    current: Option<Block>,
    content_column: usize,
    in_fence: bool,
    after_blank: bool,
}

impl OutlineParser {
    fn new() -> Self {
        Self {
            outline: Outline::default(),
            current: None,
            content_column: 0,
            in_fence: false,
            after_blank: false,
        }
    }

    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            self.outline.blocks.push(block);
        }
    }

    fn start_block(&mut self, depth: usize, line: usize, content_column: usize) {
        self.flush();
        let mut block = Block::new("").with_depth(depth);
        block.line = line;
        self.current = Some(block);
        self.content_column = content_column;
    }

    /// Append a line to the current block, recognizing block properties
    /// and fence openings
    fn add_line(&mut self, text: &str) {
        let Some(block) = self.current.as_mut() else {
            return;
        };
        if let Some((key, value)) = parse_property_line(text) {
            block.properties.insert(key, value);
            return;
        }
        if !block.content.is_empty() {
            block.content.push('\n');
        }
        block.content.push_str(text.trim_end());
        if text.trim_start().starts_with("```") {
            self.in_fence = true;
        }
    }

    fn push_fenced(&mut self, raw: &str) {
        let text = dedent(raw, self.content_column);
        if let Some(block) = self.current.as_mut() {
            if !block.content.is_empty() {
                block.content.push('\n');
            }
            block.content.push_str(text.trim_end());
        }
        if raw.trim_start().starts_with("```") {
            self.in_fence = false;
        }
    }

    fn line(&mut self, index: usize, raw: &str) {
        let line_no = index + 1;

        if self.in_fence {
            self.push_fenced(raw);
            return;
        }

        if raw.trim().is_empty() {
            self.after_blank = true;
            return;
        }

        let columns = indent_columns(raw);
        let rest = raw.trim_start();

        if let Some(content) = bullet_content(rest) {
            self.start_block(columns / 2, line_no, columns + 2);
            self.add_line(content);
        } else if self.current.is_none() && self.outline.blocks.is_empty() {
            // Page properties may only precede the first block
            if let Some((key, value)) = parse_property_line(rest) {
                self.outline.properties.insert(key, value);
            } else {
                self.start_block(0, line_no, columns);
                self.add_line(rest);
            }
        } else if self.after_blank && columns == 0 {
            self.start_block(0, line_no, 0);
            self.add_line(rest);
        } else {
            self.add_line(rest);
        }

        self.after_blank = false;
    }

    fn finish(mut self) -> Outline {
        self.flush();
        let mut outline = self.outline;

        let hoist = outline.properties.is_empty()
            && outline
                .blocks
                .first()
                .map(|b| b.content.is_empty() && !b.properties.is_empty())
                .unwrap_or(false);
        if hoist {
            let first = outline.blocks.remove(0);
            outline.properties = first.properties;
        }

        outline
    }
}

/// Parse a document body into page properties and blocks
pub fn parse_outline(text: &str) -> Outline {
    let mut parser = OutlineParser::new();
    for (index, raw) in text.lines().enumerate() {
        parser.line(index, raw);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_properties_and_blocks() {
        let text = "author:: Jane\ntags:: demo, features\n\n- First block\n  - Child [[Other]]\n- Second\n";
        let outline = parse_outline(text);

        assert_eq!(outline.properties.get("author").map(String::as_str), Some("Jane"));
        assert_eq!(outline.properties.get("tags").map(String::as_str), Some("demo, features"));
        assert_eq!(outline.blocks.len(), 3);
        assert_eq!(outline.blocks[0].content, "First block");
        assert_eq!(outline.blocks[0].line, 4);
        assert_eq!(outline.blocks[1].depth, 1);
        assert_eq!(outline.blocks[1].content, "Child [[Other]]");
        assert_eq!(outline.blocks[2].depth, 0);
    }

    #[test]
    fn test_block_properties_and_continuation() {
        let text = "- TODO Write docs [#A]\n  SCHEDULED: <2024-01-15 Mon>\n  owner:: bob\n";
        let outline = parse_outline(text);

        assert_eq!(outline.blocks.len(), 1);
        let block = &outline.blocks[0];
        assert_eq!(block.content, "TODO Write docs [#A]\nSCHEDULED: <2024-01-15 Mon>");
        assert_eq!(block.properties.get("owner").map(String::as_str), Some("bob"));
    }

    #[test]
    fn test_fenced_code_is_kept_verbatim() {
        let text = "- Example\n  ```\n  - not a block\n  key:: not a property\n  ```\n- After\n";
        let outline = parse_outline(text);

        assert_eq!(outline.blocks.len(), 2);
        assert!(outline.blocks[0].content.contains("- not a block"));
        assert!(outline.blocks[0].content.contains("key:: not a property"));
        assert!(outline.blocks[0].properties.is_empty());
        assert_eq!(outline.blocks[1].content, "After");
    }

    #[test]
    fn test_plain_markdown_paragraphs() {
        let text = "# Resources\n\nSome intro text\nstill intro\n\nSecond paragraph\n";
        let outline = parse_outline(text);

        assert_eq!(outline.blocks.len(), 3);
        assert_eq!(outline.blocks[0].content, "# Resources");
        assert_eq!(outline.blocks[1].content, "Some intro text\nstill intro");
        assert_eq!(outline.blocks[2].content, "Second paragraph");
    }

    #[test]
    fn test_first_property_block_is_hoisted() {
        let text = "- title:: Hoisted\n  type:: demo\n- Body\n";
        let outline = parse_outline(text);

        assert_eq!(outline.properties.get("title").map(String::as_str), Some("Hoisted"));
        assert_eq!(outline.properties.get("type").map(String::as_str), Some("demo"));
        assert_eq!(outline.blocks.len(), 1);
        assert_eq!(outline.blocks[0].content, "Body");
    }

    #[test]
    fn test_tabs_count_as_levels() {
        let outline = parse_outline("- a\n\t- b\n\t\t- c\n");
        let depths: Vec<_> = outline.blocks.iter().map(|b| b.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_property_line() {
        assert_eq!(
            parse_property_line("Created:: 2024-01-01"),
            Some(("created".to_string(), "2024-01-01".to_string()))
        );
        assert_eq!(parse_property_line("not a property"), None);
        assert_eq!(parse_property_line("a b:: c"), None);
        assert_eq!(parse_property_line(":: value"), None);
    }
}
