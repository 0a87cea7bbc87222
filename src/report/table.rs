//! GitHub-flavoured Markdown tables

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Column alignment marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// `---`
    #[default]
    None,
    /// `:---`
    Left,
    /// `:---:`
    Center,
    /// `---:`
    Right,
}

impl Alignment {
    fn marker(&self) -> &'static str {
        match self {
            Alignment::None => "---",
            Alignment::Left => ":---",
            Alignment::Center => ":---:",
            Alignment::Right => "---:",
        }
    }
}

/// Table builder
///
/// ```
/// use kbgraph::report::{Alignment, MarkdownTable};
///
/// let table = MarkdownTable::new()
///     .column("Page", Alignment::None)
///     .column("Links", Alignment::Right)
///     .row(["[[Home]]", "3"])
///     .render();
/// assert_eq!(table, "| Page | Links |\n| --- | ---: |\n| [[Home]] | 3 |\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownTable {
    headers: Vec<String>,
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, header: impl Into<String>, alignment: Alignment) -> Self {
        self.headers.push(header.into());
        self.alignments.push(alignment);
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells);
        self
    }

    /// Add a row; missing cells are left empty, extra cells dropped
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let line = |cells: &[String]| {
            let escaped: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
            format!("| {} |\n", escaped.join(" | "))
        };

        out.push_str(&line(&self.headers));
        let markers: Vec<&str> = self.alignments.iter().map(|a| a.marker()).collect();
        out.push_str(&format!("| {} |\n", markers.join(" | ")));
        for row in &self.rows {
            out.push_str(&line(row));
        }
        out
    }
}

/// Escape pipes and flatten newlines so a value stays in its cell
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// A table read back from Markdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Cell of a row under the given header
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let column = self.headers.iter().position(|h| h == header)?;
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

/// First table of a Markdown document
pub fn parse_table(markdown: &str) -> Option<ParsedTable> {
    parse_tables(markdown).into_iter().next()
}

/// Parse every table in a Markdown document, in order
///
/// Cell text is the concatenated inline text, so `[[Page]]` and `\|` come
/// back as written before rendering.
pub fn parse_tables(markdown: &str) -> Vec<ParsedTable> {
    let mut tables = Vec::new();
    let mut current: Option<ParsedTable> = None;
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_head = false;

    for event in Parser::new_ext(markdown, Options::ENABLE_TABLES) {
        match event {
            Event::Start(Tag::Table(_)) => current = Some(ParsedTable::default()),
            Event::End(TagEnd::Table) => {
                if let Some(table) = current.take() {
                    tables.push(table);
                }
            }
            Event::Start(Tag::TableHead) => {
                in_head = true;
                row.clear();
            }
            Event::End(TagEnd::TableHead) => {
                in_head = false;
                if let Some(table) = current.as_mut() {
                    table.headers = std::mem::take(&mut row);
                }
            }
            Event::Start(Tag::TableRow) => row.clear(),
            Event::End(TagEnd::TableRow) => {
                if let Some(table) = current.as_mut() {
                    if !in_head {
                        table.rows.push(std::mem::take(&mut row));
                    }
                }
            }
            Event::Start(Tag::TableCell) => cell.clear(),
            Event::End(TagEnd::TableCell) => row.push(cell.trim().to_string()),
            Event::Text(text) | Event::Code(text) if current.is_some() => cell.push_str(&text),
            _ => {}
        }
    }

    tables
}
