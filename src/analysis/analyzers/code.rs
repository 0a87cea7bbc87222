//! Byte ranges of inline code and code blocks, where markup is literal

use pulldown_cmark::{Event, Options, Parser, Tag};
use std::ops::Range;

/// Code spans and code blocks in `content`
pub(crate) fn code_ranges(content: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    for (event, range) in Parser::new_ext(content, Options::all()).into_offset_iter() {
        match event {
            Event::Code(_) | Event::Start(Tag::CodeBlock(_)) => ranges.push(range),
            _ => {}
        }
    }
    ranges
}

pub(crate) fn in_code(ranges: &[Range<usize>], offset: usize) -> bool {
    ranges.iter().any(|r| r.contains(&offset))
}
