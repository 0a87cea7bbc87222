//! Fixed-precision number and name formatting

use crate::analysis::analyzers::TAG_TERMINATORS;

/// Format with exactly `precision` decimals; negative zero prints as zero
pub fn format_decimal(value: f64, precision: usize) -> String {
    let value = if value == 0.0 || !value.is_finite() { 0.0 } else { value };
    format!("{:.*}", precision, value)
}

pub fn format_percent(value: f64, precision: usize) -> String {
    format!("{}%", format_decimal(value, precision))
}

/// `[[Name]]`
pub fn page_link(name: &str) -> String {
    format!("[[{}]]", name)
}

/// `#tag`, or `#[[multi word]]` when the tag would not survive as a bare hashtag
///
/// A bare tag ends at whitespace or a terminator, and loses a trailing `.`
/// or `:`, so either forces the bracketed form.
pub fn hashtag(tag: &str) -> String {
    let bare = !tag.is_empty()
        && !tag.starts_with('#')
        && !tag.ends_with(&['.', ':'][..])
        && !tag
            .chars()
            .any(|c| c.is_whitespace() || TAG_TERMINATORS.contains(&c));
    if !bare {
        format!("#[[{}]]", tag)
    } else {
        format!("#{}", tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1.0 / 3.0, 1), "0.3");
        assert_eq!(format_decimal(2.0 / 3.0, 2), "0.67");
        assert_eq!(format_decimal(10.0, 0), "10");
        assert_eq!(format_decimal(-0.0, 1), "0.0");
        assert_eq!(format_decimal(f64::NAN, 1), "0.0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(37.5, 1), "37.5%");
        assert_eq!(format_percent(100.0, 2), "100.00%");
    }

    #[test]
    fn test_hashtag() {
        assert_eq!(hashtag("rust"), "#rust");
        assert_eq!(hashtag("project/alpha"), "#project/alpha");
        assert_eq!(hashtag("reading list"), "#[[reading list]]");
        assert_eq!(hashtag("a<b"), "#[[a<b]]");
        assert_eq!(hashtag("v1."), "#[[v1.]]");
        assert_eq!(hashtag("todo:"), "#[[todo:]]");
        assert_eq!(hashtag("v1.2"), "#v1.2");
    }

    #[test]
    fn test_hashtag_extracts_back_to_the_same_tag() {
        use crate::analysis::analyzers::TagAnalyzer;

        for tag in ["rust", "reading list", "a<b", "x>y", "v1.", "todo:", "c++", "what?", "it's"] {
            let rendered = format!("- {} (used 2 times)", hashtag(tag));
            let extracted = TagAnalyzer::extract_hashtags(&rendered);
            assert_eq!(extracted.len(), 1, "{}", rendered);
            assert_eq!(extracted[0].0, tag, "{}", rendered);
        }
    }
}
