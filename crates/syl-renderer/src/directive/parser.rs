//! Directive syntax parsing.
//!
//! A directive starts with `.. name:: arguments` and owns every following
//! line that is blank or indented deeper than the directive line:
//!
//! ```text
//! .. framed:: 2
//!    :class: wide
//!
//!    body text
//! ```
//!
//! Option lines (`:name: value`) must follow the directive line directly;
//! the remaining lines form the content, dedented to their common indent.

use std::collections::BTreeMap;

/// Parsed directive line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Header<'a> {
    /// Leading whitespace of the directive line.
    pub indent: &'a str,
    pub name: &'a str,
    pub arguments: Vec<String>,
}

/// Lines owned by a directive, after the directive line.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Block {
    pub options: BTreeMap<String, String>,
    pub content: Vec<String>,
    /// Offset of the first content line from the directive line.
    pub content_offset: usize,
    /// Number of lines consumed after the directive line.
    pub consumed: usize,
}

/// Parse a directive line.
///
/// Returns `None` for anything else, including reStructuredText-style
/// comments and link targets without `::`.
pub(crate) fn parse_header(line: &str) -> Option<Header<'_>> {
    let indent_len = indent_of(line);
    let indent = &line[..indent_len];
    let rest = line[indent_len..].strip_prefix("..")?;
    if !rest.starts_with(' ') {
        return None;
    }
    let rest = rest.trim_start();

    let sep = rest.find("::")?;
    let name = &rest[..sep];
    if name.is_empty() || !name.chars().all(is_name_char) {
        return None;
    }

    let after = &rest[sep + 2..];
    if !after.is_empty() && !after.starts_with(char::is_whitespace) {
        return None;
    }

    Some(Header {
        indent,
        name,
        arguments: after.split_whitespace().map(str::to_owned).collect(),
    })
}

/// Collect the block following a directive line indented by `indent` bytes.
pub(crate) fn collect_block(lines: &[&str], indent: usize) -> Block {
    let mut extent = 0;
    for (idx, line) in lines.iter().enumerate() {
        if is_blank(line) {
            continue;
        }
        if indent_of(line) <= indent {
            break;
        }
        extent = idx + 1;
    }
    let body = &lines[..extent];

    let mut options = BTreeMap::new();
    let mut start = 0;
    while let Some((name, value)) = body.get(start).and_then(|line| parse_option(line)) {
        options.insert(name.to_owned(), value.to_owned());
        start += 1;
    }

    let rest = &body[start..];
    let leading_blanks = rest.iter().take_while(|l| is_blank(l)).count();
    let rest = &rest[leading_blanks..];
    let common = rest
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);

    let content = rest
        .iter()
        .map(|l| {
            if is_blank(l) {
                String::new()
            } else {
                l[common..].trim_end().to_owned()
            }
        })
        .collect();

    Block {
        options,
        content,
        content_offset: start + leading_blanks + 1,
        consumed: extent,
    }
}

fn parse_option(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix(':')?;
    let end = rest.find(':')?;
    let name = &rest[..end];
    if name.is_empty() || !name.chars().all(is_name_char) {
        return None;
    }
    Some((name, rest[end + 1..].trim()))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header_with_arguments() {
        let header = parse_header(".. inginious:: ex1 text/x-python 3").unwrap();

        assert_eq!(header.indent, "");
        assert_eq!(header.name, "inginious");
        assert_eq!(header.arguments, vec!["ex1", "text/x-python", "3"]);
    }

    #[test]
    fn test_parse_header_indented_without_arguments() {
        let header = parse_header("  .. teacher::").unwrap();

        assert_eq!(header.indent, "  ");
        assert_eq!(header.name, "teacher");
        assert!(header.arguments.is_empty());
    }

    #[test]
    fn test_parse_header_rejects_non_directives() {
        assert!(parse_header(".. a plain comment").is_none());
        assert!(parse_header(".. _target: http://x").is_none());
        assert!(parse_header("..framed:: 1").is_none());
        assert!(parse_header(".. framed::1").is_none());
        assert!(parse_header(".. bad name:: 1").is_none());
        assert!(parse_header("text .. framed:: 1").is_none());
    }

    #[test]
    fn test_collect_block_options_and_content() {
        let lines = [
            "   :submit: Send it",
            "",
            "   def f():",
            "       return 1",
            "",
            "",
            "After",
        ];

        let block = collect_block(&lines, 0);

        assert_eq!(block.options.get("submit").map(String::as_str), Some("Send it"));
        assert_eq!(block.content, vec!["def f():", "    return 1"]);
        assert_eq!(block.content_offset, 3);
        assert_eq!(block.consumed, 4);
    }

    #[test]
    fn test_collect_block_empty() {
        let block = collect_block(&["", "Next paragraph"], 0);

        assert!(block.content.is_empty());
        assert_eq!(block.consumed, 0);
    }

    #[test]
    fn test_collect_block_keeps_inner_blank_lines() {
        let lines = ["    a", "", "    b"];

        let block = collect_block(&lines, 0);

        assert_eq!(block.content, vec!["a", "", "b"]);
        assert_eq!(block.content_offset, 1);
    }

    #[test]
    fn test_collect_block_relative_to_indented_header() {
        let lines = ["  not owned"];

        let block = collect_block(&lines, 2);

        assert_eq!(block.consumed, 0);
    }

    #[test]
    fn test_option_like_content_after_blank_is_content() {
        let lines = ["", "   :not: an option"];

        let block = collect_block(&lines, 0);

        assert!(block.options.is_empty());
        assert_eq!(block.content, vec![":not: an option"]);
    }
}
