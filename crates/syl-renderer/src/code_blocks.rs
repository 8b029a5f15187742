//! Code block positions in markdown source.
//!
//! Directive syntax inside fenced or indented code is displayed verbatim.
//! Positions come from pulldown-cmark itself, so list nesting and tab
//! indentation follow the same rules as the final render.

use std::ops::Range;

use pulldown_cmark::{Event, Parser, Tag};

use crate::pipeline::parser_options;

/// Byte ranges of the code blocks of one markdown text.
#[derive(Debug, Default)]
pub(crate) struct CodeBlocks {
    ranges: Vec<Range<usize>>,
}

impl CodeBlocks {
    pub(crate) fn scan(text: &str) -> Self {
        let ranges = Parser::new_ext(text, parser_options())
            .into_offset_iter()
            .filter_map(|(event, range)| {
                matches!(event, Event::Start(Tag::CodeBlock(_))).then_some(range)
            })
            .collect();
        Self { ranges }
    }

    /// Whether the byte at `offset` belongs to a code block.
    pub(crate) fn contains(&self, offset: usize) -> bool {
        // Code blocks never nest, so ranges are sorted and disjoint.
        let idx = self.ranges.partition_point(|r| r.end <= offset);
        self.ranges.get(idx).is_some_and(|r| r.start <= offset)
    }
}
