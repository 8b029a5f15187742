//! Placeholder collection and splicing.
//!
//! Each directive is replaced by an HTML comment before markdown rendering;
//! the comment passes through pulldown-cmark untouched and is swapped for
//! the directive fragment afterwards.
//!
//! The comment tag is chosen so that it does not occur in the page source,
//! and splicing is a single left-to-right pass: text written by the author
//! and fragments already inserted are never matched.

use super::Invocation;

const BASE_TAG: &str = "fragment";

/// Directive whose placeholder did not survive markdown rendering.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Unplaced {
    pub line: usize,
    pub directive: String,
}

#[derive(Debug)]
struct Pending {
    fragment: String,
    line: usize,
    directive: String,
}

/// Collects placeholder/fragment pairs for one render.
#[derive(Debug)]
pub(crate) struct Replacements {
    prefix: String,
    items: Vec<Pending>,
}

impl Replacements {
    /// Collector whose placeholders cannot collide with text in `source`.
    pub(crate) fn for_source(source: &str) -> Self {
        let mut prefix = format!("<!-- syl:{BASE_TAG}:");
        let mut n = 0;
        while source.contains(&prefix[5..]) {
            n += 1;
            prefix = format!("<!-- syl:{BASE_TAG}{n}:");
        }
        Self {
            prefix,
            items: Vec::new(),
        }
    }

    /// Store the fragment of `invocation` and return its placeholder.
    pub(crate) fn push(&mut self, fragment: String, invocation: &Invocation) -> String {
        let placeholder = format!("{}{} -->", self.prefix, self.items.len());
        self.items.push(Pending {
            fragment,
            line: invocation.line,
            directive: invocation.name.clone(),
        });
        placeholder
    }

    /// Replace every placeholder in `html` with its fragment.
    ///
    /// Each placeholder is replaced once. Consumes the collector to prevent
    /// accidental reuse.
    ///
    /// # Errors
    ///
    /// Returns the first directive whose placeholder is missing from `html`.
    pub(crate) fn apply(self, html: &str) -> Result<String, Unplaced> {
        if self.items.is_empty() {
            return Ok(html.to_owned());
        }

        let mut out = String::with_capacity(html.len() + self.fragments_len());
        let mut placed = vec![false; self.items.len()];
        let mut rest = html;
        while let Some(start) = rest.find(&self.prefix) {
            out.push_str(&rest[..start]);
            let tail = &rest[start + self.prefix.len()..];
            match self.index_at(tail, &placed) {
                Some((idx, len)) => {
                    out.push_str(&self.items[idx].fragment);
                    placed[idx] = true;
                    rest = &tail[len..];
                }
                None => {
                    out.push_str(&self.prefix);
                    rest = tail;
                }
            }
        }
        out.push_str(rest);

        match placed.iter().position(|&done| !done) {
            Some(idx) => {
                let item = &self.items[idx];
                Err(Unplaced {
                    line: item.line,
                    directive: item.directive.clone(),
                })
            }
            None => Ok(out),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Parse `N -->` at the start of `tail` for an unplaced index `N`.
    fn index_at(&self, tail: &str, placed: &[bool]) -> Option<(usize, usize)> {
        let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
        let idx: usize = tail[..digits].parse().ok()?;
        let len = digits + tail[digits..].strip_prefix(" -->").map(|_| 4)?;
        (idx < self.items.len() && !placed[idx]).then_some((idx, len))
    }

    fn fragments_len(&self) -> usize {
        self.items.iter().map(|item| item.fragment.len()).sum()
    }
}
