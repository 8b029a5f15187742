//! Parsed directive invocation.

use std::collections::BTreeMap;

/// One directive occurrence in a page.
///
/// ```text
/// .. inginious:: ex1 text/x-python 2
///    :submit: Send
///
///    print("hi")
/// ```
///
/// Here `arguments` is `["ex1", "text/x-python", "2"]`, `options` holds
/// `submit`, and `content` is `["print(\"hi\")"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Directive name.
    pub name: String,
    /// Whitespace-separated positional arguments.
    pub arguments: Vec<String>,
    /// `:name: value` lines directly below the directive line.
    pub options: BTreeMap<String, String>,
    /// Content lines, dedented, without leading or trailing blank lines.
    pub content: Vec<String>,
    /// Line of the directive (1-indexed).
    pub line: usize,
    /// Line of the first content line (1-indexed).
    pub content_line: usize,
}

impl Invocation {
    /// Positional argument at `index`.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    /// Value of option `name`.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// Content lines joined with newlines.
    #[must_use]
    pub fn content_text(&self) -> String {
        self.content.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut inv = Invocation {
            name: "framed".to_owned(),
            arguments: vec!["3".to_owned()],
            content: vec!["a".to_owned(), String::new(), "b".to_owned()],
            ..Default::default()
        };
        inv.options.insert("class".to_owned(), "wide".to_owned());

        assert_eq!(inv.argument(0), Some("3"));
        assert_eq!(inv.argument(1), None);
        assert_eq!(inv.option("class"), Some("wide"));
        assert_eq!(inv.content_text(), "a\n\nb");
    }
}
