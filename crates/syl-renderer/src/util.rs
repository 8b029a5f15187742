//! Escaping helpers shared by directive handlers.

/// Escape HTML special characters.
///
/// # Examples
///
/// ```
/// use syl_renderer::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">"), "&lt;a href=&quot;x&quot;&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Neutralise second-stage template delimiters.
///
/// The opening brace of `{{`, `{%` and `{#` is replaced by its character
/// reference, so browsers still display the original text while the template
/// engine sees no delimiter.
///
/// # Examples
///
/// ```
/// use syl_renderer::escape_template_syntax;
///
/// assert_eq!(escape_template_syntax("{{ x }}"), "&#123;{ x }}");
/// assert_eq!(escape_template_syntax("a { b }"), "a { b }");
/// ```
#[must_use]
pub fn escape_template_syntax(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' && matches!(chars.peek(), Some('{' | '%' | '#')) {
            result.push_str("&#123;");
        } else {
            result.push(c);
        }
    }
    result
}

/// Escape text for an attribute value.
pub(crate) fn escape_attr(s: &str) -> String {
    escape_template_syntax(&escape_html(s))
}

/// Escape text for element content.
///
/// Quotes are left alone so code keeps its literal form in `<textarea>` and
/// `<pre>` blocks.
pub(crate) fn escape_content(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    escape_template_syntax(&result)
}
