//! Minimal HTML builder.
//!
//! Every text node and attribute value passes through [`escape`]; only
//! [`Markup::raw`] writes verbatim.

use std::borrow::Cow;

/// Escapes a value for use in HTML text or a quoted attribute.
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Escapes a value for a single-quoted JavaScript string literal.
///
/// The result still needs [`escape`] when placed in an attribute.
pub fn js_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// An HTML fragment under construction.
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct Markup {
    buf: String,
}

impl Markup {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends markup verbatim.
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Appends escaped text.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape(text));
        self
    }

    /// Appends an opening tag.
    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
        self.buf.push('>');
        self
    }

    /// Appends a closing tag.
    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Appends an element holding escaped text.
    pub fn element(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
        self.open(tag, attrs).text(text).close(tag)
    }

    /// Appends a void element such as `input` or `img`.
    pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.open(tag, attrs)
    }

    /// Appends a link.
    pub fn link(&mut self, href: &str, text: &str) -> &mut Self {
        self.element("a", &[("href", href)], text)
    }

    /// Appends a link asking for confirmation before it is followed.
    pub fn confirm_link(&mut self, href: &str, text: &str, question: &str) -> &mut Self {
        let onclick = format!("return confirm('{}');", js_string(question));
        self.element("a", &[("href", href), ("onclick", &onclick)], text)
    }

    /// Returns the fragment.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Returns the fragment as a string slice.
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}
