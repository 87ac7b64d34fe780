//! Minimal indenting XML writer. Text content is always escaped and
//! elements are closed by construction.

use std::borrow::Cow;

const INDENT: &str = "  ";

/// Control characters XML 1.0 forbids (everything below U+0020 except tab, LF, CR).
fn is_illegal(c: char) -> bool {
    c < ' ' && !matches!(c, '\t' | '\n' | '\r')
}

/// Escape text for use as element content or attribute value.
/// Illegal control characters become spaces.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'') || is_illegal(c)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_illegal(c) => out.push(' '),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a line verbatim at the top level (declarations, processing instructions).
    pub fn prolog(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// `<tag>` … children … `</tag>`
    pub fn element(&mut self, tag: &str, children: impl FnOnce(&mut Self)) {
        self.pad();
        self.out.push_str(&format!("<{tag}>\n"));
        self.depth += 1;
        children(self);
        self.depth -= 1;
        self.pad();
        self.out.push_str(&format!("</{tag}>\n"));
    }

    /// `<tag>text</tag>` on one line
    pub fn leaf(&mut self, tag: &str, text: &str) {
        self.pad();
        self.out
            .push_str(&format!("<{tag}>{}</{tag}>\n", escape(text)));
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn pad(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }
}
