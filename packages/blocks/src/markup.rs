//! HTML output buffer shared by block renderers and the page compiler

/// Line-oriented HTML writer with optional pretty printing
#[derive(Debug, Clone)]
pub struct Markup {
    pretty: bool,
    indent: String,
    depth: usize,
    buffer: String,
}

impl Default for Markup {
    fn default() -> Self {
        Self::new()
    }
}

impl Markup {
    /// Pretty printed, two-space indent
    pub fn new() -> Self {
        Self::with_options(true, "  ")
    }

    /// No indentation and no newlines
    pub fn compact() -> Self {
        Self::with_options(false, "")
    }

    pub fn with_options(pretty: bool, indent: &str) -> Self {
        Self {
            pretty,
            indent: indent.to_string(),
            depth: 0,
            buffer: String::new(),
        }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn add_line(&mut self, text: &str) {
        if self.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.pretty {
            self.add("\n");
        }
    }

    pub fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.indent);
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    /// `<tag attrs>` on its own line, then indent
    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        let line = format!("<{}{}>", tag, attributes(attrs));
        self.add_line(&line);
        self.indent();
    }

    /// Dedent, then `</tag>`
    pub fn close(&mut self, tag: &str) {
        self.dedent();
        self.add_line(&format!("</{}>", tag));
    }

    /// `<tag attrs>text</tag>` with `text` escaped
    pub fn element(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
        let line = format!("<{}{}>{}</{}>", tag, attributes(attrs), escape_html(text), tag);
        self.add_line(&line);
    }

    /// Like [`Markup::element`] but skipped entirely when `text` is blank
    pub fn element_if(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
        if !text.trim().is_empty() {
            self.element(tag, attrs, text);
        }
    }

    /// `<tag attrs />`
    pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        let line = format!("<{}{} />", tag, attributes(attrs));
        self.add_line(&line);
    }

    /// Already-rendered markup (rich text output), written as one line
    pub fn raw(&mut self, html: &str) {
        if !html.is_empty() {
            self.add_line(html);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

fn attributes(attrs: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn escape_attr(value: &str) -> String {
    escape_html(value)
}

/// Schemes allowed in emitted links; anything without a scheme is relative
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// True for urls safe to emit into `href`/`src`.
///
/// Browsers drop tab and newline characters anywhere in a url and strip
/// leading control characters, so the scheme is read after doing the same.
pub fn is_safe_url(url: &str) -> bool {
    let normalized: String = url
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|&c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();

    match normalized.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
        Some(end) if normalized[end..].starts_with(':') => {
            let scheme = normalized[..end].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}
