//! # Rich Text
//!
//! Several block payloads embed a structured rich-text document owned by the
//! text-editing collaborator. The block model stores it verbatim and only
//! knows how to render it for read-only display.
//!
//! Recognised node types: `doc`, `paragraph`, `heading` (attrs.level),
//! `text` (marks), `bulletList`, `orderedList`, `listItem`, `blockquote`,
//! `codeBlock`, `hardBreak`, `horizontalRule`. Anything else renders its
//! children, so newer schemas degrade to their text.

use crate::markup::{escape_attr, escape_html, is_safe_url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Structured rich-text document, kept exactly as the text editor produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Value);

impl Default for RichText {
    fn default() -> Self {
        Self(json!({ "type": "doc", "content": [] }))
    }
}

impl RichText {
    /// Single-paragraph document
    pub fn paragraph(text: &str) -> Self {
        Self(json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": text }] }
            ]
        }))
    }

    /// Concatenated text content, blocks separated by newlines
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        match &self.0 {
            Value::String(s) => out.push_str(s),
            node => collect_text(node, &mut out),
        }
        out.trim_end().to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

/// Render a rich-text document to display markup
pub fn render_rich_text(doc: &RichText) -> String {
    let mut out = String::new();
    match &doc.0 {
        Value::String(text) => {
            if !text.trim().is_empty() {
                out.push_str("<p>");
                out.push_str(&escape_html(text));
                out.push_str("</p>");
            }
        }
        node => render_node(node, &mut out),
    }
    out
}

fn render_node(node: &Value, out: &mut String) {
    let Some(obj) = node.as_object() else {
        return;
    };

    match node_type(obj) {
        "doc" => render_children(obj, out),
        "paragraph" => wrap("p", obj, out),
        "heading" => {
            let level = attr(obj, "level")
                .and_then(Value::as_u64)
                .unwrap_or(2)
                .clamp(1, 6);
            wrap(&format!("h{}", level), obj, out);
        }
        "text" => render_text(obj, out),
        "bulletList" => wrap("ul", obj, out),
        "orderedList" => wrap("ol", obj, out),
        "listItem" => wrap("li", obj, out),
        "blockquote" => wrap("blockquote", obj, out),
        "codeBlock" => {
            out.push_str("<pre><code>");
            render_children(obj, out);
            out.push_str("</code></pre>");
        }
        "hardBreak" => out.push_str("<br />"),
        "horizontalRule" => out.push_str("<hr />"),
        _ => render_children(obj, out),
    }
}

fn render_children(obj: &Map<String, Value>, out: &mut String) {
    if let Some(children) = obj.get("content").and_then(Value::as_array) {
        for child in children {
            render_node(child, out);
        }
    }
}

fn wrap(tag: &str, obj: &Map<String, Value>, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    if let Some(align) = attr(obj, "textAlign").and_then(Value::as_str) {
        if matches!(align, "left" | "center" | "right" | "justify") {
            out.push_str(&format!(" style=\"text-align: {}\"", align));
        }
    }
    out.push('>');
    render_children(obj, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn render_text(obj: &Map<String, Value>, out: &mut String) {
    let text = obj.get("text").and_then(Value::as_str).unwrap_or("");
    if text.is_empty() {
        return;
    }

    let marks: Vec<&Map<String, Value>> = obj
        .get("marks")
        .and_then(Value::as_array)
        .map(|marks| marks.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default();

    let mut closing = Vec::new();
    for mark in &marks {
        match node_type(mark) {
            "bold" => open_mark("strong", &mut closing, out),
            "italic" => open_mark("em", &mut closing, out),
            "underline" => open_mark("u", &mut closing, out),
            "strike" => open_mark("s", &mut closing, out),
            "code" => open_mark("code", &mut closing, out),
            "link" => {
                let href = attr(mark, "href").and_then(Value::as_str).unwrap_or("");
                if href.is_empty() || !is_safe_url(href) {
                    continue;
                }
                out.push_str(&format!("<a href=\"{}\"", escape_attr(href)));
                if attr(mark, "target").and_then(Value::as_str) == Some("_blank") {
                    out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
                }
                out.push('>');
                closing.push("a");
            }
            _ => {}
        }
    }

    out.push_str(&escape_html(text));

    for tag in closing.iter().rev() {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn open_mark(tag: &'static str, closing: &mut Vec<&'static str>, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    closing.push(tag);
}

fn collect_text(node: &Value, out: &mut String) {
    let Some(obj) = node.as_object() else {
        return;
    };

    match node_type(obj) {
        "text" => {
            if let Some(text) = obj.get("text").and_then(Value::as_str) {
                out.push_str(text);
            }
        }
        "hardBreak" => out.push('\n'),
        kind => {
            if let Some(children) = obj.get("content").and_then(Value::as_array) {
                for child in children {
                    collect_text(child, out);
                }
            }
            if matches!(kind, "paragraph" | "heading" | "listItem" | "codeBlock") {
                out.push('\n');
            }
        }
    }
}

fn node_type(obj: &Map<String, Value>) -> &str {
    obj.get("type").and_then(Value::as_str).unwrap_or("")
}

fn attr<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    obj.get("attrs").and_then(|attrs| attrs.get(name))
}
