//! Block renderers (read-only preview and public output share these)

use crate::data::{BlockData, Payload};
use crate::markup::Markup;

/// Renderer for one block kind
pub trait BlockRenderer: Send + Sync {
    fn render(&self, data: &BlockData, out: &mut Markup);
}

/// Renderer for a typed payload; anything else renders the placeholder
pub struct TypedRenderer<T: Payload> {
    render: fn(&T, &mut Markup),
}

impl<T: Payload> TypedRenderer<T> {
    pub fn new(render: fn(&T, &mut Markup)) -> Self {
        Self { render }
    }
}

impl<T: Payload> BlockRenderer for TypedRenderer<T> {
    fn render(&self, data: &BlockData, out: &mut Markup) {
        match T::from_data(data) {
            Some(payload) => (self.render)(payload, out),
            None => render_placeholder(data.tag(), out),
        }
    }
}

/// Renderer for tags with no registry entry
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl BlockRenderer for PlaceholderRenderer {
    fn render(&self, data: &BlockData, out: &mut Markup) {
        render_placeholder(data.tag(), out);
    }
}

/// Neutral "Unknown block type" box
pub fn render_placeholder(tag: &str, out: &mut Markup) {
    out.open(
        "div",
        &[("class", "block-unknown"), ("data-block-type", tag)],
    );
    out.element("p", &[], &format!("Unknown block type: {}", display_tag(tag)));
    out.close("div");
}

fn display_tag(tag: &str) -> &str {
    if tag.is_empty() {
        "(none)"
    } else {
        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{HeroData, SpacerData};
    use serde_json::json;

    #[test]
    fn test_placeholder_markup() {
        let mut out = Markup::compact();
        PlaceholderRenderer.render(&BlockData::from_parts("gone", json!({})), &mut out);

        assert_eq!(
            out.as_str(),
            "<div class=\"block-unknown\" data-block-type=\"gone\"><p>Unknown block type: gone</p></div>"
        );
    }

    #[test]
    fn test_typed_renderer_mismatch_renders_placeholder() {
        let renderer = TypedRenderer::<HeroData>::new(|hero, out| out.element("h1", &[], &hero.title));

        let mut out = Markup::compact();
        renderer.render(&SpacerData::default().into(), &mut out);
        assert!(out.as_str().contains("Unknown block type: spacer"));
    }

    #[test]
    fn test_empty_tag_placeholder() {
        let mut out = Markup::compact();
        render_placeholder("", &mut out);
        assert!(out.as_str().contains("(none)"));
    }
}
