use super::{class_list, Alignment};
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use crate::rich_text::{render_rich_text, RichText};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form rich text section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextData {
    #[serde(deserialize_with = "lenient::field")]
    pub content: RichText,
    #[serde(deserialize_with = "lenient::field")]
    pub alignment: Alignment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            content: RichText::paragraph("Start writing here."),
            alignment: Alignment::Left,
            extra: Map::new(),
        }
    }
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::rich_text("content", "Content"),
    FieldSpec::select("alignment", "Alignment", Alignment::OPTIONS),
];

fn render(text: &TextData, out: &mut Markup) {
    out.open(
        "div",
        &[("class", &class_list("text", &[text.alignment.as_str()]))],
    );
    out.raw(&render_rich_text(&text.content));
    out.close("div");
}

pub(super) fn entry() -> RegistryEntry {
    RegistryEntry::typed::<TextData>("Text", FIELDS, render)
}
