use super::class_list;
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use crate::rich_text::{render_rich_text, RichText};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    #[serde(deserialize_with = "lenient::field")]
    pub question: String,
    #[serde(deserialize_with = "lenient::field")]
    pub answer: RichText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FaqItem {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: RichText::paragraph(answer),
            extra: Map::new(),
        }
    }
}

/// Question and answer accordion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<FaqItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FaqData {
    fn default() -> Self {
        Self {
            title: "Frequently asked questions".to_string(),
            items: vec![
                FaqItem::new("How do I get started?", "Sign up and follow the setup guide."),
                FaqItem::new("Can I cancel at any time?", "Yes, there is no lock-in."),
            ],
            extra: Map::new(),
        }
    }
}

const ITEM_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("question", "Question"),
    FieldSpec::rich_text("answer", "Answer"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::list("items", "Questions", ITEM_FIELDS),
];

fn render(faq: &FaqData, out: &mut Markup) {
    out.open("section", &[("class", &class_list("faq", &[]))]);
    out.element_if("h2", &[], &faq.title);
    for item in faq.items.iter().filter(|item| !item.question.trim().is_empty()) {
        out.open("details", &[("class", "block-faq__item")]);
        out.element("summary", &[], &item.question);
        out.raw(&render_rich_text(&item.answer));
        out.close("details");
    }
    out.close("section");
}

pub(super) fn entry() -> RegistryEntry {
    RegistryEntry::typed::<FaqData>("FAQ", FIELDS, render)
}
