use super::{class_list, safe_href, Alignment};
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full-width banner with a headline and a call to action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::field")]
    pub subtitle: String,
    #[serde(deserialize_with = "lenient::field")]
    pub image_url: String,
    #[serde(deserialize_with = "lenient::field")]
    pub cta_label: String,
    #[serde(deserialize_with = "lenient::field")]
    pub cta_url: String,
    #[serde(deserialize_with = "lenient::field")]
    pub alignment: Alignment,
    #[serde(deserialize_with = "lenient::field")]
    pub overlay: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeroData {
    fn default() -> Self {
        Self {
            title: "Welcome to our site".to_string(),
            subtitle: "Tell visitors what you do in one sentence.".to_string(),
            image_url: String::new(),
            cta_label: "Get started".to_string(),
            cta_url: "#".to_string(),
            alignment: Alignment::Center,
            overlay: false,
            extra: Map::new(),
        }
    }
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::text_area("subtitle", "Subtitle"),
    FieldSpec::image("imageUrl", "Background image"),
    FieldSpec::text("ctaLabel", "Button label"),
    FieldSpec::url("ctaUrl", "Button link"),
    FieldSpec::select("alignment", "Alignment", Alignment::OPTIONS),
    FieldSpec::toggle("overlay", "Dark overlay"),
];

fn render(hero: &HeroData, out: &mut Markup) {
    let overlay = if hero.overlay { "overlay" } else { "" };
    let class = class_list("hero", &[hero.alignment.as_str(), overlay]);

    if hero.image_url.is_empty() {
        out.open("div", &[("class", &class)]);
    } else {
        let style = format!("background-image: url('{}')", css_url(safe_href(&hero.image_url)));
        out.open("div", &[("class", &class), ("style", &style)]);
    }

    out.element_if("h1", &[("class", "block-hero__title")], &hero.title);
    out.element_if("p", &[("class", "block-hero__subtitle")], &hero.subtitle);
    if !hero.cta_label.trim().is_empty() {
        out.element(
            "a",
            &[("class", "block-hero__cta"), ("href", safe_href(&hero.cta_url))],
            &hero.cta_label,
        );
    }
    out.close("div");
}

/// Percent-encode the characters that could end a quoted CSS `url('…')`
fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '\\' => out.push_str("%5C"),
            '\n' => out.push_str("%0A"),
            '\r' => out.push_str("%0D"),
            c => out.push(c),
        }
    }
    out
}

pub(super) fn entry() -> RegistryEntry {
    RegistryEntry::typed::<HeroData>("Hero", FIELDS, render)
}
