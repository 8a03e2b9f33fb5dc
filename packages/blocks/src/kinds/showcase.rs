use super::{class_list, safe_href};
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureItem {
    #[serde(deserialize_with = "lenient::field")]
    pub icon: String,
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::field")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureItem {
    fn new(icon: &str, title: &str, description: &str) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            extra: Map::new(),
        }
    }
}

/// Grid of product features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeaturesData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<FeatureItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FeaturesData {
    fn default() -> Self {
        Self {
            title: "Why choose us".to_string(),
            items: vec![
                FeatureItem::new("zap", "Fast", "Pages load in the blink of an eye."),
                FeatureItem::new("shield", "Secure", "Your data is safe with us."),
                FeatureItem::new("heart", "Friendly", "Support that actually answers."),
            ],
            extra: Map::new(),
        }
    }
}

const FEATURE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("icon", "Icon"),
    FieldSpec::text("title", "Title"),
    FieldSpec::text_area("description", "Description"),
];

const FEATURES_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::list("items", "Features", FEATURE_FIELDS),
];

fn render_features(features: &FeaturesData, out: &mut Markup) {
    out.open("section", &[("class", &class_list("features", &[]))]);
    out.element_if("h2", &[], &features.title);
    out.open("div", &[("class", "block-features__grid")]);
    for item in &features.items {
        out.open("div", &[("class", "block-features__item")]);
        if !item.icon.is_empty() {
            out.element("span", &[("class", "icon"), ("data-icon", &item.icon)], "");
        }
        out.element_if("h3", &[], &item.title);
        out.element_if("p", &[], &item.description);
        out.close("div");
    }
    out.close("div");
    out.close("section");
}

pub(super) fn features_entry() -> RegistryEntry {
    RegistryEntry::typed::<FeaturesData>("Features", FEATURES_FIELDS, render_features)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(deserialize_with = "lenient::field")]
    pub quote: String,
    #[serde(deserialize_with = "lenient::field")]
    pub author: String,
    #[serde(deserialize_with = "lenient::field")]
    pub role: String,
    #[serde(deserialize_with = "lenient::field")]
    pub avatar_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Customer quotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialsData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<Testimonial>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TestimonialsData {
    fn default() -> Self {
        Self {
            title: "What our customers say".to_string(),
            items: vec![Testimonial {
                quote: "It changed how we work.".to_string(),
                author: "Alex Doe".to_string(),
                role: "Founder".to_string(),
                avatar_url: String::new(),
                extra: Map::new(),
            }],
            extra: Map::new(),
        }
    }
}

const TESTIMONIAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::text_area("quote", "Quote"),
    FieldSpec::text("author", "Author"),
    FieldSpec::text("role", "Role"),
    FieldSpec::image("avatarUrl", "Photo"),
];

const TESTIMONIALS_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::list("items", "Testimonials", TESTIMONIAL_FIELDS),
];

fn render_testimonials(testimonials: &TestimonialsData, out: &mut Markup) {
    out.open("section", &[("class", &class_list("testimonials", &[]))]);
    out.element_if("h2", &[], &testimonials.title);
    for item in testimonials.items.iter().filter(|item| !item.quote.trim().is_empty()) {
        out.open("blockquote", &[("class", "block-testimonials__item")]);
        out.element("p", &[], &item.quote);
        out.open("footer", &[]);
        if !item.avatar_url.is_empty() {
            out.void(
                "img",
                &[("src", safe_href(&item.avatar_url)), ("alt", &item.author)],
            );
        }
        out.element_if("cite", &[], &item.author);
        out.element_if("span", &[], &item.role);
        out.close("footer");
        out.close("blockquote");
    }
    out.close("section");
}

pub(super) fn testimonials_entry() -> RegistryEntry {
    RegistryEntry::typed::<TestimonialsData>(
        "Testimonials",
        TESTIMONIALS_FIELDS,
        render_testimonials,
    )
}
