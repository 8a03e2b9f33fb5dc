use super::{class_list, safe_href};
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingTier {
    #[serde(deserialize_with = "lenient::field")]
    pub name: String,
    #[serde(deserialize_with = "lenient::field")]
    pub price: String,
    #[serde(deserialize_with = "lenient::field")]
    pub period: String,
    #[serde(deserialize_with = "lenient::list")]
    pub features: Vec<String>,
    #[serde(deserialize_with = "lenient::field")]
    pub highlighted: bool,
    #[serde(deserialize_with = "lenient::field")]
    pub cta_label: String,
    #[serde(deserialize_with = "lenient::field")]
    pub cta_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PricingTier {
    fn sample(name: &str, price: &str, features: &[&str], highlighted: bool) -> Self {
        Self {
            name: name.to_string(),
            price: price.to_string(),
            period: "/month".to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            highlighted,
            cta_label: "Choose plan".to_string(),
            cta_url: "#".to_string(),
            extra: Map::new(),
        }
    }
}

/// Side-by-side plan comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::list")]
    pub tiers: Vec<PricingTier>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PricingData {
    fn default() -> Self {
        Self {
            title: "Pricing".to_string(),
            tiers: vec![
                PricingTier::sample("Basic", "$9", &["1 site", "Email support"], false),
                PricingTier::sample(
                    "Pro",
                    "$29",
                    &["10 sites", "Priority support", "Analytics"],
                    true,
                ),
            ],
            extra: Map::new(),
        }
    }
}

const TIER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "Plan name"),
    FieldSpec::text("price", "Price"),
    FieldSpec::text("period", "Billing period"),
    FieldSpec::string_list("features", "Features"),
    FieldSpec::toggle("highlighted", "Highlight"),
    FieldSpec::text("ctaLabel", "Button label"),
    FieldSpec::url("ctaUrl", "Button link"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::list("tiers", "Plans", TIER_FIELDS),
];

fn render(pricing: &PricingData, out: &mut Markup) {
    out.open("section", &[("class", &class_list("pricing", &[]))]);
    out.element_if("h2", &[], &pricing.title);
    out.open("div", &[("class", "block-pricing__tiers")]);
    for tier in &pricing.tiers {
        let class = if tier.highlighted {
            "block-pricing__tier block-pricing__tier--highlighted"
        } else {
            "block-pricing__tier"
        };
        out.open("div", &[("class", class)]);
        out.element_if("h3", &[], &tier.name);
        out.open("p", &[("class", "block-pricing__price")]);
        out.add_line(&crate::markup::escape_html(&tier.price));
        out.element_if("span", &[], &tier.period);
        out.close("p");
        if !tier.features.is_empty() {
            out.open("ul", &[]);
            for feature in &tier.features {
                out.element("li", &[], feature);
            }
            out.close("ul");
        }
        if !tier.cta_label.trim().is_empty() {
            out.element("a", &[("href", safe_href(&tier.cta_url))], &tier.cta_label);
        }
        out.close("div");
    }
    out.close("div");
    out.close("section");
}

pub(super) fn entry() -> RegistryEntry {
    RegistryEntry::typed::<PricingData>("Pricing", FIELDS, render)
}
