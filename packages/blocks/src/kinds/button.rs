use super::{class_list, safe_href, Alignment};
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

select_options! {
    pub enum ButtonVariant {
        #[default]
        Primary => "primary",
        Secondary => "secondary",
        Outline => "outline",
    }
}

/// Standalone call-to-action button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonData {
    #[serde(deserialize_with = "lenient::field")]
    pub label: String,
    #[serde(deserialize_with = "lenient::field")]
    pub url: String,
    #[serde(deserialize_with = "lenient::field")]
    pub variant: ButtonVariant,
    #[serde(deserialize_with = "lenient::field")]
    pub open_in_new_tab: bool,
    #[serde(deserialize_with = "lenient::field")]
    pub alignment: Alignment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ButtonData {
    fn default() -> Self {
        Self {
            label: "Click here".to_string(),
            url: "#".to_string(),
            variant: ButtonVariant::Primary,
            open_in_new_tab: false,
            alignment: Alignment::Center,
            extra: Map::new(),
        }
    }
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Label"),
    FieldSpec::url("url", "Link"),
    FieldSpec::select("variant", "Style", ButtonVariant::OPTIONS),
    FieldSpec::toggle("openInNewTab", "Open in new tab"),
    FieldSpec::select("alignment", "Alignment", Alignment::OPTIONS),
];

fn render(button: &ButtonData, out: &mut Markup) {
    out.open(
        "div",
        &[("class", &class_list("button", &[button.alignment.as_str()]))],
    );
    let class = format!("btn btn--{}", button.variant);
    let href = safe_href(&button.url);
    if button.open_in_new_tab {
        out.element(
            "a",
            &[
                ("class", &class),
                ("href", href),
                ("target", "_blank"),
                ("rel", "noopener noreferrer"),
            ],
            &button.label,
        );
    } else {
        out.element("a", &[("class", &class), ("href", href)], &button.label);
    }
    out.close("div");
}

pub(super) fn entry() -> RegistryEntry {
    RegistryEntry::typed::<ButtonData>("Button", FIELDS, render)
}
