use super::class_list;
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

select_options! {
    pub enum DividerStyle {
        #[default]
        Solid => "solid",
        Dashed => "dashed",
        Dotted => "dotted",
    }
}

select_options! {
    pub enum DividerWidth {
        #[default]
        Full => "full",
        Narrow => "narrow",
    }
}

/// Horizontal rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DividerData {
    #[serde(deserialize_with = "lenient::field")]
    pub style: DividerStyle,
    #[serde(deserialize_with = "lenient::field")]
    pub width: DividerWidth,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const DIVIDER_FIELDS: &[FieldSpec] = &[
    FieldSpec::select("style", "Line style", DividerStyle::OPTIONS),
    FieldSpec::select("width", "Width", DividerWidth::OPTIONS),
];

fn render_divider(divider: &DividerData, out: &mut Markup) {
    let class = class_list("divider", &[divider.style.as_str(), divider.width.as_str()]);
    out.void("hr", &[("class", &class)]);
}

pub(super) fn divider_entry() -> RegistryEntry {
    RegistryEntry::typed::<DividerData>("Divider", DIVIDER_FIELDS, render_divider)
}

select_options! {
    pub enum SpacerSize {
        Small => "small",
        #[default]
        Medium => "medium",
        Large => "large",
    }
}

/// Empty vertical space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacerData {
    #[serde(deserialize_with = "lenient::field")]
    pub size: SpacerSize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const SPACER_FIELDS: &[FieldSpec] = &[FieldSpec::select("size", "Size", SpacerSize::OPTIONS)];

fn render_spacer(spacer: &SpacerData, out: &mut Markup) {
    let class = class_list("spacer", &[spacer.size.as_str()]);
    out.add_line(&format!("<div class=\"{}\" aria-hidden=\"true\"></div>", class));
}

pub(super) fn spacer_entry() -> RegistryEntry {
    RegistryEntry::typed::<SpacerData>("Spacer", SPACER_FIELDS, render_spacer)
}
