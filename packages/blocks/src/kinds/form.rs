use super::class_list;
use crate::anchor::sanitize_anchor;
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

select_options! {
    pub enum InputKind {
        #[default]
        Text => "text",
        Email => "email",
        Phone => "tel",
        TextArea => "textarea",
        Select => "select",
        Checkbox => "checkbox",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    #[serde(deserialize_with = "lenient::field")]
    pub label: String,
    /// Submitted field name; derived from the label when empty
    #[serde(deserialize_with = "lenient::field")]
    pub name: String,
    #[serde(deserialize_with = "lenient::field")]
    pub kind: InputKind,
    #[serde(deserialize_with = "lenient::field")]
    pub required: bool,
    /// Choices for `select` inputs
    #[serde(deserialize_with = "lenient::list")]
    pub options: Vec<String>,
    #[serde(deserialize_with = "lenient::field")]
    pub placeholder: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FormInput {
    fn new(label: &str, kind: InputKind, required: bool) -> Self {
        Self {
            label: label.to_string(),
            kind,
            required,
            ..Self::default()
        }
    }

    pub fn field_name(&self) -> String {
        if self.name.trim().is_empty() {
            sanitize_anchor(&self.label)
        } else {
            self.name.clone()
        }
    }
}

/// Contact or lead form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::list")]
    pub fields: Vec<FormInput>,
    #[serde(deserialize_with = "lenient::field")]
    pub submit_label: String,
    #[serde(deserialize_with = "lenient::field")]
    pub success_message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            title: "Contact us".to_string(),
            fields: vec![
                FormInput::new("Name", InputKind::Text, true),
                FormInput::new("Email", InputKind::Email, true),
                FormInput::new("Message", InputKind::TextArea, false),
            ],
            submit_label: "Send".to_string(),
            success_message: "Thanks! We will get back to you soon.".to_string(),
            extra: Map::new(),
        }
    }
}

const INPUT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("label", "Label"),
    FieldSpec::text("name", "Field name"),
    FieldSpec::select("kind", "Input type", InputKind::OPTIONS),
    FieldSpec::toggle("required", "Required"),
    FieldSpec::string_list("options", "Choices"),
    FieldSpec::text("placeholder", "Placeholder"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::list("fields", "Fields", INPUT_FIELDS),
    FieldSpec::text("submitLabel", "Submit button"),
    FieldSpec::text_area("successMessage", "Success message"),
];

fn render(form: &FormData, out: &mut Markup) {
    out.open(
        "form",
        &[("class", &class_list("form", &[])), ("method", "post")],
    );
    out.element_if("h2", &[], &form.title);
    for input in &form.fields {
        render_input(input, out);
    }
    out.element("button", &[("type", "submit")], &form.submit_label);
    out.close("form");
}

fn render_input(input: &FormInput, out: &mut Markup) {
    let name = input.field_name();
    let mut attrs: Vec<(&str, &str)> = vec![("name", name.as_str()), ("id", name.as_str())];
    if input.required {
        attrs.push(("required", "required"));
    }
    if !input.placeholder.is_empty() {
        attrs.push(("placeholder", input.placeholder.as_str()));
    }

    out.open("div", &[("class", "block-form__field")]);
    match input.kind {
        InputKind::Checkbox => {
            out.open("label", &[]);
            attrs.push(("type", "checkbox"));
            out.void("input", &attrs);
            out.add_line(&crate::markup::escape_html(&input.label));
            out.close("label");
        }
        kind => {
            out.element("label", &[("for", &name)], &input.label);
            match kind {
                InputKind::TextArea => out.element("textarea", &attrs, ""),
                InputKind::Select => {
                    out.open("select", &attrs);
                    for option in &input.options {
                        out.element("option", &[("value", option)], option);
                    }
                    out.close("select");
                }
                other => {
                    attrs.push(("type", other.as_str()));
                    out.void("input", &attrs);
                }
            }
        }
    }
    out.close("div");
}

pub(super) fn entry() -> RegistryEntry {
    RegistryEntry::typed::<FormData>("Form", FIELDS, render)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_from_label() {
        let input = FormInput::new("Your Email Address", InputKind::Email, true);
        assert_eq!(input.field_name(), "your-email-address");

        let named = FormInput {
            name: "email".to_string(),
            ..input
        };
        assert_eq!(named.field_name(), "email");
    }

    #[test]
    fn test_render_inputs() {
        let mut out = Markup::compact();
        render(&FormData::default(), &mut out);
        let html = out.into_string();

        assert!(html.contains("<input name=\"email\" id=\"email\" required=\"required\" type=\"email\" />"));
        assert!(html.contains("<textarea name=\"message\" id=\"message\"></textarea>"));
        assert!(html.contains("<button type=\"submit\">Send</button>"));
    }
}
