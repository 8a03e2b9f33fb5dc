//! # Block Editors
//!
//! Headless editor components. An editor describes its form (field specs
//! paired with the record's current values) and turns one field input into a
//! complete replacement payload of its own type. The list controller only
//! ever replaces a record's data wholesale; it never patches.

use crate::data::{json_kind, BlockData};
use crate::errors::EditError;
use crate::markup::is_safe_url;
use crate::record::BlockRecord;
use serde::Serialize;
use serde_json::{Map, Value};

/// Input widget for one payload field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    TextArea,
    RichText,
    Url,
    /// Filled through the media picker's `select(url)` callback
    Image,
    Select {
        options: &'static [&'static str],
    },
    Toggle,
    Number {
        min: i64,
        max: i64,
    },
    StringList,
    List {
        item_fields: &'static [FieldSpec],
    },
}

/// One editable field of a payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }

    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub const fn text_area(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::TextArea)
    }

    pub const fn rich_text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::RichText)
    }

    pub const fn url(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Url)
    }

    pub const fn image(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Image)
    }

    pub const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(key, label, FieldKind::Select { options })
    }

    pub const fn toggle(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Toggle)
    }

    pub const fn number(key: &'static str, label: &'static str, min: i64, max: i64) -> Self {
        Self::new(key, label, FieldKind::Number { min, max })
    }

    pub const fn string_list(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::StringList)
    }

    pub const fn list(
        key: &'static str,
        label: &'static str,
        item_fields: &'static [FieldSpec],
    ) -> Self {
        Self::new(key, label, FieldKind::List { item_fields })
    }

    /// Check that `value` fits this field
    pub fn validate(&self, value: &Value) -> Result<(), EditError> {
        validate_value(self.key, &self.kind, value)
    }
}

fn validate_value(key: &str, kind: &FieldKind, value: &Value) -> Result<(), EditError> {
    match kind {
        FieldKind::Text | FieldKind::TextArea => expect_string(key, value).map(|_| ()),
        FieldKind::Url | FieldKind::Image => {
            let url = expect_string(key, value)?;
            if is_safe_url(url) {
                Ok(())
            } else {
                Err(EditError::invalid(key, "unsupported url scheme"))
            }
        }
        FieldKind::RichText => match value {
            Value::Object(_) | Value::String(_) => Ok(()),
            other => Err(EditError::invalid(
                key,
                format!("expected a rich-text document, found {}", json_kind(other)),
            )),
        },
        FieldKind::Select { options } => {
            let choice = expect_string(key, value)?;
            if options.contains(&choice) {
                Ok(())
            } else {
                Err(EditError::invalid(
                    key,
                    format!("\"{}\" is not one of {}", choice, options.join(", ")),
                ))
            }
        }
        FieldKind::Toggle => match value {
            Value::Bool(_) => Ok(()),
            other => Err(EditError::invalid(
                key,
                format!("expected a boolean, found {}", json_kind(other)),
            )),
        },
        FieldKind::Number { min, max } => {
            let number = value
                .as_i64()
                .ok_or_else(|| EditError::invalid(key, "expected a whole number"))?;
            if number < *min || number > *max {
                return Err(EditError::invalid(
                    key,
                    format!("{} is outside {}..={}", number, min, max),
                ));
            }
            Ok(())
        }
        FieldKind::StringList => {
            let items = expect_array(key, value)?;
            if items.iter().all(Value::is_string) {
                Ok(())
            } else {
                Err(EditError::invalid(key, "expected a list of strings"))
            }
        }
        FieldKind::List { item_fields } => {
            for (index, item) in expect_array(key, value)?.iter().enumerate() {
                let item = item.as_object().ok_or_else(|| {
                    EditError::invalid(key, format!("item {} is not an object", index))
                })?;
                for spec in item_fields.iter() {
                    if let Some(field_value) = item.get(spec.key) {
                        let path = format!("{}[{}].{}", key, index, spec.key);
                        validate_value(&path, &spec.kind, field_value)?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn expect_string<'a>(key: &str, value: &'a Value) -> Result<&'a str, EditError> {
    value.as_str().ok_or_else(|| {
        EditError::invalid(key, format!("expected a string, found {}", json_kind(value)))
    })
}

fn expect_array<'a>(key: &str, value: &'a Value) -> Result<&'a Vec<Value>, EditError> {
    value.as_array().ok_or_else(|| {
        EditError::invalid(key, format!("expected a list, found {}", json_kind(value)))
    })
}

/// A field spec paired with the record's current value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub value: Value,
}

/// What an editor shows for one block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorForm {
    pub block_id: String,
    pub block_type: String,
    pub title: String,
    pub fields: Vec<FormField>,
    /// Shown instead of fields when the block cannot be edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl EditorForm {
    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.spec.key == key)
    }
}

/// A change coming out of an editor widget
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct FieldInput {
    pub key: String,
    pub value: Value,
}

impl FieldInput {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The media picker's `select(url)` callback
    pub fn media(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(key, Value::String(url.into()))
    }
}

/// Editor component for one block kind
pub trait BlockEditor: Send + Sync {
    /// Form describing the record's editable fields
    fn form(&self, record: &BlockRecord) -> EditorForm;

    /// Full replacement payload after applying `input` to `current`
    fn apply(&self, current: &BlockData, input: &FieldInput) -> Result<BlockData, EditError>;
}

/// Editor driven by a static field schema
#[derive(Debug, Clone, Copy)]
pub struct SchemaEditor {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

impl SchemaEditor {
    pub const fn new(title: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { title, fields }
    }

    pub fn spec(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.key == key)
    }
}

impl BlockEditor for SchemaEditor {
    fn form(&self, record: &BlockRecord) -> EditorForm {
        let value = record.data.to_value();
        let fields = self
            .fields
            .iter()
            .map(|spec| FormField {
                spec: *spec,
                value: value.get(spec.key).cloned().unwrap_or(Value::Null),
            })
            .collect();

        EditorForm {
            block_id: record.id.to_string(),
            block_type: record.block_type().to_string(),
            title: self.title.to_string(),
            fields,
            notice: None,
        }
    }

    fn apply(&self, current: &BlockData, input: &FieldInput) -> Result<BlockData, EditError> {
        let spec = self
            .spec(&input.key)
            .ok_or_else(|| EditError::UnknownField(input.key.clone()))?;
        spec.validate(&input.value)?;

        let mut value = match current.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        value.insert(spec.key.to_string(), input.value.clone());

        Ok(BlockData::from_parts(current.tag(), Value::Object(value)))
    }
}

/// Editor for tags with no registry entry. Shows a notice, accepts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownBlockEditor;

impl BlockEditor for UnknownBlockEditor {
    fn form(&self, record: &BlockRecord) -> EditorForm {
        EditorForm {
            block_id: record.id.to_string(),
            block_type: record.block_type().to_string(),
            title: "Unknown block type".to_string(),
            fields: Vec::new(),
            notice: Some(format!(
                "Unknown block type \"{}\". Its content is kept as is.",
                record.block_type()
            )),
        }
    }

    fn apply(&self, current: &BlockData, _input: &FieldInput) -> Result<BlockData, EditError> {
        Err(EditError::NotEditable(current.tag().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;
    use crate::kinds::HeroData;
    use serde_json::json;

    const ITEM_FIELDS: &[FieldSpec] = &[
        FieldSpec::text("question", "Question"),
        FieldSpec::number("rank", "Rank", 1, 5),
    ];

    const HERO_FIELDS: &[FieldSpec] = &[
        FieldSpec::text("title", "Title"),
        FieldSpec::select("alignment", "Alignment", &["left", "center", "right"]),
        FieldSpec::image("imageUrl", "Background image"),
        FieldSpec::toggle("overlay", "Dark overlay"),
    ];

    fn hero_editor() -> SchemaEditor {
        SchemaEditor::new("Hero", HERO_FIELDS)
    }

    #[test]
    fn test_form_pairs_specs_with_values() {
        let record = BlockRecord::new(&mut SequentialIds::new("t"), HeroData::default().into());
        let form = hero_editor().form(&record);

        assert_eq!(form.block_id, "t-1");
        assert_eq!(form.block_type, "hero");
        assert_eq!(form.fields.len(), 4);
        assert_eq!(
            form.field("title").unwrap().value,
            json!(HeroData::default().title)
        );
    }

    #[test]
    fn test_apply_produces_full_replacement() {
        let current: BlockData = HeroData::default().into();
        let next = hero_editor()
            .apply(&current, &FieldInput::new("title", "New title"))
            .unwrap();

        let BlockData::Hero(hero) = next else {
            panic!("expected hero");
        };
        assert_eq!(hero.title, "New title");
        assert_eq!(hero.subtitle, HeroData::default().subtitle);
    }

    #[test]
    fn test_media_selection() {
        let current: BlockData = HeroData::default().into();
        let next = hero_editor()
            .apply(&current, &FieldInput::media("imageUrl", "https://cdn.test/a.jpg"))
            .unwrap();

        assert_eq!(next.to_value()["imageUrl"], "https://cdn.test/a.jpg");
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let current: BlockData = HeroData::default().into();
        let editor = hero_editor();

        assert_eq!(
            editor.apply(&current, &FieldInput::new("nope", "x")),
            Err(EditError::UnknownField("nope".into()))
        );
        assert!(editor
            .apply(&current, &FieldInput::new("alignment", "diagonal"))
            .is_err());
        assert!(editor
            .apply(&current, &FieldInput::new("overlay", "yes"))
            .is_err());
        assert!(editor
            .apply(&current, &FieldInput::media("imageUrl", "javascript:alert(1)"))
            .is_err());
        assert!(editor
            .apply(&current, &FieldInput::media("imageUrl", "java\tscript:alert(1)"))
            .is_err());
    }

    #[test]
    fn test_list_items_are_validated() {
        let spec = FieldSpec::list("items", "Items", ITEM_FIELDS);

        assert!(spec
            .validate(&json!([{ "question": "Why?", "rank": 2 }]))
            .is_ok());

        let err = spec.validate(&json!([{ "rank": 9 }])).unwrap_err();
        assert!(matches!(err, EditError::InvalidValue { ref key, .. } if key == "items[0].rank"));

        assert!(spec.validate(&json!(["not an object"])).is_err());
    }

    #[test]
    fn test_unknown_editor_refuses_edits() {
        let data = BlockData::from_parts("gone", json!({}));
        let record = BlockRecord::new(&mut SequentialIds::new("t"), data.clone());

        let form = UnknownBlockEditor.form(&record);
        assert!(form.fields.is_empty());
        assert!(form.notice.unwrap().contains("gone"));

        assert_eq!(
            UnknownBlockEditor.apply(&data, &FieldInput::new("x", 1)),
            Err(EditError::NotEditable("gone".into()))
        );
    }
}
