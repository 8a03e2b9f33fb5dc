//! # Block Registry
//!
//! Static table from a type tag to its default payload, editor and renderer.
//! Built once; lookups never fail: tags without an entry resolve to the
//! "Unknown block type" editor and renderer.
//!
//! New kinds are added by registering one entry. Dispatch never changes.

use crate::data::{BlockData, Payload, RawData};
use crate::editor::{BlockEditor, FieldSpec, SchemaEditor, UnknownBlockEditor};
use crate::kinds;
use crate::markup::Markup;
use crate::render::{BlockRenderer, PlaceholderRenderer, TypedRenderer};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

static GLOBAL: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::builtin()));

static UNKNOWN_EDITOR: UnknownBlockEditor = UnknownBlockEditor;
static PLACEHOLDER: PlaceholderRenderer = PlaceholderRenderer;

/// Registry entry for one block kind
pub struct RegistryEntry {
    pub tag: &'static str,
    /// Name shown in the block picker
    pub label: &'static str,
    default_data: Box<dyn Fn() -> BlockData + Send + Sync>,
    editor: Box<dyn BlockEditor>,
    renderer: Box<dyn BlockRenderer>,
}

impl RegistryEntry {
    pub fn new(
        tag: &'static str,
        label: &'static str,
        default_data: impl Fn() -> BlockData + Send + Sync + 'static,
        editor: impl BlockEditor + 'static,
        renderer: impl BlockRenderer + 'static,
    ) -> Self {
        Self {
            tag,
            label,
            default_data: Box::new(default_data),
            editor: Box::new(editor),
            renderer: Box::new(renderer),
        }
    }

    /// Entry for a built-in typed payload with a schema-driven editor
    pub fn typed<T: Payload>(
        label: &'static str,
        fields: &'static [FieldSpec],
        render: fn(&T, &mut Markup),
    ) -> Self {
        Self::new(
            T::TAG,
            label,
            || T::default().into_data(),
            SchemaEditor::new(label, fields),
            TypedRenderer::new(render),
        )
    }

    /// Entry for a kind without a typed payload (extension kinds). Its data
    /// is kept as raw JSON starting from `default_data`.
    pub fn untyped(
        tag: &'static str,
        label: &'static str,
        default_data: Value,
        fields: &'static [FieldSpec],
        renderer: impl BlockRenderer + 'static,
    ) -> Self {
        Self::new(
            tag,
            label,
            move || {
                BlockData::Other(RawData {
                    tag: tag.to_string(),
                    data: default_data.clone(),
                })
            },
            SchemaEditor::new(label, fields),
            renderer,
        )
    }

    /// Fresh, independently owned default payload
    pub fn default_data(&self) -> BlockData {
        (self.default_data)()
    }

    pub fn editor(&self) -> &dyn BlockEditor {
        self.editor.as_ref()
    }

    pub fn renderer(&self) -> &dyn BlockRenderer {
        self.renderer.as_ref()
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("tag", &self.tag)
            .field("label", &self.label)
            .finish()
    }
}

/// Tag → entry lookup table
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// Registry with every built-in kind
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for entry in kinds::builtin_entries() {
            registry.register(entry);
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Process-wide built-in registry
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Shared handle to the process-wide registry
    pub fn shared() -> Arc<Registry> {
        GLOBAL.clone()
    }

    /// Add a kind, replacing (and returning) any entry with the same tag
    pub fn register(&mut self, entry: RegistryEntry) -> Option<RegistryEntry> {
        match self.index.get(entry.tag) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position], entry)),
            None => {
                self.index.insert(entry.tag, self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<&RegistryEntry> {
        self.index.get(tag).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// Fresh copy of the kind's canonical default, `None` for unknown tags
    pub fn default_data(&self, tag: &str) -> Option<BlockData> {
        self.get(tag).map(RegistryEntry::default_data)
    }

    /// Editor for `tag`, or the unknown-type editor
    pub fn editor(&self, tag: &str) -> &dyn BlockEditor {
        match self.get(tag) {
            Some(entry) => entry.editor(),
            None => &UNKNOWN_EDITOR,
        }
    }

    /// Renderer for `tag`, or the placeholder renderer
    pub fn renderer(&self, tag: &str) -> &dyn BlockRenderer {
        match self.get(tag) {
            Some(entry) => entry.renderer(),
            None => &PLACEHOLDER,
        }
    }

    /// Entries in registration order (block picker order)
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.tag).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &format!("{} kinds", self.entries.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FieldInput;
    use crate::id::SequentialIds;
    use crate::record::BlockRecord;
    use serde_json::json;

    #[test]
    fn test_builtin_covers_every_typed_payload() {
        let registry = Registry::builtin();
        for tag in BlockData::BUILTIN_TAGS {
            assert!(registry.contains(tag), "missing registry entry for {}", tag);
        }
        assert_eq!(registry.len(), BlockData::BUILTIN_TAGS.len());
    }

    #[test]
    fn test_default_data_matches_tag() {
        let registry = Registry::builtin();
        for entry in registry.entries() {
            assert_eq!(entry.default_data().tag(), entry.tag);
        }
    }

    #[test]
    fn test_default_data_is_a_fresh_copy() {
        let registry = Registry::builtin();
        let mut first = registry.default_data("faq").unwrap();
        let second = registry.default_data("faq").unwrap();

        if let BlockData::Faq(faq) = &mut first {
            faq.title = "Changed".to_string();
            faq.items.clear();
        }

        assert_ne!(first, second);
        assert_eq!(registry.default_data("faq").unwrap(), second);
    }

    #[test]
    fn test_unknown_tag_resolves_to_placeholders() {
        let registry = Registry::builtin();
        assert!(registry.default_data("does-not-exist").is_none());

        let data = BlockData::from_parts("does-not-exist", json!({ "a": 1 }));
        let record = BlockRecord::new(&mut SequentialIds::new("t"), data.clone());

        let form = registry.editor(record.block_type()).form(&record);
        assert!(form.notice.is_some());

        let mut out = Markup::compact();
        registry.renderer(record.block_type()).render(&data, &mut out);
        assert!(out.as_str().contains("Unknown block type"));
    }

    const NOTE_FIELDS: &[FieldSpec] = &[FieldSpec::text("body", "Body")];

    struct NoteRenderer;

    impl BlockRenderer for NoteRenderer {
        fn render(&self, data: &BlockData, out: &mut Markup) {
            let value = data.to_value();
            out.element("aside", &[], value["body"].as_str().unwrap_or(""));
        }
    }

    #[test]
    fn test_register_extension_kind() {
        let mut registry = Registry::builtin();
        let before = registry.len();

        let replaced = registry.register(RegistryEntry::untyped(
            "note",
            "Note",
            json!({ "body": "" }),
            NOTE_FIELDS,
            NoteRenderer,
        ));
        assert!(replaced.is_none());
        assert_eq!(registry.len(), before + 1);

        let data = registry.default_data("note").unwrap();
        let edited = registry
            .editor("note")
            .apply(&data, &FieldInput::new("body", "Remember"))
            .unwrap();
        assert_eq!(edited.tag(), "note");

        let mut out = Markup::compact();
        registry.renderer("note").render(&edited, &mut out);
        assert_eq!(out.as_str(), "<aside>Remember</aside>");
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = Registry::builtin();
        let replaced = registry.register(RegistryEntry::untyped(
            "spacer",
            "Custom spacer",
            json!({}),
            NOTE_FIELDS,
            PlaceholderRenderer,
        ));

        assert_eq!(replaced.map(|entry| entry.label), Some("Spacer"));
        assert_eq!(registry.get("spacer").unwrap().label, "Custom spacer");
        assert_eq!(registry.len(), BlockData::BUILTIN_TAGS.len());
    }

    #[test]
    fn test_global_is_builtin() {
        assert_eq!(Registry::global().tags(), Registry::builtin().tags());
        assert!(std::ptr::eq(Registry::global(), Registry::shared().as_ref()));
    }
}
