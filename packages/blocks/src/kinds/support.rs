//! Customer support widgets: the chat launcher and the knowledge-base list.
//! Both render a mount point that the public site's widget script fills in.

use super::class_list;
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

select_options! {
    pub enum ChatPosition {
        #[default]
        BottomRight => "bottom-right",
        BottomLeft => "bottom-left",
    }
}

/// Floating chat launcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::field")]
    pub greeting: String,
    #[serde(deserialize_with = "lenient::field")]
    pub button_label: String,
    #[serde(deserialize_with = "lenient::field")]
    pub position: ChatPosition,
    #[serde(deserialize_with = "lenient::field")]
    pub accent_color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ChatData {
    fn default() -> Self {
        Self {
            title: "Chat with us".to_string(),
            greeting: "Hi! How can we help you today?".to_string(),
            button_label: "Start chat".to_string(),
            position: ChatPosition::BottomRight,
            accent_color: "#2563eb".to_string(),
            extra: Map::new(),
        }
    }
}

impl ChatData {
    /// `#rgb` or `#rrggbb`, otherwise the default accent
    pub fn accent(&self) -> &str {
        let color = self.accent_color.trim();
        let hex = color.strip_prefix('#').unwrap_or_default();
        if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            color
        } else {
            "#2563eb"
        }
    }
}

const CHAT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::text_area("greeting", "Greeting"),
    FieldSpec::text("buttonLabel", "Button label"),
    FieldSpec::select("position", "Position", ChatPosition::OPTIONS),
    FieldSpec::text("accentColor", "Accent color"),
];

fn render_chat(chat: &ChatData, out: &mut Markup) {
    let style = format!("--accent: {}", chat.accent());
    out.open(
        "div",
        &[
            ("class", &class_list("chat", &[chat.position.as_str()])),
            ("data-widget", "chat"),
            ("data-title", &chat.title),
            ("data-greeting", &chat.greeting),
            ("style", &style),
        ],
    );
    out.element("button", &[("type", "button")], &chat.button_label);
    out.close("div");
}

pub(super) fn chat_entry() -> RegistryEntry {
    RegistryEntry::typed::<ChatData>("Chat", CHAT_FIELDS, render_chat)
}

select_options! {
    pub enum KnowledgeBaseLayout {
        #[default]
        List => "list",
        Grid => "grid",
    }
}

/// Help-center article list, filtered by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KnowledgeBaseData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    /// Empty means every category
    #[serde(deserialize_with = "lenient::list")]
    pub category_ids: Vec<String>,
    #[serde(deserialize_with = "lenient::field")]
    pub show_search: bool,
    #[serde(deserialize_with = "lenient::field")]
    pub max_articles: u32,
    #[serde(deserialize_with = "lenient::field")]
    pub layout: KnowledgeBaseLayout,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for KnowledgeBaseData {
    fn default() -> Self {
        Self {
            title: "Help center".to_string(),
            category_ids: Vec::new(),
            show_search: true,
            max_articles: 10,
            layout: KnowledgeBaseLayout::List,
            extra: Map::new(),
        }
    }
}

impl KnowledgeBaseData {
    pub fn article_limit(&self) -> u32 {
        self.max_articles.clamp(1, 50)
    }
}

const KNOWLEDGE_BASE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::string_list("categoryIds", "Categories"),
    FieldSpec::toggle("showSearch", "Show search"),
    FieldSpec::number("maxArticles", "Articles shown", 1, 50),
    FieldSpec::select("layout", "Layout", KnowledgeBaseLayout::OPTIONS),
];

fn render_knowledge_base(kb: &KnowledgeBaseData, out: &mut Markup) {
    let categories = kb.category_ids.join(",");
    let limit = kb.article_limit().to_string();
    out.open(
        "section",
        &[
            ("class", &class_list("knowledge-base", &[kb.layout.as_str()])),
            ("data-widget", "knowledge-base"),
            ("data-categories", &categories),
            ("data-limit", &limit),
        ],
    );
    out.element_if("h2", &[], &kb.title);
    if kb.show_search {
        out.void(
            "input",
            &[
                ("type", "search"),
                ("class", "block-knowledge-base__search"),
                ("placeholder", "Search articles"),
            ],
        );
    }
    out.close("section");
}

pub(super) fn knowledge_base_entry() -> RegistryEntry {
    RegistryEntry::typed::<KnowledgeBaseData>(
        "Knowledge base",
        KNOWLEDGE_BASE_FIELDS,
        render_knowledge_base,
    )
}
