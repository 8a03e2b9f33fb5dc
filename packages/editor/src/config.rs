use crate::EditorError;
use pagecraft_compiler_html::CompileOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// What happens when a block takes an anchor another block already uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnchorPolicy {
    /// Keep the anchor and report the conflict
    #[default]
    Warn,
    /// Append `-2`, `-3`, ... until the anchor is unique
    Suffix,
    /// Keep the anchor silently
    Ignore,
}

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum undo levels (0 = unlimited)
    pub undo_levels: usize,

    pub anchor_policy: AnchorPolicy,

    /// Pointer travel (px) before a press becomes a drag
    pub drag_activation_distance: f64,

    /// Preview rendering
    pub html: HtmlConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_levels: 100,
            anchor_policy: AnchorPolicy::Warn,
            drag_activation_distance: 8.0,
            html: HtmlConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlConfig {
    pub pretty: bool,
    pub document_title: String,
    pub fragment: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            document_title: "Preview".to_string(),
            fragment: false,
        }
    }
}

impl HtmlConfig {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            pretty: self.pretty,
            title: self.document_title.clone(),
            fragment: self.fragment,
            ..CompileOptions::default()
        }
    }
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when the file
    /// does not exist
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }
}
