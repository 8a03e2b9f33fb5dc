//! # Block Records
//!
//! The persisted shape of one block and of a page:
//!
//! ```json
//! [{ "id": "…", "type": "hero", "data": { … },
//!    "spacing": "large", "animation": "fade-in",
//!    "anchorId": "welcome", "hidden": true }]
//! ```
//!
//! Presentation fields are omitted when unset. Loading never fails on a
//! single record's content; only a top level that is not an array is an error.

use crate::data::{lenient, BlockData};
use crate::errors::BlockError;
use crate::id::{BlockId, IdGenerator};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

select_options! {
    /// Vertical padding preset
    pub enum Spacing {
        None => "none",
        Small => "small",
        #[default]
        Medium => "medium",
        Large => "large",
        XLarge => "xlarge",
    }
}

select_options! {
    /// Entrance animation preset
    pub enum Animation {
        #[default]
        None => "none",
        FadeIn => "fade-in",
        SlideUp => "slide-up",
        SlideLeft => "slide-left",
        SlideRight => "slide-right",
        ZoomIn => "zoom-in",
    }
}

/// One block on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord", into = "RawRecord")]
pub struct BlockRecord {
    pub id: BlockId,
    pub data: BlockData,
    pub spacing: Option<Spacing>,
    pub animation: Option<Animation>,
    pub anchor_id: Option<String>,
    pub hidden: bool,
}

impl BlockRecord {
    /// New visible record with a fresh id and no presentation metadata
    pub fn new(ids: &mut dyn IdGenerator, data: BlockData) -> Self {
        Self::with_id(ids.next_id(), data)
    }

    pub fn with_id(id: BlockId, data: BlockData) -> Self {
        Self {
            id,
            data,
            spacing: None,
            animation: None,
            anchor_id: None,
            hidden: false,
        }
    }

    pub fn block_type(&self) -> &str {
        self.data.tag()
    }

    /// Same content and metadata under a fresh id
    pub fn duplicate(&self, ids: &mut dyn IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            ..self.clone()
        }
    }

    /// Equal in everything but the id
    pub fn same_content(&self, other: &BlockRecord) -> bool {
        self.data == other.data
            && self.spacing == other.spacing
            && self.animation == other.animation
            && self.anchor_id == other.anchor_id
            && self.hidden == other.hidden
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor_id = Some(anchor.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default, deserialize_with = "lenient::field")]
    id: BlockId,

    #[serde(rename = "type", default, deserialize_with = "lenient::field")]
    block_type: String,

    #[serde(default = "empty_object")]
    data: Value,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "preset"
    )]
    spacing: Option<Spacing>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "preset"
    )]
    animation: Option<Animation>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::field"
    )]
    anchor_id: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        deserialize_with = "lenient::field"
    )]
    hidden: bool,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Presentation presets: unrecognised values are dropped, not fatal
fn preset<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!(value = %value, "Dropping unrecognised presentation preset");
                None
            }
        },
    })
}

impl From<RawRecord> for BlockRecord {
    fn from(raw: RawRecord) -> Self {
        BlockRecord {
            id: raw.id,
            data: BlockData::from_parts(&raw.block_type, raw.data),
            spacing: raw.spacing,
            animation: raw.animation,
            anchor_id: raw.anchor_id,
            hidden: raw.hidden,
        }
    }
}

impl From<BlockRecord> for RawRecord {
    fn from(record: BlockRecord) -> Self {
        RawRecord {
            block_type: record.data.tag().to_string(),
            data: record.data.to_value(),
            id: record.id,
            spacing: record.spacing,
            animation: record.animation,
            anchor_id: record.anchor_id,
            hidden: record.hidden,
        }
    }
}

/// Parse a persisted page (a JSON array of records)
pub fn load_page(json: &str) -> Result<Vec<BlockRecord>, BlockError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(BlockError::NotAnArray(crate::data::json_kind(&value)));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<BlockRecord>(item) {
            Ok(record) => records.push(record),
            Err(err) => {
                // Only non-object entries end up here
                warn!(index, error = %err, "Skipping page entry that is not a block");
            }
        }
    }
    Ok(records)
}

/// Serialize a page to its persisted JSON form
pub fn save_page(records: &[BlockRecord]) -> Result<String, BlockError> {
    Ok(serde_json::to_string(records)?)
}
