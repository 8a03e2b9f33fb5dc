//! # Block Payloads
//!
//! `BlockData` is the tagged union of every block kind's payload. The tag is
//! part of the variant, so a record's type and its data can never disagree.
//!
//! Loading is lenient by construction:
//! - missing fields take the kind's default (the registry default)
//! - a field with the wrong JSON shape falls back to its default alone
//! - unknown keys are kept in each payload's `extra` map
//! - tags this build does not know become [`BlockData::Other`], verbatim

use crate::kinds::{
    ButtonData, ChatData, ContactData, DividerData, FaqData, FeaturesData, FormData,
    GalleryData, HeroData, ImageData, KnowledgeBaseData, MapData, PricingData, SpacerData,
    TestimonialsData, TextData, VideoData,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Payload of a tag this build has no typed shape for (retired kinds,
/// extension kinds). Preserved exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct RawData {
    pub tag: String,
    pub data: Value,
}

/// Implemented by every typed block payload
pub trait Payload: Default + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Type tag stored in the record's `type` field
    const TAG: &'static str;

    fn into_data(self) -> BlockData;

    fn from_data(data: &BlockData) -> Option<&Self>;
}

macro_rules! block_payloads {
    ($($variant:ident($ty:ty) => $tag:literal),+ $(,)?) => {
        /// Tagged union of block payloads
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(from = "TaggedData", into = "TaggedData")]
        pub enum BlockData {
            $($variant($ty),)+
            Other(RawData),
        }

        impl BlockData {
            /// Tags with a typed payload in this build
            pub const BUILTIN_TAGS: &'static [&'static str] = &[$($tag),+];

            pub fn tag(&self) -> &str {
                match self {
                    $(BlockData::$variant(_) => $tag,)+
                    BlockData::Other(raw) => &raw.tag,
                }
            }

            /// Build a payload from a persisted `type` + `data` pair
            pub fn from_parts(tag: &str, data: Value) -> Self {
                match tag {
                    $($tag => BlockData::$variant(parse_payload(tag, data)),)+
                    _ => BlockData::Other(RawData {
                        tag: tag.to_string(),
                        data,
                    }),
                }
            }

            /// Persisted `data` value
            pub fn to_value(&self) -> Value {
                match self {
                    $(BlockData::$variant(payload) => payload_value($tag, payload),)+
                    BlockData::Other(raw) => raw.data.clone(),
                }
            }
        }

        $(
            impl Payload for $ty {
                const TAG: &'static str = $tag;

                fn into_data(self) -> BlockData {
                    BlockData::$variant(self)
                }

                fn from_data(data: &BlockData) -> Option<&Self> {
                    match data {
                        BlockData::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for BlockData {
                fn from(payload: $ty) -> Self {
                    BlockData::$variant(payload)
                }
            }
        )+
    };
}

block_payloads! {
    Hero(HeroData) => "hero",
    Text(TextData) => "text",
    Image(ImageData) => "image",
    Button(ButtonData) => "button",
    Pricing(PricingData) => "pricing",
    Faq(FaqData) => "faq",
    Form(FormData) => "form",
    Chat(ChatData) => "chat",
    KnowledgeBase(KnowledgeBaseData) => "knowledge-base",
    Video(VideoData) => "video",
    Gallery(GalleryData) => "gallery",
    Testimonials(TestimonialsData) => "testimonials",
    Features(FeaturesData) => "features",
    Contact(ContactData) => "contact",
    Map(MapData) => "map",
    Divider(DividerData) => "divider",
    Spacer(SpacerData) => "spacer",
}

impl BlockData {
    pub fn is_builtin(&self) -> bool {
        !matches!(self, BlockData::Other(_))
    }
}

fn parse_payload<T: Payload>(tag: &str, data: Value) -> T {
    match data {
        Value::Null => T::default(),
        Value::Object(_) => serde_json::from_value(data).unwrap_or_else(|err| {
            warn!(block_type = tag, error = %err, "Unreadable block data, using defaults");
            T::default()
        }),
        other => {
            warn!(block_type = tag, found = json_kind(&other), "Block data is not an object, using defaults");
            T::default()
        }
    }
}

fn payload_value<T: Serialize>(tag: &str, payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or_else(|err| {
        warn!(block_type = tag, error = %err, "Failed to serialize block data");
        Value::Object(Map::new())
    })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `{ "type": ..., "data": ... }`, the standalone wire form of a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaggedData {
    #[serde(rename = "type", default)]
    tag: String,
    #[serde(default)]
    data: Value,
}

impl From<TaggedData> for BlockData {
    fn from(tagged: TaggedData) -> Self {
        BlockData::from_parts(&tagged.tag, tagged.data)
    }
}

impl From<BlockData> for TaggedData {
    fn from(data: BlockData) -> Self {
        TaggedData {
            tag: data.tag().to_string(),
            data: data.to_value(),
        }
    }
}

/// Field-level fallback: a value of the wrong shape becomes the default
pub(crate) mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn field<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// Lists keep the items that parse and drop the rest
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_matches_variant() {
        assert_eq!(BlockData::Hero(HeroData::default()).tag(), "hero");
        assert_eq!(
            BlockData::KnowledgeBase(KnowledgeBaseData::default()).tag(),
            "knowledge-base"
        );
    }

    #[test]
    fn test_unknown_tag_is_preserved() {
        let raw = json!({ "legacy": [1, 2, 3], "nested": { "a": true } });
        let data = BlockData::from_parts("retired-widget", raw.clone());

        assert!(!data.is_builtin());
        assert_eq!(data.tag(), "retired-widget");
        assert_eq!(data.to_value(), raw);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let data = BlockData::from_parts("hero", json!({ "title": "Hello" }));

        let BlockData::Hero(hero) = data else {
            panic!("expected hero");
        };
        assert_eq!(hero.title, "Hello");
        assert_eq!(hero.cta_label, HeroData::default().cta_label);
    }

    #[test]
    fn test_wrong_shape_field_falls_back_alone() {
        let data = BlockData::from_parts("hero", json!({ "title": 42, "subtitle": "kept" }));

        let BlockData::Hero(hero) = data else {
            panic!("expected hero");
        };
        assert_eq!(hero.title, "");
        assert_eq!(hero.subtitle, "kept");
    }

    #[test]
    fn test_non_object_data_uses_defaults() {
        let data = BlockData::from_parts("text", json!("oops"));
        assert_eq!(data, BlockData::Text(TextData::default()));
    }

    #[test]
    fn test_extra_keys_round_trip() {
        let raw = json!({ "title": "Hi", "futureField": { "x": 1 } });
        let data = BlockData::from_parts("hero", raw);

        let value = data.to_value();
        assert_eq!(value["futureField"], json!({ "x": 1 }));
        assert_eq!(value["title"], json!("Hi"));
    }

    #[test]
    fn test_tagged_serde_form() {
        let data = BlockData::from_parts("spacer", json!({ "size": "large" }));
        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["type"], "spacer");
        assert_eq!(json["data"]["size"], "large");

        let back: BlockData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_builtin_tags_listed() {
        assert_eq!(BlockData::BUILTIN_TAGS.len(), 17);
        assert!(BlockData::BUILTIN_TAGS.contains(&"pricing"));
    }
}
