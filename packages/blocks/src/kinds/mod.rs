//! Built-in block kinds
//!
//! Each kind module owns its payload type (with the canonical defaults in
//! its `Default` impl), its editor field schema and its renderer, and
//! exposes them as one [`RegistryEntry`] through `entry()`.

use crate::registry::RegistryEntry;

mod button;
mod contact;
mod faq;
mod form;
mod hero;
mod layout;
mod media;
mod pricing;
mod showcase;
mod support;
mod text;

pub use button::{ButtonData, ButtonVariant};
pub use contact::{ContactData, MapData, MapHeight};
pub use faq::{FaqData, FaqItem};
pub use form::{FormData, FormInput, InputKind};
pub use hero::HeroData;
pub use layout::{DividerData, DividerStyle, DividerWidth, SpacerData, SpacerSize};
pub use media::{GalleryData, GalleryImage, ImageData, VideoData};
pub use pricing::{PricingData, PricingTier};
pub use showcase::{FeatureItem, FeaturesData, Testimonial, TestimonialsData};
pub use support::{ChatData, ChatPosition, KnowledgeBaseData, KnowledgeBaseLayout};
pub use text::TextData;

select_options! {
    /// Horizontal alignment shared by several kinds
    pub enum Alignment {
        Left => "left",
        #[default]
        Center => "center",
        Right => "right",
    }
}

/// Registry entries for every built-in kind, in block picker order
pub fn builtin_entries() -> Vec<RegistryEntry> {
    vec![
        hero::entry(),
        text::entry(),
        media::image_entry(),
        button::entry(),
        pricing::entry(),
        faq::entry(),
        form::entry(),
        support::chat_entry(),
        support::knowledge_base_entry(),
        media::video_entry(),
        media::gallery_entry(),
        showcase::testimonials_entry(),
        showcase::features_entry(),
        contact::contact_entry(),
        contact::map_entry(),
        layout::divider_entry(),
        layout::spacer_entry(),
    ]
}

/// `block-<kind>` plus optional modifier classes
pub(crate) fn class_list(kind: &str, modifiers: &[&str]) -> String {
    let mut classes = format!("block-{}", kind);
    for modifier in modifiers.iter().filter(|m| !m.is_empty()) {
        classes.push(' ');
        classes.push_str(&format!("block-{}--{}", kind, modifier));
    }
    classes
}

/// Link target, with unsafe schemes replaced by `#`
pub(crate) fn safe_href(url: &str) -> &str {
    if url.trim().is_empty() || !crate::markup::is_safe_url(url) {
        "#"
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list() {
        assert_eq!(class_list("hero", &[]), "block-hero");
        assert_eq!(
            class_list("hero", &["left", "", "overlay"]),
            "block-hero block-hero--left block-hero--overlay"
        );
    }

    #[test]
    fn test_safe_href() {
        assert_eq!(safe_href("https://a.test"), "https://a.test");
        assert_eq!(safe_href(""), "#");
        assert_eq!(safe_href("javascript:alert(1)"), "#");
    }
}
