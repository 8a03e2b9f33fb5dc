use super::{class_list, safe_href};
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::Markup;
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Single image with optional caption and link
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageData {
    #[serde(deserialize_with = "lenient::field")]
    pub url: String,
    #[serde(deserialize_with = "lenient::field")]
    pub alt: String,
    #[serde(deserialize_with = "lenient::field")]
    pub caption: String,
    #[serde(deserialize_with = "lenient::field")]
    pub link_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const IMAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::image("url", "Image"),
    FieldSpec::text("alt", "Alt text"),
    FieldSpec::text("caption", "Caption"),
    FieldSpec::url("linkUrl", "Link"),
];

fn render_image(image: &ImageData, out: &mut Markup) {
    out.open("figure", &[("class", &class_list("image", &[]))]);
    if image.url.is_empty() {
        out.element("div", &[("class", "block-image__empty")], "No image selected");
    } else {
        let img = [("src", safe_href(&image.url)), ("alt", image.alt.as_str())];
        if image.link_url.is_empty() {
            out.void("img", &img);
        } else {
            out.open("a", &[("href", safe_href(&image.link_url))]);
            out.void("img", &img);
            out.close("a");
        }
    }
    out.element_if("figcaption", &[], &image.caption);
    out.close("figure");
}

pub(super) fn image_entry() -> RegistryEntry {
    RegistryEntry::typed::<ImageData>("Image", IMAGE_FIELDS, render_image)
}

/// Embedded video (YouTube, Vimeo or a direct file url)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoData {
    #[serde(deserialize_with = "lenient::field")]
    pub url: String,
    #[serde(deserialize_with = "lenient::field")]
    pub caption: String,
    #[serde(deserialize_with = "lenient::field")]
    pub autoplay: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VideoData {
    /// Embeddable player url for the known hosts, the url itself otherwise
    pub fn embed_url(&self) -> Option<String> {
        let url = self.url.trim();
        if url.is_empty() || !crate::markup::is_safe_url(url) {
            return None;
        }

        if let Some(id) = youtube_id(url) {
            return Some(format!("https://www.youtube.com/embed/{}", id));
        }
        if let Some(id) = url
            .strip_prefix("https://vimeo.com/")
            .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        {
            return Some(format!("https://player.vimeo.com/video/{}", id));
        }
        Some(url.to_string())
    }
}

fn youtube_id(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://www.youtube.com/watch?v=")
        .or_else(|| url.strip_prefix("https://youtube.com/watch?v="))
        .or_else(|| url.strip_prefix("https://youtu.be/"))?;
    let id = rest.split(['&', '?', '#']).next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

const VIDEO_FIELDS: &[FieldSpec] = &[
    FieldSpec::url("url", "Video link"),
    FieldSpec::text("caption", "Caption"),
    FieldSpec::toggle("autoplay", "Autoplay"),
];

fn render_video(video: &VideoData, out: &mut Markup) {
    out.open("figure", &[("class", &class_list("video", &[]))]);
    match video.embed_url() {
        Some(src) => {
            let src = if video.autoplay {
                let separator = if src.contains('?') { '&' } else { '?' };
                format!("{}{}autoplay=1&mute=1", src, separator)
            } else {
                src
            };
            out.add_line(&format!(
                "<iframe src=\"{}\" allowfullscreen loading=\"lazy\"></iframe>",
                crate::markup::escape_attr(&src)
            ));
        }
        None => out.element("div", &[("class", "block-video__empty")], "No video selected"),
    }
    out.element_if("figcaption", &[], &video.caption);
    out.close("figure");
}

pub(super) fn video_entry() -> RegistryEntry {
    RegistryEntry::typed::<VideoData>("Video", VIDEO_FIELDS, render_video)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    #[serde(deserialize_with = "lenient::field")]
    pub url: String,
    #[serde(deserialize_with = "lenient::field")]
    pub alt: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Grid of images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryData {
    #[serde(deserialize_with = "lenient::list")]
    pub images: Vec<GalleryImage>,
    #[serde(deserialize_with = "lenient::field")]
    pub columns: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for GalleryData {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            columns: 3,
            extra: Map::new(),
        }
    }
}

impl GalleryData {
    pub fn column_count(&self) -> u8 {
        self.columns.clamp(1, 6)
    }
}

const GALLERY_IMAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::image("url", "Image"),
    FieldSpec::text("alt", "Alt text"),
];

const GALLERY_FIELDS: &[FieldSpec] = &[
    FieldSpec::list("images", "Images", GALLERY_IMAGE_FIELDS),
    FieldSpec::number("columns", "Columns", 1, 6),
];

fn render_gallery(gallery: &GalleryData, out: &mut Markup) {
    let columns = gallery.column_count().to_string();
    out.open(
        "div",
        &[
            ("class", &class_list("gallery", &[])),
            ("data-columns", &columns),
        ],
    );
    for image in gallery.images.iter().filter(|image| !image.url.is_empty()) {
        out.void(
            "img",
            &[("src", safe_href(&image.url)), ("alt", &image.alt), ("loading", "lazy")],
        );
    }
    out.close("div");
}

pub(super) fn gallery_entry() -> RegistryEntry {
    RegistryEntry::typed::<GalleryData>("Gallery", GALLERY_FIELDS, render_gallery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BlockData;
    use serde_json::json;

    #[test]
    fn test_embed_urls() {
        let video = |url: &str| VideoData {
            url: url.to_string(),
            ..VideoData::default()
        };

        assert_eq!(
            video("https://www.youtube.com/watch?v=abc123&t=10").embed_url().as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
        assert_eq!(
            video("https://youtu.be/xyz").embed_url().as_deref(),
            Some("https://www.youtube.com/embed/xyz")
        );
        assert_eq!(
            video("https://vimeo.com/42").embed_url().as_deref(),
            Some("https://player.vimeo.com/video/42")
        );
        assert_eq!(video("").embed_url(), None);
        assert_eq!(video("javascript:alert(1)").embed_url(), None);
    }

    #[test]
    fn test_gallery_drops_malformed_images() {
        let data = BlockData::from_parts(
            "gallery",
            json!({ "images": [{ "url": "a.jpg" }, "junk", { "url": "b.jpg", "alt": "B" }], "columns": 40 }),
        );
        let BlockData::Gallery(gallery) = data else {
            panic!("expected gallery");
        };

        assert_eq!(gallery.images.len(), 2);
        assert_eq!(gallery.column_count(), 6);
    }

    #[test]
    fn test_linked_image() {
        let image = ImageData {
            url: "a.jpg".to_string(),
            alt: "A".to_string(),
            link_url: "/about".to_string(),
            ..ImageData::default()
        };

        let mut out = Markup::compact();
        render_image(&image, &mut out);
        assert_eq!(
            out.as_str(),
            "<figure class=\"block-image\"><a href=\"/about\"><img src=\"a.jpg\" alt=\"A\" /></a></figure>"
        );
    }
}
