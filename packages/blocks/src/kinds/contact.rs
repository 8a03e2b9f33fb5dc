use super::class_list;
use crate::data::lenient;
use crate::editor::FieldSpec;
use crate::markup::{escape_html, Markup};
use crate::registry::RegistryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Contact details card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactData {
    #[serde(deserialize_with = "lenient::field")]
    pub title: String,
    #[serde(deserialize_with = "lenient::field")]
    pub email: String,
    #[serde(deserialize_with = "lenient::field")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::field")]
    pub address: String,
    #[serde(deserialize_with = "lenient::field")]
    pub opening_hours: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ContactData {
    fn default() -> Self {
        Self {
            title: "Get in touch".to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            opening_hours: String::new(),
            extra: Map::new(),
        }
    }
}

const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::text("email", "Email"),
    FieldSpec::text("phone", "Phone"),
    FieldSpec::text_area("address", "Address"),
    FieldSpec::text_area("openingHours", "Opening hours"),
];

fn render_contact(contact: &ContactData, out: &mut Markup) {
    out.open("address", &[("class", &class_list("contact", &[]))]);
    out.element_if("h2", &[], &contact.title);
    if !contact.email.trim().is_empty() {
        let href = format!("mailto:{}", contact.email.trim());
        out.element("a", &[("href", &href)], &contact.email);
    }
    if !contact.phone.trim().is_empty() {
        let digits: String = contact
            .phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        out.element("a", &[("href", &format!("tel:{}", digits))], &contact.phone);
    }
    multiline(out, "block-contact__address", &contact.address);
    multiline(out, "block-contact__hours", &contact.opening_hours);
    out.close("address");
}

/// Paragraph with `<br />` between lines
fn multiline(out: &mut Markup, class: &str, text: &str) {
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(escape_html)
        .collect();
    if !lines.is_empty() {
        out.add_line(&format!("<p class=\"{}\">{}</p>", class, lines.join("<br />")));
    }
}

pub(super) fn contact_entry() -> RegistryEntry {
    RegistryEntry::typed::<ContactData>("Contact", CONTACT_FIELDS, render_contact)
}

select_options! {
    pub enum MapHeight {
        Small => "small",
        #[default]
        Medium => "medium",
        Large => "large",
    }
}

/// Embedded map for an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapData {
    #[serde(deserialize_with = "lenient::field")]
    pub address: String,
    #[serde(deserialize_with = "lenient::field")]
    pub zoom: u8,
    #[serde(deserialize_with = "lenient::field")]
    pub height: MapHeight,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for MapData {
    fn default() -> Self {
        Self {
            address: String::new(),
            zoom: 14,
            height: MapHeight::Medium,
            extra: Map::new(),
        }
    }
}

impl MapData {
    pub fn zoom_level(&self) -> u8 {
        self.zoom.clamp(1, 20)
    }

    /// Embed url for the configured address
    pub fn embed_url(&self) -> Option<String> {
        let address = self.address.trim();
        if address.is_empty() {
            return None;
        }
        Some(format!(
            "https://maps.google.com/maps?q={}&z={}&output=embed",
            encode_query(address),
            self.zoom_level()
        ))
    }
}

fn encode_query(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            other => encoded.push_str(&format!("%{:02X}", other)),
        }
    }
    encoded
}

const MAP_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("address", "Address"),
    FieldSpec::number("zoom", "Zoom", 1, 20),
    FieldSpec::select("height", "Height", MapHeight::OPTIONS),
];

fn render_map(map: &MapData, out: &mut Markup) {
    out.open(
        "div",
        &[("class", &class_list("map", &[map.height.as_str()]))],
    );
    match map.embed_url() {
        Some(src) => out.add_line(&format!(
            "<iframe src=\"{}\" title=\"{}\" loading=\"lazy\"></iframe>",
            escape_html(&src),
            escape_html(&map.address)
        )),
        None => out.element("div", &[("class", "block-map__empty")], "No address set"),
    }
    out.close("div");
}

pub(super) fn map_entry() -> RegistryEntry {
    RegistryEntry::typed::<MapData>("Map", MAP_FIELDS, render_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_links() {
        let contact = ContactData {
            email: "hello@example.com".to_string(),
            phone: "+46 (0)8 123 45".to_string(),
            address: "Main street 1\n\n123 45 Town".to_string(),
            ..ContactData::default()
        };

        let mut out = Markup::compact();
        render_contact(&contact, &mut out);
        let html = out.into_string();

        assert!(html.contains("href=\"mailto:hello@example.com\""));
        assert!(html.contains("href=\"tel:+460812345\""));
        assert!(html.contains("Main street 1<br />123 45 Town"));
    }

    #[test]
    fn test_map_embed_url() {
        let map = MapData {
            address: "Storgatan 1, Umeå".to_string(),
            zoom: 99,
            ..MapData::default()
        };

        assert_eq!(
            map.embed_url().as_deref(),
            Some("https://maps.google.com/maps?q=Storgatan+1%2C+Ume%C3%A5&z=20&output=embed")
        );
        assert_eq!(MapData::default().embed_url(), None);
    }
}
