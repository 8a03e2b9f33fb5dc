//! Loading and saving whole pages
//!
//! This tests:
//! - Lossless save of what was loaded (known and unknown kinds)
//! - Defaults filled in for partial records
//! - Editing through the registry keeps the record's type

use pagecraft_blocks::{
    load_page, save_page, BlockData, BlockRecord, FieldInput, Markup, Registry, SequentialIds,
    Spacing,
};
use serde_json::{json, Value};

fn legacy_page() -> Value {
    json!([
        {
            "id": "b1",
            "type": "hero",
            "data": { "title": "Spring sale", "ctaUrl": "/sale", "campaign": "spring" },
            "spacing": "large",
            "anchorId": "top"
        },
        {
            "id": "b2",
            "type": "countdown",
            "data": { "until": "2024-04-01T00:00:00Z", "style": { "color": "red" } },
            "hidden": true
        },
        {
            "id": "b3",
            "type": "faq",
            "data": { "items": [{ "question": "Shipping?", "answer": "Two days." }] },
            "animation": "fade-in"
        }
    ])
}

#[test]
fn test_unknown_kinds_survive_a_round_trip() -> anyhow::Result<()> {
    let records = load_page(&legacy_page().to_string())?;
    assert_eq!(records.len(), 3);

    let saved: Value = serde_json::from_str(&save_page(&records)?)?;
    assert_eq!(saved[1], legacy_page()[1]);
    assert_eq!(saved[0]["data"]["campaign"], "spring");
    assert_eq!(saved[0]["spacing"], "large");
    Ok(())
}

#[test]
fn test_partial_records_get_kind_defaults() -> anyhow::Result<()> {
    let records = load_page(&legacy_page().to_string())?;

    let BlockData::Hero(hero) = &records[0].data else {
        panic!("expected hero");
    };
    assert_eq!(hero.title, "Spring sale");
    assert_eq!(hero.cta_label, "Get started");
    assert_eq!(records[0].spacing, Some(Spacing::Large));

    let BlockData::Faq(faq) = &records[2].data else {
        panic!("expected faq");
    };
    assert_eq!(faq.title, "Frequently asked questions");
    assert_eq!(faq.items.len(), 1);
    assert_eq!(faq.items[0].answer.plain_text(), "Two days.");
    Ok(())
}

#[test]
fn test_every_kind_edits_and_renders() -> anyhow::Result<()> {
    let registry = Registry::global();
    let mut ids = SequentialIds::new("k");

    for entry in registry.entries() {
        let record = BlockRecord::new(&mut ids, entry.default_data());
        let form = entry.editor().form(&record);
        assert_eq!(form.block_type, entry.tag);
        assert!(!form.fields.is_empty(), "{} has no editable fields", entry.tag);

        // Writing a field back with its own value must not change the payload
        let first = &form.fields[0];
        let unchanged = entry
            .editor()
            .apply(&record.data, &FieldInput::new(first.spec.key, first.value.clone()))?;
        assert_eq!(unchanged, record.data, "{} changed on a no-op edit", entry.tag);

        let mut out = Markup::compact();
        entry.renderer().render(&record.data, &mut out);
        assert!(
            out.as_str().contains(&format!("block-{}", entry.tag)),
            "{} rendered without its class",
            entry.tag
        );
    }
    Ok(())
}

#[test]
fn test_unknown_kind_renders_placeholder() -> anyhow::Result<()> {
    let records = load_page(&legacy_page().to_string())?;
    let registry = Registry::global();

    let mut out = Markup::compact();
    registry
        .renderer(records[1].block_type())
        .render(&records[1].data, &mut out);

    assert!(out.as_str().contains("Unknown block type: countdown"));
    Ok(())
}

#[test]
fn test_unknown_item_keys_survive_a_round_trip() -> anyhow::Result<()> {
    let page = json!([
        {
            "id": "f1",
            "type": "faq",
            "data": {
                "items": [{ "question": "a?", "answer": "b", "id": "item-1", "open": true }]
            }
        },
        {
            "id": "p1",
            "type": "pricing",
            "data": {
                "tiers": [{ "name": "Pro", "badge": { "text": "Popular" } }]
            }
        }
    ]);

    let records = load_page(&page.to_string())?;
    let saved: Value = serde_json::from_str(&save_page(&records)?)?;

    let item = &saved[0]["data"]["items"][0];
    assert_eq!(item["id"], "item-1");
    assert_eq!(item["open"], true);
    assert_eq!(item["question"], "a?");
    assert_eq!(saved[1]["data"]["tiers"][0]["badge"], json!({ "text": "Popular" }));
    Ok(())
}
