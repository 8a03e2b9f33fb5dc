//! Integration tests for the editor crate

use anyhow::Result;
use pagecraft_blocks::kinds::HeroData;
use pagecraft_blocks::SequentialIds;
use pagecraft_editor::{
    BlockData, BlockList, Clipboard, DispatchView, EditorConfig, EditorSession, FieldInput,
    MetaChange, Mutation, NoopReason, Outcome, Registry, Surface,
};
use serde_json::json;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn session() -> EditorSession {
    init_tracing();
    EditorSession::new(EditorConfig::default())
        .with_ids(SequentialIds::new("blk"))
        .with_clipboard(Arc::new(Clipboard::new()))
}

fn add(session: &mut EditorSession, tag: &str) -> Result<pagecraft_editor::BlockId> {
    let result = session.apply(Mutation::AddBlock {
        block_type: tag.to_string(),
    })?;
    Ok(result.created.expect("add creates a block"))
}

#[test]
fn test_build_and_rearrange_page() -> Result<()> {
    let mut session = session();

    let hero = add(&mut session, "hero")?;
    let text = add(&mut session, "text")?;
    assert_eq!(session.list().ids(), vec![hero.clone(), text.clone()]);

    session.apply(Mutation::Reorder { from: 0, to: 1 })?;
    assert_eq!(session.list().ids(), vec![text.clone(), hero.clone()]);

    session.apply(Mutation::RemoveBlock { block_id: hero })?;
    assert_eq!(session.list().ids(), vec![text]);

    let saved: serde_json::Value = serde_json::from_str(&session.save()?)?;
    assert_eq!(saved.as_array().map(Vec::len), Some(1));
    assert_eq!(saved[0]["type"], "text");
    Ok(())
}

#[test]
fn test_new_blocks_get_independent_defaults() -> Result<()> {
    let mut session = session();
    let first = add(&mut session, "hero")?;
    let second = add(&mut session, "hero")?;

    session.apply(Mutation::EditField {
        block_id: first.clone(),
        input: FieldInput::new("title", "Changed"),
    })?;

    let list = session.list();
    assert_eq!(list.get(first.as_str()).unwrap().data.to_value()["title"], "Changed");
    assert_eq!(
        list.get(second.as_str()).unwrap().data,
        BlockData::from(HeroData::default())
    );
    assert_eq!(
        Registry::global().default_data("hero"),
        Some(BlockData::from(HeroData::default()))
    );
    Ok(())
}

#[test]
fn test_stale_operations_are_idempotent_noops() -> Result<()> {
    let mut session = session();
    let id = add(&mut session, "faq")?;
    session.apply(Mutation::RemoveBlock {
        block_id: id.clone(),
    })?;
    let saved = session.save()?;
    let version = session.version();

    for mutation in [
        Mutation::RemoveBlock {
            block_id: id.clone(),
        },
        Mutation::UpdateData {
            block_id: id.clone(),
            data: HeroData::default().into(),
        },
        Mutation::EditField {
            block_id: id.clone(),
            input: FieldInput::new("title", "late"),
        },
        Mutation::UpdateMeta {
            block_id: id.clone(),
            change: MetaChange::Hidden(true),
        },
        Mutation::Duplicate {
            block_id: id.clone(),
        },
        Mutation::ToggleHidden {
            block_id: id.clone(),
        },
    ] {
        let result = session.apply(mutation)?;
        assert_eq!(result.outcome, Outcome::Noop(NoopReason::StaleId));
    }

    assert_eq!(session.save()?, saved);
    assert_eq!(session.version(), version);
    Ok(())
}

#[test]
fn test_copy_paste_round_trip() -> Result<()> {
    let mut session = session();
    let id = add(&mut session, "pricing")?;
    session.apply(Mutation::UpdateMeta {
        block_id: id.clone(),
        change: MetaChange::Spacing(Some(pagecraft_blocks::Spacing::Large)),
    })?;

    session.copy(id.as_str());
    let pasted = session.apply(Mutation::Paste)?.created.unwrap();

    let list = session.list();
    let original = list.get(id.as_str()).unwrap();
    let copy = list.get(pasted.as_str()).unwrap();
    assert_ne!(copy.id, original.id);
    assert!(copy.same_content(original));
    assert_eq!(list.len(), 2);
    Ok(())
}

#[test]
fn test_clipboard_is_shared_between_sessions() -> Result<()> {
    let clipboard = Arc::new(Clipboard::new());
    let mut source = session().with_clipboard(clipboard.clone());
    let mut target = session().with_clipboard(clipboard.clone());

    let id = add(&mut source, "testimonials")?;
    source.copy(id.as_str());

    let result = target.apply(Mutation::Paste)?;
    assert!(result.outcome.is_applied());
    assert_eq!(target.list().at(0).unwrap().block_type(), "testimonials");
    Ok(())
}

#[test]
fn test_empty_clipboard_paste() -> Result<()> {
    let mut session = session();
    let result = session.apply(Mutation::Paste)?;

    assert_eq!(result.outcome, Outcome::Noop(NoopReason::ClipboardEmpty));
    assert!(session.list().is_empty());
    Ok(())
}

#[test]
fn test_anchor_is_sanitized_and_rendered() -> Result<()> {
    let mut session = session();
    let id = add(&mut session, "contact")?;

    session.apply(Mutation::UpdateMeta {
        block_id: id.clone(),
        change: MetaChange::AnchorId(Some("Kontakta Oss!".to_string())),
    })?;

    let record = session.list().get(id.as_str()).unwrap();
    assert_eq!(record.anchor_id.as_deref(), Some("kontakta-oss"));
    assert!(session.preview_html().contains("id=\"kontakta-oss\""));
    Ok(())
}

#[test]
fn test_unknown_type_is_safe_everywhere() -> Result<()> {
    let page = json!([
        { "id": "a", "type": "does-not-exist", "data": { "whatever": [1, 2, 3] }, "hidden": true },
        { "id": "b", "type": "text", "data": { "content": "Hello" } }
    ]);
    let mut session = session();
    session.load(&page.to_string())?;

    let view = DispatchView::new(session.registry());
    let ghost = session.list().get("a").unwrap();
    for editing in [true, false] {
        assert!(matches!(view.render(ghost, editing), Surface::Placeholder { .. }));
    }

    let html = session.preview_html();
    assert!(html.contains("<p>Hello</p>"));

    let saved: serde_json::Value = serde_json::from_str(&session.save()?)?;
    assert_eq!(saved[0], page[0]);
    Ok(())
}

#[test]
fn test_hidden_blocks_stay_in_editor_but_not_public_html() -> Result<()> {
    let mut session = session();
    let id = add(&mut session, "hero")?;
    session.apply(Mutation::ToggleHidden {
        block_id: id.clone(),
    })?;

    let views = session.views();
    assert_eq!(views.len(), 1);
    assert!(views[0].hidden);
    assert!(!session.preview_html().contains("block-hero"));
    Ok(())
}

#[test]
fn test_save_is_a_snapshot() -> Result<()> {
    let mut session = session();
    add(&mut session, "divider")?;

    let saved = session.save()?;
    add(&mut session, "spacer")?;

    let reloaded = BlockList::from_json(&saved, &mut SequentialIds::new("x"))?;
    assert_eq!(reloaded.len(), 1);
    Ok(())
}

#[test]
fn test_config_from_directory_drives_session() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("pagecraft-session-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    std::fs::write(
        dir.join(pagecraft_editor::DEFAULT_CONFIG_NAME),
        r#"{ "undoLevels": 2, "html": { "fragment": true } }"#,
    )?;

    let config = EditorConfig::load(&dir)?;
    std::fs::remove_dir_all(&dir)?;

    let mut session = EditorSession::new(config).with_ids(SequentialIds::new("c"));
    for _ in 0..4 {
        add(&mut session, "spacer")?;
    }

    assert!(session.undo());
    assert!(session.undo());
    assert!(!session.undo());
    assert!(session.preview_html().starts_with("<section"));
    Ok(())
}
