//! # Block List Controller
//!
//! A page's ordered blocks as an immutable value. Every operation returns a
//! new list and leaves `self` untouched; records nobody changed are shared
//! between the old and new list through `Arc`.
//!
//! Operations that reference a block by id never fail on a stale id: the UI
//! may race (an editor callback landing after its block was deleted), so a
//! missing id is a no-op reported through [`Outcome::Noop`].

use crate::clipboard::Clipboard;
use crate::EditorError;
use pagecraft_blocks::{
    load_page, sanitize_anchor, save_page, Animation, BlockData, BlockId, BlockRecord,
    IdGenerator, Registry, Spacing,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Why an operation left the list as it was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoopReason {
    /// No block with that id (deleted concurrently)
    StaleId,
    /// Reorder onto the block's own position
    SameIndex,
    /// Index outside the list
    OutOfBounds,
    /// Replacement data of a different block type
    TypeMismatch,
    ClipboardEmpty,
    /// The change would not alter the block
    Unchanged,
}

impl NoopReason {
    /// Short message for the UI
    pub fn message(&self) -> &'static str {
        match self {
            NoopReason::StaleId => "That block no longer exists",
            NoopReason::SameIndex => "Block is already in that position",
            NoopReason::OutOfBounds => "Position is outside the page",
            NoopReason::TypeMismatch => "Data belongs to a different block type",
            NoopReason::ClipboardEmpty => "Nothing to paste",
            NoopReason::Unchanged => "Nothing changed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "camelCase")]
pub enum Outcome {
    Applied,
    Noop(NoopReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Result of a list operation: the next list and what happened
#[derive(Debug, Clone)]
pub struct ListUpdate {
    pub list: BlockList,
    pub outcome: Outcome,
    /// Id of the block the operation created, if any
    pub created: Option<BlockId>,
}

impl ListUpdate {
    fn applied(list: BlockList) -> Self {
        Self {
            list,
            outcome: Outcome::Applied,
            created: None,
        }
    }

    fn created(list: BlockList, id: BlockId) -> Self {
        Self {
            list,
            outcome: Outcome::Applied,
            created: Some(id),
        }
    }

    pub(crate) fn noop(list: &BlockList, reason: NoopReason) -> Self {
        Self {
            list: list.clone(),
            outcome: Outcome::Noop(reason),
            created: None,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome.is_applied()
    }
}

/// One presentation field of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum MetaChange {
    Spacing(Option<Spacing>),
    Animation(Option<Animation>),
    /// Sanitized on apply; an empty result clears the anchor
    AnchorId(Option<String>),
    Hidden(bool),
}

/// Blocks sharing one anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorConflict {
    pub anchor: String,
    pub block_ids: Vec<BlockId>,
}

/// Ordered, immutable list of a page's blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockList {
    records: Vec<Arc<BlockRecord>>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted records, re-minting empty and duplicate ids so
    /// that every id in the list is unique
    pub fn from_records(records: Vec<BlockRecord>, ids: &mut dyn IdGenerator) -> Self {
        let incoming: HashSet<BlockId> = records.iter().map(|record| record.id.clone()).collect();
        let mut seen = HashSet::new();
        let mut repaired = Vec::with_capacity(records.len());

        for mut record in records {
            if record.id.is_empty() || seen.contains(&record.id) {
                let fresh = mint_unused(ids, |id| incoming.contains(id) || seen.contains(id));
                warn!(old_id = %record.id, new_id = %fresh, "Re-minting missing or duplicate block id");
                record.id = fresh;
            }
            seen.insert(record.id.clone());
            repaired.push(Arc::new(record));
        }

        Self { records: repaired }
    }

    /// Parse a persisted page
    pub fn from_json(json: &str, ids: &mut dyn IdGenerator) -> Result<Self, EditorError> {
        Ok(Self::from_records(load_page(json)?, ids))
    }

    /// Persisted form of the list as of this call
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(save_page(&self.to_records())?)
    }

    pub fn to_records(&self) -> Vec<BlockRecord> {
        self.records.iter().map(|record| (**record).clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockRecord> {
        self.records.iter().map(|record| record.as_ref())
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.iter().map(|record| record.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&BlockRecord> {
        self.iter().find(|record| record.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&BlockRecord> {
        self.records.get(index).map(|record| record.as_ref())
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Append a block of type `tag` with its registry default data
    pub fn add(
        &self,
        registry: &Registry,
        ids: &mut dyn IdGenerator,
        tag: &str,
    ) -> Result<(BlockList, BlockId), EditorError> {
        self.insert(registry, ids, self.len(), tag)
    }

    /// Insert a block of type `tag` at `index` (clamped to the list length)
    pub fn insert(
        &self,
        registry: &Registry,
        ids: &mut dyn IdGenerator,
        index: usize,
        tag: &str,
    ) -> Result<(BlockList, BlockId), EditorError> {
        let data = registry
            .default_data(tag)
            .ok_or_else(|| EditorError::UnknownBlockType(tag.to_string()))?;
        let record = self.claim_id(BlockRecord::new(ids, data), ids);
        let id = record.id.clone();

        let index = index.min(self.len());
        debug!(block_id = %id, block_type = tag, index, "Adding block");
        Ok((self.with_inserted(index, record), id))
    }

    /// Replace a block's data wholesale
    pub fn update(&self, id: &str, data: BlockData) -> ListUpdate {
        let Some(index) = self.position(id) else {
            return self.stale(id, "update");
        };

        let current = &self.records[index];
        if current.block_type() != data.tag() {
            warn!(
                block_id = id,
                expected = current.block_type(),
                found = data.tag(),
                "Ignoring data of a different block type"
            );
            return ListUpdate::noop(self, NoopReason::TypeMismatch);
        }
        if current.data == data {
            return ListUpdate::noop(self, NoopReason::Unchanged);
        }

        let record = BlockRecord {
            data,
            ..(**current).clone()
        };
        debug!(block_id = id, "Updating block data");
        ListUpdate::applied(self.with_replaced(index, record))
    }

    /// Change one presentation field
    pub fn update_meta(&self, id: &str, change: MetaChange) -> ListUpdate {
        let Some(index) = self.position(id) else {
            return self.stale(id, "update_meta");
        };

        let mut record = (*self.records[index]).clone();
        match change {
            MetaChange::Spacing(spacing) => record.spacing = spacing,
            MetaChange::Animation(animation) => record.animation = animation,
            MetaChange::AnchorId(anchor) => {
                record.anchor_id = anchor
                    .map(|anchor| sanitize_anchor(&anchor))
                    .filter(|anchor| !anchor.is_empty());
            }
            MetaChange::Hidden(hidden) => record.hidden = hidden,
        }

        if record == *self.records[index] {
            return ListUpdate::noop(self, NoopReason::Unchanged);
        }
        debug!(block_id = id, "Updating block metadata");
        ListUpdate::applied(self.with_replaced(index, record))
    }

    pub fn toggle_hidden(&self, id: &str) -> ListUpdate {
        match self.get(id) {
            Some(record) => self.update_meta(id, MetaChange::Hidden(!record.hidden)),
            None => self.stale(id, "toggle_hidden"),
        }
    }

    pub fn remove(&self, id: &str) -> ListUpdate {
        let Some(index) = self.position(id) else {
            return self.stale(id, "remove");
        };

        let mut records = self.records.clone();
        records.remove(index);
        debug!(block_id = id, index, "Removing block");
        ListUpdate::applied(Self { records })
    }

    /// Move the block at `from` to `to`, shifting the blocks in between
    pub fn reorder(&self, from: usize, to: usize) -> ListUpdate {
        if from >= self.len() || to >= self.len() {
            return ListUpdate::noop(self, NoopReason::OutOfBounds);
        }
        if from == to {
            return ListUpdate::noop(self, NoopReason::SameIndex);
        }

        let mut records = self.records.clone();
        let record = records.remove(from);
        records.insert(to, record);
        debug!(from, to, "Reordering blocks");
        ListUpdate::applied(Self { records })
    }

    /// Reorder by id: move the block to `index`
    pub fn move_to(&self, id: &str, index: usize) -> ListUpdate {
        match self.position(id) {
            Some(from) => self.reorder(from, index),
            None => self.stale(id, "move_to"),
        }
    }

    /// Copy of the block, with a fresh id, right after the original
    pub fn duplicate(&self, id: &str, ids: &mut dyn IdGenerator) -> ListUpdate {
        let Some(index) = self.position(id) else {
            return self.stale(id, "duplicate");
        };

        let copy = self.claim_id(self.records[index].duplicate(ids), ids);
        let copy_id = copy.id.clone();
        debug!(block_id = id, copy_id = %copy_id, "Duplicating block");
        ListUpdate::created(self.with_inserted(index + 1, copy), copy_id)
    }

    /// Append the clipboard's block under a fresh id
    pub fn paste_from(&self, clipboard: &Clipboard, ids: &mut dyn IdGenerator) -> ListUpdate {
        match clipboard.paste(ids) {
            Some(record) => {
                let record = self.claim_id(record, ids);
                let id = record.id.clone();
                debug!(block_id = %id, "Pasting block");
                ListUpdate::created(self.with_inserted(self.len(), record), id)
            }
            None => ListUpdate::noop(self, NoopReason::ClipboardEmpty),
        }
    }

    /// Anchors used by more than one block, in page order
    pub fn anchor_conflicts(&self) -> Vec<AnchorConflict> {
        let mut order = Vec::new();
        let mut owners: HashMap<&str, Vec<BlockId>> = HashMap::new();

        for record in self.iter() {
            if let Some(anchor) = record.anchor_id.as_deref().filter(|a| !a.is_empty()) {
                let entry = owners.entry(anchor).or_default();
                if entry.is_empty() {
                    order.push(anchor);
                }
                entry.push(record.id.clone());
            }
        }

        order
            .into_iter()
            .filter_map(|anchor| {
                let block_ids = owners.remove(anchor)?;
                (block_ids.len() > 1).then(|| AnchorConflict {
                    anchor: anchor.to_string(),
                    block_ids,
                })
            })
            .collect()
    }

    /// Whether a block other than `except` already uses `anchor`
    pub fn anchor_taken(&self, anchor: &str, except: &str) -> bool {
        self.iter()
            .any(|record| record.id != except && record.anchor_id.as_deref() == Some(anchor))
    }

    /// `base`, or `base-2`, `base-3`, ... whichever no other block uses
    pub fn unique_anchor(&self, base: &str, except: &str) -> String {
        if !self.anchor_taken(base, except) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !self.anchor_taken(candidate, except))
            .unwrap_or_else(|| base.to_string())
    }

    fn stale(&self, id: &str, operation: &str) -> ListUpdate {
        warn!(block_id = id, operation, "Ignoring operation on stale block id");
        ListUpdate::noop(self, NoopReason::StaleId)
    }

    /// Re-mint `record`'s id if a block in this list already has it
    fn claim_id(&self, mut record: BlockRecord, ids: &mut dyn IdGenerator) -> BlockRecord {
        if self.contains(record.id.as_str()) {
            record.id = mint_unused(ids, |id| self.contains(id.as_str()));
        }
        record
    }

    fn with_inserted(&self, index: usize, record: BlockRecord) -> Self {
        let mut records = self.records.clone();
        records.insert(index, Arc::new(record));
        Self { records }
    }

    fn with_replaced(&self, index: usize, record: BlockRecord) -> Self {
        let mut records = self.records.clone();
        records[index] = Arc::new(record);
        Self { records }
    }
}

/// Next id from `ids` that `in_use` rejects
fn mint_unused(ids: &mut dyn IdGenerator, in_use: impl Fn(&BlockId) -> bool) -> BlockId {
    loop {
        let id = ids.next_id();
        if !in_use(&id) {
            return id;
        }
    }
}

impl FromIterator<BlockRecord> for BlockList {
    /// Collects as is; use [`BlockList::from_records`] for untrusted input
    fn from_iter<I: IntoIterator<Item = BlockRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_blocks::kinds::HeroData;
    use pagecraft_blocks::SequentialIds;
    use serde_json::json;

    fn page(tags: &[&str]) -> (BlockList, SequentialIds) {
        let mut ids = SequentialIds::new("b");
        let mut list = BlockList::new();
        for tag in tags {
            list = list.add(Registry::global(), &mut ids, tag).unwrap().0;
        }
        (list, ids)
    }

    fn tags(list: &BlockList) -> Vec<&str> {
        list.iter().map(|record| record.block_type()).collect()
    }

    #[test]
    fn test_add_returns_new_id_and_leaves_input() {
        let (list, mut ids) = page(&["hero"]);
        let (next, id) = list.add(Registry::global(), &mut ids, "text").unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.at(1).unwrap().id, id);
        assert_eq!(next.get(id.as_str()).unwrap().block_type(), "text");
    }

    #[test]
    fn test_add_unknown_type_is_an_error() {
        let (list, mut ids) = page(&[]);
        assert!(matches!(
            list.add(Registry::global(), &mut ids, "does-not-exist"),
            Err(EditorError::UnknownBlockType(_))
        ));
    }

    #[test]
    fn test_insert_clamps_index() {
        let (list, mut ids) = page(&["hero", "text"]);

        let (front, _) = list.insert(Registry::global(), &mut ids, 0, "spacer").unwrap();
        assert_eq!(tags(&front), vec!["spacer", "hero", "text"]);

        let (back, _) = list.insert(Registry::global(), &mut ids, 99, "spacer").unwrap();
        assert_eq!(tags(&back), vec!["hero", "text", "spacer"]);
    }

    #[test]
    fn test_untouched_records_are_shared() {
        let (list, _) = page(&["hero", "text"]);
        let id = list.at(1).unwrap().id.clone();

        let next = list
            .update_meta(id.as_str(), MetaChange::Spacing(Some(Spacing::Large)))
            .list;

        assert!(Arc::ptr_eq(&list.records[0], &next.records[0]));
        assert!(!Arc::ptr_eq(&list.records[1], &next.records[1]));
    }

    #[test]
    fn test_update_replaces_data() {
        let (list, _) = page(&["hero"]);
        let id = list.at(0).unwrap().id.clone();
        let data: BlockData = HeroData {
            title: "New".to_string(),
            ..HeroData::default()
        }
        .into();

        let update = list.update(id.as_str(), data.clone());
        assert!(update.is_applied());
        assert_eq!(update.list.at(0).unwrap().data, data);
        assert_eq!(update.list.at(0).unwrap().id, id);
    }

    #[test]
    fn test_update_rejects_other_type() {
        let (list, _) = page(&["hero"]);
        let id = list.at(0).unwrap().id.clone();

        let update = list.update(id.as_str(), BlockData::from_parts("text", json!({})));
        assert_eq!(update.outcome, Outcome::Noop(NoopReason::TypeMismatch));
        assert_eq!(update.list, list);
    }

    #[test]
    fn test_same_data_is_unchanged() {
        let (list, _) = page(&["hero"]);
        let record = list.at(0).unwrap();

        let update = list.update(record.id.as_str(), record.data.clone());
        assert_eq!(update.outcome, Outcome::Noop(NoopReason::Unchanged));
    }

    #[test]
    fn test_stale_ids_are_noops() {
        let (list, mut ids) = page(&["hero", "text"]);

        for update in [
            list.update("gone", HeroData::default().into()),
            list.update_meta("gone", MetaChange::Hidden(true)),
            list.toggle_hidden("gone"),
            list.remove("gone"),
            list.move_to("gone", 0),
            list.duplicate("gone", &mut ids),
        ] {
            assert_eq!(update.outcome, Outcome::Noop(NoopReason::StaleId));
            assert_eq!(update.list, list);
        }
    }

    #[test]
    fn test_anchor_is_sanitized() {
        let (list, _) = page(&["text"]);
        let id = list.at(0).unwrap().id.clone();

        let next = list
            .update_meta(id.as_str(), MetaChange::AnchorId(Some("Kontakta Oss!".into())))
            .list;
        assert_eq!(next.at(0).unwrap().anchor_id.as_deref(), Some("kontakta-oss"));

        let cleared = next
            .update_meta(id.as_str(), MetaChange::AnchorId(Some("!!!".into())))
            .list;
        assert_eq!(cleared.at(0).unwrap().anchor_id, None);
    }

    #[test]
    fn test_toggle_hidden_keeps_record() {
        let (list, _) = page(&["hero"]);
        let id = list.at(0).unwrap().id.clone();

        let hidden = list.toggle_hidden(id.as_str()).list;
        assert!(hidden.at(0).unwrap().hidden);
        assert_eq!(hidden.len(), 1);

        let shown = hidden.toggle_hidden(id.as_str()).list;
        assert!(!shown.at(0).unwrap().hidden);
    }

    #[test]
    fn test_reorder_moves_and_shifts() {
        let (list, _) = page(&["hero", "text", "faq", "spacer"]);

        let update = list.reorder(0, 2);
        assert!(update.is_applied());
        assert_eq!(tags(&update.list), vec!["text", "faq", "hero", "spacer"]);

        let back = list.reorder(3, 1);
        assert_eq!(tags(&back.list), vec!["hero", "spacer", "text", "faq"]);
    }

    #[test]
    fn test_reorder_noops() {
        let (list, _) = page(&["hero", "text"]);

        assert_eq!(list.reorder(1, 1).outcome, Outcome::Noop(NoopReason::SameIndex));
        assert_eq!(list.reorder(0, 2).outcome, Outcome::Noop(NoopReason::OutOfBounds));
        assert_eq!(list.reorder(5, 0).outcome, Outcome::Noop(NoopReason::OutOfBounds));
    }

    #[test]
    fn test_duplicate_inserts_after_source() {
        let (list, mut ids) = page(&["hero", "text"]);
        let source = list.at(0).unwrap().clone();

        let update = list.duplicate(source.id.as_str(), &mut ids);
        let copy_id = update.created.clone().unwrap();

        assert_eq!(tags(&update.list), vec!["hero", "hero", "text"]);
        assert_eq!(update.list.at(1).unwrap().id, copy_id);
        assert_ne!(copy_id, source.id);
        assert!(update.list.at(1).unwrap().same_content(&source));
    }

    #[test]
    fn test_paste_from_clipboard() {
        let (list, mut ids) = page(&["hero"]);
        let clipboard = Clipboard::new();

        let empty = list.paste_from(&clipboard, &mut ids);
        assert_eq!(empty.outcome, Outcome::Noop(NoopReason::ClipboardEmpty));
        assert_eq!(empty.list.len(), 1);

        clipboard.copy(list.at(0).unwrap());
        let pasted = list.paste_from(&clipboard, &mut ids);
        assert_eq!(pasted.list.len(), 2);
        assert_ne!(pasted.list.at(1).unwrap().id, list.at(0).unwrap().id);
    }

    #[test]
    fn test_from_records_repairs_ids() {
        let json = json!([
            { "id": "a", "type": "text" },
            { "id": "a", "type": "hero" },
            { "type": "spacer" }
        ]);
        let list = BlockList::from_json(&json.to_string(), &mut SequentialIds::new("fix")).unwrap();

        assert_eq!(
            list.ids(),
            vec![BlockId::new("a"), BlockId::new("fix-1"), BlockId::new("fix-2")]
        );
    }

    #[test]
    fn test_repaired_ids_skip_ids_already_on_the_page() {
        let json = json!([
            { "id": "s-1", "type": "text" },
            { "type": "spacer" },
            { "id": "s-2", "type": "hero" }
        ]);
        let mut ids = SequentialIds::new("s");
        let list = BlockList::from_json(&json.to_string(), &mut ids).unwrap();

        assert_eq!(
            list.ids(),
            vec![BlockId::new("s-1"), BlockId::new("s-3"), BlockId::new("s-2")]
        );

        let (list, added) = list.add(Registry::global(), &mut SequentialIds::new("s"), "faq").unwrap();
        assert_eq!(added, BlockId::new("s-4"));
        let unique: HashSet<_> = list.ids().into_iter().collect();
        assert_eq!(unique.len(), list.len());
    }

    #[test]
    fn test_anchor_conflicts() {
        let list: BlockList = vec![
            BlockRecord::with_id("a".into(), HeroData::default().into()).with_anchor("top"),
            BlockRecord::with_id("b".into(), HeroData::default().into()).with_anchor("faq"),
            BlockRecord::with_id("c".into(), HeroData::default().into()).with_anchor("top"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            list.anchor_conflicts(),
            vec![AnchorConflict {
                anchor: "top".to_string(),
                block_ids: vec!["a".into(), "c".into()],
            }]
        );
        assert_eq!(list.unique_anchor("top", "a"), "top-2");
        assert_eq!(list.unique_anchor("faq", "b"), "faq");
    }

    #[test]
    fn test_json_round_trip() {
        let (list, mut ids) = page(&["hero", "text"]);
        let json = list.to_json().unwrap();

        assert_eq!(BlockList::from_json(&json, &mut ids).unwrap(), list);
    }
}
