//! # Edit Session
//!
//! One user's editing state for one page: the current block list, which
//! block's editor is open, undo history, the drag gesture in progress and the
//! live editor lookups.
//!
//! Every change goes through [`EditorSession::apply`] (or a drag drop, undo
//! or redo) and is committed in a single list swap. The version number only
//! moves when the list actually changed.

use crate::block_list::{BlockList, ListUpdate, MetaChange, NoopReason, Outcome};
use crate::clipboard::Clipboard;
use crate::config::{AnchorPolicy, EditorConfig};
use crate::dispatch::{BlockView, DispatchView};
use crate::drag::{BlockBounds, Direction, DragAdapter, DragState};
use crate::lookup::{LookupGuard, LookupResolution, LookupTicket};
use crate::mutations::Mutation;
use crate::undo_stack::UndoStack;
use crate::EditorError;
use pagecraft_blocks::{BlockId, IdGenerator, Registry, UuidIds};
use pagecraft_compiler_html::compile_page;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a committed (or skipped) change did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub outcome: Outcome,
    /// Session version after the change
    pub version: u64,
    /// Block created by the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<BlockId>,
    /// Non-fatal problems to show the user (duplicate anchors)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub struct EditorSession {
    list: BlockList,
    registry: Arc<Registry>,
    config: EditorConfig,
    ids: Box<dyn IdGenerator + Send>,
    clipboard: Arc<Clipboard>,
    version: u64,
    editing: Option<BlockId>,
    history: UndoStack,
    drag: DragAdapter,
    lookups: LookupGuard,
}

impl EditorSession {
    /// Empty page on the built-in registry, random ids and the shared
    /// clipboard
    pub fn new(config: EditorConfig) -> Self {
        Self {
            list: BlockList::new(),
            registry: Registry::shared(),
            history: UndoStack::with_max_levels(config.undo_levels),
            drag: DragAdapter::new(config.drag_activation_distance),
            config,
            ids: Box::new(UuidIds),
            clipboard: Clipboard::global(),
            version: 0,
            editing: None,
            lookups: LookupGuard::new(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + Send + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Replace the page with a persisted one. History, the open editor, any
    /// drag and all lookups are reset.
    pub fn load(&mut self, json: &str) -> Result<(), EditorError> {
        self.list = BlockList::from_json(json, self.ids.as_mut())?;
        self.history.clear();
        self.drag.cancel();
        self.lookups.cancel_all();
        self.editing = None;
        self.version += 1;
        debug!(blocks = self.list.len(), version = self.version, "Loaded page");
        Ok(())
    }

    pub fn list(&self) -> &BlockList {
        &self.list
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let description = mutation.description();
        let mut warnings = Vec::new();
        let opens_editor = matches!(
            mutation,
            Mutation::AddBlock { .. } | Mutation::InsertBlock { .. }
        );

        let update = match mutation {
            Mutation::AddBlock { block_type } => {
                let (list, id) = self.list.add(&self.registry, self.ids.as_mut(), &block_type)?;
                ListUpdate {
                    list,
                    outcome: Outcome::Applied,
                    created: Some(id),
                }
            }
            Mutation::InsertBlock { index, block_type } => {
                let (list, id) =
                    self.list
                        .insert(&self.registry, self.ids.as_mut(), index, &block_type)?;
                ListUpdate {
                    list,
                    outcome: Outcome::Applied,
                    created: Some(id),
                }
            }
            Mutation::UpdateData { block_id, data } => self.list.update(block_id.as_str(), data),
            Mutation::EditField { block_id, input } => {
                DispatchView::new(&self.registry).submit(&self.list, block_id.as_str(), &input)?
            }
            Mutation::UpdateMeta { block_id, change } => {
                let sets_anchor = matches!(change, MetaChange::AnchorId(_));
                let mut update = self.list.update_meta(block_id.as_str(), change);
                if sets_anchor && update.is_applied() {
                    update.list = self.enforce_anchor(update.list, &block_id, &mut warnings);
                }
                update
            }
            Mutation::RemoveBlock { block_id } => self.list.remove(block_id.as_str()),
            Mutation::Reorder { from, to } => self.list.reorder(from, to),
            Mutation::MoveBlock { block_id, index } => self.list.move_to(block_id.as_str(), index),
            Mutation::Duplicate { block_id } => {
                let update = self.list.duplicate(block_id.as_str(), self.ids.as_mut());
                self.enforce_created_anchor(update, &mut warnings)
            }
            Mutation::Paste => {
                let update = self.list.paste_from(&self.clipboard, self.ids.as_mut());
                self.enforce_created_anchor(update, &mut warnings)
            }
            Mutation::ToggleHidden { block_id } => self.list.toggle_hidden(block_id.as_str()),
        };

        let created = update.created.clone();
        let result = self.commit(update, &description, warnings);
        if opens_editor {
            self.editing = created;
        }
        Ok(result)
    }

    fn commit(&mut self, update: ListUpdate, description: &str, warnings: Vec<String>) -> MutationResult {
        if update.is_applied() {
            self.history.push(&self.list, Some(description));
            self.list = update.list;
            self.version += 1;
            self.sync_with_list();
            debug!(version = self.version, description, "Applied change");
        } else if let Outcome::Noop(reason) = update.outcome {
            debug!(description, reason = reason.message(), "Change skipped");
        }

        MutationResult {
            outcome: update.outcome,
            version: self.version,
            created: update.created,
            warnings,
        }
    }

    /// Close the editor and drop lookups of blocks that left the list
    fn sync_with_list(&mut self) {
        let gone = self
            .editing
            .as_ref()
            .is_some_and(|id| !self.list.contains(id.as_str()));
        if gone {
            debug!("Open block is gone, closing editor");
            self.editing = None;
        }
        self.lookups.retain_blocks(&self.list.ids());
    }

    fn enforce_created_anchor(&self, mut update: ListUpdate, warnings: &mut Vec<String>) -> ListUpdate {
        if let Some(id) = update.created.clone() {
            update.list = self.enforce_anchor(update.list, &id, warnings);
        }
        update
    }

    /// Apply the configured policy when `id`'s anchor is already taken
    fn enforce_anchor(&self, list: BlockList, id: &BlockId, warnings: &mut Vec<String>) -> BlockList {
        let Some(anchor) = list.get(id.as_str()).and_then(|record| record.anchor_id.clone()) else {
            return list;
        };
        if !list.anchor_taken(&anchor, id.as_str()) {
            return list;
        }

        match self.config.anchor_policy {
            AnchorPolicy::Warn => {
                warn!(block_id = %id, anchor = %anchor, "Anchor already used by another block");
                warnings.push(format!("Anchor \"{}\" is already used by another block", anchor));
                list
            }
            AnchorPolicy::Suffix => {
                let unique = list.unique_anchor(&anchor, id.as_str());
                debug!(block_id = %id, from = %anchor, to = %unique, "Renaming duplicate anchor");
                list.update_meta(id.as_str(), MetaChange::AnchorId(Some(unique))).list
            }
            AnchorPolicy::Ignore => list,
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.list) {
            Some(list) => {
                self.restore(list);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.list) {
            Some(list) => {
                self.restore(list);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, list: BlockList) {
        self.list = list;
        self.version += 1;
        self.drag.cancel();
        self.sync_with_list();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    /// Group the following changes (typing in one field) into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch(&self.list, description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch(&self.list);
    }

    pub fn editing(&self) -> Option<&BlockId> {
        self.editing.as_ref()
    }

    /// Open a block's editor. False when the block does not exist.
    pub fn open_editor(&mut self, id: &str) -> bool {
        if !self.list.contains(id) {
            return false;
        }
        if let Some(previous) = self.editing.take() {
            if previous != id {
                self.lookups.cancel_block(previous.as_str());
            }
        }
        self.editing = Some(BlockId::from(id));
        true
    }

    pub fn close_editor(&mut self) {
        if let Some(id) = self.editing.take() {
            self.lookups.cancel_block(id.as_str());
        }
    }

    /// Copy a block to the clipboard
    pub fn copy(&self, id: &str) -> Outcome {
        match self.list.get(id) {
            Some(record) => {
                self.clipboard.copy(record);
                Outcome::Applied
            }
            None => Outcome::Noop(NoopReason::StaleId),
        }
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn pointer_down(&mut self, id: &str, y: f64) {
        self.drag.pointer_down(id, y);
    }

    pub fn pointer_move(&mut self, y: f64, layout: &[BlockBounds]) -> Option<usize> {
        self.drag.pointer_move(y, layout)
    }

    pub fn pick_up(&mut self, id: &str) -> bool {
        self.drag.pick_up(id, &self.list)
    }

    pub fn move_by(&mut self, direction: Direction) -> Option<usize> {
        self.drag.move_by(direction, &self.list)
    }

    /// Finish the drag gesture and commit the move
    pub fn drop_drag(&mut self) -> MutationResult {
        let update = self.drag.drop(&self.list);
        self.commit(update, "Move block", Vec::new())
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn projected_order(&self) -> Vec<BlockId> {
        self.drag.projected_order(&self.list)
    }

    /// Start an editor lookup. None when the block is gone.
    pub fn begin_lookup(&mut self, id: &str, key: &str) -> Option<LookupTicket> {
        self.list
            .contains(id)
            .then(|| self.lookups.begin(id, key))
    }

    /// Route a lookup response. Never touches the block list.
    pub fn resolve_lookup(&mut self, ticket: LookupTicket, response: Result<Value, String>) -> LookupResolution {
        if !self.lookups.accept(ticket) {
            return LookupResolution::Stale;
        }
        match response {
            Ok(value) => LookupResolution::Ready(value),
            Err(message) => {
                debug!(error = %message, "Editor lookup failed");
                LookupResolution::Failed(message)
            }
        }
    }

    pub fn pending_lookups(&self) -> usize {
        self.lookups.pending()
    }

    /// The page as persisted right now
    pub fn save(&self) -> Result<String, EditorError> {
        self.list.to_json()
    }

    /// Public HTML of the current page
    pub fn preview_html(&self) -> String {
        compile_page(
            &self.list.to_records(),
            &self.registry,
            &self.config.html.compile_options(),
        )
    }

    /// Editor surfaces for every block
    pub fn views(&self) -> Vec<BlockView> {
        DispatchView::new(&self.registry)
            .render_list(&self.list, self.editing.as_ref().map(BlockId::as_str))
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
