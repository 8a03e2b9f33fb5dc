//! Single-slot block clipboard
//!
//! Holds at most one copied block. A copy is taken by value, so later edits
//! to the source block do not show up in what gets pasted; every paste
//! produces a record with a fresh id.

use once_cell::sync::Lazy;
use pagecraft_blocks::{BlockRecord, IdGenerator};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

static GLOBAL: Lazy<Arc<Clipboard>> = Lazy::new(|| Arc::new(Clipboard::new()));

#[derive(Debug, Default)]
pub struct Clipboard {
    slot: RwLock<Option<BlockRecord>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide clipboard shared by every session, so a block copied on
    /// one page can be pasted on another
    pub fn global() -> Arc<Clipboard> {
        GLOBAL.clone()
    }

    /// Replace the slot with a snapshot of `record`
    pub fn copy(&self, record: &BlockRecord) {
        debug!(block_id = %record.id, block_type = record.block_type(), "Copying block");
        *self.slot.write() = Some(record.clone());
    }

    /// A copy of the held block under a fresh id. The slot keeps its content,
    /// so pasting twice yields two blocks.
    pub fn paste(&self, ids: &mut dyn IdGenerator) -> Option<BlockRecord> {
        self.slot.read().as_ref().map(|record| record.duplicate(ids))
    }

    /// The held block as copied, id included
    pub fn peek(&self) -> Option<BlockRecord> {
        self.slot.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }

    pub fn clear(&self) {
        *self.slot.write() = None;
    }
}
