//! Stale-response guard for editor lookups
//!
//! Editors fetch supporting data (categories, geocodes, catalogs) while the
//! user keeps editing. Each fetch takes a ticket; only the newest ticket for a
//! `(block, key)` pair is live, and removing or closing the block kills its
//! tickets. A response carrying a dead ticket is discarded.

use pagecraft_blocks::BlockId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::HashSet;
use tracing::debug;

/// Proof of an in-flight lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupTicket {
    pub block_id: BlockId,
    pub key: String,
    pub seq: u64,
}

/// What the editor should do with a lookup response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum LookupResolution {
    /// Show this value; it is not written into block data
    Ready(Value),
    /// The block or the request was superseded; drop the response
    Stale,
    /// Show the lookup's empty/placeholder state with this message
    Failed(String),
}

#[derive(Debug, Default)]
pub struct LookupGuard {
    next: u64,
    live: HashMap<(BlockId, String), u64>,
}

impl LookupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup, superseding any live one for the same block and key
    pub fn begin(&mut self, block_id: impl Into<BlockId>, key: impl Into<String>) -> LookupTicket {
        self.next += 1;
        let ticket = LookupTicket {
            block_id: block_id.into(),
            key: key.into(),
            seq: self.next,
        };
        self.live
            .insert((ticket.block_id.clone(), ticket.key.clone()), ticket.seq);
        ticket
    }

    pub fn is_live(&self, ticket: &LookupTicket) -> bool {
        self.live
            .get(&(ticket.block_id.clone(), ticket.key.clone()))
            .is_some_and(|seq| *seq == ticket.seq)
    }

    /// Retire the ticket. True when it was still live.
    pub fn accept(&mut self, ticket: LookupTicket) -> bool {
        if !self.is_live(&ticket) {
            debug!(block_id = %ticket.block_id, key = %ticket.key, seq = ticket.seq, "Discarding stale lookup");
            return false;
        }
        self.live.remove(&(ticket.block_id, ticket.key));
        true
    }

    /// Cancel every lookup owned by a block
    pub fn cancel_block(&mut self, block_id: &str) {
        self.live.retain(|(id, _), _| id != block_id);
    }

    pub fn cancel_all(&mut self) {
        self.live.clear();
    }

    /// Cancel lookups of blocks not in `ids`
    pub fn retain_blocks(&mut self, ids: &[BlockId]) {
        let keep: HashSet<&BlockId> = ids.iter().collect();
        self.live.retain(|(id, _), _| keep.contains(id));
    }

    /// Number of live lookups
    pub fn pending(&self) -> usize {
        self.live.len()
    }
}
