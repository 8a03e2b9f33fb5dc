//! # Page Mutations
//!
//! Serializable operations on a page's block list, as sent by the admin UI.
//!
//! ## Semantics
//!
//! - Every mutation is applied atomically: the session swaps in the new list
//!   in one step or leaves it alone
//! - Mutations naming a block id that no longer exists are no-ops, never
//!   errors (the UI may be a frame behind)
//! - `UpdateData` replaces the payload wholesale; last write wins
//! - Mutations that create a block (`AddBlock`, `InsertBlock`, `Duplicate`,
//!   `Paste`) report the new id

use crate::block_list::MetaChange;
use pagecraft_blocks::{BlockData, BlockId, FieldInput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Append a block with the type's default data
    #[serde(rename_all = "camelCase")]
    AddBlock { block_type: String },

    #[serde(rename_all = "camelCase")]
    InsertBlock { index: usize, block_type: String },

    /// Replace a block's payload
    #[serde(rename_all = "camelCase")]
    UpdateData { block_id: BlockId, data: BlockData },

    /// One field change from the block's editor form
    #[serde(rename_all = "camelCase")]
    EditField { block_id: BlockId, input: FieldInput },

    #[serde(rename_all = "camelCase")]
    UpdateMeta {
        block_id: BlockId,
        change: MetaChange,
    },

    #[serde(rename_all = "camelCase")]
    RemoveBlock { block_id: BlockId },

    /// Move by index
    Reorder { from: usize, to: usize },

    /// Move by id
    #[serde(rename_all = "camelCase")]
    MoveBlock { block_id: BlockId, index: usize },

    #[serde(rename_all = "camelCase")]
    Duplicate { block_id: BlockId },

    /// Append the clipboard's block
    Paste,

    #[serde(rename_all = "camelCase")]
    ToggleHidden { block_id: BlockId },
}

impl Mutation {
    /// Label for the undo history
    pub fn description(&self) -> String {
        match self {
            Mutation::AddBlock { block_type } | Mutation::InsertBlock { block_type, .. } => {
                format!("Add {}", block_type)
            }
            Mutation::UpdateData { .. } | Mutation::EditField { .. } => "Edit block".to_string(),
            Mutation::UpdateMeta { change, .. } => match change {
                MetaChange::Spacing(_) => "Change spacing",
                MetaChange::Animation(_) => "Change animation",
                MetaChange::AnchorId(_) => "Change anchor",
                MetaChange::Hidden(true) => "Hide block",
                MetaChange::Hidden(false) => "Show block",
            }
            .to_string(),
            Mutation::RemoveBlock { .. } => "Remove block".to_string(),
            Mutation::Reorder { .. } | Mutation::MoveBlock { .. } => "Move block".to_string(),
            Mutation::Duplicate { .. } => "Duplicate block".to_string(),
            Mutation::Paste => "Paste block".to_string(),
            Mutation::ToggleHidden { .. } => "Toggle visibility".to_string(),
        }
    }

    /// The existing block the mutation targets, if it targets one
    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            Mutation::UpdateData { block_id, .. }
            | Mutation::EditField { block_id, .. }
            | Mutation::UpdateMeta { block_id, .. }
            | Mutation::RemoveBlock { block_id }
            | Mutation::MoveBlock { block_id, .. }
            | Mutation::Duplicate { block_id }
            | Mutation::ToggleHidden { block_id } => Some(block_id),
            Mutation::AddBlock { .. }
            | Mutation::InsertBlock { .. }
            | Mutation::Reorder { .. }
            | Mutation::Paste => None,
        }
    }
}
