//! # Drag-Reorder Adapter
//!
//! Turns pointer and keyboard gestures into one `reorder` on drop.
//!
//! ```text
//! Idle ──pointer_down──▶ Pending ──pointer_move (past threshold)──▶ Dragging
//!  ▲                        │                                          │
//!  └──────── drop / cancel ─┴───────────────── drop / cancel ──────────┘
//! Idle ──pick_up (keyboard)──────────────────────────────────────▶ Dragging
//! ```
//!
//! The adapter only ever holds the dragged block's id. The list may change
//! underneath a drag (an autosave reload, a delete from another control);
//! the id is resolved to an index at drop time.

use crate::block_list::{BlockList, ListUpdate, NoopReason};
use pagecraft_blocks::BlockId;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragInput {
    Pointer,
    Keyboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is down but has not travelled far enough to start a drag
    #[serde(rename_all = "camelCase")]
    Pending { block_id: BlockId, origin_y: f64 },
    /// `target` is the index the block would land on if dropped now
    #[serde(rename_all = "camelCase")]
    Dragging {
        block_id: BlockId,
        target: usize,
        input: DragInput,
    },
}

/// Vertical extent of a rendered block, reported by the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockBounds {
    pub id: BlockId,
    pub top: f64,
    pub height: f64,
}

impl BlockBounds {
    fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct DragAdapter {
    state: DragState,
    activation_distance: f64,
}

impl DragAdapter {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance: activation_distance.max(0.0),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The block being dragged (or pressed), if any
    pub fn active_id(&self) -> Option<&BlockId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pending { block_id, .. } | DragState::Dragging { block_id, .. } => {
                Some(block_id)
            }
        }
    }

    /// Live would-be index while dragging
    pub fn target(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, id: impl Into<BlockId>, y: f64) {
        self.state = DragState::Pending {
            block_id: id.into(),
            origin_y: y,
        };
    }

    /// Track the pointer. Returns the would-be index once dragging.
    pub fn pointer_move(&mut self, y: f64, layout: &[BlockBounds]) -> Option<usize> {
        let block_id = match &self.state {
            DragState::Idle => return None,
            DragState::Pending { block_id, origin_y } => {
                if (y - origin_y).abs() < self.activation_distance {
                    return None;
                }
                debug!(block_id = %block_id, "Drag started");
                block_id.clone()
            }
            DragState::Dragging { block_id, .. } => block_id.clone(),
        };

        // Index among the other blocks: how many sit above the pointer
        let target = layout
            .iter()
            .filter(|bounds| bounds.id != block_id && bounds.midpoint() < y)
            .count();

        self.state = DragState::Dragging {
            block_id,
            target,
            input: DragInput::Pointer,
        };
        Some(target)
    }

    /// Keyboard pick-up. False when the block is not in the list.
    pub fn pick_up(&mut self, id: &str, list: &BlockList) -> bool {
        match list.position(id) {
            Some(index) => {
                debug!(block_id = id, index, "Picked up block with keyboard");
                self.state = DragState::Dragging {
                    block_id: BlockId::from(id),
                    target: index,
                    input: DragInput::Keyboard,
                };
                true
            }
            None => false,
        }
    }

    /// Keyboard move of the would-be index, clamped to the list
    pub fn move_by(&mut self, direction: Direction, list: &BlockList) -> Option<usize> {
        let DragState::Dragging { target, .. } = &mut self.state else {
            return None;
        };

        let last = list.len().saturating_sub(1);
        let next = match direction {
            Direction::Up => target.saturating_sub(1),
            Direction::Down => *target + 1,
        };
        *target = next.min(last);
        Some(*target)
    }

    /// End the gesture and apply it to `list`
    pub fn drop(&mut self, list: &BlockList) -> ListUpdate {
        match std::mem::take(&mut self.state) {
            DragState::Dragging {
                block_id, target, ..
            } => {
                let target = target.min(list.len().saturating_sub(1));
                debug!(block_id = %block_id, target, "Dropping block");
                list.move_to(block_id.as_str(), target)
            }
            DragState::Pending { .. } | DragState::Idle => {
                ListUpdate::noop(list, NoopReason::Unchanged)
            }
        }
    }

    /// Abandon the gesture; nothing is applied
    pub fn cancel(&mut self) {
        if !matches!(self.state, DragState::Idle) {
            debug!("Drag cancelled");
        }
        self.state = DragState::Idle;
    }

    /// Order to render while dragging. Equals `list.ids()` when idle or when
    /// the dragged block is gone.
    pub fn projected_order(&self, list: &BlockList) -> Vec<BlockId> {
        let mut ids = list.ids();
        let DragState::Dragging {
            block_id, target, ..
        } = &self.state
        else {
            return ids;
        };
        let Some(from) = ids.iter().position(|id| id == block_id) else {
            return ids;
        };

        let id = ids.remove(from);
        let to = (*target).min(ids.len());
        ids.insert(to, id);
        ids
    }
}

impl Default for DragAdapter {
    fn default() -> Self {
        Self::new(8.0)
    }
}
