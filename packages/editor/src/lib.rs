//! # Pagecraft Editor
//!
//! Editing engine for block-based pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI events: add / edit / drag / paste / del  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: EditorSession                      │
//! │  - apply Mutations, undo/redo               │
//! │  - open editor, drag gesture, lookups       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ block_list: immutable BlockList             │
//! │  - every op returns a new list              │
//! │  - stale ids are no-ops, never errors       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ dispatch: form / preview / placeholder      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Records are values**: a change replaces the record, never patches it
//! 2. **Identity is the id**: drags, editors and lookups hold ids, not indices
//! 3. **Unknown kinds survive**: they render as placeholders and save verbatim
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_editor::{EditorConfig, EditorSession, Mutation};
//!
//! let mut session = EditorSession::new(EditorConfig::default());
//! let hero = session
//!     .apply(Mutation::AddBlock { block_type: "hero".to_string() })
//!     .unwrap()
//!     .created
//!     .unwrap();
//!
//! session.apply(Mutation::RemoveBlock { block_id: hero }).unwrap();
//! assert_eq!(session.save().unwrap(), "[]");
//! ```

mod block_list;
mod clipboard;
mod config;
mod dispatch;
mod drag;
mod errors;
mod lookup;
mod mutations;
mod session;
mod undo_stack;

pub use block_list::{AnchorConflict, BlockList, ListUpdate, MetaChange, NoopReason, Outcome};
pub use clipboard::Clipboard;
pub use config::{AnchorPolicy, EditorConfig, HtmlConfig, DEFAULT_CONFIG_NAME};
pub use dispatch::{BlockView, DispatchView, Surface};
pub use drag::{BlockBounds, Direction, DragAdapter, DragInput, DragState};
pub use errors::EditorError;
pub use lookup::{LookupGuard, LookupResolution, LookupTicket};
pub use mutations::Mutation;
pub use session::{EditorSession, MutationResult};
pub use undo_stack::{HistoryEntry, UndoStack};

// Re-export the block model for convenience
pub use pagecraft_blocks::{BlockData, BlockId, BlockRecord, FieldInput, Registry};
