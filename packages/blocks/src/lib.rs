//! # Pagecraft Blocks
//!
//! Data model and registry for page content blocks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ record: BlockRecord { id, data, meta }      │
//! │  - wire shape { id, type, data, ... }       │
//! │  - lenient load, lossless save              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ data: BlockData (one variant per kind)      │
//! │  - typed payloads with registry defaults    │
//! │  - Other { tag, data } for retired kinds    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ registry: tag → (default, editor, renderer) │
//! │  - unknown tags resolve to a placeholder    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_blocks::{BlockRecord, Registry, UuidIds};
//!
//! let registry = Registry::global();
//! let data = registry.default_data("hero").expect("hero is built in");
//! let record = BlockRecord::new(&mut UuidIds, data);
//! assert_eq!(record.block_type(), "hero");
//! ```

#[macro_use]
mod macros;

pub mod anchor;
pub mod data;
pub mod editor;
pub mod errors;
pub mod id;
pub mod kinds;
pub mod markup;
pub mod record;
pub mod registry;
pub mod render;
pub mod rich_text;

pub use anchor::{fragment, sanitize_anchor};
pub use data::{BlockData, Payload, RawData};
pub use editor::{
    BlockEditor, EditorForm, FieldInput, FieldKind, FieldSpec, FormField, SchemaEditor,
    UnknownBlockEditor,
};
pub use errors::{BlockError, EditError};
pub use id::{BlockId, IdGenerator, SequentialIds, UuidIds};
pub use markup::{escape_attr, escape_html, Markup};
pub use record::{load_page, save_page, Animation, BlockRecord, Spacing};
pub use registry::{Registry, RegistryEntry};
pub use render::{render_placeholder, BlockRenderer, PlaceholderRenderer, TypedRenderer};
pub use rich_text::{render_rich_text, RichText};
