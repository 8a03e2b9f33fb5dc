//! # Editor Dispatch View
//!
//! Picks what the page builder shows for each block: the kind's editor form
//! while the block is being edited, its preview otherwise. Blocks whose type
//! the registry does not know get a placeholder in both modes and are never
//! dropped from the view.

use crate::block_list::{BlockList, ListUpdate, NoopReason};
use crate::EditorError;
use pagecraft_blocks::{
    render_placeholder, BlockId, BlockRecord, EditorForm, FieldInput, Markup, Registry,
};
use serde::Serialize;
use tracing::debug;

/// Rendered surface for one block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Surface {
    Editor(EditorForm),
    /// Preview markup
    Preview(String),
    #[serde(rename_all = "camelCase")]
    Placeholder {
        block_id: BlockId,
        block_type: String,
        markup: String,
    },
}

/// One entry of the rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    pub block_id: BlockId,
    /// Hidden blocks stay in the editor, flagged
    pub hidden: bool,
    pub surface: Surface,
}

#[derive(Debug, Clone, Copy)]
pub struct DispatchView<'r> {
    registry: &'r Registry,
}

impl<'r> DispatchView<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn render(&self, record: &BlockRecord, is_editing: bool) -> Surface {
        let tag = record.block_type();

        if !self.registry.contains(tag) {
            let mut out = Markup::compact();
            render_placeholder(tag, &mut out);
            return Surface::Placeholder {
                block_id: record.id.clone(),
                block_type: tag.to_string(),
                markup: out.into_string(),
            };
        }

        if is_editing {
            Surface::Editor(self.registry.editor(tag).form(record))
        } else {
            let mut out = Markup::compact();
            self.registry.renderer(tag).render(&record.data, &mut out);
            Surface::Preview(out.into_string())
        }
    }

    /// Every block in order; `editing` is the block whose editor is open
    pub fn render_list(&self, list: &BlockList, editing: Option<&str>) -> Vec<BlockView> {
        list.iter()
            .map(|record| BlockView {
                block_id: record.id.clone(),
                hidden: record.hidden,
                surface: self.render(record, editing == Some(record.id.as_str())),
            })
            .collect()
    }

    /// Run an editor change through the block's editor and into the list.
    /// An input the editor rejects is an error; a stale id is a no-op.
    pub fn submit(
        &self,
        list: &BlockList,
        id: &str,
        input: &FieldInput,
    ) -> Result<ListUpdate, EditorError> {
        let Some(record) = list.get(id) else {
            debug!(block_id = id, key = %input.key, "Dropping edit for stale block");
            return Ok(ListUpdate::noop(list, NoopReason::StaleId));
        };

        let data = self
            .registry
            .editor(record.block_type())
            .apply(&record.data, input)?;
        Ok(list.update(id, data))
    }
}
