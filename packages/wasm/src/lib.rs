//! Browser bindings. Everything crosses the boundary as JSON strings; the
//! admin UI owns rendering and calls back in on every user event.

use pagecraft_blocks::{sanitize_anchor, Registry};
use pagecraft_compiler_html::{compile_json, CompileError, CompileOptions};
use pagecraft_editor::{
    BlockBounds, Direction, EditorConfig, EditorError, EditorSession, LookupTicket, Mutation,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[derive(Error, Debug)]
enum BindingError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Editor(#[from] EditorError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Unknown direction: {0}")]
    Direction(String),
}

impl From<BindingError> for JsValue {
    fn from(err: BindingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[derive(Serialize)]
struct BlockType {
    tag: &'static str,
    label: &'static str,
}

fn parse_direction(direction: &str) -> Result<Direction, BindingError> {
    match direction {
        "up" => Ok(Direction::Up),
        "down" => Ok(Direction::Down),
        other => Err(BindingError::Direction(other.to_string())),
    }
}

/// One page open in the admin UI
#[wasm_bindgen]
pub struct PageEditor {
    session: EditorSession,
}

impl PageEditor {
    fn from_config(config_json: Option<&str>) -> Result<Self, BindingError> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(json)?,
            None => EditorConfig::default(),
        };
        Ok(Self {
            session: EditorSession::new(config),
        })
    }

    fn apply_json(&mut self, mutation_json: &str) -> Result<String, BindingError> {
        let mutation: Mutation = serde_json::from_str(mutation_json)?;
        let result = self.session.apply(mutation)?;
        Ok(serde_json::to_string(&result)?)
    }

    fn pointer_move_json(&mut self, y: f64, layout_json: &str) -> Result<Option<u32>, BindingError> {
        let layout: Vec<BlockBounds> = serde_json::from_str(layout_json)?;
        Ok(self.session.pointer_move(y, &layout).map(|index| index as u32))
    }

    fn begin_lookup_json(&mut self, block_id: &str, key: &str) -> Result<Option<String>, BindingError> {
        self.session
            .begin_lookup(block_id, key)
            .map(|ticket| serde_json::to_string(&ticket))
            .transpose()
            .map_err(BindingError::from)
    }

    fn resolve_lookup_json(
        &mut self,
        ticket_json: &str,
        value_json: Option<String>,
        error: Option<String>,
    ) -> Result<String, BindingError> {
        let ticket: LookupTicket = serde_json::from_str(ticket_json)?;
        let response = match error {
            Some(message) => Err(message),
            None => Ok(match value_json {
                Some(json) => serde_json::from_str(&json)?,
                None => Value::Null,
            }),
        };
        let resolution = self.session.resolve_lookup(ticket, response);
        Ok(serde_json::to_string(&resolution)?)
    }
}

#[wasm_bindgen]
impl PageEditor {
    /// New empty page. `config` is the JSON of a `pagecraft.config.json`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<PageEditor, JsValue> {
        Ok(Self::from_config(config.as_deref())?)
    }

    /// Replace the page with persisted JSON
    pub fn load(&mut self, json: &str) -> Result<(), JsValue> {
        self.session.load(json).map_err(BindingError::from)?;
        Ok(())
    }

    /// Apply a mutation (JSON) and return the result (JSON)
    pub fn apply(&mut self, mutation: &str) -> Result<String, JsValue> {
        Ok(self.apply_json(mutation)?)
    }

    pub fn save(&self) -> Result<String, JsValue> {
        Ok(self.session.save().map_err(BindingError::from)?)
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> f64 {
        self.session.version() as f64
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    #[wasm_bindgen(js_name = beginBatch)]
    pub fn begin_batch(&mut self, description: &str) {
        self.session.begin_batch(description);
    }

    #[wasm_bindgen(js_name = endBatch)]
    pub fn end_batch(&mut self) {
        self.session.end_batch();
    }

    /// Editor or preview surface of every block (JSON)
    pub fn views(&self) -> Result<String, JsValue> {
        Ok(serde_json::to_string(&self.session.views()).map_err(BindingError::from)?)
    }

    #[wasm_bindgen(js_name = previewHtml)]
    pub fn preview_html(&self) -> String {
        self.session.preview_html()
    }

    #[wasm_bindgen(js_name = openEditor)]
    pub fn open_editor(&mut self, block_id: &str) -> bool {
        self.session.open_editor(block_id)
    }

    #[wasm_bindgen(js_name = closeEditor)]
    pub fn close_editor(&mut self) {
        self.session.close_editor();
    }

    #[wasm_bindgen(js_name = editingId)]
    pub fn editing_id(&self) -> Option<String> {
        self.session.editing().map(ToString::to_string)
    }

    /// Copy a block to the clipboard. False when the block is gone.
    pub fn copy(&self, block_id: &str) -> bool {
        self.session.copy(block_id).is_applied()
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, block_id: &str, y: f64) {
        self.session.pointer_down(block_id, y);
    }

    /// `layout` is a JSON array of `{ id, top, height }`
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, y: f64, layout: &str) -> Result<Option<u32>, JsValue> {
        Ok(self.pointer_move_json(y, layout)?)
    }

    #[wasm_bindgen(js_name = pickUp)]
    pub fn pick_up(&mut self, block_id: &str) -> bool {
        self.session.pick_up(block_id)
    }

    /// `direction` is `"up"` or `"down"`
    #[wasm_bindgen(js_name = moveBy)]
    pub fn move_by(&mut self, direction: &str) -> Result<Option<u32>, JsValue> {
        let direction = parse_direction(direction)?;
        Ok(self.session.move_by(direction).map(|index| index as u32))
    }

    #[wasm_bindgen(js_name = dropDrag)]
    pub fn drop_drag(&mut self) -> Result<String, JsValue> {
        let result = self.session.drop_drag();
        Ok(serde_json::to_string(&result).map_err(BindingError::from)?)
    }

    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) {
        self.session.cancel_drag();
    }

    /// Block ids in the order to render during a drag (JSON)
    #[wasm_bindgen(js_name = projectedOrder)]
    pub fn projected_order(&self) -> Result<String, JsValue> {
        Ok(serde_json::to_string(&self.session.projected_order()).map_err(BindingError::from)?)
    }

    /// Ticket (JSON) for an editor lookup, or undefined when the block is gone
    #[wasm_bindgen(js_name = beginLookup)]
    pub fn begin_lookup(&mut self, block_id: &str, key: &str) -> Result<Option<String>, JsValue> {
        Ok(self.begin_lookup_json(block_id, key)?)
    }

    /// Route a lookup response: pass `value` (JSON) on success or `error`
    #[wasm_bindgen(js_name = resolveLookup)]
    pub fn resolve_lookup(
        &mut self,
        ticket: &str,
        value: Option<String>,
        error: Option<String>,
    ) -> Result<String, JsValue> {
        Ok(self.resolve_lookup_json(ticket, value, error)?)
    }
}

fn block_types() -> Result<String, BindingError> {
    let types: Vec<BlockType> = Registry::global()
        .entries()
        .map(|entry| BlockType {
            tag: entry.tag,
            label: entry.label,
        })
        .collect();
    Ok(serde_json::to_string(&types)?)
}

fn compile(page_json: &str, options_json: Option<&str>) -> Result<String, BindingError> {
    let options = match options_json {
        Some(json) => serde_json::from_str(json)?,
        None => CompileOptions::default(),
    };
    Ok(compile_json(page_json, Registry::global(), &options)?)
}

/// Block picker entries: `[{ tag, label }]`
#[wasm_bindgen(js_name = blockTypes)]
pub fn block_types_js() -> Result<String, JsValue> {
    Ok(block_types()?)
}

/// Public HTML for a persisted page
#[wasm_bindgen(js_name = compilePage)]
pub fn compile_page_js(page: &str, options: Option<String>) -> Result<String, JsValue> {
    Ok(compile(page, options.as_deref())?)
}

#[wasm_bindgen(js_name = sanitizeAnchor)]
pub fn sanitize_anchor_js(input: &str) -> String {
    sanitize_anchor(input)
}
