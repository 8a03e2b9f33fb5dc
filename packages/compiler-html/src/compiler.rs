use pagecraft_blocks::{
    escape_html, load_page, sanitize_anchor, Animation, BlockError, BlockRecord, Markup, Registry,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Invalid page: {0}")]
    Page(#[from] BlockError),
}

/// Options for HTML compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Document `<title>`
    pub title: String,
    /// Emit only the block sections, without the document shell
    pub fragment: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            title: "Untitled page".to_string(),
            fragment: false,
        }
    }
}

#[derive(Debug, Default)]
struct Stats {
    rendered: usize,
    hidden: usize,
    unknown: usize,
}

struct Context<'a> {
    registry: &'a Registry,
    out: Markup,
    anchors: HashSet<String>,
    stats: Stats,
}

impl<'a> Context<'a> {
    fn new(registry: &'a Registry, options: &CompileOptions) -> Self {
        Self {
            registry,
            out: Markup::with_options(options.pretty, &options.indent),
            anchors: HashSet::new(),
            stats: Stats::default(),
        }
    }
}

/// Compile a page's blocks to HTML
#[instrument(skip_all, fields(blocks = records.len(), fragment = options.fragment))]
pub fn compile_page(records: &[BlockRecord], registry: &Registry, options: &CompileOptions) -> String {
    let mut ctx = Context::new(registry, options);

    if options.fragment {
        compile_blocks(records, &mut ctx);
    } else {
        ctx.out.add_line("<!DOCTYPE html>");
        ctx.out.add_line("<html>");
        ctx.out.indent();
        compile_head(options, &mut ctx);
        ctx.out.open("body", &[]);
        ctx.out.open("main", &[("class", "page")]);
        compile_blocks(records, &mut ctx);
        ctx.out.close("main");
        ctx.out.close("body");
        ctx.out.dedent();
        ctx.out.add_line("</html>");
    }

    info!(
        rendered = ctx.stats.rendered,
        hidden = ctx.stats.hidden,
        unknown = ctx.stats.unknown,
        "Compiled page"
    );
    ctx.out.into_string()
}

/// Compile a persisted page (JSON array of block records)
pub fn compile_json(json: &str, registry: &Registry, options: &CompileOptions) -> Result<String, CompileError> {
    let records = load_page(json)?;
    Ok(compile_page(&records, registry, options))
}

fn compile_head(options: &CompileOptions, ctx: &mut Context) {
    ctx.out.open("head", &[]);
    ctx.out.add_line("<meta charset=\"UTF-8\">");
    ctx.out
        .add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.out.element("title", &[], &options.title);
    ctx.out.close("head");
}

fn compile_blocks(records: &[BlockRecord], ctx: &mut Context) {
    for record in records {
        if record.hidden {
            debug!(block_id = %record.id, "Skipping hidden block");
            ctx.stats.hidden += 1;
            continue;
        }
        compile_block(record, ctx);
    }
}

fn compile_block(record: &BlockRecord, ctx: &mut Context) {
    let registry = ctx.registry;
    let Some(entry) = registry.get(record.block_type()) else {
        warn!(block_id = %record.id, block_type = record.block_type(), "Omitting block of unknown type");
        ctx.stats.unknown += 1;
        ctx.out.add_line(&format!(
            "<!-- unknown block type \"{}\" ({}) -->",
            comment_safe(record.block_type()),
            comment_safe(record.id.as_str())
        ));
        return;
    };

    let class = section_class(record);
    let block_id = record.id.to_string();
    let anchor = record
        .anchor_id
        .as_deref()
        .map(sanitize_anchor)
        .filter(|anchor| !anchor.is_empty());
    let mut attrs = vec![("class", class.as_str()), ("data-block-id", block_id.as_str())];

    if let Some(anchor) = anchor.as_deref() {
        if ctx.anchors.insert(anchor.to_string()) {
            attrs.push(("id", anchor));
        } else {
            warn!(block_id = %record.id, anchor, "Anchor already used on this page, dropping id");
        }
    }

    ctx.out.open("section", &attrs);
    entry.renderer().render(&record.data, &mut ctx.out);
    ctx.out.close("section");
    ctx.stats.rendered += 1;
}

fn section_class(record: &BlockRecord) -> String {
    let mut class = format!("block block--{}", record.block_type());
    if let Some(spacing) = record.spacing {
        class.push_str(&format!(" spacing-{}", spacing));
    }
    if let Some(animation) = record.animation.filter(|a| *a != Animation::None) {
        class.push_str(&format!(" animate-{}", animation));
    }
    class
}

/// Text safe inside `<!-- -->`
fn comment_safe(text: &str) -> String {
    escape_html(text).replace("--", "-")
}
