//! # Pagecraft HTML Compiler
//!
//! Renders a page's block list to public HTML. Hidden blocks are left out,
//! presentation metadata becomes classes and anchors become element ids.

mod compiler;


pub use compiler::{compile_json, compile_page, CompileError, CompileOptions};
