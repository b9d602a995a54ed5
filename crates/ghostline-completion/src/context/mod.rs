//! Context extraction around the cursor
//!
//! The analyzer turns a document position into a [`CodeContext`](crate::types::CodeContext)
//! snapshot: surrounding lines, enclosing scopes, imports, visible variables,
//! and a classification of the line being typed. Everything here is
//! synchronous and works line-by-line against the [`Document`](crate::document::Document)
//! trait.

pub mod analyzer;

pub use analyzer::{ContextAnalyzer, RegexContextAnalyzer};

/// Lines of surrounding code captured on each side of the cursor
pub const CONTEXT_WINDOW_LINES: usize = 10;
