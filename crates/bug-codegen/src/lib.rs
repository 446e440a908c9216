//! Bug Codegen - C source generation
//!
//! Walks a parsed [`Module`] once and writes equivalent C text. There is no
//! intermediate representation and no semantic checking: names and types
//! are emitted as written.

mod ctype;
mod emit;

pub use ctype::*;
pub use emit::*;

use bug_ast::{Module, Span};
use thiserror::Error;

/// Internal defects. The parser never builds a tree that triggers these;
/// they guard hand-assembled trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("internal error: match expression has no cases")]
    EmptyMatch { span: Span },

    #[error("internal error: match expression has {count} wildcard cases")]
    DuplicateWildcard { count: usize, span: Span },
}

impl CodegenError {
    pub fn span(&self) -> Span {
        match self {
            CodegenError::EmptyMatch { span } => *span,
            CodegenError::DuplicateWildcard { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Included with `#include "..."` after `<stdio.h>`
    pub runtime_header: String,
    /// Spaces per nesting level
    pub indent_width: usize,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            runtime_header: "bug.h".to_string(),
            indent_width: 4,
        }
    }
}

/// Generate C for a module with default options
pub fn generate(module: &Module) -> Result<String, CodegenError> {
    generate_with(module, &CodegenOptions::default())
}

pub fn generate_with(module: &Module, options: &CodegenOptions) -> Result<String, CodegenError> {
    let mut emitter = CEmitter::new(options);
    emitter.emit_module(module)?;
    Ok(emitter.finish())
}
