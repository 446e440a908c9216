//! Bug - a small imperative language translated to C
//!
//! The pipeline lives in the workspace member crates; this crate re-exports
//! them and wires them into a single `compile` call.

use std::fs;
use std::path::Path;

pub use bug_ast as ast;
pub use bug_codegen as codegen;
pub use bug_lexer as lexer;
pub use bug_parser as parser;

use bug_ast::Span;
use bug_codegen::{CodegenError, CodegenOptions};
use bug_lexer::LexError;
use bug_parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Codegen(#[from] CodegenError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Source location, if the error has one
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Parse(e) => Some(e.span()),
            CompileError::Codegen(e) => Some(e.span()),
            CompileError::Io { .. } => None,
        }
    }
}

/// Generated C plus the lexical errors skipped on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub code: String,
    pub lex_errors: Vec<LexError>,
}

impl Compiled {
    pub fn is_clean(&self) -> bool {
        self.lex_errors.is_empty()
    }
}

/// Translate Bug source to C with default options
pub fn compile(source: &str) -> Result<Compiled, CompileError> {
    compile_with(source, &CodegenOptions::default())
}

pub fn compile_with(source: &str, options: &CodegenOptions) -> Result<Compiled, CompileError> {
    let parsed = bug_parser::parse(source)?;
    let code = bug_codegen::generate_with(&parsed.module, options)?;
    Ok(Compiled {
        code,
        lex_errors: parsed.lex_errors,
    })
}

/// Read and translate a source file
pub fn compile_file(path: impl AsRef<Path>) -> Result<Compiled, CompileError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    compile(&source)
}
