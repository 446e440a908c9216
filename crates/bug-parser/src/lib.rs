//! Bug Parser - Recursive descent parser
//!
//! Parses Bug source code into a [`Module`].
//! Key parsing decisions:
//! - `else if` nests a full if-statement, so chains bind to the nearest `if`
//! - `loop { .. } while cond;` is a post-condition loop
//! - `*` as a match pattern is the wildcard; a second one is an error
//! - `IDENT =` (two-token lookahead) starts an assignment statement

mod error;
mod parser;

pub use error::*;
pub use parser::*;

use bug_ast::Module;
use bug_lexer::{tokenize, LexError};

/// Successful parse: the tree plus any lexical defects skipped on the way
#[derive(Debug, Clone)]
pub struct Parsed {
    pub module: Module,
    pub lex_errors: Vec<LexError>,
    pub token_count: usize,
}

/// Parse a source string into a module
pub fn parse(source: &str) -> Result<Parsed, ParseError> {
    let lexed = tokenize(source);
    let token_count = lexed.tokens.len();
    let mut parser = Parser::new(source, lexed.tokens);
    let module = parser.parse_module()?;
    Ok(Parsed {
        module,
        lex_errors: lexed.errors,
        token_count,
    })
}

/// Parse a source string, returning only the module
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    parse(source).map(|parsed| parsed.module)
}
