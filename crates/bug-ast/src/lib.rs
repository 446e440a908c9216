//! Bug AST - Core types for the abstract syntax tree
//!
//! This crate defines the typed AST produced by the parser, spans and
//! line/column positions for diagnostics, and the arena-backed
//! [`SyntaxTree`] used for generic parent/ancestor/sibling queries.

mod span;
mod types;
mod expr;
mod stmt;
mod decl;
mod tree;

pub use span::*;
pub use types::*;
pub use expr::*;
pub use stmt::*;
pub use decl::*;
pub use tree::*;

use serde::{Deserialize, Serialize};

/// A complete compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

impl Module {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|d| match &d.kind {
            DeclarationKind::Function(f) => Some(f),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str) -> Declaration {
        Declaration {
            kind: DeclarationKind::Function(FunctionDecl {
                name: name.into(),
                params: vec![],
                return_type: None,
                body: Block {
                    statements: vec![],
                    span: Span::dummy(),
                },
                span: Span::dummy(),
            }),
            span: Span::dummy(),
        }
    }

    #[test]
    fn test_functions_skips_other_declarations() {
        let module = Module {
            declarations: vec![
                function("main"),
                Declaration {
                    kind: DeclarationKind::Struct(StructDecl {
                        name: "Point".into(),
                        fields: vec![],
                        span: Span::dummy(),
                    }),
                    span: Span::dummy(),
                },
                function("helper"),
            ],
            span: Span::dummy(),
        };
        let names: Vec<&str> = module.functions().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["main", "helper"]);
        assert_eq!(module.declarations[1].kind.name(), "Point");
    }

    #[test]
    fn test_module_serializes_with_variant_tags() {
        let module = Module {
            declarations: vec![function("main")],
            span: Span::new(0, 12),
        };
        let json = serde_json::to_value(&module).unwrap();
        assert_eq!(json["declarations"][0]["kind"]["Function"]["name"], "main");
        assert_eq!(json["span"]["end"], 12);
    }
}
