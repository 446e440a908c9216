//! Declaration AST nodes (top-level items)

use serde::{Deserialize, Serialize};
use crate::{Block, Expr, Span, Type};

/// A top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclarationKind {
    /// Function declaration: `fn add(a: i32, b: i32) -> i32 { ... }`
    Function(FunctionDecl),

    /// Global variable: `let x: i32 = 5;`
    Var(VarDecl),

    /// Struct declaration: `struct Point { x: i32, y: i32 }`
    Struct(StructDecl),

    /// Enum declaration: `enum Color { Red = 0, Green = 1 }`
    Enum(EnumDecl),
}

impl DeclarationKind {
    pub fn name(&self) -> &str {
        match self {
            DeclarationKind::Function(f) => &f.name,
            DeclarationKind::Var(v) => &v.name,
            DeclarationKind::Struct(s) => &s.name,
            DeclarationKind::Enum(e) => &e.name,
        }
    }
}

/// Function declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Parameter>,
    /// `None` when the source omits `-> type`
    pub return_type: Option<Type>,
    pub body: Block,
    pub span: Span,
}

/// Function parameter: `name: type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

/// Variable declaration, global or local: `let name: type = value;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    pub value: Expr,
    pub span: Span,
}

/// Struct declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

/// Field in a struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

/// Enum declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<VariantDecl>,
    pub span: Span,
}

/// Enum variant: `Red = 0` or `Red`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDecl {
    pub name: String,
    pub value: Option<Expr>,
    pub span: Span,
}
