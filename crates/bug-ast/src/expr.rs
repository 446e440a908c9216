//! Expression AST nodes

use serde::{Deserialize, Serialize};
use crate::Span;

/// An expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Literal value: `42`, `1.5`, `true`, `"hello"`
    Literal(Literal),

    /// Variable reference: `x`
    Ident(String),

    /// Unary operation: `!x`, `-y`, `+z`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Binary operation: `a + b`, `x == y`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call: `foo(a, b)`
    Call {
        callee: String,
        args: Vec<Expr>,
    },

    /// Field access: `point.x`
    Field {
        object: Box<Expr>,
        field: String,
    },

    /// Index access: `arr[0]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },

    /// Pattern match: `match x { 1 => a, * => b }`
    Match {
        scrutinee: Box<Expr>,
        cases: Vec<MatchCase>,
    },

    /// List literal: `[1, 2, 3]`
    List(Vec<Expr>),

    /// Struct construction: `new Point { x: 1, y: 2 }`
    NewStruct {
        name: String,
        fields: Vec<FieldInit>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// A literal with the semantic type fixed by its lexical category.
///
/// `value` is the verbatim source text; for strings it is the body with the
/// quotes stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub ty: LiteralType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralType {
    Int,
    Float,
    Bool,
    String,
}

impl Literal {
    pub fn new(value: impl Into<String>, ty: LiteralType) -> Self {
        Self {
            value: value.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding strength, higher binds tighter. Every level is left-associative.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Ne => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
        }
    }
}

/// A match case: `pattern => expr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Expr,
    pub span: Span,
}

impl MatchCase {
    pub fn is_wildcard(&self) -> bool {
        matches!(self.pattern, Pattern::Wildcard)
    }
}

/// Pattern of a match case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Fallback case: `*`
    Wildcard,

    /// Equality test against an expression
    Expr(Expr),
}

/// Field initializer in a struct construction: `x: 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInit {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}
