//! Statement AST nodes

use serde::{Deserialize, Serialize};
use crate::{Expr, Span, VarDecl};

/// A brace-delimited statement list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// A statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// Expression statement: `foo();`
    Expr(Expr),

    /// Local binding: `let x: i32 = 5;`
    Let(VarDecl),

    /// Assignment: `x = 5;`
    Assign { target: String, value: Expr },

    /// Return statement: `return x;` or `return;`
    Return(Option<Expr>),

    /// Conditional with an optional `else` or `else if` tail
    If(IfStmt),

    /// Post-condition loop: `loop { ... } while cond;`
    Loop { body: Block, condition: Expr },

    /// Stray `;`
    Empty,
}

/// `if cond { ... }` plus its trailing branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Block,
    pub else_branch: Option<ElseBranch>,
    pub span: Span,
}

/// What follows `else`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElseBranch {
    /// `else { ... }`
    Block(Block),

    /// `else if ...`, nested so a chain of N `else if`s holds N if-statements
    If(Box<IfStmt>),
}
