//! Parser error types

use bug_ast::Span;
use bug_lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
        span: Span,
    },

    #[error("syntax error at end of input: expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    #[error("syntax error at line {line}, column {column}: array size '{text}' is out of range")]
    InvalidArraySize {
        text: String,
        line: usize,
        column: usize,
        span: Span,
    },

    #[error("syntax error at line {line}, column {column}: match has more than one wildcard case")]
    DuplicateWildcard {
        line: usize,
        column: usize,
        span: Span,
        first: Span,
    },

    #[error("syntax error at line {line}, column {column}: nesting deeper than {limit} levels")]
    NestingTooDeep {
        limit: usize,
        line: usize,
        column: usize,
        span: Span,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span, .. } => *span,
            ParseError::InvalidArraySize { span, .. } => *span,
            ParseError::DuplicateWildcard { span, .. } => *span,
            ParseError::NestingTooDeep { span, .. } => *span,
        }
    }

    /// Error for `token` when `expected` was wanted; EOF gets its own variant
    pub fn unexpected(expected: impl Into<String>, token: &Token, source: &str) -> Self {
        match token.kind {
            TokenKind::Eof => ParseError::UnexpectedEof {
                expected: expected.into(),
                span: token.span,
            },
            kind => {
                let found = match kind {
                    TokenKind::Ident
                    | TokenKind::Int
                    | TokenKind::Float
                    | TokenKind::String => {
                        format!("{} '{}'", kind.describe(), token.value(source))
                    }
                    _ => kind.describe().to_string(),
                };
                ParseError::UnexpectedToken {
                    expected: expected.into(),
                    found,
                    line: token.pos.line,
                    column: token.pos.column,
                    span: token.span,
                }
            }
        }
    }
}
