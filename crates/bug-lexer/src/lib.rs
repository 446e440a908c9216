//! Bug Lexer - Tokenization using logos
//!
//! [`Lexer`] is a lazy, cloneable token stream over a source string.
//! Unrecognized characters surface as [`LexError`]s; the offending character
//! is skipped and lexing continues with the rest of the input.

mod token;

pub use token::*;

use std::rc::Rc;

use bug_ast::{LineIndex, Position, Span};
use logos::Logos;
use thiserror::Error;

/// A token with its span and starting position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub pos: Position,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }

    /// Literal value of the token: the lexeme, with quotes stripped for strings
    pub fn value<'a>(&self, source: &'a str) -> &'a str {
        let text = self.text(source);
        match self.kind {
            TokenKind::String if text.len() >= 2 => &text[1..text.len() - 1],
            _ => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("illegal character '{ch}' at line {line}, column {column}")]
    UnexpectedChar {
        ch: char,
        line: usize,
        column: usize,
        span: Span,
    },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
        }
    }
}

/// Lazy token stream. Cloning yields an independent cursor at the same point.
#[derive(Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, TokenKind>,
    /// Byte offset of `inner`'s input within `source`
    base: usize,
    lines: Rc<LineIndex<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: TokenKind::lexer(source),
            base: 0,
            lines: Rc::new(LineIndex::new(source)),
        }
    }

    pub fn position(&self, offset: usize) -> Position {
        self.lines.position(offset)
    }

    /// Restart the underlying scanner at `offset`
    fn resume_at(&mut self, offset: usize) {
        self.base = offset;
        self.inner = TokenKind::lexer(&self.source[offset..]);
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let raw = self.inner.span();
        let span = Span::new(self.base + raw.start, self.base + raw.end);
        let pos = self.lines.position(span.start);

        match result {
            Ok(kind) => Some(Ok(Token { kind, span, pos })),
            Err(()) => {
                // logos may fold a failed multi-character attempt (an
                // unterminated string, say) into one error span; only the
                // first character is dropped and the rest is scanned again.
                let ch = self.source[span.start..].chars().next().unwrap_or('\u{FFFD}');
                let resume = span.start + ch.len_utf8();
                if resume < span.end {
                    self.resume_at(resume);
                }
                Some(Err(LexError::UnexpectedChar {
                    ch,
                    line: pos.line,
                    column: pos.column,
                    span: Span::new(span.start, resume),
                }))
            }
        }
    }
}

/// Fully drained token stream plus every lexical diagnostic
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    /// Valid tokens in source order, terminated by `Eof`
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Tokenize a source string, collecting errors instead of stopping at them
pub fn tokenize(source: &str) -> Lexed {
    let mut lexer = Lexer::new(source);
    let mut lexed = Lexed::default();

    for result in lexer.by_ref() {
        match result {
            Ok(token) => lexed.tokens.push(token),
            Err(error) => lexed.errors.push(error),
        }
    }

    // Add EOF token
    let end = source.len();
    lexed.tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
        pos: lexer.position(end),
    });

    lexed
}
