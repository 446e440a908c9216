//! Recursive descent parser implementation

use bug_ast::*;
use bug_lexer::{Token, TokenKind};

use crate::ParseError;

/// Deepest allowed nesting of blocks, expressions and types combined
pub const MAX_NESTING_DEPTH: usize = 64;

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with an `Eof` token, as produced by `tokenize`
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    // === Utilities ===

    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn peek_ahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(kind.describe()))
        }
    }

    fn consume_ident(&mut self) -> Result<String, ParseError> {
        let token = self.consume(TokenKind::Ident)?;
        Ok(token.text(self.source).to_string())
    }

    /// Run `parse` one nesting level deeper
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            let token = self.current();
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                line: token.pos.line,
                column: token.pos.column,
                span: token.span,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn error(&self, expected: &str) -> ParseError {
        ParseError::unexpected(expected, self.current(), self.source)
    }

    fn span(&self) -> Span {
        self.current().span
    }

    /// Span from `start` to the end of the last consumed token
    fn span_from(&self, start: Span) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(prev) if prev.span.end >= start.start => start.merge(prev.span),
            _ => start,
        }
    }

    // === Module ===

    pub fn parse_module(&mut self) -> Result<Module, ParseError> {
        let start = self.span();
        let mut declarations = Vec::new();

        while !self.at(TokenKind::Eof) {
            // Stray semicolons between declarations leave nothing behind
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            declarations.push(self.parse_declaration()?);
        }

        Ok(Module {
            declarations,
            span: start.merge(self.span()),
        })
    }

    // === Declarations ===

    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let start = self.span();

        let kind = match self.peek() {
            TokenKind::Fn => DeclarationKind::Function(self.parse_function_decl()?),
            TokenKind::Let => DeclarationKind::Var(self.parse_var_decl()?),
            TokenKind::Struct => DeclarationKind::Struct(self.parse_struct_decl()?),
            TokenKind::Enum => DeclarationKind::Enum(self.parse_enum_decl()?),
            _ => return Err(self.error("declaration")),
        };

        Ok(Declaration {
            kind,
            span: self.span_from(start),
        })
    }

    fn parse_function_decl(&mut self) -> Result<FunctionDecl, ParseError> {
        let start = self.span();
        self.consume(TokenKind::Fn)?;
        let name = self.consume_ident()?;

        self.consume(TokenKind::LParen)?;
        let params = if self.at(TokenKind::RParen) {
            vec![]
        } else {
            self.parse_params()?
        };
        self.consume(TokenKind::RParen)?;

        let return_type = if self.eat(TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Parameter>, ParseError> {
        let mut params = Vec::new();
        loop {
            let start = self.span();
            let name = self.consume_ident()?;
            self.consume(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            params.push(Parameter {
                name,
                ty,
                span: self.span_from(start),
            });

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let start = self.span();
        self.consume(TokenKind::Let)?;
        let name = self.consume_ident()?;
        self.consume(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.consume(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        self.consume(TokenKind::Semicolon)?;

        Ok(VarDecl {
            name,
            ty,
            value,
            span: self.span_from(start),
        })
    }

    fn parse_struct_decl(&mut self) -> Result<StructDecl, ParseError> {
        let start = self.span();
        self.consume(TokenKind::Struct)?;
        let name = self.consume_ident()?;
        self.consume(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        loop {
            let field_start = self.span();
            let field_name = self.consume_ident()?;
            self.consume(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            fields.push(FieldDecl {
                name: field_name,
                ty,
                span: self.span_from(field_start),
            });

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::RBrace)?;

        Ok(StructDecl {
            name,
            fields,
            span: self.span_from(start),
        })
    }

    fn parse_enum_decl(&mut self) -> Result<EnumDecl, ParseError> {
        let start = self.span();
        self.consume(TokenKind::Enum)?;
        let name = self.consume_ident()?;
        self.consume(TokenKind::LBrace)?;

        let mut variants = Vec::new();
        loop {
            let variant_start = self.span();
            let variant_name = self.consume_ident()?;
            let value = if self.eat(TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            variants.push(VariantDecl {
                name: variant_name,
                value,
                span: self.span_from(variant_start),
            });

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::RBrace)?;

        Ok(EnumDecl {
            name,
            variants,
            span: self.span_from(start),
        })
    }

    // === Types ===

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let start = self.span();

        match self.peek() {
            kind if kind.is_primitive_type() || kind == TokenKind::Ident => {
                let token = self.advance();
                Ok(Type::named(token.text(self.source), start))
            }
            TokenKind::LBracket => {
                self.advance();
                let element = self.nested(Self::parse_type)?;
                let size = if self.eat(TokenKind::Semicolon) {
                    let token = self.consume(TokenKind::Int)?;
                    let text = token.text(self.source);
                    let size = text.parse::<u64>().map_err(|_| ParseError::InvalidArraySize {
                        text: text.to_string(),
                        line: token.pos.line,
                        column: token.pos.column,
                        span: token.span,
                    })?;
                    Some(size)
                } else {
                    None
                };
                self.consume(TokenKind::RBracket)?;
                Ok(Type {
                    kind: TypeKind::Array {
                        element: Box::new(element),
                        size,
                    },
                    span: self.span_from(start),
                })
            }
            TokenKind::Star => {
                self.advance();
                let element = self.nested(Self::parse_type)?;
                Ok(Type {
                    kind: TypeKind::Pointer(Box::new(element)),
                    span: self.span_from(start),
                })
            }
            _ => Err(self.error("type")),
        }
    }

    // === Statements ===

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.span();
        self.consume(TokenKind::LBrace)?;

        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            statements.push(self.nested(Self::parse_statement)?);
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Block {
            statements,
            span: self.span_from(start),
        })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.span();

        let kind = match self.peek() {
            TokenKind::Semicolon => {
                self.advance();
                StatementKind::Empty
            }
            TokenKind::Let => StatementKind::Let(self.parse_var_decl()?),
            TokenKind::Return => self.parse_return_stmt()?,
            TokenKind::If => StatementKind::If(self.parse_if_stmt()?),
            TokenKind::Loop => self.parse_loop_stmt()?,
            TokenKind::Ident if self.peek_ahead(1) == TokenKind::Eq => self.parse_assign_stmt()?,
            _ => {
                let expr = self.parse_expr()?;
                self.consume(TokenKind::Semicolon)?;
                StatementKind::Expr(expr)
            }
        };

        Ok(Statement {
            kind,
            span: self.span_from(start),
        })
    }

    fn parse_return_stmt(&mut self) -> Result<StatementKind, ParseError> {
        self.consume(TokenKind::Return)?;

        let value = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenKind::Semicolon)?;

        Ok(StatementKind::Return(value))
    }

    fn parse_assign_stmt(&mut self) -> Result<StatementKind, ParseError> {
        let target = self.consume_ident()?;
        self.consume(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        self.consume(TokenKind::Semicolon)?;

        Ok(StatementKind::Assign { target, value })
    }

    /// `if` with its trailing branch. An `else if` recurses, so the nested
    /// if-statement always belongs to the nearest preceding `if`.
    fn parse_if_stmt(&mut self) -> Result<IfStmt, ParseError> {
        let start = self.span();
        self.consume(TokenKind::If)?;
        let condition = self.parse_expr()?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.eat(TokenKind::Else) {
            if self.at(TokenKind::If) {
                Some(ElseBranch::If(Box::new(self.nested(Self::parse_if_stmt)?)))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };

        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: self.span_from(start),
        })
    }

    fn parse_loop_stmt(&mut self) -> Result<StatementKind, ParseError> {
        self.consume(TokenKind::Loop)?;
        let body = self.parse_block()?;
        self.consume(TokenKind::While)?;
        let condition = self.parse_expr()?;
        self.consume(TokenKind::Semicolon)?;

        Ok(StatementKind::Loop { body, condition })
    }

    // === Expressions ===

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_or)
    }

    /// One left-associative precedence level: `next (op next)*`
    fn parse_binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr, ParseError>,
        op_for: fn(TokenKind) -> Option<BinaryOp>,
    ) -> Result<Expr, ParseError> {
        let mut left = next(self)?;

        while let Some(op) = op_for(self.peek()) {
            self.advance();
            let right = next(self)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Self::parse_and, |kind| match kind {
            TokenKind::OrOr => Some(BinaryOp::Or),
            _ => None,
        })
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Self::parse_equality, |kind| match kind {
            TokenKind::AndAnd => Some(BinaryOp::And),
            _ => None,
        })
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Self::parse_comparison, |kind| match kind {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::Ne => Some(BinaryOp::Ne),
            _ => None,
        })
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Self::parse_term, |kind| match kind {
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Le => Some(BinaryOp::Le),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::Ge => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Self::parse_factor, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Self::parse_unary, |kind| match kind {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();

        let op = match self.peek() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = self.nested(Self::parse_unary)?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();
        let mut expr = self.parse_primary()?;

        loop {
            if self.eat(TokenKind::Dot) {
                // Field access
                let field = self.consume_ident()?;
                expr = Expr::new(
                    ExprKind::Field {
                        object: Box::new(expr),
                        field,
                    },
                    self.span_from(start),
                );
            } else if self.eat(TokenKind::LBracket) {
                // Index
                let index = self.parse_expr()?;
                self.consume(TokenKind::RBracket)?;
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    self.span_from(start),
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();

        let literal_type = match self.peek() {
            TokenKind::Int => Some(LiteralType::Int),
            TokenKind::Float => Some(LiteralType::Float),
            TokenKind::String => Some(LiteralType::String),
            TokenKind::True | TokenKind::False => Some(LiteralType::Bool),
            _ => None,
        };
        if let Some(ty) = literal_type {
            let token = self.advance();
            return Ok(Expr::new(
                ExprKind::Literal(Literal::new(token.value(self.source), ty)),
                start,
            ));
        }

        match self.peek() {
            TokenKind::Ident => {
                let name = self.consume_ident()?;
                if self.eat(TokenKind::LParen) {
                    let args = if self.at(TokenKind::RParen) {
                        vec![]
                    } else {
                        self.parse_expr_list()?
                    };
                    self.consume(TokenKind::RParen)?;
                    Ok(Expr::new(
                        ExprKind::Call { callee: name, args },
                        self.span_from(start),
                    ))
                } else {
                    Ok(Expr::new(ExprKind::Ident(name), start))
                }
            }
            TokenKind::LParen => {
                // Grouping only; precedence is recorded by the tree shape
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                // List literal
                self.advance();
                let elements = if self.at(TokenKind::RBracket) {
                    vec![]
                } else {
                    self.parse_expr_list()?
                };
                self.consume(TokenKind::RBracket)?;
                Ok(Expr::new(ExprKind::List(elements), self.span_from(start)))
            }
            TokenKind::Match => self.parse_match_expr(),
            TokenKind::New => self.parse_new_struct(),
            _ => Err(self.error("expression")),
        }
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_match_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();
        self.consume(TokenKind::Match)?;
        let scrutinee = self.parse_expr()?;
        self.consume(TokenKind::LBrace)?;

        let mut cases = Vec::new();
        let mut wildcard: Option<Span> = None;
        loop {
            let case_start = self.span();
            let case_token = self.current().clone();

            let pattern = if self.eat(TokenKind::Star) {
                if let Some(first) = wildcard {
                    return Err(ParseError::DuplicateWildcard {
                        line: case_token.pos.line,
                        column: case_token.pos.column,
                        span: case_token.span,
                        first,
                    });
                }
                wildcard = Some(case_token.span);
                Pattern::Wildcard
            } else {
                Pattern::Expr(self.parse_expr()?)
            };

            self.consume(TokenKind::FatArrow)?;
            let body = self.parse_expr()?;
            cases.push(MatchCase {
                pattern,
                body,
                span: self.span_from(case_start),
            });

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Expr::new(
            ExprKind::Match {
                scrutinee: Box::new(scrutinee),
                cases,
            },
            self.span_from(start),
        ))
    }

    fn parse_new_struct(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();
        self.consume(TokenKind::New)?;
        let name = self.consume_ident()?;
        self.consume(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        loop {
            let field_start = self.span();
            let field_name = self.consume_ident()?;
            self.consume(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            fields.push(FieldInit {
                name: field_name,
                value,
                span: self.span_from(field_start),
            });

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Expr::new(
            ExprKind::NewStruct { name, fields },
            self.span_from(start),
        ))
    }
}
