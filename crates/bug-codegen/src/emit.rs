//! Syntax-directed C emitter
//!
//! Declarations and statements are written line by line into an output
//! buffer; expressions render to strings so they can be nested. Every AST
//! kind has exactly one renderer.

use bug_ast::*;

use crate::ctype::{render_return_type, render_type};
use crate::{CodegenError, CodegenOptions};

/// Binding strength of postfix operators and primaries, above every binary level
const POSTFIX_PRECEDENCE: u8 = 8;
/// Prefix operators bind tighter than any binary operator
const UNARY_PRECEDENCE: u8 = 7;

pub struct CEmitter<'a> {
    options: &'a CodegenOptions,
    out: String,
}

impl<'a> CEmitter<'a> {
    pub fn new(options: &'a CodegenOptions) -> Self {
        Self {
            options,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn emit_module(&mut self, module: &Module) -> Result<(), CodegenError> {
        self.out.push_str("#include <stdio.h>\n");
        self.out
            .push_str(&format!("#include \"{}\"\n", self.options.runtime_header));

        for decl in &module.declarations {
            self.out.push('\n');
            self.emit_declaration(decl)?;
        }
        Ok(())
    }

    // ===== Declarations =====

    fn emit_declaration(&mut self, decl: &Declaration) -> Result<(), CodegenError> {
        match &decl.kind {
            DeclarationKind::Function(func) => self.emit_function(func),
            DeclarationKind::Var(var) => self.emit_var(var, 0),
            DeclarationKind::Struct(decl) => {
                self.emit_struct(decl);
                Ok(())
            }
            DeclarationKind::Enum(decl) => self.emit_enum(decl),
        }
    }

    fn emit_function(&mut self, func: &FunctionDecl) -> Result<(), CodegenError> {
        let params: Vec<String> = func
            .params
            .iter()
            .map(|p| render_type(&p.ty).declare(&p.name))
            .collect();

        let header = format!(
            "{} {}({}) {{",
            render_return_type(func.return_type.as_ref()),
            func.name,
            params.join(", ")
        );
        self.line(0, &header);
        self.emit_block(&func.body, 1)?;
        self.line(0, "}");
        Ok(())
    }

    fn emit_var(&mut self, var: &VarDecl, depth: usize) -> Result<(), CodegenError> {
        let value = self.expr(&var.value)?;
        let text = format!("{} = {};", render_type(&var.ty).declare(&var.name), value);
        self.line(depth, &text);
        Ok(())
    }

    fn emit_struct(&mut self, decl: &StructDecl) {
        self.line(0, "typedef struct {");
        for field in &decl.fields {
            let text = format!("{};", render_type(&field.ty).declare(&field.name));
            self.line(1, &text);
        }
        self.line(0, &format!("}} {};", decl.name));
    }

    fn emit_enum(&mut self, decl: &EnumDecl) -> Result<(), CodegenError> {
        self.line(0, &format!("enum {} {{", decl.name));
        for variant in &decl.variants {
            let text = match &variant.value {
                Some(value) => format!("{} = {},", variant.name, self.expr(value)?),
                None => format!("{},", variant.name),
            };
            self.line(1, &text);
        }
        self.line(0, "};");
        Ok(())
    }

    // ===== Statements =====

    fn emit_block(&mut self, block: &Block, depth: usize) -> Result<(), CodegenError> {
        for stmt in &block.statements {
            self.emit_statement(stmt, depth)?;
        }
        Ok(())
    }

    fn emit_statement(&mut self, stmt: &Statement, depth: usize) -> Result<(), CodegenError> {
        match &stmt.kind {
            StatementKind::Expr(expr) => {
                let text = self.expr_statement(expr)?;
                self.line(depth, &text);
            }
            StatementKind::Let(var) => self.emit_var(var, depth)?,
            StatementKind::Assign { target, value } => {
                let text = format!("{} = {};", target, self.expr(value)?);
                self.line(depth, &text);
            }
            StatementKind::Return(value) => {
                let text = match value {
                    Some(value) => format!("return {};", self.expr(value)?),
                    None => "return;".to_string(),
                };
                self.line(depth, &text);
            }
            StatementKind::If(if_stmt) => self.emit_if(if_stmt, depth)?,
            StatementKind::Loop { body, condition } => {
                self.line(depth, "do {");
                self.emit_block(body, depth + 1)?;
                let text = format!("}} while ({});", self.expr(condition)?);
                self.line(depth, &text);
            }
            StatementKind::Empty => self.line(depth, ";"),
        }
        Ok(())
    }

    fn emit_if(&mut self, if_stmt: &IfStmt, depth: usize) -> Result<(), CodegenError> {
        let text = format!("if ({}) {{", self.expr(&if_stmt.condition)?);
        self.line(depth, &text);
        self.emit_block(&if_stmt.then_branch, depth + 1)?;

        let mut tail = if_stmt.else_branch.as_ref();
        while let Some(branch) = tail {
            match branch {
                ElseBranch::If(nested) => {
                    let text = format!("}} else if ({}) {{", self.expr(&nested.condition)?);
                    self.line(depth, &text);
                    self.emit_block(&nested.then_branch, depth + 1)?;
                    tail = nested.else_branch.as_ref();
                }
                ElseBranch::Block(block) => {
                    self.line(depth, "} else {");
                    self.emit_block(block, depth + 1)?;
                    tail = None;
                }
            }
        }

        self.line(depth, "}");
        Ok(())
    }

    /// An expression in statement position. A match becomes an if chain.
    fn expr_statement(&self, expr: &Expr) -> Result<String, CodegenError> {
        match &expr.kind {
            ExprKind::Match { scrutinee, cases } => self.match_statement(scrutinee, cases, expr.span),
            _ => Ok(format!("{};", self.expr(expr)?)),
        }
    }

    // ===== Match lowering =====

    /// `if (s == p1) { e1; } else if (s == p2) { e2; } else { ew; }`
    fn match_statement(
        &self,
        scrutinee: &Expr,
        cases: &[MatchCase],
        span: Span,
    ) -> Result<String, CodegenError> {
        let (tested, fallback) = split_cases(cases, span)?;
        let subject = self.operand(scrutinee, BinaryOp::Eq.precedence(), false)?;

        let mut parts = Vec::with_capacity(cases.len());
        for (i, (pattern, case)) in tested.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "else if" };
            parts.push(format!(
                "{} ({}) {{ {} }}",
                keyword,
                self.case_test(&subject, pattern)?,
                self.expr_statement(&case.body)?
            ));
        }

        if let Some(case) = fallback {
            let body = format!("{{ {} }}", self.expr_statement(&case.body)?);
            if parts.is_empty() {
                parts.push(body);
            } else {
                parts.push(format!("else {}", body));
            }
        }

        Ok(parts.join(" "))
    }

    /// `((s == p1) ? e1 : (s == p2) ? e2 : ew)`
    ///
    /// A conditional expression needs a final value, so without a wildcard
    /// the last case becomes that fallback and its pattern is never tested:
    /// `match x { 1 => 10, 2 => 20 }` yields 20 for every `x != 1`.
    fn match_value(
        &self,
        scrutinee: &Expr,
        cases: &[MatchCase],
        span: Span,
    ) -> Result<String, CodegenError> {
        let (mut tested, fallback) = split_cases(cases, span)?;
        let last = match fallback {
            Some(case) => &case.body,
            None => match tested.pop() {
                Some((_, case)) => &case.body,
                None => return Err(CodegenError::EmptyMatch { span }),
            },
        };

        let subject = self.operand(scrutinee, BinaryOp::Eq.precedence(), false)?;
        let mut text = String::from("(");
        for (pattern, case) in &tested {
            text.push_str(&format!(
                "({}) ? {} : ",
                self.case_test(&subject, pattern)?,
                self.expr(&case.body)?
            ));
        }
        text.push_str(&self.expr(last)?);
        text.push(')');
        Ok(text)
    }

    fn case_test(&self, subject: &str, pattern: &Expr) -> Result<String, CodegenError> {
        let pattern = self.operand(pattern, BinaryOp::Eq.precedence(), true)?;
        Ok(format!("{} == {}", subject, pattern))
    }

    // ===== Expressions =====

    pub fn expr(&self, expr: &Expr) -> Result<String, CodegenError> {
        let text = match &expr.kind {
            ExprKind::Literal(lit) => literal(lit),
            ExprKind::Ident(name) => name.clone(),
            ExprKind::Unary { op, operand } => {
                format!("{}{}", op.symbol(), self.operand(operand, UNARY_PRECEDENCE, false)?)
            }
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                format!(
                    "{} {} {}",
                    self.operand(left, prec, false)?,
                    op.symbol(),
                    self.operand(right, prec, true)?
                )
            }
            ExprKind::Call { callee, args } => {
                format!("{}({})", callee, self.expr_list(args)?.join(", "))
            }
            ExprKind::Field { object, field } => {
                format!("{}.{}", self.operand(object, POSTFIX_PRECEDENCE, false)?, field)
            }
            ExprKind::Index { object, index } => format!(
                "{}[{}]",
                self.operand(object, POSTFIX_PRECEDENCE, false)?,
                self.expr(index)?
            ),
            ExprKind::Match { scrutinee, cases } => self.match_value(scrutinee, cases, expr.span)?,
            ExprKind::List(items) => format!("{{{}}}", self.expr_list(items)?.join(", ")),
            ExprKind::NewStruct { fields, .. } => {
                if fields.is_empty() {
                    "{}".to_string()
                } else {
                    let inits = fields
                        .iter()
                        .map(|f| Ok(format!(".{} = {}", f.name, self.expr(&f.value)?)))
                        .collect::<Result<Vec<_>, CodegenError>>()?;
                    format!("{{ {} }}", inits.join(", "))
                }
            }
        };
        Ok(text)
    }

    fn expr_list(&self, exprs: &[Expr]) -> Result<Vec<String>, CodegenError> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    /// Render `expr` as an operand of an operator with precedence `outer`,
    /// adding parentheses where C would otherwise regroup it. Every binary
    /// level is left-associative, so an equal-precedence right operand needs
    /// them too.
    fn operand(&self, expr: &Expr, outer: u8, right: bool) -> Result<String, CodegenError> {
        let inner = match &expr.kind {
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Unary { .. } => UNARY_PRECEDENCE,
            _ => POSTFIX_PRECEDENCE,
        };
        let text = self.expr(expr)?;
        // `- -x` must not print as `--x`
        let nested_unary = outer == UNARY_PRECEDENCE && inner == UNARY_PRECEDENCE;
        if inner < outer || (right && inner == outer) || nested_unary {
            Ok(format!("({})", text))
        } else {
            Ok(text)
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        self.out
            .push_str(&" ".repeat(depth * self.options.indent_width));
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Tested cases in source order, plus the wildcard case if there is one
fn split_cases(
    cases: &[MatchCase],
    span: Span,
) -> Result<(Vec<(&Expr, &MatchCase)>, Option<&MatchCase>), CodegenError> {
    if cases.is_empty() {
        return Err(CodegenError::EmptyMatch { span });
    }

    let mut tested = Vec::with_capacity(cases.len());
    let mut wildcards = Vec::new();
    for case in cases {
        match &case.pattern {
            Pattern::Wildcard => wildcards.push(case),
            Pattern::Expr(pattern) => tested.push((pattern, case)),
        }
    }

    if wildcards.len() > 1 {
        return Err(CodegenError::DuplicateWildcard {
            count: wildcards.len(),
            span,
        });
    }
    Ok((tested, wildcards.pop()))
}

fn literal(lit: &Literal) -> String {
    match lit.ty {
        LiteralType::String => format!("\"{}\"", escape_string(&lit.value)),
        LiteralType::Int | LiteralType::Float | LiteralType::Bool => lit.value.clone(),
    }
}

/// Quote-escape a string body. Escape sequences already written in the
/// source pass through; raw newlines become `\n`. A trailing lone
/// backslash is doubled so it cannot escape the closing quote.
fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for ch in value.chars() {
        match ch {
            '"' if !escaped => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
        escaped = ch == '\\' && !escaped;
    }
    if escaped {
        out.push('\\');
    }
    out
}
