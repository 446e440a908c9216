//! Arena-backed syntax tree with parent back-references
//!
//! The typed AST owns its children and has no upward links. `SyntaxTree`
//! indexes the same nodes in an arena addressed by [`NodeId`], giving every
//! node a parent link for generic ancestor/descendant/sibling queries.
//! Nodes are only ever appended; once built the tree is read-only.

use std::fmt::{self, Write};

use crate::*;

/// Stable index of a node within its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of node kinds, one per typed AST node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,

    // Declarations
    FunctionDecl,
    VarDecl,
    StructDecl,
    EnumDecl,
    Parameter,
    Field,
    Variant,
    Type,

    // Statements
    Block,
    ExprStmt,
    AssignStmt,
    ReturnStmt,
    IfStmt,
    LoopStmt,
    EmptyStmt,

    // Expressions
    Literal,
    Ident,
    Unary,
    Binary,
    Call,
    FieldAccess,
    Index,
    Match,
    List,
    NewStruct,
    FieldInit,

    // Match cases
    MatchCase,
    WildcardPattern,
    ExprPattern,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::FunctionDecl => "FunctionDecl",
            NodeKind::VarDecl => "VarDecl",
            NodeKind::StructDecl => "StructDecl",
            NodeKind::EnumDecl => "EnumDecl",
            NodeKind::Parameter => "Parameter",
            NodeKind::Field => "Field",
            NodeKind::Variant => "Variant",
            NodeKind::Type => "Type",
            NodeKind::Block => "Block",
            NodeKind::ExprStmt => "ExprStmt",
            NodeKind::AssignStmt => "AssignStmt",
            NodeKind::ReturnStmt => "ReturnStmt",
            NodeKind::IfStmt => "IfStmt",
            NodeKind::LoopStmt => "LoopStmt",
            NodeKind::EmptyStmt => "EmptyStmt",
            NodeKind::Literal => "Literal",
            NodeKind::Ident => "Ident",
            NodeKind::Unary => "Unary",
            NodeKind::Binary => "Binary",
            NodeKind::Call => "Call",
            NodeKind::FieldAccess => "FieldAccess",
            NodeKind::Index => "Index",
            NodeKind::Match => "Match",
            NodeKind::List => "List",
            NodeKind::NewStruct => "NewStruct",
            NodeKind::FieldInit => "FieldInit",
            NodeKind::MatchCase => "MatchCase",
            NodeKind::WildcardPattern => "WildcardPattern",
            NodeKind::ExprPattern => "ExprPattern",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One arena slot
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Name, operator or literal text carried by the node, if any
    pub label: Option<String>,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Create a tree holding only a root node
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            nodes: vec![Node {
                kind,
                label: None,
                span,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Index every node of a module in source order
    pub fn from_module(module: &Module) -> Self {
        let mut builder = TreeBuilder {
            tree: SyntaxTree::new(NodeKind::Module, module.span),
        };
        let root = builder.tree.root();
        for decl in &module.declarations {
            builder.visit_declaration(root, decl);
        }
        builder.tree
    }

    /// Append a new node as the last child of `parent`.
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        label: Option<String>,
        span: Span,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            label,
            span,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    // === Read-only traversal ===

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Parent, grandparent, ... up to the root, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            ancestors.push(node);
            current = self.parent(node);
        }
        ancestors
    }

    /// Every node below `id` in pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            descendants.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        descendants
    }

    /// The other children of this node's parent, in order. The root has none.
    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(parent) => self
                .children(parent)
                .iter()
                .copied()
                .filter(|&child| child != id)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Indented one-node-per-line rendering of the whole tree
    pub fn outline(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.index()];
            let _ = write!(out, "{}{}", "  ".repeat(depth), node.kind);
            if let Some(label) = &node.label {
                let _ = write!(out, " {}", label);
            }
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }
}

/// Walks the typed AST and appends one arena node per AST node
struct TreeBuilder {
    tree: SyntaxTree,
}

impl TreeBuilder {
    fn add(&mut self, parent: NodeId, kind: NodeKind, label: Option<&str>, span: Span) -> NodeId {
        self.tree
            .append_child(parent, kind, label.map(str::to_string), span)
    }

    fn visit_declaration(&mut self, parent: NodeId, decl: &Declaration) {
        match &decl.kind {
            DeclarationKind::Function(f) => {
                let id = self.add(parent, NodeKind::FunctionDecl, Some(&f.name), f.span);
                for param in &f.params {
                    let p = self.add(id, NodeKind::Parameter, Some(&param.name), param.span);
                    self.visit_type(p, &param.ty);
                }
                if let Some(ty) = &f.return_type {
                    self.visit_type(id, ty);
                }
                self.visit_block(id, &f.body);
            }
            DeclarationKind::Var(v) => self.visit_var(parent, v),
            DeclarationKind::Struct(s) => {
                let id = self.add(parent, NodeKind::StructDecl, Some(&s.name), s.span);
                for field in &s.fields {
                    let f = self.add(id, NodeKind::Field, Some(&field.name), field.span);
                    self.visit_type(f, &field.ty);
                }
            }
            DeclarationKind::Enum(e) => {
                let id = self.add(parent, NodeKind::EnumDecl, Some(&e.name), e.span);
                for variant in &e.variants {
                    let v = self.add(id, NodeKind::Variant, Some(&variant.name), variant.span);
                    if let Some(value) = &variant.value {
                        self.visit_expr(v, value);
                    }
                }
            }
        }
    }

    fn visit_var(&mut self, parent: NodeId, var: &VarDecl) {
        let id = self.add(parent, NodeKind::VarDecl, Some(&var.name), var.span);
        self.visit_type(id, &var.ty);
        self.visit_expr(id, &var.value);
    }

    fn visit_type(&mut self, parent: NodeId, ty: &Type) {
        match &ty.kind {
            TypeKind::Named(name) => {
                self.add(parent, NodeKind::Type, Some(name), ty.span);
            }
            TypeKind::Array { element, size } => {
                let label = match size {
                    Some(n) => format!("array[{}]", n),
                    None => "array".to_string(),
                };
                let id = self.add(parent, NodeKind::Type, Some(&label), ty.span);
                self.visit_type(id, element);
            }
            TypeKind::Pointer(element) => {
                let id = self.add(parent, NodeKind::Type, Some("ptr"), ty.span);
                self.visit_type(id, element);
            }
        }
    }

    fn visit_block(&mut self, parent: NodeId, block: &Block) {
        let id = self.add(parent, NodeKind::Block, None, block.span);
        for stmt in &block.statements {
            self.visit_statement(id, stmt);
        }
    }

    fn visit_statement(&mut self, parent: NodeId, stmt: &Statement) {
        match &stmt.kind {
            StatementKind::Expr(expr) => {
                let id = self.add(parent, NodeKind::ExprStmt, None, stmt.span);
                self.visit_expr(id, expr);
            }
            StatementKind::Let(var) => self.visit_var(parent, var),
            StatementKind::Assign { target, value } => {
                let id = self.add(parent, NodeKind::AssignStmt, Some(target), stmt.span);
                self.visit_expr(id, value);
            }
            StatementKind::Return(value) => {
                let id = self.add(parent, NodeKind::ReturnStmt, None, stmt.span);
                if let Some(value) = value {
                    self.visit_expr(id, value);
                }
            }
            StatementKind::If(if_stmt) => self.visit_if(parent, if_stmt),
            StatementKind::Loop { body, condition } => {
                let id = self.add(parent, NodeKind::LoopStmt, None, stmt.span);
                self.visit_block(id, body);
                self.visit_expr(id, condition);
            }
            StatementKind::Empty => {
                self.add(parent, NodeKind::EmptyStmt, None, stmt.span);
            }
        }
    }

    fn visit_if(&mut self, parent: NodeId, if_stmt: &IfStmt) {
        let id = self.add(parent, NodeKind::IfStmt, None, if_stmt.span);
        self.visit_expr(id, &if_stmt.condition);
        self.visit_block(id, &if_stmt.then_branch);
        match &if_stmt.else_branch {
            Some(ElseBranch::Block(block)) => self.visit_block(id, block),
            Some(ElseBranch::If(nested)) => self.visit_if(id, nested),
            None => {}
        }
    }

    fn visit_expr(&mut self, parent: NodeId, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(lit) => {
                self.add(parent, NodeKind::Literal, Some(&lit.value), expr.span);
            }
            ExprKind::Ident(name) => {
                self.add(parent, NodeKind::Ident, Some(name), expr.span);
            }
            ExprKind::Unary { op, operand } => {
                let id = self.add(parent, NodeKind::Unary, Some(op.symbol()), expr.span);
                self.visit_expr(id, operand);
            }
            ExprKind::Binary { op, left, right } => {
                let id = self.add(parent, NodeKind::Binary, Some(op.symbol()), expr.span);
                self.visit_expr(id, left);
                self.visit_expr(id, right);
            }
            ExprKind::Call { callee, args } => {
                let id = self.add(parent, NodeKind::Call, Some(callee), expr.span);
                for arg in args {
                    self.visit_expr(id, arg);
                }
            }
            ExprKind::Field { object, field } => {
                let id = self.add(parent, NodeKind::FieldAccess, Some(field), expr.span);
                self.visit_expr(id, object);
            }
            ExprKind::Index { object, index } => {
                let id = self.add(parent, NodeKind::Index, None, expr.span);
                self.visit_expr(id, object);
                self.visit_expr(id, index);
            }
            ExprKind::Match { scrutinee, cases } => {
                let id = self.add(parent, NodeKind::Match, None, expr.span);
                self.visit_expr(id, scrutinee);
                for case in cases {
                    let c = self.add(id, NodeKind::MatchCase, None, case.span);
                    match &case.pattern {
                        Pattern::Wildcard => {
                            self.add(c, NodeKind::WildcardPattern, None, case.span);
                        }
                        Pattern::Expr(pattern) => {
                            let p = self.add(c, NodeKind::ExprPattern, None, pattern.span);
                            self.visit_expr(p, pattern);
                        }
                    }
                    self.visit_expr(c, &case.body);
                }
            }
            ExprKind::List(elements) => {
                let id = self.add(parent, NodeKind::List, None, expr.span);
                for element in elements {
                    self.visit_expr(id, element);
                }
            }
            ExprKind::NewStruct { name, fields } => {
                let id = self.add(parent, NodeKind::NewStruct, Some(name), expr.span);
                for field in fields {
                    let f = self.add(id, NodeKind::FieldInit, Some(&field.name), field.span);
                    self.visit_expr(f, &field.value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Ident(name.to_string()), Span::dummy())
    }

    fn sample_module() -> Module {
        // fn f(a: i32) { a + b; }
        let body = Block {
            statements: vec![Statement {
                kind: StatementKind::Expr(Expr::new(
                    ExprKind::Binary {
                        op: BinaryOp::Add,
                        left: Box::new(ident("a")),
                        right: Box::new(ident("b")),
                    },
                    Span::dummy(),
                )),
                span: Span::dummy(),
            }],
            span: Span::dummy(),
        };
        Module {
            declarations: vec![Declaration {
                kind: DeclarationKind::Function(FunctionDecl {
                    name: "f".to_string(),
                    params: vec![Parameter {
                        name: "a".to_string(),
                        ty: Type::named("i32", Span::dummy()),
                        span: Span::dummy(),
                    }],
                    return_type: None,
                    body,
                    span: Span::dummy(),
                }),
                span: Span::dummy(),
            }],
            span: Span::dummy(),
        }
    }

    #[test]
    fn test_append_child_sets_parent() {
        let mut tree = SyntaxTree::new(NodeKind::Module, Span::dummy());
        let root = tree.root();
        let a = tree.append_child(root, NodeKind::VarDecl, Some("a".into()), Span::dummy());
        let b = tree.append_child(root, NodeKind::VarDecl, Some("b".into()), Span::dummy());
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.siblings(a), vec![b]);
        assert!(tree.siblings(root).is_empty());
    }

    #[test]
    fn test_from_module_shape() {
        let tree = SyntaxTree::from_module(&sample_module());
        let root = tree.root();
        assert_eq!(tree.kind(root), NodeKind::Module);

        let func = tree.children(root)[0];
        assert_eq!(tree.kind(func), NodeKind::FunctionDecl);
        let kinds: Vec<_> = tree.children(func).iter().map(|&c| tree.kind(c)).collect();
        assert_eq!(kinds, vec![NodeKind::Parameter, NodeKind::Block]);

        // Module, FunctionDecl, Parameter, Type, Block, ExprStmt, Binary, Ident, Ident
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.count_kind(NodeKind::Ident), 2);
    }

    #[test]
    fn test_descendants_are_preorder() {
        let tree = SyntaxTree::from_module(&sample_module());
        let kinds: Vec<_> = tree
            .descendants(tree.root())
            .into_iter()
            .map(|id| tree.kind(id))
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::FunctionDecl,
                NodeKind::Parameter,
                NodeKind::Type,
                NodeKind::Block,
                NodeKind::ExprStmt,
                NodeKind::Binary,
                NodeKind::Ident,
                NodeKind::Ident,
            ]
        );
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let tree = SyntaxTree::from_module(&sample_module());
        let last = tree.descendants(tree.root()).pop().unwrap();
        let kinds: Vec<_> = tree
            .ancestors(last)
            .into_iter()
            .map(|id| tree.kind(id))
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Binary,
                NodeKind::ExprStmt,
                NodeKind::Block,
                NodeKind::FunctionDecl,
                NodeKind::Module,
            ]
        );
    }

    #[test]
    fn test_every_node_listed_once_by_its_parent() {
        let tree = SyntaxTree::from_module(&sample_module());
        for id in tree.descendants(tree.root()) {
            let parent = tree.parent(id).unwrap();
            let hits = tree.children(parent).iter().filter(|&&c| c == id).count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_outline() {
        let tree = SyntaxTree::from_module(&sample_module());
        let outline = tree.outline();
        assert!(outline.starts_with("Module\n  FunctionDecl f\n    Parameter a\n      Type i32\n"));
        assert!(outline.contains("        Binary +\n"));
    }
}
