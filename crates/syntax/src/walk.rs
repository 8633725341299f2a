//! Tree walkers.
//!
//! Walkers are plain functions with stack-local state; nothing is pooled or
//! cached between calls, so they can run on any thread.

use wpf_types::OffsetRange;

use crate::ast::{
    Attribute, Block, ConstructorDecl, Expr, ExprKind, FieldDecl, Member, MemberRef, MethodDecl,
    NodeId, PropertyDecl, Stmt, StmtKind, TypeDecl,
};
use crate::SyntaxTree;

/// Node kinds analyzers can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TypeDeclaration,
    FieldDeclaration,
    PropertyDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    Attribute,
    ObjectCreation,
}

/// A node handed to analyzers.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'a> {
    Type(&'a TypeDecl),
    Field(&'a FieldDecl),
    Property(&'a PropertyDecl),
    Method(&'a MethodDecl),
    Constructor(&'a ConstructorDecl),
    Attribute(&'a Attribute),
    /// Always an [`ExprKind::ObjectCreation`].
    ObjectCreation(&'a Expr),
}

impl<'a> SyntaxNode<'a> {
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Type(_) => NodeKind::TypeDeclaration,
            Self::Field(_) => NodeKind::FieldDeclaration,
            Self::Property(_) => NodeKind::PropertyDeclaration,
            Self::Method(_) => NodeKind::MethodDeclaration,
            Self::Constructor(_) => NodeKind::ConstructorDeclaration,
            Self::Attribute(_) => NodeKind::Attribute,
            Self::ObjectCreation(_) => NodeKind::ObjectCreation,
        }
    }

    #[must_use]
    pub fn id(self) -> NodeId {
        match self {
            Self::Type(t) => t.id,
            Self::Field(f) => f.id,
            Self::Property(p) => p.id,
            Self::Method(m) => m.id,
            Self::Constructor(c) => c.id,
            Self::Attribute(a) => a.id,
            Self::ObjectCreation(e) => e.id,
        }
    }

    #[must_use]
    pub fn range(self) -> OffsetRange {
        match self {
            Self::Type(t) => t.range,
            Self::Field(f) => f.range,
            Self::Property(p) => p.range,
            Self::Method(m) => m.range,
            Self::Constructor(c) => c.range,
            Self::Attribute(a) => a.range,
            Self::ObjectCreation(e) => e.range,
        }
    }

    /// The declaration view of member nodes.
    #[must_use]
    pub fn as_member(self) -> Option<MemberRef<'a>> {
        match self {
            Self::Type(t) => Some(MemberRef::Type(t)),
            Self::Field(f) => Some(MemberRef::Field(f)),
            Self::Property(p) => Some(MemberRef::Property(p)),
            Self::Method(m) => Some(MemberRef::Method(m)),
            Self::Constructor(c) => Some(MemberRef::Constructor(c)),
            Self::Attribute(_) | Self::ObjectCreation(_) => None,
        }
    }
}

/// A node together with its enclosing declarations.
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'a> {
    pub node: SyntaxNode<'a>,
    /// Innermost type declaration; the type itself for type nodes. `None`
    /// for assembly attributes.
    pub containing_type: Option<&'a TypeDecl>,
    /// Enclosing non-type member; `None` for type-level nodes.
    pub containing_member: Option<MemberRef<'a>>,
}

/// Enumerates every analyzable node of `tree` in document order.
#[must_use]
pub fn visit_nodes(tree: &SyntaxTree) -> Vec<NodeVisit<'_>> {
    let mut visits: Vec<NodeVisit<'_>> = tree
        .root()
        .attributes
        .iter()
        .map(|attribute| NodeVisit {
            node: SyntaxNode::Attribute(attribute),
            containing_type: None,
            containing_member: None,
        })
        .collect();
    let mut stack: Vec<&TypeDecl> = tree.root().types.iter().rev().collect();

    while let Some(ty) = stack.pop() {
        visits.push(NodeVisit {
            node: SyntaxNode::Type(ty),
            containing_type: Some(ty),
            containing_member: None,
        });
        for attribute in &ty.attributes {
            visits.push(NodeVisit {
                node: SyntaxNode::Attribute(attribute),
                containing_type: Some(ty),
                containing_member: None,
            });
        }

        for member in ty.non_type_members() {
            let member_ref = member.as_member();
            let node = match member {
                Member::Field(f) => SyntaxNode::Field(f),
                Member::Property(p) => SyntaxNode::Property(p),
                Member::Method(m) => SyntaxNode::Method(m),
                Member::Constructor(c) => SyntaxNode::Constructor(c),
                Member::Type(_) => continue,
            };
            let visit = |node| NodeVisit {
                node,
                containing_type: Some(ty),
                containing_member: Some(member_ref),
            };
            visits.push(visit(node));
            for attribute in member_ref.attributes() {
                visits.push(visit(SyntaxNode::Attribute(attribute)));
            }
            for_each_expr_in_member(member_ref, &mut |expr| {
                if matches!(expr.kind, ExprKind::ObjectCreation { .. }) {
                    visits.push(visit(SyntaxNode::ObjectCreation(expr)));
                }
            });
        }

        stack.extend(ty.nested_types().collect::<Vec<_>>().into_iter().rev());
    }

    visits
}

/// Calls `f` for `expr` and every expression nested in it, parents first.
pub fn for_each_expr<'a>(expr: &'a Expr, f: &mut dyn FnMut(&'a Expr)) {
    let mut stack = vec![expr];
    while let Some(expr) = stack.pop() {
        f(expr);
        let mut children: Vec<&'a Expr> = Vec::new();
        match &expr.kind {
            ExprKind::MemberAccess { target, .. } => children.push(target),
            ExprKind::Invocation { callee, args } => {
                children.push(callee);
                children.extend(args.args.iter().map(|a| &a.expr));
            }
            ExprKind::ObjectCreation { args, .. } => {
                if let Some(args) = args {
                    children.extend(args.args.iter().map(|a| &a.expr));
                }
            }
            ExprKind::ArrayCreation { size, .. } => children.extend(size.as_deref()),
            ExprKind::Cast { expr, .. }
            | ExprKind::As { expr, .. }
            | ExprKind::Is { expr, .. }
            | ExprKind::Parenthesized(expr)
            | ExprKind::Unary { operand: expr, .. } => children.push(expr),
            ExprKind::Binary { left, right, .. } => {
                children.push(left);
                children.push(right);
            }
            ExprKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                children.push(condition);
                children.push(when_true);
                children.push(when_false);
            }
            ExprKind::Assignment { target, value } => {
                children.push(target);
                children.push(value);
            }
            ExprKind::Literal(_)
            | ExprKind::Identifier(_)
            | ExprKind::This
            | ExprKind::Base
            | ExprKind::TypeOf(_)
            | ExprKind::Default(_)
            | ExprKind::Missing => {}
        }
        stack.extend(children.into_iter().rev());
    }
}

pub fn for_each_expr_in_stmt<'a>(stmt: &'a Stmt, f: &mut dyn FnMut(&'a Expr)) {
    match &stmt.kind {
        StmtKind::Expression(expr) => for_each_expr(expr, f),
        StmtKind::Return(expr) | StmtKind::Throw(expr) => {
            if let Some(expr) = expr {
                for_each_expr(expr, f);
            }
        }
        StmtKind::Local { init, .. } => {
            if let Some(init) = init {
                for_each_expr(init, f);
            }
        }
        StmtKind::If {
            condition,
            then,
            otherwise,
        } => {
            for_each_expr(condition, f);
            for_each_expr_in_stmt(then, f);
            if let Some(otherwise) = otherwise {
                for_each_expr_in_stmt(otherwise, f);
            }
        }
        StmtKind::Block(block) => for_each_expr_in_block(block, f),
        StmtKind::Empty => {}
    }
}

pub fn for_each_expr_in_block<'a>(block: &'a Block, f: &mut dyn FnMut(&'a Expr)) {
    for stmt in &block.statements {
        for_each_expr_in_stmt(stmt, f);
    }
}

/// Visits initializers, bodies and accessor bodies of a declaration.
///
/// Attribute arguments and nested types are not visited.
pub fn for_each_expr_in_member<'a>(member: MemberRef<'a>, f: &mut dyn FnMut(&'a Expr)) {
    let mut body = |block: Option<&'a Block>, expr: Option<&'a Expr>| {
        if let Some(block) = block {
            for_each_expr_in_block(block, &mut *f);
        }
        if let Some(expr) = expr {
            for_each_expr(expr, &mut *f);
        }
    };
    match member {
        MemberRef::Field(field) => body(None, field.initializer.as_ref()),
        MemberRef::Property(property) => {
            body(None, property.expression_body.as_ref());
            for accessor in &property.accessors {
                body(accessor.body.as_ref(), accessor.expression_body.as_ref());
            }
            body(None, property.initializer.as_ref());
        }
        MemberRef::Method(method) => {
            for param in &method.params {
                body(None, param.default.as_ref());
            }
            body(method.body.as_ref(), method.expression_body.as_ref());
        }
        MemberRef::Constructor(ctor) => {
            body(ctor.body.as_ref(), ctor.expression_body.as_ref());
        }
        MemberRef::Type(_) => {}
    }
}

/// Returns `true` if the expression `id` occurs anywhere inside `stmt`.
#[must_use]
pub fn stmt_contains(stmt: &Stmt, id: NodeId) -> bool {
    let mut found = false;
    for_each_expr_in_stmt(stmt, &mut |expr| found |= expr.id == id);
    found
}
