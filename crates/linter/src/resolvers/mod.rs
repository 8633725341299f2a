//! Semantic resolvers
//!
//! Turn a structural match into facts by asking the [`SemanticModel`]. Every
//! resolver returns `None` when something it depends on is unresolved; rules
//! treat that as "nothing to check".

mod backing;
mod clr;
mod converter;
mod ctor_arg;
mod markup;
mod registration;

pub use backing::{
    backing_candidate, backing_member, dependency_property_for_key, registered_name, BackingKind,
    BackingMember,
};
pub use clr::{confirm_call, AccessorCall};
pub use converter::conversion_types;
pub use ctor_arg::constructor_parameter;
pub use markup::provide_value_type;
pub use registration::{registration_at, registration_of, Registration};

use wpf_hir::{Compilation, KnownType, SemanticModel, SymbolId};
use wpf_syntax::{
    Argument, ArgumentList, ArgumentNameKind, Expr, ExprKind, MemberRef, MethodDecl, Stmt,
    StmtKind, SyntaxTree, TypeDecl,
};

/// Argument bound to the parameter named `parameter` of `method`.
///
/// `name: value` arguments match by name; positional arguments by ordinal.
pub(crate) fn argument_for<'a>(
    compilation: &Compilation,
    method: SymbolId,
    args: &'a ArgumentList,
    parameter: &str,
) -> Option<&'a Argument> {
    let named = args.args.iter().find(|arg| {
        arg.name
            .as_ref()
            .is_some_and(|n| n.kind == ArgumentNameKind::Colon && n.ident.text == parameter)
    });
    if named.is_some() {
        return named;
    }
    let ordinal = compilation
        .symbol(method)
        .as_method()?
        .parameters
        .iter()
        .filter_map(|&p| compilation.symbol(p).as_parameter())
        .find(|p| p.name == parameter)?
        .ordinal;
    args.args.get(ordinal).filter(|arg| arg.name.is_none())
}

/// Type named by a `typeof(T)` expression.
pub(crate) fn typeof_type(model: &dyn SemanticModel, expr: &Expr) -> Option<SymbolId> {
    match &expr.unparenthesized().kind {
        ExprKind::TypeOf(ty) => model.symbol_info(ty.id),
        _ => None,
    }
}

/// Constant string value of an expression.
pub(crate) fn constant_string(model: &dyn SemanticModel, expr: &Expr) -> Option<String> {
    model
        .constant_value(expr.id)
        .and_then(|constant| constant.as_str().map(str::to_owned))
}

/// Expressions a method returns: its expression body, or every `return`
/// reachable through nested blocks and `if` statements.
pub(crate) fn returned_expressions(method: &MethodDecl) -> Vec<&Expr> {
    fn collect<'a>(stmt: &'a Stmt, out: &mut Vec<&'a Expr>) {
        match &stmt.kind {
            StmtKind::Return(Some(expr)) => out.push(expr),
            StmtKind::If {
                then, otherwise, ..
            } => {
                collect(then, out);
                if let Some(otherwise) = otherwise {
                    collect(otherwise, out);
                }
            }
            StmtKind::Block(block) => block.statements.iter().for_each(|s| collect(s, out)),
            _ => {}
        }
    }

    let mut out = Vec::new();
    if let Some(expr) = &method.expression_body {
        out.push(expr);
    }
    if let Some(body) = &method.body {
        for stmt in &body.statements {
            collect(stmt, &mut out);
        }
    }
    out
}

/// The single type all `types` agree on, compared structurally.
pub(crate) fn unique_type(
    compilation: &Compilation,
    types: impl IntoIterator<Item = SymbolId>,
) -> Option<SymbolId> {
    let mut types = types.into_iter();
    let first = types.next()?;
    types
        .all(|other| compilation.types_equal(first, other))
        .then_some(first)
}

/// `None` for `object`, which carries no information about a conversion.
pub(crate) fn informative(compilation: &Compilation, ty: SymbolId) -> Option<SymbolId> {
    (!compilation.known().is(compilation, ty, KnownType::Object)).then_some(ty)
}

/// Source declarations of `ty` in `tree`.
pub(crate) fn type_declarations_in<'t>(
    compilation: &Compilation,
    tree: &'t SyntaxTree,
    ty: SymbolId,
) -> Vec<&'t TypeDecl> {
    let Some(symbol) = compilation.get_type(ty) else {
        return Vec::new();
    };
    symbol
        .declarations
        .iter()
        .filter(|decl| decl.file == tree.file_id())
        .filter_map(|decl| match tree.find_declaration(decl.node)? {
            MemberRef::Type(ty) => Some(ty),
            _ => None,
        })
        .collect()
}
