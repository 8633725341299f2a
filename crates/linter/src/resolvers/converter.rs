use wpf_hir::{Constant, KnownMember, SemanticModel, SymbolId};
use wpf_syntax::{for_each_expr_in_member, Expr, ExprKind, Member, MemberRef, MethodDecl, TypeDecl};

use super::{informative, returned_expressions, unique_type};

/// Source and target types a converter's `Convert` method works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionTypes {
    pub source: Option<SymbolId>,
    pub target: Option<SymbolId>,
}

/// Infers the conversion types from the `Convert` method declared on `ty`.
///
/// The source type is what the `value` parameter is cast to, tested against
/// or converted with `as`. The target type is the type of every returned
/// expression, ignoring `null`, `DependencyProperty.UnsetValue` and
/// `Binding.DoNothing`. Either side resolves only when all occurrences agree
/// on a type other than `object`. Returns `None` when `ty` declares no
/// `Convert` method.
#[must_use]
pub fn conversion_types(model: &dyn SemanticModel, ty: &TypeDecl) -> Option<ConversionTypes> {
    let convert = ty.non_type_members().find_map(|member| match member {
        Member::Method(method) if method.name.text == "Convert" && method.params.len() == 4 => {
            Some(method)
        }
        _ => None,
    })?;
    let compilation = model.compilation();
    let source = source_type(model, convert).and_then(|source| informative(compilation, source));
    let target = target_type(model, convert).and_then(|target| informative(compilation, target));
    Some(ConversionTypes { source, target })
}

fn source_type(model: &dyn SemanticModel, convert: &MethodDecl) -> Option<SymbolId> {
    let value = convert.params.first()?.name.as_str();
    let is_value = |expr: &Expr| {
        matches!(&expr.unparenthesized().kind, ExprKind::Identifier(name) if name.text == value)
    };
    let mut types = Vec::new();
    let mut unresolved = false;
    for_each_expr_in_member(MemberRef::Method(convert), &mut |expr| {
        let ty = match &expr.kind {
            ExprKind::Cast { ty, expr } | ExprKind::As { expr, ty } | ExprKind::Is { expr, ty, .. }
                if is_value(expr) =>
            {
                ty
            }
            _ => return,
        };
        match model.symbol_info(ty.id) {
            Some(resolved) => types.push(resolved),
            None => unresolved = true,
        }
    });
    if unresolved {
        return None;
    }
    unique_type(model.compilation(), types)
}

fn target_type(model: &dyn SemanticModel, convert: &MethodDecl) -> Option<SymbolId> {
    let mut types = Vec::new();
    for expr in returned_expressions(convert) {
        collect_returned_types(model, expr, &mut types)?;
    }
    unique_type(model.compilation(), types)
}

/// Pushes the type of `expr`, looking into both branches of conditionals.
fn collect_returned_types(
    model: &dyn SemanticModel,
    expr: &Expr,
    types: &mut Vec<SymbolId>,
) -> Option<()> {
    let expr = expr.unparenthesized();
    if let ExprKind::Conditional {
        when_true,
        when_false,
        ..
    } = &expr.kind
    {
        collect_returned_types(model, when_true, types)?;
        return collect_returned_types(model, when_false, types);
    }
    if is_sentinel(model, expr) {
        return Some(());
    }
    types.push(model.type_info(expr.id)?);
    Some(())
}

/// `null`, `DependencyProperty.UnsetValue` or `Binding.DoNothing`.
fn is_sentinel(model: &dyn SemanticModel, expr: &Expr) -> bool {
    if model.constant_value(expr.id) == Some(Constant::Null) {
        return true;
    }
    let Some(symbol) = model.symbol_info(expr.id) else {
        return false;
    };
    let compilation = model.compilation();
    if compilation.known().member(symbol) == Some(KnownMember::UnsetValue) {
        return true;
    }
    let target = compilation.symbol(symbol);
    target.name() == "DoNothing"
        && target
            .containing_type()
            .is_some_and(|owner| compilation.metadata_name(owner) == "System.Windows.Data.Binding")
}
