use wpf_hir::{SemanticModel, Symbol, SymbolId};
use wpf_syntax::{for_each_expr_in_member, Expr, ExprKind, MemberRef, PropertyDecl, StmtKind, TypeDecl};

/// Name of the constructor parameter that `property` is initialized from.
///
/// Looks for `Property = parameter` or `field = parameter` assignments in the
/// constructors of `ty`, where `field` is what the property's getter returns.
/// Every such assignment must name the same parameter.
#[must_use]
pub fn constructor_parameter(
    model: &dyn SemanticModel,
    ty: &TypeDecl,
    property: SymbolId,
) -> Option<String> {
    let mut targets = vec![property];
    if let Some(field) = backing_field(model, property) {
        targets.push(field);
    }

    let compilation = model.compilation();
    let mut assigned: Option<String> = None;
    let mut conflicting = false;
    for ctor in ty.constructors() {
        for_each_expr_in_member(MemberRef::Constructor(ctor), &mut |expr| {
            let ExprKind::Assignment { target, value } = &expr.kind else {
                return;
            };
            if !model
                .symbol_info(target.unparenthesized().id)
                .is_some_and(|symbol| targets.contains(&symbol))
            {
                return;
            }
            let value = value.unparenthesized();
            let ExprKind::Identifier(name) = &value.kind else {
                return;
            };
            let is_parameter = model
                .symbol_info(value.id)
                .is_some_and(|symbol| matches!(compilation.symbol(symbol), Symbol::Parameter(_)));
            if !is_parameter {
                return;
            }
            match &assigned {
                Some(existing) if existing != &name.text => conflicting = true,
                Some(_) => {}
                None => assigned = Some(name.text.clone()),
            }
        });
    }
    if conflicting {
        tracing::trace!(?property, "constructor assigns property from different parameters");
        return None;
    }
    assigned
}

/// Field returned by a trivial getter of `property`.
fn backing_field(model: &dyn SemanticModel, property: SymbolId) -> Option<SymbolId> {
    let declaration = model.declaration(property)?;
    if declaration.tree.file_id() != model.tree().file_id() {
        return None;
    }
    let MemberRef::Property(decl) = declaration.member else {
        return None;
    };
    let returned = getter_expression(decl)?.unparenthesized();
    let field = model.symbol_info(returned.id)?;
    matches!(model.compilation().symbol(field), Symbol::Field(_)).then_some(field)
}

fn getter_expression(property: &PropertyDecl) -> Option<&Expr> {
    if let Some(expr) = &property.expression_body {
        return Some(expr);
    }
    let getter = property.getter()?;
    if let Some(expr) = &getter.expression_body {
        return Some(expr);
    }
    match getter.body.as_ref()?.statements.as_slice() {
        [stmt] => match &stmt.kind {
            StmtKind::Return(Some(expr)) => Some(expr),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use wpf_test_utils::Fixture;

    use super::*;

    fn parameter_for(fixture: &Fixture, property: &str) -> Option<String> {
        let model = fixture.model(0);
        let decl = model.tree().types().into_iter().next().unwrap();
        let ty = fixture.type_named("NameExtension");
        let symbol = fixture.member_named(ty, property);
        let model: &dyn SemanticModel = &model;
        constructor_parameter(model, decl, symbol)
    }

    const EXTENSION: &str = r#"
using System;
using System.Windows.Markup;

public class NameExtension : MarkupExtension
{
    private readonly string text;

    public NameExtension(string text, int count, int other)
    {
        this.text = text;
        this.Count = count;
        if (other > 0)
        {
            this.Count = other;
        }
    }

    public NameExtension(string value)
    {
        Direct = value;
    }

    public string Text
    {
        get { return this.text; }
    }

    public int Count { get; set; }

    public string Direct { get; set; }

    public string Unassigned { get; set; }

    public override object ProvideValue(IServiceProvider serviceProvider) => this.text;
}"#;

    #[test]
    fn test_assignment_through_backing_field() {
        let fixture = Fixture::new(EXTENSION);
        assert_eq!(parameter_for(&fixture, "Text").as_deref(), Some("text"));
    }

    #[test]
    fn test_direct_assignment() {
        let fixture = Fixture::new(EXTENSION);
        assert_eq!(parameter_for(&fixture, "Direct").as_deref(), Some("value"));
    }

    #[test]
    fn test_conflicting_parameters_are_unresolved() {
        let fixture = Fixture::new(EXTENSION);
        assert_eq!(parameter_for(&fixture, "Count"), None);
    }

    #[test]
    fn test_unassigned_property() {
        let fixture = Fixture::new(EXTENSION);
        assert_eq!(parameter_for(&fixture, "Unassigned"), None);
    }
}
