use wpf_hir::{Constant, SemanticModel, SymbolId};
use wpf_syntax::{Member, TypeDecl};

use super::{informative, returned_expressions, unique_type};

/// Type a markup extension's `ProvideValue` override produces.
///
/// A declared return type other than `object` wins. Otherwise every
/// non-`null` returned expression must have the same known type.
#[must_use]
pub fn provide_value_type(model: &dyn SemanticModel, ty: &TypeDecl) -> Option<SymbolId> {
    let method = ty.non_type_members().find_map(|member| match member {
        Member::Method(method) if method.name.text == "ProvideValue" && method.params.len() == 1 => {
            Some(method)
        }
        _ => None,
    })?;
    let compilation = model.compilation();
    let declared = model
        .declared_symbol(method.id)
        .and_then(|symbol| compilation.symbol(symbol).as_method())
        .and_then(|symbol| symbol.return_type);
    if let Some(declared) = declared.and_then(|declared| informative(compilation, declared)) {
        return Some(declared);
    }

    let mut types = Vec::new();
    for expr in returned_expressions(method) {
        let expr = expr.unparenthesized();
        if model.constant_value(expr.id) == Some(Constant::Null) {
            continue;
        }
        types.push(model.type_info(expr.id)?);
    }
    unique_type(compilation, types).and_then(|ty| informative(compilation, ty))
}

#[cfg(test)]
mod tests {
    use wpf_test_utils::Fixture;

    use super::*;

    fn provided(fixture: &Fixture, name: &str) -> Option<String> {
        let model = fixture.model(0);
        let decl = model
            .tree()
            .types()
            .into_iter()
            .find(|t| t.name.text == name)
            .unwrap();
        let comp = model.compilation();
        let model: &dyn SemanticModel = &model;
        provide_value_type(model, decl).map(|ty| comp.display(ty))
    }

    const EXTENSIONS: &str = r#"
using System;
using System.Windows.Markup;

public class DeclaredExtension : MarkupExtension
{
    public override string ProvideValue(IServiceProvider serviceProvider) => "text";
}

public class InferredExtension : MarkupExtension
{
    private readonly int value;

    public override object ProvideValue(IServiceProvider serviceProvider)
    {
        if (serviceProvider == null)
        {
            return null;
        }

        return this.value;
    }
}

public class MixedExtension : MarkupExtension
{
    public override object ProvideValue(IServiceProvider serviceProvider)
    {
        if (serviceProvider == null)
        {
            return 1;
        }

        return "one";
    }
}"#;

    #[test]
    fn test_declared_return_type() {
        let fixture = Fixture::new(EXTENSIONS);
        assert_eq!(provided(&fixture, "DeclaredExtension").as_deref(), Some("string"));
    }

    #[test]
    fn test_inferred_from_returns() {
        let fixture = Fixture::new(EXTENSIONS);
        assert_eq!(provided(&fixture, "InferredExtension").as_deref(), Some("int"));
    }

    #[test]
    fn test_disagreeing_returns_are_unresolved() {
        let fixture = Fixture::new(EXTENSIONS);
        assert_eq!(provided(&fixture, "MixedExtension"), None);
    }
}
