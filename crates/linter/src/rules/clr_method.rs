use wpf_hir::{Accessibility, KnownType, SymbolId};
use wpf_syntax::{MethodDecl, NodeKind, SyntaxNode, TypeSyntax};
use wpf_types::Cancelled;

use super::{extra_statements, typeof_text};
use crate::context::NodeContext;
use crate::descriptors::{RuleDescriptor, WPF0004, WPF0013, WPF0033, WPF0034, WPF0042, WPF0061};
use crate::diagnostics::{keys, Finding};
use crate::matchers::{match_node, Shape};
use crate::resolvers::{backing_member, confirm_call, registered_name, registration_of, typeof_type};
use crate::traits::{LintRule, NodeAnalyzer};

/// Checks the static `GetX` / `SetX` accessors of attached properties
pub struct ClrMethodRuleImpl;

static DESCRIPTORS: [&RuleDescriptor; 6] =
    [&WPF0004, &WPF0013, &WPF0033, &WPF0034, &WPF0042, &WPF0061];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Get,
    Set,
}

impl Direction {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Set => "Set",
        }
    }
}

impl LintRule for ClrMethodRuleImpl {
    fn name(&self) -> &'static str {
        "clr_method"
    }

    fn description(&self) -> &'static str {
        "Checks attached property accessor methods against the registration they access"
    }

    fn descriptors(&self) -> &'static [&'static RuleDescriptor] {
        &DESCRIPTORS
    }
}

impl NodeAnalyzer for ClrMethodRuleImpl {
    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodDeclaration]
    }

    fn analyze(&self, ctx: &NodeContext) -> Result<Vec<Finding>, Cancelled> {
        let (method, call, direction) = match match_node(ctx.node) {
            Some(Shape::AttachedAccessorGet { method, call }) => (method, call, Direction::Get),
            Some(Shape::AttachedAccessorSet { method, call }) => (method, call, Direction::Set),
            _ => return Ok(Vec::new()),
        };
        let model = ctx.model;
        let compilation = ctx.compilation();
        let Some(access) = confirm_call(model, call) else {
            return Ok(Vec::new());
        };
        let Some(element_type) = method
            .params
            .first()
            .and_then(|param| model.symbol_info(param.ty.id))
        else {
            return Ok(Vec::new());
        };
        if !compilation.is_assignable_to_known(element_type, KnownType::DependencyObject) {
            return Ok(Vec::new());
        }
        let Some(backing) = access
            .backing
            .and_then(|symbol| backing_member(compilation, symbol))
        else {
            return Ok(Vec::new());
        };

        let mut findings = Vec::new();
        if let Some(registered) = registered_name(model, &backing) {
            let expected = format!("{}{registered}", direction.prefix());
            if method.name.text != expected {
                findings.push(
                    Finding::new(&WPF0004, method.name.range)
                        .with_arg(method.name.text.as_str())
                        .with_arg(expected.as_str())
                        .with_property(keys::EXPECTED_NAME, expected),
                );
            }
        }

        ctx.check()?;
        if let Some(registration) = registration_of(model, backing.symbol) {
            if let Some(registered) = registration.registered_type {
                let (label, syntax) = match direction {
                    Direction::Get => ("Return type", Some(&method.return_type)),
                    Direction::Set => ("Value type", method.params.get(1).map(|p| &p.ty)),
                };
                if let Some(finding) = syntax.and_then(|syntax| {
                    check_type(ctx, syntax, registered).map(|expected| {
                        Finding::new(&WPF0013, syntax.range)
                            .with_arg(label)
                            .with_arg(expected.as_str())
                            .with_property(keys::TYPE_SYNTAX, expected)
                    })
                }) {
                    findings.push(finding);
                }
            }
            if direction == Direction::Get && registration.kind.is_attached() {
                findings.extend(check_browsable(ctx, method, element_type));
            }
        }

        findings.extend(
            extra_statements(method.body.as_ref(), access.call)
                .map(|stmt| Finding::new(&WPF0042, stmt.range)),
        );
        findings.extend(check_documentation(ctx, method));
        Ok(findings)
    }
}

/// Display of the registered type when `syntax` names a different one.
fn check_type(ctx: &NodeContext, syntax: &TypeSyntax, registered: SymbolId) -> Option<String> {
    let compilation = ctx.compilation();
    let declared = ctx.model.symbol_info(syntax.id)?;
    (!compilation.types_equal(declared, registered)).then(|| compilation.display(registered))
}

/// `[AttachedPropertyBrowsableForType]` must be present and name a type the
/// accessor accepts.
fn check_browsable(
    ctx: &NodeContext,
    method: &MethodDecl,
    element_type: SymbolId,
) -> Option<Finding> {
    let compilation = ctx.compilation();
    let expected = typeof_text(compilation, element_type);
    let argument = method.attributes.iter().find_map(|attribute| {
        match match_node(SyntaxNode::Attribute(attribute))? {
            Shape::AttachedPropertyBrowsableForTypeAttribute { argument } => Some(argument),
            _ => None,
        }
    });
    let Some(argument) = argument else {
        return Some(
            Finding::new(&WPF0033, method.name.range)
                .with_arg(compilation.display(element_type))
                .with_property(
                    keys::ATTRIBUTE_TEXT,
                    format!("[AttachedPropertyBrowsableForType({expected})]"),
                ),
        );
    };
    let browsable = typeof_type(ctx.model, &argument.expr)?;
    (!compilation.is_assignable_to(browsable, element_type)).then(|| {
        Finding::new(&WPF0034, argument.expr.range)
            .with_arg(compilation.display(element_type))
            .with_property(keys::EXPECTED_ARGUMENT, expected)
    })
}

fn check_documentation(ctx: &NodeContext, method: &MethodDecl) -> Option<Finding> {
    if method.doc.is_some() {
        return None;
    }
    let accessibility = ctx
        .containing_symbol
        .map(|symbol| ctx.compilation().symbol(symbol).accessibility())?;
    matches!(
        accessibility,
        Accessibility::Protected
            | Accessibility::Internal
            | Accessibility::ProtectedInternal
            | Accessibility::Public
    )
    .then(|| Finding::new(&WPF0061, method.name.range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::run;

    #[test]
    fn test_documented_accessors_with_matching_names() {
        let outcome = run(
            &ClrMethodRuleImpl,
            r#"
using System.Windows;

public static class Foo
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo), new PropertyMetadata(default(int)));

    /// <summary>Helper for setting Bar on element.</summary>
    public static void SetBar(DependencyObject element, int value)
    {
        element.SetValue(BarProperty, value);
    }

    /// <summary>Helper for getting Bar from element.</summary>
    [AttachedPropertyBrowsableForType(typeof(DependencyObject))]
    public static int GetBar(DependencyObject element)
    {
        return (int)element.GetValue(BarProperty);
    }
}"#,
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }

    #[test]
    fn test_name_and_type_mismatch() {
        let outcome = run(
            &ClrMethodRuleImpl,
            r#"
using System.Windows;

public static class Foo
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo), new PropertyMetadata(default(int)));

    /// <summary>Helper for setting Bar on element.</summary>
    public static void ↓SetError(DependencyObject element, ↓double value) => element.SetValue(BarProperty, value);

    /// <summary>Helper for getting Bar from element.</summary>
    [AttachedPropertyBrowsableForType(typeof(DependencyObject))]
    public static ↓string GetBar(DependencyObject element) => (string)element.GetValue(BarProperty);
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r"
        WPF0004 `SetError` Method 'SetError' must be named 'SetBar'
        WPF0013 `double` Value type must match registered type int
        WPF0013 `string` Return type must match registered type int
        ");
        assert_eq!(outcome.property("WPF0004", keys::EXPECTED_NAME), Some("SetBar"));
    }

    #[test]
    fn test_browsable_attribute() {
        let outcome = run(
            &ClrMethodRuleImpl,
            r#"
using System.Windows;
using System.Windows.Controls;

public static class Foo
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo));

    public static readonly DependencyProperty BazProperty = DependencyProperty.RegisterAttached(
        "Baz", typeof(int), typeof(Foo));

    /// <summary>Helper for getting Bar from element.</summary>
    public static int ↓GetBar(Button element) => (int)element.GetValue(BarProperty);

    /// <summary>Helper for getting Baz from element.</summary>
    [AttachedPropertyBrowsableForType(↓typeof(TextBox))]
    public static int GetBaz(Button element) => (int)element.GetValue(BazProperty);
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r"
        WPF0033 `GetBar` Add [AttachedPropertyBrowsableForType(typeof(Button))]
        WPF0034 `typeof(TextBox)` Use [AttachedPropertyBrowsableForType(typeof(Button))]
        ");
        assert_eq!(
            outcome.property("WPF0033", keys::ATTRIBUTE_TEXT),
            Some("[AttachedPropertyBrowsableForType(typeof(Button))]")
        );
    }

    #[test]
    fn test_side_effects_and_documentation() {
        let outcome = run(
            &ClrMethodRuleImpl,
            r#"
using System;
using System.Windows;

public static class Foo
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo));

    public static void ↓SetBar(DependencyObject element, int value)
    {
        ↓Console.WriteLine("set");
        element.SetValue(BarProperty, value);
    }

    [AttachedPropertyBrowsableForType(typeof(DependencyObject))]
    private static int GetBar(DependencyObject element) => (int)element.GetValue(BarProperty);
}"#,
        );
        outcome.assert_at_markers();
        assert_eq!(outcome.ids(), ["WPF0061", "WPF0042"]);
    }

    #[test]
    fn test_unrelated_get_value_is_ignored() {
        let outcome = run(
            &ClrMethodRuleImpl,
            r#"
using System.Windows;

public static class Foo
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo));

    public static int GetError(Store element) => (int)element.GetValue(BarProperty);
}

public class Store
{
    public object GetValue(DependencyProperty property) => null;
}"#,
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }
}
