use wpf_hir::{Accessibility, Constant, KnownMember, KnownType, SemanticModel};
use wpf_syntax::{ExprKind, MemberRef, NodeKind, SyntaxNode};
use wpf_types::Cancelled;

use crate::context::NodeContext;
use crate::descriptors::{
    RuleDescriptor, WPF0001, WPF0002, WPF0010, WPF0011, WPF0016, WPF0030, WPF0031, WPF0060,
};
use crate::diagnostics::{keys, Finding};
use crate::matchers::static_property_value;
use crate::resolvers::{
    backing_candidate, dependency_property_for_key, registered_name, registration_at,
    registration_of, BackingKind, BackingMember, Registration,
};
use crate::traits::{LintRule, NodeAnalyzer};

/// Checks fields and properties of type `DependencyProperty` or `DependencyPropertyKey`
///
/// Naming, modifiers and declaration order of the backing member, plus the
/// arguments of the registration that initializes it.
pub struct BackingMemberRuleImpl;

static DESCRIPTORS: [&RuleDescriptor; 8] = [
    &WPF0001, &WPF0002, &WPF0010, &WPF0011, &WPF0016, &WPF0030, &WPF0031, &WPF0060,
];

impl LintRule for BackingMemberRuleImpl {
    fn name(&self) -> &'static str {
        "backing_member"
    }

    fn description(&self) -> &'static str {
        "Checks backing fields and properties of dependency properties against their registration"
    }

    fn descriptors(&self) -> &'static [&'static RuleDescriptor] {
        &DESCRIPTORS
    }
}

impl NodeAnalyzer for BackingMemberRuleImpl {
    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::FieldDeclaration, NodeKind::PropertyDeclaration]
    }

    fn analyze(&self, ctx: &NodeContext) -> Result<Vec<Finding>, Cancelled> {
        let Some(member) = ctx.node.as_member() else {
            return Ok(Vec::new());
        };
        let Some(backing) = ctx
            .containing_symbol
            .and_then(|symbol| backing_candidate(ctx.compilation(), symbol))
        else {
            return Ok(Vec::new());
        };
        let model = ctx.model;
        let mut findings = Vec::new();

        if let Some(finding) = check_static_readonly(model, member, &backing) {
            findings.push(finding);
        }
        if !backing.is_static {
            return Ok(findings);
        }

        ctx.check()?;
        let name = registered_name(model, &backing);
        if let Some(registered) = &name {
            let expected = format!("{registered}{}", backing.kind.suffix());
            if backing.name != expected {
                let descriptor = match backing.kind {
                    BackingKind::DependencyProperty => &WPF0001,
                    BackingKind::DependencyPropertyKey => &WPF0002,
                };
                findings.push(
                    Finding::new(descriptor, member.name().range)
                        .with_arg(backing.name.as_str())
                        .with_arg(registered.as_str())
                        .with_property(keys::EXPECTED_NAME, expected),
                );
            }
        }

        let initializer = match ctx.node {
            SyntaxNode::Field(field) => field.initializer.as_ref(),
            SyntaxNode::Property(property) => static_property_value(property),
            _ => None,
        };
        if let Some(registration) = initializer.and_then(|init| registration_at(model, init)) {
            check_registration(ctx, &backing, &registration, &mut findings);
        }

        if backing.kind == BackingKind::DependencyPropertyKey {
            if let Some(dependency_property) = dependency_property_for_key(model, &backing) {
                if dependency_property.range().start < member.range().start {
                    let before = dependency_property.name().text.as_str();
                    findings.push(
                        Finding::new(&WPF0031, member.range())
                            .with_arg(backing.name.as_str())
                            .with_arg(before)
                            .with_property(keys::MOVE_BEFORE, before),
                    );
                }
            }
        }

        if let Some(registered) = &name {
            if let Some(finding) = check_documentation(ctx, member, &backing, registered) {
                findings.push(finding);
            }
        }

        Ok(findings)
    }
}

/// Fields must be `static readonly`; properties static, get-only and initialized once.
fn check_static_readonly(
    model: &dyn SemanticModel,
    member: MemberRef<'_>,
    backing: &BackingMember,
) -> Option<Finding> {
    let registration = registration_of(model, backing.symbol)?;
    let modifiers = member.modifiers();
    let valid = match member {
        MemberRef::Field(_) => modifiers.is_static() && modifiers.is_readonly(),
        MemberRef::Property(property) => {
            modifiers.is_static()
                && property.setter().is_none()
                && property.expression_body.is_none()
                && property
                    .getter()
                    .is_some_and(|getter| getter.body.is_none() && getter.expression_body.is_none())
        }
        _ => true,
    };
    if valid {
        return None;
    }
    tracing::trace!(
        member = %backing.name,
        kind = ?registration.kind,
        "backing member is not static readonly"
    );
    let type_name = match backing.kind {
        BackingKind::DependencyProperty => "DependencyProperty",
        BackingKind::DependencyPropertyKey => "DependencyPropertyKey",
    };
    Some(
        Finding::new(&WPF0030, member.name().range)
            .with_arg(backing.name.as_str())
            .with_arg(type_name),
    )
}

/// Owner and default value of a registration written on this member.
fn check_registration(
    ctx: &NodeContext,
    backing: &BackingMember,
    registration: &Registration<'_>,
    findings: &mut Vec<Finding>,
) {
    let compilation = ctx.compilation();
    let model = ctx.model;

    if let (Some(owner), Some(owner_arg), Some(containing)) = (
        registration.owner_type,
        registration.owner_arg,
        ctx.containing_type_symbol(),
    ) {
        if !compilation.types_equal(owner, containing) {
            let expected = compilation.display(containing);
            findings.push(
                Finding::new(&WPF0011, owner_arg.expr.range)
                    .with_arg(expected.as_str())
                    .with_property(keys::EXPECTED_TYPE, expected),
            );
        }
    }

    let (Some(default), Some(registered_type)) =
        (registration.default_value, registration.registered_type)
    else {
        return;
    };
    let default = default.unparenthesized();
    let is_unset_value = model
        .symbol_info(default.id)
        .and_then(|symbol| compilation.known().member(symbol))
        == Some(KnownMember::UnsetValue);
    if is_unset_value {
        return;
    }

    let mismatch = if model.constant_value(default.id) == Some(Constant::Null) {
        compilation.is_value_type(registered_type)
            && !compilation
                .known()
                .is(compilation, registered_type, KnownType::Nullable)
    } else {
        model
            .type_info(default.id)
            .is_some_and(|ty| !compilation.is_assignable_to(ty, registered_type))
    };
    if mismatch {
        findings.push(
            Finding::new(&WPF0010, default.range)
                .with_arg(backing.name.as_str())
                .with_arg(compilation.display(registered_type)),
        );
        return;
    }

    let creates_instance = matches!(
        default.kind,
        ExprKind::ObjectCreation { .. } | ExprKind::ArrayCreation { .. }
    );
    if creates_instance
        && model
            .type_info(default.id)
            .is_some_and(|ty| compilation.is_reference_type(ty))
    {
        findings.push(Finding::new(&WPF0016, default.range).with_arg(backing.name.as_str()));
    }
}

/// Visible backing members of properties with a CLR wrapper need a doc comment.
fn check_documentation(
    ctx: &NodeContext,
    member: MemberRef<'_>,
    backing: &BackingMember,
    registered: &str,
) -> Option<Finding> {
    if backing.kind != BackingKind::DependencyProperty || member.doc().is_some() {
        return None;
    }
    let accessibility = ctx.compilation().symbol(backing.symbol).accessibility();
    if !matches!(accessibility, Accessibility::Public | Accessibility::Internal) {
        return None;
    }
    let has_clr_property = ctx
        .containing_type
        .and_then(|ty| ty.field_or_property(registered))
        .is_some_and(|m| matches!(m.as_member(), MemberRef::Property(_)));
    has_clr_property.then(|| Finding::new(&WPF0060, member.name().range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{run, run_files};

    #[test]
    fn test_registered_name_mismatch() {
        let outcome = run(
            &BackingMemberRuleImpl,
            r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    /// <summary>Identifies the <see cref="Bar"/> dependency property.</summary>
    public static readonly DependencyProperty ↓ErrorProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    private static readonly DependencyPropertyKey ↓BazKey = DependencyProperty.RegisterReadOnly(
        "Baz", typeof(int), typeof(FooControl), new PropertyMetadata(0));

    public int Bar
    {
        get => (int)this.GetValue(ErrorProperty);
        set => this.SetValue(ErrorProperty, value);
    }
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r"
        WPF0001 `ErrorProperty` Field 'ErrorProperty' that is backing field for the DependencyProperty registered as 'Bar' must be named 'BarProperty'
        WPF0002 `BazKey` Field 'BazKey' that is backing field for the DependencyPropertyKey registered as 'Baz' must be named 'BazPropertyKey'
        ");
        assert_eq!(outcome.property("WPF0001", keys::EXPECTED_NAME), Some("BarProperty"));
    }

    #[test]
    fn test_name_prefix_is_not_enough() {
        let outcome = run(
            &BackingMemberRuleImpl,
            r#"
using System.Windows;

public static class Foo
{
    public static readonly DependencyProperty ↓BarPropertyProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo), new PropertyMetadata(0));

    public static readonly DependencyProperty ↓BaProperty = DependencyProperty.RegisterAttached(
        "Bar2", typeof(int), typeof(Foo), new PropertyMetadata(0));
}"#,
        );
        outcome.assert_at_markers();
        assert_eq!(outcome.ids(), ["WPF0001", "WPF0001"]);
    }

    #[test]
    fn test_non_constant_name_is_skipped() {
        let outcome = run(
            &BackingMemberRuleImpl,
            r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    private static readonly string Name = "Bar";

    private static readonly DependencyProperty ErrorProperty = DependencyProperty.Register(
        Name.ToString(), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));
}"#,
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }

    #[test]
    fn test_external_registration_uses_clr_property_name() {
        let outcome = run_files(
            &BackingMemberRuleImpl,
            &[
                r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    private static readonly DependencyProperty ↓ErrorProperty = Shared.ValueProperty;

    public int Bar
    {
        get => (int)this.GetValue(ErrorProperty);
        set => this.SetValue(ErrorProperty, value);
    }
}"#,
                r#"
using System.Windows;

public static class Shared
{
    public static readonly DependencyProperty ValueProperty = DependencyProperty.RegisterAttached(
        "Value", typeof(int), typeof(Shared), new PropertyMetadata(0));
}"#,
            ],
        );
        outcome.assert_at_markers();
        assert_eq!(outcome.property("WPF0001", keys::EXPECTED_NAME), Some("BarProperty"));
    }

    #[test]
    fn test_owner_and_default_value() {
        let outcome = run(
            &BackingMemberRuleImpl,
            r#"
using System.Collections.Generic;
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    private static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        "Bar", typeof(double), ↓typeof(Button), new PropertyMetadata(↓1));

    private static readonly DependencyProperty CountProperty = DependencyProperty.Register(
        "Count", typeof(int), typeof(FooControl), new PropertyMetadata(↓null));

    private static readonly DependencyProperty ItemsProperty = DependencyProperty.Register(
        "Items", typeof(List<int>), typeof(FooControl), new PropertyMetadata(↓new List<int>()));

    private static readonly DependencyProperty TextProperty = DependencyProperty.Register(
        "Text", typeof(string), typeof(FooControl), new PropertyMetadata(null));

    private static readonly DependencyProperty ValueProperty = DependencyProperty.Register(
        "Value", typeof(object), typeof(FooControl), new PropertyMetadata(DependencyProperty.UnsetValue));

    private static readonly DependencyProperty NullableProperty = DependencyProperty.Register(
        "Nullable", typeof(int?), typeof(FooControl), new PropertyMetadata(null));
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r"
        WPF0011 `typeof(Button)` Register containing type: 'FooControl' as owner.
        WPF0010 `1` Default value for 'BarProperty' must be of type double
        WPF0010 `null` Default value for 'CountProperty' must be of type int
        WPF0016 `new List<int>()` Default value for 'ItemsProperty' is a reference type that will be shared among all instances.
        ");
    }

    #[test]
    fn test_static_readonly() {
        let outcome = run(
            &BackingMemberRuleImpl,
            r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    private static DependencyProperty ↓BarProperty = DependencyProperty.Register(
        "Bar", typeof(int), typeof(FooControl));

    private static DependencyProperty ↓BazProperty => DependencyProperty.Register(
        "Baz", typeof(int), typeof(FooControl));

    private static DependencyProperty QuxProperty { get; } = DependencyProperty.Register(
        "Qux", typeof(int), typeof(FooControl));
}"#,
        );
        outcome.assert_at_markers();
        assert_eq!(outcome.ids(), ["WPF0030", "WPF0030"]);
    }

    #[test]
    fn test_key_declared_after_property() {
        let outcome = run(
            &BackingMemberRuleImpl,
            r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    public static readonly DependencyProperty ↓BarProperty = BarPropertyKey.DependencyProperty;

    ↓private static readonly DependencyPropertyKey BarPropertyKey = DependencyProperty.RegisterReadOnly(
        nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public int Bar
    {
        get => (int)this.GetValue(BarProperty);
        private set => this.SetValue(BarPropertyKey, value);
    }
}"#,
        );
        outcome.assert_at_markers();
        assert_eq!(outcome.ids(), ["WPF0060", "WPF0031"]);
        assert_eq!(outcome.property("WPF0031", keys::MOVE_BEFORE), Some("BarProperty"));
    }

    #[test]
    fn test_documented_members_and_attached_properties() {
        let outcome = run(
            &BackingMemberRuleImpl,
            r#"
using System.Windows;

public class Foo : DependencyObject
{
    public static readonly DependencyProperty ↓BarProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(Foo));

    /// <summary>Identifies the Baz dependency property.</summary>
    public static readonly DependencyProperty BazProperty = DependencyProperty.Register(
        nameof(Baz), typeof(int), typeof(Foo));

    public static readonly DependencyProperty AttachedProperty = DependencyProperty.RegisterAttached(
        "Attached", typeof(int), typeof(Foo));

    public int Bar
    {
        get => (int)this.GetValue(BarProperty);
        set => this.SetValue(BarProperty, value);
    }

    public int Baz
    {
        get => (int)this.GetValue(BazProperty);
        set => this.SetValue(BazProperty, value);
    }
}"#,
        );
        outcome.assert_at_markers();
        assert_eq!(outcome.ids(), ["WPF0060"]);
    }

    #[test]
    fn test_documentation_only_for_public_and_internal() {
        let outcome = run(
            &BackingMemberRuleImpl,
            r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    protected internal static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(FooControl));

    internal static readonly DependencyProperty ↓BazProperty = DependencyProperty.Register(
        nameof(Baz), typeof(int), typeof(FooControl));

    public int Bar
    {
        get => (int)this.GetValue(BarProperty);
        set => this.SetValue(BarProperty, value);
    }

    public int Baz
    {
        get => (int)this.GetValue(BazProperty);
        set => this.SetValue(BazProperty, value);
    }
}"#,
        );
        outcome.assert_at_markers();
        assert_eq!(outcome.ids(), ["WPF0060"]);
    }
}
