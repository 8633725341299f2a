use wpf_hir::{KnownMember, KnownType};
use wpf_syntax::{NodeKind, SyntaxNode};
use wpf_types::Cancelled;

use super::extra_statements;
use crate::context::NodeContext;
use crate::descriptors::{RuleDescriptor, WPF0003, WPF0012, WPF0032, WPF0035, WPF0036};
use crate::diagnostics::{keys, Finding};
use crate::matchers::{match_node, Shape};
use crate::resolvers::{confirm_call, registration_of, AccessorCall, Registration};
use crate::traits::{LintRule, NodeAnalyzer};

/// Checks instance properties that wrap a dependency property
pub struct ClrPropertyRuleImpl;

static DESCRIPTORS: [&RuleDescriptor; 5] = [&WPF0003, &WPF0012, &WPF0032, &WPF0035, &WPF0036];

impl LintRule for ClrPropertyRuleImpl {
    fn name(&self) -> &'static str {
        "clr_property"
    }

    fn description(&self) -> &'static str {
        "Checks CLR property wrappers against the registration of the property they access"
    }

    fn descriptors(&self) -> &'static [&'static RuleDescriptor] {
        &DESCRIPTORS
    }
}

impl NodeAnalyzer for ClrPropertyRuleImpl {
    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::PropertyDeclaration]
    }

    fn analyze(&self, ctx: &NodeContext) -> Result<Vec<Finding>, Cancelled> {
        let Some(Shape::ClrPropertyAccessor {
            property,
            get_call,
            set_call,
        }) = match_node(ctx.node)
        else {
            return Ok(Vec::new());
        };
        let compilation = ctx.compilation();
        let on_dependency_object = ctx
            .containing_type_symbol()
            .is_some_and(|ty| compilation.is_assignable_to_known(ty, KnownType::DependencyObject));
        if !on_dependency_object {
            return Ok(Vec::new());
        }

        let model = ctx.model;
        let getter = get_call.and_then(|call| confirm_call(model, call));
        let setter = set_call.and_then(|call| confirm_call(model, call));
        let registration_for = |access: Option<AccessorCall<'_>>| {
            access
                .and_then(|access| access.backing)
                .and_then(|backing| registration_of(model, backing))
        };
        let get_registration = registration_for(getter);
        let set_registration = registration_for(setter);

        let mut findings = Vec::new();
        let name = &property.name;

        if let (Some(get), Some(set)) = (&get_registration, &set_registration) {
            if get.invocation.id != set.invocation.id {
                findings.push(Finding::new(&WPF0032, name.range).with_arg(name.text.as_str()));
            }
        }

        if let Some(registration) = get_registration.as_ref().or(set_registration.as_ref()) {
            check_against_registration(ctx, registration, &mut findings);
        }

        if let Some(setter) = setter {
            if setter.member == KnownMember::SetCurrentValue {
                findings.push(Finding::new(&WPF0035, setter.call.range));
            }
        }

        let accessors = [
            (property.getter(), getter.map(|g| g.call)),
            (property.setter(), setter.map(|s| s.call)),
        ];
        for (accessor, call) in accessors {
            if let (Some(accessor), Some(call)) = (accessor, call) {
                ctx.check()?;
                findings.extend(
                    extra_statements(accessor.body.as_ref(), call)
                        .map(|stmt| Finding::new(&WPF0036, stmt.range)),
                );
            }
        }

        Ok(findings)
    }
}

/// Name and type of the property must be the registered ones.
fn check_against_registration(
    ctx: &NodeContext,
    registration: &Registration<'_>,
    findings: &mut Vec<Finding>,
) {
    let SyntaxNode::Property(property) = ctx.node else {
        return;
    };
    let compilation = ctx.compilation();
    let name = &property.name;

    if let Some(registered) = &registration.registered_name {
        if &name.text != registered {
            findings.push(
                Finding::new(&WPF0003, name.range)
                    .with_arg(name.text.as_str())
                    .with_arg(registered.as_str())
                    .with_property(keys::EXPECTED_NAME, registered.as_str()),
            );
        }
    }

    let declared = ctx
        .containing_symbol
        .and_then(|symbol| compilation.symbol(symbol).value_type());
    if let (Some(declared), Some(registered)) = (declared, registration.registered_type) {
        if !compilation.types_equal(declared, registered) {
            let expected = compilation.display(registered);
            findings.push(
                Finding::new(&WPF0012, property.ty.range)
                    .with_arg(name.text.as_str())
                    .with_arg(expected.as_str())
                    .with_property(keys::TYPE_SYNTAX, expected),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::run;

    #[test]
    fn test_name_and_type_must_match_registration() {
        let outcome = run(
            &ClrPropertyRuleImpl,
            r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public static readonly DependencyProperty TextProperty = DependencyProperty.Register(
        "Text", typeof(string), typeof(FooControl));

    public ↓double Bar
    {
        get => (double)this.GetValue(BarProperty);
        set => this.SetValue(BarProperty, value);
    }

    public string ↓Error
    {
        get { return (string)this.GetValue(TextProperty); }
        set { this.SetValue(TextProperty, value); }
    }
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r"
        WPF0012 `double` Property 'Bar' must be of type int
        WPF0003 `Error` Property 'Error' must be named Text
        ");
        assert_eq!(outcome.property("WPF0012", keys::TYPE_SYNTAX), Some("int"));
    }

    #[test]
    fn test_generic_registered_type() {
        let outcome = run(
            &ClrPropertyRuleImpl,
            r#"
using System.Collections.ObjectModel;
using System.Windows;
using System.Windows.Controls;

public class FooControl<T> : Control
{
    public static readonly DependencyProperty ValueProperty = DependencyProperty.Register(
        nameof(Value), typeof(T), typeof(FooControl<T>));

    public static readonly DependencyProperty ItemsProperty = DependencyProperty.Register(
        nameof(Items), typeof(ObservableCollection<T>), typeof(FooControl<T>));

    public T Value
    {
        get => (T)this.GetValue(ValueProperty);
        set => this.SetValue(ValueProperty, value);
    }

    public ObservableCollection<T> Items
    {
        get => (ObservableCollection<T>)this.GetValue(ItemsProperty);
        set => this.SetValue(ItemsProperty, value);
    }
}"#,
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }

    #[test]
    fn test_getter_and_setter_must_use_same_property() {
        let outcome = run(
            &ClrPropertyRuleImpl,
            r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    private static readonly DependencyPropertyKey BarPropertyKey = DependencyProperty.RegisterReadOnly(
        nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public static readonly DependencyProperty BarProperty = BarPropertyKey.DependencyProperty;

    public static readonly DependencyProperty BazProperty = DependencyProperty.Register(
        nameof(Baz), typeof(int), typeof(FooControl));

    public int Bar
    {
        get => (int)this.GetValue(BarProperty);
        private set => this.SetValue(BarPropertyKey, value);
    }

    public int ↓Baz
    {
        get => (int)this.GetValue(BazProperty);
        set => this.SetValue(BarPropertyKey, value);
    }
}"#,
        );
        outcome.assert_at_markers();
        assert_eq!(outcome.ids(), ["WPF0032"]);
    }

    #[test]
    fn test_set_current_value_and_side_effects() {
        let outcome = run(
            &ClrPropertyRuleImpl,
            r#"
using System;
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(FooControl));

    public int Bar
    {
        get
        {
            ↓Console.WriteLine("get");
            return (int)this.GetValue(BarProperty);
        }

        set
        {
            ↓this.SetCurrentValue(BarProperty, value);
            ↓this.OnBarChanged();
        }
    }

    private void OnBarChanged()
    {
    }
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r#"
        WPF0036 `Console.WriteLine("get");` Avoid side effects in CLR accessors.
        WPF0035 `this.SetCurrentValue(BarProperty, value)` Use SetValue in setter.
        WPF0036 `this.OnBarChanged();` Avoid side effects in CLR accessors.
        "#);
    }

    #[test]
    fn test_plain_class_is_ignored() {
        let outcome = run(
            &ClrPropertyRuleImpl,
            r"
public class Foo
{
    public int Bar
    {
        get => (int)this.GetValue(null);
        set => this.SetValue(null, value);
    }

    private object GetValue(object key) => key;

    private void SetValue(object key, object value)
    {
    }
}",
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }
}
