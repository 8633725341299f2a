//! Structural matchers
//!
//! Recognize the domain patterns from syntax alone: node kind, invoked or
//! attribute name text and argument counts. Nothing here consults the
//! semantic model, so a match only means "worth resolving". Partial or
//! malformed nodes never match.

use wpf_syntax::{
    for_each_expr, for_each_expr_in_block, Accessor, Argument, ArgumentList, ArgumentNameKind,
    Attribute, Expr, ExprKind, MethodDecl, PropertyDecl, SyntaxNode,
};

const REGISTRATION_METHODS: &[&str] = &[
    "Register",
    "RegisterReadOnly",
    "RegisterAttached",
    "RegisterAttachedReadOnly",
    "AddOwner",
];

/// Which XAML callback attribute was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XamlSetHandler {
    MarkupExtension,
    TypeConverter,
}

/// A recognized pattern together with the syntax the resolvers need.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// `DependencyProperty.Register*(...)` or `X.AddOwner(...)`
    PropertyRegistration {
        invocation: &'a Expr,
        args: &'a ArgumentList,
    },
    /// `static T GetX(DependencyObject element) => (T)element.GetValue(XProperty)`
    AttachedAccessorGet {
        method: &'a MethodDecl,
        call: &'a Expr,
    },
    /// `static void SetX(DependencyObject element, T value) => element.SetValue(XProperty, value)`
    AttachedAccessorSet {
        method: &'a MethodDecl,
        call: &'a Expr,
    },
    /// Instance property whose accessors call `GetValue` / `SetValue`
    ClrPropertyAccessor {
        property: &'a PropertyDecl,
        get_call: Option<&'a Expr>,
        set_call: Option<&'a Expr>,
    },
    ConstructorArgumentAttribute {
        attribute: &'a Attribute,
        argument: &'a Argument,
    },
    ValueConversionAttribute {
        attribute: &'a Attribute,
        source: Option<&'a Argument>,
        target: Option<&'a Argument>,
    },
    MarkupExtensionReturnTypeAttribute {
        attribute: &'a Attribute,
        argument: &'a Argument,
    },
    ComponentResourceKeyCreation {
        creation: &'a Expr,
        args: &'a ArgumentList,
    },
    RoutedCommandCreation {
        creation: &'a Expr,
        args: &'a ArgumentList,
    },
    TemplatePartAttribute {
        attribute: &'a Attribute,
        name: &'a Argument,
    },
    XamlSetHandlerAttribute {
        attribute: &'a Attribute,
        handler: XamlSetHandler,
        argument: &'a Argument,
    },
    AttachedPropertyBrowsableForTypeAttribute { argument: &'a Argument },
    /// `[assembly: XmlnsDefinition(xmlNamespace, clrNamespace)]`
    XmlnsDefinitionAttribute {
        attribute: &'a Attribute,
        clr_namespace: &'a Argument,
    },
}

/// Matches one analyzable node.
#[must_use]
pub fn match_node(node: SyntaxNode<'_>) -> Option<Shape<'_>> {
    match node {
        SyntaxNode::Field(field) => match_registration(field.initializer.as_ref()?),
        SyntaxNode::Property(property) if property.modifiers.is_static() => {
            match_registration(static_property_value(property)?)
        }
        SyntaxNode::Property(property) => match_clr_property(property),
        SyntaxNode::Method(method) => match_attached_accessor(method),
        SyntaxNode::Attribute(attribute) => match_attribute(attribute),
        SyntaxNode::ObjectCreation(creation) => match_creation(creation),
        SyntaxNode::Type(_) | SyntaxNode::Constructor(_) => None,
    }
}

/// Matches a registration call, looking through parentheses.
#[must_use]
pub fn match_registration(expr: &Expr) -> Option<Shape<'_>> {
    let invocation = expr.unparenthesized();
    let ExprKind::Invocation { callee, args } = &invocation.kind else {
        return None;
    };
    let ExprKind::MemberAccess { name: method, .. } = &callee.kind else {
        return None;
    };
    REGISTRATION_METHODS
        .contains(&method.as_str())
        .then_some(Shape::PropertyRegistration { invocation, args })
}

/// Value a static property is initialized with: the initializer or the expression body.
#[must_use]
pub fn static_property_value(property: &PropertyDecl) -> Option<&Expr> {
    property
        .initializer
        .as_ref()
        .or(property.expression_body.as_ref())
        .or_else(|| {
            property
                .getter()
                .and_then(|getter| getter.expression_body.as_ref())
        })
}

fn match_clr_property(property: &PropertyDecl) -> Option<Shape<'_>> {
    let get_call = match &property.expression_body {
        Some(body) => find_call(body, &["GetValue"], 1, is_instance_receiver),
        None => property
            .getter()
            .and_then(|getter| accessor_call(getter, &["GetValue"], 1)),
    };
    let set_call = property
        .setter()
        .and_then(|setter| accessor_call(setter, &["SetValue", "SetCurrentValue"], 2));
    (get_call.is_some() || set_call.is_some()).then_some(Shape::ClrPropertyAccessor {
        property,
        get_call,
        set_call,
    })
}

fn accessor_call<'a>(accessor: &'a Accessor, names: &[&str], arity: usize) -> Option<&'a Expr> {
    if let Some(body) = &accessor.expression_body {
        return find_call(body, names, arity, is_instance_receiver);
    }
    let mut found = None;
    for_each_expr_in_block(accessor.body.as_ref()?, &mut |expr| {
        if found.is_none() && is_call(expr, names, arity, is_instance_receiver) {
            found = Some(expr);
        }
    });
    found
}

fn match_attached_accessor(method: &MethodDecl) -> Option<Shape<'_>> {
    if !method.modifiers.is_static() {
        return None;
    }
    let receiver = method.params.first()?.name.as_str();
    let on_element = |target: &Expr| matches!(&target.unparenthesized().kind, ExprKind::Identifier(name) if name.text == receiver);
    match (method.params.len(), method.return_type.is_void()) {
        (1, false) => {
            let call = find_call_in_method(method, &["GetValue"], 1, &on_element)?;
            Some(Shape::AttachedAccessorGet { method, call })
        }
        (2, true) => {
            let call =
                find_call_in_method(method, &["SetValue", "SetCurrentValue"], 2, &on_element)?;
            Some(Shape::AttachedAccessorSet { method, call })
        }
        _ => None,
    }
}

fn find_call_in_method<'a>(
    method: &'a MethodDecl,
    names: &[&str],
    arity: usize,
    receiver: &dyn Fn(&Expr) -> bool,
) -> Option<&'a Expr> {
    if let Some(body) = &method.expression_body {
        return find_call(body, names, arity, receiver);
    }
    let mut found = None;
    for_each_expr_in_block(method.body.as_ref()?, &mut |expr| {
        if found.is_none() && is_call(expr, names, arity, receiver) {
            found = Some(expr);
        }
    });
    found
}

fn find_call<'a>(
    expr: &'a Expr,
    names: &[&str],
    arity: usize,
    receiver: impl Fn(&Expr) -> bool,
) -> Option<&'a Expr> {
    let mut found = None;
    for_each_expr(expr, &mut |e| {
        if found.is_none() && is_call(e, names, arity, &receiver) {
            found = Some(e);
        }
    });
    found
}

/// `Name(args)` on `receiver` with exactly `arity` arguments.
fn is_call(expr: &Expr, names: &[&str], arity: usize, receiver: impl Fn(&Expr) -> bool) -> bool {
    let ExprKind::Invocation { callee, args } = &expr.kind else {
        return false;
    };
    if args.len() != arity {
        return false;
    }
    match &callee.kind {
        ExprKind::MemberAccess { target, name } => {
            names.contains(&name.as_str()) && receiver(target)
        }
        ExprKind::Identifier(name) => names.contains(&name.as_str()) && receiver(callee),
        _ => false,
    }
}

/// `this.X`, `base.X` or an unqualified `X`.
fn is_instance_receiver(target: &Expr) -> bool {
    matches!(
        target.kind,
        ExprKind::This | ExprKind::Base | ExprKind::Identifier(_)
    )
}

fn match_attribute(attribute: &Attribute) -> Option<Shape<'_>> {
    match attribute.short_name()? {
        "ConstructorArgument" => Some(Shape::ConstructorArgumentAttribute {
            attribute,
            argument: attribute.single_argument()?,
        }),
        "ValueConversion" => {
            let args = attribute.args.as_ref()?;
            Some(Shape::ValueConversionAttribute {
                attribute,
                source: named_or_positional(args, "sourceType", 0),
                target: named_or_positional(args, "targetType", 1),
            })
        }
        "MarkupExtensionReturnType" => Some(Shape::MarkupExtensionReturnTypeAttribute {
            attribute,
            argument: attribute.positional(0)?,
        }),
        "TemplatePart" => {
            let name = attribute.args.as_ref()?.args.iter().find(|arg| {
                arg.name
                    .as_ref()
                    .is_some_and(|n| n.kind == ArgumentNameKind::Equals && n.ident.text == "Name")
            })?;
            Some(Shape::TemplatePartAttribute { attribute, name })
        }
        "XamlSetMarkupExtension" => Some(Shape::XamlSetHandlerAttribute {
            attribute,
            handler: XamlSetHandler::MarkupExtension,
            argument: attribute.positional(0)?,
        }),
        "XamlSetTypeConverter" => Some(Shape::XamlSetHandlerAttribute {
            attribute,
            handler: XamlSetHandler::TypeConverter,
            argument: attribute.positional(0)?,
        }),
        "AttachedPropertyBrowsableForType" => {
            Some(Shape::AttachedPropertyBrowsableForTypeAttribute {
                argument: attribute.positional(0)?,
            })
        }
        "XmlnsDefinition" => Some(Shape::XmlnsDefinitionAttribute {
            attribute,
            clr_namespace: named_or_positional(attribute.args.as_ref()?, "clrNamespace", 1)?,
        }),
        _ => None,
    }
}

/// The argument passed as `name:` or, failing that, at `index`.
fn named_or_positional<'a>(
    args: &'a ArgumentList,
    name: &str,
    index: usize,
) -> Option<&'a Argument> {
    args.args
        .iter()
        .find(|arg| {
            arg.name
                .as_ref()
                .is_some_and(|n| n.kind == ArgumentNameKind::Colon && n.ident.text == name)
        })
        .or_else(|| args.positional(index))
}

fn match_creation(creation: &Expr) -> Option<Shape<'_>> {
    let ExprKind::ObjectCreation { ty, args } = &creation.kind else {
        return None;
    };
    let args = args.as_ref()?;
    match ty.simple_name()? {
        "ComponentResourceKey" => Some(Shape::ComponentResourceKeyCreation { creation, args }),
        "RoutedCommand" | "RoutedUICommand" => {
            Some(Shape::RoutedCommandCreation { creation, args })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use wpf_syntax::visit_nodes;
    use wpf_test_utils::Fixture;

    use super::*;

    fn shapes(code: &str) -> Vec<String> {
        let fixture = Fixture::new(code);
        visit_nodes(fixture.tree(0))
            .into_iter()
            .filter_map(|visit| match_node(visit.node))
            .map(|shape| describe(&shape))
            .collect()
    }

    fn describe(shape: &Shape<'_>) -> String {
        match shape {
            Shape::PropertyRegistration { invocation, args } => {
                let ExprKind::Invocation { callee, .. } = &invocation.kind else {
                    unreachable!("registrations are invocations");
                };
                let ExprKind::MemberAccess { name, .. } = &callee.kind else {
                    unreachable!("registrations are member calls");
                };
                format!("registration {} ({} args)", name.text, args.len())
            }
            Shape::AttachedAccessorGet { method, .. } => format!("attached get {}", method.name.text),
            Shape::AttachedAccessorSet { method, .. } => format!("attached set {}", method.name.text),
            Shape::ClrPropertyAccessor {
                property,
                get_call,
                set_call,
            } => format!(
                "clr property {} get={} set={}",
                property.name.text,
                get_call.is_some(),
                set_call.is_some()
            ),
            Shape::ConstructorArgumentAttribute { .. } => "constructor argument".to_owned(),
            Shape::ValueConversionAttribute { source, target, .. } => format!(
                "value conversion source={} target={}",
                source.is_some(),
                target.is_some()
            ),
            Shape::MarkupExtensionReturnTypeAttribute { .. } => "markup return type".to_owned(),
            Shape::ComponentResourceKeyCreation { args, .. } => {
                format!("component resource key ({} args)", args.len())
            }
            Shape::RoutedCommandCreation { args, .. } => {
                format!("routed command ({} args)", args.len())
            }
            Shape::TemplatePartAttribute { .. } => "template part".to_owned(),
            Shape::XamlSetHandlerAttribute { handler, .. } => format!("xaml set {handler:?}"),
            Shape::AttachedPropertyBrowsableForTypeAttribute { .. } => {
                "browsable for type".to_owned()
            }
            Shape::XmlnsDefinitionAttribute { .. } => "xmlns definition".to_owned(),
        }
    }

    #[test]
    fn test_registration_and_clr_property() {
        let found = shapes(
            r#"
namespace N
{
    using System.Windows;
    using System.Windows.Controls;

    public class FooControl : Control
    {
        public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
            nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

        public static readonly DependencyProperty OtherProperty = (BarProperty.AddOwner(typeof(FooControl)));

        public int Bar
        {
            get { return (int)this.GetValue(BarProperty); }
            set { this.SetValue(BarProperty, value); }
        }

        public int Plain { get; set; }
    }
}"#,
        );
        insta::assert_snapshot!(found.join("\n"), @r"
        registration Register (4 args)
        registration AddOwner (1 args)
        clr property Bar get=true set=true
        ");
    }

    #[test]
    fn test_attached_accessors_need_receiver_parameter() {
        let found = shapes(
            r#"
using System.Windows;

public static class Foo
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo), new PropertyMetadata(default(int)));

    public static void SetBar(DependencyObject element, int value) => element.SetValue(BarProperty, value);

    public static int GetBar(DependencyObject element)
    {
        return (int)element.GetValue(BarProperty);
    }

    public static int GetOther(DependencyObject element, DependencyObject other) => (int)other.GetValue(BarProperty);

    public static int GetWrong(DependencyObject element) => (int)Helper.GetValue(BarProperty);
}"#,
        );
        insta::assert_snapshot!(found.join("\n"), @r"
        registration RegisterAttached (4 args)
        attached set SetBar
        attached get GetBar
        ");
    }

    #[test]
    fn test_attributes_with_and_without_suffix() {
        let found = shapes(
            r#"
using System;
using System.Windows;
using System.Windows.Data;
using System.Windows.Markup;

[ValueConversion(typeof(bool), targetType: typeof(Visibility))]
[MarkupExtensionReturnTypeAttribute(typeof(string))]
[XamlSetTypeConverter("Receive")]
[TemplatePart(Name = "PART_Bar", Type = typeof(FrameworkElement))]
[TemplatePart(Type = typeof(FrameworkElement))]
public class FooExtension : MarkupExtension
{
    [ConstructorArgument("text")]
    public string Text { get; set; }

    public override object ProvideValue(IServiceProvider serviceProvider) => this.Text;
}"#,
        );
        insta::assert_snapshot!(found.join("\n"), @r"
        value conversion source=true target=true
        markup return type
        xaml set TypeConverter
        template part
        constructor argument
        ");
    }

    #[test]
    fn test_assembly_attributes_come_first() {
        let found = shapes(
            r#"
using System.Windows.Markup;

[assembly: XmlnsDefinition("http://foo", "Foo.Controls")]
[assembly: XmlnsDefinition("http://foo", clrNamespace: "Foo.Other")]
[assembly: XmlnsDefinition("http://foo")]

namespace Foo.Controls
{
    [MarkupExtensionReturnType(typeof(string))]
    public class FooExtension : MarkupExtension
    {
    }
}"#,
        );
        insta::assert_snapshot!(found.join("\n"), @r"
        xmlns definition
        xmlns definition
        markup return type
        ");
    }

    #[test]
    fn test_object_creations() {
        let found = shapes(
            r#"
using System.Windows;
using System.Windows.Input;

public static class Keys
{
    public static readonly ComponentResourceKey FooKey = new ComponentResourceKey(typeof(Keys), nameof(FooKey));
    public static readonly ComponentResourceKey BarKey = new ComponentResourceKey();
    public static readonly RoutedUICommand Baz = new RoutedUICommand("Baz", nameof(Baz), typeof(Keys));
}"#,
        );
        insta::assert_snapshot!(found.join("\n"), @r"
        component resource key (2 args)
        component resource key (0 args)
        routed command (3 args)
        ");
    }
}
