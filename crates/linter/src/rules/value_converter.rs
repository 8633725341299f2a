use wpf_hir::{KnownType, SymbolId};
use wpf_syntax::{
    Accessibility, Argument, Expr, Member, MemberRef, Modifier, NodeKind, SyntaxNode, TypeDecl,
};
use wpf_types::Cancelled;

use super::{is_attribute, typeof_text};
use crate::context::NodeContext;
use crate::descriptors::{RuleDescriptor, WPF0070, WPF0071, WPF0072, WPF0073, WPF0074};
use crate::diagnostics::{keys, Finding};
use crate::matchers::{match_node, static_property_value, Shape};
use crate::resolvers::{conversion_types, typeof_type};
use crate::traits::{LintRule, NodeAnalyzer};

/// Checks default instances and `[ValueConversion]` of converter implementations
pub struct ValueConverterRuleImpl;

static DESCRIPTORS: [&RuleDescriptor; 5] = [&WPF0070, &WPF0071, &WPF0072, &WPF0073, &WPF0074];

impl LintRule for ValueConverterRuleImpl {
    fn name(&self) -> &'static str {
        "value_converter"
    }

    fn description(&self) -> &'static str {
        "Checks converter default instances and their ValueConversion attributes"
    }

    fn descriptors(&self) -> &'static [&'static RuleDescriptor] {
        &DESCRIPTORS
    }
}

impl NodeAnalyzer for ValueConverterRuleImpl {
    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::TypeDeclaration]
    }

    fn analyze(&self, ctx: &NodeContext) -> Result<Vec<Finding>, Cancelled> {
        let SyntaxNode::Type(ty) = ctx.node else {
            return Ok(Vec::new());
        };
        let compilation = ctx.compilation();
        let Some(symbol) = ctx.containing_symbol else {
            return Ok(Vec::new());
        };
        let Some(type_symbol) = compilation.get_type(symbol) else {
            return Ok(Vec::new());
        };
        let single = compilation.is_assignable_to_known(symbol, KnownType::IValueConverter);
        let multi = compilation.is_assignable_to_known(symbol, KnownType::IMultiValueConverter);
        if !(single || multi)
            || type_symbol.is_abstract
            || matches!(
                type_symbol.accessibility,
                Accessibility::Private | Accessibility::Protected
            )
        {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        if !compilation.is_assignable_to_known(symbol, KnownType::MarkupExtension) {
            findings.extend(check_default_instance(ctx, ty, symbol));
        }
        if single {
            findings.extend(check_value_conversion(ctx, ty));
        }
        Ok(findings)
    }
}

/// `WPF0074` for every default instance of another type, `WPF0070` when a
/// stateless converter has none.
fn check_default_instance(ctx: &NodeContext, ty: &TypeDecl, converter: SymbolId) -> Vec<Finding> {
    let compilation = ctx.compilation();
    let defaults: Vec<&Member> = ty
        .non_type_members()
        .filter(|member| is_default_instance(ctx, member))
        .collect();
    if defaults.is_empty() {
        return if is_stateless(ty) {
            vec![Finding::new(&WPF0070, ty.name.range)]
        } else {
            Vec::new()
        };
    }
    defaults
        .into_iter()
        .filter_map(assigned_value)
        .filter(|value| {
            ctx.model
                .type_info(value.id)
                .is_some_and(|assigned| !compilation.types_equal(assigned, converter))
        })
        .map(|value| Finding::new(&WPF0074, value.range))
        .collect()
}

/// A static field or property typed as a converter.
fn is_default_instance(ctx: &NodeContext, member: &Member) -> bool {
    let member = member.as_member();
    if !matches!(member, MemberRef::Field(_) | MemberRef::Property(_))
        || !member.modifiers().is_static()
    {
        return false;
    }
    let compilation = ctx.compilation();
    ctx.model
        .declared_symbol(member.id())
        .and_then(|declared| compilation.symbol(declared).value_type())
        .is_some_and(|ty| {
            compilation.is_assignable_to_known(ty, KnownType::IValueConverter)
                || compilation.is_assignable_to_known(ty, KnownType::IMultiValueConverter)
        })
}

fn assigned_value(member: &Member) -> Option<&Expr> {
    let value = match member {
        Member::Field(field) => field.initializer.as_ref(),
        Member::Property(property) => static_property_value(property),
        _ => None,
    };
    value.map(Expr::unparenthesized)
}

/// No extension points, no constructor parameters and no mutable instance state.
fn is_stateless(ty: &TypeDecl) -> bool {
    let extensible = ty.non_type_members().any(|member| {
        let modifiers = member.as_member().modifiers();
        [Modifier::Virtual, Modifier::Abstract, Modifier::Protected]
            .into_iter()
            .any(|modifier| modifiers.has(modifier))
    });
    let parameterized = ty.constructors().any(|ctor| !ctor.params.is_empty());
    let mutable = ty.non_type_members().any(|member| match member.as_member() {
        MemberRef::Field(field) => {
            !field.modifiers.is_static() && !field.modifiers.is_readonly()
        }
        MemberRef::Property(property) => {
            !property.modifiers.is_static() && property.setter().is_some()
        }
        _ => false,
    });
    !(extensible || parameterized || mutable)
}

/// `WPF0071` / `WPF0073` for a missing `[ValueConversion]`, `WPF0072` for wrong types in it.
fn check_value_conversion(ctx: &NodeContext, ty: &TypeDecl) -> Vec<Finding> {
    let compilation = ctx.compilation();
    let Some(types) = conversion_types(ctx.model, ty) else {
        return Vec::new();
    };

    let conversion = ty.attributes.iter().find_map(|attribute| {
        match match_node(SyntaxNode::Attribute(attribute))? {
            Shape::ValueConversionAttribute {
                attribute,
                source,
                target,
            } if is_attribute(ctx, attribute, KnownType::ValueConversionAttribute) => {
                Some((source, target))
            }
            _ => None,
        }
    });

    let Some((source_arg, target_arg)) = conversion else {
        let finding = match (types.source, types.target) {
            (Some(source), Some(target)) => {
                let attribute = format!(
                    "[ValueConversion({}, {})]",
                    typeof_text(compilation, source),
                    typeof_text(compilation, target)
                );
                Finding::new(&WPF0071, ty.name.range)
                    .with_property(keys::ATTRIBUTE_TEXT, attribute)
            }
            _ => Finding::new(&WPF0073, ty.name.range),
        };
        return vec![finding];
    };

    [(source_arg, types.source), (target_arg, types.target)]
        .into_iter()
        .filter_map(|(argument, expected)| check_argument(ctx, argument?, expected?))
        .collect()
}

fn check_argument(ctx: &NodeContext, argument: &Argument, expected: SymbolId) -> Option<Finding> {
    let compilation = ctx.compilation();
    let actual = typeof_type(ctx.model, &argument.expr)?;
    if compilation.types_equal(actual, expected) {
        return None;
    }
    let expected = typeof_text(compilation, expected);
    Some(
        Finding::new(&WPF0072, argument.expr.range)
            .with_arg(expected.as_str())
            .with_property(keys::EXPECTED_ARGUMENT, expected),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::run;

    #[test]
    fn test_missing_attribute() {
        let outcome = run(
            &ValueConverterRuleImpl,
            r"
using System;
using System.Globalization;
using System.Windows;
using System.Windows.Data;

public class ↓BoolToVisibilityConverter : IValueConverter
{
    public object Convert(object value, Type targetType, object parameter, CultureInfo culture)
    {
        return (bool)value ? Visibility.Visible : Visibility.Collapsed;
    }

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture)
    {
        throw new NotSupportedException();
    }
}

public class ↓PassThroughConverter : IValueConverter
{
    public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => value;

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => value;
}",
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r"
        WPF0070 `BoolToVisibilityConverter` Add default field to converter.
        WPF0071 `BoolToVisibilityConverter` Add ValueConversion attribute.
        WPF0070 `PassThroughConverter` Add default field to converter.
        WPF0073 `PassThroughConverter` Add ValueConversion attribute (unknown types).
        ");
        assert_eq!(
            outcome.property("WPF0071", keys::ATTRIBUTE_TEXT),
            Some("[ValueConversion(typeof(bool), typeof(Visibility))]")
        );
    }

    #[test]
    fn test_wrong_attribute_types() {
        let outcome = run(
            &ValueConverterRuleImpl,
            r#"
using System;
using System.Globalization;
using System.Windows.Data;

[ValueConversion(typeof(int), typeof(string))]
public class IntToStringConverter : IValueConverter
{
    public static readonly IntToStringConverter Default = new IntToStringConverter();

    public object Convert(object value, Type targetType, object parameter, CultureInfo culture)
    {
        if (value is int)
        {
            return "int";
        }

        return null;
    }

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => null;
}

[ValueConversion(↓typeof(string), targetType: typeof(string))]
public class CountConverter : IValueConverter
{
    public static CountConverter Instance { get; } = new CountConverter();

    public object Convert(object value, Type targetType, object parameter, CultureInfo culture)
    {
        return (int)value > 0 ? "some" : "none";
    }

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => null;
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @"WPF0072 `typeof(string)` ValueConversion must use correct types. Expected: typeof(int)");
    }

    #[test]
    fn test_other_types_are_ignored() {
        let outcome = run(
            &ValueConverterRuleImpl,
            r"
using System.Windows.Controls;

public class FooControl : Control
{
}",
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }

    #[test]
    fn test_default_instance() {
        let outcome = run(
            &ValueConverterRuleImpl,
            r#"
using System;
using System.Globalization;
using System.Windows.Data;

[ValueConversion(typeof(int), typeof(string))]
public class ↓FooConverter : IValueConverter
{
    public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => ((int)value).ToString();

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => null;
}

[ValueConversion(typeof(int), typeof(string))]
public sealed class BarConverter : IValueConverter
{
    public static readonly BarConverter Default = new BarConverter();

    public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => ((int)value).ToString();

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => null;
}

[ValueConversion(typeof(int), typeof(string))]
public class BazConverter : IValueConverter
{
    public static readonly IValueConverter Default = ↓new BarConverter();

    public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => ((int)value).ToString();

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => null;
}

public class MultiConverter : IMultiValueConverter
{
    public static MultiConverter Instance => ↓new FooMultiConverter();

    public object Convert(object[] values, Type targetType, object parameter, CultureInfo culture) => null;

    public object[] ConvertBack(object value, Type[] targetTypes, object parameter, CultureInfo culture) => null;
}

public class FooMultiConverter : MultiConverter
{
    public int Count { get; set; }
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r"
        WPF0070 `FooConverter` Add default field to converter.
        WPF0074 `new BarConverter()` Use containing type.
        WPF0074 `new FooMultiConverter()` Use containing type.
        ");
    }

    #[test]
    fn test_stateful_converters_need_no_default_instance() {
        let outcome = run(
            &ValueConverterRuleImpl,
            r#"
using System;
using System.Globalization;
using System.Windows.Data;

[ValueConversion(typeof(int), typeof(string))]
public class PrefixConverter : IValueConverter
{
    public string Prefix { get; set; }

    public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => this.Prefix + ((int)value).ToString();

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => null;
}

[ValueConversion(typeof(int), typeof(string))]
public class SuffixConverter : IValueConverter
{
    private readonly string suffix;

    public SuffixConverter(string suffix)
    {
        this.suffix = suffix;
    }

    public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => ((int)value).ToString() + this.suffix;

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => null;
}

[ValueConversion(typeof(int), typeof(string))]
public class OpenConverter : IValueConverter
{
    public virtual object Convert(object value, Type targetType, object parameter, CultureInfo culture) => ((int)value).ToString();

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => null;
}"#,
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }

    #[test]
    fn test_abstract_and_hidden_converters_are_ignored() {
        let outcome = run(
            &ValueConverterRuleImpl,
            r"
using System;
using System.Globalization;
using System.Windows.Data;

public class Outer
{
    private class HiddenConverter : IValueConverter
    {
        public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => value;

        public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => value;
    }

    protected class ProtectedConverter : IValueConverter
    {
        public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => value;

        public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => value;
    }
}

public abstract class BaseConverter : IValueConverter
{
    public object Convert(object value, Type targetType, object parameter, CultureInfo culture) => value;

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture) => value;
}",
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }
}
