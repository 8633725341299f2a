use wpf_hir::{KnownType, Symbol, SymbolId};
use wpf_syntax::{Argument, MemberRef, NodeKind};
use wpf_types::Cancelled;

use super::{is_attribute, typeof_text};
use crate::context::NodeContext;
use crate::descriptors::{
    RuleDescriptor, WPF0051, WPF0081, WPF0082, WPF0084, WPF0085, WPF0132,
};
use crate::diagnostics::{keys, Finding};
use crate::matchers::{match_node, Shape, XamlSetHandler};
use crate::resolvers::{constant_string, constructor_parameter, provide_value_type, typeof_type};
use crate::traits::{LintRule, NodeAnalyzer};

/// Checks the arguments of markup and control template attributes
pub struct AttributeRuleImpl;

static DESCRIPTORS: [&RuleDescriptor; 6] =
    [&WPF0051, &WPF0081, &WPF0082, &WPF0084, &WPF0085, &WPF0132];

const PART_PREFIX: &str = "PART_";

impl LintRule for AttributeRuleImpl {
    fn name(&self) -> &'static str {
        "attributes"
    }

    fn description(&self) -> &'static str {
        "Checks markup extension, XAML handler, template part and xmlns attributes"
    }

    fn descriptors(&self) -> &'static [&'static RuleDescriptor] {
        &DESCRIPTORS
    }
}

impl NodeAnalyzer for AttributeRuleImpl {
    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Attribute]
    }

    fn analyze(&self, ctx: &NodeContext) -> Result<Vec<Finding>, Cancelled> {
        let Some(shape) = match_node(ctx.node) else {
            return Ok(Vec::new());
        };
        let finding = match shape {
            Shape::ConstructorArgumentAttribute {
                attribute,
                argument,
            } if is_attribute(ctx, attribute, KnownType::ConstructorArgumentAttribute) => {
                check_constructor_argument(ctx, argument)
            }
            Shape::MarkupExtensionReturnTypeAttribute {
                attribute,
                argument,
            } if is_attribute(ctx, attribute, KnownType::MarkupExtensionReturnTypeAttribute) => {
                check_return_type(ctx, argument)
            }
            Shape::XamlSetHandlerAttribute {
                attribute,
                handler,
                argument,
            } => {
                let (tag, descriptor, args_type) = match handler {
                    XamlSetHandler::MarkupExtension => (
                        KnownType::XamlSetMarkupExtensionAttribute,
                        &WPF0084,
                        KnownType::XamlSetMarkupExtensionEventArgs,
                    ),
                    XamlSetHandler::TypeConverter => (
                        KnownType::XamlSetTypeConverterAttribute,
                        &WPF0085,
                        KnownType::XamlSetTypeConverterEventArgs,
                    ),
                };
                if !is_attribute(ctx, attribute, tag) {
                    return Ok(Vec::new());
                }
                match has_handler(ctx, argument, args_type) {
                    Some(false) => Some(Finding::new(descriptor, argument.expr.range)),
                    _ => None,
                }
            }
            Shape::TemplatePartAttribute { attribute, name }
                if is_attribute(ctx, attribute, KnownType::TemplatePartAttribute) =>
            {
                constant_string(ctx.model, &name.expr)
                    .filter(|value| !value.starts_with(PART_PREFIX))
                    .map(|value| Finding::new(&WPF0132, name.expr.range).with_arg(value))
            }
            Shape::XmlnsDefinitionAttribute {
                attribute,
                clr_namespace,
            } if is_attribute(ctx, attribute, KnownType::XmlnsDefinitionAttribute) => {
                constant_string(ctx.model, &clr_namespace.expr)
                    .filter(|namespace| !ctx.compilation().has_namespace(namespace))
                    .map(|namespace| {
                        Finding::new(&WPF0051, clr_namespace.expr.range).with_arg(namespace)
                    })
            }
            _ => None,
        };
        Ok(finding.into_iter().collect())
    }
}

/// `[ConstructorArgument("x")]` must name the parameter the property is assigned from.
fn check_constructor_argument(ctx: &NodeContext, argument: &Argument) -> Option<Finding> {
    let Some(MemberRef::Property(_)) = ctx.containing_member else {
        return None;
    };
    let actual = constant_string(ctx.model, &argument.expr)?;
    let property = ctx.containing_symbol?;
    let expected = constructor_parameter(ctx.model, ctx.containing_type?, property)?;
    (actual != expected).then(|| {
        Finding::new(&WPF0082, argument.expr.range)
            .with_arg(expected.as_str())
            .with_property(keys::EXPECTED_ARGUMENT, format!("\"{expected}\""))
    })
}

/// `[MarkupExtensionReturnType(typeof(T))]` must name what `ProvideValue` returns.
fn check_return_type(ctx: &NodeContext, argument: &Argument) -> Option<Finding> {
    let compilation = ctx.compilation();
    let extension = ctx.containing_type_symbol()?;
    if ctx.containing_member.is_some()
        || !compilation.is_assignable_to_known(extension, KnownType::MarkupExtension)
    {
        return None;
    }
    let declared = typeof_type(ctx.model, &argument.expr)?;
    let provided = provide_value_type(ctx.model, ctx.containing_type?)?;
    if compilation.types_equal(declared, provided) {
        return None;
    }
    let expected = typeof_text(compilation, provided);
    Some(
        Finding::new(&WPF0081, argument.expr.range)
            .with_arg(expected.as_str())
            .with_property(keys::EXPECTED_ARGUMENT, expected),
    )
}

/// Whether the containing type has `static void Name(object, TArgs)` for the
/// handler named by `argument`. `None` when the name is not a constant.
fn has_handler(ctx: &NodeContext, argument: &Argument, args_type: KnownType) -> Option<bool> {
    let name = constant_string(ctx.model, &argument.expr)?;
    let ty = ctx.containing_type_symbol()?;
    let compilation = ctx.compilation();
    let known = compilation.known();
    let parameter_is = |parameter: SymbolId, tag: KnownType| {
        compilation
            .symbol(parameter)
            .value_type()
            .is_some_and(|ty| known.is(compilation, ty, tag))
    };
    let handler = compilation.find_member(ty, &name, |symbol| {
        let Symbol::Method(method) = symbol else {
            return false;
        };
        method.is_static
            && method
                .return_type
                .is_some_and(|ty| known.is(compilation, ty, KnownType::Void))
            && matches!(
                method.parameters.as_slice(),
                [sender, args] if parameter_is(*sender, KnownType::Object) && parameter_is(*args, args_type)
            )
    });
    Some(handler.is_some())
}
