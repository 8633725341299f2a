use wpf_hir::KnownType;
use wpf_syntax::{MemberRef, NodeKind};
use wpf_types::Cancelled;

use super::{initialized_member, typeof_text};
use crate::context::NodeContext;
use crate::descriptors::{RuleDescriptor, WPF0140, WPF0141};
use crate::diagnostics::{keys, Finding};
use crate::matchers::{match_node, Shape};
use crate::resolvers::{argument_for, constant_string, typeof_type};
use crate::traits::{LintRule, NodeAnalyzer};

/// Checks `ComponentResourceKey` instances assigned to static members
pub struct ResourceKeyRuleImpl;

static DESCRIPTORS: [&RuleDescriptor; 2] = [&WPF0140, &WPF0141];

impl LintRule for ResourceKeyRuleImpl {
    fn name(&self) -> &'static str {
        "resource_key"
    }

    fn description(&self) -> &'static str {
        "Checks that component resource keys use the containing type and member"
    }

    fn descriptors(&self) -> &'static [&'static RuleDescriptor] {
        &DESCRIPTORS
    }
}

impl NodeAnalyzer for ResourceKeyRuleImpl {
    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::ObjectCreation]
    }

    fn analyze(&self, ctx: &NodeContext) -> Result<Vec<Finding>, Cancelled> {
        let Some(Shape::ComponentResourceKeyCreation { creation, args }) = match_node(ctx.node)
        else {
            return Ok(Vec::new());
        };
        let model = ctx.model;
        let compilation = ctx.compilation();
        let is_key = model.type_info(creation.id).is_some_and(|ty| {
            compilation
                .known()
                .is(compilation, ty, KnownType::ComponentResourceKey)
        });
        if !is_key {
            return Ok(Vec::new());
        }
        let (Some(member), Some(owner)) = (
            initialized_member(ctx, creation),
            ctx.containing_type_symbol(),
        ) else {
            return Ok(Vec::new());
        };
        let expected_type = typeof_text(compilation, owner);
        let expected_key = nameof_member(member);

        if args.is_empty() {
            return Ok(vec![Finding::new(&WPF0140, args.range)
                .with_arg(expected_type.as_str())
                .with_property(
                    keys::ARGUMENT_LIST,
                    format!("{expected_type}, {expected_key}"),
                )]);
        }

        let Some(ctor) = model.symbol_info(creation.id) else {
            return Ok(Vec::new());
        };
        let mut findings = Vec::new();
        if let Some(argument) = argument_for(compilation, ctor, args, "typeInTargetAssembly") {
            let matches_owner = typeof_type(model, &argument.expr)
                .is_some_and(|ty| compilation.types_equal(ty, owner));
            if !matches_owner {
                findings.push(
                    Finding::new(&WPF0140, argument.expr.range)
                        .with_arg(expected_type.as_str())
                        .with_property(keys::EXPECTED_ARGUMENT, expected_type),
                );
            }
        }
        if let Some(argument) = argument_for(compilation, ctor, args, "resourceId") {
            if constant_string(model, &argument.expr)
                .is_some_and(|key| key != member.name().text)
            {
                findings.push(
                    Finding::new(&WPF0141, argument.expr.range)
                        .with_arg(expected_key.as_str())
                        .with_property(keys::EXPECTED_ARGUMENT, expected_key),
                );
            }
        }
        Ok(findings)
    }
}

fn nameof_member(member: MemberRef<'_>) -> String {
    format!("nameof({})", member.name().text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::run;

    #[test]
    fn test_containing_type_and_member() {
        let outcome = run(
            &ResourceKeyRuleImpl,
            r#"
using System.Windows;

public static class ResourceKeys
{
    public static readonly ComponentResourceKey FooKey = new ComponentResourceKey(
        typeof(ResourceKeys),
        nameof(FooKey));

    public static readonly ComponentResourceKey BarKey = new ComponentResourceKey(
        ↓typeof(string),
        ↓"Baz");

    public static ComponentResourceKey MehKey { get; } = new ComponentResourceKey(
        typeof(ResourceKeys),
        nameof(MehKey));
}"#,
        );
        outcome.assert_at_markers();
        insta::assert_snapshot!(outcome.render(), @r#"
        WPF0140 `typeof(string)` Use containing type: typeof(ResourceKeys).
        WPF0141 `"Baz"` Use containing member: nameof(BarKey).
        "#);
        assert_eq!(
            outcome.property("WPF0141", keys::EXPECTED_ARGUMENT),
            Some("nameof(BarKey)")
        );
    }

    #[test]
    fn test_empty_argument_list() {
        let outcome = run(
            &ResourceKeyRuleImpl,
            r"
using System.Windows;

public static class ResourceKeys
{
    public static readonly ComponentResourceKey FooKey = new ComponentResourceKey↓();
}",
        );
        outcome.assert_at_markers();
        assert_eq!(
            outcome.property("WPF0140", keys::ARGUMENT_LIST),
            Some("typeof(ResourceKeys), nameof(FooKey)")
        );
    }

    #[test]
    fn test_local_keys_are_ignored() {
        let outcome = run(
            &ResourceKeyRuleImpl,
            r#"
using System.Windows;

public class Foo
{
    private readonly ComponentResourceKey key = new ComponentResourceKey(typeof(string), "Bar");

    public object Create() => new ComponentResourceKey(typeof(string), "Bar");
}"#,
        );
        assert!(outcome.findings.is_empty(), "{}", outcome.render());
    }
}
