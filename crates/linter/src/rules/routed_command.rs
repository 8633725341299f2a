use wpf_hir::KnownType;
use wpf_syntax::NodeKind;
use wpf_types::Cancelled;

use super::{initialized_member, typeof_text};
use crate::context::NodeContext;
use crate::descriptors::{RuleDescriptor, WPF0120, WPF0121};
use crate::diagnostics::{keys, Finding};
use crate::matchers::{match_node, Shape};
use crate::resolvers::{argument_for, constant_string, typeof_type};
use crate::traits::{LintRule, NodeAnalyzer};

/// Checks routed commands assigned to static members
pub struct RoutedCommandRuleImpl;

static DESCRIPTORS: [&RuleDescriptor; 2] = [&WPF0120, &WPF0121];

impl LintRule for RoutedCommandRuleImpl {
    fn name(&self) -> &'static str {
        "routed_command"
    }

    fn description(&self) -> &'static str {
        "Checks that routed commands are named after their member and owned by their type"
    }

    fn descriptors(&self) -> &'static [&'static RuleDescriptor] {
        &DESCRIPTORS
    }
}

impl NodeAnalyzer for RoutedCommandRuleImpl {
    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::ObjectCreation]
    }

    fn analyze(&self, ctx: &NodeContext) -> Result<Vec<Finding>, Cancelled> {
        let Some(Shape::RoutedCommandCreation { creation, args }) = match_node(ctx.node) else {
            return Ok(Vec::new());
        };
        let model = ctx.model;
        let compilation = ctx.compilation();
        let is_command = model.type_info(creation.id).is_some_and(|ty| {
            matches!(
                compilation.known().classify(compilation, ty),
                Some(KnownType::RoutedCommand | KnownType::RoutedUICommand)
            )
        });
        if !is_command {
            return Ok(Vec::new());
        }
        let (Some(member), Some(owner), Some(ctor)) = (
            initialized_member(ctx, creation),
            ctx.containing_type_symbol(),
            model.symbol_info(creation.id),
        ) else {
            return Ok(Vec::new());
        };

        let mut findings = Vec::new();
        if let Some(argument) = argument_for(compilation, ctor, args, "name") {
            let member_name = &member.name().text;
            if constant_string(model, &argument.expr).is_some_and(|name| &name != member_name) {
                let expected = format!("nameof({member_name})");
                findings.push(
                    Finding::new(&WPF0120, argument.expr.range)
                        .with_arg(expected.as_str())
                        .with_property(keys::EXPECTED_ARGUMENT, expected),
                );
            }
        }
        if let Some(argument) = argument_for(compilation, ctor, args, "ownerType") {
            let matches_owner = typeof_type(model, &argument.expr)
                .is_some_and(|ty| compilation.types_equal(ty, owner));
            if !matches_owner {
                let expected = typeof_text(compilation, owner);
                findings.push(
                    Finding::new(&WPF0121, argument.expr.range)
                        .with_arg(expected.as_str())
                        .with_property(keys::EXPECTED_ARGUMENT, expected),
                );
            }
        }
        Ok(findings)
    }
}
