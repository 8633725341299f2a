/// Analyzer implementations
///
/// Each analyzer lives in its own file, registers for the node kinds it
/// inspects and reports one or more descriptors:
/// - `BackingMemberRuleImpl` - `DependencyProperty` / `DependencyPropertyKey` fields and properties
/// - `ClrPropertyRuleImpl` - instance properties wrapping `GetValue` / `SetValue`
/// - `ClrMethodRuleImpl` - `GetX` / `SetX` accessor methods of attached properties
/// - `AttributeRuleImpl` - markup extension, control template and `XmlnsDefinition` attributes
/// - `ValueConverterRuleImpl` - `IValueConverter` / `IMultiValueConverter` implementations
/// - `ResourceKeyRuleImpl` - `new ComponentResourceKey(...)`
/// - `RoutedCommandRuleImpl` - `new RoutedCommand(...)` / `new RoutedUICommand(...)`
use wpf_hir::{Compilation, KnownType, SymbolId};
use wpf_syntax::{stmt_contains, Attribute, Block, Expr, MemberRef, Stmt};

use crate::context::NodeContext;
use crate::matchers::static_property_value;

mod attributes;
mod backing_member;
mod clr_method;
mod clr_property;
mod resource_key;
mod routed_command;
mod value_converter;

pub use attributes::AttributeRuleImpl;
pub use backing_member::BackingMemberRuleImpl;
pub use clr_method::ClrMethodRuleImpl;
pub use clr_property::ClrPropertyRuleImpl;
pub use resource_key::ResourceKeyRuleImpl;
pub use routed_command::RoutedCommandRuleImpl;
pub use value_converter::ValueConverterRuleImpl;

/// `typeof(T)` as it should be written for `ty`.
fn typeof_text(compilation: &Compilation, ty: SymbolId) -> String {
    format!("typeof({})", compilation.display(ty))
}

/// The attribute binds to the framework attribute class `tag`.
fn is_attribute(ctx: &NodeContext, attribute: &Attribute, tag: KnownType) -> bool {
    let compilation = ctx.compilation();
    ctx.model
        .type_info(attribute.id)
        .is_some_and(|ty| compilation.known().is(compilation, ty, tag))
}

/// Statements of an accessor body other than the one making `call`.
fn extra_statements<'a>(body: Option<&'a Block>, call: &'a Expr) -> impl Iterator<Item = &'a Stmt> {
    body.into_iter()
        .flat_map(|body| body.statements.iter())
        .filter(|stmt| !stmt_contains(stmt, call.id))
}

/// The static field or property whose initializer is exactly `expr`.
fn initialized_member<'a>(ctx: &NodeContext<'a>, expr: &Expr) -> Option<MemberRef<'a>> {
    let member = ctx.containing_member?;
    let initializer = match member {
        MemberRef::Field(field) => field.initializer.as_ref()?,
        MemberRef::Property(property) => static_property_value(property)?,
        _ => return None,
    };
    (member.modifiers().is_static() && initializer.unparenthesized().id == expr.id)
        .then_some(member)
}

#[cfg(test)]
pub(crate) mod testing {
    use wpf_hir::SemanticModel;
    use wpf_syntax::visit_nodes;
    use wpf_test_utils::{insert_markers, Fixture};
    use wpf_types::CancellationToken;

    use crate::context::NodeContext;
    use crate::diagnostics::Finding;
    use crate::traits::NodeAnalyzer;

    /// Findings of one analyzer over the first file of a fixture.
    pub(crate) struct Outcome {
        pub findings: Vec<Finding>,
        text: String,
        markers: Vec<usize>,
    }

    impl Outcome {
        /// One line per finding: id, reported text and message.
        pub(crate) fn render(&self) -> String {
            self.findings
                .iter()
                .map(|finding| {
                    format!(
                        "{} `{}` {}",
                        finding.descriptor.id,
                        self.text
                            .get(finding.range.start..finding.range.end)
                            .unwrap_or_default(),
                        finding.descriptor.format_message(&finding.args)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }

        /// Asserts that findings start exactly at the fixture's `↓` markers.
        pub(crate) fn assert_at_markers(&self) {
            let starts: Vec<usize> = self.findings.iter().map(|f| f.range.start).collect();
            assert_eq!(
                insert_markers(&self.text, &starts),
                insert_markers(&self.text, &self.markers)
            );
        }

        pub(crate) fn property(&self, id: &str, key: &str) -> Option<&str> {
            self.findings
                .iter()
                .find(|f| f.descriptor.id == id)
                .and_then(|f| f.properties.get(key))
                .map(String::as_str)
        }

        pub(crate) fn ids(&self) -> Vec<&'static str> {
            self.findings.iter().map(|f| f.descriptor.id).collect()
        }
    }

    pub(crate) fn run(analyzer: &dyn NodeAnalyzer, code: &str) -> Outcome {
        run_files(analyzer, &[code])
    }

    /// Runs over the first file; the others only contribute declarations.
    pub(crate) fn run_files(analyzer: &dyn NodeAnalyzer, files: &[&str]) -> Outcome {
        let fixture = Fixture::with_files(files);
        let model = fixture.model(0);
        let model: &dyn SemanticModel = &model;
        let token = CancellationToken::new();
        let mut findings = Vec::new();
        for visit in visit_nodes(model.tree()) {
            if !analyzer.kinds().contains(&visit.node.kind()) {
                continue;
            }
            let ctx = NodeContext::new(visit, model, &token);
            findings.extend(analyzer.analyze(&ctx).unwrap());
        }
        findings.sort_by_key(|f| (f.range.start, f.range.end, f.descriptor.id));
        Outcome {
            findings,
            text: model.tree().text().to_owned(),
            markers: fixture.markers(0).to_vec(),
        }
    }
}
