//! Code fix providers
//!
//! A provider turns a diagnostic's fix payload into a [`CodeFix`] for the
//! tree the diagnostic was reported on. Providers re-check the syntax at the
//! diagnostic's location first and decline when it no longer holds what the
//! analyzer saw, so applying a fix twice is a no-op.

mod add_argument_list;
mod add_attribute;
mod change_type;
mod move_field;
mod rename;
mod replace_argument;

use std::sync::{Arc, LazyLock};

use wpf_syntax::{for_each_expr_in_member, Argument, Member, SyntaxTree};
use wpf_types::{apply_edits, CodeFix, EditError, OffsetRange, TextEdit};

use crate::diagnostics::LintDiagnostic;

pub use add_argument_list::AddArgumentListFix;
pub use add_attribute::AddAttributeFix;
pub use change_type::ChangeTypeFix;
pub use move_field::MoveFieldFix;
pub use rename::RenameFix;
pub use replace_argument::ReplaceArgumentFix;

/// Proposes edits for the diagnostics of a fixed set of rules
pub trait FixProvider: Send + Sync {
    /// Unique identifier for the provider (e.g., `"rename"`)
    fn name(&self) -> &'static str;

    /// Ids of the diagnostics this provider can fix
    fn fixable_rule_ids(&self) -> &'static [&'static str];

    /// Fix for `diagnostic`, or `None` when the payload is missing or stale
    fn propose(&self, diagnostic: &LintDiagnostic, tree: &SyntaxTree) -> Option<CodeFix>;
}

/// Lazily initialized fix providers.
static PROVIDERS: LazyLock<Vec<Arc<dyn FixProvider>>> = LazyLock::new(|| {
    vec![
        Arc::new(RenameFix),
        Arc::new(ChangeTypeFix),
        Arc::new(ReplaceArgumentFix),
        Arc::new(AddArgumentListFix),
        Arc::new(MoveFieldFix),
        Arc::new(AddAttributeFix),
    ]
});

#[must_use]
pub fn providers() -> &'static [Arc<dyn FixProvider>] {
    &PROVIDERS
}

/// Fix for one diagnostic reported on `tree`.
#[must_use]
pub fn propose_fix(diagnostic: &LintDiagnostic, tree: &SyntaxTree) -> Option<CodeFix> {
    if diagnostic.location.file != tree.file_id() {
        return None;
    }
    providers()
        .iter()
        .filter(|provider| provider.fixable_rule_ids().contains(&diagnostic.rule_id))
        .find_map(|provider| {
            let fix = provider.propose(diagnostic, tree);
            if fix.is_none() {
                tracing::trace!(
                    provider = provider.name(),
                    rule = diagnostic.rule_id,
                    "Fix declined"
                );
            }
            fix
        })
}

/// Result of fixing many diagnostics of one tree at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixAll {
    /// Edits of every accepted fix, never overlapping each other
    pub edits: Vec<TextEdit>,
    /// Diagnostics whose fix was accepted
    pub fixed: Vec<LintDiagnostic>,
    /// Diagnostics without a fix or whose fix conflicted with an accepted one
    pub pending: Vec<LintDiagnostic>,
}

impl FixAll {
    /// Apply the accepted edits to the tree's text in one pass.
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        apply_edits(text, &self.edits)
    }
}

/// Fixes as many diagnostics as possible without conflicting edits.
///
/// Candidates are taken in span order; a fix whose edits touch an already
/// accepted edit stays pending for a later round.
#[must_use]
#[tracing::instrument(skip(diagnostics, tree), fields(file = ?tree.file_id(), diagnostics = diagnostics.len()))]
pub fn fix_all(diagnostics: &[LintDiagnostic], tree: &SyntaxTree) -> FixAll {
    let mut ordered: Vec<&LintDiagnostic> = diagnostics.iter().collect();
    ordered.sort_by_key(|d| (d.range().start, d.range().end, d.rule_id));

    let mut result = FixAll::default();
    for diagnostic in ordered {
        match propose_fix(diagnostic, tree) {
            Some(fix) if !fix.conflicts_with(&result.edits) => {
                result.edits.extend(fix.edits);
                result.fixed.push(diagnostic.clone());
            }
            _ => result.pending.push(diagnostic.clone()),
        }
    }

    tracing::debug!(
        fixed = result.fixed.len(),
        pending = result.pending.len(),
        "Fix-all complete"
    );
    result
}

/// The argument whose expression spans exactly `range`, in attributes,
/// invocations or object creations anywhere in the tree.
fn argument_at(tree: &SyntaxTree, range: OffsetRange) -> Option<&Argument> {
    let mut found = None;
    for ty in tree.types() {
        let attributes = ty
            .attributes
            .iter()
            .chain(ty.non_type_members().flat_map(|m| m.as_member().attributes()));
        found = attributes
            .filter_map(|attribute| attribute.args.as_ref())
            .flat_map(|args| &args.args)
            .find(|arg| arg.expr.range == range);
        if found.is_some() {
            return found;
        }
        for member in ty.non_type_members() {
            for_each_expr_in_member(member.as_member(), &mut |expr| {
                if found.is_none() {
                    found = expr
                        .argument_list()
                        .and_then(|args| args.args.iter().find(|arg| arg.expr.range == range));
                }
            });
            if found.is_some() {
                return found;
            }
        }
    }
    found
}

/// Declared member of a type whose name identifier spans exactly `range`.
fn member_named_at(tree: &SyntaxTree, range: OffsetRange) -> Option<&Member> {
    tree.containing_type(range)?
        .non_type_members()
        .find(|member| member.as_member().name().range == range)
}

#[cfg(test)]
mod tests {
    use wpf_test_utils::{init_tracing, Fixture};
    use wpf_types::{CancellationToken, FileId};

    use super::*;
    use crate::Analyzer;

    const KEY_AFTER_PROPERTY: &str = r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    /// <summary>Identifies the <see cref="Bar"/> dependency property.</summary>
    public static readonly DependencyProperty BarProperty = BarPropertyKey.DependencyProperty;

    private static readonly DependencyPropertyKey BarPropertyKey = DependencyProperty.RegisterReadOnly(
        nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public static readonly DependencyProperty ErrorProperty = DependencyProperty.Register(
        "Baz", typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public int Bar
    {
        get => (int)this.GetValue(BarProperty);
        private set => this.SetValue(BarPropertyKey, value);
    }
}"#;

    fn analyze(fixture: &Fixture) -> Vec<LintDiagnostic> {
        let model = fixture.model(0);
        Analyzer::default()
            .analyze_tree(&model, &CancellationToken::new())
            .unwrap()
    }

    #[test]
    fn test_fix_for_other_file_is_declined() {
        let fixture = Fixture::new(KEY_AFTER_PROPERTY);
        let mut diagnostic = analyze(&fixture)
            .into_iter()
            .find(|d| d.rule_id == "WPF0001")
            .unwrap();
        assert!(propose_fix(&diagnostic, fixture.tree(0)).is_some());

        diagnostic.location.file = FileId::new(42);
        assert_eq!(propose_fix(&diagnostic, fixture.tree(0)), None);
    }

    #[test]
    fn test_fix_all_applies_every_fix_once() {
        init_tracing();
        let fixture = Fixture::new(KEY_AFTER_PROPERTY);
        let diagnostics = analyze(&fixture);
        let result = fix_all(&diagnostics, fixture.tree(0));
        let fixed: Vec<_> = result.fixed.iter().map(|d| d.rule_id).collect();
        assert_eq!(fixed, ["WPF0031", "WPF0001"]);
        assert!(result.pending.is_empty());

        let text = result.apply(fixture.tree(0).text()).unwrap();
        insta::assert_snapshot!(text.trim(), @r#"
        using System.Windows;
        using System.Windows.Controls;

        public class FooControl : Control
        {
            private static readonly DependencyPropertyKey BarPropertyKey = DependencyProperty.RegisterReadOnly(
                nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

            /// <summary>Identifies the <see cref="Bar"/> dependency property.</summary>
            public static readonly DependencyProperty BarProperty = BarPropertyKey.DependencyProperty;

            public static readonly DependencyProperty BazProperty = DependencyProperty.Register(
                "Baz", typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

            public int Bar
            {
                get => (int)this.GetValue(BarProperty);
                private set => this.SetValue(BarPropertyKey, value);
            }
        }
        "#);

        let fixed_fixture = Fixture::new(&text);
        assert!(analyze(&fixed_fixture).is_empty());
    }

    #[test]
    fn test_conflicting_fixes_stay_pending() {
        let fixture = Fixture::new(KEY_AFTER_PROPERTY);
        let rename = analyze(&fixture)
            .into_iter()
            .find(|d| d.rule_id == "WPF0001")
            .unwrap();
        let result = fix_all(&[rename.clone(), rename], fixture.tree(0));
        assert_eq!(result.fixed.len(), 1);
        assert_eq!(result.pending.len(), 1);
        assert_eq!(result.edits.len(), 1);
    }
}
