use wpf_syntax::SyntaxTree;
use wpf_types::CodeFix;

use super::{member_named_at, FixProvider};
use crate::diagnostics::{keys, LintDiagnostic};

/// Renames a declaration to the name its registration expects
pub struct RenameFix;

impl FixProvider for RenameFix {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &["WPF0001", "WPF0002", "WPF0003", "WPF0004"]
    }

    fn propose(&self, diagnostic: &LintDiagnostic, tree: &SyntaxTree) -> Option<CodeFix> {
        let expected = diagnostic.property(keys::EXPECTED_NAME)?;
        let member = member_named_at(tree, diagnostic.range())?;
        let name = member.name();
        if name.text == expected {
            return None;
        }
        Some(CodeFix::replace(
            format!("Rename to: '{expected}'"),
            name.range,
            expected,
        ))
    }
}

#[cfg(test)]
mod tests {
    use wpf_test_utils::Fixture;
    use wpf_types::CancellationToken;

    use super::*;
    use crate::Analyzer;

    #[test]
    fn test_rename_clr_property_and_accessor_method() {
        let fixture = Fixture::new(
            r#"
using System.Windows;

public static class Foo
{
    /// <summary>Identifies the Bar attached property.</summary>
    public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo), new PropertyMetadata(default(int)));

    /// <summary>Helper for setting <see cref="BarProperty"/> on <paramref name="element"/>.</summary>
    /// <param name="element"><see cref="DependencyObject"/> to set <see cref="BarProperty"/> on.</param>
    /// <param name="value">Bar property value.</param>
    public static void SetError(DependencyObject element, int value)
    {
        element.SetValue(BarProperty, value);
    }
}"#,
        );
        let tree = fixture.tree(0);
        let diagnostics = Analyzer::default()
            .analyze_tree(&fixture.model(0), &CancellationToken::new())
            .unwrap();
        let diagnostic = diagnostics.iter().find(|d| d.rule_id == "WPF0004").unwrap();

        let fix = RenameFix.propose(diagnostic, tree).unwrap();
        assert_eq!(fix.label, "Rename to: 'SetBar'");
        let fixed = fix.apply(tree.text()).unwrap();
        assert!(fixed.contains("public static void SetBar(DependencyObject element, int value)"));

        let refixed = Fixture::new(&fixed);
        assert_eq!(RenameFix.propose(diagnostic, refixed.tree(0)), None);
    }
}
