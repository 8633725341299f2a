use wpf_syntax::SyntaxTree;
use wpf_types::CodeFix;

use super::{argument_at, FixProvider};
use crate::diagnostics::{keys, LintDiagnostic};

/// Replaces an argument expression with the expected one
pub struct ReplaceArgumentFix;

impl FixProvider for ReplaceArgumentFix {
    fn name(&self) -> &'static str {
        "replace_argument"
    }

    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[
            "WPF0011", "WPF0034", "WPF0072", "WPF0081", "WPF0082", "WPF0120", "WPF0121",
            "WPF0140", "WPF0141",
        ]
    }

    fn propose(&self, diagnostic: &LintDiagnostic, tree: &SyntaxTree) -> Option<CodeFix> {
        let replacement = match diagnostic.property(keys::EXPECTED_ARGUMENT) {
            Some(argument) => argument.to_owned(),
            None => format!("typeof({})", diagnostic.property(keys::EXPECTED_TYPE)?),
        };
        let argument = argument_at(tree, diagnostic.range())?;
        if tree.text_of(argument.expr.range) == replacement {
            return None;
        }
        Some(CodeFix::replace(
            format!("Use {replacement}"),
            argument.expr.range,
            replacement,
        ))
    }
}

#[cfg(test)]
mod tests {
    use wpf_test_utils::Fixture;
    use wpf_types::{apply_edits, CancellationToken};

    use super::*;
    use crate::Analyzer;

    fn fix_each(source: &str, rule_id: &str) -> String {
        let fixture = Fixture::new(source);
        let tree = fixture.tree(0);
        let diagnostics = Analyzer::default()
            .analyze_tree(&fixture.model(0), &CancellationToken::new())
            .unwrap();
        let edits: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.rule_id == rule_id)
            .filter_map(|d| ReplaceArgumentFix.propose(d, tree))
            .flat_map(|fix| fix.edits)
            .collect();
        assert!(!edits.is_empty());
        apply_edits(tree.text(), &edits).unwrap()
    }

    #[test]
    fn test_owner_type_argument() {
        let fixed = fix_each(
            r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    private static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        "Bar", typeof(int), typeof(Button), new PropertyMetadata(0));
}"#,
            "WPF0011",
        );
        assert!(fixed.contains(r#""Bar", typeof(int), typeof(FooControl), new PropertyMetadata(0)"#));
    }

    #[test]
    fn test_routed_command_arguments() {
        let fixed = fix_each(
            r#"
using System.Windows.Controls;
using System.Windows.Input;

public static class Commands
{
    public static readonly RoutedCommand Open = new RoutedCommand("Load", typeof(Control));
}"#,
            "WPF0120",
        );
        assert!(fixed.contains("new RoutedCommand(nameof(Open), typeof(Control))"));
    }

    #[test]
    fn test_attribute_argument() {
        let fixed = fix_each(
            r#"
using System;
using System.Globalization;
using System.Windows;
using System.Windows.Data;

[ValueConversion(typeof(int), typeof(Visibility))]
public class BoolToVisibilityConverter : IValueConverter
{
    public object Convert(object value, Type targetType, object parameter, CultureInfo culture)
    {
        return (bool)value ? Visibility.Visible : Visibility.Collapsed;
    }

    public object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture)
    {
        throw new NotSupportedException();
    }
}"#,
            "WPF0072",
        );
        assert!(fixed.contains("[ValueConversion(typeof(bool), typeof(Visibility))]"));
    }
}
