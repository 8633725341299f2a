use wpf_syntax::{MemberRef, SyntaxTree};
use wpf_types::CodeFix;

use super::{member_named_at, FixProvider};
use crate::diagnostics::{keys, LintDiagnostic};

/// Adds a missing attribute on its own line above a declaration
pub struct AddAttributeFix;

impl FixProvider for AddAttributeFix {
    fn name(&self) -> &'static str {
        "add_attribute"
    }

    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &["WPF0033", "WPF0071"]
    }

    fn propose(&self, diagnostic: &LintDiagnostic, tree: &SyntaxTree) -> Option<CodeFix> {
        let text = diagnostic.property(keys::ATTRIBUTE_TEXT)?;
        let range = diagnostic.range();
        let declaration = match member_named_at(tree, range) {
            Some(member) => member.as_member(),
            None => tree
                .types()
                .into_iter()
                .find(|ty| ty.name.range == range)
                .map(MemberRef::Type)?,
        };
        let name = attribute_name(text)?;
        if declaration
            .attributes()
            .iter()
            .any(|attribute| attribute.short_name() == Some(name))
        {
            return None;
        }
        let start = declaration.range().start;
        if !tree.starts_line(start) {
            return None;
        }
        let indent = tree.indentation_at(start);
        Some(CodeFix::insert(
            format!("Add {text}"),
            tree.line_start(start),
            format!("{indent}{text}\n"),
        ))
    }
}

/// `ValueConversion` for `[ValueConversion(typeof(A), typeof(B))]`.
fn attribute_name(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('[')?;
    let end = inner.find(['(', ']'])?;
    let name = inner[..end].trim();
    let name = name.rsplit('.').next().unwrap_or(name);
    Some(name.strip_suffix("Attribute").unwrap_or(name))
}

#[cfg(test)]
mod tests {
    use wpf_test_utils::Fixture;
    use wpf_types::CancellationToken;

    use super::*;
    use crate::Analyzer;

    fn fix(source: &str, rule_id: &str) -> String {
        let fixture = Fixture::new(source);
        let tree = fixture.tree(0);
        let diagnostics = Analyzer::default()
            .analyze_tree(&fixture.model(0), &CancellationToken::new())
            .unwrap();
        let diagnostic = diagnostics.iter().find(|d| d.rule_id == rule_id).unwrap();
        let fixed = AddAttributeFix
            .propose(diagnostic, tree)
            .unwrap()
            .apply(tree.text())
            .unwrap();

        let refixed = Fixture::new(&fixed);
        let diagnostics = Analyzer::default()
            .analyze_tree(&refixed.model(0), &CancellationToken::new())
            .unwrap();
        assert!(diagnostics.iter().all(|d| d.rule_id != rule_id), "{diagnostics:?}");
        fixed
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(
            attribute_name("[AttachedPropertyBrowsableForType(typeof(Button))]"),
            Some("AttachedPropertyBrowsableForType")
        );
        assert_eq!(
            attribute_name("[System.Windows.Data.ValueConversionAttribute(typeof(int), typeof(string))]"),
            Some("ValueConversion")
        );
        assert_eq!(attribute_name("ValueConversion"), None);
    }

    #[test]
    fn test_browsable_attribute_on_getter() {
        let fixed = fix(
            r#"
using System.Windows;
using System.Windows.Controls;

public static class Foo
{
    /// <summary>Identifies the Bar attached property.</summary>
    public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo), new PropertyMetadata(default(int)));

    /// <summary>Helper for getting <see cref="BarProperty"/> from <paramref name="element"/>.</summary>
    /// <param name="element"><see cref="Button"/> to read <see cref="BarProperty"/> from.</param>
    /// <returns>Bar property value.</returns>
    public static int GetBar(Button element)
    {
        return (int)element.GetValue(BarProperty);
    }
}"#,
            "WPF0033",
        );
        assert!(fixed.contains(
            "    /// <returns>Bar property value.</returns>\n    [AttachedPropertyBrowsableForType(typeof(Button))]\n    public static int GetBar(Button element)\n"
        ));
    }

    #[test]
    fn test_value_conversion_on_converter() {
        let fixed = fix(
            r"
using System;
using System.Globalization;
using System.Windows;
using System.Windows.Data;

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
}",
            "WPF0071",
        );
        assert!(fixed.contains(
            "\n[ValueConversion(typeof(bool), typeof(Visibility))]\npublic class BoolToVisibilityConverter : IValueConverter\n"
        ));
    }
}
