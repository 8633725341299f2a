use wpf_syntax::SyntaxTree;
use wpf_types::CodeFix;

use super::FixProvider;
use crate::diagnostics::{keys, LintDiagnostic};

/// Fills an empty `()` argument list
pub struct AddArgumentListFix;

impl FixProvider for AddArgumentListFix {
    fn name(&self) -> &'static str {
        "add_argument_list"
    }

    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &["WPF0140"]
    }

    fn propose(&self, diagnostic: &LintDiagnostic, tree: &SyntaxTree) -> Option<CodeFix> {
        let arguments = diagnostic.property(keys::ARGUMENT_LIST)?;
        let range = diagnostic.range();
        if tree.text_of(range) != "()" {
            return None;
        }
        Some(CodeFix::replace(
            format!("Use ({arguments})"),
            range,
            format!("({arguments})"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use wpf_test_utils::Fixture;
    use wpf_types::CancellationToken;

    use crate::fixes::propose_fix;
    use crate::Analyzer;

    #[test]
    fn test_empty_component_resource_key() {
        let fixture = Fixture::new(
            r"
using System.Windows;

public static class ResourceKeys
{
    public static readonly ComponentResourceKey FooKey = new ComponentResourceKey();
}",
        );
        let tree = fixture.tree(0);
        let analyzer = Analyzer::default();
        let diagnostics = analyzer
            .analyze_tree(&fixture.model(0), &CancellationToken::new())
            .unwrap();
        let [diagnostic] = diagnostics.as_slice() else {
            panic!("expected one diagnostic, got {diagnostics:?}");
        };
        assert_eq!(diagnostic.rule_id, "WPF0140");

        let fixed = propose_fix(diagnostic, tree).unwrap().apply(tree.text()).unwrap();
        assert!(fixed.contains(
            "new ComponentResourceKey(typeof(ResourceKeys), nameof(FooKey));"
        ));

        let fixed = Fixture::new(&fixed);
        let remaining = analyzer
            .analyze_tree(&fixed.model(0), &CancellationToken::new())
            .unwrap();
        assert!(remaining.is_empty(), "{remaining:?}");
    }
}
