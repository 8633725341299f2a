use wpf_syntax::{MemberRef, SyntaxTree, TypeSyntax};
use wpf_types::{CodeFix, OffsetRange};

use super::FixProvider;
use crate::diagnostics::{keys, LintDiagnostic};

/// Replaces a declared type with the registered one
pub struct ChangeTypeFix;

impl FixProvider for ChangeTypeFix {
    fn name(&self) -> &'static str {
        "change_type"
    }

    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &["WPF0012", "WPF0013"]
    }

    fn propose(&self, diagnostic: &LintDiagnostic, tree: &SyntaxTree) -> Option<CodeFix> {
        let expected = diagnostic.property(keys::TYPE_SYNTAX)?;
        let syntax = declared_type_at(tree, diagnostic.range())?;
        if tree.text_of(syntax.range) == expected {
            return None;
        }
        Some(CodeFix::replace(
            format!("Change type to: {expected}"),
            syntax.range,
            expected,
        ))
    }
}

/// Property type, return type or parameter type spanning exactly `range`.
fn declared_type_at(tree: &SyntaxTree, range: OffsetRange) -> Option<&TypeSyntax> {
    match tree.containing_member(range)? {
        MemberRef::Property(property) => Some(&property.ty),
        MemberRef::Method(method) => std::iter::once(&method.return_type)
            .chain(method.params.iter().map(|param| &param.ty))
            .find(|ty| ty.range == range),
        _ => None,
    }
    .filter(|ty| ty.range == range)
}
