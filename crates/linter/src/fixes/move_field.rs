use wpf_syntax::{Member, MemberRef, SyntaxTree};
use wpf_types::{CodeFix, OffsetRange, TextEdit};

use super::FixProvider;
use crate::diagnostics::{keys, LintDiagnostic};

/// Moves a `DependencyPropertyKey` field in front of the property that reads it
pub struct MoveFieldFix;

impl FixProvider for MoveFieldFix {
    fn name(&self) -> &'static str {
        "move_field"
    }

    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &["WPF0031"]
    }

    fn propose(&self, diagnostic: &LintDiagnostic, tree: &SyntaxTree) -> Option<CodeFix> {
        let before = diagnostic.property(keys::MOVE_BEFORE)?;
        let range = diagnostic.range();
        let ty = tree.containing_type(range)?;
        let key = ty
            .non_type_members()
            .map(Member::as_member)
            .find(|member| member.range() == range)?;
        let target = ty.field_or_property(before)?.as_member();
        if !matches!(key, MemberRef::Field(_) | MemberRef::Property(_))
            || target.full_range().start > key.full_range().start
        {
            return None;
        }
        let (start, end) = (key.full_range().start, key.full_range().end);
        if !tree.starts_line(start) {
            return None;
        }

        // Whole lines of the declaration plus one blank line separating it
        let mut first_line = tree.line_start(start);
        let mut last_line = tree.line_range(end.saturating_sub(1)).end;
        let mut moved = tree.text_of(OffsetRange::new(first_line, last_line)).to_owned();
        if !moved.ends_with('\n') {
            moved.push('\n');
        }
        moved.push('\n');
        let is_blank = |line: OffsetRange| !line.is_empty() && tree.text_of(line).trim().is_empty();
        let next_line = tree.line_range(last_line);
        if is_blank(next_line) {
            last_line = next_line.end;
        } else if first_line > 0 {
            let previous_line = tree.line_range(first_line - 1);
            if is_blank(previous_line) {
                first_line = previous_line.start;
            }
        }

        let insert_at = tree.line_start(target.full_range().start);
        Some(CodeFix::new(
            format!("Move '{}' before '{before}'", key.name().text),
            vec![
                TextEdit::insert(insert_at, moved),
                TextEdit::delete(first_line, last_line),
            ],
        ))
    }
}
