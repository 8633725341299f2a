//! # C# Declaration Syntax
//!
//! The immutable syntax model the analyzers read. Hosts build a [`SyntaxTree`]
//! per source file (the analyzers never parse text themselves) and hand it to
//! the linter together with a semantic model.
//!
//! ## Structure
//!
//! - [`ast`]: typed declarations, statements and expressions with byte spans
//! - [`walk`]: per-call walkers that enumerate analyzable nodes and visit
//!   expressions
//!
//! All spans are byte offsets into [`SyntaxTree::text`].

pub mod ast;
pub mod walk;

use std::sync::Arc;

pub use ast::*;
pub use walk::{
    for_each_expr, for_each_expr_in_block, for_each_expr_in_member, for_each_expr_in_stmt,
    stmt_contains, visit_nodes, NodeKind, NodeVisit, SyntaxNode,
};
use wpf_types::{FileId, Location, OffsetRange};

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    file_id: FileId,
    text: Arc<str>,
    root: CompilationUnit,
}

impl SyntaxTree {
    #[must_use]
    pub fn new(file_id: FileId, text: impl Into<Arc<str>>, root: CompilationUnit) -> Self {
        Self {
            file_id,
            text: text.into(),
            root,
        }
    }

    #[must_use]
    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn root(&self) -> &CompilationUnit {
        &self.root
    }

    #[must_use]
    pub fn location(&self, range: OffsetRange) -> Location {
        Location::new(self.file_id, range)
    }

    /// Source text covered by `range`, empty when the range is out of bounds.
    #[must_use]
    pub fn text_of(&self, range: OffsetRange) -> &str {
        self.text.get(range.start..range.end).unwrap_or_default()
    }

    /// All type declarations, outer types before the types nested in them.
    #[must_use]
    pub fn types(&self) -> Vec<&TypeDecl> {
        let mut result = Vec::new();
        let mut stack: Vec<&TypeDecl> = self.root.types.iter().rev().collect();
        while let Some(ty) = stack.pop() {
            result.push(ty);
            stack.extend(ty.nested_types().collect::<Vec<_>>().into_iter().rev());
        }
        result
    }

    /// Declaration with the given id.
    #[must_use]
    pub fn find_declaration(&self, id: NodeId) -> Option<MemberRef<'_>> {
        self.types().into_iter().find_map(|ty| {
            if ty.id == id {
                return Some(MemberRef::Type(ty));
            }
            ty.non_type_members()
                .find(|m| m.id() == id)
                .map(Member::as_member)
        })
    }

    /// Innermost type declaration whose span contains `range`.
    #[must_use]
    pub fn containing_type(&self, range: OffsetRange) -> Option<&TypeDecl> {
        self.types()
            .into_iter()
            .filter(|ty| ty.range.contains_range(range))
            .min_by_key(|ty| ty.range.len())
    }

    /// Innermost non-type member whose span contains `range`.
    #[must_use]
    pub fn containing_member(&self, range: OffsetRange) -> Option<MemberRef<'_>> {
        self.containing_type(range)?
            .non_type_members()
            .find(|m| m.as_member().range().contains_range(range))
            .map(Member::as_member)
    }

    /// Range of the full line containing `offset`, including its line break.
    #[must_use]
    pub fn line_range(&self, offset: usize) -> OffsetRange {
        let start = self.line_start(offset);
        let end = self
            .text
            .get(offset..)
            .and_then(|rest| rest.find('\n'))
            .map_or(self.text.len(), |i| offset + i + 1);
        OffsetRange::new(start, end)
    }

    /// Offset of the first character of the line containing `offset`.
    #[must_use]
    pub fn line_start(&self, offset: usize) -> usize {
        self.text
            .get(..offset)
            .and_then(|before| before.rfind('\n'))
            .map_or(0, |i| i + 1)
    }

    /// Leading whitespace of the line containing `offset`.
    #[must_use]
    pub fn indentation_at(&self, offset: usize) -> &str {
        let start = self.line_start(offset);
        let line = self.text.get(start..).unwrap_or_default();
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    /// Returns `true` if only whitespace precedes `offset` on its line.
    #[must_use]
    pub fn starts_line(&self, offset: usize) -> bool {
        let start = self.line_start(offset);
        self.text
            .get(start..offset)
            .is_some_and(|prefix| prefix.trim().is_empty())
    }
}
