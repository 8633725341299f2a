//! The semantic model contract between host and analyzers.

use wpf_syntax::{MemberRef, NodeId, SyntaxTree};

use crate::compilation::Compilation;
use crate::symbols::SymbolId;

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    String(String),
    Integer(i64),
    Real(String),
    Bool(bool),
    Null,
}

impl Constant {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A declaration found through [`SemanticModel::declaration`].
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'a> {
    pub tree: &'a SyntaxTree,
    pub member: MemberRef<'a>,
}

/// Read-only semantic oracle for one syntax tree.
///
/// Every query may return `None`, meaning "unresolved"; analyzers treat that as
/// "skip", never as a violation. Node ids refer to [`SemanticModel::tree`].
pub trait SemanticModel: Send + Sync {
    fn compilation(&self) -> &Compilation;

    /// The tree node ids passed to this model belong to.
    fn tree(&self) -> &SyntaxTree;

    /// Symbol declared by a declaration, parameter or local statement node.
    fn declared_symbol(&self, node: NodeId) -> Option<SymbolId>;

    /// Symbol referenced by an expression, type syntax or attribute.
    ///
    /// Invocations and object creations resolve to the invoked method or
    /// constructor, attributes to the attribute constructor.
    fn symbol_info(&self, node: NodeId) -> Option<SymbolId>;

    /// Type of an expression, or the attribute class of an attribute.
    fn type_info(&self, node: NodeId) -> Option<SymbolId>;

    fn constant_value(&self, node: NodeId) -> Option<Constant>;

    /// Source declaration of a symbol, possibly in another tree of the compilation.
    fn declaration(&self, symbol: SymbolId) -> Option<Declaration<'_>>;
}
