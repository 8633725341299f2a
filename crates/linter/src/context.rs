use wpf_hir::{Compilation, SemanticModel, SymbolId};
use wpf_syntax::{MemberRef, NodeVisit, SyntaxNode, SyntaxTree, TypeDecl};
use wpf_types::{CancellationToken, Cancelled};

/// Everything an analyzer may look at for one node.
#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
    pub node: SyntaxNode<'a>,
    /// `None` for assembly attributes
    pub containing_type: Option<&'a TypeDecl>,
    pub containing_member: Option<MemberRef<'a>>,
    /// Symbol declared by the node, or else by its innermost enclosing declaration
    pub containing_symbol: Option<SymbolId>,
    pub model: &'a dyn SemanticModel,
    pub token: &'a CancellationToken,
}

impl<'a> NodeContext<'a> {
    #[must_use]
    pub fn new(
        visit: NodeVisit<'a>,
        model: &'a dyn SemanticModel,
        token: &'a CancellationToken,
    ) -> Self {
        let containing_symbol = visit
            .node
            .as_member()
            .or(visit.containing_member)
            .or(visit.containing_type.map(MemberRef::Type))
            .and_then(|member| model.declared_symbol(member.id()));
        Self {
            node: visit.node,
            containing_type: visit.containing_type,
            containing_member: visit.containing_member,
            containing_symbol,
            model,
            token,
        }
    }

    #[must_use]
    pub fn compilation(&self) -> &'a Compilation {
        self.model.compilation()
    }

    #[must_use]
    pub fn tree(&self) -> &'a SyntaxTree {
        self.model.tree()
    }

    /// Symbol of the innermost enclosing type declaration.
    #[must_use]
    pub fn containing_type_symbol(&self) -> Option<SymbolId> {
        self.model.declared_symbol(self.containing_type?.id)
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        self.token.check()
    }
}

impl std::fmt::Debug for NodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeContext")
            .field("node", &self.node.kind())
            .field("range", &self.node.range())
            .field("containing_symbol", &self.containing_symbol)
            .finish_non_exhaustive()
    }
}
