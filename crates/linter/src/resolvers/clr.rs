use wpf_hir::{KnownMember, SemanticModel, SymbolId};
use wpf_syntax::Expr;

/// A confirmed `GetValue`, `SetValue` or `SetCurrentValue` call.
#[derive(Debug, Clone, Copy)]
pub struct AccessorCall<'a> {
    pub call: &'a Expr,
    pub member: KnownMember,
    /// Backing member passed as the first argument, when it resolves
    pub backing: Option<SymbolId>,
}

/// Confirms that `call` invokes the framework's `DependencyObject` accessor.
#[must_use]
pub fn confirm_call<'a>(model: &dyn SemanticModel, call: &'a Expr) -> Option<AccessorCall<'a>> {
    let method = model.symbol_info(call.id)?;
    let member = model.compilation().known().member(method)?;
    if !matches!(
        member,
        KnownMember::GetValue | KnownMember::SetValue | KnownMember::SetCurrentValue
    ) {
        return None;
    }
    let backing_arg = call.argument_list()?.args.first()?.expr.unparenthesized();
    Some(AccessorCall {
        call,
        member,
        backing: model.symbol_info(backing_arg.id),
    })
}
