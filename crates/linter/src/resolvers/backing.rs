use wpf_hir::{Compilation, KnownMember, KnownType, SemanticModel, Symbol, SymbolId};
use wpf_syntax::{ExprKind, Member, MemberRef, SyntaxNode};

use super::{registration_of, type_declarations_in};
use crate::matchers::{match_node, static_property_value, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackingKind {
    DependencyProperty,
    DependencyPropertyKey,
}

impl BackingKind {
    /// Suffix the member name should carry after the registered name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::DependencyProperty => "Property",
            Self::DependencyPropertyKey => "PropertyKey",
        }
    }
}

/// A field or property of type `DependencyProperty` or `DependencyPropertyKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingMember {
    pub symbol: SymbolId,
    pub name: String,
    pub kind: BackingKind,
    pub containing_type: SymbolId,
    pub is_field: bool,
    pub is_static: bool,
}

/// Backing member view of `symbol`, static or not.
#[must_use]
pub fn backing_candidate(compilation: &Compilation, symbol: SymbolId) -> Option<BackingMember> {
    let (ty, containing_type, is_field, is_static) = match compilation.symbol(symbol) {
        Symbol::Field(field) => (field.ty?, field.containing_type, true, field.is_static),
        Symbol::Property(property) => (
            property.ty?,
            property.containing_type,
            false,
            property.is_static,
        ),
        _ => return None,
    };
    let kind = match compilation.known().classify(compilation, ty)? {
        KnownType::DependencyProperty => BackingKind::DependencyProperty,
        KnownType::DependencyPropertyKey => BackingKind::DependencyPropertyKey,
        _ => return None,
    };
    Some(BackingMember {
        symbol,
        name: compilation.symbol(symbol).name().to_owned(),
        kind,
        containing_type,
        is_field,
        is_static,
    })
}

/// Static backing member view of `symbol`.
#[must_use]
pub fn backing_member(compilation: &Compilation, symbol: SymbolId) -> Option<BackingMember> {
    backing_candidate(compilation, symbol).filter(|member| member.is_static)
}

/// Name the backing member's property is registered with.
///
/// Comes from the registration when one is visible. Without a registration,
/// or when the registered name is unresolved but not computed at runtime, the
/// name of the CLR property in the same type that accesses this member is used.
#[must_use]
pub fn registered_name(model: &dyn SemanticModel, backing: &BackingMember) -> Option<String> {
    match registration_of(model, backing.symbol) {
        Some(registration) if registration.registered_name.is_some() => {
            registration.registered_name
        }
        Some(registration) if registration.dynamic_name => None,
        _ => clr_property_name(model, backing),
    }
}

/// Name of the instance property whose accessors call `GetValue`/`SetValue` with `backing`.
fn clr_property_name(model: &dyn SemanticModel, backing: &BackingMember) -> Option<String> {
    let compilation = model.compilation();
    type_declarations_in(compilation, model.tree(), backing.containing_type)
        .into_iter()
        .flat_map(|ty| ty.non_type_members())
        .find_map(|member| {
            let Member::Property(property) = member else {
                return None;
            };
            let Some(Shape::ClrPropertyAccessor {
                get_call, set_call, ..
            }) = match_node(SyntaxNode::Property(property))
            else {
                return None;
            };
            let uses_backing = [get_call, set_call].into_iter().flatten().any(|call| {
                call.argument_list()
                    .and_then(|args| args.args.first())
                    .and_then(|arg| model.symbol_info(arg.expr.unparenthesized().id))
                    == Some(backing.symbol)
            });
            uses_backing.then(|| property.name.text.clone())
        })
}

/// The `DependencyProperty` member initialized from `key.DependencyProperty`
/// in the key's containing type, as declared in the model's tree.
#[must_use]
pub fn dependency_property_for_key<'a>(
    model: &'a dyn SemanticModel,
    key: &BackingMember,
) -> Option<MemberRef<'a>> {
    let compilation = model.compilation();
    type_declarations_in(compilation, model.tree(), key.containing_type)
        .into_iter()
        .flat_map(|ty| ty.non_type_members())
        .map(Member::as_member)
        .find(|&member| {
            let initializer = match member {
                MemberRef::Field(field) => field.initializer.as_ref(),
                MemberRef::Property(property) => static_property_value(property),
                _ => None,
            };
            initializer.is_some_and(|init| {
                let init = init.unparenthesized();
                let ExprKind::MemberAccess { target, .. } = &init.kind else {
                    return false;
                };
                model
                    .symbol_info(init.id)
                    .and_then(|accessed| compilation.known().member(accessed))
                    == Some(KnownMember::KeyDependencyProperty)
                    && model.symbol_info(target.unparenthesized().id) == Some(key.symbol)
            })
        })
}
