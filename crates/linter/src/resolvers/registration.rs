use std::collections::HashSet;

use wpf_hir::{KnownMember, SemanticModel, SymbolId};
use wpf_syntax::{Argument, Expr, ExprKind, MemberRef};

use super::{argument_for, constant_string, typeof_type};
use crate::matchers::{match_registration, static_property_value, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
    Register,
    RegisterReadOnly,
    RegisterAttached,
    RegisterAttachedReadOnly,
    AddOwner,
}

impl RegistrationKind {
    #[must_use]
    pub const fn from_member(member: KnownMember) -> Option<Self> {
        match member {
            KnownMember::Register => Some(Self::Register),
            KnownMember::RegisterReadOnly => Some(Self::RegisterReadOnly),
            KnownMember::RegisterAttached => Some(Self::RegisterAttached),
            KnownMember::RegisterAttachedReadOnly => Some(Self::RegisterAttachedReadOnly),
            KnownMember::AddOwner => Some(Self::AddOwner),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_attached(self) -> bool {
        matches!(self, Self::RegisterAttached | Self::RegisterAttachedReadOnly)
    }
}

/// What a registration call says about a dependency property.
///
/// For `AddOwner` the name and type come from the property the owner is
/// added to; the owner and metadata come from the `AddOwner` call itself.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub kind: RegistrationKind,
    /// The registration call found in source
    pub invocation: &'a Expr,
    /// Name from a compile-time constant
    pub registered_name: Option<String>,
    /// `true` when the name argument exists but is not a constant
    pub dynamic_name: bool,
    pub registered_type: Option<SymbolId>,
    pub owner_type: Option<SymbolId>,
    pub owner_arg: Option<&'a Argument>,
    /// `defaultValue` argument of a `new PropertyMetadata(...)` metadata argument
    pub default_value: Option<&'a Expr>,
}

/// Registration performed by `expr` itself.
#[must_use]
pub fn registration_at<'a>(model: &'a dyn SemanticModel, expr: &'a Expr) -> Option<Registration<'a>> {
    registration_in(model, expr, &mut HashSet::new())
}

/// Registration that initializes the backing member `symbol`.
///
/// Follows `XPropertyKey.DependencyProperty` one level and `AddOwner`
/// chains until they cycle. Only declarations in the model's own tree are
/// considered.
#[must_use]
pub fn registration_of(model: &dyn SemanticModel, symbol: SymbolId) -> Option<Registration<'_>> {
    registration_of_inner(model, symbol, &mut HashSet::new(), true)
}

fn registration_of_inner<'a>(
    model: &'a dyn SemanticModel,
    symbol: SymbolId,
    visited: &mut HashSet<SymbolId>,
    follow_key: bool,
) -> Option<Registration<'a>> {
    if !visited.insert(symbol) {
        tracing::trace!(?symbol, "registration cycle");
        return None;
    }
    let initializer = initializer_of(model, symbol)?;
    if let Some(registration) = registration_in(model, initializer, visited) {
        return Some(registration);
    }
    if !follow_key {
        return None;
    }
    let ExprKind::MemberAccess { target, .. } = &initializer.kind else {
        return None;
    };
    let accessed = model.symbol_info(initializer.id)?;
    if model.compilation().known().member(accessed) != Some(KnownMember::KeyDependencyProperty) {
        return None;
    }
    let key = model.symbol_info(target.unparenthesized().id)?;
    registration_of_inner(model, key, visited, false)
}

/// Unparenthesized initializer of a field or static property declared in the model's tree.
fn initializer_of(model: &dyn SemanticModel, symbol: SymbolId) -> Option<&Expr> {
    let declaration = model.declaration(symbol)?;
    if declaration.tree.file_id() != model.tree().file_id() {
        return None;
    }
    let initializer = match declaration.member {
        MemberRef::Field(field) => field.initializer.as_ref()?,
        MemberRef::Property(property) => static_property_value(property)?,
        _ => return None,
    };
    Some(initializer.unparenthesized())
}

fn registration_in<'a>(
    model: &'a dyn SemanticModel,
    expr: &'a Expr,
    visited: &mut HashSet<SymbolId>,
) -> Option<Registration<'a>> {
    let Some(Shape::PropertyRegistration {
        invocation, args, ..
    }) = match_registration(expr)
    else {
        return None;
    };
    let compilation = model.compilation();
    let method = model.symbol_info(invocation.id)?;
    let kind = RegistrationKind::from_member(compilation.known().member(method)?)?;
    let arg = |name: &str| argument_for(compilation, method, args, name);
    let metadata_arg = arg("typeMetadata").or_else(|| arg("defaultMetadata"));
    let default_value = metadata_arg.and_then(|metadata| default_value_of(model, &metadata.expr));
    let owner_arg = arg("ownerType");
    let owner_type = owner_arg.and_then(|owner| typeof_type(model, &owner.expr));

    if kind == RegistrationKind::AddOwner {
        let ExprKind::Invocation { callee, .. } = &invocation.kind else {
            return None;
        };
        let ExprKind::MemberAccess { target, .. } = &callee.kind else {
            return None;
        };
        let source = model.symbol_info(target.unparenthesized().id)?;
        let source = registration_of_inner(model, source, visited, true)?;
        return Some(Registration {
            kind,
            invocation,
            registered_name: source.registered_name,
            dynamic_name: source.dynamic_name,
            registered_type: source.registered_type,
            owner_type,
            owner_arg,
            default_value,
        });
    }

    let name_arg = arg("name");
    let registered_name = name_arg.and_then(|name| constant_string(model, &name.expr));
    let type_arg = arg("propertyType");
    Some(Registration {
        kind,
        invocation,
        dynamic_name: name_arg.is_some() && registered_name.is_none(),
        registered_name,
        registered_type: type_arg.and_then(|ty| typeof_type(model, &ty.expr)),
        owner_type,
        owner_arg,
        default_value,
    })
}

/// `defaultValue` argument of `new XxxMetadata(defaultValue, ...)`.
fn default_value_of<'a>(model: &dyn SemanticModel, metadata: &'a Expr) -> Option<&'a Expr> {
    let creation = metadata.unparenthesized();
    let ExprKind::ObjectCreation {
        args: Some(args), ..
    } = &creation.kind
    else {
        return None;
    };
    let ctor = model.symbol_info(creation.id)?;
    argument_for(model.compilation(), ctor, args, "defaultValue").map(|arg| &arg.expr)
}
