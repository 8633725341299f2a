//! Type relations: base-type walks, equality and assignability.

use std::collections::{HashSet, VecDeque};

use crate::compilation::Compilation;
use crate::known::KnownType;
use crate::symbols::{Symbol, SymbolId, TypeKind};

/// Lazy breadth-first walk over the base class chain and all implemented
/// interfaces of a type, excluding the type itself.
///
/// Each type is yielded at most once, so cyclic inheritance in broken code
/// terminates.
pub struct BaseTypes<'a> {
    compilation: &'a Compilation,
    queue: VecDeque<SymbolId>,
    visited: HashSet<SymbolId>,
}

impl<'a> BaseTypes<'a> {
    fn new(compilation: &'a Compilation, start: SymbolId) -> Self {
        let mut walk = Self {
            compilation,
            queue: VecDeque::new(),
            visited: HashSet::from([start]),
        };
        walk.enqueue_parents(start);
        walk
    }

    fn enqueue_parents(&mut self, ty: SymbolId) {
        let Some(symbol) = self.compilation.get_type(ty) else {
            return;
        };
        for parent in symbol.base_type.iter().chain(&symbol.interfaces) {
            if self.visited.insert(*parent) {
                self.queue.push_back(*parent);
            }
        }
    }
}

impl Iterator for BaseTypes<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        let next = self.queue.pop_front()?;
        self.enqueue_parents(next);
        Some(next)
    }
}

impl Compilation {
    /// Base classes and interfaces of `ty`, nearest first.
    #[must_use]
    pub fn base_types(&self, ty: SymbolId) -> BaseTypes<'_> {
        BaseTypes::new(self, ty)
    }

    /// `ty` followed by its base types.
    pub fn self_and_base_types(&self, ty: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::once(ty).chain(self.base_types(ty))
    }

    /// Structural type equality.
    ///
    /// Type parameters are equal when they have the same owner and position;
    /// constructed generics are equal when their definitions and arguments are.
    #[must_use]
    pub fn types_equal(&self, a: SymbolId, b: SymbolId) -> bool {
        if a == b {
            return true;
        }
        let (Some(left), Some(right)) = (self.get_type(a), self.get_type(b)) else {
            return false;
        };
        match (left.kind, right.kind) {
            (TypeKind::TypeParameter, TypeKind::TypeParameter) => {
                left.ordinal == right.ordinal
                    && left.name == right.name
                    && match (left.containing_type, right.containing_type) {
                        (Some(x), Some(y)) => self.definition(x) == self.definition(y),
                        (x, y) => x == y,
                    }
            }
            (TypeKind::Array, TypeKind::Array) => match (left.element_type, right.element_type) {
                (Some(x), Some(y)) => self.types_equal(x, y),
                _ => false,
            },
            (TypeKind::TypeParameter | TypeKind::Array, _)
            | (_, TypeKind::TypeParameter | TypeKind::Array) => false,
            _ => {
                if self.definition(a) != self.definition(b) {
                    return false;
                }
                let left_args = self.effective_type_arguments(a);
                let right_args = self.effective_type_arguments(b);
                left_args.len() == right_args.len()
                    && left_args
                        .iter()
                        .zip(right_args)
                        .all(|(&x, &y)| self.types_equal(x, y))
            }
        }
    }

    fn effective_type_arguments(&self, ty: SymbolId) -> &[SymbolId] {
        match self.get_type(ty) {
            Some(t) if t.type_arguments.is_empty() => &t.type_parameters,
            Some(t) => &t.type_arguments,
            None => &[],
        }
    }

    /// Returns `true` if a value of type `from` can be stored in a location of type `to`
    /// through an identity, reference, boxing or nullable conversion.
    #[must_use]
    pub fn is_assignable_to(&self, from: SymbolId, to: SymbolId) -> bool {
        if self.types_equal(from, to) {
            return true;
        }
        let known = self.known();
        if known.is(self, from, KnownType::Void) {
            return false;
        }
        if known.is(self, to, KnownType::Object) {
            return true;
        }
        if known.is(self, to, KnownType::Nullable) {
            if let Some([underlying]) = self.get_type(to).map(|t| t.type_arguments.as_slice()) {
                return self.types_equal(from, *underlying);
            }
        }
        self.base_types(from).any(|base| self.types_equal(base, to))
    }

    /// Returns `true` if `ty` is the known type `tag` or derives from / implements it.
    #[must_use]
    pub fn is_assignable_to_known(&self, ty: SymbolId, tag: KnownType) -> bool {
        self.known()
            .get(tag)
            .is_some_and(|target| self.is_assignable_to(ty, target))
    }

    /// Returns `true` for structs, enums and `Nullable<T>`.
    #[must_use]
    pub fn is_value_type(&self, ty: SymbolId) -> bool {
        self.get_type(ty).is_some_and(|t| t.is_value_type())
    }

    /// Returns `true` for classes, interfaces and arrays.
    #[must_use]
    pub fn is_reference_type(&self, ty: SymbolId) -> bool {
        self.get_type(ty).is_some_and(|t| t.is_reference_type())
    }

    /// First member named `name` on `ty` or any of its base types that satisfies `filter`.
    pub fn find_member(
        &self,
        ty: SymbolId,
        name: &str,
        filter: impl Fn(&Symbol) -> bool,
    ) -> Option<SymbolId> {
        self.self_and_base_types(ty)
            .flat_map(|t| self.members_named(t, name).collect::<Vec<_>>())
            .find(|&m| filter(self.symbol(m)))
    }

    /// Types enclosing `ty`, innermost first, starting with `ty`.
    pub fn self_and_containing_types(&self, ty: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        let mut visited = HashSet::new();
        std::iter::successors(Some(ty), move |&current| {
            visited.insert(current);
            self.get_type(current)
                .and_then(|t| t.containing_type)
                .filter(|outer| !visited.contains(outer))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::TypeSymbol;

    fn class(comp: &mut Compilation, name: &str, base: Option<SymbolId>) -> SymbolId {
        let mut ty = TypeSymbol::new(name, TypeKind::Class);
        ty.namespace = Some("System".to_owned());
        ty.base_type = base;
        let id = comp.add(Symbol::Type(ty));
        comp.register_type(id);
        id
    }

    #[test]
    fn test_base_types_terminate_on_cycles() {
        let mut comp = Compilation::new();
        let a = class(&mut comp, "A", None);
        let b = class(&mut comp, "B", Some(a));
        comp.type_mut(a).unwrap().base_type = Some(b);

        let bases: Vec<_> = comp.base_types(b).collect();
        assert_eq!(bases, vec![a]);
    }

    #[test]
    fn test_assignability_through_base_and_interfaces() {
        let mut comp = Compilation::new();
        let object = class(&mut comp, "Object", None);
        let mut iface = TypeSymbol::new("ICollection", TypeKind::Interface);
        iface.namespace = Some("System.Collections".to_owned());
        let collection = comp.add(Symbol::Type(iface));
        let base = class(&mut comp, "Base", Some(object));
        let derived = class(&mut comp, "Derived", Some(base));
        comp.type_mut(base).unwrap().interfaces.push(collection);

        assert!(comp.is_assignable_to(derived, base));
        assert!(comp.is_assignable_to(derived, collection));
        assert!(comp.is_assignable_to(derived, object));
        assert!(!comp.is_assignable_to(base, derived));
    }

    #[test]
    fn test_type_parameters_compare_structurally() {
        let mut comp = Compilation::new();
        let owner = class(&mut comp, "Owner", None);
        let mut t1 = TypeSymbol::new("T", TypeKind::TypeParameter);
        t1.containing_type = Some(owner);
        t1.ordinal = Some(0);
        let mut t2 = t1.clone();
        let first = comp.add(Symbol::Type(t1));
        let second = comp.add(Symbol::Type(t2.clone()));
        assert!(comp.types_equal(first, second));

        t2.ordinal = Some(1);
        let third = comp.add(Symbol::Type(t2));
        assert!(!comp.types_equal(first, third));
        assert!(!comp.types_equal(first, owner));
    }
}
