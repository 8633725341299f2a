//! The symbol table of one compilation.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::known::KnownSymbols;
use crate::symbols::{Symbol, SymbolId, TypeKind, TypeSymbol};

/// Map from constructed-type key (definition + arguments) to the interned type.
type ConstructedMap = HashMap<(SymbolId, Vec<SymbolId>), SymbolId>;

/// Arena of all symbols visible to the analyzers.
///
/// Hosts populate it while binding and then share it read-only. Constructed
/// generic, array and nullable types are interned, so a given shape always
/// maps to the same [`SymbolId`].
#[derive(Debug, Default)]
pub struct Compilation {
    symbols: Vec<Symbol>,
    types_by_name: HashMap<String, SymbolId>,
    /// Every namespace that declares a registered type, and its parents
    namespaces: HashSet<String>,
    constructed: ConstructedMap,
    arrays: HashMap<SymbolId, SymbolId>,
    known: OnceLock<KnownSymbols>,
}

impl Compilation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a symbol and returns its id.
    pub fn add(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(self.symbols.len() as u32);
        self.symbols.push(symbol);
        self.known = OnceLock::new();
        id
    }

    /// Makes a named type findable through [`Compilation::type_by_metadata_name`].
    ///
    /// Call after the type's parameters are attached; the first registration of a
    /// name wins.
    pub fn register_type(&mut self, id: SymbolId) {
        let name = self.metadata_name(id);
        self.types_by_name.entry(name).or_insert(id);
        if let Some(namespace) = self.get_type(id).and_then(|ty| ty.namespace.clone()) {
            let mut prefix = namespace.as_str();
            loop {
                self.namespaces.insert(prefix.to_owned());
                match prefix.rfind('.') {
                    Some(dot) => prefix = &prefix[..dot],
                    None => break,
                }
            }
        }
        self.known = OnceLock::new();
    }

    /// `true` when `namespace` (e.g. `System.Windows`) contains a registered type,
    /// directly or through a nested namespace.
    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        self.known = OnceLock::new();
        &mut self.symbols[id.index()]
    }

    #[must_use]
    pub fn get_type(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.symbol(id).as_type()
    }

    pub fn type_mut(&mut self, id: SymbolId) -> Option<&mut TypeSymbol> {
        match self.symbol_mut(id) {
            Symbol::Type(ty) => Some(ty),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> {
        (0..self.symbols.len() as u32).map(SymbolId::new)
    }

    /// Looks up a type by metadata name, e.g. ``System.Nullable`1``.
    #[must_use]
    pub fn type_by_metadata_name(&self, name: &str) -> Option<SymbolId> {
        self.types_by_name.get(name).copied()
    }

    /// `Namespace.Outer.Name` with a `` `N`` arity suffix for generic definitions.
    #[must_use]
    pub fn metadata_name(&self, id: SymbolId) -> String {
        let Some(ty) = self.get_type(id) else {
            return self.symbol(id).name().to_owned();
        };
        let mut name = match (ty.containing_type, &ty.namespace) {
            (Some(outer), _) if ty.kind != TypeKind::TypeParameter => {
                format!("{}.{}", self.metadata_name(outer), ty.name)
            }
            (_, Some(ns)) => format!("{ns}.{}", ty.name),
            _ => ty.name.clone(),
        };
        if !ty.type_parameters.is_empty() {
            name.push('`');
            name.push_str(&ty.type_parameters.len().to_string());
        }
        name
    }

    /// Returns the generic definition of a constructed type, or the type itself.
    #[must_use]
    pub fn definition(&self, id: SymbolId) -> SymbolId {
        self.get_type(id)
            .and_then(|ty| ty.original_definition)
            .unwrap_or(id)
    }

    /// Constructs `definition<arguments>`.
    ///
    /// Passing the definition's own type parameters yields the definition.
    pub fn construct(&mut self, definition: SymbolId, arguments: Vec<SymbolId>) -> SymbolId {
        let definition = self.definition(definition);
        let Some(def) = self.get_type(definition) else {
            return definition;
        };
        if arguments.is_empty() || def.type_parameters == arguments {
            return definition;
        }
        let key = (definition, arguments);
        if let Some(&id) = self.constructed.get(&key) {
            return id;
        }
        let mut constructed = def.clone();
        constructed.type_arguments.clone_from(&key.1);
        constructed.original_definition = Some(definition);
        let id = self.add(Symbol::Type(constructed));
        self.constructed.insert(key, id);
        id
    }

    /// Interned `element[]`.
    pub fn array_of(&mut self, element: SymbolId) -> SymbolId {
        if let Some(&id) = self.arrays.get(&element) {
            return id;
        }
        let mut array = TypeSymbol::new(format!("{}[]", self.symbol(element).name()), TypeKind::Array);
        array.accessibility = wpf_syntax::Accessibility::Public;
        array.element_type = Some(element);
        array.base_type = self.type_by_metadata_name("System.Array");
        let id = self.add(Symbol::Type(array));
        self.arrays.insert(element, id);
        id
    }

    /// Interned `Nullable<underlying>`, `None` when `System.Nullable`1` is unknown.
    pub fn nullable_of(&mut self, underlying: SymbolId) -> Option<SymbolId> {
        let nullable = self.type_by_metadata_name("System.Nullable`1")?;
        Some(self.construct(nullable, vec![underlying]))
    }

    /// Members of `ty` itself (not inherited) with the given name.
    pub fn members_named<'a>(
        &'a self,
        ty: SymbolId,
        name: &'a str,
    ) -> impl Iterator<Item = SymbolId> + 'a {
        let definition = self.definition(ty);
        self.get_type(definition)
            .map(|t| t.members.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(move |&m| self.symbol(m).name() == name)
    }

    /// Well-known framework symbols, resolved on first use after the last mutation.
    #[must_use]
    pub fn known(&self) -> &KnownSymbols {
        self.known.get_or_init(|| KnownSymbols::resolve(self))
    }

    /// Type name as a user would write it at the use site (`int`, `T`,
    /// `ObservableCollection<int>`, `double?`, `string[]`).
    #[must_use]
    pub fn display(&self, id: SymbolId) -> String {
        let Some(ty) = self.get_type(id) else {
            return self.symbol(id).name().to_owned();
        };
        match ty.kind {
            TypeKind::TypeParameter => return ty.name.clone(),
            TypeKind::Array => {
                return ty.element_type.map_or_else(
                    || ty.name.clone(),
                    |element| format!("{}[]", self.display(element)),
                );
            }
            _ => {}
        }
        let definition = self.definition(id);
        let metadata = self.metadata_name(definition);
        if let Some(keyword) = keyword_alias(&metadata) {
            return keyword.to_owned();
        }
        if metadata == "System.Nullable`1" {
            if let [underlying] = ty.type_arguments.as_slice() {
                return format!("{}?", self.display(*underlying));
            }
        }
        let arguments = if ty.type_arguments.is_empty() {
            &ty.type_parameters
        } else {
            &ty.type_arguments
        };
        if arguments.is_empty() {
            ty.name.clone()
        } else {
            let arguments: Vec<String> = arguments.iter().map(|&a| self.display(a)).collect();
            format!("{}<{}>", ty.name, arguments.join(", "))
        }
    }
}

fn keyword_alias(metadata_name: &str) -> Option<&'static str> {
    Some(match metadata_name {
        "System.Object" => "object",
        "System.String" => "string",
        "System.Boolean" => "bool",
        "System.Char" => "char",
        "System.Byte" => "byte",
        "System.Int16" => "short",
        "System.Int32" => "int",
        "System.Int64" => "long",
        "System.Single" => "float",
        "System.Double" => "double",
        "System.Decimal" => "decimal",
        "System.Void" => "void",
        _ => return None,
    })
}
