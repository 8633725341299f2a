//! Symbol definitions.
//!
//! Symbols live in a [`Compilation`](crate::Compilation) arena and are
//! referred to by [`SymbolId`]. Two ids are the same symbol iff they are equal.

use wpf_syntax::{Accessibility, NodeId};
use wpf_types::{FileId, OffsetRange};

/// Handle to a symbol of one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a symbol is declared in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxRef {
    pub file: FileId,
    pub node: NodeId,
    pub range: OffsetRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    TypeParameter,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: String,
    pub namespace: Option<String>,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub is_abstract: bool,
    /// Enclosing type of nested types, owner of type parameters.
    pub containing_type: Option<SymbolId>,
    pub base_type: Option<SymbolId>,
    pub interfaces: Vec<SymbolId>,
    pub members: Vec<SymbolId>,
    pub type_parameters: Vec<SymbolId>,
    /// Arguments of a constructed generic type, empty for definitions.
    pub type_arguments: Vec<SymbolId>,
    /// Generic definition a constructed type was made from.
    pub original_definition: Option<SymbolId>,
    /// Position in the owner's type parameter list.
    pub ordinal: Option<usize>,
    pub element_type: Option<SymbolId>,
    pub declarations: Vec<SyntaxRef>,
}

impl TypeSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            kind,
            accessibility: Accessibility::Internal,
            is_static: false,
            is_abstract: false,
            containing_type: None,
            base_type: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            type_parameters: Vec::new(),
            type_arguments: Vec::new(),
            original_definition: None,
            ordinal: None,
            element_type: None,
            declarations: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct | TypeKind::Enum)
    }

    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Class | TypeKind::Interface | TypeKind::Array
        )
    }

    #[must_use]
    pub fn is_type_parameter(&self) -> bool {
        self.kind == TypeKind::TypeParameter
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSymbol {
    pub name: String,
    pub ty: Option<SymbolId>,
    pub containing_type: SymbolId,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_const: bool,
    pub declaration: Option<SyntaxRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySymbol {
    pub name: String,
    pub ty: Option<SymbolId>,
    pub containing_type: SymbolId,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub has_getter: bool,
    pub has_setter: bool,
    pub declaration: Option<SyntaxRef>,
}

impl PropertySymbol {
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.has_getter && !self.has_setter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    ExplicitInterfaceImplementation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    pub name: String,
    pub containing_type: SymbolId,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub kind: MethodKind,
    /// `System.Void` for void methods, `None` when unresolved.
    pub return_type: Option<SymbolId>,
    pub parameters: Vec<SymbolId>,
    pub declaration: Option<SyntaxRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: String,
    pub ty: Option<SymbolId>,
    pub ordinal: usize,
    pub has_default: bool,
    pub declaration: Option<SyntaxRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSymbol {
    pub name: String,
    pub ty: Option<SymbolId>,
    pub declaration: Option<SyntaxRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Type,
    Field,
    Property,
    Method,
    Parameter,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Type(TypeSymbol),
    Field(FieldSymbol),
    Property(PropertySymbol),
    Method(MethodSymbol),
    Parameter(ParameterSymbol),
    Local(LocalSymbol),
}

impl Symbol {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Type(s) => &s.name,
            Self::Field(s) => &s.name,
            Self::Property(s) => &s.name,
            Self::Method(s) => &s.name,
            Self::Parameter(s) => &s.name,
            Self::Local(s) => &s.name,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Type(_) => SymbolKind::Type,
            Self::Field(_) => SymbolKind::Field,
            Self::Property(_) => SymbolKind::Property,
            Self::Method(_) => SymbolKind::Method,
            Self::Parameter(_) => SymbolKind::Parameter,
            Self::Local(_) => SymbolKind::Local,
        }
    }

    /// Declared accessibility; parameters and locals report `Private`.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        match self {
            Self::Type(s) => s.accessibility,
            Self::Field(s) => s.accessibility,
            Self::Property(s) => s.accessibility,
            Self::Method(s) => s.accessibility,
            Self::Parameter(_) | Self::Local(_) => Accessibility::Private,
        }
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        match self {
            Self::Type(s) => s.is_static,
            Self::Field(s) => s.is_static,
            Self::Property(s) => s.is_static,
            Self::Method(s) => s.is_static,
            Self::Parameter(_) | Self::Local(_) => false,
        }
    }

    #[must_use]
    pub fn containing_type(&self) -> Option<SymbolId> {
        match self {
            Self::Type(s) => s.containing_type,
            Self::Field(s) => Some(s.containing_type),
            Self::Property(s) => Some(s.containing_type),
            Self::Method(s) => Some(s.containing_type),
            Self::Parameter(_) | Self::Local(_) => None,
        }
    }

    /// Type of a field, property, parameter or local.
    #[must_use]
    pub fn value_type(&self) -> Option<SymbolId> {
        match self {
            Self::Field(s) => s.ty,
            Self::Property(s) => s.ty,
            Self::Parameter(s) => s.ty,
            Self::Local(s) => s.ty,
            Self::Type(_) | Self::Method(_) => None,
        }
    }

    /// First source declaration, if the symbol comes from source.
    #[must_use]
    pub fn declaration(&self) -> Option<SyntaxRef> {
        match self {
            Self::Type(s) => s.declarations.first().copied(),
            Self::Field(s) => s.declaration,
            Self::Property(s) => s.declaration,
            Self::Method(s) => s.declaration,
            Self::Parameter(s) => s.declaration,
            Self::Local(s) => s.declaration,
        }
    }

    #[must_use]
    pub fn as_type(&self) -> Option<&TypeSymbol> {
        match self {
            Self::Type(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_field(&self) -> Option<&FieldSymbol> {
        match self {
            Self::Field(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_property(&self) -> Option<&PropertySymbol> {
        match self {
            Self::Property(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_method(&self) -> Option<&MethodSymbol> {
        match self {
            Self::Method(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_parameter(&self) -> Option<&ParameterSymbol> {
        match self {
            Self::Parameter(s) => Some(s),
            _ => None,
        }
    }
}
