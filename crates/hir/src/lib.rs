//! # Semantic layer
//!
//! Symbols, the [`SemanticModel`] contract hosts implement, the well-known
//! framework symbol table and type relations.
//!
//! The analyzers only read this layer. A host (a compiler integration, or the
//! fixture binder in `wpf-test-utils`) fills a [`Compilation`] and answers
//! [`SemanticModel`] queries for each syntax tree.

mod compilation;
mod known;
mod model;
mod relations;
mod symbols;

pub use compilation::Compilation;
pub use known::{KnownMember, KnownSymbols, KnownType};
pub use model::{Constant, Declaration, SemanticModel};
pub use relations::BaseTypes;
pub use symbols::{
    FieldSymbol, LocalSymbol, MethodKind, MethodSymbol, ParameterSymbol, PropertySymbol, Symbol,
    SymbolId, SymbolKind, SyntaxRef, TypeKind, TypeSymbol,
};
pub use wpf_syntax::Accessibility;
