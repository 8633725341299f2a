//! Parsed and bound fixture projects.

use wpf_hir::{Compilation, Constant, Declaration, SemanticModel, SymbolId};
use wpf_syntax::{NodeId, SyntaxTree};
use wpf_types::FileId;

use crate::binder::{self, BindingTable};
use crate::framework::FRAMEWORK_SOURCE;
use crate::markers::strip_markers;
use crate::parser::parse;
use crate::ParseError;

/// File id of the framework stubs; source files count up from zero.
const FRAMEWORK_FILE: u32 = u32::MAX;

/// One compilation built from fixture sources plus the framework stubs.
///
/// Each source may carry `↓` markers; they are stripped before parsing and
/// available through [`Fixture::markers`].
#[derive(Debug)]
pub struct Fixture {
    compilation: Compilation,
    trees: Vec<SyntaxTree>,
    tables: Vec<BindingTable>,
    markers: Vec<Vec<usize>>,
}

impl Fixture {
    /// A single-file fixture.
    ///
    /// # Panics
    ///
    /// Panics if the source does not parse.
    pub fn new(code: &str) -> Self {
        Self::with_files(&[code])
    }

    /// A fixture with one tree per source, in order.
    ///
    /// # Panics
    ///
    /// Panics if any source does not parse.
    pub fn with_files(files: &[&str]) -> Self {
        Self::try_with_files(files).unwrap_or_else(|err| panic!("fixture does not parse: {err}"))
    }

    /// Fallible variant of [`Fixture::with_files`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] among the sources.
    pub fn try_with_files(files: &[&str]) -> Result<Self, ParseError> {
        let framework = parse(FileId::new(FRAMEWORK_FILE), FRAMEWORK_SOURCE)?;
        let mut trees = Vec::with_capacity(files.len());
        let mut markers = Vec::with_capacity(files.len());
        for (index, code) in files.iter().enumerate() {
            let (text, offsets) = strip_markers(code);
            trees.push(parse(FileId::new(index as u32), &text)?);
            markers.push(offsets);
        }
        let (compilation, tables) = binder::bind(&framework, &trees);
        Ok(Self {
            compilation,
            trees,
            tables,
            markers,
        })
    }

    pub fn compilation(&self) -> &Compilation {
        &self.compilation
    }

    pub fn tree(&self, index: usize) -> &SyntaxTree {
        &self.trees[index]
    }

    pub fn trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    /// Marker offsets of source `index`, in source order.
    pub fn markers(&self, index: usize) -> &[usize] {
        &self.markers[index]
    }

    /// Semantic model of source `index`.
    pub fn model(&self, index: usize) -> FixtureModel<'_> {
        assert!(index < self.trees.len(), "no fixture file {index}");
        FixtureModel {
            fixture: self,
            index,
        }
    }

    /// Semantic models of all sources, in order.
    pub fn models(&self) -> Vec<FixtureModel<'_>> {
        (0..self.trees.len()).map(|index| self.model(index)).collect()
    }

    /// The type declared with the given metadata name.
    pub fn type_named(&self, metadata_name: &str) -> SymbolId {
        self.compilation
            .type_by_metadata_name(metadata_name)
            .unwrap_or_else(|| panic!("no type {metadata_name}"))
    }

    /// The first member named `name` declared on `ty` itself.
    pub fn member_named(&self, ty: SymbolId, name: &str) -> SymbolId {
        self.compilation
            .members_named(ty, name)
            .next()
            .unwrap_or_else(|| panic!("no member {name}"))
    }
}

/// [`SemanticModel`] over one fixture source.
#[derive(Debug, Clone, Copy)]
pub struct FixtureModel<'a> {
    fixture: &'a Fixture,
    index: usize,
}

impl FixtureModel<'_> {
    fn table(&self) -> &BindingTable {
        &self.fixture.tables[self.index]
    }
}

impl SemanticModel for FixtureModel<'_> {
    fn compilation(&self) -> &Compilation {
        &self.fixture.compilation
    }

    fn tree(&self) -> &SyntaxTree {
        &self.fixture.trees[self.index]
    }

    fn declared_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.table().declared.get(&node).copied()
    }

    fn symbol_info(&self, node: NodeId) -> Option<SymbolId> {
        self.table().symbols.get(&node).copied()
    }

    fn type_info(&self, node: NodeId) -> Option<SymbolId> {
        self.table().types.get(&node).copied()
    }

    fn constant_value(&self, node: NodeId) -> Option<Constant> {
        self.table().constants.get(&node).cloned()
    }

    fn declaration(&self, symbol: SymbolId) -> Option<Declaration<'_>> {
        let reference = self.fixture.compilation.symbol(symbol).declaration()?;
        let tree = self.fixture.trees.get(reference.file.as_u32() as usize)?;
        let member = tree.find_declaration(reference.node)?;
        Some(Declaration { tree, member })
    }
}
