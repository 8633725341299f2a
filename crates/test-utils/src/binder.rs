//! Binds fixture syntax trees to a [`Compilation`].
//!
//! Binding runs in passes over all trees, framework stubs first:
//!
//! 1. declare every type (merging partial declarations) with its type parameters
//! 2. bind base lists and declare fields, properties, methods and constructors
//! 3. evaluate `const` field initializers
//! 4. bind attributes, initializers and bodies, recording per-node symbols,
//!    types and constant values in a [`BindingTable`]
//!
//! Overload resolution is by argument count and assignability only; anything
//! this binder cannot resolve is simply left out of the table, which the
//! analyzers read as "unresolved".

use std::collections::HashMap;

use wpf_hir::{
    Accessibility, Compilation, Constant, FieldSymbol, LocalSymbol, MethodKind, MethodSymbol,
    ParameterSymbol, PropertySymbol, Symbol, SymbolId, SyntaxRef, TypeKind, TypeSymbol,
};
use wpf_syntax::{
    Argument, ArgumentNameKind, Attribute, BinaryOp, Block, ConstructorDecl, Expr, ExprKind,
    FieldDecl, Literal, Member, MethodDecl, Modifier, Modifiers, NameSegment, NodeId, Parameter,
    PredefinedType, PropertyDecl, Stmt, StmtKind, SyntaxTree, TypeDecl, TypeDeclKind, TypeSyntax,
    TypeSyntaxKind, UnaryOp,
};
use wpf_types::OffsetRange;

/// Index of the framework tree in the binder's tree list.
const FRAMEWORK: usize = 0;

const CONSTRUCTOR_NAME: &str = ".ctor";

/// Semantic facts recorded for the nodes of one tree.
#[derive(Debug, Default)]
pub(crate) struct BindingTable {
    pub(crate) declared: HashMap<NodeId, SymbolId>,
    pub(crate) symbols: HashMap<NodeId, SymbolId>,
    pub(crate) types: HashMap<NodeId, SymbolId>,
    pub(crate) constants: HashMap<NodeId, Constant>,
}

/// Binds `sources` on top of the `framework` stubs.
///
/// Returns one table per source tree, in order.
pub(crate) fn bind(framework: &SyntaxTree, sources: &[SyntaxTree]) -> (Compilation, Vec<BindingTable>) {
    let mut trees = vec![framework];
    trees.extend(sources);
    let mut binder = Binder {
        comp: Compilation::new(),
        tables: trees.iter().map(|_| BindingTable::default()).collect(),
        trees,
        decls: Vec::new(),
        field_constants: HashMap::new(),
        const_fields: Vec::new(),
        method_type_params: HashMap::new(),
    };
    binder.declare_types();
    binder.declare_members();
    binder.bind_constants();
    binder.bind_bodies();

    let Binder {
        comp, mut tables, ..
    } = binder;
    tables.remove(FRAMEWORK);
    tracing::trace!(symbols = comp.len(), trees = tables.len(), "bound fixture");
    (comp, tables)
}

#[derive(Debug, Clone, Copy)]
struct DeclInfo<'a> {
    tree: usize,
    decl: &'a TypeDecl,
    symbol: SymbolId,
}

/// What an expression denotes.
#[derive(Debug, Clone)]
enum Meaning {
    Value(Option<SymbolId>),
    Type(SymbolId),
    Namespace(String),
    Methods(Vec<SymbolId>),
    Nothing,
}

#[derive(Debug, Clone)]
struct Scope {
    tree: usize,
    /// `None` at assembly level
    ty: Option<SymbolId>,
    method_type_params: Vec<SymbolId>,
    locals: Vec<(String, SymbolId)>,
}

impl Scope {
    fn new(tree: usize, ty: SymbolId) -> Self {
        Self {
            tree,
            ty: Some(ty),
            method_type_params: Vec::new(),
            locals: Vec::new(),
        }
    }

    fn assembly(tree: usize) -> Self {
        Self {
            tree,
            ty: None,
            method_type_params: Vec::new(),
            locals: Vec::new(),
        }
    }
}

struct Binder<'a> {
    comp: Compilation,
    trees: Vec<&'a SyntaxTree>,
    tables: Vec<BindingTable>,
    decls: Vec<DeclInfo<'a>>,
    field_constants: HashMap<SymbolId, Constant>,
    const_fields: Vec<(DeclInfo<'a>, SymbolId, &'a Expr)>,
    method_type_params: HashMap<(usize, NodeId), Vec<SymbolId>>,
}

impl<'a> Binder<'a> {
    fn syntax_ref(&self, tree: usize, node: NodeId, range: OffsetRange) -> Option<SyntaxRef> {
        (tree != FRAMEWORK).then(|| SyntaxRef {
            file: self.trees[tree].file_id(),
            node,
            range,
        })
    }

    fn well_known(&self, metadata_name: &str) -> Option<SymbolId> {
        self.comp.type_by_metadata_name(metadata_name)
    }

    fn record_symbol(&mut self, tree: usize, node: NodeId, symbol: SymbolId) {
        self.tables[tree].symbols.insert(node, symbol);
    }

    fn constant(&self, tree: usize, node: NodeId) -> Option<&Constant> {
        self.tables[tree].constants.get(&node)
    }

    // Pass 1: types

    fn declare_types(&mut self) {
        for tree in 0..self.trees.len() {
            let syntax: &'a SyntaxTree = self.trees[tree];
            for decl in &syntax.root().types {
                self.declare_type(tree, decl, None);
            }
        }
    }

    fn declare_type(&mut self, tree: usize, decl: &'a TypeDecl, outer: Option<SymbolId>) {
        let symbol = match self.existing_partial(decl, outer) {
            Some(existing) => existing,
            None => self.create_type(decl, outer),
        };
        if let Some(reference) = self.syntax_ref(tree, decl.id, decl.range) {
            if let Some(ty) = self.comp.type_mut(symbol) {
                ty.declarations.push(reference);
            }
        }
        self.tables[tree].declared.insert(decl.id, symbol);
        self.decls.push(DeclInfo { tree, decl, symbol });
        for nested in decl.nested_types() {
            self.declare_type(tree, nested, Some(symbol));
        }
    }

    fn existing_partial(&self, decl: &TypeDecl, outer: Option<SymbolId>) -> Option<SymbolId> {
        if !decl.modifiers.has(Modifier::Partial) {
            return None;
        }
        let prefix = match outer {
            Some(outer) => Some(self.comp.metadata_name(outer)),
            None => decl.namespace.clone(),
        };
        let name = qualified(prefix.as_deref(), &decl.name.text, decl.type_params.len());
        self.comp.type_by_metadata_name(&name)
    }

    fn create_type(&mut self, decl: &TypeDecl, outer: Option<SymbolId>) -> SymbolId {
        let kind = match decl.kind {
            TypeDeclKind::Class => TypeKind::Class,
            TypeDeclKind::Struct => TypeKind::Struct,
            TypeDeclKind::Interface => TypeKind::Interface,
        };
        let mut ty = TypeSymbol::new(decl.name.text.clone(), kind);
        ty.namespace.clone_from(&decl.namespace);
        ty.accessibility = decl.modifiers.accessibility().unwrap_or(if outer.is_some() {
            Accessibility::Private
        } else {
            Accessibility::Internal
        });
        ty.is_static = decl.modifiers.has(Modifier::Static);
        ty.is_abstract =
            decl.modifiers.has(Modifier::Abstract) || decl.kind == TypeDeclKind::Interface;
        ty.containing_type = outer;
        let id = self.comp.add(Symbol::Type(ty));

        let object = self.well_known("System.Object");
        for (ordinal, param) in decl.type_params.iter().enumerate() {
            let mut parameter = TypeSymbol::new(param.text.clone(), TypeKind::TypeParameter);
            parameter.containing_type = Some(id);
            parameter.ordinal = Some(ordinal);
            parameter.base_type = object;
            let parameter = self.comp.add(Symbol::Type(parameter));
            if let Some(ty) = self.comp.type_mut(id) {
                ty.type_parameters.push(parameter);
            }
        }
        self.comp.register_type(id);
        id
    }

    // Pass 2: bases and members

    fn declare_members(&mut self) {
        for info in self.decls.clone() {
            self.bind_base_list(info);
            for member in info.decl.non_type_members() {
                match member {
                    Member::Field(field) => self.declare_field(info, field),
                    Member::Property(property) => self.declare_property(info, property),
                    Member::Method(method) => self.declare_method(info, method),
                    Member::Constructor(ctor) => self.declare_constructor(info, ctor),
                    Member::Type(_) => {}
                }
            }
        }
        for info in self.decls.clone() {
            self.add_implicit_members(info);
        }
    }

    fn bind_base_list(&mut self, info: DeclInfo<'a>) {
        let scope = Scope::new(info.tree, info.symbol);
        for base in &info.decl.base_list {
            let Some(resolved) = self.resolve_type(&scope, base) else {
                continue;
            };
            let is_interface = self
                .comp
                .get_type(resolved)
                .is_some_and(|t| t.kind == TypeKind::Interface);
            let Some(ty) = self.comp.type_mut(info.symbol) else {
                continue;
            };
            if is_interface || ty.kind == TypeKind::Interface {
                if !ty.interfaces.contains(&resolved) {
                    ty.interfaces.push(resolved);
                }
            } else if ty.base_type.is_none() {
                ty.base_type = Some(resolved);
            }
        }
    }

    fn add_implicit_members(&mut self, info: DeclInfo<'a>) {
        let Some(ty) = self.comp.get_type(info.symbol) else {
            return;
        };
        let kind = ty.kind;
        let is_static = ty.is_static;
        let has_base = ty.base_type.is_some();
        let has_constructor = ty
            .members
            .iter()
            .any(|&m| self.comp.symbol(m).name() == CONSTRUCTOR_NAME);
        let is_object = self.comp.metadata_name(info.symbol) == "System.Object";

        let default_base = match kind {
            TypeKind::Class if !has_base && !is_object => self.well_known("System.Object"),
            TypeKind::Struct if !has_base => self.well_known("System.ValueType"),
            _ => None,
        };
        if let (Some(base), Some(ty)) = (default_base, self.comp.type_mut(info.symbol)) {
            ty.base_type = Some(base);
        }

        if matches!(kind, TypeKind::Class | TypeKind::Struct) && !is_static && !has_constructor {
            let void = self.well_known("System.Void");
            self.add_member(
                info.symbol,
                Symbol::Method(MethodSymbol {
                    name: CONSTRUCTOR_NAME.to_owned(),
                    containing_type: info.symbol,
                    accessibility: Accessibility::Public,
                    is_static: false,
                    is_abstract: false,
                    kind: MethodKind::Constructor,
                    return_type: void,
                    parameters: Vec::new(),
                    declaration: None,
                }),
            );
        }
    }

    fn add_member(&mut self, owner: SymbolId, symbol: Symbol) -> SymbolId {
        let id = self.comp.add(symbol);
        if let Some(ty) = self.comp.type_mut(owner) {
            ty.members.push(id);
        }
        id
    }

    fn member_accessibility(&self, info: DeclInfo<'a>, modifiers: &Modifiers) -> Accessibility {
        modifiers.accessibility().unwrap_or(
            if info.decl.kind == TypeDeclKind::Interface {
                Accessibility::Public
            } else {
                Accessibility::Private
            },
        )
    }

    fn declare_field(&mut self, info: DeclInfo<'a>, field: &'a FieldDecl) {
        let scope = Scope::new(info.tree, info.symbol);
        let ty = self.resolve_type(&scope, &field.ty);
        let is_const = field.modifiers.has(Modifier::Const);
        let symbol = Symbol::Field(FieldSymbol {
            name: field.name.text.clone(),
            ty,
            containing_type: info.symbol,
            accessibility: self.member_accessibility(info, &field.modifiers),
            is_static: field.modifiers.is_static(),
            is_readonly: field.modifiers.is_readonly(),
            is_const,
            declaration: self.syntax_ref(info.tree, field.id, field.range),
        });
        let id = self.add_member(info.symbol, symbol);
        self.tables[info.tree].declared.insert(field.id, id);
        if let (true, Some(init)) = (is_const, &field.initializer) {
            self.const_fields.push((info, id, init));
        }
    }

    fn declare_property(&mut self, info: DeclInfo<'a>, property: &'a PropertyDecl) {
        let scope = Scope::new(info.tree, info.symbol);
        let ty = self.resolve_type(&scope, &property.ty);
        let symbol = Symbol::Property(PropertySymbol {
            name: property.name.text.clone(),
            ty,
            containing_type: info.symbol,
            accessibility: self.member_accessibility(info, &property.modifiers),
            is_static: property.modifiers.is_static(),
            has_getter: property.getter().is_some() || property.expression_body.is_some(),
            has_setter: property.setter().is_some(),
            declaration: self.syntax_ref(info.tree, property.id, property.range),
        });
        let id = self.add_member(info.symbol, symbol);
        self.tables[info.tree].declared.insert(property.id, id);
    }

    fn declare_method(&mut self, info: DeclInfo<'a>, method: &'a MethodDecl) {
        let mut scope = Scope::new(info.tree, info.symbol);
        for (ordinal, param) in method.type_params.iter().enumerate() {
            let mut parameter = TypeSymbol::new(param.text.clone(), TypeKind::TypeParameter);
            parameter.ordinal = Some(ordinal);
            parameter.base_type = self.well_known("System.Object");
            scope.method_type_params.push(self.comp.add(Symbol::Type(parameter)));
        }
        let return_type = self.resolve_type(&scope, &method.return_type);
        let parameters = self.declare_parameters(&scope, &method.params);
        let kind = match &method.explicit_interface {
            Some(interface) => {
                self.resolve_type(&scope, interface);
                MethodKind::ExplicitInterfaceImplementation
            }
            None => MethodKind::Ordinary,
        };
        let accessibility = if kind == MethodKind::ExplicitInterfaceImplementation {
            Accessibility::Private
        } else {
            self.member_accessibility(info, &method.modifiers)
        };
        let symbol = Symbol::Method(MethodSymbol {
            name: method.name.text.clone(),
            containing_type: info.symbol,
            accessibility,
            is_static: method.modifiers.is_static(),
            is_abstract: method.modifiers.has(Modifier::Abstract)
                || info.decl.kind == TypeDeclKind::Interface,
            kind,
            return_type,
            parameters,
            declaration: self.syntax_ref(info.tree, method.id, method.range),
        });
        let id = self.add_member(info.symbol, symbol);
        self.tables[info.tree].declared.insert(method.id, id);
        self.method_type_params
            .insert((info.tree, method.id), scope.method_type_params);
    }

    fn declare_constructor(&mut self, info: DeclInfo<'a>, ctor: &'a ConstructorDecl) {
        let scope = Scope::new(info.tree, info.symbol);
        let parameters = self.declare_parameters(&scope, &ctor.params);
        let symbol = Symbol::Method(MethodSymbol {
            name: CONSTRUCTOR_NAME.to_owned(),
            containing_type: info.symbol,
            accessibility: self.member_accessibility(info, &ctor.modifiers),
            is_static: ctor.modifiers.is_static(),
            is_abstract: false,
            kind: MethodKind::Constructor,
            return_type: self.well_known("System.Void"),
            parameters,
            declaration: self.syntax_ref(info.tree, ctor.id, ctor.range),
        });
        let id = self.add_member(info.symbol, symbol);
        self.tables[info.tree].declared.insert(ctor.id, id);
    }

    fn declare_parameters(&mut self, scope: &Scope, params: &'a [Parameter]) -> Vec<SymbolId> {
        let mut ids = Vec::with_capacity(params.len());
        for (ordinal, param) in params.iter().enumerate() {
            let ty = self.resolve_type(scope, &param.ty);
            let symbol = Symbol::Parameter(ParameterSymbol {
                name: param.name.text.clone(),
                ty,
                ordinal,
                has_default: param.default.is_some(),
                declaration: self.syntax_ref(scope.tree, param.id, param.range),
            });
            let id = self.comp.add(symbol);
            self.tables[scope.tree].declared.insert(param.id, id);
            ids.push(id);
        }
        ids
    }

    // Pass 3: constants

    fn bind_constants(&mut self) {
        for (info, field, init) in std::mem::take(&mut self.const_fields) {
            let mut scope = Scope::new(info.tree, info.symbol);
            self.bind_expr(&mut scope, init);
            if let Some(constant) = self.constant(info.tree, init.id).cloned() {
                self.field_constants.insert(field, constant);
            }
        }
    }

    // Pass 4: attributes and bodies

    fn bind_bodies(&mut self) {
        let trees = self.trees.clone();
        for (tree, syntax) in trees.into_iter().enumerate() {
            if tree == FRAMEWORK {
                continue;
            }
            let mut scope = Scope::assembly(tree);
            for attribute in &syntax.root().attributes {
                self.bind_attribute(&mut scope, attribute);
            }
        }
        for info in self.decls.clone() {
            if info.tree == FRAMEWORK {
                continue;
            }
            let mut scope = Scope::new(info.tree, info.symbol);
            for attribute in &info.decl.attributes {
                self.bind_attribute(&mut scope, attribute);
            }
            for member in info.decl.non_type_members() {
                for attribute in member.as_member().attributes() {
                    self.bind_attribute(&mut scope, attribute);
                }
                match member {
                    Member::Field(field) => {
                        if let (false, Some(init)) =
                            (field.modifiers.has(Modifier::Const), &field.initializer)
                        {
                            self.bind_expr(&mut scope, init);
                        }
                    }
                    Member::Property(property) => self.bind_property(info, property),
                    Member::Method(method) => {
                        let mut scope = self.body_scope(info, &method.params);
                        scope.method_type_params = self
                            .method_type_params
                            .get(&(info.tree, method.id))
                            .cloned()
                            .unwrap_or_default();
                        self.bind_parameters(&mut scope, &method.params);
                        self.bind_body(&mut scope, method.body.as_ref(), method.expression_body.as_ref());
                    }
                    Member::Constructor(ctor) => {
                        let mut scope = self.body_scope(info, &ctor.params);
                        self.bind_parameters(&mut scope, &ctor.params);
                        self.bind_body(&mut scope, ctor.body.as_ref(), ctor.expression_body.as_ref());
                    }
                    Member::Type(_) => {}
                }
            }
        }
    }

    fn body_scope(&self, info: DeclInfo<'a>, params: &[Parameter]) -> Scope {
        let mut scope = Scope::new(info.tree, info.symbol);
        for param in params {
            if let Some(&id) = self.tables[info.tree].declared.get(&param.id) {
                scope.locals.push((param.name.text.clone(), id));
            }
        }
        scope
    }

    fn bind_parameters(&mut self, scope: &mut Scope, params: &'a [Parameter]) {
        for param in params {
            for attribute in &param.attributes {
                self.bind_attribute(scope, attribute);
            }
            if let Some(default) = &param.default {
                self.bind_expr(scope, default);
            }
        }
    }

    fn bind_property(&mut self, info: DeclInfo<'a>, property: &'a PropertyDecl) {
        let property_type = self.tables[info.tree]
            .declared
            .get(&property.id)
            .and_then(|&id| self.comp.symbol(id).value_type());
        let mut scope = Scope::new(info.tree, info.symbol);
        if let Some(body) = &property.expression_body {
            self.bind_expr(&mut scope, body);
        }
        for accessor in &property.accessors {
            let mut scope = Scope::new(info.tree, info.symbol);
            if property.setter().is_some_and(|setter| setter.id == accessor.id) {
                let value = self.comp.add(Symbol::Parameter(ParameterSymbol {
                    name: "value".to_owned(),
                    ty: property_type,
                    ordinal: 0,
                    has_default: false,
                    declaration: None,
                }));
                scope.locals.push(("value".to_owned(), value));
            }
            self.bind_body(&mut scope, accessor.body.as_ref(), accessor.expression_body.as_ref());
        }
        if let Some(init) = &property.initializer {
            self.bind_expr(&mut scope, init);
        }
    }

    fn bind_body(&mut self, scope: &mut Scope, body: Option<&'a Block>, expression: Option<&'a Expr>) {
        if let Some(block) = body {
            self.bind_block(scope, block);
        }
        if let Some(expr) = expression {
            self.bind_expr(scope, expr);
        }
    }

    fn bind_attribute(&mut self, scope: &mut Scope, attribute: &'a Attribute) {
        let class = self.resolve_attribute_class(scope, &attribute.name);
        let args: &'a [Argument] = attribute.args.as_ref().map_or(&[], |list| list.args.as_slice());
        let mut ctor_args = Vec::new();
        for arg in args {
            let ty = self.value(scope, &arg.expr);
            match &arg.name {
                Some(name) if name.kind == ArgumentNameKind::Equals => {
                    if let Some(member) = class.and_then(|class| {
                        self.lookup_members(class, &name.ident.text).first().copied()
                    }) {
                        self.record_symbol(scope.tree, arg.id, member);
                    }
                }
                name => ctor_args.push((name.as_ref().map(|n| n.ident.text.as_str()), ty)),
            }
        }
        let Some(class) = class else {
            return;
        };
        self.tables[scope.tree].types.insert(attribute.id, class);
        let ctors: Vec<SymbolId> = self.comp.members_named(class, CONSTRUCTOR_NAME).collect();
        if let Some(ctor) = self.pick_overload(&ctors, &ctor_args) {
            self.record_symbol(scope.tree, attribute.id, ctor);
        }
    }

    /// `[Foo]` binds to `FooAttribute` when it exists, otherwise to `Foo`.
    fn resolve_attribute_class(&mut self, scope: &Scope, name: &TypeSyntax) -> Option<SymbolId> {
        if let TypeSyntaxKind::Named(segments) = &name.kind {
            if let Some(last) = segments.last() {
                if !last.name.text.ends_with("Attribute") {
                    let mut suffixed = name.clone();
                    if let TypeSyntaxKind::Named(segments) = &mut suffixed.kind {
                        if let Some(last) = segments.last_mut() {
                            last.name.text.push_str("Attribute");
                        }
                    }
                    if let Some(class) = self.resolve_type(scope, &suffixed) {
                        return Some(class);
                    }
                }
            }
        }
        self.resolve_type(scope, name)
    }

    // Statements

    fn bind_block(&mut self, scope: &mut Scope, block: &'a Block) {
        let mark = scope.locals.len();
        for stmt in &block.statements {
            self.bind_stmt(scope, stmt);
        }
        scope.locals.truncate(mark);
    }

    fn bind_stmt(&mut self, scope: &mut Scope, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                self.bind_expr(scope, expr);
            }
            StmtKind::Return(expr) | StmtKind::Throw(expr) => {
                if let Some(expr) = expr {
                    self.bind_expr(scope, expr);
                }
            }
            StmtKind::Local { ty, name, init } => {
                let init_type = init.as_ref().and_then(|init| self.value(scope, init));
                let ty = if ty.is_var() {
                    init_type
                } else {
                    self.resolve_type(scope, ty)
                };
                let local = self.comp.add(Symbol::Local(LocalSymbol {
                    name: name.text.clone(),
                    ty,
                    declaration: self.syntax_ref(scope.tree, stmt.id, stmt.range),
                }));
                self.tables[scope.tree].declared.insert(stmt.id, local);
                scope.locals.push((name.text.clone(), local));
            }
            StmtKind::If {
                condition,
                then,
                otherwise,
            } => {
                self.bind_expr(scope, condition);
                let mark = scope.locals.len();
                self.bind_stmt(scope, then);
                scope.locals.truncate(mark);
                if let Some(otherwise) = otherwise {
                    self.bind_stmt(scope, otherwise);
                    scope.locals.truncate(mark);
                }
            }
            StmtKind::Block(block) => self.bind_block(scope, block),
            StmtKind::Empty => {}
        }
    }

    // Expressions

    fn value(&mut self, scope: &mut Scope, expr: &'a Expr) -> Option<SymbolId> {
        match self.bind_expr(scope, expr) {
            Meaning::Value(ty) => ty,
            _ => None,
        }
    }

    fn bind_expr(&mut self, scope: &mut Scope, expr: &'a Expr) -> Meaning {
        let meaning = self.bind_expr_kind(scope, expr);
        match meaning {
            Meaning::Value(Some(ty)) => {
                self.tables[scope.tree].types.insert(expr.id, ty);
            }
            Meaning::Type(ty) => self.record_symbol(scope.tree, expr.id, ty),
            _ => {}
        }
        meaning
    }

    fn bind_expr_kind(&mut self, scope: &mut Scope, expr: &'a Expr) -> Meaning {
        let tree = scope.tree;
        match &expr.kind {
            ExprKind::Literal(literal) => self.bind_literal(tree, expr.id, literal),
            ExprKind::Identifier(name) => self.bind_identifier(scope, expr.id, &name.text),
            ExprKind::This => Meaning::Value(scope.ty),
            ExprKind::Base => Meaning::Value(
                scope
                    .ty
                    .and_then(|ty| self.comp.get_type(ty))
                    .and_then(|t| t.base_type),
            ),
            ExprKind::MemberAccess { target, name } => {
                match self.bind_expr(scope, target) {
                    Meaning::Namespace(namespace) => {
                        let full = format!("{namespace}.{}", name.text);
                        if let Some(ty) = self.comp.type_by_metadata_name(&full) {
                            Meaning::Type(ty)
                        } else if self.comp.has_namespace(&full) {
                            Meaning::Namespace(full)
                        } else {
                            Meaning::Nothing
                        }
                    }
                    Meaning::Type(ty) => {
                        let members = self.lookup_members(ty, &name.text);
                        if members.is_empty() {
                            self.nested_type(ty, &name.text, &[])
                                .map_or(Meaning::Nothing, Meaning::Type)
                        } else {
                            self.member_meaning(tree, expr.id, &members)
                        }
                    }
                    Meaning::Value(Some(ty)) => {
                        let members = self.lookup_members(ty, &name.text);
                        self.member_meaning(tree, expr.id, &members)
                    }
                    _ => Meaning::Nothing,
                }
            }
            ExprKind::Invocation { callee, args } => {
                if expr.is_nameof() {
                    if let Some(arg) = args.args.first() {
                        self.bind_expr(scope, &arg.expr);
                        if let Some(text) = arg.expr.name_text() {
                            self.tables[tree]
                                .constants
                                .insert(expr.id, Constant::String(text.to_owned()));
                        }
                    }
                    return Meaning::Value(self.well_known("System.String"));
                }
                let arg_types = self.bind_arguments(scope, &args.args);
                let Meaning::Methods(candidates) = self.bind_expr(scope, callee) else {
                    return Meaning::Value(None);
                };
                let Some(method) = self.pick_overload(&candidates, &arg_types) else {
                    return Meaning::Value(None);
                };
                self.record_symbol(tree, expr.id, method);
                self.record_symbol(tree, callee.id, method);
                Meaning::Value(
                    self.comp
                        .symbol(method)
                        .as_method()
                        .and_then(|m| m.return_type),
                )
            }
            ExprKind::ObjectCreation { ty, args } => {
                let created = self.resolve_type(scope, ty);
                let args: &'a [Argument] = args.as_ref().map_or(&[], |list| list.args.as_slice());
                let arg_types = self.bind_arguments(scope, args);
                if let Some(created) = created {
                    let ctors: Vec<SymbolId> =
                        self.comp.members_named(created, CONSTRUCTOR_NAME).collect();
                    if let Some(ctor) = self.pick_overload(&ctors, &arg_types) {
                        self.record_symbol(tree, expr.id, ctor);
                    }
                }
                Meaning::Value(created)
            }
            ExprKind::ArrayCreation { ty, size } => {
                if let Some(size) = size {
                    self.bind_expr(scope, size);
                }
                let element = self.resolve_type(scope, ty);
                Meaning::Value(element.map(|element| self.comp.array_of(element)))
            }
            ExprKind::TypeOf(ty) => {
                self.resolve_type(scope, ty);
                Meaning::Value(self.well_known("System.Type"))
            }
            ExprKind::Default(ty) => {
                Meaning::Value(ty.as_ref().and_then(|ty| self.resolve_type(scope, ty)))
            }
            ExprKind::Cast { ty, expr: inner } | ExprKind::As { expr: inner, ty } => {
                self.bind_expr(scope, inner);
                Meaning::Value(self.resolve_type(scope, ty))
            }
            ExprKind::Is {
                expr: inner,
                ty,
                designation,
            } => {
                self.bind_expr(scope, inner);
                let ty = self.resolve_type(scope, ty);
                if let Some(designation) = designation {
                    let local = self.comp.add(Symbol::Local(LocalSymbol {
                        name: designation.text.clone(),
                        ty,
                        declaration: None,
                    }));
                    scope.locals.push((designation.text.clone(), local));
                }
                Meaning::Value(self.well_known("System.Boolean"))
            }
            ExprKind::Binary { op, left, right } => self.bind_binary(scope, expr.id, *op, left, right),
            ExprKind::Unary { op, operand } => {
                let ty = self.value(scope, operand);
                match op {
                    UnaryOp::Not => Meaning::Value(self.well_known("System.Boolean")),
                    UnaryOp::Neg => {
                        if let Some(Constant::Integer(value)) = self.constant(tree, operand.id) {
                            let negated = Constant::Integer(-value);
                            self.tables[tree].constants.insert(expr.id, negated);
                        }
                        Meaning::Value(ty)
                    }
                }
            }
            ExprKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.bind_expr(scope, condition);
                let when_true = self.value(scope, when_true);
                let when_false = self.value(scope, when_false);
                Meaning::Value(self.unify(when_true, when_false))
            }
            ExprKind::Assignment { target, value } => {
                let ty = self.value(scope, target);
                self.bind_expr(scope, value);
                Meaning::Value(ty)
            }
            ExprKind::Parenthesized(inner) => {
                let meaning = self.bind_expr(scope, inner);
                if let Some(constant) = self.constant(tree, inner.id).cloned() {
                    self.tables[tree].constants.insert(expr.id, constant);
                }
                meaning
            }
            ExprKind::Missing => Meaning::Nothing,
        }
    }

    fn bind_literal(&mut self, tree: usize, node: NodeId, literal: &Literal) -> Meaning {
        let (ty, constant) = match literal {
            Literal::String(value) => ("System.String", Constant::String(value.clone())),
            Literal::Char(_) => return Meaning::Value(self.well_known("System.Char")),
            Literal::Integer(value) => ("System.Int32", Constant::Integer(*value)),
            Literal::Real(text) => {
                let ty = match text.chars().last() {
                    Some('f' | 'F') => "System.Single",
                    Some('m' | 'M') => "System.Decimal",
                    _ => "System.Double",
                };
                (ty, Constant::Real(text.clone()))
            }
            Literal::Bool(value) => ("System.Boolean", Constant::Bool(*value)),
            Literal::Null => {
                self.tables[tree].constants.insert(node, Constant::Null);
                return Meaning::Value(None);
            }
        };
        self.tables[tree].constants.insert(node, constant);
        Meaning::Value(self.well_known(ty))
    }

    fn bind_identifier(&mut self, scope: &Scope, node: NodeId, name: &str) -> Meaning {
        if let Some(&(_, local)) = scope.locals.iter().rev().find(|(n, _)| n == name) {
            self.record_symbol(scope.tree, node, local);
            return Meaning::Value(self.comp.symbol(local).value_type());
        }
        let owners: Vec<SymbolId> = scope
            .ty
            .into_iter()
            .flat_map(|ty| self.comp.self_and_containing_types(ty))
            .collect();
        for owner in owners {
            let members = self.lookup_members(owner, name);
            if !members.is_empty() {
                return self.member_meaning(scope.tree, node, &members);
            }
        }
        if let Some(ty) = self.resolve_simple_type(scope, name, &[]) {
            return Meaning::Type(ty);
        }
        if self.comp.has_namespace(name) {
            return Meaning::Namespace(name.to_owned());
        }
        Meaning::Nothing
    }

    fn bind_binary(
        &mut self,
        scope: &mut Scope,
        node: NodeId,
        op: BinaryOp,
        left: &'a Expr,
        right: &'a Expr,
    ) -> Meaning {
        let tree = scope.tree;
        let left_type = self.value(scope, left);
        let right_type = self.value(scope, right);
        match op {
            BinaryOp::Add => {
                let string = self.well_known("System.String");
                if string.is_some() && (left_type == string || right_type == string) {
                    let folded = match (self.constant(tree, left.id), self.constant(tree, right.id)) {
                        (Some(Constant::String(a)), Some(Constant::String(b))) => {
                            Some(Constant::String(format!("{a}{b}")))
                        }
                        _ => None,
                    };
                    if let Some(folded) = folded {
                        self.tables[tree].constants.insert(node, folded);
                    }
                    return Meaning::Value(string);
                }
                Meaning::Value(left_type.or(right_type))
            }
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                Meaning::Value(left_type.or(right_type))
            }
            BinaryOp::Coalesce => Meaning::Value(right_type.or(left_type)),
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::LtEq
            | BinaryOp::GtEq
            | BinaryOp::And
            | BinaryOp::Or => Meaning::Value(self.well_known("System.Boolean")),
        }
    }

    fn bind_arguments(
        &mut self,
        scope: &mut Scope,
        args: &'a [Argument],
    ) -> Vec<(Option<&'a str>, Option<SymbolId>)> {
        let mut bound = Vec::with_capacity(args.len());
        for arg in args {
            let ty = self.value(scope, &arg.expr);
            let name = arg
                .name
                .as_ref()
                .filter(|name| name.kind == ArgumentNameKind::Colon)
                .map(|name| name.ident.text.as_str());
            bound.push((name, ty));
        }
        bound
    }

    /// Type of `a ? b : c`.
    fn unify(&self, a: Option<SymbolId>, b: Option<SymbolId>) -> Option<SymbolId> {
        match (a, b) {
            (Some(a), Some(b)) if self.comp.is_assignable_to(b, a) => Some(a),
            (Some(a), Some(b)) if self.comp.is_assignable_to(a, b) => Some(b),
            (Some(_), Some(_)) => None,
            (a, b) => a.or(b),
        }
    }

    /// Members named `name` on `ty` and its bases, nearest first.
    fn lookup_members(&self, ty: SymbolId, name: &str) -> Vec<SymbolId> {
        self.comp
            .self_and_base_types(ty)
            .flat_map(|t| self.comp.members_named(t, name).collect::<Vec<_>>())
            .collect()
    }

    fn member_meaning(&mut self, tree: usize, node: NodeId, members: &[SymbolId]) -> Meaning {
        let Some(&first) = members.first() else {
            return Meaning::Nothing;
        };
        if matches!(self.comp.symbol(first), Symbol::Method(_)) {
            let methods = members
                .iter()
                .copied()
                .filter(|&m| matches!(self.comp.symbol(m), Symbol::Method(_)))
                .collect();
            return Meaning::Methods(methods);
        }
        let ty = self.comp.symbol(first).value_type();
        self.record_symbol(tree, node, first);
        if let Some(constant) = self.field_constants.get(&first).cloned() {
            self.tables[tree].constants.insert(node, constant);
        }
        Meaning::Value(ty)
    }

    /// Best applicable method for the given `(name, type)` arguments.
    ///
    /// Unknown argument types and type-parameter parameters accept anything;
    /// identity conversions beat other implicit conversions; ties go to the
    /// first declared candidate.
    fn pick_overload(
        &self,
        candidates: &[SymbolId],
        args: &[(Option<&str>, Option<SymbolId>)],
    ) -> Option<SymbolId> {
        let mut best: Option<(usize, SymbolId)> = None;
        'candidates: for &candidate in candidates {
            let Some(method) = self.comp.symbol(candidate).as_method() else {
                continue;
            };
            let params: Vec<&ParameterSymbol> = method
                .parameters
                .iter()
                .filter_map(|&p| self.comp.symbol(p).as_parameter())
                .collect();
            let required = params.iter().filter(|p| !p.has_default).count();
            if args.len() < required || args.len() > params.len() {
                continue;
            }
            let mut score = 0;
            for (index, (name, arg_type)) in args.iter().enumerate() {
                let param = match name {
                    Some(name) => params.iter().find(|p| p.name == *name),
                    None => params.get(index),
                };
                let Some(param) = param else {
                    continue 'candidates;
                };
                let (Some(arg_type), Some(param_type)) = (*arg_type, param.ty) else {
                    continue;
                };
                if self
                    .comp
                    .get_type(param_type)
                    .is_some_and(TypeSymbol::is_type_parameter)
                {
                    continue;
                }
                if self.comp.types_equal(arg_type, param_type) {
                    score += 2;
                } else if self.comp.is_assignable_to(arg_type, param_type) {
                    score += 1;
                } else {
                    continue 'candidates;
                }
            }
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, candidate));
            }
        }
        best.map(|(_, method)| method)
    }

    // Types

    fn resolve_type(&mut self, scope: &Scope, ty: &TypeSyntax) -> Option<SymbolId> {
        let resolved = match &ty.kind {
            TypeSyntaxKind::Predefined(predefined) => self.well_known(predefined.metadata_name()),
            TypeSyntaxKind::Named(segments) => self.resolve_named(scope, segments),
            TypeSyntaxKind::Array(element) => {
                let element = self.resolve_type(scope, element)?;
                Some(self.comp.array_of(element))
            }
            TypeSyntaxKind::Nullable(underlying) => {
                let underlying = self.resolve_type(scope, underlying)?;
                if self.comp.is_value_type(underlying) {
                    self.comp.nullable_of(underlying)
                } else {
                    Some(underlying)
                }
            }
            TypeSyntaxKind::Missing => None,
        };
        if let Some(resolved) = resolved {
            self.record_symbol(scope.tree, ty.id, resolved);
        }
        resolved
    }

    fn resolve_type_args(&mut self, scope: &Scope, args: &[TypeSyntax]) -> Option<Vec<SymbolId>> {
        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            resolved.push(self.resolve_type(scope, arg)?);
        }
        Some(resolved)
    }

    fn resolve_named(&mut self, scope: &Scope, segments: &[NameSegment]) -> Option<SymbolId> {
        let (first, rest) = segments.split_first()?;
        let args = self.resolve_type_args(scope, &first.type_args)?;
        if let Some(ty) = self.resolve_simple_type(scope, &first.name.text, &args) {
            return self.resolve_nested(scope, ty, rest);
        }
        let mut namespace = first.name.text.clone();
        for (index, segment) in rest.iter().enumerate() {
            let args = self.resolve_type_args(scope, &segment.type_args)?;
            if let Some(ty) = self.lookup_in_namespace(Some(&namespace), &segment.name.text, &args) {
                return self.resolve_nested(scope, ty, &rest[index + 1..]);
            }
            namespace.push('.');
            namespace.push_str(&segment.name.text);
        }
        None
    }

    fn resolve_nested(
        &mut self,
        scope: &Scope,
        mut ty: SymbolId,
        segments: &[NameSegment],
    ) -> Option<SymbolId> {
        for segment in segments {
            let args = self.resolve_type_args(scope, &segment.type_args)?;
            ty = self.nested_type(ty, &segment.name.text, &args)?;
        }
        Some(ty)
    }

    fn nested_type(&mut self, outer: SymbolId, name: &str, args: &[SymbolId]) -> Option<SymbolId> {
        let outer_name = self.comp.metadata_name(self.comp.definition(outer));
        let definition = self
            .comp
            .type_by_metadata_name(&qualified(Some(&outer_name), name, args.len()))?;
        Some(self.comp.construct(definition, args.to_vec()))
    }

    fn lookup_in_namespace(
        &mut self,
        namespace: Option<&str>,
        name: &str,
        args: &[SymbolId],
    ) -> Option<SymbolId> {
        let definition = self
            .comp
            .type_by_metadata_name(&qualified(namespace, name, args.len()))?;
        Some(self.comp.construct(definition, args.to_vec()))
    }

    /// Resolves a single type name the way C# looks it up from inside `scope`:
    /// type parameters, nested types of enclosing and base types, the enclosing
    /// namespaces, then `using` directives.
    fn resolve_simple_type(&mut self, scope: &Scope, name: &str, args: &[SymbolId]) -> Option<SymbolId> {
        if args.is_empty() {
            if let Some(predefined) = PredefinedType::from_keyword(name) {
                return self.well_known(predefined.metadata_name());
            }
            let method_param = scope
                .method_type_params
                .iter()
                .copied()
                .find(|&p| self.comp.symbol(p).name() == name);
            if method_param.is_some() {
                return method_param;
            }
        }

        let owners: Vec<SymbolId> = scope
            .ty
            .into_iter()
            .flat_map(|ty| self.comp.self_and_containing_types(ty))
            .collect();
        for owner in owners {
            if args.is_empty() {
                let type_param = self.comp.get_type(owner).and_then(|t| {
                    t.type_parameters
                        .iter()
                        .copied()
                        .find(|&p| self.comp.symbol(p).name() == name)
                });
                if type_param.is_some() {
                    return type_param;
                }
            }
            let bases: Vec<SymbolId> = self.comp.self_and_base_types(owner).collect();
            for base in bases {
                if let Some(nested) = self.nested_type(base, name, args) {
                    return Some(nested);
                }
            }
        }

        let mut namespace = scope
            .ty
            .and_then(|ty| self.comp.get_type(ty))
            .and_then(|t| t.namespace.clone());
        loop {
            if let Some(ty) = self.lookup_in_namespace(namespace.as_deref(), name, args) {
                return Some(ty);
            }
            let Some(current) = namespace else {
                break;
            };
            namespace = current.rfind('.').map(|dot| current[..dot].to_owned());
        }

        let tree: &'a SyntaxTree = self.trees[scope.tree];
        for using in &tree.root().usings {
            if let Some(ty) = self.lookup_in_namespace(Some(using), name, args) {
                return Some(ty);
            }
        }
        None
    }
}

/// `prefix.name` with a `` `N`` arity suffix for generic types.
fn qualified(prefix: Option<&str>, name: &str, arity: usize) -> String {
    let mut qualified = match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_owned(),
    };
    if arity > 0 {
        qualified.push('`');
        qualified.push_str(&arity.to_string());
    }
    qualified
}
