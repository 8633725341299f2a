//! Typed declaration tree.
//!
//! Every node that analyzers may ask the semantic model about carries a
//! [`NodeId`]. Ids are unique within one [`SyntaxTree`](crate::SyntaxTree).
//! Missing children are represented explicitly (`Option::None`,
//! [`ExprKind::Missing`], [`TypeSyntaxKind::Missing`]) so partially written
//! code still produces a tree.

use wpf_types::OffsetRange;

/// Identity of a node inside one syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// An identifier token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub range: OffsetRange,
}

impl Ident {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Accessibility {
    Private,
    PrivateProtected,
    Protected,
    Internal,
    ProtectedInternal,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Readonly,
    Const,
    Abstract,
    Virtual,
    Override,
    Sealed,
    Partial,
    New,
    Extern,
}

impl Modifier {
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "public" => Self::Public,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "internal" => Self::Internal,
            "static" => Self::Static,
            "readonly" => Self::Readonly,
            "const" => Self::Const,
            "abstract" => Self::Abstract,
            "virtual" => Self::Virtual,
            "override" => Self::Override,
            "sealed" => Self::Sealed,
            "partial" => Self::Partial,
            "new" => Self::New,
            "extern" => Self::Extern,
            _ => return None,
        })
    }
}

/// The modifier keywords of a declaration, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Modifiers(Vec<Modifier>);

impl Modifiers {
    #[must_use]
    pub fn new(modifiers: Vec<Modifier>) -> Self {
        Self(modifiers)
    }

    #[must_use]
    pub fn has(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.has(Modifier::Static) || self.has(Modifier::Const)
    }

    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.has(Modifier::Readonly)
    }

    /// Accessibility written in source, `None` when no keyword is present.
    #[must_use]
    pub fn accessibility(&self) -> Option<Accessibility> {
        let public = self.has(Modifier::Public);
        let private = self.has(Modifier::Private);
        let protected = self.has(Modifier::Protected);
        let internal = self.has(Modifier::Internal);
        match (public, private, protected, internal) {
            (true, ..) => Some(Accessibility::Public),
            (false, true, true, _) => Some(Accessibility::PrivateProtected),
            (false, true, false, _) => Some(Accessibility::Private),
            (false, false, true, true) => Some(Accessibility::ProtectedInternal),
            (false, false, true, false) => Some(Accessibility::Protected),
            (false, false, false, true) => Some(Accessibility::Internal),
            (false, false, false, false) => None,
        }
    }
}

/// Keyword types that alias framework types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedType {
    Object,
    String,
    Bool,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Void,
}

impl PredefinedType {
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "object" => Self::Object,
            "string" => Self::String,
            "bool" => Self::Bool,
            "char" => Self::Char,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "decimal" => Self::Decimal,
            "void" => Self::Void,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Void => "void",
        }
    }

    /// Fully qualified metadata name of the aliased type.
    #[must_use]
    pub const fn metadata_name(self) -> &'static str {
        match self {
            Self::Object => "System.Object",
            Self::String => "System.String",
            Self::Bool => "System.Boolean",
            Self::Char => "System.Char",
            Self::Byte => "System.Byte",
            Self::Short => "System.Int16",
            Self::Int => "System.Int32",
            Self::Long => "System.Int64",
            Self::Float => "System.Single",
            Self::Double => "System.Double",
            Self::Decimal => "System.Decimal",
            Self::Void => "System.Void",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSyntax {
    pub id: NodeId,
    pub range: OffsetRange,
    pub kind: TypeSyntaxKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntaxKind {
    Predefined(PredefinedType),
    /// `A.B<C>.D`, one segment per dot.
    Named(Vec<NameSegment>),
    Array(Box<TypeSyntax>),
    Nullable(Box<TypeSyntax>),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSegment {
    pub name: Ident,
    pub type_args: Vec<TypeSyntax>,
}

impl TypeSyntax {
    /// Last identifier of a named type (`Foo` for `A.B.Foo<T>`).
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        match &self.kind {
            TypeSyntaxKind::Named(segments) => segments.last().map(|s| s.name.as_str()),
            TypeSyntaxKind::Predefined(p) => Some(p.keyword()),
            _ => None,
        }
    }

    /// Dotted name without type arguments (`A.B.Foo` for `A.B.Foo<T>`).
    #[must_use]
    pub fn dotted_name(&self) -> Option<String> {
        match &self.kind {
            TypeSyntaxKind::Named(segments) => Some(
                segments
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_var(&self) -> bool {
        matches!(&self.kind, TypeSyntaxKind::Named(segments)
            if segments.len() == 1 && segments[0].name.text == "var" && segments[0].type_args.is_empty())
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeSyntaxKind::Predefined(PredefinedType::Void))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String(String),
    Char(char),
    Integer(i64),
    /// Real literals keep their source text.
    Real(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub id: NodeId,
    pub range: OffsetRange,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(Ident),
    This,
    Base,
    MemberAccess {
        target: Box<Expr>,
        name: Ident,
    },
    Invocation {
        callee: Box<Expr>,
        args: ArgumentList,
    },
    /// `new T(args)`; `args` is `None` for `new T { }` without parentheses.
    ObjectCreation {
        ty: TypeSyntax,
        args: Option<ArgumentList>,
    },
    ArrayCreation {
        ty: TypeSyntax,
        size: Option<Box<Expr>>,
    },
    TypeOf(TypeSyntax),
    Default(Option<TypeSyntax>),
    Cast {
        ty: TypeSyntax,
        expr: Box<Expr>,
    },
    As {
        expr: Box<Expr>,
        ty: TypeSyntax,
    },
    Is {
        expr: Box<Expr>,
        ty: TypeSyntax,
        designation: Option<Ident>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Parenthesized(Box<Expr>),
    Missing,
}

impl Expr {
    /// Strips any number of enclosing parentheses.
    #[must_use]
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Parenthesized(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    /// Name of the invoked method for `Foo(...)`, `x.Foo(...)` and `this.Foo(...)`.
    #[must_use]
    pub fn invoked_method_name(&self) -> Option<&Ident> {
        let ExprKind::Invocation { callee, .. } = &self.kind else {
            return None;
        };
        match &callee.kind {
            ExprKind::Identifier(name) | ExprKind::MemberAccess { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Arguments of an invocation or object creation.
    #[must_use]
    pub fn argument_list(&self) -> Option<&ArgumentList> {
        match &self.kind {
            ExprKind::Invocation { args, .. } => Some(args),
            ExprKind::ObjectCreation { args, .. } => args.as_ref(),
            _ => None,
        }
    }

    /// The identifier text of `Foo` or `x.Foo`.
    #[must_use]
    pub fn name_text(&self) -> Option<&str> {
        match &self.unparenthesized().kind {
            ExprKind::Identifier(name) | ExprKind::MemberAccess { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns `true` for `nameof(...)`.
    #[must_use]
    pub fn is_nameof(&self) -> bool {
        matches!(&self.kind, ExprKind::Invocation { callee, .. }
            if matches!(&callee.kind, ExprKind::Identifier(name) if name.text == "nameof"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentNameKind {
    /// `name: value`
    Colon,
    /// `Name = value` (attribute property assignment)
    Equals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentName {
    pub ident: Ident,
    pub kind: ArgumentNameKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub id: NodeId,
    pub range: OffsetRange,
    pub name: Option<ArgumentName>,
    pub expr: Expr,
}

/// An argument list including its parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentList {
    pub range: OffsetRange,
    pub args: Vec<Argument>,
}

impl ArgumentList {
    /// Positional argument at `index`, ignoring named ones.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&Argument> {
        self.args
            .iter()
            .filter(|arg| arg.name.is_none())
            .nth(index)
    }

    /// Argument written as `name: value` or `Name = value`.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Argument> {
        self.args
            .iter()
            .find(|arg| arg.name.as_ref().is_some_and(|n| n.ident.text == name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub id: NodeId,
    pub range: OffsetRange,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    Expression(Expr),
    Return(Option<Expr>),
    Throw(Option<Expr>),
    Local {
        ty: TypeSyntax,
        name: Ident,
        init: Option<Expr>,
    },
    If {
        condition: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    Block(Block),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub range: OffsetRange,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: NodeId,
    pub range: OffsetRange,
    pub name: TypeSyntax,
    pub args: Option<ArgumentList>,
}

impl Attribute {
    /// The attribute's simple name with any `Attribute` suffix removed.
    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        let name = self.name.simple_name()?;
        Some(
            name.strip_suffix("Attribute")
                .filter(|s| !s.is_empty())
                .unwrap_or(name),
        )
    }

    /// Positional argument at `index`.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&Argument> {
        self.args.as_ref()?.positional(index)
    }

    /// Single argument of the attribute, if it has exactly one.
    #[must_use]
    pub fn single_argument(&self) -> Option<&Argument> {
        match self.args.as_ref()?.args.as_slice() {
            [arg] => Some(arg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub id: NodeId,
    pub range: OffsetRange,
    pub doc: Option<OffsetRange>,
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub name: Ident,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub id: NodeId,
    pub range: OffsetRange,
    pub kind: AccessorKind,
    pub modifiers: Modifiers,
    pub body: Option<Block>,
    pub expression_body: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub id: NodeId,
    pub range: OffsetRange,
    pub doc: Option<OffsetRange>,
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub name: Ident,
    pub accessors: Vec<Accessor>,
    /// `=> expr` instead of an accessor list.
    pub expression_body: Option<Expr>,
    pub initializer: Option<Expr>,
}

impl PropertyDecl {
    #[must_use]
    pub fn getter(&self) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.kind == AccessorKind::Get)
    }

    #[must_use]
    pub fn setter(&self) -> Option<&Accessor> {
        self.accessors
            .iter()
            .find(|a| matches!(a.kind, AccessorKind::Set | AccessorKind::Init))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub id: NodeId,
    pub range: OffsetRange,
    pub attributes: Vec<Attribute>,
    pub is_this: bool,
    pub ty: TypeSyntax,
    pub name: Ident,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub id: NodeId,
    pub range: OffsetRange,
    pub doc: Option<OffsetRange>,
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub return_type: TypeSyntax,
    /// `IValueConverter` in `object IValueConverter.Convert(...)`.
    pub explicit_interface: Option<TypeSyntax>,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub params: Vec<Parameter>,
    pub body: Option<Block>,
    pub expression_body: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub id: NodeId,
    pub range: OffsetRange,
    pub doc: Option<OffsetRange>,
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub name: Ident,
    pub params: Vec<Parameter>,
    pub body: Option<Block>,
    pub expression_body: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Struct,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub id: NodeId,
    pub range: OffsetRange,
    pub doc: Option<OffsetRange>,
    /// Enclosing namespace, shared by nested types.
    pub namespace: Option<String>,
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub kind: TypeDeclKind,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub base_list: Vec<TypeSyntax>,
    pub members: Vec<Member>,
}

impl TypeDecl {
    /// Members that are not nested types.
    pub fn non_type_members(&self) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .filter(|m| !matches!(m, Member::Type(_)))
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Type(ty) => Some(ty),
            _ => None,
        })
    }

    /// First field or property declared with `name`.
    #[must_use]
    pub fn field_or_property(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| {
            matches!(m, Member::Field(_) | Member::Property(_)) && m.name().text == name
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(FieldDecl),
    Property(PropertyDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Type(TypeDecl),
}

impl Member {
    #[must_use]
    pub fn as_member(&self) -> MemberRef<'_> {
        match self {
            Self::Field(f) => MemberRef::Field(f),
            Self::Property(p) => MemberRef::Property(p),
            Self::Method(m) => MemberRef::Method(m),
            Self::Constructor(c) => MemberRef::Constructor(c),
            Self::Type(t) => MemberRef::Type(t),
        }
    }

    #[must_use]
    pub fn name(&self) -> &Ident {
        self.as_member().name()
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.as_member().id()
    }
}

/// Borrowed view of any declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRef<'a> {
    Field(&'a FieldDecl),
    Property(&'a PropertyDecl),
    Method(&'a MethodDecl),
    Constructor(&'a ConstructorDecl),
    Type(&'a TypeDecl),
}

impl<'a> MemberRef<'a> {
    #[must_use]
    pub fn id(self) -> NodeId {
        match self {
            Self::Field(f) => f.id,
            Self::Property(p) => p.id,
            Self::Method(m) => m.id,
            Self::Constructor(c) => c.id,
            Self::Type(t) => t.id,
        }
    }

    #[must_use]
    pub fn range(self) -> OffsetRange {
        match self {
            Self::Field(f) => f.range,
            Self::Property(p) => p.range,
            Self::Method(m) => m.range,
            Self::Constructor(c) => c.range,
            Self::Type(t) => t.range,
        }
    }

    #[must_use]
    pub fn name(self) -> &'a Ident {
        match self {
            Self::Field(f) => &f.name,
            Self::Property(p) => &p.name,
            Self::Method(m) => &m.name,
            Self::Constructor(c) => &c.name,
            Self::Type(t) => &t.name,
        }
    }

    /// Range of the `///` comment block directly above the declaration.
    #[must_use]
    pub fn doc(self) -> Option<OffsetRange> {
        match self {
            Self::Field(f) => f.doc,
            Self::Property(p) => p.doc,
            Self::Method(m) => m.doc,
            Self::Constructor(c) => c.doc,
            Self::Type(t) => t.doc,
        }
    }

    #[must_use]
    pub fn attributes(self) -> &'a [Attribute] {
        match self {
            Self::Field(f) => &f.attributes,
            Self::Property(p) => &p.attributes,
            Self::Method(m) => &m.attributes,
            Self::Constructor(c) => &c.attributes,
            Self::Type(t) => &t.attributes,
        }
    }

    #[must_use]
    pub fn modifiers(self) -> &'a Modifiers {
        match self {
            Self::Field(f) => &f.modifiers,
            Self::Property(p) => &p.modifiers,
            Self::Method(m) => &m.modifiers,
            Self::Constructor(c) => &c.modifiers,
            Self::Type(t) => &t.modifiers,
        }
    }

    /// Range of the declaration including its doc comment.
    #[must_use]
    pub fn full_range(self) -> OffsetRange {
        match self.doc() {
            Some(doc) => doc.cover(self.range()),
            None => self.range(),
        }
    }
}

/// Root of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilationUnit {
    pub usings: Vec<String>,
    /// `[assembly: ...]` attributes
    pub attributes: Vec<Attribute>,
    pub types: Vec<TypeDecl>,
}
