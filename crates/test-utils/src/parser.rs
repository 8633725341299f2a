//! Recursive-descent parser for the C# subset fixtures are written in.
//!
//! Covers namespaces, classes/structs/interfaces, fields, properties,
//! methods, constructors, attributes and the statement and expression forms
//! the analyzers look at. Anything else is a [`ParseError`].

use wpf_syntax::{
    Accessor, AccessorKind, Argument, ArgumentList, ArgumentName, ArgumentNameKind, Attribute,
    BinaryOp, Block, CompilationUnit, ConstructorDecl, Expr, ExprKind, FieldDecl, Ident, Literal,
    Member, MethodDecl, Modifier, Modifiers, NameSegment, NodeId, Parameter, PredefinedType,
    PropertyDecl, Stmt, StmtKind, SyntaxTree, TypeDecl, TypeDeclKind, TypeSyntax, TypeSyntaxKind,
    UnaryOp,
};
use wpf_types::{FileId, OffsetRange};

use crate::lexer::{tokenize, Token, TokenKind};
use crate::ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// Parses `text` into a syntax tree for `file_id`.
pub fn parse(file_id: FileId, text: &str) -> ParseResult<SyntaxTree> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        next_id: 0,
    };
    let root = parser.compilation_unit()?;
    Ok(SyntaxTree::new(file_id, text, root))
}

/// Words that never start a type in statement position.
const RESERVED: &[&str] = &[
    "is", "as", "new", "typeof", "default", "this", "base", "true", "false", "null", "return",
    "throw", "if", "else",
];

fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

const BINARY_LEVELS: &[&[(&str, BinaryOp)]] = &[
    &[("||", BinaryOp::Or)],
    &[("&&", BinaryOp::And)],
    &[("==", BinaryOp::Eq), ("!=", BinaryOp::NotEq)],
    &[
        ("<", BinaryOp::Lt),
        (">", BinaryOp::Gt),
        ("<=", BinaryOp::LtEq),
        (">=", BinaryOp::GtEq),
    ],
    &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)],
    &[("*", BinaryOp::Mul), ("/", BinaryOp::Div), ("%", BinaryOp::Rem)],
];

const RELATIONAL_LEVEL: usize = 3;

/// Where a type is being parsed; decides whether a trailing `?` is nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeContext {
    Declaration,
    Expression,
}

struct Leading {
    doc: Option<OffsetRange>,
    start: usize,
    attributes: Vec<Attribute>,
    modifiers: Modifiers,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    next_id: u32,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn nth(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at(&self, punct: &str) -> bool {
        self.peek().is_punct(punct)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().is_ident(keyword)
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn eat(&mut self, punct: &str) -> bool {
        if self.at(punct) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &str) -> ParseResult<Token> {
        if self.at(punct) {
            Ok(self.bump())
        } else {
            Err(self.error(&format!("expected `{punct}`")))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Ident> {
        match self.peek().ident() {
            Some(text) => {
                let ident = Ident {
                    text: text.to_owned(),
                    range: self.peek().range,
                };
                self.bump();
                Ok(ident)
            }
            None => Err(self.error("expected identifier")),
        }
    }

    fn error(&self, message: &str) -> ParseError {
        let token = self.peek();
        ParseError::new(format!("{message}, found {:?}", token.kind), token.range.start)
    }

    fn start(&self) -> usize {
        self.peek().range.start
    }

    fn range_from(&self, start: usize) -> OffsetRange {
        let end = if self.pos == 0 {
            start
        } else {
            self.tokens[self.pos - 1].range.end
        };
        OffsetRange::new(start, end.max(start))
    }

    fn id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn skip_balanced(&mut self, open: &str, close: &str) -> ParseResult<()> {
        self.expect(open)?;
        let mut depth = 1;
        while depth > 0 {
            if self.at_eof() {
                return Err(self.error(&format!("expected `{close}`")));
            }
            if self.at(open) {
                depth += 1;
            } else if self.at(close) {
                depth -= 1;
            }
            self.bump();
        }
        Ok(())
    }

    // Declarations

    fn compilation_unit(&mut self) -> ParseResult<CompilationUnit> {
        let mut unit = CompilationUnit::default();
        self.namespace_body(None, &mut unit, true)?;
        Ok(unit)
    }

    fn namespace_body(
        &mut self,
        namespace: Option<&str>,
        unit: &mut CompilationUnit,
        top_level: bool,
    ) -> ParseResult<()> {
        let mut namespace = namespace.map(str::to_owned);
        loop {
            if top_level && self.at_eof() {
                return Ok(());
            }
            if !top_level && self.eat("}") {
                return Ok(());
            }
            if self.at_eof() {
                return Err(self.error("expected `}`"));
            }
            if self.eat_keyword("using") {
                if let Some(using) = self.using_directive()? {
                    unit.usings.push(using);
                }
                continue;
            }
            if self.eat_keyword("namespace") {
                let name = self.dotted_name()?;
                let full = match &namespace {
                    Some(outer) => format!("{outer}.{name}"),
                    None => name,
                };
                if self.eat(";") {
                    namespace = Some(full);
                    continue;
                }
                self.expect("{")?;
                self.namespace_body(Some(&full), unit, false)?;
                continue;
            }
            if self.at("[") && self.nth(1).is_ident("assembly") {
                let attributes = self.attribute_lists()?;
                unit.attributes.extend(attributes);
                continue;
            }
            let leading = self.leading()?;
            let ty = self.type_declaration(leading, namespace.as_deref())?;
            unit.types.push(ty);
        }
    }

    /// Namespace imported by `using X.Y;`; aliases and `using static` are skipped.
    fn using_directive(&mut self) -> ParseResult<Option<String>> {
        let plain = !self.at_keyword("static") && !self.nth(1).is_punct("=");
        if !plain {
            while !self.at(";") && !self.at_eof() {
                self.bump();
            }
            self.expect(";")?;
            return Ok(None);
        }
        let name = self.dotted_name()?;
        self.expect(";")?;
        Ok(Some(name))
    }

    fn dotted_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_ident()?.text;
        while self.eat(".") {
            name.push('.');
            name.push_str(&self.expect_ident()?.text);
        }
        Ok(name)
    }

    fn leading(&mut self) -> ParseResult<Leading> {
        let doc = self.peek().doc;
        let start = self.start();
        let attributes = self.attribute_lists()?;
        let mut modifiers = Vec::new();
        while let Some(modifier) = self.peek().ident().and_then(Modifier::from_keyword) {
            self.bump();
            modifiers.push(modifier);
        }
        Ok(Leading {
            doc,
            start,
            attributes,
            modifiers: Modifiers::new(modifiers),
        })
    }

    fn type_declaration(
        &mut self,
        leading: Leading,
        namespace: Option<&str>,
    ) -> ParseResult<TypeDecl> {
        let kind = if self.eat_keyword("class") {
            TypeDeclKind::Class
        } else if self.eat_keyword("struct") {
            TypeDeclKind::Struct
        } else if self.eat_keyword("interface") {
            TypeDeclKind::Interface
        } else {
            return Err(self.error("expected type declaration"));
        };
        let name = self.expect_ident()?;
        let type_params = self.type_parameter_list()?;
        let mut base_list = Vec::new();
        if self.eat(":") {
            loop {
                base_list.push(self.parse_type(TypeContext::Declaration)?);
                if !self.eat(",") {
                    break;
                }
            }
        }
        self.skip_constraints();
        self.expect("{")?;
        let mut members = Vec::new();
        while !self.eat("}") {
            if self.at_eof() {
                return Err(self.error("expected `}`"));
            }
            members.push(self.member(&name.text, namespace)?);
        }
        self.eat(";");
        Ok(TypeDecl {
            id: self.id(),
            range: self.range_from(leading.start),
            doc: leading.doc,
            namespace: namespace.map(str::to_owned),
            attributes: leading.attributes,
            modifiers: leading.modifiers,
            kind,
            name,
            type_params,
            base_list,
            members,
        })
    }

    fn type_parameter_list(&mut self) -> ParseResult<Vec<Ident>> {
        let mut params = Vec::new();
        if self.eat("<") {
            loop {
                if self.at_keyword("in") || self.at_keyword("out") {
                    self.bump();
                }
                params.push(self.expect_ident()?);
                if !self.eat(",") {
                    break;
                }
            }
            self.expect(">")?;
        }
        Ok(params)
    }

    /// Skips `where T : ...` clauses up to the body.
    fn skip_constraints(&mut self) {
        if !self.at_keyword("where") {
            return;
        }
        while !self.at("{") && !self.at(";") && !self.at("=>") && !self.at_eof() {
            self.bump();
        }
    }

    fn member(&mut self, type_name: &str, namespace: Option<&str>) -> ParseResult<Member> {
        let leading = self.leading()?;
        if ["class", "struct", "interface"]
            .iter()
            .any(|k| self.at_keyword(k))
        {
            return Ok(Member::Type(self.type_declaration(leading, namespace)?));
        }
        if self.at_keyword(type_name) && self.nth(1).is_punct("(") {
            return Ok(Member::Constructor(self.constructor(leading)?));
        }

        let ty = self.parse_type(TypeContext::Declaration)?;
        let mut names = vec![self.expect_ident()?];
        while self.at(".") && self.nth(1).ident().is_some() {
            self.bump();
            names.push(self.expect_ident()?);
        }
        let Some(name) = names.pop() else {
            return Err(self.error("expected member name"));
        };
        let explicit_interface = if names.is_empty() {
            None
        } else {
            let range = names[0].range.cover(names[names.len() - 1].range);
            let segments = names
                .into_iter()
                .map(|name| NameSegment {
                    name,
                    type_args: Vec::new(),
                })
                .collect();
            Some(TypeSyntax {
                id: self.id(),
                range,
                kind: TypeSyntaxKind::Named(segments),
            })
        };

        if self.at("(") || self.at("<") {
            return Ok(Member::Method(self.method(leading, ty, explicit_interface, name)?));
        }
        if self.at("{") || self.at("=>") {
            return Ok(Member::Property(self.property(leading, ty, name)?));
        }
        let initializer = if self.eat("=") {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(";")?;
        Ok(Member::Field(FieldDecl {
            id: self.id(),
            range: self.range_from(leading.start),
            doc: leading.doc,
            attributes: leading.attributes,
            modifiers: leading.modifiers,
            ty,
            name,
            initializer,
        }))
    }

    fn constructor(&mut self, leading: Leading) -> ParseResult<ConstructorDecl> {
        let name = self.expect_ident()?;
        let params = self.parameter_list()?;
        if self.eat(":") {
            if !self.eat_keyword("base") && !self.eat_keyword("this") {
                return Err(self.error("expected `base` or `this`"));
            }
            self.argument_list(false)?;
        }
        let (body, expression_body) = self.body()?;
        Ok(ConstructorDecl {
            id: self.id(),
            range: self.range_from(leading.start),
            doc: leading.doc,
            attributes: leading.attributes,
            modifiers: leading.modifiers,
            name,
            params,
            body,
            expression_body,
        })
    }

    fn method(
        &mut self,
        leading: Leading,
        return_type: TypeSyntax,
        explicit_interface: Option<TypeSyntax>,
        name: Ident,
    ) -> ParseResult<MethodDecl> {
        let type_params = self.type_parameter_list()?;
        let params = self.parameter_list()?;
        self.skip_constraints();
        let (body, expression_body) = self.body()?;
        Ok(MethodDecl {
            id: self.id(),
            range: self.range_from(leading.start),
            doc: leading.doc,
            attributes: leading.attributes,
            modifiers: leading.modifiers,
            return_type,
            explicit_interface,
            name,
            type_params,
            params,
            body,
            expression_body,
        })
    }

    /// `{ ... }`, `=> expr;` or `;`.
    fn body(&mut self) -> ParseResult<(Option<Block>, Option<Expr>)> {
        if self.at("{") {
            return Ok((Some(self.block()?), None));
        }
        if self.eat("=>") {
            let expr = self.expression()?;
            self.expect(";")?;
            return Ok((None, Some(expr)));
        }
        self.expect(";")?;
        Ok((None, None))
    }

    fn property(
        &mut self,
        leading: Leading,
        ty: TypeSyntax,
        name: Ident,
    ) -> ParseResult<PropertyDecl> {
        let mut accessors = Vec::new();
        let mut expression_body = None;
        let mut initializer = None;
        if self.eat("=>") {
            expression_body = Some(self.expression()?);
            self.expect(";")?;
        } else {
            self.expect("{")?;
            while !self.eat("}") {
                if self.at_eof() {
                    return Err(self.error("expected `}`"));
                }
                accessors.push(self.accessor()?);
            }
            if self.eat("=") {
                initializer = Some(self.expression()?);
                self.expect(";")?;
            }
        }
        Ok(PropertyDecl {
            id: self.id(),
            range: self.range_from(leading.start),
            doc: leading.doc,
            attributes: leading.attributes,
            modifiers: leading.modifiers,
            ty,
            name,
            accessors,
            expression_body,
            initializer,
        })
    }

    fn accessor(&mut self) -> ParseResult<Accessor> {
        let leading = self.leading()?;
        let kind = if self.eat_keyword("get") {
            AccessorKind::Get
        } else if self.eat_keyword("set") {
            AccessorKind::Set
        } else if self.eat_keyword("init") {
            AccessorKind::Init
        } else {
            return Err(self.error("expected accessor"));
        };
        let (body, expression_body) = self.body()?;
        Ok(Accessor {
            id: self.id(),
            range: self.range_from(leading.start),
            kind,
            modifiers: leading.modifiers,
            body,
            expression_body,
        })
    }

    fn parameter_list(&mut self) -> ParseResult<Vec<Parameter>> {
        self.expect("(")?;
        let mut params = Vec::new();
        if !self.at(")") {
            loop {
                params.push(self.parameter()?);
                if !self.eat(",") {
                    break;
                }
            }
        }
        self.expect(")")?;
        Ok(params)
    }

    fn parameter(&mut self) -> ParseResult<Parameter> {
        let start = self.start();
        let attributes = self.attribute_lists()?;
        let is_this = self.eat_keyword("this");
        while ["ref", "out", "in", "params"]
            .iter()
            .any(|k| self.at_keyword(k))
        {
            self.bump();
        }
        let ty = self.parse_type(TypeContext::Declaration)?;
        let name = self.expect_ident()?;
        let default = if self.eat("=") {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Parameter {
            id: self.id(),
            range: self.range_from(start),
            attributes,
            is_this,
            ty,
            name,
            default,
        })
    }

    fn attribute_lists(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes = Vec::new();
        while self.eat("[") {
            if self.peek().ident().is_some() && self.nth(1).is_punct(":") {
                self.bump();
                self.bump();
            }
            loop {
                let start = self.start();
                let name = self.parse_type(TypeContext::Expression)?;
                let args = if self.at("(") {
                    Some(self.argument_list(true)?)
                } else {
                    None
                };
                attributes.push(Attribute {
                    id: self.id(),
                    range: self.range_from(start),
                    name,
                    args,
                });
                if !self.eat(",") {
                    break;
                }
            }
            self.expect("]")?;
        }
        Ok(attributes)
    }

    // Types

    fn parse_type(&mut self, context: TypeContext) -> ParseResult<TypeSyntax> {
        let start = self.start();
        let Some(word) = self.peek().ident().map(str::to_owned) else {
            return Err(self.error("expected type"));
        };
        let mut ty = if let Some(predefined) = PredefinedType::from_keyword(&word) {
            self.bump();
            TypeSyntax {
                id: self.id(),
                range: self.range_from(start),
                kind: TypeSyntaxKind::Predefined(predefined),
            }
        } else {
            let mut segments = Vec::new();
            loop {
                let name = self.expect_ident()?;
                let type_args = if self.at("<") {
                    self.type_argument_list()?
                } else {
                    Vec::new()
                };
                segments.push(NameSegment { name, type_args });
                if self.at(".") && self.nth(1).ident().is_some() {
                    self.bump();
                } else {
                    break;
                }
            }
            TypeSyntax {
                id: self.id(),
                range: self.range_from(start),
                kind: TypeSyntaxKind::Named(segments),
            }
        };
        loop {
            if self.at("[") && self.nth(1).is_punct("]") {
                self.bump();
                self.bump();
                ty = TypeSyntax {
                    id: self.id(),
                    range: self.range_from(start),
                    kind: TypeSyntaxKind::Array(Box::new(ty)),
                };
            } else if self.at("?") && self.nullable_allowed(context) {
                self.bump();
                ty = TypeSyntax {
                    id: self.id(),
                    range: self.range_from(start),
                    kind: TypeSyntaxKind::Nullable(Box::new(ty)),
                };
            } else {
                return Ok(ty);
            }
        }
    }

    /// In expressions `T ?` may start a conditional, so only accept it before a terminator.
    fn nullable_allowed(&self, context: TypeContext) -> bool {
        match context {
            TypeContext::Declaration => true,
            TypeContext::Expression => [")", ";", ",", "??", "]", "}"]
                .iter()
                .any(|p| self.nth(1).is_punct(p)),
        }
    }

    fn type_argument_list(&mut self) -> ParseResult<Vec<TypeSyntax>> {
        self.expect("<")?;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type(TypeContext::Declaration)?);
            if !self.eat(",") {
                break;
            }
        }
        self.expect(">")?;
        Ok(args)
    }

    // Statements

    fn block(&mut self) -> ParseResult<Block> {
        let start = self.start();
        self.expect("{")?;
        let mut statements = Vec::new();
        while !self.eat("}") {
            if self.at_eof() {
                return Err(self.error("expected `}`"));
            }
            statements.push(self.statement()?);
        }
        Ok(Block {
            range: self.range_from(start),
            statements,
        })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        let kind = if self.at("{") {
            StmtKind::Block(self.block()?)
        } else if self.eat(";") {
            StmtKind::Empty
        } else if self.eat_keyword("return") {
            let value = self.optional_expression()?;
            self.expect(";")?;
            StmtKind::Return(value)
        } else if self.eat_keyword("throw") {
            let value = self.optional_expression()?;
            self.expect(";")?;
            StmtKind::Throw(value)
        } else if self.eat_keyword("if") {
            self.expect("(")?;
            let condition = self.expression()?;
            self.expect(")")?;
            let then = Box::new(self.statement()?);
            let otherwise = if self.eat_keyword("else") {
                Some(Box::new(self.statement()?))
            } else {
                None
            };
            StmtKind::If {
                condition,
                then,
                otherwise,
            }
        } else if let Some(local) = self.local_declaration()? {
            local
        } else {
            let expr = self.expression()?;
            self.expect(";")?;
            StmtKind::Expression(expr)
        };
        Ok(Stmt {
            id: self.id(),
            range: self.range_from(start),
            kind,
        })
    }

    fn optional_expression(&mut self) -> ParseResult<Option<Expr>> {
        if self.at(";") {
            Ok(None)
        } else {
            self.expression().map(Some)
        }
    }

    /// `T name = init;` or `T name;`, backtracking when the tokens are an expression.
    fn local_declaration(&mut self) -> ParseResult<Option<StmtKind>> {
        if !self.peek().ident().is_some_and(|w| !is_reserved(w)) {
            return Ok(None);
        }
        let checkpoint = self.pos;
        let Ok(ty) = self.parse_type(TypeContext::Declaration) else {
            self.pos = checkpoint;
            return Ok(None);
        };
        let is_declaration = self.peek().ident().is_some_and(|w| !is_reserved(w))
            && (self.nth(1).is_punct("=") || self.nth(1).is_punct(";"));
        if !is_declaration {
            self.pos = checkpoint;
            return Ok(None);
        }
        let name = self.expect_ident()?;
        let init = if self.eat("=") {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(";")?;
        Ok(Some(StmtKind::Local { ty, name, init }))
    }

    // Expressions

    fn make_expr(&mut self, start: usize, kind: ExprKind) -> Expr {
        Expr {
            id: self.id(),
            range: self.range_from(start),
            kind,
        }
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let target = self.conditional()?;
        if self.eat("=") {
            let value = self.expression()?;
            return Ok(self.make_expr(
                start,
                ExprKind::Assignment {
                    target: Box::new(target),
                    value: Box::new(value),
                },
            ));
        }
        Ok(target)
    }

    fn conditional(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let condition = self.coalesce()?;
        if !self.eat("?") {
            return Ok(condition);
        }
        let when_true = self.expression()?;
        self.expect(":")?;
        let when_false = self.expression()?;
        Ok(self.make_expr(
            start,
            ExprKind::Conditional {
                condition: Box::new(condition),
                when_true: Box::new(when_true),
                when_false: Box::new(when_false),
            },
        ))
    }

    fn coalesce(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let left = self.binary(0)?;
        if !self.eat("??") {
            return Ok(left);
        }
        let right = self.coalesce()?;
        Ok(self.make_expr(
            start,
            ExprKind::Binary {
                op: BinaryOp::Coalesce,
                left: Box::new(left),
                right: Box::new(right),
            },
        ))
    }

    fn binary(&mut self, level: usize) -> ParseResult<Expr> {
        if level == BINARY_LEVELS.len() {
            return self.unary();
        }
        let start = self.start();
        let mut left = self.binary(level + 1)?;
        loop {
            if level == RELATIONAL_LEVEL {
                if self.eat_keyword("is") {
                    left = self.is_pattern(start, left)?;
                    continue;
                }
                if self.eat_keyword("as") {
                    let ty = self.parse_type(TypeContext::Expression)?;
                    left = self.make_expr(
                        start,
                        ExprKind::As {
                            expr: Box::new(left),
                            ty,
                        },
                    );
                    continue;
                }
            }
            let Some(op) = BINARY_LEVELS[level]
                .iter()
                .find(|(punct, _)| self.at(punct))
                .map(|&(_, op)| op)
            else {
                break;
            };
            self.bump();
            let right = self.binary(level + 1)?;
            left = self.make_expr(
                start,
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            );
        }
        Ok(left)
    }

    fn is_pattern(&mut self, start: usize, left: Expr) -> ParseResult<Expr> {
        if self.at_keyword("null") {
            let null_start = self.start();
            self.bump();
            let null = self.make_expr(null_start, ExprKind::Literal(Literal::Null));
            return Ok(self.make_expr(
                start,
                ExprKind::Binary {
                    op: BinaryOp::Eq,
                    left: Box::new(left),
                    right: Box::new(null),
                },
            ));
        }
        let ty = self.parse_type(TypeContext::Expression)?;
        let designation = if self.peek().ident().is_some_and(|w| !is_reserved(w)) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        Ok(self.make_expr(
            start,
            ExprKind::Is {
                expr: Box::new(left),
                ty,
                designation,
            },
        ))
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let op = if self.eat("!") {
            Some(UnaryOp::Not)
        } else if self.eat("-") {
            Some(UnaryOp::Neg)
        } else {
            None
        };
        if let Some(op) = op {
            let operand = self.unary()?;
            return Ok(self.make_expr(
                start,
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
            ));
        }
        if self.at("(") {
            if let Some(cast) = self.cast(start)? {
                return Ok(cast);
            }
        }
        self.postfix()
    }

    /// `(T)expr`, backtracking when the parenthesis is not a cast.
    fn cast(&mut self, start: usize) -> ParseResult<Option<Expr>> {
        let checkpoint = self.pos;
        self.bump();
        let ty = match self.parse_type(TypeContext::Declaration) {
            Ok(ty) if self.eat(")") => ty,
            _ => {
                self.pos = checkpoint;
                return Ok(None);
            }
        };
        let next = self.peek();
        let starts_operand = match &next.kind {
            TokenKind::Ident(word) => word != "is" && word != "as",
            TokenKind::String(_)
            | TokenKind::Char(_)
            | TokenKind::Integer(_)
            | TokenKind::Real(_) => true,
            TokenKind::Punct(p) => *p == "(" || *p == "!",
            TokenKind::Eof => false,
        };
        if !starts_operand {
            self.pos = checkpoint;
            return Ok(None);
        }
        let expr = self.unary()?;
        Ok(Some(self.make_expr(
            start,
            ExprKind::Cast {
                ty,
                expr: Box::new(expr),
            },
        )))
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let mut expr = self.primary()?;
        loop {
            if self.eat(".") {
                let name = self.expect_ident()?;
                expr = self.make_expr(
                    start,
                    ExprKind::MemberAccess {
                        target: Box::new(expr),
                        name,
                    },
                );
            } else if self.at("(") {
                let args = self.argument_list(false)?;
                expr = self.make_expr(
                    start,
                    ExprKind::Invocation {
                        callee: Box::new(expr),
                        args,
                    },
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let token = self.peek().clone();
        let kind = match token.kind {
            TokenKind::String(value) => {
                self.bump();
                ExprKind::Literal(Literal::String(value))
            }
            TokenKind::Char(value) => {
                self.bump();
                ExprKind::Literal(Literal::Char(value))
            }
            TokenKind::Integer(value) => {
                self.bump();
                ExprKind::Literal(Literal::Integer(value))
            }
            TokenKind::Real(text) => {
                self.bump();
                ExprKind::Literal(Literal::Real(text))
            }
            TokenKind::Punct("(") => {
                self.bump();
                let inner = self.expression()?;
                self.expect(")")?;
                ExprKind::Parenthesized(Box::new(inner))
            }
            TokenKind::Ident(word) => match word.as_str() {
                "true" | "false" => {
                    self.bump();
                    ExprKind::Literal(Literal::Bool(word == "true"))
                }
                "null" => {
                    self.bump();
                    ExprKind::Literal(Literal::Null)
                }
                "this" => {
                    self.bump();
                    ExprKind::This
                }
                "base" => {
                    self.bump();
                    ExprKind::Base
                }
                "typeof" => {
                    self.bump();
                    self.expect("(")?;
                    let ty = self.parse_type(TypeContext::Declaration)?;
                    self.expect(")")?;
                    ExprKind::TypeOf(ty)
                }
                "default" => {
                    self.bump();
                    if self.eat("(") {
                        let ty = self.parse_type(TypeContext::Declaration)?;
                        self.expect(")")?;
                        ExprKind::Default(Some(ty))
                    } else {
                        ExprKind::Default(None)
                    }
                }
                "new" => {
                    self.bump();
                    self.creation()?
                }
                _ => {
                    self.bump();
                    ExprKind::Identifier(Ident {
                        text: word,
                        range: token.range,
                    })
                }
            },
            _ => return Err(self.error("expected expression")),
        };
        Ok(self.make_expr(start, kind))
    }

    /// The part of `new ...` after the keyword.
    fn creation(&mut self) -> ParseResult<ExprKind> {
        let ty = self.parse_type(TypeContext::Expression)?;
        if self.eat("[") {
            let size = self.expression()?;
            self.expect("]")?;
            return Ok(ExprKind::ArrayCreation {
                ty,
                size: Some(Box::new(size)),
            });
        }
        if let TypeSyntaxKind::Array(element) = ty.kind {
            if self.at("{") {
                self.skip_balanced("{", "}")?;
            }
            return Ok(ExprKind::ArrayCreation {
                ty: *element,
                size: None,
            });
        }
        let args = if self.at("(") {
            Some(self.argument_list(false)?)
        } else {
            None
        };
        if self.at("{") {
            self.skip_balanced("{", "}")?;
        }
        Ok(ExprKind::ObjectCreation { ty, args })
    }

    fn argument_list(&mut self, attribute: bool) -> ParseResult<ArgumentList> {
        let start = self.start();
        self.expect("(")?;
        let mut args = Vec::new();
        if !self.at(")") {
            loop {
                args.push(self.argument(attribute)?);
                if !self.eat(",") {
                    break;
                }
            }
        }
        self.expect(")")?;
        Ok(ArgumentList {
            range: self.range_from(start),
            args,
        })
    }

    fn argument(&mut self, attribute: bool) -> ParseResult<Argument> {
        let start = self.start();
        let named = self.peek().ident().is_some_and(|w| !is_reserved(w));
        let name = if named && self.nth(1).is_punct(":") {
            let ident = self.expect_ident()?;
            self.bump();
            Some(ArgumentName {
                ident,
                kind: ArgumentNameKind::Colon,
            })
        } else if named && attribute && self.nth(1).is_punct("=") {
            let ident = self.expect_ident()?;
            self.bump();
            Some(ArgumentName {
                ident,
                kind: ArgumentNameKind::Equals,
            })
        } else {
            None
        };
        if (self.at_keyword("ref") || self.at_keyword("out")) && self.nth(1).ident().is_some() {
            self.bump();
        }
        let expr = self.expression()?;
        Ok(Argument {
            id: self.id(),
            range: self.range_from(start),
            name,
            expr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(text: &str) -> SyntaxTree {
        parse(FileId::new(0), text).unwrap()
    }

    fn first_type(tree: &SyntaxTree) -> &TypeDecl {
        &tree.root().types[0]
    }

    #[test]
    fn test_dependency_property_declaration() {
        let text = r#"
namespace N
{
    using System.Windows;

    public class FooControl : System.Windows.Controls.Control
    {
        /// <summary>Identifies the <see cref="Bar"/> property.</summary>
        public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
            nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

        public int Bar
        {
            get => (int)this.GetValue(BarProperty);
            set => this.SetValue(BarProperty, value);
        }
    }
}"#;
        let tree = parse_text(text);
        assert_eq!(tree.root().usings, vec!["System.Windows".to_owned()]);
        let ty = first_type(&tree);
        assert_eq!(ty.name.text, "FooControl");
        assert_eq!(ty.namespace.as_deref(), Some("N"));
        assert_eq!(
            ty.base_list[0].dotted_name().as_deref(),
            Some("System.Windows.Controls.Control")
        );

        let Member::Field(field) = &ty.members[0] else {
            panic!("expected field");
        };
        assert_eq!(field.name.text, "BarProperty");
        assert!(field.modifiers.is_static() && field.modifiers.is_readonly());
        let doc = field.doc.unwrap();
        assert!(tree.text_of(doc).starts_with("/// <summary>"));
        let init = field.initializer.as_ref().unwrap();
        assert_eq!(init.invoked_method_name().unwrap().text, "Register");
        let args = init.argument_list().unwrap();
        assert_eq!(args.len(), 4);
        assert!(args.args[0].expr.is_nameof());

        let Member::Property(property) = &ty.members[1] else {
            panic!("expected property");
        };
        assert_eq!(property.accessors.len(), 2);
        let getter = property.getter().unwrap().expression_body.as_ref().unwrap();
        assert!(matches!(getter.kind, ExprKind::Cast { .. }));
        assert_eq!(tree.text_of(getter.range), "(int)this.GetValue(BarProperty)");
    }

    #[test]
    fn test_statements_and_locals() {
        let text = r"
class C
{
    public int Bar
    {
        set
        {
            this.SetValue(BarProperty, value);
            var x = 1;
            if (x == 1) { this.Log(); } else return;
        }
    }
}";
        let tree = parse_text(text);
        let Member::Property(property) = &first_type(&tree).members[0] else {
            panic!("expected property");
        };
        let body = property.setter().unwrap().body.as_ref().unwrap();
        assert_eq!(body.statements.len(), 3);
        assert!(matches!(
            &body.statements[1].kind,
            StmtKind::Local { ty, name, .. } if ty.is_var() && name.text == "x"
        ));
        assert!(matches!(body.statements[2].kind, StmtKind::If { .. }));
        assert_eq!(
            tree.text_of(body.statements[0].range),
            "this.SetValue(BarProperty, value);"
        );
    }

    #[test]
    fn test_attributes_with_named_arguments() {
        let text = r#"
[TemplatePart(Name = "PART_Bar", Type = typeof(Button))]
[ValueConversion(typeof(bool), typeof(Visibility))]
public sealed class C : IValueConverter
{
    object IValueConverter.Convert(object value, Type targetType, object parameter, CultureInfo culture)
    {
        return value is bool b && b ? Visibility.Visible : Visibility.Collapsed;
    }
}"#;
        let tree = parse_text(text);
        let ty = first_type(&tree);
        assert_eq!(ty.attributes.len(), 2);
        let part = &ty.attributes[0];
        assert_eq!(part.short_name(), Some("TemplatePart"));
        let name = part.args.as_ref().unwrap().named("Name").unwrap();
        assert_eq!(name.name.as_ref().unwrap().kind, ArgumentNameKind::Equals);
        assert_eq!(ty.attributes[1].positional(1).map(|a| tree.text_of(a.range)), Some("typeof(Visibility)"));

        let Member::Method(method) = &ty.members[0] else {
            panic!("expected method");
        };
        assert_eq!(method.name.text, "Convert");
        assert_eq!(
            method.explicit_interface.as_ref().and_then(TypeSyntax::simple_name),
            Some("IValueConverter")
        );
        assert_eq!(method.params.len(), 4);
    }

    #[test]
    fn test_generic_and_nullable_types() {
        let text = "class C<T> where T : class { public ObservableCollection<T> Items { get; } public double? Value { get; set; } public int[] Numbers; }";
        let tree = parse_text(text);
        let ty = first_type(&tree);
        assert_eq!(ty.type_params.len(), 1);
        let Member::Property(items) = &ty.members[0] else {
            panic!("expected property");
        };
        assert!(matches!(&items.ty.kind, TypeSyntaxKind::Named(s) if s[0].type_args.len() == 1));
        let Member::Property(value) = &ty.members[1] else {
            panic!("expected property");
        };
        assert!(matches!(value.ty.kind, TypeSyntaxKind::Nullable(_)));
        let Member::Field(numbers) = &ty.members[2] else {
            panic!("expected field");
        };
        assert!(matches!(numbers.ty.kind, TypeSyntaxKind::Array(_)));
    }

    #[test]
    fn test_node_ids_are_unique() {
        let text = "class C { int x = 1 + 2; void M(int a) { M(a); } }";
        let tree = parse_text(text);
        let mut ids = Vec::new();
        for member in &first_type(&tree).members {
            ids.push(member.id());
            wpf_syntax::for_each_expr_in_member(member.as_member(), &mut |e| ids.push(e.id));
        }
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_errors_report_offset() {
        let err = parse(FileId::new(0), "class C { int }").unwrap_err();
        assert_eq!(err.offset, 14);
    }
}
