//! Strict recursive-descent parser producing an arena tree.
//!
//! The parser works over the significant (non-trivia) tokens only; node spans run from the start
//! of a node's first token to the end of its last token. Empty lists get a zero-length span at
//! the position where their first item would be inserted.

use std::sync::Arc;

use jrewrite_core::{SmolStr, TextRange, TextSize};

use crate::kind::NodeKind;
use crate::lexer::lex;
use crate::token::{Token, TokenKind};
use crate::tree::{NodeArena, NodeData, NodeId, Origin, SyntaxTree};
use crate::ParseError;

type PResult<T> = Result<T, ParseError>;

/// What a fragment parse should produce as the tree root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    CompilationUnit,
    Block,
    Statement,
    Expression,
    Member,
}

pub(crate) fn parse_entry(input: &str, entry: Entry) -> PResult<SyntaxTree> {
    let all_tokens = lex(input);
    if let Some(bad) = all_tokens.iter().find(|t| t.kind == TokenKind::Error) {
        return Err(ParseError::new("unrecognized or unterminated token", bad.range));
    }

    let mut parser = Parser::new(input, &all_tokens);
    let root = match entry {
        Entry::CompilationUnit => parser.compilation_unit()?,
        Entry::Block => parser.block()?,
        Entry::Statement => parser.statement()?,
        Entry::Expression => parser.expression(0)?,
        Entry::Member => parser.class_member()?,
    };
    if !parser.at(TokenKind::Eof) {
        return Err(parser.error_here("unexpected trailing input"));
    }

    tracing::debug!(
        target = "jrewrite.parse",
        entry = ?entry,
        len = input.len(),
        nodes = parser.arena.len(),
        "parsed"
    );
    Ok(SyntaxTree::from_parts(
        Arc::from(input),
        all_tokens,
        parser.arena,
        root,
    ))
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    arena: NodeArena,
    last_end: TextSize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, all_tokens: &[Token]) -> Self {
        let tokens = all_tokens
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .copied()
            .collect();
        Self {
            input,
            tokens,
            pos: 0,
            arena: NodeArena::default(),
            last_end: TextSize::from(0),
        }
    }

    // --- declarations ---

    fn compilation_unit(&mut self) -> PResult<NodeId> {
        let package = if self.at(TokenKind::PackageKw) {
            Some(self.package_decl()?)
        } else {
            None
        };

        let anchor = self.last_end;
        let mut imports = Vec::new();
        while self.at(TokenKind::ImportKw) {
            imports.push(self.import_decl()?);
        }
        let imports = self.seq(NodeKind::ImportList, None, imports, anchor);

        let anchor = self.last_end;
        let mut types = Vec::new();
        while !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Semicolon) {
                let start = self.current_start();
                self.bump();
                types.push(self.node(NodeKind::EmptyDecl, None, Vec::new(), start));
            } else {
                types.push(self.type_decl()?);
            }
        }
        let types = self.seq(NodeKind::TypeDeclList, None, types, anchor);

        let end = TextSize::from(self.input.len() as u32);
        Ok(self.arena.alloc(NodeData {
            kind: NodeKind::CompilationUnit,
            text: None,
            children: vec![package, Some(imports), Some(types)],
            origin: Origin::Source(TextRange::new(TextSize::from(0), end)),
        }))
    }

    fn package_decl(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.bump();
        let name = self.qualified_name()?;
        self.expect(TokenKind::Semicolon, "expected `;` after package declaration")?;
        Ok(self.node(NodeKind::PackageDecl, None, vec![Some(name)], start))
    }

    fn import_decl(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.bump();
        let is_static = self.eat(TokenKind::StaticKw);

        let name_start = self.current_start();
        let mut name = self.name()?;
        while self.at(TokenKind::Dot) {
            if self.nth(1) == TokenKind::Star {
                self.bump();
                let star = self.bump();
                let star = self.leaf(NodeKind::Name, star);
                name = self.node(NodeKind::FieldAccess, None, vec![Some(name), Some(star)], name_start);
                break;
            }
            self.bump();
            let segment = self.name()?;
            name = self.node(NodeKind::FieldAccess, None, vec![Some(name), Some(segment)], name_start);
        }
        self.expect(TokenKind::Semicolon, "expected `;` after import")?;

        let text = is_static.then(|| SmolStr::new_inline("static"));
        Ok(self.node(NodeKind::ImportDecl, text, vec![Some(name)], start))
    }

    fn type_decl(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        let modifiers = self.modifiers()?;
        self.class_like(start, modifiers)
    }

    fn at_class_keyword(&self) -> bool {
        match self.current() {
            TokenKind::ClassKw | TokenKind::InterfaceKw | TokenKind::EnumKw => true,
            TokenKind::At => self.nth(1) == TokenKind::InterfaceKw,
            _ => false,
        }
    }

    fn class_like(&mut self, start: TextSize, modifiers: NodeId) -> PResult<NodeId> {
        let flavour = match self.current() {
            TokenKind::ClassKw => "class",
            TokenKind::InterfaceKw => "interface",
            TokenKind::EnumKw => "enum",
            TokenKind::At if self.nth(1) == TokenKind::InterfaceKw => {
                self.bump();
                "@interface"
            }
            _ => return Err(self.error_here("expected `class`, `interface` or `enum`")),
        };
        self.bump();

        let name = self.name()?;
        let type_parameters = if self.at(TokenKind::Less) {
            self.type_parameters()?
        } else {
            self.empty(NodeKind::TypeParameterList, None, self.last_end)
        };

        let extends = if flavour == "class" && self.eat(TokenKind::ExtendsKw) {
            Some(self.ty()?)
        } else {
            None
        };

        let implements = match flavour {
            "interface" | "@interface" => self.type_list("extends", TokenKind::ExtendsKw)?,
            _ => self.type_list("implements", TokenKind::ImplementsKw)?,
        };

        let body = if flavour == "enum" {
            self.enum_body()?
        } else {
            self.member_list()?
        };

        Ok(self.node(
            NodeKind::ClassDecl,
            Some(SmolStr::new_inline(flavour)),
            vec![
                Some(modifiers),
                Some(name),
                Some(type_parameters),
                extends,
                Some(implements),
                Some(body),
            ],
            start,
        ))
    }

    fn type_list(&mut self, keyword: &'static str, kw: TokenKind) -> PResult<NodeId> {
        if !self.at(kw) {
            return Ok(self.empty(NodeKind::TypeList, Some(SmolStr::new_inline(keyword)), self.last_end));
        }
        let start = self.current_start();
        self.bump();
        let mut items = vec![self.ty()?];
        while self.eat(TokenKind::Comma) {
            items.push(self.ty()?);
        }
        Ok(self.node(
            NodeKind::TypeList,
            Some(SmolStr::new_inline(keyword)),
            items.into_iter().map(Some).collect(),
            start,
        ))
    }

    fn member_list(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::LBrace, "expected `{`")?;
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            members.push(Some(self.class_member()?));
        }
        self.expect(TokenKind::RBrace, "expected `}`")?;
        Ok(self.node(NodeKind::MemberList, None, members, start))
    }

    fn enum_body(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::LBrace, "expected `{`")?;

        let anchor = self.last_end;
        let mut constants = Vec::new();
        while self.at(TokenKind::Identifier) {
            constants.push(self.enum_constant()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let constants = self.seq(NodeKind::EnumConstantList, None, constants, anchor);

        let mut members = Vec::new();
        if self.eat(TokenKind::Semicolon) {
            while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
                members.push(self.class_member()?);
            }
        }
        let members = self.seq(NodeKind::BodyDeclList, None, members, self.last_end);

        self.expect(TokenKind::RBrace, "expected `}`")?;
        Ok(self.node(NodeKind::EnumBody, None, vec![Some(constants), Some(members)], start))
    }

    fn enum_constant(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        let name = self.name()?;
        let arguments = if self.at(TokenKind::LParen) {
            Some(self.argument_list()?)
        } else {
            None
        };
        let body = if self.at(TokenKind::LBrace) {
            Some(self.member_list()?)
        } else {
            None
        };
        Ok(self.node(NodeKind::EnumConstant, None, vec![Some(name), arguments, body], start))
    }

    pub(crate) fn class_member(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        match self.current() {
            TokenKind::Semicolon => {
                self.bump();
                return Ok(self.node(NodeKind::EmptyDecl, None, Vec::new(), start));
            }
            TokenKind::LBrace => {
                let body = self.block()?;
                return Ok(self.node(NodeKind::InitializerBlock, None, vec![Some(body)], start));
            }
            TokenKind::StaticKw if self.nth(1) == TokenKind::LBrace => {
                self.bump();
                let body = self.block()?;
                return Ok(self.node(
                    NodeKind::InitializerBlock,
                    Some(SmolStr::new_inline("static")),
                    vec![Some(body)],
                    start,
                ));
            }
            _ => {}
        }

        let modifiers = self.modifiers()?;
        if self.at_class_keyword() {
            return self.class_like(start, modifiers);
        }

        let type_parameters = if self.at(TokenKind::Less) {
            self.type_parameters()?
        } else {
            self.empty(NodeKind::TypeParameterList, None, self.current_start())
        };

        if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::LParen {
            return self.method_rest(start, modifiers, type_parameters, None);
        }

        let ty = self.ty()?;
        if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::LParen {
            return self.method_rest(start, modifiers, type_parameters, Some(ty));
        }

        let name = self.name()?;
        let initializer = if self.eat(TokenKind::Eq) {
            Some(self.variable_initializer()?)
        } else {
            None
        };
        self.declarator_end()?;
        Ok(self.node(
            NodeKind::Variable,
            None,
            vec![Some(modifiers), Some(ty), Some(name), initializer],
            start,
        ))
    }

    fn declarator_end(&mut self) -> PResult<()> {
        if self.at(TokenKind::Comma) {
            return Err(self.error_here("multiple declarators in one declaration are not supported"));
        }
        if self.at(TokenKind::LBracket) {
            return Err(self.error_here("array dimensions after a declarator name are not supported"));
        }
        self.expect(TokenKind::Semicolon, "expected `;` after declaration")?;
        Ok(())
    }

    fn method_rest(
        &mut self,
        start: TextSize,
        modifiers: NodeId,
        type_parameters: NodeId,
        return_type: Option<NodeId>,
    ) -> PResult<NodeId> {
        let name = self.name()?;
        let parameters = self.parameter_list()?;
        let throws = self.type_list("throws", TokenKind::ThrowsKw)?;

        let mut default_value = None;
        let body = if self.at(TokenKind::LBrace) {
            Some(self.block()?)
        } else {
            if self.eat(TokenKind::DefaultKw) {
                default_value = Some(self.variable_initializer()?);
            }
            self.expect(TokenKind::Semicolon, "expected `;` or method body")?;
            None
        };

        Ok(self.node(
            NodeKind::MethodDecl,
            None,
            vec![
                Some(modifiers),
                Some(type_parameters),
                return_type,
                Some(name),
                Some(parameters),
                Some(throws),
                body,
                default_value,
            ],
            start,
        ))
    }

    fn modifiers(&mut self) -> PResult<NodeId> {
        let anchor = self.current_start();
        let mut items = Vec::new();
        loop {
            let kind = self.current();
            if kind.is_modifier_keyword()
                && !(kind == TokenKind::DefaultKw && self.nth(1) == TokenKind::Colon)
                && !(kind == TokenKind::SynchronizedKw && self.nth(1) == TokenKind::LParen)
            {
                let token = self.bump();
                items.push(self.leaf(NodeKind::Modifier, token));
            } else if self.at(TokenKind::At) && self.nth(1) != TokenKind::InterfaceKw {
                items.push(self.annotation()?);
            } else {
                break;
            }
        }
        Ok(self.seq(NodeKind::ModifierList, None, items, anchor))
    }

    /// `final` and annotations, as allowed on locals and parameters.
    fn local_modifiers(&mut self) -> PResult<NodeId> {
        let anchor = self.current_start();
        let mut items = Vec::new();
        loop {
            if self.at(TokenKind::FinalKw) {
                let token = self.bump();
                items.push(self.leaf(NodeKind::Modifier, token));
            } else if self.at(TokenKind::At) {
                items.push(self.annotation()?);
            } else {
                break;
            }
        }
        Ok(self.seq(NodeKind::ModifierList, None, items, anchor))
    }

    fn annotation(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::At, "expected `@`")?;
        let name = self.qualified_name()?;
        let arguments = if self.at(TokenKind::LParen) {
            let args_start = self.current_start();
            self.bump();
            let mut items = Vec::new();
            if !self.at(TokenKind::RParen) {
                loop {
                    if self.at(TokenKind::At) {
                        return Err(self.error_here("nested annotations are not supported"));
                    }
                    items.push(Some(self.variable_initializer()?));
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "expected `)` after annotation arguments")?;
            self.node(NodeKind::AnnotationArgList, None, items, args_start)
        } else {
            self.empty(NodeKind::AnnotationArgList, None, self.last_end)
        };
        Ok(self.node(NodeKind::Annotation, None, vec![Some(name), Some(arguments)], start))
    }

    fn type_parameters(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::Less, "expected `<`")?;
        let mut items = Vec::new();
        loop {
            let param_start = self.current_start();
            let name = self.name()?;
            let bounds = if self.at(TokenKind::ExtendsKw) {
                let bounds_start = self.current_start();
                self.bump();
                let mut bounds = vec![Some(self.ty()?)];
                while self.eat(TokenKind::Amp) {
                    bounds.push(Some(self.ty()?));
                }
                self.node(
                    NodeKind::BoundList,
                    Some(SmolStr::new_inline("extends")),
                    bounds,
                    bounds_start,
                )
            } else {
                self.empty(
                    NodeKind::BoundList,
                    Some(SmolStr::new_inline("extends")),
                    self.last_end,
                )
            };
            items.push(Some(self.node(
                NodeKind::TypeParameter,
                None,
                vec![Some(name), Some(bounds)],
                param_start,
            )));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Greater, "expected `>`")?;
        Ok(self.node(NodeKind::TypeParameterList, None, items, start))
    }

    fn parameter_list(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::LParen, "expected `(`")?;
        let mut items = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                items.push(Some(self.parameter()?));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected `)` after parameters")?;
        Ok(self.node(NodeKind::ParameterList, None, items, start))
    }

    fn parameter(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        let modifiers = self.local_modifiers()?;
        let type_start = self.current_start();
        let mut ty = self.ty()?;
        if self.eat(TokenKind::Ellipsis) {
            ty = self.node(
                NodeKind::ArrayType,
                Some(SmolStr::new_inline("...")),
                vec![Some(ty)],
                type_start,
            );
        }
        let name = self.name()?;
        Ok(self.node(
            NodeKind::Variable,
            None,
            vec![Some(modifiers), Some(ty), Some(name), None],
            start,
        ))
    }

    fn argument_list(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::LParen, "expected `(`")?;
        let mut items = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                items.push(Some(self.expression(0)?));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected `)` after arguments")?;
        Ok(self.node(NodeKind::ArgumentList, None, items, start))
    }

    // --- types ---

    fn ty(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        let mut ty = match self.current() {
            kind if kind.is_primitive_type() || kind == TokenKind::VoidKw => {
                let token = self.bump();
                self.leaf(NodeKind::PrimitiveType, token)
            }
            TokenKind::Question => return self.wildcard(),
            TokenKind::Identifier => {
                let mut name = self.name()?;
                while self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Identifier {
                    self.bump();
                    let segment = self.name()?;
                    name = self.node(NodeKind::FieldAccess, None, vec![Some(name), Some(segment)], start);
                }
                if self.at(TokenKind::Less) {
                    let arguments = self.type_arguments()?;
                    name = self.node(
                        NodeKind::ParameterizedType,
                        None,
                        vec![Some(name), Some(arguments)],
                        start,
                    );
                }
                name
            }
            _ => return Err(self.error_here("expected type")),
        };

        while self.at(TokenKind::LBracket) && self.nth(1) == TokenKind::RBracket {
            self.bump();
            self.bump();
            ty = self.node(NodeKind::ArrayType, Some(SmolStr::new_inline("[]")), vec![Some(ty)], start);
        }
        Ok(ty)
    }

    fn wildcard(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.bump();
        let (text, bound) = match self.current() {
            TokenKind::ExtendsKw => {
                self.bump();
                (Some(SmolStr::new_inline("extends")), Some(self.ty()?))
            }
            TokenKind::SuperKw => {
                self.bump();
                (Some(SmolStr::new_inline("super")), Some(self.ty()?))
            }
            _ => (None, None),
        };
        Ok(self.node(NodeKind::Wildcard, text, vec![bound], start))
    }

    fn type_arguments(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::Less, "expected `<`")?;
        let mut items = Vec::new();
        if !self.at(TokenKind::Greater) {
            loop {
                items.push(Some(self.ty()?));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::Greater, "expected `>` after type arguments")?;
        Ok(self.node(NodeKind::TypeArgumentList, None, items, start))
    }

    // --- statements ---

    pub(crate) fn block(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::LBrace, "expected `{`")?;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            statements.push(Some(self.statement()?));
        }
        self.expect(TokenKind::RBrace, "expected `}`")?;
        Ok(self.node(NodeKind::Block, None, statements, start))
    }

    pub(crate) fn statement(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        match self.current() {
            TokenKind::LBrace => self.block(),
            TokenKind::Semicolon => {
                self.bump();
                Ok(self.node(NodeKind::EmptyStatement, None, Vec::new(), start))
            }
            TokenKind::IfKw => {
                self.bump();
                let condition = self.paren_expression()?;
                let then = self.statement()?;
                let otherwise = if self.eat(TokenKind::ElseKw) {
                    Some(self.statement()?)
                } else {
                    None
                };
                Ok(self.node(NodeKind::If, None, vec![Some(condition), Some(then), otherwise], start))
            }
            TokenKind::WhileKw => {
                self.bump();
                let condition = self.paren_expression()?;
                let body = self.statement()?;
                Ok(self.node(NodeKind::While, None, vec![Some(condition), Some(body)], start))
            }
            TokenKind::DoKw => {
                self.bump();
                let body = self.statement()?;
                self.expect(TokenKind::WhileKw, "expected `while` after `do` body")?;
                let condition = self.paren_expression()?;
                self.expect(TokenKind::Semicolon, "expected `;`")?;
                Ok(self.node(NodeKind::DoWhile, None, vec![Some(body), Some(condition)], start))
            }
            TokenKind::ForKw => self.for_statement(),
            TokenKind::ReturnKw => {
                self.bump();
                let value = if self.at(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expression(0)?)
                };
                self.expect(TokenKind::Semicolon, "expected `;` after return")?;
                Ok(self.node(NodeKind::Return, None, vec![value], start))
            }
            TokenKind::BreakKw | TokenKind::ContinueKw => {
                let kind = if self.at(TokenKind::BreakKw) {
                    NodeKind::Break
                } else {
                    NodeKind::Continue
                };
                self.bump();
                let label = if self.at(TokenKind::Identifier) {
                    Some(self.name()?)
                } else {
                    None
                };
                self.expect(TokenKind::Semicolon, "expected `;`")?;
                Ok(self.node(kind, None, vec![label], start))
            }
            TokenKind::ThrowKw => {
                self.bump();
                let value = self.expression(0)?;
                self.expect(TokenKind::Semicolon, "expected `;` after throw")?;
                Ok(self.node(NodeKind::Throw, None, vec![Some(value)], start))
            }
            TokenKind::TryKw => self.try_statement(),
            TokenKind::SwitchKw => self.switch_statement(),
            TokenKind::SynchronizedKw if self.nth(1) == TokenKind::LParen => {
                self.bump();
                let lock = self.paren_expression()?;
                let body = self.block()?;
                Ok(self.node(NodeKind::Synchronized, None, vec![Some(lock), Some(body)], start))
            }
            TokenKind::AssertKw => {
                self.bump();
                let condition = self.expression(0)?;
                let detail = if self.eat(TokenKind::Colon) {
                    Some(self.expression(0)?)
                } else {
                    None
                };
                self.expect(TokenKind::Semicolon, "expected `;` after assert")?;
                Ok(self.node(NodeKind::Assert, None, vec![Some(condition), detail], start))
            }
            TokenKind::Identifier if self.nth(1) == TokenKind::Colon => {
                let label = self.name()?;
                self.bump();
                let body = self.statement()?;
                Ok(self.node(NodeKind::Labeled, None, vec![Some(label), Some(body)], start))
            }
            _ if self.at_local_class_start() => {
                let modifiers = self.modifiers()?;
                self.class_like(start, modifiers)
            }
            _ if self.at_local_var_decl_start() => self.local_variable(start),
            _ => {
                let expression = self.expression(0)?;
                self.expect(TokenKind::Semicolon, "expected `;` after expression")?;
                Ok(self.node(NodeKind::ExpressionStatement, None, vec![Some(expression)], start))
            }
        }
    }

    fn local_variable(&mut self, start: TextSize) -> PResult<NodeId> {
        let modifiers = self.local_modifiers()?;
        let ty = self.ty()?;
        let name = self.name()?;
        let initializer = if self.eat(TokenKind::Eq) {
            Some(self.variable_initializer()?)
        } else {
            None
        };
        self.declarator_end()?;
        Ok(self.node(
            NodeKind::Variable,
            None,
            vec![Some(modifiers), Some(ty), Some(name), initializer],
            start,
        ))
    }

    fn for_statement(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.bump();
        self.expect(TokenKind::LParen, "expected `(` after `for`")?;

        let init_anchor = self.last_end;
        let mut init = Vec::new();
        if self.at_local_var_decl_start() {
            let var_start = self.current_start();
            let modifiers = self.local_modifiers()?;
            let ty = self.ty()?;
            let name = self.name()?;
            if self.eat(TokenKind::Colon) {
                let variable = self.node(
                    NodeKind::Variable,
                    None,
                    vec![Some(modifiers), Some(ty), Some(name), None],
                    var_start,
                );
                let iterable = self.expression(0)?;
                self.expect(TokenKind::RParen, "expected `)`")?;
                let body = self.statement()?;
                return Ok(self.node(
                    NodeKind::ForEach,
                    None,
                    vec![Some(variable), Some(iterable), Some(body)],
                    start,
                ));
            }
            let initializer = if self.eat(TokenKind::Eq) {
                Some(self.variable_initializer()?)
            } else {
                None
            };
            if self.at(TokenKind::Comma) {
                return Err(self.error_here("multiple declarators in one declaration are not supported"));
            }
            init.push(self.node(
                NodeKind::Variable,
                None,
                vec![Some(modifiers), Some(ty), Some(name), initializer],
                var_start,
            ));
        } else if !self.at(TokenKind::Semicolon) {
            loop {
                let expr_start = self.current_start();
                let expression = self.expression(0)?;
                init.push(self.node(NodeKind::ExpressionStatement, None, vec![Some(expression)], expr_start));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        let init = self.seq(NodeKind::ForInitList, None, init, init_anchor);
        self.expect(TokenKind::Semicolon, "expected `;` in for header")?;

        let condition = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression(0)?)
        };
        self.expect(TokenKind::Semicolon, "expected `;` in for header")?;

        let update_anchor = self.last_end;
        let mut update = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                update.push(self.expression(0)?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        let update = self.seq(NodeKind::ExpressionList, None, update, update_anchor);
        self.expect(TokenKind::RParen, "expected `)` after for header")?;

        let body = self.statement()?;
        Ok(self.node(
            NodeKind::For,
            None,
            vec![Some(init), condition, Some(update), Some(body)],
            start,
        ))
    }

    fn try_statement(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.bump();
        if self.at(TokenKind::LParen) {
            return Err(self.error_here("try-with-resources is not supported"));
        }
        let body = self.block()?;

        let anchor = self.last_end;
        let mut catches = Vec::new();
        while self.at(TokenKind::CatchKw) {
            let catch_start = self.current_start();
            self.bump();
            self.expect(TokenKind::LParen, "expected `(` after `catch`")?;
            let var_start = self.current_start();
            let modifiers = self.local_modifiers()?;
            let ty = self.ty()?;
            if self.at(TokenKind::Pipe) {
                return Err(self.error_here("multi-catch is not supported"));
            }
            let name = self.name()?;
            let parameter = self.node(
                NodeKind::Variable,
                None,
                vec![Some(modifiers), Some(ty), Some(name), None],
                var_start,
            );
            self.expect(TokenKind::RParen, "expected `)`")?;
            let catch_body = self.block()?;
            catches.push(self.node(
                NodeKind::Catch,
                None,
                vec![Some(parameter), Some(catch_body)],
                catch_start,
            ));
        }
        let has_catches = !catches.is_empty();
        let catches = self.seq(NodeKind::CatchList, None, catches, anchor);

        let finally = if self.eat(TokenKind::FinallyKw) {
            Some(self.block()?)
        } else {
            None
        };
        if !has_catches && finally.is_none() {
            return Err(self.error_here("expected `catch` or `finally`"));
        }
        Ok(self.node(NodeKind::Try, None, vec![Some(body), Some(catches), finally], start))
    }

    fn switch_statement(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.bump();
        let selector = self.paren_expression()?;

        let cases_start = self.current_start();
        self.expect(TokenKind::LBrace, "expected `{` after switch selector")?;
        let mut cases = Vec::new();
        while self.at(TokenKind::CaseKw) || self.at(TokenKind::DefaultKw) {
            let case_start = self.current_start();
            let label = if self.eat(TokenKind::CaseKw) {
                Some(self.expression(0)?)
            } else {
                self.bump();
                None
            };
            if self.at(TokenKind::Arrow) {
                return Err(self.error_here("arrow-form switch cases are not supported"));
            }
            self.expect(TokenKind::Colon, "expected `:` after case label")?;

            let anchor = self.last_end;
            let mut statements = Vec::new();
            while !matches!(
                self.current(),
                TokenKind::CaseKw | TokenKind::DefaultKw | TokenKind::RBrace | TokenKind::Eof
            ) {
                statements.push(self.statement()?);
            }
            let statements = self.seq(NodeKind::StatementList, None, statements, anchor);
            cases.push(Some(self.node(
                NodeKind::Case,
                None,
                vec![label, Some(statements)],
                case_start,
            )));
        }
        self.expect(TokenKind::RBrace, "expected `}` after switch body")?;
        let cases = self.node(NodeKind::CaseList, None, cases, cases_start);
        Ok(self.node(NodeKind::Switch, None, vec![Some(selector), Some(cases)], start))
    }

    fn paren_expression(&mut self) -> PResult<NodeId> {
        self.expect(TokenKind::LParen, "expected `(`")?;
        let expression = self.expression(0)?;
        self.expect(TokenKind::RParen, "expected `)`")?;
        Ok(expression)
    }

    fn variable_initializer(&mut self) -> PResult<NodeId> {
        if self.at(TokenKind::LBrace) {
            self.array_init()
        } else {
            self.expression(0)
        }
    }

    fn array_init(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.expect(TokenKind::LBrace, "expected `{`")?;
        let mut items = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            items.push(Some(self.variable_initializer()?));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "expected `}` after array initializer")?;
        Ok(self.node(NodeKind::ArrayInit, None, items, start))
    }

    // --- expressions ---

    pub(crate) fn expression(&mut self, min_bp: u8) -> PResult<NodeId> {
        let start = self.current_start();
        let mut lhs = self.primary()?;

        loop {
            match self.current() {
                TokenKind::Dot => {
                    let name = match self.nth(1) {
                        TokenKind::Identifier => {
                            self.bump();
                            self.name()?
                        }
                        TokenKind::ClassKw | TokenKind::ThisKw => {
                            self.bump();
                            let token = self.bump();
                            self.leaf(NodeKind::Name, token)
                        }
                        _ => return Err(self.error_here("unsupported member select")),
                    };
                    lhs = self.node(NodeKind::FieldAccess, None, vec![Some(lhs), Some(name)], start);
                    continue;
                }
                TokenKind::LParen => {
                    if !matches!(self.arena.get(lhs).kind, NodeKind::Name | NodeKind::FieldAccess) {
                        return Err(self.error_here("unexpected `(`"));
                    }
                    let arguments = self.argument_list()?;
                    lhs = self.node(NodeKind::MethodCall, None, vec![Some(lhs), Some(arguments)], start);
                    continue;
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.expression(0)?;
                    self.expect(TokenKind::RBracket, "expected `]`")?;
                    lhs = self.node(NodeKind::ArrayAccess, None, vec![Some(lhs), Some(index)], start);
                    continue;
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let token = self.bump();
                    let op = SmolStr::new(token.text(self.input));
                    lhs = self.node(NodeKind::Postfix, Some(op), vec![Some(lhs)], start);
                    continue;
                }
                TokenKind::ColonColon | TokenKind::Arrow => {
                    return Err(self.error_here("lambdas and method references are not supported"));
                }
                _ => {}
            }

            if let Some((op, tokens, l_bp, r_bp, kind)) = self.infix_operator() {
                if l_bp < min_bp {
                    break;
                }
                for _ in 0..tokens {
                    self.bump();
                }
                let rhs = self.expression(r_bp)?;
                lhs = self.node(kind, Some(SmolStr::new(op)), vec![Some(lhs), Some(rhs)], start);
                continue;
            }

            if self.at(TokenKind::InstanceofKw) {
                if 50 < min_bp {
                    break;
                }
                self.bump();
                let ty = self.ty()?;
                lhs = self.node(NodeKind::InstanceOf, None, vec![Some(lhs), Some(ty)], start);
                continue;
            }

            if self.at(TokenKind::Question) {
                let (l_bp, r_bp) = (2, 1);
                if l_bp < min_bp {
                    break;
                }
                self.bump();
                let then = self.expression(0)?;
                self.expect(TokenKind::Colon, "expected `:` in conditional expression")?;
                let otherwise = self.expression(r_bp)?;
                lhs = self.node(
                    NodeKind::Conditional,
                    None,
                    vec![Some(lhs), Some(then), Some(otherwise)],
                    start,
                );
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn primary(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        match self.current() {
            kind if kind.is_literal() => {
                let token = self.bump();
                Ok(self.leaf(NodeKind::Literal, token))
            }
            TokenKind::ThisKw | TokenKind::SuperKw => {
                let token = self.bump();
                Ok(self.leaf(NodeKind::Name, token))
            }
            TokenKind::Identifier => {
                if self.nth(1) == TokenKind::Arrow {
                    return Err(self.error_here("lambdas and method references are not supported"));
                }
                self.name()
            }
            TokenKind::NewKw => self.new_expression(),
            TokenKind::LBrace => self.array_init(),
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => {
                let token = self.bump();
                let op = SmolStr::new(token.text(self.input));
                let operand = self.expression(100)?;
                Ok(self.node(NodeKind::Unary, Some(op), vec![Some(operand)], start))
            }
            kind if kind.is_primitive_type() || kind == TokenKind::VoidKw => self.ty(),
            TokenKind::LParen => {
                if self.is_cast() {
                    self.bump();
                    let ty = self.ty()?;
                    self.expect(TokenKind::RParen, "expected `)` in cast")?;
                    let operand = self.expression(100)?;
                    Ok(self.node(NodeKind::Cast, None, vec![Some(ty), Some(operand)], start))
                } else {
                    self.bump();
                    let inner = self.expression(0)?;
                    self.expect(TokenKind::RParen, "expected `)`")?;
                    Ok(self.node(NodeKind::Parens, None, vec![Some(inner)], start))
                }
            }
            _ => Err(self.error_here("expected expression")),
        }
    }

    fn new_expression(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        self.bump();

        let type_start = self.current_start();
        let mut ty = if self.current().is_primitive_type() {
            let token = self.bump();
            self.leaf(NodeKind::PrimitiveType, token)
        } else {
            let mut name = self.name()?;
            while self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Identifier {
                self.bump();
                let segment = self.name()?;
                name = self.node(NodeKind::FieldAccess, None, vec![Some(name), Some(segment)], type_start);
            }
            if self.at(TokenKind::Less) {
                let arguments = self.type_arguments()?;
                name = self.node(
                    NodeKind::ParameterizedType,
                    None,
                    vec![Some(name), Some(arguments)],
                    type_start,
                );
            }
            name
        };

        if self.at(TokenKind::LBracket) {
            self.bump();
            if self.eat(TokenKind::RBracket) {
                while self.at(TokenKind::LBracket) && self.nth(1) == TokenKind::RBracket {
                    self.bump();
                    self.bump();
                    ty = self.node(NodeKind::ArrayType, Some(SmolStr::new_inline("[]")), vec![Some(ty)], type_start);
                }
                if !self.at(TokenKind::LBrace) {
                    return Err(self.error_here("expected array initializer"));
                }
                let init = self.array_init()?;
                return Ok(self.node(NodeKind::NewArray, None, vec![Some(ty), None, Some(init)], start));
            }
            let dimension = self.expression(0)?;
            self.expect(TokenKind::RBracket, "expected `]`")?;
            if self.at(TokenKind::LBracket) {
                return Err(self.error_here("multi-dimensional array creation is not supported"));
            }
            return Ok(self.node(NodeKind::NewArray, None, vec![Some(ty), Some(dimension), None], start));
        }

        let arguments = self.argument_list()?;
        let body = if self.at(TokenKind::LBrace) {
            Some(self.member_list()?)
        } else {
            None
        };
        Ok(self.node(NodeKind::NewClass, None, vec![Some(ty), Some(arguments), body], start))
    }

    /// Binary or assignment operator at the cursor: `(text, token count, l_bp, r_bp, kind)`.
    fn infix_operator(&self) -> Option<(&'static str, usize, u8, u8, NodeKind)> {
        use NodeKind::{Assign, Binary};
        let (op, tokens): (&'static str, usize) = match self.current() {
            TokenKind::Greater => {
                let mut run = 1;
                while run < 3 && self.adjacent(run) && self.nth(run) == TokenKind::Greater {
                    run += 1;
                }
                let assign = self.adjacent(run) && self.nth(run) == TokenKind::Eq;
                match (run, assign) {
                    (1, false) => (">", 1),
                    (1, true) => (">=", 2),
                    (2, false) => (">>", 2),
                    (2, true) => (">>=", 3),
                    (_, false) => (">>>", 3),
                    (_, true) => (">>>=", 4),
                }
            }
            TokenKind::Star => ("*", 1),
            TokenKind::Slash => ("/", 1),
            TokenKind::Percent => ("%", 1),
            TokenKind::Plus => ("+", 1),
            TokenKind::Minus => ("-", 1),
            TokenKind::LeftShift => ("<<", 1),
            TokenKind::Less => ("<", 1),
            TokenKind::LessEq => ("<=", 1),
            TokenKind::EqEq => ("==", 1),
            TokenKind::BangEq => ("!=", 1),
            TokenKind::Amp => ("&", 1),
            TokenKind::Caret => ("^", 1),
            TokenKind::Pipe => ("|", 1),
            TokenKind::AmpAmp => ("&&", 1),
            TokenKind::PipePipe => ("||", 1),
            TokenKind::Eq => ("=", 1),
            TokenKind::PlusEq => ("+=", 1),
            TokenKind::MinusEq => ("-=", 1),
            TokenKind::StarEq => ("*=", 1),
            TokenKind::SlashEq => ("/=", 1),
            TokenKind::PercentEq => ("%=", 1),
            TokenKind::AmpEq => ("&=", 1),
            TokenKind::PipeEq => ("|=", 1),
            TokenKind::CaretEq => ("^=", 1),
            TokenKind::LeftShiftEq => ("<<=", 1),
            _ => return None,
        };

        // Larger = tighter binding.
        let (l_bp, r_bp, kind) = match op {
            "*" | "/" | "%" => (70, 71, Binary),
            "+" | "-" => (60, 61, Binary),
            "<<" | ">>" | ">>>" => (55, 56, Binary),
            "<" | "<=" | ">" | ">=" => (50, 51, Binary),
            "==" | "!=" => (45, 46, Binary),
            "&" => (40, 41, Binary),
            "^" => (39, 40, Binary),
            "|" => (38, 39, Binary),
            "&&" => (30, 31, Binary),
            "||" => (20, 21, Binary),
            // Assignment (right-associative).
            _ => (1, 0, Assign),
        };
        Some((op, tokens, l_bp, r_bp, kind))
    }

    /// Whether the token `n` ahead starts exactly where the previous one ends.
    fn adjacent(&self, n: usize) -> bool {
        match (self.tokens.get(self.pos + n - 1), self.tokens.get(self.pos + n)) {
            (Some(prev), Some(next)) => prev.range.end() == next.range.start(),
            _ => false,
        }
    }

    fn is_cast(&self) -> bool {
        let mut i = self.pos + 1;
        let first = self.kind_at(i);
        if first.is_primitive_type() {
            i = self.skip_dims(i + 1);
            return self.kind_at(i) == TokenKind::RParen;
        }
        if first != TokenKind::Identifier {
            return false;
        }
        let Some(after_type) = self.skip_reference_type(i) else {
            return false;
        };
        if self.kind_at(after_type) != TokenKind::RParen {
            return false;
        }
        matches!(
            self.kind_at(after_type + 1),
            TokenKind::Identifier
                | TokenKind::LParen
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::ThisKw
                | TokenKind::SuperKw
                | TokenKind::NewKw
        ) || self.kind_at(after_type + 1).is_literal()
    }

    fn at_local_class_start(&self) -> bool {
        let mut i = self.pos;
        loop {
            match self.kind_at(i) {
                TokenKind::FinalKw | TokenKind::AbstractKw | TokenKind::StaticKw | TokenKind::StrictfpKw => i += 1,
                TokenKind::At if self.kind_at(i + 1) != TokenKind::InterfaceKw => {
                    match self.skip_annotation(i) {
                        Some(next) => i = next,
                        None => return false,
                    }
                }
                TokenKind::ClassKw | TokenKind::InterfaceKw | TokenKind::EnumKw => return true,
                _ => return false,
            }
        }
    }

    fn at_local_var_decl_start(&self) -> bool {
        let mut i = self.pos;

        // Local variable modifiers: `final` + annotations.
        loop {
            match self.kind_at(i) {
                TokenKind::FinalKw => i += 1,
                TokenKind::At => match self.skip_annotation(i) {
                    Some(next) => i = next,
                    None => return false,
                },
                _ => break,
            }
        }

        let first = self.kind_at(i);
        if first.is_primitive_type() {
            i = self.skip_dims(i + 1);
        } else if first == TokenKind::Identifier {
            match self.skip_reference_type(i) {
                Some(next) => i = next,
                None => return false,
            }
        } else {
            return false;
        }

        self.kind_at(i) == TokenKind::Identifier
            && matches!(
                self.kind_at(i + 1),
                TokenKind::Eq
                    | TokenKind::Semicolon
                    | TokenKind::Comma
                    | TokenKind::Colon
                    | TokenKind::LBracket
            )
    }

    fn skip_annotation(&self, mut i: usize) -> Option<usize> {
        i += 1;
        if self.kind_at(i) != TokenKind::Identifier {
            return None;
        }
        i += 1;
        while self.kind_at(i) == TokenKind::Dot && self.kind_at(i + 1) == TokenKind::Identifier {
            i += 2;
        }
        if self.kind_at(i) == TokenKind::LParen {
            let mut depth = 0usize;
            loop {
                match self.kind_at(i) {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => {
                        depth -= 1;
                        if depth == 0 {
                            i += 1;
                            break;
                        }
                    }
                    TokenKind::Eof => return None,
                    _ => {}
                }
                i += 1;
            }
        }
        Some(i)
    }

    /// Skip `Name(.Name)*[<...>]([])*` starting at an identifier.
    fn skip_reference_type(&self, mut i: usize) -> Option<usize> {
        i += 1;
        while self.kind_at(i) == TokenKind::Dot && self.kind_at(i + 1) == TokenKind::Identifier {
            i += 2;
        }
        if self.kind_at(i) == TokenKind::Less {
            i = self.skip_type_arguments(i)?;
        }
        Some(self.skip_dims(i))
    }

    fn skip_type_arguments(&self, mut i: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            match self.kind_at(i) {
                TokenKind::Less => depth += 1,
                TokenKind::Greater => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                TokenKind::Identifier
                | TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::Question
                | TokenKind::ExtendsKw
                | TokenKind::SuperKw
                | TokenKind::Amp
                | TokenKind::LBracket
                | TokenKind::RBracket => {}
                kind if kind.is_primitive_type() => {}
                _ => return None,
            }
            i += 1;
        }
    }

    fn skip_dims(&self, mut i: usize) -> usize {
        while self.kind_at(i) == TokenKind::LBracket && self.kind_at(i + 1) == TokenKind::RBracket {
            i += 2;
        }
        i
    }

    // --- token plumbing ---

    fn kind_at(&self, i: usize) -> TokenKind {
        self.tokens.get(i).map_or(TokenKind::Eof, |t| t.kind)
    }

    fn current(&self) -> TokenKind {
        self.kind_at(self.pos)
    }

    fn nth(&self, n: usize) -> TokenKind {
        self.kind_at(self.pos + n)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    fn current_start(&self) -> TextSize {
        self.tokens
            .get(self.pos)
            .map_or(TextSize::from(self.input.len() as u32), |t| t.range.start())
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)];
        if token.kind != TokenKind::Eof {
            self.pos += 1;
            self.last_end = token.range.end();
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> PResult<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error_here(message))
        }
    }

    fn error_here(&self, message: &str) -> ParseError {
        let range = self
            .tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.current_start()), |t| t.range);
        ParseError::new(message, range)
    }

    fn name(&mut self) -> PResult<NodeId> {
        let token = self.expect(TokenKind::Identifier, "expected identifier")?;
        Ok(self.leaf(NodeKind::Name, token))
    }

    fn qualified_name(&mut self) -> PResult<NodeId> {
        let start = self.current_start();
        let mut name = self.name()?;
        while self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Identifier {
            self.bump();
            let segment = self.name()?;
            name = self.node(NodeKind::FieldAccess, None, vec![Some(name), Some(segment)], start);
        }
        Ok(name)
    }

    // --- node allocation ---

    fn node(
        &mut self,
        kind: NodeKind,
        text: Option<SmolStr>,
        children: Vec<Option<NodeId>>,
        start: TextSize,
    ) -> NodeId {
        let end = self.last_end.max(start);
        self.arena.alloc(NodeData {
            kind,
            text,
            children,
            origin: Origin::Source(TextRange::new(start, end)),
        })
    }

    fn leaf(&mut self, kind: NodeKind, token: Token) -> NodeId {
        self.arena.alloc(NodeData {
            kind,
            text: Some(SmolStr::new(token.text(self.input))),
            children: Vec::new(),
            origin: Origin::Source(token.range),
        })
    }

    fn empty(&mut self, kind: NodeKind, text: Option<SmolStr>, at: TextSize) -> NodeId {
        self.arena.alloc(NodeData {
            kind,
            text,
            children: Vec::new(),
            origin: Origin::Source(TextRange::empty(at)),
        })
    }

    /// An undelimited list spanning its items, or empty at `anchor`.
    fn seq(&mut self, kind: NodeKind, text: Option<SmolStr>, items: Vec<NodeId>, anchor: TextSize) -> NodeId {
        let span = match (items.first(), items.last()) {
            (Some(first), Some(last)) => {
                let start = self.arena.get(*first).span().map_or(anchor, |r| r.start());
                let end = self.arena.get(*last).span().map_or(anchor, |r| r.end());
                TextRange::new(start, end)
            }
            _ => TextRange::empty(anchor),
        };
        self.arena.alloc(NodeData {
            kind,
            text,
            children: items.into_iter().map(Some).collect(),
            origin: Origin::Source(span),
        })
    }
}
