//! Printer for nodes that have no source text to copy.
//!
//! The printer lowers a subtree to a [`Doc`] and lays it out with the configured width. Original
//! nodes met on the way are handed to [`PrintHooks::reuse`], so the caller can splice in their
//! (possibly rewritten) source text instead of a normalized reprint.

use jrewrite_comments::{CommentRecord, RelativePosition};
use jrewrite_syntax::{Delimiter, NodeId, NodeKind, Separator, SyntaxTree};

use crate::doc::{print_at, Doc};
use crate::{FormatConfig, FormatError};

/// Source text for an original node, produced by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reused {
    pub text: String,
    /// Indentation width of the line the text was written for.
    pub base_indent: usize,
}

/// Where a printed node sits in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Inside a header or expression. Variables and expression statements are unterminated.
    Inline,
    /// The body of a control statement.
    Body,
    /// An item of a line list: members, block statements, imports, cases.
    LineItem,
}

/// Callbacks that connect the printer to the rest of a rewrite session.
pub trait PrintHooks {
    type Error: From<FormatError>;

    /// Rendered text for `node`, or `None` to print it fresh.
    fn reuse(&mut self, node: NodeId) -> Result<Option<Reused>, Self::Error>;

    /// Comments to emit before `node`.
    fn leading_comments(&mut self, node: NodeId, placement: Placement) -> Vec<CommentRecord>;

    /// Comments to emit after `node` on its last line.
    fn trailing_comments(&mut self, node: NodeId, placement: Placement) -> Vec<CommentRecord>;
}

/// Prints every node fresh and emits no comments.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl PrintHooks for NoHooks {
    type Error = FormatError;

    fn reuse(&mut self, _node: NodeId) -> Result<Option<Reused>, FormatError> {
        Ok(None)
    }

    fn leading_comments(&mut self, _node: NodeId, _placement: Placement) -> Vec<CommentRecord> {
        Vec::new()
    }

    fn trailing_comments(&mut self, _node: NodeId, _placement: Placement) -> Vec<CommentRecord> {
        Vec::new()
    }
}

/// Print `node` for output whose current line is indented by `indent` columns.
///
/// The first line is not prefixed with indentation; the caller has already written it.
pub fn print_node<H: PrintHooks>(
    tree: &SyntaxTree,
    node: NodeId,
    placement: Placement,
    config: &FormatConfig,
    hooks: &mut H,
    indent: usize,
) -> Result<String, H::Error> {
    tracing::trace!(
        target = "jrewrite.render",
        node = ?node,
        kind = ?tree.kind(node),
        indent,
        "printing fresh node"
    );
    let mut printer = Printer {
        tree,
        config,
        hooks,
    };
    let doc = printer.placed(node, placement)?;
    Ok(print_at(doc, config.print_config(), indent))
}

struct Printer<'t, 'h, H> {
    tree: &'t SyntaxTree,
    config: &'t FormatConfig,
    hooks: &'h mut H,
}

type PResult<'t, H> = Result<Doc<'t>, <H as PrintHooks>::Error>;

fn is_terminated(kind: NodeKind, placement: Placement) -> bool {
    matches!(kind, NodeKind::Variable | NodeKind::ExpressionStatement) && placement != Placement::Inline
}

fn hardlines<'a>(count: usize) -> Doc<'a> {
    Doc::concat((0..count).map(|_| Doc::hardline()))
}

fn binary_precedence(op: &str) -> u8 {
    match op {
        "||" => 3,
        "&&" => 4,
        "|" => 5,
        "^" => 6,
        "&" => 7,
        "==" | "!=" => 8,
        "<" | ">" | "<=" | ">=" => 9,
        "<<" | ">>" | ">>>" => 10,
        "+" | "-" => 11,
        _ => 12,
    }
}

fn precedence(tree: &SyntaxTree, node: NodeId) -> u8 {
    match tree.kind(node) {
        NodeKind::Assign => 1,
        NodeKind::Conditional => 2,
        NodeKind::Binary => binary_precedence(tree.text(node).unwrap_or_default()),
        NodeKind::InstanceOf => 9,
        NodeKind::Unary | NodeKind::Cast => 13,
        NodeKind::Postfix => 14,
        _ => 15,
    }
}

impl<'t, H: PrintHooks> Printer<'t, '_, H> {
    fn placed(&mut self, node: NodeId, placement: Placement) -> PResult<'t, H> {
        let leading = self.hooks.leading_comments(node, placement);
        let trailing = self.hooks.trailing_comments(node, placement);

        let body = match self.hooks.reuse(node)? {
            Some(Reused {
                mut text,
                base_indent,
            }) => {
                let kind = self.tree.kind(node);
                if matches!(kind, NodeKind::Variable | NodeKind::ExpressionStatement) {
                    let terminated = is_terminated(kind, placement);
                    if terminated && !text.ends_with(';') {
                        text.push(';');
                    } else if !terminated && text.ends_with(';') {
                        text.pop();
                    }
                }
                Doc::verbatim(text, base_indent)
            }
            None => self.fresh(node, placement)?,
        };

        Ok(with_comments(leading, body, trailing))
    }

    fn inline(&mut self, node: NodeId) -> PResult<'t, H> {
        self.placed(node, Placement::Inline)
    }

    fn req(&self, node: NodeId, slot: &'static str) -> Result<NodeId, H::Error> {
        self.tree.child_named(node, slot).ok_or_else(|| {
            FormatError::MissingChild {
                kind: self.tree.kind(node),
                slot,
            }
            .into()
        })
    }

    fn opt(&self, node: NodeId, slot: &str) -> Option<NodeId> {
        self.tree.child_named(node, slot)
    }

    fn text(&self, node: NodeId) -> Doc<'t> {
        Doc::text(self.tree.text(node).unwrap_or_default())
    }

    fn is_empty_list(&self, list: NodeId) -> bool {
        self.tree.node(list).items().next().is_none()
    }

    fn brace_space(&self) -> Doc<'t> {
        if self.config.space_before_brace {
            Doc::text(" ")
        } else {
            Doc::nil()
        }
    }

    /// `node` wrapped in parentheses when it binds looser than `min`.
    fn operand(&mut self, node: NodeId, min: u8) -> PResult<'t, H> {
        let doc = self.inline(node)?;
        if precedence(self.tree, node) < min {
            Ok(Doc::concat([Doc::text("("), doc, Doc::text(")")]))
        } else {
            Ok(doc)
        }
    }

    fn fresh(&mut self, node: NodeId, placement: Placement) -> PResult<'t, H> {
        use NodeKind as K;

        let tree = self.tree;
        let kind = tree.kind(node);
        let doc = match kind {
            K::Name | K::Literal | K::PrimitiveType | K::Modifier => self.text(node),
            K::EmptyDecl | K::EmptyStatement => Doc::text(";"),

            K::CompilationUnit => self.compilation_unit(node)?,
            K::PackageDecl => Doc::concat([
                Doc::text("package "),
                self.inline(self.req(node, "name")?)?,
                Doc::text(";"),
            ]),
            K::ImportDecl => Doc::concat([
                Doc::text("import "),
                if tree.text(node) == Some("static") {
                    Doc::text("static ")
                } else {
                    Doc::nil()
                },
                self.inline(self.req(node, "name")?)?,
                Doc::text(";"),
            ]),
            K::ClassDecl => self.class_decl(node)?,
            K::EnumBody => self.enum_body(node)?,
            K::EnumConstant => {
                let name = self.inline(self.req(node, "name")?)?;
                let arguments = match self.opt(node, "arguments") {
                    Some(arguments) => self.arguments(arguments)?,
                    None => Doc::nil(),
                };
                let body = match self.opt(node, "body") {
                    Some(body) => Doc::concat([Doc::text(" "), self.inline(body)?]),
                    None => Doc::nil(),
                };
                Doc::concat([name, arguments, body])
            }
            K::MethodDecl => self.method(node)?,
            K::Variable => self.variable(node, placement)?,
            K::InitializerBlock => Doc::concat([
                if tree.text(node) == Some("static") {
                    Doc::text("static ")
                } else {
                    Doc::nil()
                },
                self.inline(self.req(node, "body")?)?,
            ]),
            K::TypeParameter => {
                let name = self.inline(self.req(node, "name")?)?;
                let bounds = self.req(node, "bounds")?;
                if self.is_empty_list(bounds) {
                    name
                } else {
                    Doc::concat([name, Doc::text(" "), self.inline(bounds)?])
                }
            }
            K::Annotation => Doc::concat([
                Doc::text("@"),
                self.inline(self.req(node, "name")?)?,
                self.inline(self.req(node, "arguments")?)?,
            ]),

            K::ExpressionStatement => {
                let expression = self.inline(self.req(node, "expression")?)?;
                if is_terminated(kind, placement) {
                    Doc::concat([expression, Doc::text(";")])
                } else {
                    expression
                }
            }
            K::If => self.if_statement(node)?,
            K::While => {
                let condition = self.inline(self.req(node, "condition")?)?;
                let (body, _) = self.branch(self.req(node, "body")?)?;
                Doc::concat([Doc::text("while ("), condition, Doc::text(")"), body])
            }
            K::DoWhile => {
                let (body, is_block) = self.branch(self.req(node, "body")?)?;
                let condition = self.inline(self.req(node, "condition")?)?;
                Doc::concat([
                    Doc::text("do"),
                    body,
                    if is_block {
                        Doc::text(" ")
                    } else {
                        Doc::hardline()
                    },
                    Doc::text("while ("),
                    condition,
                    Doc::text(");"),
                ])
            }
            K::For => self.for_statement(node)?,
            K::ForEach => {
                let variable = self.inline(self.req(node, "variable")?)?;
                let expression = self.inline(self.req(node, "expression")?)?;
                let (body, _) = self.branch(self.req(node, "body")?)?;
                Doc::concat([
                    Doc::text("for ("),
                    variable,
                    Doc::text(" : "),
                    expression,
                    Doc::text(")"),
                    body,
                ])
            }
            K::Return | K::Break | K::Continue | K::Throw => {
                let keyword = match kind {
                    K::Return => "return",
                    K::Break => "break",
                    K::Continue => "continue",
                    _ => "throw",
                };
                let operand = match tree.child(node, 0) {
                    Some(child) => Doc::concat([Doc::text(" "), self.inline(child)?]),
                    None if kind == K::Throw => {
                        return Err(FormatError::MissingChild {
                            kind,
                            slot: "expression",
                        }
                        .into())
                    }
                    None => Doc::nil(),
                };
                Doc::concat([Doc::text(keyword), operand, Doc::text(";")])
            }
            K::Labeled => Doc::concat([
                self.inline(self.req(node, "label")?)?,
                Doc::text(": "),
                self.placed(self.req(node, "body")?, Placement::Body)?,
            ]),
            K::Try => self.try_statement(node)?,
            K::Catch => Doc::concat([
                Doc::text("catch ("),
                self.inline(self.req(node, "parameter")?)?,
                Doc::text(")"),
                self.brace_space(),
                self.inline(self.req(node, "body")?)?,
            ]),
            K::Switch => Doc::concat([
                Doc::text("switch ("),
                self.inline(self.req(node, "selector")?)?,
                Doc::text(")"),
                self.brace_space(),
                self.inline(self.req(node, "cases")?)?,
            ]),
            K::Case => self.case(node)?,
            K::Synchronized => Doc::concat([
                Doc::text("synchronized ("),
                self.inline(self.req(node, "lock")?)?,
                Doc::text(")"),
                self.brace_space(),
                self.inline(self.req(node, "body")?)?,
            ]),
            K::Assert => {
                let condition = self.inline(self.req(node, "condition")?)?;
                let detail = match self.opt(node, "detail") {
                    Some(detail) => Doc::concat([Doc::text(" : "), self.inline(detail)?]),
                    None => Doc::nil(),
                };
                Doc::concat([Doc::text("assert "), condition, detail, Doc::text(";")])
            }

            K::FieldAccess => Doc::concat([
                self.operand(self.req(node, "target")?, 14)?,
                Doc::text("."),
                self.inline(self.req(node, "name")?)?,
            ]),
            K::MethodCall => Doc::concat([
                self.operand(self.req(node, "method")?, 14)?,
                self.arguments(self.req(node, "arguments")?)?,
            ]),
            K::NewClass => {
                let ty = self.inline(self.req(node, "type")?)?;
                let arguments = self.arguments(self.req(node, "arguments")?)?;
                let body = match self.opt(node, "body") {
                    Some(body) => Doc::concat([Doc::text(" "), self.inline(body)?]),
                    None => Doc::nil(),
                };
                Doc::concat([Doc::text("new "), ty, arguments, body])
            }
            K::NewArray => {
                let element = self.inline(self.req(node, "element_type")?)?;
                let dimension = match self.opt(node, "dimension") {
                    Some(dimension) => self.inline(dimension)?,
                    None => Doc::nil(),
                };
                let initializer = match self.opt(node, "initializer") {
                    Some(initializer) => self.inline(initializer)?,
                    None => Doc::nil(),
                };
                Doc::concat([
                    Doc::text("new "),
                    element,
                    Doc::text("["),
                    dimension,
                    Doc::text("]"),
                    initializer,
                ])
            }
            K::Unary => {
                let op = tree.text(node).unwrap_or_default();
                let operand_node = self.req(node, "operand")?;
                let mut operand = self.operand(operand_node, 13)?;
                // `- -x` must not collapse into `--x`.
                let clashes = tree.kind(operand_node) == K::Unary
                    && tree
                        .text(operand_node)
                        .is_some_and(|inner| !op.is_empty() && inner.starts_with(&op[..1]));
                if clashes {
                    operand = Doc::concat([Doc::text("("), operand, Doc::text(")")]);
                }
                Doc::concat([Doc::text(op), operand])
            }
            K::Postfix => Doc::concat([self.operand(self.req(node, "operand")?, 14)?, self.text(node)]),
            K::Binary => {
                let prec = precedence(tree, node);
                let left = self.operand(self.req(node, "left")?, prec)?;
                let right = self.operand(self.req(node, "right")?, prec + 1)?;
                Doc::concat([left, Doc::text(" "), self.text(node), Doc::text(" "), right])
            }
            K::Assign => {
                let left = self.operand(self.req(node, "left")?, 2)?;
                let right = self.operand(self.req(node, "right")?, 1)?;
                Doc::concat([left, Doc::text(" "), self.text(node), Doc::text(" "), right])
            }
            K::Conditional => Doc::concat([
                self.operand(self.req(node, "condition")?, 3)?,
                Doc::text(" ? "),
                self.operand(self.req(node, "then")?, 2)?,
                Doc::text(" : "),
                self.operand(self.req(node, "else")?, 2)?,
            ]),
            K::Parens => Doc::concat([
                Doc::text("("),
                self.inline(self.req(node, "expression")?)?,
                Doc::text(")"),
            ]),
            K::Cast => Doc::concat([
                Doc::text("("),
                self.inline(self.req(node, "type")?)?,
                Doc::text(") "),
                self.operand(self.req(node, "expression")?, 13)?,
            ]),
            K::InstanceOf => Doc::concat([
                self.operand(self.req(node, "expression")?, 9)?,
                Doc::text(" instanceof "),
                self.inline(self.req(node, "type")?)?,
            ]),
            K::ArrayAccess => Doc::concat([
                self.operand(self.req(node, "array")?, 14)?,
                Doc::text("["),
                self.inline(self.req(node, "index")?)?,
                Doc::text("]"),
            ]),

            K::ParameterizedType => Doc::concat([
                self.inline(self.req(node, "base")?)?,
                self.inline(self.req(node, "arguments")?)?,
            ]),
            K::ArrayType => Doc::concat([
                self.inline(self.req(node, "element")?)?,
                Doc::text(tree.text(node).unwrap_or("[]")),
            ]),
            K::Wildcard => match (tree.text(node), self.opt(node, "bound")) {
                (Some(keyword), Some(bound)) => Doc::concat([
                    Doc::text("? "),
                    Doc::text(keyword),
                    Doc::text(" "),
                    self.inline(bound)?,
                ]),
                _ => Doc::text("?"),
            },

            K::Error => return Err(FormatError::Unprintable { kind }.into()),
            _ => self.list(node)?,
        };
        Ok(doc)
    }

    // --- lists ---

    fn list(&mut self, list: NodeId) -> PResult<'t, H> {
        let kind = self.tree.kind(list);
        let Some(spec) = kind.list_spec() else {
            return Err(FormatError::Unprintable { kind }.into());
        };

        if kind == NodeKind::ArgumentList {
            return self.arguments(list);
        }
        if spec.separator == Separator::Line {
            return match spec.delimiter {
                Delimiter::Braces => self.braced_lines(list),
                _ => self.bare_lines(list),
            };
        }

        let items = self.tree.items(list);
        let mut docs = Vec::with_capacity(items.len());
        for item in items {
            docs.push(self.inline(item)?);
        }
        let empty = docs.is_empty();
        let joined = Doc::join(Doc::text(spec.separator.text()), docs);

        let wrap = |open: &'static str, close: &'static str| {
            Doc::concat([Doc::text(open), joined.clone(), Doc::text(close)])
        };
        Ok(match spec.delimiter {
            Delimiter::None => joined.clone(),
            Delimiter::Braces => wrap("{", "}"),
            Delimiter::Parens => wrap("(", ")"),
            Delimiter::Angles => wrap("<", ">"),
            Delimiter::AnglesWhenNonEmpty | Delimiter::ParensWhenNonEmpty | Delimiter::Keyword if empty => {
                Doc::nil()
            }
            Delimiter::AnglesWhenNonEmpty => wrap("<", ">"),
            Delimiter::ParensWhenNonEmpty => wrap("(", ")"),
            Delimiter::Keyword => {
                let keyword = match (self.tree.text(list), kind) {
                    (Some(keyword), _) => keyword,
                    (None, NodeKind::BoundList) => "extends",
                    (None, _) => return Err(FormatError::Unprintable { kind }.into()),
                };
                Doc::concat([Doc::text(keyword), Doc::text(" "), joined.clone()])
            }
        })
    }

    /// `(a, b)`, breaking after `(` and each `,` when it does not fit.
    fn arguments(&mut self, list: NodeId) -> PResult<'t, H> {
        let items = self.tree.items(list);
        if items.is_empty() {
            return Ok(Doc::text("()"));
        }
        let mut docs = Vec::with_capacity(items.len());
        for item in items {
            docs.push(self.inline(item)?);
        }
        let inner = Doc::concat([
            Doc::softline(),
            Doc::join(Doc::concat([Doc::text(","), Doc::line()]), docs),
        ]);
        Ok(Doc::concat([
            Doc::text("("),
            inner.nest(self.config.continuation_indent),
            Doc::text(")"),
        ])
        .group())
    }

    /// Items of a line list, each preceded by its line break and blank lines.
    fn line_items(&mut self, list: NodeId, first_break: bool) -> PResult<'t, H> {
        let kind = self.tree.kind(list);
        let mut parts = Vec::new();
        let mut prev = None;
        for item in self.tree.items(list) {
            let item_kind = self.tree.kind(item);
            let blank = self.config.blank_lines_before(kind, prev, item_kind);
            if prev.is_some() || first_break {
                parts.push(hardlines(blank + 1));
            }
            parts.push(self.placed(item, Placement::LineItem)?);
            prev = Some(item_kind);
        }
        Ok(Doc::concat(parts))
    }

    fn braced_lines(&mut self, list: NodeId) -> PResult<'t, H> {
        let items = self.line_items(list, true)?;
        Ok(Doc::concat([
            Doc::text("{"),
            items.indent(),
            Doc::hardline(),
            Doc::text("}"),
        ]))
    }

    fn bare_lines(&mut self, list: NodeId) -> PResult<'t, H> {
        self.line_items(list, false)
    }

    fn modifiers(&mut self, list: NodeId, declaration: bool) -> PResult<'t, H> {
        let mut parts = Vec::new();
        for item in self.tree.items(list) {
            let annotation = self.tree.kind(item) == NodeKind::Annotation;
            parts.push(self.inline(item)?);
            parts.push(if annotation && declaration {
                Doc::hardline()
            } else {
                Doc::text(" ")
            });
        }
        Ok(Doc::concat(parts))
    }

    // --- declarations ---

    fn compilation_unit(&mut self, node: NodeId) -> PResult<'t, H> {
        let mut parts = Vec::new();
        if let Some(package) = self.opt(node, "package") {
            parts.push(self.placed(package, Placement::LineItem)?);
        }

        for slot in ["imports", "types"] {
            let list = self.req(node, slot)?;
            if self.is_empty_list(list) {
                continue;
            }
            if !parts.is_empty() {
                parts.push(hardlines(2));
            }
            parts.push(self.bare_lines(list)?);
        }

        parts.push(Doc::hardline());
        Ok(Doc::concat(parts))
    }

    fn class_decl(&mut self, node: NodeId) -> PResult<'t, H> {
        let modifiers = self.modifiers(self.req(node, "modifiers")?, true)?;
        let flavour = self.tree.text(node).unwrap_or("class");
        let name = self.inline(self.req(node, "name")?)?;
        let type_parameters = self.inline(self.req(node, "type_parameters")?)?;
        let extends = match self.opt(node, "extends") {
            Some(ty) => Doc::concat([Doc::text(" extends "), self.inline(ty)?]),
            None => Doc::nil(),
        };
        let implements = self.req(node, "implements")?;
        let implements = if self.is_empty_list(implements) {
            Doc::nil()
        } else {
            Doc::concat([Doc::text(" "), self.inline(implements)?])
        };
        let body = self.inline(self.req(node, "body")?)?;

        Ok(Doc::concat([
            modifiers,
            Doc::text(flavour),
            Doc::text(" "),
            name,
            type_parameters,
            extends,
            implements,
            self.brace_space(),
            body,
        ]))
    }

    fn enum_body(&mut self, node: NodeId) -> PResult<'t, H> {
        let constants = self.req(node, "constants")?;
        let members = self.req(node, "members")?;

        let mut inner = Vec::new();
        if !self.is_empty_list(constants) {
            inner.push(Doc::hardline());
            inner.push(self.inline(constants)?);
        }
        if !self.is_empty_list(members) {
            if inner.is_empty() {
                inner.push(Doc::hardline());
            }
            inner.push(Doc::text(";"));
            inner.push(self.line_items(members, true)?);
        }

        Ok(Doc::concat([
            Doc::text("{"),
            Doc::concat(inner).indent(),
            Doc::hardline(),
            Doc::text("}"),
        ]))
    }

    fn method(&mut self, node: NodeId) -> PResult<'t, H> {
        let modifiers = self.modifiers(self.req(node, "modifiers")?, true)?;
        let type_parameters = self.req(node, "type_parameters")?;
        let type_parameters = if self.is_empty_list(type_parameters) {
            Doc::nil()
        } else {
            Doc::concat([self.inline(type_parameters)?, Doc::text(" ")])
        };
        let return_type = match self.opt(node, "return_type") {
            Some(ty) => Doc::concat([self.inline(ty)?, Doc::text(" ")]),
            None => Doc::nil(),
        };
        let name = self.inline(self.req(node, "name")?)?;
        let parameters = self.inline(self.req(node, "parameters")?)?;
        let throws = self.req(node, "throws")?;
        let throws = if self.is_empty_list(throws) {
            Doc::nil()
        } else {
            Doc::concat([Doc::text(" "), self.inline(throws)?])
        };
        let tail = match (self.opt(node, "body"), self.opt(node, "default_value")) {
            (Some(body), _) => Doc::concat([self.brace_space(), self.inline(body)?]),
            (None, Some(value)) => Doc::concat([Doc::text(" default "), self.inline(value)?, Doc::text(";")]),
            (None, None) => Doc::text(";"),
        };

        Ok(Doc::concat([
            modifiers,
            type_parameters,
            return_type,
            name,
            parameters,
            throws,
            tail,
        ]))
    }

    fn variable(&mut self, node: NodeId, placement: Placement) -> PResult<'t, H> {
        let declaration = placement != Placement::Inline;
        let modifiers = self.modifiers(self.req(node, "modifiers")?, declaration)?;
        let ty = match self.opt(node, "type") {
            Some(ty) => Doc::concat([self.inline(ty)?, Doc::text(" ")]),
            None => Doc::nil(),
        };
        let name = self.inline(self.req(node, "name")?)?;
        let initializer = match self.opt(node, "initializer") {
            Some(init) => Doc::concat([Doc::text(" = "), self.inline(init)?]),
            None => Doc::nil(),
        };
        let terminator = if is_terminated(NodeKind::Variable, placement) {
            Doc::text(";")
        } else {
            Doc::nil()
        };
        Ok(Doc::concat([modifiers, ty, name, initializer, terminator]))
    }

    // --- statements ---

    /// The body of a control statement: ` {...}` for blocks, otherwise an indented next line.
    fn branch(&mut self, statement: NodeId) -> Result<(Doc<'t>, bool), H::Error> {
        let body = self.placed(statement, Placement::Body)?;
        if self.tree.kind(statement) == NodeKind::Block {
            Ok((Doc::concat([self.brace_space(), body]), true))
        } else {
            Ok((Doc::concat([Doc::hardline(), body]).indent(), false))
        }
    }

    /// Separator before `else`, `catch` or `finally` following a statement.
    fn continuation(&self, after_block: bool) -> Doc<'t> {
        if after_block && !self.config.else_on_new_line {
            Doc::text(" ")
        } else {
            Doc::hardline()
        }
    }

    fn if_statement(&mut self, node: NodeId) -> PResult<'t, H> {
        let condition = self.inline(self.req(node, "condition")?)?;
        let (then, then_block) = self.branch(self.req(node, "then")?)?;
        let mut parts = vec![Doc::text("if ("), condition, Doc::text(")"), then];

        if let Some(otherwise) = self.opt(node, "else") {
            parts.push(self.continuation(then_block));
            parts.push(Doc::text("else"));
            if self.tree.kind(otherwise) == NodeKind::If {
                parts.push(Doc::text(" "));
                parts.push(self.placed(otherwise, Placement::Body)?);
            } else {
                parts.push(self.branch(otherwise)?.0);
            }
        }
        Ok(Doc::concat(parts))
    }

    fn for_statement(&mut self, node: NodeId) -> PResult<'t, H> {
        let init = self.req(node, "init")?;
        let mut init_docs = Vec::new();
        for item in self.tree.items(init) {
            init_docs.push(self.inline(item)?);
        }
        let condition = match self.opt(node, "condition") {
            Some(condition) => Doc::concat([Doc::text(" "), self.inline(condition)?]),
            None => Doc::nil(),
        };
        let update = self.req(node, "update")?;
        let update = if self.is_empty_list(update) {
            Doc::nil()
        } else {
            Doc::concat([Doc::text(" "), self.inline(update)?])
        };
        let (body, _) = self.branch(self.req(node, "body")?)?;

        Ok(Doc::concat([
            Doc::text("for ("),
            Doc::join(Doc::text(", "), init_docs),
            Doc::text(";"),
            condition,
            Doc::text(";"),
            update,
            Doc::text(")"),
            body,
        ]))
    }

    fn try_statement(&mut self, node: NodeId) -> PResult<'t, H> {
        let mut parts = vec![
            Doc::text("try"),
            self.brace_space(),
            self.inline(self.req(node, "body")?)?,
        ];
        for catch in self.tree.items(self.req(node, "catches")?) {
            parts.push(self.continuation(true));
            parts.push(self.inline(catch)?);
        }
        if let Some(finally) = self.opt(node, "finally") {
            parts.push(self.continuation(true));
            parts.push(Doc::text("finally"));
            parts.push(self.brace_space());
            parts.push(self.inline(finally)?);
        }
        Ok(Doc::concat(parts))
    }

    fn case(&mut self, node: NodeId) -> PResult<'t, H> {
        let label = match self.opt(node, "label") {
            Some(label) => Doc::concat([Doc::text("case "), self.inline(label)?, Doc::text(":")]),
            None => Doc::text("default:"),
        };
        let statements = self.line_items(self.req(node, "statements")?, true)?;
        Ok(Doc::concat([label, statements.indent()]))
    }
}

fn with_comments<'t>(leading: Vec<CommentRecord>, body: Doc<'t>, trailing: Vec<CommentRecord>) -> Doc<'t> {
    if leading.is_empty() && trailing.is_empty() {
        return body;
    }

    let mut parts = Vec::with_capacity(leading.len() * 2 + trailing.len() + 1);
    for record in leading {
        let own_line = record.style.ends_line() || record.position == RelativePosition::Preceding;
        parts.push(Doc::verbatim(record.text(), 0));
        parts.push(if own_line { Doc::hardline() } else { Doc::text(" ") });
    }
    parts.push(body);
    for record in trailing {
        let text = Doc::concat([Doc::text(" "), Doc::verbatim(record.text(), 0)]);
        parts.push(if record.style.ends_line() {
            Doc::line_suffix(text)
        } else {
            text
        });
    }
    Doc::concat(parts)
}
