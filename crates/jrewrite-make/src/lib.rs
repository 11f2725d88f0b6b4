//! Construction of new syntax nodes for jrewrite edits.
//!
//! [`TreeMaker`] allocates synthetic nodes into a working copy's arena. Every constructor checks
//! its children against the slot table of the kind it builds (see [`NodeKind::shape`]), so a
//! tree assembled here always has the shape the renderer expects. Nothing is mutated in place:
//! list mutators and setters return a copy of the owner that shares all untouched children.

mod comments;
mod fragments;
mod lists;
mod validate;

use jrewrite_comments::{CommentIndex, CommentLedger};
use jrewrite_core::SmolStr;
use jrewrite_syntax::{FragmentError, NodeData, NodeId, NodeKind, SyntaxTree};
use thiserror::Error;

pub use validate::check_node;

/// A tree that violates the slot table of a kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("{kind:?} cannot hold {found:?} in its `{slot}` slot")]
    WrongChild {
        kind: NodeKind,
        slot: &'static str,
        found: NodeKind,
    },
    #[error("{kind:?} requires a `{slot}` child")]
    MissingChild { kind: NodeKind, slot: &'static str },
    #[error("{kind:?} takes {expected} children, got {found}")]
    WrongArity {
        kind: NodeKind,
        expected: usize,
        found: usize,
    },
    #[error("{kind:?} has no `{slot}` slot")]
    NoSuchSlot { kind: NodeKind, slot: String },
    #[error("{kind:?} requires node text")]
    MissingText { kind: NodeKind },
    #[error("node {node} does not exist in this tree")]
    UnknownNode { node: NodeId },
    #[error("`{name}` is not a valid identifier")]
    InvalidName { name: String },
    #[error("`{op}` is not a {kind:?} operator")]
    InvalidOperator { kind: NodeKind, op: String },
    #[error("{kind:?} has no element at index {index} (length {len})")]
    IndexOutOfRange {
        kind: NodeKind,
        index: usize,
        len: usize,
    },
    #[error("{element} is not an element of {kind:?}")]
    NotAnElement { kind: NodeKind, element: NodeId },
    #[error("{kind:?} has no name to change")]
    NoLabel { kind: NodeKind },
    #[error("modifier list has no `{keyword}`")]
    MissingModifier { keyword: &'static str },
    #[error("{node} has no comment at index {index}")]
    NoSuchComment { node: NodeId, index: usize },
}

/// Errors from builder operations that parse source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MakeError {
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Fragment(#[from] FragmentError),
}

/// Modifier keywords, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "public" => Modifier::Public,
            "protected" => Modifier::Protected,
            "private" => Modifier::Private,
            "abstract" => Modifier::Abstract,
            "default" => Modifier::Default,
            "static" => Modifier::Static,
            "final" => Modifier::Final,
            "transient" => Modifier::Transient,
            "volatile" => Modifier::Volatile,
            "synchronized" => Modifier::Synchronized,
            "native" => Modifier::Native,
            "strictfp" => Modifier::Strictfp,
            _ => return None,
        })
    }
}

/// Literal values accepted by [`TreeMaker::literal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'s> {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(&'s str),
}

impl LiteralValue<'_> {
    /// Java source text of the literal.
    pub fn source_text(&self) -> String {
        match *self {
            LiteralValue::Null => "null".to_string(),
            LiteralValue::Bool(value) => value.to_string(),
            LiteralValue::Int(value) => value.to_string(),
            LiteralValue::Long(value) => format!("{value}L"),
            LiteralValue::Float(value) => format!("{value:?}F"),
            LiteralValue::Double(value) => format!("{value:?}"),
            LiteralValue::Char(ch) => {
                let mut out = String::from('\'');
                escape_into(&mut out, ch, '\'');
                out.push('\'');
                out
            }
            LiteralValue::String(text) => {
                let mut out = String::with_capacity(text.len() + 2);
                out.push('"');
                for ch in text.chars() {
                    escape_into(&mut out, ch, '"');
                }
                out.push('"');
                out
            }
        }
    }
}

fn escape_into(out: &mut String, ch: char, quote: char) {
    match ch {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        '\\' => out.push_str("\\\\"),
        ch if ch == quote => {
            out.push('\\');
            out.push(ch);
        }
        ch if ch.is_control() => out.push_str(&format!("\\u{:04x}", ch as u32)),
        ch => out.push(ch),
    }
}

/// Bound direction of a wildcard type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

const UNARY_OPERATORS: &[&str] = &["+", "-", "!", "~", "++", "--"];
const POSTFIX_OPERATORS: &[&str] = &["++", "--"];
const BINARY_OPERATORS: &[&str] = &[
    "||", "&&", "|", "^", "&", "==", "!=", "<", ">", "<=", ">=", "<<", ">>", ">>>", "+", "-", "*",
    "/", "%",
];
const COMPOUND_OPERATORS: &[&str] = &[
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", ">>>=",
];
const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Builds synthetic nodes in a working copy.
///
/// Borrows the tree mutably for allocation and the comment ledger for attachments; the comment
/// index is only read, to list the original comments of a node.
pub struct TreeMaker<'a> {
    tree: &'a mut SyntaxTree,
    index: &'a CommentIndex,
    ledger: &'a mut CommentLedger,
}

impl<'a> TreeMaker<'a> {
    pub fn new(tree: &'a mut SyntaxTree, index: &'a CommentIndex, ledger: &'a mut CommentLedger) -> Self {
        Self { tree, index, ledger }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &*self.tree
    }

    /// Allocate a node after checking it against the slot table of `kind`.
    pub fn node(
        &mut self,
        kind: NodeKind,
        text: Option<&str>,
        children: Vec<Option<NodeId>>,
    ) -> Result<NodeId, StructureError> {
        check_node(&*self.tree, kind, text, &children)?;
        Ok(self.tree.alloc(NodeData::synthetic(kind, text.map(SmolStr::new), children)))
    }

    fn list(&mut self, kind: NodeKind, text: Option<&str>, items: Vec<NodeId>) -> Result<NodeId, StructureError> {
        self.node(kind, text, items.into_iter().map(Some).collect())
    }

    fn operator(&self, kind: NodeKind, op: &str, allowed: &[&str]) -> Result<(), StructureError> {
        if allowed.contains(&op) {
            Ok(())
        } else {
            Err(StructureError::InvalidOperator {
                kind,
                op: op.to_string(),
            })
        }
    }

    /// Copy of `node` with the child in `slot` replaced.
    pub fn replace_child(
        &mut self,
        node: NodeId,
        slot: usize,
        child: Option<NodeId>,
    ) -> Result<NodeId, StructureError> {
        let data = self.tree.node(node).clone();
        if slot >= data.children.len() {
            return Err(StructureError::IndexOutOfRange {
                kind: data.kind,
                index: slot,
                len: data.children.len(),
            });
        }
        let mut children = data.children;
        children[slot] = child;
        self.node(data.kind, data.text.as_deref(), children)
    }

    /// Copy of `node` with the child in the slot called `slot` replaced.
    pub fn replace_named_child(
        &mut self,
        node: NodeId,
        slot: &str,
        child: Option<NodeId>,
    ) -> Result<NodeId, StructureError> {
        let kind = self.tree.kind(node);
        let Some(index) = kind.slot_index(slot) else {
            return Err(StructureError::NoSuchSlot {
                kind,
                slot: slot.to_string(),
            });
        };
        self.replace_child(node, index, child)
    }

    // --- names and types ---

    pub fn identifier(&mut self, name: &str) -> Result<NodeId, StructureError> {
        if !is_identifier(name) && !matches!(name, "this" | "super" | "class" | "*") {
            return Err(StructureError::InvalidName {
                name: name.to_string(),
            });
        }
        self.node(NodeKind::Name, Some(name), Vec::new())
    }

    pub fn member_select(&mut self, target: NodeId, name: &str) -> Result<NodeId, StructureError> {
        let name = self.identifier(name)?;
        self.node(NodeKind::FieldAccess, None, vec![Some(target), Some(name)])
    }

    /// A dotted name such as `java.util.List` as a chain of member selects.
    pub fn qual_ident(&mut self, fqn: &str) -> Result<NodeId, StructureError> {
        let mut segments = fqn.split('.');
        let first = segments.next().unwrap_or_default();
        let mut node = self.identifier(first)?;
        for segment in segments {
            node = self.member_select(node, segment)?;
        }
        Ok(node)
    }

    pub fn primitive_type(&mut self, name: &str) -> Result<NodeId, StructureError> {
        if !PRIMITIVE_TYPES.contains(&name) {
            return Err(StructureError::InvalidName {
                name: name.to_string(),
            });
        }
        self.node(NodeKind::PrimitiveType, Some(name), Vec::new())
    }

    pub fn parameterized_type(&mut self, base: NodeId, arguments: Vec<NodeId>) -> Result<NodeId, StructureError> {
        let arguments = self.list(NodeKind::TypeArgumentList, None, arguments)?;
        self.node(NodeKind::ParameterizedType, None, vec![Some(base), Some(arguments)])
    }

    pub fn array_type(&mut self, element: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::ArrayType, Some("[]"), vec![Some(element)])
    }

    /// `T...` for the last parameter of a variable-arity method.
    pub fn varargs_type(&mut self, element: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::ArrayType, Some("..."), vec![Some(element)])
    }

    pub fn wildcard(&mut self, bound: Option<(BoundKind, NodeId)>) -> Result<NodeId, StructureError> {
        match bound {
            None => self.node(NodeKind::Wildcard, None, vec![None]),
            Some((kind, ty)) => {
                let keyword = match kind {
                    BoundKind::Extends => "extends",
                    BoundKind::Super => "super",
                };
                self.node(NodeKind::Wildcard, Some(keyword), vec![Some(ty)])
            }
        }
    }

    pub fn type_parameter(&mut self, name: &str, bounds: Vec<NodeId>) -> Result<NodeId, StructureError> {
        let name = self.identifier(name)?;
        let bounds = self.list(NodeKind::BoundList, Some("extends"), bounds)?;
        self.node(NodeKind::TypeParameter, None, vec![Some(name), Some(bounds)])
    }

    // --- declarations ---

    pub fn compilation_unit(
        &mut self,
        package: Option<NodeId>,
        imports: Vec<NodeId>,
        types: Vec<NodeId>,
    ) -> Result<NodeId, StructureError> {
        let imports = self.list(NodeKind::ImportList, None, imports)?;
        let types = self.list(NodeKind::TypeDeclList, None, types)?;
        self.node(NodeKind::CompilationUnit, None, vec![package, Some(imports), Some(types)])
    }

    pub fn package_decl(&mut self, name: &str) -> Result<NodeId, StructureError> {
        let name = self.qual_ident(name)?;
        self.node(NodeKind::PackageDecl, None, vec![Some(name)])
    }

    /// `import name;` where `name` is a dotted name, possibly ending in `*`.
    pub fn import(&mut self, name: NodeId, is_static: bool) -> Result<NodeId, StructureError> {
        let text = is_static.then_some("static");
        self.node(NodeKind::ImportDecl, text, vec![Some(name)])
    }

    pub fn modifiers(&mut self, keywords: &[Modifier], annotations: Vec<NodeId>) -> Result<NodeId, StructureError> {
        let mut keywords = keywords.to_vec();
        keywords.sort();
        keywords.dedup();
        let mut items = annotations;
        for keyword in keywords {
            items.push(self.node(NodeKind::Modifier, Some(keyword.as_str()), Vec::new())?);
        }
        self.list(NodeKind::ModifierList, None, items)
    }

    pub fn annotation(&mut self, name: NodeId, arguments: Vec<NodeId>) -> Result<NodeId, StructureError> {
        let arguments = self.list(NodeKind::AnnotationArgList, None, arguments)?;
        self.node(NodeKind::Annotation, None, vec![Some(name), Some(arguments)])
    }

    #[allow(clippy::too_many_arguments)]
    fn class_like(
        &mut self,
        flavour: &str,
        modifiers: NodeId,
        name: &str,
        type_parameters: Vec<NodeId>,
        extends: Option<NodeId>,
        implements: (&str, Vec<NodeId>),
        body: NodeId,
    ) -> Result<NodeId, StructureError> {
        let name = self.identifier(name)?;
        let type_parameters = self.list(NodeKind::TypeParameterList, None, type_parameters)?;
        let implements = self.list(NodeKind::TypeList, Some(implements.0), implements.1)?;
        self.node(
            NodeKind::ClassDecl,
            Some(flavour),
            vec![
                Some(modifiers),
                Some(name),
                Some(type_parameters),
                extends,
                Some(implements),
                Some(body),
            ],
        )
    }

    pub fn class(
        &mut self,
        modifiers: NodeId,
        name: &str,
        type_parameters: Vec<NodeId>,
        extends: Option<NodeId>,
        implements: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> Result<NodeId, StructureError> {
        let body = self.list(NodeKind::MemberList, None, members)?;
        self.class_like(
            "class",
            modifiers,
            name,
            type_parameters,
            extends,
            ("implements", implements),
            body,
        )
    }

    pub fn interface(
        &mut self,
        modifiers: NodeId,
        name: &str,
        type_parameters: Vec<NodeId>,
        extends: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> Result<NodeId, StructureError> {
        let body = self.list(NodeKind::MemberList, None, members)?;
        self.class_like(
            "interface",
            modifiers,
            name,
            type_parameters,
            None,
            ("extends", extends),
            body,
        )
    }

    pub fn annotation_type(&mut self, modifiers: NodeId, name: &str, members: Vec<NodeId>) -> Result<NodeId, StructureError> {
        let body = self.list(NodeKind::MemberList, None, members)?;
        self.class_like(
            "@interface",
            modifiers,
            name,
            Vec::new(),
            None,
            ("extends", Vec::new()),
            body,
        )
    }

    pub fn enum_decl(
        &mut self,
        modifiers: NodeId,
        name: &str,
        implements: Vec<NodeId>,
        constants: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> Result<NodeId, StructureError> {
        let constants = self.list(NodeKind::EnumConstantList, None, constants)?;
        let members = self.list(NodeKind::BodyDeclList, None, members)?;
        let body = self.node(NodeKind::EnumBody, None, vec![Some(constants), Some(members)])?;
        self.class_like(
            "enum",
            modifiers,
            name,
            Vec::new(),
            None,
            ("implements", implements),
            body,
        )
    }

    pub fn enum_constant(
        &mut self,
        name: &str,
        arguments: Option<Vec<NodeId>>,
        body: Option<Vec<NodeId>>,
    ) -> Result<NodeId, StructureError> {
        let name = self.identifier(name)?;
        let arguments = arguments
            .map(|items| self.list(NodeKind::ArgumentList, None, items))
            .transpose()?;
        let body = body
            .map(|items| self.list(NodeKind::MemberList, None, items))
            .transpose()?;
        self.node(NodeKind::EnumConstant, None, vec![Some(name), arguments, body])
    }

    #[allow(clippy::too_many_arguments)]
    pub fn method(
        &mut self,
        modifiers: NodeId,
        type_parameters: Vec<NodeId>,
        return_type: NodeId,
        name: &str,
        parameters: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: Option<NodeId>,
    ) -> Result<NodeId, StructureError> {
        self.method_like(modifiers, type_parameters, Some(return_type), name, parameters, throws, body)
    }

    pub fn constructor(
        &mut self,
        modifiers: NodeId,
        type_parameters: Vec<NodeId>,
        name: &str,
        parameters: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: NodeId,
    ) -> Result<NodeId, StructureError> {
        self.method_like(modifiers, type_parameters, None, name, parameters, throws, Some(body))
    }

    #[allow(clippy::too_many_arguments)]
    fn method_like(
        &mut self,
        modifiers: NodeId,
        type_parameters: Vec<NodeId>,
        return_type: Option<NodeId>,
        name: &str,
        parameters: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: Option<NodeId>,
    ) -> Result<NodeId, StructureError> {
        let type_parameters = self.list(NodeKind::TypeParameterList, None, type_parameters)?;
        let name = self.identifier(name)?;
        let parameters = self.list(NodeKind::ParameterList, None, parameters)?;
        let throws = self.list(NodeKind::TypeList, Some("throws"), throws)?;
        self.node(
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
                None,
            ],
        )
    }

    /// A field, local variable, or (without initializer) a parameter.
    pub fn variable(
        &mut self,
        modifiers: NodeId,
        ty: NodeId,
        name: &str,
        initializer: Option<NodeId>,
    ) -> Result<NodeId, StructureError> {
        let name = self.identifier(name)?;
        self.node(NodeKind::Variable, None, vec![Some(modifiers), Some(ty), Some(name), initializer])
    }

    pub fn parameter(&mut self, modifiers: NodeId, ty: NodeId, name: &str) -> Result<NodeId, StructureError> {
        self.variable(modifiers, ty, name, None)
    }

    pub fn initializer(&mut self, body: NodeId, is_static: bool) -> Result<NodeId, StructureError> {
        self.node(NodeKind::InitializerBlock, is_static.then_some("static"), vec![Some(body)])
    }

    // --- statements ---

    pub fn block(&mut self, statements: Vec<NodeId>) -> Result<NodeId, StructureError> {
        self.list(NodeKind::Block, None, statements)
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::ExpressionStatement, None, vec![Some(expression)])
    }

    pub fn if_stmt(&mut self, condition: NodeId, then: NodeId, otherwise: Option<NodeId>) -> Result<NodeId, StructureError> {
        self.node(NodeKind::If, None, vec![Some(condition), Some(then), otherwise])
    }

    pub fn while_loop(&mut self, condition: NodeId, body: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::While, None, vec![Some(condition), Some(body)])
    }

    pub fn do_while_loop(&mut self, condition: NodeId, body: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::DoWhile, None, vec![Some(body), Some(condition)])
    }

    /// `init` holds local variables or expression statements.
    pub fn for_loop(
        &mut self,
        init: Vec<NodeId>,
        condition: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    ) -> Result<NodeId, StructureError> {
        let init = self.list(NodeKind::ForInitList, None, init)?;
        let update = self.list(NodeKind::ExpressionList, None, update)?;
        self.node(NodeKind::For, None, vec![Some(init), condition, Some(update), Some(body)])
    }

    pub fn enhanced_for_loop(&mut self, variable: NodeId, expression: NodeId, body: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::ForEach, None, vec![Some(variable), Some(expression), Some(body)])
    }

    pub fn return_stmt(&mut self, expression: Option<NodeId>) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Return, None, vec![expression])
    }

    pub fn break_stmt(&mut self, label: Option<&str>) -> Result<NodeId, StructureError> {
        let label = label.map(|label| self.identifier(label)).transpose()?;
        self.node(NodeKind::Break, None, vec![label])
    }

    pub fn continue_stmt(&mut self, label: Option<&str>) -> Result<NodeId, StructureError> {
        let label = label.map(|label| self.identifier(label)).transpose()?;
        self.node(NodeKind::Continue, None, vec![label])
    }

    pub fn throw_stmt(&mut self, expression: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Throw, None, vec![Some(expression)])
    }

    pub fn empty_statement(&mut self) -> Result<NodeId, StructureError> {
        self.node(NodeKind::EmptyStatement, None, Vec::new())
    }

    pub fn labeled(&mut self, label: &str, body: NodeId) -> Result<NodeId, StructureError> {
        let label = self.identifier(label)?;
        self.node(NodeKind::Labeled, None, vec![Some(label), Some(body)])
    }

    pub fn try_stmt(&mut self, body: NodeId, catches: Vec<NodeId>, finally: Option<NodeId>) -> Result<NodeId, StructureError> {
        if catches.is_empty() && finally.is_none() {
            return Err(StructureError::MissingChild {
                kind: NodeKind::Try,
                slot: "finally",
            });
        }
        let catches = self.list(NodeKind::CatchList, None, catches)?;
        self.node(NodeKind::Try, None, vec![Some(body), Some(catches), finally])
    }

    pub fn catch(&mut self, parameter: NodeId, body: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Catch, None, vec![Some(parameter), Some(body)])
    }

    pub fn switch(&mut self, selector: NodeId, cases: Vec<NodeId>) -> Result<NodeId, StructureError> {
        let cases = self.list(NodeKind::CaseList, None, cases)?;
        self.node(NodeKind::Switch, None, vec![Some(selector), Some(cases)])
    }

    /// A `case label:` group, or `default:` when `label` is `None`.
    pub fn case(&mut self, label: Option<NodeId>, statements: Vec<NodeId>) -> Result<NodeId, StructureError> {
        let statements = self.list(NodeKind::StatementList, None, statements)?;
        self.node(NodeKind::Case, None, vec![label, Some(statements)])
    }

    pub fn synchronized(&mut self, lock: NodeId, body: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Synchronized, None, vec![Some(lock), Some(body)])
    }

    pub fn assert_stmt(&mut self, condition: NodeId, detail: Option<NodeId>) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Assert, None, vec![Some(condition), detail])
    }

    // --- expressions ---

    pub fn method_invocation(&mut self, method: NodeId, arguments: Vec<NodeId>) -> Result<NodeId, StructureError> {
        let arguments = self.list(NodeKind::ArgumentList, None, arguments)?;
        self.node(NodeKind::MethodCall, None, vec![Some(method), Some(arguments)])
    }

    pub fn new_class(
        &mut self,
        ty: NodeId,
        arguments: Vec<NodeId>,
        body: Option<Vec<NodeId>>,
    ) -> Result<NodeId, StructureError> {
        let arguments = self.list(NodeKind::ArgumentList, None, arguments)?;
        let body = body
            .map(|members| self.list(NodeKind::MemberList, None, members))
            .transpose()?;
        self.node(NodeKind::NewClass, None, vec![Some(ty), Some(arguments), body])
    }

    /// `new T[dimension]` or `new T[] {elements}`.
    pub fn new_array(
        &mut self,
        element_type: NodeId,
        dimension: Option<NodeId>,
        initializer: Option<Vec<NodeId>>,
    ) -> Result<NodeId, StructureError> {
        if dimension.is_none() && initializer.is_none() {
            return Err(StructureError::MissingChild {
                kind: NodeKind::NewArray,
                slot: "dimension",
            });
        }
        let initializer = initializer
            .map(|items| self.list(NodeKind::ArrayInit, None, items))
            .transpose()?;
        self.node(NodeKind::NewArray, None, vec![Some(element_type), dimension, initializer])
    }

    pub fn literal(&mut self, value: LiteralValue<'_>) -> Result<NodeId, StructureError> {
        let text = value.source_text();
        self.node(NodeKind::Literal, Some(&text), Vec::new())
    }

    pub fn unary(&mut self, op: &str, operand: NodeId) -> Result<NodeId, StructureError> {
        self.operator(NodeKind::Unary, op, UNARY_OPERATORS)?;
        self.node(NodeKind::Unary, Some(op), vec![Some(operand)])
    }

    pub fn postfix(&mut self, op: &str, operand: NodeId) -> Result<NodeId, StructureError> {
        self.operator(NodeKind::Postfix, op, POSTFIX_OPERATORS)?;
        self.node(NodeKind::Postfix, Some(op), vec![Some(operand)])
    }

    pub fn binary(&mut self, op: &str, left: NodeId, right: NodeId) -> Result<NodeId, StructureError> {
        self.operator(NodeKind::Binary, op, BINARY_OPERATORS)?;
        self.node(NodeKind::Binary, Some(op), vec![Some(left), Some(right)])
    }

    pub fn assignment(&mut self, target: NodeId, value: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Assign, Some("="), vec![Some(target), Some(value)])
    }

    pub fn compound_assignment(&mut self, op: &str, target: NodeId, value: NodeId) -> Result<NodeId, StructureError> {
        self.operator(NodeKind::Assign, op, COMPOUND_OPERATORS)?;
        self.node(NodeKind::Assign, Some(op), vec![Some(target), Some(value)])
    }

    pub fn conditional(&mut self, condition: NodeId, then: NodeId, otherwise: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Conditional, None, vec![Some(condition), Some(then), Some(otherwise)])
    }

    pub fn parenthesized(&mut self, expression: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Parens, None, vec![Some(expression)])
    }

    pub fn type_cast(&mut self, ty: NodeId, expression: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::Cast, None, vec![Some(ty), Some(expression)])
    }

    pub fn instance_of(&mut self, expression: NodeId, ty: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::InstanceOf, None, vec![Some(expression), Some(ty)])
    }

    pub fn array_access(&mut self, array: NodeId, index: NodeId) -> Result<NodeId, StructureError> {
        self.node(NodeKind::ArrayAccess, None, vec![Some(array), Some(index)])
    }

    // --- setters ---

    /// Copy of `node` with its identifying name changed.
    ///
    /// For a bare [`NodeKind::Name`] this is simply a new name.
    pub fn set_label(&mut self, node: NodeId, name: &str) -> Result<NodeId, StructureError> {
        let kind = self.tree.kind(node);
        if kind == NodeKind::Name {
            return self.identifier(name);
        }
        let Some(slot) = kind.label_slot() else {
            return Err(StructureError::NoLabel { kind });
        };
        let name = self.identifier(name)?;
        self.replace_child(node, slot, Some(name))
    }

    /// Copy of a variable with its initializer set or removed.
    pub fn set_initializer(&mut self, variable: NodeId, initializer: Option<NodeId>) -> Result<NodeId, StructureError> {
        self.replace_named_child(variable, "initializer", initializer)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (unicode_ident::is_xid_start(first) || first == '_' || first == '$')
        && chars.all(|ch| unicode_ident::is_xid_continue(ch) || ch == '$')
}

#[cfg(test)]
mod tests {
    use jrewrite_syntax::{debug_dump, parse};
    use pretty_assertions::assert_eq;

    use super::*;

    fn session(text: &str) -> (SyntaxTree, CommentIndex, CommentLedger) {
        let tree = parse(text).unwrap();
        let index = CommentIndex::build(&tree);
        (tree, index, CommentLedger::new())
    }

    #[test]
    fn builds_a_method_with_checked_slots() {
        let (mut tree, index, mut ledger) = session("class A {}");
        let mut make = TreeMaker::new(&mut tree, &index, &mut ledger);

        let mods = make.modifiers(&[Modifier::Static, Modifier::Public], Vec::new()).unwrap();
        let int = make.primitive_type("int").unwrap();
        let void = make.primitive_type("void").unwrap();
        let no_mods = make.modifiers(&[], Vec::new()).unwrap();
        let param = make.parameter(no_mods, int, "x").unwrap();
        let x = make.identifier("x").unwrap();
        let ret = make.return_stmt(Some(x)).unwrap();
        let body = make.block(vec![ret]).unwrap();
        let method = make.method(mods, Vec::new(), void, "id", vec![param], Vec::new(), Some(body)).unwrap();

        let dump = debug_dump(make.tree(), method);
        assert_eq!(
            dump,
            "\
MethodDecl
  ModifierList
    Modifier \"public\"
    Modifier \"static\"
  TypeParameterList
  PrimitiveType \"void\"
  Name \"id\"
  ParameterList
    Variable
      ModifierList
      PrimitiveType \"int\"
      Name \"x\"
      -
  TypeList \"throws\"
  Block
    Return
      Name \"x\"
  -
"
        );
    }

    #[test]
    fn rejects_children_of_the_wrong_category() {
        let (mut tree, index, mut ledger) = session("class A {}");
        let mut make = TreeMaker::new(&mut tree, &index, &mut ledger);
        let empty = make.empty_statement().unwrap();
        let err = make.binary("+", empty, empty).unwrap_err();
        assert_eq!(
            err,
            StructureError::WrongChild {
                kind: NodeKind::Binary,
                slot: "left",
                found: NodeKind::EmptyStatement,
            }
        );

        let one = make.literal(LiteralValue::Int(1)).unwrap();
        assert!(matches!(
            make.binary("=>", one, one),
            Err(StructureError::InvalidOperator { .. })
        ));
        assert!(matches!(
            make.identifier("1abc"),
            Err(StructureError::InvalidName { .. })
        ));
    }

    #[test]
    fn literals_are_escaped() {
        assert_eq!(LiteralValue::String("a\"b\n").source_text(), "\"a\\\"b\\n\"");
        assert_eq!(LiteralValue::Char('\'').source_text(), "'\\''");
        assert_eq!(LiteralValue::Long(3).source_text(), "3L");
        assert_eq!(LiteralValue::Double(1.0).source_text(), "1.0");
        assert_eq!(LiteralValue::Null.source_text(), "null");
    }

    #[test]
    fn set_label_replaces_only_the_name_leaf() {
        let (mut tree, index, mut ledger) = session("class A { int x = 1; }");
        let field = tree
            .preorder(tree.root())
            .into_iter()
            .find(|n| tree.kind(*n) == NodeKind::Variable)
            .unwrap();
        let old_children = tree.children(field).to_vec();

        let mut make = TreeMaker::new(&mut tree, &index, &mut ledger);
        let renamed = make.set_label(field, "y").unwrap();
        let tree = make.tree();
        let new_children = tree.children(renamed);
        assert_eq!(new_children[0], old_children[0]);
        assert_eq!(new_children[1], old_children[1]);
        assert_eq!(new_children[3], old_children[3]);
        assert_eq!(tree.text(new_children[2].unwrap()), Some("y"));
        assert!(!tree.is_original(renamed));
    }

    #[test]
    fn qual_ident_builds_member_select_chain() {
        let (mut tree, index, mut ledger) = session("class A {}");
        let mut make = TreeMaker::new(&mut tree, &index, &mut ledger);
        let name = make.qual_ident("java.util.List").unwrap();
        assert_eq!(
            debug_dump(make.tree(), name),
            "FieldAccess\n  FieldAccess\n    Name \"java\"\n    Name \"util\"\n  Name \"List\"\n"
        );
    }

    #[test]
    fn try_needs_catch_or_finally() {
        let (mut tree, index, mut ledger) = session("class A {}");
        let mut make = TreeMaker::new(&mut tree, &index, &mut ledger);
        let body = make.block(Vec::new()).unwrap();
        assert!(matches!(
            make.try_stmt(body, Vec::new(), None),
            Err(StructureError::MissingChild { kind: NodeKind::Try, .. })
        ));
    }
}
