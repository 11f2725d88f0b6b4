//! Node kinds and their layout.
//!
//! Every kind has a [`Shape`]: a leaf carrying token text, a homogeneous list, or a fixed
//! sequence of slots. The builder validates children against these tables and the renderer
//! uses them to decide how optional children and list items are laid out.

/// Kind tag of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    // --- Leaves ---
    /// An identifier, `this`, `super`, or `*` in an on-demand import.
    Name,
    Literal,
    PrimitiveType,
    /// A modifier keyword such as `public`.
    Modifier,

    // --- Lists ---
    ImportList,
    TypeDeclList,
    ModifierList,
    TypeParameterList,
    TypeArgumentList,
    /// `implements A, B`, `extends A, B` (interfaces) or `throws A, B`; the keyword is the node text.
    TypeList,
    /// `extends A & B` on a type parameter.
    BoundList,
    /// A class body including its braces.
    MemberList,
    /// Members of an enum body after the constants (no braces).
    BodyDeclList,
    EnumConstantList,
    ParameterList,
    ArgumentList,
    AnnotationArgList,
    Block,
    /// A switch body including its braces.
    CaseList,
    /// Statements following a `case` label.
    StatementList,
    CatchList,
    ForInitList,
    ExpressionList,
    ArrayInit,

    // --- Declarations ---
    CompilationUnit,
    PackageDecl,
    /// Node text is `static` for static imports.
    ImportDecl,
    /// Node text is the flavour: `class`, `interface`, `enum` or `@interface`.
    ClassDecl,
    EnumBody,
    EnumConstant,
    MethodDecl,
    Variable,
    /// Node text is `static` for static initializers.
    InitializerBlock,
    EmptyDecl,
    TypeParameter,
    Annotation,

    // --- Statements ---
    ExpressionStatement,
    If,
    While,
    DoWhile,
    For,
    ForEach,
    Return,
    Break,
    Continue,
    Throw,
    EmptyStatement,
    Labeled,
    Try,
    Catch,
    Switch,
    Case,
    Synchronized,
    Assert,

    // --- Expressions ---
    FieldAccess,
    MethodCall,
    NewClass,
    NewArray,
    /// Prefix operator; the operator is the node text.
    Unary,
    /// Postfix `++`/`--`; the operator is the node text.
    Postfix,
    Binary,
    /// Plain or compound assignment; the operator is the node text.
    Assign,
    Conditional,
    Parens,
    Cast,
    InstanceOf,
    ArrayAccess,

    // --- Types ---
    ParameterizedType,
    /// Node text is `[]`, or `...` for a varargs parameter type.
    ArrayType,
    /// Node text is `extends` or `super` when bounded.
    Wildcard,

    /// Reserved for tolerant parsing; the strict parser never produces it.
    Error,
}

/// What a slot or list accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepts {
    Expression,
    Type,
    Statement,
    Member,
    Name,
    /// A modifier keyword or an annotation.
    Modifier,
    /// A dotted name: `Name` or a `FieldAccess` chain.
    QualifiedName,
    /// Either a type or an expression (e.g. the target of a member select).
    TypeOrExpression,
    Kind(NodeKind),
}

impl Accepts {
    pub fn admits(self, kind: NodeKind) -> bool {
        if kind == NodeKind::Error {
            return true;
        }
        match self {
            Accepts::Expression => kind.is_expression(),
            Accepts::Type => kind.is_type(),
            Accepts::Statement => kind.is_statement(),
            Accepts::Member => kind.is_member(),
            Accepts::Name => kind == NodeKind::Name,
            Accepts::Modifier => matches!(kind, NodeKind::Modifier | NodeKind::Annotation),
            Accepts::QualifiedName => matches!(kind, NodeKind::Name | NodeKind::FieldAccess),
            Accepts::TypeOrExpression => kind.is_type() || kind.is_expression(),
            Accepts::Kind(expected) => kind == expected,
        }
    }
}

/// How a list is opened and closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    None,
    Braces,
    Parens,
    Angles,
    /// `<...>` only while the list is non-empty.
    AnglesWhenNonEmpty,
    /// `(...)` only while the list is non-empty.
    ParensWhenNonEmpty,
    /// The node text (e.g. `throws`) followed by a space, only while non-empty.
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    Ampersand,
    Space,
    Line,
}

impl Separator {
    /// Separator text emitted between two items that were not adjacent in the source.
    pub fn text(self) -> &'static str {
        match self {
            Separator::Comma => ", ",
            Separator::Ampersand => " & ",
            Separator::Space => " ",
            Separator::Line => "\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSpec {
    pub delimiter: Delimiter,
    pub separator: Separator,
    pub item: Accepts,
}

impl ListSpec {
    pub fn is_line_list(&self) -> bool {
        self.separator == Separator::Line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: &'static str,
    pub accepts: Accepts,
    pub optional: bool,
    /// Text placed between the previous element and an inserted optional child.
    ///
    /// An empty prefix means the slot cannot be edited incrementally; the owning node is
    /// re-rendered instead.
    pub prefix: &'static str,
}

const fn req(name: &'static str, accepts: Accepts) -> SlotSpec {
    SlotSpec {
        name,
        accepts,
        optional: false,
        prefix: "",
    }
}

const fn opt(name: &'static str, accepts: Accepts, prefix: &'static str) -> SlotSpec {
    SlotSpec {
        name,
        accepts,
        optional: true,
        prefix,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    List(ListSpec),
    Fixed(&'static [SlotSpec]),
}

const fn list(delimiter: Delimiter, separator: Separator, item: Accepts) -> Shape {
    Shape::List(ListSpec {
        delimiter,
        separator,
        item,
    })
}

use Accepts as A;
use NodeKind as K;

const COMPILATION_UNIT: &[SlotSpec] = &[
    opt("package", A::Kind(K::PackageDecl), ""),
    req("imports", A::Kind(K::ImportList)),
    req("types", A::Kind(K::TypeDeclList)),
];
const PACKAGE_DECL: &[SlotSpec] = &[req("name", A::QualifiedName)];
const IMPORT_DECL: &[SlotSpec] = &[req("name", A::QualifiedName)];
const CLASS_DECL: &[SlotSpec] = &[
    req("modifiers", A::Kind(K::ModifierList)),
    req("name", A::Name),
    req("type_parameters", A::Kind(K::TypeParameterList)),
    opt("extends", A::Type, " extends "),
    req("implements", A::Kind(K::TypeList)),
    // `MemberList`, or `EnumBody` for enums.
    req("body", A::Member),
];
const ENUM_BODY: &[SlotSpec] = &[
    req("constants", A::Kind(K::EnumConstantList)),
    req("members", A::Kind(K::BodyDeclList)),
];
const ENUM_CONSTANT: &[SlotSpec] = &[
    req("name", A::Name),
    opt("arguments", A::Kind(K::ArgumentList), ""),
    opt("body", A::Kind(K::MemberList), " "),
];
const METHOD_DECL: &[SlotSpec] = &[
    req("modifiers", A::Kind(K::ModifierList)),
    req("type_parameters", A::Kind(K::TypeParameterList)),
    opt("return_type", A::Type, ""),
    req("name", A::Name),
    req("parameters", A::Kind(K::ParameterList)),
    req("throws", A::Kind(K::TypeList)),
    opt("body", A::Kind(K::Block), ""),
    opt("default_value", A::Expression, ""),
];
const VARIABLE: &[SlotSpec] = &[
    req("modifiers", A::Kind(K::ModifierList)),
    opt("type", A::Type, ""),
    req("name", A::Name),
    opt("initializer", A::Expression, " = "),
];
const INITIALIZER_BLOCK: &[SlotSpec] = &[req("body", A::Kind(K::Block))];
const TYPE_PARAMETER: &[SlotSpec] = &[
    req("name", A::Name),
    req("bounds", A::Kind(K::BoundList)),
];
const ANNOTATION: &[SlotSpec] = &[
    req("name", A::QualifiedName),
    req("arguments", A::Kind(K::AnnotationArgList)),
];

const EXPRESSION_STATEMENT: &[SlotSpec] = &[req("expression", A::Expression)];
const IF: &[SlotSpec] = &[
    req("condition", A::Expression),
    req("then", A::Statement),
    opt("else", A::Statement, " else "),
];
const WHILE: &[SlotSpec] = &[req("condition", A::Expression), req("body", A::Statement)];
const DO_WHILE: &[SlotSpec] = &[req("body", A::Statement), req("condition", A::Expression)];
const FOR: &[SlotSpec] = &[
    req("init", A::Kind(K::ForInitList)),
    opt("condition", A::Expression, ""),
    req("update", A::Kind(K::ExpressionList)),
    req("body", A::Statement),
];
const FOR_EACH: &[SlotSpec] = &[
    req("variable", A::Kind(K::Variable)),
    req("expression", A::Expression),
    req("body", A::Statement),
];
const RETURN: &[SlotSpec] = &[opt("expression", A::Expression, " ")];
const BREAK: &[SlotSpec] = &[opt("label", A::Name, " ")];
const THROW: &[SlotSpec] = &[req("expression", A::Expression)];
const LABELED: &[SlotSpec] = &[req("label", A::Name), req("body", A::Statement)];
const TRY: &[SlotSpec] = &[
    req("body", A::Kind(K::Block)),
    req("catches", A::Kind(K::CatchList)),
    opt("finally", A::Kind(K::Block), " finally "),
];
const CATCH: &[SlotSpec] = &[
    req("parameter", A::Kind(K::Variable)),
    req("body", A::Kind(K::Block)),
];
const SWITCH: &[SlotSpec] = &[
    req("selector", A::Expression),
    req("cases", A::Kind(K::CaseList)),
];
const CASE: &[SlotSpec] = &[
    // Absent for `default:`.
    opt("label", A::Expression, ""),
    req("statements", A::Kind(K::StatementList)),
];
const SYNCHRONIZED: &[SlotSpec] = &[req("lock", A::Expression), req("body", A::Kind(K::Block))];
const ASSERT: &[SlotSpec] = &[
    req("condition", A::Expression),
    opt("detail", A::Expression, " : "),
];

const FIELD_ACCESS: &[SlotSpec] = &[req("target", A::TypeOrExpression), req("name", A::Name)];
const METHOD_CALL: &[SlotSpec] = &[
    req("method", A::QualifiedName),
    req("arguments", A::Kind(K::ArgumentList)),
];
const NEW_CLASS: &[SlotSpec] = &[
    req("type", A::Type),
    req("arguments", A::Kind(K::ArgumentList)),
    opt("body", A::Kind(K::MemberList), " "),
];
const NEW_ARRAY: &[SlotSpec] = &[
    req("element_type", A::Type),
    opt("dimension", A::Expression, ""),
    opt("initializer", A::Kind(K::ArrayInit), ""),
];
const UNARY: &[SlotSpec] = &[req("operand", A::Expression)];
const BINARY: &[SlotSpec] = &[req("left", A::Expression), req("right", A::Expression)];
const CONDITIONAL: &[SlotSpec] = &[
    req("condition", A::Expression),
    req("then", A::Expression),
    req("else", A::Expression),
];
const PARENS: &[SlotSpec] = &[req("expression", A::Expression)];
const CAST: &[SlotSpec] = &[req("type", A::Type), req("expression", A::Expression)];
const INSTANCE_OF: &[SlotSpec] = &[req("expression", A::Expression), req("type", A::Type)];
const ARRAY_ACCESS: &[SlotSpec] = &[req("array", A::Expression), req("index", A::Expression)];

const PARAMETERIZED_TYPE: &[SlotSpec] = &[
    req("base", A::Type),
    req("arguments", A::Kind(K::TypeArgumentList)),
];
const ARRAY_TYPE: &[SlotSpec] = &[req("element", A::Type)];
const WILDCARD: &[SlotSpec] = &[opt("bound", A::Type, "")];

impl NodeKind {
    pub fn shape(self) -> Shape {
        use Delimiter as D;
        use Separator as S;
        match self {
            K::Name | K::Literal | K::PrimitiveType | K::Modifier | K::EmptyDecl
            | K::EmptyStatement | K::Error => Shape::Leaf,

            K::ImportList => list(D::None, S::Line, A::Kind(K::ImportDecl)),
            K::TypeDeclList => list(D::None, S::Line, A::Member),
            K::ModifierList => list(D::None, S::Space, A::Modifier),
            K::TypeParameterList => {
                list(D::AnglesWhenNonEmpty, S::Comma, A::Kind(K::TypeParameter))
            }
            K::TypeArgumentList => list(D::Angles, S::Comma, A::Type),
            K::TypeList => list(D::Keyword, S::Comma, A::Type),
            K::BoundList => list(D::Keyword, S::Ampersand, A::Type),
            K::MemberList => list(D::Braces, S::Line, A::Member),
            K::BodyDeclList => list(D::None, S::Line, A::Member),
            K::EnumConstantList => list(D::None, S::Comma, A::Kind(K::EnumConstant)),
            K::ParameterList => list(D::Parens, S::Comma, A::Kind(K::Variable)),
            K::ArgumentList => list(D::Parens, S::Comma, A::Expression),
            K::AnnotationArgList => list(D::ParensWhenNonEmpty, S::Comma, A::Expression),
            K::Block => list(D::Braces, S::Line, A::Statement),
            K::CaseList => list(D::Braces, S::Line, A::Kind(K::Case)),
            K::StatementList => list(D::None, S::Line, A::Statement),
            K::CatchList => list(D::None, S::Space, A::Kind(K::Catch)),
            K::ForInitList => list(D::None, S::Comma, A::Statement),
            K::ExpressionList => list(D::None, S::Comma, A::Expression),
            K::ArrayInit => list(D::Braces, S::Comma, A::Expression),

            K::CompilationUnit => Shape::Fixed(COMPILATION_UNIT),
            K::PackageDecl => Shape::Fixed(PACKAGE_DECL),
            K::ImportDecl => Shape::Fixed(IMPORT_DECL),
            K::ClassDecl => Shape::Fixed(CLASS_DECL),
            K::EnumBody => Shape::Fixed(ENUM_BODY),
            K::EnumConstant => Shape::Fixed(ENUM_CONSTANT),
            K::MethodDecl => Shape::Fixed(METHOD_DECL),
            K::Variable => Shape::Fixed(VARIABLE),
            K::InitializerBlock => Shape::Fixed(INITIALIZER_BLOCK),
            K::TypeParameter => Shape::Fixed(TYPE_PARAMETER),
            K::Annotation => Shape::Fixed(ANNOTATION),

            K::ExpressionStatement => Shape::Fixed(EXPRESSION_STATEMENT),
            K::If => Shape::Fixed(IF),
            K::While => Shape::Fixed(WHILE),
            K::DoWhile => Shape::Fixed(DO_WHILE),
            K::For => Shape::Fixed(FOR),
            K::ForEach => Shape::Fixed(FOR_EACH),
            K::Return => Shape::Fixed(RETURN),
            K::Break | K::Continue => Shape::Fixed(BREAK),
            K::Throw => Shape::Fixed(THROW),
            K::Labeled => Shape::Fixed(LABELED),
            K::Try => Shape::Fixed(TRY),
            K::Catch => Shape::Fixed(CATCH),
            K::Switch => Shape::Fixed(SWITCH),
            K::Case => Shape::Fixed(CASE),
            K::Synchronized => Shape::Fixed(SYNCHRONIZED),
            K::Assert => Shape::Fixed(ASSERT),

            K::FieldAccess => Shape::Fixed(FIELD_ACCESS),
            K::MethodCall => Shape::Fixed(METHOD_CALL),
            K::NewClass => Shape::Fixed(NEW_CLASS),
            K::NewArray => Shape::Fixed(NEW_ARRAY),
            K::Unary | K::Postfix => Shape::Fixed(UNARY),
            K::Binary | K::Assign => Shape::Fixed(BINARY),
            K::Conditional => Shape::Fixed(CONDITIONAL),
            K::Parens => Shape::Fixed(PARENS),
            K::Cast => Shape::Fixed(CAST),
            K::InstanceOf => Shape::Fixed(INSTANCE_OF),
            K::ArrayAccess => Shape::Fixed(ARRAY_ACCESS),

            K::ParameterizedType => Shape::Fixed(PARAMETERIZED_TYPE),
            K::ArrayType => Shape::Fixed(ARRAY_TYPE),
            K::Wildcard => Shape::Fixed(WILDCARD),
        }
    }

    pub fn list_spec(self) -> Option<ListSpec> {
        match self.shape() {
            Shape::List(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn slots(self) -> &'static [SlotSpec] {
        match self.shape() {
            Shape::Fixed(slots) => slots,
            _ => &[],
        }
    }

    /// Index of the slot called `name`.
    pub fn slot_index(self, name: &str) -> Option<usize> {
        self.slots().iter().position(|slot| slot.name == name)
    }

    pub fn is_list(self) -> bool {
        matches!(self.shape(), Shape::List(_))
    }

    pub fn is_leaf(self) -> bool {
        matches!(self.shape(), Shape::Leaf)
    }

    /// Kinds carrying meaning in [`NodeData::text`](crate::NodeData::text).
    pub fn has_text(self) -> bool {
        matches!(
            self,
            K::Name
                | K::Literal
                | K::PrimitiveType
                | K::Modifier
                | K::ImportDecl
                | K::ClassDecl
                | K::InitializerBlock
                | K::TypeList
                | K::Unary
                | K::Postfix
                | K::Binary
                | K::Assign
                | K::ArrayType
                | K::Wildcard
        )
    }

    pub fn is_expression(self) -> bool {
        matches!(
            self,
            K::Name
                | K::Literal
                | K::FieldAccess
                | K::MethodCall
                | K::NewClass
                | K::NewArray
                | K::ArrayInit
                | K::Unary
                | K::Postfix
                | K::Binary
                | K::Assign
                | K::Conditional
                | K::Parens
                | K::Cast
                | K::InstanceOf
                | K::ArrayAccess
                | K::Error
        )
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            K::Name
                | K::FieldAccess
                | K::PrimitiveType
                | K::ParameterizedType
                | K::ArrayType
                | K::Wildcard
                | K::Error
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            K::Block
                | K::Variable
                | K::ClassDecl
                | K::ExpressionStatement
                | K::If
                | K::While
                | K::DoWhile
                | K::For
                | K::ForEach
                | K::Return
                | K::Break
                | K::Continue
                | K::Throw
                | K::EmptyStatement
                | K::Labeled
                | K::Try
                | K::Switch
                | K::Synchronized
                | K::Assert
                | K::Error
        )
    }

    pub fn is_member(self) -> bool {
        matches!(
            self,
            K::Variable
                | K::MethodDecl
                | K::ClassDecl
                | K::InitializerBlock
                | K::EmptyDecl
                | K::MemberList
                | K::EnumBody
                | K::Error
        )
    }

    /// Declarations that may carry a documentation comment.
    pub fn is_documentable(self) -> bool {
        matches!(
            self,
            K::ClassDecl | K::MethodDecl | K::Variable | K::EnumConstant
        )
    }

    /// The slot holding the identifying name, for kinds that have one.
    pub fn label_slot(self) -> Option<usize> {
        match self {
            K::ClassDecl => Some(1),
            K::MethodDecl => Some(3),
            K::Variable => Some(2),
            K::TypeParameter | K::EnumConstant | K::Labeled => Some(0),
            K::FieldAccess => Some(1),
            K::Break | K::Continue => Some(0),
            _ => None,
        }
    }
}
