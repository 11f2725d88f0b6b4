use jrewrite_core::TextRange;

/// Lexical token kinds.
///
/// `>` is always lexed as a single token; the parser joins adjacent `>` tokens into shift
/// operators so that nested type arguments (`List<List<String>>`) need no re-splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    // --- Trivia ---
    Whitespace,
    LineComment,
    BlockComment,
    DocComment,

    // --- Identifiers & literals ---
    Identifier,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    TextBlock,

    // --- Keywords ---
    AbstractKw,
    AssertKw,
    BooleanKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ContinueKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    ExtendsKw,
    FinalKw,
    FinallyKw,
    FloatKw,
    ForKw,
    IfKw,
    ImplementsKw,
    ImportKw,
    InstanceofKw,
    IntKw,
    InterfaceKw,
    LongKw,
    NativeKw,
    NewKw,
    PackageKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReturnKw,
    ShortKw,
    StaticKw,
    StrictfpKw,
    SuperKw,
    SwitchKw,
    SynchronizedKw,
    ThisKw,
    ThrowKw,
    ThrowsKw,
    TransientKw,
    TryKw,
    VoidKw,
    VolatileKw,
    WhileKw,
    TrueKw,
    FalseKw,
    NullKw,

    // --- Punctuation ---
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    Question,
    Colon,
    ColonColon,
    Arrow,

    // --- Operators ---
    Eq,
    EqEq,
    Bang,
    BangEq,
    Less,
    LessEq,
    LeftShift,
    LeftShiftEq,
    Greater,
    Plus,
    PlusPlus,
    PlusEq,
    Minus,
    MinusMinus,
    MinusEq,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,
    Tilde,

    Error,
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::DocComment
        )
    }

    pub fn is_comment(self) -> bool {
        self.is_trivia() && self != TokenKind::Whitespace
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::TextBlock
                | TokenKind::TrueKw
                | TokenKind::FalseKw
                | TokenKind::NullKw
        )
    }

    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            TokenKind::BooleanKw
                | TokenKind::ByteKw
                | TokenKind::ShortKw
                | TokenKind::IntKw
                | TokenKind::LongKw
                | TokenKind::CharKw
                | TokenKind::FloatKw
                | TokenKind::DoubleKw
        )
    }

    /// Keywords that may appear in a modifier list.
    pub fn is_modifier_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::PublicKw
                | TokenKind::ProtectedKw
                | TokenKind::PrivateKw
                | TokenKind::StaticKw
                | TokenKind::FinalKw
                | TokenKind::AbstractKw
                | TokenKind::NativeKw
                | TokenKind::SynchronizedKw
                | TokenKind::TransientKw
                | TokenKind::VolatileKw
                | TokenKind::StrictfpKw
                | TokenKind::DefaultKw
        )
    }

    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "abstract" => TokenKind::AbstractKw,
            "assert" => TokenKind::AssertKw,
            "boolean" => TokenKind::BooleanKw,
            "break" => TokenKind::BreakKw,
            "byte" => TokenKind::ByteKw,
            "case" => TokenKind::CaseKw,
            "catch" => TokenKind::CatchKw,
            "char" => TokenKind::CharKw,
            "class" => TokenKind::ClassKw,
            "continue" => TokenKind::ContinueKw,
            "default" => TokenKind::DefaultKw,
            "do" => TokenKind::DoKw,
            "double" => TokenKind::DoubleKw,
            "else" => TokenKind::ElseKw,
            "enum" => TokenKind::EnumKw,
            "extends" => TokenKind::ExtendsKw,
            "final" => TokenKind::FinalKw,
            "finally" => TokenKind::FinallyKw,
            "float" => TokenKind::FloatKw,
            "for" => TokenKind::ForKw,
            "if" => TokenKind::IfKw,
            "implements" => TokenKind::ImplementsKw,
            "import" => TokenKind::ImportKw,
            "instanceof" => TokenKind::InstanceofKw,
            "int" => TokenKind::IntKw,
            "interface" => TokenKind::InterfaceKw,
            "long" => TokenKind::LongKw,
            "native" => TokenKind::NativeKw,
            "new" => TokenKind::NewKw,
            "package" => TokenKind::PackageKw,
            "private" => TokenKind::PrivateKw,
            "protected" => TokenKind::ProtectedKw,
            "public" => TokenKind::PublicKw,
            "return" => TokenKind::ReturnKw,
            "short" => TokenKind::ShortKw,
            "static" => TokenKind::StaticKw,
            "strictfp" => TokenKind::StrictfpKw,
            "super" => TokenKind::SuperKw,
            "switch" => TokenKind::SwitchKw,
            "synchronized" => TokenKind::SynchronizedKw,
            "this" => TokenKind::ThisKw,
            "throw" => TokenKind::ThrowKw,
            "throws" => TokenKind::ThrowsKw,
            "transient" => TokenKind::TransientKw,
            "try" => TokenKind::TryKw,
            "void" => TokenKind::VoidKw,
            "volatile" => TokenKind::VolatileKw,
            "while" => TokenKind::WhileKw,
            "true" => TokenKind::TrueKw,
            "false" => TokenKind::FalseKw,
            "null" => TokenKind::NullKw,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range]
    }
}
