//! A lossless Java lexer.
//!
//! Every byte of the input belongs to exactly one token, trivia included, so token ranges can be
//! used to copy original text verbatim.

use jrewrite_core::{TextRange, TextSize};

use crate::token::{Token, TokenKind};

/// Tokenize `input`. The final token is always a zero-length [`TokenKind::Eof`].
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).collect_all()
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn collect_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.input.len() / 3 + 1);
        while self.pos < self.input.len() {
            let start = self.pos;
            let kind = self.next_kind();
            debug_assert!(self.pos > start, "lexer must make progress");
            tokens.push(Token {
                kind,
                range: TextRange::new(
                    TextSize::from(start as u32),
                    TextSize::from(self.pos as u32),
                ),
            });
        }
        let end = TextSize::from(self.input.len() as u32);
        tokens.push(Token {
            kind: TokenKind::Eof,
            range: TextRange::empty(end),
        });
        tokens
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn next_kind(&mut self) -> TokenKind {
        let Some(ch) = self.peek() else {
            return TokenKind::Eof;
        };

        if ch.is_whitespace() {
            self.eat_while(char::is_whitespace);
            return TokenKind::Whitespace;
        }

        if self.rest().starts_with("//") {
            self.eat_while(|c| c != '\n' && c != '\r');
            return TokenKind::LineComment;
        }

        if self.rest().starts_with("/*") {
            let doc = self.rest().starts_with("/**") && !self.rest().starts_with("/**/");
            match self.rest()[2..].find("*/") {
                Some(end) => self.pos += 2 + end + 2,
                None => {
                    self.pos = self.input.len();
                    return TokenKind::Error;
                }
            }
            return if doc {
                TokenKind::DocComment
            } else {
                TokenKind::BlockComment
            };
        }

        if ch == '"' {
            return self.string_like();
        }

        if ch == '\'' {
            return self.char_literal();
        }

        if ch.is_ascii_digit() || (ch == '.' && self.peek_nth(1).map_or(false, |c| c.is_ascii_digit())) {
            return self.number();
        }

        if unicode_ident::is_xid_start(ch) || ch == '_' || ch == '$' {
            let start = self.pos;
            self.eat_while(|c| unicode_ident::is_xid_continue(c) || c == '$');
            let text = &self.input[start..self.pos];
            return TokenKind::from_keyword(text).unwrap_or(TokenKind::Identifier);
        }

        self.punct()
    }

    fn string_like(&mut self) -> TokenKind {
        if self.rest().starts_with("\"\"\"") {
            self.pos += 3;
            return match self.rest().find("\"\"\"") {
                Some(end) => {
                    self.pos += end + 3;
                    TokenKind::TextBlock
                }
                None => {
                    self.pos = self.input.len();
                    TokenKind::Error
                }
            };
        }

        self.bump_char();
        while let Some(ch) = self.bump_char() {
            match ch {
                '\\' => {
                    self.bump_char();
                }
                '"' => return TokenKind::StringLiteral,
                '\n' => return TokenKind::Error,
                _ => {}
            }
        }
        TokenKind::Error
    }

    fn char_literal(&mut self) -> TokenKind {
        self.bump_char();
        while let Some(ch) = self.bump_char() {
            match ch {
                '\\' => {
                    self.bump_char();
                }
                '\'' => return TokenKind::CharLiteral,
                '\n' => return TokenKind::Error,
                _ => {}
            }
        }
        TokenKind::Error
    }

    fn number(&mut self) -> TokenKind {
        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") || rest.starts_with("0b") || rest.starts_with("0B") {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            if matches!(self.peek(), Some('l' | 'L')) {
                self.pos += 1;
            }
            return TokenKind::IntLiteral;
        }

        let mut float = false;
        self.eat_while(|c| c.is_ascii_digit() || c == '_');
        if self.peek() == Some('.') && self.peek_nth(1).map_or(true, |c| !c.is_alphabetic() || c == 'e' || c == 'E') {
            float = true;
            self.pos += 1;
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            float = true;
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            self.eat_while(|c| c.is_ascii_digit());
        }
        match self.peek() {
            Some('f' | 'F' | 'd' | 'D') => {
                self.pos += 1;
                TokenKind::FloatLiteral
            }
            Some('l' | 'L') if !float => {
                self.pos += 1;
                TokenKind::IntLiteral
            }
            _ if float => TokenKind::FloatLiteral,
            _ => TokenKind::IntLiteral,
        }
    }

    fn punct(&mut self) -> TokenKind {
        const TABLE: &[(&str, TokenKind)] = &[
            ("...", TokenKind::Ellipsis),
            ("<<=", TokenKind::LeftShiftEq),
            ("::", TokenKind::ColonColon),
            ("->", TokenKind::Arrow),
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::BangEq),
            ("<=", TokenKind::LessEq),
            ("<<", TokenKind::LeftShift),
            ("++", TokenKind::PlusPlus),
            ("+=", TokenKind::PlusEq),
            ("--", TokenKind::MinusMinus),
            ("-=", TokenKind::MinusEq),
            ("*=", TokenKind::StarEq),
            ("/=", TokenKind::SlashEq),
            ("%=", TokenKind::PercentEq),
            ("&&", TokenKind::AmpAmp),
            ("&=", TokenKind::AmpEq),
            ("||", TokenKind::PipePipe),
            ("|=", TokenKind::PipeEq),
            ("^=", TokenKind::CaretEq),
            ("(", TokenKind::LParen),
            (")", TokenKind::RParen),
            ("{", TokenKind::LBrace),
            ("}", TokenKind::RBrace),
            ("[", TokenKind::LBracket),
            ("]", TokenKind::RBracket),
            (";", TokenKind::Semicolon),
            (",", TokenKind::Comma),
            (".", TokenKind::Dot),
            ("@", TokenKind::At),
            ("?", TokenKind::Question),
            (":", TokenKind::Colon),
            ("=", TokenKind::Eq),
            ("!", TokenKind::Bang),
            ("<", TokenKind::Less),
            (">", TokenKind::Greater),
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("*", TokenKind::Star),
            ("/", TokenKind::Slash),
            ("%", TokenKind::Percent),
            ("&", TokenKind::Amp),
            ("|", TokenKind::Pipe),
            ("^", TokenKind::Caret),
            ("~", TokenKind::Tilde),
        ];

        for (text, kind) in TABLE {
            if self.rest().starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }

        self.bump_char();
        TokenKind::Error
    }
}
