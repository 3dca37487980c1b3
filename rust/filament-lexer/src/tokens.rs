use serde::{Deserialize, Serialize};
use std::fmt;

/// Token kinds for the Filament BASIC dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    // Structure
    LineNo,
    Newline,
    Eof,

    // Literals and names
    Number,
    Str,
    Ident,
    /// An identifier re-tagged as a registered builtin primitive.
    Builtin,

    // Keywords
    Let,
    If,
    Then,
    Else,
    For,
    To,
    Step,
    Next,
    Goto,
    Gosub,
    Return,
    Input,
    Print,
    Rem,
    End,

    // Punctuation
    LParen,
    RParen,
    Comma,
    Colon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LineNo => write!(f, "LINENO"),
            TokenKind::Newline => write!(f, "NEWLINE"),
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::Str => write!(f, "string"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Builtin => write!(f, "builtin"),
            TokenKind::Let => write!(f, "LET"),
            TokenKind::If => write!(f, "IF"),
            TokenKind::Then => write!(f, "THEN"),
            TokenKind::Else => write!(f, "ELSE"),
            TokenKind::For => write!(f, "FOR"),
            TokenKind::To => write!(f, "TO"),
            TokenKind::Step => write!(f, "STEP"),
            TokenKind::Next => write!(f, "NEXT"),
            TokenKind::Goto => write!(f, "GOTO"),
            TokenKind::Gosub => write!(f, "GOSUB"),
            TokenKind::Return => write!(f, "RETURN"),
            TokenKind::Input => write!(f, "INPUT"),
            TokenKind::Print => write!(f, "PRINT"),
            TokenKind::Rem => write!(f, "REM"),
            TokenKind::End => write!(f, "END"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::NotEq => write!(f, "<>"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
        }
    }
}

/// A token: its kind plus the verbatim source spelling.
///
/// The literal matters even for structural tokens — the interpreter
/// keys its line index on the LineNo literal, so "010" and "10" name
/// different lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literal.is_empty() || self.literal == "\n" {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}", self.literal)
        }
    }
}
