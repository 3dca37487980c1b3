//! Line-oriented lexer for Filament BASIC source code.

use crate::tokens::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {line}, col {col}")]
    UnexpectedChar { ch: char, line: usize, col: usize },
    #[error("unterminated string at line {line}, col {col}")]
    UnterminatedString { line: usize, col: usize },
}

/// Tokenize a whole source file.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    at_line_start: bool,
    prev_kind: Option<TokenKind>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            at_line_start: true,
            prev_kind: None,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            self.at_line_start = tok.kind == TokenKind::Newline;
            self.prev_kind = Some(tok.kind);
            tokens.push(tok);
        }
        tokens.push(Token::new(TokenKind::Eof, ""));
        Ok(tokens)
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        while matches!(self.current(), Some(' ') | Some('\t') | Some('\r')) {
            self.advance();
        }
        let ch = match self.current() {
            Some(ch) => ch,
            None => return Ok(None),
        };
        match ch {
            '\n' => {
                self.advance();
                Ok(Some(Token::new(TokenKind::Newline, "\n")))
            }
            '0'..='9' => Ok(Some(self.read_number(false))),
            '-' => {
                if matches!(self.peek(), Some('0'..='9')) && !self.prev_ends_expression() {
                    self.advance();
                    Ok(Some(self.read_number(true)))
                } else {
                    self.advance();
                    Ok(Some(Token::new(TokenKind::Minus, "-")))
                }
            }
            '"' => self.read_string().map(Some),
            'A'..='Z' | 'a'..='z' => Ok(Some(self.read_identifier())),
            '(' => Ok(Some(self.single(TokenKind::LParen, "("))),
            ')' => Ok(Some(self.single(TokenKind::RParen, ")"))),
            ',' => Ok(Some(self.single(TokenKind::Comma, ","))),
            ':' => Ok(Some(self.single(TokenKind::Colon, ":"))),
            '+' => Ok(Some(self.single(TokenKind::Plus, "+"))),
            '*' => Ok(Some(self.single(TokenKind::Star, "*"))),
            '/' => Ok(Some(self.single(TokenKind::Slash, "/"))),
            '%' => Ok(Some(self.single(TokenKind::Percent, "%"))),
            '=' => Ok(Some(self.single(TokenKind::Eq, "="))),
            '<' => {
                self.advance();
                match self.current() {
                    Some('=') => Ok(Some(self.single(TokenKind::LtEq, "<="))),
                    Some('>') => Ok(Some(self.single(TokenKind::NotEq, "<>"))),
                    _ => Ok(Some(Token::new(TokenKind::Lt, "<"))),
                }
            }
            '>' => {
                self.advance();
                match self.current() {
                    Some('=') => Ok(Some(self.single(TokenKind::GtEq, ">="))),
                    _ => Ok(Some(Token::new(TokenKind::Gt, ">"))),
                }
            }
            _ => Err(LexError::UnexpectedChar {
                ch,
                line: self.line,
                col: self.col,
            }),
        }
    }

    fn single(&mut self, kind: TokenKind, literal: &str) -> Token {
        self.advance();
        Token::new(kind, literal)
    }

    /// A token that can end an expression means a following `-` is the
    /// binary operator, not the sign of a numeric literal.
    fn prev_ends_expression(&self) -> bool {
        matches!(
            self.prev_kind,
            Some(TokenKind::Number)
                | Some(TokenKind::Str)
                | Some(TokenKind::Ident)
                | Some(TokenKind::Builtin)
                | Some(TokenKind::RParen)
        )
    }

    fn read_number(&mut self, negative: bool) -> Token {
        let mut literal = String::new();
        if negative {
            literal.push('-');
        }
        while matches!(self.current(), Some('0'..='9')) {
            literal.push(self.advance().unwrap());
        }
        if self.current() == Some('.') && matches!(self.peek(), Some('0'..='9')) {
            literal.push(self.advance().unwrap());
            while matches!(self.current(), Some('0'..='9')) {
                literal.push(self.advance().unwrap());
            }
        }
        // A bare integer opening a physical line is that line's number.
        let kind = if self.at_line_start && !negative {
            TokenKind::LineNo
        } else {
            TokenKind::Number
        };
        Token::new(kind, literal)
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let (start_line, start_col) = (self.line, self.col);
        self.advance(); // opening quote
        let mut literal = String::new();
        loop {
            match self.current() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString {
                        line: start_line,
                        col: start_col,
                    })
                }
                Some('"') => {
                    self.advance();
                    return Ok(Token::new(TokenKind::Str, literal));
                }
                Some('\\') if matches!(self.peek(), Some('"') | Some('\\')) => {
                    self.advance();
                    literal.push(self.advance().unwrap());
                }
                Some(_) => {
                    literal.push(self.advance().unwrap());
                }
            }
        }
    }

    fn read_identifier(&mut self) -> Token {
        let mut name = String::new();
        while matches!(self.current(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            name.push(self.advance().unwrap());
        }
        if self.current() == Some('$') {
            name.push(self.advance().unwrap());
        }
        match keyword_kind(&name) {
            Some(TokenKind::Rem) => {
                // The rest of the physical line is commentary.
                let mut comment = String::new();
                while matches!(self.current(), Some(c) if c != '\n') {
                    comment.push(self.advance().unwrap());
                }
                Token::new(TokenKind::Rem, comment.trim().to_string())
            }
            Some(kind) => Token::new(kind, name),
            None => Token::new(TokenKind::Ident, name),
        }
    }
}

fn keyword_kind(name: &str) -> Option<TokenKind> {
    match name {
        "LET" => Some(TokenKind::Let),
        "IF" => Some(TokenKind::If),
        "THEN" => Some(TokenKind::Then),
        "ELSE" => Some(TokenKind::Else),
        "FOR" => Some(TokenKind::For),
        "TO" => Some(TokenKind::To),
        "STEP" => Some(TokenKind::Step),
        "NEXT" => Some(TokenKind::Next),
        "GOTO" => Some(TokenKind::Goto),
        "GOSUB" => Some(TokenKind::Gosub),
        "RETURN" => Some(TokenKind::Return),
        "INPUT" => Some(TokenKind::Input),
        "PRINT" => Some(TokenKind::Print),
        "REM" => Some(TokenKind::Rem),
        "END" => Some(TokenKind::End),
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        _ => None,
    }
}
