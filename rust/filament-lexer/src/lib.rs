//! Filament Lexer
//!
//! Turns BASIC source text into the linear token stream the
//! interpreter consumes. Line numbers keep their verbatim spelling so
//! that the interpreter can key its line index on the literal.

pub mod lexer;
pub mod tokens;

pub use lexer::{tokenize, LexError, Lexer};
pub use tokens::{Token, TokenKind};
