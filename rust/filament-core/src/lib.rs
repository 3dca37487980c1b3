//! Filament Core
//!
//! The shared value domain used across the lexer, interpreter, and CLI.

pub mod values;

pub use values::Value;
