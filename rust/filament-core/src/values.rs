//! Tagged value representation for the Filament interpreter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime values in a Filament program.
///
/// The domain is deliberately closed: numbers are IEEE-754 doubles,
/// strings are UTF-8, and failures travel in-band as `Error` so that
/// any operator can short-circuit on a failed operand without the
/// expression engine threading a second channel through every level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Str(String),
    Error(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Render the value the way PRINT and STR$ do.
    pub fn as_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.clone(),
            Value::Error(e) => format!("error: {}", e),
        }
    }
}

/// Exact integers print with no fractional component; everything else
/// uses the default float rendering.
pub fn format_number(n: f64) -> String {
    if n == n.trunc() && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
