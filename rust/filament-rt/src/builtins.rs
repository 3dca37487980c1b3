//! The pre-registered builtin primitives.
//!
//! Every builtin goes through the same `register_primitive` path hosts
//! use, so the identifier re-tagging and argument collection behave
//! identically for the stock set and for host extensions. Failures
//! are reported in-band as `Value::Error`.

use crate::interpreter::Interpreter;
use filament_core::values::{format_number, Value};
use rand::Rng;

type Handler = fn(&mut Interpreter, &[Value]) -> Value;

pub(crate) fn register_defaults(interp: &mut Interpreter) {
    let defaults: &[(&str, usize, Handler)] = &[
        // Numeric
        ("ABS", 1, abs),
        ("ACS", 1, acs),
        ("ASN", 1, asn),
        ("ATN", 1, atn),
        ("BIN", 1, bin),
        ("COS", 1, cos),
        ("EXP", 1, exp),
        ("INT", 1, int),
        ("LN", 1, ln),
        ("PI", 0, pi),
        ("RND", 1, rnd),
        ("SGN", 1, sgn),
        ("SIN", 1, sin),
        ("SQR", 1, sqr),
        ("TAN", 1, tan),
        ("VAL", 1, val),
        // String
        ("CHR$", 1, chr),
        ("CODE", 1, code),
        ("LEFT$", 2, left),
        ("LEN", 1, len),
        ("MID$", 3, mid),
        ("RIGHT$", 2, right),
        ("STR$", 1, str_),
        ("TL$", 1, tl),
        // Diagnostic
        ("DUMP", 0, dump),
    ];
    for (name, arity, handler) in defaults {
        interp.register_primitive(name, *arity, *handler);
    }
}

// -- Argument helpers --

fn number_arg(name: &str, args: &[Value], index: usize) -> Result<f64, Value> {
    match &args[index] {
        Value::Number(n) => Ok(*n),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(format!(
            "{}: argument {} must be a number, not a {}",
            name,
            index + 1,
            other.type_name()
        ))),
    }
}

fn string_arg(name: &str, args: &[Value], index: usize) -> Result<String, Value> {
    match &args[index] {
        Value::Str(s) => Ok(s.clone()),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(format!(
            "{}: argument {} must be a string, not a {}",
            name,
            index + 1,
            other.type_name()
        ))),
    }
}

fn count_arg(name: &str, args: &[Value], index: usize) -> Result<usize, Value> {
    let n = number_arg(name, args, index)? as i64;
    if n < 0 {
        return Err(Value::Error(format!(
            "{}: argument {} must not be negative",
            name,
            index + 1
        )));
    }
    Ok(n as usize)
}

fn unary(name: &str, args: &[Value], f: fn(f64) -> f64) -> Value {
    match number_arg(name, args, 0) {
        Ok(n) => Value::Number(f(n)),
        Err(e) => e,
    }
}

// -- Numeric --

fn abs(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("ABS", args, f64::abs)
}

fn acs(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("ACS", args, f64::acos)
}

fn asn(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("ASN", args, f64::asin)
}

fn atn(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("ATN", args, f64::atan)
}

/// Re-read the decimal rendering of the integer argument as base 2:
/// `BIN 1010` is 10.
fn bin(_: &mut Interpreter, args: &[Value]) -> Value {
    let digits = match number_arg("BIN", args, 0) {
        Ok(n) => (n as i64).to_string(),
        Err(e) => return e,
    };
    match i64::from_str_radix(&digits, 2) {
        Ok(n) => Value::Number(n as f64),
        Err(_) => Value::Error(format!("BIN: '{}' is not a binary number", digits)),
    }
}

fn cos(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("COS", args, f64::cos)
}

fn exp(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("EXP", args, f64::exp)
}

fn int(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("INT", args, f64::trunc)
}

fn ln(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("LN", args, f64::ln)
}

fn pi(_: &mut Interpreter, _: &[Value]) -> Value {
    Value::Number(std::f64::consts::PI)
}

/// `RND n` — a random integer in `[0, n)`.
fn rnd(_: &mut Interpreter, args: &[Value]) -> Value {
    let bound = match number_arg("RND", args, 0) {
        Ok(n) => n as i64,
        Err(e) => return e,
    };
    if bound <= 0 {
        return Value::Error("RND: upper bound must be positive".into());
    }
    Value::Number(rand::thread_rng().gen_range(0..bound) as f64)
}

fn sgn(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("SGN", args, |n| {
        if n > 0.0 {
            1.0
        } else if n < 0.0 {
            -1.0
        } else {
            0.0
        }
    })
}

fn sin(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("SIN", args, f64::sin)
}

fn sqr(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("SQR", args, f64::sqrt)
}

fn tan(_: &mut Interpreter, args: &[Value]) -> Value {
    unary("TAN", args, f64::tan)
}

fn val(_: &mut Interpreter, args: &[Value]) -> Value {
    let s = match string_arg("VAL", args, 0) {
        Ok(s) => s,
        Err(e) => return e,
    };
    match s.trim().parse::<f64>() {
        Ok(n) => Value::Number(n),
        Err(_) => Value::Error(format!("VAL: '{}' is not a number", s)),
    }
}

// -- String --

fn chr(_: &mut Interpreter, args: &[Value]) -> Value {
    let n = match number_arg("CHR$", args, 0) {
        Ok(n) => n as i64,
        Err(e) => return e,
    };
    match u32::try_from(n).ok().and_then(char::from_u32) {
        Some(ch) => Value::Str(ch.to_string()),
        None => Value::Error(format!("CHR$: {} is not a valid codepoint", n)),
    }
}

/// Codepoint of the first character; 0 for the empty string.
fn code(_: &mut Interpreter, args: &[Value]) -> Value {
    match string_arg("CODE", args, 0) {
        Ok(s) => Value::Number(s.chars().next().map(|c| c as u32 as f64).unwrap_or(0.0)),
        Err(e) => e,
    }
}

fn left(_: &mut Interpreter, args: &[Value]) -> Value {
    let s = match string_arg("LEFT$", args, 0) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let n = match count_arg("LEFT$", args, 1) {
        Ok(n) => n,
        Err(e) => return e,
    };
    Value::Str(s.chars().take(n).collect())
}

fn len(_: &mut Interpreter, args: &[Value]) -> Value {
    match string_arg("LEN", args, 0) {
        Ok(s) => Value::Number(s.chars().count() as f64),
        Err(e) => e,
    }
}

/// `MID$ s, offset, count` — zero-based offset, clamped to the end.
fn mid(_: &mut Interpreter, args: &[Value]) -> Value {
    let s = match string_arg("MID$", args, 0) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let offset = match count_arg("MID$", args, 1) {
        Ok(n) => n,
        Err(e) => return e,
    };
    let count = match count_arg("MID$", args, 2) {
        Ok(n) => n,
        Err(e) => return e,
    };
    Value::Str(s.chars().skip(offset).take(count).collect())
}

/// The last `n` characters of the string.
fn right(_: &mut Interpreter, args: &[Value]) -> Value {
    let s = match string_arg("RIGHT$", args, 0) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let n = match count_arg("RIGHT$", args, 1) {
        Ok(n) => n,
        Err(e) => return e,
    };
    let total = s.chars().count();
    Value::Str(s.chars().skip(total.saturating_sub(n)).collect())
}

/// Identical formatting to PRINT.
fn str_(_: &mut Interpreter, args: &[Value]) -> Value {
    match number_arg("STR$", args, 0) {
        Ok(n) => Value::Str(format_number(n)),
        Err(e) => e,
    }
}

/// Everything after the first character.
fn tl(_: &mut Interpreter, args: &[Value]) -> Value {
    match string_arg("TL$", args, 0) {
        Ok(s) => {
            let mut chars = s.chars();
            chars.next();
            Value::Str(chars.as_str().to_string())
        }
        Err(e) => e,
    }
}

// -- Diagnostic --

/// Dump interpreter state through the captured-output sink.
fn dump(interp: &mut Interpreter, _: &[Value]) -> Value {
    let mut lines = Vec::new();
    lines.push("VARIABLES:".to_string());
    let mut names: Vec<&String> = interp.vars.keys().collect();
    names.sort();
    for name in names {
        let value = &interp.vars[name];
        lines.push(format!("  {} => {} ({})", name, value, value.type_name()));
    }
    lines.push(format!("GOSUB STACK DEPTH: {}", interp.gstack.len()));
    lines.push("ACTIVE LOOPS:".to_string());
    let mut counters: Vec<&String> = interp.loops.keys().collect();
    counters.sort();
    for counter in counters {
        let record = &interp.loops[counter];
        lines.push(format!(
            "  {} => {} TO {} STEP {}",
            record.name, record.start, record.end, record.step
        ));
    }
    for line in lines {
        interp.emit_line(line);
    }
    Value::Number(0.0)
}
