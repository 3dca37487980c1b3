//! Cursor-based interpreter for the Filament BASIC dialect.
//!
//! The interpreter threads one mutable cursor through an immutable
//! token vector. Statement handlers consume the tokens of their
//! statement and leave the cursor on its terminator; the dispatcher
//! then advances by one, except when a handler jumped, in which case
//! the cursor already points at the first statement token of the
//! target line.

use crate::builtins;
use filament_core::values::Value;
use filament_lexer::tokens::{Token, TokenKind};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    /// A statement failed; rendered as the classic interpreter banner.
    #[error("Line {line} : {message}")]
    Statement { line: String, message: String },
    /// The program terminated with loop records still active.
    #[error("Unclosed FOR loop")]
    UnclosedFor,
}

/// A registered builtin primitive: fixed arity plus the handler.
///
/// Handlers receive the interpreter so host-supplied primitives can
/// read and write variables; `Rc` lets them close over external state.
#[derive(Clone)]
pub struct Builtin {
    pub arity: usize,
    pub handler: Rc<dyn Fn(&mut Interpreter, &[Value]) -> Value>,
}

/// State of one active counted loop, keyed by its counter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ForRecord {
    pub(crate) name: String,
    /// Offset of the first token after the FOR header.
    pub(crate) body_offset: usize,
    pub(crate) start: i64,
    pub(crate) end: i64,
    pub(crate) step: i64,
    pub(crate) finished: bool,
}

pub struct Interpreter {
    pub(crate) program: Vec<Token>,
    /// Line-number literal -> offset of the token after the LineNo
    /// marker. Keyed by the verbatim literal: "010" and "10" are
    /// different lines.
    line_index: HashMap<String, usize>,
    cursor: usize,
    current_line: String,
    pub(crate) vars: HashMap<String, Value>,
    pub(crate) gstack: Vec<usize>,
    pub(crate) loops: HashMap<String, ForRecord>,
    builtins: HashMap<String, Builtin>,
    finished: bool,
    jumped: bool,
    trace: bool,
    stdin: Box<dyn BufRead>,
    /// Every PRINT line, captured for hosts and tests.
    pub output: Vec<String>,
}

impl Interpreter {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut line_index = HashMap::new();
        for (offset, tok) in tokens.iter().enumerate() {
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::LineNo => {
                    if line_index.contains_key(&tok.literal) {
                        eprintln!("warning: duplicate line number {}", tok.literal);
                    } else {
                        line_index.insert(tok.literal.clone(), offset + 1);
                    }
                }
                _ => {}
            }
        }
        let mut interp = Self {
            program: tokens,
            line_index,
            cursor: 0,
            current_line: String::new(),
            vars: HashMap::new(),
            gstack: Vec::new(),
            loops: HashMap::new(),
            builtins: HashMap::new(),
            finished: false,
            jumped: false,
            trace: false,
            stdin: Box::new(io::BufReader::new(io::stdin())),
            output: Vec::new(),
        };
        builtins::register_defaults(&mut interp);
        interp
    }

    // -- Host API --

    pub fn set_trace(&mut self, on: bool) {
        self.trace = on;
    }

    /// Replace the line source consumed by INPUT.
    pub fn set_input(&mut self, input: Box<dyn BufRead>) {
        self.stdin = input;
    }

    pub fn get_variable(&self, name: &str) -> Value {
        match self.vars.get(name) {
            Some(value) => value.clone(),
            None => Value::Error(format!("variable '{}' doesn't exist", name)),
        }
    }

    pub fn set_variable(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    /// Register a named primitive and re-tag every matching identifier
    /// token in the program as a builtin reference. Registration must
    /// come after construction (which indexes the lines) and before
    /// the program runs; names keep their `$` sigil.
    pub fn register_primitive<F>(&mut self, name: &str, arity: usize, handler: F)
    where
        F: Fn(&mut Interpreter, &[Value]) -> Value + 'static,
    {
        self.builtins.insert(
            name.to_string(),
            Builtin {
                arity,
                handler: Rc::new(handler),
            },
        );
        for tok in &mut self.program {
            if tok.kind == TokenKind::Ident && tok.literal == name {
                tok.kind = TokenKind::Builtin;
            }
        }
    }

    /// Drive the program to completion, the first error, or END.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while !self.finished && self.cursor < self.program.len() {
            self.run_once()?;
        }
        if !self.loops.is_empty() {
            return Err(RuntimeError::UnclosedFor);
        }
        Ok(())
    }

    /// Execute a single step: dispatch the token under the cursor.
    pub fn run_once(&mut self) -> Result<(), RuntimeError> {
        if self.finished || self.cursor >= self.program.len() {
            return Ok(());
        }
        let tok = self.program[self.cursor].clone();
        if self.trace {
            eprintln!("[{:04}] line {} : {}", self.cursor, self.current_line, tok);
        }
        self.jumped = false;
        let result = match tok.kind {
            TokenKind::Newline | TokenKind::Colon => Ok(()),
            TokenKind::LineNo => {
                self.current_line = tok.literal.clone();
                Ok(())
            }
            TokenKind::End | TokenKind::Eof => {
                self.finished = true;
                Ok(())
            }
            TokenKind::For => self.run_for(),
            TokenKind::Gosub => self.run_gosub(),
            TokenKind::Goto => self.run_goto(),
            TokenKind::If => self.run_if(),
            TokenKind::Input => self.run_input(),
            TokenKind::Let => self.run_let(),
            TokenKind::Next => self.run_next(),
            TokenKind::Print => self.run_print(),
            TokenKind::Rem => self.run_rem(),
            TokenKind::Return => self.run_return(),
            TokenKind::Builtin => match self.call_builtin() {
                Value::Error(e) => Err(e),
                _ => Ok(()),
            },
            _ => Err("Token not handled".to_string()),
        };
        match result {
            Ok(()) => {
                if !self.jumped {
                    self.cursor += 1;
                }
                Ok(())
            }
            Err(message) => Err(RuntimeError::Statement {
                line: self.current_line.clone(),
                message,
            }),
        }
    }

    // -- Token helpers --

    fn kind_at(&self, offset: usize) -> TokenKind {
        self.program
            .get(offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn literal_at(&self, offset: usize) -> String {
        self.program
            .get(offset)
            .map(|t| t.literal.clone())
            .unwrap_or_default()
    }

    pub(crate) fn emit_line(&mut self, line: String) {
        println!("{}", line);
        self.output.push(line);
    }

    // -- Expression engine --

    /// factor := "(" expression ")" | number | string | builtin | ident
    fn factor(&mut self) -> Value {
        match self.kind_at(self.cursor) {
            TokenKind::LParen => {
                self.cursor += 1;
                let value = self.expression(true);
                if value.is_error() {
                    return value;
                }
                if self.kind_at(self.cursor) != TokenKind::RParen {
                    return Value::Error("unclosed bracket around expression".into());
                }
                self.cursor += 1;
                value
            }
            TokenKind::Number => {
                let literal = self.literal_at(self.cursor);
                self.cursor += 1;
                match literal.parse::<f64>() {
                    Ok(n) => Value::Number(n),
                    Err(_) => Value::Error(format!("failed to parse '{}' as a number", literal)),
                }
            }
            TokenKind::Str => {
                let literal = self.literal_at(self.cursor);
                self.cursor += 1;
                Value::Str(literal)
            }
            TokenKind::Builtin => self.call_builtin(),
            TokenKind::Ident => {
                let name = self.literal_at(self.cursor);
                self.cursor += 1;
                self.get_variable(&name)
            }
            _ => Value::Error(format!(
                "unexpected token in expression: {}",
                self.program
                    .get(self.cursor)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "EOF".into())
            )),
        }
    }

    /// term := factor (("*" | "/" | "%") factor)*
    fn term(&mut self) -> Value {
        let mut left = self.factor();
        loop {
            if left.is_error() {
                return left;
            }
            let op = self.kind_at(self.cursor);
            if !matches!(op, TokenKind::Star | TokenKind::Slash | TokenKind::Percent) {
                return left;
            }
            self.cursor += 1;
            let right = self.factor();
            left = apply_term_op(op, &left, &right);
        }
    }

    /// expression := term (("+" | "-" | AND | OR) term)*
    ///
    /// AND/OR only combine when `allow_logical` is set; IF parses its
    /// comparisons with logicals disabled so the chain keywords stay
    /// visible at the IF level.
    fn expression(&mut self, allow_logical: bool) -> Value {
        let mut left = self.term();
        loop {
            if left.is_error() {
                return left;
            }
            let op = self.kind_at(self.cursor);
            let combines = matches!(op, TokenKind::Plus | TokenKind::Minus)
                || (allow_logical && matches!(op, TokenKind::And | TokenKind::Or));
            if !combines {
                return left;
            }
            self.cursor += 1;
            let right = self.term();
            left = apply_expr_op(op, &left, &right);
        }
    }

    /// comparison := expression [("=" | "<>" | "<" | "<=" | ">" | ">=") expression]
    fn comparison(&mut self, allow_logical: bool) -> Value {
        let left = self.expression(allow_logical);
        if left.is_error() {
            return left;
        }
        let op = self.kind_at(self.cursor);
        if !matches!(
            op,
            TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
        ) {
            return left;
        }
        self.cursor += 1;
        let right = self.expression(allow_logical);
        apply_comparison(op, &left, &right)
    }

    /// Invoke the builtin named by the token under the cursor and
    /// leave the cursor one past its last argument.
    pub(crate) fn call_builtin(&mut self) -> Value {
        let name = self.literal_at(self.cursor);
        let entry = match self.builtins.get(&name) {
            Some(entry) => entry.clone(),
            None => return Value::Error(format!("builtin '{}' is not registered", name)),
        };
        self.cursor += 1;
        let mut args = Vec::with_capacity(entry.arity);
        while args.len() < entry.arity {
            match self.kind_at(self.cursor) {
                TokenKind::Comma => {
                    self.cursor += 1;
                }
                TokenKind::Newline | TokenKind::Eof => {
                    return Value::Error(format!(
                        "hit end of line while collecting arguments for {}",
                        name
                    ));
                }
                _ => {
                    let value = self.expression(true);
                    if value.is_error() {
                        return value;
                    }
                    args.push(value);
                }
            }
        }
        (entry.handler)(self, &args)
    }

    // -- Statement handlers --

    /// LET ident = expression
    fn run_let(&mut self) -> Result<(), String> {
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Ident {
            return Err("expected identifier after LET".into());
        }
        let name = self.literal_at(self.cursor);
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Eq {
            return Err(format!("expected '=' after LET {}", name));
        }
        self.cursor += 1;
        match self.expression(true) {
            Value::Error(e) => Err(e),
            value => {
                self.vars.insert(name, value);
                Ok(())
            }
        }
    }

    /// GOTO line
    fn run_goto(&mut self) -> Result<(), String> {
        let (line, offset) = self.jump_target("GOTO")?;
        self.cursor = offset;
        self.current_line = line;
        self.jumped = true;
        Ok(())
    }

    /// GOSUB line — like GOTO, but push the return address first.
    fn run_gosub(&mut self) -> Result<(), String> {
        let (line, offset) = self.jump_target("GOSUB")?;
        self.gstack.push(self.cursor);
        self.cursor = offset;
        self.current_line = line;
        self.jumped = true;
        Ok(())
    }

    /// Parse the line-number operand of GOTO/GOSUB and resolve it,
    /// leaving the cursor one past the operand (the return address).
    fn jump_target(&mut self, verb: &str) -> Result<(String, usize), String> {
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Number {
            return Err(format!("expected a line number after {}", verb));
        }
        let literal = self.literal_at(self.cursor);
        self.cursor += 1;
        match self.line_index.get(&literal) {
            Some(&offset) => Ok((literal, offset)),
            None => Err(format!("Failed to {} line {}", verb, literal)),
        }
    }

    /// RETURN — resume at the offset pushed by the matching GOSUB.
    fn run_return(&mut self) -> Result<(), String> {
        match self.gstack.pop() {
            Some(offset) => {
                self.cursor = offset;
                Ok(())
            }
            None => Err("RETURN without GOSUB".into()),
        }
    }

    /// IF cmp (AND|OR cmp)* THEN stmt [ELSE stmt]
    ///
    /// Comparisons are parsed with logicals disabled and the running
    /// truth value folds left over the chain keywords. Both sides of
    /// every chain link are evaluated.
    fn run_if(&mut self) -> Result<(), String> {
        self.cursor += 1;
        let mut truth = truthiness(self.comparison(false))?;
        loop {
            match self.kind_at(self.cursor) {
                TokenKind::And => {
                    self.cursor += 1;
                    let rhs = truthiness(self.comparison(false))?;
                    truth = truth && rhs;
                }
                TokenKind::Or => {
                    self.cursor += 1;
                    let rhs = truthiness(self.comparison(false))?;
                    truth = truth || rhs;
                }
                _ => break,
            }
        }
        if self.kind_at(self.cursor) != TokenKind::Then {
            return Err("expected THEN after IF condition".into());
        }
        self.cursor += 1;
        if truth {
            self.step_nested()?;
            if self.jumped {
                // A jumping consequent already sits on its target.
                return Ok(());
            }
            // Undo the nested dispatcher's advance, then swallow the
            // rest of the statement (including any ELSE branch).
            self.cursor -= 1;
            while !matches!(self.kind_at(self.cursor), TokenKind::Newline | TokenKind::Eof) {
                self.cursor += 1;
            }
            Ok(())
        } else {
            loop {
                match self.kind_at(self.cursor) {
                    TokenKind::Newline | TokenKind::Eof => return Ok(()),
                    TokenKind::Else => {
                        self.cursor += 1;
                        self.step_nested()?;
                        if !self.jumped {
                            self.cursor -= 1;
                        }
                        return Ok(());
                    }
                    _ => self.cursor += 1,
                }
            }
        }
    }

    /// Run one nested statement on behalf of IF, unwrapping the line
    /// annotation the outer dispatcher will re-apply.
    fn step_nested(&mut self) -> Result<(), String> {
        self.run_once().map_err(|e| match e {
            RuntimeError::Statement { message, .. } => message,
            other => other.to_string(),
        })
    }

    /// FOR ident = bound TO bound [STEP literal]
    fn run_for(&mut self) -> Result<(), String> {
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Ident {
            return Err("expected identifier after FOR".into());
        }
        let name = self.literal_at(self.cursor);
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Eq {
            return Err(format!("expected '=' after FOR {}", name));
        }
        self.cursor += 1;
        let start = self.loop_bound()?;
        if self.kind_at(self.cursor) != TokenKind::To {
            return Err("expected TO after FOR start value".into());
        }
        self.cursor += 1;
        let end = self.loop_bound()?;
        let mut step = 1i64;
        if self.kind_at(self.cursor) == TokenKind::Step {
            self.cursor += 1;
            if self.kind_at(self.cursor) != TokenKind::Number {
                return Err("expected an integer literal after STEP".into());
            }
            let literal = self.literal_at(self.cursor);
            let parsed = literal
                .parse::<f64>()
                .map_err(|_| format!("failed to parse '{}' as a number", literal))?;
            if parsed != parsed.trunc() {
                return Err(format!("STEP must be an integer, got '{}'", literal));
            }
            step = parsed as i64;
            self.cursor += 1;
        }
        self.loops.insert(
            name.clone(),
            ForRecord {
                name: name.clone(),
                body_offset: self.cursor,
                start,
                end,
                step,
                finished: false,
            },
        );
        self.vars.insert(name, Value::Number(start as f64));
        Ok(())
    }

    /// A FOR bound: numeric literal or Number-typed variable.
    fn loop_bound(&mut self) -> Result<i64, String> {
        match self.kind_at(self.cursor) {
            TokenKind::Number => {
                let literal = self.literal_at(self.cursor);
                self.cursor += 1;
                literal
                    .parse::<f64>()
                    .map(|n| n as i64)
                    .map_err(|_| format!("failed to parse '{}' as a number", literal))
            }
            TokenKind::Ident => {
                let name = self.literal_at(self.cursor);
                self.cursor += 1;
                match self.get_variable(&name) {
                    Value::Number(n) => Ok(n as i64),
                    Value::Error(e) => Err(e),
                    other => Err(format!(
                        "FOR bound {} must be a number, not a {}",
                        name,
                        other.type_name()
                    )),
                }
            }
            _ => Err("expected a number or variable in FOR bounds".into()),
        }
    }

    /// NEXT ident
    ///
    /// Termination is equality with the endpoint. The counter is
    /// incremented even on the terminating pass, so after the loop it
    /// sits one step past the endpoint.
    fn run_next(&mut self) -> Result<(), String> {
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Ident {
            return Err("expected identifier after NEXT".into());
        }
        let name = self.literal_at(self.cursor);
        self.cursor += 1;
        let mut record = match self.loops.get(&name) {
            Some(record) => record.clone(),
            None => return Err("NEXT without FOR".into()),
        };
        let counter = match self.get_variable(&name) {
            Value::Number(n) => n as i64,
            Value::Error(e) => return Err(e),
            other => {
                return Err(format!(
                    "NEXT counter {} must be a number, not a {}",
                    name,
                    other.type_name()
                ))
            }
        };
        if record.start == record.end {
            record.finished = true;
        }
        let next_value = counter.wrapping_add(record.step);
        self.vars.insert(name.clone(), Value::Number(next_value as f64));
        if record.finished {
            self.loops.remove(&name);
            return Ok(());
        }
        if next_value == record.end {
            record.finished = true;
        }
        let body_offset = record.body_offset;
        self.loops.insert(name, record);
        self.cursor = body_offset;
        Ok(())
    }

    /// PRINT item* — items run until the end of the statement.
    fn run_print(&mut self) -> Result<(), String> {
        self.cursor += 1;
        let mut out = String::new();
        loop {
            match self.kind_at(self.cursor) {
                TokenKind::Newline | TokenKind::Eof | TokenKind::Colon | TokenKind::Else => break,
                TokenKind::Number | TokenKind::Str => {
                    out.push_str(&self.literal_at(self.cursor));
                }
                TokenKind::Comma => out.push(' '),
                TokenKind::Builtin => {
                    match self.call_builtin() {
                        Value::Error(e) => return Err(e),
                        value => out.push_str(&value.as_string()),
                    }
                    // The call left the cursor one past the last
                    // argument; the loop's own advance follows.
                    self.cursor -= 1;
                }
                _ => {
                    match self.expression(true) {
                        Value::Error(e) => return Err(e),
                        value => out.push_str(&value.as_string()),
                    }
                    self.cursor -= 1;
                }
            }
            self.cursor += 1;
        }
        self.emit_line(out);
        Ok(())
    }

    /// INPUT "prompt" , ident
    fn run_input(&mut self) -> Result<(), String> {
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Str {
            return Err("expected a prompt string after INPUT".into());
        }
        let prompt = self.literal_at(self.cursor);
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Comma {
            return Err("expected ',' after INPUT prompt".into());
        }
        self.cursor += 1;
        if self.kind_at(self.cursor) != TokenKind::Ident {
            return Err("expected identifier after INPUT prompt".into());
        }
        let name = self.literal_at(self.cursor);
        self.cursor += 1;
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut line = String::new();
        self.stdin
            .read_line(&mut line)
            .map_err(|e| format!("failed to read input: {}", e))?;
        let text = line.trim_end_matches(|c| c == '\n' || c == '\r').to_string();
        let value = if name.ends_with('$') {
            Value::Str(text)
        } else {
            match text.parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => return Err(format!("failed to parse '{}' as a number", text)),
            }
        };
        self.vars.insert(name, value);
        Ok(())
    }

    /// REM — commentary until the end of the line.
    fn run_rem(&mut self) -> Result<(), String> {
        self.cursor += 1;
        while !matches!(self.kind_at(self.cursor), TokenKind::Newline | TokenKind::Eof) {
            self.cursor += 1;
        }
        Ok(())
    }
}

fn truthiness(value: Value) -> Result<bool, String> {
    match value {
        Value::Number(n) => Ok(n != 0.0),
        Value::Error(e) => Err(e),
        Value::Str(_) => Err("IF requires a numeric condition".into()),
    }
}

fn type_mismatch(op: TokenKind, lhs: &Value, rhs: &Value) -> Value {
    Value::Error(format!(
        "type mismatch: {} {} {}",
        lhs.type_name(),
        op,
        rhs.type_name()
    ))
}

/// `*`, `/`, `%` — numbers only.
fn apply_term_op(op: TokenKind, lhs: &Value, rhs: &Value) -> Value {
    if lhs.is_error() {
        return lhs.clone();
    }
    if rhs.is_error() {
        return rhs.clone();
    }
    match (lhs, rhs) {
        (Value::Number(x), Value::Number(y)) => match op {
            TokenKind::Star => Value::Number(x * y),
            TokenKind::Slash => {
                if *y == 0.0 {
                    Value::Error("Division by zero".into())
                } else {
                    Value::Number(x / y)
                }
            }
            TokenKind::Percent => {
                let (a, b) = (*x as i64, *y as i64);
                if b == 0 {
                    Value::Error("Division by zero".into())
                } else {
                    Value::Number((a % b) as f64)
                }
            }
            _ => unreachable!("term operator {:?}", op),
        },
        _ => type_mismatch(op, lhs, rhs),
    }
}

/// `+`, `-`, AND, OR — `+` also concatenates strings; AND and OR
/// truncate to integers and apply the bitwise operation.
fn apply_expr_op(op: TokenKind, lhs: &Value, rhs: &Value) -> Value {
    if lhs.is_error() {
        return lhs.clone();
    }
    if rhs.is_error() {
        return rhs.clone();
    }
    match (lhs, rhs) {
        (Value::Number(x), Value::Number(y)) => match op {
            TokenKind::Plus => Value::Number(x + y),
            TokenKind::Minus => Value::Number(x - y),
            TokenKind::And => Value::Number(((*x as i64) & (*y as i64)) as f64),
            TokenKind::Or => Value::Number(((*x as i64) | (*y as i64)) as f64),
            _ => unreachable!("expression operator {:?}", op),
        },
        (Value::Str(a), Value::Str(b)) => match op {
            TokenKind::Plus => Value::Str(format!("{}{}", a, b)),
            _ => type_mismatch(op, lhs, rhs),
        },
        _ => type_mismatch(op, lhs, rhs),
    }
}

/// Comparison operators produce Number 1 or 0. Number comparisons
/// follow IEEE-754 (every NaN comparison except `<>` is false);
/// string comparisons are lexicographic.
fn apply_comparison(op: TokenKind, lhs: &Value, rhs: &Value) -> Value {
    if lhs.is_error() {
        return lhs.clone();
    }
    if rhs.is_error() {
        return rhs.clone();
    }
    let truth = match (lhs, rhs) {
        (Value::Number(x), Value::Number(y)) => match op {
            TokenKind::Eq => x == y,
            TokenKind::NotEq => x != y,
            TokenKind::Lt => x < y,
            TokenKind::LtEq => x <= y,
            TokenKind::Gt => x > y,
            TokenKind::GtEq => x >= y,
            _ => unreachable!("comparison operator {:?}", op),
        },
        (Value::Str(a), Value::Str(b)) => match op {
            TokenKind::Eq => a == b,
            TokenKind::NotEq => a != b,
            TokenKind::Lt => a < b,
            TokenKind::LtEq => a <= b,
            TokenKind::Gt => a > b,
            TokenKind::GtEq => a >= b,
            _ => unreachable!("comparison operator {:?}", op),
        },
        _ => return type_mismatch(op, lhs, rhs),
    };
    Value::Number(if truth { 1.0 } else { 0.0 })
}
