//! Filament CLI — run and inspect BASIC programs.

use clap::{Parser, Subcommand};
use filament_core::Value;
use filament_lexer::tokenize;
use filament_rt::Interpreter;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

#[derive(Parser)]
#[command(
    name = "filament",
    version,
    about = "The Filament BASIC interpreter",
    long_about = "Filament is a small line-numbered BASIC dialect with an embeddable\n\
                  tree-walking interpreter. Hosts can register their own primitives;\n\
                  this CLI ships PEEK and POKE over a 256-byte scratch memory as a\n\
                  working example."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a `.bas` source file
    Run {
        /// Path to the source file
        file: PathBuf,

        /// Print each dispatched token to stderr
        #[arg(long)]
        trace: bool,
    },
    /// Dump the token stream produced by the lexer
    Lex {
        /// Path to the source file
        file: PathBuf,

        /// Emit the stream as JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { file, trace } => cmd_run(&file, trace),
        Commands::Lex { file, json } => cmd_lex(&file, json),
    }
}

fn read_source(file: &Path) -> Result<String, ExitCode> {
    std::fs::read_to_string(file).map_err(|e| {
        eprintln!("error: cannot read {}: {}", file.display(), e);
        ExitCode::FAILURE
    })
}

fn cmd_run(file: &Path, trace: bool) -> ExitCode {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut interp = Interpreter::new(tokens);
    interp.set_trace(trace);
    register_memory_primitives(&mut interp);
    if let Err(e) = interp.run() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn cmd_lex(file: &Path, json: bool) -> ExitCode {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(code) => return code,
    };
    match tokenize(&source) {
        Ok(tokens) => {
            if json {
                match serde_json::to_string_pretty(&tokens) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                for tok in &tokens {
                    println!("{:?}\t{}", tok.kind, tok.literal.escape_debug());
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// PEEK and POKE over a shared byte array — the embedding pattern for
/// host primitives that close over external state.
fn register_memory_primitives(interp: &mut Interpreter) {
    let memory = Rc::new(RefCell::new([0u8; 256]));

    let peek_memory = Rc::clone(&memory);
    interp.register_primitive("PEEK", 1, move |_, args| {
        let addr = match args[0] {
            Value::Number(n) => n as i64,
            _ => return Value::Error("PEEK: address must be a number".into()),
        };
        if !(0..256).contains(&addr) {
            return Value::Error(format!("PEEK: address {} out of range", addr));
        }
        Value::Number(peek_memory.borrow()[addr as usize] as f64)
    });

    interp.register_primitive("POKE", 2, move |_, args| {
        let addr = match args[0] {
            Value::Number(n) => n as i64,
            _ => return Value::Error("POKE: address must be a number".into()),
        };
        let byte = match args[1] {
            Value::Number(n) => n as i64,
            _ => return Value::Error("POKE: value must be a number".into()),
        };
        if !(0..256).contains(&addr) {
            return Value::Error(format!("POKE: address {} out of range", addr));
        }
        if !(0..256).contains(&byte) {
            return Value::Error(format!("POKE: value {} out of range", byte));
        }
        memory.borrow_mut()[addr as usize] = byte as u8;
        Value::Number(0.0)
    });
}
