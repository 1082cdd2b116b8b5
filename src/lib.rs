#![allow(clippy::needless_return)]

//! Loxido is a tree-walk interpreter for Lox, the language from Bob Nystrom's
//! [Crafting Interpreters](https://craftinginterpreters.com/). It is a
//! dynamically typed language with lexical scoping, first-class functions,
//! and single-inheritance classes.
//!
//! ## Pipeline
//!
//! Source text passes through four stages, each gated on the one before it:
//!
//! 1. [`scanner`] turns characters into a token stream, reporting lexical
//!    mistakes as [`ScanError`](error::ScanError).
//! 2. [`parser`] turns tokens into a tree of [`Expr`](expr::Expr)s and
//!    [`Stmt`](stmt::Stmt)s, reporting grammar mistakes as
//!    [`ParseError`](error::ParseError) and recovering via synchronization
//!    so multiple mistakes can be reported per run.
//! 3. [`resolver`] walks the tree once, statically, to bind every variable
//!    reference to a lexical scope depth, reporting misuse (redeclaration,
//!    `this`/`super` outside a class, returning a value from an initializer)
//!    as [`ResolveError`](error::ResolveError).
//! 4. [`interpreter`] walks the tree again, this time evaluating it, reporting
//!    type and arity mistakes as [`RuntimeError`](error::RuntimeError).
//!
//! Running stops at the first stage that reports an error; later stages never
//! see a tree that an earlier stage flagged as broken.

use std::{fs, process};
use std::io::Write;
use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::{did_error, did_runtime_error, reset_error};
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Entry point driving the pipeline against a single output sink.
///
/// `output` receives everything the program prints, which lets callers
/// (the REPL, `run_file`, or a test harness) capture it independently of
/// stdout.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new<W: Write + 'static>(output: W) -> Self {
        Lox {
            interpreter: Interpreter::new(Box::new(output)),
        }
    }

    /// Runs a script file to completion and exits the process with the
    /// status the pipeline produced: 0 on success, 65 on a scan/parse/resolve
    /// error, 70 on a runtime error, 1 if the file could not be read.
    pub fn run_file(&mut self, path: impl AsRef<Path>) {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) => {
                eprintln!("Error reading file: {error}");
                process::exit(1);
            },
        };

        self.run(&contents);

        if did_error() {
            process::exit(65);
        }
        if did_runtime_error() {
            process::exit(70);
        }
    }

    /// Runs an interactive REPL, persisting history to `~/.loxido_history`.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new().expect("terminal to support line editing");

        let history_path = home::home_dir().map(|home| home.join(".loxido_history"));
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if line.trim() == "exit()" {
                        break;
                    }
                    self.run(&line);
                    reset_error();
                },
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("Error reading input: {error}");
                    break;
                },
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }
    }

    fn run(&mut self, source: &str) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        if did_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        if did_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}
