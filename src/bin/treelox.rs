//! Lox interpreter command-line.
//!
//! When called without argument it drops into an interactive read-evaluate-print loop.
//!
//! When called with arguments, it interprets the corresponding files in a single interpreter
//! session (so code and data sharing is possible).
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=treelox=debug`) to trace the interpreter phases on stderr.

use std::env;
use std::fs;
use std::io;
use std::io::prelude::*;

use anyhow::{self, Context};

use treelox::interpreter::{Interpreter, LoxError};
use treelox::value::Value;

fn main() -> Result<(), anyhow::Error> {
    init_tracing();

    let args = env::args().skip(1).collect::<Vec<_>>();
    if !args.is_empty() {
        run_all_files(args)?;
    } else {
        run_prompt()?;
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Program output owns stdout, so diagnostics only appear on request and on stderr.
    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_all_files(paths: Vec<String>) -> Result<(), anyhow::Error> {
    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::new(&mut interp_stdout);

    for p in &paths {
        let source = fs::read_to_string(p).with_context(|| format!("failed to open {}", p))?;
        if let Err(e) = interp.eval(&source) {
            if let LoxError::Runtime(_) = e {
                eprintln!("{}", interp.dump_env());
            }
            return Err(e).with_context(|| format!("failed to run {}", p));
        }
    }

    Ok(())
}

fn run_prompt() -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();

    let mut interp = Interpreter::new(&mut interp_stdout);

    let mut input = String::new();
    loop {
        repl_stdout.write_all("\n> ".as_bytes())?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        match interp.eval(&input) {
            Ok(Value::Nil) => (),
            Ok(v) => println!("{}", v),
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
