//! A tree-walking interpreter for the Lox language.
//!
//! See [Crafting Interpreters](https://craftinginterpreters.com/).
//!
//! Source text goes through four phases: scanning and parsing into an AST, a one-time
//! desugaring pass, semantic validation and finally evaluation against a chain of
//! reference-counted environment frames.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - The scanner and parser do not attempt any error recovery.  They bail out on the first
//! encountered error.
//! - Memory is reference counted: cycles between instances and closures are never freed.
//! - Runtime errors carry the offending name or value but no source location.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod ctx;
pub mod desugar;
pub mod diag;
pub mod env;
pub mod eval;
pub mod interner;
pub mod interpreter;
pub mod validate;
pub mod value;

mod builtins;
mod parser;
mod scanner;
mod token;

pub use interpreter::{Interpreter, LoxError};
pub use value::Value;
