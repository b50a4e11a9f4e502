//! API to control the interpreter.

use std::collections::BTreeMap;
use std::io::prelude::*;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::ast::Program;
use crate::ctx::Context;
use crate::desugar::desugar;
use crate::diag::SyntaxError;
use crate::eval::{Evaluator, RuntimeError};
use crate::parser::Parser;
use crate::validate::{validate, validate_expr, SemanticError};
use crate::value::Value;

/// Tree-walk interpreter.
///
/// Every call to [`Interpreter::eval`] runs in the same global scope, so definitions made by one
/// call are visible to the next ones.
///
/// # Example
///
/// Invoke the interpreter a first time to define a class then additional times to use it:
///
/// ```
/// # use treelox::interpreter::{Interpreter, LoxError};
/// # use treelox::value::Value;
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// let class_def = r#"
///     class Point {
///         init(x, y) {
///             this.x = x;
///             this.y = y;
///         }
///         norm2() {
///             return this.x * this.x + this.y * this.y;
///         }
///     }
/// "#;
/// interp.eval(class_def)?;
///
/// interp.eval("var p = Point(3, 4);")?;
/// interp.eval("print sqrt(p.norm2());")?;
/// assert_eq!(interp.eval("p.x + p.y;")?, Value::Number(7.0));
///
/// drop(interp);
/// assert_eq!(output, b"5\n");
/// # Ok::<(), LoxError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    ctx: Rc<Context>,
    evaluator: Evaluator<'t, W>,
}

/// Errors the interpreter can raise.
#[derive(Debug, Error)]
pub enum LoxError {
    /// Error occurring during lexical or syntactic analysis.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Program rejected before evaluation.
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// Error occurring during evaluation.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl<'t, W: Write> Interpreter<'t, W> {
    pub fn new(output: &'t mut W) -> Interpreter<'t, W> {
        let ctx = Context::new();
        Interpreter {
            ctx: ctx.clone(),
            evaluator: Evaluator::new(output, ctx),
        }
    }

    /// Create an interpreter whose global scope starts with `globals` on top of the builtins.
    pub fn with_globals<'n, I>(output: &'t mut W, globals: I) -> Result<Interpreter<'t, W>, LoxError>
    where
        I: IntoIterator<Item = (&'n str, Value)>,
    {
        let interp = Interpreter::new(output);
        for (name, value) in globals {
            interp
                .evaluator
                .globals()
                .define(interp.ctx.symbol(name), value)?;
        }
        Ok(interp)
    }

    /// Parse, check and run `input`.
    ///
    /// Returns the value of the last statement if it is an expression, nil otherwise.
    pub fn eval(&mut self, input: &str) -> Result<Value, LoxError> {
        let prg = self.parse(input)?;
        self.eval_program(&prg)
    }

    /// Parse `input` into a program sharing this interpreter's symbols.
    pub fn parse(&self, input: &str) -> Result<Program, LoxError> {
        let stmts = Parser::new(input, self.ctx.clone()).parse_program()?;
        debug!(stmts = stmts.len(), "parsed");
        Ok(desugar(stmts))
    }

    /// Check and run an already built program.
    pub fn eval_program(&mut self, prg: &Program) -> Result<Value, LoxError> {
        validate(prg, &self.ctx)?;
        debug!("evaluating");
        Ok(self.evaluator.eval_program(prg)?)
    }

    /// Evaluate a single expression, without trailing semicolon, in the global scope.
    pub fn eval_expression(&mut self, input: &str) -> Result<Value, LoxError> {
        let expr = Parser::new(input, self.ctx.clone()).parse_expression()?;
        validate_expr(&expr, &self.ctx)?;
        let globals = self.evaluator.globals().clone();
        Ok(self.evaluator.eval_expr(&expr, &globals)?)
    }

    /// Value bound to `name` in the global scope, builtins included.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.evaluator.globals().get(&self.ctx.symbol(name)).ok()
    }

    /// Everything the programs run so far defined at top level.
    pub fn globals(&self) -> BTreeMap<String, Value> {
        self.evaluator
            .globals()
            .own_bindings()
            .into_iter()
            .map(|(name, value)| (name.name().to_owned(), value))
            .collect()
    }

    /// Human-readable dump of the global scope.
    pub fn dump_env(&self) -> String {
        self.evaluator.globals().pretty()
    }
}
