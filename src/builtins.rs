//! Host functions available to every program.

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ctx::Context;
use crate::env::Env;
use crate::eval::RuntimeError;
use crate::value::{Arity, NativeFunction, Value};

const BUILTINS: [(&str, Arity, fn(&[Value]) -> Result<Value, RuntimeError>); 3] = [
    ("clock", Arity::Exactly(0), clock),
    ("sqrt", Arity::Exactly(1), sqrt),
    ("max", Arity::AtLeast(1), max),
];

/// Create the root frame of a session, holding every builtin.
pub fn root_env(ctx: &Context) -> Rc<Env> {
    Env::root(BUILTINS.iter().map(|&(name, arity, body)| {
        (
            ctx.symbol(name),
            Value::Native(Rc::new(NativeFunction { name, arity, body })),
        )
    }))
}

fn clock(_args: &[Value]) -> Result<Value, RuntimeError> {
    // A clock set before the epoch reads as zero.
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64());
    Ok(Value::Number(secs))
}

fn sqrt(args: &[Value]) -> Result<Value, RuntimeError> {
    match args {
        [Value::Number(n)] => Ok(Value::Number(n.sqrt())),
        _ => Err(expected_numbers(args)),
    }
}

fn max(args: &[Value]) -> Result<Value, RuntimeError> {
    let mut best: Option<f64> = None;
    for arg in args {
        match arg {
            Value::Number(n) => best = Some(best.map_or(*n, |b| b.max(*n))),
            _ => return Err(expected_numbers(args)),
        }
    }
    best.map(Value::Number)
        .ok_or_else(|| expected_numbers(args))
}

fn expected_numbers(args: &[Value]) -> RuntimeError {
    RuntimeError::TypeMismatch {
        message: "Operands must be numbers.",
        found: args
            .iter()
            .map(Value::type_name)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
