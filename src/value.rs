//! Runtime values and the primitive operators over them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::prelude::*;
use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::env::Env;
use crate::eval::{Evaluator, Flow, RuntimeError};
use crate::interner::Symbol;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Function(Rc<LoxFunction>),
    Native(Rc<NativeFunction>),
    Class(Rc<LoxClass>),
    Instance(Rc<LoxInstance>),
}

impl Value {
    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }
}

/// Lox equality: values of different kinds are never equal, objects compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Function(l), Value::Function(r)) => Rc::ptr_eq(l, r),
            (Value::Native(l), Value::Native(r)) => Rc::ptr_eq(l, r),
            (Value::Class(l), Value::Class(r)) => Rc::ptr_eq(l, r),
            (Value::Instance(l), Value::Instance(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            // Rust already prints integral floats without a fractional part.
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Function(func) => write!(f, "<fn {}>", func.decl.name),
            Value::Native(_) => write!(f, "<native fn>"),
            Value::Class(class) => write!(f, "{}", class.name),
            Value::Instance(instance) => write!(f, "{} instance", instance.class.name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }
}

pub fn add(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
        (Value::Str(l), Value::Str(r)) => {
            let mut s = String::with_capacity(l.len() + r.len());
            s.push_str(l);
            s.push_str(r);
            Ok(Value::Str(Rc::from(s)))
        }
        _ => Err(binary_mismatch(
            "Operands must be two numbers or two strings.",
            lhs,
            rhs,
        )),
    }
}

pub fn sub(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = numbers(lhs, rhs)?;
    Ok(Value::Number(l - r))
}

pub fn mul(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = numbers(lhs, rhs)?;
    Ok(Value::Number(l * r))
}

pub fn div(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = numbers(lhs, rhs)?;
    if r == 0.0 {
        Err(RuntimeError::DivisionByZero)
    } else {
        Ok(Value::Number(l / r))
    }
}

pub fn lt(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = numbers(lhs, rhs)?;
    Ok(Value::Bool(l < r))
}

pub fn le(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = numbers(lhs, rhs)?;
    Ok(Value::Bool(l <= r))
}

pub fn gt(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = numbers(lhs, rhs)?;
    Ok(Value::Bool(l > r))
}

pub fn ge(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = numbers(lhs, rhs)?;
    Ok(Value::Bool(l >= r))
}

pub fn eq(lhs: &Value, rhs: &Value) -> Value {
    Value::Bool(lhs == rhs)
}

pub fn ne(lhs: &Value, rhs: &Value) -> Value {
    Value::Bool(lhs != rhs)
}

pub fn neg(operand: &Value) -> Result<Value, RuntimeError> {
    if let Value::Number(n) = operand {
        Ok(Value::Number(-n))
    } else {
        Err(RuntimeError::TypeMismatch {
            message: "Operand must be a number.",
            found: operand.type_name().to_owned(),
        })
    }
}

pub fn not(operand: &Value) -> Value {
    Value::Bool(!operand.is_truthy())
}

fn numbers(lhs: &Value, rhs: &Value) -> Result<(f64, f64), RuntimeError> {
    if let (Value::Number(l), Value::Number(r)) = (lhs, rhs) {
        Ok((*l, *r))
    } else {
        Err(binary_mismatch("Operands must be numbers.", lhs, rhs))
    }
}

fn binary_mismatch(message: &'static str, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        message,
        found: format!("{} and {}", lhs.type_name(), rhs.type_name()),
    }
}

/// Number of arguments a callable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Common call protocol of Lox functions, host functions and classes.
///
/// The evaluator checks `arity` before calling `call`.
pub trait Callable {
    fn name(&self) -> &str;

    fn arity(&self) -> Arity;

    fn call<W: Write>(
        self: Rc<Self>,
        evaluator: &mut Evaluator<'_, W>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError>;
}

/// A Lox function or method together with the environment it closes over.
pub struct LoxFunction {
    decl: Rc<FunctionDecl>,
    closure: Rc<Env>,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(decl: Rc<FunctionDecl>, closure: Rc<Env>, is_initializer: bool) -> LoxFunction {
        LoxFunction {
            decl,
            closure,
            is_initializer,
        }
    }

    /// Return a copy of this method whose closure sees `this` bound to `instance`.
    pub fn bind(&self, this: &Symbol, instance: Rc<LoxInstance>) -> LoxFunction {
        LoxFunction {
            decl: self.decl.clone(),
            closure: Env::push(&self.closure, [(this.clone(), Value::Instance(instance))]),
            is_initializer: self.is_initializer,
        }
    }
}

impl Callable for LoxFunction {
    fn name(&self) -> &str {
        self.decl.name.name()
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(self.decl.params.len())
    }

    fn call<W: Write>(
        self: Rc<Self>,
        evaluator: &mut Evaluator<'_, W>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        // Lexical scoping: the frame hangs off the closure, not off the caller.
        let frame = Env::push(&self.closure, self.decl.params.iter().cloned().zip(args));
        let flow = evaluator.eval_stmts(&self.decl.body, &frame)?;

        if self.is_initializer {
            // An initializer always yields its instance, even on an early `return;`.
            return self.closure.get(evaluator.ctx().this_sym());
        }
        match flow {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

impl fmt::Debug for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoxFunction")
            .field("name", &self.decl.name)
            .field("params", &self.decl.params)
            .field("is_initializer", &self.is_initializer)
            .finish()
    }
}

/// A function implemented by the host.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Arity,
    pub body: fn(&[Value]) -> Result<Value, RuntimeError>,
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn call<W: Write>(
        self: Rc<Self>,
        _evaluator: &mut Evaluator<'_, W>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        (self.body)(&args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

pub struct LoxClass {
    name: Symbol,
    superclass: Option<Rc<LoxClass>>,
    methods: HashMap<Symbol, Rc<LoxFunction>>,
}

impl LoxClass {
    pub fn new(
        name: Symbol,
        superclass: Option<Rc<LoxClass>>,
        methods: HashMap<Symbol, Rc<LoxFunction>>,
    ) -> LoxClass {
        LoxClass {
            name,
            superclass,
            methods,
        }
    }

    /// Look `name` up in this class, then up the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        match self.methods.get(name) {
            Some(method) => Some(method.clone()),
            None => self.superclass.as_ref().and_then(|s| s.find_method(name)),
        }
    }
}

impl Callable for LoxClass {
    fn name(&self) -> &str {
        self.name.name()
    }

    fn arity(&self) -> Arity {
        self.find_method(INIT)
            .map_or(Arity::Exactly(0), |init| init.arity())
    }

    fn call<W: Write>(
        self: Rc<Self>,
        evaluator: &mut Evaluator<'_, W>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let instance = Rc::new(LoxInstance::new(self.clone()));
        if let Some(init) = self.find_method(INIT) {
            let bound = Rc::new(init.bind(evaluator.ctx().this_sym(), instance.clone()));
            bound.call(evaluator, args)?;
        }
        Ok(Value::Instance(instance))
    }
}

impl fmt::Debug for LoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&Symbol> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("LoxClass")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|s| &s.name))
            .field("methods", &methods)
            .finish()
    }
}

const INIT: &str = "init";

pub struct LoxInstance {
    class: Rc<LoxClass>,
    fields: RefCell<HashMap<Symbol, Value>>,
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> LoxInstance {
        LoxInstance {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    pub fn class(&self) -> &Rc<LoxClass> {
        &self.class
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Fields spring into existence on first assignment.
    pub fn set_field(&self, name: Symbol, value: Value) {
        self.fields.borrow_mut().insert(name, value);
    }
}

impl fmt::Debug for LoxInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.borrow();
        let mut names: Vec<&Symbol> = fields.keys().collect();
        names.sort();
        f.debug_struct("LoxInstance")
            .field("class", &self.class.name)
            .field("fields", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn only_nil_and_false_are_falsy() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(s("").is_truthy());
    }

    #[test]
    fn add_numbers_and_strings() -> Result<(), RuntimeError> {
        assert_eq!(add(&Value::Number(1.0), &Value::Number(2.0))?, Value::Number(3.0));
        assert_eq!(add(&s("foo"), &s("bar"))?, s("foobar"));
        Ok(())
    }

    #[test]
    fn add_mixed_kinds_is_a_type_mismatch() {
        match add(&s("a"), &Value::Number(1.0)) {
            Err(RuntimeError::TypeMismatch { message, found }) => {
                assert_eq!(message, "Operands must be two numbers or two strings.");
                assert_eq!(found, "string and number");
            }
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn arithmetic_rejects_booleans_and_strings() {
        for r in [
            add(&Value::Bool(true), &Value::Number(1.0)),
            mul(&s("a"), &s("b")),
            sub(&Value::Nil, &Value::Number(1.0)),
            lt(&s("a"), &s("b")),
        ] {
            match r {
                Err(RuntimeError::TypeMismatch { .. }) => (),
                r => panic!("unexpected output: {:?}", r),
            }
        }
    }

    #[test]
    fn division_by_zero() {
        match div(&Value::Number(6.0), &Value::Number(0.0)) {
            Err(RuntimeError::DivisionByZero) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn comparisons() -> Result<(), RuntimeError> {
        let one = Value::Number(1.0);
        let two = Value::Number(2.0);
        assert_eq!(lt(&one, &two)?, Value::Bool(true));
        assert_eq!(le(&two, &two)?, Value::Bool(true));
        assert_eq!(gt(&one, &two)?, Value::Bool(false));
        assert_eq!(ge(&one, &two)?, Value::Bool(false));
        Ok(())
    }

    #[test]
    fn different_kinds_are_never_equal() {
        assert_eq!(eq(&Value::Number(1.0), &s("1")), Value::Bool(false));
        assert_eq!(eq(&Value::Nil, &Value::Bool(false)), Value::Bool(false));
        assert_eq!(ne(&Value::Number(0.0), &Value::Bool(false)), Value::Bool(true));
        assert_eq!(eq(&Value::Nil, &Value::Nil), Value::Bool(true));
    }

    #[test]
    fn negation() -> Result<(), RuntimeError> {
        assert_eq!(neg(&Value::Number(1.0))?, Value::Number(-1.0));
        assert_eq!(not(&Value::Number(0.0)), Value::Bool(false));
        assert_eq!(not(&Value::Nil), Value::Bool(true));
        match neg(&s("x")) {
            Err(RuntimeError::TypeMismatch { found, .. }) if found == "string" => (),
            r => panic!("unexpected output: {:?}", r),
        }
        Ok(())
    }

    #[test]
    fn show_primitives() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(3.5).to_string(), "3.5");
        assert_eq!(Value::Number(-0.25).to_string(), "-0.25");
        assert_eq!(s("hello").to_string(), "hello");
    }

    #[test]
    fn arity_display_and_acceptance() {
        assert!(Arity::Exactly(2).accepts(2));
        assert!(!Arity::Exactly(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
    }
}
