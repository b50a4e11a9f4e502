use std::io;
use std::io::prelude::*;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{ClassDecl, Expr, Program, Stmt};
use crate::builtins;
use crate::ctx::Context;
use crate::desugar;
use crate::env::Env;
use crate::interner::Symbol;
use crate::value::{self, Arity, Callable, LoxClass, LoxFunction, Value};

/// How a statement completed.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Normal,
    /// A `return` is unwinding to the innermost call.
    Return(Value),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{0}'.")]
    UndefinedName(String),
    #[error("Undefined property '{name}' on {class} instance.")]
    UndefinedAttribute { class: String, name: String },
    #[error("{message} (got {found})")]
    TypeMismatch {
        message: &'static str,
        found: String,
    },
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("{name}: expected {expected} arguments but got {got}.")]
    Arity {
        name: String,
        expected: Arity,
        got: usize,
    },
    #[error("Can only call functions and classes, not {0}.")]
    NotCallable(&'static str),
    #[error("Already a variable named '{0}' in this scope.")]
    DuplicateDefinition(String),
    #[error("'return' outside of any function.")]
    ReturnOutsideFunction,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Tree-walking evaluator.
///
/// Owns the global frame of a session; `print` output goes to `output`.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
    ctx: Rc<Context>,
    globals: Rc<Env>,
}

impl<'t, W: Write> Evaluator<'t, W> {
    pub fn new(output: &'t mut W, ctx: Rc<Context>) -> Evaluator<'t, W> {
        let globals = Env::global(&builtins::root_env(&ctx));
        Evaluator {
            output,
            ctx,
            globals,
        }
    }

    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    pub fn globals(&self) -> &Rc<Env> {
        &self.globals
    }

    /// Run `prg` in the global frame.
    ///
    /// Returns the value of the last statement if it is an expression statement, nil otherwise.
    pub fn eval_program(&mut self, prg: &Program) -> Result<Value, RuntimeError> {
        let globals = self.globals.clone();
        let mut last = Value::Nil;
        for stmt in prg.stmts() {
            last = Value::Nil;
            if let Stmt::Expr(e) = stmt {
                last = self.eval_expr(e, &globals)?;
            } else if let Flow::Return(_) = self.eval_stmt(stmt, &globals)? {
                return Err(RuntimeError::ReturnOutsideFunction);
            }
        }
        Ok(last)
    }

    /// Run `stmts` in `env`, stopping at the first `return`.
    pub fn eval_stmts(&mut self, stmts: &[Stmt], env: &Rc<Env>) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            if let Flow::Return(v) = self.eval_stmt(stmt, env)? {
                return Ok(Flow::Return(v));
            }
        }
        Ok(Flow::Normal)
    }

    pub fn eval_stmt(&mut self, stmt: &Stmt, env: &Rc<Env>) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Nop => (),
            Stmt::Expr(e) => {
                self.eval_expr(e, env)?;
            }
            Stmt::Print(e) => {
                let v = self.eval_expr(e, env)?;
                writeln!(self.output, "{}", v)?;
            }
            Stmt::VarDecl(sym, init) => {
                let v = self.eval_expr(init, env)?;
                env.define(sym.clone(), v)?;
            }
            Stmt::FunDecl(decl) => {
                let f = LoxFunction::new(decl.clone(), env.clone(), false);
                env.define(decl.name.clone(), Value::Function(Rc::new(f)))?;
            }
            Stmt::ClassDecl(class) => self.declare_class(class, env)?,
            Stmt::Block(stmts) => return self.eval_stmts(stmts, &Env::push(env, [])),
            Stmt::If(cond, then_branch, else_branch) => {
                return if self.eval_expr(cond, env)?.is_truthy() {
                    self.eval_stmt(then_branch, env)
                } else {
                    self.eval_stmt(else_branch, env)
                };
            }
            Stmt::While(cond, body) => {
                while self.eval_expr(cond, env)?.is_truthy() {
                    if let Flow::Return(v) = self.eval_stmt(body, env)? {
                        return Ok(Flow::Return(v));
                    }
                }
            }
            // Only reachable for statements built by hand.
            Stmt::For(for_loop) => {
                return self.eval_stmt(&desugar::desugar_for((**for_loop).clone()), env);
            }
            Stmt::Return(e) => return Ok(Flow::Return(self.eval_expr(e, env)?)),
        };
        Ok(Flow::Normal)
    }

    fn declare_class(&mut self, class: &ClassDecl, env: &Rc<Env>) -> Result<(), RuntimeError> {
        let superclass = match &class.superclass {
            Some(name) => match env.get(name)? {
                Value::Class(c) => Some(c),
                v => {
                    return Err(RuntimeError::TypeMismatch {
                        message: "Superclass must be a class.",
                        found: v.type_name().to_owned(),
                    })
                }
            },
            None => None,
        };

        // Methods of a subclass see `super` one frame above the declaring scope.
        let method_env = match &superclass {
            Some(s) => Env::push(env, [(self.ctx.super_sym().clone(), Value::Class(s.clone()))]),
            None => env.clone(),
        };
        let methods = class
            .methods
            .iter()
            .map(|decl| {
                let is_initializer = decl.name == *self.ctx.init_sym();
                let method = LoxFunction::new(decl.clone(), method_env.clone(), is_initializer);
                (decl.name.clone(), Rc::new(method))
            })
            .collect();

        debug!(
            class = class.name.name(),
            superclass = superclass.as_ref().map(|s| s.name()),
            "declaring class"
        );
        let c = LoxClass::new(class.name.clone(), superclass, methods);
        env.define(class.name.clone(), Value::Class(Rc::new(c)))
    }

    pub fn eval_expr(&mut self, expr: &Expr, env: &Rc<Env>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Nil => Ok(Value::Nil),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Var(sym) => env.get(sym),
            Expr::Not(e) => Ok(value::not(&self.eval_expr(e, env)?)),
            Expr::UnaryMinus(e) => value::neg(&self.eval_expr(e, env)?),
            Expr::Add(lhs, rhs) => self.binary(lhs, rhs, env, value::add),
            Expr::Sub(lhs, rhs) => self.binary(lhs, rhs, env, value::sub),
            Expr::Mul(lhs, rhs) => self.binary(lhs, rhs, env, value::mul),
            Expr::Div(lhs, rhs) => self.binary(lhs, rhs, env, value::div),
            Expr::Less(lhs, rhs) => self.binary(lhs, rhs, env, value::lt),
            Expr::LessEqual(lhs, rhs) => self.binary(lhs, rhs, env, value::le),
            Expr::Greater(lhs, rhs) => self.binary(lhs, rhs, env, value::gt),
            Expr::GreaterEqual(lhs, rhs) => self.binary(lhs, rhs, env, value::ge),
            Expr::Equal(lhs, rhs) => self.binary(lhs, rhs, env, |l, r| Ok(value::eq(l, r))),
            Expr::NotEqual(lhs, rhs) => self.binary(lhs, rhs, env, |l, r| Ok(value::ne(l, r))),
            Expr::And(lhs, rhs) => {
                let l = self.eval_expr(lhs, env)?;
                if l.is_truthy() {
                    self.eval_expr(rhs, env)
                } else {
                    Ok(l)
                }
            }
            Expr::Or(lhs, rhs) => {
                let l = self.eval_expr(lhs, env)?;
                if l.is_truthy() {
                    Ok(l)
                } else {
                    self.eval_expr(rhs, env)
                }
            }
            Expr::Group(e) => self.eval_expr(e, env),
            Expr::Assign(sym, rhs) => {
                let v = self.eval_expr(rhs, env)?;
                env.assign(sym, v.clone())?;
                Ok(v)
            }
            Expr::Call(callee, args) => {
                let c = self.eval_expr(callee, env)?;
                let args = args
                    .iter()
                    .map(|a| self.eval_expr(a, env))
                    .collect::<Result<Vec<Value>, RuntimeError>>()?;
                self.call(c, args)
            }
            Expr::Get(object, name) => {
                let o = self.eval_expr(object, env)?;
                self.get_property(o, name)
            }
            Expr::Set(object, name, rhs) => {
                let o = self.eval_expr(object, env)?;
                let v = self.eval_expr(rhs, env)?;
                match o {
                    Value::Instance(instance) => {
                        instance.set_field(name.clone(), v.clone());
                        Ok(v)
                    }
                    o => Err(RuntimeError::TypeMismatch {
                        message: "Only instances have fields.",
                        found: o.type_name().to_owned(),
                    }),
                }
            }
            Expr::This => env.get(self.ctx.this_sym()),
            Expr::Super(method) => self.get_super_method(method, env),
        }
    }

    fn binary(
        &mut self,
        lhs: &Expr,
        rhs: &Expr,
        env: &Rc<Env>,
        op: fn(&Value, &Value) -> Result<Value, RuntimeError>,
    ) -> Result<Value, RuntimeError> {
        let l = self.eval_expr(lhs, env)?;
        let r = self.eval_expr(rhs, env)?;
        op(&l, &r)
    }

    fn call(&mut self, callee: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(f) => self.invoke(f, args),
            Value::Native(f) => self.invoke(f, args),
            Value::Class(c) => self.invoke(c, args),
            v => Err(RuntimeError::NotCallable(v.type_name())),
        }
    }

    fn invoke<C: Callable>(&mut self, callee: Rc<C>, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let arity = callee.arity();
        if !arity.accepts(args.len()) {
            return Err(RuntimeError::Arity {
                name: callee.name().to_owned(),
                expected: arity,
                got: args.len(),
            });
        }
        trace!(callee = callee.name(), argc = args.len(), "call");
        callee.call(self, args)
    }

    fn get_property(&self, object: Value, name: &Symbol) -> Result<Value, RuntimeError> {
        let instance = match object {
            Value::Instance(instance) => instance,
            v => {
                return Err(RuntimeError::TypeMismatch {
                    message: "Only instances have properties.",
                    found: v.type_name().to_owned(),
                })
            }
        };

        // Fields shadow methods.
        if let Some(v) = instance.field(name.name()) {
            return Ok(v);
        }
        match instance.class().find_method(name.name()) {
            Some(method) => {
                let bound = method.bind(self.ctx.this_sym(), instance.clone());
                Ok(Value::Function(Rc::new(bound)))
            }
            None => Err(RuntimeError::UndefinedAttribute {
                class: instance.class().name().to_owned(),
                name: name.name().to_owned(),
            }),
        }
    }

    fn get_super_method(&self, method: &Symbol, env: &Rc<Env>) -> Result<Value, RuntimeError> {
        let superclass = env.get(self.ctx.super_sym())?;
        let this = env.get(self.ctx.this_sym())?;
        match (superclass, this) {
            (Value::Class(superclass), Value::Instance(instance)) => {
                match superclass.find_method(method.name()) {
                    Some(m) => Ok(Value::Function(Rc::new(
                        m.bind(self.ctx.this_sym(), instance),
                    ))),
                    None => Err(RuntimeError::UndefinedAttribute {
                        class: superclass.name().to_owned(),
                        name: method.name().to_owned(),
                    }),
                }
            }
            (superclass, _) => Err(RuntimeError::TypeMismatch {
                message: "Superclass must be a class.",
                found: superclass.type_name().to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::value::NativeFunction;

    fn eval_expr(expr: &Expr) -> Result<Value, RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let ctx = Context::new();
        let mut evaluator = Evaluator::new(&mut out, ctx);
        let globals = evaluator.globals.clone();
        let val = evaluator.eval_expr(expr, &globals)?;
        assert!(out.is_empty());
        Ok(val)
    }

    fn eval_prg_with_ctx(ctx: Rc<Context>, prg: Vec<Stmt>) -> Result<String, RuntimeError> {
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out, ctx.clone());
        e.globals.define(
            ctx.symbol("__test_ultimate_answer__"),
            Value::Native(Rc::new(NativeFunction {
                name: "__test_ultimate_answer__",
                arity: Arity::Exactly(0),
                body: |_| Ok(Value::Number(42.0)),
            })),
        )?;
        e.eval_program(&desugar::desugar(prg))?;
        Ok(String::from_utf8(out).expect("error while converting output"))
    }

    fn eval_src(input: &str) -> Result<String, RuntimeError> {
        let ctx = Context::new();
        let prg = Parser::new(input, ctx.clone())
            .parse_program()
            .expect("parse error");
        eval_prg_with_ctx(ctx, prg)
    }

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn number() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::Number(1.0))?, Value::Number(1.0));
        Ok(())
    }

    #[test]
    fn unary_minus() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::UnaryMinus(num(1.0)))?, Value::Number(-1.0));
        Ok(())
    }

    #[test]
    fn logical_not_uses_truthiness() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::Not(Box::new(Expr::Bool(true))))?, Value::Bool(false));
        assert_eq!(eval_expr(&Expr::Not(Box::new(Expr::Nil)))?, Value::Bool(true));
        assert_eq!(eval_expr(&Expr::Not(num(0.0)))?, Value::Bool(false));
        Ok(())
    }

    #[test]
    fn unary_minus_on_bool() {
        match eval_expr(&Expr::UnaryMinus(Box::new(Expr::Bool(true)))) {
            Err(RuntimeError::TypeMismatch { .. }) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn nested_arithmetic() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Add(num(1.0), Box::new(Expr::Mul(num(2.0), num(3.0)))))?,
            Value::Number(7.0)
        );
        Ok(())
    }

    #[test]
    fn division_by_zero() {
        match eval_expr(&Expr::Div(num(6.0), num(0.0))) {
            Err(RuntimeError::DivisionByZero) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn string_concatenation() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Add(
                Box::new(Expr::Str(Rc::from("foo"))),
                Box::new(Expr::Str(Rc::from("bar")))
            ))?,
            Value::from("foobar")
        );
        Ok(())
    }

    #[test]
    fn different_types_are_always_different() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Equal(Box::new(Expr::Bool(true)), num(1.0)))?,
            Value::Bool(false)
        );
        assert_eq!(
            eval_expr(&Expr::NotEqual(Box::new(Expr::Nil), Box::new(Expr::Bool(false))))?,
            Value::Bool(true)
        );
        Ok(())
    }

    #[test]
    fn comparisons() -> Result<(), RuntimeError> {
        assert_eq!(eval_expr(&Expr::LessEqual(num(2.0), num(2.0)))?, Value::Bool(true));
        assert_eq!(eval_expr(&Expr::GreaterEqual(num(1.0), num(2.0)))?, Value::Bool(false));
        Ok(())
    }

    #[test]
    fn logical_operators_return_operands() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_expr(&Expr::Or(Box::new(Expr::Nil), Box::new(Expr::Str(Rc::from("x")))))?,
            Value::from("x")
        );
        assert_eq!(
            eval_expr(&Expr::And(Box::new(Expr::Bool(false)), num(1.0)))?,
            Value::Bool(false)
        );
        Ok(())
    }

    #[test]
    fn short_circuit_skips_right_operand() -> Result<(), RuntimeError> {
        // Evaluating the right operand would fail on the unknown name.
        assert_eq!(eval_src("print false and nope; print 1 or nope;")?, "false\n1\n");
        Ok(())
    }

    #[test]
    fn print_stmt() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        assert_eq!(
            eval_prg_with_ctx(ctx, vec![Stmt::Print(num(42.0))])?,
            "42\n"
        );
        Ok(())
    }

    #[test]
    fn set_and_get_var() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        assert_eq!(
            eval_prg_with_ctx(
                ctx.clone(),
                vec![
                    Stmt::VarDecl(ctx.symbol("foo"), num(42.0)),
                    Stmt::Print(Box::new(Expr::Var(ctx.symbol("foo"))))
                ]
            )?,
            "42\n"
        );
        Ok(())
    }

    #[test]
    fn set_unknown_var() {
        let ctx = Context::new();
        let foo_sym = ctx.symbol("foo");
        match eval_prg_with_ctx(
            ctx,
            vec![Stmt::Expr(Box::new(Expr::Assign(foo_sym.clone(), num(42.0))))],
        ) {
            Err(RuntimeError::UndefinedName(sym)) if sym == foo_sym.name() => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn global_variable_can_be_redeclared() -> Result<(), RuntimeError> {
        assert_eq!(eval_src("var a = 1; var a = 2; print a;")?, "2\n");
        Ok(())
    }

    #[test]
    fn local_variable_cannot_be_redeclared() {
        match eval_src("{ var a = 1; var a = 2; }") {
            Err(RuntimeError::DuplicateDefinition(name)) if name == "a" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn block_scoping() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src("var a = 1; { var a = 2; print a; } print a;")?,
            "2\n1\n"
        );
        Ok(())
    }

    #[test]
    fn hand_built_for_loop() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        let i = ctx.symbol("i");
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out, ctx);
        let globals = e.globals.clone();
        let for_loop = Stmt::For(Box::new(crate::ast::ForLoop {
            init: Some(Stmt::VarDecl(i.clone(), num(0.0))),
            cond: Some(Expr::Less(Box::new(Expr::Var(i.clone())), num(2.0))),
            incr: Some(Expr::Assign(
                i.clone(),
                Box::new(Expr::Add(Box::new(Expr::Var(i.clone())), num(1.0))),
            )),
            body: Stmt::Print(Box::new(Expr::Var(i))),
        }));
        assert_eq!(e.eval_stmt(&for_loop, &globals)?, Flow::Normal);
        assert_eq!(out, b"0\n1\n");
        Ok(())
    }

    #[test]
    fn call_builtin_function_without_arg() -> Result<(), RuntimeError> {
        assert_eq!(eval_src("print __test_ultimate_answer__();")?, "42\n");
        Ok(())
    }

    #[test]
    fn call_function_with_bad_number_of_arguments() {
        match eval_src("fun f(a, b) {} f(1);") {
            Err(RuntimeError::Arity {
                name,
                expected: Arity::Exactly(2),
                got: 1,
            }) if name == "f" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn call_non_callable() {
        match eval_src("\"not a function\"();") {
            Err(RuntimeError::NotCallable("string")) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn call_builtin_sqrt() -> Result<(), RuntimeError> {
        assert_eq!(eval_src("print sqrt(4);")?, "2\n");
        Ok(())
    }

    #[test]
    fn function_without_return_yields_nil() -> Result<(), RuntimeError> {
        assert_eq!(eval_src("fun f() {} print f();")?, "nil\n");
        Ok(())
    }

    #[test]
    fn return_from_nested_loops() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src(
                "fun f() { while (true) { for (var i = 0; ; i = i + 1) { if (i == 3) return i; } } }
                 print f();"
            )?,
            "3\n"
        );
        Ok(())
    }

    #[test]
    fn recursion() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src("fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(10);")?,
            "55\n"
        );
        Ok(())
    }

    #[test]
    fn closures_capture_their_frame() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src(
                "fun counter() { var n = 0; fun inc() { n = n + 1; return n; } return inc; }
                 var c = counter(); c(); c(); print c();
                 var d = counter(); print d();"
            )?,
            "3\n1\n"
        );
        Ok(())
    }

    #[test]
    fn closures_capture_parameters() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src(
                "fun adder(n) { fun add(x) { return x + n; } return add; }
                 var add2 = adder(2); var add5 = adder(5); print add2(1); print add5(1);"
            )?,
            "3\n6\n"
        );
        Ok(())
    }

    #[test]
    fn top_level_return() {
        let ctx = Context::new();
        match eval_prg_with_ctx(ctx, vec![Stmt::Return(num(1.0))]) {
            Err(RuntimeError::ReturnOutsideFunction) => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn program_value_is_last_expression() -> Result<(), RuntimeError> {
        let ctx = Context::new();
        let prg = Parser::new("var a = 2; a * 21;", ctx.clone())
            .parse_program()
            .expect("parse error");
        let mut out: Vec<u8> = Vec::new();
        let mut e = Evaluator::new(&mut out, ctx);
        assert_eq!(e.eval_program(&desugar::desugar(prg))?, Value::Number(42.0));
        Ok(())
    }

    #[test]
    fn instances_hold_fields() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src("class P {} var p = P(); p.x = 1; p.x = p.x + 1; print p.x; print p;")?,
            "2\nP instance\n"
        );
        Ok(())
    }

    #[test]
    fn methods_see_this() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src(
                "class Cake { taste() { print \"The \" + this.flavor + \" cake is delicious\"; } }
                 var c = Cake(); c.flavor = \"chocolate\"; var t = c.taste; t();"
            )?,
            "The chocolate cake is delicious\n"
        );
        Ok(())
    }

    #[test]
    fn initializer_runs_on_construction() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src(
                "class V { init(x, y) { this.x = x; this.y = y; return; } }
                 var v = V(1, 2); print v.x + v.y; print v.init(3, 4).x;"
            )?,
            "3\n3\n"
        );
        Ok(())
    }

    #[test]
    fn class_arity_follows_initializer() {
        match eval_src("class V { init(x) {} } V();") {
            Err(RuntimeError::Arity { name, got: 0, .. }) if name == "V" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn inherited_and_super_methods() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src(
                "class A { hi() { return \"A\"; } name() { return \"a\"; } }
                 class B < A { hi() { return \"B\" + super.hi(); } }
                 class C < B { hi() { return \"C\" + super.hi(); } }
                 var c = C(); print c.hi(); print c.name();"
            )?,
            "CBA\na\n"
        );
        Ok(())
    }

    #[test]
    fn undefined_property() {
        match eval_src("class A {} A().nope;") {
            Err(RuntimeError::UndefinedAttribute { class, name }) if class == "A" && name == "nope" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn property_on_non_instance() {
        match eval_src("var x = 1; x.y;") {
            Err(RuntimeError::TypeMismatch { message, .. })
                if message == "Only instances have properties." => {}
            out => panic!("unexpected output: {:?}", out),
        }
        match eval_src("var x = 1; x.y = 2;") {
            Err(RuntimeError::TypeMismatch { message, .. })
                if message == "Only instances have fields." => {}
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn property_set_evaluates_value_before_checking_object() {
        match eval_src("var x = 1; x.y = nope;") {
            Err(RuntimeError::UndefinedName(name)) if name == "nope" => (),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn superclass_must_be_a_class() {
        match eval_src("var A = 1; class B < A {}") {
            Err(RuntimeError::TypeMismatch { message, found })
                if message == "Superclass must be a class." && found == "number" => {}
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn objects_compare_by_identity() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src("class A {} var a = A(); var b = a; print a == b; print a == A(); print A == A;")?,
            "true\nfalse\ntrue\n"
        );
        Ok(())
    }

    #[test]
    fn show_callables() -> Result<(), RuntimeError> {
        assert_eq!(
            eval_src("fun f() {} class K { m() {} } print f; print clock; print K; print K().m;")?,
            "<fn f>\n<native fn>\nK\n<fn m>\n"
        );
        Ok(())
    }
}
