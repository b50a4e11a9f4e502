//! Static checks run on a desugared program before evaluation.

use std::collections::HashSet;
use std::mem;

use thiserror::Error;
use tracing::trace;

use crate::ast::{ClassDecl, Expr, FunctionDecl, Program, Stmt};
use crate::ctx::Context;
use crate::interner::Symbol;

#[derive(Debug, PartialEq, Clone, Error)]
#[error("semantic error: {kind}: '{name}'")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    /// Offending identifier or keyword.
    pub name: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum SemanticErrorKind {
    #[error("reserved word used as a name")]
    ReservedWord,
    #[error("duplicate parameter")]
    DuplicateParameter,
    #[error("variable already declared in this block")]
    DuplicateLocal,
    #[error("local variable shadows a parameter")]
    ShadowsParameter,
    #[error("cannot return from top-level code")]
    ReturnOutsideFunction,
    #[error("cannot return a value from an initializer")]
    ReturnFromInitializer,
    #[error("cannot use 'this' outside of a class")]
    ThisOutsideClass,
    #[error("cannot use 'super' outside of a class")]
    SuperOutsideClass,
    #[error("cannot use 'super' in a class with no superclass")]
    SuperWithoutSuperclass,
    #[error("a class cannot inherit from itself")]
    InheritFromSelf,
}

/// Check `prg`, stopping at the first problem found.
pub fn validate(prg: &Program, ctx: &Context) -> Result<(), SemanticError> {
    trace!(stmts = prg.stmts().len(), "validating program");
    let mut v = Validator::new(ctx);
    prg.stmts().iter().try_for_each(|stmt| v.stmt(stmt))
}

/// Check a standalone expression, as if it appeared at top level.
pub fn validate_expr(expr: &Expr, ctx: &Context) -> Result<(), SemanticError> {
    Validator::new(ctx).expr(expr)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

struct Validator<'c> {
    ctx: &'c Context,
    function: FunctionKind,
    class: ClassKind,
}

impl<'c> Validator<'c> {
    fn new(ctx: &'c Context) -> Validator<'c> {
        Validator {
            ctx,
            function: FunctionKind::None,
            class: ClassKind::None,
        }
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), SemanticError> {
        match stmt {
            Stmt::Nop => Ok(()),
            Stmt::Expr(e) | Stmt::Print(e) => self.expr(e),
            Stmt::VarDecl(name, init) => {
                self.binding_name(name)?;
                self.expr(init)
            }
            Stmt::FunDecl(decl) => self.function(decl, FunctionKind::Function),
            Stmt::ClassDecl(class) => self.class(class),
            Stmt::Block(stmts) => self.block(stmts, None),
            Stmt::If(cond, then_branch, else_branch) => {
                self.expr(cond)?;
                self.stmt(then_branch)?;
                self.stmt(else_branch)
            }
            Stmt::While(cond, body) => {
                self.expr(cond)?;
                self.stmt(body)
            }
            Stmt::For(for_loop) => {
                if let Some(init) = &for_loop.init {
                    self.stmt(init)?;
                }
                if let Some(cond) = &for_loop.cond {
                    self.expr(cond)?;
                }
                if let Some(incr) = &for_loop.incr {
                    self.expr(incr)?;
                }
                self.stmt(&for_loop.body)
            }
            Stmt::Return(value) => {
                match self.function {
                    FunctionKind::None => {
                        return Err(self.error(SemanticErrorKind::ReturnOutsideFunction, "return"))
                    }
                    // A bare `return;` parses as `return nil;`.
                    FunctionKind::Initializer if **value != Expr::Nil => {
                        return Err(self.error(SemanticErrorKind::ReturnFromInitializer, "return"))
                    }
                    _ => (),
                }
                self.expr(value)
            }
        }
    }

    /// Check the statements of one block.  `params` holds the parameters when the block is a
    /// function body.
    fn block(
        &mut self,
        stmts: &[Stmt],
        params: Option<&HashSet<Symbol>>,
    ) -> Result<(), SemanticError> {
        let mut declared = HashSet::new();
        for stmt in stmts {
            if let Some(name) = declared_name(stmt) {
                if params.map_or(false, |p| p.contains(name)) {
                    return Err(self.error(SemanticErrorKind::ShadowsParameter, name.name()));
                }
                if !declared.insert(name.clone()) {
                    return Err(self.error(SemanticErrorKind::DuplicateLocal, name.name()));
                }
            }
            self.stmt(stmt)?;
        }
        Ok(())
    }

    fn function(&mut self, decl: &FunctionDecl, kind: FunctionKind) -> Result<(), SemanticError> {
        self.binding_name(&decl.name)?;
        let mut params = HashSet::new();
        for param in &decl.params {
            self.binding_name(param)?;
            if !params.insert(param.clone()) {
                return Err(self.error(SemanticErrorKind::DuplicateParameter, param.name()));
            }
        }

        let enclosing = mem::replace(&mut self.function, kind);
        let res = self.block(&decl.body, Some(&params));
        self.function = enclosing;
        res
    }

    fn class(&mut self, class: &ClassDecl) -> Result<(), SemanticError> {
        self.binding_name(&class.name)?;
        let kind = match &class.superclass {
            Some(superclass) if *superclass == class.name => {
                return Err(self.error(SemanticErrorKind::InheritFromSelf, class.name.name()))
            }
            Some(_) => ClassKind::Subclass,
            None => ClassKind::Class,
        };

        let enclosing = mem::replace(&mut self.class, kind);
        let res = class.methods.iter().try_for_each(|method| {
            let kind = if method.name == *self.ctx.init_sym() {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };
            self.function(method, kind)
        });
        self.class = enclosing;
        res
    }

    fn expr(&mut self, expr: &Expr) -> Result<(), SemanticError> {
        match expr {
            Expr::Nil | Expr::Number(_) | Expr::Bool(_) | Expr::Str(_) | Expr::Var(_) => Ok(()),
            Expr::Not(e) | Expr::UnaryMinus(e) | Expr::Group(e) | Expr::Assign(_, e) => {
                self.expr(e)
            }
            Expr::Equal(lhs, rhs)
            | Expr::NotEqual(lhs, rhs)
            | Expr::Less(lhs, rhs)
            | Expr::LessEqual(lhs, rhs)
            | Expr::Greater(lhs, rhs)
            | Expr::GreaterEqual(lhs, rhs)
            | Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::And(lhs, rhs)
            | Expr::Or(lhs, rhs) => {
                self.expr(lhs)?;
                self.expr(rhs)
            }
            Expr::Call(callee, args) => {
                self.expr(callee)?;
                args.iter().try_for_each(|a| self.expr(a))
            }
            Expr::Get(object, _) => self.expr(object),
            Expr::Set(object, _, value) => {
                self.expr(object)?;
                self.expr(value)
            }
            Expr::This => match self.class {
                ClassKind::None => Err(self.error(SemanticErrorKind::ThisOutsideClass, "this")),
                _ => Ok(()),
            },
            Expr::Super(_) => match self.class {
                ClassKind::None => Err(self.error(SemanticErrorKind::SuperOutsideClass, "super")),
                ClassKind::Class => {
                    Err(self.error(SemanticErrorKind::SuperWithoutSuperclass, "super"))
                }
                ClassKind::Subclass => Ok(()),
            },
        }
    }

    fn binding_name(&self, name: &Symbol) -> Result<(), SemanticError> {
        if self.ctx.is_reserved(name) {
            Err(self.error(SemanticErrorKind::ReservedWord, name.name()))
        } else {
            Ok(())
        }
    }

    fn error(&self, kind: SemanticErrorKind, name: &str) -> SemanticError {
        SemanticError {
            kind,
            name: name.to_owned(),
        }
    }
}

/// Name bound by a declaration statement.
fn declared_name(stmt: &Stmt) -> Option<&Symbol> {
    match stmt {
        Stmt::VarDecl(name, _) => Some(name),
        Stmt::FunDecl(decl) => Some(&decl.name),
        Stmt::ClassDecl(class) => Some(&class.name),
        _ => None,
    }
}
