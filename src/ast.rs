use std::rc::Rc;

use crate::interner::Symbol;

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Nop,
    Expr(Box<Expr>),
    Print(Box<Expr>),
    VarDecl(Symbol, Box<Expr>),
    FunDecl(Rc<FunctionDecl>),
    ClassDecl(ClassDecl),
    Block(Vec<Stmt>),
    /// A missing `else` branch is an empty block.
    If(Box<Expr>, Box<Stmt>, Box<Stmt>),
    While(Box<Expr>, Box<Stmt>),
    /// Only exists between parsing and desugaring.
    For(Box<ForLoop>),
    Return(Box<Expr>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Nil,
    Number(f64),
    Bool(bool),
    Str(Rc<str>),
    Var(Symbol),
    Not(Box<Expr>),
    UnaryMinus(Box<Expr>),
    Equal(Box<Expr>, Box<Expr>),
    NotEqual(Box<Expr>, Box<Expr>),
    Less(Box<Expr>, Box<Expr>),
    LessEqual(Box<Expr>, Box<Expr>),
    Greater(Box<Expr>, Box<Expr>),
    GreaterEqual(Box<Expr>, Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Group(Box<Expr>),
    Assign(Symbol, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    /// `object.name`
    Get(Box<Expr>, Symbol),
    /// `object.name = value`
    Set(Box<Expr>, Symbol, Box<Expr>),
    This,
    /// `super.method`
    Super(Symbol),
}

/// Function or method declaration.
///
/// Shared between the tree and every closure created from it.
#[derive(Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassDecl {
    pub name: Symbol,
    /// Name of the superclass, resolved in the declaring scope.
    pub superclass: Option<Symbol>,
    pub methods: Vec<Rc<FunctionDecl>>,
}

/// `for (init; cond; incr) body`, before it is rewritten into a `while` loop.
#[derive(Debug, PartialEq, Clone)]
pub struct ForLoop {
    pub init: Option<Stmt>,
    pub cond: Option<Expr>,
    pub incr: Option<Expr>,
    pub body: Stmt,
}

/// A desugared program, ready for validation and evaluation.
///
/// Only `desugar::desugar` builds these, so no `Stmt::For` is left inside.
#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    stmts: Vec<Stmt>,
}

impl Program {
    pub(crate) fn from_desugared(stmts: Vec<Stmt>) -> Program {
        Program { stmts }
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }
}
