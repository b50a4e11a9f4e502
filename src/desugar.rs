//! Rewrite convenience constructs into the primitives the evaluator knows.
//!
//! Runs once over the whole tree before validation: a `for` loop becomes
//! `{ init; while (cond) { body; incr; } }`.

use std::rc::Rc;

use tracing::trace;

use crate::ast::{ClassDecl, Expr, ForLoop, FunctionDecl, Program, Stmt};

/// Desugar a parsed statement list into an evaluable program.
pub fn desugar(stmts: Vec<Stmt>) -> Program {
    Program::from_desugared(stmts.into_iter().map(desugar_stmt).collect())
}

fn desugar_stmt(stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::For(for_loop) => desugar_for(*for_loop),
        Stmt::Block(stmts) => Stmt::Block(desugar_stmts(stmts)),
        Stmt::If(cond, then_branch, else_branch) => Stmt::If(
            cond,
            Box::new(desugar_stmt(*then_branch)),
            Box::new(desugar_stmt(*else_branch)),
        ),
        Stmt::While(cond, body) => Stmt::While(cond, Box::new(desugar_stmt(*body))),
        Stmt::FunDecl(decl) => Stmt::FunDecl(desugar_function(decl)),
        Stmt::ClassDecl(class) => Stmt::ClassDecl(ClassDecl {
            methods: class.methods.into_iter().map(desugar_function).collect(),
            ..class
        }),
        stmt @ (Stmt::Nop
        | Stmt::Expr(_)
        | Stmt::Print(_)
        | Stmt::VarDecl(..)
        | Stmt::Return(_)) => stmt,
    }
}

fn desugar_stmts(stmts: Vec<Stmt>) -> Vec<Stmt> {
    stmts.into_iter().map(desugar_stmt).collect()
}

fn desugar_function(decl: Rc<FunctionDecl>) -> Rc<FunctionDecl> {
    // Freshly parsed declarations are not shared yet, so this does not copy.
    let decl = Rc::try_unwrap(decl).unwrap_or_else(|shared| FunctionDecl {
        name: shared.name.clone(),
        params: shared.params.clone(),
        body: shared.body.clone(),
    });
    Rc::new(FunctionDecl {
        body: desugar_stmts(decl.body),
        ..decl
    })
}

/// Rewrite a single `for` loop.
pub(crate) fn desugar_for(for_loop: ForLoop) -> Stmt {
    let ForLoop {
        init,
        cond,
        incr,
        body,
    } = for_loop;
    trace!("desugaring for loop");

    let mut while_body = vec![desugar_stmt(body)];
    if let Some(incr) = incr {
        while_body.push(Stmt::Expr(Box::new(incr)));
    }
    let cond = cond.unwrap_or(Expr::Bool(true));
    let while_loop = Stmt::While(Box::new(cond), Box::new(Stmt::Block(while_body)));

    match init {
        Some(init) => Stmt::Block(vec![init, while_loop]),
        None => while_loop,
    }
}
