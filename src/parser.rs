use std::rc::Rc;

use tracing::trace;

use crate::ast::{ClassDecl, Expr, ForLoop, FunctionDecl, Stmt};
use crate::ctx::Context;
use crate::diag::{Position, SyntaxError, SyntaxErrorKind};
use crate::interner::Symbol;
use crate::scanner::Scanner;
use crate::token::Token;

/// Recursive-descent parser with a single token of lookahead.
///
/// There is no error recovery: the first error aborts parsing.
pub struct Parser<'s> {
    scanner: Scanner<'s>,
    current_token: Token,
    current_pos: Position,
}

impl<'s> Parser<'s> {
    pub fn new(input: &'s str, ctx: Rc<Context>) -> Parser<'s> {
        Parser {
            scanner: Scanner::new(input, ctx),
            current_token: Token::Eof, // we haven't scanned anything yet
            current_pos: 1,
        }
    }

    pub fn parse_program(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        let mut prg = vec![];
        self.advance()?;
        while self.current_token != Token::Eof {
            prg.push(self.declaration()?);
        }
        trace!(stmts = prg.len(), "parsed program");
        Ok(prg)
    }

    /// Parse a single expression spanning the whole input.
    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.advance()?;
        let expr = self.expression()?;
        self.consume(Token::Eof)?;
        Ok(expr)
    }

    fn declaration(&mut self) -> Result<Stmt, SyntaxError> {
        match self.current_token {
            Token::Var => self.var_decl(),
            Token::Fun => {
                self.advance()?;
                Ok(Stmt::FunDecl(self.function()?))
            }
            Token::Class => self.class_decl(),
            _ => self.statement(),
        }
    }

    /// Parse variable declaration.
    /// Current token is Token::Var.
    fn var_decl(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance()?;
        let sym = self.identifier()?;
        let init = if self.current_token == Token::Equal {
            self.advance()?;
            self.expression()?
        } else {
            Expr::Nil
        };
        self.consume(Token::Semicolon)?;
        Ok(Stmt::VarDecl(sym, Box::new(init)))
    }

    /// Parse `name(params) { body }`, shared by functions and methods.
    fn function(&mut self) -> Result<Rc<FunctionDecl>, SyntaxError> {
        let name = self.identifier()?;
        self.consume(Token::LeftParen)?;
        let mut params = vec![];
        if Token::RightParen != self.current_token {
            loop {
                params.push(self.identifier()?);
                if Token::Comma != self.current_token {
                    break;
                }
                self.consume(Token::Comma)?;
            }
        }
        self.consume(Token::RightParen)?;
        let body = self.block_stmts()?;
        Ok(Rc::new(FunctionDecl { name, params, body }))
    }

    /// Current token is Token::Class.
    fn class_decl(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance()?;
        let name = self.identifier()?;
        let superclass = if self.current_token == Token::Less {
            self.advance()?;
            Some(self.identifier()?)
        } else {
            None
        };
        self.consume(Token::LeftCurly)?;
        let mut methods = vec![];
        while self.current_token != Token::RightCurly {
            methods.push(self.function()?);
        }
        self.consume(Token::RightCurly)?;
        Ok(Stmt::ClassDecl(ClassDecl {
            name,
            superclass,
            methods,
        }))
    }

    fn identifier(&mut self) -> Result<Symbol, SyntaxError> {
        if let Token::Identifier(id) = &self.current_token {
            let id = id.clone();
            self.advance()?;
            Ok(id)
        } else {
            Err(self.error(SyntaxErrorKind::ExpectedIdentifier(
                self.current_token.to_string(),
            )))
        }
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        match self.current_token {
            Token::Print => {
                self.advance()?;
                let expr = Box::new(self.expression()?);
                self.consume(Token::Semicolon)?;
                Ok(Stmt::Print(expr))
            }
            Token::LeftCurly => Ok(Stmt::Block(self.block_stmts()?)),
            Token::If => {
                self.advance()?;
                self.consume(Token::LeftParen)?;
                let cond = Box::new(self.expression()?);
                self.consume(Token::RightParen)?;
                let then_branch = Box::new(self.statement()?);
                let else_branch = if let Token::Else = self.current_token {
                    self.advance()?;
                    Box::new(self.statement()?)
                } else {
                    Box::new(Stmt::Block(vec![]))
                };
                Ok(Stmt::If(cond, then_branch, else_branch))
            }
            Token::While => {
                self.advance()?;
                self.consume(Token::LeftParen)?;
                let cond = Box::new(self.expression()?);
                self.consume(Token::RightParen)?;
                let body = Box::new(self.statement()?);
                Ok(Stmt::While(cond, body))
            }
            Token::For => self.for_stmt(),
            Token::Semicolon => {
                self.advance()?;
                Ok(Stmt::Nop)
            }
            Token::Return => {
                self.advance()?;
                let ret_expr = if self.current_token == Token::Semicolon {
                    Expr::Nil
                } else {
                    self.expression()?
                };
                self.consume(Token::Semicolon)?;
                Ok(Stmt::Return(Box::new(ret_expr)))
            }
            _ => {
                let expr = Box::new(self.expression()?);
                self.consume(Token::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Current token is Token::For.
    fn for_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance()?;
        self.consume(Token::LeftParen)?;
        let init = match self.current_token {
            Token::Semicolon => {
                self.advance()?;
                None
            }
            Token::Var => Some(self.var_decl()?),
            _ => {
                let expr = Box::new(self.expression()?);
                self.consume(Token::Semicolon)?;
                Some(Stmt::Expr(expr))
            }
        };
        let cond = if self.current_token == Token::Semicolon {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(Token::Semicolon)?;
        let incr = if self.current_token == Token::RightParen {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(Token::RightParen)?;
        let body = self.statement()?;
        Ok(Stmt::For(Box::new(ForLoop {
            init,
            cond,
            incr,
            body,
        })))
    }

    fn block_stmts(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.consume(Token::LeftCurly)?;
        let mut stmts = vec![];
        loop {
            match self.current_token {
                Token::RightCurly => {
                    self.advance()?;
                    break;
                }
                Token::Eof => {
                    return Err(self.unexpected(&Token::RightCurly));
                }
                _ => stmts.push(self.declaration()?),
            }
        }
        Ok(stmts)
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, SyntaxError> {
        let lhs = self.logic_or()?;
        if Token::Equal == self.current_token {
            self.advance()?;
            let rhs = Box::new(self.assignment()?);
            match lhs {
                Expr::Var(var) => Ok(Expr::Assign(var, rhs)),
                Expr::Get(object, name) => Ok(Expr::Set(object, name, rhs)),
                _ => Err(self.error(SyntaxErrorKind::InvalidAssignmentTarget)),
            }
        } else {
            Ok(lhs)
        }
    }

    fn logic_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.logic_and()?;
        while self.current_token == Token::Or {
            self.advance()?;
            expr = Expr::Or(Box::new(expr), Box::new(self.logic_and()?));
        }
        Ok(expr)
    }

    fn logic_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.equality()?;
        while self.current_token == Token::And {
            self.advance()?;
            expr = Expr::And(Box::new(expr), Box::new(self.equality()?));
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.comparison()?;
        loop {
            match self.current_token {
                Token::EqualEqual => {
                    self.advance()?;
                    expr = Expr::Equal(Box::new(expr), Box::new(self.comparison()?));
                }
                Token::BangEqual => {
                    self.advance()?;
                    expr = Expr::NotEqual(Box::new(expr), Box::new(self.comparison()?));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.term()?;
        loop {
            let op: fn(Box<Expr>, Box<Expr>) -> Expr = match self.current_token {
                Token::Less => Expr::Less,
                Token::LessEqual => Expr::LessEqual,
                Token::Greater => Expr::Greater,
                Token::GreaterEqual => Expr::GreaterEqual,
                _ => break,
            };
            self.advance()?;
            expr = op(Box::new(expr), Box::new(self.term()?));
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.factor()?;
        loop {
            match self.current_token {
                Token::Plus => {
                    self.advance()?;
                    expr = Expr::Add(Box::new(expr), Box::new(self.factor()?));
                }
                Token::Minus => {
                    self.advance()?;
                    expr = Expr::Sub(Box::new(expr), Box::new(self.factor()?));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.unary()?;
        loop {
            match self.current_token {
                Token::Star => {
                    self.advance()?;
                    expr = Expr::Mul(Box::new(expr), Box::new(self.unary()?));
                }
                Token::Slash => {
                    self.advance()?;
                    expr = Expr::Div(Box::new(expr), Box::new(self.unary()?));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        match self.current_token {
            Token::Minus => {
                self.advance()?;
                Ok(Expr::UnaryMinus(Box::new(self.unary()?)))
            }
            Token::Bang => {
                self.advance()?;
                Ok(Expr::Not(Box::new(self.unary()?)))
            }
            _ => self.call(),
        }
    }

    fn call(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        loop {
            match self.current_token {
                Token::LeftParen => {
                    self.advance()?;
                    let args = self.arguments()?;
                    expr = Expr::Call(Box::new(expr), args);
                }
                Token::Dot => {
                    self.advance()?;
                    let name = self.identifier()?;
                    expr = Expr::Get(Box::new(expr), name);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parse call arguments.  The opening paren has been consumed.
    fn arguments(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = vec![];
        if Token::RightParen != self.current_token {
            loop {
                args.push(self.expression()?);
                if Token::Comma != self.current_token {
                    break;
                }
                self.consume(Token::Comma)?;
            }
        }
        self.consume(Token::RightParen)?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let expr = match self.current_token.clone() {
            Token::Identifier(sym) => Expr::Var(sym),
            Token::Nil => Expr::Nil,
            Token::Number(n) => Expr::Number(n),
            Token::Str(s) => Expr::Str(s),
            Token::True => Expr::Bool(true),
            Token::False => Expr::Bool(false),
            Token::This => Expr::This,
            Token::Super => {
                self.advance()?;
                self.consume(Token::Dot)?;
                return Ok(Expr::Super(self.identifier()?));
            }
            Token::LeftParen => {
                self.advance()?;
                let expr = self.expression()?;
                self.consume(Token::RightParen)?;
                return Ok(Expr::Group(Box::new(expr)));
            }
            t => {
                return Err(self.error(SyntaxErrorKind::ExpectedExpression(t.to_string())));
            }
        };
        self.advance()?;
        Ok(expr)
    }

    fn advance(&mut self) -> Result<&Token, SyntaxError> {
        let (pos, token) = self.scanner.get_token()?;
        self.current_token = token;
        self.current_pos = pos;
        Ok(&self.current_token)
    }

    fn consume(&mut self, expected: Token) -> Result<(), SyntaxError> {
        if self.current_token == expected {
            if expected != Token::Eof {
                self.advance()?;
            }
            Ok(())
        } else {
            Err(self.unexpected(&expected))
        }
    }

    fn unexpected(&self, expected: &Token) -> SyntaxError {
        self.error(SyntaxErrorKind::UnexpectedToken {
            found: self.current_token.to_string(),
            expected: expected.to_string(),
        })
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.current_pos, kind)
    }
}
