//! Lexical analyzer

use std::rc::Rc;
use std::str::Chars;

use crate::ctx::Context;
use crate::diag::{Position, SyntaxError, SyntaxErrorKind};
use crate::token::Token;

/// Turn source text into a sequence of tokens.
pub struct Scanner<'s> {
    input: Chars<'s>,
    line: Position,
    ctx: Rc<Context>,

    // Buffer used when scanning longer tokens.  Allocated here to reuse memory.
    buf: String,
}

impl<'s> Scanner<'s> {
    /// Creates a new scanner operating on `input`.
    pub fn new(input: &'s str, ctx: Rc<Context>) -> Scanner<'s> {
        Scanner {
            input: input.chars(),
            line: 1,
            ctx,
            buf: String::new(),
        }
    }

    /// Scan next token and return it with the line it ends on.
    pub fn get_token(&mut self) -> Result<(Position, Token), SyntaxError> {
        self.get_raw_token().map(|token| (self.line, token))
    }

    fn get_raw_token(&mut self) -> Result<Token, SyntaxError> {
        loop {
            let ch = match self.input.next() {
                None => return Ok(Token::Eof),
                Some(ch) => ch,
            };
            match ch {
                '\n' => self.line += 1,
                ' ' | '\t' | '\r' => (),
                '+' => return Ok(Token::Plus),
                '-' => return Ok(Token::Minus),
                '*' => return Ok(Token::Star),
                '/' => {
                    if self.peek() == Some('/') {
                        self.skip_comment();
                    } else {
                        return Ok(Token::Slash);
                    }
                }
                '(' => return Ok(Token::LeftParen),
                ')' => return Ok(Token::RightParen),
                '{' => return Ok(Token::LeftCurly),
                '}' => return Ok(Token::RightCurly),
                ';' => return Ok(Token::Semicolon),
                ',' => return Ok(Token::Comma),
                '.' => return Ok(Token::Dot),
                '<' => return Ok(self.either('=', Token::LessEqual, Token::Less)),
                '>' => return Ok(self.either('=', Token::GreaterEqual, Token::Greater)),
                '=' => return Ok(self.either('=', Token::EqualEqual, Token::Equal)),
                '!' => return Ok(self.either('=', Token::BangEqual, Token::Bang)),
                '"' => return self.scan_string(),
                '0'..='9' => return self.scan_number(ch),
                'a'..='z' | 'A'..='Z' | '_' => return Ok(self.scan_identifier(ch)),
                _ => return Err(self.error(SyntaxErrorKind::UnexpectedChar(ch))),
            }
        }
    }

    /// Return `matched` and consume the next character if it is `next`, `single` otherwise.
    fn either(&mut self, next: char, matched: Token, single: Token) -> Token {
        if self.peek() == Some(next) {
            self.input.next();
            matched
        } else {
            single
        }
    }

    fn scan_string(&mut self) -> Result<Token, SyntaxError> {
        self.buf.clear();
        loop {
            match self.input.next() {
                None => return Err(self.error(SyntaxErrorKind::UnterminatedString)),
                Some('"') => break,
                Some(ch) => {
                    if ch == '\n' {
                        self.line += 1;
                    }
                    self.buf.push(ch);
                }
            }
        }
        Ok(Token::Str(Rc::from(self.buf.as_str())))
    }

    fn scan_number(&mut self, first_digit: char) -> Result<Token, SyntaxError> {
        self.buf.clear();
        self.buf.push(first_digit);
        self.take_digits();

        // A dot belongs to the literal only when a digit follows it: `1.foo` is a property access.
        if self.peek() == Some('.') && self.peek_next().map_or(false, |ch| ch.is_ascii_digit()) {
            self.input.next();
            self.buf.push('.');
            self.take_digits();
        }

        let n = self.buf.parse::<f64>().map_err(|_| {
            self.error(SyntaxErrorKind::BadNumberLiteral(self.buf.clone()))
        })?;
        Ok(Token::Number(n))
    }

    fn take_digits(&mut self) {
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            self.input.next();
            self.buf.push(ch);
        }
    }

    fn skip_comment(&mut self) {
        while self.peek().map_or(false, |ch| ch != '\n') {
            self.input.next();
        }
    }

    fn scan_identifier(&mut self, first_char: char) -> Token {
        self.buf.clear();
        self.buf.push(first_char);
        while let Some(ch) = self
            .peek()
            .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        {
            self.input.next();
            self.buf.push(ch);
        }

        let sym = self.ctx.symbol(&self.buf);
        if let Some(token) = self.ctx.keyword(&sym) {
            token
        } else {
            Token::Identifier(sym)
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.clone().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.clone().nth(1)
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.line, kind)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.get_token() {
            Ok((_, Token::Eof)) => None,
            Ok((_, t)) => Some(Ok(t)),
            Err(e) => Some(Err(e)),
        }
    }
}
