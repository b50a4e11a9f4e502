use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::interner::{Interner, Symbol};
use crate::token::Token;

/// Mostly read-only state shared by the scanner, the validator and the evaluator of one
/// interpreter session.
///
/// It anchors the string interner, so every `Symbol` of a session comes from here, and maps
/// keywords to their tokens.
#[derive(Debug)]
pub struct Context {
    interner: RefCell<Interner>,
    keywords: HashMap<Symbol, Token>,
    this: Symbol,
    super_: Symbol,
    init: Symbol,
}

impl Context {
    /// Creates a new context.
    ///
    /// Returns a Rc because the context is shared between various data structures.
    pub fn new() -> Rc<Self> {
        let mut interner = Interner::new();

        let mut keywords = HashMap::new();
        for (name, token) in KEYWORDS.iter().cloned() {
            keywords.insert(interner.symbol(name), token);
        }
        let this = interner.symbol("this");
        let super_ = interner.symbol("super");
        let init = interner.symbol("init");

        Rc::new(Context {
            interner: RefCell::new(interner),
            keywords,
            this,
            super_,
            init,
        })
    }

    /// Intern the given string if needed and return its associated symbol.
    pub fn symbol(&self, name: &str) -> Symbol {
        self.interner.borrow_mut().symbol(name)
    }

    /// Return the token associated with the given symbol if it is a keyword.
    pub fn keyword(&self, id: &Symbol) -> Option<Token> {
        self.keywords.get(id).cloned()
    }

    /// True if `id` cannot be used as a binding name.
    pub fn is_reserved(&self, id: &Symbol) -> bool {
        self.keywords.contains_key(id)
    }

    pub fn this_sym(&self) -> &Symbol {
        &self.this
    }

    pub fn super_sym(&self) -> &Symbol {
        &self.super_
    }

    /// Name of the class initializer method.
    pub fn init_sym(&self) -> &Symbol {
        &self.init
    }
}

const KEYWORDS: [(&str, Token); 16] = [
    ("and", Token::And),
    ("class", Token::Class),
    ("else", Token::Else),
    ("false", Token::False),
    ("for", Token::For),
    ("fun", Token::Fun),
    ("if", Token::If),
    ("nil", Token::Nil),
    ("or", Token::Or),
    ("print", Token::Print),
    ("return", Token::Return),
    ("super", Token::Super),
    ("this", Token::This),
    ("true", Token::True),
    ("var", Token::Var),
    ("while", Token::While),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_reserved() {
        let ctx = Context::new();
        for (name, token) in KEYWORDS.iter() {
            let sym = ctx.symbol(name);
            assert!(ctx.is_reserved(&sym), "{} should be reserved", name);
            assert_eq!(ctx.keyword(&sym).as_ref(), Some(token));
        }
    }

    #[test]
    fn plain_identifiers_are_not_reserved() {
        let ctx = Context::new();
        assert!(!ctx.is_reserved(&ctx.symbol("init")));
        assert!(!ctx.is_reserved(&ctx.symbol("clock")));
    }

    #[test]
    fn well_known_symbols_are_interned() {
        let ctx = Context::new();
        assert_eq!(ctx.this_sym(), &ctx.symbol("this"));
        assert_eq!(ctx.init_sym(), &ctx.symbol("init"));
    }
}
