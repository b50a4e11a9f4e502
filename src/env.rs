//! Lexical environments.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::rc::Rc;

use crate::eval::RuntimeError;
use crate::interner::Symbol;
use crate::value::Value;

/// One frame of the scope chain.
///
/// Frames are shared: a closure keeps its defining frame alive after the block that created it
/// is done.  The parentless frame at the bottom of every chain holds the builtins and the frame
/// right above it holds the program globals.
#[derive(Debug)]
pub struct Env {
    parent: Option<Rc<Env>>,
    bindings: RefCell<HashMap<Symbol, Value>>,
}

impl Env {
    /// Create a parentless frame.
    pub fn root<I>(bindings: I) -> Rc<Env>
    where
        I: IntoIterator<Item = (Symbol, Value)>,
    {
        Rc::new(Env {
            parent: None,
            bindings: RefCell::new(bindings.into_iter().collect()),
        })
    }

    /// Create the frame holding the program globals.
    pub fn global(builtins: &Rc<Env>) -> Rc<Env> {
        Env::push(builtins, [])
    }

    /// Create a child frame of `parent` seeded with `bindings`.
    pub fn push<I>(parent: &Rc<Env>, bindings: I) -> Rc<Env>
    where
        I: IntoIterator<Item = (Symbol, Value)>,
    {
        Rc::new(Env {
            parent: Some(parent.clone()),
            bindings: RefCell::new(bindings.into_iter().collect()),
        })
    }

    pub fn is_global(&self) -> bool {
        self.parent.as_ref().map_or(false, |p| p.parent.is_none())
    }

    fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Bind `name` in this frame.
    ///
    /// Redefinition is only allowed in the global and root frames.
    pub fn define(&self, name: Symbol, value: Value) -> Result<(), RuntimeError> {
        let mut bindings = self.bindings.borrow_mut();
        if self.is_root() || self.is_global() {
            bindings.insert(name, value);
            return Ok(());
        }
        match bindings.entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
            Entry::Occupied(entry) => Err(RuntimeError::DuplicateDefinition(
                entry.key().name().to_owned(),
            )),
        }
    }

    /// Value bound to `name` in the nearest enclosing frame.
    pub fn get(&self, name: &Symbol) -> Result<Value, RuntimeError> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.get(name),
            None => Err(RuntimeError::UndefinedName(name.name().to_owned())),
        }
    }

    /// Overwrite the nearest existing binding of `name`.  Never creates a binding.
    pub fn assign(&self, name: &Symbol, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.bindings.borrow_mut().get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(RuntimeError::UndefinedName(name.name().to_owned())),
        }
    }

    pub fn contains(&self, name: &Symbol) -> bool {
        self.bindings.borrow().contains_key(name)
            || self.parent.as_ref().map_or(false, |p| p.contains(name))
    }

    /// Bindings of this frame only.
    pub fn own_bindings(&self) -> BTreeMap<Symbol, Value> {
        self.bindings
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Every binding visible from this frame, nearer frames hiding outer ones.
    pub fn to_map(&self) -> BTreeMap<Symbol, Value> {
        let mut map = match &self.parent {
            Some(parent) => parent.to_map(),
            None => BTreeMap::new(),
        };
        map.extend(self.own_bindings());
        map
    }

    /// Human-readable dump of the scope chain, innermost frame first.
    ///
    /// Frames are numbered from the root, which holds the builtins.
    pub fn pretty(&self) -> String {
        let mut frames = Vec::new();
        let mut frame = self;
        loop {
            frames.push(frame);
            match &frame.parent {
                Some(parent) => frame = parent,
                None => break,
            }
        }

        let mut lines = Vec::with_capacity(frames.len());
        for (depth, frame) in frames.iter().rev().enumerate() {
            let mut line = format!("{:>2}: ", depth);
            if frame.is_root() {
                line.push_str("BUILTINS");
            } else {
                let bindings = frame.own_bindings();
                if bindings.is_empty() {
                    line.push_str("<empty>");
                }
                for (i, (name, value)) in bindings.into_iter().enumerate() {
                    if i > 0 {
                        line.push_str("; ");
                    }
                    let _ = write!(line, "{} = {}", name, value);
                }
            }
            lines.push(line);
        }
        lines.reverse();
        lines.join("\n")
    }
}
