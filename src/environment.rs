use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to one frame of the scope chain.  Closures and blocks hold
/// these; a frame lives as long as its longest holder.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// The global frame: root of every chain.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    pub fn enclosing(&self) -> Option<EnvRef> {
        self.enclosing.clone()
    }

    /// Create or overwrite `name` in this frame.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup walking the whole chain.  Only used for globals.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Overwrite an existing binding; never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Exactly `distance` parent hops from `env`.
    pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
        let mut current: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let parent: EnvRef = current.borrow().enclosing()?;
            current = parent;
        }

        Some(current)
    }

    /// Read `name` from the frame `distance` hops up, without searching.
    pub fn get_at(env: &EnvRef, distance: usize, name: &str) -> Option<Value> {
        debug!("Reading '{}' at distance {}", name, distance);

        let frame: EnvRef = Self::ancestor(env, distance)?;
        let value: Option<Value> = frame.borrow().values.get(name).cloned();

        value
    }

    /// Write `name` in the frame `distance` hops up.  Returns `false` when the
    /// chain is shorter than `distance` or the frame lacks the binding.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &str, value: Value) -> bool {
        debug!("Writing '{}' at distance {}", name, distance);

        let Some(frame) = Self::ancestor(env, distance) else {
            return false;
        };

        let mut frame = frame.borrow_mut();

        match frame.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 1)
    }

    #[test]
    fn get_walks_to_enclosing_frames() {
        let globals = Environment::new().into_ref();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::with_enclosing(globals.clone());

        assert_eq!(inner.get(&ident("a")).ok(), Some(Value::Number(1.0)));
        assert!(inner.get(&ident("b")).is_err());
    }

    #[test]
    fn assign_requires_an_existing_binding() {
        let mut env = Environment::new();

        assert!(env.assign(&ident("a"), Value::Nil).is_err());

        env.define("a", Value::Nil);
        assert!(env.assign(&ident("a"), Value::Bool(true)).is_ok());
        assert_eq!(env.get(&ident("a")).ok(), Some(Value::Bool(true)));
    }

    #[test]
    fn distance_addresses_exactly_one_frame() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("x", Value::string("outer"));

        let middle = Environment::with_enclosing(outer.clone()).into_ref();
        middle.borrow_mut().define("x", Value::string("middle"));

        let inner = Environment::with_enclosing(middle.clone()).into_ref();

        assert_eq!(Environment::get_at(&inner, 1, "x"), Some(Value::string("middle")));
        assert_eq!(Environment::get_at(&inner, 2, "x"), Some(Value::string("outer")));
        assert_eq!(Environment::get_at(&inner, 0, "x"), None);
        assert_eq!(Environment::get_at(&inner, 3, "x"), None);

        assert!(Environment::assign_at(&inner, 2, "x", Value::Nil));
        assert_eq!(Environment::get_at(&middle, 1, "x"), Some(Value::Nil));
        assert!(!Environment::assign_at(&inner, 0, "x", Value::Nil));
    }
}
