use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::Rc,
};

use crate::common::data::Data;

/// Raised when a name isn't bound anywhere along an environment chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unbound(pub Rc<str>);

impl fmt::Display for Unbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unbound variable: {}", self.0)
    }
}

/// A single frame of bindings.
#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<Rc<str>, Data>,
    parent: Option<Env>,
}

/// A shared, mutable mapping from names to values,
/// chained to the environment it was extended from.
/// Cloning an `Env` clones the handle, not the bindings,
/// so closures that capture an environment see later mutations to it.
#[derive(Clone, Default)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// A fresh environment with no parent.
    pub fn global() -> Env {
        Env::default()
    }

    /// A new, empty child frame of this environment.
    pub fn extend(&self) -> Env {
        Env(Rc::new(RefCell::new(Scope {
            bindings: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Looks a name up, walking outward; the innermost binding wins.
    pub fn lookup(&self, name: &str) -> Result<Data, Unbound> {
        let mut env = self.clone();

        loop {
            let parent = {
                let scope = env.0.borrow();
                if let Some(data) = scope.bindings.get(name) {
                    return Ok(data.clone());
                }
                scope.parent.clone()
            };

            match parent {
                Some(p) => env = p,
                None => return Err(Unbound(name.into())),
            }
        }
    }

    /// Creates or overwrites a binding in this frame only.
    pub fn define(&self, name: Rc<str>, data: Data) {
        self.0.borrow_mut().bindings.insert(name, data);
    }

    /// Mutates the nearest frame that already binds `name`.
    pub fn set(&self, name: &str, data: Data) -> Result<(), Unbound> {
        let mut env = self.clone();

        loop {
            let parent = {
                let mut scope = env.0.borrow_mut();
                if let Some(slot) = scope.bindings.get_mut(name) {
                    *slot = data;
                    return Ok(());
                }
                scope.parent.clone()
            };

            match parent {
                Some(p) => env = p,
                None => return Err(Unbound(name.into())),
            }
        }
    }
}

impl fmt::Debug for Env {
    // bindings can hold closures that point back at this env
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<_> = scope.bindings.keys().map(|k| k.to_string()).collect();
        names.sort();
        f.debug_struct("Env")
            .field("names", &names)
            .field("nested", &scope.parent.is_some())
            .finish()
    }
}
