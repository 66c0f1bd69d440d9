use std::{
    fmt::{Debug, Display, Formatter, Result},
    rc::Rc,
};

use crate::common::{
    closure::Closure,
    pair::Pair,
    primitive::{Operator, Primitive},
};

/// Built-in Finch datatypes.
/// Every runtime value, and every form the reader produces, is a `Data`.
#[derive(Clone)]
pub enum Data {
    // Atoms
    /// Always stored upper-case, so equality ignores case.
    Symbol(Rc<str>),
    Real(f64),
    String(Rc<str>),
    Boolean(bool),

    // Lists
    /// The empty list. A distinguished value, not an absence marker.
    Nil,
    Pair(Rc<Pair>),

    // Procedures
    Closure(Rc<Closure>),
    /// A special form, expanded at compile time.
    Operator(Operator),
    /// A primitive procedure backed by a single opcode.
    Function(Primitive),
}

impl Data {
    /// Builds a symbol, folding its name to upper-case.
    pub fn symbol(name: &str) -> Data {
        Data::Symbol(name.to_uppercase().into())
    }

    pub fn string(contents: &str) -> Data {
        Data::String(contents.into())
    }

    pub fn cons(car: Data, cdr: Data) -> Data {
        Data::Pair(Rc::new(Pair::new(car, cdr)))
    }

    /// Builds a proper list out of some items.
    pub fn list(items: Vec<Data>) -> Data {
        Data::improper(items, Data::Nil)
    }

    /// Builds a list out of some items, ending in `tail` rather than `()`.
    pub fn improper(items: Vec<Data>, tail: Data) -> Data {
        items.into_iter().rev().fold(tail, |cdr, car| Data::cons(car, cdr))
    }

    /// Only the boolean `#f` is false; everything else is truthy.
    pub fn is_true(&self) -> bool {
        !matches!(self, Data::Boolean(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Data::Nil)
    }

    /// Literals evaluate to themselves.
    pub fn is_constant(&self) -> bool {
        matches!(self, Data::Real(_) | Data::String(_) | Data::Boolean(_))
    }

    /// Collects the items of a proper list.
    /// Returns `None` if this isn't a list, or if it's improper.
    pub fn to_vec(&self) -> Option<Vec<Data>> {
        let mut items = vec![];
        let mut current = self;

        loop {
            match current {
                Data::Nil => return Some(items),
                Data::Pair(pair) => {
                    items.push(pair.car.clone());
                    current = &pair.cdr;
                },
                _ => return None,
            }
        }
    }

    /// A short human name for the kind of this value, used in errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Symbol(_)   => "a symbol",
            Data::Real(_)     => "a number",
            Data::String(_)   => "a string",
            Data::Boolean(_)  => "a boolean",
            Data::Nil         => "the empty list",
            Data::Pair(_)     => "a pair",
            Data::Closure(_)  => "a procedure",
            Data::Operator(_) => "a special form",
            Data::Function(_) => "a primitive procedure",
        }
    }
}

/// Structural equality for atoms and lists;
/// procedures are only equal to themselves.
impl PartialEq for Data {
    fn eq(&self, other: &Data) -> bool {
        match (self, other) {
            (Data::Symbol(a),   Data::Symbol(b))   => a == b,
            (Data::Real(a),     Data::Real(b))     => a == b,
            (Data::String(a),   Data::String(b))   => a == b,
            (Data::Boolean(a),  Data::Boolean(b))  => a == b,
            (Data::Nil,         Data::Nil)         => true,
            (Data::Pair(a),     Data::Pair(b))     => a == b,
            (Data::Closure(a),  Data::Closure(b))  => Rc::ptr_eq(a, b),
            (Data::Operator(a), Data::Operator(b)) => a == b,
            (Data::Function(a), Data::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Data::Symbol(s)   => write!(f, "{}", s),
            Data::Real(n)     => write!(f, "{}", n),
            Data::String(s)   => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"'  => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        c    => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            },
            Data::Boolean(b)  => write!(f, "{}", if *b { "#T" } else { "#F" }),
            Data::Nil         => write!(f, "()"),
            Data::Pair(p)     => write!(f, "{}", p),
            Data::Closure(c)  => write!(f, "{}", c),
            Data::Operator(o) => write!(f, "#[primitive {}]", o.name()),
            Data::Function(p) => write!(f, "#[primitive {}]", p.name()),
        }
    }
}

impl Debug for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Data::Symbol(s)   => write!(f, "Symbol({})", s),
            Data::Real(n)     => write!(f, "Real({:?})", n),
            Data::String(s)   => write!(f, "String({:?})", s),
            Data::Boolean(b)  => write!(f, "Boolean({:?})", b),
            Data::Nil         => write!(f, "Nil"),
            Data::Pair(p)     => write!(f, "Pair({})", p),
            Data::Closure(_)  => write!(f, "Closure(...)"),
            Data::Operator(o) => write!(f, "Operator({:?})", o),
            Data::Function(p) => write!(f, "Function({:?})", p),
        }
    }
}
