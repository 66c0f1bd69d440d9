use std::fmt;

use crate::common::{data::Data, env::Unbound};

/// The kinds of runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A name isn't bound anywhere along the environment chain.
    Unbound,
    /// An opcode was handed a value of the wrong type.
    Type,
    /// A procedure was called with the wrong number of arguments.
    Arity,
    /// The VM reached an instruction it can't execute in its current state.
    Instruction,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Unbound     => "Unbound Variable",
            Kind::Type        => "Type",
            Kind::Arity       => "Arity",
            Kind::Instruction => "Instruction",
        };
        write!(f, "{}", name)
    }
}

/// Represents a runtime error.
/// Runtime errors abort the current evaluation;
/// there is no way to catch one from within the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub kind: Kind,
    pub message: String,
}

impl Trace {
    pub fn error(kind: Kind, message: &str) -> Trace {
        Trace { kind, message: message.to_string() }
    }

    pub fn unbound(name: &str) -> Trace {
        Trace::error(Kind::Unbound, &format!("Unbound variable: {}", name))
    }

    /// `found` is printed as-is, so the offending value shows up in the message.
    pub fn type_error(expected: &str, found: &Data) -> Trace {
        Trace::error(
            Kind::Type,
            &format!("Expected {}, found {} `{}`", expected, found.kind(), found),
        )
    }

    pub fn arity(name: &str, expected: &str, found: usize) -> Trace {
        Trace::error(
            Kind::Arity,
            &format!("{} expects {} argument(s), found {}", name, expected, found),
        )
    }
}

impl From<Unbound> for Trace {
    fn from(unbound: Unbound) -> Trace {
        Trace::unbound(&unbound.0)
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime {} Error: {}", self.kind, self.message)
    }
}

impl std::error::Error for Trace {}
