use std::{
    fmt::{Debug, Formatter, Result},
    rc::Rc,
};

use crate::{
    common::{data::Data, primitive::Primitive},
    vm::stack::Stack,
};

/// A single node in a compiled instruction graph.
/// Every node links to whatever runs after it,
/// except `Test`, which has two successors,
/// and the nodes that end a chain (`Apply`, `Return`, `Nuate`, `Finish`),
/// which get their successor from the VM's registers.
pub enum Inst {
    /// Load a literal into the accumulator.
    Constant { data: Data, next: Rc<Inst> },
    /// Load a variable into the accumulator.
    Lookup { name: Rc<str>, next: Rc<Inst> },
    /// Bind the accumulator in the innermost environment frame.
    Define { name: Rc<str>, next: Rc<Inst> },
    /// Overwrite the nearest existing binding with the accumulator.
    Set { name: Rc<str>, next: Rc<Inst> },
    /// Branch on the truthiness of the accumulator.
    Test { consequent: Rc<Inst>, alternative: Rc<Inst> },
    /// Close over the current environment.
    Closure { formals: Rc<[Rc<str>]>, body: Rc<Inst>, next: Rc<Inst> },
    /// Capture the current call stack as a continuation closure.
    Conti { next: Rc<Inst> },
    /// Push the accumulator onto the pending arguments.
    Argument { next: Rc<Inst> },
    /// Push a call frame that resumes at `ret`, then continue at `next`.
    Frame { ret: Rc<Inst>, next: Rc<Inst> },
    /// Call the procedure in the accumulator with the pending arguments.
    Apply,
    /// Pop the top call frame and resume it.
    Return,
    /// Reinstate a captured call stack, returning the bound value to it.
    Nuate { stack: Stack, name: Rc<str> },
    /// Negate the truthiness of the accumulator.
    Not { next: Rc<Inst> },
    /// Check whether the accumulator is the empty list.
    IsNull { next: Rc<Inst> },
    /// Fold the pending arguments with a primitive procedure.
    Primitive { primitive: Primitive, next: Rc<Inst> },
    /// End of a top-level evaluation.
    Finish,
}

impl Inst {
    /// Wraps an instruction so it can be linked to.
    pub fn link(self) -> Rc<Inst> {
        Rc::new(self)
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Inst::Return)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Inst::Constant  { .. } => "constant",
            Inst::Lookup    { .. } => "lookup",
            Inst::Define    { .. } => "define",
            Inst::Set       { .. } => "set",
            Inst::Test      { .. } => "test",
            Inst::Closure   { .. } => "closure",
            Inst::Conti     { .. } => "conti",
            Inst::Argument  { .. } => "argument",
            Inst::Frame     { .. } => "frame",
            Inst::Apply            => "apply",
            Inst::Return           => "return",
            Inst::Nuate     { .. } => "nuate",
            Inst::Not       { .. } => "not",
            Inst::IsNull    { .. } => "isnull",
            Inst::Primitive { .. } => "primitive",
            Inst::Finish           => "finish",
        }
    }
}

// Successors are left out; printing a whole graph
// would walk every branch and every shared tail.
impl Debug for Inst {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Inst::Constant  { data, .. }      => write!(f, "constant {}", data),
            Inst::Lookup    { name, .. }      => write!(f, "lookup {}", name),
            Inst::Define    { name, .. }      => write!(f, "define {}", name),
            Inst::Set       { name, .. }      => write!(f, "set {}", name),
            Inst::Closure   { formals, .. }   => write!(f, "closure {:?}", formals),
            Inst::Nuate     { name, .. }      => write!(f, "nuate {}", name),
            Inst::Primitive { primitive, .. } => write!(f, "primitive {}", primitive.name()),
            other => write!(f, "{}", other.name()),
        }
    }
}
