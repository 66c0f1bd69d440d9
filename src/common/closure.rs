use std::{
    fmt::{Display, Formatter, Result},
    rc::Rc,
};

use crate::common::{
    env::Env,
    opcode::Inst,
};

/// A compiled procedure together with the environment it was created in.
/// Applying it binds the formals in a fresh child of `env`;
/// `env` itself is only ever read through.
pub struct Closure {
    pub env: Env,
    pub formals: Rc<[Rc<str>]>,
    pub body: Rc<Inst>,
}

impl Closure {
    pub fn new(env: Env, formals: Rc<[Rc<str>]>, body: Rc<Inst>) -> Closure {
        Closure { env, formals, body }
    }

    /// Continuations are closures whose body reinstates a captured stack.
    pub fn is_continuation(&self) -> bool {
        matches!(*self.body, Inst::Nuate { .. })
    }
}

impl Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.is_continuation() {
            write!(f, "#[Continuation]")
        } else {
            write!(f, "#[Lexical closure]")
        }
    }
}
