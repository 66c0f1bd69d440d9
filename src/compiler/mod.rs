//! This module contains the compiler implementation.
//! Note that these modules are public for documentation visiblility;
//! the `vm` only goes through the functions at the bottom of this file.
//!
//! Each step in the compiler pipeline turns one datatype into another,
//! starting with `Source` (string + path):
//!
//! 1. Tokens: `lex.rs`
//! 2. Forms: `read.rs`
//! 3. Instruction graph: `compile.rs` (special forms live in `special.rs`)
//!
//! Unlike the first two steps, compilation needs an environment,
//! as whether `(if ...)` is a special form depends on what `IF` is bound to.

pub mod compile;
pub mod lex;
pub mod read;
mod special;
pub mod syntax;
pub mod token;

use std::rc::Rc;

pub use compile::Compiler;
pub use lex::Lexer;
pub use read::Reader;
pub use syntax::Syntax;

use crate::common::{
    data::Data,
    env::Env,
    opcode::Inst,
    Source,
};
use token::Tokens;

#[inline(always)]
pub fn lex(source: Rc<Source>) -> Result<Tokens, Syntax> {
    Lexer::lex(source)
}

#[inline(always)]
pub fn read(source: Rc<Source>) -> Result<Vec<Data>, Syntax> {
    let tokens = lex(source)?;
    Reader::read(tokens)
}

#[inline(always)]
pub fn compile(form: &Data, next: Rc<Inst>, env: &Env) -> Result<Rc<Inst>, Syntax> {
    Compiler::compile(form, next, env)
}
