//! # Finch
//! A small Scheme with proper tail calls and first-class,
//! re-entrant continuations.
//!
//! ## Embedding Finch in Rust
//! ```
//! use finch::VM;
//!
//! let mut vm = VM::init().unwrap();
//! vm.run("(define (square x) (* x x))").unwrap();
//!
//! let form = finch::read("(map square '(1 2 3))").unwrap().remove(0);
//! assert_eq!(format!("{}", vm.eval(&form).unwrap()), "(1 4 9)");
//! ```
//!
//! ## Overview of the compilation process
//! Text is wrapped in a `Source`, then:
//!
//! 1. The lexer turns it into a stream of spanned tokens.
//! 2. The reader turns tokens into forms, which are plain `Data`.
//! 3. The compiler turns each form into a graph of instructions,
//!    built back to front so every node links to whatever runs after it.
//! 4. The VM walks that graph with a handful of registers.
//!
//! Call frames are immutable and shared,
//! so `call/cc` captures the whole stack without copying it,
//! and a continuation can be resumed as many times as you'd like.

pub mod common;
pub mod compiler;
pub mod error;
pub mod vm;

pub use common::data::Data;
pub use error::Error;
pub use vm::{Config, VM};

use common::source::Source;
use compiler::syntax::Syntax;

/// Reads every form in `text` without evaluating anything.
pub fn read(text: &str) -> Result<Vec<Data>, Syntax> {
    compiler::read(Source::source(text))
}
