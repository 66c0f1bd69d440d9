//! Contains datastructures and utility functions
//! common to both the `compiler` and `vm`.
//!
//! - The value model: `Data`, pairs, closures and primitives.
//! - Environments.
//! - The instruction graph produced by the compiler.
//! - Source code representation and span annotations.

pub mod closure;
pub mod data;
pub mod env;
pub mod opcode;
pub mod pair;
pub mod primitive;
pub mod source;
pub mod span;

pub use closure::Closure;
pub use data::Data;
pub use env::Env;
pub use opcode::Inst;
pub use source::Source;
pub use span::{Span, Spanned};
