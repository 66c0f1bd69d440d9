//! This module contains the core VM implementation.
//! Note that these modules are public for documentation visiblility;
//! `common` only reaches in for the `Stack` a continuation captures.

pub mod vm;

pub mod config;
pub mod prelude;
pub mod stack;
pub mod trace;

pub use config::Config;
pub use trace::Trace;
pub use vm::{State, VM};
