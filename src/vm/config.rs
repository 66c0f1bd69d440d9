//! Knobs for constructing a VM.
//! Configuration only describes what to do; the VM does it.

/// VM Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Run the bootstrap definitions when the VM is constructed.
    pub prelude: bool,

    /// When set, every top-level result is also bound globally under this name,
    /// so the last value can be referred to from the next form.
    pub result_binding: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prelude: true,
            result_binding: None,
        }
    }
}

impl Config {
    /// A VM with nothing but the primitives bound.
    pub fn bare() -> Self {
        Config { prelude: false, ..Self::default() }
    }
}
