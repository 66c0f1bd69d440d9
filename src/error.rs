use thiserror::Error;

use crate::{compiler::syntax::Syntax, vm::trace::Trace};

/// Anything that can go wrong between reading some text and getting a value back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Reading or compiling failed; nothing was executed.
    #[error(transparent)]
    Syntax(#[from] Syntax),
    /// Execution was aborted.
    #[error(transparent)]
    Trace(#[from] Trace),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vm::trace::Kind;

    #[test]
    fn conversions() {
        let error: Error = Syntax::new("nope").into();
        assert!(matches!(error, Error::Syntax(_)));

        let error: Error = Trace::unbound("X").into();
        assert_eq!(format!("{}", error), "Runtime Unbound Variable Error: Unbound variable: X");
        assert!(matches!(error, Error::Trace(Trace { kind: Kind::Unbound, .. })));
    }
}
