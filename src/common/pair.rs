use std::{
    fmt::{Display, Formatter, Result},
    mem,
    rc::Rc,
};

use crate::common::data::Data;

/// An immutable cons cell.
/// A list is a chain of pairs ending in `Data::Nil`;
/// anything else in the final `cdr` makes the list improper (dotted).
#[derive(Debug, PartialEq)]
pub struct Pair {
    pub car: Data,
    pub cdr: Data,
}

impl Pair {
    pub fn new(car: Data, cdr: Data) -> Pair {
        Pair { car, cdr }
    }

    /// Walks to the terminator, counting pairs.
    /// Only proper lists have a length, so an improper one yields `None`.
    pub fn length(&self) -> Option<usize> {
        let mut length = 1;
        let mut rest = &self.cdr;

        loop {
            match rest {
                Data::Nil => return Some(length),
                Data::Pair(pair) => {
                    length += 1;
                    rest = &pair.cdr;
                },
                _ => return None,
            }
        }
    }
}

// Long lists would otherwise be dropped recursively, one host frame per pair.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut tail = mem::replace(&mut self.cdr, Data::Nil);

        while let Data::Pair(rc) = tail {
            match Rc::try_unwrap(rc) {
                Ok(mut pair) => tail = mem::replace(&mut pair.cdr, Data::Nil),
                Err(_) => break,
            }
        }
    }
}

impl Display for Pair {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "({}", self.car)?;
        let mut rest = &self.cdr;

        loop {
            match rest {
                Data::Nil => break,
                Data::Pair(pair) => {
                    write!(f, " {}", pair.car)?;
                    rest = &pair.cdr;
                },
                other => {
                    write!(f, " . {}", other)?;
                    break;
                },
            }
        }

        write!(f, ")")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn numbers(ns: &[f64]) -> Vec<Data> {
        ns.iter().map(|n| Data::Real(*n)).collect()
    }

    #[test]
    fn length() {
        if let Data::Pair(pair) = Data::list(numbers(&[1.0, 2.0, 3.0])) {
            assert_eq!(pair.length(), Some(3));
        } else { panic!("expected a pair") }

        if let Data::Pair(pair) = Data::improper(numbers(&[1.0, 2.0]), Data::Real(3.0)) {
            assert_eq!(pair.length(), None);
        } else { panic!("expected a pair") }
    }

    #[test]
    fn printing() {
        assert_eq!(format!("{}", Data::list(numbers(&[1.0, 2.0, 3.0]))), "(1 2 3)");
        assert_eq!(format!("{}", Data::cons(Data::Real(1.0), Data::Real(2.0))), "(1 . 2)");
        assert_eq!(
            format!("{}", Data::improper(numbers(&[1.0, 2.0]), Data::Real(3.0))),
            "(1 2 . 3)",
        );

        let nested = Data::list(vec![Data::symbol("a"), Data::list(numbers(&[1.0])), Data::Nil]);
        assert_eq!(format!("{}", nested), "(A (1) ())");
    }

    #[test]
    fn long_list_drops() {
        let list = Data::list(vec![Data::Real(0.0); 200_000]);
        drop(list);
    }
}
