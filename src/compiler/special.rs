//! Expansion of special forms.
//! Each operator is handed the whole, unevaluated form
//! (head included) and decides what gets compiled, and when.

use std::rc::Rc;

use crate::{
    common::{
        data::Data,
        opcode::Inst,
        primitive::Operator,
    },
    compiler::{compile::Compiler, syntax::Syntax},
};

impl<'a> Compiler<'a> {
    pub(super) fn operator(
        &self,
        operator: Operator,
        form: &[Data],
        next: Rc<Inst>,
    ) -> Result<Rc<Inst>, Syntax> {
        match operator {
            Operator::Define => self.define(form, next),
            Operator::Set    => self.set(form, next),
            Operator::If     => self.conditional(form, next),
            Operator::Lambda => {
                let (formals, body) = Compiler::lambda_parts(operator, form)?;
                self.lambda(formals, body, next)
            },
            Operator::Quote => {
                let quoted = Compiler::operand(operator, form)?;
                Ok(Inst::Constant { data: quoted.clone(), next }.link())
            },
            Operator::Not => {
                let operand = Compiler::operand(operator, form)?;
                self.walk(operand, Inst::Not { next }.link())
            },
            Operator::IsNull => {
                let operand = Compiler::operand(operator, form)?;
                self.walk(operand, Inst::IsNull { next }.link())
            },
            Operator::CallCc => self.call_cc(form, next),
        }
    }

    /// The single operand of a one-operand special form.
    fn operand(operator: Operator, form: &[Data]) -> Result<&Data, Syntax> {
        match form {
            [_, operand] => Ok(operand),
            _ => Err(Syntax::new(&format!(
                "{} expects exactly one operand, found {}",
                operator.name(),
                form.len() - 1,
            ))),
        }
    }

    /// `(define name value)`, or `(define (name formal ...) body ...)`.
    fn define(&self, form: &[Data], next: Rc<Inst>) -> Result<Rc<Inst>, Syntax> {
        match form {
            [_, Data::Symbol(name), value] => {
                self.walk(value, Inst::Define { name: Rc::clone(name), next }.link())
            },
            [_, Data::Pair(signature), body @ ..] if !body.is_empty() => {
                let name = match &signature.car {
                    Data::Symbol(name) => Rc::clone(name),
                    other => return Err(Syntax::new(&format!(
                        "Expected a procedure name to define, found {}", other,
                    ))),
                };
                self.lambda(&signature.cdr, body, Inst::Define { name, next }.link())
            },
            _ => Err(Syntax::new(
                "DEFINE expects a name and a value, like `(define x 1)` or `(define (f x) x)`",
            )),
        }
    }

    /// `(set! name value)`
    fn set(&self, form: &[Data], next: Rc<Inst>) -> Result<Rc<Inst>, Syntax> {
        match form {
            [_, Data::Symbol(name), value] => {
                self.walk(value, Inst::Set { name: Rc::clone(name), next }.link())
            },
            _ => Err(Syntax::new("SET! expects a name and a value, like `(set! x 1)`")),
        }
    }

    /// `(if test consequent [alternative])`
    /// Both branches are compiled up front and share `next`.
    fn conditional(&self, form: &[Data], next: Rc<Inst>) -> Result<Rc<Inst>, Syntax> {
        let otherwise = Data::Boolean(false);
        let (test, consequent, alternative) = match form {
            [_, test, consequent] => (test, consequent, &otherwise),
            [_, test, consequent, alternative] => (test, consequent, alternative),
            _ => return Err(Syntax::new(&format!(
                "IF expects two or three operands, found {}",
                form.len() - 1,
            ))),
        };

        let consequent = self.walk(consequent, Rc::clone(&next))?;
        let alternative = self.walk(alternative, next)?;
        self.walk(test, Inst::Test { consequent, alternative }.link())
    }

    fn lambda_parts(operator: Operator, form: &[Data]) -> Result<(&Data, &[Data]), Syntax> {
        match form {
            [_, formals, body @ ..] if !body.is_empty() => Ok((formals, body)),
            _ => Err(Syntax::new(&format!(
                "{} expects a list of formals and at least one body form",
                operator.name(),
            ))),
        }
    }

    /// Builds a closure instruction directly;
    /// the body runs in its own frame and ends in `return`.
    fn lambda(
        &self,
        formals: &Data,
        body: &[Data],
        next: Rc<Inst>,
    ) -> Result<Rc<Inst>, Syntax> {
        let formals = formals
            .to_vec()
            .ok_or_else(|| Syntax::new(&format!("Expected a list of formals, found {}", formals)))?
            .into_iter()
            .map(|formal| match formal {
                Data::Symbol(name) => Ok(name),
                other => Err(Syntax::new(&format!("Formals must be symbols, found {}", other))),
            })
            .collect::<Result<Rc<[Rc<str>]>, Syntax>>()?;

        let body = self.sequence(body, Inst::Return.link())?;
        Ok(Inst::Closure { formals, body, next }.link())
    }

    /// `(call/cc procedure)`
    /// Captures the stack as a continuation, then applies `procedure` to it
    /// under the usual frame protocol.
    /// The frame pushed here (if any) is part of what gets captured,
    /// so invoking the continuation returns straight to `next`.
    fn call_cc(&self, form: &[Data], next: Rc<Inst>) -> Result<Rc<Inst>, Syntax> {
        let procedure = Compiler::operand(Operator::CallCc, form)?;
        let callee = self.walk(procedure, Inst::Apply.link())?;
        let code = Inst::Conti { next: Inst::Argument { next: callee }.link() }.link();
        Ok(self.frame(code, next))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::{env::Env, primitive::bindings};
    use crate::read;

    fn compile(source: &str) -> Result<Rc<Inst>, Syntax> {
        let env = Env::global();
        for (name, data) in bindings() {
            env.define(name.into(), data);
        }
        let form = read(source).unwrap().remove(0);
        Compiler::compile(&form, Inst::Finish.link(), &env)
    }

    #[test]
    fn well_formed() {
        let cases = &[
            "(define x 1)",
            "(define (f x y) (+ x y))",
            "(define (thunk) 1 2 3)",
            "(set! x 2)",
            "(if #t 1 2)",
            "(if #t 1)",
            "(lambda (x) x)",
            "(lambda () 1 2)",
            "(quote (1 2 3))",
            "'x",
            "(not #f)",
            "(null? '())",
            "(call/cc (lambda (k) (k 1)))",
            "(call-with-current-continuation (lambda (k) 1))",
        ];

        for case in cases.iter() {
            if let Err(e) = compile(case) {
                panic!("{} failed to compile: {}", case, e);
            }
        }
    }

    #[test]
    fn malformed() {
        let cases = &[
            "(define)",
            "(define x)",
            "(define 1 2)",
            "(define (1 x) x)",
            "(set! 1 2)",
            "(set! x)",
            "(if)",
            "(if 1 2 3 4)",
            "(lambda)",
            "(lambda (x))",
            "(lambda (1) 1)",
            "(lambda (x . y) x)",
            "(quote)",
            "(quote 1 2)",
            "(not)",
            "(null? 1 2)",
            "(call/cc)",
        ];

        for case in cases.iter() {
            assert!(compile(case).is_err(), "{} should not compile", case);
        }
    }

    #[test]
    fn quote_is_constant() {
        match &*compile("'(a b)").unwrap() {
            Inst::Constant { data, .. } => assert_eq!(format!("{}", data), "(A B)"),
            other => panic!("expected a constant, found {:?}", other),
        }
    }

    #[test]
    fn lambda_is_a_closure() {
        match &*compile("(lambda (a b) b)").unwrap() {
            Inst::Closure { formals, body, .. } => {
                assert_eq!(formals.len(), 2);
                assert!(matches!(**body, Inst::Lookup { .. }));
            },
            other => panic!("expected a closure, found {:?}", other),
        }
    }

    #[test]
    fn call_cc_frames_outside_tail_position() {
        assert!(matches!(*compile("(call/cc f)").unwrap(), Inst::Frame { .. }));
    }
}
