use std::rc::Rc;

use crate::{
    common::{
        data::Data,
        env::Env,
        opcode::Inst,
        primitive::Primitive,
    },
    compiler::syntax::Syntax,
};

/// Compiler turns a single form into an instruction graph.
/// Every graph is built back to front:
/// each form is compiled knowing what runs after it (`next`),
/// so a call knows whether it's in tail position
/// simply by checking whether `next` is a bare `return`.
/// The environment is consulted to tell special forms and primitives
/// apart from ordinary calls; nothing is bound while compiling.
pub struct Compiler<'a> {
    env: &'a Env,
}

impl<'a> Compiler<'a> {
    /// Compiles `form` against `env`, continuing with `next`.
    pub fn compile(form: &Data, next: Rc<Inst>, env: &Env) -> Result<Rc<Inst>, Syntax> {
        Compiler { env }.walk(form, next)
    }

    /// Compiles a single form.
    /// A list whose head names a special form or primitive
    /// in the environment handed to `Compiler::compile` is expanded as such,
    /// even where a lambda parameter of the same name would shadow it at runtime:
    /// `(lambda (list) (list 5))` still calls the `LIST` primitive.
    pub fn walk(&self, form: &Data, next: Rc<Inst>) -> Result<Rc<Inst>, Syntax> {
        match form {
            constant if constant.is_constant() => {
                Ok(Inst::Constant { data: constant.clone(), next }.link())
            },
            Data::Symbol(name) => Ok(Inst::Lookup { name: Rc::clone(name), next }.link()),
            Data::Pair(pair) => {
                let items = form.to_vec().ok_or_else(|| Syntax::new(
                    &format!("Can not evaluate the improper list {}", form)
                ))?;

                if let Data::Symbol(head) = &pair.car {
                    // a head that isn't bound can't be a special form,
                    // so it falls through to an ordinary call.
                    match self.env.lookup(head) {
                        Ok(Data::Operator(operator)) => {
                            return self.operator(operator, &items, next);
                        },
                        Ok(Data::Function(primitive)) => {
                            return self.primitive(primitive, &items[1..], next);
                        },
                        Ok(_) | Err(_) => (),
                    }
                }

                self.application(&items[0], &items[1..], next)
            },
            Data::Nil => Err(Syntax::new("Can not evaluate the empty list `()`")),
            other => Err(Syntax::new(&format!("Can not compile {}", other))),
        }
    }

    /// Evaluates forms in order; the last continues with `next`.
    pub fn sequence(&self, forms: &[Data], next: Rc<Inst>) -> Result<Rc<Inst>, Syntax> {
        forms.iter().rev().try_fold(next, |code, form| self.walk(form, code))
    }

    /// Evaluates `args` right to left, pushing each onto the pending arguments,
    /// then runs `callee`. The first argument ends up on top.
    fn arguments(&self, args: &[Data], callee: Rc<Inst>) -> Result<Rc<Inst>, Syntax> {
        args.iter().try_fold(callee, |code, arg| {
            self.walk(arg, Inst::Argument { next: code }.link())
        })
    }

    /// Calls in tail position reuse the current frame;
    /// everything else saves one that resumes at `next`.
    pub(super) fn frame(&self, code: Rc<Inst>, next: Rc<Inst>) -> Rc<Inst> {
        if next.is_return() {
            code
        } else {
            Inst::Frame { ret: next, next: code }.link()
        }
    }

    /// An ordinary call: arguments, then the operator, then `apply`.
    fn application(
        &self,
        operator: &Data,
        args: &[Data],
        next: Rc<Inst>,
    ) -> Result<Rc<Inst>, Syntax> {
        let callee = self.walk(operator, Inst::Apply.link())?;
        let code = self.arguments(args, callee)?;
        Ok(self.frame(code, next))
    }

    /// A call to a primitive folds its arguments with one opcode,
    /// then returns like any other procedure would.
    fn primitive(
        &self,
        primitive: Primitive,
        args: &[Data],
        next: Rc<Inst>,
    ) -> Result<Rc<Inst>, Syntax> {
        let op = Inst::Primitive { primitive, next: Inst::Return.link() }.link();

        let code = if let Primitive::Begin = primitive {
            // operands run in source order, and only the last value is passed on
            match args.split_last() {
                Some((last, rest)) => {
                    let last = self.walk(last, Inst::Argument { next: op }.link())?;
                    self.sequence(rest, last)?
                },
                None => op,
            }
        } else {
            self.arguments(args, op)?
        };

        Ok(self.frame(code, next))
    }
}
