use std::{mem, rc::Rc};

use log::{debug, trace};

use crate::{
    common::{
        closure::Closure,
        data::Data,
        env::Env,
        opcode::Inst,
        primitive::{self, Operator, Primitive},
        Source,
    },
    compiler::{self, syntax::Syntax},
    error::Error,
    vm::{
        config::Config,
        prelude::PRELUDE,
        stack::{Frame, Stack},
        trace::{Kind, Trace},
    },
};

/// The formal a continuation closure binds its argument to.
const RESUME: &str = "V";

/// A snapshot of every register, see `VM::save_state`.
#[derive(Clone)]
pub struct State {
    acc: Data,
    next: Rc<Inst>,
    env: Env,
    args: Vec<Data>,
    stack: Stack,
}

/// A `VM` walks instruction graphs.
/// Each VM's state is self-contained,
/// so more than one can be spawned if needed.
///
/// There are five registers:
/// the accumulator (`acc`), the next instruction (`next`),
/// the current environment (`env`), the pending arguments (`args`),
/// and the call stack (`stack`).
/// The call stack is a chain of immutable frames,
/// so capturing it for a continuation is a single reference count bump.
pub struct VM {
    acc: Data,
    next: Rc<Inst>,
    env: Env,
    args: Vec<Data>,
    stack: Stack,

    global: Env,
    ret: Rc<Inst>,
    config: Config,
    peak: usize,
}

// this impl contains initialization and the public entry points;
// the next impl contains the core interpreter loop and opcode implementations.
impl VM {
    /// Initialize a new VM with the default configuration,
    /// i.e. with the primitives bound and the prelude evaluated.
    pub fn init() -> Result<VM, Error> {
        VM::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<VM, Error> {
        let global = Env::global();
        for (name, data) in primitive::bindings() {
            global.define(name.into(), data);
        }

        let ret = Inst::Return.link();
        let mut vm = VM {
            acc: Data::Nil,
            next: Inst::Finish.link(),
            env: global.clone(),
            args: vec![],
            stack: None,

            global,
            ret,
            config,
            peak: 0,
        };

        if vm.config.prelude {
            debug!("bootstrapping {} prelude definitions", PRELUDE.len());
            for source in PRELUDE {
                vm.run(source)?;
            }
        }

        Ok(vm)
    }

    /// The outermost environment, where primitives and top-level definitions live.
    pub fn global(&self) -> &Env {
        &self.global
    }

    /// The number of frames currently on the call stack.
    pub fn depth(&self) -> usize {
        Frame::depth(&self.stack)
    }

    /// The deepest the call stack got during the last evaluation.
    pub fn peak_depth(&self) -> usize {
        self.peak
    }

    pub fn read(&self, text: &str) -> Result<Vec<Data>, Syntax> {
        compiler::read(Source::source(text))
    }

    /// Compiles a form against the current environment.
    pub fn compile(&self, form: &Data, next: Rc<Inst>) -> Result<Rc<Inst>, Syntax> {
        compiler::compile(form, next, &self.env)
    }

    /// Compiles and executes a single form, returning its value.
    /// If anything goes wrong at runtime, the registers are reset
    /// so the next evaluation starts from a clean slate.
    pub fn eval(&mut self, form: &Data) -> Result<Data, Error> {
        debug!("evaluating {}", form);
        let code = self.compile(form, Inst::Finish.link())?;

        self.peak = self.depth();
        match self.exec(code) {
            Ok(data) => Ok(data),
            Err(trace) => {
                debug!("{}", trace);
                self.reset();
                Err(trace.into())
            },
        }
    }

    /// Reads and evaluates every form in `text`, in order.
    /// Stops at the first error.
    pub fn run(&mut self, text: &str) -> Result<(), Error> {
        for form in self.read(text)? {
            self.eval(&form)?;
        }
        Ok(())
    }

    /// Runs an instruction graph until it reaches `finish`.
    pub fn exec(&mut self, code: Rc<Inst>) -> Result<Data, Trace> {
        self.next = code;

        loop {
            if let Some(data) = self.step()? {
                return Ok(data);
            }
        }
    }

    pub fn save_state(&self) -> State {
        State {
            acc: self.acc.clone(),
            next: Rc::clone(&self.next),
            env: self.env.clone(),
            args: self.args.clone(),
            stack: self.stack.clone(),
        }
    }

    pub fn restore_state(&mut self, state: State) {
        self.acc = state.acc;
        self.next = state.next;
        self.env = state.env;
        self.args = state.args;
        self.stack = state.stack;
    }

    fn reset(&mut self) {
        self.env = self.global.clone();
        self.args.clear();
        self.stack = None;
        self.next = Inst::Finish.link();
    }
}

impl VM {
    fn goto(&mut self, next: &Rc<Inst>) {
        self.next = Rc::clone(next);
    }

    /// Executes a single instruction.
    /// Returns the accumulator once a `finish` is reached.
    fn step(&mut self) -> Result<Option<Data>, Trace> {
        let inst = Rc::clone(&self.next);
        trace!("{:?}", inst);

        match &*inst {
            Inst::Constant { data, next } => {
                self.acc = data.clone();
                self.goto(next);
            },
            Inst::Lookup { name, next } => self.lookup(name, next)?,
            Inst::Define { name, next } => {
                self.env.define(Rc::clone(name), self.acc.clone());
                self.goto(next);
            },
            Inst::Set { name, next } => {
                self.env.set(name, self.acc.clone())?;
                self.goto(next);
            },
            Inst::Test { consequent, alternative } => {
                if self.acc.is_true() {
                    self.goto(consequent);
                } else {
                    self.goto(alternative);
                }
            },
            Inst::Closure { formals, body, next } => {
                let closure = Closure::new(self.env.clone(), Rc::clone(formals), Rc::clone(body));
                self.acc = Data::Closure(Rc::new(closure));
                self.goto(next);
            },
            Inst::Conti { next } => {
                self.acc = self.continuation();
                self.goto(next);
            },
            Inst::Argument { next } => {
                self.args.push(self.acc.clone());
                self.goto(next);
            },
            Inst::Frame { ret, next } => {
                self.frame(Rc::clone(ret));
                self.goto(next);
            },
            Inst::Apply => self.apply()?,
            Inst::Return => self.unwind()?,
            Inst::Nuate { stack, name } => {
                self.acc = self.env.lookup(name)?;
                self.stack = stack.clone();
                self.next = Rc::clone(&self.ret);
            },
            Inst::Not { next } => {
                self.acc = Data::Boolean(!self.acc.is_true());
                self.goto(next);
            },
            Inst::IsNull { next } => {
                self.acc = Data::Boolean(self.acc.is_nil());
                self.goto(next);
            },
            Inst::Primitive { primitive, next } => {
                self.acc = self.primitive(*primitive)?;
                self.goto(next);
            },
            Inst::Finish => {
                if let Some(name) = &self.config.result_binding {
                    self.global.define(name.to_uppercase().into(), self.acc.clone());
                }
                return Ok(Some(self.acc.clone()));
            },
        }

        Ok(None)
    }

    /// Loads a variable.
    /// A primitive procedure about to be applied is run on the spot,
    /// as if the call had been compiled as a primitive call.
    fn lookup(&mut self, name: &str, next: &Rc<Inst>) -> Result<(), Trace> {
        self.acc = self.env.lookup(name)?;

        let substitute = match (&self.acc, &**next) {
            (Data::Function(primitive), Inst::Apply) => Some(*primitive),
            _ => None,
        };

        match substitute {
            Some(primitive) => {
                self.acc = self.primitive(primitive)?;
                self.next = Rc::clone(&self.ret);
            },
            None => self.goto(next),
        }

        Ok(())
    }

    /// Wraps the current call stack in a one-argument closure.
    fn continuation(&self) -> Data {
        let name: Rc<str> = RESUME.into();
        let body = Inst::Nuate { stack: self.stack.clone(), name: Rc::clone(&name) }.link();
        let formals: Rc<[Rc<str>]> = Rc::new([name]);
        Data::Closure(Rc::new(Closure::new(self.env.clone(), formals, body)))
    }

    /// Saves the caller's environment and pending arguments.
    /// The callee starts with no pending arguments of its own.
    fn frame(&mut self, ret: Rc<Inst>) {
        let args = mem::take(&mut self.args);
        self.stack = Some(Frame::push(self.stack.take(), ret, self.env.clone(), args));
        self.peak = self.peak.max(self.depth());
    }

    /// Restores the caller saved by the top frame.
    fn unwind(&mut self) -> Result<(), Trace> {
        let frame = self.stack.take().ok_or_else(|| Trace::error(
            Kind::Instruction,
            "Can not return with an empty call stack",
        ))?;

        let (ret, env, args, parent) = Frame::pop(frame);
        self.next = ret;
        self.env = env;
        self.args = args;
        self.stack = parent;
        Ok(())
    }

    /// Calls the procedure in the accumulator.
    fn apply(&mut self) -> Result<(), Trace> {
        match self.acc.clone() {
            Data::Closure(closure) => {
                let formals = &closure.formals;
                if self.args.len() != formals.len() {
                    return Err(Trace::arity(
                        &format!("{}", closure),
                        &formals.len().to_string(),
                        self.args.len(),
                    ));
                }

                // the first argument is on top
                let env = closure.env.extend();
                for formal in formals.iter() {
                    if let Some(arg) = self.args.pop() {
                        env.define(Rc::clone(formal), arg);
                    }
                }

                self.env = env;
                self.next = Rc::clone(&closure.body);
            },
            Data::Function(primitive) => {
                self.acc = self.primitive(primitive)?;
                self.next = Rc::clone(&self.ret);
            },
            // the two predicates among the special forms also work as procedures
            Data::Operator(operator @ (Operator::Not | Operator::IsNull)) => {
                let operand = match <[Data; 1]>::try_from(self.operands()) {
                    Ok([operand]) => operand,
                    Err(operands) => {
                        return Err(Trace::arity(operator.name(), "1", operands.len()));
                    },
                };
                self.acc = match operator {
                    Operator::Not => Data::Boolean(!operand.is_true()),
                    _             => Data::Boolean(operand.is_nil()),
                };
                self.next = Rc::clone(&self.ret);
            },
            other => return Err(Trace::type_error("a procedure", &other)),
        }

        Ok(())
    }

    /// Pops every pending argument, first argument first.
    fn operands(&mut self) -> Vec<Data> {
        let mut operands = mem::take(&mut self.args);
        operands.reverse();
        operands
    }

    fn numbers(operands: &[Data]) -> Result<Vec<f64>, Trace> {
        operands.iter().map(|operand| match operand {
            Data::Real(n) => Ok(*n),
            other => Err(Trace::type_error("a number", other)),
        }).collect()
    }

    /// Folds the pending arguments, seeded with the first one.
    /// A lone argument gets `unary` applied to it instead.
    fn fold(
        primitive: Primitive,
        operands: &[Data],
        unary: impl Fn(f64) -> f64,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<Data, Trace> {
        let numbers = VM::numbers(operands)?;
        let result = match numbers.split_first() {
            None => return Err(Trace::arity(primitive.name(), "at least 1", 0)),
            Some((seed, [])) => unary(*seed),
            Some((seed, rest)) => rest.iter().fold(*seed, |acc, n| op(acc, *n)),
        };
        Ok(Data::Real(result))
    }

    /// Checks that every neighbouring pair of arguments is in order.
    fn chain(
        primitive: Primitive,
        operands: &[Data],
        op: impl Fn(f64, f64) -> bool,
    ) -> Result<Data, Trace> {
        let numbers = VM::numbers(operands)?;
        if numbers.is_empty() {
            return Err(Trace::arity(primitive.name(), "at least 1", 0));
        }
        Ok(Data::Boolean(numbers.windows(2).all(|pair| op(pair[0], pair[1]))))
    }

    fn single(primitive: Primitive, operands: Vec<Data>) -> Result<Data, Trace> {
        match <[Data; 1]>::try_from(operands) {
            Ok([operand]) => Ok(operand),
            Err(operands) => Err(Trace::arity(primitive.name(), "1", operands.len())),
        }
    }

    fn primitive(&mut self, primitive: Primitive) -> Result<Data, Trace> {
        let operands = self.operands();

        match primitive {
            Primitive::Add      => Ok(Data::Real(VM::numbers(&operands)?.into_iter().fold(0.0, |a, b| a + b))),
            Primitive::Multiply => Ok(Data::Real(VM::numbers(&operands)?.into_iter().fold(1.0, |a, b| a * b))),
            Primitive::Subtract => VM::fold(primitive, &operands, |n| -n, |a, b| a - b),
            Primitive::Divide   => VM::fold(primitive, &operands, |n| 1.0 / n, |a, b| a / b),
            Primitive::Modulo   => VM::fold(primitive, &operands, |n| n, |a, b| {
                let r = a % b;
                if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
            }),

            Primitive::Equal   => VM::chain(primitive, &operands, |a, b| a == b),
            Primitive::Less    => VM::chain(primitive, &operands, |a, b| a < b),
            Primitive::Greater => VM::chain(primitive, &operands, |a, b| a > b),

            Primitive::Begin => Ok(operands.into_iter().last().unwrap_or(Data::Nil)),

            Primitive::Car => match VM::single(primitive, operands)? {
                Data::Pair(pair) => Ok(pair.car.clone()),
                other => Err(Trace::type_error("a pair", &other)),
            },
            Primitive::Cdr => match VM::single(primitive, operands)? {
                Data::Pair(pair) => Ok(pair.cdr.clone()),
                other => Err(Trace::type_error("a pair", &other)),
            },
            Primitive::Length => {
                let list = VM::single(primitive, operands)?;
                let length = match &list {
                    Data::Nil => Some(0),
                    Data::Pair(pair) => pair.length(),
                    _ => None,
                };
                length
                    .map(|n| Data::Real(n as f64))
                    .ok_or_else(|| Trace::type_error("a proper list", &list))
            },
            Primitive::Cons => match <[Data; 2]>::try_from(operands) {
                Ok([car, cdr]) => Ok(Data::cons(car, cdr)),
                Err(operands) => Err(Trace::arity(primitive.name(), "2", operands.len())),
            },
            Primitive::List => Ok(Data::list(operands)),
        }
    }
}
