use crate::common::data::Data;

/// A special form.
/// Operators are bound in the global environment like any other value,
/// but the compiler expands them from the raw, unevaluated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Define,
    Set,
    If,
    Lambda,
    Quote,
    Not,
    IsNull,
    CallCc,
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Define => "DEFINE",
            Operator::Set    => "SET!",
            Operator::If     => "IF",
            Operator::Lambda => "LAMBDA",
            Operator::Quote  => "QUOTE",
            Operator::Not    => "NOT",
            Operator::IsNull => "NULL?",
            Operator::CallCc => "CALL-WITH-CURRENT-CONTINUATION",
        }
    }
}

/// A primitive procedure.
/// Calls to one compile to the usual argument sequence
/// followed by a single opcode that folds the pending arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    Less,
    Greater,
    Modulo,
    Begin,
    Car,
    Cdr,
    Cons,
    List,
    Length,
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Add      => "+",
            Primitive::Subtract => "-",
            Primitive::Multiply => "*",
            Primitive::Divide   => "/",
            Primitive::Equal    => "=",
            Primitive::Less     => "<",
            Primitive::Greater  => ">",
            Primitive::Modulo   => "MODULO",
            Primitive::Begin    => "BEGIN",
            Primitive::Car      => "CAR",
            Primitive::Cdr      => "CDR",
            Primitive::Cons     => "CONS",
            Primitive::List     => "LIST",
            Primitive::Length   => "LENGTH",
        }
    }
}

/// Every built-in binding the global environment starts out with.
pub fn bindings() -> Vec<(&'static str, Data)> {
    let operators = [
        Operator::Define,
        Operator::Set,
        Operator::If,
        Operator::Lambda,
        Operator::Quote,
        Operator::Not,
        Operator::IsNull,
        Operator::CallCc,
    ];

    let primitives = [
        Primitive::Add,
        Primitive::Subtract,
        Primitive::Multiply,
        Primitive::Divide,
        Primitive::Equal,
        Primitive::Less,
        Primitive::Greater,
        Primitive::Modulo,
        Primitive::Begin,
        Primitive::Car,
        Primitive::Cdr,
        Primitive::Cons,
        Primitive::List,
        Primitive::Length,
    ];

    let mut bindings: Vec<_> = operators.iter()
        .map(|o| (o.name(), Data::Operator(*o)))
        .chain(primitives.iter().map(|p| (p.name(), Data::Function(*p))))
        .collect();

    bindings.push(("CALL/CC", Data::Operator(Operator::CallCc)));
    bindings
}
