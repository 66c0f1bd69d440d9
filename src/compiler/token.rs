use std::fmt::Display;

use crate::common::span::Spanned;

pub type Tokens = Vec<Spanned<Token>>;

/// These are the different tokens the lexer will output.
/// Literal tokens carry their decoded value,
/// e.g. a boolean will be a `Token::Boolean(...)`, not just a string.
/// `Token`s can be spanned using `Spanned<Token>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Comment(String),

    // Delimiters
    Open,
    Close,
    VectorOpen,

    // Quotation sugar
    Quote,
    Quasiquote,
    UnquoteSplicing,
    Unquote,

    // Literals
    String(String),
    Boolean(bool),
    Number(f64),
    Symbol(String),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pretty formatting for tokens
        // just use debug if you're not printing a message or something.
        let message = match self {
            Token::Comment(_)      => "a comment",
            Token::Open            => "an opening paren",
            Token::Close           => "a closing paren",
            Token::VectorOpen      => "a vector literal `#(`",
            Token::Quote           => "a quote `'`",
            Token::Quasiquote      => "a quasiquote `` ` ``",
            Token::UnquoteSplicing => "an unquote-splicing `,@`",
            Token::Unquote         => "an unquote `,`",
            Token::String(_)       => "a string",
            Token::Boolean(_)      => "a boolean, like `#t` or `#f`",
            Token::Number(_)       => "a number",
            Token::Symbol(_)       => "a symbol",
        };
        write!(f, "{}", message)
    }
}
