use std::{rc::Rc, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{
    source::Source,
    span::{Span, Spanned},
};
use crate::compiler::{
    syntax::{Note, Syntax},
    token::{Token, Tokens},
};

/// The kinds of token, in the order they're tried.
#[derive(Debug, Clone, Copy)]
enum Kind {
    Comment,
    Open,
    Close,
    VectorOpen,
    Quote,
    Quasiquote,
    UnquoteSplicing,
    Unquote,
    String,
    Boolean,
    Number,
    Symbol,
}

/// Order matters: the first pattern that matches wins,
/// so `,@` has to be tried before `,`.
/// Booleans and numbers must be followed by a delimiter;
/// only the first group of those patterns is consumed.
static PATTERNS: Lazy<Vec<(Kind, Regex)>> = Lazy::new(|| {
    [
        (Kind::Comment,         r"^;[^\n]*"),
        (Kind::Open,            r"^\("),
        (Kind::Close,           r"^\)"),
        (Kind::VectorOpen,      r"^#\("),
        (Kind::Quote,           r"^'"),
        (Kind::Quasiquote,      r"^`"),
        (Kind::UnquoteSplicing, r"^,@"),
        (Kind::Unquote,         r"^,"),
        (Kind::String,          r#"^"((?s:[^"\\]|\\.)*)""#),
        (Kind::Boolean,         r"^(?i)(#[tf])(?:[\s()]|$)"),
        (Kind::Number,          r"^([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))(?:[\s()]|$)"),
        (Kind::Symbol,          r#"^[^()\[\]"\s]+"#),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid token pattern")))
    .collect()
});

#[derive(Debug)]
pub struct Lexer {
    source: Rc<Source>,
    index:  usize,
    tokens: Tokens,
}

impl Lexer {
    /// Lexes a source file into a flat stream of tokens.
    /// Comments are kept as tokens; the reader skips them.
    pub fn lex(source: Rc<Source>) -> Result<Tokens, Syntax> {
        let mut lexer = Lexer {
            source,
            index: 0,
            tokens: vec![],
        };

        lexer.strip();

        while lexer.index < lexer.source.contents.len() {
            let token = lexer.next_token()?;
            lexer.tokens.push(token);
            lexer.strip();
        }

        Ok(lexer.tokens)
    }

    /// Returns everything after the current index position.
    fn remaining(&self) -> &str {
        &self.source.contents[self.index..]
    }

    /// Skips leading whitespace.
    fn strip(&mut self) {
        let remaining = self.remaining();
        self.index += remaining.len() - remaining.trim_start().len();
    }

    /// Decodes the escapes in the body of a string literal.
    /// `offset` is the index of the body in the source.
    fn string(&self, body: &str, offset: usize) -> Result<Token, Syntax> {
        let mut string = String::new();
        let mut chars = body.char_indices();

        while let Some((_, c)) = chars.next() {
            if c != '\\' {
                string.push(c);
                continue;
            }

            // the pattern guarantees something follows a backslash
            let (at, escaped) = match chars.next() {
                Some(next) => next,
                None => break,
            };

            string.push(match escaped {
                '"'  => '"',
                '\\' => '\\',
                'n'  => '\n',
                'r'  => '\r',
                't'  => '\t',
                '0'  => '\0',
                o    => return Err(Syntax::error_with_note(
                    &format!("Unknown escape code `\\{}` in string literal", o),
                    Note::new_with_hint(
                        "To include a single backslash `\\`, escape it first: `\\\\`",
                        &Span::new(&self.source, offset + at - 1, 1 + o.len_utf8()),
                    ),
                )),
            });
        }

        Ok(Token::String(string))
    }

    /// Parses the next token.
    /// Expects all whitespace to be stripped.
    fn next_token(&mut self) -> Result<Spanned<Token>, Syntax> {
        let remaining = self.remaining();

        for (kind, pattern) in PATTERNS.iter() {
            let captures = match pattern.captures(remaining) {
                Some(c) => c,
                None => continue,
            };

            let whole = &captures[0];
            let (token, len) = match kind {
                Kind::Comment         => (Token::Comment(whole.to_string()), whole.len()),
                Kind::Open            => (Token::Open, 1),
                Kind::Close           => (Token::Close, 1),
                Kind::VectorOpen      => (Token::VectorOpen, 2),
                Kind::Quote           => (Token::Quote, 1),
                Kind::Quasiquote      => (Token::Quasiquote, 1),
                Kind::UnquoteSplicing => (Token::UnquoteSplicing, 2),
                Kind::Unquote         => (Token::Unquote, 1),
                Kind::String => {
                    (self.string(&captures[1], self.index + 1)?, whole.len())
                },
                Kind::Boolean => {
                    let literal = &captures[1];
                    (Token::Boolean(literal.eq_ignore_ascii_case("#t")), literal.len())
                },
                Kind::Number => {
                    let literal = &captures[1];
                    let number = f64::from_str(literal).map_err(|_| Syntax::error(
                        "Number literal does not fit in a 64-bit floating-point number",
                        &Span::new(&self.source, self.index, literal.len()),
                    ))?;
                    (Token::Number(number), literal.len())
                },
                Kind::Symbol => (Token::Symbol(whole.to_string()), whole.len()),
            };

            let spanned = Spanned::new(token, Span::new(&self.source, self.index, len));
            self.index += len;
            return Ok(spanned);
        }

        let error = match remaining.chars().next() {
            Some('"') => Syntax::error(
                "Unexpected end of source while parsing string literal",
                &Span::point(&self.source, self.source.contents.len()),
            ),
            c => Syntax::error(
                &format!("Cannot parse `{}`", c.map(String::from).unwrap_or_default()),
                &Span::new(&self.source, self.index, c.map(char::len_utf8).unwrap_or(0)),
            ),
        };

        Err(error)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn lex(source: &str) -> Result<Vec<Token>, Syntax> {
        Lexer::lex(Source::source(source))
            .map(|tokens| tokens.into_iter().map(|t| t.item).collect())
    }

    proptest! {
        #[test]
        fn doesnt_crash(s in "\\PC*") {
            let result = Lexer::lex(Source::source(&s));
            format!("{:?}", result);
        }

        #[test]
        fn integers(n in -100000i64..100000) {
            let result = lex(&n.to_string());
            prop_assert_eq!(result, Ok(vec![Token::Number(n as f64)]));
        }

        #[test]
        fn symbols(s in "[a-z!$%&*/:<=>?^_~][a-z0-9!$%&*/:<=>?^_~+.-]*") {
            let result = lex(&s);
            prop_assert_eq!(result, Ok(vec![Token::Symbol(s.clone())]));
        }
    }

    #[test]
    fn new_empty() {
        assert_eq!(lex(""), Ok(vec![]));
        assert_eq!(lex("  \n\t "), Ok(vec![]));
    }

    #[test]
    fn delimiters_and_sugar() {
        assert_eq!(lex("( ) #( ' ` ,@ ,"), Ok(vec![
            Token::Open,
            Token::Close,
            Token::VectorOpen,
            Token::Quote,
            Token::Quasiquote,
            Token::UnquoteSplicing,
            Token::Unquote,
        ]));
    }

    #[test]
    fn unquote_splicing_before_unquote() {
        assert_eq!(lex(",@x ,x"), Ok(vec![
            Token::UnquoteSplicing,
            Token::Symbol("x".to_string()),
            Token::Unquote,
            Token::Symbol("x".to_string()),
        ]));
    }

    #[test]
    fn booleans_need_a_delimiter() {
        assert_eq!(lex("#t #F"), Ok(vec![Token::Boolean(true), Token::Boolean(false)]));
        assert_eq!(lex("(#t)"), Ok(vec![Token::Open, Token::Boolean(true), Token::Close]));
        assert_eq!(lex("#true"), Ok(vec![Token::Symbol("#true".to_string())]));
    }

    #[test]
    fn numbers() {
        assert_eq!(lex("42 -7 +3 1.5 .25 2."), Ok(vec![
            Token::Number(42.0),
            Token::Number(-7.0),
            Token::Number(3.0),
            Token::Number(1.5),
            Token::Number(0.25),
            Token::Number(2.0),
        ]));
        // digits followed by anything else are a symbol
        assert_eq!(lex("1+"), Ok(vec![Token::Symbol("1+".to_string())]));
        assert_eq!(lex("-"), Ok(vec![Token::Symbol("-".to_string())]));
    }

    #[test]
    fn strings() {
        assert_eq!(
            lex(r#""hello" "say \"hi\"\n""#),
            Ok(vec![
                Token::String("hello".to_string()),
                Token::String("say \"hi\"\n".to_string()),
            ]),
        );
    }

    #[test]
    fn comments() {
        assert_eq!(lex("; hello\n42"), Ok(vec![
            Token::Comment("; hello".to_string()),
            Token::Number(42.0),
        ]));
    }

    #[test]
    fn unclosed_string() {
        assert!(lex("\"asdf\"\"qwerty").is_err());
    }

    #[test]
    fn unknown_escape() {
        assert!(lex(r#""\q""#).is_err());
    }

    #[test]
    fn cannot_parse() {
        let error = lex("(car [x])").unwrap_err();
        assert_eq!(error.reason, "Cannot parse `[`");
    }
}
