use crate::common::{
    data::Data,
    span::{Span, Spanned},
};
use crate::compiler::{
    syntax::Syntax,
    token::{Token, Tokens},
};

/// Turns a flat stream of tokens into forms, left to right.
pub struct Reader {
    tokens: Tokens,
    index: usize,
}

impl Reader {
    /// Reads every top-level form.
    pub fn read(tokens: Tokens) -> Result<Vec<Data>, Syntax> {
        Reader::read_limit(tokens, None)
    }

    /// Reads at most `limit` top-level forms, ignoring anything after.
    pub fn read_limit(tokens: Tokens, limit: Option<usize>) -> Result<Vec<Data>, Syntax> {
        let mut reader = Reader { tokens, index: 0 };
        reader.forms(limit, None)
    }

    /// Returns the next token that isn't a comment, advancing past it.
    fn next_token(&mut self) -> Option<Spanned<Token>> {
        let token = self.peek_token()?;
        self.index += 1;
        Some(token)
    }

    /// Returns the next token that isn't a comment, without consuming it.
    fn peek_token(&mut self) -> Option<Spanned<Token>> {
        while let Some(token) = self.tokens.get(self.index) {
            if let Token::Comment(_) = token.item {
                self.index += 1;
                continue;
            }
            // We can clone here because it's not that expensive
            return Some(token.clone());
        }
        None
    }

    /// Reads forms until `limit` is reached or the tokens run out.
    /// Inside a list, `opening` is the span of its opening paren,
    /// and the matching close paren is consumed to end the list.
    fn forms(
        &mut self,
        limit: Option<usize>,
        opening: Option<&Span>,
    ) -> Result<Vec<Data>, Syntax> {
        let mut forms = vec![];

        while limit.map_or(true, |l| forms.len() < l) {
            let token = match self.next_token() {
                Some(t) => t,
                None => match opening {
                    Some(span) => return Err(Syntax::error("Unclosed `(`", span)),
                    None => break,
                },
            };

            if let Token::Close = token.item {
                if opening.is_some() { break; }
                return Err(Syntax::error(
                    "Closing `)` does not have an opening `(`",
                    &token.span,
                ));
            }

            forms.push(self.form(token)?);
        }

        Ok(forms)
    }

    /// Reads a single form starting with `token`.
    fn form(&mut self, token: Spanned<Token>) -> Result<Data, Syntax> {
        let form = match token.item {
            Token::Symbol(name) => Data::symbol(&name),
            Token::Boolean(b)   => Data::Boolean(b),
            Token::Number(n)    => Data::Real(n),
            Token::String(s)    => Data::string(&s),
            Token::Open         => self.list(&token.span)?,
            Token::Quote        => self.quote(&token.span)?,
            other => return Err(Syntax::error(
                &format!("Cannot parse {}", other),
                &token.span,
            )),
        };

        Ok(form)
    }

    /// `'x` is sugar for `(quote x)`.
    fn quote(&mut self, span: &Span) -> Result<Data, Syntax> {
        match self.peek_token() {
            None | Some(Spanned { item: Token::Close, .. }) => {
                return Err(Syntax::error("Expected a form after quote", span));
            },
            Some(_) => (),
        }

        let quoted = Reader::single(self.forms(Some(1), None)?, span)?;
        Ok(Data::list(vec![Data::symbol("quote"), quoted]))
    }

    /// Reads the rest of a list whose opening paren has been consumed.
    /// A lone `.` before the last item makes the list dotted.
    fn list(&mut self, opening: &Span) -> Result<Data, Syntax> {
        let mut items = self.forms(None, Some(opening))?;
        let dot = Data::symbol(".");

        match items.iter().position(|item| item == &dot) {
            None => Ok(Data::list(items)),
            Some(at) if at > 0 && at + 2 == items.len() => {
                let tail = items.pop().unwrap_or(Data::Nil);
                items.pop();
                Ok(Data::improper(items, tail))
            },
            Some(_) => Err(Syntax::error(
                "A `.` in a list must sit between the last two items",
                opening,
            )),
        }
    }

    fn single(mut forms: Vec<Data>, span: &Span) -> Result<Data, Syntax> {
        match forms.pop() {
            Some(form) if forms.is_empty() => Ok(form),
            _ => Err(Syntax::error("Expected exactly one form", span)),
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use proptest_derive::Arbitrary;

    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::Lexer;

    fn read(source: &str) -> Result<Vec<Data>, Syntax> {
        Reader::read(Lexer::lex(Source::source(source))?)
    }

    fn number(n: f64) -> Data { Data::Real(n) }

    /// An atom the printer and reader should agree on.
    #[derive(Debug, Clone, Arbitrary)]
    enum Atom {
        Number(#[proptest(strategy = "-1.0e9..1.0e9f64")] f64),
        Integer(#[proptest(strategy = "-100000i64..100000")] i64),
        String(#[proptest(regex = "[a-zA-Z0-9 _!?\"\\\\-]*")] String),
        Boolean(bool),
        Symbol(#[proptest(regex = "[a-z][a-z0-9?!*-]{0,8}")] String),
    }

    impl Atom {
        fn to_data(&self) -> Data {
            match self {
                Atom::Number(n)  => Data::Real(*n),
                Atom::Integer(n) => Data::Real(*n as f64),
                Atom::String(s)  => Data::string(s),
                Atom::Boolean(b) => Data::Boolean(*b),
                Atom::Symbol(s)  => Data::symbol(s),
            }
        }
    }

    /// Atoms, nested into proper and dotted lists.
    fn literal() -> impl Strategy<Value = Data> {
        any::<Atom>()
            .prop_map(|atom| atom.to_data())
            .prop_recursive(4, 32, 6, |inner| prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Data::list),
                (prop::collection::vec(inner.clone(), 1..4), inner)
                    .prop_map(|(items, tail)| Data::improper(items, tail)),
            ])
    }

    proptest! {
        #[test]
        fn round_trip(form in literal()) {
            let printed = format!("{}", form);
            let forms = read(&printed);
            prop_assert_eq!(forms, Ok(vec![form]));
        }
    }

    #[test]
    fn atoms() {
        assert_eq!(read("x 42 \"hi\" #f"), Ok(vec![
            Data::symbol("X"),
            number(42.0),
            Data::string("hi"),
            Data::Boolean(false),
        ]));
    }

    #[test]
    fn nested_lists() {
        assert_eq!(read("(a (b c) ())"), Ok(vec![Data::list(vec![
            Data::symbol("a"),
            Data::list(vec![Data::symbol("b"), Data::symbol("c")]),
            Data::Nil,
        ])]));
    }

    #[test]
    fn quote_sugar() {
        assert_eq!(read("'(1 2) 'x"), Ok(vec![
            Data::list(vec![
                Data::symbol("quote"),
                Data::list(vec![number(1.0), number(2.0)]),
            ]),
            Data::list(vec![Data::symbol("quote"), Data::symbol("x")]),
        ]));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            read("; leading\n(+ 1 ; inside\n 2)"),
            read("(+ 1 2)"),
        );
    }

    #[test]
    fn dotted() {
        assert_eq!(read("(1 . 2)"), Ok(vec![Data::cons(number(1.0), number(2.0))]));
        assert_eq!(
            read("(1 2 . 3)"),
            Ok(vec![Data::improper(vec![number(1.0), number(2.0)], number(3.0))]),
        );
        assert!(read("(. 2)").is_err());
        assert!(read("(1 . 2 3)").is_err());
    }

    #[test]
    fn limit() {
        let tokens = Lexer::lex(Source::source("1 2 3")).unwrap();
        assert_eq!(Reader::read_limit(tokens, Some(2)), Ok(vec![number(1.0), number(2.0)]));
    }

    #[test]
    fn unbalanced() {
        assert!(read("(1 2").is_err());
        assert!(read("1 2)").is_err());
        assert!(read("(()").is_err());
        assert!(read("'").is_err());
        assert!(read("(')").is_err());
    }

    #[test]
    fn unsupported_sugar() {
        assert!(read("`(a ,b)").is_err());
        assert!(read("#(1 2)").is_err());
    }
}
