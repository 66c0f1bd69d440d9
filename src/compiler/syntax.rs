use std::fmt;
use crate::common::span::Span;

/// Represents a note attached to a Syntax error,
/// i.e. a location in source code with an optional
/// specific hint or tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub span: Span,
    pub hint: Option<String>,
}

impl Note {
    pub fn new(span: Span) -> Note {
        Note { span, hint: None }
    }

    pub fn new_with_hint(hint: &str, span: &Span) -> Note {
        Note { span: span.clone(), hint: Some(hint.to_string()) }
    }
}

/// Represents a static error found while lexing, reading, or compiling.
/// Errors found in source text point at it with `Note`s;
/// errors in forms that were already read have no location to point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub reason: String,
    pub notes:  Vec<Note>,
}

impl Syntax {
    /// Creates a new static error without a location.
    pub fn new(reason: &str) -> Syntax {
        Syntax { reason: reason.to_string(), notes: vec![] }
    }

    /// Creates a new static error pointing at a span of source.
    pub fn error(reason: &str, span: &Span) -> Syntax {
        Syntax::error_with_note(reason, Note::new(span.clone()))
    }

    /// Creates a new static error, but with an added hint.
    pub fn error_with_note(reason: &str, note: Note) -> Syntax {
        Syntax::new(reason).add_note(note)
    }

    pub fn add_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Syntax {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for note in self.notes.iter() {
            let formatted = note.span.format();

            match (&note.hint, formatted.carrots()) {
                (Some(hint), Some(carrots)) => {
                    let padding = " ".repeat(formatted.gutter_padding());
                    writeln!(f, "In {}:{}:{}", formatted.path, formatted.start + 1, formatted.start_col + 1)?;
                    writeln!(f, "{} |", padding)?;
                    writeln!(f, "{} | {}", formatted.start + 1, formatted.lines[0])?;
                    writeln!(f, "{} | {}{} note: {}",
                        padding,
                        " ".repeat(formatted.start_col),
                        "^".repeat(carrots),
                        hint,
                    )?;
                    writeln!(f, "{} |", padding)?;
                },
                (Some(hint), None) => {
                    write!(f, "{}", formatted)?;
                    writeln!(f, "note: {}", hint)?;
                },
                (None, _) => write!(f, "{}", formatted)?,
            }
        }
        write!(f, "Syntax Error: {}", self.reason)
    }
}

impl std::error::Error for Syntax {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;

    #[test]
    fn error() {
        // This is just a demo to check formatting
        let source = Source::source("(define x \"Hello, world\")");
        let error = Syntax::error(
            "Unexpected string",
            &Span::new(&source, 10, 14),
        );

        let target = "In ./source:1:11
  |
1 | (define x \"Hello, world\")
  |           ^^^^^^^^^^^^^^
Syntax Error: Unexpected string";

        let result = format!("{}", error);
        assert_eq!(result, target);
    }

    #[test]
    fn hint() {
        let source = Source::source("\"\\q\"");
        let error = Syntax::error_with_note(
            "Unknown escape code `\\q` in string literal",
            Note::new_with_hint("remove the backslash", &Span::new(&source, 1, 2)),
        );

        let target = "In ./source:1:2
  |
1 | \"\\q\"
  |  ^^ note: remove the backslash
  |
Syntax Error: Unknown escape code `\\q` in string literal";

        assert_eq!(format!("{}", error), target);
    }

    #[test]
    fn without_location() {
        let error = Syntax::new("IF expects two or three operands");
        assert_eq!(format!("{}", error), "Syntax Error: IF expects two or three operands");
    }
}
