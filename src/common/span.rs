use std::{
    fmt::{self, Debug, Display, Formatter},
    rc::Rc,
};

use crate::common::source::Source;

/// A `Span` refers to a section of a source,
/// much like a `&str`, but with a reference to a `Source` rather than a `String`.
/// Forms themselves carry no spans; spans only live on tokens
/// and are used when reporting lexical and parse errors.
#[derive(Clone, Eq, PartialEq)]
pub struct Span {
    source: Rc<Source>,
    offset: usize,
    length: usize,
}

impl Span {
    /// Create a new `Span` from an offset with a length.
    pub fn new(source: &Rc<Source>, offset: usize, length: usize) -> Span {
        Span {
            source: Rc::clone(source),
            offset,
            length,
        }
    }

    /// A `Span` that points at a specific point in the source.
    /// Has a length of `0`.
    pub fn point(source: &Rc<Source>, offset: usize) -> Span {
        Span::new(source, offset, 0)
    }

    /// Return the index of the end of the `Span`.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Returns the contents of a `Span`.
    /// This indexes into the source,
    /// so a `Span` along an invalid byte boundary will panic.
    pub fn contents(&self) -> String {
        self.source.contents[self.offset..self.end()].to_string()
    }

    /// The full lines of source this span touches.
    pub fn lines(&self) -> Vec<String> {
        let lines: Vec<_> = self.source.contents.split('\n').collect();
        let start_line = self.line(self.offset);
        let end_line = self.line(self.end());
        lines[start_line..=end_line]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn path(&self) -> String {
        self.source.path.to_string_lossy().to_string()
    }

    /// Zero-indexed line of a byte offset.
    pub fn line(&self, index: usize) -> usize {
        let lines = self.source.contents[..index].split_inclusive('\n').count();
        // an offset right after a newline starts the next line
        if self.source.contents[..index].ends_with('\n') {
            lines
        } else {
            lines.saturating_sub(1)
        }
    }

    /// Zero-indexed column (in chars) of a byte offset.
    pub fn col(&self, index: usize) -> usize {
        let before = &self.source.contents[..index];
        match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count(),
            None => before.chars().count(),
        }
    }

    pub fn format(&self) -> FormattedSpan {
        FormattedSpan {
            path: self.path(),
            start: self.line(self.offset),
            lines: self.lines(),
            start_col: self.col(self.offset),
            end_col: self.col(self.end()),
        }
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Span")
            .field("contents", &self.contents())
            .field("start", &self.offset)
            .field("end", &self.end())
            .finish()
    }
}

impl Display for Span {
    /// Given a `Span`, `fmt` will print out where the `Span` occurs in its source:
    /// ```plain
    /// In ./source:1:5
    ///   |
    /// 1 | (car "hello)
    ///   |      ^
    /// ```
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Represents a formatted span, ready to be displayed.
pub struct FormattedSpan {
    pub path: String,
    pub start: usize,
    pub lines: Vec<String>,
    pub start_col: usize,
    pub end_col: usize,
}

impl FormattedSpan {
    pub fn is_multiline(&self) -> bool {
        self.lines.len() != 1
    }

    pub fn gutter_padding(&self) -> usize {
        (self.start + self.lines.len()).to_string().len()
    }

    /// If a single line span, returns the number of carrots between cols.
    pub fn carrots(&self) -> Option<usize> {
        if self.is_multiline() {
            None
        } else {
            Some(self.end_col.saturating_sub(self.start_col).max(1))
        }
    }
}

impl Display for FormattedSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let padding = " ".repeat(self.gutter_padding());
        writeln!(f, "In {}:{}:{}", self.path, self.start + 1, self.start_col + 1)?;
        writeln!(f, "{} |", padding)?;

        match self.carrots() {
            Some(carrots) => {
                writeln!(f, "{} | {}", self.start + 1, self.lines[0])?;
                writeln!(f, "{} | {}{}", padding, " ".repeat(self.start_col), "^".repeat(carrots))?;
            },
            None => for (index, line) in self.lines.iter().enumerate() {
                let line_no = (self.start + index + 1).to_string();
                let pad = " ".repeat(self.gutter_padding() - line_no.len());
                writeln!(f, "{}{} > {}", line_no, pad, line)?;
            },
        }

        Ok(())
    }
}

/// A wrapper for spanning types, such as a `Token`,
/// to indicate where it was lexed from (a `Spanned<Token>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub item: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(item: T, span: Span) -> Spanned<T> {
        Spanned { item, span }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn contents() {
        let source = Source::source("(define x 'awesome)");
        let span = Span::new(&source, 8, 1);
        assert_eq!(span.contents(), "x");
    }

    #[test]
    fn lines_and_columns() {
        let source = Source::source("(define x 1)\n(car x)");
        let span = Span::new(&source, 18, 1);
        assert_eq!(span.line(18), 1);
        assert_eq!(span.col(18), 5);
        assert_eq!(span.lines(), vec!["(car x)".to_string()]);
    }

    #[test]
    fn formatting() {
        let source = Source::source("(car \"hello)");
        let span = Span::point(&source, 5);
        let target = "\
In ./source:1:6
  |
1 | (car \"hello)
  |      ^
";
        assert_eq!(format!("{}", span), target);
    }

    #[test]
    fn empty() {
        let source = Source::source("");
        let span = Span::point(&source, 0);
        format!("{}", span);
    }
}
