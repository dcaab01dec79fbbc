use std::fmt::{self, Display, Formatter};

use ariadne::{Config, Label, Report, ReportKind, Source};
use yansi::Color;

use crate::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Name,
    Type,
    DivisionByZero,
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "Lex Error"),
            ErrorKind::Parse => write!(f, "Parse Error"),
            ErrorKind::Name => write!(f, "Name Error"),
            ErrorKind::Type => write!(f, "Type Error"),
            ErrorKind::DivisionByZero => write!(f, "Division By Zero"),
            ErrorKind::Io => write!(f, "IO Error"),
        }
    }
}

/// Any failure of a mini-lang run. Every error aborts the run.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{kind} at {}:{}: {message}", span.line, span.column)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn new<M: ToString>(kind: ErrorKind, span: Span, message: M) -> Self {
        Self {
            kind,
            span,
            message: message.to_string(),
        }
    }

    pub fn lex<M: ToString>(span: Span, message: M) -> Self {
        Self::new(ErrorKind::Lex, span, message)
    }

    pub fn parse<M: ToString>(span: Span, message: M) -> Self {
        Self::new(ErrorKind::Parse, span, message)
    }

    pub fn name<M: ToString>(span: Span, message: M) -> Self {
        Self::new(ErrorKind::Name, span, message)
    }

    pub fn type_error<M: ToString>(span: Span, message: M) -> Self {
        Self::new(ErrorKind::Type, span, message)
    }

    pub fn division_by_zero(span: Span) -> Self {
        Self::new(ErrorKind::DivisionByZero, span, "attempted to divide by zero")
    }

    pub fn io<M: ToString>(span: Span, message: M) -> Self {
        Self::new(ErrorKind::Io, span, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `last` is the char offset of the last visible source character. Spans
    /// past it (errors at end of input) are drawn on that character, since
    /// ariadne drops labels that fall outside the source.
    fn build_report(&self, colored: bool, last: Option<usize>) -> Report<'static> {
        let start = last.map_or(0, |last| self.span.start.min(last));
        let report = Report::build(ReportKind::Error, (), start)
            .with_config(Config::default().with_color(colored))
            .with_message(self.kind.to_string());

        match last {
            Some(last) => {
                let end = self.span.end.min(last + 1).max(start + 1);
                report.with_label(
                    Label::new(start..end)
                        .with_message(&self.message)
                        .with_color(Color::Red),
                )
            }
            None => report.with_note(&self.message),
        }
        .finish()
    }
}

/// Renders errors as annotated source snippets.
pub struct ErrorPrinter {
    source: Source,
    last: Option<usize>,
    colored: bool,
}

impl ErrorPrinter {
    pub fn new(input: &str) -> Self {
        Self {
            source: Source::from(input),
            last: input.trim_end().chars().count().checked_sub(1),
            colored: true,
        }
    }

    pub fn plain(input: &str) -> Self {
        Self {
            colored: false,
            ..Self::new(input)
        }
    }

    pub fn eprint(&mut self, error: &Error) -> std::io::Result<()> {
        error
            .build_report(self.colored, self.last)
            .eprint(&mut self.source)
    }

    pub fn format(&mut self, error: &Error) -> std::io::Result<String> {
        let mut buffer = Vec::new();
        error
            .build_report(self.colored, self.last)
            .write(&mut self.source, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
