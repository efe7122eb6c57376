//! Purpose: Crate-wide error model shared by decode, bind, encode, and bench paths.
//! Exports: `Error`, `ErrorKind`, `Constraint`, `to_exit_code`.
//! Role: One error type with optional context fields set through a builder.
//! Invariants: Every failure carries exactly one `ErrorKind`.
//! Invariants: Validation errors carry a `Constraint` and the offending field path.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    EmptyInput,
    Decode,
    Validation,
    Io,
}

/// Schema constraint violated by a well-formed document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Constraint {
    MissingField,
    ExtraFieldForbidden,
    WrongType,
    LiteralMismatch,
    /// Integer below its lower bound (`>= 1` for positions, `>= 0` for counts).
    NotPositive,
}

impl Constraint {
    pub fn as_str(self) -> &'static str {
        match self {
            Constraint::MissingField => "missing_field",
            Constraint::ExtraFieldForbidden => "extra_field_forbidden",
            Constraint::WrongType => "wrong_type",
            Constraint::LiteralMismatch => "literal_mismatch",
            Constraint::NotPositive => "not_positive",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    field: Option<String>,
    constraint: Option<Constraint>,
    offset: Option<u64>,
    position: Option<(usize, usize)>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            field: None,
            constraint: None,
            offset: None,
            position: None,
            source: None,
        }
    }

    /// Validation failure at `field` (a `results[0].files[1]`-style path).
    pub fn validation(constraint: Constraint, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation)
            .with_constraint(constraint)
            .with_field(field)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn constraint(&self) -> Option<Constraint> {
        self.constraint
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// 1-based line and column of a decode failure, when the decoder reports one.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.position
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.position = Some((line, column));
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(constraint) = self.constraint {
            write!(f, " [{constraint}]")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " (offset: {offset})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::EmptyInput => 2,
        ErrorKind::Decode => 3,
        ErrorKind::Validation => 4,
        ErrorKind::Io => 5,
    }
}
