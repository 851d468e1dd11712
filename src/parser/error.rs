use std::{error, fmt};

use bstr::ByteSlice;

use crate::graph::GraphError;

pub type GFAFieldResult<T> = Result<T, ParseFieldError>;
pub type GFAResult<T> = Result<T, ParseError>;

/// Which loading errors skip a record and which end the load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserTolerance {
    /// Only IO errors end the load
    IgnoreAll,
    /// Blank lines, unknown record types and links that would become
    /// containment edges are skipped
    Safe,
    /// Every error ends the load
    Pedantic,
}

impl Default for ParserTolerance {
    fn default() -> Self {
        ParserTolerance::Safe
    }
}

/// A single field of a record that couldn't be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFieldError {
    /// Numeric field with non-UTF-8 bytes
    Utf8Error,
    /// Numeric field that isn't a number, or overflows
    ParseFromStringError,
    /// Strand field other than `+` or `-`
    OrientationError,
    /// Field with the wrong shape, named by its GFA1 column
    InvalidField(&'static str),
    /// Record with fewer columns than its type requires
    MissingFields,
}

macro_rules! impl_many_from {
    ($to:ty, ($from:ty, $out:expr)) => (
        impl From<$from> for $to {
            fn from(_: $from) -> Self {
                $out
            }
        }
    );
    ($to:ty, ($from:ty, $out:expr), $(($f:ty, $o:expr)),* $(,)?) => (
        impl_many_from!($to, ($from, $out));
        impl_many_from!($to, $(($f, $o)),*);
    );
}

impl_many_from!(
    ParseFieldError,
    (std::str::Utf8Error, ParseFieldError::Utf8Error),
    (bstr::Utf8Error, ParseFieldError::Utf8Error),
    (
        std::num::ParseIntError,
        ParseFieldError::ParseFromStringError
    ),
);

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFieldError::Utf8Error => f.write_str("field is not UTF-8"),
            ParseFieldError::ParseFromStringError => {
                f.write_str("field is not a valid number")
            }
            ParseFieldError::OrientationError => {
                f.write_str("strand is neither `+` nor `-`")
            }
            ParseFieldError::InvalidField(column) => {
                write!(f, "malformed `{}` column", column)
            }
            ParseFieldError::MissingFields => f.write_str("too few columns"),
        }
    }
}

impl error::Error for ParseFieldError {}

/// Errors raised while loading GFA records into a string graph
#[derive(Debug)]
pub enum ParseError {
    /// Record type other than `H`, `S`, `L`, `C` or `P`
    UnknownLineType,
    /// Blank line
    EmptyLine,
    /// A column of the record couldn't be read; holds the record text
    InvalidLine(ParseFieldError, String),
    /// A link or containment names a segment that was never defined
    UnknownSegment(String),
    /// A link whose overlap covers an entire segment, loaded while
    /// containments are switched off. Holds both segment names.
    ContainedLink(String, String),
    /// The graph refused the record
    Graph(GraphError),
    IOError(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownLineType => f.write_str("unknown record type"),
            ParseError::EmptyLine => f.write_str("blank line"),
            ParseError::InvalidLine(err, line) => {
                write!(f, "{} in record `{}`", err, line)
            }
            ParseError::UnknownSegment(name) => {
                write!(f, "segment `{}` is not defined", name)
            }
            ParseError::ContainedLink(from, to) => write!(
                f,
                "link between `{}` and `{}` covers a whole segment",
                from, to
            ),
            ParseError::Graph(err) => write!(f, "rejected overlap: {}", err),
            ParseError::IOError(err) => write!(f, "read failed: {}", err),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::IOError(err)
    }
}

impl From<GraphError> for ParseError {
    fn from(err: GraphError) -> Self {
        ParseError::Graph(err)
    }
}

impl error::Error for ParseError {}

impl ParseError {
    pub(crate) fn invalid_line(error: ParseFieldError, line: &[u8]) -> Self {
        ParseError::InvalidLine(error, line.to_str_lossy().into_owned())
    }

    /// Whether the record that raised this error can be dropped and
    /// loading continued
    pub fn can_safely_continue(&self, tol: &ParserTolerance) -> bool {
        match tol {
            ParserTolerance::IgnoreAll => {
                !matches!(self, ParseError::IOError(_))
            }
            ParserTolerance::Safe => matches!(
                self,
                ParseError::EmptyLine
                    | ParseError::UnknownLineType
                    | ParseError::ContainedLink(..)
            ),
            ParserTolerance::Pedantic => false,
        }
    }
}
