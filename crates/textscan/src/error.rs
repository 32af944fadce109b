use alloc::string::String;

use thiserror::Error;

use crate::position::Position;

/// Errors raised while scanning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A savepoint was loaded or forgotten without being saved first.
    #[error("unknown savepoint '{0}'")]
    UnknownSavepoint(String),
    /// An entry declared with [`CheckMode::Expect`](crate::CheckMode::Expect)
    /// did not match.
    #[error("query entry #{entry} did not match at {position}")]
    UnexpectedQueryResult {
        /// Zero-based index of the failing entry within its query.
        entry: usize,
        /// Where the failing entry started scanning.
        position: Position,
    },
    /// The underlying character source failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    /// A query bound to the scanner was declared incorrectly.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryBuildError),
}

/// A failure reported by a [`CharSource`](crate::CharSource).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    /// Creates a source error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        use alloc::string::ToString;

        Self::new(err.to_string())
    }
}

/// Which part of a query entry a builder call configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAspect {
    /// `take`, `take_rest`, `take_line`.
    Scope,
    /// `take_while`, `take_chartable`, `take_string`.
    Filter,
    /// `check_*`.
    Check,
}

impl core::fmt::Display for EntryAspect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Scope => "scope",
            Self::Filter => "filter",
            Self::Check => "result check",
        })
    }
}

/// Misuse of the query builder.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryBuildError {
    /// The same aspect of an entry was configured twice.
    #[error("'{method}' would overwrite the {aspect} already set on query entry #{entry}")]
    AspectAlreadySet {
        /// Zero-based index of the entry under construction.
        entry: usize,
        /// The aspect that was already set.
        aspect: EntryAspect,
        /// The builder method that attempted to set it again.
        method: &'static str,
    },
    /// An entry was closed without any configuration.
    #[error("query entry #{entry} has no configuration applied")]
    EmptyEntry {
        /// Zero-based index of the empty entry.
        entry: usize,
    },
}

/// Invalid chartable construction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartableError {
    /// The requested table is longer than the complete table.
    #[error("chartable length {0} exceeds {max}", max = crate::Chartable::COMPLETE_LENGTH)]
    LengthOutOfRange(usize),
    /// A charset member lies beyond the table.
    #[error("{0:?} (U+{code:04X}) is beyond chartable length {1}", code = code_point(.0))]
    CharOutOfRange(char, usize),
}

fn code_point(ch: &char) -> u32 {
    u32::from(*ch)
}
