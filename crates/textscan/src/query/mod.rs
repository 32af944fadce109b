//! Declarative, transactional scan queries.
//!
//! A [`Query`] is an immutable list of [`QueryEntry`] values, each describing
//! one piece of a token: how far it may reach ([`Scope`]), which characters it
//! accepts ([`Filter`]) and whether the matched piece is acceptable
//! ([`CheckMode`] plus a [`ResultPredicate`]). Queries are declared once with
//! a [`QueryBuilder`] and replayed against any
//! [`BufferedScanner`](crate::BufferedScanner):
//!
//! ```rust
//! use textscan::{BufferedScanner, CheckMode, QueryBuilder};
//!
//! let assignment = QueryBuilder::new()
//!     .take_while(char::is_alphanumeric).check_any(CheckMode::Assume).append_then()
//!     .take_string([" = ", "="]).check_any(CheckMode::Expect).skip_then()
//!     .take_while(|c: char| c.is_ascii_digit()).check_any(CheckMode::Expect)
//!     .build()?;
//!
//! let mut scanner = BufferedScanner::from_text("width = 80");
//! let pieces = scanner.read_query_pieces(&assignment)?;
//! assert_eq!(pieces, Some(vec!["width".to_string(), "80".to_string()]));
//! assert!(scanner.is_end_of_text());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Entries are matched against buffered input without touching the tracked
//! position; only a successful read commits, by replaying the consumed
//! characters through the tracker once.

mod builder;
mod engine;

use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt;

pub use builder::QueryBuilder;

use crate::predicate::{CharPredicate, NonEmpty, ResultPredicate};

/// How far an entry may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// At most this many characters.
    Length(usize),
    /// Everything up to the end of the input.
    Rest,
    /// Everything up to the next line break, handled as specified.
    Line(LineHandling),
}

/// What a line-scoped entry does with the line break that ends it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LineHandling {
    /// Leave the break out of the piece but consume it.
    #[default]
    ReturnBeforeAdvanceAfter,
    /// Leave the break out of the piece and stop in front of it.
    ReturnAndAdvanceBefore,
    /// Include the break in the piece and consume it.
    ReturnAndAdvanceAfter,
}

/// What happens when an entry fails to match or its piece is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CheckMode {
    /// The entry is optional: skip it and continue with the next one.
    #[default]
    Try,
    /// The whole query reports no match and consumes nothing.
    Assume,
    /// The whole query fails with
    /// [`ScanError::UnexpectedQueryResult`](crate::ScanError::UnexpectedQueryResult).
    Expect,
}

/// Which characters an entry accepts.
#[derive(Clone)]
pub enum Filter {
    /// A run of characters accepted by the predicate.
    Chars(Arc<dyn CharPredicate>),
    /// The first candidate, in declaration order, found at the cursor.
    Strings(Arc<[String]>),
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chars(_) => f.write_str("Chars(..)"),
            Self::Strings(candidates) => f.debug_tuple("Strings").field(candidates).finish(),
        }
    }
}

/// Acceptance test for an entry's piece.
#[derive(Clone)]
pub struct ResultCheck {
    predicate: Arc<dyn ResultPredicate>,
    mode: CheckMode,
}

impl ResultCheck {
    /// Creates a check applying `predicate` with `mode`.
    pub fn new(predicate: impl ResultPredicate + 'static, mode: CheckMode) -> Self {
        Self {
            predicate: Arc::new(predicate),
            mode,
        }
    }

    /// The check applied when an entry declares none: non-empty, optional.
    pub fn non_empty() -> Self {
        Self::new(NonEmpty, CheckMode::Try)
    }

    /// The failure policy.
    #[inline]
    pub fn mode(&self) -> CheckMode {
        self.mode
    }

    /// Returns `true` if `piece` is accepted.
    #[inline]
    pub fn accepts(&self, piece: &str) -> bool {
        self.predicate.check(piece)
    }
}

impl fmt::Debug for ResultCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCheck")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// One step of a [`Query`].
#[derive(Debug, Clone)]
pub struct QueryEntry {
    scope: Option<Scope>,
    filter: Option<Filter>,
    check: ResultCheck,
    skipped: bool,
}

impl QueryEntry {
    /// The declared scope; `None` reaches to the end of the input.
    #[inline]
    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    /// The declared filter, if any.
    #[inline]
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// The acceptance check, defaulted when none was declared.
    #[inline]
    pub fn check(&self) -> &ResultCheck {
        &self.check
    }

    /// Returns `true` if the matched piece is left out of the result.
    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    fn budget(&self) -> usize {
        match self.scope {
            Some(Scope::Length(n)) => n,
            Some(Scope::Rest | Scope::Line(_)) | None => usize::MAX,
        }
    }

    fn line_handling(&self) -> Option<LineHandling> {
        match self.scope {
            Some(Scope::Line(handling)) => Some(handling),
            _ => None,
        }
    }
}

/// An immutable, replayable sequence of entries.
///
/// Cloning is cheap; a query can be shared between threads and run against
/// any number of scanners.
#[derive(Debug, Clone)]
pub struct Query {
    entries: Arc<[QueryEntry]>,
}

impl Query {
    fn new(entries: Vec<QueryEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// The entries, in scanning order.
    #[inline]
    pub fn entries(&self) -> &[QueryEntry] {
        &self.entries
    }

    /// The number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for a query without entries, which always matches the
    /// empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
