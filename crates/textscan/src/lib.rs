//! Text scanning engine for hand-written lexers.
//!
//! - [`PositionTracker`] turns a stream of characters into one-based
//!   line/column [`Position`]s, with configurable tab stops and line-break
//!   conventions.
//! - [`BufferedScanner`] pulls characters from a [`CharSource`] in batches and
//!   offers lookahead, consumption and named savepoints for backtracking.
//!   Memory stays bounded by the oldest live savepoint.
//! - [`Query`] declares a multi-step token read once; the scanner runs it
//!   atomically, either committing everything it matched or nothing.
//!
//! ```rust
//! use textscan::{BufferedScanner, CheckMode, LineHandling};
//!
//! let mut scanner = BufferedScanner::from_text("# comment\nkey=value");
//! let comment = scanner
//!     .query()
//!     .take_string(["#"]).check_any(CheckMode::Assume).skip_then()
//!     .take_line(LineHandling::ReturnBeforeAdvanceAfter)
//!     .read()?;
//! assert_eq!(comment.as_deref(), Some(" comment"));
//! assert_eq!(scanner.position().line, 2);
//! # Ok::<(), textscan::ScanError>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod charsets;
mod chartable;
mod error;
mod options;
mod position;
mod predicate;
mod query;
mod scanner;
mod source;

#[cfg(test)]
mod tests;

pub use chartable::Chartable;
pub use error::{ChartableError, EntryAspect, QueryBuildError, ScanError, SourceError};
pub use options::{DEFAULT_BATCH_SIZE, ScannerOptions};
pub use position::{DEFAULT_TAB_COLUMN_COUNT, LineBreakConvention, Position, PositionTracker};
pub use predicate::{
    AllChars, AllOf, AnyOf, CharPredicate, CharSet, NonEmpty, Not, OneOf, ResultPredicate,
};
pub use query::{
    CheckMode, Filter, LineHandling, Query, QueryBuilder, QueryEntry, ResultCheck, Scope,
};
pub use scanner::BufferedScanner;
#[cfg(feature = "std")]
pub use source::ReaderSource;
pub use source::{CharSource, IterSource, StrSource};
