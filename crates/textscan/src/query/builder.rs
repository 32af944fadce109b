use alloc::{string::String, sync::Arc, vec::Vec};
use core::mem;

use super::{CheckMode, Filter, LineHandling, Query, QueryEntry, ResultCheck, Scope};
use crate::{
    chartable::Chartable,
    error::{EntryAspect, QueryBuildError, ScanError},
    predicate::{AllChars, CharPredicate, NonEmpty, OneOf, ResultPredicate},
    scanner::BufferedScanner,
    source::CharSource,
};

/// The entry under construction: one optional slot per aspect.
#[derive(Debug, Default)]
struct PendingEntry {
    scope: Option<Scope>,
    filter: Option<Filter>,
    check: Option<ResultCheck>,
}

impl PendingEntry {
    fn is_untouched(&self) -> bool {
        self.scope.is_none() && self.filter.is_none() && self.check.is_none()
    }

    fn freeze(self, skipped: bool) -> QueryEntry {
        QueryEntry {
            scope: self.scope,
            filter: self.filter,
            check: self.check.unwrap_or_else(ResultCheck::non_empty),
            skipped,
        }
    }
}

/// Fluent declaration of a [`Query`].
///
/// Each entry is configured with at most one scope (`take`, `take_rest`,
/// `take_line`), at most one filter (`take_while`, `take_chartable`,
/// `take_string`) and at most one check (`check_*`), then closed with
/// [`append_then`](Self::append_then) or [`skip_then`](Self::skip_then). A
/// configured but unclosed last entry is appended when the query is built.
///
/// Misuse, such as setting the same aspect twice, is remembered and reported
/// once the query is finished; later calls are ignored.
///
/// The builder is either free-standing ([`QueryBuilder::new`], finished with
/// [`build`](QueryBuilder::build)) or bound to a scanner
/// ([`BufferedScanner::query`], finished with `peek`, `peek_pieces`, `read`
/// or `read_pieces`).
#[derive(Debug)]
#[must_use]
pub struct QueryBuilder<B = ()> {
    binding: B,
    entries: Vec<QueryEntry>,
    pending: PendingEntry,
    error: Option<QueryBuildError>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    /// Starts declaring a reusable query.
    pub fn new() -> Self {
        Self::bound(())
    }

    /// Finishes the declaration.
    pub fn build(self) -> Result<Query, QueryBuildError> {
        self.finish().map(|(_, query)| query)
    }
}

impl<B> QueryBuilder<B> {
    pub(crate) fn bound(binding: B) -> Self {
        Self {
            binding,
            entries: Vec::new(),
            pending: PendingEntry::default(),
            error: None,
        }
    }

    // --- Scope -------------------------------------------------------------

    /// Limits the entry to at most `length` characters.
    pub fn take(self, length: usize) -> Self {
        self.set_scope(Scope::Length(length), "take")
    }

    /// Lets the entry reach to the end of the input.
    pub fn take_rest(self) -> Self {
        self.set_scope(Scope::Rest, "take_rest")
    }

    /// Lets the entry reach to the next line break.
    pub fn take_line(self, handling: LineHandling) -> Self {
        self.set_scope(Scope::Line(handling), "take_line")
    }

    // --- Filter ------------------------------------------------------------

    /// Accepts the run of characters matching `predicate`.
    pub fn take_while(self, predicate: impl CharPredicate + 'static) -> Self {
        self.set_filter(Filter::Chars(Arc::new(predicate)), "take_while")
    }

    /// Accepts the run of characters in `table`.
    pub fn take_chartable(self, table: Chartable) -> Self {
        self.set_filter(Filter::Chars(Arc::new(table)), "take_chartable")
    }

    /// Accepts the first of `candidates` found at the cursor.
    ///
    /// Candidates are tried in the given order and the first match wins,
    /// even if a later candidate would match more text.
    pub fn take_string<I>(self, candidates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let candidates: Vec<String> = candidates.into_iter().map(Into::into).collect();
        self.set_filter(Filter::Strings(candidates.into()), "take_string")
    }

    // --- Check -------------------------------------------------------------

    /// Requires a non-empty piece.
    pub fn check_any(self, mode: CheckMode) -> Self {
        self.set_check(ResultCheck::new(NonEmpty, mode), "check_any")
    }

    /// Requires the piece to equal one of `strings`.
    pub fn check_string<I>(self, strings: I, mode: CheckMode) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.set_check(ResultCheck::new(OneOf::new(strings), mode), "check_string")
    }

    /// Requires the piece to satisfy `predicate`.
    pub fn check_result(self, predicate: impl ResultPredicate + 'static, mode: CheckMode) -> Self {
        self.set_check(ResultCheck::new(predicate, mode), "check_result")
    }

    /// Requires every character of the piece to be in `table`.
    pub fn check_chartable(self, table: Chartable, mode: CheckMode) -> Self {
        self.set_check(ResultCheck::new(AllChars(table), mode), "check_chartable")
    }

    // --- Closing -----------------------------------------------------------

    /// Closes the entry, keeping its piece in the output.
    pub fn append_then(self) -> Self {
        self.close(false)
    }

    /// Closes the entry, consuming its piece without outputting it.
    pub fn skip_then(self) -> Self {
        self.close(true)
    }

    fn set_scope(mut self, scope: Scope, method: &'static str) -> Self {
        if self.error.is_none() {
            if self.pending.scope.is_some() {
                self.fail(EntryAspect::Scope, method);
            } else {
                self.pending.scope = Some(scope);
            }
        }
        self
    }

    fn set_filter(mut self, filter: Filter, method: &'static str) -> Self {
        if self.error.is_none() {
            if self.pending.filter.is_some() {
                self.fail(EntryAspect::Filter, method);
            } else {
                self.pending.filter = Some(filter);
            }
        }
        self
    }

    fn set_check(mut self, check: ResultCheck, method: &'static str) -> Self {
        if self.error.is_none() {
            if self.pending.check.is_some() {
                self.fail(EntryAspect::Check, method);
            } else {
                self.pending.check = Some(check);
            }
        }
        self
    }

    fn fail(&mut self, aspect: EntryAspect, method: &'static str) {
        self.error = Some(QueryBuildError::AspectAlreadySet {
            entry: self.entries.len(),
            aspect,
            method,
        });
    }

    fn close(mut self, skipped: bool) -> Self {
        if self.error.is_some() {
            return self;
        }
        let pending = mem::take(&mut self.pending);
        if pending.is_untouched() {
            self.error = Some(QueryBuildError::EmptyEntry {
                entry: self.entries.len(),
            });
        } else {
            self.entries.push(pending.freeze(skipped));
        }
        self
    }

    fn finish(mut self) -> Result<(B, Query), QueryBuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if !self.pending.is_untouched() {
            let pending = mem::take(&mut self.pending);
            self.entries.push(pending.freeze(false));
        }
        Ok((self.binding, Query::new(self.entries)))
    }
}

impl<S: CharSource> QueryBuilder<&mut BufferedScanner<S>> {
    /// Runs the declared query without consuming input; see
    /// [`BufferedScanner::peek_query`].
    pub fn peek(self) -> Result<Option<String>, ScanError> {
        let (scanner, query) = self.finish()?;
        scanner.peek_query(&query)
    }

    /// Like [`peek`](Self::peek), returning the pieces separately.
    pub fn peek_pieces(self) -> Result<Option<Vec<String>>, ScanError> {
        let (scanner, query) = self.finish()?;
        scanner.peek_query_pieces(&query)
    }

    /// Runs the declared query, consuming the matched input; see
    /// [`BufferedScanner::read_query`].
    pub fn read(self) -> Result<Option<String>, ScanError> {
        let (scanner, query) = self.finish()?;
        scanner.read_query(&query)
    }

    /// Like [`read`](Self::read), returning the pieces separately.
    pub fn read_pieces(self) -> Result<Option<Vec<String>>, ScanError> {
        let (scanner, query) = self.finish()?;
        scanner.read_query_pieces(&query)
    }
}
