use alloc::{string::String, vec::Vec};

use tracing::debug;

use super::{CheckMode, Filter, LineHandling, Query, QueryBuilder, QueryEntry};
use crate::{error::ScanError, scanner::BufferedScanner, source::CharSource};

/// Output shape of a query run.
trait Collect: Default {
    type Output;

    fn push(&mut self, piece: String);
    fn finish(self) -> Self::Output;
}

#[derive(Default)]
struct Joined(String);

impl Collect for Joined {
    type Output = String;

    fn push(&mut self, piece: String) {
        self.0.push_str(&piece);
    }

    fn finish(self) -> String {
        self.0
    }
}

#[derive(Default)]
struct Pieces(Vec<String>);

impl Collect for Pieces {
    type Output = Vec<String>;

    fn push(&mut self, piece: String) {
        self.0.push(piece);
    }

    fn finish(self) -> Vec<String> {
        self.0
    }
}

/// A tentative match of one entry: the piece and the offset after it.
struct Matched {
    piece: String,
    end: usize,
}

impl<S: CharSource> BufferedScanner<S> {
    /// Starts a query bound to this scanner.
    ///
    /// ```rust
    /// use textscan::{BufferedScanner, CheckMode};
    ///
    /// let mut scanner = BufferedScanner::from_text("0x1F");
    /// let hex = scanner
    ///     .query()
    ///     .take_string(["0x", "0X"]).check_any(CheckMode::Assume).skip_then()
    ///     .take_while(|c: char| c.is_ascii_hexdigit()).check_any(CheckMode::Expect)
    ///     .read()?;
    /// assert_eq!(hex.as_deref(), Some("1F"));
    /// # Ok::<(), textscan::ScanError>(())
    /// ```
    pub fn query(&mut self) -> QueryBuilder<&mut Self> {
        QueryBuilder::bound(self)
    }

    /// Runs `query` and returns the concatenated pieces without consuming
    /// input. `Ok(None)` means an `Assume` entry did not match.
    pub fn peek_query(&mut self, query: &Query) -> Result<Option<String>, ScanError> {
        self.run_query::<Joined>(query, false)
    }

    /// Like [`peek_query`](Self::peek_query), one string per appended
    /// entry.
    pub fn peek_query_pieces(&mut self, query: &Query) -> Result<Option<Vec<String>>, ScanError> {
        self.run_query::<Pieces>(query, false)
    }

    /// Runs `query` and, if it matches, consumes everything it matched and
    /// returns the concatenated pieces. Nothing is consumed on `Ok(None)` or
    /// on error.
    pub fn read_query(&mut self, query: &Query) -> Result<Option<String>, ScanError> {
        self.run_query::<Joined>(query, true)
    }

    /// Like [`read_query`](Self::read_query), one string per appended
    /// entry.
    pub fn read_query_pieces(&mut self, query: &Query) -> Result<Option<Vec<String>>, ScanError> {
        self.run_query::<Pieces>(query, true)
    }

    fn run_query<C: Collect>(
        &mut self,
        query: &Query,
        commit: bool,
    ) -> Result<Option<C::Output>, ScanError> {
        let start = self.cursor();
        let mut at = start;
        let mut out = C::default();

        for (index, entry) in query.entries().iter().enumerate() {
            let matched = self
                .match_entry(entry, at)?
                .filter(|m| entry.check().accepts(&m.piece));

            let Some(Matched { piece, end }) = matched else {
                match entry.check().mode() {
                    CheckMode::Try => continue,
                    CheckMode::Assume => {
                        debug!(entry = index, offset = at, "assumed entry did not match");
                        return Ok(None);
                    }
                    CheckMode::Expect => {
                        let position = self.tracker_at(at).position();
                        debug!(entry = index, %position, "expected entry did not match");
                        return Err(ScanError::UnexpectedQueryResult {
                            entry: index,
                            position,
                        });
                    }
                }
            };

            at = end;
            if !entry.is_skipped() {
                out.push(piece);
            }
        }

        if commit {
            self.advance_to(at)?;
        }
        Ok(Some(out.finish()))
    }

    fn match_entry(&mut self, entry: &QueryEntry, at: usize) -> Result<Option<Matched>, ScanError> {
        let budget = entry.budget();

        if let Some(Filter::Strings(candidates)) = entry.filter() {
            for candidate in candidates.iter() {
                if candidate.chars().count() > budget {
                    continue;
                }
                if let Some(end) = self.match_literal(candidate, at)? {
                    return Ok(Some(Matched {
                        piece: candidate.clone(),
                        end,
                    }));
                }
            }
            return Ok(None);
        }

        let predicate = match entry.filter() {
            Some(Filter::Chars(predicate)) => Some(predicate),
            _ => None,
        };
        let handling = entry.line_handling();

        let mut end = at;
        let mut stopped_at_break = false;
        while end - at < budget {
            let Some(ch) = self.char_at(end)? else {
                break;
            };
            if handling.is_some() && self.tracker().is_line_break(ch) {
                stopped_at_break = true;
                break;
            }
            if predicate.is_some_and(|p| !p.matches(ch)) {
                break;
            }
            end += 1;
        }

        let mut piece_end = end;
        if let (Some(handling), true) = (handling, stopped_at_break) {
            let after_break = self.skip_line_break(end)?;
            match handling {
                LineHandling::ReturnBeforeAdvanceAfter => end = after_break,
                LineHandling::ReturnAndAdvanceBefore => {}
                LineHandling::ReturnAndAdvanceAfter => {
                    end = after_break;
                    piece_end = after_break;
                }
            }
        }

        Ok(Some(Matched {
            piece: self.text(at, piece_end),
            end,
        }))
    }

    /// Offset after `literal` if it occurs at `at`.
    fn match_literal(&mut self, literal: &str, at: usize) -> Result<Option<usize>, ScanError> {
        let mut end = at;
        for expected in literal.chars() {
            if self.char_at(end)? != Some(expected) {
                return Ok(None);
            }
            end += 1;
        }
        Ok(Some(end))
    }

    /// Offset after the line break at `at`, treating a joined CRLF as one.
    fn skip_line_break(&mut self, at: usize) -> Result<usize, ScanError> {
        let joined = self.tracker().convention().joins_crlf()
            && self.char_at(at)? == Some('\r')
            && self.char_at(at + 1)? == Some('\n');
        Ok(if joined { at + 2 } else { at + 1 })
    }
}
