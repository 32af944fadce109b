//! Buffered scanner: lookahead, consumption and backtracking over a source.
//!
//! What it does
//! - Pulls characters from a [`CharSource`] in batches into a window
//!   `[offset, offset + buffer.len())` of the whole input, addressed by
//!   absolute zero-based offsets.
//! - `peek*` calls extend the window as far as they need but never move the
//!   cursor or the tracked [`Position`]; `read*` calls feed every consumed
//!   character to the [`PositionTracker`] exactly once, in order.
//! - Savepoints copy the current position together with its offset;
//!   loading one restores both.
//!
//! Retention
//! - On refill, everything strictly before
//!   `min(earliest savepoint offset, cursor)` is discarded. Nothing else is,
//!   so every live savepoint can be loaded and peeked-but-unread data stays
//!   available for the query engine.
//!
//! Invariants
//! - `offset <= cursor <= offset + buffer.len()`.
//! - `current` is the character at `cursor`, or `None` once the source is
//!   exhausted and the cursor sits at the end of the window.
//! - `earliest` is the minimum offset over `savepoints`.

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::num::NonZeroUsize;

use tracing::{debug, trace};

use crate::{
    chartable::Chartable,
    error::ScanError,
    options::ScannerOptions,
    position::{Position, PositionTracker},
    predicate::CharPredicate,
    source::{CharSource, StrSource},
};

/// A named snapshot of the scanner's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Savepoint {
    position: Position,
    offset: usize,
}

/// A scanner over a character source with lookahead and savepoints.
///
/// Typical loop:
/// ```rust
/// use textscan::BufferedScanner;
///
/// let mut scanner = BufferedScanner::from_text("let x = 42;");
/// let keyword = scanner.read_while(&char::is_alphabetic)?;
/// scanner.read_while(&char::is_whitespace)?;
/// assert_eq!(keyword, "let");
/// assert_eq!(scanner.peek(), Some('x'));
/// assert_eq!(scanner.position().column, 5);
/// # Ok::<(), textscan::ScanError>(())
/// ```
#[derive(Debug)]
pub struct BufferedScanner<S> {
    source: S,
    batch_size: NonZeroUsize,
    exhausted: bool,

    // Window over the input
    buffer: Vec<char>,
    offset: usize,
    cursor: usize,
    current: Option<char>,

    tracker: PositionTracker,

    savepoints: BTreeMap<String, Savepoint>,
    earliest: Option<usize>,
}

impl<'a> BufferedScanner<StrSource<'a>> {
    /// Creates a scanner over an in-memory string with default options.
    ///
    /// The whole text is buffered up front, so construction cannot fail.
    pub fn from_text(text: &'a str) -> Self {
        Self::from_text_with_options(text, ScannerOptions::default())
    }

    /// Creates a scanner over an in-memory string.
    pub fn from_text_with_options(text: &'a str, options: ScannerOptions) -> Self {
        let buffer: Vec<char> = text.chars().collect();
        let current = buffer.first().copied();
        Self {
            source: StrSource::new(""),
            batch_size: options.batch_size,
            exhausted: true,
            buffer,
            offset: 0,
            cursor: 0,
            current,
            tracker: options.tracker(),
            savepoints: BTreeMap::new(),
            earliest: None,
        }
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> BufferedScanner<crate::source::ReaderSource<R>> {
    /// Creates a scanner over UTF-8 text read from `reader`, with default
    /// options.
    pub fn from_reader(reader: R) -> Result<Self, ScanError> {
        Self::new(crate::source::ReaderSource::new(reader))
    }
}

impl<S: CharSource> BufferedScanner<S> {
    /// Creates a scanner over `source` with default options.
    pub fn new(source: S) -> Result<Self, ScanError> {
        Self::with_options(source, ScannerOptions::default())
    }

    /// Creates a scanner over `source`.
    pub fn with_options(source: S, options: ScannerOptions) -> Result<Self, ScanError> {
        Self::with_tracker(source, options.tracker(), options.batch_size)
    }

    /// Creates a scanner over `source` that continues from a preconfigured
    /// tracker.
    ///
    /// Reads the first batch to prime the current character.
    pub fn with_tracker(
        source: S,
        tracker: PositionTracker,
        batch_size: NonZeroUsize,
    ) -> Result<Self, ScanError> {
        let mut scanner = Self {
            source,
            batch_size,
            exhausted: false,
            buffer: Vec::new(),
            offset: 0,
            cursor: 0,
            current: None,
            tracker,
            savepoints: BTreeMap::new(),
            earliest: None,
        };
        scanner.sync_current()?;
        Ok(scanner)
    }

    // --- Lookahead ---------------------------------------------------------

    /// The next character, or `'\0'` at the end of the text.
    #[inline]
    pub fn current_character(&self) -> char {
        self.current.unwrap_or('\0')
    }

    /// The next character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.current
    }

    /// Returns `true` once every character has been consumed.
    #[inline]
    pub fn is_end_of_text(&self) -> bool {
        self.current.is_none()
    }

    /// Returns up to `count` upcoming characters without consuming them.
    pub fn peek_block(&mut self, count: usize) -> Result<String, ScanError> {
        let end = self.extent(count)?;
        Ok(self.text(self.cursor, end))
    }

    /// Returns the upcoming run of characters accepted by `predicate`
    /// without consuming it.
    pub fn peek_while<P>(&mut self, predicate: &P) -> Result<String, ScanError>
    where
        P: CharPredicate + ?Sized,
    {
        let end = self.scan_while(predicate)?;
        Ok(self.text(self.cursor, end))
    }

    /// Returns the upcoming run of characters in `table` without consuming
    /// it.
    pub fn peek_charset(&mut self, table: &Chartable) -> Result<String, ScanError> {
        self.peek_while(table)
    }

    // --- Consumption -------------------------------------------------------

    /// Consumes the next character; `None` at the end of the text.
    pub fn read(&mut self) -> Result<Option<char>, ScanError> {
        let Some(ch) = self.current else {
            return Ok(None);
        };
        // Pull the lookahead first so a failing source leaves nothing consumed.
        let next = self.char_at(self.cursor + 1)?;
        self.tracker.advance(ch);
        self.cursor += 1;
        self.current = next;
        Ok(Some(ch))
    }

    /// Consumes up to `count` characters.
    pub fn read_block(&mut self, count: usize) -> Result<String, ScanError> {
        let end = self.extent(count)?;
        let text = self.text(self.cursor, end);
        self.advance_to(end)?;
        Ok(text)
    }

    /// Consumes the upcoming run of characters accepted by `predicate`.
    pub fn read_while<P>(&mut self, predicate: &P) -> Result<String, ScanError>
    where
        P: CharPredicate + ?Sized,
    {
        let end = self.scan_while(predicate)?;
        let text = self.text(self.cursor, end);
        self.advance_to(end)?;
        Ok(text)
    }

    /// Consumes the upcoming run of characters in `table`.
    pub fn read_charset(&mut self, table: &Chartable) -> Result<String, ScanError> {
        self.read_while(table)
    }

    // --- Savepoints --------------------------------------------------------

    /// Remembers the current position under `name`, replacing any savepoint
    /// with the same name.
    pub fn save_position(&mut self, name: impl Into<String>) {
        let name = name.into();
        let savepoint = Savepoint {
            position: self.tracker.position(),
            offset: self.cursor,
        };
        debug!(name = %name, index = savepoint.position.index, "save position");
        let replaced = self.savepoints.insert(name, savepoint);
        if replaced.is_some() {
            self.recompute_earliest();
        } else {
            let earliest = self.earliest.map_or(savepoint.offset, |e| e.min(savepoint.offset));
            self.earliest = Some(earliest);
        }
    }

    /// Returns to the position saved under `name`.
    ///
    /// The savepoint stays alive and can be loaded again.
    pub fn load_position(&mut self, name: &str) -> Result<(), ScanError> {
        let savepoint = *self
            .savepoints
            .get(name)
            .ok_or_else(|| ScanError::UnknownSavepoint(name.into()))?;
        debug!(name, index = savepoint.position.index, "load position");
        debug_assert!(savepoint.offset >= self.offset, "savepoint data was discarded");
        let current = self.char_at(savepoint.offset)?;
        self.tracker.set_position(savepoint.position);
        self.cursor = savepoint.offset;
        self.current = current;
        Ok(())
    }

    /// Drops the savepoint `name`, allowing the data it pinned to be
    /// discarded on the next refill.
    pub fn forget_position(&mut self, name: &str) -> Result<(), ScanError> {
        let savepoint = self
            .savepoints
            .remove(name)
            .ok_or_else(|| ScanError::UnknownSavepoint(name.into()))?;
        debug!(name, index = savepoint.position.index, "forget position");
        if self.earliest == Some(savepoint.offset) {
            self.recompute_earliest();
        }
        Ok(())
    }

    /// Returns `true` if a savepoint named `name` is alive.
    pub fn has_savepoint(&self, name: &str) -> bool {
        self.savepoints.contains_key(name)
    }

    // --- Introspection -----------------------------------------------------

    /// A copy of the current position.
    #[inline]
    pub fn position(&self) -> Position {
        self.tracker.position()
    }

    /// The tracker advancing this scanner's position.
    #[inline]
    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Number of characters currently held in memory.
    #[inline]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    // --- Window management -------------------------------------------------

    /// Absolute offset of the next unconsumed character.
    #[inline]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    fn buffered_end(&self) -> usize {
        self.offset + self.buffer.len()
    }

    /// The character at absolute offset `at`, pulling from the source as
    /// needed; `None` if the input ends before it.
    pub(crate) fn char_at(&mut self, at: usize) -> Result<Option<char>, ScanError> {
        if !self.ensure_buffered(at)? {
            return Ok(None);
        }
        Ok(at
            .checked_sub(self.offset)
            .and_then(|i| self.buffer.get(i))
            .copied())
    }

    /// Buffered text in `[from, to)`; both ends must be resident.
    pub(crate) fn text(&self, from: usize, to: usize) -> String {
        self.buffer[from - self.offset..to - self.offset].iter().collect()
    }

    /// A tracker advanced from the current position to offset `to`, leaving
    /// the scanner untouched.
    pub(crate) fn tracker_at(&self, to: usize) -> PositionTracker {
        let mut tracker = self.tracker.clone();
        for &ch in &self.buffer[self.cursor - self.offset..to - self.offset] {
            tracker.advance(ch);
        }
        tracker
    }

    /// Consumes every buffered character up to offset `to`.
    ///
    /// The character at `to` is fetched before anything is committed, so on
    /// error the scanner is left untouched.
    pub(crate) fn advance_to(&mut self, to: usize) -> Result<(), ScanError> {
        let current = self.char_at(to)?;
        for &ch in &self.buffer[self.cursor - self.offset..to - self.offset] {
            self.tracker.advance(ch);
        }
        self.cursor = to;
        self.current = current;
        Ok(())
    }

    fn extent(&mut self, count: usize) -> Result<usize, ScanError> {
        if count == 0 {
            return Ok(self.cursor);
        }
        let target = self.cursor.saturating_add(count);
        self.ensure_buffered(target - 1)?;
        Ok(target.min(self.buffered_end()))
    }

    fn scan_while<P>(&mut self, predicate: &P) -> Result<usize, ScanError>
    where
        P: CharPredicate + ?Sized,
    {
        let mut end = self.cursor;
        while let Some(ch) = self.char_at(end)? {
            if !predicate.matches(ch) {
                break;
            }
            end += 1;
        }
        Ok(end)
    }

    fn sync_current(&mut self) -> Result<(), ScanError> {
        self.current = self.char_at(self.cursor)?;
        Ok(())
    }

    fn ensure_buffered(&mut self, at: usize) -> Result<bool, ScanError> {
        while at >= self.buffered_end() {
            if self.exhausted {
                return Ok(false);
            }
            self.refill()?;
        }
        Ok(true)
    }

    fn refill(&mut self) -> Result<(), ScanError> {
        self.discard_unreachable();
        let read = self
            .source
            .read_batch(&mut self.buffer, self.batch_size.get())?;
        trace!(read, offset = self.offset, buffered = self.buffer.len(), "refill");
        if read == 0 {
            self.exhausted = true;
        }
        Ok(())
    }

    fn discard_unreachable(&mut self) {
        let keep_from = self.earliest.map_or(self.cursor, |e| e.min(self.cursor));
        if keep_from > self.offset {
            let discarded = keep_from - self.offset;
            self.buffer.drain(..discarded);
            self.offset = keep_from;
            trace!(discarded, offset = self.offset, "discard consumed input");
        }
    }

    fn recompute_earliest(&mut self) {
        self.earliest = self.savepoints.values().map(|s| s.offset).min();
    }
}

// Test-only inspection helpers for retention behavior.
#[cfg(test)]
impl<S> BufferedScanner<S> {
    pub(crate) fn test_window(&self) -> (usize, usize) {
        (self.offset, self.offset + self.buffer.len())
    }
}
