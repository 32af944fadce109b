//! Line/column bookkeeping for consumed characters.
//!
//! A [`PositionTracker`] owns a running [`Position`] and advances it one
//! character at a time. The result is a pure function of the consumed
//! characters, the tab width and the [`LineBreakConvention`], so replaying
//! the same characters from the same starting position always lands on the
//! same final position. The scanner relies on this to commit query results
//! after the fact and to restore savepoints by copying a snapshot.

use core::{fmt, num::NonZeroUsize};

/// Default number of columns between tab stops.
pub const DEFAULT_TAB_COLUMN_COUNT: NonZeroUsize = NonZeroUsize::MIN.saturating_add(3);

/// A location in text.
///
/// All counters are one-based. `last_character` is the character consumed
/// immediately before this position, or `None` at the start of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Index of the next character in the whole text.
    pub index: usize,
    /// Line number.
    pub line: usize,
    /// Index of the next character within the current line.
    pub line_index: usize,
    /// Displayed column; tabs may advance it by more than one.
    pub column: usize,
    /// The previously consumed character.
    pub last_character: Option<char>,
}

impl Position {
    /// Creates a position with the given counters and no previous character.
    pub const fn new(index: usize, line: usize, line_index: usize, column: usize) -> Self {
        Self {
            index,
            line,
            line_index,
            column,
            last_character: None,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Which characters start a new line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LineBreakConvention {
    /// CR and LF both break lines; a CRLF pair counts as a single break.
    #[default]
    BothJoinCrlf,
    /// CR and LF both break lines; a CRLF pair counts as two breaks.
    BothSeparateCrlf,
    /// Only LF breaks lines.
    LineFeedOnly,
    /// Only CR breaks lines.
    CarriageReturnOnly,
}

impl LineBreakConvention {
    /// Returns `true` if `ch` starts a new line under this convention.
    #[inline]
    pub fn is_line_break(self, ch: char) -> bool {
        match self {
            Self::BothJoinCrlf | Self::BothSeparateCrlf => ch == '\r' || ch == '\n',
            Self::LineFeedOnly => ch == '\n',
            Self::CarriageReturnOnly => ch == '\r',
        }
    }

    /// Returns `true` if a CRLF pair is a single line break.
    #[inline]
    pub fn joins_crlf(self) -> bool {
        matches!(self, Self::BothJoinCrlf)
    }
}

/// Advances a [`Position`] over consumed characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTracker {
    position: Position,
    tab_column_count: NonZeroUsize,
    convention: LineBreakConvention,
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_COLUMN_COUNT, LineBreakConvention::default())
    }
}

impl PositionTracker {
    /// Creates a tracker starting at the beginning of the text.
    pub fn new(tab_column_count: NonZeroUsize, convention: LineBreakConvention) -> Self {
        Self::starting_at(Position::default(), tab_column_count, convention)
    }

    /// Creates a tracker that continues from an existing position.
    pub fn starting_at(
        position: Position,
        tab_column_count: NonZeroUsize,
        convention: LineBreakConvention,
    ) -> Self {
        Self {
            position,
            tab_column_count,
            convention,
        }
    }

    /// Returns a copy of the current position.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Replaces the current position, e.g. when restoring a savepoint.
    #[inline]
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// The number of columns between tab stops.
    #[inline]
    pub fn tab_column_count(&self) -> NonZeroUsize {
        self.tab_column_count
    }

    /// The active line-break convention.
    #[inline]
    pub fn convention(&self) -> LineBreakConvention {
        self.convention
    }

    /// Returns `true` if `ch` starts a new line under the active convention.
    #[inline]
    pub fn is_line_break(&self, ch: char) -> bool {
        self.convention.is_line_break(ch)
    }

    /// Advances past `ch` and returns the number of columns it occupied.
    ///
    /// Line breaks occupy no columns, and neither does the LF of a CRLF pair
    /// when the convention joins them.
    pub fn advance(&mut self, ch: char) -> usize {
        let pos = &mut self.position;
        pos.index += 1;

        let after_cr = pos.last_character == Some('\r');
        pos.last_character = Some(ch);
        if ch == '\n' && after_cr && self.convention.joins_crlf() {
            return 0;
        }

        pos.line_index += 1;

        let advanced = if self.convention.is_line_break(ch) {
            pos.line += 1;
            pos.line_index = 1;
            pos.column = 1;
            0
        } else if ch == '\t' {
            let width = self.tab_column_count.get();
            width - (pos.column - 1) % width
        } else {
            1
        };

        pos.column += advanced;
        advanced
    }

    /// Advances past every character of `text`; returns the total columns.
    pub fn advance_str(&mut self, text: &str) -> usize {
        text.chars().map(|ch| self.advance(ch)).sum()
    }
}
