//! Table-driven character classification.

use alloc::{boxed::Box, vec};

use crate::error::ChartableError;

/// A character-membership table with a default for characters beyond it.
///
/// Lookups are a single bounds check plus an index, which makes chartables
/// the fastest filter for hot scanning loops. Characters at or beyond
/// [`len`](Self::len) are answered by the out-of-range default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chartable {
    explicit: Box<[bool]>,
    out_of_range_matched: bool,
}

impl Chartable {
    /// Length of a table covering ASCII.
    pub const ASCII_LENGTH: usize = 128;

    /// Length of a table covering the whole Basic Multilingual Plane; the
    /// longest table accepted.
    pub const COMPLETE_LENGTH: usize = 0x1_0000;

    /// Creates a chartable from explicit per-character matches, indexed by
    /// code point.
    pub fn from_matches(
        explicit: impl Into<Box<[bool]>>,
        out_of_range_matched: bool,
    ) -> Result<Self, ChartableError> {
        let explicit = explicit.into();
        ensure_length(explicit.len())?;
        Ok(Self {
            explicit,
            out_of_range_matched,
        })
    }

    /// Creates a chartable of the code points below `length` that satisfy
    /// `predicate`.
    ///
    /// Surrogate code points, which are not `char`s, are never matched.
    pub fn from_predicate(
        predicate: impl Fn(char) -> bool,
        length: usize,
        out_of_range_matched: bool,
    ) -> Result<Self, ChartableError> {
        ensure_length(length)?;
        let explicit = (0..length)
            .map(|code| {
                u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .is_some_and(&predicate)
            })
            .collect();
        Ok(Self {
            explicit,
            out_of_range_matched,
        })
    }

    /// Creates an ASCII chartable of the characters satisfying `predicate`.
    pub fn ascii_from_predicate(
        predicate: impl Fn(char) -> bool,
        out_of_range_matched: bool,
    ) -> Self {
        let explicit = (0u8..0x80).map(|code| predicate(char::from(code))).collect();
        Self {
            explicit,
            out_of_range_matched,
        }
    }

    /// Creates a chartable of `length` entries matching exactly `charset`.
    pub fn from_charset(
        charset: impl IntoIterator<Item = char>,
        length: usize,
        out_of_range_matched: bool,
    ) -> Result<Self, ChartableError> {
        ensure_length(length)?;
        let mut explicit = vec![false; length].into_boxed_slice();
        for ch in charset {
            let code = ch as usize;
            if code >= length {
                return Err(ChartableError::CharOutOfRange(ch, length));
            }
            explicit[code] = true;
        }
        Ok(Self {
            explicit,
            out_of_range_matched,
        })
    }

    /// Creates an ASCII chartable matching the characters of `charset`.
    pub fn ascii_from_charset(
        charset: &str,
        out_of_range_matched: bool,
    ) -> Result<Self, ChartableError> {
        Self::from_charset(charset.chars(), Self::ASCII_LENGTH, out_of_range_matched)
    }

    /// Returns the exact opposite of this chartable, out-of-range default
    /// included.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            explicit: self.explicit.iter().map(|m| !m).collect(),
            out_of_range_matched: !self.out_of_range_matched,
        }
    }

    /// Returns a chartable matching every character matched by any of
    /// `tables`.
    ///
    /// If any table matches out-of-range characters, so does the result, and
    /// the result only needs to be as long as the shortest such table.
    /// Otherwise it is as long as the longest table.
    pub fn combined<'a>(tables: impl IntoIterator<Item = &'a Chartable>) -> Self {
        let tables: alloc::vec::Vec<&Chartable> = tables.into_iter().collect();
        let out_of_range_matched = tables.iter().any(|t| t.out_of_range_matched);
        let length = if out_of_range_matched {
            tables
                .iter()
                .filter(|t| t.out_of_range_matched)
                .map(|t| t.len())
                .min()
        } else {
            tables.iter().map(|t| t.len()).max()
        }
        .unwrap_or(0);

        let explicit = (0..length)
            .map(|code| tables.iter().any(|t| t.matches_code(code)))
            .collect();
        Self {
            explicit,
            out_of_range_matched,
        }
    }

    /// Returns `true` if `ch` is a member.
    #[inline]
    pub fn matches(&self, ch: char) -> bool {
        self.matches_code(ch as usize)
    }

    #[inline]
    fn matches_code(&self, code: usize) -> bool {
        self.explicit
            .get(code)
            .copied()
            .unwrap_or(self.out_of_range_matched)
    }

    /// The number of explicitly covered code points.
    #[inline]
    pub fn len(&self) -> usize {
        self.explicit.len()
    }

    /// Returns `true` if no code point is explicitly covered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
    }

    /// Whether characters beyond the table are treated as members.
    #[inline]
    pub fn out_of_range_matched(&self) -> bool {
        self.out_of_range_matched
    }
}

fn ensure_length(length: usize) -> Result<(), ChartableError> {
    if length > Chartable::COMPLETE_LENGTH {
        return Err(ChartableError::LengthOutOfRange(length));
    }
    Ok(())
}
