//! Character and piece predicates.
//!
//! Scanning operations and query entries accept capabilities rather than
//! bare closures: [`CharPredicate`] decides whether a single character
//! belongs to a token, [`ResultPredicate`] decides whether a matched piece is
//! acceptable. Both are implemented for plain closures, so ad-hoc filters
//! stay one-liners, and by the named types below for the common shapes.

use alloc::{
    collections::BTreeSet,
    string::{String, ToString},
    vec::Vec,
};

use crate::chartable::Chartable;

/// Decides whether a character is accepted.
pub trait CharPredicate: Send + Sync {
    /// Returns `true` if `ch` is accepted.
    fn matches(&self, ch: char) -> bool;
}

impl<F> CharPredicate for F
where
    F: Fn(char) -> bool + Send + Sync,
{
    #[inline]
    fn matches(&self, ch: char) -> bool {
        self(ch)
    }
}

impl CharPredicate for Chartable {
    #[inline]
    fn matches(&self, ch: char) -> bool {
        Chartable::matches(self, ch)
    }
}

/// Accepts characters from an explicit set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet(BTreeSet<char>);

impl CharSet {
    /// Creates a set from the characters of `chars`.
    pub fn new(chars: &str) -> Self {
        Self(chars.chars().collect())
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl CharPredicate for CharSet {
    #[inline]
    fn matches(&self, ch: char) -> bool {
        self.0.contains(&ch)
    }
}

/// Accepts what the inner predicate rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Not<P>(pub P);

impl<P: CharPredicate> CharPredicate for Not<P> {
    #[inline]
    fn matches(&self, ch: char) -> bool {
        !self.0.matches(ch)
    }
}

/// Accepts a character if any of the inner predicates does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnyOf<P>(pub Vec<P>);

impl<P: CharPredicate> CharPredicate for AnyOf<P> {
    fn matches(&self, ch: char) -> bool {
        self.0.iter().any(|p| p.matches(ch))
    }
}

/// Accepts a character if all of the inner predicates do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllOf<P>(pub Vec<P>);

impl<P: CharPredicate> CharPredicate for AllOf<P> {
    fn matches(&self, ch: char) -> bool {
        self.0.iter().all(|p| p.matches(ch))
    }
}

/// Decides whether a matched piece of text is accepted.
pub trait ResultPredicate: Send + Sync {
    /// Returns `true` if `piece` is accepted.
    fn check(&self, piece: &str) -> bool;
}

impl<F> ResultPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, piece: &str) -> bool {
        self(piece)
    }
}

/// Accepts any non-empty piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonEmpty;

impl ResultPredicate for NonEmpty {
    #[inline]
    fn check(&self, piece: &str) -> bool {
        !piece.is_empty()
    }
}

/// Accepts pieces equal to one of the given strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneOf(BTreeSet<String>);

impl OneOf {
    /// Creates the set from `strings`.
    pub fn new<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            strings
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
        )
    }
}

impl ResultPredicate for OneOf {
    fn check(&self, piece: &str) -> bool {
        self.0.contains(piece)
    }
}

/// Accepts pieces whose every character matches the inner predicate.
///
/// The empty piece is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllChars<P>(pub P);

impl<P: CharPredicate> ResultPredicate for AllChars<P> {
    fn check(&self, piece: &str) -> bool {
        piece.chars().all(|ch| self.0.matches(ch))
    }
}
