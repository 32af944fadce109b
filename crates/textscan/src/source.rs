//! Character sources feeding a [`BufferedScanner`](crate::BufferedScanner).
//!
//! The scanner only ever asks a source for "up to N more characters"; a
//! source signals end of input by appending nothing. Sources are owned by
//! exactly one scanner, so none of them need interior synchronization.

use alloc::vec::Vec;
use core::str::Chars;

use crate::error::SourceError;

/// A pull-based supplier of characters.
pub trait CharSource {
    /// Appends up to `max` characters to `buf` and returns how many were
    /// appended. Returning zero means the source is exhausted.
    fn read_batch(&mut self, buf: &mut Vec<char>, max: usize) -> Result<usize, SourceError>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn read_batch(&mut self, buf: &mut Vec<char>, max: usize) -> Result<usize, SourceError> {
        (**self).read_batch(buf, max)
    }
}

/// Characters of an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    /// Creates a source over `text`.
    pub fn new(text: &'a str) -> Self {
        Self { chars: text.chars() }
    }
}

impl<'a> From<&'a str> for StrSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

impl CharSource for StrSource<'_> {
    fn read_batch(&mut self, buf: &mut Vec<char>, max: usize) -> Result<usize, SourceError> {
        let before = buf.len();
        buf.extend(self.chars.by_ref().take(max));
        Ok(buf.len() - before)
    }
}

/// Characters produced by any iterator.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator<Item = char>> IterSource<I> {
    /// Creates a source draining `iter`.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }
}

impl<I: Iterator<Item = char>> CharSource for IterSource<I> {
    fn read_batch(&mut self, buf: &mut Vec<char>, max: usize) -> Result<usize, SourceError> {
        let before = buf.len();
        buf.extend(self.iter.by_ref().take(max));
        Ok(buf.len() - before)
    }
}

#[cfg(feature = "std")]
pub use reader::ReaderSource;

#[cfg(feature = "std")]
mod reader {
    use alloc::vec::Vec;
    use std::io::{self, Read};

    use super::CharSource;
    use crate::error::SourceError;

    const READ_CHUNK: usize = 8 * 1024;

    /// UTF-8 text pulled from a [`Read`] implementation.
    ///
    /// Malformed sequences decode to U+FFFD. A multi-byte sequence split
    /// across reads is reassembled before decoding.
    #[derive(Debug)]
    pub struct ReaderSource<R> {
        reader: R,
        pending: Vec<u8>,
        start: usize,
        eof: bool,
    }

    impl<R: Read> ReaderSource<R> {
        /// Creates a source reading from `reader`.
        pub fn new(reader: R) -> Self {
            Self {
                reader,
                pending: Vec::new(),
                start: 0,
                eof: false,
            }
        }

        /// Unwraps the underlying reader. Bytes read ahead but not yet
        /// decoded are lost.
        pub fn into_inner(self) -> R {
            self.reader
        }

        fn fill(&mut self) -> io::Result<()> {
            self.pending.drain(..self.start);
            self.start = 0;

            let mut chunk = [0u8; READ_CHUNK];
            loop {
                match self.reader.read(&mut chunk) {
                    Ok(0) => {
                        self.eof = true;
                        return Ok(());
                    }
                    Ok(n) => {
                        self.pending.extend_from_slice(&chunk[..n]);
                        return Ok(());
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            }
        }

        fn decode_next(&mut self) -> io::Result<Option<char>> {
            loop {
                let avail = &self.pending[self.start..];
                if avail.is_empty() {
                    if self.eof {
                        return Ok(None);
                    }
                    self.fill()?;
                    continue;
                }

                let (ch, len) = bstr::decode_utf8(avail);
                match ch {
                    Some(ch) => {
                        self.start += len;
                        return Ok(Some(ch));
                    }
                    // A valid prefix cut short by the read boundary.
                    None if !self.eof && could_continue(avail, len) => self.fill()?,
                    None => {
                        self.start += len.max(1);
                        return Ok(Some(char::REPLACEMENT_CHARACTER));
                    }
                }
            }
        }
    }

    /// Returns `true` if `avail` is the start of a multi-byte sequence that
    /// more bytes could complete.
    fn could_continue(avail: &[u8], invalid_len: usize) -> bool {
        invalid_len == avail.len() && avail.len() < 4 && matches!(avail[0], 0xC2..=0xF4)
    }

    impl<R: Read> CharSource for ReaderSource<R> {
        fn read_batch(&mut self, buf: &mut Vec<char>, max: usize) -> Result<usize, SourceError> {
            let mut appended = 0;
            while appended < max {
                match self.decode_next()? {
                    Some(ch) => {
                        buf.push(ch);
                        appended += 1;
                    }
                    None => break,
                }
            }
            Ok(appended)
        }
    }
}

#[cfg(test)]
mod tests;
