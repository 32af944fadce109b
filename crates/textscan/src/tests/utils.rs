use alloc::string::String;

/// Characters used to build generated inputs: letters, digits, separators,
/// tabs and every line-break flavor.
const ALPHABET: &[char] = &['a', 'b', 'Z', '1', '7', ':', ' ', '\t', '\r', '\n', 'é', '😀'];

/// Maps arbitrary bytes onto [`ALPHABET`], so generated inputs hit tabs and
/// CRLF pairs far more often than random `String`s would.
pub(crate) fn text_from(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()])
        .collect()
}

/// Batch size in `1..=16` derived from an arbitrary number.
pub(crate) fn batch_from(n: u8) -> core::num::NonZeroUsize {
    core::num::NonZeroUsize::MIN.saturating_add(usize::from(n % 16))
}

pub(crate) fn quickcheck_tests() -> u64 {
    if cfg!(any(miri, feature = "test-fast")) {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}

/// A reader that hands out at most `step` bytes per call, optionally
/// failing after a number of successful reads.
#[cfg(feature = "std")]
pub(crate) struct TrickleReader {
    data: alloc::vec::Vec<u8>,
    pos: usize,
    step: usize,
    ok_reads: Option<usize>,
    transient: bool,
}

#[cfg(feature = "std")]
impl TrickleReader {
    pub(crate) fn new(data: &[u8], step: usize) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            step: step.max(1),
            ok_reads: None,
            transient: false,
        }
    }

    pub(crate) fn failing_after(data: &[u8], step: usize, ok_reads: usize) -> Self {
        Self {
            ok_reads: Some(ok_reads),
            ..Self::new(data, step)
        }
    }

    /// Fails exactly once, after `ok_reads` successful reads, then recovers.
    pub(crate) fn failing_once_after(data: &[u8], step: usize, ok_reads: usize) -> Self {
        Self {
            transient: true,
            ..Self::failing_after(data, step, ok_reads)
        }
    }
}

#[cfg(feature = "std")]
impl std::io::Read for TrickleReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if let Some(remaining) = self.ok_reads.as_mut() {
            if *remaining == 0 {
                if self.transient {
                    self.ok_reads = None;
                }
                return Err(std::io::Error::other("trickle reader failure"));
            }
            *remaining -= 1;
        }
        let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[test]
fn generated_text_uses_the_alphabet() {
    assert_eq!(text_from(&[0, 9, 8, 9, 255]), "a\n\r\n1");
}
