use alloc::{string::String, vec::Vec};

use super::*;

fn drain(source: &mut impl CharSource, max: usize) -> Vec<String> {
    let mut batches = Vec::new();
    loop {
        let mut buf = Vec::new();
        let n = source.read_batch(&mut buf, max).unwrap();
        assert_eq!(n, buf.len());
        if n == 0 {
            return batches;
        }
        batches.push(buf.into_iter().collect());
    }
}

#[test]
fn str_source_hands_out_bounded_batches() {
    let mut source = StrSource::new("abcdefg");
    assert_eq!(drain(&mut source, 3), ["abc", "def", "g"]);
}

#[test]
fn iter_source_counts_chars_not_bytes() {
    let mut source = IterSource::new("żółw!".chars());
    assert_eq!(drain(&mut source, 2), ["żó", "łw", "!"]);
}

#[test]
fn exhausted_source_keeps_returning_zero() {
    let mut source = StrSource::from("x");
    let mut buf = Vec::new();
    assert_eq!(source.read_batch(&mut buf, 10).unwrap(), 1);
    assert_eq!(source.read_batch(&mut buf, 10).unwrap(), 0);
    assert_eq!(source.read_batch(&mut buf, 10).unwrap(), 0);
    assert_eq!(buf, ['x']);
}

#[cfg(feature = "std")]
mod reader {
    use alloc::vec::Vec;

    use super::drain;
    use crate::{
        source::{CharSource, ReaderSource},
        tests::utils::TrickleReader,
    };

    #[test]
    fn reassembles_sequences_split_across_reads() {
        let text = "a→b😀c";
        for step in 1..=4 {
            let mut source = ReaderSource::new(TrickleReader::new(text.as_bytes(), step));
            assert_eq!(drain(&mut source, 100).concat(), text, "step {step}");
        }
    }

    #[test]
    fn malformed_bytes_become_replacement_characters() {
        let bytes: Vec<u8> = [b'a', 0xFF, b'b', 0xE2, 0x82].to_vec();
        let mut source = ReaderSource::new(TrickleReader::new(&bytes, 1));
        assert_eq!(drain(&mut source, 100).concat(), "a\u{FFFD}b\u{FFFD}");
    }

    #[test]
    fn io_errors_surface_as_source_errors() {
        let mut source = ReaderSource::new(TrickleReader::failing_after(b"ab", 1, 1));
        let mut buf = Vec::new();
        assert!(source.read_batch(&mut buf, 10).is_err());
        assert_eq!(buf, ['a']);
    }

    #[test]
    fn trailing_invalid_byte_does_not_wait_for_more_input() {
        // Any read after the first one fails.
        let mut source = ReaderSource::new(TrickleReader::failing_after(b"a\xFF", 8, 1));
        let mut buf = Vec::new();
        assert_eq!(source.read_batch(&mut buf, 2).unwrap(), 2);
        assert_eq!(buf, ['a', char::REPLACEMENT_CHARACTER]);
    }

    #[test]
    fn truncated_sequence_waits_for_its_continuation() {
        let mut source = ReaderSource::new(TrickleReader::new("→".as_bytes(), 1));
        let mut buf = Vec::new();
        assert_eq!(source.read_batch(&mut buf, 1).unwrap(), 1);
        assert_eq!(buf, ['→']);
    }
}
