use alloc::{string::String, vec::Vec};

use quickcheck::{QuickCheck, TestResult};

use super::utils::{batch_from, quickcheck_tests, text_from};
use crate::{
    BufferedScanner, CheckMode, LineHandling, PositionTracker, Query, QueryBuilder, ScanError,
    ScannerOptions, StrSource,
};

fn mode_from(n: u8) -> CheckMode {
    match n % 3 {
        0 => CheckMode::Try,
        1 => CheckMode::Assume,
        _ => CheckMode::Expect,
    }
}

/// Adds one entry chosen by `kind` whose pieces are contiguous with the
/// consumed text, so the joined result equals what a read consumes.
fn push_entry<B>(builder: QueryBuilder<B>, kind: u8, mode: CheckMode) -> QueryBuilder<B> {
    let entry = match kind % 6 {
        0 => builder.take(usize::from(kind % 4)),
        1 => builder.take_while(char::is_alphabetic),
        2 => builder.take(2).take_while(|c: char| c.is_ascii_digit()),
        3 => builder.take_string([":", "ab", "a"]),
        4 => builder.take_line(LineHandling::ReturnAndAdvanceAfter),
        _ => builder.take_line(LineHandling::ReturnAndAdvanceBefore),
    };
    entry.check_any(mode).append_then()
}

fn query_from(entries: &[(u8, u8)]) -> Query {
    entries
        .iter()
        .fold(QueryBuilder::new(), |b, &(kind, mode)| {
            push_entry(b, kind, mode_from(mode))
        })
        .build()
        .unwrap()
}

fn scanner_over(text: &str, batch: u8) -> BufferedScanner<StrSource<'_>> {
    let options = ScannerOptions {
        batch_size: batch_from(batch),
        ..ScannerOptions::default()
    };
    BufferedScanner::with_options(StrSource::new(text), options).unwrap()
}

/// Property: peeking a query and then reading it yield the same outcome, and
/// a successful read lands where manually advancing past the result would.
#[test]
fn peek_read_symmetry_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, batch: u8, skip: u8, entries: Vec<(u8, u8)>) -> bool {
        let text = text_from(&bytes);
        let query = query_from(&entries);
        let mut scanner = scanner_over(&text, batch);
        scanner.read_block(usize::from(skip % 8)).unwrap();
        let start = scanner.tracker().clone();

        let peeked = scanner.peek_query(&query);
        if scanner.position() != start.position() {
            return false;
        }
        let read = scanner.read_query(&query);
        if peeked != read {
            return false;
        }

        match read {
            Ok(Some(result)) => {
                let mut expected: PositionTracker = start;
                expected.advance_str(&result);
                scanner.position() == expected.position()
            }
            Ok(None) | Err(_) => scanner.position() == start.position(),
        }
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, u8, u8, Vec<(u8, u8)>) -> bool);
}

/// Property: prepending a `Try` entry that can never match changes neither
/// the outcome nor the final position.
#[test]
fn try_entry_optionality_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, batch: u8, entries: Vec<(u8, u8)>) -> bool {
        let text = text_from(&bytes);
        let plain = query_from(&entries);
        let guarded = entries
            .iter()
            .fold(
                QueryBuilder::new()
                    .take_string(["§"])
                    .check_any(CheckMode::Try)
                    .append_then(),
                |b, &(kind, mode)| push_entry(b, kind, mode_from(mode)),
            )
            .build()
            .unwrap();

        // Entry indices in errors shift by one; compare failure positions.
        let failure_position = |e: ScanError| match e {
            ScanError::UnexpectedQueryResult { position, .. } => Some(position),
            _ => None,
        };
        let mut a = scanner_over(&text, batch);
        let mut b = scanner_over(&text, batch);
        let plain_outcome = a.read_query_pieces(&plain).map_err(failure_position);
        let guarded_outcome = b.read_query_pieces(&guarded).map_err(failure_position);
        plain_outcome == guarded_outcome && a.position() == b.position()
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, u8, Vec<(u8, u8)>) -> bool);
}

/// Property: a query ending in an `Assume` entry that cannot match reports
/// no match and leaves the scanner exactly where it was.
#[test]
fn assume_atomicity_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, batch: u8, skip: u8, entries: Vec<(u8, u8)>) -> TestResult {
        let text = text_from(&bytes);
        let query = entries
            .iter()
            .fold(QueryBuilder::new(), |b, &(kind, _)| {
                push_entry(b, kind, CheckMode::Try)
            })
            .take_string(["§"])
            .check_any(CheckMode::Assume)
            .build()
            .unwrap();

        let mut scanner = scanner_over(&text, batch);
        scanner.read_block(usize::from(skip % 8)).unwrap();
        let before = scanner.position();
        let upcoming: String = scanner.peek_block(usize::MAX).unwrap();

        let outcome = scanner.read_query(&query);
        TestResult::from_bool(
            outcome == Ok(None)
                && scanner.position() == before
                && scanner.peek_block(usize::MAX).unwrap() == upcoming,
        )
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, u8, u8, Vec<(u8, u8)>) -> TestResult);
}
