#![no_main]
use std::num::NonZeroUsize;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use textscan::{
    BufferedScanner, CharSource, CheckMode, LineHandling, Query, QueryBuilder, ScannerOptions,
    StrSource,
};

const SAVEPOINT_NAMES: [&str; 3] = ["a", "b", "c"];

#[derive(Debug, Arbitrary)]
enum Op {
    Read,
    ReadBlock(u8),
    PeekBlock(u8),
    Save(u8),
    Load(u8),
    Forget(u8),
    PeekQuery(u8),
    ReadQuery(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    batch: u8,
    ops: Vec<Op>,
}

fn queries() -> Vec<Query> {
    let mode = |n: u8| match n % 3 {
        0 => CheckMode::Try,
        1 => CheckMode::Assume,
        _ => CheckMode::Expect,
    };
    let mut out = Vec::new();
    for n in 0..9u8 {
        let builder = QueryBuilder::new()
            .take_while(char::is_alphanumeric)
            .check_any(mode(n))
            .append_then()
            .take_string([" = ", "=", ":"])
            .check_any(mode(n / 3))
            .skip_then();
        let builder = match n % 3 {
            0 => builder.take_line(LineHandling::ReturnBeforeAdvanceAfter),
            1 => builder.take_line(LineHandling::ReturnAndAdvanceAfter),
            _ => builder.take(usize::from(n)),
        };
        out.push(builder.build().unwrap());
    }
    out
}

/// Applies `op` and renders everything observable about its outcome.
fn apply<S: CharSource>(scanner: &mut BufferedScanner<S>, queries: &[Query], op: &Op) -> String {
    let name = |n: &u8| SAVEPOINT_NAMES[usize::from(*n) % SAVEPOINT_NAMES.len()];
    let outcome = match op {
        Op::Read => format!("{:?}", scanner.read()),
        Op::ReadBlock(n) => format!("{:?}", scanner.read_block(usize::from(*n))),
        Op::PeekBlock(n) => format!("{:?}", scanner.peek_block(usize::from(*n))),
        Op::Save(n) => {
            scanner.save_position(name(n));
            String::new()
        }
        Op::Load(n) => format!("{:?}", scanner.load_position(name(n))),
        Op::Forget(n) => format!("{:?}", scanner.forget_position(name(n))),
        Op::PeekQuery(n) => {
            format!("{:?}", scanner.peek_query_pieces(&queries[usize::from(*n) % queries.len()]))
        }
        Op::ReadQuery(n) => {
            format!("{:?}", scanner.read_query_pieces(&queries[usize::from(*n) % queries.len()]))
        }
    };
    format!("{outcome} @ {:?} {:?}", scanner.position(), scanner.peek())
}

fn scanner(input: Input) {
    let queries = queries();
    let options = ScannerOptions {
        batch_size: NonZeroUsize::MIN.saturating_add(usize::from(input.batch % 16)),
        ..ScannerOptions::default()
    };

    let mut streamed = BufferedScanner::with_options(StrSource::new(&input.text), options).unwrap();
    let mut in_memory = BufferedScanner::from_text(&input.text);

    for op in &input.ops {
        let a = apply(&mut streamed, &queries, op);
        let b = apply(&mut in_memory, &queries, op);
        assert_eq!(a, b, "diverged on {op:?}");
    }
}

fuzz_target!(|input: Input| scanner(input));
