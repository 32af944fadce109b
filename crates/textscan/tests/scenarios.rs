#![allow(missing_docs)]

use core::fmt::Write;

use textscan::{BufferedScanner, CharSource, CheckMode, LineHandling, Query, QueryBuilder};

struct Queries {
    section: Query,
    comment: Query,
    pair: Query,
}

fn queries() -> Queries {
    let section = QueryBuilder::new()
        .take_string(["["])
        .check_any(CheckMode::Assume)
        .skip_then()
        .take_while(|c: char| c != ']' && c != '\n')
        .check_any(CheckMode::Expect)
        .append_then()
        .take_string(["]"])
        .check_any(CheckMode::Expect)
        .skip_then()
        .build()
        .unwrap();
    let comment = QueryBuilder::new()
        .take_string([";", "#"])
        .check_any(CheckMode::Assume)
        .skip_then()
        .take_line(LineHandling::ReturnBeforeAdvanceAfter)
        .append_then()
        .build()
        .unwrap();
    let pair = QueryBuilder::new()
        .take_while(char::is_alphanumeric)
        .check_any(CheckMode::Assume)
        .append_then()
        .take_while(|c: char| c == ' ')
        .skip_then()
        .take_string(["="])
        .check_any(CheckMode::Expect)
        .skip_then()
        .take_while(|c: char| c == ' ')
        .skip_then()
        .take_line(LineHandling::default())
        .check_any(CheckMode::Expect)
        .append_then()
        .build()
        .unwrap();
    Queries {
        section,
        comment,
        pair,
    }
}

fn render<S: CharSource>(mut scanner: BufferedScanner<S>) -> String {
    let q = queries();
    let mut out = String::new();
    while !scanner.is_end_of_text() {
        scanner.read_while(&|c: char| c == ' ' || c == '\t').unwrap();
        let at = scanner.position();
        let outcome = if let Some(name) = scanner.read_query(&q.section).unwrap() {
            writeln!(out, "section {name:?} at {at}")
        } else if let Some(text) = scanner.read_query(&q.comment).unwrap() {
            writeln!(out, "comment {text:?} at {at}")
        } else if let Some(kv) = scanner.read_query_pieces(&q.pair).unwrap() {
            writeln!(out, "pair {:?} {:?} at {at}", kv[0], kv[1])
        } else {
            scanner.read().unwrap();
            Ok(())
        };
        outcome.unwrap();
    }
    out
}

#[test]
fn snapshot_ini_tokens() {
    let text = "[server]\nhost = example.org\nport=8080\n\n; note\n";
    insta::assert_snapshot!(render(BufferedScanner::from_text(text)), @r#"
    section "server" at 1:1
    pair "host" "example.org" at 2:1
    pair "port" "8080" at 3:1
    comment " note" at 5:1
    "#);
}

#[test]
fn unterminated_section_reports_where_it_stopped() {
    let mut scanner = BufferedScanner::from_text("[broken\nkey=1");
    let err = scanner.read_query(&queries().section).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"query entry #2 did not match at 1:8");
    assert_eq!(scanner.position().index, 1);
}

#[cfg(feature = "std")]
#[test]
fn reader_input_matches_in_memory_input() {
    struct OneByte<'a>(&'a [u8]);

    impl std::io::Read for OneByte<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let Some((first, rest)) = self.0.split_first() else {
                return Ok(0);
            };
            buf[0] = *first;
            self.0 = rest;
            Ok(1)
        }
    }

    let text = "[żółw]\r\nname = Żółw 🐢\r\n# done\r\n";
    let from_reader = render(BufferedScanner::from_reader(OneByte(text.as_bytes())).unwrap());
    let from_text = render(BufferedScanner::from_text(text));
    assert_eq!(from_reader, from_text);
    insta::assert_snapshot!(from_reader, @r#"
    section "żółw" at 1:1
    pair "name" "Żółw 🐢" at 2:1
    comment " done" at 3:1
    "#);
}
