//! A small INI lexer built from declarative scan queries.
//!
//! The lexer recognizes three kinds of lines:
//!
//! ```text
//! [section]
//! key = value
//! ; comment
//! ```
//!
//! Each kind is one [`Query`]. The lexer tries them in turn at every line
//! start: `Assume` on the leading entry means "this is not my kind of line,
//! try the next query", while `Expect` on later entries turns a malformed
//! line (say, a section header missing its `]`) into an error that carries
//! the exact line and column.
//!
//! Input is read from `stdin` through a streaming reader, so memory use stays
//! bounded however large the file is:
//!
//! ```bash
//! printf '[server]\nhost = example.org\n' | cargo run -p textscan --example ini_lexer
//! ```
#![allow(missing_docs)]

use std::io::{self, Write as _};

use textscan::{
    BufferedScanner, CharSource, CheckMode, LineHandling, Query, QueryBuilder, ScanError,
};

enum Token {
    Section(String),
    Pair(String, String),
    Comment(String),
}

struct Lexer<S> {
    scanner: BufferedScanner<S>,
    section: Query,
    pair: Query,
    comment: Query,
}

impl<S: CharSource> Lexer<S> {
    fn new(scanner: BufferedScanner<S>) -> Result<Self, ScanError> {
        let section = QueryBuilder::new()
            .take_string(["["])
            .check_any(CheckMode::Assume)
            .skip_then()
            .take_while(|c: char| c != ']' && c != '\n' && c != '\r')
            .check_any(CheckMode::Expect)
            .append_then()
            .take_string(["]"])
            .check_any(CheckMode::Expect)
            .skip_then()
            .build()?;
        let pair = QueryBuilder::new()
            .take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '.')
            .check_any(CheckMode::Assume)
            .append_then()
            .take_while(|c: char| c == ' ' || c == '\t')
            .skip_then()
            .take_string(["=", ":"])
            .check_any(CheckMode::Expect)
            .skip_then()
            .take_while(|c: char| c == ' ' || c == '\t')
            .skip_then()
            .take_line(LineHandling::ReturnBeforeAdvanceAfter)
            .check_result(|_: &str| true, CheckMode::Expect)
            .append_then()
            .build()?;
        let comment = QueryBuilder::new()
            .take_string([";", "#"])
            .check_any(CheckMode::Assume)
            .skip_then()
            .take_line(LineHandling::ReturnBeforeAdvanceAfter)
            .check_result(|_: &str| true, CheckMode::Try)
            .append_then()
            .build()?;
        Ok(Self {
            scanner,
            section,
            pair,
            comment,
        })
    }

    /// Returns the next token with the position it started at.
    fn next_token(&mut self) -> Result<Option<(textscan::Position, Token)>, ScanError> {
        loop {
            self.scanner.read_while(&char::is_whitespace)?;
            if self.scanner.is_end_of_text() {
                return Ok(None);
            }
            let at = self.scanner.position();

            if let Some(name) = self.scanner.read_query(&self.section)? {
                return Ok(Some((at, Token::Section(name))));
            }
            if let Some(text) = self.scanner.read_query(&self.comment)? {
                return Ok(Some((at, Token::Comment(text))));
            }
            if let Some(mut kv) = self.scanner.read_query_pieces(&self.pair)? {
                let value = kv.pop().unwrap_or_default();
                let key = kv.pop().unwrap_or_default();
                return Ok(Some((at, Token::Pair(key, value))));
            }

            // Not a recognized line: skip it.
            self.scanner.read_while(&|c: char| c != '\n')?;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scanner = BufferedScanner::from_reader(io::stdin().lock())?;
    let mut lexer = Lexer::new(scanner)?;
    let mut out = io::stdout().lock();

    while let Some((at, token)) = lexer.next_token()? {
        match token {
            Token::Section(name) => writeln!(out, "{at}\tsection  {name}")?,
            Token::Pair(key, value) => writeln!(out, "{at}\tpair     {key} = {value:?}")?,
            Token::Comment(text) => writeln!(out, "{at}\tcomment  {}", text.trim())?,
        }
    }
    Ok(())
}
