//! Statement splitting
//!
//! Splits script text on `;` while respecting string literals, quoted
//! identifiers and comments. Procedural blocks (`BEGIN ... END;`,
//! `DECLARE ...`, `CREATE OR REPLACE PROCEDURE ...`) contain semicolons of
//! their own and run until a line holding only `/`, the console's alternate
//! terminator, or the end of the script. A `/` line after an ordinary
//! statement terminates it the same way `;` would.

use crate::directive::DirectiveSet;
use crate::lexer::{Region, Scanner};
use serde::{Deserialize, Serialize};

/// One executable unit of a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement text without its terminator
    pub text: String,
    /// 1-based line of the statement's first character in the script
    pub line: usize,
}

/// Splits scripts into statements, dropping console directives
#[derive(Debug, Clone, Default)]
pub struct ScriptSplitter {
    directives: DirectiveSet,
}

/// Split with the default directive set
pub fn split_statements(script: &str) -> Vec<Statement> {
    ScriptSplitter::default().split(script)
}

impl ScriptSplitter {
    pub fn new(directives: DirectiveSet) -> Self {
        Self { directives }
    }

    pub fn split(&self, script: &str) -> Vec<Statement> {
        let lines = LineIndex::new(script);
        let mut statements = Vec::new();
        let mut scanner = Scanner::new(script);

        // byte offset of the current statement's first code or literal character
        let mut start: Option<usize> = None;
        let mut in_block = false;
        let mut at_line_start = true;

        let mut flush = |start: &mut Option<usize>, end: usize| {
            if let Some(begin) = start.take() {
                let text = script[begin..end].trim_end();
                if !text.is_empty() {
                    statements.push(Statement {
                        text: text.to_string(),
                        line: lines.line_of(begin),
                    });
                }
            }
        };

        loop {
            if at_line_start && scanner.in_code() {
                let line = scanner.rest_of_line();
                let trimmed = line.trim();
                if trimmed == "/" {
                    flush(&mut start, scanner.position());
                    in_block = false;
                    scanner.skip_line();
                    continue;
                }
                if start.is_none() && self.directives.is_directive(trimmed) {
                    scanner.skip_line();
                    continue;
                }
            }

            let Some(scanned) = scanner.next() else {
                break;
            };
            at_line_start = scanned.ch == '\n';

            if scanned.region == Region::Comment || scanned.ch.is_whitespace() {
                continue;
            }

            if scanned.region == Region::Literal {
                start.get_or_insert(scanned.index);
                continue;
            }

            if scanned.ch == ';' {
                match start {
                    None => {}
                    Some(_) if in_block => {}
                    Some(begin) if is_block_start(&script[begin..scanned.index]) => {
                        in_block = true;
                    }
                    Some(_) => flush(&mut start, scanned.index),
                }
                continue;
            }

            if start.is_none() {
                start = Some(scanned.index);
            }
        }

        flush(&mut start, script.len());
        statements
    }
}

/// Whether statement text up to its first `;` opens a procedural block
fn is_block_start(head: &str) -> bool {
    let words: Vec<String> = head
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .take(6)
        .map(str::to_ascii_uppercase)
        .collect();

    match words.first().map(String::as_str) {
        Some("DECLARE") => true,
        // `BEGIN;` and `BEGIN TRANSACTION` open transactions, not blocks
        Some("BEGIN") => !matches!(
            words.get(1).map(String::as_str),
            None | Some("TRANSACTION" | "WORK" | "DEFERRED" | "IMMEDIATE" | "EXCLUSIVE")
        ),
        Some("CREATE") => {
            let mut rest = words[1..].iter().map(String::as_str).peekable();
            if rest.peek() == Some(&"OR") {
                rest.next();
                rest.next(); // REPLACE
            }
            if matches!(rest.peek(), Some(&"EDITIONABLE" | &"NONEDITIONABLE")) {
                rest.next();
            }
            matches!(
                rest.next(),
                Some("PROCEDURE" | "FUNCTION" | "PACKAGE" | "TRIGGER" | "TYPE")
            )
        }
        _ => false,
    }
}

/// Byte offset to line number lookup
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset)
    }
}
