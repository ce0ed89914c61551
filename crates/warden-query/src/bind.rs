//! Native bind parameter detection

use crate::lexer::{Region, Scanner};
use crate::substitute::is_word_char;
use crate::variables::VariableMap;
use serde::{Deserialize, Serialize};

/// A variable bound to a statement through `:name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindParam {
    /// Parameter name exactly as written in the statement, without the colon
    pub name: String,
    pub value: String,
}

impl BindParam {
    /// Parameter name with its `:` prefix, as drivers expect it
    pub fn placeholder(&self) -> String {
        format!(":{}", self.name)
    }
}

/// Variables from `variables` that `statement` references as `:name` binds.
///
/// Only code is inspected: a `:name` inside a string literal or comment is
/// not a bind. Each parameter is reported once, in order of first use.
pub fn referenced_binds(statement: &str, variables: &VariableMap) -> Vec<BindParam> {
    if variables.is_empty() {
        return Vec::new();
    }

    let mut binds: Vec<BindParam> = Vec::new();
    let mut prev: Option<char> = None;

    for scanned in Scanner::new(statement) {
        let is_bind_start = scanned.region == Region::Code
            && scanned.ch == ':'
            && !prev.is_some_and(|p| is_word_char(p) || p == ':');
        prev = Some(scanned.ch);
        if !is_bind_start {
            continue;
        }

        let name = identifier_at(&statement[scanned.index + 1..]);
        if name.is_empty() || binds.iter().any(|b| b.name.eq_ignore_ascii_case(name)) {
            continue;
        }
        if let Some(value) = variables.get(name) {
            binds.push(BindParam {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    binds
}

fn identifier_at(text: &str) -> &str {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return "",
    }
    let end = chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(i, _)| i);
    &text[..end]
}
