//! Console directive detection
//!
//! Directives are commands for the engine's interactive console (`SET
//! PAGESIZE 100`, `SPOOL out.txt`, `@other_script`). They configure the client
//! and must be dropped before statements are sent to the server.

use std::collections::HashSet;

/// Keywords that turn `SET ...` back into a server-side statement
const SQL_SET_FORMS: &[&str] = &["TRANSACTION", "ROLE", "CONSTRAINT", "CONSTRAINTS"];

/// Set of leading keywords that mark a console directive line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveSet {
    keywords: HashSet<String>,
}

impl Default for DirectiveSet {
    fn default() -> Self {
        Self::new([
            "ACCEPT", "BREAK", "BTITLE", "CLEAR", "COL", "COLUMN", "COMPUTE", "DEFINE", "DESC",
            "DESCRIBE", "EXIT", "HOST", "PAUSE", "PROMPT", "QUIT", "REM", "REMARK", "SET",
            "SHOW", "SPOOL", "TIMING", "TTITLE", "UNDEFINE", "VARIABLE", "WHENEVER",
        ])
    }
}

impl DirectiveSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_ascii_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// An empty set: nothing is treated as a directive
    pub fn none() -> Self {
        Self {
            keywords: HashSet::new(),
        }
    }

    /// Whether `line` is a console directive.
    ///
    /// Only meaningful for a line that starts a new statement; a `SET` inside
    /// an `UPDATE` is never asked about.
    pub fn is_directive(&self, line: &str) -> bool {
        let line = line.trim();
        if line.starts_with('@') {
            return !self.keywords.is_empty();
        }

        let mut words = line
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|w| !w.is_empty());
        let Some(first) = words.next() else {
            return false;
        };
        let first = first.to_ascii_uppercase();
        if !self.keywords.contains(&first) {
            return false;
        }

        if first == "SET" {
            if let Some(second) = words.next() {
                let second = second.to_ascii_uppercase();
                return !SQL_SET_FORMS.contains(&second.as_str());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("SET PAGESIZE 100", true ; "set option")]
    #[test_case("set linesize 200;", true ; "lowercase with terminator")]
    #[test_case("  SPOOL /tmp/out.txt", true ; "indented spool")]
    #[test_case("@@child.sql", true ; "nested script call")]
    #[test_case("PROMPT it's running", true ; "prompt with quote")]
    #[test_case("SET TRANSACTION READ ONLY", false ; "set transaction is sql")]
    #[test_case("set role dba", false ; "set role is sql")]
    #[test_case("SELECT 1 FROM dual", false ; "select")]
    #[test_case("SETTINGS", false ; "keyword prefix only")]
    #[test_case("", false ; "blank")]
    fn detects_directives(line: &str, expected: bool) {
        assert_eq!(DirectiveSet::default().is_directive(line), expected);
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        let set = DirectiveSet::new(["go"]);
        assert!(set.is_directive("GO"));
        assert!(!set.is_directive("SET ECHO OFF"));
    }

    #[test]
    fn empty_set_matches_nothing() {
        assert!(!DirectiveSet::none().is_directive("@script.sql"));
        assert!(!DirectiveSet::none().is_directive("SET ECHO OFF"));
    }
}
