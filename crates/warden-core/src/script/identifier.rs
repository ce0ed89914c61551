//! Script identifiers
//!
//! An identifier is a `/`-separated path relative to the store root, such as
//! `oracle/performance/top_sql.sql` or just `performance/top_sql.sql`.
//! Parsing rejects anything that could address a file outside the store.

use super::ScriptError;
use std::fmt;
use std::path::PathBuf;

/// A validated, normalised script identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptIdentifier {
    segments: Vec<String>,
}

impl ScriptIdentifier {
    /// Validate `raw` and normalise it to `/`-separated segments.
    ///
    /// Backslashes are accepted as separators. Empty and `.` segments are
    /// dropped. Absolute paths, drive prefixes and `..` segments are errors.
    pub fn parse(raw: &str) -> Result<Self, ScriptError> {
        let invalid = |reason: &str| ScriptError::InvalidIdentifier {
            identifier: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("identifier is empty"));
        }

        let normalized = trimmed.replace('\\', "/");
        if normalized.starts_with('/') {
            return Err(invalid("absolute paths are not allowed"));
        }
        if has_drive_prefix(&normalized) {
            return Err(invalid("drive prefixes are not allowed"));
        }

        let mut segments = Vec::new();
        for segment in normalized.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(invalid("parent directory segments are not allowed")),
                s if s.contains('\0') => return Err(invalid("NUL bytes are not allowed")),
                s => segments.push(s.to_string()),
            }
        }

        if segments.is_empty() {
            return Err(invalid("identifier names no file"));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn first(&self) -> &str {
        &self.segments[0]
    }

    pub fn file_name(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Segments after the first, or `None` for a single-segment identifier
    pub fn tail(&self) -> Option<&[String]> {
        (self.segments.len() > 1).then(|| &self.segments[1..])
    }

    /// Whether the first segment is `namespace`, ignoring ASCII case
    pub fn is_under(&self, namespace: &str) -> bool {
        self.first().eq_ignore_ascii_case(namespace)
    }

    /// Relative filesystem path for this identifier
    pub fn to_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for ScriptIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}
