//! Placeholder substitution
//!
//! A placeholder is a sigil (`$`, `:` or `&`) followed by an identifier. It is
//! replaced only when the identifier names a variable in the map and the sigil
//! does not sit inside a larger word: `v$session`, `serial#` and `x:y` style
//! compound tokens are never rewritten.

use crate::variables::VariableMap;
use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[$:&]([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern is valid")
});

/// Placeholder sigils understood by the substitution engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sigil {
    /// Shell style: `$NAME`
    Dollar,
    /// Bind style: `:name`
    Colon,
    /// Console substitution style: `&name` (and `&&name`)
    Ampersand,
}

impl Sigil {
    pub const ALL: [Sigil; 3] = [Sigil::Dollar, Sigil::Colon, Sigil::Ampersand];

    pub fn as_char(self) -> char {
        match self {
            Sigil::Dollar => '$',
            Sigil::Colon => ':',
            Sigil::Ampersand => '&',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '$' => Some(Sigil::Dollar),
            ':' => Some(Sigil::Colon),
            '&' => Some(Sigil::Ampersand),
            _ => None,
        }
    }
}

/// Replace every recognised placeholder whose name is in `variables`.
///
/// Unknown placeholders are left as written. An empty map returns the text
/// unchanged.
pub fn substitute(text: &str, variables: &VariableMap) -> String {
    substitute_with(text, variables, &Sigil::ALL)
}

/// Like [`substitute`], restricted to the given sigils
pub fn substitute_with(text: &str, variables: &VariableMap, sigils: &[Sigil]) -> String {
    if variables.is_empty() || sigils.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let sigil_char = text[whole.start()..].chars().next().unwrap_or_default();
        let Some(sigil) = Sigil::from_char(sigil_char) else {
            continue;
        };
        if !sigils.contains(&sigil) {
            continue;
        }

        let mut start = whole.start();
        match text[..start].chars().next_back() {
            Some(prev) if is_word_char(prev) => continue,
            // `x::int` is a cast, not a bind
            Some(':') if sigil == Sigil::Colon => continue,
            // `&&name` is the define-once form of `&name`
            Some('&') if sigil == Sigil::Ampersand => {
                start -= 1;
                if text[..start].chars().next_back().is_some_and(is_word_char) {
                    continue;
                }
            }
            _ => {}
        }

        let Some(value) = variables.get(name.as_str()) else {
            continue;
        };

        out.push_str(&text[copied_to..start]);
        out.push_str(value);
        copied_to = whole.end();
    }

    out.push_str(&text[copied_to..]);
    out
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
