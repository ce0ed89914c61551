//! Character scanner that knows where code ends and literals or comments begin
//!
//! Shared by the statement splitter and bind detection so both agree on what
//! a quoted `;` or a commented-out `:name` is.

use crate::substitute::is_word_char;

/// What a scanned character belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Region {
    Code,
    Literal,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    SingleQuote,
    DoubleQuote,
    /// `q'[ ... ]'` alternative quoting, holding the closing delimiter
    QQuote(char),
    LineComment,
    BlockComment,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanned {
    pub index: usize,
    pub ch: char,
    pub region: Region,
}

pub(crate) struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    state: State,
    prev: Option<char>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            state: State::Code,
            prev: None,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// True when the next character is outside any literal or comment
    pub fn in_code(&self) -> bool {
        self.state == State::Code
    }

    /// Remainder of the current line, without its newline
    pub fn rest_of_line(&self) -> &'a str {
        let rest = &self.text[self.pos..];
        match rest.find('\n') {
            Some(end) => &rest[..end],
            None => rest,
        }
    }

    /// Jump past the current line without interpreting it
    pub fn skip_line(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.find('\n').map_or(rest.len(), |end| end + 1);
        self.state = State::Code;
        self.prev = Some('\n');
    }

    fn consume(&mut self, c: char) {
        self.pos += c.len_utf8();
    }
}

impl Iterator for Scanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let ch = self.text[self.pos..].chars().next()?;
        let index = self.pos;
        self.consume(ch);
        let rest = &self.text[self.pos..];

        let region = match self.state {
            State::Code => match ch {
                '-' if rest.starts_with('-') => {
                    self.state = State::LineComment;
                    Region::Comment
                }
                '/' if rest.starts_with('*') => {
                    self.consume('*');
                    self.state = State::BlockComment;
                    Region::Comment
                }
                '\'' => {
                    self.state = State::SingleQuote;
                    Region::Literal
                }
                '"' => {
                    self.state = State::DoubleQuote;
                    Region::Literal
                }
                'q' | 'Q' if !self.prev.is_some_and(is_word_char) && rest.starts_with('\'') => {
                    let mut chars = rest.chars().skip(1);
                    match chars.next() {
                        Some(open) if !open.is_whitespace() => {
                            self.consume('\'');
                            self.consume(open);
                            self.state = State::QQuote(closing_delimiter(open));
                            Region::Literal
                        }
                        _ => Region::Code,
                    }
                }
                _ => Region::Code,
            },
            State::SingleQuote => {
                if ch == '\'' {
                    if rest.starts_with('\'') {
                        self.consume('\'');
                    } else {
                        self.state = State::Code;
                    }
                }
                Region::Literal
            }
            State::DoubleQuote => {
                if ch == '"' {
                    self.state = State::Code;
                }
                Region::Literal
            }
            State::QQuote(close) => {
                if ch == close && rest.starts_with('\'') {
                    self.consume('\'');
                    self.state = State::Code;
                }
                Region::Literal
            }
            State::LineComment => {
                if ch == '\n' {
                    self.state = State::Code;
                }
                Region::Comment
            }
            State::BlockComment => {
                if ch == '*' && rest.starts_with('/') {
                    self.consume('/');
                    self.state = State::Code;
                }
                Region::Comment
            }
        };

        self.prev = Some(ch);
        Some(Scanned { index, ch, region })
    }
}

fn closing_delimiter(open: char) -> char {
    match open {
        '[' => ']',
        '(' => ')',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}
