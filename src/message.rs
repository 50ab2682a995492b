//! # Diagnostics
//!
//! Every stage of the pipeline reports problems as [`Message`]s instead of
//! aborting. A message carries a severity, a human readable text and the
//! source range it refers to. Only `Error` level messages block compilation.

use std::fmt;

use lachs::Span;
use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A `[line, column]` pair, as reported by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<(usize, usize)> for Location {
    fn from((line, column): (usize, usize)) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub level: Level,
    pub text: String,
    pub begin: Location,
    pub end: Location,
}

impl Message {
    pub fn new(level: Level, text: impl Into<String>, span: &Span) -> Self {
        Message {
            level,
            text: text.into(),
            begin: span.start.into(),
            end: span.end.into(),
        }
    }

    pub fn error(text: impl Into<String>, span: &Span) -> Self {
        Message::new(Level::Error, text, span)
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level = match self.level {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        write!(f, "{level} at {}-{}: {}", self.begin, self.end, self.text)
    }
}

/// True when at least one message blocks compilation.
pub fn has_errors<'a>(messages: impl IntoIterator<Item = &'a Message>) -> bool {
    messages.into_iter().any(Message::is_error)
}
