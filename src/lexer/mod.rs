//! # Tokenizer
//!
//! Source text is scanned with a `lachs` generated lexer. Before scanning,
//! line endings are normalized to `\n` and `--` line comments are blanked out
//! with spaces, so every token keeps the `[line, column]` it has in the
//! original text. The scan either succeeds completely or fails as a whole.

use lachs::Span;
use once_cell::sync::Lazy;
use regex::Captures;

use crate::message::Message;

#[lachs::token]
pub enum Token {
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[terminal("none")]
    NoneLiteral,
    #[terminal("in")]
    In,
    #[terminal("_")]
    Underscore,
    #[literal("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[literal("[0-9]+\\.[0-9]+")]
    FloatLiteral,
    #[literal("[0-9]+")]
    IntegerLiteral,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[terminal("**")]
    DoubleStar,
    #[terminal("*")]
    Star,
    #[terminal("/")]
    Slash,
    #[terminal("%")]
    Percent,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("<=")]
    LessEquals,
    #[terminal("<")]
    LessThan,
    #[terminal(">=")]
    GreaterEquals,
    #[terminal(">")]
    GreaterThan,
    #[terminal("!=")]
    NotEquals,
    #[terminal("=")]
    Equals,
    #[terminal("..")]
    DotDot,
    #[terminal(".")]
    Dot,
    #[terminal("&")]
    Ampersand,
    #[terminal(",")]
    Comma,
    #[terminal(":")]
    Colon,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("[")]
    LBracket,
    #[terminal("]")]
    RBracket,
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::NoneLiteral(inner) => inner.position.clone(),
            Token::In(inner) => inner.position.clone(),
            Token::Underscore(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::FloatLiteral(inner) => inner.position.clone(),
            Token::IntegerLiteral(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::DoubleStar(inner) => inner.position.clone(),
            Token::Star(inner) => inner.position.clone(),
            Token::Slash(inner) => inner.position.clone(),
            Token::Percent(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::LessEquals(inner) => inner.position.clone(),
            Token::LessThan(inner) => inner.position.clone(),
            Token::GreaterEquals(inner) => inner.position.clone(),
            Token::GreaterThan(inner) => inner.position.clone(),
            Token::NotEquals(inner) => inner.position.clone(),
            Token::Equals(inner) => inner.position.clone(),
            Token::DotDot(inner) => inner.position.clone(),
            Token::Dot(inner) => inner.position.clone(),
            Token::Ampersand(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::Colon(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::LBracket(inner) => inner.position.clone(),
            Token::RBracket(inner) => inner.position.clone(),
        }
    }

    /// The exact source text this token was scanned from.
    pub fn text(&self) -> String {
        match self {
            Token::Ident(inner) => inner.value.clone(),
            Token::FloatLiteral(inner) => inner.value.clone(),
            Token::IntegerLiteral(inner) => inner.value.clone(),
            Token::StringLiteral(inner) => inner.value.clone(),
            Token::True(_) => "true".to_string(),
            Token::False(_) => "false".to_string(),
            Token::NoneLiteral(_) => "none".to_string(),
            Token::In(_) => "in".to_string(),
            Token::Underscore(_) => "_".to_string(),
            Token::DoubleStar(_) => "**".to_string(),
            Token::Star(_) => "*".to_string(),
            Token::Slash(_) => "/".to_string(),
            Token::Percent(_) => "%".to_string(),
            Token::Plus(_) => "+".to_string(),
            Token::Minus(_) => "-".to_string(),
            Token::LessEquals(_) => "<=".to_string(),
            Token::LessThan(_) => "<".to_string(),
            Token::GreaterEquals(_) => ">=".to_string(),
            Token::GreaterThan(_) => ">".to_string(),
            Token::NotEquals(_) => "!=".to_string(),
            Token::Equals(_) => "=".to_string(),
            Token::DotDot(_) => "..".to_string(),
            Token::Dot(_) => ".".to_string(),
            Token::Ampersand(_) => "&".to_string(),
            Token::Comma(_) => ",".to_string(),
            Token::Colon(_) => ":".to_string(),
            Token::LParen(_) => "(".to_string(),
            Token::RParen(_) => ")".to_string(),
            Token::LBracket(_) => "[".to_string(),
            Token::RBracket(_) => "]".to_string(),
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::FloatLiteral(inner) => format!("float '{}'", inner.value),
            Token::IntegerLiteral(inner) => format!("integer '{}'", inner.value),
            Token::StringLiteral(inner) => format!("string {}", inner.value),
            other => format!("'{}'", other.text()),
        }
    }
}

static COMMENT_OR_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"\\\n]|\\.)*"|--[^\n]*"#).expect("static pattern"));

/// Replace `\r\n` and lone `\r` with `\n`.
pub fn normalize_newlines(source: &str) -> String {
    source.replace("\r\n", "\n").replace('\r', "\n")
}

/// Blank out `--` comments with spaces. String literals are skipped, so a
/// `--` inside quotes stays part of the string.
pub fn strip_comments(source: &str) -> String {
    COMMENT_OR_STRING
        .replace_all(source, |caps: &Captures| {
            let matched = &caps[0];
            if matched.starts_with("--") {
                " ".repeat(matched.chars().count())
            } else {
                matched.to_string()
            }
        })
        .into_owned()
}

/// Tokenize a complete source text.
///
/// Fails as a whole when some character sequence matches no token pattern.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Message> {
    let prepared = strip_comments(&normalize_newlines(source));
    Token::lex(&prepared).map_err(|err| {
        tracing::debug!(%err, "tokenizing failed");
        Message::error(format!("Unrecognized input: {err}"), &Span::default())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comment_keeps_columns() {
        let stripped = strip_comments("1 -- one\n2");
        assert_eq!(stripped, "1       \n2");
    }

    #[test]
    fn test_strip_keeps_dashes_in_strings() {
        let stripped = strip_comments(r#""a -- b" -- gone"#);
        assert_eq!(stripped, r#""a -- b"        "#);
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
    }
}
