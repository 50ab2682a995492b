//! Shared parsing of delimited lists: array literals, call arguments and
//! index/slice components.

use lachs::Span;

use crate::ast::UntypedExpression;
use crate::lexer::Token;
use crate::message::Message;
use crate::parser::state::{ParseResult, ParseState};

pub struct ListSyntax {
    pub separator: fn(&Token) -> bool,
    pub close: fn(&Token) -> bool,
    pub closing: &'static str,
    /// Empty components (`[:3]`) become `None` items instead of diagnostics.
    pub allow_empty: bool,
}

impl ListSyntax {
    pub fn array() -> Self {
        ListSyntax {
            separator: |t| matches!(t, Token::Comma(_)),
            close: |t| matches!(t, Token::RBracket(_)),
            closing: "]",
            allow_empty: false,
        }
    }

    pub fn arguments() -> Self {
        ListSyntax {
            separator: |t| matches!(t, Token::Comma(_)),
            close: |t| matches!(t, Token::RParen(_)),
            closing: ")",
            allow_empty: false,
        }
    }

    pub fn slice() -> Self {
        ListSyntax {
            separator: |t| matches!(t, Token::Colon(_)),
            close: |t| matches!(t, Token::RBracket(_)),
            closing: "]",
            allow_empty: true,
        }
    }
}

pub struct ParsedList {
    pub items: Vec<Option<UntypedExpression>>,
    pub separators: usize,
    pub messages: Vec<Message>,
    /// Span of the closing token, or of the last consumed token when it is missing.
    pub end: Span,
}

/// list := element (separator element)* close
///
/// The opening token is already consumed. Malformed lists are recovered:
/// a missing separator, a stray separator and a missing closing token each
/// produce one diagnostic while the items parsed so far are kept.
pub fn parse_list(
    state: &mut ParseState,
    syntax: &ListSyntax,
    open: &Span,
    element: fn(&mut ParseState) -> ParseResult<Option<UntypedExpression>>,
) -> ParsedList {
    let mut items = vec![];
    let mut messages = vec![];
    let mut separators = 0;
    let mut end = open.clone();
    let mut expecting_item = true;
    // last separator not yet reported and not yet followed by an item
    let mut dangling_separator: Option<Span> = None;

    loop {
        let Some(token) = state.peek() else {
            messages.push(Message::error(
                format!("Missing closing '{}'", syntax.closing),
                &open.merge(&end),
            ));
            break;
        };

        if (syntax.close)(token) {
            let position = token.pos();
            if expecting_item && separators > 0 {
                if syntax.allow_empty {
                    items.push(None);
                } else if let Some(separator) = dangling_separator.take() {
                    messages.push(Message::error("Unexpected separator", &separator));
                }
            }
            state.advance();
            end = position;
            break;
        }

        if (syntax.separator)(token) {
            let position = token.pos();
            state.advance();
            if expecting_item {
                if syntax.allow_empty {
                    items.push(None);
                } else {
                    messages.push(Message::error("Unexpected separator", &position));
                }
                dangling_separator = None;
            } else {
                dangling_separator = Some(position.clone());
            }
            separators += 1;
            expecting_item = true;
            end = position;
            continue;
        }

        let item_start = token.pos();
        let start = state.position();
        match element(state) {
            Ok(item) => {
                if !expecting_item {
                    messages.push(Message::error(
                        "Missing separator between items",
                        &item_start,
                    ));
                }
                if let Some(last) = state.previous_span() {
                    end = last;
                }
                items.push(item);
                expecting_item = false;
                dangling_separator = None;
            }
            Err(_) => {
                state.restore(start);
                messages.push(Message::error(
                    format!("Missing closing '{}'", syntax.closing),
                    &open.merge(&end),
                ));
                break;
            }
        }
    }

    ParsedList {
        items,
        separators,
        messages,
        end,
    }
}
