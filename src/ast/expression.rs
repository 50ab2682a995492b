use lachs::Span;

use crate::lexer::Token;
use crate::message::Message;

/// An expression tree, generic over the per-node annotation `T`.
///
/// The parser produces `Expression<()>`; the type checker rebuilds the tree
/// as `Expression<TypeInfo>` with the result type of every node attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression<T> {
    Identifier(Identifier<T>),
    Integer(Integer<T>),
    Float(Float<T>),
    String(StringLiteral<T>),
    Boolean(Boolean<T>),
    Array(Array<T>),
    FunctionCall(FunctionCall<T>),
    None(NoneLiteral<T>),
    Unrecognized(Unrecognized<T>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier<T> {
    pub name: String,
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Integer<T> {
    pub value: i64,
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Float<T> {
    pub value: f64,
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral<T> {
    pub value: String,
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boolean<T> {
    pub value: bool,
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    pub elements: Vec<Expression<T>>,
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

/// A call of `callee` with positional arguments.
///
/// A `None` argument is a placeholder (`_`): the slot stays open and the
/// call produces a partially applied function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall<T> {
    pub callee: Box<Expression<T>>,
    pub args: Vec<Option<Expression<T>>>,
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoneLiteral<T> {
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

/// Tokens no grammar rule could consume.
#[derive(Debug, Clone, PartialEq)]
pub struct Unrecognized<T> {
    pub tokens: Vec<Token>,
    pub position: Span,
    pub messages: Vec<Message>,
    pub info: T,
}

impl<T> Expression<T> {
    pub fn position(&self) -> &Span {
        match self {
            Expression::Identifier(node) => &node.position,
            Expression::Integer(node) => &node.position,
            Expression::Float(node) => &node.position,
            Expression::String(node) => &node.position,
            Expression::Boolean(node) => &node.position,
            Expression::Array(node) => &node.position,
            Expression::FunctionCall(node) => &node.position,
            Expression::None(node) => &node.position,
            Expression::Unrecognized(node) => &node.position,
        }
    }

    /// The tokens of `tokens` that lie inside this node's source range.
    ///
    /// `tokens` is the full stream the tree was parsed from. Parentheses
    /// around a node are not part of it.
    pub fn consumed_tokens<'a>(&self, tokens: &'a [Token]) -> Vec<&'a Token> {
        let position = self.position();
        tokens
            .iter()
            .filter(|token| {
                let span = token.pos();
                span.start >= position.start && span.end <= position.end
            })
            .collect()
    }

    pub fn info(&self) -> &T {
        match self {
            Expression::Identifier(node) => &node.info,
            Expression::Integer(node) => &node.info,
            Expression::Float(node) => &node.info,
            Expression::String(node) => &node.info,
            Expression::Boolean(node) => &node.info,
            Expression::Array(node) => &node.info,
            Expression::FunctionCall(node) => &node.info,
            Expression::None(node) => &node.info,
            Expression::Unrecognized(node) => &node.info,
        }
    }

    /// Messages attached to this node only.
    pub fn messages(&self) -> &[Message] {
        match self {
            Expression::Identifier(node) => &node.messages,
            Expression::Integer(node) => &node.messages,
            Expression::Float(node) => &node.messages,
            Expression::String(node) => &node.messages,
            Expression::Boolean(node) => &node.messages,
            Expression::Array(node) => &node.messages,
            Expression::FunctionCall(node) => &node.messages,
            Expression::None(node) => &node.messages,
            Expression::Unrecognized(node) => &node.messages,
        }
    }

    pub fn messages_mut(&mut self) -> &mut Vec<Message> {
        match self {
            Expression::Identifier(node) => &mut node.messages,
            Expression::Integer(node) => &mut node.messages,
            Expression::Float(node) => &mut node.messages,
            Expression::String(node) => &mut node.messages,
            Expression::Boolean(node) => &mut node.messages,
            Expression::Array(node) => &mut node.messages,
            Expression::FunctionCall(node) => &mut node.messages,
            Expression::None(node) => &mut node.messages,
            Expression::Unrecognized(node) => &mut node.messages,
        }
    }

    /// All messages of this node and its descendants, children before parents.
    pub fn all_messages(&self) -> Vec<Message> {
        let mut collected = Vec::new();
        self.collect_messages(&mut collected);
        collected
    }

    fn collect_messages(&self, collected: &mut Vec<Message>) {
        match self {
            Expression::Array(array) => {
                for element in &array.elements {
                    element.collect_messages(collected);
                }
            }
            Expression::FunctionCall(call) => {
                call.callee.collect_messages(collected);
                for arg in call.args.iter().flatten() {
                    arg.collect_messages(collected);
                }
            }
            _ => {}
        }
        collected.extend(self.messages().iter().cloned());
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Expression::Unrecognized(_))
    }
}
