//! # Standard Library
//!
//! Every builtin is an ordinary curried [`Function`](crate::interpreter::Function)
//! value paired with its type, so `map(sin)` or `take(3)` partially apply
//! like any user-visible function. Operators are builtins named after their
//! symbol (`+`, `..`, `[]`), which is what the parser desugars them to.

mod arithmetic;
mod compose;
mod logic;
mod math;
mod sequence;
mod text;

use crate::interpreter::{EvalResult, LazyValue, Value};
use crate::scope::LibraryEntry;
use crate::types::Type;

pub(crate) use arithmetic::values_equal;

/// Collects library entries; the arity of each function is read off its type.
#[derive(Default)]
pub struct Library {
    entries: Vec<(String, LibraryEntry)>,
}

impl Library {
    pub fn function(
        &mut self,
        name: &str,
        ty: Type,
        implementation: impl Fn(Vec<LazyValue>) -> EvalResult + 'static,
    ) {
        let arity = match &ty {
            Type::Function { args, .. } => args.len(),
            _ => 0,
        };
        self.entries.push((
            name.to_string(),
            LibraryEntry {
                ty,
                implementation: Value::function(name, arity, implementation),
            },
        ));
    }

    pub fn constant(&mut self, name: &str, ty: Type, value: Value) {
        self.entries.push((
            name.to_string(),
            LibraryEntry {
                ty,
                implementation: value,
            },
        ));
    }

    pub fn into_entries(self) -> Vec<(String, LibraryEntry)> {
        self.entries
    }
}

pub fn standard_library() -> Vec<(String, LibraryEntry)> {
    let mut library = Library::default();
    arithmetic::register(&mut library);
    logic::register(&mut library);
    sequence::register(&mut library);
    compose::register(&mut library);
    math::register(&mut library);
    text::register(&mut library);
    tracing::debug!(entries = library.entries.len(), "built standard library");
    library.into_entries()
}

// type shorthands shared by the builtin tables

fn t() -> Type {
    Type::generic("T")
}

fn u() -> Type {
    Type::generic("U")
}

fn v() -> Type {
    Type::generic("V")
}

fn numeric() -> Type {
    Type::constrained("T", Type::Float)
}

fn fun(args: Vec<Type>, ret: Type) -> Type {
    Type::function(args, ret)
}

fn array(element: Type) -> Type {
    Type::array(element)
}
