//! # Scope
//!
//! A [`Scope`] binds names to a type and a lazy value. The checker and the
//! evaluator each see one projection of it: [`Scope::typed`] and
//! [`Scope::evaluation`]. Scopes are immutable; [`Scope::extend`] layers new
//! bindings over an existing scope without touching it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::interpreter::{EvaluationScope, LazyValue, Value};
use crate::stdlib;
use crate::types::{Type, TypedScope};

#[derive(Debug, Clone)]
pub struct Binding {
    pub ty: Type,
    pub value: LazyValue,
}

/// One entry of a library handed to [`convert_to_scope`].
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub ty: Type,
    pub implementation: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: Rc<HashMap<String, Binding>>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    pub fn empty() -> Self {
        Scope::default()
    }

    /// The standard library. Build it once and pass it around.
    pub fn standard() -> Self {
        convert_to_scope(stdlib::standard_library())
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    pub fn extend(&self, bindings: impl IntoIterator<Item = (String, Binding)>) -> Scope {
        Scope {
            bindings: Rc::new(bindings.into_iter().collect()),
            parent: Some(Rc::new(self.clone())),
        }
    }

    /// Layer a single already computed value over this scope.
    pub fn with_value(&self, name: impl Into<String>, ty: Type, value: Value) -> Scope {
        self.extend([(
            name.into(),
            Binding {
                ty,
                value: LazyValue::from_value(value),
            },
        )])
    }

    pub fn typed(&self) -> TypedScope {
        let own = self
            .bindings
            .iter()
            .map(|(name, binding)| (name.clone(), binding.ty.clone()));
        match &self.parent {
            Some(parent) => parent.typed().extend_many(own),
            None => TypedScope::with_bindings(own),
        }
    }

    pub fn evaluation(&self) -> EvaluationScope {
        let own = self
            .bindings
            .iter()
            .map(|(name, binding)| (name.clone(), binding.value.clone()));
        match &self.parent {
            Some(parent) => parent.evaluation().extend_many(own),
            None => EvaluationScope::with_bindings(own),
        }
    }
}

/// Build a root scope from library entries.
pub fn convert_to_scope(library: impl IntoIterator<Item = (String, LibraryEntry)>) -> Scope {
    let bindings = library
        .into_iter()
        .map(|(name, entry)| {
            let binding = Binding {
                ty: entry.ty,
                value: LazyValue::from_value(entry.implementation),
            };
            (name, binding)
        })
        .collect();

    Scope {
        bindings: Rc::new(bindings),
        parent: None,
    }
}

pub fn extract_typed_scope(scope: &Scope) -> TypedScope {
    scope.typed()
}

pub fn extract_evaluation_scope(scope: &Scope) -> EvaluationScope {
    scope.evaluation()
}
