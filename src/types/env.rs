use std::collections::HashMap;
use std::rc::Rc;

use super::ty::Type;

/// Name to type bindings the checker resolves identifiers against.
///
/// Scopes are immutable: [`TypedScope::extend`] returns a child overlay
/// that falls back to its parent.
#[derive(Debug, Clone, Default)]
pub struct TypedScope {
    bindings: Rc<HashMap<String, Type>>,
    parent: Option<Rc<TypedScope>>,
}

impl TypedScope {
    pub fn empty() -> Self {
        TypedScope::default()
    }

    pub fn with_bindings(bindings: impl IntoIterator<Item = (String, Type)>) -> Self {
        TypedScope {
            bindings: Rc::new(bindings.into_iter().collect()),
            parent: None,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.bindings
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    pub fn extend(&self, name: impl Into<String>, ty: Type) -> TypedScope {
        self.extend_many([(name.into(), ty)])
    }

    pub fn extend_many(&self, bindings: impl IntoIterator<Item = (String, Type)>) -> TypedScope {
        TypedScope {
            bindings: Rc::new(bindings.into_iter().collect()),
            parent: Some(Rc::new(self.clone())),
        }
    }

    /// Names bound directly in this scope, not in its parents.
    pub fn local_names(&self) -> impl Iterator<Item = &String> {
        self.bindings.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scope() {
        let scope = TypedScope::empty();
        assert!(scope.lookup("x").is_none());
    }

    #[test]
    fn test_with_bindings() {
        let scope = TypedScope::with_bindings([("x".to_string(), Type::Integer)]);
        assert_eq!(scope.lookup("x"), Some(&Type::Integer));
    }

    #[test]
    fn test_child_shadows_parent() {
        let parent = TypedScope::with_bindings([("x".to_string(), Type::Integer)]);
        let child = parent.extend("x", Type::String);
        assert_eq!(child.lookup("x"), Some(&Type::String));
        assert_eq!(parent.lookup("x"), Some(&Type::Integer));
    }

    #[test]
    fn test_parent_lookup() {
        let parent = TypedScope::with_bindings([("x".to_string(), Type::Integer)]);
        let child = parent.extend("y", Type::Float);
        assert_eq!(child.lookup("x"), Some(&Type::Integer));
        assert!(parent.lookup("y").is_none());
        assert_eq!(child.local_names().count(), 1);
    }
}
