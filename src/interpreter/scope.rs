use std::collections::HashMap;
use std::rc::Rc;

use super::value::LazyValue;

/// Name to value bindings used during evaluation.
///
/// Like the typed scope, an evaluation scope never changes after it is
/// built; [`EvaluationScope::extend`] layers a child over it.
#[derive(Debug, Clone, Default)]
pub struct EvaluationScope {
    bindings: Rc<HashMap<String, LazyValue>>,
    parent: Option<Rc<EvaluationScope>>,
}

impl EvaluationScope {
    pub fn empty() -> Self {
        EvaluationScope::default()
    }

    pub fn with_bindings(bindings: impl IntoIterator<Item = (String, LazyValue)>) -> Self {
        EvaluationScope {
            bindings: Rc::new(bindings.into_iter().collect()),
            parent: None,
        }
    }

    /// Resolve a name by searching from innermost to outermost scope
    pub fn resolve(&self, name: &str) -> Option<LazyValue> {
        self.bindings
            .get(name)
            .cloned()
            .or_else(|| self.parent.as_ref().and_then(|p| p.resolve(name)))
    }

    pub fn extend(&self, name: impl Into<String>, value: LazyValue) -> EvaluationScope {
        self.extend_many([(name.into(), value)])
    }

    pub fn extend_many(
        &self,
        bindings: impl IntoIterator<Item = (String, LazyValue)>,
    ) -> EvaluationScope {
        EvaluationScope {
            bindings: Rc::new(bindings.into_iter().collect()),
            parent: Some(Rc::new(self.clone())),
        }
    }
}
