use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A structural type.
///
/// `Union` values built through [`super::make_union_type`] are normalized:
/// flat, free of subsumed members, canonically sorted and never singletons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Type {
    Integer,
    Float,
    String,
    Boolean,
    None,
    /// `element: None` is the type of the empty array literal.
    Array {
        element: Option<Box<Type>>,
    },
    Function {
        args: Vec<Type>,
        ret: Box<Type>,
    },
    Union {
        types: Vec<Type>,
    },
    Generic {
        name: String,
        derives: Option<Box<Type>>,
    },
    Record {
        fields: BTreeMap<String, Type>,
    },
}

impl Type {
    pub fn array(element: Type) -> Self {
        Type::Array {
            element: Some(Box::new(element)),
        }
    }

    pub fn empty_array() -> Self {
        Type::Array { element: None }
    }

    pub fn function(args: Vec<Type>, ret: Type) -> Self {
        Type::Function {
            args,
            ret: Box::new(ret),
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Type::Generic {
            name: name.into(),
            derives: None,
        }
    }

    pub fn constrained(name: impl Into<String>, derives: Type) -> Self {
        Type::Generic {
            name: name.into(),
            derives: Some(Box::new(derives)),
        }
    }

    pub fn record(fields: impl IntoIterator<Item = (String, Type)>) -> Self {
        Type::Record {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    /// Whether a generic variable occurs anywhere inside this type.
    pub fn has_generics(&self) -> bool {
        match self {
            Type::Integer | Type::Float | Type::String | Type::Boolean | Type::None => false,
            Type::Array { element } => element.as_ref().is_some_and(|e| e.has_generics()),
            Type::Function { args, ret } => {
                args.iter().any(Type::has_generics) || ret.has_generics()
            }
            Type::Union { types } => types.iter().any(Type::has_generics),
            Type::Generic { .. } => true,
            Type::Record { fields } => fields.values().any(Type::has_generics),
        }
    }

    pub fn pretty(&self) -> String {
        match self {
            Type::Integer => "Integer".to_string(),
            Type::Float => "Float".to_string(),
            Type::String => "String".to_string(),
            Type::Boolean => "Boolean".to_string(),
            Type::None => "None".to_string(),
            Type::Array { element: None } => "[]".to_string(),
            Type::Array {
                element: Some(element),
            } => format!("[{}]", element.pretty()),
            Type::Function { args, ret } => {
                let args = args.iter().map(Type::pretty).collect::<Vec<_>>();
                format!("({}) -> {}", args.join(", "), ret.pretty())
            }
            Type::Union { types } => types
                .iter()
                .map(|t| {
                    if t.is_function() {
                        format!("({})", t.pretty())
                    } else {
                        t.pretty()
                    }
                })
                .collect::<Vec<_>>()
                .join(" | "),
            Type::Generic {
                name,
                derives: None,
            } => name.clone(),
            Type::Generic {
                name,
                derives: Some(derives),
            } => format!("{name}: {}", derives.pretty()),
            Type::Record { fields } => {
                let fields = fields
                    .iter()
                    .map(|(name, ty)| format!("{name}: {}", ty.pretty()))
                    .collect::<Vec<_>>();
                format!("{{{}}}", fields.join(", "))
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}
