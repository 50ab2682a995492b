use std::collections::BTreeMap;

use super::subtype::{is_subtype, make_union_type};
use super::ty::Type;

/// Evidence gathered for generic variables during a call: each name maps to
/// the union of all concrete types seen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericMap(BTreeMap<String, Type>);

impl GenericMap {
    pub fn new() -> Self {
        GenericMap(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record `ty` for `name`, merging with earlier evidence.
    pub fn insert(&mut self, name: &str, ty: Type) {
        let merged = match self.0.remove(name) {
            Some(previous) => make_union_type([previous, ty]),
            None => ty,
        };
        self.0.insert(name.to_string(), merged);
    }

    pub fn merge(&mut self, other: GenericMap) {
        for (name, ty) in other.0 {
            self.insert(&name, ty);
        }
    }

    pub fn apply(&self, ty: &Type) -> Type {
        apply_generic_map(ty, self)
    }
}

impl FromIterator<(String, Type)> for GenericMap {
    fn from_iter<I: IntoIterator<Item = (String, Type)>>(iter: I) -> Self {
        let mut map = GenericMap::new();
        for (name, ty) in iter {
            map.insert(&name, ty);
        }
        map
    }
}

/// Walk `generic` and `concrete` in lock-step and record which concrete type
/// each generic leaf lines up with.
pub fn create_generic_map(generic: &Type, concrete: &Type) -> GenericMap {
    let mut map = GenericMap::new();
    collect(generic, concrete, &mut map);
    map
}

fn collect(generic: &Type, concrete: &Type, map: &mut GenericMap) {
    match (generic, concrete) {
        (Type::Generic { name, .. }, _) => {
            if !concrete.has_generics() {
                map.insert(name, concrete.clone());
            }
        }
        (
            Type::Array {
                element: Some(generic_element),
            },
            Type::Array {
                element: Some(concrete_element),
            },
        ) => collect(generic_element, concrete_element, map),
        (
            Type::Function {
                args: generic_args,
                ret: generic_ret,
            },
            Type::Function {
                args: concrete_args,
                ret: concrete_ret,
            },
        ) => {
            if generic_args.len() == concrete_args.len() {
                for (generic_arg, concrete_arg) in generic_args.iter().zip(concrete_args) {
                    collect(generic_arg, concrete_arg, map);
                }
            }
            collect(generic_ret, concrete_ret, map);
        }
        (Type::Union { types }, _) => {
            let (generic_members, fixed_members): (Vec<&Type>, Vec<&Type>) =
                types.iter().partition(|member| member.has_generics());
            let concrete_members: Vec<&Type> = match concrete {
                Type::Union { types } => types.iter().collect(),
                other => vec![other],
            };
            // members already covered by a fixed alternative are no evidence
            for concrete_member in concrete_members {
                if fixed_members
                    .iter()
                    .any(|fixed| is_subtype(fixed, concrete_member))
                {
                    continue;
                }
                for generic_member in &generic_members {
                    collect(generic_member, concrete_member, map);
                }
            }
        }
        (
            Type::Record {
                fields: generic_fields,
            },
            Type::Record {
                fields: concrete_fields,
            },
        ) => {
            for (name, generic_field) in generic_fields {
                if let Some(concrete_field) = concrete_fields.get(name) {
                    collect(generic_field, concrete_field, map);
                }
            }
        }
        _ => {}
    }
}

/// Substitute every generic leaf of `ty` that `map` has evidence for.
pub fn apply_generic_map(ty: &Type, map: &GenericMap) -> Type {
    match ty {
        Type::Generic { name, .. } => map.get(name).cloned().unwrap_or_else(|| ty.clone()),
        Type::Array {
            element: Some(element),
        } => Type::array(apply_generic_map(element, map)),
        Type::Function { args, ret } => Type::function(
            args.iter().map(|arg| apply_generic_map(arg, map)).collect(),
            apply_generic_map(ret, map),
        ),
        Type::Union { types } => {
            make_union_type(types.iter().map(|member| apply_generic_map(member, map)))
        }
        Type::Record { fields } => Type::record(
            fields
                .iter()
                .map(|(name, field)| (name.clone(), apply_generic_map(field, map))),
        ),
        Type::Integer
        | Type::Float
        | Type::String
        | Type::Boolean
        | Type::None
        | Type::Array { element: None } => ty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> Type {
        Type::generic("T")
    }

    #[test]
    fn test_generic_leaf() {
        let map = create_generic_map(&t(), &Type::Integer);
        assert_eq!(map.get("T"), Some(&Type::Integer));
    }

    #[test]
    fn test_array_element() {
        let map = create_generic_map(&Type::array(t()), &Type::array(Type::String));
        assert_eq!(map.get("T"), Some(&Type::String));
    }

    #[test]
    fn test_empty_array_gives_no_evidence() {
        let map = create_generic_map(&Type::array(t()), &Type::empty_array());
        assert!(map.is_empty());
    }

    #[test]
    fn test_function_arguments_and_return() {
        let generic = Type::function(vec![t()], Type::generic("U"));
        let concrete = Type::function(vec![Type::Float], Type::Boolean);
        let map = create_generic_map(&generic, &concrete);
        assert_eq!(map.get("T"), Some(&Type::Float));
        assert_eq!(map.get("U"), Some(&Type::Boolean));
    }

    #[test]
    fn test_union_with_fixed_member() {
        let generic = make_union_type([t(), Type::None]);
        let map = create_generic_map(&generic, &Type::Integer);
        assert_eq!(map.get("T"), Some(&Type::Integer));

        let map = create_generic_map(&generic, &Type::None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_repeated_evidence_is_merged() {
        let mut map = create_generic_map(&t(), &Type::Float);
        map.merge(create_generic_map(&t(), &Type::Integer));
        assert_eq!(map.get("T"), Some(&Type::Float));

        let mut map = create_generic_map(&t(), &Type::Integer);
        map.merge(create_generic_map(&t(), &Type::Float));
        assert_eq!(map.get("T"), Some(&Type::Float));
    }

    #[test]
    fn test_apply_substitutes_and_leaves_unmapped() {
        let map: GenericMap = [("T".to_string(), Type::Integer)].into_iter().collect();
        let ty = Type::function(vec![t(), Type::generic("U")], Type::array(t()));
        assert_eq!(
            map.apply(&ty),
            Type::function(
                vec![Type::Integer, Type::generic("U")],
                Type::array(Type::Integer)
            )
        );
    }

    #[test]
    fn test_apply_renormalizes_unions() {
        let map: GenericMap = [("T".to_string(), Type::Integer)].into_iter().collect();
        let ty = make_union_type([t(), Type::Float]);
        assert_eq!(map.apply(&ty), Type::Float);
    }
}
