//! # Subtyping and Union Normalization
//!
//! `is_subtype(base, candidate)` answers whether a value of type `candidate`
//! may be used where `base` is expected. The check is structural and
//! dispatched on the kind of `base`:
//!
//! - `Float` accepts `Integer`, so numeric code written for floats takes
//!   integers too.
//! - `Boolean` accepts numbers, which are truthy when non-zero.
//! - Function parameters are contravariant, return types covariant.
//! - A union candidate is accepted when every member is; a union base
//!   accepts whatever one of its members accepts.
//! - Generics are judged by their `derives` constraint. Unconstrained
//!   generics accept, and are accepted by, anything.

use super::ty::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    /// Numbers are accepted where booleans are expected.
    Truthiness,
    Strict,
}

pub fn is_subtype(base: &Type, candidate: &Type) -> bool {
    check(base, candidate, Coercion::Truthiness)
}

/// Subtyping without the numeric-to-boolean coercion. Unions are normalized
/// with this relation so that `[true, 1]` keeps both member types.
pub fn is_strict_subtype(base: &Type, candidate: &Type) -> bool {
    check(base, candidate, Coercion::Strict)
}

fn check(base: &Type, candidate: &Type, coercion: Coercion) -> bool {
    if base == candidate {
        return true;
    }

    match (base, candidate) {
        (Type::Generic { derives, .. }, _) => match (derives, candidate) {
            (None, _) => true,
            (Some(_), Type::Generic { derives: None, .. }) => true,
            (Some(constraint), Type::Generic {
                derives: Some(own), ..
            }) => check(constraint, own, coercion),
            (Some(constraint), _) => check(constraint, candidate, coercion),
        },
        (_, Type::Generic { derives: None, .. }) => true,
        (_, Type::Generic {
            derives: Some(own), ..
        }) => check(base, own, coercion),
        (_, Type::Union { types }) => types.iter().all(|member| check(base, member, coercion)),
        (Type::Union { types }, _) => types.iter().any(|member| check(member, candidate, coercion)),

        (Type::Integer, _) => matches!(candidate, Type::Integer),
        (Type::Float, _) => matches!(candidate, Type::Integer | Type::Float),
        (Type::Boolean, _) => match candidate {
            Type::Boolean => true,
            Type::Integer | Type::Float => coercion == Coercion::Truthiness,
            _ => false,
        },
        (Type::String, _) => matches!(candidate, Type::String),
        (Type::None, _) => matches!(candidate, Type::None),

        (Type::Array { element: None }, _) => matches!(candidate, Type::Array { element: None }),
        (Type::Array { element: Some(base_element) }, Type::Array { element }) => match element {
            None => true,
            Some(element) => check(base_element, element, coercion),
        },
        (Type::Array { .. }, _) => false,

        (
            Type::Function {
                args: base_args,
                ret: base_ret,
            },
            Type::Function {
                args: candidate_args,
                ret: candidate_ret,
            },
        ) => {
            base_args.len() == candidate_args.len()
                && base_args
                    .iter()
                    .zip(candidate_args)
                    .all(|(base_arg, candidate_arg)| check(candidate_arg, base_arg, coercion))
                && check(base_ret, candidate_ret, coercion)
        }
        (Type::Function { .. }, _) => false,

        (
            Type::Record {
                fields: base_fields,
            },
            Type::Record {
                fields: candidate_fields,
            },
        ) => base_fields.iter().all(|(name, base_field)| {
            candidate_fields
                .get(name)
                .is_some_and(|candidate_field| check(base_field, candidate_field, coercion))
        }),
        (Type::Record { .. }, _) => false,
    }
}

fn flatten(ty: Type, flat: &mut Vec<Type>) {
    match ty {
        Type::Union { types } => {
            for member in types {
                flatten(member, flat);
            }
        }
        other => flat.push(other),
    }
}

/// Generic members stay distinct until they are substituted.
fn subsumes(kept: &Type, ty: &Type) -> bool {
    if kept.has_generics() || ty.has_generics() {
        kept == ty
    } else {
        is_strict_subtype(kept, ty)
    }
}

/// Build the normalized union of `types`.
///
/// Nested unions are flattened, members subsumed by another member are
/// dropped and the rest is sorted by rendered form. A single remaining
/// member is returned as is.
pub fn make_union_type(types: impl IntoIterator<Item = Type>) -> Type {
    let mut flat = vec![];
    for ty in types {
        flatten(ty, &mut flat);
    }

    let mut retained: Vec<Type> = vec![];
    for ty in flat {
        if retained.iter().any(|kept| subsumes(kept, &ty)) {
            continue;
        }
        retained.retain(|kept| !subsumes(&ty, kept));
        retained.push(ty);
    }

    if retained.len() == 1 {
        return retained.remove(0);
    }
    retained.sort_by_cached_key(Type::pretty);
    Type::Union { types: retained }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_subsumption_is_asymmetric() {
        assert!(is_subtype(&Type::Float, &Type::Integer));
        assert!(!is_subtype(&Type::Integer, &Type::Float));
    }

    #[test]
    fn test_boolean_accepts_numbers() {
        assert!(is_subtype(&Type::Boolean, &Type::Integer));
        assert!(is_subtype(&Type::Boolean, &Type::Float));
        assert!(!is_subtype(&Type::Boolean, &Type::String));
        assert!(!is_strict_subtype(&Type::Boolean, &Type::Integer));
    }

    #[test]
    fn test_arrays() {
        let floats = Type::array(Type::Float);
        let ints = Type::array(Type::Integer);
        assert!(is_subtype(&floats, &ints));
        assert!(!is_subtype(&ints, &floats));
        assert!(is_subtype(&ints, &Type::empty_array()));
        assert!(!is_subtype(&Type::empty_array(), &ints));
        assert!(is_subtype(&Type::empty_array(), &Type::empty_array()));
        assert!(!is_subtype(&ints, &Type::Integer));
    }

    #[test]
    fn test_function_parameters_are_contravariant() {
        let takes_float = Type::function(vec![Type::Float], Type::Integer);
        let takes_int = Type::function(vec![Type::Integer], Type::Integer);
        assert!(is_subtype(&takes_int, &takes_float));
        assert!(!is_subtype(&takes_float, &takes_int));
    }

    #[test]
    fn test_function_return_is_covariant() {
        let returns_float = Type::function(vec![], Type::Float);
        let returns_int = Type::function(vec![], Type::Integer);
        assert!(is_subtype(&returns_float, &returns_int));
        assert!(!is_subtype(&returns_int, &returns_float));
    }

    #[test]
    fn test_function_arity_must_match() {
        let unary = Type::function(vec![Type::Integer], Type::Integer);
        let binary = Type::function(vec![Type::Integer, Type::Integer], Type::Integer);
        assert!(!is_subtype(&unary, &binary));
    }

    #[test]
    fn test_union_base_and_candidate() {
        let maybe_int = make_union_type([Type::Integer, Type::None]);
        assert!(is_subtype(&maybe_int, &Type::Integer));
        assert!(is_subtype(&maybe_int, &Type::None));
        assert!(!is_subtype(&maybe_int, &Type::String));
        assert!(!is_subtype(&Type::Integer, &maybe_int));
        let wider = make_union_type([Type::Float, Type::None, Type::String]);
        assert!(is_subtype(&wider, &maybe_int));
    }

    #[test]
    fn test_generic_constraints() {
        let numeric = Type::constrained("T", Type::Float);
        assert!(is_subtype(&numeric, &Type::Integer));
        assert!(!is_subtype(&numeric, &Type::String));
        assert!(is_subtype(&Type::generic("T"), &Type::String));
        assert!(is_subtype(&Type::Float, &Type::constrained("U", Type::Integer)));
        assert!(!is_subtype(&Type::Integer, &Type::constrained("U", Type::Float)));
    }

    #[test]
    fn test_records() {
        let base = Type::record([("a".to_string(), Type::Float)]);
        let candidate = Type::record([
            ("a".to_string(), Type::Integer),
            ("b".to_string(), Type::String),
        ]);
        assert!(is_subtype(&base, &candidate));
        assert!(!is_subtype(&candidate, &base));
    }

    #[test]
    fn test_union_singleton_collapses() {
        assert_eq!(make_union_type([Type::String]), Type::String);
        assert_eq!(make_union_type([Type::Integer, Type::Integer]), Type::Integer);
    }

    #[test]
    fn test_union_drops_subsumed_members() {
        assert_eq!(make_union_type([Type::Integer, Type::Float]), Type::Float);
        assert_eq!(make_union_type([Type::Float, Type::Integer]), Type::Float);
    }

    #[test]
    fn test_union_is_order_independent() {
        let a = make_union_type([Type::String, Type::None]);
        let b = make_union_type([Type::None, Type::String]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_union_flattens() {
        let inner = make_union_type([Type::String, Type::None]);
        let outer = make_union_type([inner, Type::Boolean]);
        assert_eq!(
            outer,
            Type::Union {
                types: vec![Type::Boolean, Type::None, Type::String]
            }
        );
    }

    #[test]
    fn test_union_keeps_generics() {
        let ty = make_union_type([Type::generic("T"), Type::None]);
        assert_eq!(
            ty,
            Type::Union {
                types: vec![Type::None, Type::generic("T")]
            }
        );
    }

    #[test]
    fn test_union_keeps_booleans_and_numbers_apart() {
        let ty = make_union_type([Type::Boolean, Type::Integer]);
        assert_eq!(
            ty,
            Type::Union {
                types: vec![Type::Boolean, Type::Integer]
            }
        );
    }
}
