//! Type model tests: library signatures, subtyping across composite types
//! and generic resolution through the public API

use pretty_assertions::assert_eq;
use sift::Scope;
use sift::types::{
    GenericMap, Type, apply_generic_map, create_generic_map, is_subtype, make_union_type,
};

fn library_type(name: &str) -> String {
    Scope::standard()
        .lookup(name)
        .map(|binding| binding.ty.pretty())
        .unwrap_or_else(|| panic!("'{name}' is not in the standard library"))
}

fn t() -> Type {
    Type::generic("T")
}

#[test]
fn library_signatures() {
    assert_eq!(library_type("+"), "(T: Float, T: Float) -> T: Float");
    assert_eq!(library_type("if"), "(Boolean, T, T) -> T");
    assert_eq!(library_type("map"), "((T) -> U, [T]) -> [U]");
    assert_eq!(library_type("[]"), "([T], Integer) -> None | T");
    assert_eq!(library_type(".."), "(Integer, Integer) -> [Integer]");
    assert_eq!(library_type("pi"), "Float");
}

#[test]
fn every_operator_is_bound() {
    let scope = Scope::standard();
    for symbol in [
        "+", "-", "*", "/", "%", "**", "neg", "<", "<=", ">", ">=", "=", "!=", "..", "in", ".",
        "&", "[]", "[:]",
    ] {
        assert!(scope.lookup(symbol).is_some(), "missing operator '{symbol}'");
    }
}

#[test]
fn nested_arrays_are_covariant() {
    let floats = Type::array(Type::array(Type::Float));
    let ints = Type::array(Type::array(Type::Integer));
    assert!(is_subtype(&floats, &ints));
    assert!(!is_subtype(&ints, &floats));
}

#[test]
fn higher_order_parameters() {
    // the parameter of a parameter flips twice
    let wants_int_callback =
        Type::function(vec![Type::function(vec![Type::Integer], Type::Integer)], Type::None);
    let wants_float_callback =
        Type::function(vec![Type::function(vec![Type::Float], Type::Integer)], Type::None);
    assert!(is_subtype(&wants_float_callback, &wants_int_callback));
    assert!(!is_subtype(&wants_int_callback, &wants_float_callback));
}

#[test]
fn union_of_unions_is_flat() {
    let union = make_union_type([
        make_union_type([Type::String, Type::None]),
        make_union_type([Type::Integer, Type::Float]),
    ]);
    assert_eq!(union.pretty(), "Float | None | String");
}

#[test]
fn union_candidates_need_every_member() {
    let candidate = make_union_type([Type::Integer, Type::String]);
    assert!(is_subtype(&make_union_type([Type::Float, Type::String]), &candidate));
    assert!(!is_subtype(&Type::Float, &candidate));
}

#[test]
fn constrained_generics() {
    let numeric = Type::constrained("T", Type::Float);
    assert!(is_subtype(&numeric, &Type::Integer));
    assert!(!is_subtype(&numeric, &Type::String));
    assert!(is_subtype(&Type::Float, &numeric));
}

#[test]
fn generic_map_from_callback_and_array() {
    let callback = Type::function(vec![t()], Type::generic("U"));
    let mut map = create_generic_map(&callback, &Type::function(vec![Type::Float], Type::String));
    map.merge(create_generic_map(&Type::array(t()), &Type::array(Type::Integer)));

    assert_eq!(map.get("T"), Some(&Type::Float));
    assert_eq!(map.get("U"), Some(&Type::String));
    assert_eq!(
        apply_generic_map(&Type::array(Type::generic("U")), &map),
        Type::array(Type::String)
    );
}

#[test]
fn generic_map_collects_from_iterator() {
    let map: GenericMap = [
        ("T".to_string(), Type::String),
        ("T".to_string(), Type::None),
    ]
    .into_iter()
    .collect();
    assert_eq!(map.len(), 1);
    assert_eq!(map.apply(&t()).pretty(), "None | String");
}

#[test]
fn records_are_width_subtypes() {
    let narrow = Type::record([("a".to_string(), Type::Float)]);
    let wide = Type::record([
        ("a".to_string(), Type::Integer),
        ("b".to_string(), Type::String),
    ]);
    assert!(is_subtype(&narrow, &wide));
    assert!(!is_subtype(&wide, &narrow));
}

#[test]
fn types_round_trip_through_json() {
    let ty = Type::function(
        vec![Type::constrained("T", Type::Float)],
        make_union_type([t(), Type::None]),
    );
    let json = serde_json::to_string(&ty).unwrap();
    let back: Type = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ty);
}
