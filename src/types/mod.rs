//! # Type System
//!
//! Structural types with subtyping, normalized unions and generic variables
//! that are resolved per call from the arguments supplied.
//!
//! ## Module Structure
//!
//! - [`ty`] - the [`Type`] representation and its rendering
//! - [`subtype`] - [`is_subtype`] and union normalization ([`make_union_type`])
//! - [`subst`] - generic maps: building ([`create_generic_map`]) and applying them
//! - [`env`] - [`TypedScope`], the name to type bindings
//! - [`error`] - [`TypeError`] diagnostics
//! - [`check`] - the checker turning untyped trees into typed ones

pub mod check;
pub mod env;
pub mod error;
pub mod subst;
pub mod subtype;
pub mod ty;

pub use check::type_expression;
pub use env::TypedScope;
pub use error::TypeError;
pub use subst::{GenericMap, apply_generic_map, create_generic_map};
pub use subtype::{is_strict_subtype, is_subtype, make_union_type};
pub use ty::Type;
