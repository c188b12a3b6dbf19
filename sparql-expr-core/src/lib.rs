//! # sparql-expr-core
//!
//! Term model for the sparql-expr evaluator.
//!
//! This crate provides:
//! - `Term`: the three RDF term kinds with structural equality (`sameTerm`)
//! - `TypedValue` / `TypeTag`: the typed-value view used for overload
//!   dispatch, with EBV coercion
//! - `Numeric`: the `integer < decimal < float < double` promotion lattice
//!   with exact big-integer/decimal arithmetic
//! - `XsdDateTime`: timezone-preserving dateTime compared by instant
//! - comparators for value comparison and the ORDER BY term order
//!
//! Everything here is pure and immutable; evaluation-time error policy
//! lives in the `sparql-expr` crate.

pub mod comparator;
pub mod numeric;
pub mod temporal;
pub mod term;
pub mod value;

// Re-export main types
pub use comparator::{order_terms, value_cmp};
pub use numeric::{cmp_numeric, ArithmeticOp, Numeric, NumericTag};
pub use temporal::XsdDateTime;
pub use term::{Literal, Term};
pub use value::{TypeTag, TypedValue};
