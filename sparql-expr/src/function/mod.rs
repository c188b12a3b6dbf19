//! Regular function implementations
//!
//! Each module registers its rows into the overload table
//! (`registry::Table`) and keeps its implementations private. The
//! implementations are pure functions over typed values; anything that
//! needs the evaluation context (NOW, IRI base resolution) lives on the
//! evaluator instead.

pub(crate) mod arithmetic;
pub(crate) mod cast;
pub(crate) mod compare;
pub(crate) mod datetime;
pub(crate) mod hash;
pub(crate) mod numeric;
pub(crate) mod string;
pub(crate) mod terms;

use sparql_expr_core::{Numeric, TypedValue, XsdDateTime};

/// Numeric payload of an operand the registry guaranteed to be numeric.
pub(crate) fn expect_numeric(value: &TypedValue) -> &Numeric {
    value
        .as_numeric()
        .unwrap_or_else(|| unreachable!("registered for numeric tags only"))
}

/// String-like payload of an operand the registry guaranteed to be
/// string-like: `(value, language)`.
pub(crate) fn expect_string_like(value: &TypedValue) -> (&str, Option<&str>) {
    value
        .as_string_like()
        .unwrap_or_else(|| unreachable!("registered for string-like tags only"))
}

/// DateTime payload of an operand the registry guaranteed to be a
/// dateTime.
pub(crate) fn expect_date_time(value: &TypedValue) -> &XsdDateTime {
    match value {
        TypedValue::DateTime(dt) => dt,
        _ => unreachable!("registered for dateTime tag only"),
    }
}
