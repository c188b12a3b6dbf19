//! XSD constructor casts
//!
//! SPARQL invokes constructor functions by datatype IRI
//! (`xsd:integer(?x)`, ...). The evaluator resolves these before
//! consulting the extension registry. Casting rules follow XPath as
//! profiled by SPARQL: source value space to target value space, with
//! strict lexical parsing when the source is a string.

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::ToPrimitive;
use sparql_expr_core::{numeric, Numeric, NumericTag, TypedValue, XsdDateTime};
use sparql_expr_vocab::xsd;

use crate::error::{EvalError, Result};

/// A built-in cast target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CastTarget {
    Boolean,
    Integer,
    Decimal,
    Float,
    Double,
    String,
    DateTime,
}

impl CastTarget {
    pub(crate) fn iri(self) -> &'static str {
        match self {
            CastTarget::Boolean => xsd::BOOLEAN,
            CastTarget::Integer => xsd::INTEGER,
            CastTarget::Decimal => xsd::DECIMAL,
            CastTarget::Float => xsd::FLOAT,
            CastTarget::Double => xsd::DOUBLE,
            CastTarget::String => xsd::STRING,
            CastTarget::DateTime => xsd::DATE_TIME,
        }
    }
}

/// Resolve a named-function IRI to a cast target, if it is one of the
/// built-in constructors.
pub(crate) fn target_for_iri(iri: &str) -> Option<CastTarget> {
    match iri {
        xsd::BOOLEAN => Some(CastTarget::Boolean),
        xsd::INTEGER => Some(CastTarget::Integer),
        xsd::DECIMAL => Some(CastTarget::Decimal),
        xsd::FLOAT => Some(CastTarget::Float),
        xsd::DOUBLE => Some(CastTarget::Double),
        xsd::STRING => Some(CastTarget::String),
        xsd::DATE_TIME => Some(CastTarget::DateTime),
        _ => None,
    }
}

/// Apply a cast; `CastError` on any unconvertible value.
pub(crate) fn apply(target: CastTarget, value: &TypedValue) -> Result<TypedValue> {
    let fail = || EvalError::Cast {
        value: describe(value),
        target: target.iri().to_string(),
    };

    match target {
        CastTarget::String => cast_to_string(value).ok_or_else(fail),
        CastTarget::Boolean => cast_to_boolean(value).ok_or_else(fail),
        CastTarget::Integer => cast_to_integer(value).ok_or_else(fail),
        CastTarget::Decimal => cast_to_decimal(value).ok_or_else(fail),
        CastTarget::Float => cast_to_f64(value)
            .map(|d| TypedValue::Numeric(Numeric::Float(d as f32)))
            .ok_or_else(fail),
        CastTarget::Double => cast_to_f64(value)
            .map(|d| TypedValue::Numeric(Numeric::Double(d)))
            .ok_or_else(fail),
        CastTarget::DateTime => cast_to_date_time(value).ok_or_else(fail),
    }
}

fn cast_to_string(value: &TypedValue) -> Option<TypedValue> {
    let s = match value {
        TypedValue::Iri(iri) => iri.to_string(),
        TypedValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
        TypedValue::Numeric(n) => n.lexical(),
        TypedValue::String(s) => s.to_string(),
        TypedValue::LangString { value, .. } => value.to_string(),
        TypedValue::DateTime(dt) => dt.original().to_string(),
        TypedValue::NonLexical { lexical, .. } | TypedValue::Other { lexical, .. } => {
            lexical.to_string()
        }
        TypedValue::BlankNode(_) => return None,
    };
    Some(TypedValue::String(s.into()))
}

fn cast_to_boolean(value: &TypedValue) -> Option<TypedValue> {
    let b = match value {
        TypedValue::Boolean(b) => *b,
        TypedValue::Numeric(n) => !n.is_zero_or_nan(),
        TypedValue::String(s) => match s.as_ref() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return None,
        },
        _ => return None,
    };
    Some(TypedValue::Boolean(b))
}

fn cast_to_integer(value: &TypedValue) -> Option<TypedValue> {
    let i = match value {
        TypedValue::Boolean(b) => (*b as i64).into(),
        TypedValue::Numeric(Numeric::Integer(i)) => (**i).clone(),
        TypedValue::Numeric(Numeric::Decimal(d)) => truncate_to_big_int(d),
        TypedValue::Numeric(Numeric::Float(f)) => float_to_big_int(*f as f64)?,
        TypedValue::Numeric(Numeric::Double(d)) => float_to_big_int(*d)?,
        TypedValue::String(s) => numeric::parse_integer_lexical(s)?,
        _ => return None,
    };
    Some(TypedValue::Numeric(Numeric::Integer(Box::new(i))))
}

fn cast_to_decimal(value: &TypedValue) -> Option<TypedValue> {
    let d = match value {
        TypedValue::Boolean(b) => BigDecimal::from(*b as i64),
        TypedValue::Numeric(Numeric::Integer(i)) => BigDecimal::from((**i).clone()),
        TypedValue::Numeric(Numeric::Decimal(d)) => (**d).clone(),
        TypedValue::Numeric(Numeric::Float(f)) => BigDecimal::try_from(*f as f64).ok()?,
        TypedValue::Numeric(Numeric::Double(d)) => BigDecimal::try_from(*d).ok()?,
        TypedValue::String(s) => numeric::parse_decimal_lexical(s)?,
        _ => return None,
    };
    Some(TypedValue::Numeric(Numeric::decimal(d)))
}

fn cast_to_f64(value: &TypedValue) -> Option<f64> {
    match value {
        TypedValue::Boolean(b) => Some(*b as i64 as f64),
        TypedValue::Numeric(n) => match n.clone().promote(NumericTag::Double) {
            Numeric::Double(d) => Some(d),
            _ => None,
        },
        TypedValue::String(s) => numeric::parse_double_lexical(s),
        _ => None,
    }
}

fn cast_to_date_time(value: &TypedValue) -> Option<TypedValue> {
    match value {
        TypedValue::DateTime(dt) => Some(TypedValue::DateTime(dt.clone())),
        TypedValue::String(s) => XsdDateTime::parse(s)
            .ok()
            .map(|dt| TypedValue::DateTime(Box::new(dt))),
        _ => None,
    }
}

fn truncate_to_big_int(d: &BigDecimal) -> num_bigint::BigInt {
    d.with_scale_round(0, RoundingMode::Down)
        .as_bigint_and_exponent()
        .0
}

fn float_to_big_int(f: f64) -> Option<num_bigint::BigInt> {
    if !f.is_finite() {
        return None;
    }
    BigDecimal::try_from(f)
        .ok()
        .map(|d| truncate_to_big_int(&d))
}

fn describe(value: &TypedValue) -> String {
    match value {
        TypedValue::Iri(iri) => iri.to_string(),
        TypedValue::BlankNode(label) => format!("_:{}", label),
        TypedValue::Boolean(b) => b.to_string(),
        TypedValue::Numeric(n) => n.lexical(),
        TypedValue::String(s) => s.to_string(),
        TypedValue::LangString { value, .. } => value.to_string(),
        TypedValue::DateTime(dt) => dt.original().to_string(),
        TypedValue::NonLexical { lexical, .. } | TypedValue::Other { lexical, .. } => {
            lexical.to_string()
        }
    }
}
