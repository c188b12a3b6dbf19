//! Comparison operators
//!
//! `=` and the four orderings are registered per same-category tag pair;
//! mixed numeric pairs reach them through the dispatcher's promotion
//! retry. `!=` is not registered at all: the evaluator derives it by
//! negating `=` so the two can never disagree.

use std::cmp::Ordering;

use sparql_expr_core::{value_cmp, TypeTag, TypedValue};

use crate::error::{EvalError, Result};
use crate::operator::RegularOperator;
use crate::registry::{self, Table};

/// Same-category pairs that compare by value. Mixed numeric tags are
/// reached via promotion, so only the diagonal is listed.
const SAME_CATEGORY: [(TypeTag, TypeTag); 8] = [
    (TypeTag::Integer, TypeTag::Integer),
    (TypeTag::Decimal, TypeTag::Decimal),
    (TypeTag::Float, TypeTag::Float),
    (TypeTag::Double, TypeTag::Double),
    (TypeTag::String, TypeTag::String),
    (TypeTag::LangString, TypeTag::LangString),
    (TypeTag::Boolean, TypeTag::Boolean),
    (TypeTag::DateTime, TypeTag::DateTime),
];

pub(crate) fn register(table: &mut Table) {
    for (a, b) in SAME_CATEGORY {
        table.insert(RegularOperator::Equal, &[a, b], eq_values);
        table.insert(RegularOperator::LessThan, &[a, b], lt_values);
        table.insert(RegularOperator::GreaterThan, &[a, b], gt_values);
        table.insert(RegularOperator::LessThanOrEqual, &[a, b], le_values);
        table.insert(RegularOperator::GreaterThanOrEqual, &[a, b], ge_values);
    }

    // A plain string and a language-tagged string are never value-equal
    table.insert(
        RegularOperator::Equal,
        &[TypeTag::String, TypeTag::LangString],
        never_equal,
    );
    table.insert(
        RegularOperator::Equal,
        &[TypeTag::LangString, TypeTag::String],
        never_equal,
    );

    // Unknown datatypes: only identity is decidable
    table.insert(
        RegularOperator::Equal,
        &[TypeTag::Other, TypeTag::Other],
        eq_other,
    );
}

/// SPARQL `=` including the RDFterm-equal short path: if either side is
/// an IRI or blank node the comparison is structural, and an IRI or
/// blank node never equals a literal. Value pairs go through the
/// registry.
pub(crate) fn evaluate_equal(args: &[TypedValue]) -> Result<TypedValue> {
    let structural = |v: &TypedValue| matches!(v.tag(), TypeTag::Iri | TypeTag::BlankNode);
    if structural(&args[0]) || structural(&args[1]) {
        return Ok(TypedValue::Boolean(args[0] == args[1]));
    }
    registry::dispatch(RegularOperator::Equal, args)
}

fn eq_values(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Boolean(
        value_cmp(&args[0], &args[1]) == Some(Ordering::Equal),
    ))
}

fn never_equal(_args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Boolean(false))
}

fn eq_other(args: &[TypedValue]) -> Result<TypedValue> {
    match value_cmp(&args[0], &args[1]) {
        Some(Ordering::Equal) => Ok(TypedValue::Boolean(true)),
        // Distinct lexicals under an unknown datatype are undecidable
        _ => Err(EvalError::InvalidArgumentTypes {
            op: RegularOperator::Equal.symbol().to_string(),
            tags: vec![TypeTag::Other, TypeTag::Other],
        }),
    }
}

// Ordering predicates over `value_cmp`. `None` (NaN) fails every
// predicate, matching IEEE partial-order semantics.

fn lt_values(args: &[TypedValue]) -> Result<TypedValue> {
    compare_with(args, |ord| ord == Ordering::Less)
}

fn gt_values(args: &[TypedValue]) -> Result<TypedValue> {
    compare_with(args, |ord| ord == Ordering::Greater)
}

fn le_values(args: &[TypedValue]) -> Result<TypedValue> {
    compare_with(args, |ord| ord != Ordering::Greater)
}

fn ge_values(args: &[TypedValue]) -> Result<TypedValue> {
    compare_with(args, |ord| ord != Ordering::Less)
}

fn compare_with(args: &[TypedValue], predicate: fn(Ordering) -> bool) -> Result<TypedValue> {
    let satisfied = value_cmp(&args[0], &args[1]).is_some_and(predicate);
    Ok(TypedValue::Boolean(satisfied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::dispatch;
    use sparql_expr_core::Numeric;

    fn string(s: &str) -> TypedValue {
        TypedValue::string(s)
    }

    #[test]
    fn test_string_equality() {
        let r = dispatch(RegularOperator::Equal, &[string("aaa"), string("aaa")]).unwrap();
        assert_eq!(r, TypedValue::Boolean(true));
    }

    #[test]
    fn test_string_ordering() {
        let r = dispatch(RegularOperator::LessThan, &[string("aaa"), string("bbb")]).unwrap();
        assert_eq!(r, TypedValue::Boolean(true));
        let r = dispatch(RegularOperator::LessThanOrEqual, &[string(""), string("")]).unwrap();
        assert_eq!(r, TypedValue::Boolean(true));
    }

    #[test]
    fn test_numeric_value_equality_across_tags() {
        use bigdecimal::BigDecimal;
        use std::str::FromStr;
        let one = TypedValue::integer(1);
        let one_dec = TypedValue::Numeric(Numeric::decimal(BigDecimal::from_str("1.0").unwrap()));
        let r = dispatch(RegularOperator::Equal, &[one, one_dec]).unwrap();
        assert_eq!(r, TypedValue::Boolean(true));
    }

    #[test]
    fn test_nan_fails_all_orderings() {
        let nan = TypedValue::Numeric(Numeric::Double(f64::NAN));
        let one = TypedValue::Numeric(Numeric::Double(1.0));
        for op in [
            RegularOperator::LessThan,
            RegularOperator::GreaterThan,
            RegularOperator::LessThanOrEqual,
            RegularOperator::GreaterThanOrEqual,
            RegularOperator::Equal,
        ] {
            let r = dispatch(op, &[nan.clone(), one.clone()]).unwrap();
            assert_eq!(r, TypedValue::Boolean(false), "{:?}", op);
        }
    }

    #[test]
    fn test_iri_equality_is_structural() {
        let a = TypedValue::Iri("http://example.org/a".into());
        let b = TypedValue::Iri("http://example.org/b".into());
        assert_eq!(
            evaluate_equal(&[a.clone(), a.clone()]).unwrap(),
            TypedValue::Boolean(true)
        );
        assert_eq!(
            evaluate_equal(&[a.clone(), b]).unwrap(),
            TypedValue::Boolean(false)
        );
        // IRI never equals a literal
        assert_eq!(
            evaluate_equal(&[a, string("http://example.org/a")]).unwrap(),
            TypedValue::Boolean(false)
        );
    }

    #[test]
    fn test_lang_strings_compare_by_tag_then_value() {
        let en = TypedValue::LangString {
            value: "cat".into(),
            lang: "en".into(),
        };
        let fr = TypedValue::LangString {
            value: "cat".into(),
            lang: "fr".into(),
        };
        let r = dispatch(RegularOperator::Equal, &[en.clone(), fr.clone()]).unwrap();
        assert_eq!(r, TypedValue::Boolean(false));
        let r = dispatch(RegularOperator::LessThan, &[en, fr]).unwrap();
        assert_eq!(r, TypedValue::Boolean(true));
    }

    #[test]
    fn test_unknown_datatype_equality() {
        let duration = "http://www.w3.org/2001/XMLSchema#duration";
        let a = TypedValue::Other {
            lexical: "P1D".into(),
            datatype: duration.into(),
        };
        let b = TypedValue::Other {
            lexical: "P2D".into(),
            datatype: duration.into(),
        };
        assert_eq!(
            dispatch(RegularOperator::Equal, &[a.clone(), a.clone()]).unwrap(),
            TypedValue::Boolean(true)
        );
        assert!(dispatch(RegularOperator::Equal, &[a, b]).is_err());
    }
}
