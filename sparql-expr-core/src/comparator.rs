//! Value comparison and the ORDER BY term order
//!
//! Two layers:
//! - `value_cmp` compares two typed values within a category (numeric
//!   across tags, strings by code point, language strings by (tag, lexical),
//!   booleans, dateTimes by instant). `None` means the pair is
//!   incomparable.
//! - `order_terms` is the ORDER BY order over whole terms:
//!   blank nodes < named nodes < literals, then `value_cmp` within
//!   literals. Incomparable literal pairs yield `None`; the evaluator
//!   layer turns that into its comparison error.
//!
//! String comparison is Unicode code-point order. This is the single seam
//! a collation-aware implementation would replace.

use std::cmp::Ordering;

use crate::numeric::cmp_numeric;
use crate::term::Term;
use crate::value::TypedValue;

/// Compare two typed values within a category.
///
/// Returns `None` for cross-category pairs and NaN comparisons.
pub fn value_cmp(a: &TypedValue, b: &TypedValue) -> Option<Ordering> {
    match (a, b) {
        (TypedValue::Numeric(a), TypedValue::Numeric(b)) => cmp_numeric(a, b),
        (TypedValue::String(a), TypedValue::String(b)) => Some(a.cmp(b)),
        (
            TypedValue::LangString { value: av, lang: al },
            TypedValue::LangString { value: bv, lang: bl },
        ) => Some(al.cmp(bl).then_with(|| av.cmp(bv))),
        (TypedValue::Boolean(a), TypedValue::Boolean(b)) => Some(a.cmp(b)),
        (TypedValue::DateTime(a), TypedValue::DateTime(b)) => Some(a.cmp(b)),
        (
            TypedValue::Other {
                lexical: al,
                datatype: ad,
            },
            TypedValue::Other {
                lexical: bl,
                datatype: bd,
            },
        ) => {
            // Unknown datatypes: only identity is decidable
            (ad == bd && al == bl).then_some(Ordering::Equal)
        }
        _ => None,
    }
}

/// ORDER BY order: blank nodes < named nodes < literals, IRIs and labels
/// by code point, literals via `value_cmp`.
///
/// Returns `None` when two literals fall in different value categories.
pub fn order_terms(a: &Term, b: &Term) -> Option<Ordering> {
    match (a, b) {
        (Term::BlankNode { label: a }, Term::BlankNode { label: b }) => Some(a.cmp(b)),
        (Term::BlankNode { .. }, _) => Some(Ordering::Less),
        (_, Term::BlankNode { .. }) => Some(Ordering::Greater),

        (Term::NamedNode { iri: a }, Term::NamedNode { iri: b }) => Some(a.cmp(b)),
        (Term::NamedNode { .. }, _) => Some(Ordering::Less),
        (_, Term::NamedNode { .. }) => Some(Ordering::Greater),

        (Term::Literal(_), Term::Literal(_)) => {
            value_cmp(&TypedValue::of(a), &TypedValue::of(b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Numeric;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn test_numeric_cross_tag() {
        let one = TypedValue::integer(1);
        let one_dec = TypedValue::Numeric(Numeric::decimal(BigDecimal::from_str("1.0").unwrap()));
        assert_eq!(value_cmp(&one, &one_dec), Some(Ordering::Equal));
    }

    #[test]
    fn test_string_code_point_order() {
        let a = TypedValue::string("aaa");
        let b = TypedValue::string("bbb");
        assert_eq!(value_cmp(&a, &b), Some(Ordering::Less));
        assert_eq!(value_cmp(&a, &a), Some(Ordering::Equal));
    }

    #[test]
    fn test_lang_string_orders_by_tag_then_lexical() {
        let de = TypedValue::LangString {
            value: "zzz".into(),
            lang: "de".into(),
        };
        let en = TypedValue::LangString {
            value: "aaa".into(),
            lang: "en".into(),
        };
        assert_eq!(value_cmp(&de, &en), Some(Ordering::Less));
    }

    #[test]
    fn test_cross_category_is_incomparable() {
        let s = TypedValue::string("1");
        let n = TypedValue::integer(1);
        assert_eq!(value_cmp(&s, &n), None);
        let b = TypedValue::boolean(true);
        assert_eq!(value_cmp(&b, &n), None);
    }

    #[test]
    fn test_term_kind_order() {
        let blank = Term::blank_node("b0");
        let iri = Term::named_node("http://example.org/");
        let lit = Term::string("a");
        assert_eq!(order_terms(&blank, &iri), Some(Ordering::Less));
        assert_eq!(order_terms(&iri, &lit), Some(Ordering::Less));
        assert_eq!(order_terms(&lit, &blank), Some(Ordering::Greater));
    }

    #[test]
    fn test_incomparable_literals() {
        let s = Term::string("1");
        let n = Term::integer(1);
        assert_eq!(order_terms(&s, &n), None);
    }
}
