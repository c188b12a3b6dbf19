//! Function registry and overload dispatch
//!
//! Regular operators resolve through a statically initialised table keyed
//! by `(operator, operand type-tag tuple)`. String-like overloads are
//! pre-expanded into one row per tag combination, so lookup is always an
//! exact tuple match.
//!
//! Resolution order:
//! 1. exact tag tuple;
//! 2. if every operand declares a numeric datatype, promote all operands
//!    to the join of their lattice positions and retry; an ill-typed
//!    numeric literal fails this step with `InvalidLexicalFormError`;
//! 3. otherwise `InvalidArgumentTypesError`, except that the four
//!    ordering operators over orderable-but-different literal categories
//!    report `InvalidCompareError`.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use sparql_expr_core::{NumericTag, TypeTag, TypedValue};

use crate::error::{EvalError, Result};
use crate::function;
use crate::operator::RegularOperator;

/// A registered implementation: a pure function over evaluated operands.
pub(crate) type OpImpl = fn(&[TypedValue]) -> Result<TypedValue>;

/// The registry table, populated once at first use.
#[derive(Default)]
pub(crate) struct Table {
    entries: FxHashMap<(RegularOperator, Vec<TypeTag>), OpImpl>,
}

impl Table {
    /// Register an implementation under an exact tag tuple.
    pub(crate) fn insert(&mut self, op: RegularOperator, tags: &[TypeTag], imp: OpImpl) {
        self.entries.insert((op, tags.to_vec()), imp);
    }

    fn get(&self, op: RegularOperator, tags: &[TypeTag]) -> Option<OpImpl> {
        self.entries.get(&(op, tags.to_vec())).copied()
    }
}

static REGISTRY: Lazy<Table> = Lazy::new(|| {
    let mut table = Table::default();
    function::compare::register(&mut table);
    function::arithmetic::register(&mut table);
    function::numeric::register(&mut table);
    function::string::register(&mut table);
    function::datetime::register(&mut table);
    function::terms::register(&mut table);
    function::hash::register(&mut table);
    table
});

/// Resolve and invoke `op` over evaluated operands.
pub(crate) fn dispatch(op: RegularOperator, args: &[TypedValue]) -> Result<TypedValue> {
    let tags: Vec<TypeTag> = args.iter().map(TypedValue::tag).collect();

    if let Some(imp) = REGISTRY.get(op, &tags) {
        return imp(args);
    }

    // Numeric promotion retry
    let declared: Option<Vec<NumericTag>> = args
        .iter()
        .map(TypedValue::declared_numeric_tag)
        .collect();
    if let Some(declared) = declared {
        if !declared.is_empty() {
            if let Some(bad) = args
                .iter()
                .find(|v| matches!(v, TypedValue::NonLexical { .. }))
            {
                return Err(invalid_lexical(bad));
            }
            let join = declared
                .into_iter()
                .reduce(NumericTag::join)
                .expect("non-empty operand list");
            let promoted: Vec<TypedValue> = args
                .iter()
                .cloned()
                .map(|v| match v {
                    TypedValue::Numeric(n) => TypedValue::Numeric(n.promote(join)),
                    v => v,
                })
                .collect();
            let promoted_tags: Vec<TypeTag> = promoted.iter().map(TypedValue::tag).collect();
            if let Some(imp) = REGISTRY.get(op, &promoted_tags) {
                return imp(&promoted);
            }
        }
    }

    tracing::trace!(op = op.symbol(), ?tags, "overload dispatch miss");

    if op.is_ordering() && tags.len() == 2 && is_orderable(tags[0]) && is_orderable(tags[1]) {
        return Err(EvalError::InvalidCompare {
            left: tags[0],
            right: tags[1],
        });
    }

    Err(EvalError::InvalidArgumentTypes {
        op: op.symbol().to_string(),
        tags,
    })
}

/// Build the lexical-form error for an ill-typed literal.
pub(crate) fn invalid_lexical(value: &TypedValue) -> EvalError {
    match value {
        TypedValue::NonLexical { lexical, datatype } => EvalError::InvalidLexicalForm {
            lexical: lexical.to_string(),
            datatype: datatype.to_string(),
        },
        other => EvalError::InvalidArgumentTypes {
            op: "<lexical>".to_string(),
            tags: vec![other.tag()],
        },
    }
}

fn is_orderable(tag: TypeTag) -> bool {
    tag.is_numeric()
        || matches!(
            tag,
            TypeTag::String | TypeTag::LangString | TypeTag::Boolean | TypeTag::DateTime
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use sparql_expr_core::Numeric;
    use std::str::FromStr;

    #[test]
    fn test_exact_match() {
        let result = dispatch(
            RegularOperator::Add,
            &[TypedValue::integer(1), TypedValue::integer(2)],
        )
        .unwrap();
        assert_eq!(result, TypedValue::integer(3));
    }

    #[test]
    fn test_promotion_retry() {
        let result = dispatch(
            RegularOperator::Add,
            &[
                TypedValue::integer(1),
                TypedValue::Numeric(Numeric::decimal(BigDecimal::from_str("1.5").unwrap())),
            ],
        )
        .unwrap();
        assert_eq!(result.tag(), TypeTag::Decimal);
    }

    #[test]
    fn test_non_lexical_numeric_fails_promotion() {
        use sparql_expr_core::Term;
        use sparql_expr_vocab::xsd;
        let bad = TypedValue::of(&Term::typed_literal("010", xsd::INTEGER));
        let err = dispatch(RegularOperator::Add, &[TypedValue::integer(1), bad]).unwrap_err();
        assert!(matches!(err, EvalError::InvalidLexicalForm { .. }));
    }

    #[test]
    fn test_unknown_combination() {
        let err = dispatch(
            RegularOperator::Add,
            &[TypedValue::integer(1), TypedValue::string("x")],
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::InvalidArgumentTypes { .. }));
    }

    #[test]
    fn test_ordering_cross_category_reports_compare_error() {
        let err = dispatch(
            RegularOperator::LessThan,
            &[TypedValue::integer(1), TypedValue::string("x")],
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::InvalidCompare { .. }));
    }
}
