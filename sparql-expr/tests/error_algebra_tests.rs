//! The SPARQL error algebra: short-circuit truth tables for `||` and
//! `&&`, COALESCE and IN error accumulation, and EBV failures.

use sparql_expr::{
    EvalContext, EvalError, Evaluator, Expression, Mapping, RegularOperator, SpecialOperator,
    Term,
};

fn evaluator() -> Evaluator {
    Evaluator::new(EvalContext::default())
}

fn int(value: i64) -> Expression {
    Expression::constant(Term::integer(value))
}

/// T / F / E operand constructors for the truth tables.
fn t() -> Expression {
    Expression::constant(Term::boolean(true))
}

fn f() -> Expression {
    Expression::constant(Term::boolean(false))
}

fn e() -> Expression {
    Expression::regular(RegularOperator::Divide, vec![int(1), int(0)])
}

async fn eval(expr: Expression) -> Result<Term, EvalError> {
    evaluator().evaluate(&expr, &Mapping::new()).await
}

async fn connective(op: SpecialOperator, lhs: Expression, rhs: Expression) -> Option<bool> {
    match eval(Expression::special(op, vec![lhs, rhs])).await {
        Ok(term) => Some(term == Term::boolean(true)),
        Err(_) => None,
    }
}

#[tokio::test]
async fn test_logical_or_truth_table() {
    // (lhs, rhs, expected) with None = error
    let cases = [
        (t(), t(), Some(true)),
        (t(), f(), Some(true)),
        (t(), e(), Some(true)),
        (f(), t(), Some(true)),
        (f(), f(), Some(false)),
        (f(), e(), None),
        (e(), t(), Some(true)),
        (e(), f(), None),
        (e(), e(), None),
    ];
    for (i, (lhs, rhs, expected)) in cases.into_iter().enumerate() {
        let got = connective(SpecialOperator::LogicalOr, lhs, rhs).await;
        assert_eq!(got, expected, "|| case {}", i);
    }
}

#[tokio::test]
async fn test_logical_and_truth_table() {
    let cases = [
        (t(), t(), Some(true)),
        (t(), f(), Some(false)),
        (t(), e(), None),
        (f(), t(), Some(false)),
        (f(), f(), Some(false)),
        (f(), e(), Some(false)),
        (e(), t(), None),
        (e(), f(), Some(false)),
        (e(), e(), None),
    ];
    for (i, (lhs, rhs, expected)) in cases.into_iter().enumerate() {
        let got = connective(SpecialOperator::LogicalAnd, lhs, rhs).await;
        assert_eq!(got, expected, "&& case {}", i);
    }
}

#[tokio::test]
async fn test_or_propagates_left_error_on_double_error() {
    let expr = Expression::special(SpecialOperator::LogicalOr, vec![e(), e()]);
    assert!(matches!(
        eval(expr).await.unwrap_err(),
        EvalError::DivisionByZero
    ));
}

#[tokio::test]
async fn test_ebv_failure_in_connective() {
    // An IRI has no EBV; with a false other operand the error propagates
    let iri = Expression::constant(Term::named_node("http://example.org/"));
    let expr = Expression::special(SpecialOperator::LogicalOr, vec![f(), iri]);
    assert!(matches!(eval(expr).await.unwrap_err(), EvalError::Ebv(_)));
}

#[tokio::test]
async fn test_if_propagates_condition_ebv_error() {
    let iri = Expression::constant(Term::named_node("http://example.org/"));
    let expr = Expression::special(SpecialOperator::If, vec![iri, int(1), int(2)]);
    assert!(matches!(eval(expr).await.unwrap_err(), EvalError::Ebv(_)));
}

#[tokio::test]
async fn test_if_takes_else_branch() {
    let expr = Expression::special(
        SpecialOperator::If,
        vec![f(), e(), int(7)],
    );
    assert_eq!(eval(expr).await.unwrap(), Term::integer(7));
}

#[tokio::test]
async fn test_coalesce_collects_all_errors() {
    let expr = Expression::special(
        SpecialOperator::Coalesce,
        vec![Expression::variable("unbound"), e()],
    );
    match eval(expr).await.unwrap_err() {
        EvalError::Coalesce(errors) => {
            assert_eq!(errors.len(), 2);
            assert!(matches!(errors[0], EvalError::UnboundVariable(_)));
            assert!(matches!(errors[1], EvalError::DivisionByZero));
        }
        other => panic!("expected CoalesceError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_coalesce_first_success_stops_evaluation() {
    let expr = Expression::special(SpecialOperator::Coalesce, vec![int(1), e()]);
    assert_eq!(eval(expr).await.unwrap(), Term::integer(1));
}

#[tokio::test]
async fn test_in_matches_by_value() {
    // 1 IN (3, "1.0"^^xsd:decimal) matches by value equality
    let one_dec = Expression::constant(Term::typed_literal(
        "1.0",
        "http://www.w3.org/2001/XMLSchema#decimal",
    ));
    let expr = Expression::special(SpecialOperator::In, vec![int(1), int(3), one_dec]);
    assert_eq!(eval(expr).await.unwrap(), Term::boolean(true));
}

#[tokio::test]
async fn test_in_match_wins_over_earlier_error() {
    let expr = Expression::special(SpecialOperator::In, vec![int(1), e(), int(1)]);
    assert_eq!(eval(expr).await.unwrap(), Term::boolean(true));
}

#[tokio::test]
async fn test_in_exhausted_with_errors_fails() {
    let expr = Expression::special(SpecialOperator::In, vec![int(1), e(), int(2)]);
    match eval(expr).await.unwrap_err() {
        EvalError::In(errors) => assert_eq!(errors.len(), 1),
        other => panic!("expected InError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_in_all_false_is_false() {
    let expr = Expression::special(SpecialOperator::In, vec![int(1), int(2), int(3)]);
    assert_eq!(eval(expr).await.unwrap(), Term::boolean(false));
}

#[tokio::test]
async fn test_in_needle_error_propagates_directly() {
    let expr = Expression::special(SpecialOperator::In, vec![e(), int(1)]);
    assert!(matches!(
        eval(expr).await.unwrap_err(),
        EvalError::DivisionByZero
    ));
}

#[tokio::test]
async fn test_not_in_negates_with_same_error_semantics() {
    let expr = Expression::special(SpecialOperator::NotIn, vec![int(1), int(1)]);
    assert_eq!(eval(expr).await.unwrap(), Term::boolean(false));

    let expr = Expression::special(SpecialOperator::NotIn, vec![int(1), int(2)]);
    assert_eq!(eval(expr).await.unwrap(), Term::boolean(true));

    let expr = Expression::special(SpecialOperator::NotIn, vec![int(1), e(), int(2)]);
    assert!(matches!(eval(expr).await.unwrap_err(), EvalError::In(_)));
}

#[tokio::test]
async fn test_bound_requires_a_variable_node() {
    let expr = Expression::special(SpecialOperator::Bound, vec![int(1)]);
    assert!(matches!(
        eval(expr).await.unwrap_err(),
        EvalError::InvalidArgumentTypes { .. }
    ));
}

#[tokio::test]
async fn test_not_uses_ebv() {
    let expr = Expression::regular(
        RegularOperator::Not,
        vec![Expression::constant(Term::string(""))],
    );
    assert_eq!(eval(expr).await.unwrap(), Term::boolean(true));

    let iri = Expression::constant(Term::named_node("http://example.org/"));
    let expr = Expression::regular(RegularOperator::Not, vec![iri]);
    assert!(matches!(eval(expr).await.unwrap_err(), EvalError::Ebv(_)));
}

#[tokio::test]
async fn test_non_lexical_has_no_ebv() {
    let bad = Expression::constant(Term::typed_literal(
        "abc",
        "http://www.w3.org/2001/XMLSchema#integer",
    ));
    let expr = Expression::regular(RegularOperator::Not, vec![bad]);
    assert!(matches!(eval(expr).await.unwrap_err(), EvalError::Ebv(_)));
}
