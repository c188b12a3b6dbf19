//! Expression AST
//!
//! The evaluator consumes this tree as produced by a SPARQL algebra
//! parser. Nodes are immutable; the evaluator never rewrites them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use sparql_expr_core::Term;

use crate::operator::{Operator, RegularOperator, SpecialOperator};

/// A SPARQL expression.
#[derive(Debug, Clone)]
pub enum Expression {
    /// A variable reference, looked up in the solution mapping
    Variable(String),
    /// A constant term
    Term(Term),
    /// Application of a built-in operator
    Operator { op: Operator, args: Vec<Expression> },
    /// Invocation of a function by IRI: an XSD constructor cast or a
    /// host-registered extension function
    Named { iri: String, args: Vec<Expression> },
    /// `EXISTS` / `NOT EXISTS` over an algebra fragment, delegated to the
    /// host hook
    Exists {
        pattern: AlgebraFragment,
        negated: bool,
    },
    /// An aggregate that should have been resolved upstream; evaluating
    /// it is always an error
    Aggregate {
        name: String,
        distinct: bool,
        expr: Box<Expression>,
    },
}

impl Expression {
    /// A variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// A constant term.
    pub fn constant(term: Term) -> Self {
        Expression::Term(term)
    }

    /// Application of a regular operator.
    pub fn regular(op: RegularOperator, args: Vec<Expression>) -> Self {
        Expression::Operator {
            op: Operator::Regular(op),
            args,
        }
    }

    /// Application of a special form.
    pub fn special(op: SpecialOperator, args: Vec<Expression>) -> Self {
        Expression::Operator {
            op: Operator::Special(op),
            args,
        }
    }

    /// A named function call.
    pub fn named(iri: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Named {
            iri: iri.into(),
            args,
        }
    }

    /// An `EXISTS` (or, when `negated`, `NOT EXISTS`) test.
    pub fn exists(pattern: AlgebraFragment, negated: bool) -> Self {
        Expression::Exists { pattern, negated }
    }

    /// An aggregate placeholder.
    pub fn aggregate(name: impl Into<String>, distinct: bool, expr: Expression) -> Self {
        Expression::Aggregate {
            name: name.into(),
            distinct,
            expr: Box::new(expr),
        }
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Expression::Term(term)
    }
}

/// An opaque SPARQL algebra fragment carried by `EXISTS` nodes.
///
/// The evaluator never inspects the payload; the host's `ExistsEvaluator`
/// downcasts it back to its own algebra type.
#[derive(Clone)]
pub struct AlgebraFragment(Arc<dyn Any + Send + Sync>);

impl AlgebraFragment {
    /// Wrap a host algebra value.
    pub fn new<T: Any + Send + Sync>(pattern: T) -> Self {
        AlgebraFragment(Arc::new(pattern))
    }

    /// Recover the host algebra value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for AlgebraFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AlgebraFragment(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_downcast() {
        let fragment = AlgebraFragment::new(vec!["?s", "?p", "?o"]);
        assert_eq!(
            fragment.downcast_ref::<Vec<&str>>(),
            Some(&vec!["?s", "?p", "?o"])
        );
        assert!(fragment.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_constructors() {
        let e = Expression::regular(
            RegularOperator::Add,
            vec![
                Expression::constant(Term::integer(1)),
                Expression::variable("x"),
            ],
        );
        match e {
            Expression::Operator { op, args } => {
                assert_eq!(op, Operator::Regular(RegularOperator::Add));
                assert_eq!(args.len(), 2);
            }
            _ => panic!("expected operator node"),
        }
    }
}
