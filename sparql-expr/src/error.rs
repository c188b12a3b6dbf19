//! Error types for expression evaluation
//!
//! Evaluation errors form a closed taxonomy. Regular-function errors
//! propagate unchanged through the evaluator; only the special forms
//! (`COALESCE`, `IN`, `||`, `&&`) catch them, and only where SPARQL's
//! error algebra demands it.

use sparql_expr_core::TypeTag;
use thiserror::Error;

use crate::operator::Arity;

/// Expression evaluation errors
#[derive(Error, Debug)]
pub enum EvalError {
    /// Variable lookup found no binding
    #[error("unbound variable: ?{0}")]
    UnboundVariable(String),

    /// Overload dispatch found no entry and numeric promotion did not rescue it
    #[error("no overload of {op} for argument types {tags:?}")]
    InvalidArgumentTypes { op: String, tags: Vec<TypeTag> },

    /// Operand count does not match the operator's declared arity
    #[error("{op} takes {expected} argument(s), got {actual}")]
    InvalidArity {
        op: String,
        expected: Arity,
        actual: usize,
    },

    /// An ill-typed literal reached an operation that needs its typed value
    #[error("invalid lexical form: \"{lexical}\"^^<{datatype}>")]
    InvalidLexicalForm { lexical: String, datatype: String },

    /// Ordering comparison between incomparable value categories
    #[error("cannot compare {left:?} with {right:?}")]
    InvalidCompare { left: TypeTag, right: TypeTag },

    /// EBV coercion on a term that has no effective boolean value
    #[error("no effective boolean value for {0:?}")]
    Ebv(TypeTag),

    /// Every COALESCE branch failed
    #[error("all {} COALESCE argument(s) errored", .0.len())]
    Coalesce(Vec<EvalError>),

    /// IN exhausted its list without a match but saw errors
    #[error("IN list exhausted with {} error(s) and no match", .0.len())]
    In(Vec<EvalError>),

    /// Extension IRI not registered
    #[error("unknown named operator <{0}>")]
    UnknownNamedOperator(String),

    /// An aggregate reached the evaluator; aggregates must be resolved upstream
    #[error("aggregate {0} reached the expression evaluator")]
    UnexpectedAggregate(String),

    /// Host signalled cancellation
    #[error("evaluation cancelled")]
    Cancelled,

    /// XSD constructor cast given an unconvertible value
    #[error("cannot cast \"{value}\" to <{target}>")]
    Cast { value: String, target: String },

    /// Integer or decimal division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// REGEX or REPLACE given a pattern or flags that do not compile
    #[error("invalid regular expression: {0}")]
    InvalidRegex(String),

    /// EXISTS or extension invocation with no hook configured
    #[error("no {0} hook configured")]
    MissingHook(&'static str),
}

/// Result type for evaluation
pub type Result<T> = std::result::Result<T, EvalError>;
