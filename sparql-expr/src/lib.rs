//! # sparql-expr
//!
//! A SPARQL 1.1 expression evaluator: given an algebraic expression tree
//! and a solution mapping, return the RDF term the expression denotes or
//! a typed evaluation error.
//!
//! This crate provides:
//! - the expression AST (`Expression`) consumed from a SPARQL algebra
//!   parser
//! - a statically initialised function registry with exact-tuple overload
//!   dispatch and numeric-promotion retry
//! - the special functional forms (`BOUND`, `IF`, `COALESCE`, `||`, `&&`,
//!   `sameTerm`, `IN`) with SPARQL's error-propagation rules
//! - injected hooks for `EXISTS`, extension functions, `NOW()` pinning,
//!   and base-IRI resolution
//!
//! ## Quick start
//!
//! ```
//! use sparql_expr::{EvalContext, Evaluator, Expression, Mapping, RegularOperator, Term};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let evaluator = Evaluator::new(EvalContext::default());
//! let mut mapping = Mapping::new();
//! mapping.bind("x", Term::integer(41));
//!
//! // ?x + 1
//! let expr = Expression::regular(
//!     RegularOperator::Add,
//!     vec![Expression::variable("x"), Expression::constant(Term::integer(1))],
//! );
//! let result = evaluator.evaluate(&expr, &mapping).await.unwrap();
//! assert_eq!(result, Term::integer(42));
//! # }
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod eval;
pub mod mapping;
pub mod operator;

mod forms;
mod function;
mod registry;

// Re-exports
pub use ast::{AlgebraFragment, Expression};
pub use context::{
    Cancellation, EvalContext, EvalContextBuilder, ExistsEvaluator, ExtensionFunction,
    ExtensionRegistry, IriResolver, MapExtensionRegistry, SimpleIriResolver,
};
pub use error::{EvalError, Result};
pub use eval::{effective_boolean_value, Evaluator};
pub use mapping::Mapping;
pub use operator::{Arity, Operator, RegularOperator, SpecialOperator};

// Term model re-exports for hosts
pub use sparql_expr_core::{
    order_terms, value_cmp, Literal, Numeric, NumericTag, Term, TypeTag, TypedValue, XsdDateTime,
};
