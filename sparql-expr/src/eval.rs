//! Tree evaluator
//!
//! `Evaluator::evaluate(expr, mapping)` walks the expression tree and
//! returns the term it denotes or one evaluation error. Regular operator
//! arguments are evaluated strictly left-to-right; special forms control
//! their own evaluation order. The only suspension points are the
//! injected EXISTS and extension-function hooks.

use std::future::Future;
use std::pin::Pin;

use sparql_expr_core::{Term, TypedValue};

use crate::ast::Expression;
use crate::context::EvalContext;
use crate::error::{EvalError, Result};
use crate::function::{cast, compare, string, terms};
use crate::mapping::Mapping;
use crate::operator::{Arity, Operator, RegularOperator};
use crate::registry;

/// Effective boolean value of a term, as used by `FILTER` and the
/// logical connectives. Fails on terms with no EBV.
pub fn effective_boolean_value(term: &Term) -> Result<bool> {
    ebv_value(&TypedValue::of(term))
}

pub(crate) fn ebv_value(value: &TypedValue) -> Result<bool> {
    value.ebv().ok_or_else(|| EvalError::Ebv(value.tag()))
}

type TermFuture<'a> = Pin<Box<dyn Future<Output = Result<Term>> + Send + 'a>>;

/// Expression evaluator over one `EvalContext`.
///
/// Holds no mutable state; one evaluator may serve concurrent
/// `evaluate` calls on distinct mappings.
pub struct Evaluator {
    ctx: EvalContext,
}

impl Evaluator {
    pub fn new(ctx: EvalContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// Evaluate an expression under a solution mapping.
    pub async fn evaluate(&self, expr: &Expression, mapping: &Mapping) -> Result<Term> {
        self.eval(expr, mapping).await
    }

    /// Recursive entry point. Boxed so the async recursion has a sized
    /// future; cancellation is checked at every entry, which covers
    /// every sub-evaluation boundary.
    pub(crate) fn eval<'a>(&'a self, expr: &'a Expression, mapping: &'a Mapping) -> TermFuture<'a> {
        Box::pin(async move {
            if self.ctx.cancellation().is_cancelled() {
                return Err(EvalError::Cancelled);
            }
            match expr {
                Expression::Variable(name) => mapping
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnboundVariable(name.clone())),

                Expression::Term(term) => Ok(term.clone()),

                Expression::Operator { op, args } => {
                    let arity = match op {
                        Operator::Regular(regular) => regular.arity(),
                        Operator::Special(special) => special.arity(),
                    };
                    if !arity.accepts(args.len()) {
                        return Err(EvalError::InvalidArity {
                            op: op.symbol().to_string(),
                            expected: arity,
                            actual: args.len(),
                        });
                    }
                    match op {
                        Operator::Special(special) => {
                            self.eval_special(*special, args, mapping).await
                        }
                        Operator::Regular(regular) => {
                            let mut operands = Vec::with_capacity(args.len());
                            for arg in args {
                                operands.push(self.eval(arg, mapping).await?);
                            }
                            self.apply_regular(*regular, &operands)
                        }
                    }
                }

                Expression::Named { iri, args } => self.eval_named(iri, args, mapping).await,

                Expression::Exists { pattern, negated } => {
                    let hook = self
                        .ctx
                        .exists_evaluator()
                        .ok_or(EvalError::MissingHook("EXISTS"))?;
                    tracing::debug!(negated = *negated, "delegating existence check to host hook");
                    let found = hook.evaluate_exists(pattern, mapping).await?;
                    Ok(Term::boolean(found != *negated))
                }

                Expression::Aggregate { name, .. } => {
                    Err(EvalError::UnexpectedAggregate(name.clone()))
                }
            }
        })
    }

    /// Named function call: XSD constructor casts resolve first, then the
    /// host's extension registry.
    async fn eval_named(&self, iri: &str, args: &[Expression], mapping: &Mapping) -> Result<Term> {
        if let Some(target) = cast::target_for_iri(iri) {
            if args.len() != 1 {
                return Err(EvalError::InvalidArity {
                    op: iri.to_string(),
                    expected: Arity::exactly(1),
                    actual: args.len(),
                });
            }
            let operand = self.eval(&args[0], mapping).await?;
            return cast::apply(target, &TypedValue::of(&operand)).map(TypedValue::into_term);
        }

        let extensions = self
            .ctx
            .extensions()
            .ok_or(EvalError::MissingHook("extension registry"))?;
        let function = extensions
            .lookup(iri)
            .ok_or_else(|| EvalError::UnknownNamedOperator(iri.to_string()))?;
        if let Some(expected) = function.arity() {
            if expected != args.len() {
                return Err(EvalError::InvalidArity {
                    op: iri.to_string(),
                    expected: Arity::exactly(expected),
                    actual: args.len(),
                });
            }
        }
        let mut operands = Vec::with_capacity(args.len());
        for arg in args {
            operands.push(self.eval(arg, mapping).await?);
        }
        tracing::debug!(iri, "invoking extension function");
        function.invoke(&operands).await
    }

    /// Apply a regular operator to evaluated operands. The handful of
    /// operators that are derived, variadic, or context-dependent resolve
    /// here; everything else goes through the overload registry.
    fn apply_regular(&self, op: RegularOperator, operands: &[Term]) -> Result<Term> {
        let values: Vec<TypedValue> = operands.iter().map(TypedValue::of).collect();
        let result = match op {
            RegularOperator::Equal => compare::evaluate_equal(&values)?,
            RegularOperator::NotEqual => negate(compare::evaluate_equal(&values)?),
            RegularOperator::Not => TypedValue::Boolean(!ebv_value(&values[0])?),
            RegularOperator::Concat => string::concat(&values)?,
            RegularOperator::Now => TypedValue::DateTime(Box::new(self.ctx.now().clone())),
            RegularOperator::Iri => terms::iri(&self.ctx, &values[0])?,
            _ => registry::dispatch(op, &values)?,
        };
        Ok(result.into_term())
    }
}

fn negate(value: TypedValue) -> TypedValue {
    match value {
        TypedValue::Boolean(b) => TypedValue::Boolean(!b),
        _ => unreachable!("equality evaluates to a boolean"),
    }
}
