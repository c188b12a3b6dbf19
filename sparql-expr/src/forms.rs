//! Special functional forms
//!
//! These receive their sub-expressions unevaluated, so they control the
//! order of sub-evaluation and which sub-errors propagate. This is where
//! SPARQL's error algebra lives: the `||` / `&&` truth tables over
//! {true, false, error}, COALESCE's first-success rule, and IN's
//! record-and-continue error handling.

use sparql_expr_core::{Term, TypedValue};

use crate::ast::Expression;
use crate::error::{EvalError, Result};
use crate::eval::{effective_boolean_value, Evaluator};
use crate::function::compare;
use crate::mapping::Mapping;
use crate::operator::SpecialOperator;

impl Evaluator {
    pub(crate) async fn eval_special(
        &self,
        op: SpecialOperator,
        args: &[Expression],
        mapping: &Mapping,
    ) -> Result<Term> {
        match op {
            SpecialOperator::Bound => self.eval_bound(args, mapping),
            SpecialOperator::If => self.eval_if(args, mapping).await,
            SpecialOperator::Coalesce => self.eval_coalesce(args, mapping).await,
            SpecialOperator::LogicalOr => self.eval_or(args, mapping).await,
            SpecialOperator::LogicalAnd => self.eval_and(args, mapping).await,
            SpecialOperator::SameTerm => self.eval_same_term(args, mapping).await,
            SpecialOperator::In => self.eval_in(args, mapping, false).await,
            SpecialOperator::NotIn => self.eval_in(args, mapping, true).await,
        }
    }

    /// BOUND inspects its argument unevaluated: it must be a variable
    /// node, and the result is whether the mapping binds it.
    fn eval_bound(&self, args: &[Expression], mapping: &Mapping) -> Result<Term> {
        let Expression::Variable(name) = &args[0] else {
            return Err(EvalError::InvalidArgumentTypes {
                op: SpecialOperator::Bound.symbol().to_string(),
                tags: vec![],
            });
        };
        Ok(Term::boolean(mapping.contains(name)))
    }

    /// IF evaluates exactly one branch; an EBV failure on the condition
    /// is the form's failure.
    async fn eval_if(&self, args: &[Expression], mapping: &Mapping) -> Result<Term> {
        if self.ebv_of(&args[0], mapping).await? {
            self.eval(&args[1], mapping).await
        } else {
            self.eval(&args[2], mapping).await
        }
    }

    /// COALESCE returns the first argument that evaluates successfully;
    /// if all fail, the collected errors travel in the form's error.
    async fn eval_coalesce(&self, args: &[Expression], mapping: &Mapping) -> Result<Term> {
        let mut errors = Vec::new();
        for arg in args {
            match self.eval(arg, mapping).await {
                Ok(term) => return Ok(term),
                Err(e) => errors.push(e),
            }
        }
        Err(EvalError::Coalesce(errors))
    }

    /// `||` truth table: a confirmed `true` wins even when the other
    /// operand errors; an error only propagates alongside `false`.
    /// When both operands error, the left error propagates.
    async fn eval_or(&self, args: &[Expression], mapping: &Mapping) -> Result<Term> {
        match self.ebv_of(&args[0], mapping).await {
            Ok(true) => Ok(Term::boolean(true)),
            Ok(false) => Ok(Term::boolean(self.ebv_of(&args[1], mapping).await?)),
            Err(left_err) => match self.ebv_of(&args[1], mapping).await {
                Ok(true) => Ok(Term::boolean(true)),
                _ => Err(left_err),
            },
        }
    }

    /// `&&` truth table, dual to `||`: a confirmed `false` wins even when
    /// the other operand errors.
    async fn eval_and(&self, args: &[Expression], mapping: &Mapping) -> Result<Term> {
        match self.ebv_of(&args[0], mapping).await {
            Ok(false) => Ok(Term::boolean(false)),
            Ok(true) => Ok(Term::boolean(self.ebv_of(&args[1], mapping).await?)),
            Err(left_err) => match self.ebv_of(&args[1], mapping).await {
                Ok(false) => Ok(Term::boolean(false)),
                _ => Err(left_err),
            },
        }
    }

    /// sameTerm: strict left-to-right evaluation, then structural term
    /// identity.
    async fn eval_same_term(&self, args: &[Expression], mapping: &Mapping) -> Result<Term> {
        let left = self.eval(&args[0], mapping).await?;
        let right = self.eval(&args[1], mapping).await?;
        Ok(Term::boolean(left == right))
    }

    /// IN / NOT IN. The needle's error propagates directly. Each list
    /// member is evaluated and value-compared in order; a match wins
    /// immediately, errors are recorded and the scan continues. A list
    /// exhausted without a match fails if any member errored.
    async fn eval_in(
        &self,
        args: &[Expression],
        mapping: &Mapping,
        negated: bool,
    ) -> Result<Term> {
        let needle = self.eval(&args[0], mapping).await?;
        let needle_view = TypedValue::of(&needle);
        let mut errors = Vec::new();
        for candidate in &args[1..] {
            match self.eval(candidate, mapping).await {
                Err(e) => errors.push(e),
                Ok(term) => {
                    match compare::evaluate_equal(&[needle_view.clone(), TypedValue::of(&term)]) {
                        Ok(TypedValue::Boolean(true)) => return Ok(Term::boolean(!negated)),
                        Ok(_) => {}
                        Err(e) => errors.push(e),
                    }
                }
            }
        }
        if errors.is_empty() {
            Ok(Term::boolean(negated))
        } else {
            Err(EvalError::In(errors))
        }
    }

    async fn ebv_of(&self, expr: &Expression, mapping: &Mapping) -> Result<bool> {
        let term = self.eval(expr, mapping).await?;
        effective_boolean_value(&term)
    }
}
