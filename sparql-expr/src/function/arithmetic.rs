//! Arithmetic operators
//!
//! Registered on the same-tag numeric diagonal; mixed numeric operands
//! reach these through the dispatcher's promotion retry, so the result
//! tag is always the lattice join of the operand tags. Integer division
//! produces a decimal.

use sparql_expr_core::{ArithmeticOp, Numeric, TypeTag, TypedValue};

use crate::error::{EvalError, Result};
use crate::operator::RegularOperator;
use crate::registry::Table;

use super::expect_numeric;

pub(crate) fn register(table: &mut Table) {
    for tag in TypeTag::NUMERIC {
        table.insert(RegularOperator::Add, &[tag, tag], add);
        table.insert(RegularOperator::Subtract, &[tag, tag], subtract);
        table.insert(RegularOperator::Multiply, &[tag, tag], multiply);
        table.insert(RegularOperator::Divide, &[tag, tag], divide);
        table.insert(RegularOperator::UnaryMinus, &[tag], unary_minus);
        table.insert(RegularOperator::UnaryPlus, &[tag], unary_plus);
    }
}

fn binary(op: ArithmeticOp, args: &[TypedValue]) -> Result<TypedValue> {
    let lhs = expect_numeric(&args[0]).clone();
    let rhs = expect_numeric(&args[1]).clone();
    Numeric::apply(op, lhs, rhs)
        .map(TypedValue::Numeric)
        .ok_or(EvalError::DivisionByZero)
}

fn add(args: &[TypedValue]) -> Result<TypedValue> {
    binary(ArithmeticOp::Add, args)
}

fn subtract(args: &[TypedValue]) -> Result<TypedValue> {
    binary(ArithmeticOp::Sub, args)
}

fn multiply(args: &[TypedValue]) -> Result<TypedValue> {
    binary(ArithmeticOp::Mul, args)
}

fn divide(args: &[TypedValue]) -> Result<TypedValue> {
    binary(ArithmeticOp::Div, args)
}

fn unary_minus(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Numeric(expect_numeric(&args[0]).clone().neg()))
}

fn unary_plus(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Numeric(expect_numeric(&args[0]).clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::dispatch;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(s: &str) -> TypedValue {
        TypedValue::Numeric(Numeric::decimal(BigDecimal::from_str(s).unwrap()))
    }

    #[test]
    fn test_mixed_addition_promotes() {
        let r = dispatch(
            RegularOperator::Add,
            &[TypedValue::integer(1), dec("1.5")],
        )
        .unwrap();
        assert_eq!(r, dec("2.5"));
    }

    #[test]
    fn test_integer_division_by_zero() {
        let err = dispatch(
            RegularOperator::Divide,
            &[TypedValue::integer(1), TypedValue::integer(0)],
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::DivisionByZero));
    }

    #[test]
    fn test_unary_minus_preserves_tag() {
        let r = dispatch(RegularOperator::UnaryMinus, &[dec("1.5")]).unwrap();
        assert_eq!(r, dec("-1.5"));
    }
}
