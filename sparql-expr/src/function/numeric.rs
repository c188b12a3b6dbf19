//! Numeric functions: ABS, ROUND, CEIL, FLOOR, RAND

use rand::random;
use sparql_expr_core::{Numeric, TypeTag, TypedValue};

use crate::error::Result;
use crate::operator::RegularOperator;
use crate::registry::Table;

use super::expect_numeric;

pub(crate) fn register(table: &mut Table) {
    for tag in TypeTag::NUMERIC {
        table.insert(RegularOperator::Abs, &[tag], abs);
        table.insert(RegularOperator::Round, &[tag], round);
        table.insert(RegularOperator::Ceil, &[tag], ceil);
        table.insert(RegularOperator::Floor, &[tag], floor);
    }
    table.insert(RegularOperator::Rand, &[], rand_double);
}

fn abs(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Numeric(expect_numeric(&args[0]).clone().abs()))
}

fn round(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Numeric(expect_numeric(&args[0]).clone().round()))
}

fn ceil(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Numeric(expect_numeric(&args[0]).clone().ceil()))
}

fn floor(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Numeric(expect_numeric(&args[0]).clone().floor()))
}

fn rand_double(_args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Numeric(Numeric::Double(random::<f64>())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::dispatch;

    #[test]
    fn test_abs_preserves_tag() {
        let r = dispatch(RegularOperator::Abs, &[TypedValue::integer(-3)]).unwrap();
        assert_eq!(r, TypedValue::integer(3));
    }

    #[test]
    fn test_round_on_double() {
        let r = dispatch(
            RegularOperator::Round,
            &[TypedValue::Numeric(Numeric::Double(2.4))],
        )
        .unwrap();
        assert_eq!(r, TypedValue::Numeric(Numeric::Double(2.0)));
    }

    #[test]
    fn test_rand_range() {
        let r = dispatch(RegularOperator::Rand, &[]).unwrap();
        match r {
            TypedValue::Numeric(Numeric::Double(v)) => assert!((0.0..1.0).contains(&v)),
            other => panic!("expected double, got {:?}", other),
        }
    }
}
