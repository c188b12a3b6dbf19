//! DateTime accessor functions: YEAR, MONTH, DAY, HOURS, MINUTES,
//! SECONDS, TZ
//!
//! All accessors read the value as written (original timezone offset),
//! not the normalized UTC instant. SECONDS returns a decimal so
//! fractional seconds survive. NOW lives on the evaluator because it
//! reads the context's pinned timestamp.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use sparql_expr_core::{Numeric, TypeTag, TypedValue};
use std::sync::Arc;

use crate::error::Result;
use crate::operator::RegularOperator;
use crate::registry::Table;

use super::expect_date_time;

pub(crate) fn register(table: &mut Table) {
    let dt = &[TypeTag::DateTime];
    table.insert(RegularOperator::Year, dt, year);
    table.insert(RegularOperator::Month, dt, month);
    table.insert(RegularOperator::Day, dt, day);
    table.insert(RegularOperator::Hours, dt, hours);
    table.insert(RegularOperator::Minutes, dt, minutes);
    table.insert(RegularOperator::Seconds, dt, seconds);
    table.insert(RegularOperator::Tz, dt, tz);
}

fn year(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(integer(expect_date_time(&args[0]).year() as i64))
}

fn month(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(integer(expect_date_time(&args[0]).month() as i64))
}

fn day(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(integer(expect_date_time(&args[0]).day() as i64))
}

fn hours(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(integer(expect_date_time(&args[0]).hours() as i64))
}

fn minutes(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(integer(expect_date_time(&args[0]).minutes() as i64))
}

fn seconds(args: &[TypedValue]) -> Result<TypedValue> {
    let dt = expect_date_time(&args[0]);
    let nanos = dt.seconds() as i64 * 1_000_000_000 + dt.nanoseconds() as i64;
    Ok(TypedValue::Numeric(Numeric::decimal(BigDecimal::new(
        BigInt::from(nanos),
        9,
    ))))
}

fn tz(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::String(Arc::from(
        expect_date_time(&args[0]).tz_lexical(),
    )))
}

fn integer(value: i64) -> TypedValue {
    TypedValue::Numeric(Numeric::integer(value))
}
