//! Numeric tower for SPARQL arithmetic
//!
//! The four numeric datatypes form the promotion lattice
//! `integer < decimal < float < double`. Arithmetic between two numerics
//! promotes both operands to their join and carries the join's tag on the
//! result, with one exception: dividing two integers produces a decimal.
//!
//! Integer and decimal arithmetic is exact (`BigInt` / `BigDecimal`);
//! float and double follow IEEE-754. Values are never silently collapsed
//! into 64-bit machine integers.

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// A typed numeric value.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    /// Arbitrary precision integer (xsd:integer and its derived types).
    /// Boxed to keep the enum small.
    Integer(Box<BigInt>),
    /// Arbitrary precision decimal (xsd:decimal).
    /// Boxed to keep the enum small.
    Decimal(Box<BigDecimal>),
    /// IEEE-754 32-bit (xsd:float)
    Float(f32),
    /// IEEE-754 64-bit (xsd:double)
    Double(f64),
}

/// Position of a numeric type in the promotion lattice.
///
/// The derived ordering is the lattice order, so the join of two tags is
/// `max(a, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericTag {
    Integer,
    Decimal,
    Float,
    Double,
}

impl NumericTag {
    /// Join of two tags in the promotion lattice.
    pub fn join(a: NumericTag, b: NumericTag) -> NumericTag {
        a.max(b)
    }
}

/// Arithmetic operator over the numeric tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Numeric {
    /// Convenience constructor from a machine integer.
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Numeric::Integer(Box::new(value.into()))
    }

    /// Convenience constructor for decimals.
    pub fn decimal(value: BigDecimal) -> Self {
        Numeric::Decimal(Box::new(value))
    }

    /// This value's position in the promotion lattice.
    pub fn tag(&self) -> NumericTag {
        match self {
            Numeric::Integer(_) => NumericTag::Integer,
            Numeric::Decimal(_) => NumericTag::Decimal,
            Numeric::Float(_) => NumericTag::Float,
            Numeric::Double(_) => NumericTag::Double,
        }
    }

    /// Promote this value to `target`. Promotion only moves up the
    /// lattice; a target at or below the current tag returns the value
    /// unchanged.
    pub fn promote(self, target: NumericTag) -> Numeric {
        if target <= self.tag() {
            return self;
        }
        match (self, target) {
            (Numeric::Integer(a), NumericTag::Decimal) => {
                Numeric::Decimal(Box::new(BigDecimal::from(*a)))
            }
            (Numeric::Integer(a), NumericTag::Float) => Numeric::Float(big_int_to_f64(&a) as f32),
            (Numeric::Integer(a), NumericTag::Double) => Numeric::Double(big_int_to_f64(&a)),
            (Numeric::Decimal(a), NumericTag::Float) => {
                Numeric::Float(a.to_f64().unwrap_or(f64::NAN) as f32)
            }
            (Numeric::Decimal(a), NumericTag::Double) => {
                Numeric::Double(a.to_f64().unwrap_or(f64::NAN))
            }
            (Numeric::Float(a), NumericTag::Double) => Numeric::Double(a as f64),
            (v, _) => v,
        }
    }

    /// Apply an arithmetic operation, promoting mixed operands to their
    /// join. The result carries the join's tag, except that dividing two
    /// integers produces a decimal.
    ///
    /// Returns `None` only for integer or decimal division by zero;
    /// float and double division follows IEEE-754 (±INF, NaN).
    pub fn apply(op: ArithmeticOp, lhs: Numeric, rhs: Numeric) -> Option<Numeric> {
        match (lhs, rhs) {
            (Numeric::Integer(a), Numeric::Integer(b)) => match op {
                ArithmeticOp::Add => Some(Numeric::Integer(Box::new(*a + *b))),
                ArithmeticOp::Sub => Some(Numeric::Integer(Box::new(*a - *b))),
                ArithmeticOp::Mul => Some(Numeric::Integer(Box::new(*a * *b))),
                ArithmeticOp::Div => {
                    if b.is_zero() {
                        return None;
                    }
                    Some(Numeric::Decimal(Box::new(
                        BigDecimal::from(*a) / BigDecimal::from(*b),
                    )))
                }
            },
            (Numeric::Decimal(a), Numeric::Decimal(b)) => match op {
                ArithmeticOp::Add => Some(Numeric::Decimal(Box::new(&*a + &*b))),
                ArithmeticOp::Sub => Some(Numeric::Decimal(Box::new(&*a - &*b))),
                ArithmeticOp::Mul => Some(Numeric::Decimal(Box::new(&*a * &*b))),
                ArithmeticOp::Div => {
                    if b.is_zero() {
                        return None;
                    }
                    Some(Numeric::Decimal(Box::new(&*a / &*b)))
                }
            },
            (Numeric::Float(a), Numeric::Float(b)) => Some(Numeric::Float(match op {
                ArithmeticOp::Add => a + b,
                ArithmeticOp::Sub => a - b,
                ArithmeticOp::Mul => a * b,
                ArithmeticOp::Div => a / b,
            })),
            (Numeric::Double(a), Numeric::Double(b)) => Some(Numeric::Double(match op {
                ArithmeticOp::Add => a + b,
                ArithmeticOp::Sub => a - b,
                ArithmeticOp::Mul => a * b,
                ArithmeticOp::Div => a / b,
            })),
            // Mixed tags: promote both to the join and retry
            (lhs, rhs) => {
                let join = NumericTag::join(lhs.tag(), rhs.tag());
                Numeric::apply(op, lhs.promote(join), rhs.promote(join))
            }
        }
    }

    /// Unary minus, preserving the tag.
    pub fn neg(self) -> Numeric {
        match self {
            Numeric::Integer(a) => Numeric::Integer(Box::new(-*a)),
            Numeric::Decimal(a) => Numeric::Decimal(Box::new(-*a)),
            Numeric::Float(a) => Numeric::Float(-a),
            Numeric::Double(a) => Numeric::Double(-a),
        }
    }

    /// Absolute value, preserving the tag.
    pub fn abs(self) -> Numeric {
        match self {
            Numeric::Integer(a) => Numeric::Integer(Box::new(a.abs())),
            Numeric::Decimal(a) => Numeric::Decimal(Box::new(a.abs())),
            Numeric::Float(a) => Numeric::Float(a.abs()),
            Numeric::Double(a) => Numeric::Double(a.abs()),
        }
    }

    /// Round to the nearest whole number; ties round toward positive
    /// infinity (XPath fn:round).
    pub fn round(self) -> Numeric {
        match self {
            Numeric::Integer(a) => Numeric::Integer(a),
            Numeric::Decimal(a) => {
                let half = BigDecimal::new(BigInt::from(5), 1);
                Numeric::Decimal(Box::new(
                    (&*a + half).with_scale_round(0, RoundingMode::Floor),
                ))
            }
            Numeric::Float(a) => Numeric::Float(round_half_ceiling_f64(a as f64) as f32),
            Numeric::Double(a) => Numeric::Double(round_half_ceiling_f64(a)),
        }
    }

    /// Smallest whole number not less than the value.
    pub fn ceil(self) -> Numeric {
        match self {
            Numeric::Integer(a) => Numeric::Integer(a),
            Numeric::Decimal(a) => {
                Numeric::Decimal(Box::new(a.with_scale_round(0, RoundingMode::Ceiling)))
            }
            Numeric::Float(a) => Numeric::Float(a.ceil()),
            Numeric::Double(a) => Numeric::Double(a.ceil()),
        }
    }

    /// Largest whole number not greater than the value.
    pub fn floor(self) -> Numeric {
        match self {
            Numeric::Integer(a) => Numeric::Integer(a),
            Numeric::Decimal(a) => {
                Numeric::Decimal(Box::new(a.with_scale_round(0, RoundingMode::Floor)))
            }
            Numeric::Float(a) => Numeric::Float(a.floor()),
            Numeric::Double(a) => Numeric::Double(a.floor()),
        }
    }

    /// True if the value is zero or NaN (the numeric EBV-false cases;
    /// covers `-0.0`).
    pub fn is_zero_or_nan(&self) -> bool {
        match self {
            Numeric::Integer(a) => a.is_zero(),
            Numeric::Decimal(a) => a.is_zero(),
            Numeric::Float(a) => *a == 0.0 || a.is_nan(),
            Numeric::Double(a) => *a == 0.0 || a.is_nan(),
        }
    }

    /// Canonical lexical form for the value's datatype.
    pub fn lexical(&self) -> String {
        match self {
            Numeric::Integer(a) => a.to_string(),
            Numeric::Decimal(a) => decimal_lexical(a),
            Numeric::Float(a) => float_lexical(*a),
            Numeric::Double(a) => double_lexical(*a),
        }
    }

    /// Datatype IRI corresponding to the value's tag.
    pub fn datatype_iri(&self) -> &'static str {
        use sparql_expr_vocab::xsd;
        match self {
            Numeric::Integer(_) => xsd::INTEGER,
            Numeric::Decimal(_) => xsd::DECIMAL,
            Numeric::Float(_) => xsd::FLOAT,
            Numeric::Double(_) => xsd::DOUBLE,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexical())
    }
}

/// Compare two numeric values mathematically, across tags.
///
/// Integer/decimal comparisons are exact; comparisons against float or
/// double promote the exact side to `BigDecimal` rather than collapsing
/// big integers into `f64`. Returns `None` only when NaN is involved.
pub fn cmp_numeric(a: &Numeric, b: &Numeric) -> Option<Ordering> {
    match (a, b) {
        // Same-tag fast paths
        (Numeric::Integer(a), Numeric::Integer(b)) => Some(a.cmp(b)),
        (Numeric::Decimal(a), Numeric::Decimal(b)) => a.partial_cmp(b),
        (Numeric::Float(a), Numeric::Float(b)) => a.partial_cmp(b),
        (Numeric::Double(a), Numeric::Double(b)) => a.partial_cmp(b),

        // Exact pairs
        (Numeric::Integer(a), Numeric::Decimal(b)) => {
            BigDecimal::from((**a).clone()).partial_cmp(&**b)
        }
        (Numeric::Decimal(a), Numeric::Integer(b)) => {
            (**a).partial_cmp(&BigDecimal::from((**b).clone()))
        }

        // Float and double against each other
        (Numeric::Float(a), Numeric::Double(b)) => (*a as f64).partial_cmp(b),
        (Numeric::Double(a), Numeric::Float(b)) => a.partial_cmp(&(*b as f64)),

        // Exact against IEEE: go through BigDecimal so large integers
        // compare correctly
        (Numeric::Integer(a), Numeric::Float(b)) => {
            cmp_big_decimal_f64(&BigDecimal::from((**a).clone()), *b as f64)
        }
        (Numeric::Integer(a), Numeric::Double(b)) => {
            cmp_big_decimal_f64(&BigDecimal::from((**a).clone()), *b)
        }
        (Numeric::Decimal(a), Numeric::Float(b)) => cmp_big_decimal_f64(a, *b as f64),
        (Numeric::Decimal(a), Numeric::Double(b)) => cmp_big_decimal_f64(a, *b),
        (Numeric::Float(_), Numeric::Integer(_))
        | (Numeric::Float(_), Numeric::Decimal(_))
        | (Numeric::Double(_), Numeric::Integer(_))
        | (Numeric::Double(_), Numeric::Decimal(_)) => {
            cmp_numeric(b, a).map(Ordering::reverse)
        }
    }
}

fn cmp_big_decimal_f64(a: &BigDecimal, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        None
    } else if f == f64::INFINITY {
        Some(Ordering::Less)
    } else if f == f64::NEG_INFINITY {
        Some(Ordering::Greater)
    } else {
        BigDecimal::try_from(f).ok().and_then(|fd| a.partial_cmp(&fd))
    }
}

fn big_int_to_f64(value: &BigInt) -> f64 {
    value.to_f64().unwrap_or_else(|| {
        if value.is_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }
    })
}

fn round_half_ceiling_f64(x: f64) -> f64 {
    // f64::round ties away from zero; XPath rounds ties toward +INF
    if x.fract() == -0.5 {
        x.ceil()
    } else {
        x.round()
    }
}

// =============================================================================
// Lexical forms
// =============================================================================

/// Parse an `xsd:integer` lexical form: optional sign, one or more ASCII
/// digits, no leading zeros other than `"0"` itself.
pub fn parse_integer_lexical(s: &str) -> Option<BigInt> {
    if !is_valid_integer_lexical(s) {
        return None;
    }
    s.parse::<BigInt>().ok()
}

/// Parse an `xsd:decimal` lexical form: the integer form with an optional
/// fractional part (`.` followed by one or more digits).
pub fn parse_decimal_lexical(s: &str) -> Option<BigDecimal> {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    if !is_valid_integer_lexical(int_part) {
        return None;
    }
    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    s.parse::<BigDecimal>().ok()
}

/// Parse an `xsd:float` lexical form, including `INF`, `+INF`, `-INF`,
/// and `NaN`.
pub fn parse_float_lexical(s: &str) -> Option<f32> {
    match s {
        "INF" | "+INF" => Some(f32::INFINITY),
        "-INF" => Some(f32::NEG_INFINITY),
        "NaN" => Some(f32::NAN),
        _ => {
            if is_valid_float_lexical(s) {
                s.parse::<f32>().ok()
            } else {
                None
            }
        }
    }
}

/// Parse an `xsd:double` lexical form, including `INF`, `+INF`, `-INF`,
/// and `NaN`.
pub fn parse_double_lexical(s: &str) -> Option<f64> {
    match s {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => {
            if is_valid_float_lexical(s) {
                s.parse::<f64>().ok()
            } else {
                None
            }
        }
    }
}

fn is_valid_integer_lexical(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    digits.len() == 1 || !digits.starts_with('0')
}

/// XSD float/double mantissa-exponent grammar:
/// `sign? (digits ('.' digits?)? | '.' digits) ([eE] sign? digits)?`
fn is_valid_float_lexical(s: &str) -> bool {
    let (mantissa, exponent) = match s.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (s, None),
    };

    let m = mantissa.strip_prefix(['+', '-']).unwrap_or(mantissa);
    let mantissa_ok = match m.split_once('.') {
        Some((int, frac)) => {
            let digits_ok =
                int.bytes().all(|b| b.is_ascii_digit()) && frac.bytes().all(|b| b.is_ascii_digit());
            digits_ok && (!int.is_empty() || !frac.is_empty())
        }
        None => !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()),
    };
    if !mantissa_ok {
        return false;
    }

    match exponent {
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && e.bytes().all(|b| b.is_ascii_digit())
        }
        None => true,
    }
}

/// Canonical decimal lexical: trailing zeros stripped.
pub fn decimal_lexical(value: &BigDecimal) -> String {
    value.clone().normalized().to_string()
}

/// Lexical form for an `xsd:float` value.
pub fn float_lexical(value: f32) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f32::INFINITY {
        "INF".to_string()
    } else if value == f32::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

/// Lexical form for an `xsd:double` value.
pub fn double_lexical(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}
