//! Operator catalogue
//!
//! Two kinds of operators:
//! - `RegularOperator`: arguments are evaluated left-to-right before the
//!   operator runs; overloads resolve through the function registry.
//! - `SpecialOperator`: receives its sub-expressions unevaluated plus an
//!   evaluator handle, so it controls evaluation order and which
//!   sub-errors propagate (short-circuit logic, COALESCE, BOUND, ...).

use std::fmt;

/// An operator in an `Expression::Operator` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Regular(RegularOperator),
    Special(SpecialOperator),
}

/// Operators whose arguments are evaluated eagerly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegularOperator {
    // Comparison
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    UnaryPlus,
    UnaryMinus,
    Not,
    // Strings
    Str,
    Lang,
    LangMatches,
    Datatype,
    StrLen,
    SubStr,
    UCase,
    LCase,
    StrStarts,
    StrEnds,
    Contains,
    StrBefore,
    StrAfter,
    EncodeForUri,
    Concat,
    Regex,
    Replace,
    StrDt,
    StrLang,
    // Numeric
    Abs,
    Round,
    Ceil,
    Floor,
    Rand,
    // DateTime
    Now,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Tz,
    // Terms
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Iri,
    BNode,
    Uuid,
    StrUuid,
    // Hashes
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

/// Functional forms with custom evaluation order and error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialOperator {
    Bound,
    If,
    Coalesce,
    LogicalOr,
    LogicalAnd,
    SameTerm,
    In,
    NotIn,
}

/// Declared arity of an operator: a minimum and an optional maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Arity { min: n, max: Some(n) }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Arity {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Arity { min, max: None }
    }

    /// True if `n` operands satisfy this arity.
    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (min, Some(max)) if min == max => write!(f, "exactly {}", min),
            (min, Some(max)) => write!(f, "between {} and {}", min, max),
            (min, None) => write!(f, "at least {}", min),
        }
    }
}

impl RegularOperator {
    /// The operator's SPARQL symbol or keyword (lowercase).
    pub fn symbol(&self) -> &'static str {
        use RegularOperator::*;
        match self {
            Equal => "=",
            NotEqual => "!=",
            LessThan => "<",
            GreaterThan => ">",
            LessThanOrEqual => "<=",
            GreaterThanOrEqual => ">=",
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            UnaryPlus => "uplus",
            UnaryMinus => "uminus",
            Not => "!",
            Str => "str",
            Lang => "lang",
            LangMatches => "langmatches",
            Datatype => "datatype",
            StrLen => "strlen",
            SubStr => "substr",
            UCase => "ucase",
            LCase => "lcase",
            StrStarts => "strstarts",
            StrEnds => "strends",
            Contains => "contains",
            StrBefore => "strbefore",
            StrAfter => "strafter",
            EncodeForUri => "encode_for_uri",
            Concat => "concat",
            Regex => "regex",
            Replace => "replace",
            StrDt => "strdt",
            StrLang => "strlang",
            Abs => "abs",
            Round => "round",
            Ceil => "ceil",
            Floor => "floor",
            Rand => "rand",
            Now => "now",
            Year => "year",
            Month => "month",
            Day => "day",
            Hours => "hours",
            Minutes => "minutes",
            Seconds => "seconds",
            Tz => "tz",
            IsIri => "isiri",
            IsBlank => "isblank",
            IsLiteral => "isliteral",
            IsNumeric => "isnumeric",
            Iri => "iri",
            BNode => "bnode",
            Uuid => "uuid",
            StrUuid => "struuid",
            Md5 => "md5",
            Sha1 => "sha1",
            Sha256 => "sha256",
            Sha384 => "sha384",
            Sha512 => "sha512",
        }
    }

    /// Declared arity; the evaluator pre-checks it before evaluating
    /// operands.
    pub fn arity(&self) -> Arity {
        use RegularOperator::*;
        match self {
            Equal | NotEqual | LessThan | GreaterThan | LessThanOrEqual | GreaterThanOrEqual
            | Add | Subtract | Multiply | Divide | LangMatches | StrStarts | StrEnds | Contains
            | StrBefore | StrAfter | StrDt | StrLang => Arity::exactly(2),
            UnaryPlus | UnaryMinus | Not | Str | Lang | Datatype | StrLen | UCase | LCase
            | EncodeForUri | Abs | Round | Ceil | Floor | Year | Month | Day | Hours | Minutes
            | Seconds | Tz | IsIri | IsBlank | IsLiteral | IsNumeric | Iri | Md5 | Sha1 | Sha256
            | Sha384 | Sha512 => Arity::exactly(1),
            Rand | Now | Uuid | StrUuid => Arity::exactly(0),
            BNode => Arity::between(0, 1),
            SubStr | Regex => Arity::between(2, 3),
            Replace => Arity::between(3, 4),
            Concat => Arity::at_least(0),
        }
    }

    /// True for the four ordering comparisons, whose dispatch failures on
    /// orderable-but-different categories report a comparison error.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            RegularOperator::LessThan
                | RegularOperator::GreaterThan
                | RegularOperator::LessThanOrEqual
                | RegularOperator::GreaterThanOrEqual
        )
    }
}

impl SpecialOperator {
    /// The form's SPARQL symbol or keyword (lowercase).
    pub fn symbol(&self) -> &'static str {
        match self {
            SpecialOperator::Bound => "bound",
            SpecialOperator::If => "if",
            SpecialOperator::Coalesce => "coalesce",
            SpecialOperator::LogicalOr => "||",
            SpecialOperator::LogicalAnd => "&&",
            SpecialOperator::SameTerm => "sameterm",
            SpecialOperator::In => "in",
            SpecialOperator::NotIn => "notin",
        }
    }

    /// Declared arity, checked before the form runs.
    pub fn arity(&self) -> Arity {
        match self {
            SpecialOperator::Bound => Arity::exactly(1),
            SpecialOperator::If => Arity::exactly(3),
            SpecialOperator::Coalesce => Arity::at_least(1),
            SpecialOperator::LogicalOr | SpecialOperator::LogicalAnd => Arity::exactly(2),
            SpecialOperator::SameTerm => Arity::exactly(2),
            SpecialOperator::In | SpecialOperator::NotIn => Arity::at_least(1),
        }
    }
}

impl Operator {
    /// The operator's SPARQL symbol or keyword.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Regular(op) => op.symbol(),
            Operator::Special(op) => op.symbol(),
        }
    }

    /// Resolve a SPARQL symbol or keyword (case-insensitive) to an
    /// operator. `None` for unknown symbols.
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        use RegularOperator::*;
        use SpecialOperator::*;
        let lower = symbol.to_ascii_lowercase();
        let op = match lower.as_str() {
            "=" => Operator::Regular(Equal),
            "!=" => Operator::Regular(NotEqual),
            "<" => Operator::Regular(LessThan),
            ">" => Operator::Regular(GreaterThan),
            "<=" => Operator::Regular(LessThanOrEqual),
            ">=" => Operator::Regular(GreaterThanOrEqual),
            "+" => Operator::Regular(Add),
            "-" => Operator::Regular(Subtract),
            "*" => Operator::Regular(Multiply),
            "/" => Operator::Regular(Divide),
            "uplus" => Operator::Regular(UnaryPlus),
            "uminus" => Operator::Regular(UnaryMinus),
            "!" => Operator::Regular(Not),
            "str" => Operator::Regular(Str),
            "lang" => Operator::Regular(Lang),
            "langmatches" => Operator::Regular(LangMatches),
            "datatype" => Operator::Regular(Datatype),
            "strlen" => Operator::Regular(StrLen),
            "substr" => Operator::Regular(SubStr),
            "ucase" => Operator::Regular(UCase),
            "lcase" => Operator::Regular(LCase),
            "strstarts" => Operator::Regular(StrStarts),
            "strends" => Operator::Regular(StrEnds),
            "contains" => Operator::Regular(Contains),
            "strbefore" => Operator::Regular(StrBefore),
            "strafter" => Operator::Regular(StrAfter),
            "encode_for_uri" => Operator::Regular(EncodeForUri),
            "concat" => Operator::Regular(Concat),
            "regex" => Operator::Regular(Regex),
            "replace" => Operator::Regular(Replace),
            "strdt" => Operator::Regular(StrDt),
            "strlang" => Operator::Regular(StrLang),
            "abs" => Operator::Regular(Abs),
            "round" => Operator::Regular(Round),
            "ceil" => Operator::Regular(Ceil),
            "floor" => Operator::Regular(Floor),
            "rand" => Operator::Regular(Rand),
            "now" => Operator::Regular(Now),
            "year" => Operator::Regular(Year),
            "month" => Operator::Regular(Month),
            "day" => Operator::Regular(Day),
            "hours" => Operator::Regular(Hours),
            "minutes" => Operator::Regular(Minutes),
            "seconds" => Operator::Regular(Seconds),
            "tz" => Operator::Regular(Tz),
            "isiri" | "isuri" => Operator::Regular(IsIri),
            "isblank" => Operator::Regular(IsBlank),
            "isliteral" => Operator::Regular(IsLiteral),
            "isnumeric" => Operator::Regular(IsNumeric),
            "iri" | "uri" => Operator::Regular(Iri),
            "bnode" => Operator::Regular(BNode),
            "uuid" => Operator::Regular(Uuid),
            "struuid" => Operator::Regular(StrUuid),
            "md5" => Operator::Regular(Md5),
            "sha1" => Operator::Regular(Sha1),
            "sha256" => Operator::Regular(Sha256),
            "sha384" => Operator::Regular(Sha384),
            "sha512" => Operator::Regular(Sha512),
            "bound" => Operator::Special(Bound),
            "if" => Operator::Special(If),
            "coalesce" => Operator::Special(Coalesce),
            "||" => Operator::Special(LogicalOr),
            "&&" => Operator::Special(LogicalAnd),
            "sameterm" => Operator::Special(SameTerm),
            "in" => Operator::Special(In),
            "notin" | "not in" => Operator::Special(NotIn),
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
