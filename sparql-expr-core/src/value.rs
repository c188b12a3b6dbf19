//! Typed-value view of RDF terms
//!
//! Expression evaluation operates on `TypedValue`, the classification of a
//! `Term` by its datatype IRI: typed literals parse into their value space,
//! IRIs and blank nodes pass through, and a recognised datatype with an
//! invalid lexical form becomes `NonLexical` rather than failing; the
//! error surfaces only when an operation actually needs the typed value.

use std::sync::Arc;

use sparql_expr_vocab::{rdf, xsd};

use crate::numeric::{
    self, Numeric, NumericTag,
};
use crate::temporal::XsdDateTime;
use crate::term::Term;

/// A term lifted into its typed-value view.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// A named node
    Iri(Arc<str>),
    /// A blank node label
    BlankNode(Arc<str>),
    /// xsd:boolean
    Boolean(bool),
    /// One of the four numeric datatypes
    Numeric(Numeric),
    /// xsd:string
    String(Arc<str>),
    /// rdf:langString
    LangString { value: Arc<str>, lang: Arc<str> },
    /// xsd:dateTime
    DateTime(Box<XsdDateTime>),
    /// A recognised datatype whose lexical form does not parse
    NonLexical { lexical: Arc<str>, datatype: Arc<str> },
    /// A literal with an unrecognised datatype IRI
    Other { lexical: Arc<str>, datatype: Arc<str> },
}

/// Type tag of a typed value, the dispatch key for overload resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Iri,
    BlankNode,
    Boolean,
    Integer,
    Decimal,
    Float,
    Double,
    String,
    LangString,
    DateTime,
    NonLexical,
    Other,
}

impl TypeTag {
    /// Every tag, for pre-expanding registry rows.
    pub const ALL: [TypeTag; 12] = [
        TypeTag::Iri,
        TypeTag::BlankNode,
        TypeTag::Boolean,
        TypeTag::Integer,
        TypeTag::Decimal,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::String,
        TypeTag::LangString,
        TypeTag::DateTime,
        TypeTag::NonLexical,
        TypeTag::Other,
    ];

    /// The four numeric tags in lattice order.
    pub const NUMERIC: [TypeTag; 4] = [
        TypeTag::Integer,
        TypeTag::Decimal,
        TypeTag::Float,
        TypeTag::Double,
    ];

    /// True for the four numeric tags.
    pub fn is_numeric(self) -> bool {
        self.numeric_tag().is_some()
    }

    /// The lattice position, for numeric tags.
    pub fn numeric_tag(self) -> Option<NumericTag> {
        match self {
            TypeTag::Integer => Some(NumericTag::Integer),
            TypeTag::Decimal => Some(NumericTag::Decimal),
            TypeTag::Float => Some(NumericTag::Float),
            TypeTag::Double => Some(NumericTag::Double),
            _ => None,
        }
    }
}

impl From<NumericTag> for TypeTag {
    fn from(tag: NumericTag) -> Self {
        match tag {
            NumericTag::Integer => TypeTag::Integer,
            NumericTag::Decimal => TypeTag::Decimal,
            NumericTag::Float => TypeTag::Float,
            NumericTag::Double => TypeTag::Double,
        }
    }
}

impl TypedValue {
    /// Classify a term into its typed-value view. Never fails: invalid
    /// lexical forms for recognised datatypes become `NonLexical`.
    pub fn of(term: &Term) -> TypedValue {
        match term {
            Term::NamedNode { iri } => TypedValue::Iri(Arc::from(iri.as_str())),
            Term::BlankNode { label } => TypedValue::BlankNode(Arc::from(label.as_str())),
            Term::Literal(lit) => {
                if let Some(lang) = lit.language() {
                    return TypedValue::LangString {
                        value: Arc::from(lit.lexical()),
                        lang: Arc::from(lang),
                    };
                }
                Self::of_typed_literal(lit.lexical(), lit.datatype())
            }
        }
    }

    fn of_typed_literal(lexical: &str, datatype: &str) -> TypedValue {
        let non_lexical = || TypedValue::NonLexical {
            lexical: Arc::from(lexical),
            datatype: Arc::from(datatype),
        };

        if datatype == xsd::STRING {
            TypedValue::String(Arc::from(lexical))
        } else if datatype == xsd::BOOLEAN {
            match lexical {
                "true" | "1" => TypedValue::Boolean(true),
                "false" | "0" => TypedValue::Boolean(false),
                _ => non_lexical(),
            }
        } else if xsd::is_integer_type(datatype) {
            match numeric::parse_integer_lexical(lexical) {
                Some(i) => TypedValue::Numeric(Numeric::Integer(Box::new(i))),
                None => non_lexical(),
            }
        } else if datatype == xsd::DECIMAL {
            match numeric::parse_decimal_lexical(lexical) {
                Some(d) => TypedValue::Numeric(Numeric::Decimal(Box::new(d))),
                None => non_lexical(),
            }
        } else if datatype == xsd::FLOAT {
            match numeric::parse_float_lexical(lexical) {
                Some(f) => TypedValue::Numeric(Numeric::Float(f)),
                None => non_lexical(),
            }
        } else if datatype == xsd::DOUBLE {
            match numeric::parse_double_lexical(lexical) {
                Some(d) => TypedValue::Numeric(Numeric::Double(d)),
                None => non_lexical(),
            }
        } else if datatype == xsd::DATE_TIME {
            match XsdDateTime::parse(lexical) {
                Ok(dt) => TypedValue::DateTime(Box::new(dt)),
                Err(_) => non_lexical(),
            }
        } else if datatype == rdf::LANG_STRING {
            // rdf:langString without a language tag is ill-formed
            non_lexical()
        } else {
            TypedValue::Other {
                lexical: Arc::from(lexical),
                datatype: Arc::from(datatype),
            }
        }
    }

    /// The dispatch tag of this value.
    pub fn tag(&self) -> TypeTag {
        match self {
            TypedValue::Iri(_) => TypeTag::Iri,
            TypedValue::BlankNode(_) => TypeTag::BlankNode,
            TypedValue::Boolean(_) => TypeTag::Boolean,
            TypedValue::Numeric(n) => n.tag().into(),
            TypedValue::String(_) => TypeTag::String,
            TypedValue::LangString { .. } => TypeTag::LangString,
            TypedValue::DateTime(_) => TypeTag::DateTime,
            TypedValue::NonLexical { .. } => TypeTag::NonLexical,
            TypedValue::Other { .. } => TypeTag::Other,
        }
    }

    /// Effective boolean value. `None` means the value has no EBV (IRIs,
    /// blank nodes, dateTimes, unrecognised datatypes, and ill-typed
    /// literals).
    pub fn ebv(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            TypedValue::Numeric(n) => Some(!n.is_zero_or_nan()),
            TypedValue::String(s) => Some(!s.is_empty()),
            TypedValue::LangString { value, .. } => Some(!value.is_empty()),
            _ => None,
        }
    }

    /// Materialise the canonical term for this value.
    ///
    /// `NonLexical` and `Other` values round-trip their original lexical
    /// form; typed values emit their canonical lexical.
    pub fn into_term(self) -> Term {
        match self {
            TypedValue::Iri(iri) => Term::named_node(iri.as_ref()),
            TypedValue::BlankNode(label) => Term::blank_node(label.as_ref()),
            TypedValue::Boolean(b) => Term::boolean(b),
            TypedValue::Numeric(n) => Term::typed_literal(n.lexical(), n.datatype_iri()),
            TypedValue::String(s) => Term::string(s.as_ref()),
            TypedValue::LangString { value, lang } => {
                Term::lang_string(value.as_ref(), lang.as_ref())
            }
            TypedValue::DateTime(dt) => Term::date_time(&dt),
            TypedValue::NonLexical { lexical, datatype }
            | TypedValue::Other { lexical, datatype } => {
                Term::typed_literal(lexical.as_ref(), datatype.as_ref())
            }
        }
    }

    /// The numeric payload, if any.
    pub fn as_numeric(&self) -> Option<&Numeric> {
        match self {
            TypedValue::Numeric(n) => Some(n),
            _ => None,
        }
    }

    /// String-like payload: `(value, language)` for `xsd:string` and
    /// `rdf:langString` values.
    pub fn as_string_like(&self) -> Option<(&str, Option<&str>)> {
        match self {
            TypedValue::String(s) => Some((s, None)),
            TypedValue::LangString { value, lang } => Some((value, Some(lang))),
            _ => None,
        }
    }

    /// The numeric lattice position this value claims, counting
    /// `NonLexical` literals by their declared datatype. Used by overload
    /// dispatch to distinguish "ill-typed numeric" from "not numeric".
    pub fn declared_numeric_tag(&self) -> Option<NumericTag> {
        match self {
            TypedValue::Numeric(n) => Some(n.tag()),
            TypedValue::NonLexical { datatype, .. } => {
                if xsd::is_integer_type(datatype) {
                    Some(NumericTag::Integer)
                } else if datatype.as_ref() == xsd::DECIMAL {
                    Some(NumericTag::Decimal)
                } else if datatype.as_ref() == xsd::FLOAT {
                    Some(NumericTag::Float)
                } else if datatype.as_ref() == xsd::DOUBLE {
                    Some(NumericTag::Double)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    // === Convenience constructors ===

    /// An `xsd:string` value.
    pub fn string(value: impl Into<Arc<str>>) -> Self {
        TypedValue::String(value.into())
    }

    /// An `xsd:boolean` value.
    pub fn boolean(value: bool) -> Self {
        TypedValue::Boolean(value)
    }

    /// An `xsd:integer` value.
    pub fn integer(value: i64) -> Self {
        TypedValue::Numeric(Numeric::integer(value))
    }
}

impl From<Numeric> for TypedValue {
    fn from(n: Numeric) -> Self {
        TypedValue::Numeric(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_classifies_datatypes() {
        assert_eq!(TypedValue::of(&Term::string("a")).tag(), TypeTag::String);
        assert_eq!(TypedValue::of(&Term::boolean(true)).tag(), TypeTag::Boolean);
        assert_eq!(
            TypedValue::of(&Term::typed_literal("1", xsd::INTEGER)).tag(),
            TypeTag::Integer
        );
        assert_eq!(
            TypedValue::of(&Term::typed_literal("1", xsd::UNSIGNED_BYTE)).tag(),
            TypeTag::Integer
        );
        assert_eq!(
            TypedValue::of(&Term::typed_literal("1.5", xsd::DECIMAL)).tag(),
            TypeTag::Decimal
        );
        assert_eq!(
            TypedValue::of(&Term::typed_literal("NaN", xsd::DOUBLE)).tag(),
            TypeTag::Double
        );
        assert_eq!(
            TypedValue::of(&Term::lang_string("chat", "fr")).tag(),
            TypeTag::LangString
        );
        assert_eq!(
            TypedValue::of(&Term::named_node("http://example.org/")).tag(),
            TypeTag::Iri
        );
        assert_eq!(
            TypedValue::of(&Term::typed_literal("P1D", "http://www.w3.org/2001/XMLSchema#duration"))
                .tag(),
            TypeTag::Other
        );
    }

    #[test]
    fn test_invalid_lexicals_become_non_lexical() {
        for (lex, dt) in [
            ("010", xsd::INTEGER),
            ("1.5", xsd::INTEGER),
            ("1.", xsd::DECIMAL),
            ("yes", xsd::BOOLEAN),
            ("not-a-date", xsd::DATE_TIME),
            ("inf", xsd::DOUBLE),
        ] {
            let view = TypedValue::of(&Term::typed_literal(lex, dt));
            assert_eq!(view.tag(), TypeTag::NonLexical, "{}^^{}", lex, dt);
        }
    }

    #[test]
    fn test_ebv_table() {
        assert_eq!(TypedValue::of(&Term::boolean(true)).ebv(), Some(true));
        assert_eq!(TypedValue::of(&Term::boolean(false)).ebv(), Some(false));
        assert_eq!(TypedValue::of(&Term::string("")).ebv(), Some(false));
        assert_eq!(TypedValue::of(&Term::string("x")).ebv(), Some(true));
        assert_eq!(TypedValue::of(&Term::integer(0)).ebv(), Some(false));
        assert_eq!(TypedValue::of(&Term::double(f64::NAN)).ebv(), Some(false));
        assert_eq!(TypedValue::of(&Term::double(-0.0)).ebv(), Some(false));
        assert_eq!(TypedValue::of(&Term::integer(3)).ebv(), Some(true));
        assert_eq!(TypedValue::of(&Term::lang_string("", "en")).ebv(), Some(false));
        // Non-coercible kinds
        assert_eq!(TypedValue::of(&Term::named_node("http://e/")).ebv(), None);
        assert_eq!(TypedValue::of(&Term::blank_node("b0")).ebv(), None);
        assert_eq!(
            TypedValue::of(&Term::typed_literal("abc", xsd::INTEGER)).ebv(),
            None
        );
    }

    #[test]
    fn test_non_lexical_round_trips() {
        let term = Term::typed_literal("010", xsd::INTEGER);
        let view = TypedValue::of(&term);
        assert_eq!(view.into_term(), term);
    }

    #[test]
    fn test_canonical_term_materialisation() {
        let view = TypedValue::of(&Term::typed_literal("1", xsd::BYTE));
        // Derived integer types canonicalise to xsd:integer
        assert_eq!(view.into_term(), Term::integer(1));
    }

    #[test]
    fn test_declared_numeric_tag() {
        let bad_int = TypedValue::of(&Term::typed_literal("01", xsd::INTEGER));
        assert_eq!(bad_int.declared_numeric_tag(), Some(NumericTag::Integer));
        let bad_bool = TypedValue::of(&Term::typed_literal("yes", xsd::BOOLEAN));
        assert_eq!(bad_bool.declared_numeric_tag(), None);
        assert_eq!(
            TypedValue::integer(1).declared_numeric_tag(),
            Some(NumericTag::Integer)
        );
    }
}
