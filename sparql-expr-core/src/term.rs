//! RDF terms
//!
//! A `Term` is one of the three RDF term kinds: named node (IRI), blank
//! node, or literal. Terms are immutable once constructed; equality and
//! hashing are structural, which makes `==` exactly SPARQL's `sameTerm`.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use sparql_expr_vocab::{rdf, xsd};
use std::fmt;

use crate::temporal::XsdDateTime;

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// An IRI
    NamedNode { iri: String },
    /// A blank node, identified by its label
    BlankNode { label: String },
    /// A literal: lexical form + datatype IRI + optional language tag
    Literal(Literal),
}

/// An RDF literal.
///
/// Language-tagged literals always carry `rdf:langString` as their
/// datatype; the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    lexical: String,
    datatype: String,
    language: Option<String>,
}

impl Literal {
    /// Create a literal with an explicit datatype IRI.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// Create a language-tagged string literal.
    pub fn lang_string(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: rdf::LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }

    /// The lexical form.
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// The datatype IRI.
    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    /// The language tag, if this is an `rdf:langString`.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl Term {
    /// Create a named node (IRI) term.
    pub fn named_node(iri: impl Into<String>) -> Self {
        Term::NamedNode { iri: iri.into() }
    }

    /// Create a blank node term.
    pub fn blank_node(label: impl Into<String>) -> Self {
        Term::BlankNode {
            label: label.into(),
        }
    }

    /// Create a typed literal term.
    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Literal::typed(lexical, datatype))
    }

    /// Create a language-tagged string term.
    pub fn lang_string(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal(Literal::lang_string(lexical, language))
    }

    /// Create an `xsd:string` literal.
    pub fn string(value: impl Into<String>) -> Self {
        Term::typed_literal(value, xsd::STRING)
    }

    /// Create an `xsd:boolean` literal.
    pub fn boolean(value: bool) -> Self {
        Term::typed_literal(if value { "true" } else { "false" }, xsd::BOOLEAN)
    }

    /// Create an `xsd:integer` literal.
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Term::typed_literal(value.into().to_string(), xsd::INTEGER)
    }

    /// Create an `xsd:decimal` literal.
    pub fn decimal(value: BigDecimal) -> Self {
        Term::typed_literal(crate::numeric::decimal_lexical(&value), xsd::DECIMAL)
    }

    /// Create an `xsd:float` literal.
    pub fn float(value: f32) -> Self {
        Term::typed_literal(crate::numeric::float_lexical(value), xsd::FLOAT)
    }

    /// Create an `xsd:double` literal.
    pub fn double(value: f64) -> Self {
        Term::typed_literal(crate::numeric::double_lexical(value), xsd::DOUBLE)
    }

    /// Create an `xsd:dateTime` literal, preserving the original lexical form.
    pub fn date_time(value: &XsdDateTime) -> Self {
        Term::typed_literal(value.original(), xsd::DATE_TIME)
    }

    /// True if this term is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// The literal payload, if this term is a literal.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode { iri } => write!(f, "<{}>", iri),
            Term::BlankNode { label } => write!(f, "_:{}", label),
            Term::Literal(lit) => {
                if let Some(lang) = lit.language() {
                    write!(f, "\"{}\"@{}", lit.lexical(), lang)
                } else if lit.datatype() == xsd::STRING {
                    write!(f, "\"{}\"", lit.lexical())
                } else {
                    write!(f, "\"{}\"^^<{}>", lit.lexical(), lit.datatype())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_term_is_structural() {
        let a = Term::typed_literal("1", xsd::INTEGER);
        let b = Term::typed_literal("1", xsd::INTEGER);
        let c = Term::typed_literal("1.0", xsd::DECIMAL);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_lang_string_datatype() {
        let t = Term::lang_string("chat", "fr");
        let lit = t.as_literal().unwrap();
        assert_eq!(lit.datatype(), rdf::LANG_STRING);
        assert_eq!(lit.language(), Some("fr"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Term::named_node("http://example.org/a").to_string(),
            "<http://example.org/a>"
        );
        assert_eq!(Term::string("hi").to_string(), "\"hi\"");
        assert_eq!(
            Term::lang_string("hi", "en").to_string(),
            "\"hi\"@en"
        );
    }
}
