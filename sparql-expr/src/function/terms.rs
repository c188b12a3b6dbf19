//! Term-inspection and term-construction functions: ISIRI, ISBLANK,
//! ISLITERAL, ISNUMERIC, LANG, LANGMATCHES, DATATYPE, BNODE, UUID,
//! STRUUID, and the context-dependent IRI constructor.

use sparql_expr_core::{TypeTag, TypedValue};
use sparql_expr_vocab::{rdf, xsd};
use std::sync::Arc;
use uuid::Uuid;

use crate::context::EvalContext;
use crate::error::{EvalError, Result};
use crate::operator::RegularOperator;
use crate::registry::Table;

/// Literal tags: everything except IRIs and blank nodes.
const LITERAL_TAGS: [TypeTag; 10] = [
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

pub(crate) fn register(table: &mut Table) {
    for tag in TypeTag::ALL {
        table.insert(RegularOperator::IsIri, &[tag], is_iri);
        table.insert(RegularOperator::IsBlank, &[tag], is_blank);
        table.insert(RegularOperator::IsLiteral, &[tag], is_literal);
        table.insert(RegularOperator::IsNumeric, &[tag], is_numeric);
    }

    for tag in LITERAL_TAGS {
        table.insert(RegularOperator::Lang, &[tag], lang);
        table.insert(RegularOperator::Datatype, &[tag], datatype);
    }

    table.insert(
        RegularOperator::LangMatches,
        &[TypeTag::String, TypeTag::String],
        lang_matches,
    );

    table.insert(RegularOperator::BNode, &[], bnode_fresh);
    table.insert(RegularOperator::BNode, &[TypeTag::String], bnode_labelled);
    table.insert(RegularOperator::Uuid, &[], uuid_iri);
    table.insert(RegularOperator::StrUuid, &[], str_uuid);
}

fn is_iri(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Boolean(args[0].tag() == TypeTag::Iri))
}

fn is_blank(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Boolean(args[0].tag() == TypeTag::BlankNode))
}

fn is_literal(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Boolean(!matches!(
        args[0].tag(),
        TypeTag::Iri | TypeTag::BlankNode
    )))
}

fn is_numeric(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Boolean(args[0].tag().is_numeric()))
}

/// LANG: the language tag of a langString, `""` for every other literal.
fn lang(args: &[TypedValue]) -> Result<TypedValue> {
    Ok(match &args[0] {
        TypedValue::LangString { lang, .. } => TypedValue::String(lang.clone()),
        _ => TypedValue::String("".into()),
    })
}

/// LANGMATCHES with basic range matching: `*` matches any non-empty tag,
/// otherwise case-insensitive exact match or prefix-before-`-` match.
fn lang_matches(args: &[TypedValue]) -> Result<TypedValue> {
    let TypedValue::String(tag) = &args[0] else {
        unreachable!("registered for (string, string)");
    };
    let TypedValue::String(range) = &args[1] else {
        unreachable!("registered for (string, string)");
    };
    let matched = if range.as_ref() == "*" {
        !tag.is_empty()
    } else {
        let tag = tag.to_lowercase();
        let range = range.to_lowercase();
        tag == range
            || (tag.starts_with(&range) && tag.chars().nth(range.len()) == Some('-'))
    };
    Ok(TypedValue::Boolean(matched))
}

/// DATATYPE of a literal. Typed values report their canonical datatype;
/// ill-typed and unrecognised literals report the datatype they carry.
fn datatype(args: &[TypedValue]) -> Result<TypedValue> {
    let iri: Arc<str> = match &args[0] {
        TypedValue::Boolean(_) => xsd::BOOLEAN.into(),
        TypedValue::Numeric(n) => n.datatype_iri().into(),
        TypedValue::String(_) => xsd::STRING.into(),
        TypedValue::LangString { .. } => rdf::LANG_STRING.into(),
        TypedValue::DateTime(_) => xsd::DATE_TIME.into(),
        TypedValue::NonLexical { datatype, .. } | TypedValue::Other { datatype, .. } => {
            datatype.clone()
        }
        TypedValue::Iri(_) | TypedValue::BlankNode(_) => {
            unreachable!("DATATYPE is registered for literal tags only")
        }
    };
    Ok(TypedValue::Iri(iri))
}

fn bnode_fresh(_args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::BlankNode(Arc::from(format!(
        "b{}",
        Uuid::new_v4().simple()
    ))))
}

fn bnode_labelled(args: &[TypedValue]) -> Result<TypedValue> {
    let TypedValue::String(label) = &args[0] else {
        unreachable!("registered for (string)");
    };
    Ok(TypedValue::BlankNode(label.clone()))
}

fn uuid_iri(_args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::Iri(Arc::from(format!(
        "urn:uuid:{}",
        Uuid::new_v4()
    ))))
}

fn str_uuid(_args: &[TypedValue]) -> Result<TypedValue> {
    Ok(TypedValue::String(Arc::from(Uuid::new_v4().to_string())))
}

/// IRI constructor. IRIs pass through; strings resolve against the
/// context's base IRI through the injected resolver.
pub(crate) fn iri(ctx: &EvalContext, value: &TypedValue) -> Result<TypedValue> {
    match value {
        TypedValue::Iri(iri) => Ok(TypedValue::Iri(iri.clone())),
        TypedValue::String(s) => ctx
            .iri_resolver()
            .resolve(ctx.base_iri(), s)
            .map(|absolute| TypedValue::Iri(absolute.into()))
            .ok_or_else(|| EvalError::Cast {
                value: s.to_string(),
                target: "IRI".to_string(),
            }),
        other => Err(EvalError::InvalidArgumentTypes {
            op: RegularOperator::Iri.symbol().to_string(),
            tags: vec![other.tag()],
        }),
    }
}
