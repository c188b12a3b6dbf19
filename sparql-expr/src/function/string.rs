//! String functions: STR, STRLEN, SUBSTR, UCASE, LCASE, STRSTARTS,
//! STRENDS, CONTAINS, STRBEFORE, STRAFTER, ENCODE_FOR_URI, CONCAT,
//! REGEX, REPLACE, STRDT, STRLANG
//!
//! Binary string operators require argument compatibility: a language
//! tag on the second operand must match the first. Operators that return
//! a portion of their first argument preserve its language tag.

use lru::LruCache;
use num_traits::ToPrimitive;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Regex, RegexBuilder};
use sparql_expr_core::{Numeric, Term, TypeTag, TypedValue};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::error::{EvalError, Result};
use crate::operator::RegularOperator;
use crate::registry::Table;

use super::{expect_numeric, expect_string_like};

/// Tags STR applies to: everything except blank nodes.
const STR_TAGS: [TypeTag; 11] = [
    TypeTag::Iri,
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

/// Argument-compatible (text, pattern) pairs for binary string operators.
const COMPATIBLE_PAIRS: [(TypeTag, TypeTag); 3] = [
    (TypeTag::String, TypeTag::String),
    (TypeTag::LangString, TypeTag::String),
    (TypeTag::LangString, TypeTag::LangString),
];

const STRING_LIKE: [TypeTag; 2] = [TypeTag::String, TypeTag::LangString];

pub(crate) fn register(table: &mut Table) {
    for tag in STR_TAGS {
        table.insert(RegularOperator::Str, &[tag], str_value);
    }

    for tag in STRING_LIKE {
        table.insert(RegularOperator::StrLen, &[tag], str_len);
        table.insert(RegularOperator::UCase, &[tag], ucase);
        table.insert(RegularOperator::LCase, &[tag], lcase);
        table.insert(RegularOperator::EncodeForUri, &[tag], encode_for_uri);
        table.insert(RegularOperator::SubStr, &[tag, TypeTag::Integer], substr);
        table.insert(
            RegularOperator::SubStr,
            &[tag, TypeTag::Integer, TypeTag::Integer],
            substr,
        );
        table.insert(RegularOperator::Regex, &[tag, TypeTag::String], regex_match);
        table.insert(
            RegularOperator::Regex,
            &[tag, TypeTag::String, TypeTag::String],
            regex_match,
        );
        table.insert(
            RegularOperator::Replace,
            &[tag, TypeTag::String, TypeTag::String],
            replace,
        );
        table.insert(
            RegularOperator::Replace,
            &[tag, TypeTag::String, TypeTag::String, TypeTag::String],
            replace,
        );
    }

    for (a, b) in COMPATIBLE_PAIRS {
        table.insert(RegularOperator::StrStarts, &[a, b], str_starts);
        table.insert(RegularOperator::StrEnds, &[a, b], str_ends);
        table.insert(RegularOperator::Contains, &[a, b], contains);
        table.insert(RegularOperator::StrBefore, &[a, b], str_before);
        table.insert(RegularOperator::StrAfter, &[a, b], str_after);
    }

    table.insert(
        RegularOperator::StrDt,
        &[TypeTag::String, TypeTag::Iri],
        str_dt,
    );
    table.insert(
        RegularOperator::StrLang,
        &[TypeTag::String, TypeTag::String],
        str_lang,
    );
}

fn str_value(args: &[TypedValue]) -> Result<TypedValue> {
    let s: Arc<str> = match &args[0] {
        TypedValue::Iri(iri) => iri.clone(),
        TypedValue::String(s) => s.clone(),
        TypedValue::LangString { value, .. } => value.clone(),
        TypedValue::Boolean(b) => Arc::from(if *b { "true" } else { "false" }),
        TypedValue::Numeric(n) => Arc::from(n.lexical()),
        TypedValue::DateTime(dt) => Arc::from(dt.original()),
        TypedValue::NonLexical { lexical, .. } | TypedValue::Other { lexical, .. } => {
            lexical.clone()
        }
        TypedValue::BlankNode(_) => unreachable!("STR is not registered for blank nodes"),
    };
    Ok(TypedValue::String(s))
}

fn str_len(args: &[TypedValue]) -> Result<TypedValue> {
    let (value, _) = expect_string_like(&args[0]);
    Ok(TypedValue::Numeric(Numeric::integer(
        value.chars().count() as i64,
    )))
}

fn ucase(args: &[TypedValue]) -> Result<TypedValue> {
    map_preserving_lang(&args[0], |s| s.to_uppercase())
}

fn lcase(args: &[TypedValue]) -> Result<TypedValue> {
    map_preserving_lang(&args[0], |s| s.to_lowercase())
}

/// Unreserved characters (ALPHA / DIGIT / `-` / `_` / `.` / `~`) pass
/// through; everything else is percent-encoded.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode_for_uri(args: &[TypedValue]) -> Result<TypedValue> {
    let (value, _) = expect_string_like(&args[0]);
    Ok(TypedValue::String(Arc::from(
        utf8_percent_encode(value, URI_ENCODE_SET).to_string(),
    )))
}

/// XPath substring: 1-based start, character counted, tolerant of
/// out-of-range positions.
fn substr(args: &[TypedValue]) -> Result<TypedValue> {
    let (value, lang) = expect_string_like(&args[0]);
    let start = integer_arg(&args[1]);
    let length = args.get(2).map(integer_arg);

    let begin = start.max(1);
    let end = match length {
        Some(len) => start.saturating_add(len),
        None => i64::MAX,
    };
    let taken = end.saturating_sub(begin).max(0) as usize;
    let result: String = value
        .chars()
        .skip((begin - 1) as usize)
        .take(taken)
        .collect();
    Ok(string_like(result, lang))
}

fn str_starts(args: &[TypedValue]) -> Result<TypedValue> {
    let (haystack, needle) = compatible_pair(args, RegularOperator::StrStarts)?;
    Ok(TypedValue::Boolean(haystack.starts_with(needle)))
}

fn str_ends(args: &[TypedValue]) -> Result<TypedValue> {
    let (haystack, needle) = compatible_pair(args, RegularOperator::StrEnds)?;
    Ok(TypedValue::Boolean(haystack.ends_with(needle)))
}

fn contains(args: &[TypedValue]) -> Result<TypedValue> {
    let (haystack, needle) = compatible_pair(args, RegularOperator::Contains)?;
    Ok(TypedValue::Boolean(haystack.contains(needle)))
}

fn str_before(args: &[TypedValue]) -> Result<TypedValue> {
    let (haystack, needle) = compatible_pair(args, RegularOperator::StrBefore)?;
    let (_, lang) = expect_string_like(&args[0]);
    Ok(match haystack.find(needle) {
        Some(idx) => string_like(haystack[..idx].to_string(), lang),
        None => TypedValue::String("".into()),
    })
}

fn str_after(args: &[TypedValue]) -> Result<TypedValue> {
    let (haystack, needle) = compatible_pair(args, RegularOperator::StrAfter)?;
    let (_, lang) = expect_string_like(&args[0]);
    Ok(match haystack.find(needle) {
        Some(idx) => string_like(haystack[idx + needle.len()..].to_string(), lang),
        None => TypedValue::String("".into()),
    })
}

fn regex_match(args: &[TypedValue]) -> Result<TypedValue> {
    let (text, _) = expect_string_like(&args[0]);
    let (pattern, _) = expect_string_like(&args[1]);
    let flags = args.get(2).map(|v| expect_string_like(v).0).unwrap_or("");
    let re = build_regex_with_flags(pattern, flags)?;
    Ok(TypedValue::Boolean(re.is_match(text)))
}

fn replace(args: &[TypedValue]) -> Result<TypedValue> {
    let (text, lang) = expect_string_like(&args[0]);
    let (pattern, _) = expect_string_like(&args[1]);
    let (replacement, _) = expect_string_like(&args[2]);
    let flags = args.get(3).map(|v| expect_string_like(v).0).unwrap_or("");
    let re = build_regex_with_flags(pattern, flags)?;
    let result = re.replace_all(text, replacement).into_owned();
    Ok(string_like(result, lang))
}

fn str_dt(args: &[TypedValue]) -> Result<TypedValue> {
    let (value, _) = expect_string_like(&args[0]);
    let TypedValue::Iri(datatype) = &args[1] else {
        unreachable!("STRDT is registered for (string, iri)");
    };
    Ok(TypedValue::of(&Term::typed_literal(
        value,
        datatype.as_ref(),
    )))
}

fn str_lang(args: &[TypedValue]) -> Result<TypedValue> {
    let (value, _) = expect_string_like(&args[0]);
    let (lang, _) = expect_string_like(&args[1]);
    if lang.is_empty() {
        return Err(EvalError::InvalidArgumentTypes {
            op: RegularOperator::StrLang.symbol().to_string(),
            tags: args.iter().map(TypedValue::tag).collect(),
        });
    }
    Ok(TypedValue::LangString {
        value: value.into(),
        lang: lang.into(),
    })
}

/// CONCAT over any number of string-like operands. The result carries a
/// language tag only when every operand carries the same one.
pub(crate) fn concat(args: &[TypedValue]) -> Result<TypedValue> {
    let mut result = String::new();
    let mut shared_lang: Option<Option<&str>> = None;
    for arg in args {
        let Some((value, lang)) = arg.as_string_like() else {
            return Err(EvalError::InvalidArgumentTypes {
                op: RegularOperator::Concat.symbol().to_string(),
                tags: args.iter().map(TypedValue::tag).collect(),
            });
        };
        result.push_str(value);
        shared_lang = match shared_lang {
            None => Some(lang),
            Some(prev) if prev == lang => Some(prev),
            Some(_) => Some(None),
        };
    }
    Ok(string_like(result, shared_lang.flatten()))
}

// =============================================================================
// Regex caching
// =============================================================================

// Thread-local cache of compiled regexes keyed by (pattern, flags).
// SPARQL patterns are typically constant across a query, so compiling
// once per thread amortises across every solution row.
thread_local! {
    static REGEX_CACHE: RefCell<LruCache<(String, String), Regex>> =
        RefCell::new(LruCache::new(NonZeroUsize::new(32).expect("nonzero cache size")));
}

/// Build a regex with SPARQL flags (cached).
///
/// Supported flags: `i` (case-insensitive), `m` (multiline), `s`
/// (dot-all), `x` (ignore whitespace). An unknown flag is an error, not
/// a silent ignore.
pub(crate) fn build_regex_with_flags(pattern: &str, flags: &str) -> Result<Regex> {
    let cache_key = (pattern.to_string(), flags.to_string());
    let cached = REGEX_CACHE.with(|cache| cache.borrow_mut().get(&cache_key).cloned());
    if let Some(re) = cached {
        return Ok(re);
    }

    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            c => {
                return Err(EvalError::InvalidRegex(format!("unknown flag: '{}'", c)));
            }
        }
    }
    let re = builder
        .build()
        .map_err(|e| EvalError::InvalidRegex(e.to_string()))?;

    REGEX_CACHE.with(|cache| {
        cache.borrow_mut().put(cache_key, re.clone());
    });

    Ok(re)
}

// =============================================================================
// Helpers
// =============================================================================

fn map_preserving_lang(arg: &TypedValue, f: impl Fn(&str) -> String) -> Result<TypedValue> {
    let (value, lang) = expect_string_like(arg);
    Ok(string_like(f(value), lang))
}

fn string_like(value: String, lang: Option<&str>) -> TypedValue {
    match lang {
        Some(lang) => TypedValue::LangString {
            value: value.into(),
            lang: lang.into(),
        },
        None => TypedValue::String(value.into()),
    }
}

/// Check language-tag compatibility of a binary string operator's
/// operands and return both payloads.
fn compatible_pair<'a>(
    args: &'a [TypedValue],
    op: RegularOperator,
) -> Result<(&'a str, &'a str)> {
    let (a, a_lang) = expect_string_like(&args[0]);
    let (b, b_lang) = expect_string_like(&args[1]);
    if let (Some(al), Some(bl)) = (a_lang, b_lang) {
        if al != bl {
            return Err(EvalError::InvalidArgumentTypes {
                op: op.symbol().to_string(),
                tags: args.iter().map(TypedValue::tag).collect(),
            });
        }
    }
    Ok((a, b))
}

fn integer_arg(value: &TypedValue) -> i64 {
    let n = expect_numeric(value);
    match n {
        Numeric::Integer(i) => i.to_i64().unwrap_or_else(|| {
            if i.sign() == num_bigint::Sign::Minus {
                i64::MIN
            } else {
                i64::MAX
            }
        }),
        _ => unreachable!("registered for integer tag"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::dispatch;

    fn string(s: &str) -> TypedValue {
        TypedValue::string(s)
    }

    fn lang(s: &str, tag: &str) -> TypedValue {
        TypedValue::LangString {
            value: s.into(),
            lang: tag.into(),
        }
    }

    #[test]
    fn test_str_of_everything() {
        assert_eq!(
            dispatch(RegularOperator::Str, &[TypedValue::Iri("http://e/".into())]).unwrap(),
            string("http://e/")
        );
        assert_eq!(
            dispatch(RegularOperator::Str, &[TypedValue::integer(42)]).unwrap(),
            string("42")
        );
        assert_eq!(
            dispatch(RegularOperator::Str, &[lang("chat", "fr")]).unwrap(),
            string("chat")
        );
    }

    #[test]
    fn test_strlen_counts_chars() {
        assert_eq!(
            dispatch(RegularOperator::StrLen, &[string("héllo")]).unwrap(),
            TypedValue::integer(5)
        );
    }

    #[test]
    fn test_case_preserves_lang() {
        assert_eq!(
            dispatch(RegularOperator::UCase, &[lang("chat", "fr")]).unwrap(),
            lang("CHAT", "fr")
        );
    }

    #[test]
    fn test_substr_is_one_based() {
        let args = [string("motor"), TypedValue::integer(2)];
        assert_eq!(dispatch(RegularOperator::SubStr, &args).unwrap(), string("otor"));
        let args = [
            string("motor"),
            TypedValue::integer(2),
            TypedValue::integer(2),
        ];
        assert_eq!(dispatch(RegularOperator::SubStr, &args).unwrap(), string("ot"));
    }

    #[test]
    fn test_substr_tolerates_out_of_range() {
        let args = [
            string("motor"),
            TypedValue::integer(-1),
            TypedValue::integer(3),
        ];
        // positions -1, 0, 1: only position 1 exists
        assert_eq!(dispatch(RegularOperator::SubStr, &args).unwrap(), string("m"));
        let args = [string("ab"), TypedValue::integer(9)];
        assert_eq!(dispatch(RegularOperator::SubStr, &args).unwrap(), string(""));
    }

    #[test]
    fn test_contains_lang_compatibility() {
        let ok = dispatch(
            RegularOperator::Contains,
            &[lang("chatterbox", "en"), string("box")],
        )
        .unwrap();
        assert_eq!(ok, TypedValue::Boolean(true));

        let err = dispatch(
            RegularOperator::Contains,
            &[lang("chatterbox", "en"), lang("box", "fr")],
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::InvalidArgumentTypes { .. }));
    }

    #[test]
    fn test_strbefore_preserves_lang_on_match_only() {
        assert_eq!(
            dispatch(RegularOperator::StrBefore, &[lang("abc", "en"), string("b")]).unwrap(),
            lang("a", "en")
        );
        assert_eq!(
            dispatch(RegularOperator::StrBefore, &[lang("abc", "en"), string("z")]).unwrap(),
            string("")
        );
    }

    #[test]
    fn test_encode_for_uri() {
        assert_eq!(
            dispatch(RegularOperator::EncodeForUri, &[string("Los Angeles")]).unwrap(),
            string("Los%20Angeles")
        );
        assert_eq!(
            dispatch(RegularOperator::EncodeForUri, &[string("~safe-chars_ok.")]).unwrap(),
            string("~safe-chars_ok.")
        );
    }

    #[test]
    fn test_concat_lang_rules() {
        assert_eq!(
            concat(&[lang("a", "en"), lang("b", "en")]).unwrap(),
            lang("ab", "en")
        );
        assert_eq!(concat(&[lang("a", "en"), string("b")]).unwrap(), string("ab"));
        assert_eq!(concat(&[]).unwrap(), string(""));
        assert!(concat(&[string("a"), TypedValue::integer(1)]).is_err());
    }

    #[test]
    fn test_regex_flags() {
        let args = [string("Hello"), string("^hel"), string("i")];
        assert_eq!(
            dispatch(RegularOperator::Regex, &args).unwrap(),
            TypedValue::Boolean(true)
        );
        let args = [string("Hello"), string("^hel")];
        assert_eq!(
            dispatch(RegularOperator::Regex, &args).unwrap(),
            TypedValue::Boolean(false)
        );
    }

    #[test]
    fn test_regex_bad_pattern_and_flag() {
        assert!(matches!(
            build_regex_with_flags("(", ""),
            Err(EvalError::InvalidRegex(_))
        ));
        assert!(matches!(
            build_regex_with_flags("a", "q"),
            Err(EvalError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_replace_with_group_references() {
        let args = [
            string("abcd"),
            string("(b)c"),
            string("$1X"),
        ];
        assert_eq!(dispatch(RegularOperator::Replace, &args).unwrap(), string("abXd"));
    }

    #[test]
    fn test_strdt_yields_typed_view() {
        use sparql_expr_vocab::xsd;
        let args = [string("3"), TypedValue::Iri(xsd::INTEGER.into())];
        assert_eq!(
            dispatch(RegularOperator::StrDt, &args).unwrap(),
            TypedValue::integer(3)
        );
        let args = [string("abc"), TypedValue::Iri(xsd::INTEGER.into())];
        assert_eq!(
            dispatch(RegularOperator::StrDt, &args).unwrap().tag(),
            TypeTag::NonLexical
        );
    }

    #[test]
    fn test_strlang() {
        let args = [string("chat"), string("fr")];
        assert_eq!(
            dispatch(RegularOperator::StrLang, &args).unwrap(),
            lang("chat", "fr")
        );
    }
}
