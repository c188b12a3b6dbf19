//! Hash functions: MD5, SHA1, SHA256, SHA384, SHA512
//!
//! Defined over simple strings; results are lowercase hex simple
//! literals.

use md5::{Digest, Md5};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use sparql_expr_core::{TypeTag, TypedValue};
use std::sync::Arc;

use crate::error::Result;
use crate::operator::RegularOperator;
use crate::registry::Table;

pub(crate) fn register(table: &mut Table) {
    let s = &[TypeTag::String];
    table.insert(RegularOperator::Md5, s, md5_hex);
    table.insert(RegularOperator::Sha1, s, sha1_hex);
    table.insert(RegularOperator::Sha256, s, sha256_hex);
    table.insert(RegularOperator::Sha384, s, sha384_hex);
    table.insert(RegularOperator::Sha512, s, sha512_hex);
}

fn md5_hex(args: &[TypedValue]) -> Result<TypedValue> {
    hash_with::<Md5>(args)
}

fn sha1_hex(args: &[TypedValue]) -> Result<TypedValue> {
    hash_with::<Sha1>(args)
}

fn sha256_hex(args: &[TypedValue]) -> Result<TypedValue> {
    hash_with::<Sha256>(args)
}

fn sha384_hex(args: &[TypedValue]) -> Result<TypedValue> {
    hash_with::<Sha384>(args)
}

fn sha512_hex(args: &[TypedValue]) -> Result<TypedValue> {
    hash_with::<Sha512>(args)
}

fn hash_with<D: Digest>(args: &[TypedValue]) -> Result<TypedValue> {
    let TypedValue::String(input) = &args[0] else {
        unreachable!("registered for simple strings only");
    };
    let mut hasher = D::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    Ok(TypedValue::String(Arc::from(hex)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::dispatch;

    #[test]
    fn test_md5_known_vector() {
        let r = dispatch(RegularOperator::Md5, &[TypedValue::string("abc")]).unwrap();
        assert_eq!(r, TypedValue::string("900150983cd24fb0d6963f7d28e17f72"));
    }

    #[test]
    fn test_sha1_known_vector() {
        let r = dispatch(RegularOperator::Sha1, &[TypedValue::string("abc")]).unwrap();
        assert_eq!(
            r,
            TypedValue::string("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
    }

    #[test]
    fn test_sha256_known_vector() {
        let r = dispatch(RegularOperator::Sha256, &[TypedValue::string("abc")]).unwrap();
        assert_eq!(
            r,
            TypedValue::string(
                "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
            )
        );
    }

    #[test]
    fn test_hash_rejects_lang_strings() {
        let tagged = TypedValue::LangString {
            value: "abc".into(),
            lang: "en".into(),
        };
        assert!(dispatch(RegularOperator::Md5, &[tagged]).is_err());
    }
}
