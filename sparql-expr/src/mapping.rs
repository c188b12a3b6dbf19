//! Solution mappings
//!
//! A `Mapping` is a single row of a SPARQL result set: a partial function
//! from variable names to terms. A missing key means the variable is
//! unbound, which is distinct from an evaluation error. Mappings live for
//! one evaluation call and are never mutated by the evaluator.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sparql_expr_core::Term;

/// A variable-to-term solution mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    bindings: FxHashMap<String, Term>,
}

impl Mapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable. Variable names carry no `?` prefix.
    pub fn bind(&mut self, name: impl Into<String>, term: Term) {
        self.bindings.insert(name.into(), term);
    }

    /// Look up a binding; `None` means unbound.
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// True if `name` has a binding.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over the bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<N: Into<String>> FromIterator<(N, Term)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (N, Term)>>(iter: I) -> Self {
        Mapping {
            bindings: iter
                .into_iter()
                .map(|(name, term)| (name.into(), term))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_unbound() {
        let mut mapping = Mapping::new();
        mapping.bind("x", Term::string("a"));
        assert!(mapping.contains("x"));
        assert!(!mapping.contains("y"));
        assert_eq!(mapping.get("y"), None);
    }

    #[test]
    fn test_from_iterator() {
        let mapping: Mapping = [("x", Term::integer(1)), ("y", Term::string("a"))]
            .into_iter()
            .collect();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("x"), Some(&Term::integer(1)));
    }
}
