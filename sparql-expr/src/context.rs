//! Evaluation context and injected hooks
//!
//! The evaluator owns no dataset and no extension functions; both arrive
//! through hooks on `EvalContext`. The context also pins the `NOW()`
//! timestamp for the duration of one query and carries the host's
//! cancellation flag.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use sparql_expr_core::{Term, XsdDateTime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ast::AlgebraFragment;
use crate::error::Result;
use crate::mapping::Mapping;

/// Evaluates `EXISTS` / `NOT EXISTS` sub-queries against the surrounding
/// dataset.
#[async_trait]
pub trait ExistsEvaluator: Send + Sync {
    /// True if the pattern has at least one solution under `mapping`.
    async fn evaluate_exists(
        &self,
        pattern: &AlgebraFragment,
        mapping: &Mapping,
    ) -> Result<bool>;
}

/// A user-defined function invoked by IRI.
#[async_trait]
pub trait ExtensionFunction: Send + Sync {
    /// Declared arity; `None` means variadic.
    fn arity(&self) -> Option<usize>;

    /// Invoke with evaluated arguments.
    async fn invoke(&self, args: &[Term]) -> Result<Term>;
}

/// Resolves extension-function IRIs.
pub trait ExtensionRegistry: Send + Sync {
    fn lookup(&self, iri: &str) -> Option<Arc<dyn ExtensionFunction>>;
}

/// A hash-map backed `ExtensionRegistry`.
#[derive(Default)]
pub struct MapExtensionRegistry {
    functions: FxHashMap<String, Arc<dyn ExtensionFunction>>,
}

impl MapExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its IRI, replacing any previous entry.
    pub fn register(&mut self, iri: impl Into<String>, function: Arc<dyn ExtensionFunction>) {
        self.functions.insert(iri.into(), function);
    }
}

impl ExtensionRegistry for MapExtensionRegistry {
    fn lookup(&self, iri: &str) -> Option<Arc<dyn ExtensionFunction>> {
        self.functions.get(iri).cloned()
    }
}

/// Resolves a relative IRI reference against a base IRI, for `IRI()`.
pub trait IriResolver: Send + Sync {
    /// `None` when resolution is not possible (e.g. no base).
    fn resolve(&self, base: Option<&str>, relative: &str) -> Option<String>;
}

/// Minimal resolver: absolute references (containing a scheme colon) pass
/// through; relative references replace everything after the base's last
/// `/`. Hosts with full RFC 3986 resolution supply their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleIriResolver;

impl IriResolver for SimpleIriResolver {
    fn resolve(&self, base: Option<&str>, relative: &str) -> Option<String> {
        if relative.contains(':') {
            return Some(relative.to_string());
        }
        let base = base?;
        match base.rfind('/') {
            Some(idx) => Some(format!("{}{}", &base[..=idx], relative)),
            None => Some(format!("{}{}", base, relative)),
        }
    }
}

/// Cooperative cancellation flag shared between the host and the
/// evaluator. Checked at every sub-evaluation boundary.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every in-flight evaluation sharing this flag
    /// fails with `CancelledError` at its next boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything one evaluation run needs besides the expression and the
/// mapping. Cheap to share; holds no mutable state beyond the
/// cancellation flag.
pub struct EvalContext {
    exists: Option<Arc<dyn ExistsEvaluator>>,
    extensions: Option<Arc<dyn ExtensionRegistry>>,
    resolver: Arc<dyn IriResolver>,
    base_iri: Option<String>,
    now: XsdDateTime,
    cancellation: Cancellation,
}

impl EvalContext {
    pub fn builder() -> EvalContextBuilder {
        EvalContextBuilder::default()
    }

    pub fn exists_evaluator(&self) -> Option<&Arc<dyn ExistsEvaluator>> {
        self.exists.as_ref()
    }

    pub fn extensions(&self) -> Option<&Arc<dyn ExtensionRegistry>> {
        self.extensions.as_ref()
    }

    pub fn iri_resolver(&self) -> &dyn IriResolver {
        self.resolver.as_ref()
    }

    pub fn base_iri(&self) -> Option<&str> {
        self.base_iri.as_deref()
    }

    /// The pinned timestamp all `NOW()` calls in this context observe.
    pub fn now(&self) -> &XsdDateTime {
        &self.now
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for `EvalContext`.
#[derive(Default)]
pub struct EvalContextBuilder {
    exists: Option<Arc<dyn ExistsEvaluator>>,
    extensions: Option<Arc<dyn ExtensionRegistry>>,
    resolver: Option<Arc<dyn IriResolver>>,
    base_iri: Option<String>,
    now: Option<XsdDateTime>,
    cancellation: Option<Cancellation>,
}

impl EvalContextBuilder {
    pub fn exists_evaluator(mut self, hook: Arc<dyn ExistsEvaluator>) -> Self {
        self.exists = Some(hook);
        self
    }

    pub fn extensions(mut self, registry: Arc<dyn ExtensionRegistry>) -> Self {
        self.extensions = Some(registry);
        self
    }

    pub fn iri_resolver(mut self, resolver: Arc<dyn IriResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn base_iri(mut self, base: impl Into<String>) -> Self {
        self.base_iri = Some(base.into());
        self
    }

    /// Pin `NOW()` to an explicit instant instead of the build-time clock.
    pub fn now(mut self, now: XsdDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn cancellation(mut self, flag: Cancellation) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn build(self) -> EvalContext {
        EvalContext {
            exists: self.exists,
            extensions: self.extensions,
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(SimpleIriResolver)),
            base_iri: self.base_iri,
            now: self.now.unwrap_or_else(XsdDateTime::now),
            cancellation: self.cancellation.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_resolver() {
        let r = SimpleIriResolver;
        assert_eq!(
            r.resolve(None, "http://example.org/x"),
            Some("http://example.org/x".to_string())
        );
        assert_eq!(r.resolve(None, "relative"), None);
        assert_eq!(
            r.resolve(Some("http://example.org/dir/page"), "other"),
            Some("http://example.org/dir/other".to_string())
        );
    }

    #[test]
    fn test_cancellation_flag() {
        let flag = Cancellation::new();
        assert!(!flag.is_cancelled());
        let shared = flag.clone();
        shared.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_now_is_pinned() {
        let ctx = EvalContext::default();
        let a = ctx.now().clone();
        let b = ctx.now().clone();
        assert_eq!(a, b);
    }
}
