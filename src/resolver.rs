//! Type resolution boundary
//!
//! `ChildOf` and `ImplementsInterface` need ancestry beyond what the current
//! descriptor exposes. That lookup goes through [`TypeResolver`], the one
//! external collaborator of the engine. Resolvers may block (loading a
//! related type's structural data) and are called concurrently from many
//! loader threads; a failed resolution is terminal for the branch that
//! requested it.

use crate::error::{ResolveError, ResolveResult};
use crate::types::TypeDescriptor;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Opaque identifier for the loader scope a resolution request belongs to.
///
/// The engine never inspects it; it is forwarded to the resolver so that
/// embedders with per-loader visibility rules can honor them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LoaderContext {
    pub id: Option<String>,
}

impl LoaderContext {
    /// The bootstrap scope, for types visible everywhere.
    pub fn bootstrap() -> Self {
        Self { id: None }
    }

    pub fn named(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

/// Resolves a type name to its structural snapshot.
///
/// Must be safe to call from any number of loader threads at once. No
/// retries are performed by the engine; `Err` means the branch that asked
/// evaluates to non-match.
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, name: &str, loader: &LoaderContext) -> ResolveResult<TypeDescriptor>;
}

/// The cheap ancestry view over an already-resolved runtime type handle.
///
/// When the runtime has the type object in hand, walking its precomputed
/// super chain and flattened interface set beats re-resolving descriptors
/// link by link. Matcher verdicts against this view and against the raw
/// descriptor must agree for the same logical type.
#[derive(Debug, Clone, Default)]
pub struct ResolvedTypeView {
    pub name: String,
    pub is_interface: bool,
    /// Super-type chain, nearest ancestor first, excluding the type itself.
    pub ancestors: Vec<String>,
    /// All interfaces the type implements, directly or transitively,
    /// including those declared by ancestors.
    pub interfaces: FxHashSet<String>,
}

impl ResolvedTypeView {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_ancestor(mut self, name: impl Into<String>) -> Self {
        self.ancestors.push(name.into());
        self
    }

    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.interfaces.insert(name.into());
        self
    }
}

/// Map-backed resolver over pre-registered descriptors.
///
/// Useful for embedders that snapshot a closed world up front, and for
/// asserting resolver traffic in tests: every call is counted, which is how
/// the exact-name fast path proves it never touched the resolver.
#[derive(Debug, Default)]
pub struct MapResolver {
    types: FxHashMap<String, TypeDescriptor>,
    calls: AtomicUsize,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Number of resolve calls served so far, hits and misses alike.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl TypeResolver for MapResolver {
    fn resolve(&self, name: &str, _loader: &LoaderContext) -> ResolveResult<TypeDescriptor> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::not_found(name))
    }
}
