//! Rule index and per-type-load evaluation
//!
//! Rules registered at module-load time compile into an immutable
//! [`MatchIndex`] that every loader thread reads concurrently without
//! locking. Evaluation of one type against the index happens through a
//! short-lived [`Evaluator`] and yields a [`Match`].

mod builder;
mod evaluator;
mod result;

pub use builder::MatchIndexBuilder;
pub use evaluator::Evaluator;
pub use result::Match;

use crate::resolver::{LoaderContext, ResolvedTypeView, TypeResolver};
use crate::rule::RuleHandle;
use crate::types::{MethodSignature, TypeDescriptor};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Read-optimized, immutable compilation of all registered rules.
///
/// Built once by [`MatchIndexBuilder::build`] and then shared read-only by
/// every concurrently loading thread for the life of the process (or until a
/// module reload builds a replacement; handing indexes out as
/// `Arc<MatchIndex>` lets the old one keep serving evaluations already in
/// flight after a swap).
#[derive(Debug)]
pub struct MatchIndex {
    /// Exact method signature to the rules that keyed on it.
    pub(crate) exact_methods: FxHashMap<MethodSignature, Vec<RuleHandle>>,
    /// Rules whose method matcher is a pattern, in registration order.
    pub(crate) pattern_rules: Vec<RuleHandle>,
    /// Annotation descriptors worth recording during the method scan.
    pub(crate) tracked_annotations: FxHashSet<String>,
    /// Present only when every registered rule's class matcher is provably
    /// exact-by-name; drives the fast rejection path.
    pub(crate) exact_type_names: Option<FxHashSet<String>>,
}

impl MatchIndex {
    /// The closed set of type names this index can possibly match, when all
    /// registered class matchers were exact-by-name.
    pub fn exact_type_names(&self) -> Option<&FxHashSet<String>> {
        self.exact_type_names.as_ref()
    }

    pub fn tracked_annotations(&self) -> &FxHashSet<String> {
        &self.tracked_annotations
    }

    pub fn rule_count(&self) -> usize {
        let exact: FxHashSet<&RuleHandle> = self.exact_methods.values().flatten().collect();
        exact.len() + self.pattern_rules.len()
    }

    /// Evaluate one type load against this index.
    ///
    /// Convenience over constructing an [`Evaluator`] by hand. Pass the
    /// resolved view when the runtime already has the type object; the
    /// ancestry walk is cheaper through it.
    pub fn evaluate(
        &self,
        descriptor: &TypeDescriptor,
        resolved: Option<&ResolvedTypeView>,
        resolver: &dyn TypeResolver,
        loader: &LoaderContext,
    ) -> Arc<Match> {
        Evaluator::new(self, resolver, loader, resolved).evaluate(descriptor)
    }
}
