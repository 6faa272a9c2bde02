//! Per-type-load match evaluation
//!
//! One [`Evaluator`] serves exactly one type load on whatever thread handles
//! that load callback. Its class-matcher memo is local to the instance and is
//! never shared across threads or across type loads, so there is no hidden
//! cross-thread state anywhere in the engine.
//!
//! Nothing here escalates into the type-loading path. A resolver failure, a
//! panicking predicate, any defect inside a single matcher evaluation: all of
//! them degrade to non-match at the evaluation site. The contract is fail
//! open to "do not instrument this, proceed with loading".

use super::result::Match;
use super::MatchIndex;
use crate::resolver::{LoaderContext, ResolvedTypeView, TypeResolver};
use crate::rule::RuleHandle;
use crate::types::{universal_exclusions, MethodInfo, MethodSignature, TypeDescriptor};
use rustc_hash::{FxHashMap, FxHashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Single-use visitor over one (index, descriptor) pair.
pub struct Evaluator<'a> {
    index: &'a MatchIndex,
    resolver: &'a dyn TypeResolver,
    loader: &'a LoaderContext,
    resolved: Option<&'a ResolvedTypeView>,
    /// Class-matcher verdicts, keyed by matcher object identity so rules
    /// sharing one matcher pay its cost once per type.
    class_verdicts: FxHashMap<usize, bool>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        index: &'a MatchIndex,
        resolver: &'a dyn TypeResolver,
        loader: &'a LoaderContext,
        resolved: Option<&'a ResolvedTypeView>,
    ) -> Self {
        Self {
            index,
            resolver,
            loader,
            resolved,
            class_verdicts: FxHashMap::default(),
        }
    }

    /// Run the match. Consumes the evaluator; the memo must not outlive the
    /// one type load it was built for.
    pub fn evaluate(mut self, descriptor: &TypeDescriptor) -> Arc<Match> {
        let index = self.index;

        if let Some(names) = index.exact_type_names() {
            if !names.contains(&descriptor.name) {
                return Match::empty();
            }
        }

        let mut matched: FxHashMap<MethodSignature, FxHashSet<RuleHandle>> = FxHashMap::default();
        let mut method_annotations: FxHashMap<MethodSignature, FxHashSet<String>> =
            FxHashMap::default();
        let mut bridge_methods: FxHashSet<MethodSignature> = FxHashSet::default();

        for method in &descriptor.methods {
            if method.access.is_abstract() || method.access.is_native() {
                continue;
            }
            if universal_exclusions().contains(&method.signature) {
                continue;
            }

            let observed = self.observed_annotations(method);
            if !observed.is_empty() {
                method_annotations.insert(method.signature.clone(), observed.clone());
            }

            let mut method_matched = false;

            if let Some(candidates) = index.exact_methods.get(&method.signature) {
                for handle in candidates {
                    if self.class_matches(handle, descriptor) {
                        matched
                            .entry(method.signature.clone())
                            .or_default()
                            .insert(handle.clone());
                        method_matched = true;
                    }
                }
            }

            for handle in &index.pattern_rules {
                if self.method_matches(handle, method, &observed)
                    && self.class_matches(handle, descriptor)
                {
                    matched
                        .entry(method.signature.clone())
                        .or_default()
                        .insert(handle.clone());
                    method_matched = true;
                }
            }

            if method_matched && method.access.is_bridge() {
                bridge_methods.insert(method.signature.clone());
            }
        }

        if matched.is_empty() {
            return Match::empty();
        }

        let mut class_matches: FxHashMap<RuleHandle, FxHashSet<String>> = FxHashMap::default();
        for handles in matched.values() {
            for handle in handles {
                let names = class_matches.entry(handle.clone()).or_default();
                if let Some(declared) = handle.rule().class_matcher.exact_names() {
                    names.extend(declared);
                }
                // Always report the concrete type that matched, even when the
                // matcher declares a wider exact-name set.
                names.insert(descriptor.name.clone());
            }
        }

        Arc::new(Match {
            class_matches,
            methods: matched.into_keys().collect(),
            method_annotations,
            bridge_methods,
        })
    }

    fn observed_annotations(&self, method: &MethodInfo) -> FxHashSet<String> {
        if self.index.tracked_annotations.is_empty() {
            return FxHashSet::default();
        }
        method
            .annotations
            .iter()
            .filter(|a| self.index.tracked_annotations.contains(*a))
            .cloned()
            .collect()
    }

    fn class_matches(&mut self, handle: &RuleHandle, descriptor: &TypeDescriptor) -> bool {
        let key = handle.class_matcher_key();
        if let Some(&verdict) = self.class_verdicts.get(&key) {
            return verdict;
        }

        let matcher = Arc::clone(&handle.rule().class_matcher);
        let resolver = self.resolver;
        let loader = self.loader;
        let resolved = self.resolved;

        let verdict = catch_unwind(AssertUnwindSafe(|| match resolved {
            Some(view) => matcher.matches_resolved(view),
            None => matcher.matches_descriptor(descriptor, resolver, loader),
        }))
        .unwrap_or_else(|_| {
            warn!(
                matcher = ?handle.rule().class_matcher,
                type_name = %descriptor.name,
                "class matcher evaluation panicked, treating as non-match"
            );
            false
        });

        self.class_verdicts.insert(key, verdict);
        verdict
    }

    fn method_matches(
        &self,
        handle: &RuleHandle,
        method: &MethodInfo,
        observed: &FxHashSet<String>,
    ) -> bool {
        let matcher = &handle.rule().method_matcher;
        catch_unwind(AssertUnwindSafe(|| {
            matcher.matches(&method.signature, method.access, observed)
        }))
        .unwrap_or_else(|_| {
            warn!(
                matcher = ?matcher,
                method = %method.signature,
                "method matcher evaluation panicked, treating as non-match"
            );
            false
        })
    }
}
