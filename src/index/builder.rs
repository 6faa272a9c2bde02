//! Single-use, single-threaded rule ingestion

use super::MatchIndex;
use crate::rule::{Rule, RuleHandle};
use crate::types::{default_constructor, universal_exclusions, MethodSignature};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

/// Ingests rules during module/configuration load and freezes them into a
/// [`MatchIndex`].
///
/// Not safe for concurrent registration; registration strictly precedes any
/// type-load evaluation. `build` consumes the builder.
#[derive(Debug, Default)]
pub struct MatchIndexBuilder {
    exact_methods: FxHashMap<MethodSignature, Vec<RuleHandle>>,
    pattern_rules: Vec<RuleHandle>,
    tracked_annotations: FxHashSet<String>,
    exact_type_names: FxHashSet<String>,
    /// Cleared permanently the first time a non-exact class matcher is
    /// registered; once cleared it cannot be re-set.
    fully_exact: bool,
}

impl MatchIndexBuilder {
    pub fn new() -> Self {
        Self {
            fully_exact: true,
            ..Self::default()
        }
    }

    /// Install a rule and return its identity handle, the key under which
    /// its matches will be reported.
    pub fn register(&mut self, rule: Rule) -> RuleHandle {
        let handle = RuleHandle::new(rule);
        let rule = handle.rule();

        match rule.class_matcher.exact_names() {
            Some(names) if self.fully_exact => self.exact_type_names.extend(names),
            _ => {
                self.fully_exact = false;
                self.exact_type_names.clear();
            }
        }

        if let Some(annotation) = rule.method_matcher.annotation_of_interest() {
            self.tracked_annotations.insert(annotation.to_string());
        }

        match rule.method_matcher.exact_signature_set() {
            Some(signatures) => {
                for signature in signatures {
                    self.warn_on_discouraged_target(signature);
                    self.exact_methods
                        .entry(signature.clone())
                        .or_default()
                        .push(handle.clone());
                }
            }
            None => self.pattern_rules.push(handle.clone()),
        }

        handle
    }

    /// Matching these is legal but discouraged: every loaded type declares
    /// them, so the rule forces a class-matcher evaluation on nearly every
    /// type load.
    fn warn_on_discouraged_target(&self, signature: &MethodSignature) {
        if universal_exclusions().contains(signature) {
            warn!(
                method = %signature,
                "rule targets a universally excluded method; it will never match"
            );
        } else if signature == default_constructor() {
            warn!(
                method = %signature,
                "rule targets the implicit no-argument constructor"
            );
        }
    }

    /// Freeze into an immutable index.
    pub fn build(self) -> MatchIndex {
        MatchIndex {
            exact_methods: self.exact_methods,
            pattern_rules: self.pattern_rules,
            tracked_annotations: self.tracked_annotations,
            exact_type_names: self.fully_exact.then_some(self.exact_type_names),
        }
    }
}
