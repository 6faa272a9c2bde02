//! Evaluation results

use crate::rule::RuleHandle;
use crate::types::MethodSignature;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, OnceLock};

/// What one type-load evaluation produced: which rules matched, the concrete
/// type names they matched under, which declared methods matched, and the
/// tracked annotations observed per method.
///
/// Short-lived; the downstream transformer consumes it immediately. The
/// no-match case returns a shared singleton (see [`Match::empty`]) so the
/// overwhelmingly common rejection path allocates nothing.
#[derive(Debug, Default)]
pub struct Match {
    pub(crate) class_matches: FxHashMap<RuleHandle, FxHashSet<String>>,
    pub(crate) methods: FxHashSet<MethodSignature>,
    pub(crate) method_annotations: FxHashMap<MethodSignature, FxHashSet<String>>,
    pub(crate) bridge_methods: FxHashSet<MethodSignature>,
}

impl Match {
    /// The shared empty match. Always the same allocation; callers may
    /// compare with `Arc::ptr_eq` to detect the no-match path.
    pub fn empty() -> Arc<Match> {
        static EMPTY: OnceLock<Arc<Match>> = OnceLock::new();
        EMPTY.get_or_init(|| Arc::new(Match::default())).clone()
    }

    /// The rules that matched, each mapped to the type names it matched:
    /// the matcher's own declared exact names plus the concrete name of the
    /// evaluated type.
    pub fn class_matches(&self) -> &FxHashMap<RuleHandle, FxHashSet<String>> {
        &self.class_matches
    }

    /// Type names a specific matched rule matched under.
    pub fn matched_names(&self, rule: &RuleHandle) -> Option<&FxHashSet<String>> {
        self.class_matches.get(rule)
    }

    /// All declared methods that matched at least one rule.
    pub fn methods(&self) -> &FxHashSet<MethodSignature> {
        &self.methods
    }

    /// Tracked annotations observed on a method during the scan. Only
    /// annotations some registered matcher asked about are recorded.
    pub fn method_annotations(&self, method: &MethodSignature) -> Option<&FxHashSet<String>> {
        self.method_annotations.get(method)
    }

    /// Matched methods that are compiler-generated bridges. The transformer
    /// uses this to avoid instrumenting both a bridge and its real target.
    pub fn bridge_methods(&self) -> &FxHashSet<MethodSignature> {
        &self.bridge_methods
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.class_matches.is_empty()
    }

    pub fn is_class_and_method_match(&self) -> bool {
        !(self.methods.is_empty() || self.class_matches.is_empty())
    }
}
