//! Rules and rule identity
//!
//! A [`Rule`] binds one class matcher and one method matcher to an opaque
//! payload. Rules are created once at registration and live until the owning
//! index is discarded.
//!
//! Two equality disciplines coexist here and must never be conflated:
//! matchers and signatures compare by value, while [`RuleHandle`] compares by
//! identity only, so two structurally identical registrations stay distinct
//! index entries. The disciplines live on distinct types on purpose; mixing
//! them up is a type error.

use crate::matchers::{ClassMatcher, MethodMatcher};
use serde::Deserialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Trace-emission configuration carried by the specialized rule variant.
///
/// The engine treats it as opaque; the downstream transformer reads it when
/// a match arrives.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TraceConfig {
    #[serde(default)]
    pub metric_name: Option<String>,
    #[serde(default)]
    pub metric_prefix: Option<String>,
    #[serde(default)]
    pub dispatcher: bool,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default)]
    pub exclude_from_transaction_trace: bool,
    #[serde(default)]
    pub leaf: bool,
    #[serde(default)]
    pub rollup_metric_names: Vec<String>,
}

/// What a matched rule means to the downstream transformer.
#[derive(Debug, Clone, PartialEq)]
pub enum RulePayload {
    /// Opaque tag identifying the hook to inject.
    Hook(String),
    /// Full trace-emission configuration.
    Trace(TraceConfig),
}

impl RulePayload {
    pub fn hook(tag: impl Into<String>) -> Self {
        Self::Hook(tag.into())
    }
}

/// Immutable (class matcher, method matcher, payload) triple.
///
/// The class matcher is held behind an `Arc` so many rules can share one
/// matcher object; the evaluator memoizes class verdicts per shared matcher,
/// not per rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub class_matcher: Arc<ClassMatcher>,
    pub method_matcher: MethodMatcher,
    pub payload: RulePayload,
}

impl Rule {
    pub fn new(
        class_matcher: Arc<ClassMatcher>,
        method_matcher: MethodMatcher,
        payload: RulePayload,
    ) -> Self {
        Self {
            class_matcher,
            method_matcher,
            payload,
        }
    }

    /// A rule carrying trace-emission configuration.
    pub fn traced(
        class_matcher: Arc<ClassMatcher>,
        method_matcher: MethodMatcher,
        trace: TraceConfig,
    ) -> Self {
        Self::new(class_matcher, method_matcher, RulePayload::Trace(trace))
    }
}

/// Identity-equality handle to a registered rule.
///
/// Cloning a handle clones the identity; only handles cloned from the same
/// registration compare equal. There is deliberately no value-based
/// comparison here: independently registered, coincidentally identical rules
/// must not collapse into one index entry.
#[derive(Clone)]
pub struct RuleHandle(Arc<Rule>);

impl RuleHandle {
    pub fn new(rule: Rule) -> Self {
        Self(Arc::new(rule))
    }

    pub fn rule(&self) -> &Rule {
        &self.0
    }

    pub(crate) fn class_matcher_key(&self) -> usize {
        Arc::as_ptr(&self.0.class_matcher) as usize
    }
}

impl PartialEq for RuleHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RuleHandle {}

impl Hash for RuleHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for RuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RuleHandle").field(&self.0).finish()
    }
}
