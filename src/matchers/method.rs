//! Method-level predicates

use crate::types::{MethodAccess, MethodSignature};
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// Fallback predicate over a method's name, shape, access flags, and the
/// annotations observed on it during the scan.
pub type MethodPredicate =
    dyn Fn(&MethodSignature, MethodAccess, &FxHashSet<String>) -> bool + Send + Sync;

/// Method-shape predicate, evaluated per declared method of a type that
/// passed (or may pass) the class-level check.
///
/// `ExactSignatureSet` is special: its signatures key the index's exact-method
/// map directly, which is the O(1) fast path. Every other variant lands on
/// the ordered pattern list.
#[derive(Clone)]
pub enum MethodMatcher {
    /// The current method's signature is a member of the set.
    ExactSignatureSet(FxHashSet<MethodSignature>),
    /// Every declared method. Callers pre-filter abstract and native
    /// methods before asking.
    AllMethods,
    /// The annotation descriptor was observed while scanning the method.
    AnnotationPresent(String),
    /// Arbitrary predicate, for shapes not expressible as an exact set or
    /// annotation check. The label names it in logs.
    GenericPattern {
        label: String,
        predicate: Arc<MethodPredicate>,
    },
}

impl MethodMatcher {
    pub fn exact_signatures(signatures: impl IntoIterator<Item = MethodSignature>) -> Self {
        Self::ExactSignatureSet(signatures.into_iter().collect())
    }

    pub fn annotation_present(descriptor: impl Into<String>) -> Self {
        Self::AnnotationPresent(descriptor.into())
    }

    pub fn generic(
        label: impl Into<String>,
        predicate: impl Fn(&MethodSignature, MethodAccess, &FxHashSet<String>) -> bool
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self::GenericPattern {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn matches(
        &self,
        signature: &MethodSignature,
        access: MethodAccess,
        annotations: &FxHashSet<String>,
    ) -> bool {
        match self {
            Self::ExactSignatureSet(signatures) => signatures.contains(signature),
            Self::AllMethods => true,
            Self::AnnotationPresent(descriptor) => annotations.contains(descriptor),
            Self::GenericPattern { predicate, .. } => predicate(signature, access, annotations),
        }
    }

    /// The finite signature set backing the exact-method fast path, if this
    /// matcher exposes one.
    pub fn exact_signature_set(&self) -> Option<&FxHashSet<MethodSignature>> {
        match self {
            Self::ExactSignatureSet(signatures) => Some(signatures),
            _ => None,
        }
    }

    /// The annotation descriptor the method scanner must record for this
    /// matcher to work, if any.
    pub fn annotation_of_interest(&self) -> Option<&str> {
        match self {
            Self::AnnotationPresent(descriptor) => Some(descriptor),
            _ => None,
        }
    }
}

impl fmt::Debug for MethodMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactSignatureSet(signatures) => {
                f.debug_tuple("ExactSignatureSet").field(signatures).finish()
            }
            Self::AllMethods => write!(f, "AllMethods"),
            Self::AnnotationPresent(descriptor) => {
                f.debug_tuple("AnnotationPresent").field(descriptor).finish()
            }
            Self::GenericPattern { label, .. } => {
                f.debug_struct("GenericPattern").field("label", label).finish()
            }
        }
    }
}

impl PartialEq for MethodMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ExactSignatureSet(a), Self::ExactSignatureSet(b)) => a == b,
            (Self::AllMethods, Self::AllMethods) => true,
            (Self::AnnotationPresent(a), Self::AnnotationPresent(b)) => a == b,
            // Closures have no value equality; same predicate object or bust.
            (
                Self::GenericPattern { predicate: a, .. },
                Self::GenericPattern { predicate: b, .. },
            ) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
