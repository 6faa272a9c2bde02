//! Class-level predicates
//!
//! A [`ClassMatcher`] decides whether a loaded type is of interest at all.
//! Ancestry-walking variants (`ChildOf`, `ImplementsInterface`) pull missing
//! links through the [`TypeResolver`]; any resolution failure degrades that
//! evaluation branch to non-match and never aborts the walk of a sibling
//! branch.

use crate::resolver::{LoaderContext, ResolvedTypeView, TypeResolver};
use crate::types::TypeDescriptor;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Class-shape predicate over one loaded type.
///
/// Immutable once built; composite variants own their children exclusively.
/// Equality is value-based. Rules share a matcher by holding the same
/// `Arc<ClassMatcher>`, which is also what the evaluator's memo keys on.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMatcher {
    /// The descriptor's own name equals the given name. No ancestry walk.
    ExactName(String),
    /// The descriptor's own name is a member of the set. Produced by the
    /// `Or` constructor when it merges exact-name children.
    ExactNameSet(FxHashSet<String>),
    /// Any type that is not itself an interface. Abstract classes included.
    AllConcreteTypes,
    /// Matches nothing. Identity element for `Or`.
    NoMatch,
    Not(Box<ClassMatcher>),
    And(Vec<ClassMatcher>),
    Or(Vec<ClassMatcher>),
    /// Direct or transitive descendants of `parent`, resolved upward through
    /// the super chain. `include_self` controls whether `parent` itself
    /// counts.
    ChildOf { parent: String, include_self: bool },
    /// A concrete type implementing the interface directly or transitively,
    /// through extended interfaces or through an ancestor class. Never
    /// matches the interface itself.
    ImplementsInterface(String),
}

impl ClassMatcher {
    pub fn exact_name(name: impl Into<String>) -> Self {
        Self::ExactName(name.into())
    }

    pub fn exact_name_set(names: impl IntoIterator<Item = String>) -> Self {
        Self::ExactNameSet(names.into_iter().collect())
    }

    pub fn child_of(parent: impl Into<String>, include_self: bool) -> Self {
        Self::ChildOf {
            parent: parent.into(),
            include_self,
        }
    }

    pub fn implements_interface(name: impl Into<String>) -> Self {
        Self::ImplementsInterface(name.into())
    }

    pub fn not(inner: ClassMatcher) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn and(children: Vec<ClassMatcher>) -> Self {
        match children.len() {
            1 => children.into_iter().next().unwrap(),
            _ => Self::And(children),
        }
    }

    /// Disjunction. Two or more exact-name children are pre-merged into one
    /// set-membership matcher, turning an O(k) scan into an O(1) average
    /// lookup; the merge is semantics-preserving.
    pub fn or(children: Vec<ClassMatcher>) -> Self {
        let mut exact: FxHashSet<String> = FxHashSet::default();
        let mut exact_sources = 0usize;
        let mut rest = Vec::new();

        for child in children {
            match child {
                Self::ExactName(name) => {
                    exact.insert(name);
                    exact_sources += 1;
                }
                Self::ExactNameSet(names) => {
                    exact.extend(names);
                    exact_sources += 1;
                }
                other => rest.push(other),
            }
        }

        if !exact.is_empty() {
            if exact.len() == 1 && exact_sources == 1 {
                rest.push(Self::ExactName(exact.into_iter().next().unwrap()));
            } else {
                rest.push(Self::ExactNameSet(exact));
            }
        }

        match rest.len() {
            0 => Self::NoMatch,
            1 => rest.into_iter().next().unwrap(),
            _ => Self::Or(rest),
        }
    }

    /// The closed set of names this matcher can possibly match, when it is
    /// provably exact-by-name. `None` for anything structural.
    ///
    /// An index built solely from exact matchers uses the union of these
    /// sets to reject foreign types without any method inspection.
    pub fn exact_names(&self) -> Option<FxHashSet<String>> {
        match self {
            Self::ExactName(name) => {
                let mut set = FxHashSet::default();
                set.insert(name.clone());
                Some(set)
            }
            Self::ExactNameSet(names) => Some(names.clone()),
            Self::Or(children) => {
                let mut union = FxHashSet::default();
                for child in children {
                    union.extend(child.exact_names()?);
                }
                Some(union)
            }
            _ => None,
        }
    }

    /// Evaluate against raw structural data, resolving ancestry through
    /// `resolver` as needed.
    pub fn matches_descriptor(
        &self,
        descriptor: &TypeDescriptor,
        resolver: &dyn TypeResolver,
        loader: &LoaderContext,
    ) -> bool {
        match self {
            Self::ExactName(name) => descriptor.name == *name,
            Self::ExactNameSet(names) => names.contains(&descriptor.name),
            Self::AllConcreteTypes => !descriptor.is_interface,
            Self::NoMatch => false,
            Self::Not(inner) => !inner.matches_descriptor(descriptor, resolver, loader),
            Self::And(children) => children
                .iter()
                .all(|c| c.matches_descriptor(descriptor, resolver, loader)),
            Self::Or(children) => children
                .iter()
                .any(|c| c.matches_descriptor(descriptor, resolver, loader)),
            Self::ChildOf {
                parent,
                include_self,
            } => Self::is_child_of(descriptor, parent, *include_self, resolver, loader),
            Self::ImplementsInterface(name) => {
                Self::implements(descriptor, name, resolver, loader)
            }
        }
    }

    /// Evaluate against an already-resolved runtime type handle. Must agree
    /// with [`Self::matches_descriptor`] for the same logical type.
    pub fn matches_resolved(&self, view: &ResolvedTypeView) -> bool {
        match self {
            Self::ExactName(name) => view.name == *name,
            Self::ExactNameSet(names) => names.contains(&view.name),
            Self::AllConcreteTypes => !view.is_interface,
            Self::NoMatch => false,
            Self::Not(inner) => !inner.matches_resolved(view),
            Self::And(children) => children.iter().all(|c| c.matches_resolved(view)),
            Self::Or(children) => children.iter().any(|c| c.matches_resolved(view)),
            Self::ChildOf {
                parent,
                include_self,
            } => {
                (*include_self && view.name == *parent)
                    || view.ancestors.iter().any(|a| a == parent)
            }
            Self::ImplementsInterface(name) => {
                !view.is_interface && view.interfaces.contains(name)
            }
        }
    }

    fn is_child_of(
        descriptor: &TypeDescriptor,
        parent: &str,
        include_self: bool,
        resolver: &dyn TypeResolver,
        loader: &LoaderContext,
    ) -> bool {
        if include_self && descriptor.name == parent {
            return true;
        }

        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut current = descriptor.super_name.clone();

        while let Some(name) = current {
            if name == parent {
                return true;
            }
            if !seen.insert(name.clone()) {
                // malformed hierarchies can cycle
                return false;
            }
            match resolver.resolve(&name, loader) {
                Ok(ancestor) => current = ancestor.super_name,
                Err(err) => {
                    debug!(ancestor = %name, %err, "ancestor resolution failed, treating as non-match");
                    return false;
                }
            }
        }

        false
    }

    fn implements(
        descriptor: &TypeDescriptor,
        target: &str,
        resolver: &dyn TypeResolver,
        loader: &LoaderContext,
    ) -> bool {
        if descriptor.is_interface {
            return false;
        }

        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut frontier: Vec<String> = descriptor.interface_names.clone();
        let mut super_name = descriptor.super_name.clone();

        loop {
            // Expand each declared interface through its extended interfaces.
            while let Some(interface) = frontier.pop() {
                if !seen.insert(interface.clone()) {
                    continue;
                }
                if interface == target {
                    return true;
                }
                match resolver.resolve(&interface, loader) {
                    Ok(desc) => frontier.extend(desc.interface_names.iter().cloned()),
                    Err(err) => {
                        debug!(interface = %interface, %err, "interface resolution failed, skipping branch");
                    }
                }
            }

            // An ancestor class, not just the type itself, may declare the
            // interface; keep climbing.
            match super_name {
                None => return false,
                Some(name) => {
                    if !seen.insert(name.clone()) {
                        return false;
                    }
                    match resolver.resolve(&name, loader) {
                        Ok(ancestor) => {
                            frontier.extend(ancestor.interface_names.iter().cloned());
                            super_name = ancestor.super_name;
                        }
                        Err(err) => {
                            debug!(ancestor = %name, %err, "ancestor resolution failed, treating as non-match");
                            return false;
                        }
                    }
                }
            }
        }
    }
}
