//! weavemark - structural match and rule-index engine for runtime
//! instrumentation agents.
//!
//! Given a large, statically registered set of rules (class-shape predicates
//! combined with method-shape predicates), the engine decides on every
//! type-load event which rules apply to which declared methods of that type.
//! Registration compiles all rules into an immutable [`MatchIndex`] shared
//! read-only by every loader thread; each type load runs one short-lived
//! [`Evaluator`] pass and yields a [`Match`] for the downstream transformer.
//!
//! The engine decides *whether* and *where* to instrument, never *how*; code
//! rewriting, the tracing runtime, and telemetry are external concerns.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weavemark::{
//!     ClassMatcher, LoaderContext, MapResolver, MatchIndexBuilder, MethodInfo, MethodMatcher,
//!     MethodSignature, Rule, RulePayload, TypeDescriptor,
//! };
//!
//! let mut builder = MatchIndexBuilder::new();
//! let rule = builder.register(Rule::new(
//!     Arc::new(ClassMatcher::exact_name("com/example/Service")),
//!     MethodMatcher::exact_signatures([MethodSignature::new("handle", "()V")]),
//!     RulePayload::hook("service-handle"),
//! ));
//! let index = builder.build();
//!
//! let descriptor = TypeDescriptor::class("com/example/Service")
//!     .with_method(MethodInfo::concrete("handle", "()V"));
//! let resolver = MapResolver::new();
//!
//! let result = index.evaluate(&descriptor, None, &resolver, &LoaderContext::bootstrap());
//! assert!(result.methods().contains(&MethodSignature::new("handle", "()V")));
//! assert!(result.matched_names(&rule).unwrap().contains("com/example/Service"));
//! ```

mod error;
mod rule;
mod types;

pub mod index;
pub mod matchers;
pub mod resolver;

pub use error::{ResolveError, ResolveResult};
pub use index::{Evaluator, Match, MatchIndex, MatchIndexBuilder};
pub use matchers::{ClassMatcher, MethodMatcher, MethodPredicate};
pub use resolver::{LoaderContext, MapResolver, ResolvedTypeView, TypeResolver};
pub use rule::{Rule, RuleHandle, RulePayload, TraceConfig};
pub use types::{
    default_constructor, universal_exclusions, MethodAccess, MethodInfo, MethodSignature,
    TypeDescriptor,
};
