//! Class- and method-level structural predicates
//!
//! Both matcher vocabularies are closed enums with one evaluation arm per
//! variant, so a new kind that forgets its evaluation logic is a compile
//! error, not a silent non-match.

mod class;
mod method;

pub use class::ClassMatcher;
pub use method::{MethodMatcher, MethodPredicate};

#[cfg(test)]
mod tests;
