//! Tests for class matcher semantics
//!
//! Ancestry walks run against a map-backed resolver seeded with a small
//! hierarchy; every unresolvable-link case must degrade to non-match, never
//! an error.

use super::*;
use crate::resolver::{LoaderContext, MapResolver, ResolvedTypeView};
use crate::types::TypeDescriptor;

/// Base <- Mid <- Leaf, plus interface I, J extends I, WithJ implements J,
/// and SubOfWithJ extending it.
fn hierarchy() -> MapResolver {
    MapResolver::new()
        .with(TypeDescriptor::class("Base"))
        .with(TypeDescriptor::class("Mid").extends("Base"))
        .with(TypeDescriptor::class("Leaf").extends("Mid"))
        .with(TypeDescriptor::interface("I"))
        .with(TypeDescriptor::interface("J").implements("I"))
        .with(TypeDescriptor::class("WithJ").implements("J"))
        .with(TypeDescriptor::class("SubOfWithJ").extends("WithJ"))
}

fn loader() -> LoaderContext {
    LoaderContext::bootstrap()
}

fn matches(matcher: &ClassMatcher, descriptor: &TypeDescriptor, resolver: &MapResolver) -> bool {
    matcher.matches_descriptor(descriptor, resolver, &loader())
}

#[test]
fn exact_name_matches_own_name_only() {
    let matcher = ClassMatcher::exact_name("Foo");
    let resolver = MapResolver::new();

    assert!(matches(&matcher, &TypeDescriptor::class("Foo"), &resolver));
    assert!(!matches(&matcher, &TypeDescriptor::class("Bar"), &resolver));
    // No ancestry walk: a subtype of Foo is not Foo.
    assert!(!matches(
        &matcher,
        &TypeDescriptor::class("FooChild").extends("Foo"),
        &resolver
    ));
    assert_eq!(resolver.calls(), 0);
}

#[test]
fn all_concrete_types_excludes_interfaces() {
    let matcher = ClassMatcher::AllConcreteTypes;
    let resolver = MapResolver::new();

    assert!(matches(&matcher, &TypeDescriptor::class("Foo"), &resolver));
    assert!(!matches(&matcher, &TypeDescriptor::interface("I"), &resolver));
}

#[test]
fn no_match_matches_nothing() {
    let resolver = MapResolver::new();
    assert!(!matches(
        &ClassMatcher::NoMatch,
        &TypeDescriptor::class("Foo"),
        &resolver
    ));
    // Identity element: or of nothing is NoMatch.
    assert_eq!(ClassMatcher::or(vec![]), ClassMatcher::NoMatch);
}

#[test]
fn boolean_composition() {
    let resolver = MapResolver::new();
    let foo = TypeDescriptor::class("Foo");

    let not_foo = ClassMatcher::not(ClassMatcher::exact_name("Foo"));
    assert!(!matches(&not_foo, &foo, &resolver));
    assert!(matches(&not_foo, &TypeDescriptor::class("Bar"), &resolver));

    let and = ClassMatcher::and(vec![
        ClassMatcher::AllConcreteTypes,
        ClassMatcher::exact_name("Foo"),
    ]);
    assert!(matches(&and, &foo, &resolver));
    assert!(!matches(&and, &TypeDescriptor::class("Bar"), &resolver));

    let or = ClassMatcher::or(vec![
        ClassMatcher::NoMatch,
        ClassMatcher::child_of("Base", false),
        ClassMatcher::exact_name("Foo"),
    ]);
    assert!(matches(&or, &foo, &resolver));
}

#[test]
fn or_merges_exact_name_children() {
    let merged = ClassMatcher::or(vec![
        ClassMatcher::child_of("Base", false),
        ClassMatcher::exact_name("X"),
        ClassMatcher::exact_name("Y"),
    ]);

    match &merged {
        ClassMatcher::Or(children) => {
            assert_eq!(children.len(), 2);
            assert!(children
                .iter()
                .any(|c| matches!(c, ClassMatcher::ExactNameSet(s) if s.len() == 2)));
        }
        other => panic!("expected Or, got {other:?}"),
    }

    // A pure exact disjunction collapses to the set matcher outright.
    let set_only = ClassMatcher::or(vec![
        ClassMatcher::exact_name("X"),
        ClassMatcher::exact_name("Y"),
    ]);
    assert!(matches!(&set_only, ClassMatcher::ExactNameSet(s) if s.len() == 2));

    // A single exact child survives unmerged.
    assert_eq!(
        ClassMatcher::or(vec![ClassMatcher::exact_name("X")]),
        ClassMatcher::exact_name("X")
    );
}

#[test]
fn or_merge_is_semantics_preserving() {
    let resolver = hierarchy();
    let merged = ClassMatcher::or(vec![
        ClassMatcher::child_of("Base", false),
        ClassMatcher::exact_name("X"),
        ClassMatcher::exact_name("Y"),
    ]);
    // Bypass the constructor to get the unmerged form.
    let unmerged = ClassMatcher::Or(vec![
        ClassMatcher::child_of("Base", false),
        ClassMatcher::exact_name("X"),
        ClassMatcher::exact_name("Y"),
    ]);

    for descriptor in [
        TypeDescriptor::class("X"),
        TypeDescriptor::class("Y"),
        TypeDescriptor::class("Leaf").extends("Mid"),
        TypeDescriptor::class("Unrelated"),
        TypeDescriptor::interface("I"),
    ] {
        assert_eq!(
            matches(&merged, &descriptor, &resolver),
            matches(&unmerged, &descriptor, &resolver),
            "merge changed the verdict for {}",
            descriptor.name
        );
    }
}

#[test]
fn child_of_excludes_self_unless_included() {
    let resolver = hierarchy();
    let base = TypeDescriptor::class("Base");

    assert!(!matches(
        &ClassMatcher::child_of("Base", false),
        &base,
        &resolver
    ));
    assert!(matches(
        &ClassMatcher::child_of("Base", true),
        &base,
        &resolver
    ));
}

#[test]
fn child_of_walks_transitively() {
    let resolver = hierarchy();
    let matcher = ClassMatcher::child_of("Base", false);

    assert!(matches(
        &matcher,
        &TypeDescriptor::class("Mid").extends("Base"),
        &resolver
    ));
    assert!(matches(
        &matcher,
        &TypeDescriptor::class("Leaf").extends("Mid"),
        &resolver
    ));
    assert!(!matches(&matcher, &TypeDescriptor::class("Other"), &resolver));
}

#[test]
fn child_of_unresolvable_chain_is_non_match() {
    // "Mid" is missing, so the Leaf -> Mid -> Base chain cannot be proven.
    let resolver = MapResolver::new().with(TypeDescriptor::class("Base"));
    let matcher = ClassMatcher::child_of("Base", false);

    assert!(!matches(
        &matcher,
        &TypeDescriptor::class("Leaf").extends("Mid"),
        &resolver
    ));
}

#[test]
fn implements_via_intermediate_interface() {
    let resolver = hierarchy();
    let matcher = ClassMatcher::implements_interface("I");

    // WithJ declares J; J extends I.
    assert!(matches(
        &matcher,
        &TypeDescriptor::class("WithJ").implements("J"),
        &resolver
    ));
}

#[test]
fn implements_via_ancestor_class() {
    let resolver = hierarchy();
    let matcher = ClassMatcher::implements_interface("I");

    // SubOfWithJ declares nothing itself; its ancestor WithJ declares J.
    assert!(matches(
        &matcher,
        &TypeDescriptor::class("SubOfWithJ").extends("WithJ"),
        &resolver
    ));
}

#[test]
fn implements_never_matches_the_interface_itself() {
    let resolver = hierarchy();
    let matcher = ClassMatcher::implements_interface("I");

    assert!(!matches(&matcher, &TypeDescriptor::interface("I"), &resolver));
    assert!(!matches(
        &matcher,
        &TypeDescriptor::interface("J").implements("I"),
        &resolver
    ));
}

#[test]
fn implements_unresolvable_branch_degrades_only_that_branch() {
    // "Gone" cannot be resolved, but the sibling declared interface J still
    // proves the match.
    let resolver = hierarchy();
    let matcher = ClassMatcher::implements_interface("I");

    let descriptor = TypeDescriptor::class("Multi")
        .implements("Gone")
        .implements("J");
    assert!(matches(&matcher, &descriptor, &resolver));
}

#[test]
fn resolved_view_agrees_with_descriptor() {
    let resolver = hierarchy();
    let loader = loader();

    let cases: Vec<(ClassMatcher, TypeDescriptor, ResolvedTypeView)> = vec![
        (
            ClassMatcher::exact_name("Leaf"),
            TypeDescriptor::class("Leaf").extends("Mid"),
            ResolvedTypeView::class("Leaf")
                .with_ancestor("Mid")
                .with_ancestor("Base"),
        ),
        (
            ClassMatcher::child_of("Base", false),
            TypeDescriptor::class("Leaf").extends("Mid"),
            ResolvedTypeView::class("Leaf")
                .with_ancestor("Mid")
                .with_ancestor("Base"),
        ),
        (
            ClassMatcher::child_of("Base", false),
            TypeDescriptor::class("Other"),
            ResolvedTypeView::class("Other"),
        ),
        (
            ClassMatcher::implements_interface("I"),
            TypeDescriptor::class("SubOfWithJ").extends("WithJ"),
            ResolvedTypeView::class("SubOfWithJ")
                .with_ancestor("WithJ")
                .with_interface("J")
                .with_interface("I"),
        ),
        (
            ClassMatcher::not(ClassMatcher::child_of("Base", true)),
            TypeDescriptor::class("Other"),
            ResolvedTypeView::class("Other"),
        ),
    ];

    for (matcher, descriptor, view) in &cases {
        assert_eq!(
            matcher.matches_descriptor(descriptor, &resolver, &loader),
            matcher.matches_resolved(view),
            "descriptor and resolved-view verdicts diverged for {:?} on {}",
            matcher,
            descriptor.name
        );
    }
}

#[test]
fn exact_names_probe() {
    assert!(ClassMatcher::exact_name("X").exact_names().is_some());
    assert_eq!(
        ClassMatcher::or(vec![
            ClassMatcher::exact_name("X"),
            ClassMatcher::exact_name("Y"),
        ])
        .exact_names()
        .map(|s| s.len()),
        Some(2)
    );

    assert!(ClassMatcher::child_of("Base", false).exact_names().is_none());
    assert!(ClassMatcher::AllConcreteTypes.exact_names().is_none());
    assert!(ClassMatcher::Or(vec![
        ClassMatcher::exact_name("X"),
        ClassMatcher::child_of("Base", false),
    ])
    .exact_names()
    .is_none());
}

#[test]
fn method_matcher_variants() {
    use crate::types::{MethodAccess, MethodSignature};
    use rustc_hash::FxHashSet;

    let no_annotations: FxHashSet<String> = FxHashSet::default();
    let access = MethodAccess::new(MethodAccess::PUBLIC);

    let exact =
        MethodMatcher::exact_signatures([MethodSignature::new("run", "()V")]);
    assert!(exact.matches(&MethodSignature::new("run", "()V"), access, &no_annotations));
    assert!(!exact.matches(&MethodSignature::new("run", "(I)V"), access, &no_annotations));
    assert!(exact.exact_signature_set().is_some());

    assert!(MethodMatcher::AllMethods.matches(
        &MethodSignature::new("anything", "()V"),
        access,
        &no_annotations
    ));

    let annotated = MethodMatcher::annotation_present("Lcom/example/Traced;");
    assert_eq!(
        annotated.annotation_of_interest(),
        Some("Lcom/example/Traced;")
    );
    let mut observed = FxHashSet::default();
    observed.insert("Lcom/example/Traced;".to_string());
    assert!(annotated.matches(&MethodSignature::new("m", "()V"), access, &observed));
    assert!(!annotated.matches(&MethodSignature::new("m", "()V"), access, &no_annotations));

    let setters = MethodMatcher::generic("public-setters", |sig, access, _| {
        sig.name.starts_with("set") && access.is_public()
    });
    assert!(setters.matches(&MethodSignature::new("setName", "(Ljava/lang/String;)V"), access, &no_annotations));
    assert!(!setters.matches(&MethodSignature::new("getName", "()Ljava/lang/String;"), access, &no_annotations));
    assert!(!setters.matches(
        &MethodSignature::new("setName", "(Ljava/lang/String;)V"),
        MethodAccess::new(MethodAccess::PRIVATE),
        &no_annotations
    ));
    assert!(setters.exact_signature_set().is_none());
}
