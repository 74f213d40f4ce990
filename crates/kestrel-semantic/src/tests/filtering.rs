use kestrel_diag::DiagnosticCollector;

use super::*;
use crate::descriptors::{DeclId, Descriptor, DescriptorKindFilter, Visibility};
use crate::import_resolver::ImportResolver;
use crate::import_scope::{FilteringKind, ImportScope};
use crate::scopes::ResolutionScope;

/// One resolver, one scope view per filtering kind.
fn with_views<R>(
    paths: &FixturePaths,
    directives: &[kestrel_ast::ImportDirective],
    run: impl FnOnce(&ImportScope<'_>, &ImportScope<'_>, &ImportScope<'_>) -> R,
) -> R {
    let sink = DiagnosticCollector::new();
    let resolver = ImportResolver::new(paths, HOME, directives, &sink, None);
    let all = ImportScope::new(None, &resolver, FilteringKind::All, "imports(all)");
    let visible = ImportScope::new(
        None,
        &resolver,
        FilteringKind::VisibleClassifiers,
        "imports(visible)",
    );
    let invisible = ImportScope::new(
        None,
        &resolver,
        FilteringKind::InvisibleClassifiers,
        "imports(invisible)",
    );
    run(&all, &visible, &invisible)
}

fn mixed_visibility_fixture() -> FixturePaths {
    FixturePaths::new()
        .with(
            "p",
            MemberScope::builder("p")
                .classifier(class_with("Pub", 1, Visibility::Public, OTHER))
                .classifier(class_with("Hidden", 2, Visibility::Internal, OTHER))
                .classifier(class_with("Own", 3, Visibility::Internal, HOME))
                .function(function("f", 4))
                .variable(variable("v", 5))
                .freeze(),
        )
}

#[test]
fn visible_view_admits_public_and_same_module_internal() {
    let paths = mixed_visibility_fixture();
    let directives = vec![all_under(0, "p")];
    with_views(&paths, &directives, |all, visible, invisible| {
        assert_eq!(all.classifier("Pub").map(|c| c.decl), Some(DeclId(1)));
        assert_eq!(visible.classifier("Pub").map(|c| c.decl), Some(DeclId(1)));
        assert_eq!(invisible.classifier("Pub"), None);

        // Internal to HOME: visible from the importing module.
        assert_eq!(visible.classifier("Own").map(|c| c.decl), Some(DeclId(3)));
        assert_eq!(invisible.classifier("Own"), None);
    });
}

#[test]
fn invisible_view_is_the_complement_for_classifiers() {
    let paths = mixed_visibility_fixture();
    let directives = vec![all_under(0, "p")];
    with_views(&paths, &directives, |all, visible, invisible| {
        assert_eq!(all.classifier("Hidden").map(|c| c.decl), Some(DeclId(2)));
        assert_eq!(visible.classifier("Hidden"), None);
        assert_eq!(invisible.classifier("Hidden").map(|c| c.decl), Some(DeclId(2)));
    });
}

#[test]
fn invisible_view_returns_nothing_for_callables_and_aggregates() {
    let paths = mixed_visibility_fixture();
    let directives = vec![all_under(0, "p")];
    with_views(&paths, &directives, |_all, _visible, invisible| {
        assert!(invisible.functions("f").is_empty());
        assert!(invisible.variables("v").is_empty());
        assert!(
            invisible
                .contributed_descriptors(DescriptorKindFilter::ALL, &|_| true)
                .is_empty()
        );
    });
}

#[test]
fn callables_ignore_class_visibility_filtering() {
    let paths = mixed_visibility_fixture();
    let directives = vec![all_under(0, "p")];
    with_views(&paths, &directives, |all, visible, _invisible| {
        assert_eq!(all.functions("f").len(), 1);
        assert_eq!(visible.functions("f").len(), 1);
        assert_eq!(visible.variables("v").len(), 1);
    });
}

#[test]
fn import_scopes_never_resolve_packages() {
    let paths = FixturePaths::new().with(
        "p",
        MemberScope::builder("p").package(package("nested", 7)).freeze(),
    );
    let directives = vec![all_under(0, "p")];
    with_views(&paths, &directives, |all, visible, invisible| {
        assert_eq!(all.package("nested"), None);
        assert_eq!(visible.package("nested"), None);
        assert_eq!(invisible.package("nested"), None);
    });
}

#[test]
fn contributed_skips_visibility_filtering() {
    // Both views' descriptors get merged by the caller, so the visible
    // view contributes invisible classifiers too.
    let paths = mixed_visibility_fixture();
    let directives = vec![all_under(0, "p")];
    with_views(&paths, &directives, |_all, visible, _invisible| {
        let contributed =
            visible.contributed_descriptors(DescriptorKindFilter::CLASSIFIERS, &|_| true);
        let names: Vec<&str> = contributed.iter().map(|d| d.name().as_str()).collect();
        assert!(names.contains(&"Hidden"));
    });
}

#[test]
fn contributed_honours_both_filters() {
    let paths = FixturePaths::new()
        .with(
            "p.C",
            MemberScope::builder("p.C").classifier(class("C", 1)).freeze(),
        )
        .with(
            "q",
            MemberScope::builder("q")
                .classifier(class("D", 2))
                .function(function("g", 3))
                .freeze(),
        );
    let directives = vec![explicit(0, "p.C"), all_under(1, "q")];
    with_views(&paths, &directives, |all, _visible, _invisible| {
        // Name filter rejecting "C" skips the explicit directive entirely;
        // the wildcard always participates.
        let contributed = all.contributed_descriptors(DescriptorKindFilter::ALL, &|n| n != "C");
        let names: Vec<&str> = contributed.iter().map(|d| d.name().as_str()).collect();
        assert_eq!(names, vec!["D", "g"]);

        // Kind filter applies inside the target scopes.
        let callables = all.contributed_descriptors(DescriptorKindFilter::CALLABLES, &|_| true);
        assert!(callables.iter().all(|d| matches!(d, Descriptor::Function(_) | Descriptor::Variable(_))));
        assert_eq!(callables.len(), 1);
    });
}

#[test]
fn contributed_deduplicates_across_directives() {
    let scope_p = MemberScope::builder("p").classifier(class("C", 1)).freeze();
    let paths = FixturePaths::new()
        .with("p", scope_p.clone())
        .with("p.C", scope_p);
    let directives = vec![explicit(0, "p.C"), all_under(1, "p")];
    with_views(&paths, &directives, |all, _visible, _invisible| {
        let contributed = all.contributed_descriptors(DescriptorKindFilter::ALL, &|_| true);
        assert_eq!(contributed.len(), 1);
    });
}

#[test]
fn debug_formatting_names_the_view() {
    let paths = FixturePaths::new();
    let sink = DiagnosticCollector::new();
    let directives: Vec<kestrel_ast::ImportDirective> = Vec::new();
    let resolver = ImportResolver::new(&paths, HOME, &directives, &sink, None);
    let scope = ImportScope::new(None, &resolver, FilteringKind::VisibleClassifiers, "file.ks");
    assert_eq!(
        format!("{scope:?}"),
        "ImportScope(file.ks, VisibleClassifiers)"
    );
}
