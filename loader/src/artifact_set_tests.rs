//! Unit tests for artefact set assembly.

use super::*;
use crate::artifact::ArtifactOrigin;
use crate::resolver::MockArtifactResolver;
use camino::Utf8PathBuf;
use rstest::rstest;

fn coords(id: &str) -> Coordinates {
    Coordinates::new("org.x", id, "1.0")
}

fn declared(id: &str) -> ResolvedArtifact {
    ResolvedArtifact::new(coords(id), format!("/deps/{id}.jar"), ArtifactOrigin::Declared)
}

fn project() -> ResolvedArtifact {
    ResolvedArtifact::new(coords("app"), "/work/target/classes", ArtifactOrigin::Project)
}

fn ids(set: &ArtifactSet) -> Vec<&str> {
    set.iter()
        .map(|artifact| artifact.coordinates().artifact_id())
        .collect()
}

/// A resolver that finds everything except the artifact ids in `missing`.
fn resolver_missing(missing: &'static [&'static str]) -> MockArtifactResolver {
    let mut resolver = MockArtifactResolver::new();
    resolver.expect_resolve().returning(move |requested| {
        if missing.contains(&requested.artifact_id()) {
            return Err(ResolutionError::NotFound {
                coordinates: requested.clone(),
                path: Utf8PathBuf::from("/repo/missing.jar"),
            });
        }
        Ok(ResolvedArtifact::new(
            requested.clone(),
            format!("/repo/{}.jar", requested.artifact_id()),
            ArtifactOrigin::LocalRepository {
                root: Utf8PathBuf::from("/repo"),
            },
        ))
    });
    resolver
}

#[test]
fn base_set_is_runtime_then_project() {
    let resolver = MockArtifactResolver::new();
    let set =
        ArtifactSetBuilder::new(&resolver, vec![declared("a"), declared("b")], project()).build();

    assert_eq!(ids(&set), vec!["a", "b", "app"]);
}

#[test]
fn duplicate_inserts_keep_first_position() {
    let mut set: ArtifactSet = vec![declared("a"), declared("b")].into_iter().collect();

    assert!(!set.insert(declared("a")));
    assert_eq!(ids(&set), vec!["a", "b"]);
}

#[test]
fn exclusion_removes_resolved_artifact() {
    let resolver = resolver_missing(&[]);
    let set = build_artifact_set(
        &resolver,
        vec![declared("a"), declared("b")],
        project(),
        &[coords("a")],
        &[],
    );

    assert_eq!(ids(&set), vec!["b", "app"]);
}

#[test]
fn unresolvable_exclusion_leaves_set_unchanged() {
    let resolver = resolver_missing(&["a"]);
    let mut builder = ArtifactSetBuilder::new(&resolver, vec![declared("a")], project());
    builder.exclude(&[coords("a")]);

    assert_eq!(builder.skipped().len(), 1);
    assert_eq!(
        builder.skipped().first().map(|entry| entry.operation),
        Some(SetOperation::Exclude)
    );
    assert_eq!(ids(&builder.build()), vec!["a", "app"]);
}

#[test]
fn additions_are_appended_in_order() {
    let resolver = resolver_missing(&[]);
    let set = build_artifact_set(
        &resolver,
        vec![declared("a")],
        project(),
        &[],
        &[coords("x"), coords("y")],
    );

    assert_eq!(ids(&set), vec!["a", "app", "x", "y"]);
}

#[test]
fn unresolvable_addition_inserts_nothing() {
    let resolver = resolver_missing(&["ghost"]);
    let mut builder = ArtifactSetBuilder::new(&resolver, Vec::new(), project());
    builder.include(&[coords("ghost"), coords("real")]);

    let skipped: Vec<SetOperation> = builder.skipped().iter().map(|e| e.operation).collect();
    assert_eq!(skipped, vec![SetOperation::Include]);
    assert_eq!(ids(&builder.build()), vec!["app", "real"]);
}

#[rstest]
#[case::excluded_then_re_added(&["a"], &["a"], vec!["b", "app", "a"])]
#[case::exclusion_of_absent_artifact(&["zzz"], &[], vec!["a", "b", "app"])]
#[case::project_can_be_excluded(&["app"], &[], vec!["a", "b"])]
fn exclusions_are_applied_before_additions(
    #[case] excluded: &[&str],
    #[case] additional: &[&str],
    #[case] expected: Vec<&str>,
) {
    let resolver = resolver_missing(&[]);
    let excluded: Vec<Coordinates> = excluded.iter().map(|id| coords(id)).collect();
    let additional: Vec<Coordinates> = additional.iter().map(|id| coords(id)).collect();

    let set = build_artifact_set(
        &resolver,
        vec![declared("a"), declared("b")],
        project(),
        &excluded,
        &additional,
    );

    assert_eq!(ids(&set), expected);
}

#[test]
fn exclusion_matches_on_coordinates_not_path() {
    let resolver = resolver_missing(&[]);
    let set = build_artifact_set(&resolver, vec![declared("a")], project(), &[coords("a")], &[]);

    assert!(!set.contains(&coords("a")));
}
