//! Unit tests for module installation.

use super::*;
use crate::artifact::ArtifactOrigin;
use crate::coordinates::Coordinates;
use crate::store::MockModuleStore;
use crate::store::memory::{MemoryStore, StoreCall};
use camino::Utf8Path;
use mockall::Sequence;
use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn root(&self) -> &Utf8Path {
        Utf8Path::from_path(self.dir.path()).expect("temp dir is UTF-8")
    }

    fn jar(&self, id: &str, version: &str, content: &[u8]) -> ResolvedArtifact {
        let path = self.root().join(format!("{id}-{version}.jar"));
        fs::write(&path, content).expect("write jar");
        ResolvedArtifact::new(
            Coordinates::new("org.x", id, version),
            path,
            ArtifactOrigin::Declared,
        )
    }

    fn missing(&self, id: &str, version: &str) -> ResolvedArtifact {
        ResolvedArtifact::new(
            Coordinates::new("org.x", id, version),
            self.root().join("absent.jar"),
            ArtifactOrigin::Declared,
        )
    }

    fn classes(&self, id: &str, version: &str) -> ResolvedArtifact {
        let path = self.root().join("classes");
        fs::create_dir_all(path.join("pkg")).expect("create classes");
        fs::write(path.join("pkg").join("Main.class"), b"\xca\xfe\xba\xbe").expect("write class");
        ResolvedArtifact::new(
            Coordinates::new("org.x", id, version),
            path,
            ArtifactOrigin::Project,
        )
    }
}

#[fixture]
fn workspace() -> Workspace {
    Workspace {
        dir: TempDir::new().expect("temp dir"),
    }
}

fn names(classpath: &Classpath) -> Vec<&str> {
    classpath.names().iter().map(ModuleName::as_str).collect()
}

#[rstest]
fn install_removes_then_installs_with_replace(workspace: Workspace) {
    let artifact = workspace.jar("core-lib", "2.3.1", b"jar bytes");
    let mut store = MockModuleStore::new();
    let mut seq = Sequence::new();
    store
        .expect_remove()
        .with(eq(ModuleName::from("core_lib_2_3_1")), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    store
        .expect_install()
        .with(always(), eq(ModuleName::from("core_lib_2_3_1")), eq(true))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|payload, _, _| Ok(payload == b"jar bytes"));

    let mut installer = ModuleInstaller::new(&mut store);
    let record = installer.install(&artifact).expect("install succeeds");

    assert_eq!(record.name.as_str(), "core_lib_2_3_1");
    assert_eq!(record.bytes, 9);
    assert_eq!(record.sha256.len(), 64);
    assert_eq!(names(installer.classpath()), vec!["core_lib_2_3_1"]);
}

#[rstest]
fn rejected_remove_is_ignored(workspace: Workspace) {
    let artifact = workspace.jar("widget", "1.0", b"w");
    let mut store = MemoryStore::new();

    let mut installer = ModuleInstaller::new(&mut store);
    installer.install(&artifact).expect("install succeeds");
    let classpath = installer.into_classpath();

    assert_eq!(classpath.to_string(), "widget_1_0");
    assert_eq!(store.module("widget_1_0"), Some(&b"w"[..]));
}

#[rstest]
fn broken_remove_aborts_before_install(workspace: Workspace) {
    let artifact = workspace.jar("widget", "1.0", b"w");
    let mut store = MemoryStore::new().with_broken_remove("widget_1_0");

    let mut installer = ModuleInstaller::new(&mut store);
    let err = installer.install(&artifact).expect_err("install should fail");

    assert!(matches!(err, LoaderError::Store { operation: "remove", .. }));
    assert!(installer.classpath().is_empty());
    assert_eq!(store.calls().len(), 1);
}

#[rstest]
fn install_reporting_false_is_fatal(workspace: Workspace) {
    let artifact = workspace.jar("widget", "1.0", b"w");
    let mut store = MemoryStore::new().with_failing_install("widget_1_0");

    let mut installer = ModuleInstaller::new(&mut store);
    let err = installer.install(&artifact).expect_err("install should fail");

    match err {
        LoaderError::InstallFailed { artifact: failed, name, .. } => {
            assert_eq!(failed.artifact_id(), "widget");
            assert_eq!(name.as_str(), "widget_1_0");
        }
        other => panic!("expected InstallFailed, got {other:?}"),
    }
    assert!(installer.classpath().is_empty());
}

#[rstest]
fn unreadable_content_is_fatal_after_remove(workspace: Workspace) {
    let artifact = workspace.missing("ghost", "0.1");
    let mut store = MemoryStore::new();

    let mut installer = ModuleInstaller::new(&mut store);
    let err = installer.install(&artifact).expect_err("install should fail");

    assert!(matches!(err, LoaderError::ReadFailed { .. }));
    assert_eq!(
        store.calls(),
        &[StoreCall::Remove {
            name: ModuleName::from("ghost_0_1"),
            cascade: false,
        }]
    );
}

#[rstest]
fn directories_are_installed_as_archives(workspace: Workspace) {
    let artifact = workspace.classes("app", "1.0");
    let mut store = MemoryStore::new();

    let mut installer = ModuleInstaller::new(&mut store);
    installer.install(&artifact).expect("install succeeds");

    let payload = store.module("app_1_0").expect("module installed");
    assert!(payload.starts_with(b"PK"));
}

#[rstest]
fn install_all_keeps_order_and_stops_at_first_failure(workspace: Workspace) {
    let artifacts = vec![
        workspace.jar("a", "1.0", b"a"),
        workspace.jar("b", "1.0", b"b"),
        workspace.jar("c", "1.0", b"c"),
    ];
    let mut store = MemoryStore::new().with_failing_install("b_1_0");

    let mut installer = ModuleInstaller::new(&mut store);
    let result = installer.install_all(&artifacts);

    assert!(matches!(result, Err(LoaderError::InstallFailed { .. })));
    assert_eq!(names(installer.classpath()), vec!["a_1_0"]);
    assert!(store.calls().iter().all(|call| call.name().as_str() != "c_1_0"));
}

#[rstest]
fn install_all_stops_at_unreadable_content(workspace: Workspace) {
    let artifacts = vec![
        workspace.jar("a", "1.0", b"a"),
        workspace.missing("b", "1.0"),
        workspace.jar("c", "1.0", b"c"),
    ];
    let mut store = MemoryStore::new();

    let mut installer = ModuleInstaller::new(&mut store);
    let result = installer.install_all(&artifacts);

    match result {
        Err(LoaderError::ReadFailed { name, .. }) => assert_eq!(name.as_str(), "b_1_0"),
        other => panic!("expected ReadFailed, got {other:?}"),
    }
    assert_eq!(installer.classpath().to_string(), "a_1_0");
    assert!(store.calls().iter().all(|call| call.name().as_str() != "c_1_0"));
    assert_eq!(store.module_names(), vec!["a_1_0"]);
}

#[rstest]
fn reinstall_replaces_existing_module(workspace: Workspace) {
    let artifact = workspace.jar("widget", "1.0", b"v2");
    let mut store = MemoryStore::new().with_module("widget_1_0", b"v1");

    let mut installer = ModuleInstaller::new(&mut store);
    installer.install(&artifact).expect("install succeeds");
    installer.install(&artifact).expect("second install succeeds");

    assert_eq!(names(installer.classpath()), vec!["widget_1_0", "widget_1_0"]);
    assert_eq!(store.module_names(), vec!["widget_1_0"]);
    assert_eq!(store.module("widget_1_0"), Some(&b"v2"[..]));
}
