//! Tests for the loader CLI entrypoint.

use super::*;
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use sqlj_loader::store::StoreError;
use std::fs;
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn write_config(&self, contents: &str) -> Utf8PathBuf {
        let path = self.root.join("sqlj-loader.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    fn cli(&self, config: &Utf8PathBuf, extra: &[&str]) -> Cli {
        let mut args = vec!["sqlj-loader", "--config", config.as_str()];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp dir");
    fs::create_dir_all(root.join("classes")).expect("create classes");
    fs::create_dir_all(root.join("repo")).expect("create repo");
    Workspace { _dir: dir, root }
}

const PROJECT_ONLY: &str = concat!(
    "classpath_property = \"pljava.classpath\"\n",
    "[repository]\nlocal = \"repo\"\n",
    "[project]\ngroup_id = \"org.x\"\nartifact_id = \"app\"\n",
    "version = \"1.0\"\npath = \"classes\"\n",
);

#[test]
fn exit_code_for_run_result_returns_zero_on_success() {
    let mut stderr = Vec::new();
    let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
    assert_eq!(exit_code, 0);
    assert!(stderr.is_empty());
}

#[test]
fn exit_code_for_run_result_prints_error_and_returns_one() {
    let err = LoaderError::Connect {
        source: StoreError::Connection {
            message: "connection refused".to_owned(),
        },
    };

    let mut stderr = Vec::new();
    let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
    assert_eq!(exit_code, 1);

    let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(stderr_text.starts_with("error: unable to open store session"));
}

#[rstest]
fn dry_run_prints_plan_without_database(workspace: Workspace) {
    let config = workspace.write_config(PROJECT_ONLY);
    let cli = workspace.cli(&config, &["--dry-run"]);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    run(&cli, &mut stdout, &mut stderr).expect("dry run succeeds");

    let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(stdout.is_empty());
    assert!(text.contains("Dry run"));
    assert!(text.contains("app_1_0"));
    assert!(text.contains("Database: (not configured)"));
    assert!(text.contains("Classpath published as pljava.classpath on stdout: app_1_0"));
}

#[rstest]
fn dry_run_redacts_password(workspace: Workspace) {
    let config = workspace.write_config(PROJECT_ONLY);
    let cli = workspace.cli(&config, &["--dry-run", "--url", "postgres://u:s3cret@db/app"]);
    let mut stderr = Vec::new();

    run(&cli, &mut Vec::new(), &mut stderr).expect("dry run succeeds");

    let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(!text.contains("s3cret"));
    assert!(text.contains("postgres://u:****@db/app"));
}

#[rstest]
fn missing_config_is_reported(workspace: Workspace) {
    let cli = workspace.cli(&workspace.root.join("absent.toml"), &[]);

    let err = run(&cli, &mut Vec::new(), &mut Vec::new()).expect_err("run should fail");

    assert!(matches!(err, LoaderError::ConfigNotFound { .. }));
}

#[rstest]
fn install_without_database_fails_before_connecting(workspace: Workspace) {
    let config = workspace.write_config(PROJECT_ONLY);
    let cli = workspace.cli(&config, &[]);
    let mut stdout = Vec::new();

    let err = run(&cli, &mut stdout, &mut Vec::new()).expect_err("run should fail");

    assert!(matches!(err, LoaderError::InvalidConfig { .. }));
    assert!(stdout.is_empty());
}
