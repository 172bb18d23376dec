//! Output formatting for the loader CLI.
//!
//! This module renders the dry-run plan and the post-install summary, both
//! written to stderr so that stdout carries only the published classpath.

use crate::artifact_set::{SetOperation, SkippedEntry};
use crate::classpath::{Classpath, ClasspathPublication, Destination};
use crate::installer::InstallRecord;
use crate::module_name::ModuleName;
use crate::pipeline::Plan;
use camino::Utf8Path;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Information shown by `--dry-run`.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use sqlj_loader::artifact::{ArtifactOrigin, ResolvedArtifact};
/// use sqlj_loader::artifact_set::ArtifactSet;
/// use sqlj_loader::coordinates::Coordinates;
/// use sqlj_loader::output::DryRunInfo;
/// use sqlj_loader::pipeline::Plan;
///
/// let project = ResolvedArtifact::new(
///     Coordinates::new("org.x", "app", "1.0"),
///     "/work/target/classes",
///     ArtifactOrigin::Project,
/// );
/// let plan = Plan {
///     artifacts: [project].into_iter().collect::<ArtifactSet>(),
///     skipped: Vec::new(),
/// };
/// let info = DryRunInfo {
///     config_path: Utf8Path::new("sqlj-loader.toml"),
///     repository: Utf8Path::new("/home/me/.m2/repository"),
///     database: None,
///     plan: &plan,
///     publication: None,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("app_1_0"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Configuration file in use.
    pub config_path: &'a Utf8Path,
    /// Local repository searched for undeclared artefacts.
    pub repository: &'a Utf8Path,
    /// Redacted database target, when configured.
    pub database: Option<&'a str>,
    /// The planned artefacts.
    pub plan: &'a Plan,
    /// Where the classpath would be published.
    pub publication: Option<&'a ClasspathPublication>,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut lines = vec![
            "Dry run - nothing will be installed".to_owned(),
            String::new(),
            format!("Configuration: {}", self.config_path),
            format!("Repository: {}", self.repository),
            format!("Database: {}", self.database.unwrap_or("(not configured)")),
            String::new(),
            format!("Artifacts to install ({}):", self.plan.artifacts.len()),
        ];

        for artifact in &self.plan.artifacts {
            lines.push(format!(
                "  - {} <- {} [{}] {}",
                ModuleName::for_artifact(artifact),
                artifact.coordinates(),
                artifact.origin(),
                artifact.path()
            ));
        }

        if !self.plan.skipped.is_empty() {
            lines.push(String::new());
            lines.push("Skipped entries:".to_owned());
            lines.extend(self.plan.skipped.iter().map(skipped_line));
        }

        let classpath: Classpath = self
            .plan
            .artifacts
            .iter()
            .map(ModuleName::for_artifact)
            .collect();
        lines.push(String::new());
        lines.push(publication_line(self.publication, &classpath));

        lines.join("\n")
    }
}

/// Summary printed after a successful install.
#[must_use]
pub fn install_summary(
    records: &[InstallRecord],
    target: &str,
    publication: Option<&ClasspathPublication>,
    classpath: &Classpath,
) -> String {
    let plural = if records.len() == 1 { "jar" } else { "jars" };
    let mut lines = vec![format!("Installed {} {plural} into {target}", records.len())];
    for record in records {
        lines.push(format!(
            "  - {} ({} bytes, sha256 {})",
            record.name,
            record.bytes,
            short_digest(&record.sha256)
        ));
    }
    lines.push(String::new());
    lines.push(publication_line(publication, classpath));
    lines.join("\n")
}

fn skipped_line(entry: &SkippedEntry) -> String {
    let list = match entry.operation {
        SetOperation::Exclude => "exclusion",
        SetOperation::Include => "addition",
    };
    format!("  - {list}: {}", entry.error)
}

fn publication_line(publication: Option<&ClasspathPublication>, classpath: &Classpath) -> String {
    match publication {
        None => format!("Classpath (not published): {classpath}"),
        Some(ClasspathPublication {
            key,
            destination: Destination::Stream,
        }) => format!("Classpath published as {key} on stdout: {classpath}"),
        Some(ClasspathPublication {
            key,
            destination: Destination::PropertiesFile(path),
        }) => format!("Classpath published as {key} in {path}: {classpath}"),
    }
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
