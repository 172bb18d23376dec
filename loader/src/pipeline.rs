//! Run orchestration.
//!
//! A run plans the artefact set from the configuration, installs it over a
//! single store session, and publishes the resulting classpath. The binary
//! only adds argument parsing, session setup and reporting around these
//! steps.

use crate::artifact_set::{ArtifactSet, ArtifactSetBuilder, SkippedEntry};
use crate::classpath::Classpath;
use crate::config::LoaderConfig;
use crate::error::Result;
use crate::installer::{InstallRecord, ModuleInstaller};
use crate::resolver::ArtifactResolver;
use crate::store::ModuleStore;
use log::debug;
use std::io::Write;

/// The artefacts a run will install, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Artefacts to install.
    pub artifacts: ArtifactSet,
    /// Exclusions and additions that could not be resolved.
    pub skipped: Vec<SkippedEntry>,
}

/// What a completed install produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Installed module names in order.
    pub classpath: Classpath,
    /// One record per installed module.
    pub records: Vec<InstallRecord>,
}

/// Build the install plan: runtime dependencies and the project, then
/// exclusions, then additions.
#[must_use]
pub fn plan(config: &LoaderConfig, resolver: &dyn ArtifactResolver) -> Plan {
    let runtime = config.runtime_artifacts(resolver);
    let mut builder = ArtifactSetBuilder::new(resolver, runtime, config.project_artifact());
    builder.exclude(&config.excluded).include(&config.additional);
    let skipped = builder.skipped().to_vec();
    Plan {
        artifacts: builder.build(),
        skipped,
    }
}

/// Install every planned artefact over `store`.
///
/// # Errors
///
/// Returns the first fatal error; artefacts after it are not touched.
pub fn install_plan(plan: &Plan, store: &mut dyn ModuleStore) -> Result<InstallOutcome> {
    let mut installer = ModuleInstaller::new(store);
    installer.install_all(&plan.artifacts)?;
    let records = installer.records().to_vec();
    Ok(InstallOutcome {
        classpath: installer.into_classpath(),
        records,
    })
}

/// Publish `classpath` as configured. Returns `false` when no key is set.
///
/// # Errors
///
/// Returns an error if the destination cannot be written.
pub fn publish(
    config: &LoaderConfig,
    classpath: &Classpath,
    stdout: &mut dyn Write,
) -> Result<bool> {
    let Some(publication) = config.publication() else {
        debug!("no classpath property configured; classpath not published");
        return Ok(false);
    };
    publication.publish(classpath, stdout)?;
    Ok(true)
}
