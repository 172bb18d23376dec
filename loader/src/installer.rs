//! Installation of resolved artefacts into a module store.
//!
//! Each artefact is installed under its [`ModuleName`] by removing any prior
//! module of that name and then installing the artefact's content with the
//! replace flag set. Successfully installed names accumulate into the
//! [`Classpath`] in processing order.

use crate::artifact::ResolvedArtifact;
use crate::classpath::Classpath;
use crate::content::load_payload;
use crate::error::{LoaderError, Result};
use crate::module_name::ModuleName;
use crate::store::{ModuleStore, StoreError};
use camino::Utf8PathBuf;
use log::{debug, info};

/// Outcome of a single successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
    /// Name the module was installed under.
    pub name: ModuleName,
    /// Local path the content came from.
    pub path: Utf8PathBuf,
    /// Size of the installed payload in bytes.
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the installed payload.
    pub sha256: String,
}

/// Installs artefacts one at a time over a borrowed store session.
pub struct ModuleInstaller<'a> {
    store: &'a mut dyn ModuleStore,
    classpath: Classpath,
    records: Vec<InstallRecord>,
}

impl<'a> ModuleInstaller<'a> {
    /// Create an installer with an empty classpath.
    pub fn new(store: &'a mut dyn ModuleStore) -> Self {
        Self {
            store,
            classpath: Classpath::new(),
            records: Vec::new(),
        }
    }

    /// Install one artefact and append its module name to the classpath.
    ///
    /// A rejected removal (typically because no module of that name exists
    /// yet) is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::ReadFailed`] if the content cannot be loaded,
    /// [`LoaderError::InstallFailed`] if the store reports failure, and
    /// [`LoaderError::Store`] if a store call fails outright. The classpath
    /// is left unchanged on error.
    pub fn install(&mut self, artifact: &ResolvedArtifact) -> Result<InstallRecord> {
        let name = ModuleName::for_artifact(artifact);
        let coordinates = artifact.coordinates();

        self.remove_existing(artifact, &name)?;

        let payload = load_payload(artifact.path()).map_err(|source| LoaderError::ReadFailed {
            artifact: coordinates.clone(),
            name: name.clone(),
            source,
        })?;

        let installed = self
            .store
            .install(&payload.bytes, &name, true)
            .map_err(|source| LoaderError::Store {
                operation: "install",
                artifact: coordinates.clone(),
                name: name.clone(),
                source,
            })?;
        if !installed {
            return Err(LoaderError::InstallFailed {
                artifact: coordinates.clone(),
                name,
                path: artifact.path().to_owned(),
            });
        }

        info!(
            "installed {coordinates} as {name} ({} bytes from {})",
            payload.len(),
            artifact.path()
        );
        let record = InstallRecord {
            name: name.clone(),
            path: artifact.path().to_owned(),
            bytes: payload.len(),
            sha256: payload.sha256(),
        };
        self.classpath.push(name);
        self.records.push(record.clone());
        Ok(record)
    }

    /// Install every artefact in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`ModuleInstaller::install`]. Names
    /// installed before the failure remain in the classpath.
    pub fn install_all<'b, I>(&mut self, artifacts: I) -> Result<()>
    where
        I: IntoIterator<Item = &'b ResolvedArtifact>,
    {
        for artifact in artifacts {
            self.install(artifact)?;
        }
        Ok(())
    }

    /// Module names installed so far.
    #[must_use]
    pub const fn classpath(&self) -> &Classpath {
        &self.classpath
    }

    /// Records of every install so far.
    #[must_use]
    pub fn records(&self) -> &[InstallRecord] {
        &self.records
    }

    /// Consume the installer, returning the classpath.
    #[must_use]
    pub fn into_classpath(self) -> Classpath {
        self.classpath
    }

    fn remove_existing(&mut self, artifact: &ResolvedArtifact, name: &ModuleName) -> Result<()> {
        info!("dropping module {name}");
        match self.store.remove(name, false) {
            Ok(()) => {
                debug!("removed previous module {name}");
                Ok(())
            }
            Err(err @ StoreError::Rejected { .. }) => {
                debug!("nothing removed for {name}: {err}");
                Ok(())
            }
            Err(source) => Err(LoaderError::Store {
                operation: "remove",
                artifact: artifact.coordinates().clone(),
                name: name.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[path = "installer_tests.rs"]
mod tests;
