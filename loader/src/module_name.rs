//! Module names derived from artefact coordinates.
//!
//! This module provides the [`ModuleName`] newtype used as the key for every
//! remove and install call against the store.

use crate::artifact::ResolvedArtifact;
use std::fmt;

/// Name under which an artefact is installed in the store.
///
/// Built from the artifact id and version only: every `-` and `.` becomes
/// `_` and the two halves are joined with `_`. Artefacts that differ only by
/// group id, or whose ids collapse to the same sanitised text, share a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Derive the module name for a resolved artefact.
    #[must_use]
    pub fn for_artifact(artifact: &ResolvedArtifact) -> Self {
        let coordinates = artifact.coordinates();
        Self::from_parts(coordinates.artifact_id(), coordinates.version())
    }

    /// Derive a module name from an artifact id and version.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlj_loader::module_name::ModuleName;
    ///
    /// let name = ModuleName::from_parts("core-lib", "2.3.1");
    /// assert_eq!(name.as_str(), "core_lib_2_3_1");
    /// ```
    #[must_use]
    pub fn from_parts(artifact_id: &str, version: &str) -> Self {
        Self(format!("{}_{}", sanitize(artifact_id), sanitize(version)))
    }

    /// Get the module name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Replace every `-` and `.` with `_`.
#[must_use]
pub fn sanitize(value: &str) -> String {
    value.replace(['-', '.'], "_")
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
