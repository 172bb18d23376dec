//! Artefacts that have been resolved to a local file or directory.

use crate::coordinates::Coordinates;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Where a resolved artefact came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOrigin {
    /// The project's own build output.
    Project,
    /// A path supplied explicitly in configuration.
    Declared,
    /// Looked up in a Maven-layout local repository.
    LocalRepository {
        /// Root of the repository the file was found in.
        root: Utf8PathBuf,
    },
}

impl fmt::Display for ArtifactOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => f.write_str("project"),
            Self::Declared => f.write_str("declared"),
            Self::LocalRepository { root } => write!(f, "repository {root}"),
        }
    }
}

/// Coordinates bound to a local path (a single file or a directory tree).
///
/// Two resolved artefacts are equal when their coordinates are equal; the
/// path and origin do not take part in identity.
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    coordinates: Coordinates,
    path: Utf8PathBuf,
    origin: ArtifactOrigin,
}

impl ResolvedArtifact {
    /// Bind `coordinates` to `path`.
    #[must_use]
    pub fn new(
        coordinates: Coordinates,
        path: impl Into<Utf8PathBuf>,
        origin: ArtifactOrigin,
    ) -> Self {
        Self {
            coordinates,
            path: path.into(),
            origin,
        }
    }

    /// The artefact's coordinates.
    #[must_use]
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Local file or directory holding the artefact's content.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// How the artefact was resolved.
    #[must_use]
    pub fn origin(&self) -> &ArtifactOrigin {
        &self.origin
    }
}

impl PartialEq for ResolvedArtifact {
    fn eq(&self, other: &Self) -> bool {
        self.coordinates == other.coordinates
    }
}

impl Eq for ResolvedArtifact {}

impl Hash for ResolvedArtifact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coordinates.hash(state);
    }
}

impl fmt::Display for ResolvedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinates)
    }
}
