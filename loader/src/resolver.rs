//! Artefact resolution.
//!
//! The [`ArtifactResolver`] trait is the seam to whatever turns coordinates
//! into a local file. [`LocalRepositoryResolver`] looks artefacts up in a
//! Maven-layout local repository such as `~/.m2/repository`.

use crate::artifact::{ArtifactOrigin, ResolvedArtifact};
use crate::coordinates::Coordinates;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors arising while resolving coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// No file exists at the expected repository location.
    #[error("can't resolve {coordinates}: {path} does not exist")]
    NotFound {
        /// The requested coordinates.
        coordinates: Coordinates,
        /// Where the artefact was expected.
        path: Utf8PathBuf,
    },

    /// The resolver could not perform the lookup at all.
    #[error("error resolving {coordinates}: {reason}")]
    Unavailable {
        /// The requested coordinates.
        coordinates: Coordinates,
        /// Why the lookup failed.
        reason: String,
    },
}

/// Resolves coordinates to a local artefact.
///
/// # Examples
///
/// ```
/// use sqlj_loader::coordinates::Coordinates;
/// use sqlj_loader::resolver::{ArtifactResolver, LocalRepositoryResolver};
///
/// let resolver = LocalRepositoryResolver::new("/nonexistent/repository");
/// let result = resolver.resolve(&Coordinates::new("org.x", "core-lib", "2.3.1"));
/// assert!(result.is_err());
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactResolver {
    /// Resolve `coordinates` to a local file or directory.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the artefact cannot be found.
    fn resolve(&self, coordinates: &Coordinates) -> Result<ResolvedArtifact, ResolutionError>;
}

/// Resolver backed by a Maven-layout local repository.
#[derive(Debug, Clone)]
pub struct LocalRepositoryResolver {
    root: Utf8PathBuf,
}

impl LocalRepositoryResolver {
    /// Create a resolver for the repository rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Location of `coordinates` inside the repository.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlj_loader::coordinates::Coordinates;
    /// use sqlj_loader::resolver::LocalRepositoryResolver;
    ///
    /// let resolver = LocalRepositoryResolver::new("/repo");
    /// let path = resolver.artifact_path(&Coordinates::new("org.x", "core-lib", "2.3.1"));
    /// assert_eq!(path.as_str(), "/repo/org/x/core-lib/2.3.1/core-lib-2.3.1.jar");
    /// ```
    #[must_use]
    pub fn artifact_path(&self, coordinates: &Coordinates) -> Utf8PathBuf {
        let mut path = self.root.clone();
        for segment in coordinates.group_id().split('.') {
            path.push(segment);
        }
        path.push(coordinates.artifact_id());
        path.push(coordinates.version());

        let classifier = coordinates
            .classifier()
            .map(|classifier| format!("-{classifier}"))
            .unwrap_or_default();
        path.push(format!(
            "{}-{}{classifier}.{}",
            coordinates.artifact_id(),
            coordinates.version(),
            coordinates.extension()
        ));
        path
    }
}

impl ArtifactResolver for LocalRepositoryResolver {
    fn resolve(&self, coordinates: &Coordinates) -> Result<ResolvedArtifact, ResolutionError> {
        let path = self.artifact_path(coordinates);
        match path.try_exists() {
            Ok(true) => Ok(ResolvedArtifact::new(
                coordinates.clone(),
                path,
                ArtifactOrigin::LocalRepository {
                    root: self.root.clone(),
                },
            )),
            Ok(false) => Err(ResolutionError::NotFound {
                coordinates: coordinates.clone(),
                path,
            }),
            Err(err) => Err(ResolutionError::Unavailable {
                coordinates: coordinates.clone(),
                reason: format!("cannot inspect {path}: {err}"),
            }),
        }
    }
}

/// Default local repository: `~/.m2/repository`.
///
/// Returns `None` when no home directory can be determined or its path is
/// not valid UTF-8.
#[must_use]
pub fn default_repository_root() -> Option<Utf8PathBuf> {
    directories_next::BaseDirs::new()
        .and_then(|dirs| Utf8PathBuf::try_from(dirs.home_dir().to_path_buf()).ok())
        .map(|home| home.join(".m2").join("repository"))
}
