//! Assembly of the ordered set of artefacts to install.
//!
//! The base set is the build's runtime dependencies followed by the project's
//! own artefact. Configured exclusions are applied next, then additions.
//! Resolution failures are logged and recorded but never abort the run.

use crate::artifact::ResolvedArtifact;
use crate::coordinates::Coordinates;
use crate::resolver::{ArtifactResolver, ResolutionError};
use log::{debug, warn};

/// Insertion-ordered collection of artefacts without duplicates.
///
/// Identity is by coordinates; inserting an artefact that is already present
/// keeps the original entry and its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    artifacts: Vec<ResolvedArtifact>,
}

impl ArtifactSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `artifact` unless an artefact with the same coordinates is
    /// already present. Returns `true` when it was added.
    pub fn insert(&mut self, artifact: ResolvedArtifact) -> bool {
        if self.artifacts.contains(&artifact) {
            return false;
        }
        self.artifacts.push(artifact);
        true
    }

    /// Remove the artefact with `coordinates`. Returns `true` when one was removed.
    pub fn remove(&mut self, coordinates: &Coordinates) -> bool {
        let before = self.artifacts.len();
        self.artifacts
            .retain(|artifact| artifact.coordinates() != coordinates);
        self.artifacts.len() != before
    }

    /// Returns `true` when an artefact with `coordinates` is present.
    #[must_use]
    pub fn contains(&self, coordinates: &Coordinates) -> bool {
        self.artifacts
            .iter()
            .any(|artifact| artifact.coordinates() == coordinates)
    }

    /// Iterate over the artefacts in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedArtifact> {
        self.artifacts.iter()
    }

    /// The artefacts as an ordered slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ResolvedArtifact] {
        &self.artifacts
    }

    /// Number of artefacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns `true` when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl FromIterator<ResolvedArtifact> for ArtifactSet {
    fn from_iter<I: IntoIterator<Item = ResolvedArtifact>>(iter: I) -> Self {
        let mut set = Self::new();
        for artifact in iter {
            set.insert(artifact);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ArtifactSet {
    type Item = &'a ResolvedArtifact;
    type IntoIter = std::slice::Iter<'a, ResolvedArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Which configured list an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperation {
    /// The entry came from the exclusion list.
    Exclude,
    /// The entry came from the additional list.
    Include,
}

/// A resolution failure absorbed while building the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Which list the entry belonged to.
    pub operation: SetOperation,
    /// The resolution error.
    pub error: ResolutionError,
}

/// Builds the final [`ArtifactSet`] from the base set and the configured
/// exclusion and addition lists.
///
/// # Examples
///
/// ```
/// use sqlj_loader::artifact::{ArtifactOrigin, ResolvedArtifact};
/// use sqlj_loader::artifact_set::ArtifactSetBuilder;
/// use sqlj_loader::coordinates::Coordinates;
/// use sqlj_loader::resolver::LocalRepositoryResolver;
///
/// let resolver = LocalRepositoryResolver::new("/nonexistent");
/// let project = ResolvedArtifact::new(
///     Coordinates::new("org.x", "app", "1.0"),
///     "target/classes",
///     ArtifactOrigin::Project,
/// );
/// let mut builder = ArtifactSetBuilder::new(&resolver, Vec::new(), project);
/// builder.include(&[Coordinates::new("org.x", "missing", "1.0")]);
/// let set = builder.build();
/// assert_eq!(set.len(), 1);
/// ```
pub struct ArtifactSetBuilder<'a> {
    resolver: &'a dyn ArtifactResolver,
    set: ArtifactSet,
    skipped: Vec<SkippedEntry>,
}

impl<'a> ArtifactSetBuilder<'a> {
    /// Start from the runtime dependency set followed by the project artefact.
    #[must_use]
    pub fn new(
        resolver: &'a dyn ArtifactResolver,
        runtime: impl IntoIterator<Item = ResolvedArtifact>,
        project: ResolvedArtifact,
    ) -> Self {
        let mut set: ArtifactSet = runtime.into_iter().collect();
        set.insert(project);
        Self {
            resolver,
            set,
            skipped: Vec::new(),
        }
    }

    /// Remove every artefact the excluded coordinates resolve to.
    ///
    /// An exclusion that fails to resolve is logged and has no effect.
    pub fn exclude(&mut self, excluded: &[Coordinates]) -> &mut Self {
        for coordinates in excluded {
            match self.resolver.resolve(coordinates) {
                Ok(artifact) => {
                    if self.set.remove(artifact.coordinates()) {
                        debug!("excluded {artifact}");
                    } else {
                        debug!("exclusion {artifact} matched nothing");
                    }
                }
                Err(error) => self.skip(SetOperation::Exclude, error),
            }
        }
        self
    }

    /// Append every artefact the additional coordinates resolve to.
    ///
    /// An addition that fails to resolve is logged and nothing is inserted.
    pub fn include(&mut self, additional: &[Coordinates]) -> &mut Self {
        for coordinates in additional {
            match self.resolver.resolve(coordinates) {
                Ok(artifact) => {
                    debug!("adding {artifact} from {}", artifact.path());
                    self.set.insert(artifact);
                }
                Err(error) => self.skip(SetOperation::Include, error),
            }
        }
        self
    }

    /// Resolution failures absorbed so far.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Finish and return the set.
    #[must_use]
    pub fn build(self) -> ArtifactSet {
        self.set
    }

    fn skip(&mut self, operation: SetOperation, error: ResolutionError) {
        match operation {
            SetOperation::Exclude => warn!("ignoring exclusion: {error}"),
            SetOperation::Include => warn!("skipping additional artifact: {error}"),
        }
        self.skipped.push(SkippedEntry { operation, error });
    }
}

/// Apply exclusions, then additions, and return the final set.
#[must_use]
pub fn build_artifact_set(
    resolver: &dyn ArtifactResolver,
    runtime: Vec<ResolvedArtifact>,
    project: ResolvedArtifact,
    excluded: &[Coordinates],
    additional: &[Coordinates],
) -> ArtifactSet {
    let mut builder = ArtifactSetBuilder::new(resolver, runtime, project);
    builder.exclude(excluded).include(additional);
    builder.build()
}

#[cfg(test)]
#[path = "artifact_set_tests.rs"]
mod tests;
