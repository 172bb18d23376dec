//! Maven-style artefact coordinates.
//!
//! [`Coordinates`] identify a dependency request to the resolver. They are
//! read from configuration or parsed from the command line in the
//! `groupId:artifactId[:type[:classifier]]:version` form and never change
//! afterwards.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Packaging type assumed when none is given.
pub const DEFAULT_TYPE: &str = "jar";

/// Errors raised when a coordinate spec cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinates {spec:?}: {reason}")]
pub struct CoordinatesError {
    /// The text that failed to parse.
    pub spec: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Identifies one artefact: group, artifact id, version, optional
/// classifier and packaging type.
///
/// Equality and hashing cover the whole tuple, so two artefacts that only
/// differ by group id are distinct here even though they map to the same
/// module name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    group_id: String,
    artifact_id: String,
    version: String,
    classifier: Option<String>,
    kind: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCoordinates {
    group_id: String,
    artifact_id: String,
    version: String,
    #[serde(default)]
    classifier: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = CoordinatesError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        let mut coordinates = Self::new(raw.group_id, raw.artifact_id, raw.version);
        if let Some(kind) = raw.kind {
            coordinates = coordinates.with_type(kind);
        }
        if let Some(classifier) = raw.classifier {
            coordinates = coordinates.with_classifier(classifier);
        }
        coordinates.validate()
    }
}

impl Coordinates {
    /// Create coordinates with the default `jar` type and no classifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlj_loader::coordinates::Coordinates;
    ///
    /// let coords = Coordinates::new("org.x", "core-lib", "2.3.1");
    /// assert_eq!(coords.to_string(), "org.x:core-lib:2.3.1");
    /// assert_eq!(coords.kind(), "jar");
    /// ```
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: None,
            kind: DEFAULT_TYPE.to_owned(),
        }
    }

    /// Return a copy with the given classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        let classifier = classifier.into();
        self.classifier = (!classifier.is_empty()).then_some(classifier);
        self
    }

    /// Return a copy with the given packaging type.
    #[must_use]
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// The group id.
    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// The artifact id.
    #[must_use]
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// The version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The classifier, when one was given.
    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// The packaging type (`jar` unless overridden).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// File extension used for this packaging type in a repository layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlj_loader::coordinates::Coordinates;
    ///
    /// let coords = Coordinates::new("g", "a", "1").with_type("test-jar");
    /// assert_eq!(coords.extension(), "jar");
    /// ```
    #[must_use]
    pub fn extension(&self) -> &str {
        match self.kind.as_str() {
            "jar" | "test-jar" | "ejb" | "ejb-client" | "maven-plugin" | "bundle" => "jar",
            other => other,
        }
    }

    fn validate(self) -> Result<Self, CoordinatesError> {
        let fields = [
            ("group id", &self.group_id),
            ("artifact id", &self.artifact_id),
            ("version", &self.version),
            ("type", &self.kind),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(CoordinatesError {
                    spec: self.to_string(),
                    reason: format!("{label} must not be empty"),
                });
            }
        }
        Ok(self)
    }
}

impl FromStr for Coordinates {
    type Err = CoordinatesError;

    /// Parse `groupId:artifactId[:type[:classifier]]:version`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoordinatesError {
            spec: spec.to_owned(),
            reason: reason.to_owned(),
        };

        let parts: Vec<&str> = spec.split(':').collect();
        let coordinates = match parts.as_slice() {
            [group, artifact, version] => Self::new(*group, *artifact, *version),
            [group, artifact, kind, version] => {
                Self::new(*group, *artifact, *version).with_type(*kind)
            }
            [group, artifact, kind, classifier, version] => Self::new(*group, *artifact, *version)
                .with_type(*kind)
                .with_classifier(*classifier),
            _ => {
                return Err(invalid(
                    "expected groupId:artifactId[:type[:classifier]]:version",
                ));
            }
        };

        if parts.iter().any(|part| part.trim().is_empty()) {
            return Err(invalid("segments must not be empty"));
        }
        coordinates.validate()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        match &self.classifier {
            Some(classifier) => write!(f, ":{}:{classifier}", self.kind)?,
            None if self.kind != DEFAULT_TYPE => write!(f, ":{}", self.kind)?,
            None => {}
        }
        write!(f, ":{}", self.version)
    }
}
