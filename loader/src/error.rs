//! Error types for a loader run.
//!
//! Only fatal failures reach this type. Resolution failures and rejected
//! removals are absorbed where they happen and never surface here.

use crate::content::ContentError;
use crate::coordinates::Coordinates;
use crate::module_name::ModuleName;
use crate::store::StoreError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that abort a loader run.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The configuration file does not exist.
    #[error("configuration file not found at {path}")]
    ConfigNotFound {
        /// Path where the file was expected.
        path: Utf8PathBuf,
    },

    /// The configuration file could not be parsed or is incomplete.
    #[error("invalid configuration {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// The store session could not be opened.
    #[error("unable to open store session: {source}")]
    Connect {
        /// The underlying store error.
        #[source]
        source: StoreError,
    },

    /// An artefact's content could not be loaded.
    #[error("unable to load {artifact} as {name}: {source}")]
    ReadFailed {
        /// The artefact being installed.
        artifact: Coordinates,
        /// Module name it would have been installed under.
        name: ModuleName,
        /// The underlying read or archive error.
        #[source]
        source: ContentError,
    },

    /// The store reported that an install did not succeed.
    #[error("unable to load jar {name} from {artifact} ({path})")]
    InstallFailed {
        /// The artefact being installed.
        artifact: Coordinates,
        /// Module name used for the install.
        name: ModuleName,
        /// Local path of the artefact.
        path: Utf8PathBuf,
    },

    /// A store call failed outright while processing an artefact.
    #[error("store {operation} failed for {name} ({artifact}): {source}")]
    Store {
        /// The call that failed.
        operation: &'static str,
        /// The artefact being processed.
        artifact: Coordinates,
        /// Module name addressed by the call.
        name: ModuleName,
        /// The underlying store error.
        #[source]
        source: StoreError,
    },

    /// Failed to publish the classpath.
    #[error("failed to publish classpath to {path}")]
    PublishFailed {
        /// Destination that could not be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> Coordinates {
        Coordinates::new("org.x", "widget", "1.0.0")
    }

    #[test]
    fn install_failed_identifies_artifact_and_name() {
        let err = LoaderError::InstallFailed {
            artifact: coords(),
            name: ModuleName::from("widget_1_0_0"),
            path: Utf8PathBuf::from("/repo/widget-1.0.0.jar"),
        };
        let msg = err.to_string();
        assert!(msg.contains("widget_1_0_0"));
        assert!(msg.contains("org.x:widget:1.0.0"));
        assert!(msg.contains("/repo/widget-1.0.0.jar"));
    }

    #[test]
    fn read_failed_preserves_source() {
        let err = LoaderError::ReadFailed {
            artifact: coords(),
            name: ModuleName::from("widget_1_0_0"),
            source: ContentError::Read {
                path: Utf8PathBuf::from("/missing"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
        };
        assert!(err.to_string().contains("widget_1_0_0"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn connect_error_includes_store_message() {
        let err = LoaderError::Connect {
            source: StoreError::Connection {
                message: "connection refused".to_owned(),
            },
        };
        assert!(err.to_string().contains("connection refused"));
    }
}
