//! Payload loading for artefacts.
//!
//! A single file is installed as-is; a directory is archived first.

use crate::archive::{self, ArchiveError};
use camino::{Utf8Path, Utf8PathBuf};
use sha2::{Digest, Sha256};
use std::fs;
use thiserror::Error;

/// Errors arising while loading an artefact's payload.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The artefact path could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the artefact.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The artefact is a directory that could not be archived.
    #[error("failed to archive {path}: {source}")]
    Archive {
        /// Root of the directory tree.
        path: Utf8PathBuf,
        /// The underlying archive error.
        #[source]
        source: ArchiveError,
    },
}

/// Where a payload's bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// Read verbatim from a single file.
    File,
    /// Archived from a directory tree.
    Archive {
        /// Number of entries written to the archive.
        entries: usize,
    },
}

/// Bytes to install for one artefact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// The raw payload.
    pub bytes: Vec<u8>,
    /// How the payload was produced.
    pub source: PayloadSource,
}

impl Payload {
    /// Lowercase hex SHA-256 digest of the payload bytes.
    #[must_use]
    pub fn sha256(&self) -> String {
        format!("{:x}", Sha256::digest(&self.bytes))
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the payload holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Load the payload for the artefact at `path`.
///
/// # Errors
///
/// Returns [`ContentError::Read`] when the path is missing or unreadable and
/// [`ContentError::Archive`] when a directory cannot be archived.
pub fn load_payload(path: &Utf8Path) -> Result<Payload, ContentError> {
    let read_error = |source| ContentError::Read {
        path: path.to_owned(),
        source,
    };

    let metadata = fs::metadata(path).map_err(read_error)?;
    if !metadata.is_dir() {
        let bytes = fs::read(path).map_err(read_error)?;
        return Ok(Payload {
            bytes,
            source: PayloadSource::File,
        });
    }

    let archive_error = |source| ContentError::Archive {
        path: path.to_owned(),
        source,
    };
    let entries = archive::collect_entries(path).map_err(archive_error)?;
    let bytes = archive::write_archive(&entries).map_err(archive_error)?;
    Ok(Payload {
        bytes,
        source: PayloadSource::Archive {
            entries: entries.len(),
        },
    })
}
