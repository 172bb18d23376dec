//! Directory-to-archive conversion.
//!
//! Turns a directory tree into a single JAR (ZIP) blob that the store can
//! install as one payload. Children are visited in byte-wise file-name order
//! and every entry carries fixed permissions, so the same tree always yields
//! the same bytes.

use camino::Utf8Path;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Unix mode recorded for directory entries.
const DIRECTORY_MODE: u32 = 0o755;
/// Unix mode recorded for file entries.
const FILE_MODE: u32 = 0o644;

/// Errors arising while building an archive from a directory tree.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The directory walk failed (unreadable directory, symlink loop).
    #[error("failed to walk {path}: {source}")]
    Walk {
        /// Path being visited when the walk failed.
        path: PathBuf,
        /// The underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// A file or its metadata could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path below the root is not valid UTF-8 and cannot be named in the archive.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// The walk produced a path outside the archive root.
    #[error("path {} is not below the archive root", .0.display())]
    OutsideRoot(PathBuf),

    /// Writing the archive container failed.
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// What an archive entry holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory marker; its path ends with `/`.
    Directory,
    /// A file with its full content.
    File(Vec<u8>),
}

/// One entry of an archive, addressed by its `/`-separated relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path relative to the archive root.
    pub path: String,
    /// Directory marker or file content.
    pub kind: EntryKind,
    /// Modification time of the source file or directory.
    pub modified: SystemTime,
}

impl ArchiveEntry {
    /// Returns `true` for directory markers.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}

/// Collect the entries for every file and subdirectory beneath `root`.
///
/// The walk is depth-first: a directory's marker precedes its descendants,
/// siblings are ordered by file name, and the root itself produces no
/// entry. Symbolic links are followed.
///
/// # Errors
///
/// Returns [`ArchiveError`] when the tree cannot be walked or any file
/// cannot be read.
pub fn collect_entries(root: &Utf8Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut entries = Vec::new();
    for item in walker {
        let entry = item.map_err(|source| ArchiveError::Walk {
            path: source
                .path()
                .map_or_else(|| root.as_std_path().to_path_buf(), Path::to_path_buf),
            source,
        })?;
        entries.push(archive_entry(root.as_std_path(), entry.path(), entry.file_type().is_dir())?);
    }
    Ok(entries)
}

/// Build the archive for `root` and return its bytes.
///
/// # Errors
///
/// Returns [`ArchiveError`] if any entry cannot be collected or written; no
/// partial archive is produced.
pub fn build_archive(root: &Utf8Path) -> Result<Vec<u8>, ArchiveError> {
    let entries = collect_entries(root)?;
    write_archive(&entries)
}

/// Write already-collected entries, in order, into a ZIP container.
///
/// # Errors
///
/// Returns [`ArchiveError::Zip`] if the container cannot be written.
pub fn write_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip_timestamp(entry.modified));
        match &entry.kind {
            EntryKind::Directory => {
                writer
                    .add_directory(entry.path.as_str(), options.unix_permissions(DIRECTORY_MODE))?;
            }
            EntryKind::File(content) => {
                writer.start_file(entry.path.as_str(), options.unix_permissions(FILE_MODE))?;
                writer
                    .write_all(content)
                    .map_err(|source| ArchiveError::Zip(source.into()))?;
            }
        }
    }

    Ok(writer.finish()?.into_inner())
}

/// Convert a modification time to the DOS timestamp stored in ZIP headers.
///
/// Times are taken in UTC. Anything outside the representable range
/// (1980–2107) falls back to 1980-01-01 00:00:00.
#[must_use]
pub fn zip_timestamp(modified: SystemTime) -> zip::DateTime {
    let utc: DateTime<Utc> = modified.into();
    let Ok(year) = u16::try_from(utc.year()) else {
        return zip::DateTime::default();
    };
    let civil = (
        u8::try_from(utc.month()),
        u8::try_from(utc.day()),
        u8::try_from(utc.hour()),
        u8::try_from(utc.minute()),
        u8::try_from(utc.second()),
    );
    let (Ok(month), Ok(day), Ok(hour), Ok(minute), Ok(second)) = civil else {
        return zip::DateTime::default();
    };
    zip::DateTime::from_date_and_time(year, month, day, hour, minute, second).unwrap_or_default()
}

fn archive_entry(root: &Path, path: &Path, is_dir: bool) -> Result<ArchiveEntry, ArchiveError> {
    let read_error = |source| ArchiveError::Read {
        path: path.to_path_buf(),
        source,
    };

    let relative = relative_name(root, path)?;
    let modified = fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(read_error)?;

    if is_dir {
        return Ok(ArchiveEntry {
            path: format!("{relative}/"),
            kind: EntryKind::Directory,
            modified,
        });
    }

    let content = fs::read(path).map_err(read_error)?;
    Ok(ArchiveEntry {
        path: relative,
        kind: EntryKind::File(content),
        modified,
    })
}

/// Render `path` relative to `root` with `/` separators.
fn relative_name(root: &Path, path: &Path) -> Result<String, ArchiveError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ArchiveError::OutsideRoot(path.to_path_buf()))?;
    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ArchiveError::NonUtf8Path(path.to_path_buf()))?;
    Ok(segments.join("/"))
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
