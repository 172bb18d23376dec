//! The classpath produced by a run and its publication.
//!
//! The classpath is the ordered list of installed module names. It is
//! published as a single Java-properties line, `key=name1:name2:...`, either
//! to standard output or to a properties file.

use crate::error::{LoaderError, Result};
use crate::module_name::ModuleName;
use camino::Utf8PathBuf;
use std::fmt;
use std::fs;
use std::io::Write;

/// Separator between module names.
pub const SEPARATOR: char = ':';

/// Ordered module names, one per installed artefact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath(Vec<ModuleName>);

impl Classpath {
    /// Create an empty classpath.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module name.
    pub fn push(&mut self, name: ModuleName) {
        self.0.push(name);
    }

    /// The module names in order.
    #[must_use]
    pub fn names(&self) -> &[ModuleName] {
        &self.0
    }

    /// Number of module names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing has been installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Classpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, name) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{name}")?;
        }
        Ok(())
    }
}

impl FromIterator<ModuleName> for Classpath {
    fn from_iter<I: IntoIterator<Item = ModuleName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where a published classpath is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The given writer (standard output for the CLI).
    Stream,
    /// A properties file, created or truncated.
    PropertiesFile(Utf8PathBuf),
}

/// The configured output key and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathPublication {
    /// Property name the classpath is published under.
    pub key: String,
    /// Where the property line is written.
    pub destination: Destination,
}

impl ClasspathPublication {
    /// Render the properties line for `classpath`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlj_loader::classpath::{Classpath, Destination, ClasspathPublication};
    /// use sqlj_loader::module_name::ModuleName;
    ///
    /// let classpath: Classpath = ["a_1_0", "b_2_0"].into_iter().map(ModuleName::from).collect();
    /// let publication = ClasspathPublication {
    ///     key: "pljava.classpath".to_owned(),
    ///     destination: Destination::Stream,
    /// };
    /// assert_eq!(publication.render(&classpath), "pljava.classpath=a_1_0:b_2_0\n");
    /// ```
    #[must_use]
    pub fn render(&self, classpath: &Classpath) -> String {
        format!("{}={classpath}\n", escape_key(&self.key))
    }

    /// Write the properties line to the configured destination.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::PublishFailed`] if the file cannot be written
    /// and [`LoaderError::Io`] if the stream cannot be written.
    pub fn publish(&self, classpath: &Classpath, stream: &mut dyn Write) -> Result<()> {
        let line = self.render(classpath);
        match &self.destination {
            Destination::Stream => stream.write_all(line.as_bytes()).map_err(LoaderError::from),
            Destination::PropertiesFile(path) => {
                fs::write(path, line).map_err(|source| LoaderError::PublishFailed {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

/// Escape the characters that would end a properties key early.
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for ch in key.chars() {
        match ch {
            '\\' | ':' | '=' | ' ' | '#' | '!' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
