//! Loader configuration.
//!
//! A run is described by a TOML file (by default `sqlj-loader.toml` in the
//! working directory):
//!
//! ```toml
//! classpath_property = "pljava.classpath"
//! properties_file = "target/loader.properties"
//!
//! [database]
//! url = "postgres://localhost/app"
//! username = "loader"
//!
//! [repository]
//! local = "/home/me/.m2/repository"
//!
//! [project]
//! group_id = "org.x"
//! artifact_id = "app"
//! version = "1.0.0"
//! path = "target/classes"
//!
//! [[dependencies]]
//! group_id = "org.x"
//! artifact_id = "core-lib"
//! version = "2.3.1"
//!
//! [[excluded]]
//! group_id = "org.x"
//! artifact_id = "test-kit"
//! version = "1.0"
//! ```
//!
//! Relative paths in the file are resolved against the file's directory.
//! The password may come from `SQLJ_LOADER_PASSWORD` instead of the file.

use crate::artifact::{ArtifactOrigin, ResolvedArtifact};
use crate::classpath::{ClasspathPublication, Destination};
use crate::coordinates::Coordinates;
use crate::error::{LoaderError, Result};
use crate::resolver::{ArtifactResolver, LocalRepositoryResolver, default_repository_root};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use serde::Deserialize;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sqlj-loader.toml";

/// Environment variable that overrides the configured database password.
pub const PASSWORD_ENV: &str = "SQLJ_LOADER_PASSWORD";

/// Connection settings for the module store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// User name merged into the URL.
    #[serde(default)]
    pub username: Option<String>,
    /// Password merged into the URL.
    #[serde(default)]
    pub password: Option<String>,
}

/// Where coordinates without an explicit path are looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Root of a Maven-layout repository. Defaults to `~/.m2/repository`.
    #[serde(default)]
    pub local: Option<Utf8PathBuf>,
}

/// The project's own build output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
    /// Coordinates the output is installed under.
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Build output: a directory of classes or a packaged file.
    pub path: Utf8PathBuf,
}

/// One runtime dependency, in install order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyEntry {
    /// The dependency's coordinates.
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Explicit location. When absent the local repository is searched.
    #[serde(default)]
    pub path: Option<Utf8PathBuf>,
}

/// Values given on the command line, applied over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replaces `database.url`.
    pub url: Option<String>,
    /// Replaces `database.username`.
    pub username: Option<String>,
    /// Replaces `repository.local`.
    pub repository: Option<Utf8PathBuf>,
    /// Appended to the configured exclusions.
    pub exclude: Vec<Coordinates>,
    /// Appended to the configured additions.
    pub add: Vec<Coordinates>,
    /// Replaces `classpath_property`.
    pub classpath_property: Option<String>,
    /// Replaces `properties_file`.
    pub properties_file: Option<Utf8PathBuf>,
}

/// A fully loaded run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Store connection settings. Only required when installing.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// Local repository settings.
    #[serde(default)]
    pub repository: RepositoryConfig,
    /// The project's own artefact.
    pub project: ProjectConfig,
    /// Runtime dependencies in install order.
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
    /// Coordinates removed from the set.
    #[serde(default)]
    pub excluded: Vec<Coordinates>,
    /// Coordinates appended to the set.
    #[serde(default)]
    pub additional: Vec<Coordinates>,
    /// Key the classpath is published under. Nothing is published without it.
    #[serde(default)]
    pub classpath_property: Option<String>,
    /// Properties file receiving the classpath. Standard output otherwise.
    #[serde(default)]
    pub properties_file: Option<Utf8PathBuf>,
    #[serde(skip)]
    source: Utf8PathBuf,
}

impl LoaderConfig {
    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::ConfigNotFound`] if the file does not exist and
    /// [`LoaderError::InvalidConfig`] if it cannot be parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            return Err(LoaderError::ConfigNotFound {
                path: path.to_owned(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        debug!("loaded configuration from {path}");
        Self::parse(&contents, path)
    }

    /// Parse configuration text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidConfig`] if the text is not a valid
    /// configuration.
    pub fn parse(contents: &str, path: &Utf8Path) -> Result<Self> {
        let mut config: Self = toml::from_str(contents).map_err(|err| LoaderError::InvalidConfig {
            path: path.to_owned(),
            reason: err.message().to_owned(),
        })?;
        config.source = path.to_owned();
        config.anchor_paths(path.parent().unwrap_or_else(|| Utf8Path::new("")));
        Ok(config)
    }

    /// Path the configuration was read from.
    #[must_use]
    pub fn source(&self) -> &Utf8Path {
        &self.source
    }

    /// Apply [`PASSWORD_ENV`] when it is set and not empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let password = std::env::var(PASSWORD_ENV)
            .ok()
            .filter(|value| !value.is_empty());
        if let (Some(password), Some(database)) = (password, self.database.as_mut()) {
            database.password = Some(password);
        }
        self
    }

    /// Apply command-line overrides.
    ///
    /// A `--url` without a `[database]` section creates one.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        let ConfigOverrides {
            url,
            username,
            repository,
            exclude,
            add,
            classpath_property,
            properties_file,
        } = overrides;

        if let Some(url) = url {
            match self.database.as_mut() {
                Some(database) => database.url = url,
                None => {
                    self.database = Some(DatabaseConfig {
                        url,
                        username: None,
                        password: None,
                    });
                }
            }
        }
        if let (Some(username), Some(database)) = (username, self.database.as_mut()) {
            database.username = Some(username);
        }
        if repository.is_some() {
            self.repository.local = repository;
        }
        self.excluded.extend(exclude);
        self.additional.extend(add);
        if classpath_property.is_some() {
            self.classpath_property = classpath_property;
        }
        if properties_file.is_some() {
            self.properties_file = properties_file;
        }
        self
    }

    /// Connection settings, required for a real run.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidConfig`] when no database is configured.
    pub fn database(&self) -> Result<&DatabaseConfig> {
        self.database.as_ref().ok_or_else(|| LoaderError::InvalidConfig {
            path: self.source.clone(),
            reason: "no [database] section and no --url given".to_owned(),
        })
    }

    /// Resolver for the configured or default local repository.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidConfig`] when no repository is
    /// configured and no home directory can be found.
    pub fn resolver(&self) -> Result<LocalRepositoryResolver> {
        self.repository
            .local
            .clone()
            .or_else(default_repository_root)
            .map(LocalRepositoryResolver::new)
            .ok_or_else(|| LoaderError::InvalidConfig {
                path: self.source.clone(),
                reason: "no [repository] local path and no home directory".to_owned(),
            })
    }

    /// The project's own artefact.
    #[must_use]
    pub fn project_artifact(&self) -> ResolvedArtifact {
        ResolvedArtifact::new(
            self.project.coordinates.clone(),
            self.project.path.clone(),
            ArtifactOrigin::Project,
        )
    }

    /// Resolve the runtime dependencies in declaration order.
    ///
    /// Entries with a path are used as declared. Others are looked up with
    /// `resolver`; failures are logged and the entry is dropped.
    #[must_use]
    pub fn runtime_artifacts(&self, resolver: &dyn ArtifactResolver) -> Vec<ResolvedArtifact> {
        self.dependencies
            .iter()
            .filter_map(|entry| match &entry.path {
                Some(path) => Some(ResolvedArtifact::new(
                    entry.coordinates.clone(),
                    path.clone(),
                    ArtifactOrigin::Declared,
                )),
                None => match resolver.resolve(&entry.coordinates) {
                    Ok(artifact) => Some(artifact),
                    Err(err) => {
                        warn!("skipping runtime dependency: {err}");
                        None
                    }
                },
            })
            .collect()
    }

    /// Where to publish the classpath, if a key is configured.
    #[must_use]
    pub fn publication(&self) -> Option<ClasspathPublication> {
        let key = self.classpath_property.clone()?;
        let destination = self
            .properties_file
            .clone()
            .map_or(Destination::Stream, Destination::PropertiesFile);
        Some(ClasspathPublication { key, destination })
    }

    fn anchor_paths(&mut self, base: &Utf8Path) {
        let anchor = |path: &mut Utf8PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        anchor(&mut self.project.path);
        for entry in &mut self.dependencies {
            if let Some(path) = entry.path.as_mut() {
                anchor(path);
            }
        }
        if let Some(local) = self.repository.local.as_mut() {
            anchor(local);
        }
        if let Some(file) = self.properties_file.as_mut() {
            anchor(file);
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
