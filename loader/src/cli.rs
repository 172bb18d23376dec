//! CLI argument definitions for the loader.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::{ConfigOverrides, DEFAULT_CONFIG_FILE};
use crate::coordinates::Coordinates;
use camino::Utf8PathBuf;
use clap::Parser;

/// Install a project and its runtime dependencies into PL/Java.
#[derive(Parser, Debug, Clone)]
#[command(name = "sqlj-loader")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install a project and its runtime dependencies into PL/Java.\n\n",
    "Every artifact is installed with sqlj.install_jar under a name derived from ",
    "its artifact id and version, replacing any previous jar of that name. ",
    "Directories such as target/classes are archived on the fly.\n\n",
    "The resulting jar names, joined with ':', form the classpath. When a ",
    "classpath property is configured it is written as a properties line to ",
    "standard output or to --properties-file.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install using ./sqlj-loader.toml:\n",
    "    $ sqlj-loader\n\n",
    "  Preview the install plan:\n",
    "    $ sqlj-loader --dry-run\n\n",
    "  Skip a dependency and add another:\n",
    "    $ sqlj-loader --exclude org.x:test-kit:1.0 --add org.y:extra:jar:shaded:3.0\n\n",
    "ENVIRONMENT:\n",
    "  SQLJ_LOADER_PASSWORD   Database password (overrides the config file)\n",
    "  SQLJ_LOADER_LOG        Log filter, e.g. 'sqlj_loader=debug'",
))]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: Utf8PathBuf,

    /// Database URL (overrides `[database] url`).
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Database user (overrides `[database] username`).
    #[arg(short = 'U', long, value_name = "USER")]
    pub username: Option<String>,

    /// Local Maven repository [default: ~/.m2/repository].
    #[arg(short, long, value_name = "DIR")]
    pub repository: Option<Utf8PathBuf>,

    /// Exclude an artifact, as group:artifact[:type[:classifier]]:version
    /// (can be repeated).
    #[arg(short = 'x', long, value_name = "COORDS")]
    pub exclude: Vec<Coordinates>,

    /// Add an artifact, as group:artifact[:type[:classifier]]:version
    /// (can be repeated).
    #[arg(short, long, value_name = "COORDS")]
    pub add: Vec<Coordinates>,

    /// Property name to publish the classpath under.
    #[arg(short = 'p', long, value_name = "KEY")]
    pub classpath_property: Option<String>,

    /// Write the classpath property to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub properties_file: Option<Utf8PathBuf>,

    /// Show the install plan and exit without connecting.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors and suppress the summary.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Configuration values given on the command line.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            url: self.url.clone(),
            username: self.username.clone(),
            repository: self.repository.clone(),
            exclude: self.exclude.clone(),
            add: self.add.clone(),
            classpath_property: self.classpath_property.clone(),
            properties_file: self.properties_file.clone(),
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
