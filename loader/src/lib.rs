//! SQLJ loader library.
//!
//! This crate packages a project's build output and its resolved runtime
//! dependencies and installs each of them as a named jar in PL/Java's `sqlj`
//! schema. It is used by the `sqlj-loader` CLI binary and can be consumed
//! programmatically for testing or custom deployment workflows.
//!
//! # Modules
//!
//! - [`archive`] - Deterministic archives of directory trees
//! - [`artifact`] - Artefacts resolved to a local path
//! - [`artifact_set`] - Ordered set assembly with exclusions and additions
//! - [`classpath`] - The installed-name classpath and its publication
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - TOML configuration with environment and CLI overrides
//! - [`content`] - Payload loading for files and directories
//! - [`coordinates`] - Maven-style artefact coordinates
//! - [`error`] - Run-level error types
//! - [`installer`] - Remove-then-install of artefacts into a store
//! - [`logging`] - Log subscriber setup for the binary
//! - [`module_name`] - Module names derived from coordinates
//! - [`output`] - Dry-run and summary formatting
//! - [`pipeline`] - Plan, install and publish orchestration
//! - [`resolver`] - Coordinate resolution against a local repository
//! - [`store`] - The remote module store and its PostgreSQL backend

pub mod archive;
pub mod artifact;
pub mod artifact_set;
pub mod classpath;
pub mod cli;
pub mod config;
pub mod content;
pub mod coordinates;
pub mod error;
pub mod installer;
pub mod logging;
pub mod module_name;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod store;
