//! SQLJ loader CLI entrypoint.
//!
//! This binary installs a project and its runtime dependencies into PL/Java
//! and publishes the resulting classpath.

use clap::Parser;
use sqlj_loader::cli::Cli;
use sqlj_loader::config::LoaderConfig;
use sqlj_loader::error::{LoaderError, Result};
use sqlj_loader::logging;
use sqlj_loader::output::{DryRunInfo, install_summary, write_stderr_line};
use sqlj_loader::pipeline::{self, Plan};
use sqlj_loader::resolver::LocalRepositoryResolver;
use sqlj_loader::store::postgres::{PgModuleStore, redacted_target};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbosity, cli.quiet);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let config = load_config(cli)?;
    let resolver = config.resolver()?;
    let plan = pipeline::plan(&config, &resolver);

    if cli.dry_run {
        print_dry_run_info(&config, &resolver, &plan, stderr);
        return Ok(());
    }

    // The session opens before any artefact is touched and closes when the
    // store is dropped, on every exit path.
    let settings = config.database()?;
    let mut store =
        PgModuleStore::connect(settings).map_err(|source| LoaderError::Connect { source })?;
    let outcome = pipeline::install_plan(&plan, &mut store)?;
    pipeline::publish(&config, &outcome.classpath, stdout)?;

    if !cli.quiet {
        let publication = config.publication();
        write_stderr_line(
            stderr,
            install_summary(
                &outcome.records,
                store.target(),
                publication.as_ref(),
                &outcome.classpath,
            ),
        );
    }
    Ok(())
}

/// Loads the configuration file and applies CLI and environment overrides.
fn load_config(cli: &Cli) -> Result<LoaderConfig> {
    Ok(LoaderConfig::load(&cli.config)?
        .with_overrides(cli.overrides())
        .with_env_overrides())
}

fn print_dry_run_info(
    config: &LoaderConfig,
    resolver: &LocalRepositoryResolver,
    plan: &Plan,
    stderr: &mut dyn Write,
) {
    let database = config
        .database
        .as_ref()
        .and_then(|settings| redacted_target(settings).ok());
    let publication = config.publication();
    let info = DryRunInfo {
        config_path: config.source(),
        repository: resolver.root(),
        database: database.as_deref(),
        plan,
        publication: publication.as_ref(),
    };
    write_stderr_line(stderr, info.display_text());
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
