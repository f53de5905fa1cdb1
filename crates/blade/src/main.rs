//! # Blade
//! Runs container fault-injection experiments. Every experiment is one
//! action of a registered command, e.g. `blade create container remove`.
mod cli;
mod commands;
mod observability;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use libblade::exec;
use libblade::runtime::docker::DockerConnector;
use libblade::{Registry, Response};

use crate::cli::GlobalOpts;
use crate::observability::LogSettings;

#[derive(Parser, Debug)]
#[clap(version, author = env!("CARGO_PKG_AUTHORS"), about)]
struct Opts {
    #[clap(flatten)]
    global: GlobalOpts,
}

/// Registry whose executors reach docker the way the global flags ask for
fn build_registry(opts: &GlobalOpts) -> Result<Registry> {
    let connector = DockerConnector::new()
        .with_program(&opts.docker)
        .with_timeout(Duration::from_secs(opts.runtime_timeout));
    let mut registry = Registry::new();
    for command in exec::commands_with(Arc::new(connector)) {
        registry
            .register_command(command)
            .context("failed to register built-in command")?;
    }
    Ok(registry)
}

fn render(response: &Response) -> Result<()> {
    println!(
        "{}",
        response.to_json().context("failed to encode response")?
    );
    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn main() -> Result<()> {
    // The command tree only depends on the descriptors, so it is built from
    // the default registry before the global flags are known.
    let mut app = cli::build(Opts::command(), &Registry::with_defaults());
    let matches = app.clone().get_matches();
    let opts = Opts::from_arg_matches(&matches)?;

    if let Err(e) = LogSettings::try_from(&opts.global).and_then(observability::init) {
        eprintln!("log init failed: {:?}", e);
    }

    tracing::debug!(args = ?std::env::args_os().collect::<Vec<_>>(), "started");
    let registry = build_registry(&opts.global)?;

    match matches.subcommand() {
        Some((cli::CREATE, sub)) => render(&commands::experiment::create(&registry, sub)?),
        Some((cli::DESTROY, sub)) => render(&commands::experiment::destroy(&registry, sub)?),
        Some((cli::LIST, _)) => commands::list::list(&registry),
        Some((cli::COMPLETION, sub)) => commands::completion::completion(sub, &mut app),
        _ => unreachable!("subcommand is required"),
    }
}
