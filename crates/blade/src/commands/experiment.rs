//! Contains functionality of the create and destroy commands
use anyhow::{Context, Result};
use clap::ArgMatches;
use libblade::{ExecutionContext, Registry, Response};

use crate::cli;

/// Applies the experiment named on the command line
pub fn create(registry: &Registry, matches: &ArgMatches) -> Result<Response> {
    run(registry, matches, false)
}

/// Rolls back the experiment named on the command line
pub fn destroy(registry: &Registry, matches: &ArgMatches) -> Result<Response> {
    run(registry, matches, true)
}

fn run(registry: &Registry, matches: &ArgMatches, destroy: bool) -> Result<Response> {
    let invocation =
        cli::invocation(registry, matches).context("no experiment action was given")?;
    let ctx = match invocation.uid {
        Some(uid) => ExecutionContext::with_uid(uid),
        None => ExecutionContext::new(),
    };
    let ctx = if destroy { ctx.destroying() } else { ctx };

    tracing::debug!(
        uid = ctx.uid(),
        command = %invocation.command,
        action = %invocation.action,
        destroy,
        "start experiment"
    );
    Ok(registry.execute(&invocation.command, &invocation.action, &invocation.raw, &ctx))
}
