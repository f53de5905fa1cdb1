use std::io;

use anyhow::Result;
use clap::{ArgMatches, Command};
use clap_complete::{generate, Shell};

use crate::cli::SHELL_ARG;

pub fn completion(matches: &ArgMatches, app: &mut Command) -> Result<()> {
    let shell = matches
        .get_one::<Shell>(SHELL_ARG)
        .copied()
        .unwrap_or(Shell::Bash);
    let name = app.get_name().to_string();
    generate(shell, app, name, &mut io::stdout());

    Ok(())
}
