//! Contains functionality of the list command
use std::io::{self, Write};

use anyhow::Result;
use libblade::Registry;
use tabwriter::TabWriter;

/// Prints every registered action
pub fn list(registry: &Registry) -> Result<()> {
    let mut tab_writer = TabWriter::new(io::stdout());
    write_table(registry, &mut tab_writer)?;
    tab_writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(registry: &Registry, w: &mut W) -> Result<()> {
    writeln!(w, "COMMAND\tACTION\tALIASES\tFLAGS\tDESCRIPTION")?;
    for command in registry.commands() {
        for action in command.actions() {
            let flags: Vec<String> = command
                .flags()
                .iter()
                .chain(action.matchers())
                .chain(action.flags())
                .map(|f| {
                    if f.is_required() {
                        format!("--{}*", f.name())
                    } else {
                        format!("--{}", f.name())
                    }
                })
                .collect();
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}",
                command.name(),
                action.name(),
                action.aliases().join(","),
                flags.join(" "),
                action.get_short_desc()
            )?;
        }
    }
    Ok(())
}
