//! Command line definition. The experiment subcommands are generated from
//! the registry, so every registered action shows up without further wiring.
use std::collections::HashMap;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Args, Command};
use clap_complete::Shell;
use libblade::spec::FlagSpec;
use libblade::Registry;

pub const CREATE: &str = "create";
pub const DESTROY: &str = "destroy";
pub const LIST: &str = "list";
pub const COMPLETION: &str = "completion";
pub const UID_ARG: &str = "uid";
pub const SHELL_ARG: &str = "shell";

// Global flags, accepted before the subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// set the log file to write blade logs to (default is '/dev/stderr')
    #[clap(short, long)]
    pub log: Option<PathBuf>,
    /// change log level to debug, but the `log-level` flag takes precedence
    #[clap(long)]
    pub debug: bool,
    /// set the log level ('error', 'warn', 'info', 'debug' or 'trace')
    #[clap(long)]
    pub log_level: Option<String>,
    /// set the log format ('text' (default), or 'json') (default: "text")
    #[clap(long)]
    pub log_format: Option<String>,
    /// also send logs to systemd-journald
    #[clap(long)]
    pub systemd_log: bool,
    /// the docker command used to reach the container runtime
    #[clap(long, default_value = "docker")]
    pub docker: PathBuf,
    /// upper bound in seconds of a single docker command
    #[clap(long, default_value_t = 30, value_parser = value_parser!(u64).range(1..))]
    pub runtime_timeout: u64,
}

/// One experiment invocation taken from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub action: String,
    pub uid: Option<String>,
    pub raw: HashMap<String, String>,
}

pub fn build(app: Command, registry: &Registry) -> Command {
    app.subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(experiment_command(
            CREATE,
            "Create a chaos engineering experiment",
            registry,
        ))
        .subcommand(experiment_command(
            DESTROY,
            "Destroy a chaos engineering experiment",
            registry,
        ))
        .subcommand(Command::new(LIST).about("List the available experiments"))
        .subcommand(
            Command::new(COMPLETION)
                .about("Generate scripts for shell completion")
                .arg(
                    Arg::new(SHELL_ARG)
                        .long(SHELL_ARG)
                        .short('s')
                        .required(true)
                        .value_parser(value_parser!(Shell)),
                ),
        )
}

fn experiment_command(name: &'static str, about: &'static str, registry: &Registry) -> Command {
    let mut cmd = Command::new(name)
        .about(about)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(UID_ARG)
                .long(UID_ARG)
                .global(true)
                .help("the uid of the experiment, generated when not given"),
        );

    for spec in registry.commands() {
        let mut sub = Command::new(spec.name().to_owned())
            .about(spec.get_short_desc().to_owned())
            .long_about(spec.get_long_desc().to_owned())
            .subcommand_required(true)
            .arg_required_else_help(true);
        for action in spec.actions() {
            let mut act = Command::new(action.name().to_owned())
                .visible_aliases(action.aliases().iter().cloned())
                .about(action.get_short_desc().to_owned())
                .long_about(action.get_long_desc().to_owned());
            if !action.get_example().is_empty() {
                act = act.after_help(format!("Examples:\n{}", action.get_example()));
            }
            for flag in spec
                .flags()
                .iter()
                .chain(action.matchers())
                .chain(action.flags())
            {
                act = act.arg(flag_arg(flag));
            }
            sub = sub.subcommand(act);
        }
        cmd = cmd.subcommand(sub);
    }
    cmd
}

// Required flags stay optional for clap: a missing one is reported by the
// flag resolver as a structured response rather than a usage error.
fn flag_arg(flag: &FlagSpec) -> Arg {
    let arg = Arg::new(flag.name().to_owned())
        .long(flag.name().to_owned())
        .help(flag.desc().to_owned());
    if flag.takes_value() {
        arg.action(ArgAction::Set)
    } else {
        arg.action(ArgAction::SetTrue)
    }
}

/// Extracts the invocation from the matches of `create` or `destroy`
pub fn invocation(registry: &Registry, matches: &ArgMatches) -> Option<Invocation> {
    let (command, command_matches) = matches.subcommand()?;
    let (action, action_matches) = command_matches.subcommand()?;
    let command_spec = registry.lookup_command(command).ok()?;
    let action_spec = registry.lookup_action(command, action).ok()?;

    let mut raw = HashMap::new();
    for flag in command_spec
        .flags()
        .iter()
        .chain(action_spec.matchers())
        .chain(action_spec.flags())
    {
        if flag.takes_value() {
            if let Some(value) = action_matches.get_one::<String>(flag.name()) {
                raw.insert(flag.name().to_owned(), value.clone());
            }
        } else if action_matches.get_flag(flag.name()) {
            raw.insert(flag.name().to_owned(), String::new());
        }
    }

    Some(Invocation {
        command: command.to_owned(),
        action: action_spec.name().to_owned(),
        uid: action_matches.get_one::<String>(UID_ARG).cloned(),
        raw,
    })
}
