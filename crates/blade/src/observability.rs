//! Logging for the blade binary. Events go to stderr or to an append-only
//! log file, optionally mirrored to journald.
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry};

use crate::cli::GlobalOpts;

const SYSLOG_IDENTIFIER: &str = "blade";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            unknown => bail!("unknown log format: {}", unknown),
        }
    }
}

/// Where and how blade logs, as asked for on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Level,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    pub journald: bool,
}

impl TryFrom<&GlobalOpts> for LogSettings {
    type Error = anyhow::Error;

    fn try_from(opts: &GlobalOpts) -> Result<Self> {
        // `--log-level` wins over `--debug`
        let level = match opts.log_level.as_deref() {
            Some(level) => Level::from_str(level)
                .with_context(|| format!("invalid log level: {}", level))?,
            None if opts.debug => Level::DEBUG,
            None if cfg!(debug_assertions) => Level::DEBUG,
            None => Level::ERROR,
        };
        let format = match opts.log_format.as_deref() {
            Some(format) => format.parse()?,
            None => LogFormat::default(),
        };
        Ok(LogSettings {
            level,
            format,
            file: opts.log.clone(),
            journald: opts.systemd_log,
        })
    }
}

/// The formatter layer. Files never get ANSI colors.
fn fmt_layer(format: LogFormat, writer: BoxMakeWriter, ansi: bool) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer
            .json()
            .flatten_event(true)
            .with_span_list(false)
            .boxed(),
    }
}

fn journald_layer() -> Option<BoxedLayer> {
    match tracing_journald::layer() {
        Ok(layer) => Some(
            layer
                .with_syslog_identifier(SYSLOG_IDENTIFIER.to_owned())
                .boxed(),
        ),
        Err(err) => {
            // journald may be missing, e.g. inside a container
            eprintln!("failed to initialize journald logging: {:?}", err);
            None
        }
    }
}

pub fn init(settings: LogSettings) -> Result<()> {
    let (writer, ansi) = match &settings.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let mut layers = vec![fmt_layer(settings.format, writer, ansi)];
    if settings.journald {
        layers.extend(journald_layer());
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(LevelFilter::from_level(settings.level))
        .try_init()
        .context("failed to init logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{Args, Command, FromArgMatches};

    use super::*;

    fn settings(args: &[&str]) -> Result<LogSettings> {
        let matches = GlobalOpts::augment_args(Command::new("blade"))
            .try_get_matches_from(std::iter::once("blade").chain(args.iter().copied()))?;
        let opts = GlobalOpts::from_arg_matches(&matches)?;
        LogSettings::try_from(&opts)
    }

    #[test]
    fn test_log_level() -> Result<()> {
        for (input, expected) in [
            ("error", Level::ERROR),
            ("warn", Level::WARN),
            ("info", Level::INFO),
            ("debug", Level::DEBUG),
            ("trace", Level::TRACE),
        ] {
            assert_eq!(settings(&["--log-level", input])?.level, expected);
        }
        assert_eq!(settings(&["--debug"])?.level, Level::DEBUG);
        assert_eq!(
            settings(&["--debug", "--log-level", "warn"])?.level,
            Level::WARN
        );
        assert!(settings(&["--log-level", "loud"]).is_err());

        let default = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::ERROR
        };
        assert_eq!(settings(&[])?.level, default);
        Ok(())
    }

    #[test]
    fn test_log_format_and_targets() -> Result<()> {
        let plain = settings(&[])?;
        assert_eq!(plain.format, LogFormat::Text);
        assert_eq!(plain.file, None);
        assert!(!plain.journald);

        let json = settings(&[
            "--log-format",
            "json",
            "--log",
            "/tmp/blade.log",
            "--systemd-log",
        ])?;
        assert_eq!(json.format, LogFormat::Json);
        assert_eq!(json.file, Some(PathBuf::from("/tmp/blade.log")));
        assert!(json.journald);

        assert!(settings(&["--log-format", "yaml"]).is_err());
        Ok(())
    }

    // The global subscriber can be set once per process, so this is the only
    // test that calls init.
    #[test]
    fn test_json_logfile_appends() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let log_file = temp_dir.path().join("blade.log");
        std::fs::write(&log_file, "earlier run\n")?;

        init(LogSettings {
            level: Level::ERROR,
            format: LogFormat::Json,
            file: Some(log_file.clone()),
            journald: false,
        })?;

        tracing::info!("below the level");
        tracing::error!(uid = "abc", caller = "observability::tests", "testing json log");

        let data = std::fs::read_to_string(&log_file)?;
        assert!(data.starts_with("earlier run\n"), "log file was truncated");
        assert!(!data.contains("below the level"));
        let line = data
            .lines()
            .find(|line| line.contains("testing json log"))
            .ok_or_else(|| anyhow::anyhow!("event not logged: {data}"))?;
        let value: serde_json::Value = serde_json::from_str(line)?;
        assert_eq!(value["uid"], "abc");
        assert_eq!(value["caller"], "observability::tests");
        assert_eq!(value["level"], "ERROR");
        Ok(())
    }
}
