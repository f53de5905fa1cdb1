//! Runtime client driving the local `docker` command line
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

use super::{
    ConnectError, ContainerInfo, LookupError, RuntimeClient, RuntimeConnector, RuntimeError,
};

/// Upper bound of a single docker invocation
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PROGRAM: &str = "docker";

/// Connects to a docker daemon through the docker command line.
#[derive(Debug, Clone)]
pub struct DockerConnector {
    program: PathBuf,
    timeout: Duration,
}

impl Default for DockerConnector {
    fn default() -> Self {
        DockerConnector {
            program: PathBuf::from(DEFAULT_PROGRAM),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl DockerConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program<P: Into<PathBuf>>(mut self, program: P) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl RuntimeConnector for DockerConnector {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn RuntimeClient>, ConnectError> {
        let client = DockerClient {
            program: self.program.clone(),
            endpoint: (!endpoint.is_empty()).then(|| endpoint.to_owned()),
            timeout: self.timeout,
        };
        // the docker cli connects lazily, ask the daemon for its version to
        // find out whether it is reachable at all
        client
            .run(&["version", "--format", "{{.Server.Version}}"])
            .map_err(|err| ConnectError::Unreachable {
                endpoint: client.endpoint_display().to_owned(),
                reason: err.to_string(),
            })?;
        Ok(Box::new(client))
    }
}

#[derive(Debug)]
struct DockerClient {
    program: PathBuf,
    endpoint: Option<String>,
    timeout: Duration,
}

impl DockerClient {
    fn endpoint_display(&self) -> &str {
        self.endpoint.as_deref().unwrap_or("default endpoint")
    }

    /// Runs one docker command and returns its stdout. The command is killed
    /// once the timeout expires.
    fn run(&self, args: &[&str]) -> Result<String, RuntimeError> {
        let command_line = format!("docker {}", args.join(" "));
        tracing::debug!(command = %command_line, endpoint = self.endpoint_display(), "run docker");

        let mut command = Command::new(&self.program);
        if let Some(endpoint) = &self.endpoint {
            command.arg("-H").arg(endpoint);
        }
        let child = command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RuntimeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
        let pid = Pid::from_raw(child.id() as i32);

        // Waiting happens on a separate thread so that the timeout can be
        // enforced through the channel. The child can't be shared with the
        // waiting thread, so a timed out child is killed through its pid.
        let (s, r) = crossbeam_channel::bounded::<std::io::Result<Output>>(1);
        thread::spawn(move || {
            let _ = s.send(child.wait_with_output());
        });
        let output = match r.recv_timeout(self.timeout) {
            Ok(res) => res.map_err(|err| {
                RuntimeError::Other(format!("failed to wait for {command_line}: {err}"))
            })?,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                let _ = signal::kill(pid, Signal::SIGKILL);
                return Err(RuntimeError::Timeout {
                    command: command_line,
                    timeout: self.timeout,
                });
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                return Err(RuntimeError::Other(format!(
                    "lost the wait thread of {command_line}"
                )));
            }
        };

        if !output.status.success() {
            return Err(RuntimeError::Command {
                command: command_line,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn is_not_found(err: &RuntimeError) -> bool {
    match err {
        RuntimeError::Command { stderr, .. } => {
            stderr.contains("No such container") || stderr.contains("No such object")
        }
        _ => false,
    }
}

impl RuntimeClient for DockerClient {
    fn get_by_id(&self, id: &str) -> Result<ContainerInfo, LookupError> {
        let stdout = match self.run(&["inspect", "--type", "container", id]) {
            Ok(stdout) => stdout,
            Err(err) if is_not_found(&err) => return Err(LookupError::not_found(id)),
            Err(err) => return Err(LookupError::failed("ContainerInspect", &err.to_string())),
        };
        let containers: Vec<ContainerInfo> = serde_json::from_str(&stdout)
            .map_err(|err| LookupError::failed("ContainerInspect", &err.to_string()))?;
        containers
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::not_found(id))
    }

    fn stop_then_remove(&self, id: &str, timeout: Duration) -> Result<(), RuntimeError> {
        let secs = timeout.as_secs().to_string();
        self.run(&["stop", "--time", &secs, id])?;
        self.run(&["rm", id])?;
        Ok(())
    }

    fn force_remove(&self, id: &str) -> Result<(), RuntimeError> {
        self.run(&["rm", "--force", id])?;
        Ok(())
    }
}
