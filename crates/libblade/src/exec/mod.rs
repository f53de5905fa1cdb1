//! Executors implementing the runtime behavior of actions
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::flags::ResolvedFlags;
use crate::response::Response;
use crate::runtime::docker::DockerConnector;
use crate::runtime::RuntimeConnector;
use crate::spec::CommandSpec;

pub mod container;
pub mod container_remove;

/// The runtime behavior of one action.
///
/// Executors are stateless: every call gets the flags and context of its own
/// invocation, so one executor may serve several invocations at once.
pub trait Executor: Send + Sync {
    /// The name of the executor
    fn name(&self) -> &str;
    /// Executes the action. Failures are reported through the returned
    /// response, never by panicking.
    fn exec(&self, flags: &ResolvedFlags, ctx: &ExecutionContext) -> Response;
}

/// Built-in commands, backed by the local docker command line
pub fn default_commands() -> Vec<CommandSpec> {
    commands_with(Arc::new(DockerConnector::default()))
}

/// Built-in commands whose executors reach the runtime through `connector`
pub fn commands_with(connector: Arc<dyn RuntimeConnector>) -> Vec<CommandSpec> {
    vec![container::container_command(connector)]
}
