//! Registry of the commands and actions known to the process
use std::collections::HashMap;

use crate::context::ExecutionContext;
use crate::flags;
use crate::response::{ErrorCode, Response};
use crate::spec::{ActionSpec, CommandSpec};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command {0} is already registered")]
    DuplicateName(String),
    #[error("{0} not found")]
    NotFound(String),
}

type Result<T> = std::result::Result<T, RegistryError>;

/// Holds every registered [`CommandSpec`].
///
/// The registry is filled at start-up and then handed out by shared
/// reference; lookups never mutate it, so concurrent readers need no lock.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<CommandSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in commands
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for command in crate::exec::default_commands() {
            let registered = registry.register_command(command);
            debug_assert!(registered.is_ok(), "built-in command names must be distinct");
        }
        registry
    }

    pub fn register_command(&mut self, spec: CommandSpec) -> Result<()> {
        if self.lookup_command(spec.name()).is_ok() {
            return Err(RegistryError::DuplicateName(spec.name().to_owned()));
        }
        tracing::debug!(command = spec.name(), "register command");
        self.commands.push(spec);
        Ok(())
    }

    pub fn lookup_command(&self, name: &str) -> Result<&CommandSpec> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| RegistryError::NotFound(format!("command {name}")))
    }

    /// Looks an action up by its command name and its name or alias
    pub fn lookup_action(&self, command: &str, action: &str) -> Result<&ActionSpec> {
        self.lookup_command(command)?
            .find_action(action)
            .ok_or_else(|| RegistryError::NotFound(format!("action {command} {action}")))
    }

    /// Registered commands in registration order
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// Runs one action: selects it by command and action name, resolves the
    /// raw arguments against its flags and hands them to its executor.
    pub fn execute(
        &self,
        command: &str,
        action: &str,
        raw: &HashMap<String, String>,
        ctx: &ExecutionContext,
    ) -> Response {
        let found = self.lookup_command(command).and_then(|command_spec| {
            command_spec
                .find_action(action)
                .map(|action_spec| (command_spec, action_spec))
                .ok_or_else(|| RegistryError::NotFound(format!("action {command} {action}")))
        });
        let (command_spec, action_spec) = match found {
            Ok(specs) => specs,
            Err(err) => {
                tracing::error!(uid = ctx.uid(), caller = "registry::execute", "{}", err);
                return Response::fail(
                    ErrorCode::ActionNotFound,
                    ErrorCode::ActionNotFound.render(&[&format!("{command} {action}")]),
                );
            }
        };

        let resolved = match flags::resolve(command_spec, action_spec, raw) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::error!(uid = ctx.uid(), caller = "registry::execute", "{}", err);
                return err.into();
            }
        };

        tracing::debug!(
            uid = ctx.uid(),
            command,
            action = action_spec.name(),
            destroy = ctx.is_destroy(),
            "execute action"
        );
        action_spec.executor().exec(&resolved, ctx)
    }
}
