//! The `container` command and the flags shared by its actions
use std::sync::Arc;

use super::container_remove::{self, RemoveExecutor};
use crate::runtime::RuntimeConnector;
use crate::spec::{ActionSpec, CommandSpec, FlagSpec};

pub const ENDPOINT_FLAG: &str = "endpoint";
pub const CONTAINER_ID_FLAG: &str = "container-id";

pub fn endpoint_flag() -> FlagSpec {
    FlagSpec::value(
        ENDPOINT_FLAG,
        "the container runtime endpoint, the docker default when empty",
    )
}

pub fn container_id_flag() -> FlagSpec {
    FlagSpec::value(CONTAINER_ID_FLAG, "the container id").required()
}

pub fn container_command(connector: Arc<dyn RuntimeConnector>) -> CommandSpec {
    CommandSpec::new("container")
        .short_desc("Execute a docker experiment")
        .long_desc("Execute a docker experiment. The local host must be installed docker command.")
        .flag(endpoint_flag())
        .action(remove_action(connector))
}

pub fn remove_action(connector: Arc<dyn RuntimeConnector>) -> ActionSpec {
    ActionSpec::new("remove", Arc::new(RemoveExecutor::new(connector)))
        .alias("rm")
        .short_desc("remove a container")
        .example(
            "# Delete the container id that is a76d53933d3f\n\
             blade create container remove --container-id a76d53933d3f",
        )
        .flag(container_id_flag())
        .flag(FlagSpec::switch(container_remove::FORCE_FLAG, "force remove"))
}
