//! Executor of the `container remove` action
use std::sync::Arc;
use std::time::Duration;

use super::container::{CONTAINER_ID_FLAG, ENDPOINT_FLAG};
use super::Executor;
use crate::context::ExecutionContext;
use crate::flags::ResolvedFlags;
use crate::response::{ErrorCode, Response};
use crate::runtime::RuntimeConnector;

pub const FORCE_FLAG: &str = "force";

const EXECUTOR_NAME: &str = "remove";
const CALLER: &str = "container_remove::exec";
/// How long a graceful stop waits before the runtime kills the container
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Removes one container from the runtime.
///
/// Without `--force` the container is force removed right away. With
/// `--force` it is stopped gracefully, waiting at most [`STOP_TIMEOUT`], and
/// then removed. The flag name reads the other way round; the mapping is
/// kept as is until its intended meaning is confirmed.
pub struct RemoveExecutor {
    connector: Arc<dyn RuntimeConnector>,
}

impl RemoveExecutor {
    pub fn new(connector: Arc<dyn RuntimeConnector>) -> Self {
        RemoveExecutor { connector }
    }

    fn fail(ctx: &ExecutionContext, code: ErrorCode, message: String) -> Response {
        tracing::error!(uid = ctx.uid(), caller = CALLER, "{}", message);
        Response::fail(code, message)
    }
}

impl Executor for RemoveExecutor {
    fn name(&self) -> &str {
        EXECUTOR_NAME
    }

    fn exec(&self, flags: &ResolvedFlags, ctx: &ExecutionContext) -> Response {
        // a removed container can't be brought back, rolling back is a no-op
        if ctx.is_destroy() {
            tracing::debug!(uid = ctx.uid(), "destroy container remove, nothing to undo");
            return Response::success(ctx.uid());
        }

        let container_id = flags.get(CONTAINER_ID_FLAG);
        if container_id.is_empty() {
            return Self::fail(
                ctx,
                ErrorCode::ParameterLess,
                ErrorCode::ParameterLess.render(&[CONTAINER_ID_FLAG]),
            );
        }

        let client = match self.connector.connect(flags.get(ENDPOINT_FLAG)) {
            Ok(client) => client,
            Err(err) => {
                return Self::fail(
                    ctx,
                    ErrorCode::RuntimeConnectFailed,
                    ErrorCode::RuntimeConnectFailed.render(&["GetClient", &err.to_string()]),
                )
            }
        };

        if let Err(err) = client.get_by_id(container_id) {
            return Self::fail(ctx, err.code, err.message);
        }

        let res = if flags.is_set(FORCE_FLAG) {
            tracing::debug!(uid = ctx.uid(), container_id, "stop then remove container");
            client.stop_then_remove(container_id, STOP_TIMEOUT)
        } else {
            tracing::debug!(uid = ctx.uid(), container_id, "force remove container");
            client.force_remove(container_id)
        };
        if let Err(err) = res {
            return Self::fail(
                ctx,
                ErrorCode::RuntimeExecFailed,
                ErrorCode::RuntimeExecFailed.render(&["ContainerRemove", &err.to_string()]),
            );
        }

        Response::success(ctx.uid())
    }
}
