//! # libblade
//! Experiment-action protocol of the blade fault-injection tool: descriptors
//! of commands, actions and flags, flag resolution, the execution context,
//! the uniform response model and the executors of the built-in actions.
pub mod context;
pub mod exec;
pub mod flags;
pub mod registry;
pub mod response;
pub mod runtime;
pub mod spec;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use context::ExecutionContext;
pub use flags::ResolvedFlags;
pub use registry::Registry;
pub use response::{ErrorCategory, ErrorCode, Response};
