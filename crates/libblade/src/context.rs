//! Per-invocation execution context
use std::fmt::Write as _;

/// Length in hex characters of a generated invocation id
const UID_LEN: usize = 16;

/// Carries the invocation id and the destroy signal through one action run.
///
/// A context is created for every invocation and only read while the action
/// executes. Destroy mode is an explicit field, so executors never consult
/// ambient state to find out whether they are rolling back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    uid: String,
    destroy: bool,
}

impl ExecutionContext {
    /// Context for a fresh apply with a newly generated invocation id
    pub fn new() -> Self {
        Self::with_uid(generate_uid())
    }

    pub fn with_uid<S: Into<String>>(uid: S) -> Self {
        ExecutionContext {
            uid: uid.into(),
            destroy: false,
        }
    }

    /// Marks the run as a rollback of a previously applied action
    pub fn destroying(mut self) -> Self {
        self.destroy = true;
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn is_destroy(&self) -> bool {
        self.destroy
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a random invocation id of 16 lowercase hex characters
pub fn generate_uid() -> String {
    let mut uid = String::with_capacity(UID_LEN);
    let _ = write!(uid, "{:016x}", fastrand::u64(..));
    uid
}
