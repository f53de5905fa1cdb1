//! In-memory runtime used to test executors without a container runtime
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::runtime::{
    ConnectError, ContainerInfo, ContainerState, LookupError, RuntimeClient, RuntimeConnector,
    RuntimeError,
};

/// A call made against the mock runtime, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    Connect(String),
    GetById(String),
    Stop(String, Duration),
    Remove(String),
    ForceRemove(String),
}

#[derive(Default)]
struct MockState {
    containers: BTreeSet<String>,
    unreachable: BTreeSet<String>,
    lookup_error: Option<LookupError>,
    remove_error: Option<String>,
    calls: Vec<RuntimeCall>,
}

/// Connector handing out clients of one shared in-memory runtime. Clones
/// share the runtime, so a test can keep a handle to inspect the calls.
#[derive(Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, id: &str) -> Self {
        self.lock().containers.insert(id.to_owned());
        self
    }

    /// Connecting to `endpoint` fails
    pub fn with_unreachable(self, endpoint: &str) -> Self {
        self.lock().unreachable.insert(endpoint.to_owned());
        self
    }

    /// Every lookup fails with `err`
    pub fn with_lookup_error(self, err: LookupError) -> Self {
        self.lock().lookup_error = Some(err);
        self
    }

    /// Every removal fails with `message`
    pub fn with_remove_error(self, message: &str) -> Self {
        self.lock().remove_error = Some(message.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.lock().calls.clone()
    }

    /// Ids of the containers still present
    pub fn containers(&self) -> Vec<String> {
        self.lock().containers.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RuntimeConnector for MockConnector {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn RuntimeClient>, ConnectError> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::Connect(endpoint.to_owned()));
        if state.unreachable.contains(endpoint) {
            return Err(ConnectError::Unreachable {
                endpoint: endpoint.to_owned(),
                reason: "connection refused".to_owned(),
            });
        }
        Ok(Box::new(MockClient {
            connector: self.clone(),
        }))
    }
}

struct MockClient {
    connector: MockConnector,
}

impl MockClient {
    fn remove(&self, call: RuntimeCall, id: &str) -> Result<(), RuntimeError> {
        let mut state = self.connector.lock();
        state.calls.push(call);
        if let Some(message) = &state.remove_error {
            return Err(RuntimeError::Other(message.clone()));
        }
        state.containers.remove(id);
        Ok(())
    }
}

impl RuntimeClient for MockClient {
    fn get_by_id(&self, id: &str) -> Result<ContainerInfo, LookupError> {
        let mut state = self.connector.lock();
        state.calls.push(RuntimeCall::GetById(id.to_owned()));
        if let Some(err) = &state.lookup_error {
            return Err(err.clone());
        }
        if !state.containers.contains(id) {
            return Err(LookupError::not_found(id));
        }
        Ok(ContainerInfo {
            id: id.to_owned(),
            name: format!("/{id}"),
            state: ContainerState {
                status: "running".to_owned(),
                running: true,
            },
        })
    }

    fn stop_then_remove(&self, id: &str, timeout: Duration) -> Result<(), RuntimeError> {
        self.connector
            .lock()
            .calls
            .push(RuntimeCall::Stop(id.to_owned(), timeout));
        self.remove(RuntimeCall::Remove(id.to_owned()), id)
    }

    fn force_remove(&self, id: &str) -> Result<(), RuntimeError> {
        self.remove(RuntimeCall::ForceRemove(id.to_owned()), id)
    }
}
