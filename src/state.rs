//! Shared application state for all routes.

use crate::store::MachineStatusStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// The one long-lived database handle, shared by every request.
    pub store: Arc<dyn MachineStatusStore>,
}

impl AppState {
    pub fn new<S: MachineStatusStore + 'static>(store: S) -> Self {
        Self { store: Arc::new(store) }
    }
}
