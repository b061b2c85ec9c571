use std::sync::Arc;

use crate::judge::Judge;

/// Version string reported by `/health` and logged at startup.
pub const SERVER_VERSION: &str = "v4-head-to-head-A123-vs-B456";

/// Shared, cheaply cloneable application state.
#[derive(Clone)]
pub struct AppState {
    pub judge: Arc<dyn Judge>,
    pub version: &'static str,
    pub max_json_payload_size: usize,
}

impl AppState {
    pub fn new(judge: Arc<dyn Judge>, max_json_payload_size: usize) -> Self {
        Self {
            judge,
            version: SERVER_VERSION,
            max_json_payload_size,
        }
    }
}
