//! API request and response types.

use serde::{Deserialize, Serialize};

/// Acknowledgement for mutating requests.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Liveness probe response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub ok: bool,
    /// Server time in Unix milliseconds
    pub ts: i64,
}
