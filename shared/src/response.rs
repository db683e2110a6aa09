//! API Response types
//!
//! Response bodies of the print-request API.

use serde::{Deserialize, Serialize};

/// Body returned by `POST /api/print-request`
///
/// ```json
/// { "id": "6f1c...", "message": "Print request received" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintRequestCreated {
    pub id: String,
    pub message: String,
}

/// Plain confirmation body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body returned on every failure path
///
/// ```json
/// { "error": "Print request not found: ghost", "code": "not_found" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Machine-readable error kind (validation_error, not_found, ...)
    pub code: String,
}
