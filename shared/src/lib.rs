//! Shared types for the booth print queue
//!
//! Domain and wire types used by both the printer-facing server and its
//! HTTP clients: the [`PrintRequest`] record, its status lifecycle, and the
//! request/response bodies of the print-request API.

pub mod models;
pub mod response;

// Re-exports
pub use models::{
    ApprovePrintRequest, ParseStatusError, PrintRequest, PrintRequestCreate, PrintRequestPatch,
    PrintStatus, StatusUpdate,
};
pub use response::{ErrorBody, MessageResponse, PrintRequestCreated};
