//! Print request queue
//!
//! - [`storage`]: the JSON document holding every print request
//! - [`service`]: create / list / approve-and-print / status update

pub mod service;
pub mod storage;

pub use service::PrintRequestService;
pub use storage::{PrintRequestStorage, StorageError, StorageResult};
