//! # booth-printer
//!
//! Printer Service for the booth print queue - the side-effecting half of
//! "approve and print".
//!
//! ## Scope
//!
//! This crate handles HOW an image reaches a printer:
//! - Image payload decoding (data URL / bare base64)
//! - Network printing (raw TCP, port 9100)
//! - A simulated printer for kiosks without hardware
//!
//! Queue state (WHAT has been printed) stays in booth-server.
//!
//! ## Example
//!
//! ```ignore
//! use booth_printer::{NetworkPrinter, Printer};
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print("data:image/png;base64,iVBORw0KGgo...").await?;
//! ```

mod error;
mod payload;
mod printer;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use payload::{ImagePayload, decode_image_data};
pub use printer::{NetworkPrinter, Printer, SimulatedPrinter};
