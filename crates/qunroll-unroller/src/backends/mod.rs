//! Bundled backends.
//!
//! - [`Recorder`] keeps every call as data, for inspection or JSON export.
//! - [`QasmPrinter`] writes the unrolled program back out as flat OpenQASM.

mod printer;
mod recorder;

pub use printer::QasmPrinter;
pub use recorder::{BackendCall, Recorder};
