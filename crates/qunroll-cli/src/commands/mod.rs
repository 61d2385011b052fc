//! CLI command implementations.

pub mod check;
pub mod common;
pub mod fmt;
pub mod unroll;
pub mod version;
