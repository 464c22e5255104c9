//! CLI command handlers.
//!
//! Handlers are invoked by main.rs and kept here so they can be tested.

mod demo;
mod license;

pub use demo::{build_demo_document, run_demo};
pub use license::{classify_license, run_check_license, LicenseStatus};
