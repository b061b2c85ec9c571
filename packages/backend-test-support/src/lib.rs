//! Shared test tooling for the grader workspace
//!
//! Log initialization for unit and integration test binaries, and
//! assertions over the server's JSON error body contract.

pub mod error_body;
pub mod logging;
