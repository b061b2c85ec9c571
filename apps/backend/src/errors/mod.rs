//! Error codes for the grader API.

pub mod error_code;

pub use error_code::ErrorCode;
