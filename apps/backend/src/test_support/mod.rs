//! Helpers for exercising the HTTP surface without a real language model.

pub mod app_builder;
pub mod scripted_judge;

pub use app_builder::{create_test_app, TestAppBuilder};
pub use scripted_judge::ScriptedJudge;
