//! Common test utilities for media-jobs integration tests

#[allow(dead_code)]
pub mod fake_tool;

pub use fake_tool::*;
