//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`details`]: Metadata lookup
//! - [`jobs`]: Job submission, status, file download
//! - [`system`]: Health, OpenAPI

mod details;
mod jobs;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use details::*;
pub use jobs::*;
pub use system::*;
