//! Helpers for tests that need to observe what sinks deliver.
//!
//! Compiled for unit tests and, behind the `test-util` feature, for
//! integration tests and downstream crates.

mod collecting_backend;

pub use collecting_backend::CollectingBackend;
