//! Test utilities
//!
//! Manual in-memory implementations of the ports and test fixtures.
//!
//! The metric port is additionally mocked with mockall where a test needs to
//! inject a failure into one specific query. Everything else uses these
//! in-memory repositories, which behave like small databases and make
//! service-level assertions straightforward.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
