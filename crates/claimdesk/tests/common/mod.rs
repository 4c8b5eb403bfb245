//! Shared utilities for claimdesk integration tests.
//!
//! - `TestHarness` gives each test its own data directory and opens a
//!   `ClaimDesk` over any storage backend.
//! - Builders produce configs and media uploads without boilerplate.

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
