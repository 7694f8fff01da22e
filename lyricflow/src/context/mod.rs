//! Context management for pipeline execution.
//!
//! This module provides:
//! - The append-only variable store shared by the stages of one run
//! - Run identities used to correlate logs and events

mod identity;
mod variables;

pub use identity::RunIdentity;
pub use variables::Context;
