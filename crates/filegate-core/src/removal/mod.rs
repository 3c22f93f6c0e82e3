//! Coordination with the external version-control-aware removal tool
//!
//! This module provides:
//! - Subprocess invocation of the tool with filesystem fallback
//! - Ephemeral, batch-scoped config artifacts for the tool

mod credentials;
mod invoker;

pub use credentials::{CredentialSource, ToolConfigGuard};
pub use invoker::{RemovalInvoker, RemovalReport, RemovalTier};
